//! Where the chart gets its records from

use crate::errors::{Result, VisualizationError};
use serde::Deserialize;
use std::future::Future;
use std::path::PathBuf;
use stockchart::{StockCsvReader, StockRecord};

/// Default dataset endpoint of a locally running `stockchart-server`
pub const DEFAULT_URL: &str = "http://127.0.0.1:3000/api/stock-data";

/// A one-shot provider of the full dataset.
///
/// Any failure to obtain records, including an empty dataset, is a
/// [`VisualizationError::Fetch`].
pub trait DataSource {
    fn fetch(&self) -> impl Future<Output = Result<Vec<StockRecord>>> + Send;
}

/// Fetches the dataset from the HTTP API.
///
/// Records with a non-finite or non-positive price are rejected as
/// [`VisualizationError::InvalidData`].
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl DataSource for HttpSource {
    async fn fetch(&self) -> Result<Vec<StockRecord>> {
        tracing::debug!(url = %self.url, "fetching stock data");
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<ErrorBody>()
                .await
                .map(|body| format!(": {}", body.error))
                .unwrap_or_default();
            return Err(VisualizationError::fetch(format!(
                "{} responded {}{}",
                self.url, status, detail
            )));
        }

        let records: Vec<StockRecord> = response.json().await?;
        if records.is_empty() {
            return Err(VisualizationError::fetch(format!(
                "{} returned an empty dataset",
                self.url
            )));
        }
        check_prices(&records)?;
        Ok(records)
    }
}

fn check_prices(records: &[StockRecord]) -> Result<()> {
    let bad = records.iter().find(|r| {
        [r.open, r.high, r.low, r.close]
            .iter()
            .any(|price| !price.is_finite() || *price <= 0.0)
    });
    match bad {
        Some(record) => Err(VisualizationError::InvalidData {
            message: format!("record for {} has a non-positive price", record.date),
        }),
        None => Ok(()),
    }
}

/// Reads the CSV directly, bypassing the server
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    reader: StockCsvReader,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            reader: StockCsvReader::new(),
        }
    }

    pub fn with_reader(mut self, reader: StockCsvReader) -> Self {
        self.reader = reader;
        self
    }
}

impl DataSource for FileSource {
    async fn fetch(&self) -> Result<Vec<StockRecord>> {
        Ok(self.reader.read_records_async(&self.path).await?)
    }
}
