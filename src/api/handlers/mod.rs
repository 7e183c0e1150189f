pub mod stock_data;

pub use stock_data::{get_stock_data, health};
