//! Keyed reconciliation between successive scenes
//!
//! A render never rebuilds the retained scene. It computes the new scene,
//! diffs it against the old one by [`ElementKey`], and applies only the
//! entered, updated and exited elements.

use crate::scene::{Axes, ElementKey, Marker, Point, Scene, VolumeBar};
use std::collections::BTreeMap;

/// Changes to one keyed element collection
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedDiff<T> {
    pub entered: Vec<(ElementKey, T)>,
    pub updated: Vec<(ElementKey, T)>,
    pub exited: Vec<ElementKey>,
}

impl<T> Default for KeyedDiff<T> {
    fn default() -> Self {
        Self {
            entered: Vec::new(),
            updated: Vec::new(),
            exited: Vec::new(),
        }
    }
}

impl<T: Clone + PartialEq> KeyedDiff<T> {
    pub fn between(old: &BTreeMap<ElementKey, T>, new: &BTreeMap<ElementKey, T>) -> Self {
        let mut diff = Self::default();
        for (key, element) in new {
            match old.get(key) {
                None => diff.entered.push((*key, element.clone())),
                Some(previous) if previous != element => diff.updated.push((*key, element.clone())),
                Some(_) => {}
            }
        }
        diff.exited = old.keys().filter(|key| !new.contains_key(key)).copied().collect();
        diff
    }

    pub fn apply(&self, target: &mut BTreeMap<ElementKey, T>) {
        for key in &self.exited {
            target.remove(key);
        }
        for (key, element) in self.entered.iter().chain(&self.updated) {
            target.insert(*key, element.clone());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entered.is_empty() && self.updated.is_empty() && self.exited.is_empty()
    }

    /// Number of elements touched
    pub fn len(&self) -> usize {
        self.entered.len() + self.updated.len() + self.exited.len()
    }
}

/// Everything that changed between two scenes.
///
/// Paths and axes are replaced whole; `None` means unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneDiff {
    pub price_line: Option<Vec<Point>>,
    pub area: Option<Vec<Point>>,
    pub markers: KeyedDiff<Marker>,
    pub volume_bars: KeyedDiff<VolumeBar>,
    pub axes: Option<Axes>,
}

fn changed<T: Clone + PartialEq>(old: &T, new: &T) -> Option<T> {
    (old != new).then(|| new.clone())
}

impl SceneDiff {
    pub fn between(old: &Scene, new: &Scene) -> Self {
        Self {
            price_line: changed(&old.price_line, &new.price_line),
            area: changed(&old.area, &new.area),
            markers: KeyedDiff::between(&old.markers, &new.markers),
            volume_bars: KeyedDiff::between(&old.volume_bars, &new.volume_bars),
            axes: changed(&old.axes, &new.axes),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.price_line.is_none()
            && self.area.is_none()
            && self.axes.is_none()
            && self.markers.is_empty()
            && self.volume_bars.is_empty()
    }
}

impl Scene {
    /// Bring this scene up to date with a diff computed against it
    pub fn apply(&mut self, diff: &SceneDiff) {
        if let Some(line) = &diff.price_line {
            self.price_line.clone_from(line);
        }
        if let Some(area) = &diff.area {
            self.area.clone_from(area);
        }
        if let Some(axes) = &diff.axes {
            self.axes.clone_from(axes);
        }
        diff.markers.apply(&mut self.markers);
        diff.volume_bars.apply(&mut self.volume_bars);
    }
}
