//! The collected dataset: one [Drawing] per label.
//!
//! On disk this is a JSON object keyed by label, each value an array of strokes, each stroke an
//! array of points (see [crate::stroke]). An empty array is a label that was saved with nothing
//! drawn, which is not the same thing as a label that is missing from the object.

use crate::{
    error::{HwError, HwErrorExt, Result},
    stroke::Drawing,
};
use serde::{Deserialize, Serialize};
use std::{
    borrow::Borrow,
    collections::BTreeMap,
    fmt::{Display, Formatter},
    path::Path,
};

/// A character or symbol being collected.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    pub fn new(label: impl Into<String>) -> Self {
        Label(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Label {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Label {
    fn from(label: &str) -> Self {
        Label::new(label)
    }
}

impl From<String> for Label {
    fn from(label: String) -> Self {
        Label(label)
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the collector knows about a label, for the "has data" indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStatus {
    Missing,
    Empty,
    Collected(usize),
}

impl LabelStatus {
    pub fn has_data(&self) -> bool {
        matches!(self, LabelStatus::Collected(_))
    }
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    drawings: BTreeMap<Label, Drawing>,
}

impl Dataset {
    pub fn new() -> Self {
        Dataset::default()
    }

    /// The drawing for `label`, or an empty one if nothing was collected.
    pub fn get_drawing(&self, label: &str) -> Drawing {
        self.drawings.get(label).cloned().unwrap_or_default()
    }

    pub fn drawing(&self, label: &str) -> Option<&Drawing> {
        self.drawings.get(label)
    }

    /// Replace whatever is stored for `label`.
    pub fn set_drawing(&mut self, label: impl Into<Label>, drawing: Drawing) {
        let label = label.into();
        tracing::debug!("set {} strokes for {label}", drawing.len());
        self.drawings.insert(label, drawing);
    }

    pub fn remove(&mut self, label: &str) -> Option<Drawing> {
        self.drawings.remove(label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.drawings.contains_key(label)
    }

    pub fn status(&self, label: &str) -> LabelStatus {
        match self.drawings.get(label) {
            None => LabelStatus::Missing,
            Some(drawing) if drawing.is_empty() => LabelStatus::Empty,
            Some(drawing) => LabelStatus::Collected(drawing.len()),
        }
    }

    /// Labels from `alphabet` that have no strokes, whether absent or saved empty.
    pub fn missing<'a>(&self, alphabet: &'a [String]) -> Vec<&'a str> {
        alphabet
            .iter()
            .map(String::as_str)
            .filter(|label| !self.status(label).has_data())
            .collect()
    }

    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.drawings.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Label, &Drawing)> {
        self.drawings.iter()
    }

    pub fn len(&self) -> usize {
        self.drawings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawings.is_empty()
    }

    pub fn stroke_count(&self) -> usize {
        self.drawings.values().map(Drawing::len).sum()
    }

    pub fn point_count(&self) -> usize {
        self.drawings.values().map(Drawing::point_count).sum()
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Dataset> {
        let dataset: Dataset = serde_json::from_slice(bytes).map_err(HwError::decode)?;
        tracing::debug!(
            "decoded {} labels, {} strokes",
            dataset.len(),
            dataset.stroke_count()
        );
        Ok(dataset)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Dataset> {
        let path = path.as_ref();
        tracing::info!("load dataset from {}", path.display());
        let bytes = std::fs::read(path)
            .map_err(HwError::from)
            .problem(format!("{}:", path.display()))?;
        Dataset::from_slice(&bytes)
    }

    pub fn save(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(HwError::encode)
    }

    pub fn save_pretty(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(HwError::encode)
    }

    /// Encode then write, truncating `path`. Nothing is written if encoding fails.
    pub fn write(&self, path: impl AsRef<Path>, pretty: bool) -> Result<()> {
        let path = path.as_ref();
        let bytes = if pretty {
            self.save_pretty()?
        } else {
            self.save()?
        };

        tracing::info!("write {} bytes to {}", bytes.len(), path.display());
        std::fs::write(path, bytes)
            .map_err(HwError::from)
            .problem(format!("{}:", path.display()))
    }
}

impl FromIterator<(Label, Drawing)> for Dataset {
    fn from_iter<I: IntoIterator<Item = (Label, Drawing)>>(iter: I) -> Self {
        Dataset {
            drawings: iter.into_iter().collect(),
        }
    }
}
