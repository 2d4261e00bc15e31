//! Ordered class-name tables.

use crate::util::YoloDecResult;
use std::fs;
use std::path::Path;

/// Class names indexed by class id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelTable {
    labels: Vec<String>,
}

impl LabelTable {
    /// Builds a table from names in class-id order.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    /// Parses newline-delimited text.
    ///
    /// Lines may end in `\n`, `\r` or `\r\n`; empty lines are dropped and the
    /// remaining order is kept.
    pub fn parse(text: &str) -> Self {
        let lines = text.split(|c| c == '\n' || c == '\r');
        Self::from_labels(lines.filter(|line| !line.is_empty()))
    }

    /// Reads and parses a labels file.
    pub fn load<P: AsRef<Path>>(path: P) -> YoloDecResult<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    /// The 20 Pascal VOC classes in training order.
    pub fn pascal_voc() -> Self {
        Self::from_labels([
            "aeroplane",
            "bicycle",
            "bird",
            "boat",
            "bottle",
            "bus",
            "car",
            "cat",
            "chair",
            "cow",
            "diningtable",
            "dog",
            "horse",
            "motorbike",
            "person",
            "pottedplant",
            "sheep",
            "sofa",
            "train",
            "tvmonitor",
        ])
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Returns the name of class `index`.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}
