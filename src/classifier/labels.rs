//! Class label table
//!
//! Index `i` names output probability `i`.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::StartupError;

#[derive(Debug, Clone, PartialEq)]
pub struct ClassLabels(Vec<String>);

/// Accepted on-disk layouts
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LabelsFile {
    Plain(Vec<String>),
    Encoder { classes: Vec<String> },
}

impl ClassLabels {
    pub fn new(classes: Vec<String>) -> Result<Self, StartupError> {
        if classes.is_empty() {
            return Err(StartupError::InvalidLabels("no classes defined".to_string()));
        }

        let mut seen = HashSet::new();
        for class in &classes {
            if !seen.insert(class.as_str()) {
                return Err(StartupError::InvalidLabels(format!("duplicate class '{}'", class)));
            }
        }

        Ok(Self(classes))
    }

    /// Load `["walking", ...]` or `{"classes": ["walking", ...]}`
    pub fn load(path: &Path) -> Result<Self, StartupError> {
        if !path.exists() {
            return Err(StartupError::MissingFile(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|source| StartupError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: LabelsFile = serde_json::from_str(&content).map_err(|source| StartupError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        match file {
            LabelsFile::Plain(classes) | LabelsFile::Encoder { classes } => Self::new(classes),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}
