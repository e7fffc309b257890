//! Rules glossary shown as hover text on sheet terms.
//!
//! The table is loaded once and handed to the sheet builder; nothing here
//! is global.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::text::read_text_auto;

#[derive(Debug, Error)]
pub enum TooltipError {
    #[error("failed to read tooltips {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse tooltips {path} as JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to parse tooltips {path} as YAML: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Immutable term → explanation lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tooltips(HashMap<String, String>);

/// A word of sheet text, possibly carrying a tooltip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Term {
    Plain { text: String },
    Tip { text: String, tip: String },
}

impl Term {
    pub fn text(&self) -> &str {
        match self {
            Term::Plain { text } | Term::Tip { text, .. } => text,
        }
    }
}

impl Tooltips {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a `.yaml`/`.yml` or JSON tooltip file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TooltipError> {
        let path = path.as_ref();
        let text = read_text_auto(path).map_err(|source| TooltipError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml" | "yml")
        );
        let tips = if is_yaml {
            serde_yaml::from_str(&text).map_err(|source| TooltipError::Yaml {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            serde_json::from_str(&text).map_err(|source| TooltipError::Json {
                path: path.to_path_buf(),
                source,
            })?
        };
        tracing::debug!(path = %path.display(), "loaded tooltips");
        Ok(tips)
    }

    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn get(&self, term: &str) -> Option<&str> {
        self.0.get(term).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Split `text` on single spaces and attach a tip to every known word.
    /// Matching is exact, so `Keen,` does not match `Keen`.
    pub fn annotate(&self, text: &str) -> Vec<Term> {
        text.split(' ')
            .map(|word| match self.get(word) {
                Some(tip) => Term::Tip { text: word.to_string(), tip: tip.to_string() },
                None => Term::Plain { text: word.to_string() },
            })
            .collect()
    }
}

impl FromIterator<(String, String)> for Tooltips {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
