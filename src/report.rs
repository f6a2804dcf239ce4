//! Substitution reports
//!
//! A report maps the exact placeholder text to the value it became. It is
//! keyed by text, not position: two identical placeholders in one input
//! share one entry and the later resolution wins.

use std::collections::BTreeMap;
use std::path::Path;

use clap::ValueEnum;
use serde::Serialize;

/// Placeholder text → substituted value, for one input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SubstitutionReport {
    entries: BTreeMap<String, String>,
}

impl SubstitutionReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, raw_text: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(raw_text.into(), value.into());
    }

    pub fn get(&self, raw_text: &str) -> Option<&str> {
        self.entries.get(raw_text).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by placeholder text
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Render the report for `path` in the requested format
    pub fn render(&self, path: &Path, format: ReportFormat) -> Result<String, serde_json::Error> {
        match format {
            ReportFormat::Text => Ok(self.render_text(path)),
            ReportFormat::Json => serde_json::to_string(&FileReport {
                path: &path.display().to_string(),
                replaced: self.len(),
                substitutions: self,
            }),
        }
    }

    fn render_text(&self, path: &Path) -> String {
        let path = path.display();
        let mut out = format!("{path}: {} placeholder(s) replaced\n", self.len());
        for (raw, value) in self.iter() {
            out.push_str(&format!("{path}: '{raw}' => '{value}'\n"));
        }
        out
    }
}

#[derive(Serialize)]
struct FileReport<'a> {
    path: &'a str,
    replaced: usize,
    substitutions: &'a SubstitutionReport,
}

/// How the per-file summary is printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Human readable lines (default)
    #[default]
    Text,

    /// One JSON object per file
    Json,
}
