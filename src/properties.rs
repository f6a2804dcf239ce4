//! Property store and flat `key=value` property sources
//!
//! Sources are merged in order; the last write for a key wins. Once built,
//! the store is only ever read, and is passed by reference to every scan.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::SubstError;

/// Where a batch of properties comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertySource {
    /// Process environment variables
    Env,
    /// A property file on disk
    File(PathBuf),
    /// Inline declarations (same `key=value` format, possibly many lines)
    Inline(String),
}

/// Name → value mapping used to resolve placeholders
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyStore {
    values: HashMap<String, String>,
}

impl PropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from sources, applied in order
    pub fn from_sources<'a, I>(sources: I) -> Result<Self, SubstError>
    where
        I: IntoIterator<Item = &'a PropertySource>,
    {
        let mut store = Self::new();
        for source in sources {
            match source {
                PropertySource::Env => store.merge(env_properties()),
                PropertySource::File(path) => store.load_file(path)?,
                PropertySource::Inline(text) => store.load_text(text),
            }
        }
        Ok(store)
    }

    /// Merge pairs into the store, overriding existing names
    pub fn merge<I, K, V>(&mut self, source: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in source {
            self.insert(name, value);
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Merge the properties declared in `text`
    pub fn load_text(&mut self, text: &str) {
        self.merge(parse_properties(text));
    }

    /// Merge the properties of a file. An empty path is ignored.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<(), SubstError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Ok(());
        }

        let text = fs::read_to_string(path).map_err(|e| SubstError::read(path, e))?;
        let before = self.len();
        self.load_text(&text);
        debug!(
            path = %path.display(),
            added = self.len() - before,
            "loaded property file"
        );
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PropertyStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut store = Self::new();
        store.merge(iter);
        store
    }
}

/// Environment variables as properties; non-UTF-8 entries are skipped
fn env_properties() -> impl Iterator<Item = (String, String)> {
    std::env::vars_os()
        .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)))
}

/// Parse `name=value` lines.
///
/// The first `=` not preceded by a backslash splits a line; `\=` in the name
/// stands for a literal `=`. Both sides are trimmed. Lines without a split
/// point or with an empty name are skipped. Pairs come back in file order,
/// so merging them keeps the last declaration of a name.
pub fn parse_properties(text: &str) -> Vec<(String, String)> {
    text.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<(String, String)> {
    let equal = find_unescaped_equal(line)?;
    let name = line[..equal].trim().replace("\\=", "=");
    if name.is_empty() {
        return None;
    }
    let value = line[equal + 1..].trim().to_string();
    Some((name, value))
}

fn find_unescaped_equal(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    bytes
        .iter()
        .enumerate()
        .find(|&(i, &b)| b == b'=' && (i == 0 || bytes[i - 1] != b'\\'))
        .map(|(i, _)| i)
}
