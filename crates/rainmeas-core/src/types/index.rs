//! Registry index types.
//!
//! The index is the entry point of the registry: one entry per published
//! package, keyed by package name.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Index entry for a single package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Latest published version
    pub latest: String,
    /// Every published version, when the registry lists them
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub versions: Vec<String>,
}

/// Mapping from package name to its index entry.
///
/// Names keep the order the registry document lists them in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistryIndex {
    packages: IndexMap<String, IndexEntry>,
}

impl IndexEntry {
    /// Create an entry that only records the latest version
    pub fn new(latest: impl Into<String>) -> Self {
        Self {
            latest: latest.into(),
            versions: Vec::new(),
        }
    }
}

impl RegistryIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a package entry
    pub fn insert(&mut self, name: impl Into<String>, entry: IndexEntry) {
        self.packages.insert(name.into(), entry);
    }

    /// Look up a package entry by name
    pub fn get(&self, name: &str) -> Option<&IndexEntry> {
        self.packages.get(name)
    }

    /// Check whether the index lists a package
    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    /// Package names in index order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(String::as_str)
    }

    /// Iterate entries in index order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexEntry)> {
        self.packages.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl FromIterator<(String, IndexEntry)> for RegistryIndex {
    fn from_iter<I: IntoIterator<Item = (String, IndexEntry)>>(iter: I) -> Self {
        Self {
            packages: iter.into_iter().collect(),
        }
    }
}
