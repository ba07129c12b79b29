//! Module: catalog
//! Responsibility: read-only index lookup contract consumed by validation.
//! Does not own: index construction, maintenance, or tokenization.
//! Boundary: the storage layer owns and mutates catalogs; this crate only reads.


use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, sync::Arc};
use thiserror::Error as ThisError;

///
/// CatalogError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum CatalogError {
    #[error("index name must not be empty")]
    EmptyIndexName,

    #[error("duplicate index name '{name}'")]
    DuplicateIndex { name: String },
}

///
/// IndexKind
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    FullText,
    Value,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::FullText => "full-text",
            Self::Value => "value",
        };
        write!(f, "{label}")
    }
}

///
/// IndexDescriptor
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct IndexDescriptor {
    pub name: String,
    pub kind: IndexKind,
    #[serde(default)]
    pub fields: Vec<String>,
}

impl IndexDescriptor {
    #[must_use]
    pub fn full_text<I, S>(name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, IndexKind::FullText, fields)
    }

    #[must_use]
    pub fn value<I, S>(name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, IndexKind::Value, fields)
    }

    fn new<I, S>(name: impl Into<String>, kind: IndexKind, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            kind,
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub const fn is_full_text(&self) -> bool {
        matches!(self.kind, IndexKind::FullText)
    }
}

///
/// IndexCatalog
///
/// Synchronous, read-only index lookup by unique name.
///

pub trait IndexCatalog {
    fn lookup(&self, name: &str) -> Option<&IndexDescriptor>;
}

impl<T: IndexCatalog + ?Sized> IndexCatalog for &T {
    fn lookup(&self, name: &str) -> Option<&IndexDescriptor> {
        (**self).lookup(name)
    }
}

impl<T: IndexCatalog + ?Sized> IndexCatalog for Arc<T> {
    fn lookup(&self, name: &str) -> Option<&IndexDescriptor> {
        (**self).lookup(name)
    }
}

impl IndexCatalog for BTreeMap<String, IndexDescriptor> {
    fn lookup(&self, name: &str) -> Option<&IndexDescriptor> {
        self.get(name)
    }
}

///
/// MemoryCatalog
///
/// In-memory catalog snapshot. Deserializes from a list of descriptors,
/// rejecting empty and duplicate names.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(try_from = "Vec<IndexDescriptor>", into = "Vec<IndexDescriptor>")]
pub struct MemoryCatalog {
    indexes: BTreeMap<String, IndexDescriptor>,
}

impl MemoryCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_descriptors(
        descriptors: impl IntoIterator<Item = IndexDescriptor>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for descriptor in descriptors {
            catalog.insert(descriptor)?;
        }

        Ok(catalog)
    }

    pub fn insert(&mut self, descriptor: IndexDescriptor) -> Result<(), CatalogError> {
        if descriptor.name.is_empty() {
            return Err(CatalogError::EmptyIndexName);
        }
        if self.indexes.contains_key(&descriptor.name) {
            return Err(CatalogError::DuplicateIndex {
                name: descriptor.name,
            });
        }
        self.indexes.insert(descriptor.name.clone(), descriptor);

        Ok(())
    }

    /// Remove an index, returning its descriptor when it existed.
    pub fn remove(&mut self, name: &str) -> Option<IndexDescriptor> {
        self.indexes.remove(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexDescriptor> {
        self.indexes.values()
    }
}

impl IndexCatalog for MemoryCatalog {
    fn lookup(&self, name: &str) -> Option<&IndexDescriptor> {
        self.indexes.get(name)
    }
}

impl TryFrom<Vec<IndexDescriptor>> for MemoryCatalog {
    type Error = CatalogError;

    fn try_from(descriptors: Vec<IndexDescriptor>) -> Result<Self, Self::Error> {
        Self::from_descriptors(descriptors)
    }
}

impl From<MemoryCatalog> for Vec<IndexDescriptor> {
    fn from(catalog: MemoryCatalog) -> Self {
        catalog.indexes.into_values().collect()
    }
}
