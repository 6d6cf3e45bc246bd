//! Type sizes: the fixed primitive tables and the per-run catalog of resolved sizes.
//!
//! The catalog is append-only within a run. It holds sizes the unknown-type resolver
//! supplied and the total size of every struct already converted, which is what lets a
//! later struct embed an earlier one as a nested record.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Byte size of a built-in primitive, `None` for any other name.
pub fn primitive_size(type_name: &str) -> Option<usize> {
    match type_name {
        "UInt8" | "SInt8" | "Char" => Some(1),
        "UInt16" | "SInt16" => Some(2),
        "UInt32" | "SInt32" | "be32" => Some(4),
        "UInt64" | "SInt64" | "be64" => Some(8),
        _ => None,
    }
}

/// Rust type used for a field of this DSL type. Unrecognized names (including
/// `UInt16`/`UInt32`/`UInt64` and nested record names) pass through unchanged.
pub fn target_type(type_name: &str) -> &str {
    match type_name {
        "UInt8" | "SInt8" | "Char" => "u8",
        "SInt16" => "i16",
        "SInt32" | "be32" => "i32",
        "SInt64" | "be64" => "i64",
        other => other,
    }
}

/// Resolved type sizes keyed by type name, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeCatalog {
    sizes: IndexMap<String, usize>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup_size(&self, type_name: &str) -> Option<usize> {
        self.sizes.get(type_name).copied().filter(|&size| size > 0)
    }

    /// Record `size` for `type_name`. The first write for a name wins; later writes and
    /// zero sizes are ignored. Returns whether the entry was inserted.
    pub fn record_size(&mut self, type_name: &str, size: usize) -> bool {
        if size == 0 {
            log::warn!("refusing zero size for type `{}`", type_name);
            return false;
        }
        if let Some(&existing) = self.sizes.get(type_name) {
            if existing != size {
                log::debug!(
                    "type `{}` already cached with size {} (ignoring {})",
                    type_name,
                    existing,
                    size
                );
            }
            return false;
        }
        log::debug!("caching type `{}` = {} byte(s)", type_name, size);
        self.sizes.insert(type_name.to_string(), size);
        true
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.sizes.iter().map(|(name, &size)| (name.as_str(), size))
    }

    /// Load a catalog saved by [`TypeCatalog::save`]: a JSON object of `name: size`.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text + "\n")?;
        Ok(())
    }
}
