//! Dataset loading and the lazily-populated dataset store.
//!
//! The dataset is one JSON object: component keys map to open records, and
//! the reserved `_tokens` key maps design-token names to values. Key order
//! follows the file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::OnceCell;
use tracing::{debug, error, info};

use crate::error::DatasetLoadError;
use crate::record::{is_truthy, ComponentRecord};

/// Key holding the design-token map. Never listed or searched as a component.
pub const TOKENS_KEY: &str = "_tokens";

/// Parsed dataset, immutable once built.
#[derive(Debug, Clone)]
pub struct Dataset {
    entries: Map<String, Value>,
}

impl Dataset {
    /// Parse a dataset from JSON text. `path` is only used in error messages.
    pub fn parse(path: &Path, text: &str) -> Result<Self, DatasetLoadError> {
        let value: Value = serde_json::from_str(text).map_err(|source| DatasetLoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        match value {
            Value::Object(entries) => Ok(Self { entries }),
            other => Err(DatasetLoadError::NotAnObject {
                path: path.to_path_buf(),
                found: json_type_name(&other),
            }),
        }
    }

    /// Total number of top-level keys, the token key included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Components in file order, excluding the token key.
    pub fn components(&self) -> impl Iterator<Item = (&str, ComponentRecord<'_>)> {
        self.entries
            .iter()
            .filter(|(key, _)| key.as_str() != TOKENS_KEY)
            .map(|(key, value)| (key.as_str(), ComponentRecord::new(value)))
    }

    pub fn component_count(&self) -> usize {
        self.entries.len() - usize::from(self.entries.contains_key(TOKENS_KEY))
    }

    /// The design-token map, if `_tokens` holds an object.
    pub fn tokens(&self) -> Option<&Map<String, Value>> {
        self.entries.get(TOKENS_KEY).and_then(Value::as_object)
    }

    pub fn token_count(&self) -> usize {
        self.tokens().map_or(0, Map::len)
    }

    /// Find a record by name: lower-cased key first, then the exact key.
    ///
    /// A falsy value under a key counts as a miss. When a dataset carries
    /// several casings of one logical key, the lower-cased one wins.
    pub fn lookup(&self, name: &str) -> Option<ComponentRecord<'_>> {
        let truthy = |value: &&Value| is_truthy(value);
        self.entries
            .get(&name.to_lowercase())
            .filter(truthy)
            .or_else(|| self.entries.get(name).filter(truthy))
            .map(ComponentRecord::new)
    }

    /// First `limit` component keys in file order, for discovery hints.
    pub fn sample_component_names(&self, limit: usize) -> Vec<String> {
        self.components()
            .take(limit)
            .map(|(name, _)| name.to_string())
            .collect()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Process-wide dataset holder.
///
/// Starts empty and is filled by the first successful [`DatasetStore::get`].
/// After that the dataset is never reloaded, even if the file changes. A
/// failed load leaves the store empty so a later request can try again.
/// Concurrent first requests wait on a single load.
#[derive(Debug)]
pub struct DatasetStore {
    path: PathBuf,
    cell: OnceCell<Arc<Dataset>>,
}

impl DatasetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cell: OnceCell::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    /// Return the cached dataset, loading it from disk on first use.
    pub async fn get(&self) -> Result<Arc<Dataset>, DatasetLoadError> {
        self.cell
            .get_or_try_init(|| self.load())
            .await
            .map(Arc::clone)
    }

    async fn load(&self) -> Result<Arc<Dataset>, DatasetLoadError> {
        debug!(path = %self.path.display(), "loading dataset");
        let result = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => Dataset::parse(&self.path, &text),
            Err(source) => Err(DatasetLoadError::Read {
                path: self.path.clone(),
                source,
            }),
        };

        match result {
            Ok(dataset) => {
                info!(
                    path = %self.path.display(),
                    components = dataset.component_count(),
                    tokens = dataset.token_count(),
                    "loaded {} entries from dataset",
                    dataset.len()
                );
                Ok(Arc::new(dataset))
            }
            Err(e) => {
                error!(error = %e, "failed to load dataset");
                Err(e)
            }
        }
    }
}
