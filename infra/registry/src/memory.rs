use crate::Registry;
use crate::error::RegistryError;
use crate::path;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::ops::Deref;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Default)]
pub struct MemoryRegistryInner {
    nodes: RwLock<BTreeMap<String, String>>,
}

/// An in-process registry tree.
///
/// Writes create missing ancestors with empty data; deletes drop the whole
/// sub-tree. Conflicting writes are serialized by the lock, last writer wins.
#[derive(Debug, Clone, Default)]
pub struct MemoryRegistry {
    inner: Arc<MemoryRegistryInner>,
}

impl Deref for MemoryRegistry {
    type Target = MemoryRegistryInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl MemoryRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }

    /// Snapshot of every stored path, sorted.
    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        self.nodes.read().keys().cloned().collect()
    }
}

fn sub_tree_prefix(normalized: &str) -> String {
    if normalized == "/" { normalized.to_owned() } else { format!("{normalized}/") }
}

#[async_trait]
impl Registry for MemoryRegistry {
    async fn exists(&self, path: &str) -> Result<bool, RegistryError> {
        let key = path::normalize(path)?;
        Ok(key == "/" || self.nodes.read().contains_key(&key))
    }

    async fn read(&self, path: &str) -> Result<Option<String>, RegistryError> {
        let key = path::normalize(path)?;
        Ok(self.nodes.read().get(&key).cloned())
    }

    async fn write(&self, path: &str, value: &str) -> Result<(), RegistryError> {
        let key = path::normalize(path)?;
        if key == "/" {
            return Err(RegistryError::InvalidPath {
                message: key.into(),
                context: Some("The root node holds no data".into()),
            });
        }

        let mut nodes = self.nodes.write();
        for ancestor in path::ancestors(&key) {
            nodes.entry(ancestor).or_default();
        }
        nodes.insert(key.clone(), value.to_owned());
        drop(nodes);

        debug!(path = %key, "Registry node written");
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<bool, RegistryError> {
        let key = path::normalize(path)?;
        if key == "/" {
            return Err(RegistryError::InvalidPath {
                message: key.into(),
                context: Some("The root node cannot be deleted".into()),
            });
        }
        let prefix = sub_tree_prefix(&key);

        let mut nodes = self.nodes.write();
        let mut existed = nodes.remove(&key).is_some();
        let doomed: Vec<String> = nodes
            .range(prefix.clone()..)
            .map(|(k, _)| k)
            .take_while(|k| k.starts_with(&prefix))
            .cloned()
            .collect();
        existed |= !doomed.is_empty();
        for k in doomed {
            nodes.remove(&k);
        }
        drop(nodes);

        if existed {
            debug!(path = %key, "Registry sub-tree deleted");
        }
        Ok(existed)
    }

    async fn children(&self, path: &str) -> Result<Vec<String>, RegistryError> {
        let key = path::normalize(path)?;
        let prefix = sub_tree_prefix(&key);

        let nodes = self.nodes.read();
        Ok(nodes
            .range(prefix.clone()..)
            .map(|(k, _)| k)
            .take_while(|k| k.starts_with(&prefix))
            .filter_map(|k| {
                let rest = &k[prefix.len()..];
                (!rest.contains('/')).then(|| rest.to_owned())
            })
            .collect())
    }
}
