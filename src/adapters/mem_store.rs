//! In-memory hierarchical configuration store.
//!
//! Backs the test suite and the demo binary, and doubles as the snapshot
//! format: the whole tree serializes to JSON, so a store can be exported,
//! inspected and re-imported.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::app::ports::{ConfigStore, StoreError, StoreValue};

/// One directory node: subdirectories and leaf keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct DirNode {
    dirs: BTreeMap<String, DirNode>,
    keys: BTreeMap<String, StoreValue>,
}

/// HashMap-tree store with a current directory, rooted at `/`.
#[derive(Debug, Default)]
pub struct MemStore {
    root: DirNode,
    cwd: Vec<String>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize the full tree to JSON.
    pub fn export_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.root)
    }

    /// Replace the full tree from a JSON snapshot; resets the current
    /// directory to the root.
    pub fn import_json(&mut self, json: &str) -> serde_json::Result<()> {
        self.root = serde_json::from_str(json)?;
        self.cwd.clear();
        Ok(())
    }

    fn node(&self, path: &[String]) -> Result<&DirNode, StoreError> {
        let mut node = &self.root;
        for segment in path {
            node = node
                .dirs
                .get(segment)
                .ok_or_else(|| StoreError::NoSuchPath(path.join("/")))?;
        }
        Ok(node)
    }

    fn node_mut(&mut self, path: &[String], create: bool) -> Result<&mut DirNode, StoreError> {
        let mut node = &mut self.root;
        for segment in path {
            if !node.dirs.contains_key(segment) {
                if create {
                    node.dirs.insert(segment.clone(), DirNode::default());
                } else {
                    return Err(StoreError::NoSuchPath(path.join("/")));
                }
            }
            node = node
                .dirs
                .get_mut(segment)
                .ok_or_else(|| StoreError::NoSuchPath(path.join("/")))?;
        }
        Ok(node)
    }

    fn cwd_node(&self) -> Result<&DirNode, StoreError> {
        self.node(&self.cwd)
    }
}

impl ConfigStore for MemStore {
    fn cwd(&self) -> Vec<String> {
        self.cwd.clone()
    }

    fn cd(&mut self, path: &[String], create: bool) -> Result<(), StoreError> {
        if create {
            self.node_mut(path, true)?;
        } else {
            self.node(path)?;
        }
        self.cwd = path.to_vec();
        Ok(())
    }

    fn list(&self) -> Result<(Vec<String>, Vec<String>), StoreError> {
        let node = self.cwd_node()?;
        Ok((
            node.dirs.keys().cloned().collect(),
            node.keys.keys().cloned().collect(),
        ))
    }

    fn get(&self, key: &str) -> Result<StoreValue, StoreError> {
        self.cwd_node()?
            .keys
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NoSuchKey(key.to_string()))
    }

    fn set(&mut self, key: &str, value: StoreValue) -> Result<(), StoreError> {
        let cwd = self.cwd.clone();
        let node = self.node_mut(&cwd, false)?;
        node.keys.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        let cwd = self.cwd.clone();
        let node = self.node_mut(&cwd, false)?;
        node.keys
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StoreError::NoSuchKey(key.to_string()))
    }

    fn rmdir(&mut self, name: &str) -> Result<(), StoreError> {
        let cwd = self.cwd.clone();
        let node = self.node_mut(&cwd, false)?;
        match node.dirs.get(name) {
            None => Err(StoreError::NoSuchPath(name.to_string())),
            Some(dir) if !dir.dirs.is_empty() || !dir.keys.is_empty() => {
                Err(StoreError::DirNotEmpty(name.to_string()))
            }
            Some(_) => {
                node.dirs.remove(name);
                Ok(())
            }
        }
    }
}
