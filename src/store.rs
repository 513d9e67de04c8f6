use crate::error::StoreError;
use crate::model::{renumber, GridItem};
use log::{debug, warn};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

pub const ITEMS_NAMESPACE: &str = "grid-items";

pub fn items_key(category_id: &str) -> String {
    format!("{ITEMS_NAMESPACE}:{category_id}")
}

/// String-keyed durable storage, one value per key.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Seed data for categories that have never been saved.
pub trait DefaultsProvider {
    fn defaults(&self, category_id: &str) -> Vec<GridItem>;
}

/// In-memory backend. Clones share the same map, so a test can keep a handle and inspect
/// what the engine wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
    writes: Rc<Cell<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    pub fn insert_raw(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    /// Number of `set` calls made through any clone.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.raw(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.insert_raw(key, value);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

/// One JSON file per key inside `root`.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store under the platform data directory.
    pub fn in_data_dir() -> Result<Self, StoreError> {
        let dirs = directories::ProjectDirs::from("com", "start_deck", "start_deck")
            .ok_or(StoreError::NoDataDir)?;
        Ok(Self::new(dirs.data_dir().join("items")))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", file_stem_for_key(key)))
    }
}

fn file_stem_for_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Read { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.root).map_err(|source| StoreError::Write {
            path: self.root.clone(),
            source,
        })?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value).map_err(|source| StoreError::Write {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &path).map_err(|source| StoreError::Write { path, source })
    }
}

/// Loads and saves one category's tiles at a time.
pub struct ItemStore {
    backend: Box<dyn KeyValueStore>,
    defaults: Box<dyn DefaultsProvider>,
}

impl ItemStore {
    pub fn new(backend: Box<dyn KeyValueStore>, defaults: Box<dyn DefaultsProvider>) -> Self {
        Self { backend, defaults }
    }

    /// Never fails: unreadable or corrupt data falls back to the category's defaults.
    pub fn load(&self, category_id: &str) -> Vec<GridItem> {
        let key = items_key(category_id);
        let raw = match self.backend.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return self.load_defaults(category_id),
            Err(err) => {
                warn!("failed to read {key}, using defaults: {err}");
                return self.load_defaults(category_id);
            }
        };

        match serde_json::from_str::<Vec<GridItem>>(&raw) {
            Ok(mut items) => {
                items.sort_by_key(|item| item.order);
                items
            }
            Err(err) => {
                warn!("failed to parse {key}, using defaults: {err}");
                self.load_defaults(category_id)
            }
        }
    }

    pub fn load_defaults(&self, category_id: &str) -> Vec<GridItem> {
        let mut items = self.defaults.defaults(category_id);
        if items.is_empty() {
            debug!("no seed items for {category_id}, showing add tile");
            return vec![GridItem::add_icon()];
        }
        renumber(&mut items);
        items
    }

    /// Writes the whole collection. An empty collection is never written, so a transient
    /// empty state cannot wipe what is stored.
    pub fn save(&mut self, category_id: &str, items: &[GridItem]) -> Result<(), StoreError> {
        if items.is_empty() {
            debug!("skipping save of empty collection for {category_id}");
            return Ok(());
        }
        let key = items_key(category_id);
        let json = serde_json::to_string(items).map_err(|source| StoreError::Encode {
            key: key.clone(),
            source,
        })?;
        self.backend.set(&key, &json)
    }
}
