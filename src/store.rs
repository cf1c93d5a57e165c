// src/store.rs
//
// Cross-navigation storage: survives the page reload between two battles
// pages. Values are JSON text; typed access goes through `put_json` / `get_json`.

use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::config::consts::{
    KEY_BATTLES_DATA, KEY_CARDS_TEXT, KEY_FINAL_TEXT, KEY_FLOW_STAGE, KEY_RESUME_META, SESSION_SUBDIR, STORE_DIR,
};
use crate::error::Result;
use crate::record::Record;

pub trait SessionStore {
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn get(&self, key: &str) -> Option<String>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Process-local store. Tests and the GUI worker use this.
#[derive(Default, Debug, Clone)]
pub struct MemoryStore {
    map: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }
    pub fn len(&self) -> usize { self.map.len() }
    pub fn is_empty(&self) -> bool { self.map.is_empty() }
}

impl SessionStore for MemoryStore {
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.map.insert(s!(key), s!(value));
        Ok(())
    }
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }
    fn remove(&mut self, key: &str) -> Result<()> {
        self.map.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key. Lets a CLI run resume after a restart.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `.store/session/`
    pub fn default_location() -> Self {
        Self::new(Path::new(STORE_DIR).join(SESSION_SUBDIR))
    }

    pub fn dir(&self) -> &Path { &self.dir }

    fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(join!(&safe, ".json"))
    }
}

impl SessionStore for FileStore {
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/* ---------------- typed access ---------------- */

/// Serialize and store. Failures are logged, never raised.
pub fn put_json<T: Serialize + ?Sized>(store: &mut dyn SessionStore, key: &str, value: &T) {
    let written = serde_json::to_string(value)
        .map_err(crate::error::Error::from)
        .and_then(|text| store.set(key, &text));
    if let Err(e) = written {
        loge!("Store: cannot write {}: {}", key, e);
    }
}

/// Absent or unreadable values come back as `None`.
pub fn get_json<T: DeserializeOwned>(store: &dyn SessionStore, key: &str) -> Option<T> {
    let text = store.get(key)?;
    match serde_json::from_str(&text) {
        Ok(v) => Some(v),
        Err(e) => {
            logw!("Store: ignoring unreadable {}: {}", key, e);
            None
        }
    }
}

pub fn remove_quiet(store: &mut dyn SessionStore, key: &str) {
    if let Err(e) = store.remove(key) {
        loge!("Store: cannot remove {}: {}", key, e);
    }
}

/* ---------------- flow records ---------------- */

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Start,
    CardsCollected,
    BattlesCollecting,
    Done,
}

impl Stage {
    /// Stages in which a battles page should run a collection step.
    pub fn collects_battles(stage: Option<Stage>) -> bool {
        !matches!(stage, Some(Stage::Done))
    }
}

/// Where the last navigation came from and went to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeMeta {
    pub origin_url: String,
    pub continuation: String,
    pub timestamp: i64,
}

pub fn stage(store: &dyn SessionStore) -> Option<Stage> {
    get_json(store, KEY_FLOW_STAGE)
}

pub fn set_stage(store: &mut dyn SessionStore, stage: Stage) {
    put_json(store, KEY_FLOW_STAGE, &stage);
}

pub fn collection(store: &dyn SessionStore) -> Vec<Record> {
    get_json(store, KEY_BATTLES_DATA).unwrap_or_default()
}

pub fn cards_text(store: &dyn SessionStore) -> Option<String> {
    get_json(store, KEY_CARDS_TEXT)
}

pub fn final_text(store: &dyn SessionStore) -> Option<String> {
    get_json(store, KEY_FINAL_TEXT)
}

/// Fresh run: everything from a previous flow goes.
pub fn reset_flow(store: &mut dyn SessionStore) {
    for key in [KEY_BATTLES_DATA, KEY_RESUME_META, KEY_CARDS_TEXT, KEY_FINAL_TEXT] {
        remove_quiet(store, key);
    }
    set_stage(store, Stage::Start);
}
