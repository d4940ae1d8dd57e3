// src/session.rs
//
// Who is logged in, persisted as two string keys in a small key/value store.
// Headers are built per request from `get_session()`, so clearing the store is
// all it takes to stop sending the bearer token.

use std::{
    collections::{hash_map::DefaultHasher, BTreeMap, HashMap},
    fs,
    hash::{Hash, Hasher},
    io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, Weak},
};

use crate::config::consts::{KEY_AUTH_TOKEN, KEY_IS_AUTHENTICATED};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub authenticated: bool,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Token to put in `Authorization`, if there is a usable one.
    pub fn bearer(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.trim().is_empty())
    }

    /// The flag alone is not enough: no token means not logged in.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated && self.bearer().is_some()
    }
}

/// Durable string key/value storage.
pub trait Storage: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> io::Result<()>;
    fn remove(&mut self, key: &str) -> io::Result<()>;

    /// Changes whenever the stored contents change, whoever wrote them.
    fn stamp(&self) -> u64;
}

/* ---------- file-backed ---------- */

/// JSON object on disk. Every read goes to the file so writes from another
/// running instance are picked up; writes go through a temp file + rename.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> BTreeMap<String, String> {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|txt| serde_json::from_str(&txt).ok())
            .unwrap_or_default()
    }

    fn save(&self, map: &BTreeMap<String, String>) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let body = serde_json::to_string_pretty(map)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body)?;
        fs::rename(&tmp, &self.path)
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.load().remove(key)
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        let mut map = self.load();
        map.insert(s!(key), s!(value));
        self.save(&map)
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        let mut map = self.load();
        if map.remove(key).is_none() && !self.path.exists() {
            return Ok(());
        }
        self.save(&map)
    }

    fn stamp(&self) -> u64 {
        let mut h = DefaultHasher::new();
        fs::read(&self.path).unwrap_or_default().hash(&mut h);
        h.finish()
    }
}

/* ---------- in-memory ---------- */

#[derive(Default)]
struct MemoryInner {
    map: HashMap<String, String>,
    writes: u64,
}

/// Shared in-memory storage. Clones see the same data, like two tabs of one origin.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().map.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        let mut g = self.lock();
        g.map.insert(s!(key), s!(value));
        g.writes += 1;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        let mut g = self.lock();
        if g.map.remove(key).is_some() {
            g.writes += 1;
        }
        Ok(())
    }

    fn stamp(&self) -> u64 {
        self.lock().writes
    }
}

/* ---------- store + subscribers ---------- */

type Callback = Box<dyn FnMut(&Session) + Send>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Callback)>,
}

/// Handle returned by `on_session_change`. Dropping it unsubscribes.
pub struct Subscription {
    id: u64,
    listeners: Weak<Mutex<Listeners>>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        // Drop does the work.
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            let mut g = listeners.lock().unwrap_or_else(|e| e.into_inner());
            g.entries.retain(|(id, _)| *id != self.id);
        }
    }
}

pub struct SessionStore {
    storage: Box<dyn Storage>,
    listeners: Arc<Mutex<Listeners>>,
    seen: u64,
}

impl SessionStore {
    pub fn new(storage: impl Storage + 'static) -> Self {
        let seen = storage.stamp();
        Self {
            storage: Box::new(storage),
            listeners: Arc::new(Mutex::new(Listeners::default())),
            seen,
        }
    }

    /// Store backed by `<store_dir>/session.json`.
    pub fn open_file(path: impl Into<PathBuf>) -> Self {
        Self::new(FileStorage::new(path))
    }

    pub fn get_session(&self) -> Session {
        Session {
            token: self.storage.get(KEY_AUTH_TOKEN),
            authenticated: self
                .storage
                .get(KEY_IS_AUTHENTICATED)
                .is_some_and(|v| v == "true"),
        }
    }

    pub fn set_session(&mut self, token: &str, authenticated: bool) -> io::Result<()> {
        self.storage.set(KEY_AUTH_TOKEN, token)?;
        let flag = if authenticated {
            self.storage.set(KEY_IS_AUTHENTICATED, "true")
        } else {
            self.storage.remove(KEY_IS_AUTHENTICATED)
        };

        // A token must never outlive a failed flag write; headers would keep it.
        if let Err(e) = flag {
            loge!("Session: flag write failed, dropping token: {e}");
            if let Err(undo) = self.storage.remove(KEY_AUTH_TOKEN) {
                loge!("Session: could not drop token: {undo}");
            }
            self.after_local_write();
            return Err(e);
        }

        logf!("Session: stored (authenticated={authenticated})");
        self.after_local_write();
        Ok(())
    }

    pub fn clear_session(&mut self) -> io::Result<()> {
        self.storage.remove(KEY_AUTH_TOKEN)?;
        self.storage.remove(KEY_IS_AUTHENTICATED)?;
        logf!("Session: cleared");
        self.after_local_write();
        Ok(())
    }

    /// Register a callback for session changes, local or from another instance.
    pub fn on_session_change(&self, callback: impl FnMut(&Session) + Send + 'static) -> Subscription {
        let mut g = self.lock_listeners();
        g.next_id += 1;
        let id = g.next_id;
        g.entries.push((id, Box::new(callback)));
        Subscription { id, listeners: Arc::downgrade(&self.listeners) }
    }

    /// Check whether someone else rewrote the storage since we last looked.
    /// Notifies subscribers and returns true if so.
    pub fn poll_changes(&mut self) -> bool {
        let stamp = self.storage.stamp();
        if stamp == self.seen {
            return false;
        }
        self.seen = stamp;
        logd!("Session: external change detected");
        self.notify();
        true
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock_listeners().entries.len()
    }

    fn after_local_write(&mut self) {
        self.seen = self.storage.stamp();
        self.notify();
    }

    fn notify(&self) {
        let snapshot = self.get_session();
        let mut g = self.lock_listeners();
        for (_, cb) in g.entries.iter_mut() {
            cb(&snapshot);
        }
    }

    fn lock_listeners(&self) -> MutexGuard<'_, Listeners> {
        self.listeners.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_without_token_is_not_authenticated() {
        let s = Session { token: None, authenticated: true };
        assert!(!s.is_authenticated());
        let s = Session { token: Some(s!("  ")), authenticated: true };
        assert!(!s.is_authenticated());
        assert_eq!(s.bearer(), None);
    }

    /// Memory storage that refuses writes to one key.
    struct FailsOn {
        inner: MemoryStorage,
        key: &'static str,
    }

    impl Storage for FailsOn {
        fn get(&self, key: &str) -> Option<String> {
            self.inner.get(key)
        }
        fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
            if key == self.key {
                return Err(io::Error::other("disk full"));
            }
            self.inner.set(key, value)
        }
        fn remove(&mut self, key: &str) -> io::Result<()> {
            self.inner.remove(key)
        }
        fn stamp(&self) -> u64 {
            self.inner.stamp()
        }
    }

    #[test]
    fn failed_flag_write_leaves_no_token() {
        let mem = MemoryStorage::new();
        let mut store = SessionStore::new(FailsOn { inner: mem.clone(), key: KEY_IS_AUTHENTICATED });

        let seen = std::sync::Arc::new(Mutex::new(Vec::new()));
        let sink = std::sync::Arc::clone(&seen);
        let _sub = store.on_session_change(move |s| sink.lock().unwrap().push(s.clone()));

        assert!(store.set_session("abc", true).is_err());

        let s = store.get_session();
        assert_eq!(s, Session::anonymous());
        assert_eq!(s.bearer(), None);
        assert!(crate::api::headers_for(&s).iter().all(|(k, _)| k != "Authorization"));
        assert_eq!(mem.get(KEY_AUTH_TOKEN), None);
        assert_eq!(seen.lock().unwrap().last(), Some(&Session::anonymous()));
    }

    #[test]
    fn unauthenticated_set_leaves_flag_absent() {
        let mem = MemoryStorage::new();
        let mut store = SessionStore::new(mem.clone());
        store.set_session("tok", false).unwrap();
        assert_eq!(mem.get(KEY_IS_AUTHENTICATED), None);
        assert_eq!(store.get_session().token.as_deref(), Some("tok"));
    }
}
