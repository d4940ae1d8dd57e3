// tests/common/mod.rs
#![allow(dead_code)]

use std::{
    collections::VecDeque,
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use scrapedesk::{
    api::{ApiClient, ApiRequest, ApiResponse, Transport},
    export::SaveToDir,
    gui::{pages::AppCtx, router::{Navigator, Route}, task::Exec},
    session::{MemoryStorage, SessionStore},
};

pub const BASE: &str = "http://backend.test";

pub fn tmp_dir(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("scrapedesk_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&p);
    fs::create_dir_all(&p).unwrap();
    p
}

pub fn files_in(dir: &Path) -> Vec<String> {
    let mut v: Vec<String> = match fs::read_dir(dir) {
        Ok(rd) => rd.filter_map(|e| e.ok()).map(|e| e.file_name().to_string_lossy().into_owned()).collect(),
        Err(_) => Vec::new(),
    };
    v.sort();
    v
}

enum Scripted {
    Reply(u16, String),
    Down(String),
}

/// Scripted backend: answers by path, in order, and records every request.
#[derive(Clone, Default)]
pub struct FakeBackend {
    replies: Arc<Mutex<Vec<(String, VecDeque<Scripted>)>>>,
    log: Arc<Mutex<Vec<ApiRequest>>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, path: &str, r: Scripted) {
        let mut g = self.replies.lock().unwrap();
        match g.iter_mut().find(|(p, _)| p == path) {
            Some((_, q)) => q.push_back(r),
            None => g.push((path.to_string(), VecDeque::from([r]))),
        }
    }

    pub fn reply(&self, path: &str, status: u16, body: serde_json::Value) -> &Self {
        self.push(path, Scripted::Reply(status, body.to_string()));
        self
    }

    pub fn reply_text(&self, path: &str, status: u16, body: &str) -> &Self {
        self.push(path, Scripted::Reply(status, body.to_string()));
        self
    }

    pub fn unreachable(&self, path: &str) -> &Self {
        self.push(path, Scripted::Down("connection refused".into()));
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.log.lock().unwrap().clone()
    }

    pub fn calls_to(&self, path: &str) -> usize {
        let url = format!("{BASE}{path}");
        self.requests().iter().filter(|r| r.url == url).count()
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(BASE, Arc::new(self.clone()))
    }
}

impl Transport for FakeBackend {
    fn send(&self, req: &ApiRequest) -> Result<ApiResponse, String> {
        self.log.lock().unwrap().push(req.clone());
        let path = req.url.strip_prefix(BASE).unwrap_or(&req.url).to_string();

        let next = {
            let mut g = self.replies.lock().unwrap();
            g.iter_mut().find(|(p, _)| *p == path).and_then(|(_, q)| q.pop_front())
        };
        match next {
            Some(Scripted::Reply(status, body)) => Ok(ApiResponse { status, body: body.into_bytes() }),
            Some(Scripted::Down(e)) => Err(e),
            None => Ok(ApiResponse { status: 404, body: b"not scripted".to_vec() }),
        }
    }
}

/// Everything a page needs, owned, so tests can hand out an `AppCtx`.
pub struct Harness {
    pub backend: FakeBackend,
    pub storage: MemoryStorage,
    pub session: SessionStore,
    pub api: ApiClient,
    pub nav: Navigator,
    pub exec: Exec,
    pub downloads: SaveToDir,
    pub staging: PathBuf,
    pub root: PathBuf,
}

impl Harness {
    pub fn new(name: &str) -> Self {
        let backend = FakeBackend::new();
        let storage = MemoryStorage::new();
        let root = tmp_dir(name);
        Self {
            api: backend.client(),
            session: SessionStore::new(storage.clone()),
            storage,
            backend,
            nav: Navigator::new(Route::Scrape),
            exec: Exec::Inline,
            downloads: SaveToDir::new(root.join("downloads")),
            staging: root.join("blobs"),
            root,
        }
    }

    pub fn logged_in(name: &str, token: &str) -> Self {
        let mut h = Self::new(name);
        h.session.set_session(token, true).unwrap();
        h
    }

    pub fn ctx(&mut self) -> AppCtx<'_> {
        AppCtx {
            session: &mut self.session,
            api: &self.api,
            nav: &mut self.nav,
            exec: &self.exec,
            downloads: &self.downloads,
            staging_dir: &self.staging,
        }
    }

    pub fn download_dir(&self) -> PathBuf {
        self.downloads.dir().to_path_buf()
    }
}
