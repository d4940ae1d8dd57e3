// src/export.rs
//
// Save scraped text as a .txt file. The content is first staged as a blob
// file, handed to a `Download` sink, and the blob is always removed afterwards
// (the guard's Drop runs on error and on unwind too).

use std::{
    fs, io,
    path::{Path, PathBuf},
    process,
    sync::atomic::{AtomicU64, Ordering},
};

use chrono::{NaiveDate, Utc};
use url::Url;

/// How to name the downloaded file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileName {
    /// Use this name as-is.
    Literal(String),
    /// Derive `{host}_scrape_{date}.txt` from this URL.
    FromUrl(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Could not stage export: {0}")]
    Stage(#[source] io::Error),
    #[error("Download failed: {0}")]
    Deliver(#[source] io::Error),
}

/// Today's date as the ISO `YYYY-MM-DD` day, UTC.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Filename policy:
/// - `FromUrl` with an absolute http(s) URL → `{hostname}_scrape_{date}.txt`
/// - non-empty `Literal` → verbatim
/// - anything else → `scraped_{date}.txt`
pub fn resolve_file_name(name: Option<&FileName>, today: NaiveDate) -> String {
    let date = today.format("%Y-%m-%d");
    let fallback = || format!("scraped_{date}.txt");

    match name {
        Some(FileName::FromUrl(u)) => match host_of(u) {
            Some(host) => format!("{host}_scrape_{date}.txt"),
            None => fallback(),
        },
        Some(FileName::Literal(n)) if !n.trim().is_empty() => n.clone(),
        _ => fallback(),
    }
}

fn host_of(raw: &str) -> Option<String> {
    let url = Url::parse(raw.trim()).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    url.host_str().map(str::to_string)
}

/// The "click" half of an export: takes the staged blob and puts it somewhere
/// the user can get at it.
pub trait Download {
    fn deliver(&self, blob: &Path, file_name: &str) -> io::Result<PathBuf>;
}

/// Copies into a downloads directory, numbering duplicates like a browser does.
#[derive(Clone, Debug)]
pub struct SaveToDir {
    dir: PathBuf,
}

impl SaveToDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Download for SaveToDir {
    fn deliver(&self, blob: &Path, file_name: &str) -> io::Result<PathBuf> {
        // Only the last component; a literal name must not walk out of `dir`.
        let name = Path::new(file_name)
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, format!("Bad file name: {file_name}")))?;

        ensure_directory(&self.dir)?;
        let target = unique_target(&self.dir, name);
        fs::copy(blob, &target)?;
        Ok(target)
    }
}

/// Writes to one exact path, replacing whatever is there. The file name passed
/// to `deliver` is ignored.
#[derive(Clone, Debug)]
pub struct SaveAs {
    path: PathBuf,
}

impl SaveAs {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Download for SaveAs {
    fn deliver(&self, blob: &Path, _file_name: &str) -> io::Result<PathBuf> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            ensure_directory(parent)?;
        }
        fs::copy(blob, &self.path)?;
        Ok(self.path.clone())
    }
}

/// `name.txt`, then `name (2).txt`, `name (3).txt`, ...
pub fn unique_target(dir: &Path, file_name: &str) -> PathBuf {
    let first = dir.join(file_name);
    if !first.exists() {
        return first;
    }

    let p = Path::new(file_name);
    let stem = p.file_stem().and_then(|s| s.to_str()).unwrap_or(file_name);
    let ext = p.extension().and_then(|s| s.to_str());

    (2..)
        .map(|n| match ext {
            Some(ext) => dir.join(format!("{stem} ({n}).{ext}")),
            None => dir.join(format!("{stem} ({n})")),
        })
        .find(|candidate| !candidate.exists())
        .unwrap_or(first)
}

pub fn ensure_directory(dir: &Path) -> io::Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("Path exists but is not a directory: {}", dir.display()),
        ));
    }
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

static BLOB_SEQ: AtomicU64 = AtomicU64::new(0);

/// Temporary text blob; removed when dropped.
struct StagedBlob {
    path: PathBuf,
}

impl StagedBlob {
    fn create(staging_dir: &Path, content: &str) -> io::Result<Self> {
        ensure_directory(staging_dir)?;
        let seq = BLOB_SEQ.fetch_add(1, Ordering::Relaxed);
        let blob = Self {
            path: staging_dir.join(format!("blob-{}-{seq}.part", process::id())),
        };
        fs::write(&blob.path, content.as_bytes())?;
        Ok(blob)
    }
}

impl Drop for StagedBlob {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                loge!("Export: could not release blob {}: {}", self.path.display(), e);
            }
        }
    }
}

/// Stage `content`, deliver it under the resolved name, release the blob.
/// Returns where the file ended up.
pub fn export_text_file(
    content: &str,
    name: Option<&FileName>,
    sink: &dyn Download,
    staging_dir: &Path,
) -> Result<PathBuf, ExportError> {
    let file_name = resolve_file_name(name, today());
    let blob = StagedBlob::create(staging_dir, content).map_err(ExportError::Stage)?;

    logd!("Export: staged {} bytes as {}", content.len(), blob.path.display());

    let saved = sink.deliver(&blob.path, &file_name).map_err(ExportError::Deliver)?;
    logf!("Export: saved {}", saved.display());
    Ok(saved)
}
