//! File-per-entry content storage.
//!
//! Each entry lives in `<root>/<slug>.json` and every write goes through a
//! temp file followed by an atomic rename, so a reader never observes a
//! partially written record. A readers-writer lock serializes mutations
//! against each other and against reads; in particular the slug uniqueness
//! check and the persist of a new entry happen under one write guard.

use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::slug::{self, RandomnessUnavailable};

/// Attempts at allocating a collision-free slug before giving up.
const SLUG_ATTEMPTS: usize = 5;

/// How raw entry content is turned into HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    Markdown,
    Html,
}

impl RendererKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RendererKind::Markdown => "markdown",
            RendererKind::Html => "html",
        }
    }
}

impl FromStr for RendererKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, StoreError> {
        match s {
            "markdown" => Ok(RendererKind::Markdown),
            "html" => Ok(RendererKind::Html),
            other => Err(StoreError::InvalidRenderer(other.to_string())),
        }
    }
}

/// A single stored piece of content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub slug: String,
    pub renderer: RendererKind,
    pub raw: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entry {
    /// True once the entry has been touched after creation.
    pub fn was_updated(&self) -> bool {
        self.updated_at != self.created_at
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("entry not found")]
    NotFound,
    #[error("unsupported renderer: {0}")]
    InvalidRenderer(String),
    #[error("unable to allocate a unique slug")]
    AllocationExhausted,
    #[error(transparent)]
    Randomness(#[from] RandomnessUnavailable),
    #[error("persistence failure: {0}")]
    Persistence(#[from] io::Error),
    #[error("malformed entry record: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Durable CRUD for entries under a single content root.
pub struct EntryStore {
    root: PathBuf,
    lock: RwLock<()>,
}

impl EntryStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        info!(root = %root.display(), "entry store opened");
        Ok(Self {
            root,
            lock: RwLock::new(()),
        })
    }

    fn entry_path(&self, slug: &str) -> PathBuf {
        self.root.join(format!("{slug}.json"))
    }

    /// Create a new entry under a freshly allocated slug.
    pub async fn create(
        &self,
        renderer: RendererKind,
        raw: String,
        description: String,
    ) -> Result<Entry, StoreError> {
        let _guard = self.lock.write().await;

        let mut slug_id = None;
        for _ in 0..SLUG_ATTEMPTS {
            let candidate = slug::generate()?;
            if !fs::try_exists(self.entry_path(&candidate)).await? {
                slug_id = Some(candidate);
                break;
            }
        }
        let slug_id = slug_id.ok_or(StoreError::AllocationExhausted)?;

        let now = Utc::now();
        let entry = Entry {
            slug: slug_id,
            renderer,
            raw,
            description: description.trim().to_string(),
            created_at: now,
            updated_at: now,
        };

        self.persist(&entry).await?;
        info!(slug = %entry.slug, renderer = entry.renderer.as_str(), "entry created");
        Ok(entry)
    }

    /// Replace the content of an existing entry, refreshing `updated_at`.
    pub async fn update(
        &self,
        slug_id: &str,
        renderer: RendererKind,
        raw: String,
        description: String,
    ) -> Result<Entry, StoreError> {
        let _guard = self.lock.write().await;

        let mut entry = self.read(slug_id).await?;
        entry.renderer = renderer;
        entry.raw = raw;
        entry.description = description.trim().to_string();
        entry.updated_at = Utc::now();

        self.persist(&entry).await?;
        info!(slug = %entry.slug, "entry updated");
        Ok(entry)
    }

    /// Fetch a single entry.
    pub async fn get(&self, slug_id: &str) -> Result<Entry, StoreError> {
        let _guard = self.lock.read().await;
        self.read(slug_id).await
    }

    /// All live entries, newest first; ties broken by slug descending.
    pub async fn list(&self) -> Result<Vec<Entry>, StoreError> {
        let _guard = self.lock.read().await;

        let mut dir = fs::read_dir(&self.root).await?;
        let mut entries = Vec::new();
        while let Some(dirent) = dir.next_entry().await? {
            let path = dirent.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match self.read(stem).await {
                Ok(entry) => entries.push(entry),
                Err(err) => {
                    warn!(slug = %stem, error = %err, "skipping unreadable entry record");
                }
            }
        }

        entries.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.slug.cmp(&a.slug))
        });
        Ok(entries)
    }

    /// Remove an entry permanently.
    pub async fn delete(&self, slug_id: &str) -> Result<(), StoreError> {
        let _guard = self.lock.write().await;

        if !slug::is_valid(slug_id) {
            return Err(StoreError::NotFound);
        }
        match fs::remove_file(self.entry_path(slug_id)).await {
            Ok(()) => {
                info!(slug = %slug_id, "entry deleted");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Err(StoreError::NotFound),
            Err(err) => Err(StoreError::Persistence(err)),
        }
    }

    /// Write the record to a temp file, then rename over the final path.
    async fn persist(&self, entry: &Entry) -> Result<(), StoreError> {
        let path = self.entry_path(&entry.slug);
        let tmp_path = tmp_path_for(&path);

        let json = serde_json::to_string_pretty(entry)?;
        fs::write(&tmp_path, json).await?;
        fs::rename(&tmp_path, &path).await?;
        Ok(())
    }

    // Slug-shape validation doubles as the path-traversal guard: only
    // identifiers the store itself could have allocated are ever joined
    // into the content root.
    async fn read(&self, slug_id: &str) -> Result<Entry, StoreError> {
        if !slug::is_valid(slug_id) {
            return Err(StoreError::NotFound);
        }
        let path = self.entry_path(slug_id);
        let json = match fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound)
            }
            Err(err) => return Err(StoreError::Persistence(err)),
        };
        Ok(serde_json::from_str(&json)?)
    }
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".tmp");
    PathBuf::from(os)
}
