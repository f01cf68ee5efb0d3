use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::broadcast;
use tracing::warn;

/// Capacity of the change-event channel. Slow subscribers that fall more
/// than this far behind start losing the oldest events.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// The four entity collections of the document store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Users,
    Categories,
    Transactions,
    Budgets,
}

impl Collection {
    pub fn dir_name(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Categories => "categories",
            Collection::Transactions => "transactions",
            Collection::Budgets => "budgets",
        }
    }

    fn all() -> [Collection; 4] {
        [
            Collection::Users,
            Collection::Categories,
            Collection::Transactions,
            Collection::Budgets,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

/// A single document change, published after the write has been persisted.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub collection: Collection,
    pub kind: ChangeKind,
    /// ID of the user whose data changed
    pub user_id: String,
    pub document_id: String,
}

/// Tracks the logged-in user; stored outside the entity collections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ActiveUserDoc {
    pub user_id: String,
}

/// DocumentConnection manages the collection directories and the realtime
/// change feed.
#[derive(Clone)]
pub struct DocumentConnection {
    root: PathBuf,
    events: broadcast::Sender<ChangeEvent>,
}

impl DocumentConnection {
    /// Create a new document store rooted at the given directory.
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        for collection in Collection::all() {
            fs::create_dir_all(root.join(collection.dir_name()))?;
        }

        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Ok(Self { root, events })
    }

    /// Create a document store in the default data directory
    /// (`$SPENDTRACK_DATA_DIR`, falling back to `~/.spendtrack/data`).
    pub fn new_default() -> Result<Self> {
        let data_dir = match std::env::var("SPENDTRACK_DATA_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => {
                let home = std::env::var("HOME")
                    .or_else(|_| std::env::var("USERPROFILE"))
                    .map_err(|_| anyhow!("Could not determine home directory"))?;
                PathBuf::from(home).join(".spendtrack").join("data")
            }
        };
        Self::new(data_dir)
    }

    /// Subscribe to the realtime change feed. Each receiver sees every event
    /// published after the call.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.events.subscribe()
    }

    fn document_path(&self, collection: Collection, document_id: &str) -> PathBuf {
        self.root
            .join(collection.dir_name())
            .join(format!("{}.json", document_id))
    }

    /// Read a single document, returning `None` when it does not exist.
    pub(crate) fn read_document<T: DeserializeOwned>(
        &self,
        collection: Collection,
        document_id: &str,
    ) -> Result<Option<T>> {
        let path = self.document_path(collection, document_id);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&contents)?))
    }

    /// Persist a document, then publish the change event.
    pub(crate) fn write_document<T: Serialize>(
        &self,
        collection: Collection,
        document_id: &str,
        user_id: &str,
        document: &T,
        kind: ChangeKind,
    ) -> Result<()> {
        let path = self.document_path(collection, document_id);
        let contents = serde_json::to_string_pretty(document)?;
        fs::write(&path, contents)?;

        self.emit(ChangeEvent {
            collection,
            kind,
            user_id: user_id.to_string(),
            document_id: document_id.to_string(),
        });
        Ok(())
    }

    /// Delete a document, returning true when it existed. Publishes a
    /// `Deleted` event on success.
    pub(crate) fn delete_document(
        &self,
        collection: Collection,
        document_id: &str,
        user_id: &str,
    ) -> Result<bool> {
        let path = self.document_path(collection, document_id);
        match fs::remove_file(&path) {
            Ok(()) => {
                self.emit(ChangeEvent {
                    collection,
                    kind: ChangeKind::Deleted,
                    user_id: user_id.to_string(),
                    document_id: document_id.to_string(),
                });
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Load every document in a collection. Unreadable documents are skipped
    /// with a warning rather than failing the whole listing.
    pub(crate) fn list_documents<T: DeserializeOwned>(
        &self,
        collection: Collection,
    ) -> Result<Vec<T>> {
        let dir = self.root.join(collection.dir_name());
        let mut documents = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let contents = fs::read_to_string(&path)?;
            match serde_json::from_str(&contents) {
                Ok(document) => documents.push(document),
                Err(e) => {
                    warn!("Skipping unreadable document {}: {}", path.display(), e);
                }
            }
        }
        Ok(documents)
    }

    /// Read the active-user marker, if any.
    pub(crate) fn read_active_user(&self) -> Result<Option<ActiveUserDoc>> {
        let path = self.root.join("active_user.json");
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&contents)?))
    }

    /// Write or clear the active-user marker. Session state is not part of
    /// the change feed.
    pub(crate) fn write_active_user(&self, doc: Option<&ActiveUserDoc>) -> Result<()> {
        let path = self.root.join("active_user.json");
        match doc {
            Some(doc) => fs::write(&path, serde_json::to_string_pretty(doc)?)?,
            None => match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            },
        }
        Ok(())
    }

    fn emit(&self, event: ChangeEvent) {
        // Nobody listening is fine; the feed is best-effort.
        let _ = self.events.send(event);
    }
}
