//! Favorites persisted as a JSON file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::BoxStream;
use tokio::fs;
use tokio::sync::Mutex;

use super::table::{RecordMap, RecordTable, apply, sorted_records};
use super::{FavoriteRecord, FavoritesStore};
use crate::errors::StoreError;
use crate::media::MediaKind;

/// Write-through favorites store backed by one JSON file.
///
/// The file holds an array of records, newest first. Each mutation is written
/// to disk before it is published, so a failed write leaves both the file and
/// every open stream unchanged. A write that reached the disk is always
/// published, even when the caller stops waiting for it.
#[derive(Debug)]
pub struct FileFavoritesStore {
    path: PathBuf,
    table: Arc<RecordTable>,
    write_lock: Arc<Mutex<()>>,
}

impl FileFavoritesStore {
    /// Opens the store at `path`, loading existing records.
    ///
    /// A missing file is an empty store. Parent directories are created.
    ///
    /// # Errors
    /// - `StoreError::Io` - File exists but cannot be read, or parent
    ///   directory cannot be created
    /// - `StoreError::Serialization` - File content is not a record array
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }

        let records = match fs::read(&path).await {
            Ok(bytes) => decode_records(&bytes)?,
            Err(error) if error.kind() == ErrorKind::NotFound => RecordMap::new(),
            Err(error) => return Err(error.into()),
        };

        tracing::debug!(
            path = %path.display(),
            records = records.len(),
            "Opened favorites file"
        );

        Ok(Self {
            path,
            table: Arc::new(RecordTable::new(records)),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Applies `edit` to a copy of the records, persists the copy when it
    /// changed, then publishes it.
    ///
    /// Persisting and publishing run on their own task holding the write lock,
    /// so the next mutation always starts from what is on disk.
    async fn mutate<R>(
        &self,
        edit: impl FnOnce(&mut RecordMap) -> (bool, R),
    ) -> Result<R, StoreError> {
        let guard = Arc::clone(&self.write_lock).lock_owned().await;

        let mut records = RecordMap::clone(&self.table.current());
        let (changed, result) = edit(&mut records);
        if !changed {
            return Ok(result);
        }

        let path = self.path.clone();
        let table = Arc::clone(&self.table);
        let write = tokio::spawn(async move {
            let _guard = guard;
            persist(&path, &records).await?;
            table.commit(records);
            Ok::<_, StoreError>(())
        });

        write.await.map_err(|e| StoreError::Unavailable {
            reason: format!("favorites write did not complete: {e}"),
        })??;
        Ok(result)
    }
}

async fn persist(path: &Path, records: &RecordMap) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec_pretty(&sorted_records(records, None))?;
    let staging = path.with_extension("json.tmp");

    let written = async {
        fs::write(&staging, &bytes).await?;
        fs::rename(&staging, path).await
    }
    .await;

    if let Err(error) = written {
        tracing::warn!(
            path = %path.display(),
            error = %error,
            "Failed to write favorites file"
        );
        if let Err(cleanup) = fs::remove_file(&staging).await
            && cleanup.kind() != ErrorKind::NotFound
        {
            tracing::debug!(staging = %staging.display(), error = %cleanup, "Left staging file behind");
        }
        return Err(error.into());
    }

    tracing::trace!(path = %path.display(), records = records.len(), "Wrote favorites file");
    Ok(())
}

fn decode_records(bytes: &[u8]) -> Result<RecordMap, StoreError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(RecordMap::new());
    }
    let records: Vec<FavoriteRecord> = serde_json::from_slice(bytes)?;
    Ok(records
        .into_iter()
        .map(|record| (record.id.clone(), record))
        .collect())
}

#[async_trait]
impl FavoritesStore for FileFavoritesStore {
    async fn upsert(&self, record: FavoriteRecord) -> Result<(), StoreError> {
        tracing::debug!(id = %record.id, kind = %record.kind, "Upserting favorite");
        self.mutate(|records| apply::upsert(records, record)).await
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        tracing::debug!(id, "Deleting favorite");
        self.mutate(|records| apply::delete(records, id)).await
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<FavoriteRecord>, StoreError> {
        Ok(self.table.get(id))
    }

    fn exists_by_id(&self, id: &str) -> BoxStream<'static, bool> {
        self.table.exists(id)
    }

    fn list_all(&self) -> BoxStream<'static, Vec<FavoriteRecord>> {
        self.table.list(None)
    }

    fn list_by_kind(&self, kind: MediaKind) -> BoxStream<'static, Vec<FavoriteRecord>> {
        self.table.list(Some(kind))
    }

    fn count(&self) -> BoxStream<'static, usize> {
        self.table.count()
    }

    async fn update_download_status(
        &self,
        id: &str,
        downloaded: bool,
        local_path: Option<String>,
    ) -> Result<(), StoreError> {
        self.mutate(|records| apply::download_status(records, id, downloaded, local_path))
            .await
    }

    async fn flip(&self, record: FavoriteRecord) -> Result<bool, StoreError> {
        let id = record.id.clone();
        let favorited = self.mutate(|records| apply::flip(records, record)).await?;
        tracing::debug!(id = %id, favorited, "Flipped favorite");
        Ok(favorited)
    }
}
