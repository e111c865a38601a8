//! One JSON file per key under a directory.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;

use reviewhub_core::ports::{SessionStorage, StorageError};

pub struct FileSessionStorage {
    dir: PathBuf,
}

impl FileSessionStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl SessionStorage for FileSessionStorage {
    async fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        match tokio::fs::read_to_string(self.path(key)).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        // write-then-rename so a crash never leaves half a record
        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;
        tracing::debug!(path = %path.display(), "Session record saved");
        Ok(())
    }
}
