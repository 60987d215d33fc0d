//! Filesystem-backed upload directory (EFS mount on Lambda)

use super::{FileStore, PathError, UploadName, WriteError};
use crate::config::UploadConfig;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: PathBuf,
    dir_mode: u32,
    file_mode: u32,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>, dir_mode: u32, file_mode: u32) -> Self {
        Self {
            root: root.into(),
            dir_mode,
            file_mode,
        }
    }

    pub fn from_config(config: &UploadConfig) -> Self {
        Self::new(&config.base_dir, config.dir_mode, config.file_mode)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `name` against the canonical root.
    ///
    /// The result must sit directly inside the root and must not be an
    /// existing symlink.
    pub async fn resolve(&self, name: &UploadName) -> Result<PathBuf, WriteError> {
        let root = fs::canonicalize(&self.root).await?;
        let target = root.join(name.as_str());

        if target.parent() != Some(root.as_path()) {
            return Err(PathError::OutsideRoot.into());
        }

        match fs::symlink_metadata(&target).await {
            Ok(meta) if meta.file_type().is_symlink() => Err(PathError::Symlink.into()),
            Ok(_) => Ok(target),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(target),
            Err(e) => Err(e.into()),
        }
    }
}

impl FileStore for LocalFileStore {
    async fn ensure_dir(&self) -> io::Result<()> {
        match fs::metadata(&self.root).await {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} exists and is not a directory", self.root.display()),
            )),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                fs::DirBuilder::new()
                    .recursive(true)
                    .mode(self.dir_mode)
                    .create(&self.root)
                    .await
            }
            Err(e) => Err(e),
        }
    }

    async fn list(&self) -> io::Result<Vec<String>> {
        let mut entries = fs::read_dir(&self.root).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    async fn write(&self, name: &UploadName, content: &[u8]) -> Result<(), WriteError> {
        let target = self.resolve(name).await?;
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(self.file_mode)
            .open(&target)
            .await?;
        file.write_all(content).await?;
        file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn store_in(dir: &Path) -> LocalFileStore {
        LocalFileStore::new(dir.join("apps"), 0o700, 0o600)
    }

    #[tokio::test]
    async fn test_ensure_dir_creates_and_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path());

        store.ensure_dir().await.unwrap();
        store.ensure_dir().await.unwrap();

        let meta = std::fs::metadata(store.root()).unwrap();
        assert!(meta.is_dir());
        assert_eq!(meta.permissions().mode() & 0o777, 0o700);
    }

    #[tokio::test]
    async fn test_ensure_dir_on_regular_file_fails() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("apps"), b"not a dir").unwrap();
        assert!(store_in(tmp.path()).ensure_dir().await.is_err());
    }

    #[tokio::test]
    async fn test_write_then_list() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path());
        store.ensure_dir().await.unwrap();

        let name = UploadName::parse("b.txt").unwrap();
        store.write(&name, b"first").await.unwrap();
        store.write(&name, b"2").await.unwrap();
        store
            .write(&UploadName::parse("a.txt").unwrap(), b"")
            .await
            .unwrap();
        std::fs::create_dir(store.root().join("nested")).unwrap();

        assert_eq!(store.list().await.unwrap(), vec!["a.txt", "b.txt", "nested"]);
        // Truncated, not appended
        assert_eq!(std::fs::read(store.root().join("b.txt")).unwrap(), b"2");
        let mode = std::fs::metadata(store.root().join("a.txt"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[tokio::test]
    async fn test_list_missing_dir_fails() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(store_in(tmp.path()).list().await.is_err());
    }

    #[tokio::test]
    async fn test_write_through_symlink_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path());
        store.ensure_dir().await.unwrap();

        let outside = tmp.path().join("outside.txt");
        std::fs::write(&outside, b"keep").unwrap();
        std::os::unix::fs::symlink(&outside, store.root().join("link")).unwrap();

        let err = store
            .write(&UploadName::parse("link").unwrap(), b"overwrite")
            .await
            .unwrap_err();
        assert!(matches!(err, WriteError::Path(PathError::Symlink)));
        assert_eq!(std::fs::read(&outside).unwrap(), b"keep");
    }
}
