//! In-memory stores
//!
//! `MemoryParameterStore` backs `version.source = "static"` on the local
//! server. Both stores record enough to let tests inspect what a handler did.

use super::{FileStore, ParameterStore, StoreError, UploadName, WriteError};
use std::collections::{BTreeMap, HashMap};
use std::io;
use std::sync::{Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Static parameter values, with optional injected failures
#[derive(Debug, Default)]
pub struct MemoryParameterStore {
    values: HashMap<String, Result<String, String>>,
    lookups: Mutex<Vec<String>>,
}

impl MemoryParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(values: &HashMap<String, String>) -> Self {
        values
            .iter()
            .fold(Self::new(), |store, (k, v)| store.with_value(k, v))
    }

    #[must_use]
    pub fn with_value(mut self, name: &str, value: &str) -> Self {
        self.values.insert(name.to_string(), Ok(value.to_string()));
        self
    }

    /// Make lookups of `name` fail with a backend error
    #[must_use]
    pub fn with_failure(mut self, name: &str, message: &str) -> Self {
        self.values.insert(name.to_string(), Err(message.to_string()));
        self
    }

    /// Names looked up so far, in order
    pub fn lookups(&self) -> Vec<String> {
        lock(&self.lookups).clone()
    }
}

impl ParameterStore for MemoryParameterStore {
    async fn get_parameter(&self, name: &str) -> Result<String, StoreError> {
        lock(&self.lookups).push(name.to_string());
        match self.values.get(name) {
            Some(Ok(value)) => Ok(value.clone()),
            Some(Err(message)) => Err(StoreError::Backend {
                name: name.to_string(),
                message: message.clone(),
            }),
            None => Err(StoreError::NotFound {
                name: name.to_string(),
            }),
        }
    }
}

/// Operation a `MemoryFileStore` should fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryFault {
    EnsureDir,
    List,
    Write,
}

/// Upload directory held in memory
#[derive(Debug, Default)]
pub struct MemoryFileStore {
    files: Mutex<BTreeMap<String, Vec<u8>>>,
    created: Mutex<bool>,
    fault: Option<MemoryFault>,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(fault: MemoryFault) -> Self {
        Self {
            fault: Some(fault),
            ..Self::default()
        }
    }

    pub fn contents(&self, name: &str) -> Option<Vec<u8>> {
        lock(&self.files).get(name).cloned()
    }

    pub fn is_created(&self) -> bool {
        *lock(&self.created)
    }

    fn check(&self, op: MemoryFault) -> io::Result<()> {
        if self.fault == Some(op) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("injected {op:?} failure"),
            ));
        }
        Ok(())
    }
}

impl FileStore for MemoryFileStore {
    async fn ensure_dir(&self) -> io::Result<()> {
        self.check(MemoryFault::EnsureDir)?;
        *lock(&self.created) = true;
        Ok(())
    }

    async fn list(&self) -> io::Result<Vec<String>> {
        self.check(MemoryFault::List)?;
        if !self.is_created() {
            return Err(io::Error::new(io::ErrorKind::NotFound, "directory missing"));
        }
        Ok(lock(&self.files).keys().cloned().collect())
    }

    async fn write(&self, name: &UploadName, content: &[u8]) -> Result<(), WriteError> {
        self.check(MemoryFault::Write)?;
        lock(&self.files).insert(name.as_str().to_string(), content.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_parameter_lookup_records_names() {
        let store = MemoryParameterStore::new()
            .with_value("tag", "abc123")
            .with_failure("broken", "access denied");

        assert_eq!(store.get_parameter("tag").await.unwrap(), "abc123");
        assert!(matches!(
            store.get_parameter("broken").await,
            Err(StoreError::Backend { .. })
        ));
        assert!(matches!(
            store.get_parameter("missing").await,
            Err(StoreError::NotFound { .. })
        ));
        assert_eq!(store.lookups(), vec!["tag", "broken", "missing"]);
    }

    #[tokio::test]
    async fn test_from_values() {
        let values = HashMap::from([("a".to_string(), "1".to_string())]);
        let store = MemoryParameterStore::from_values(&values);
        assert_eq!(store.get_parameter("a").await.unwrap(), "1");
    }

    #[tokio::test]
    async fn test_file_store_fault() {
        let store = MemoryFileStore::failing(MemoryFault::Write);
        store.ensure_dir().await.unwrap();
        let name = UploadName::parse("x").unwrap();
        assert!(matches!(
            store.write(&name, b"data").await,
            Err(WriteError::Io(_))
        ));
        assert!(store.list().await.unwrap().is_empty());
    }
}
