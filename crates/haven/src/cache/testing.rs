//! Switchable key store for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use haven_core::cache::{pattern_matches, CacheError, KeyStore, Result, Ttl};

/// In-process [`KeyStore`] that can be told to fail, hang, or reject calls.
///
/// Entries never expire on their own; the recorded TTL is kept so tests can
/// assert on it.
#[derive(Default)]
pub struct MockStore {
    entries: Mutex<HashMap<String, (Vec<u8>, Ttl)>>,
    failing: AtomicBool,
    hanging: AtomicBool,
    rejecting: AtomicBool,
    get_calls: AtomicUsize,
    set_calls: AtomicUsize,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails with a connection error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Every call waits forever.
    pub fn set_hanging(&self, hanging: bool) {
        self.hanging.store(hanging, Ordering::SeqCst);
    }

    /// Every call fails with an error that is not a backend fault.
    pub fn set_rejecting(&self, rejecting: bool) {
        self.rejecting.store(rejecting, Ordering::SeqCst);
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn set_calls(&self) -> usize {
        self.set_calls.load(Ordering::SeqCst)
    }

    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.lock().unwrap().get(key).map(|(v, _)| v.clone())
    }

    pub fn ttl_of(&self, key: &str) -> Option<Ttl> {
        self.entries.lock().unwrap().get(key).map(|(_, ttl)| *ttl)
    }

    pub fn insert_raw(&self, key: &str, value: &[u8]) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.to_vec(), Ttl::default()));
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }

    async fn check(&self) -> Result<()> {
        if self.hanging.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(CacheError::ConnectionFailed("connection refused".into()));
        }
        if self.rejecting.load(Ordering::SeqCst) {
            return Err(CacheError::InvalidTtl);
        }
        Ok(())
    }
}

#[async_trait]
impl KeyStore for MockStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.check().await?;
        Ok(self.raw(key))
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Ttl) -> Result<()> {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        self.check().await?;
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.to_vec(), ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.check().await?;
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }

    async fn delete_matching(&self, pattern: &str) -> Result<u64> {
        self.check().await?;
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|key, _| !pattern_matches(pattern, key));
        Ok((before - entries.len()) as u64)
    }

    fn backend_name(&self) -> &'static str {
        "mock"
    }
}
