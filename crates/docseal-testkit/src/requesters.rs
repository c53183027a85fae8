//! Key requesters that record or refuse.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use docseal::KeyRequester;
use docseal_core::PrivateKey;

/// Hands out a fixed key and counts how often it was asked.
pub struct CountingRequester {
    key: PrivateKey,
    calls: AtomicUsize,
}

impl CountingRequester {
    pub fn new(key: PrivateKey) -> Arc<Self> {
        Arc::new(Self {
            key,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeyRequester for CountingRequester {
    async fn request_key(&self) -> anyhow::Result<PrivateKey> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.key.clone())
    }
}

/// Always declines, as a user cancelling a prompt would.
pub struct FailingRequester {
    message: String,
}

impl FailingRequester {
    pub fn new(message: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            message: message.into(),
        })
    }
}

#[async_trait]
impl KeyRequester for FailingRequester {
    async fn request_key(&self) -> anyhow::Result<PrivateKey> {
        anyhow::bail!("{}", self.message)
    }
}
