//! Obtaining the user's private key.
//!
//! The builders never hold a private key up front. When a build needs one
//! they ask a [`KeyRequester`], which may prompt a hardware token, a
//! passphrase dialog, or anything else. The answer is cached on the builder.

use std::future::Future;

use async_trait::async_trait;
use docseal_core::PrivateKey;

/// Source of the current user's private key.
///
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait KeyRequester: Send + Sync {
    /// Produce the private key, or fail if the user declines.
    async fn request_key(&self) -> anyhow::Result<PrivateKey>;
}

/// A key that is already in memory.
#[derive(Clone)]
pub struct StaticKey(PrivateKey);

impl StaticKey {
    pub fn new(key: PrivateKey) -> Self {
        Self(key)
    }
}

#[async_trait]
impl KeyRequester for StaticKey {
    async fn request_key(&self) -> anyhow::Result<PrivateKey> {
        Ok(self.0.clone())
    }
}

/// Adapts an async closure into a [`KeyRequester`].
pub struct FnRequester<F>(F);

impl<F> FnRequester<F> {
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F, Fut> KeyRequester for FnRequester<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<PrivateKey>> + Send,
{
    async fn request_key(&self) -> anyhow::Result<PrivateKey> {
        (self.0)().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_key() {
        let key = PrivateKey::generate();
        let requester = StaticKey::new(key.clone());
        let got = requester.request_key().await.unwrap();
        assert_eq!(got.public_key(), key.public_key());
    }

    #[tokio::test]
    async fn test_fn_requester_propagates_failure() {
        let requester = FnRequester::new(|| async { Err(anyhow::anyhow!("user cancelled")) });
        let err = requester.request_key().await.unwrap_err();
        assert_eq!(err.to_string(), "user cancelled");
    }
}
