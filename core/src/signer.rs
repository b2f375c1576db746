use crate::{Context, ProvideCredential, Result, SignRequest, SigningCredential};
use log::debug;
use std::sync::{Arc, Mutex};

/// Signer is the main struct used to sign the request.
///
/// Only the loaded credential is cached, and only while it stays valid.
/// Signing material derived from it is recomputed for every request.
#[derive(Clone, Debug)]
pub struct Signer<K: SigningCredential> {
    ctx: Context,
    provider: Arc<dyn ProvideCredential<Credential = K>>,
    builder: Arc<dyn SignRequest<Credential = K>>,
    credential: Arc<Mutex<Option<K>>>,
}

impl<K: SigningCredential> Signer<K> {
    /// Create a new signer.
    pub fn new(
        ctx: Context,
        provider: impl ProvideCredential<Credential = K>,
        builder: impl SignRequest<Credential = K>,
    ) -> Self {
        Self {
            ctx,
            provider: Arc::new(provider),
            builder: Arc::new(builder),
            credential: Arc::new(Mutex::new(None)),
        }
    }

    /// The context this signer was built with.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Sign the request with `body` as the exact payload to be sent.
    pub async fn sign(&self, req: &mut http::request::Parts, body: &[u8]) -> Result<()> {
        let cred = self.credential.lock().expect("lock poisoned").clone();
        let cred = if cred.is_valid() {
            cred
        } else {
            debug!("no valid cached credential, loading from provider");
            let cred = self.provider.provide_credential(&self.ctx).await?;
            self.credential.lock().expect("lock poisoned").clone_from(&cred);
            cred
        };

        self.builder
            .sign_request(&self.ctx, req, body, cred.as_ref())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use http::request::Parts;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Debug)]
    struct TestCredential(bool);

    impl SigningCredential for TestCredential {
        fn is_valid(&self) -> bool {
            self.0
        }
    }

    #[derive(Debug)]
    struct CountingProvider {
        valid: bool,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ProvideCredential for CountingProvider {
        type Credential = TestCredential;

        async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some(TestCredential(self.valid)))
        }
    }

    #[derive(Debug)]
    struct BodyLenBuilder;

    #[async_trait]
    impl SignRequest for BodyLenBuilder {
        type Credential = TestCredential;

        async fn sign_request(
            &self,
            _: &Context,
            req: &mut Parts,
            body: &[u8],
            credential: Option<&Self::Credential>,
        ) -> Result<()> {
            assert!(credential.is_some());
            req.headers.insert("x-body-len", body.len().into());
            Ok(())
        }
    }

    fn parts() -> Parts {
        http::Request::new(()).into_parts().0
    }

    #[tokio::test]
    async fn test_valid_credential_is_cached() -> Result<()> {
        let calls = Arc::new(AtomicUsize::new(0));
        let signer = Signer::new(
            Context::new(),
            CountingProvider {
                valid: true,
                calls: calls.clone(),
            },
            BodyLenBuilder,
        );

        let mut req = parts();
        signer.sign(&mut req, b"{}").await?;
        signer.sign(&mut req, b"{}").await?;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(req.headers["x-body-len"], "2");
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_credential_is_reloaded() -> Result<()> {
        let calls = Arc::new(AtomicUsize::new(0));
        let signer = Signer::new(
            Context::new(),
            CountingProvider {
                valid: false,
                calls: calls.clone(),
            },
            BodyLenBuilder,
        );

        let mut req = parts();
        signer.sign(&mut req, b"").await?;
        signer.sign(&mut req, b"").await?;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        Ok(())
    }
}
