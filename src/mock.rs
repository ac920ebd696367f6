//! Synthetic trust provider for tests and for exercising the pipeline on
//! platforms without native trust facilities.
//!
//! The mock counts chain-context releases so tests can assert that every
//! status path releases exactly what it acquired, and records the paths it
//! was asked to verify.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::{ChainAccessError, ProviderError};
use crate::provider::{Certificate, ChainContext, TrustOutcome, TrustProvider, TrustVerdict};

#[derive(Debug, Clone)]
enum Behavior {
    Trusted(Vec<Certificate>),
    TrustedButUnreadableChain,
    Untrusted(TrustVerdict),
    Failing(ProviderError),
}

/// A scripted [`TrustProvider`].
#[derive(Debug, Clone)]
pub struct MockTrustProvider {
    behavior: Behavior,
    releases: Arc<AtomicUsize>,
    seen_paths: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockTrustProvider {
    /// Verification succeeds and yields `chain` (leaf first).
    pub fn trusted(chain: Vec<Certificate>) -> Self {
        Self::with_behavior(Behavior::Trusted(chain))
    }

    /// Verification succeeds but reading chain data from the state fails.
    pub fn unreadable_chain() -> Self {
        Self::with_behavior(Behavior::TrustedButUnreadableChain)
    }

    /// Verification completes with a non-trusted verdict.
    pub fn untrusted(verdict: TrustVerdict) -> Self {
        Self::with_behavior(Behavior::Untrusted(verdict))
    }

    /// Provider bootstrap fails before any verdict exists.
    pub fn failing(error: ProviderError) -> Self {
        Self::with_behavior(Behavior::Failing(error))
    }

    fn with_behavior(behavior: Behavior) -> Self {
        MockTrustProvider {
            behavior,
            releases: Arc::new(AtomicUsize::new(0)),
            seen_paths: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// How many chain contexts handed out by this provider have been
    /// released so far.
    pub fn release_count(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    /// Every path this provider has been asked to verify, in call order.
    pub fn seen_paths(&self) -> Vec<PathBuf> {
        self.seen_paths.lock().expect("seen_paths poisoned").clone()
    }
}

impl TrustProvider for MockTrustProvider {
    type Chain = MockChain;

    fn verify_trust(&self, path: &Path) -> Result<TrustOutcome<MockChain>, ProviderError> {
        self.seen_paths
            .lock()
            .expect("seen_paths poisoned")
            .push(path.to_path_buf());

        match &self.behavior {
            Behavior::Failing(err) => Err(err.clone()),
            Behavior::Untrusted(verdict) => Ok(TrustOutcome::Untrusted(verdict.clone())),
            Behavior::Trusted(chain) => Ok(TrustOutcome::Trusted(MockChain {
                certs: chain.clone(),
                readable: true,
                releases: Arc::clone(&self.releases),
            })),
            Behavior::TrustedButUnreadableChain => Ok(TrustOutcome::Trusted(MockChain {
                certs: Vec::new(),
                readable: false,
                releases: Arc::clone(&self.releases),
            })),
        }
    }
}

/// Chain context handed out by [`MockTrustProvider`]; its `Drop` bumps the
/// provider's release counter.
#[derive(Debug)]
pub struct MockChain {
    certs: Vec<Certificate>,
    readable: bool,
    releases: Arc<AtomicUsize>,
}

impl ChainContext for MockChain {
    fn certificates(&self) -> Result<Vec<Certificate>, ChainAccessError> {
        if self.readable {
            Ok(self.certs.clone())
        } else {
            Err(ChainAccessError("scripted chain read failure".into()))
        }
    }
}

impl Drop for MockChain {
    fn drop(&mut self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}
