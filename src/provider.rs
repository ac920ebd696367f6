//! The capability seam between the verification pipeline and the platform's
//! trust facilities.
//!
//! The orchestrator only ever talks to a [`TrustProvider`]; the production
//! implementation binds to WinVerifyTrust ([`crate::native`]) and the mock
//! ([`crate::mock`]) drives the pipeline with synthetic chains.

use std::path::Path;

use crate::error::{ChainAccessError, ProviderError, TrustError};

/// Coarse verdict from platform trust verification. Only `Trusted` permits
/// the pipeline to proceed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrustVerdict {
    Trusted,
    /// Signature present but rejected; carries the diagnostic detail.
    NotTrusted(TrustError),
    /// The trust provider is not recognized on this system.
    ProviderUnknown,
    /// The verification action is not supported by the trust provider.
    ActionUnknown,
    /// The subject form is not supported by the trust provider.
    SubjectFormUnknown,
    /// Any other failing HRESULT.
    OtherError(i32),
}

/// One certificate in a resolved chain.
///
/// Names are full display-name text exactly as encoded in the certificate;
/// no normalization is performed here. Matching policy belongs to
/// [`crate::chain::name_matches`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    pub subject_name: String,
    pub issuer_name: String,
    pub is_self_signed: bool,
    /// Uppercase hex SHA-1 of the encoded certificate, when available.
    pub thumbprint_sha1: Option<String>,
}

impl Certificate {
    pub fn new(
        subject_name: impl Into<String>,
        issuer_name: impl Into<String>,
        is_self_signed: bool,
    ) -> Self {
        Certificate {
            subject_name: subject_name.into(),
            issuer_name: issuer_name.into(),
            is_self_signed,
            thumbprint_sha1: None,
        }
    }

    pub fn with_thumbprint_sha1(mut self, thumbprint: impl Into<String>) -> Self {
        self.thumbprint_sha1 = Some(thumbprint.into());
        self
    }
}

/// Identity of the root authority a chain must be anchored to when the
/// caller requests the root check.
///
/// Kept as explicit configuration (rather than a hard-coded identity) so the
/// pipeline stays testable with synthetic chains. A certificate matches if
/// its subject name equals any accepted name (case-sensitive) or its SHA-1
/// thumbprint equals any accepted thumbprint (hex, case-insensitive).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootAuthority {
    names: Vec<String>,
    thumbprints_sha1: Vec<String>,
}

impl RootAuthority {
    /// The Microsoft product roots, matched by display name or pinned SHA-1.
    pub fn microsoft() -> Self {
        RootAuthority {
            names: vec![
                "Microsoft Root Authority".to_string(),
                "Microsoft Root Certificate Authority".to_string(),
                "Microsoft Root Certificate Authority 2010".to_string(),
                "Microsoft Root Certificate Authority 2011".to_string(),
            ],
            thumbprints_sha1: vec![
                "A43489159A520F0D93D032CCAF37E7FE20A8B419".to_string(),
                "CDD4EEAE6000AC7F40C3802C171E30148030C072".to_string(),
                "3B1EFD3A66EA28B16697394703A72CA340A05BD5".to_string(),
                "8F43288AD272F3103B6FB1428485EA3014C0BCFE".to_string(),
            ],
        }
    }

    /// An authority matched by a single subject display name.
    pub fn with_name(name: impl Into<String>) -> Self {
        RootAuthority {
            names: vec![name.into()],
            thumbprints_sha1: Vec::new(),
        }
    }

    /// An authority matched by a single SHA-1 thumbprint (uppercase hex).
    pub fn with_thumbprint_sha1(thumbprint: impl Into<String>) -> Self {
        RootAuthority {
            names: Vec::new(),
            thumbprints_sha1: vec![thumbprint.into()],
        }
    }

    pub fn or_name(mut self, name: impl Into<String>) -> Self {
        self.names.push(name.into());
        self
    }

    pub fn or_thumbprint_sha1(mut self, thumbprint: impl Into<String>) -> Self {
        self.thumbprints_sha1.push(thumbprint.into());
        self
    }

    pub fn matches(&self, cert: &Certificate) -> bool {
        if self.names.iter().any(|n| n == &cert.subject_name) {
            return true;
        }
        match &cert.thumbprint_sha1 {
            Some(tp) => self
                .thumbprints_sha1
                .iter()
                .any(|pinned| pinned.eq_ignore_ascii_case(tp)),
            None => false,
        }
    }
}

impl Default for RootAuthority {
    fn default() -> Self {
        RootAuthority::microsoft()
    }
}

/// Result of a trust verification call. A trusted outcome carries the chain
/// context, exclusively owned by the caller that produced it; its `Drop`
/// releases the underlying platform state exactly once.
#[derive(Debug)]
pub enum TrustOutcome<C> {
    Trusted(C),
    Untrusted(TrustVerdict),
}

/// Platform trust verification for a file path.
pub trait TrustProvider {
    type Chain: ChainContext;

    /// Invokes the platform's file-trust verification against `path`.
    ///
    /// Bootstrap failures (library or entry point unavailable) are reported
    /// as `Err`; a completed verification, trusted or not, is `Ok`.
    fn verify_trust(&self, path: &Path) -> Result<TrustOutcome<Self::Chain>, ProviderError>;
}

/// Access to the certificate chain behind a trusted verdict.
pub trait ChainContext {
    /// Certificates ordered leaf first, terminal root last.
    fn certificates(&self) -> Result<Vec<Certificate>, ChainAccessError>;
}
