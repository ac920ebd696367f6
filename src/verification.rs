//! The verification orchestrator: sequences trust verification, root-anchor
//! inspection, leaf-name extraction, and name comparison, short-circuiting
//! on the first failing stage.

use std::path::Path;

use tracing::{debug, warn};

use crate::chain;
use crate::provider::{ChainContext, RootAuthority, TrustOutcome, TrustProvider};
use crate::status::StatusCode;

/// Sequences the verification stages against a trust provider.
///
/// Stages run in a fixed order (trust, root anchor, detail extraction,
/// subject name, issuer name) and stop at the first failure, so the reported
/// status identifies the first failing stage rather than an aggregate.
///
/// Each call is self-contained: the chain context acquired from the provider
/// is released before the call returns, on every path, via its `Drop`.
/// Nothing is cached across calls.
pub struct Verifier<P> {
    provider: P,
    designated_root: RootAuthority,
}

impl<P: TrustProvider> Verifier<P> {
    /// A verifier anchored to the Microsoft roots. Use
    /// [`with_designated_root`](Self::with_designated_root) to substitute a
    /// different authority.
    pub fn new(provider: P) -> Self {
        Verifier {
            provider,
            designated_root: RootAuthority::microsoft(),
        }
    }

    pub fn with_designated_root(mut self, designated_root: RootAuthority) -> Self {
        self.designated_root = designated_root;
        self
    }

    /// Verifies that `file_path` carries a valid signature whose certificate
    /// satisfies the caller's constraints.
    ///
    /// Empty `expected_cert_name` / `expected_issuer_name` skip the
    /// respective comparison. Non-empty names must match the extracted
    /// display names exactly (byte-wise, case-sensitive). When
    /// `check_microsoft_root` is false, the chain may anchor to any root.
    ///
    /// Failure is always a status code; this function never panics and never
    /// returns partial output.
    pub fn verify_file_code_signature(
        &self,
        file_path: &Path,
        expected_cert_name: &str,
        expected_issuer_name: &str,
        check_microsoft_root: bool,
    ) -> StatusCode {
        let outcome = match self.provider.verify_trust(file_path) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(path = %file_path.display(), %err, "trust provider bootstrap failed");
                return err.status_code();
            }
        };

        // The chain context is dropped (and the platform state released) on
        // every return path below.
        let chain_ctx = match outcome {
            TrustOutcome::Trusted(chain_ctx) => chain_ctx,
            TrustOutcome::Untrusted(verdict) => {
                debug!(path = %file_path.display(), ?verdict, "trust verification rejected file");
                return StatusCode::VerifyTrustFailure;
            }
        };

        let certs = match chain_ctx.certificates() {
            Ok(certs) => certs,
            Err(err) => {
                warn!(path = %file_path.display(), %err, "chain data unavailable");
                return StatusCode::WtHelperFailed;
            }
        };

        if check_microsoft_root && !chain::is_anchored_to(&certs, &self.designated_root) {
            debug!(
                path = %file_path.display(),
                root = certs.last().map(|c| c.subject_name.as_str()).unwrap_or(""),
                "chain not anchored to the designated root"
            );
            return StatusCode::NotMicrosoftRoot;
        }

        let Some((subject, issuer)) = chain::leaf_names(&certs) else {
            debug!(path = %file_path.display(), "leaf certificate details unavailable");
            return StatusCode::CertDetailFetchFailed;
        };

        if !chain::name_matches(expected_cert_name, subject) {
            debug!(expected = expected_cert_name, actual = subject, "subject name mismatch");
            return StatusCode::CertNameNotEqual;
        }

        if !chain::name_matches(expected_issuer_name, issuer) {
            debug!(expected = expected_issuer_name, actual = issuer, "issuer name mismatch");
            return StatusCode::CertIssuerNameNotEqual;
        }

        StatusCode::Ok
    }
}

/// Verifies a file against the native Windows trust facilities.
///
/// Convenience wrapper over [`Verifier`] with [`crate::native::WintrustProvider`]
/// and the Microsoft root authority. Parameter order matches the exported
/// contract: path, subject name, issuer name, root-check toggle.
#[cfg(windows)]
pub fn verify_file_code_signature(
    file_path: &Path,
    cert_name: &str,
    cert_issuer_name: &str,
    microsoft_root_check: bool,
) -> StatusCode {
    Verifier::new(crate::native::WintrustProvider::default()).verify_file_code_signature(
        file_path,
        cert_name,
        cert_issuer_name,
        microsoft_root_check,
    )
}
