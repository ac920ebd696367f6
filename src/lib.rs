//! codesign-verify - code signature verification against caller constraints
//!
//! Answers one question: is this file digitally signed by a certificate
//! whose subject name, issuer name, and (optionally) trust-chain root match
//! expectations? Hosts use it to refuse plugins and updater payloads whose
//! signatures do not satisfy their policy.
//!
//! Platform trust verification sits behind the [`TrustProvider`] seam. The
//! production implementation ([`native::WintrustProvider`], Windows only)
//! binds to the WinTrust and Cryptography APIs; [`mock::MockTrustProvider`]
//! drives the same pipeline with synthetic chains for tests and non-Windows
//! builds.
//!
//! # Examples
//!
//! ```
//! use codesign_verify::mock::MockTrustProvider;
//! use codesign_verify::{Certificate, RootAuthority, StatusCode, Verifier};
//!
//! let chain = vec![
//!     Certificate::new("Contoso Ltd", "Contoso CA", false),
//!     Certificate::new("Contoso CA", "Contoso CA", true),
//! ];
//! let verifier = Verifier::new(MockTrustProvider::trusted(chain))
//!     .with_designated_root(RootAuthority::with_name("Contoso CA"));
//!
//! let status = verifier.verify_file_code_signature(
//!     std::path::Path::new("plugin.dll"),
//!     "Contoso Ltd",
//!     "Contoso CA",
//!     true,
//! );
//! assert_eq!(status, StatusCode::Ok);
//! ```

pub mod chain;
pub mod error;
#[cfg(windows)]
pub mod loader;
pub mod mock;
#[cfg(windows)]
pub mod native;
pub mod provider;
pub mod status;
pub mod utils;
pub mod verification;
pub mod version_info;
#[cfg(windows)]
pub mod win32_guards;

#[cfg(test)]
mod tests;

// Re-export commonly used types for convenience
pub use error::{hr_to_trust_error, ProviderError, TrustError, VersionInfoError};
pub use provider::{
    Certificate, ChainContext, RootAuthority, TrustOutcome, TrustProvider, TrustVerdict,
};
pub use status::StatusCode;
pub use verification::Verifier;
#[cfg(windows)]
pub use verification::verify_file_code_signature;
#[cfg(windows)]
pub use version_info::{get_file_version_string, read_version_string};
