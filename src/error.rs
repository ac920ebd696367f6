use thiserror::Error;

use crate::status::StatusCode;

/// HRESULT values produced by the Windows trust and certificate APIs.
///
/// Defined here rather than pulled from platform bindings so the
/// HRESULT-to-error mapping stays testable on every platform. Values are the
/// canonical winerror.h codes.
pub mod hresult {
    pub const TRUST_E_PROVIDER_UNKNOWN: i32 = 0x800B_0001_u32 as i32;
    pub const TRUST_E_ACTION_UNKNOWN: i32 = 0x800B_0002_u32 as i32;
    pub const TRUST_E_SUBJECT_FORM_UNKNOWN: i32 = 0x800B_0003_u32 as i32;
    pub const TRUST_E_SUBJECT_NOT_TRUSTED: i32 = 0x800B_0004_u32 as i32;
    pub const TRUST_E_NOSIGNATURE: i32 = 0x800B_0100_u32 as i32;
    pub const CERT_E_EXPIRED: i32 = 0x800B_0101_u32 as i32;
    pub const CERT_E_CRITICAL: i32 = 0x800B_0105_u32 as i32;
    pub const CERT_E_UNTRUSTEDROOT: i32 = 0x800B_0109_u32 as i32;
    pub const CERT_E_CHAINING: i32 = 0x800B_010A_u32 as i32;
    pub const CERT_E_REVOKED: i32 = 0x800B_010C_u32 as i32;
    pub const CERT_E_UNTRUSTEDTESTROOT: i32 = 0x800B_010D_u32 as i32;
    pub const CERT_E_CN_NO_MATCH: i32 = 0x800B_010F_u32 as i32;
    pub const CERT_E_WRONG_USAGE: i32 = 0x800B_0110_u32 as i32;
    pub const TRUST_E_TIME_STAMP: i32 = 0x8009_6005_u32 as i32;
    pub const TRUST_E_BAD_DIGEST: i32 = 0x8009_6010_u32 as i32;
    pub const CRYPT_E_FILE_ERROR: i32 = 0x8009_2003_u32 as i32;
    pub const CRYPT_E_NO_REVOCATION_CHECK: i32 = 0x8009_2012_u32 as i32;
    pub const CRYPT_E_REVOCATION_OFFLINE: i32 = 0x8009_2013_u32 as i32;
    pub const CRYPT_E_SECURITY_SETTINGS: i32 = 0x8009_2026_u32 as i32;
}

/// Diagnostic detail behind a rejected trust verdict.
///
/// This taxonomy is richer than the public status contract requires; it
/// surfaces only through logging and `Display`, never through the status
/// code.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrustError {
    #[error("TRUST_E_SUBJECT_NOT_TRUSTED: The subject failed the specified verification action.")]
    SubjectNotTrusted,
    #[error("TRUST_E_NOSIGNATURE: No signature was present in the subject.")]
    NoSignature,
    #[error("TRUST_E_BAD_DIGEST: The file's digest does not match the expected value.")]
    BadDigest,
    #[error("TRUST_E_TIME_STAMP: The timestamp is invalid.")]
    TimeStamp,
    #[error("CERT_E_CRITICAL: A certificate contains an unknown extension that is marked 'critical'.")]
    Critical,
    #[error("CERT_E_EXPIRED: The certificate has expired.")]
    Expired,
    #[error("CERT_E_REVOKED: The certificate has been revoked.")]
    Revoked,
    #[error("CERT_E_UNTRUSTEDROOT: The certificate chain is not trusted.")]
    UntrustedRoot,
    #[error("CRYPT_E_SECURITY_SETTINGS: Security settings prevented verification.")]
    SecuritySettings,
    #[error("CERT_E_CHAINING: The certificate chain could not be built.")]
    Chaining,
    #[error("CERT_E_UNTRUSTEDTESTROOT: The certificate is based on an untrusted test root.")]
    UntrustedTestRoot,
    #[error("CERT_E_WRONG_USAGE: The certificate is not valid for the requested usage.")]
    WrongUsage,
    #[error("CRYPT_E_NO_REVOCATION_CHECK: Revocation check was not performed.")]
    NoRevocationCheck,
    #[error("CRYPT_E_REVOCATION_OFFLINE: Revocation check failed because the revocation server was offline.")]
    RevocationOffline,
    #[error("CERT_E_CN_NO_MATCH: The certificate's common name does not match the expected name.")]
    CNNoMatch,
    #[error("CRYPT_E_FILE_ERROR: An error occurred while accessing a file.")]
    FileError,
    #[error("Unknown trust error (0x{0:X})")]
    Unknown(i32),
}

/// Converts an HRESULT code to a TrustError enum.
///
/// Verdict-level codes (provider unknown, action unknown, subject form
/// unknown) are mapped before this table is consulted; they land in
/// `Unknown` here.
pub fn hr_to_trust_error(hr: i32) -> TrustError {
    use hresult::*;
    match hr {
        TRUST_E_SUBJECT_NOT_TRUSTED => TrustError::SubjectNotTrusted,
        TRUST_E_NOSIGNATURE => TrustError::NoSignature,
        TRUST_E_BAD_DIGEST => TrustError::BadDigest,
        TRUST_E_TIME_STAMP => TrustError::TimeStamp,
        CERT_E_CRITICAL => TrustError::Critical,
        CERT_E_EXPIRED => TrustError::Expired,
        CERT_E_REVOKED => TrustError::Revoked,
        CERT_E_UNTRUSTEDROOT => TrustError::UntrustedRoot,
        CRYPT_E_SECURITY_SETTINGS => TrustError::SecuritySettings,
        CERT_E_CHAINING => TrustError::Chaining,
        CERT_E_UNTRUSTEDTESTROOT => TrustError::UntrustedTestRoot,
        CERT_E_WRONG_USAGE => TrustError::WrongUsage,
        CRYPT_E_NO_REVOCATION_CHECK => TrustError::NoRevocationCheck,
        CRYPT_E_REVOCATION_OFFLINE => TrustError::RevocationOffline,
        CERT_E_CN_NO_MATCH => TrustError::CNNoMatch,
        CRYPT_E_FILE_ERROR => TrustError::FileError,
        _ => TrustError::Unknown(hr),
    }
}

/// Bootstrap failure inside a trust provider, before any verdict exists.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("failed to load system library {0}")]
    LibraryUnavailable(String),
    #[error("entry point {symbol} missing from {library}")]
    SymbolUnavailable { library: String, symbol: String },
    #[error("trust provider failure: {0}")]
    Other(String),
}

impl ProviderError {
    /// The status the orchestrator reports for this failure.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProviderError::LibraryUnavailable(_) => StatusCode::LoadLibraryFailure,
            ProviderError::SymbolUnavailable { .. } => StatusCode::GetProcAddressFailure,
            ProviderError::Other(_) => StatusCode::Nonspecific,
        }
    }
}

/// Trust state exists but certificate chain data could not be read from it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("trust state data did not yield certificate chain information: {0}")]
pub struct ChainAccessError(pub String);

/// Failure to load a named library from the system directory, or to resolve
/// an entry point from it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoaderError {
    #[error("system directory could not be determined")]
    SystemDirectoryUnavailable,
    #[error("failed to load {library}: {reason}")]
    LoadFailed { library: String, reason: String },
    #[error("entry point {symbol} missing from {library}")]
    SymbolMissing { library: String, symbol: String },
}

impl From<LoaderError> for ProviderError {
    fn from(err: LoaderError) -> Self {
        match err {
            LoaderError::SymbolMissing { library, symbol } => {
                ProviderError::SymbolUnavailable { library, symbol }
            }
            LoaderError::LoadFailed { library, .. } => ProviderError::LibraryUnavailable(library),
            LoaderError::SystemDirectoryUnavailable => {
                ProviderError::LibraryUnavailable("system directory unavailable".into())
            }
        }
    }
}

/// Failure to read a string from a file's version resource.
///
/// Each variant maps to a distinct negative return code in the C-style entry
/// point, so callers can tell "no version info" from "API unavailable".
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VersionInfoError {
    #[error("file has no matching version resource")]
    NoVersionInfo,
    #[error("invalid parameter")]
    InvalidParameter,
    #[error("version API unavailable: {0}")]
    ApiUnavailable(String),
}

impl VersionInfoError {
    pub fn code(&self) -> i32 {
        match self {
            VersionInfoError::NoVersionInfo => -1,
            VersionInfoError::InvalidParameter => -2,
            VersionInfoError::ApiUnavailable(_) => -3,
        }
    }
}
