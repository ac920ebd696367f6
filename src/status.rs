use std::fmt;

/// Outcome of a single `verify_file_code_signature` invocation.
///
/// The ordinals are a fixed external contract: callers persist and compare
/// them across process boundaries, so variants must never be reordered or
/// renumbered. Exactly one value is returned per invocation.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// Every requested check passed.
    Ok = 0,
    /// Platform trust verification did not produce a trusted verdict.
    VerifyTrustFailure = 1,
    /// The chain is not anchored to the designated root authority.
    NotMicrosoftRoot = 2,
    /// The leaf subject or issuer display name could not be retrieved.
    CertDetailFetchFailed = 3,
    /// The extracted subject name differs from the expected subject name.
    CertNameNotEqual = 4,
    /// The extracted issuer name differs from the expected issuer name.
    CertIssuerNameNotEqual = 5,
    /// A required system library could not be loaded.
    LoadLibraryFailure = 6,
    /// A required entry point was missing from a loaded library.
    GetProcAddressFailure = 7,
    /// Trust state was established but chain data could not be read from it.
    WtHelperFailed = 8,
    /// Any other internal failure.
    Nonspecific = 9,
}

impl StatusCode {
    /// The ordinal value reported to foreign callers.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_ok(self) -> bool {
        self == StatusCode::Ok
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mnemonic = match self {
            StatusCode::Ok => "STATUS_OK",
            StatusCode::VerifyTrustFailure => "ERROR_VERIFYTRUSTFAILURE",
            StatusCode::NotMicrosoftRoot => "ERROR_NOTMICROSOFTROOT",
            StatusCode::CertDetailFetchFailed => "ERROR_CERTDETAILFETCHFAILED",
            StatusCode::CertNameNotEqual => "ERROR_CERTNAMENOTEQUAL",
            StatusCode::CertIssuerNameNotEqual => "ERROR_CERTISSUERNAMENOTEQUAL",
            StatusCode::LoadLibraryFailure => "ERROR_LOADLIBRARYFAILURE",
            StatusCode::GetProcAddressFailure => "ERROR_GETPROCADDRESSFAILURE",
            StatusCode::WtHelperFailed => "ERROR_WTHELPERFAILED",
            StatusCode::Nonspecific => "ERROR_NONSPECIFIC",
        };
        f.write_str(mnemonic)
    }
}
