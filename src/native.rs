//! Production trust provider bound to the Windows WinTrust and Cryptography
//! APIs.
//!
//! `WinVerifyTrust` is invoked with state retention so the resolved provider
//! data can be walked afterwards via the WTHelper functions; the state is
//! closed by [`WinVerifyTrustGuard`] when the chain context drops.

use std::path::Path;
use std::ptr;

use tracing::debug;
use windows::core::{GUID, PCWSTR, PWSTR};
use windows::Win32::Foundation::{BOOL, HANDLE, HWND};
use windows::Win32::Security::Cryptography::{
    CertNameToStrW, CryptHashCertificate, CALG_SHA1, CERT_CONTEXT, CERT_SIMPLE_NAME_STR,
    CRYPT_INTEGER_BLOB, PKCS_7_ASN_ENCODING, X509_ASN_ENCODING,
};
use windows::Win32::Security::WinTrust::{
    WinVerifyTrust, WTHelperGetProvSignerFromChain, WTHelperProvDataFromStateData,
    WINTRUST_ACTION_GENERIC_VERIFY_V2, WINTRUST_DATA, WINTRUST_DATA_UICONTEXT,
    WINTRUST_FILE_INFO, WTD_CHOICE_FILE, WTD_REVOCATION_CHECK_CHAIN, WTD_REVOKE_WHOLECHAIN,
    WTD_STATEACTION_VERIFY, WTD_UI_NONE,
};

use crate::error::{hr_to_trust_error, hresult, ChainAccessError, ProviderError, TrustError};
use crate::provider::{Certificate, ChainContext, TrustOutcome, TrustProvider, TrustVerdict};
use crate::utils::{bytes_to_hex_upper, filetime_to_datetime, to_wide_null_terminated, wide_to_string};
use crate::win32_guards::WinVerifyTrustGuard;

/// [`TrustProvider`] backed by `WinVerifyTrust` with the generic
/// code-signing policy and whole-chain revocation checking.
#[derive(Debug, Default)]
pub struct WintrustProvider;

impl TrustProvider for WintrustProvider {
    type Chain = WintrustChain;

    fn verify_trust(&self, path: &Path) -> Result<TrustOutcome<WintrustChain>, ProviderError> {
        let path_text = path.to_string_lossy();
        let wide_path: Vec<u16> = to_wide_null_terminated(&path_text);

        let mut file_info = WINTRUST_FILE_INFO {
            cbStruct: std::mem::size_of::<WINTRUST_FILE_INFO>() as u32,
            pcwszFilePath: PCWSTR::from_raw(wide_path.as_ptr()),
            hFile: HANDLE(ptr::null_mut()),
            pgKnownSubject: ptr::null_mut(),
        };

        let mut trust_data = WINTRUST_DATA {
            cbStruct: std::mem::size_of::<WINTRUST_DATA>() as u32,
            pPolicyCallbackData: ptr::null_mut(),
            pSIPClientData: ptr::null_mut(),
            dwUIChoice: WTD_UI_NONE,
            fdwRevocationChecks: WTD_REVOKE_WHOLECHAIN,
            dwUnionChoice: WTD_CHOICE_FILE,
            Anonymous: unsafe { std::mem::zeroed() },
            dwStateAction: WTD_STATEACTION_VERIFY,
            hWVTStateData: HANDLE(ptr::null_mut()),
            pwszURLReference: PWSTR(ptr::null_mut()),
            dwProvFlags: WTD_REVOCATION_CHECK_CHAIN,
            dwUIContext: WINTRUST_DATA_UICONTEXT(0),
            pSignatureSettings: ptr::null_mut(),
        };

        trust_data.Anonymous.pFile = &mut file_info as *mut _;

        let action = WINTRUST_ACTION_GENERIC_VERIFY_V2;
        let hr = unsafe {
            WinVerifyTrust(
                HWND(ptr::null_mut()),
                &action as *const GUID as *mut GUID,
                &trust_data as *const WINTRUST_DATA as *mut std::ffi::c_void,
            )
        };

        // The guard owns any retained state from here on; on the untrusted
        // path it drops immediately, issuing the close action.
        let state = WinVerifyTrustGuard::new(trust_data.hWVTStateData);

        if hr == 0 {
            Ok(TrustOutcome::Trusted(WintrustChain { state }))
        } else {
            Ok(TrustOutcome::Untrusted(verdict_from_hresult(hr)))
        }
    }
}

fn verdict_from_hresult(hr: i32) -> TrustVerdict {
    match hr {
        hresult::TRUST_E_PROVIDER_UNKNOWN => TrustVerdict::ProviderUnknown,
        hresult::TRUST_E_ACTION_UNKNOWN => TrustVerdict::ActionUnknown,
        hresult::TRUST_E_SUBJECT_FORM_UNKNOWN => TrustVerdict::SubjectFormUnknown,
        _ => match hr_to_trust_error(hr) {
            TrustError::Unknown(code) => TrustVerdict::OtherError(code),
            detail => TrustVerdict::NotTrusted(detail),
        },
    }
}

/// Chain context over retained WinVerifyTrust state data. Exclusively owned
/// by the verification call that produced it; the state closes when this is
/// dropped.
#[derive(Debug)]
pub struct WintrustChain {
    state: WinVerifyTrustGuard,
}

impl ChainContext for WintrustChain {
    fn certificates(&self) -> Result<Vec<Certificate>, ChainAccessError> {
        unsafe {
            let prov_data = WTHelperProvDataFromStateData(self.state.state_data());
            if prov_data.is_null() {
                return Err(ChainAccessError(
                    "WTHelperProvDataFromStateData returned no provider data".into(),
                ));
            }

            let signer = WTHelperGetProvSignerFromChain(prov_data, 0, BOOL::from(false), 0);
            if signer.is_null() {
                return Err(ChainAccessError("provider data holds no signer".into()));
            }

            let count = (*signer).csCertChain as usize;
            let mut certs = Vec::with_capacity(count);
            for i in 0..count {
                let prov_cert = (*signer).pasCertChain.add(i);
                let cert_ctx = (*prov_cert).pCert;
                if cert_ctx.is_null() {
                    return Err(ChainAccessError(format!(
                        "chain entry {i} has no certificate context"
                    )));
                }
                certs.push(certificate_from_context(
                    cert_ctx,
                    (*prov_cert).fSelfSigned.as_bool(),
                ));
            }

            if !certs.is_empty() {
                let cert_info = (*(*(*signer).pasCertChain).pCert).pCertInfo;
                let valid_from = filetime_to_datetime((*cert_info).NotBefore);
                let valid_to = filetime_to_datetime((*cert_info).NotAfter);
                debug!(%valid_from, %valid_to, "leaf certificate validity window");
            }

            Ok(certs)
        }
    }
}

/// Builds a [`Certificate`] from a raw context. Name extraction failures
/// yield empty names, which the orchestrator reports as a detail-fetch
/// failure; they are not chain-access errors.
unsafe fn certificate_from_context(cert_ctx: *const CERT_CONTEXT, is_self_signed: bool) -> Certificate {
    let cert_info = (*cert_ctx).pCertInfo;
    let subject_name = name_from_blob(&(*cert_info).Subject).unwrap_or_default();
    let issuer_name = name_from_blob(&(*cert_info).Issuer).unwrap_or_default();

    Certificate {
        subject_name,
        issuer_name,
        is_self_signed,
        thumbprint_sha1: sha1_thumbprint(cert_ctx),
    }
}

/// Renders an encoded X.500 name blob as its simple display string, sizing
/// the buffer with a first call before converting.
unsafe fn name_from_blob(blob: &CRYPT_INTEGER_BLOB) -> Option<String> {
    let needed = CertNameToStrW(
        X509_ASN_ENCODING | PKCS_7_ASN_ENCODING,
        blob as *const CRYPT_INTEGER_BLOB,
        CERT_SIMPLE_NAME_STR,
        None,
    );
    if needed <= 1 {
        return None;
    }

    let mut buf = vec![0u16; needed as usize];
    let written = CertNameToStrW(
        X509_ASN_ENCODING | PKCS_7_ASN_ENCODING,
        blob as *const CRYPT_INTEGER_BLOB,
        CERT_SIMPLE_NAME_STR,
        Some(&mut buf),
    );
    if written == 0 {
        return None;
    }

    buf.truncate(written as usize - 1); // remove null terminator
    Some(wide_to_string(&buf))
}

unsafe fn sha1_thumbprint(cert_ctx: *const CERT_CONTEXT) -> Option<String> {
    let encoded = std::slice::from_raw_parts(
        (*cert_ctx).pbCertEncoded,
        (*cert_ctx).cbCertEncoded as usize,
    );

    let mut hash = [0u8; 20];
    let mut hash_len = hash.len() as u32;
    let result = CryptHashCertificate(
        None,
        CALG_SHA1,
        0,
        encoded,
        Some(hash.as_mut_ptr()),
        &mut hash_len,
    );

    result.is_ok().then(|| bytes_to_hex_upper(&hash[..hash_len as usize]))
}
