// RAII-style guards for Win32 handles and contexts
// These automatically clean up resources when dropped, ensuring every exit
// path releases exactly what it acquired.

use std::ptr;

use windows::core::{GUID, PWSTR};
use windows::Win32::Foundation::{HANDLE, HWND};
use windows::Win32::Security::WinTrust::{
    WinVerifyTrust, WINTRUST_ACTION_GENERIC_VERIFY_V2, WINTRUST_DATA, WINTRUST_DATA_UICONTEXT,
    WTD_CHOICE_FILE, WTD_REVOCATION_CHECK_NONE, WTD_REVOKE_NONE, WTD_STATEACTION_CLOSE,
    WTD_UI_NONE,
};

/// RAII guard for WinVerifyTrust state data
/// Automatically calls WTD_STATEACTION_CLOSE on drop if state was opened
pub struct WinVerifyTrustGuard {
    state_data: HANDLE,
}

impl WinVerifyTrustGuard {
    pub fn new(state_data: HANDLE) -> Self {
        WinVerifyTrustGuard { state_data }
    }

    /// The raw state handle, for WTHelper chain access. Remains valid until
    /// this guard is dropped.
    pub fn state_data(&self) -> HANDLE {
        self.state_data
    }

    /// Close the state if it was opened (state_data is not null)
    fn close_if_needed(&mut self) {
        if self.state_data != HANDLE(ptr::null_mut()) {
            unsafe {
                let trust_data = WINTRUST_DATA {
                    cbStruct: std::mem::size_of::<WINTRUST_DATA>() as u32,
                    pPolicyCallbackData: ptr::null_mut(),
                    pSIPClientData: ptr::null_mut(),
                    dwUIChoice: WTD_UI_NONE,
                    fdwRevocationChecks: WTD_REVOKE_NONE,
                    dwUnionChoice: WTD_CHOICE_FILE,
                    Anonymous: std::mem::zeroed(),
                    dwStateAction: WTD_STATEACTION_CLOSE,
                    hWVTStateData: self.state_data,
                    pwszURLReference: PWSTR(ptr::null_mut()),
                    dwProvFlags: WTD_REVOCATION_CHECK_NONE,
                    dwUIContext: WINTRUST_DATA_UICONTEXT(0),
                    pSignatureSettings: ptr::null_mut(),
                };

                let action = WINTRUST_ACTION_GENERIC_VERIFY_V2;
                let _ = WinVerifyTrust(
                    HWND(ptr::null_mut()),
                    &action as *const GUID as *mut GUID,
                    &trust_data as *const WINTRUST_DATA as *mut std::ffi::c_void,
                );
                self.state_data = HANDLE(ptr::null_mut());
            }
        }
    }
}

impl Drop for WinVerifyTrustGuard {
    fn drop(&mut self) {
        self.close_if_needed();
    }
}
