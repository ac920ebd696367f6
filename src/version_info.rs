//! Version-resource string retrieval.
//!
//! Reads a named string (FileDescription, ProductName, ...) from a file's
//! embedded version metadata, addressed by a language/code-page pair. The
//! version APIs are resolved dynamically through the safe library loader so
//! a missing version.dll degrades to a distinct error instead of a load-time
//! dependency.
//!
//! The sub-block key format (`\StringFileInfo\{lang}{codepage}\{name}`, hex
//! fields zero-padded to four digits) is an external-compatibility contract
//! with the version-resource format and must not change.

/// Builds the version-resource sub-block key, e.g.
/// `\StringFileInfo\040904E4\FileDescription` for language 1033 and code
/// page 1252. Hex digits are uppercase.
pub fn string_file_info_key(language: u16, code_page: u16, string_name: &str) -> String {
    format!("\\StringFileInfo\\{language:04X}{code_page:04X}\\{string_name}")
}

#[cfg(windows)]
pub use self::windows_impl::{get_file_version_string, read_version_string};

#[cfg(windows)]
mod windows_impl {
    use std::ffi::c_void;

    use tracing::debug;
    use windows::core::PCWSTR;
    use windows::Win32::Foundation::BOOL;

    use super::string_file_info_key;
    use crate::error::VersionInfoError;
    use crate::loader::load_system_library;
    use crate::utils::{to_wide_null_terminated, wide_to_string};

    type GetFileVersionInfoSizeWFn = unsafe extern "system" fn(PCWSTR, *mut u32) -> u32;
    type GetFileVersionInfoWFn = unsafe extern "system" fn(PCWSTR, u32, u32, *mut c_void) -> BOOL;
    type VerQueryValueWFn =
        unsafe extern "system" fn(*const c_void, PCWSTR, *mut *mut c_void, *mut u32) -> BOOL;

    /// Retrieves a string value from the file version info of `file_path`.
    ///
    /// Returns the number of characters in the value (not counting any
    /// terminator) on success, even when `out` was too small to hold it:
    /// callers detect truncation by comparing the return value against the
    /// capacity and re-invoke with a buffer of at least (return value + 1).
    /// An empty `out` performs a pure size query. A negative return is a
    /// hard failure; see [`VersionInfoError::code`].
    pub fn get_file_version_string(
        file_path: &str,
        string_name: &str,
        language: u16,
        code_page: u16,
        out: &mut [u16],
    ) -> i32 {
        match query_version_string(file_path, string_name, language, code_page) {
            Ok(value) => {
                if !out.is_empty() {
                    let copy = value.len().min(out.len() - 1);
                    out[..copy].copy_from_slice(&value[..copy]);
                    out[copy] = 0;
                }
                value.len() as i32
            }
            Err(err) => err.code(),
        }
    }

    /// Two-call wrapper over the raw contract: sizes, reads, and decodes the
    /// value in one step.
    pub fn read_version_string(
        file_path: &str,
        string_name: &str,
        language: u16,
        code_page: u16,
    ) -> Result<String, VersionInfoError> {
        query_version_string(file_path, string_name, language, code_page)
            .map(|value| wide_to_string(&value))
    }

    /// Reads the raw UTF-16 value, without terminator. All intermediate
    /// resources (the version.dll handle, the version-info block) are scoped
    /// to this call.
    fn query_version_string(
        file_path: &str,
        string_name: &str,
        language: u16,
        code_page: u16,
    ) -> Result<Vec<u16>, VersionInfoError> {
        if file_path.is_empty() || string_name.is_empty() {
            return Err(VersionInfoError::InvalidParameter);
        }

        let library = load_system_library("version.dll")
            .map_err(|e| VersionInfoError::ApiUnavailable(e.to_string()))?;
        let get_size: GetFileVersionInfoSizeWFn = unsafe {
            std::mem::transmute(
                library
                    .symbol("GetFileVersionInfoSizeW")
                    .map_err(|e| VersionInfoError::ApiUnavailable(e.to_string()))?,
            )
        };
        let get_info: GetFileVersionInfoWFn = unsafe {
            std::mem::transmute(
                library
                    .symbol("GetFileVersionInfoW")
                    .map_err(|e| VersionInfoError::ApiUnavailable(e.to_string()))?,
            )
        };
        let query_value: VerQueryValueWFn = unsafe {
            std::mem::transmute(
                library
                    .symbol("VerQueryValueW")
                    .map_err(|e| VersionInfoError::ApiUnavailable(e.to_string()))?,
            )
        };

        let wide_path = to_wide_null_terminated(file_path);
        let mut ignored_handle: u32 = 0;
        let info_size =
            unsafe { get_size(PCWSTR::from_raw(wide_path.as_ptr()), &mut ignored_handle) };
        if info_size == 0 {
            return Err(VersionInfoError::NoVersionInfo);
        }

        let mut info_data = vec![0u8; info_size as usize];
        let loaded = unsafe {
            get_info(
                PCWSTR::from_raw(wide_path.as_ptr()),
                0,
                info_size,
                info_data.as_mut_ptr().cast(),
            )
        };
        if !loaded.as_bool() {
            return Err(VersionInfoError::NoVersionInfo);
        }

        let key = string_file_info_key(language, code_page, string_name);
        debug!(%key, "querying version resource");
        let wide_key = to_wide_null_terminated(&key);

        let mut value_ptr: *mut c_void = std::ptr::null_mut();
        let mut value_len: u32 = 0;
        let found = unsafe {
            query_value(
                info_data.as_ptr().cast(),
                PCWSTR::from_raw(wide_key.as_ptr()),
                &mut value_ptr,
                &mut value_len,
            )
        };
        if !found.as_bool() || value_ptr.is_null() {
            return Err(VersionInfoError::NoVersionInfo);
        }

        // value_len counts characters and may include the terminator;
        // normalize by stripping trailing nulls.
        let raw =
            unsafe { std::slice::from_raw_parts(value_ptr as *const u16, value_len as usize) };
        let end = raw
            .iter()
            .rposition(|&c| c != 0)
            .map(|i| i + 1)
            .unwrap_or(0);
        Ok(raw[..end].to_vec())
    }
}
