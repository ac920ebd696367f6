//! Safe system-library loading.
//!
//! Resolves a named system component by bare file name only, never honoring
//! the process's current directory or other attacker-writable search-path
//! entries. On systems where `LOAD_LIBRARY_SEARCH_SYSTEM32` is unavailable
//! the full system-directory path is constructed explicitly and loaded from
//! that exact location.

use tracing::debug;
use windows::core::{s, w, PCSTR, PCWSTR};
use windows::Win32::Foundation::HMODULE;
use windows::Win32::System::LibraryLoader::{
    FreeLibrary, GetModuleHandleW, GetProcAddress, LoadLibraryExW, LOAD_LIBRARY_SEARCH_SYSTEM32,
    LOAD_WITH_ALTERED_SEARCH_PATH,
};
use windows::Win32::System::SystemInformation::GetSystemDirectoryW;

use crate::error::LoaderError;
use crate::utils::to_wide_null_terminated;

/// An owned module handle; `FreeLibrary` runs exactly once on drop.
#[derive(Debug)]
pub struct SystemLibrary {
    handle: HMODULE,
    name: String,
}

impl SystemLibrary {
    /// Resolves a named entry point from this module. The returned pointer
    /// is only valid while `self` is alive.
    pub fn symbol(&self, name: &str) -> Result<unsafe extern "system" fn() -> isize, LoaderError> {
        let mut symbol_z: Vec<u8> = name.as_bytes().to_vec();
        symbol_z.push(0);
        let proc = unsafe { GetProcAddress(self.handle, PCSTR::from_raw(symbol_z.as_ptr())) };
        proc.ok_or_else(|| LoaderError::SymbolMissing {
            library: self.name.clone(),
            symbol: name.to_string(),
        })
    }
}

impl Drop for SystemLibrary {
    fn drop(&mut self) {
        unsafe {
            let _ = FreeLibrary(self.handle);
        }
    }
}

/// Safely load a system library.
///
/// Expectation: `file_name` is a bare file name such as `version.dll`;
/// anything containing a path separator is rejected outright.
pub fn load_system_library(file_name: &str) -> Result<SystemLibrary, LoaderError> {
    if file_name.is_empty() || file_name.contains(['\\', '/']) {
        return Err(LoaderError::LoadFailed {
            library: file_name.to_string(),
            reason: "expected a bare file name".to_string(),
        });
    }

    let kernel32 = unsafe { GetModuleHandleW(w!("kernel32")) }.map_err(|e| {
        LoaderError::LoadFailed {
            library: file_name.to_string(),
            reason: format!("kernel32 module handle unavailable: {e}"),
        }
    })?;

    // The presence of AddDllDirectory is the documented proxy for
    // LOAD_LIBRARY_SEARCH_SYSTEM32 support (built in on Windows 8+, via
    // KB2533623 on older systems).
    let search_system32_supported =
        unsafe { GetProcAddress(kernel32, s!("AddDllDirectory")) }.is_some();

    let result = if search_system32_supported {
        let wide_name = to_wide_null_terminated(file_name);
        unsafe {
            LoadLibraryExW(
                PCWSTR::from_raw(wide_name.as_ptr()),
                None,
                LOAD_LIBRARY_SEARCH_SYSTEM32,
            )
        }
    } else {
        let full_path = format!("{}\\{}", system_directory()?, file_name);
        debug!(%full_path, "search-system32 flag unavailable, loading by explicit path");
        let wide_path = to_wide_null_terminated(&full_path);
        unsafe {
            LoadLibraryExW(
                PCWSTR::from_raw(wide_path.as_ptr()),
                None,
                LOAD_WITH_ALTERED_SEARCH_PATH,
            )
        }
    };

    let handle = result.map_err(|e| LoaderError::LoadFailed {
        library: file_name.to_string(),
        reason: e.message(),
    })?;

    Ok(SystemLibrary {
        handle,
        name: file_name.to_string(),
    })
}

fn system_directory() -> Result<String, LoaderError> {
    let required = unsafe { GetSystemDirectoryW(None) };
    if required == 0 {
        return Err(LoaderError::SystemDirectoryUnavailable);
    }
    let mut buf = vec![0u16; required as usize];
    let written = unsafe { GetSystemDirectoryW(Some(&mut buf)) } as usize;
    if written == 0 || written >= buf.len() {
        return Err(LoaderError::SystemDirectoryUnavailable);
    }
    buf.truncate(written);
    Ok(String::from_utf16_lossy(&buf))
}
