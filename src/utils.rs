/// Converts a Rust `&str` to a wide string (`Vec<u16>`) with a trailing null
/// terminator suitable for passing to Win32 APIs.
pub fn to_wide_null_terminated(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Decodes a wide-string buffer (without its terminator) into a `String`,
/// replacing invalid units.
pub fn wide_to_string(wide: &[u16]) -> String {
    String::from_utf16_lossy(wide)
}

/// Uppercase hex with no separators, e.g. `[0xDE, 0xAD]` becomes `"DEAD"`.
pub fn bytes_to_hex_upper(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

/// Converts a Windows FILETIME structure to a DateTime<Utc>
///
/// # Note
/// Windows FILETIME is the number of 100-nanosecond intervals since
/// January 1, 1601 UTC. We convert this to Unix timestamp (seconds since
/// January 1, 1970 UTC); values before the Unix epoch saturate to it.
#[cfg(windows)]
pub fn filetime_to_datetime(ft: windows::Win32::Foundation::FILETIME) -> chrono::DateTime<chrono::Utc> {
    use chrono::DateTime;

    const FILETIME_TO_UNIX_EPOCH: u64 = 116444736000000000;
    const HUNDRED_NANOSECONDS_PER_SECOND: u64 = 10000000;

    let time = ((ft.dwHighDateTime as u64) << 32) | (ft.dwLowDateTime as u64);
    let unix = (time.saturating_sub(FILETIME_TO_UNIX_EPOCH)) / HUNDRED_NANOSECONDS_PER_SECOND;
    DateTime::from_timestamp(unix as i64, 0)
        .unwrap_or_else(|| DateTime::from_timestamp(0, 0).unwrap())
}
