/// Prefix that lifts the `MAX_PATH` restriction for Win32 file APIs.
pub const LONG_PATH_PREFIX: Option<&str> = Some(r"\\?\");
