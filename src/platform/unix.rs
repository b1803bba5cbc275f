/// Unix-like systems have no path length escape; paths are used as given.
pub const LONG_PATH_PREFIX: Option<&str> = None;
