//! Standard exit codes (BSD sysexits.h compatible)

/// Command line usage error
pub const USAGE: i32 = 64;

/// Data format error (bad taxonomy or profile data, failed validation)
pub const DATAERR: i32 = 65;

/// Cannot open input (document to upload is missing)
pub const NOINPUT: i32 = 66;

/// Requested node or label does not exist
pub const NOTFOUND: i32 = 67;

/// Input/output error
pub const IOERR: i32 = 74;

/// Permission denied (not logged in)
pub const NOPERM: i32 = 77;

/// Configuration error
pub const CONFIG: i32 = 78;
