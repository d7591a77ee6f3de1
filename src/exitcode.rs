/// Standard Unix exit codes for the linkhoard CLI application.
///
/// These codes follow the BSD convention where possible and provide
/// meaningful feedback about the type of error that occurred.
///
/// Successful termination
pub const SUCCESS: i32 = 0;

/// Command line usage error - invalid arguments, missing required parameters, etc.
pub const USAGE: i32 = 64;

/// The input data was incorrect - invalid URL, unknown bookmark ID, bad tag
pub const DATAERR: i32 = 65;

/// The bookmark database could not be opened or stopped answering
pub const UNAVAILABLE: i32 = 69;

/// An internal error occurred that is not the user's fault
pub const SOFTWARE: i32 = 70;
