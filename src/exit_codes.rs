//! Process exit statuses of the `fragcheck` binary.
//!
//! CI jobs rely on these to tell invalid fragments apart from a tool that
//! could not do its job.

/// Every checked fragment is valid
pub const SUCCESS: i32 = 0;

/// At least one fragment produced a diagnostic
pub const VIOLATIONS_FOUND: i32 = 1;

/// Configuration, file access or other internal failure
pub const TOOL_ERROR: i32 = 2;

/// Exit status for a finished run that reported `total_errors` diagnostics
pub fn for_diagnostics(total_errors: usize) -> i32 {
    if total_errors == 0 { SUCCESS } else { VIOLATIONS_FOUND }
}
