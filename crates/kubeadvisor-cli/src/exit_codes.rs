//! Process exit codes
//!
//! Scripts may rely on these values; they are part of the CLI contract.

/// Unspecified failure
pub const ERROR: i32 = 1;

/// Invalid user input (bad version string, malformed releases file)
pub const INPUT_ERROR: i32 = 2;

/// Knowledge base or configuration could not be loaded
pub const CONFIG_ERROR: i32 = 3;

/// Requested cluster has no inventory snapshot
pub const NOT_FOUND: i32 = 4;

/// File not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;

/// The step graph could not be linearized
pub const PLAN_ERROR: i32 = 6;
