//! Unified exit codes for the seqbench CLI.

pub const SUCCESS: i32 = 0;
/// Ground truth unavailable or the invocation cannot be satisfied.
pub const CONFIG_ERROR: i32 = 2;
/// Unexpected failure surfaced from a command.
pub const INTERNAL_ERROR: i32 = 3;
