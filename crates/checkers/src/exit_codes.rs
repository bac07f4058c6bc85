//! Exit codes for the CLI

/// All reports passed
pub const SUCCESS: u8 = 0;

/// At least one test or check failed
pub const TESTS_FAILED: u8 = 1;

/// Checkers itself failed (spawn error, unexpected tool output, bad config)
pub const INTERNAL_ERROR: u8 = 3;

/// Invalid command line
pub const USAGE_ERROR: u8 = 4;
