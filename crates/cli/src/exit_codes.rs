//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 2       | Universal        | CLI usage error (bad args, missing file) |
//! | 3-9     | extract          | Extraction outcome codes                 |
//! | 10-19   | config           | Config file codes                        |
//! | 20-29   | patterns         | Pattern catalog codes                    |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

// =============================================================================
// Universal (0, 2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Extract (3-9)
// =============================================================================

/// Extraction ran but found no coordinates.
/// Like `grep(1)` returning 1: not a failure, but scripts can branch on it.
pub const EXIT_NO_MATCHES: u8 = 3;

/// Input document could not be read (missing file, not UTF-8).
pub const EXIT_INPUT: u8 = 4;

/// Output could not be serialized or written.
pub const EXIT_OUTPUT: u8 = 5;

// =============================================================================
// Config (10-19)
// =============================================================================

/// Config file is not valid TOML or has unknown keys.
pub const EXIT_CONFIG_PARSE: u8 = 10;

/// Config parsed but failed validation (empty family set, unknown pattern id).
pub const EXIT_CONFIG_INVALID: u8 = 11;

// =============================================================================
// Patterns (20-29)
// =============================================================================

/// A catalog pattern failed to compile or to match its own examples.
pub const EXIT_SELF_TEST_FAILED: u8 = 20;
