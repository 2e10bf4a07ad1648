// Errors - construction-time configuration failures

use thiserror::Error;

/// Caller mistakes caught before any secret-dependent computation.
///
/// Protocol outcomes are not represented here: a failed safety check or a
/// mismatched proof moves the state machine into a terminal state and the
/// operation returns `None` (or `false`) instead.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SrpError {
    /// Custom group selected without both parameters
    #[error("both n_hex and g_hex are required for a custom group")]
    MissingCustomGroup,

    /// Group hex that does not parse, or parses to zero
    #[error("custom group parameter {0} is not usable hex")]
    MalformedGroupHex(&'static str),

    /// Supplied private ephemeral with the wrong length
    #[error("32 bytes required for the private ephemeral, got {0}")]
    EphemeralKeyLength(usize),
}
