//! Unified error type for the lfgate adapter.

use lfgate_protocol::{PlayerId, ProtocolError};

/// Top-level error returned by
/// [`ProtocolAdapter::handle`](crate::ProtocolAdapter::handle).
///
/// Errors are local to the message that caused them: the session logs
/// the error and keeps going. Conditions that only mean "nothing to
/// send" (an ungrouped player asking for party info, an item prototype
/// that doesn't resolve) are not errors at all.
#[derive(Debug, thiserror::Error)]
pub enum LfgError {
    /// The request body could not be decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The session's own player is not in the world view.
    #[error("player {0} not found in world")]
    PlayerNotFound(PlayerId),
}
