//! Error types for the protocol layer.
//!
//! Each crate in lfgate defines its own error enum. A `ProtocolError`
//! always means the bytes were wrong (or the opcode was), never that the
//! matchmaking engine refused something. Engine refusals travel inside
//! a `JoinResult` packet instead.

use crate::Opcode;

/// Errors that can occur while decoding a client message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// The body did not hold what the message layout requires.
    ///
    /// Decoding aborts at the first problem; no partially decoded
    /// request ever reaches the engine.
    #[error("malformed message: {0}")]
    MalformedMessage(#[from] Malformed),

    /// The numeric opcode is not one this protocol knows about.
    #[error("unknown opcode {0:#06x}")]
    UnknownOpcode(u16),

    /// The opcode is known but is not an LFG client request
    /// (for example a server-only opcode echoed back by a client).
    #[error("opcode {0:?} is not an LFG client request")]
    UnexpectedOpcode(Opcode),
}

impl ProtocolError {
    /// Returns `true` for errors caused by a truncated or corrupt body.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedMessage(_))
    }
}

/// What exactly was wrong with a malformed body.
///
/// Offsets are byte positions relative to the start of the message body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Malformed {
    /// A fixed-width read (or a declared element count) would run past
    /// the end of the buffer.
    #[error("needed {needed} bytes at offset {offset}, only {remaining} left")]
    Truncated {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    /// A string field had no null terminator before the buffer ended.
    #[error("string at offset {offset} has no terminator")]
    UnterminatedString { offset: usize },

    /// A string field was terminated but not valid UTF-8.
    #[error("string at offset {offset} is not valid UTF-8")]
    InvalidUtf8 { offset: usize },
}
