//! Opcodes for the LFG message family.
//!
//! The numeric values are the client's. Only the opcodes this adapter
//! reads or writes are listed; every other value decodes to
//! [`ProtocolError::UnknownOpcode`].

use std::fmt;

use crate::ProtocolError;

/// An LFG opcode, client → server (`Cmsg*`) or server → client (`Smsg*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Opcode {
    CmsgLfgGetStatus = 0x296,
    CmsgLfgJoin = 0x35C,
    CmsgLfgLeave = 0x35D,
    CmsgSearchLfgJoin = 0x35E,
    CmsgSearchLfgLeave = 0x35F,
    SmsgLfgSearchResults = 0x360,
    SmsgLfgJoinResult = 0x364,
    SmsgLfgQueueStatus = 0x365,
    CmsgSetLfgComment = 0x366,
    SmsgLfgUpdatePlayer = 0x367,
    SmsgLfgUpdateParty = 0x368,
    CmsgLfgSetRoles = 0x36A,
    CmsgLfgGetPlayerInfo = 0x36E,
    SmsgLfgPlayerInfo = 0x36F,
    CmsgLfgGetPartyInfo = 0x371,
    SmsgLfgPartyInfo = 0x372,
}

impl Opcode {
    /// The numeric value sent in the packet header.
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Returns `true` for opcodes a client sends.
    pub fn is_client_request(self) -> bool {
        matches!(
            self,
            Self::CmsgLfgGetStatus
                | Self::CmsgLfgJoin
                | Self::CmsgLfgLeave
                | Self::CmsgSearchLfgJoin
                | Self::CmsgSearchLfgLeave
                | Self::CmsgSetLfgComment
                | Self::CmsgLfgSetRoles
                | Self::CmsgLfgGetPlayerInfo
                | Self::CmsgLfgGetPartyInfo
        )
    }
}

impl TryFrom<u16> for Opcode {
    type Error = ProtocolError;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        let opcode = match code {
            0x296 => Self::CmsgLfgGetStatus,
            0x35C => Self::CmsgLfgJoin,
            0x35D => Self::CmsgLfgLeave,
            0x35E => Self::CmsgSearchLfgJoin,
            0x35F => Self::CmsgSearchLfgLeave,
            0x360 => Self::SmsgLfgSearchResults,
            0x364 => Self::SmsgLfgJoinResult,
            0x365 => Self::SmsgLfgQueueStatus,
            0x366 => Self::CmsgSetLfgComment,
            0x367 => Self::SmsgLfgUpdatePlayer,
            0x368 => Self::SmsgLfgUpdateParty,
            0x36A => Self::CmsgLfgSetRoles,
            0x36E => Self::CmsgLfgGetPlayerInfo,
            0x36F => Self::SmsgLfgPlayerInfo,
            0x371 => Self::CmsgLfgGetPartyInfo,
            0x372 => Self::SmsgLfgPartyInfo,
            other => return Err(ProtocolError::UnknownOpcode(other)),
        };
        Ok(opcode)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:#05x})", self, self.code())
    }
}
