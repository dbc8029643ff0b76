//! Decoding of LFG client requests.
//!
//! Each opcode has a fixed body layout, read front to back through a
//! [`WireReader`]. A request is either decoded completely or rejected
//! with [`ProtocolError::MalformedMessage`]; no partial request is
//! ever handed on.

use std::collections::BTreeSet;

use crate::codec::WireReader;
use crate::{DungeonEntry, DungeonId, JoinRequest, Opcode, ProtocolError, RoleMask};

/// A decoded LFG client request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientRequest {
    /// `CMSG_LFG_JOIN`: queue for a set of dungeons.
    Join(JoinRequest),

    /// `CMSG_LFG_LEAVE`: leave the queue. No body.
    Leave,

    /// `CMSG_SEARCH_LFG_JOIN`: open the raid/dungeon browser for one entry.
    ///
    /// The entry's high byte is the search type. Nothing downstream uses
    /// it yet, but it is decoded so it isn't lost.
    SearchJoin { entry: DungeonEntry },

    /// `CMSG_SEARCH_LFG_LEAVE`: close the browser.
    SearchLeave { join_id: u32 },

    /// `CMSG_SET_LFG_COMMENT`: update the free-text comment.
    SetComment { comment: String },

    /// `CMSG_LFG_GET_PLAYER_INFO`: request dungeon availability and rewards.
    GetPlayerInfo,

    /// `CMSG_LFG_GET_PARTY_INFO`: request the group's locked dungeons.
    GetPartyInfo,

    /// `CMSG_LFG_SET_ROLES`: answer a group role check.
    SetRoles { roles: RoleMask },

    /// `CMSG_LFG_GET_STATUS`: request the current queue status. No body.
    GetStatus,
}

impl ClientRequest {
    /// Decodes the body of a client request sent under `opcode`.
    ///
    /// # Errors
    /// - [`ProtocolError::MalformedMessage`] if the body is too short for
    ///   its layout (including a declared count that runs past the end)
    ///   or a string is unterminated or not UTF-8.
    /// - [`ProtocolError::UnexpectedOpcode`] if `opcode` is not an LFG
    ///   client request.
    pub fn decode(opcode: Opcode, body: &[u8]) -> Result<Self, ProtocolError> {
        let mut r = WireReader::new(body);

        let request = match opcode {
            Opcode::CmsgLfgJoin => Self::Join(decode_join(&mut r)?),
            Opcode::CmsgLfgLeave => Self::Leave,
            Opcode::CmsgSearchLfgJoin => Self::SearchJoin {
                entry: DungeonEntry(r.read_u32()?),
            },
            Opcode::CmsgSearchLfgLeave => Self::SearchLeave {
                join_id: r.read_u32()?,
            },
            Opcode::CmsgSetLfgComment => Self::SetComment {
                comment: r.read_cstring()?,
            },
            Opcode::CmsgLfgGetPlayerInfo => Self::GetPlayerInfo,
            Opcode::CmsgLfgGetPartyInfo => Self::GetPartyInfo,
            Opcode::CmsgLfgSetRoles => Self::SetRoles {
                roles: RoleMask(u32::from(r.read_u8()?)),
            },
            Opcode::CmsgLfgGetStatus => Self::GetStatus,
            other => return Err(ProtocolError::UnexpectedOpcode(other)),
        };

        if r.remaining() > 0 {
            tracing::trace!(
                %opcode,
                trailing = r.remaining(),
                "ignoring trailing bytes after request body"
            );
        }

        Ok(request)
    }
}

/// Join body:
///
/// ```text
/// u32 roles | u8 u8 reserved | u8 n | u32 entry × n | u8 m | u8 × m | cstring comment
/// ```
///
/// The `m` bytes are the client's three "local info" markers; their
/// content is unused.
fn decode_join(r: &mut WireReader<'_>) -> Result<JoinRequest, ProtocolError> {
    let roles = RoleMask(r.read_u32()?);
    r.skip(2)?;

    let count = r.read_u8()?;
    let mut dungeons = BTreeSet::new();
    for _ in 0..count {
        dungeons.insert(DungeonId::new(r.read_u32()?));
    }

    let reserved = r.read_u8()?;
    r.skip(usize::from(reserved))?;

    let comment = r.read_cstring()?;

    Ok(JoinRequest {
        roles,
        dungeons,
        comment,
    })
}

#[cfg(test)]
mod tests {
    use bytes::BufMut;

    use super::*;
    use crate::Malformed;

    fn join_body(roles: u32, entries: &[u32], comment: &str) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.put_u32_le(roles);
        buf.put_u8(0);
        buf.put_u8(0);
        buf.put_u8(entries.len() as u8);
        for e in entries {
            buf.put_u32_le(*e);
        }
        buf.put_u8(3);
        buf.put_slice(&[0, 0, 0]);
        buf.put_slice(comment.as_bytes());
        buf.put_u8(0);
        buf
    }

    #[test]
    fn test_join_masks_and_collapses_entries() {
        let body = join_body(0x7, &[0x0100_0005, 0x0200_0005], "test");
        let req = ClientRequest::decode(Opcode::CmsgLfgJoin, &body).unwrap();

        let ClientRequest::Join(join) = req else {
            panic!("expected Join, got {req:?}");
        };
        assert_eq!(join.roles, RoleMask(0x7));
        assert_eq!(join.dungeons, BTreeSet::from([DungeonId::new(5)]));
        assert_eq!(join.comment, "test");
    }

    #[test]
    fn test_join_keeps_distinct_ids() {
        let body = join_body(0x8, &[0x0600_0105, 0x0100_0030, 0x30], "");
        let req = ClientRequest::decode(Opcode::CmsgLfgJoin, &body).unwrap();

        let ClientRequest::Join(join) = req else {
            panic!("expected Join");
        };
        let ids: Vec<u32> = join.dungeons.iter().map(|d| d.get()).collect();
        assert_eq!(ids, vec![0x30, 0x105]);
        assert_eq!(join.comment, "");
    }

    #[test]
    fn test_join_count_past_end_is_malformed() {
        // Declares 4 entries but carries only one.
        let mut body = Vec::new();
        body.put_u32_le(0x2);
        body.put_u16_le(0);
        body.put_u8(4);
        body.put_u32_le(0x10);

        let err = ClientRequest::decode(Opcode::CmsgLfgJoin, &body).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::MalformedMessage(Malformed::Truncated {
                offset: 11,
                needed: 4,
                remaining: 0,
            })
        );
    }

    #[test]
    fn test_join_reserved_count_past_end_is_malformed() {
        let mut body = Vec::new();
        body.put_u32_le(0x2);
        body.put_u16_le(0);
        body.put_u8(0);
        body.put_u8(3);
        body.put_u8(0);

        let err = ClientRequest::decode(Opcode::CmsgLfgJoin, &body).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_join_missing_comment_terminator_is_malformed() {
        let mut body = join_body(0x2, &[1], "abc");
        body.pop();

        let err = ClientRequest::decode(Opcode::CmsgLfgJoin, &body).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::MalformedMessage(Malformed::UnterminatedString { .. })
        ));
    }

    #[test]
    fn test_search_join_splits_entry() {
        let body = 0x0200_0107u32.to_le_bytes();
        let req = ClientRequest::decode(Opcode::CmsgSearchLfgJoin, &body).unwrap();

        let ClientRequest::SearchJoin { entry } = req else {
            panic!("expected SearchJoin");
        };
        assert_eq!(entry.id(), DungeonId::new(0x107));
        assert_eq!(entry.type_code(), 2);
    }

    #[test]
    fn test_search_leave_reads_join_id() {
        let body = 77u32.to_le_bytes();
        let req = ClientRequest::decode(Opcode::CmsgSearchLfgLeave, &body).unwrap();
        assert_eq!(req, ClientRequest::SearchLeave { join_id: 77 });
    }

    #[test]
    fn test_search_leave_short_body_is_malformed() {
        let err = ClientRequest::decode(Opcode::CmsgSearchLfgLeave, &[1, 2]).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_set_comment() {
        let req = ClientRequest::decode(Opcode::CmsgSetLfgComment, b"need tank\0").unwrap();
        assert_eq!(
            req,
            ClientRequest::SetComment {
                comment: "need tank".into()
            }
        );
    }

    #[test]
    fn test_set_roles_reads_one_byte() {
        let req = ClientRequest::decode(Opcode::CmsgLfgSetRoles, &[0x0A]).unwrap();
        assert_eq!(
            req,
            ClientRequest::SetRoles {
                roles: RoleMask::TANK | RoleMask::DAMAGE
            }
        );
    }

    #[test]
    fn test_set_roles_empty_body_is_malformed() {
        let err = ClientRequest::decode(Opcode::CmsgLfgSetRoles, &[]).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_bodyless_requests() {
        for (op, expected) in [
            (Opcode::CmsgLfgLeave, ClientRequest::Leave),
            (Opcode::CmsgLfgGetPlayerInfo, ClientRequest::GetPlayerInfo),
            (Opcode::CmsgLfgGetPartyInfo, ClientRequest::GetPartyInfo),
            (Opcode::CmsgLfgGetStatus, ClientRequest::GetStatus),
        ] {
            assert_eq!(ClientRequest::decode(op, &[]).unwrap(), expected);
        }
    }

    #[test]
    fn test_server_opcode_is_rejected() {
        let err = ClientRequest::decode(Opcode::SmsgLfgPlayerInfo, &[]).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::UnexpectedOpcode(Opcode::SmsgLfgPlayerInfo)
        );
    }
}
