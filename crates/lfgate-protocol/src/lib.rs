//! Wire protocol for the LFG (Looking-For-Group) message family.
//!
//! This crate defines the bytes that travel between game clients and the
//! session-side adapter:
//!
//! - **Types** ([`JoinRequest`], [`DungeonEntry`], [`LfgState`], etc.) —
//!   the domain values carried by LFG messages.
//! - **Requests** ([`ClientRequest`]) — decoding of every LFG client opcode.
//! - **Responses** ([`PlayerInfo`], [`PartyInfo`], [`SearchResults`],
//!   [`JoinResult`], [`StatusUpdate`], [`QueueStatus`]) — server messages,
//!   each sized exactly before it is encoded.
//! - **Codec** ([`WireReader`], [`ServerMessage`], [`WorldPacket`]) —
//!   bounds-checked little-endian reading and writing.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while decoding.
//!
//! # Architecture
//!
//! The protocol layer knows nothing about the matchmaking engine or the
//! world. It turns bytes into typed requests and typed responses into
//! bytes:
//!
//! ```text
//! Session (bytes) → Protocol (ClientRequest) → Adapter → Engine
//! Engine → Adapter → Protocol (ServerMessage) → Session (bytes)
//! ```

mod codec;
mod error;
mod opcode;
mod request;
mod response;
mod types;

pub use codec::{cstring_size, put_cstring, ServerMessage, WireReader, WorldPacket};
pub use error::{Malformed, ProtocolError};
pub use opcode::Opcode;
pub use request::ClientRequest;
pub use response::{
    search_flags, AvailableDungeon, CharacterStats, InstanceProgress, JoinResult, PartyInfo,
    PlayerInfo, QueueStatus, SearchGroup, SearchPlayer, SearchResults, StatusFlags, StatusUpdate,
};
pub use types::{
    BonusItem, DungeonEntry, DungeonId, DungeonRewardSnapshot, DungeonType, GroupId, ItemReward,
    JoinRequest, JoinResultCode, LfgState, LfgType, LfgUpdateType, LockedDungeon, PartyLockMap,
    PlayerId, PlayerStatusUpdate, QueueWaitEstimate, RoleMask, Team, DUNGEON_ID_MASK,
};
