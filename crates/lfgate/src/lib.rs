//! # lfgate
//!
//! Session-side adapter for the LFG (dungeon finder) protocol.
//!
//! A host server owns the matchmaking engine, the world and the item
//! catalog. lfgate sits between those and the client sessions: it
//! decodes LFG requests, checks the preconditions that depend on the
//! world, calls the engine, and encodes the replies.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use lfgate::prelude::*;
//!
//! fn serve<E: MatchmakingEngine, W: WorldView, S: PrototypeStore>(
//!     engine: Arc<E>,
//!     world: Arc<W>,
//!     store: Arc<S>,
//!     player: PlayerId,
//!     packet: &WorldPacket,
//! ) -> Result<Vec<WorldPacket>, LfgError> {
//!     let adapter = ProtocolAdapter::new(engine, world, store, AdapterConfig::default());
//!     adapter.handle(player, packet)
//! }
//! ```

mod adapter;
mod config;
mod error;
mod rewards;
mod status;

#[cfg(test)]
mod testing;

pub use adapter::ProtocolAdapter;
pub use config::{AdapterConfig, SearchConfig};
pub use error::LfgError;
pub use rewards::RewardResolver;
pub use status::StatusFlagResolver;

/// Re-exports of everything a host server usually needs.
pub mod prelude {
    pub use crate::{AdapterConfig, LfgError, ProtocolAdapter, SearchConfig};

    pub use lfgate_engine::{
        BaseRewards, EligibleDungeon, Expansion, ItemPrototype, JoinOutcome, JoinVerdict,
        MatchmakingEngine, PlayerSnapshot, PrototypeStore, StatusPush, WorldView,
    };
    pub use lfgate_protocol::{
        ClientRequest, DungeonEntry, DungeonId, DungeonType, GroupId, ItemReward, JoinResultCode,
        LfgState, LfgUpdateType, LockedDungeon, Opcode, PlayerId, PlayerStatusUpdate,
        ProtocolError, QueueWaitEstimate, RoleMask, Team, WorldPacket,
    };
}
