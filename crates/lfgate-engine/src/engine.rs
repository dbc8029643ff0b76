//! The matchmaking engine port.
//!
//! lfgate doesn't decide who may queue for what, how groups are formed,
//! or when a daily reward resets; the matchmaking engine does. This
//! module defines the [`MatchmakingEngine`] trait: the exact set of
//! calls the adapter makes into that engine. Implement it over your
//! engine (or over an in-memory fake in tests) and hand it to the
//! adapter at construction.
//!
//! # Why a trait?
//!
//! The adapter is handed its engine at construction and never reaches
//! for a global.
//! One engine instance can back every session, so the trait requires
//! `Send + Sync` and every method takes `&self`; any locking is the
//! engine's business.

use std::collections::BTreeSet;

use lfgate_protocol::{
    DungeonEntry, DungeonId, DungeonType, GroupId, ItemReward, JoinResultCode, LfgState,
    LockedDungeon, PartyLockMap, PlayerId, PlayerStatusUpdate, RoleMask,
};
use serde::{Deserialize, Serialize};

/// Which client expansion a session runs; limits the dungeons offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Expansion {
    Classic = 0,
    Tbc = 1,
    Wotlk = 2,
}

/// A dungeon offered to a player: the id used for engine lookups and the
/// packed entry the client is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EligibleDungeon {
    pub dungeon: DungeonId,
    pub entry: DungeonEntry,
}

/// The engine's verdict on a join attempt, sent as `SMSG_LFG_JOIN_RESULT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinVerdict {
    pub code: JoinResultCode,
    pub state: LfgState,
    /// Locks of the group members that made the join fail.
    pub party_locks: PartyLockMap,
}

/// A status push to the joining player, sent as `SMSG_LFG_UPDATE_PLAYER`
/// or (`party == true`) `SMSG_LFG_UPDATE_PARTY`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusPush {
    pub party: bool,
    pub status: PlayerStatusUpdate,
}

/// Everything the engine wants the joining session told.
///
/// Both parts are optional: an engine that reports asynchronously
/// returns `JoinOutcome::default()` and pushes later.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinOutcome {
    pub verdict: Option<JoinVerdict>,
    pub updates: Vec<StatusPush>,
}

/// The calls the adapter makes into the matchmaking engine.
///
/// # Example
///
/// ```rust
/// use std::collections::BTreeSet;
///
/// use lfgate_engine::{EligibleDungeon, Expansion, JoinOutcome, MatchmakingEngine};
/// use lfgate_protocol::{
///     DungeonId, DungeonType, GroupId, ItemReward, LockedDungeon, PlayerId, RoleMask,
/// };
///
/// /// Offers nothing and accepts nobody.
/// struct ClosedEngine;
///
/// impl MatchmakingEngine for ClosedEngine {
///     fn join_queue(
///         &self,
///         _roles: RoleMask,
///         _dungeons: &BTreeSet<DungeonId>,
///         _comment: &str,
///         _player: PlayerId,
///     ) -> JoinOutcome {
///         JoinOutcome::default()
///     }
///
///     fn leave_queue(&self, _player: PlayerId, _group: Option<GroupId>) {}
///
///     fn role_check(&self, _player: PlayerId, _group: GroupId, _roles: RoleMask) {}
///
///     fn eligible_dungeons(&self, _level: u8, _expansion: Expansion) -> Vec<EligibleDungeon> {
///         Vec::new()
///     }
///
///     fn ineligible_dungeons(&self, _player: PlayerId) -> Vec<LockedDungeon> {
///         Vec::new()
///     }
///
///     fn daily_completion(&self, _player: PlayerId, _dungeon_type: DungeonType) -> bool {
///         false
///     }
///
///     fn dungeon_type(&self, _dungeon: DungeonId) -> DungeonType {
///         DungeonType::Unknown
///     }
///
///     fn item_reward(&self, _dungeon: DungeonId, _dungeon_type: DungeonType) -> Option<ItemReward> {
///         None
///     }
/// }
/// ```
pub trait MatchmakingEngine: Send + Sync + 'static {
    /// Puts a player (or, for a group leader, their group) in the queue.
    ///
    /// Failures are reported through the returned verdict's result code,
    /// never as a Rust error.
    fn join_queue(
        &self,
        roles: RoleMask,
        dungeons: &BTreeSet<DungeonId>,
        comment: &str,
        player: PlayerId,
    ) -> JoinOutcome;

    /// Handles a client's request to leave the queue.
    ///
    /// Called for every leave, with the player's group if they have one.
    /// The engine decides what it means: a solo player leaves, a group
    /// leader takes the whole group out, and a non-leader's request is
    /// the engine's to honour or ignore.
    fn leave_queue(&self, player: PlayerId, group: Option<GroupId>);

    /// Records a group member's answer to a role check.
    fn role_check(&self, player: PlayerId, group: GroupId, roles: RoleMask);

    /// Dungeons a character of this level and expansion may queue for,
    /// in the order the client should list them.
    fn eligible_dungeons(&self, level: u8, expansion: Expansion) -> Vec<EligibleDungeon>;

    /// Dungeons this player is locked out of, one entry per dungeon.
    fn ineligible_dungeons(&self, player: PlayerId) -> Vec<LockedDungeon>;

    /// Whether the player already claimed today's reward for this type.
    ///
    /// Read fresh on every call. The adapter never caches it.
    fn daily_completion(&self, player: PlayerId, dungeon_type: DungeonType) -> bool;

    /// The reward classification of a dungeon.
    fn dungeon_type(&self, dungeon: DungeonId) -> DungeonType;

    /// The configured first-completion item for a dungeon, if any.
    fn item_reward(&self, dungeon: DungeonId, dungeon_type: DungeonType) -> Option<ItemReward>;
}
