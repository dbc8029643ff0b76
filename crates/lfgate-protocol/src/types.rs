//! Domain types shared by the decoder, the encoder, and the engine ports.
//!
//! Everything here is transient: built for one request or one response
//! and dropped after serialization. Durable LFG state (who is queued,
//! who has done which daily) belongs to the matchmaking engine.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A player's raw 64-bit object guid.
///
/// Newtype so a `PlayerId` can't be passed where a `GroupId` is expected,
/// even though both are `u64` on the wire.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{:#x}", self.0)
    }
}

/// A group's raw 64-bit guid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub u64);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G-{:#x}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Dungeons
// ---------------------------------------------------------------------------

/// Mask selecting the dungeon id out of a packed dungeon entry.
pub const DUNGEON_ID_MASK: u32 = 0x00FF_FFFF;

/// A dungeon id: the low 24 bits of a dungeon entry.
///
/// The constructor masks, so a `DungeonId` can never carry type bits.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(from = "u32", into = "u32")]
pub struct DungeonId(u32);

impl DungeonId {
    pub fn new(raw: u32) -> Self {
        Self(raw & DUNGEON_ID_MASK)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for DungeonId {
    fn from(raw: u32) -> Self {
        Self::new(raw)
    }
}

impl From<DungeonId> for u32 {
    fn from(id: DungeonId) -> Self {
        id.0
    }
}

impl fmt::Display for DungeonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D-{}", self.0)
    }
}

/// A packed dungeon entry as the client sends it: dungeon id in the low
/// 24 bits, an LFG type code in the high 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DungeonEntry(pub u32);

impl DungeonEntry {
    pub fn pack(id: DungeonId, type_code: u8) -> Self {
        Self((u32::from(type_code) << 24) | id.get())
    }

    pub fn id(self) -> DungeonId {
        DungeonId::new(self.0)
    }

    /// The raw type byte. Kept raw so unknown codes survive a round trip.
    pub fn type_code(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// The type byte as a known [`LfgType`], if it is one.
    pub fn lfg_type(self) -> Option<LfgType> {
        LfgType::from_code(self.type_code())
    }
}

/// The client-side LFG category carried in a dungeon entry's high byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LfgType {
    None = 0,
    Dungeon = 1,
    Raid = 2,
    Quest = 3,
    Zone = 4,
    Heroic = 5,
    Random = 6,
}

impl LfgType {
    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => Self::None,
            1 => Self::Dungeon,
            2 => Self::Raid,
            3 => Self::Quest,
            4 => Self::Zone,
            5 => Self::Heroic,
            6 => Self::Random,
            _ => return None,
        })
    }
}

/// The engine's reward classification of a dungeon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DungeonType {
    Classic,
    Tbc,
    TbcHeroic,
    Wotlk,
    WotlkHeroic,
    Unknown,
}

/// A dungeon the player cannot queue for, and the engine's reason code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockedDungeon {
    pub dungeon: DungeonId,
    pub reason: u32,
}

/// Locked dungeons per group member, ordered by player guid.
///
/// Never contains the requesting player.
pub type PartyLockMap = BTreeMap<PlayerId, Vec<LockedDungeon>>;

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// The roles a player offers, as the client's bitset.
///
/// Raw bits are kept as sent; unknown bits are preserved so the engine
/// sees exactly what the client chose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleMask(pub u32);

impl RoleMask {
    pub const NONE: Self = Self(0);
    pub const LEADER: Self = Self(0x1);
    pub const TANK: Self = Self(0x2);
    pub const HEALER: Self = Self(0x4);
    pub const DAMAGE: Self = Self(0x8);

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for RoleMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

// ---------------------------------------------------------------------------
// Matchmaking state
// ---------------------------------------------------------------------------

/// Why a status update is being pushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LfgUpdateType {
    Default = 0,
    Leader = 1,
    RolecheckAborted = 4,
    Join = 5,
    RolecheckFailed = 6,
    Leave = 7,
    ProposalFailed = 8,
    ProposalDeclined = 9,
    GroupFound = 10,
    AddedToQueue = 12,
    ProposalBegin = 13,
    Status = 14,
    GroupMemberOffline = 15,
    GroupDisband = 16,
}

impl LfgUpdateType {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Where a player or group is in the matchmaking state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LfgState {
    #[default]
    None = 0,
    Rolecheck = 1,
    Queued = 2,
    Proposal = 3,
    Boot = 4,
    Dungeon = 5,
    FinishedDungeon = 6,
    RaidBrowser = 7,
}

impl LfgState {
    pub fn code(self) -> u32 {
        self as u32
    }
}

/// Result code of a queue join, as the client displays it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinResultCode {
    Ok = 0,
    Failed = 1,
    GroupFull = 2,
    InternalError = 4,
    NotMeetReqs = 5,
    PartyNotMeetReqs = 6,
    MixedRaidDungeon = 7,
    MultiRealm = 8,
    Disconnected = 9,
    PartyInfoFailed = 10,
    DungeonInvalid = 11,
    Deserter = 12,
    PartyDeserter = 13,
    RandomCooldown = 14,
    PartyRandomCooldown = 15,
    TooManyMembers = 16,
    UsingBgSystem = 17,
    RoleCheckFailed = 18,
}

impl JoinResultCode {
    pub fn code(self) -> u32 {
        self as u32
    }
}

/// A player's faction. Search results never cross it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Alliance,
    Horde,
}

// ---------------------------------------------------------------------------
// Requests and pushes
// ---------------------------------------------------------------------------

/// A client's request to join the queue.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JoinRequest {
    pub roles: RoleMask,
    /// Masked dungeon ids; entries that mask to the same id collapse.
    pub dungeons: BTreeSet<DungeonId>,
    pub comment: String,
}

/// One status push from the engine to a player or a party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStatusUpdate {
    pub update_type: LfgUpdateType,
    pub state: LfgState,
    /// Empty unless the update type concerns specific dungeons.
    pub dungeons: BTreeSet<DungeonId>,
    pub comment: String,
}

impl PlayerStatusUpdate {
    /// An update that carries no dungeon list.
    pub fn bare(update_type: LfgUpdateType, state: LfgState) -> Self {
        Self {
            update_type,
            state,
            dungeons: BTreeSet::new(),
            comment: String::new(),
        }
    }
}

/// Queue telemetry for one dungeon. Negative waits mean "unknown".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueueWaitEstimate {
    pub dungeon: DungeonId,
    pub player_avg_wait_ms: i32,
    pub avg_wait_ms: i32,
    pub tank_avg_wait_ms: i32,
    pub healer_avg_wait_ms: i32,
    pub dps_avg_wait_ms: i32,
    pub needed_tanks: u8,
    pub needed_heals: u8,
    pub needed_dps: u8,
    pub time_in_queue_ms: u32,
}

// ---------------------------------------------------------------------------
// Rewards
// ---------------------------------------------------------------------------

/// An item id and stack size configured as a dungeon reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemReward {
    pub item_id: u32,
    pub amount: u32,
}

/// A resolved bonus item: the reward plus the prototype's display id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusItem {
    pub item_id: u32,
    pub display_id: u32,
    pub amount: u32,
}

/// What one player would get for completing one dungeon right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DungeonRewardSnapshot {
    pub dungeon: DungeonId,
    pub done_today: bool,
    pub gold: u32,
    pub xp: u32,
    pub bonus_item: Option<BonusItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dungeon_id_masks_type_bits() {
        assert_eq!(DungeonId::new(0x0100_0005).get(), 5);
        assert_eq!(DungeonId::new(0xFFFF_FFFF).get(), 0x00FF_FFFF);
    }

    #[test]
    fn test_dungeon_entry_splits_id_and_type() {
        let entry = DungeonEntry(0x0600_0105);
        assert_eq!(entry.id(), DungeonId::new(0x105));
        assert_eq!(entry.type_code(), 6);
        assert_eq!(entry.lfg_type(), Some(LfgType::Random));
    }

    #[test]
    fn test_dungeon_entry_unknown_type_code() {
        let entry = DungeonEntry(0x2A00_0001);
        assert_eq!(entry.type_code(), 0x2A);
        assert_eq!(entry.lfg_type(), None);
    }

    #[test]
    fn test_dungeon_entry_pack() {
        let entry = DungeonEntry::pack(DungeonId::new(261), LfgType::Heroic as u8);
        assert_eq!(entry.0, 0x0500_0105);
    }

    #[test]
    fn test_role_mask_contains() {
        let roles = RoleMask(0x7);
        assert!(roles.contains(RoleMask::LEADER | RoleMask::TANK));
        assert!(roles.contains(RoleMask::HEALER));
        assert!(!roles.contains(RoleMask::DAMAGE));
        assert!(RoleMask::NONE.is_empty());
    }

    #[test]
    fn test_wire_codes() {
        assert_eq!(LfgUpdateType::ProposalBegin.code(), 13);
        assert_eq!(LfgState::Queued.code(), 2);
        assert_eq!(JoinResultCode::RoleCheckFailed.code(), 18);
    }

    #[test]
    fn test_player_id_display() {
        assert_eq!(PlayerId(0x2a).to_string(), "P-0x2a");
    }

    #[test]
    fn test_dungeon_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&DungeonId::new(0x0100_0042)).unwrap();
        assert_eq!(json, "66");
    }

    #[test]
    fn test_dungeon_id_deserialize_masks() {
        let id: DungeonId = serde_json::from_str("16777221").unwrap();
        assert_eq!(id.get(), 5);
    }
}
