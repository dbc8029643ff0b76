//! Server messages and their wire layouts.
//!
//! Every message here implements [`ServerMessage`]: `wire_size` is
//! computed from element counts, `encode` writes exactly that many
//! bytes. Optional wire sections are `Option` fields; the flag words
//! that gate them on the wire are derived from which options are set,
//! never assembled by hand at the call site.

use bytes::{BufMut, BytesMut};

use crate::codec::{cstring_size, put_cstring, ServerMessage};
use crate::{
    DungeonEntry, DungeonRewardSnapshot, GroupId, JoinResultCode, LfgState, LockedDungeon,
    Opcode, PartyLockMap, PlayerId, PlayerStatusUpdate, QueueWaitEstimate,
};

/// Collections prefixed by a `u8` count are capped at 255 elements;
/// size and body both go through this so they can't disagree.
fn u8_count(len: usize) -> usize {
    len.min(usize::from(u8::MAX))
}

// ---------------------------------------------------------------------------
// Locked-dungeon blocks (shared by PlayerInfo, PartyInfo, JoinResult)
// ---------------------------------------------------------------------------

const LOCK_SIZE: usize = 8;
const MEMBER_HEADER_SIZE: usize = 12;

fn put_locks(buf: &mut BytesMut, locks: &[LockedDungeon]) {
    buf.put_u32_le(locks.len() as u32);
    for lock in locks {
        buf.put_u32_le(lock.dungeon.get());
        buf.put_u32_le(lock.reason);
    }
}

fn member_block_size(locks: &[LockedDungeon]) -> usize {
    MEMBER_HEADER_SIZE + LOCK_SIZE * locks.len()
}

fn put_member_block(buf: &mut BytesMut, player: PlayerId, locks: &[LockedDungeon]) {
    buf.put_u64_le(player.0);
    put_locks(buf, locks);
}

// ---------------------------------------------------------------------------
// PlayerInfo
// ---------------------------------------------------------------------------

/// One dungeon the player may queue for, with its reward snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailableDungeon {
    /// Sent as-is, type byte included.
    pub entry: DungeonEntry,
    pub reward: DungeonRewardSnapshot,
}

impl AvailableDungeon {
    // entry, done flag, gold, xp, two reserved u32, bonus presence flag
    const BASE_SIZE: usize = 4 + 1 + 4 + 4 + 4 + 4 + 1;
    const BONUS_SIZE: usize = 12;

    fn wire_size(&self) -> usize {
        match self.reward.bonus_item {
            Some(_) => Self::BASE_SIZE + Self::BONUS_SIZE,
            None => Self::BASE_SIZE,
        }
    }

    fn encode(&self, buf: &mut BytesMut) {
        let reward = &self.reward;
        buf.put_u32_le(self.entry.0);
        buf.put_u8(u8::from(reward.done_today));
        buf.put_u32_le(reward.gold);
        buf.put_u32_le(reward.xp);
        buf.put_u32_le(0);
        buf.put_u32_le(0);
        match reward.bonus_item {
            Some(item) => {
                buf.put_u8(1);
                buf.put_u32_le(item.item_id);
                buf.put_u32_le(item.display_id);
                buf.put_u32_le(item.amount);
            }
            None => buf.put_u8(0),
        }
    }
}

/// `SMSG_LFG_PLAYER_INFO`: what the player can queue for and what is locked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerInfo {
    pub available: Vec<AvailableDungeon>,
    pub locked: Vec<LockedDungeon>,
}

impl PlayerInfo {
    fn available(&self) -> &[AvailableDungeon] {
        &self.available[..u8_count(self.available.len())]
    }
}

impl ServerMessage for PlayerInfo {
    fn opcode(&self) -> Opcode {
        Opcode::SmsgLfgPlayerInfo
    }

    fn wire_size(&self) -> usize {
        let available: usize = self.available().iter().map(AvailableDungeon::wire_size).sum();
        1 + available + 4 + LOCK_SIZE * self.locked.len()
    }

    fn encode(&self, buf: &mut BytesMut) {
        let available = self.available();
        buf.put_u8(available.len() as u8);
        for dungeon in available {
            dungeon.encode(buf);
        }
        put_locks(buf, &self.locked);
    }
}

// ---------------------------------------------------------------------------
// PartyInfo
// ---------------------------------------------------------------------------

/// `SMSG_LFG_PARTY_INFO`: locked dungeons of every other group member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartyInfo {
    pub members: PartyLockMap,
}

impl PartyInfo {
    fn members(&self) -> impl Iterator<Item = (&PlayerId, &Vec<LockedDungeon>)> {
        self.members.iter().take(u8_count(self.members.len()))
    }
}

impl ServerMessage for PartyInfo {
    fn opcode(&self) -> Opcode {
        Opcode::SmsgLfgPartyInfo
    }

    fn wire_size(&self) -> usize {
        1 + self
            .members()
            .map(|(_, locks)| member_block_size(locks))
            .sum::<usize>()
    }

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(u8_count(self.members.len()) as u8);
        for (player, locks) in self.members() {
            put_member_block(buf, *player, locks);
        }
    }
}

// ---------------------------------------------------------------------------
// JoinResult
// ---------------------------------------------------------------------------

/// `SMSG_LFG_JOIN_RESULT`: the engine's verdict on a join attempt.
///
/// When members of the group are locked out, their locks follow the
/// result and state words (no member count is sent).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinResult {
    pub code: JoinResultCode,
    pub state: LfgState,
    pub party_locks: PartyLockMap,
}

impl ServerMessage for JoinResult {
    fn opcode(&self) -> Opcode {
        Opcode::SmsgLfgJoinResult
    }

    fn wire_size(&self) -> usize {
        8 + self
            .party_locks
            .values()
            .map(|locks| member_block_size(locks))
            .sum::<usize>()
    }

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u32_le(self.code.code());
        buf.put_u32_le(self.state.code());
        for (player, locks) in &self.party_locks {
            put_member_block(buf, *player, locks);
        }
    }
}

// ---------------------------------------------------------------------------
// StatusUpdate
// ---------------------------------------------------------------------------

/// The two presentation booleans derived from an update's type and state.
///
/// Both default to `false`; see the resolver in the `lfgate` crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusFlags {
    pub is_queued: bool,
    /// Only sent in the party variant.
    pub join_lfg: bool,
}

/// `SMSG_LFG_UPDATE_PLAYER` / `SMSG_LFG_UPDATE_PARTY`.
///
/// The short form is just the update type and the has-dungeons byte.
/// The full form follows with the flags, the dungeon list and the
/// comment; which one is sent is the explicit `extra_detail` input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub party: bool,
    pub status: PlayerStatusUpdate,
    pub flags: StatusFlags,
    pub extra_detail: bool,
}

impl StatusUpdate {
    /// Builds an update using the default detail policy: the full form
    /// is sent exactly when there are dungeons to list.
    pub fn new(party: bool, status: PlayerStatusUpdate, flags: StatusFlags) -> Self {
        let extra_detail = !status.dungeons.is_empty();
        Self {
            party,
            status,
            flags,
            extra_detail,
        }
    }

    /// Overrides the detail policy.
    pub fn with_extra_detail(mut self, extra_detail: bool) -> Self {
        self.extra_detail = extra_detail;
        self
    }

    fn dungeon_count(&self) -> usize {
        u8_count(self.status.dungeons.len())
    }
}

impl ServerMessage for StatusUpdate {
    fn opcode(&self) -> Opcode {
        if self.party {
            Opcode::SmsgLfgUpdateParty
        } else {
            Opcode::SmsgLfgUpdatePlayer
        }
    }

    fn wire_size(&self) -> usize {
        if !self.extra_detail {
            return 2;
        }
        // queued + two reserved bytes + dungeon count
        let mut size = 2 + 4;
        if self.party {
            // join flag, leader byte, three reserved bytes
            size += 5;
        }
        size + 4 * self.dungeon_count() + cstring_size(&self.status.comment)
    }

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(self.status.update_type.code());
        buf.put_u8(u8::from(!self.status.dungeons.is_empty()));
        if !self.extra_detail {
            return;
        }

        if self.party {
            buf.put_u8(u8::from(self.flags.join_lfg));
        }
        buf.put_u8(u8::from(self.flags.is_queued));
        buf.put_u8(0);
        buf.put_u8(0);
        if self.party {
            buf.put_u8(0);
            buf.put_bytes(0, 3);
        }

        let count = self.dungeon_count();
        buf.put_u8(count as u8);
        for dungeon in self.status.dungeons.iter().take(count) {
            buf.put_u32_le(dungeon.get());
        }
        put_cstring(buf, &self.status.comment);
    }
}

// ---------------------------------------------------------------------------
// QueueStatus
// ---------------------------------------------------------------------------

/// `SMSG_LFG_QUEUE_STATUS`: fixed-layout wait-time telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueStatus(pub QueueWaitEstimate);

impl ServerMessage for QueueStatus {
    fn opcode(&self) -> Opcode {
        Opcode::SmsgLfgQueueStatus
    }

    fn wire_size(&self) -> usize {
        4 + 5 * 4 + 3 + 4
    }

    fn encode(&self, buf: &mut BytesMut) {
        let q = &self.0;
        buf.put_u32_le(q.dungeon.get());
        buf.put_i32_le(q.player_avg_wait_ms);
        buf.put_i32_le(q.avg_wait_ms);
        buf.put_i32_le(q.tank_avg_wait_ms);
        buf.put_i32_le(q.healer_avg_wait_ms);
        buf.put_i32_le(q.dps_avg_wait_ms);
        buf.put_u8(q.needed_tanks);
        buf.put_u8(q.needed_heals);
        buf.put_u8(q.needed_dps);
        buf.put_u32_le(q.time_in_queue_ms);
    }
}

// ---------------------------------------------------------------------------
// SearchResults
// ---------------------------------------------------------------------------

/// Flag bits gating the optional sections of a search-result entry.
pub mod search_flags {
    pub const CHARACTER_INFO: u32 = 0x01;
    pub const COMMENT: u32 = 0x02;
    pub const GROUP_LEADER: u32 = 0x04;
    pub const GROUP_GUID: u32 = 0x08;
    pub const ROLES: u32 = 0x10;
    pub const AREA: u32 = 0x20;
    pub const STATUS: u32 = 0x40;
    pub const INSTANCE: u32 = 0x80;
}

/// Instance binding shown in the browser: instance guid plus the
/// bitmask of encounters already killed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InstanceProgress {
    pub instance_guid: u64,
    pub completed_encounters: u32,
}

impl InstanceProgress {
    const SIZE: usize = 12;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u64_le(self.instance_guid);
        buf.put_u32_le(self.completed_encounters);
    }
}

/// The character sheet block of a player entry.
///
/// The client lays out 20 numeric stats after the identity bytes;
/// a handful are floats.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CharacterStats {
    pub level: u8,
    pub class: u8,
    pub race: u8,
    /// Points spent per talent tree.
    pub talents: [u8; 3],
    pub armor: u32,
    pub spell_damage: u32,
    pub spell_heal: u32,
    pub haste_melee: u32,
    pub haste_ranged: u32,
    pub haste_spell: u32,
    pub mp5: f32,
    pub mp5_combat: f32,
    pub attack_power: u32,
    pub agility: u32,
    pub health: u32,
    pub mana: u32,
    pub reserved: u32,
    pub avg_item_level: f32,
    pub defense: u32,
    pub dodge: u32,
    pub block: u32,
    pub parry: u32,
    pub crit: u32,
    pub expertise: u32,
}

impl CharacterStats {
    const SIZE: usize = 6 + 20 * 4;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(self.level);
        buf.put_u8(self.class);
        buf.put_u8(self.race);
        buf.put_slice(&self.talents);
        buf.put_u32_le(self.armor);
        buf.put_u32_le(self.spell_damage);
        buf.put_u32_le(self.spell_heal);
        buf.put_u32_le(self.haste_melee);
        buf.put_u32_le(self.haste_ranged);
        buf.put_u32_le(self.haste_spell);
        buf.put_f32_le(self.mp5);
        buf.put_f32_le(self.mp5_combat);
        buf.put_u32_le(self.attack_power);
        buf.put_u32_le(self.agility);
        buf.put_u32_le(self.health);
        buf.put_u32_le(self.mana);
        buf.put_u32_le(self.reserved);
        buf.put_f32_le(self.avg_item_level);
        buf.put_u32_le(self.defense);
        buf.put_u32_le(self.dodge);
        buf.put_u32_le(self.block);
        buf.put_u32_le(self.parry);
        buf.put_u32_le(self.crit);
        buf.put_u32_le(self.expertise);
    }
}

/// A group listed in the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchGroup {
    pub guid: GroupId,
    pub comment: Option<String>,
    /// Needed tank / healer / damage counts.
    pub roles: Option<[u8; 3]>,
    pub instance: Option<InstanceProgress>,
}

impl SearchGroup {
    /// The single group the browser is populated with until the engine
    /// tracks real listings: guid 1, empty comment, no roles needed,
    /// fresh instance. Its flag word is `0x92`.
    pub fn placeholder() -> Self {
        Self {
            guid: GroupId(1),
            comment: Some(String::new()),
            roles: Some([0; 3]),
            instance: Some(InstanceProgress::default()),
        }
    }

    pub fn flags(&self) -> u32 {
        let mut flags = 0;
        if self.comment.is_some() {
            flags |= search_flags::COMMENT;
        }
        if self.roles.is_some() {
            flags |= search_flags::ROLES;
        }
        if self.instance.is_some() {
            flags |= search_flags::INSTANCE;
        }
        flags
    }

    fn wire_size(&self) -> usize {
        let mut size = 8 + 4;
        if let Some(comment) = &self.comment {
            size += cstring_size(comment);
        }
        if self.roles.is_some() {
            size += 3;
        }
        if self.instance.is_some() {
            size += InstanceProgress::SIZE;
        }
        size
    }

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u64_le(self.guid.0);
        buf.put_u32_le(self.flags());
        if let Some(comment) = &self.comment {
            put_cstring(buf, comment);
        }
        if let Some(roles) = &self.roles {
            buf.put_slice(roles);
        }
        if let Some(instance) = &self.instance {
            instance.encode(buf);
        }
    }
}

/// A player listed in the browser. Each `Some` field becomes one
/// flag-gated section, emitted in flag-bit order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchPlayer {
    pub guid: PlayerId,
    pub stats: Option<CharacterStats>,
    pub comment: Option<String>,
    pub is_leader: Option<bool>,
    pub group: Option<GroupId>,
    pub roles: Option<u8>,
    pub area_id: Option<u32>,
    pub status: Option<u8>,
    pub instance: Option<InstanceProgress>,
}

impl SearchPlayer {
    pub fn flags(&self) -> u32 {
        use search_flags::*;

        [
            (self.stats.is_some(), CHARACTER_INFO),
            (self.comment.is_some(), COMMENT),
            (self.is_leader.is_some(), GROUP_LEADER),
            (self.group.is_some(), GROUP_GUID),
            (self.roles.is_some(), ROLES),
            (self.area_id.is_some(), AREA),
            (self.status.is_some(), STATUS),
            (self.instance.is_some(), INSTANCE),
        ]
        .into_iter()
        .filter(|(present, _)| *present)
        .fold(0, |flags, (_, bit)| flags | bit)
    }

    fn wire_size(&self) -> usize {
        let mut size = 8 + 4;
        if self.stats.is_some() {
            size += CharacterStats::SIZE;
        }
        if let Some(comment) = &self.comment {
            size += cstring_size(comment);
        }
        if self.is_leader.is_some() {
            size += 1;
        }
        if self.group.is_some() {
            size += 8;
        }
        if self.roles.is_some() {
            size += 1;
        }
        if self.area_id.is_some() {
            size += 4;
        }
        if self.status.is_some() {
            size += 1;
        }
        if self.instance.is_some() {
            size += InstanceProgress::SIZE;
        }
        size
    }

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u64_le(self.guid.0);
        buf.put_u32_le(self.flags());
        if let Some(stats) = &self.stats {
            stats.encode(buf);
        }
        if let Some(comment) = &self.comment {
            put_cstring(buf, comment);
        }
        if let Some(is_leader) = self.is_leader {
            buf.put_u8(u8::from(is_leader));
        }
        if let Some(group) = self.group {
            buf.put_u64_le(group.0);
        }
        if let Some(roles) = self.roles {
            buf.put_u8(roles);
        }
        if let Some(area_id) = self.area_id {
            buf.put_u32_le(area_id);
        }
        if let Some(status) = self.status {
            buf.put_u8(status);
        }
        if let Some(instance) = &self.instance {
            instance.encode(buf);
        }
    }
}

/// `SMSG_LFG_SEARCH_RESULTS`: the raid/dungeon browser listing.
///
/// ```text
/// u32 type | u32 dungeon | u8 has_guids [u32 n | u64 × n]
/// u32 groups | u32 groups | group × groups
/// u32 players | u32 players | player × players
/// ```
///
/// Both counts of each pair are the number of entries actually encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults {
    pub search: DungeonEntry,
    /// Guids removed from the listing since the last update.
    pub removed: Option<Vec<u64>>,
    pub groups: Vec<SearchGroup>,
    pub players: Vec<SearchPlayer>,
}

impl ServerMessage for SearchResults {
    fn opcode(&self) -> Opcode {
        Opcode::SmsgLfgSearchResults
    }

    fn wire_size(&self) -> usize {
        let mut size = 4 + 4 + 1;
        if let Some(removed) = &self.removed {
            size += 4 + 8 * removed.len();
        }
        size += 8 + self.groups.iter().map(SearchGroup::wire_size).sum::<usize>();
        size += 8 + self.players.iter().map(SearchPlayer::wire_size).sum::<usize>();
        size
    }

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u32_le(u32::from(self.search.type_code()));
        buf.put_u32_le(self.search.id().get());

        match &self.removed {
            Some(removed) => {
                buf.put_u8(1);
                buf.put_u32_le(removed.len() as u32);
                for guid in removed {
                    buf.put_u64_le(*guid);
                }
            }
            None => buf.put_u8(0),
        }

        let groups = self.groups.len() as u32;
        buf.put_u32_le(groups);
        buf.put_u32_le(groups);
        for group in &self.groups {
            group.encode(buf);
        }

        let players = self.players.len() as u32;
        buf.put_u32_le(players);
        buf.put_u32_le(players);
        for player in &self.players {
            player.encode(buf);
        }
    }
}
