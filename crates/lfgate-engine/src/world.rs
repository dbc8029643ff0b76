//! Read-only view of the world's players and groups.

use lfgate_protocol::{GroupId, PlayerId, Team};

use crate::Expansion;

/// What the adapter needs to know about one player, copied out of the
/// world at lookup time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub level: u8,
    pub class: u8,
    pub race: u8,
    pub team: Team,
    pub zone_id: u32,
    /// `false` while loading screens or logging out.
    pub in_world: bool,
    pub group: Option<GroupId>,
    pub expansion: Expansion,
}

/// Accessors into the world/player object model.
///
/// Players and groups can disappear between two calls (logout, kick,
/// disband). Lookups return `None` for those and the adapter skips them
/// rather than failing.
pub trait WorldView: Send + Sync + 'static {
    /// Looks up a player by guid.
    fn player(&self, id: PlayerId) -> Option<PlayerSnapshot>;

    /// Current members of a group, leader included.
    fn group_members(&self, group: GroupId) -> Vec<PlayerId>;

    /// The group's leader, if the group still exists.
    fn group_leader(&self, group: GroupId) -> Option<PlayerId>;

    /// Every player currently online, any faction.
    fn online_players(&self) -> Vec<PlayerId>;
}
