//! In-memory port implementations for unit tests.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Mutex;

use lfgate_engine::{
    BaseRewards, EligibleDungeon, Expansion, ItemPrototype, JoinOutcome, MatchmakingEngine,
    PlayerSnapshot, PrototypeStore, WorldView,
};
use lfgate_protocol::{
    DungeonId, DungeonType, GroupId, ItemReward, LockedDungeon, PlayerId, RoleMask, Team,
};

/// A call the adapter made into the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum EngineCall {
    Join {
        roles: RoleMask,
        dungeons: BTreeSet<DungeonId>,
        comment: String,
        player: PlayerId,
    },
    Leave {
        player: PlayerId,
        group: Option<GroupId>,
    },
    RoleCheck {
        player: PlayerId,
        group: GroupId,
        roles: RoleMask,
    },
}

#[derive(Default)]
pub(crate) struct FakeEngine {
    pub eligible: Vec<EligibleDungeon>,
    pub locks: HashMap<PlayerId, Vec<LockedDungeon>>,
    pub done_today: HashSet<(PlayerId, DungeonType)>,
    pub types: HashMap<DungeonId, DungeonType>,
    pub item_rewards: HashMap<DungeonId, ItemReward>,
    pub join_outcome: JoinOutcome,
    pub calls: Mutex<Vec<EngineCall>>,
}

impl FakeEngine {
    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, call: EngineCall) {
        self.calls.lock().expect("calls lock").push(call);
    }
}

impl MatchmakingEngine for FakeEngine {
    fn join_queue(
        &self,
        roles: RoleMask,
        dungeons: &BTreeSet<DungeonId>,
        comment: &str,
        player: PlayerId,
    ) -> JoinOutcome {
        self.record(EngineCall::Join {
            roles,
            dungeons: dungeons.clone(),
            comment: comment.to_owned(),
            player,
        });
        self.join_outcome.clone()
    }

    fn leave_queue(&self, player: PlayerId, group: Option<GroupId>) {
        self.record(EngineCall::Leave { player, group });
    }

    fn role_check(&self, player: PlayerId, group: GroupId, roles: RoleMask) {
        self.record(EngineCall::RoleCheck {
            player,
            group,
            roles,
        });
    }

    fn eligible_dungeons(&self, _level: u8, _expansion: Expansion) -> Vec<EligibleDungeon> {
        self.eligible.clone()
    }

    fn ineligible_dungeons(&self, player: PlayerId) -> Vec<LockedDungeon> {
        self.locks.get(&player).cloned().unwrap_or_default()
    }

    fn daily_completion(&self, player: PlayerId, dungeon_type: DungeonType) -> bool {
        self.done_today.contains(&(player, dungeon_type))
    }

    fn dungeon_type(&self, dungeon: DungeonId) -> DungeonType {
        self.types.get(&dungeon).copied().unwrap_or(DungeonType::Unknown)
    }

    fn item_reward(&self, dungeon: DungeonId, _dungeon_type: DungeonType) -> Option<ItemReward> {
        self.item_rewards.get(&dungeon).copied()
    }
}

#[derive(Default)]
pub(crate) struct FakeStore {
    /// level → (monetary, xp)
    pub rewards: HashMap<u8, (u32, u32)>,
    /// item entry → display id
    pub items: HashMap<u32, u32>,
}

impl PrototypeStore for FakeStore {
    fn base_rewards(&self, level: u8) -> Option<BaseRewards> {
        self.rewards
            .get(&level)
            .map(|&(monetary, xp)| BaseRewards { monetary, xp })
    }

    fn item_prototype(&self, entry: u32) -> Option<ItemPrototype> {
        self.items.get(&entry).map(|&display_id| ItemPrototype {
            entry,
            display_id,
        })
    }
}

#[derive(Default)]
pub(crate) struct FakeWorld {
    pub players: HashMap<PlayerId, PlayerSnapshot>,
    /// group → (leader, members); members may name players that are
    /// no longer in `players`.
    pub groups: HashMap<GroupId, (PlayerId, Vec<PlayerId>)>,
    pub online: Vec<PlayerId>,
}

impl FakeWorld {
    pub fn add_player(&mut self, id: u64, team: Team, group: Option<GroupId>) -> PlayerId {
        let id = PlayerId(id);
        self.players.insert(
            id,
            PlayerSnapshot {
                id,
                level: 80,
                class: 1,
                race: 1,
                team,
                zone_id: 4395,
                in_world: true,
                group,
                expansion: Expansion::Wotlk,
            },
        );
        self.online.push(id);
        id
    }
}

impl WorldView for FakeWorld {
    fn player(&self, id: PlayerId) -> Option<PlayerSnapshot> {
        self.players.get(&id).cloned()
    }

    fn group_members(&self, group: GroupId) -> Vec<PlayerId> {
        self.groups
            .get(&group)
            .map(|(_, members)| members.clone())
            .unwrap_or_default()
    }

    fn group_leader(&self, group: GroupId) -> Option<PlayerId> {
        self.groups.get(&group).map(|(leader, _)| *leader)
    }

    fn online_players(&self) -> Vec<PlayerId> {
        self.online.clone()
    }
}
