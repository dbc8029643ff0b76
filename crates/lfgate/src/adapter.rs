//! Per-session request handling: decode, call the engine, encode.
//!
//! The flow for every inbound LFG packet is:
//!   1. Decode the body into a [`ClientRequest`]
//!   2. Check preconditions (grouped?) against the world view
//!   3. Call the matchmaking engine if the request needs it
//!   4. Encode zero or more reply packets
//!
//! Nothing is remembered between packets. A request whose precondition
//! doesn't hold (party info while ungrouped, for instance) produces no
//! reply; that is what the client expects, so it is not an error.

use std::sync::Arc;

use lfgate_engine::{JoinVerdict, MatchmakingEngine, PlayerSnapshot, PrototypeStore, WorldView};
use lfgate_protocol::{
    AvailableDungeon, CharacterStats, ClientRequest, DungeonEntry, InstanceProgress, JoinRequest,
    JoinResult, PartyInfo, PartyLockMap, PlayerId, PlayerInfo, PlayerStatusUpdate, QueueStatus,
    QueueWaitEstimate, RoleMask, SearchGroup, SearchPlayer, SearchResults, StatusUpdate,
    WorldPacket,
};

use crate::{AdapterConfig, LfgError, RewardResolver, StatusFlagResolver};

/// Translates between LFG packets and the matchmaking engine for one
/// server.
///
/// Holds shared handles to the engine, the world view and the
/// prototype store; clone the `Arc`s into as many adapters as there are
/// sessions, or share one adapter.
pub struct ProtocolAdapter<E, W, S> {
    engine: Arc<E>,
    world: Arc<W>,
    store: Arc<S>,
    config: AdapterConfig,
}

impl<E, W, S> ProtocolAdapter<E, W, S>
where
    E: MatchmakingEngine,
    W: WorldView,
    S: PrototypeStore,
{
    pub fn new(engine: Arc<E>, world: Arc<W>, store: Arc<S>, config: AdapterConfig) -> Self {
        Self {
            engine,
            world,
            store,
            config,
        }
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Handles one inbound packet from `player`'s session.
    ///
    /// Returns the packets to send back to that session, in order.
    ///
    /// # Errors
    /// - [`LfgError::Protocol`] if the packet does not decode; nothing
    ///   reaches the engine in that case.
    /// - [`LfgError::PlayerNotFound`] if the request needs the player's
    ///   world state and the player is gone.
    pub fn handle(
        &self,
        player: PlayerId,
        packet: &WorldPacket,
    ) -> Result<Vec<WorldPacket>, LfgError> {
        let opcode = packet.opcode();
        tracing::debug!(%player, %opcode, len = packet.len(), "lfg request");

        let request = match ClientRequest::decode(opcode, packet.body()) {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!(%player, %opcode, error = %e, "failed to decode lfg request");
                return Err(e.into());
            }
        };

        self.dispatch(player, request)
    }

    /// Handles an already decoded request.
    pub fn dispatch(
        &self,
        player: PlayerId,
        request: ClientRequest,
    ) -> Result<Vec<WorldPacket>, LfgError> {
        let replies = match request {
            ClientRequest::Join(join) => self.join(player, join),

            ClientRequest::Leave => {
                self.leave(player)?;
                Vec::new()
            }

            ClientRequest::SearchJoin { entry } => self.search_join(player, entry)?,

            ClientRequest::SearchLeave { join_id } => {
                tracing::debug!(%player, join_id, "left lfg search");
                Vec::new()
            }

            ClientRequest::SetComment { comment } => {
                tracing::debug!(%player, %comment, "lfg comment");
                Vec::new()
            }

            ClientRequest::GetPlayerInfo => {
                let me = self.player(player)?;
                vec![WorldPacket::build(&self.player_info(&me))]
            }

            ClientRequest::GetPartyInfo => {
                let me = self.player(player)?;
                match self.party_info(&me) {
                    Some(info) => vec![WorldPacket::build(&info)],
                    None => {
                        tracing::debug!(%player, "party info requested while ungrouped");
                        Vec::new()
                    }
                }
            }

            ClientRequest::SetRoles { roles } => {
                self.set_roles(player, roles)?;
                Vec::new()
            }

            ClientRequest::GetStatus => {
                tracing::debug!(%player, "lfg status requested; no status reply is sent");
                Vec::new()
            }
        };

        Ok(replies)
    }

    // -----------------------------------------------------------------------
    // Server-initiated packets
    // -----------------------------------------------------------------------

    /// Builds `SMSG_LFG_UPDATE_PLAYER` (or `_PARTY`) for a status push,
    /// deriving the presentation flags from the update.
    pub fn status_update(&self, party: bool, status: PlayerStatusUpdate) -> WorldPacket {
        let flags = StatusFlagResolver::resolve(party, status.update_type, status.state);
        WorldPacket::build(&StatusUpdate::new(party, status, flags))
    }

    /// Builds `SMSG_LFG_JOIN_RESULT` for an engine verdict.
    pub fn join_result(&self, verdict: &JoinVerdict) -> WorldPacket {
        WorldPacket::build(&JoinResult {
            code: verdict.code,
            state: verdict.state,
            party_locks: verdict.party_locks.clone(),
        })
    }

    /// Builds `SMSG_LFG_QUEUE_STATUS`.
    pub fn queue_status(&self, estimate: QueueWaitEstimate) -> WorldPacket {
        WorldPacket::build(&QueueStatus(estimate))
    }

    // -----------------------------------------------------------------------
    // Request handlers
    // -----------------------------------------------------------------------

    fn player(&self, id: PlayerId) -> Result<PlayerSnapshot, LfgError> {
        self.world.player(id).ok_or(LfgError::PlayerNotFound(id))
    }

    fn join(&self, player: PlayerId, join: JoinRequest) -> Vec<WorldPacket> {
        tracing::debug!(
            %player,
            roles = join.roles.bits(),
            dungeons = join.dungeons.len(),
            "joining lfg queue"
        );

        let outcome = self
            .engine
            .join_queue(join.roles, &join.dungeons, &join.comment, player);

        let mut replies = Vec::with_capacity(1 + outcome.updates.len());
        if let Some(verdict) = &outcome.verdict {
            replies.push(self.join_result(verdict));
        }
        for push in outcome.updates {
            replies.push(self.status_update(push.party, push.status));
        }
        replies
    }

    /// Every leave goes to the engine with the player's current group;
    /// who may take a group out is the engine's call.
    fn leave(&self, player: PlayerId) -> Result<(), LfgError> {
        let me = self.player(player)?;
        tracing::debug!(%player, group = ?me.group, "leaving lfg queue");
        self.engine.leave_queue(player, me.group);
        Ok(())
    }

    fn set_roles(&self, player: PlayerId, roles: RoleMask) -> Result<(), LfgError> {
        let me = self.player(player)?;
        match me.group {
            Some(group) => self.engine.role_check(player, group, roles),
            None => tracing::debug!(%player, "role check answered while ungrouped"),
        }
        Ok(())
    }

    fn player_info(&self, me: &PlayerSnapshot) -> PlayerInfo {
        let resolver = RewardResolver::new(
            self.engine.as_ref(),
            self.store.as_ref(),
            self.config.special_heroic_reward,
        );

        let available = self
            .engine
            .eligible_dungeons(me.level, me.expansion)
            .into_iter()
            .map(|eligible| {
                let dungeon_type = self.engine.dungeon_type(eligible.dungeon);
                let done_today = self.engine.daily_completion(me.id, dungeon_type);
                AvailableDungeon {
                    entry: eligible.entry,
                    reward: resolver.resolve(eligible.dungeon, dungeon_type, me.level, done_today),
                }
            })
            .collect();

        PlayerInfo {
            available,
            locked: self.engine.ineligible_dungeons(me.id),
        }
    }

    /// Locks of every other member still in the world, or `None` when
    /// the player has no group.
    fn party_info(&self, me: &PlayerSnapshot) -> Option<PartyInfo> {
        let group = me.group?;

        let members: PartyLockMap = self
            .world
            .group_members(group)
            .into_iter()
            .filter(|&member| member != me.id)
            .filter(|&member| self.world.player(member).is_some())
            .map(|member| (member, self.engine.ineligible_dungeons(member)))
            .collect();

        Some(PartyInfo { members })
    }

    fn search_join(
        &self,
        player: PlayerId,
        entry: DungeonEntry,
    ) -> Result<Vec<WorldPacket>, LfgError> {
        tracing::debug!(
            %player,
            dungeon = %entry.id(),
            search_type = entry.type_code(),
            "joined lfg search"
        );
        if !self.config.search.enabled {
            return Ok(Vec::new());
        }

        let me = self.player(player)?;
        let results = self.search_results(&me, entry);
        Ok(vec![WorldPacket::build(&results)])
    }

    /// Lists every in-world player of the requester's team.
    fn search_results(&self, me: &PlayerSnapshot, search: DungeonEntry) -> SearchResults {
        let groups = if self.config.search.placeholder_group {
            vec![SearchGroup::placeholder()]
        } else {
            Vec::new()
        };

        let players = self
            .world
            .online_players()
            .into_iter()
            .filter_map(|id| self.world.player(id))
            .filter(|other| other.team == me.team && other.in_world)
            .map(|other| self.search_player(&other))
            .collect();

        SearchResults {
            search,
            removed: None,
            groups,
            players,
        }
    }

    fn search_player(&self, player: &PlayerSnapshot) -> SearchPlayer {
        let is_leader = player
            .group
            .map(|group| self.world.group_leader(group) == Some(player.id));

        SearchPlayer {
            guid: player.id,
            stats: Some(CharacterStats {
                level: player.level,
                class: player.class,
                race: player.race,
                ..CharacterStats::default()
            }),
            comment: Some(String::new()),
            is_leader,
            group: player.group,
            roles: Some(0),
            area_id: Some(player.zone_id),
            status: Some(0),
            instance: Some(InstanceProgress::default()),
        }
    }
}
