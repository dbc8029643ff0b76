//! Scripted LFG session against an in-memory host server.
//!
//! Plays a handful of client requests through a [`ProtocolAdapter`] and
//! prints every reply as hex. Set `RUST_LOG=debug` to see the adapter's
//! per-request logging.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use bytes::{BufMut, BytesMut};
use lfgate::prelude::*;

// ---------------------------------------------------------------------------
// In-memory host server
// ---------------------------------------------------------------------------

const NEXUS: u32 = 226;
const HEROIC_NEXUS: u32 = 227;

/// Queues everyone who asks and remembers their dungeons.
#[derive(Default)]
struct MemoryEngine {
    queued: Mutex<HashMap<PlayerId, BTreeSet<DungeonId>>>,
}

impl MatchmakingEngine for MemoryEngine {
    fn join_queue(
        &self,
        roles: RoleMask,
        dungeons: &BTreeSet<DungeonId>,
        comment: &str,
        player: PlayerId,
    ) -> JoinOutcome {
        if roles.is_empty() || dungeons.is_empty() {
            return JoinOutcome {
                verdict: Some(JoinVerdict {
                    code: JoinResultCode::Failed,
                    state: LfgState::None,
                    party_locks: Default::default(),
                }),
                updates: Vec::new(),
            };
        }

        if let Ok(mut queued) = self.queued.lock() {
            queued.insert(player, dungeons.clone());
        }

        let status = |update_type| PlayerStatusUpdate {
            update_type,
            state: LfgState::Queued,
            dungeons: dungeons.clone(),
            comment: comment.to_owned(),
        };
        JoinOutcome {
            verdict: Some(JoinVerdict {
                code: JoinResultCode::Ok,
                state: LfgState::Queued,
                party_locks: Default::default(),
            }),
            updates: vec![
                StatusPush {
                    party: false,
                    status: status(LfgUpdateType::Join),
                },
                StatusPush {
                    party: false,
                    status: status(LfgUpdateType::AddedToQueue),
                },
            ],
        }
    }

    fn leave_queue(&self, player: PlayerId, _group: Option<GroupId>) {
        if let Ok(mut queued) = self.queued.lock() {
            queued.remove(&player);
        }
    }

    fn role_check(&self, player: PlayerId, group: GroupId, roles: RoleMask) {
        tracing::info!(%player, %group, roles = roles.bits(), "role check");
    }

    fn eligible_dungeons(&self, level: u8, _expansion: Expansion) -> Vec<EligibleDungeon> {
        if level < 68 {
            return Vec::new();
        }
        [(NEXUS, 1), (HEROIC_NEXUS, 5)]
            .into_iter()
            .map(|(id, lfg_type)| EligibleDungeon {
                dungeon: DungeonId::new(id),
                entry: DungeonEntry::pack(DungeonId::new(id), lfg_type),
            })
            .collect()
    }

    fn ineligible_dungeons(&self, _player: PlayerId) -> Vec<LockedDungeon> {
        vec![LockedDungeon {
            dungeon: DungeonId::new(285),
            reason: 1001,
        }]
    }

    fn daily_completion(&self, _player: PlayerId, dungeon_type: DungeonType) -> bool {
        dungeon_type == DungeonType::WotlkHeroic
    }

    fn dungeon_type(&self, dungeon: DungeonId) -> DungeonType {
        match dungeon.get() {
            NEXUS => DungeonType::Wotlk,
            HEROIC_NEXUS => DungeonType::WotlkHeroic,
            _ => DungeonType::Unknown,
        }
    }

    fn item_reward(&self, _dungeon: DungeonId, _dungeon_type: DungeonType) -> Option<ItemReward> {
        Some(ItemReward {
            item_id: 49426,
            amount: 1,
        })
    }
}

struct MemoryWorld {
    players: Vec<PlayerSnapshot>,
}

impl WorldView for MemoryWorld {
    fn player(&self, id: PlayerId) -> Option<PlayerSnapshot> {
        self.players.iter().find(|p| p.id == id).cloned()
    }

    fn group_members(&self, _group: GroupId) -> Vec<PlayerId> {
        Vec::new()
    }

    fn group_leader(&self, _group: GroupId) -> Option<PlayerId> {
        None
    }

    fn online_players(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id).collect()
    }
}

struct MemoryStore;

impl PrototypeStore for MemoryStore {
    fn base_rewards(&self, level: u8) -> Option<BaseRewards> {
        Some(BaseRewards {
            monetary: u32::from(level) * 1_850,
            xp: if level < 80 { u32::from(level) * 400 } else { 0 },
        })
    }

    fn item_prototype(&self, entry: u32) -> Option<ItemPrototype> {
        let display_id = match entry {
            49426 => 64062,
            47241 => 62981,
            _ => return None,
        };
        Some(ItemPrototype { entry, display_id })
    }
}

fn snapshot(id: u64, team: Team) -> PlayerSnapshot {
    PlayerSnapshot {
        id: PlayerId(id),
        level: 80,
        class: 2,
        race: 1,
        team,
        zone_id: 4395,
        in_world: true,
        group: None,
        expansion: Expansion::Wotlk,
    }
}

// ---------------------------------------------------------------------------
// Client requests
// ---------------------------------------------------------------------------

fn join_body(roles: RoleMask, entries: &[u32], comment: &str) -> BytesMut {
    let mut body = BytesMut::new();
    body.put_u32_le(roles.bits());
    body.put_bytes(0, 2);
    body.put_u8(entries.len() as u8);
    for entry in entries {
        body.put_u32_le(*entry);
    }
    body.put_u8(3);
    body.put_bytes(0, 3);
    body.put_slice(comment.as_bytes());
    body.put_u8(0);
    body
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn main() {
    init_tracing();

    let me = PlayerId(0x10);
    let adapter = ProtocolAdapter::new(
        Arc::new(MemoryEngine::default()),
        Arc::new(MemoryWorld {
            players: vec![
                snapshot(me.0, Team::Alliance),
                snapshot(0x11, Team::Alliance),
                snapshot(0x12, Team::Horde),
            ],
        }),
        Arc::new(MemoryStore),
        AdapterConfig::default(),
    );

    let heroic_nexus = DungeonEntry::pack(DungeonId::new(HEROIC_NEXUS), 5).0;
    let script = [
        (Opcode::CmsgLfgGetPlayerInfo, BytesMut::new()),
        (
            Opcode::CmsgLfgJoin,
            join_body(RoleMask::TANK | RoleMask::DAMAGE, &[heroic_nexus], "lf healer"),
        ),
        (Opcode::CmsgSearchLfgJoin, BytesMut::from(&heroic_nexus.to_le_bytes()[..])),
        (Opcode::CmsgLfgGetPartyInfo, BytesMut::new()),
        (Opcode::CmsgLfgLeave, BytesMut::new()),
        // Truncated: count claims two entries.
        (Opcode::CmsgLfgJoin, BytesMut::from(&[2u8, 0, 0, 0, 0, 0, 2][..])),
    ];

    for (opcode, body) in script {
        let packet = WorldPacket::new(opcode, body.freeze());
        println!("> {opcode} [{}]", hex(packet.body()));

        match adapter.handle(me, &packet) {
            Ok(replies) if replies.is_empty() => println!("  (no reply)"),
            Ok(replies) => {
                for reply in replies {
                    println!("< {} [{}]", reply.opcode(), hex(reply.body()));
                }
            }
            Err(e) => tracing::warn!(%opcode, error = %e, "request rejected"),
        }
    }

    let estimate = QueueWaitEstimate {
        dungeon: DungeonId::new(HEROIC_NEXUS),
        player_avg_wait_ms: -1,
        avg_wait_ms: 90_000,
        tank_avg_wait_ms: 15_000,
        healer_avg_wait_ms: 120_000,
        dps_avg_wait_ms: 300_000,
        needed_tanks: 0,
        needed_heals: 1,
        needed_dps: 2,
        time_in_queue_ms: 42_000,
    };
    let push = adapter.queue_status(estimate);
    println!("< {} [{}]", push.opcode(), hex(push.body()));
}
