//! Per-dungeon reward snapshots for `SMSG_LFG_PLAYER_INFO`.

use lfgate_engine::{MatchmakingEngine, PrototypeStore};
use lfgate_protocol::{BonusItem, DungeonId, DungeonRewardSnapshot, DungeonType, ItemReward};

/// Computes what a player would earn for completing a dungeon now.
///
/// Gold and experience are the level's base rewards, doubled for the
/// first completion of the day. The bonus item takes one of three paths:
///
/// 1. not done today: the engine's configured item for the dungeon;
/// 2. done today, and the dungeon is a Wrath heroic: the special
///    heroic item from the config;
/// 3. anything else: no item.
///
/// In both item paths the item is only offered if its prototype
/// resolves. Nothing here is cached; `done_today` comes from the caller
/// on every call.
pub struct RewardResolver<'a, E: ?Sized, S: ?Sized> {
    engine: &'a E,
    store: &'a S,
    special_heroic: ItemReward,
}

impl<'a, E, S> RewardResolver<'a, E, S>
where
    E: MatchmakingEngine + ?Sized,
    S: PrototypeStore + ?Sized,
{
    pub fn new(engine: &'a E, store: &'a S, special_heroic: ItemReward) -> Self {
        Self {
            engine,
            store,
            special_heroic,
        }
    }

    pub fn resolve(
        &self,
        dungeon: DungeonId,
        dungeon_type: DungeonType,
        player_level: u8,
        done_today: bool,
    ) -> DungeonRewardSnapshot {
        let base = self.store.base_rewards(player_level).unwrap_or_else(|| {
            tracing::warn!(player_level, "no dungeon finder rewards for level");
            Default::default()
        });
        let multiplier = if done_today { 1 } else { 2 };

        let bonus_item = if !done_today {
            self.engine
                .item_reward(dungeon, dungeon_type)
                .and_then(|reward| self.bonus_item(reward))
        } else if dungeon_type == DungeonType::WotlkHeroic {
            self.bonus_item(self.special_heroic)
        } else {
            None
        };

        DungeonRewardSnapshot {
            dungeon,
            done_today,
            gold: base.monetary.saturating_mul(multiplier),
            xp: base.xp.saturating_mul(multiplier),
            bonus_item,
        }
    }

    fn bonus_item(&self, reward: ItemReward) -> Option<BonusItem> {
        let Some(proto) = self.store.item_prototype(reward.item_id) else {
            tracing::debug!(item_id = reward.item_id, "reward item prototype not found");
            return None;
        };
        Some(BonusItem {
            item_id: reward.item_id,
            display_id: proto.display_id,
            amount: reward.amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeEngine, FakeStore};

    const SPECIAL: ItemReward = ItemReward {
        item_id: 47241,
        amount: 2,
    };

    fn fixture() -> (FakeEngine, FakeStore) {
        let mut engine = FakeEngine::default();
        engine.item_rewards.insert(
            DungeonId::new(100),
            ItemReward {
                item_id: 49426,
                amount: 3,
            },
        );
        // Item with no prototype.
        engine.item_rewards.insert(
            DungeonId::new(200),
            ItemReward {
                item_id: 99999,
                amount: 1,
            },
        );

        let mut store = FakeStore::default();
        store.rewards.insert(80, (1000, 5000));
        store.items.insert(49426, 64062);
        store.items.insert(47241, 62981);
        (engine, store)
    }

    #[test]
    fn test_first_completion_doubles_base() {
        let (engine, store) = fixture();
        let resolver = RewardResolver::new(&engine, &store, SPECIAL);

        let r = resolver.resolve(DungeonId::new(100), DungeonType::Wotlk, 80, false);
        assert_eq!(r.gold, 2000);
        assert_eq!(r.xp, 10000);
        assert!(!r.done_today);
    }

    #[test]
    fn test_repeat_completion_uses_base() {
        let (engine, store) = fixture();
        let resolver = RewardResolver::new(&engine, &store, SPECIAL);

        for ty in [DungeonType::Wotlk, DungeonType::WotlkHeroic, DungeonType::Classic] {
            let r = resolver.resolve(DungeonId::new(100), ty, 80, true);
            assert_eq!((r.gold, r.xp), (1000, 5000), "{ty:?}");
        }
    }

    #[test]
    fn test_first_completion_offers_configured_item() {
        let (engine, store) = fixture();
        let resolver = RewardResolver::new(&engine, &store, SPECIAL);

        let r = resolver.resolve(DungeonId::new(100), DungeonType::Wotlk, 80, false);
        assert_eq!(
            r.bonus_item,
            Some(BonusItem {
                item_id: 49426,
                display_id: 64062,
                amount: 3,
            })
        );
    }

    #[test]
    fn test_unresolved_prototype_drops_item() {
        let (engine, store) = fixture();
        let resolver = RewardResolver::new(&engine, &store, SPECIAL);

        let r = resolver.resolve(DungeonId::new(200), DungeonType::Wotlk, 80, false);
        assert_eq!(r.bonus_item, None);
        assert_eq!(r.gold, 2000);
    }

    #[test]
    fn test_no_configured_item_drops_item() {
        let (engine, store) = fixture();
        let resolver = RewardResolver::new(&engine, &store, SPECIAL);

        let r = resolver.resolve(DungeonId::new(300), DungeonType::Tbc, 80, false);
        assert_eq!(r.bonus_item, None);
    }

    #[test]
    fn test_repeat_wotlk_heroic_offers_special_item() {
        let (engine, store) = fixture();
        let resolver = RewardResolver::new(&engine, &store, SPECIAL);

        let r = resolver.resolve(DungeonId::new(100), DungeonType::WotlkHeroic, 80, true);
        assert_eq!(
            r.bonus_item,
            Some(BonusItem {
                item_id: 47241,
                display_id: 62981,
                amount: 2,
            })
        );
    }

    #[test]
    fn test_repeat_wotlk_heroic_without_special_prototype() {
        let (engine, mut store) = fixture();
        store.items.remove(&47241);
        let resolver = RewardResolver::new(&engine, &store, SPECIAL);

        let r = resolver.resolve(DungeonId::new(100), DungeonType::WotlkHeroic, 80, true);
        assert_eq!(r.bonus_item, None);
    }

    #[test]
    fn test_repeat_other_types_never_offer_item() {
        let (engine, store) = fixture();
        let resolver = RewardResolver::new(&engine, &store, SPECIAL);

        for ty in [
            DungeonType::Classic,
            DungeonType::Tbc,
            DungeonType::TbcHeroic,
            DungeonType::Wotlk,
            DungeonType::Unknown,
        ] {
            let r = resolver.resolve(DungeonId::new(100), ty, 80, true);
            assert_eq!(r.bonus_item, None, "{ty:?}");
        }
    }

    #[test]
    fn test_missing_level_row_zeroes_rewards() {
        let (engine, store) = fixture();
        let resolver = RewardResolver::new(&engine, &store, SPECIAL);

        let r = resolver.resolve(DungeonId::new(100), DungeonType::Wotlk, 15, false);
        assert_eq!((r.gold, r.xp), (0, 0));
        assert!(r.bonus_item.is_some());
    }
}
