//! Read-only reward and item prototype store.

use serde::{Deserialize, Serialize};

/// Base dungeon-finder rewards for one character level, before the
/// first-of-the-day multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BaseRewards {
    pub monetary: u32,
    pub xp: u32,
}

/// The parts of an item prototype the LFG packets show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPrototype {
    pub entry: u32,
    pub display_id: u32,
}

/// Lookups into the persistent reward table and item catalog.
///
/// A miss is not an error: the adapter leaves the corresponding packet
/// section out.
pub trait PrototypeStore: Send + Sync + 'static {
    /// Base rewards for a character of `level`.
    fn base_rewards(&self, level: u8) -> Option<BaseRewards>;

    /// The prototype of item `entry`.
    fn item_prototype(&self, entry: u32) -> Option<ItemPrototype>;
}
