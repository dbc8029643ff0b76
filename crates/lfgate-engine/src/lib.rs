//! Ports to the systems the LFG adapter talks to but does not own.
//!
//! This crate is interfaces only:
//!
//! 1. **Matchmaking** — queue admission, role checks, eligibility and
//!    daily completion ([`MatchmakingEngine`])
//! 2. **World** — player and group accessors ([`WorldView`])
//! 3. **Prototypes** — reward table and item catalog ([`PrototypeStore`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Adapter (lfgate)  ← calls the ports, builds packets
//!     ↕
//! Ports (this crate)  ← traits implemented by the host server
//!     ↕
//! Protocol (lfgate-protocol)  ← provides PlayerId, DungeonId, LfgState, ...
//! ```

mod engine;
mod store;
mod world;

pub use engine::{EligibleDungeon, Expansion, JoinOutcome, JoinVerdict, MatchmakingEngine, StatusPush};
pub use store::{BaseRewards, ItemPrototype, PrototypeStore};
pub use world::{PlayerSnapshot, WorldView};
