//! Presentation flags for LFG status updates.
//!
//! The client shows two booleans next to a status update: "queued" and,
//! for groups, "joined LFG". Neither is stored anywhere; both are
//! derived from the update type and the matchmaking state.

use lfgate_protocol::{LfgState, LfgUpdateType, StatusFlags};

/// Derives [`StatusFlags`] from an `(update type, state)` pair.
///
/// Every pair maps to a defined result; anything not listed below
/// yields `false` for both flags.
///
/// | update type     | state              | is_queued | join_lfg (party) |
/// |-----------------|--------------------|-----------|------------------|
/// | `Join`          | any                | true      | false            |
/// | `AddedToQueue`  | any                | true      | true             |
/// | `ProposalBegin` | any                | false     | true             |
/// | `Status`        | `Queued`           | true      | true             |
/// | `Status`        | `Rolecheck`/`None` | false     | false            |
/// | `Status`        | other              | false     | true             |
/// | other           | any                | false     | false            |
///
/// `join_lfg` is only sent in the party variant and is always `false`
/// for a single player.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusFlagResolver;

impl StatusFlagResolver {
    pub fn resolve(party: bool, update_type: LfgUpdateType, state: LfgState) -> StatusFlags {
        let (is_queued, join_lfg) = match (update_type, state) {
            (LfgUpdateType::Join, _) => (true, false),
            (LfgUpdateType::AddedToQueue, _) => (true, true),
            (LfgUpdateType::ProposalBegin, _) => (false, true),
            (LfgUpdateType::Status, LfgState::Queued) => (true, true),
            (LfgUpdateType::Status, LfgState::Rolecheck | LfgState::None) => (false, false),
            (LfgUpdateType::Status, _) => (false, true),
            _ => (false, false),
        };

        StatusFlags {
            is_queued,
            join_lfg: party && join_lfg,
        }
    }
}
