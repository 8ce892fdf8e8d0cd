//! Ledger event journal entries.

use serde::Serialize;
use tide_core::types::{Amount, HolderId, Rate, Timestamp};

/// Something observable happened on the ledger.
///
/// Events are appended in operation order. A failed operation appends nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    RateChanged {
        by: HolderId,
        previous: Rate,
        current: Rate,
        at: Timestamp,
    },
    HolderRateFrozen {
        holder: HolderId,
        rate: Rate,
        at: Timestamp,
    },
    InterestSettled {
        holder: HolderId,
        amount: Amount,
        at: Timestamp,
    },
    Minted {
        to: HolderId,
        amount: Amount,
        at: Timestamp,
    },
    Burned {
        from: HolderId,
        amount: Amount,
        at: Timestamp,
    },
    Transferred {
        from: HolderId,
        to: HolderId,
        amount: Amount,
        at: Timestamp,
    },
    Approval {
        owner: HolderId,
        spender: HolderId,
        amount: Amount,
    },
}
