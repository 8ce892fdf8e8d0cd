//! Settlement: turning accrued interest into raw balance.
//!
//! Settlement is split into a read-only [`quote`](SettlementCoordinator::quote)
//! and a mutating [`apply`](SettlementCoordinator::apply) so callers can
//! validate a whole operation before changing any state.

use tide_accrual::elapsed_since;
use tide_core::error::{AccrualError, TideError};
use tide_core::traits::{AccrualCalculator, RawLedger};
use tide_core::types::{Amount, HolderId, Timestamp};

use crate::registry::RateRegistry;

/// Interest owed to one holder at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    pub holder: HolderId,
    pub accrued: Amount,
    pub at: Timestamp,
}

/// Quotes and materializes accrued interest using an [`AccrualCalculator`].
#[derive(Debug, Clone, Default)]
pub struct SettlementCoordinator<A> {
    engine: A,
}

impl<A: AccrualCalculator> SettlementCoordinator<A> {
    pub fn new(engine: A) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &A {
        &self.engine
    }

    /// Interest `holder` would receive if settled at `now`. No side effects.
    pub fn quote<L: RawLedger + ?Sized>(
        &self,
        raw: &L,
        registry: &RateRegistry,
        holder: &HolderId,
        now: Timestamp,
    ) -> Result<Settlement, TideError> {
        let record = registry.record(holder);
        let elapsed = elapsed_since(record.last_settled, now);
        let accrued = self.engine.accrued_interest(
            raw.raw_balance_of(holder),
            record.rate.unwrap_or(0),
            elapsed,
        )?;
        Ok(Settlement {
            holder: *holder,
            accrued,
            at: now,
        })
    }

    /// Credit a quoted settlement and advance the holder's baseline.
    ///
    /// The quote must have been taken against the current state.
    pub fn apply<L: RawLedger + ?Sized>(
        &self,
        raw: &mut L,
        registry: &mut RateRegistry,
        settlement: &Settlement,
    ) -> Result<(), TideError> {
        if settlement.accrued > 0 {
            raw.credit(&settlement.holder, settlement.accrued)?;
        }
        registry.mark_settled(&settlement.holder, settlement.at);
        Ok(())
    }

    /// Quote and apply in one step. Settling twice at the same `now` credits nothing the second time.
    pub fn settle<L: RawLedger + ?Sized>(
        &self,
        raw: &mut L,
        registry: &mut RateRegistry,
        holder: &HolderId,
        now: Timestamp,
    ) -> Result<Settlement, TideError> {
        let settlement = self.quote(raw, registry, holder, now)?;
        self.apply(raw, registry, &settlement)?;
        Ok(settlement)
    }

    /// Raw balance plus interest accrued up to `now`, without settling.
    pub fn display_balance<L: RawLedger + ?Sized>(
        &self,
        raw: &L,
        registry: &RateRegistry,
        holder: &HolderId,
        now: Timestamp,
    ) -> Result<Amount, TideError> {
        let settlement = self.quote(raw, registry, holder, now)?;
        raw.raw_balance_of(holder)
            .checked_add(settlement.accrued)
            .ok_or_else(|| AccrualError::ArithmeticOverflow.into())
    }
}
