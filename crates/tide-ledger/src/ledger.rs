//! The public ledger: every operation settles the holders it touches first.
//!
//! Each mutating call reads the clock once, validates against read-only
//! settlement quotes, and only then mutates. A rejected call leaves balances,
//! rates, settlement times, and the event journal exactly as they were.

use tide_accrual::AccrualEngine;
use tide_core::auth::RateAdmin;
use tide_core::error::{AccrualError, LedgerError, TideError};
use tide_core::raw_ledger::MemoryRawLedger;
use tide_core::traits::{AccrualCalculator, Clock, RawLedger};
use tide_core::types::{Amount, HolderId, HolderState, Rate, Timestamp, TransferAmount};
use tracing::{debug, info, warn};

use crate::config::LedgerConfig;
use crate::events::LedgerEvent;
use crate::registry::RateRegistry;
use crate::settlement::{Settlement, SettlementCoordinator};

/// A ledger backed by [`MemoryRawLedger`] and the default [`AccrualEngine`].
pub type MemoryLedger<C> = InterestLedger<MemoryRawLedger, AccrualEngine, C>;

/// Interest-accruing token ledger.
///
/// Composes raw bookkeeping (`L`), the accrual math (`A`), and a time
/// source (`C`). Raw balances never include unsettled interest; the
/// display balance does.
///
/// Every successful operation appends to an in-memory event journal that is
/// only emptied by [`drain_events`](Self::drain_events). A long-lived ledger
/// must drain it periodically or the journal grows without bound.
pub struct InterestLedger<L, A, C> {
    raw: L,
    registry: RateRegistry,
    settlement: SettlementCoordinator<A>,
    clock: C,
    events: Vec<LedgerEvent>,
    /// Latest clock reading seen by a mutating call.
    last_seen: Timestamp,
}

impl<C: Clock> MemoryLedger<C> {
    /// Empty in-memory ledger.
    pub fn in_memory(config: LedgerConfig, clock: C) -> Result<Self, TideError> {
        Self::new(config, MemoryRawLedger::new(), AccrualEngine::new(), clock)
    }
}

impl<L: RawLedger, A: AccrualCalculator, C: Clock> InterestLedger<L, A, C> {
    pub fn new(config: LedgerConfig, raw: L, engine: A, clock: C) -> Result<Self, TideError> {
        let registry = RateRegistry::new(&config)?;
        info!(
            rate = registry.global_rate(),
            policy = ?registry.policy(),
            "ledger initialized"
        );
        let last_seen = clock.now();
        Ok(Self {
            raw,
            registry,
            settlement: SettlementCoordinator::new(engine),
            clock,
            events: Vec::new(),
            last_seen,
        })
    }

    // ------------------------------------------------------------------
    // Administration
    // ------------------------------------------------------------------

    /// Change the global rate. New holders freeze the new rate; existing
    /// holders keep theirs.
    ///
    /// # Errors
    ///
    /// - [`RateError::PolicyViolation`](tide_core::error::RateError::PolicyViolation)
    ///   if the configured policy forbids the move
    /// - [`RateError::AboveMaximum`](tide_core::error::RateError::AboveMaximum)
    pub fn set_interest_rate(&mut self, admin: &RateAdmin, new_rate: Rate) -> Result<(), TideError> {
        let now = self.tick();
        let previous = self.registry.set_global_rate(new_rate).inspect_err(|e| {
            warn!(by = %admin.caller(), attempted = new_rate, "rate change rejected: {e}");
        })?;
        info!(by = %admin.caller(), previous, current = new_rate, "interest rate changed");
        self.events.push(LedgerEvent::RateChanged {
            by: *admin.caller(),
            previous,
            current: new_rate,
            at: now,
        });
        Ok(())
    }

    // ------------------------------------------------------------------
    // Vault-facing operations
    // ------------------------------------------------------------------

    /// Credit `amount` to `to` after settling its accrued interest.
    ///
    /// A holder's first mint freezes the current global rate for them.
    pub fn mint(&mut self, to: &HolderId, amount: Amount) -> Result<(), TideError> {
        let now = self.tick();
        let settlement = self.quote(to, now)?;
        self.ensure_supply_headroom(&[settlement.accrued, amount])?;

        self.apply_settlement(&settlement)?;
        if !self.registry.is_seeded(to) {
            let rate = self.registry.global_rate();
            self.freeze(to, rate, now);
        }
        self.raw.credit(to, amount)?;

        info!(holder = %to, amount, "minted");
        self.events.push(LedgerEvent::Minted {
            to: *to,
            amount,
            at: now,
        });
        Ok(())
    }

    /// Debit `amount` (or everything) from `from`. Returns the amount burned.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InsufficientBalance`] if the display balance is smaller than `amount`
    pub fn burn(
        &mut self,
        from: &HolderId,
        amount: impl Into<TransferAmount>,
    ) -> Result<Amount, TideError> {
        let now = self.tick();
        let settlement = self.quote(from, now)?;
        let available = self.post_settlement_balance(&settlement)?;
        let amount = amount.into().resolve(available);
        if amount > available {
            return Err(LedgerError::InsufficientBalance {
                have: available,
                need: amount,
            }
            .into());
        }
        self.ensure_supply_headroom(&[settlement.accrued])?;

        self.apply_settlement(&settlement)?;
        self.raw.debit(from, amount)?;

        info!(holder = %from, amount, "burned");
        self.events.push(LedgerEvent::Burned {
            from: *from,
            amount,
            at: now,
        });
        Ok(amount)
    }

    // ------------------------------------------------------------------
    // Holder-facing operations
    // ------------------------------------------------------------------

    /// Move `amount` (or everything) from `from` to `to`. Returns the amount moved.
    ///
    /// A receiver holding nothing inherits the sender's frozen rate.
    pub fn transfer(
        &mut self,
        from: &HolderId,
        to: &HolderId,
        amount: impl Into<TransferAmount>,
    ) -> Result<Amount, TideError> {
        self.move_settled(None, from, to, amount.into())
    }

    /// As [`transfer`](Self::transfer), spending `spender`'s allowance over `from`.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InsufficientBalance`]
    /// - [`LedgerError::InsufficientAllowance`]
    pub fn transfer_from(
        &mut self,
        spender: &HolderId,
        from: &HolderId,
        to: &HolderId,
        amount: impl Into<TransferAmount>,
    ) -> Result<Amount, TideError> {
        self.move_settled(Some(spender), from, to, amount.into())
    }

    /// Let `spender` move up to `amount` of `owner`'s balance. `Amount::MAX` is unlimited.
    pub fn approve(&mut self, owner: &HolderId, spender: &HolderId, amount: Amount) {
        self.raw.approve(owner, spender, amount);
        debug!(%owner, %spender, amount, "approval set");
        self.events.push(LedgerEvent::Approval {
            owner: *owner,
            spender: *spender,
            amount,
        });
    }

    /// Materialize `holder`'s accrued interest now. Returns the amount credited.
    pub fn settle(&mut self, holder: &HolderId) -> Result<Amount, TideError> {
        let now = self.tick();
        let settlement = self.quote(holder, now)?;
        self.ensure_supply_headroom(&[settlement.accrued])?;
        self.apply_settlement(&settlement)?;
        Ok(settlement.accrued)
    }

    // ------------------------------------------------------------------
    // Queries (no settlement side effects)
    // ------------------------------------------------------------------

    pub fn interest_rate(&self) -> Rate {
        self.registry.global_rate()
    }

    /// Frozen rate of `holder`, zero if never seeded.
    pub fn user_interest_rate(&self, holder: &HolderId) -> Rate {
        self.registry.holder_rate(holder)
    }

    pub fn holder_state(&self, holder: &HolderId) -> HolderState {
        self.registry.holder_state(holder)
    }

    /// Raw balance, excluding unsettled interest.
    pub fn principal_balance_of(&self, holder: &HolderId) -> Amount {
        self.raw.raw_balance_of(holder)
    }

    /// Raw balance plus interest accrued up to now.
    pub fn display_balance_of(&self, holder: &HolderId) -> Result<Amount, TideError> {
        self.settlement
            .display_balance(&self.raw, &self.registry, holder, self.clock.now())
    }

    /// Alias of [`display_balance_of`](Self::display_balance_of).
    pub fn balance_of(&self, holder: &HolderId) -> Result<Amount, TideError> {
        self.display_balance_of(holder)
    }

    pub fn allowance(&self, owner: &HolderId, spender: &HolderId) -> Amount {
        self.raw.allowance(owner, spender)
    }

    /// Sum of raw balances, excluding unsettled interest.
    pub fn principal_total_supply(&self) -> Amount {
        self.raw.total_supply()
    }

    /// Raw supply plus every known holder's unsettled interest.
    pub fn total_supply(&self) -> Result<Amount, TideError> {
        let now = self.clock.now();
        self.registry.holders().try_fold(self.raw.total_supply(), |total, holder| {
            let s = self.settlement.quote(&self.raw, &self.registry, holder, now)?;
            total
                .checked_add(s.accrued)
                .ok_or_else(|| AccrualError::ArithmeticOverflow.into())
        })
    }

    pub fn registry(&self) -> &RateRegistry {
        &self.registry
    }

    pub fn raw_ledger(&self) -> &L {
        &self.raw
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Events recorded so far, oldest first.
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Take all recorded events, leaving the journal empty.
    pub fn drain_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Read the clock for a mutating call. A regressing clock is reported and
    /// then clamped by the accrual math.
    fn tick(&mut self) -> Timestamp {
        let now = self.clock.now();
        if now < self.last_seen {
            warn!(now, last_seen = self.last_seen, "clock moved backwards");
        } else {
            self.last_seen = now;
        }
        now
    }

    fn quote(&self, holder: &HolderId, now: Timestamp) -> Result<Settlement, TideError> {
        self.settlement
            .quote(&self.raw, &self.registry, holder, now)
    }

    fn post_settlement_balance(&self, settlement: &Settlement) -> Result<Amount, TideError> {
        self.raw
            .raw_balance_of(&settlement.holder)
            .checked_add(settlement.accrued)
            .ok_or_else(|| AccrualError::ArithmeticOverflow.into())
    }

    /// Reject up front if crediting `additions` would overflow the raw supply.
    fn ensure_supply_headroom(&self, additions: &[Amount]) -> Result<(), LedgerError> {
        additions
            .iter()
            .try_fold(self.raw.total_supply(), |total, extra| total.checked_add(*extra))
            .map(|_| ())
            .ok_or(LedgerError::BalanceOverflow)
    }

    fn apply_settlement(&mut self, settlement: &Settlement) -> Result<(), TideError> {
        self.settlement
            .apply(&mut self.raw, &mut self.registry, settlement)?;
        if settlement.accrued > 0 {
            debug!(holder = %settlement.holder, amount = settlement.accrued, "interest settled");
            self.events.push(LedgerEvent::InterestSettled {
                holder: settlement.holder,
                amount: settlement.accrued,
                at: settlement.at,
            });
        }
        Ok(())
    }

    fn freeze(&mut self, holder: &HolderId, rate: Rate, now: Timestamp) {
        self.registry.freeze_holder_rate(holder, rate);
        debug!(%holder, rate, "holder rate frozen");
        self.events.push(LedgerEvent::HolderRateFrozen {
            holder: *holder,
            rate,
            at: now,
        });
    }

    fn move_settled(
        &mut self,
        spender: Option<&HolderId>,
        from: &HolderId,
        to: &HolderId,
        amount: TransferAmount,
    ) -> Result<Amount, TideError> {
        let now = self.tick();
        let from_settlement = self.quote(from, now)?;
        let available = self.post_settlement_balance(&from_settlement)?;
        let amount = amount.resolve(available);
        if amount > available {
            return Err(LedgerError::InsufficientBalance {
                have: available,
                need: amount,
            }
            .into());
        }
        if let Some(spender) = spender {
            let allowed = self.raw.allowance(from, spender);
            if allowed != Amount::MAX && allowed < amount {
                return Err(LedgerError::InsufficientAllowance {
                    have: allowed,
                    need: amount,
                }
                .into());
            }
        }
        // A self-transfer settles once; quoting twice would double-count.
        let to_settlement = if to == from {
            None
        } else {
            Some(self.quote(to, now)?)
        };
        let to_accrued = to_settlement.map_or(0, |s| s.accrued);
        self.ensure_supply_headroom(&[from_settlement.accrued, to_accrued])?;

        self.apply_settlement(&from_settlement)?;
        if let Some(s) = &to_settlement {
            self.apply_settlement(s)?;
        }
        if let Some(spender) = spender {
            self.raw.spend_allowance(from, spender, amount)?;
        }
        // Zero-amount transfers never reassign a rate.
        if amount > 0 && to != from && self.raw.raw_balance_of(to) == 0 {
            if let Some(rate) = self.registry.record(from).rate {
                self.freeze(to, rate, now);
            }
        }
        self.raw.move_raw(from, to, amount)?;

        info!(%from, %to, amount, "transferred");
        self.events.push(LedgerEvent::Transferred {
            from: *from,
            to: *to,
            amount,
            at: now,
        });
        Ok(amount)
    }
}
