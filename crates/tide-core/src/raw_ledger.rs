//! In-memory implementation of [`RawLedger`].
//!
//! [`MemoryRawLedger`] keeps balances and allowances in `HashMap`s with no
//! persistence. It is the bookkeeping collaborator used by tests and the CLI
//! simulator; a host environment would supply its own token storage.

use std::collections::HashMap;

use crate::error::LedgerError;
use crate::traits::RawLedger;
use crate::types::{Amount, HolderId};

/// Plain fungible-token bookkeeping held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryRawLedger {
    /// Holder → raw balance. Zero balances are removed.
    balances: HashMap<HolderId, Amount>,
    /// (owner, spender) → remaining allowance.
    allowances: HashMap<(HolderId, HolderId), Amount>,
    /// Sum of all balances.
    total_supply: Amount,
}

impl MemoryRawLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of holders with a non-zero balance.
    pub fn holder_count(&self) -> usize {
        self.balances.len()
    }

    fn set_balance(&mut self, holder: &HolderId, amount: Amount) {
        if amount == 0 {
            self.balances.remove(holder);
        } else {
            self.balances.insert(*holder, amount);
        }
    }
}

impl RawLedger for MemoryRawLedger {
    fn raw_balance_of(&self, holder: &HolderId) -> Amount {
        self.balances.get(holder).copied().unwrap_or(0)
    }

    fn total_supply(&self) -> Amount {
        self.total_supply
    }

    fn credit(&mut self, holder: &HolderId, amount: Amount) -> Result<(), LedgerError> {
        if amount == 0 {
            return Ok(());
        }
        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow)?;
        // Individual balances never exceed total supply, so this cannot overflow.
        let balance = self.raw_balance_of(holder) + amount;
        self.total_supply = supply;
        self.set_balance(holder, balance);
        Ok(())
    }

    fn debit(&mut self, holder: &HolderId, amount: Amount) -> Result<(), LedgerError> {
        let have = self.raw_balance_of(holder);
        let remaining = have
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance { have, need: amount })?;
        self.total_supply -= amount;
        self.set_balance(holder, remaining);
        Ok(())
    }

    fn move_raw(
        &mut self,
        from: &HolderId,
        to: &HolderId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let have = self.raw_balance_of(from);
        if have < amount {
            return Err(LedgerError::InsufficientBalance { have, need: amount });
        }
        if from == to || amount == 0 {
            return Ok(());
        }
        let to_balance = self.raw_balance_of(to) + amount;
        self.set_balance(from, have - amount);
        self.set_balance(to, to_balance);
        Ok(())
    }

    fn allowance(&self, owner: &HolderId, spender: &HolderId) -> Amount {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    fn approve(&mut self, owner: &HolderId, spender: &HolderId, amount: Amount) {
        if amount == 0 {
            self.allowances.remove(&(*owner, *spender));
        } else {
            self.allowances.insert((*owner, *spender), amount);
        }
    }

    fn spend_allowance(
        &mut self,
        owner: &HolderId,
        spender: &HolderId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let have = self.allowance(owner, spender);
        if have == Amount::MAX {
            return Ok(());
        }
        let remaining = have
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientAllowance { have, need: amount })?;
        self.approve(owner, spender, remaining);
        Ok(())
    }
}
