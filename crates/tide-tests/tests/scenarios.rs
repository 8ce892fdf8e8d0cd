//! End-to-end ledger scenarios: minting, accrual, rate changes, transfers, burns.

use tide_core::auth::OwnerAuthorizer;
use tide_core::constants::DEFAULT_INTEREST_RATE;
use tide_core::error::{AuthError, LedgerError, RateError, TideError};
use tide_core::traits::Authorizer;
use tide_core::types::{Amount, HolderState, TransferAmount};
use tide_ledger::{LedgerConfig, LedgerEvent, RatePolicy};
use tide_tests::helpers::*;

const R0: u128 = DEFAULT_INTEREST_RATE;
const R1: u128 = DEFAULT_INTEREST_RATE / 2;

// ------------------------------------------------------------------
// Scenario A: mint, then accrue linearly
// ------------------------------------------------------------------

#[test]
fn mint_then_accrue_linearly() {
    let (mut ledger, clock) = ledger();
    let x = holder(1);

    ledger.mint(&x, 100 * TOKEN).unwrap();
    assert_eq!(ledger.principal_balance_of(&x), 100 * TOKEN);
    assert_eq!(ledger.user_interest_rate(&x), R0);

    let delta = 7 * 24 * 3_600;
    clock.advance(delta);
    assert_eq!(
        ledger.display_balance_of(&x).unwrap(),
        100 * TOKEN + simple_interest(100 * TOKEN, R0, delta)
    );
    // Reading did not settle anything.
    assert_eq!(ledger.principal_balance_of(&x), 100 * TOKEN);
}

#[test]
fn whole_unit_amounts_accrue_with_truncation() {
    let (mut ledger, clock) = ledger();
    let x = holder(1);
    ledger.mint(&x, 100).unwrap();
    clock.advance(1_000);
    // 100 * 5e10 * 1000 / 1e18 truncates to zero.
    assert_eq!(ledger.display_balance_of(&x).unwrap(), 100);
}

// ------------------------------------------------------------------
// Scenario B: rate policy violations
// ------------------------------------------------------------------

#[test]
fn lowering_rejected_under_non_decreasing_policy() {
    let (mut ledger, _) =
        ledger_with(LedgerConfig::default().with_rate_policy(RatePolicy::NonDecreasing));

    let err = ledger.set_interest_rate(&admin(), R0 - 1).unwrap_err();
    assert_eq!(
        err,
        TideError::Rate(RateError::PolicyViolation {
            current: R0,
            attempted: R0 - 1
        })
    );
    assert_eq!(ledger.interest_rate(), R0);
}

#[test]
fn raising_rejected_under_default_policy() {
    let (mut ledger, _) = ledger();

    let err = ledger.set_interest_rate(&admin(), R0 + 1).unwrap_err();
    assert_eq!(
        err,
        TideError::Rate(RateError::PolicyViolation {
            current: R0,
            attempted: R0 + 1
        })
    );
    assert_eq!(ledger.interest_rate(), R0);
}

#[test]
fn only_owner_can_obtain_rate_admin() {
    let authorizer = OwnerAuthorizer::new(owner());
    let stranger = holder(3);
    assert_eq!(
        authorizer.authorize_rate_admin(&stranger),
        Err(AuthError::Unauthorized(stranger))
    );
    assert!(authorizer.authorize_rate_admin(&owner()).is_ok());
}

#[test]
fn rate_change_reaches_new_holders_only() {
    let (mut ledger, _) = ledger();
    ledger.mint(&holder(1), TOKEN).unwrap();
    ledger.set_interest_rate(&admin(), R1).unwrap();
    ledger.mint(&holder(2), TOKEN).unwrap();

    assert_eq!(ledger.user_interest_rate(&holder(1)), R0);
    assert_eq!(ledger.user_interest_rate(&holder(2)), R1);
}

// ------------------------------------------------------------------
// Scenario C / D: rate propagation on transfer
// ------------------------------------------------------------------

#[test]
fn empty_receiver_inherits_sender_rate_after_global_drop() {
    let (mut ledger, clock) = ledger();
    let (x, y) = (holder(1), holder(2));

    ledger.mint(&x, 100 * TOKEN).unwrap();
    ledger.set_interest_rate(&admin(), R1).unwrap();
    clock.advance(3_600);
    ledger.transfer(&x, &y, 10 * TOKEN).unwrap();

    assert_eq!(ledger.user_interest_rate(&y), R0);
    assert_eq!(ledger.holder_state(&y), HolderState::Active);
}

#[test]
fn funded_receiver_keeps_own_rate() {
    let (mut ledger, clock) = ledger();
    let (x, y) = (holder(1), holder(2));

    ledger.mint(&x, 100 * TOKEN).unwrap();
    ledger.set_interest_rate(&admin(), R1).unwrap();
    ledger.mint(&y, 5 * TOKEN).unwrap();
    clock.advance(3_600);
    ledger.transfer(&x, &y, 10 * TOKEN).unwrap();

    assert_eq!(ledger.user_interest_rate(&y), R1);
}

#[test]
fn emptied_holder_is_reseeded_by_incoming_transfer() {
    let (mut ledger, _) = ledger();
    let (x, y) = (holder(1), holder(2));

    ledger.mint(&y, TOKEN).unwrap(); // y frozen at R0
    ledger.burn(&y, TransferAmount::All).unwrap();
    ledger.set_interest_rate(&admin(), R1).unwrap();
    ledger.mint(&x, TOKEN).unwrap(); // x frozen at R1
    ledger.transfer(&x, &y, TOKEN / 2).unwrap();

    assert_eq!(ledger.user_interest_rate(&y), R1);
}

#[test]
fn emptied_holder_keeps_rate_on_remint() {
    let (mut ledger, _) = ledger();
    let y = holder(2);

    ledger.mint(&y, TOKEN).unwrap();
    ledger.burn(&y, TransferAmount::All).unwrap();
    assert_eq!(ledger.holder_state(&y), HolderState::Active);

    ledger.set_interest_rate(&admin(), R1).unwrap();
    ledger.mint(&y, TOKEN).unwrap();
    assert_eq!(ledger.user_interest_rate(&y), R0);
}

#[test]
fn receiver_interest_is_settled_before_transfer() {
    let (mut ledger, clock) = ledger();
    let (x, y) = (holder(1), holder(2));

    ledger.mint(&x, 100 * TOKEN).unwrap();
    ledger.mint(&y, 50 * TOKEN).unwrap();
    clock.advance(10_000);
    let y_display = ledger.display_balance_of(&y).unwrap();
    ledger.transfer(&x, &y, TOKEN).unwrap();

    assert_eq!(ledger.principal_balance_of(&y), y_display + TOKEN);
}

// ------------------------------------------------------------------
// Scenario E: burn everything
// ------------------------------------------------------------------

#[test]
fn burn_all_leaves_nothing_regardless_of_elapsed_time() {
    for elapsed in [0u64, 1, 59, 3_600, 86_400, 365 * 86_400] {
        let (mut ledger, clock) = ledger();
        let x = holder(1);
        ledger.mint(&x, 123 * TOKEN + 456).unwrap();
        clock.advance(elapsed);

        ledger.burn(&x, Amount::MAX).unwrap();
        assert_eq!(ledger.principal_balance_of(&x), 0, "elapsed {elapsed}");
        assert_eq!(ledger.display_balance_of(&x).unwrap(), 0, "elapsed {elapsed}");
    }
}

#[test]
fn burn_all_returns_full_accrued_amount() {
    let (mut ledger, clock) = ledger();
    let x = holder(1);
    ledger.mint(&x, 100 * TOKEN).unwrap();
    clock.advance(86_400);

    let burned = ledger.burn(&x, Amount::MAX).unwrap();
    assert_eq!(burned, 100 * TOKEN + simple_interest(100 * TOKEN, R0, 86_400));
    assert_eq!(ledger.principal_total_supply(), 0);
}

// ------------------------------------------------------------------
// Failures are atomic
// ------------------------------------------------------------------

#[test]
fn failed_transfer_from_changes_nothing() {
    let (mut ledger, clock) = ledger();
    let (x, y, spender) = (holder(1), holder(2), holder(9));

    ledger.mint(&x, 100 * TOKEN).unwrap();
    ledger.mint(&y, TOKEN).unwrap();
    ledger.approve(&x, &spender, TOKEN);
    clock.advance(5_000);
    ledger.drain_events();

    let err = ledger
        .transfer_from(&spender, &x, &y, 2 * TOKEN)
        .unwrap_err();
    assert!(matches!(
        err,
        TideError::Ledger(LedgerError::InsufficientAllowance { .. })
    ));

    assert_eq!(ledger.principal_balance_of(&x), 100 * TOKEN);
    assert_eq!(ledger.principal_balance_of(&y), TOKEN);
    assert_eq!(ledger.registry().last_settled(&x), Some(GENESIS));
    assert_eq!(ledger.registry().last_settled(&y), Some(GENESIS));
    assert_eq!(ledger.allowance(&x, &spender), TOKEN);
    assert!(ledger.events().is_empty());
}

#[test]
fn overdrawn_transfer_changes_nothing() {
    let (mut ledger, clock) = ledger();
    let (x, y) = (holder(1), holder(2));
    ledger.mint(&x, TOKEN).unwrap();
    clock.advance(100);
    let display = ledger.display_balance_of(&x).unwrap();

    let err = ledger.transfer(&x, &y, display + 1).unwrap_err();
    assert_eq!(
        err,
        TideError::Ledger(LedgerError::InsufficientBalance {
            have: display,
            need: display + 1
        })
    );
    assert_eq!(ledger.principal_balance_of(&x), TOKEN);
    assert_eq!(ledger.holder_state(&y), HolderState::Unseeded);
}

#[test]
fn unlimited_allowance_is_not_consumed() {
    let (mut ledger, _) = ledger();
    let (x, y, spender) = (holder(1), holder(2), holder(9));
    ledger.mint(&x, 10 * TOKEN).unwrap();
    ledger.approve(&x, &spender, Amount::MAX);

    ledger.transfer_from(&spender, &x, &y, 3 * TOKEN).unwrap();
    assert_eq!(ledger.allowance(&x, &spender), Amount::MAX);
}

// ------------------------------------------------------------------
// Delegated transfers
// ------------------------------------------------------------------

#[test]
fn transfer_from_all_moves_accrued_balance_and_propagates_rate() {
    let (mut ledger, clock) = ledger();
    let (x, y, spender) = (holder(1), holder(2), holder(9));

    ledger.mint(&x, 100 * TOKEN).unwrap();
    ledger.set_interest_rate(&admin(), R1).unwrap();
    ledger.approve(&x, &spender, Amount::MAX);
    clock.advance(3_600);
    let display = ledger.display_balance_of(&x).unwrap();
    assert_eq!(display, 100 * TOKEN + simple_interest(100 * TOKEN, R0, 3_600));

    let moved = ledger
        .transfer_from(&spender, &x, &y, TransferAmount::All)
        .unwrap();
    assert_eq!(moved, display);
    assert_eq!(ledger.display_balance_of(&x).unwrap(), 0);
    assert_eq!(ledger.principal_balance_of(&y), display);
    assert_eq!(ledger.user_interest_rate(&y), R0);
    assert_eq!(ledger.allowance(&x, &spender), Amount::MAX);
}

#[test]
fn transfer_from_all_checks_allowance_against_resolved_amount() {
    let (mut ledger, clock) = ledger();
    let (x, y, spender) = (holder(1), holder(2), holder(9));

    ledger.mint(&x, 100 * TOKEN).unwrap();
    ledger.approve(&x, &spender, 100 * TOKEN);
    clock.advance(3_600);
    let display = ledger.display_balance_of(&x).unwrap();
    ledger.drain_events();

    // Accrued interest pushes the whole balance past the allowance.
    let err = ledger
        .transfer_from(&spender, &x, &y, TransferAmount::All)
        .unwrap_err();
    assert_eq!(
        err,
        TideError::Ledger(LedgerError::InsufficientAllowance {
            have: 100 * TOKEN,
            need: display
        })
    );
    assert_eq!(ledger.principal_balance_of(&x), 100 * TOKEN);
    assert_eq!(ledger.holder_state(&y), HolderState::Unseeded);
    assert_eq!(ledger.allowance(&x, &spender), 100 * TOKEN);
    assert!(ledger.events().is_empty());

    ledger.approve(&x, &spender, display);
    assert_eq!(
        ledger
            .transfer_from(&spender, &x, &y, TransferAmount::All)
            .unwrap(),
        display
    );
    assert_eq!(ledger.allowance(&x, &spender), 0);
}

#[test]
fn transfer_from_to_funded_receiver_keeps_its_rate() {
    let (mut ledger, clock) = ledger();
    let (x, y, spender) = (holder(1), holder(2), holder(9));

    ledger.mint(&x, 100 * TOKEN).unwrap();
    ledger.set_interest_rate(&admin(), R1).unwrap();
    ledger.mint(&y, TOKEN).unwrap();
    ledger.approve(&x, &spender, 10 * TOKEN);
    clock.advance(600);

    ledger.transfer_from(&spender, &x, &y, 10 * TOKEN).unwrap();
    assert_eq!(ledger.user_interest_rate(&y), R1);
    assert_eq!(ledger.allowance(&x, &spender), 0);
}

// ------------------------------------------------------------------
// Event journal
// ------------------------------------------------------------------

#[test]
fn transfer_journal_order() {
    let (mut ledger, clock) = ledger();
    let (x, y) = (holder(1), holder(2));
    ledger.mint(&x, 100 * TOKEN).unwrap();
    clock.advance(60);
    ledger.drain_events();

    ledger.transfer(&x, &y, TOKEN).unwrap();
    let now = GENESIS + 60;
    assert_eq!(
        ledger.drain_events(),
        vec![
            LedgerEvent::InterestSettled {
                holder: x,
                amount: simple_interest(100 * TOKEN, R0, 60),
                at: now,
            },
            LedgerEvent::HolderRateFrozen {
                holder: y,
                rate: R0,
                at: now,
            },
            LedgerEvent::Transferred {
                from: x,
                to: y,
                amount: TOKEN,
                at: now,
            },
        ]
    );
}

#[test]
fn first_mint_journal() {
    let (mut ledger, _) = ledger();
    let x = holder(1);
    ledger.mint(&x, TOKEN).unwrap();
    assert_eq!(
        ledger.drain_events(),
        vec![
            LedgerEvent::HolderRateFrozen {
                holder: x,
                rate: R0,
                at: GENESIS,
            },
            LedgerEvent::Minted {
                to: x,
                amount: TOKEN,
                at: GENESIS,
            },
        ]
    );
}
