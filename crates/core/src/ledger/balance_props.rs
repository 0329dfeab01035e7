//! Property-based tests for balance aggregation.
//!
//! - Property 4: Conservation (balances always sum to zero)
//! - Property 5: Self-split neutrality
//! - Property 6: Fold-order independence

use std::collections::BTreeSet;

use proptest::prelude::*;
use splitledger_shared::types::{Money, ParticipantId};

use super::balance::BalanceAggregator;
use super::facts::{ExpenseSplitFact, LedgerFacts, PaymentFact};

const MAX_PARTICIPANTS: u128 = 8;

fn pid(n: u128) -> ParticipantId {
    ParticipantId::from_u128(n)
}

/// Strategy to generate a positive fact amount (0.01 to 10,000.00).
fn positive_amount() -> impl Strategy<Value = Money> {
    (1i64..1_000_000i64).prop_map(Money::from_minor)
}

/// Strategy to generate an arbitrary split fact over the fixed participants.
fn split_fact() -> impl Strategy<Value = ExpenseSplitFact> {
    (1..=MAX_PARTICIPANTS, 1..=MAX_PARTICIPANTS, positive_amount()).prop_map(
        |(payer, debtor, amount)| {
            ExpenseSplitFact::new(pid(payer), pid(debtor), amount).expect("positive amount")
        },
    )
}

/// Strategy to generate a payment fact with distinct endpoints.
fn payment_fact() -> impl Strategy<Value = PaymentFact> {
    (1..=MAX_PARTICIPANTS, 1..MAX_PARTICIPANTS, positive_amount()).prop_map(
        |(from, offset, amount)| {
            let to = (from - 1 + offset) % MAX_PARTICIPANTS + 1;
            PaymentFact::new(pid(from), pid(to), amount).expect("distinct endpoints")
        },
    )
}

/// Strategy to generate a complete fact snapshot.
pub(super) fn ledger_facts() -> impl Strategy<Value = LedgerFacts> {
    (
        prop::collection::vec(split_fact(), 0..40),
        prop::collection::vec(payment_fact(), 0..15),
    )
        .prop_map(|(splits, payments)| {
            LedgerFacts::new((1..=MAX_PARTICIPANTS).map(pid))
                .with_splits(splits)
                .with_payments(payments)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property 4.1: The sum of all balances is exactly zero.
    #[test]
    fn prop_balances_conserve(facts in ledger_facts()) {
        let balances = BalanceAggregator::aggregate_facts(&facts).unwrap();
        prop_assert_eq!(balances.total(), Some(Money::ZERO));
    }

    /// Property 4.2: Every participant is present, active or not.
    #[test]
    fn prop_every_participant_present(facts in ledger_facts()) {
        let balances = BalanceAggregator::aggregate_facts(&facts).unwrap();
        prop_assert_eq!(balances.len(), facts.participants.len());
        for id in &facts.participants {
            prop_assert!(balances.get(*id).is_some());
        }
    }

    /// Property 5.1: Adding a self-split changes no balance.
    #[test]
    fn prop_self_split_neutral(
        facts in ledger_facts(),
        who in 1..=MAX_PARTICIPANTS,
        amount in positive_amount(),
    ) {
        let before = BalanceAggregator::aggregate_facts(&facts).unwrap();
        let with_self = facts.with_splits([ExpenseSplitFact::new(pid(who), pid(who), amount).unwrap()]);
        let after = BalanceAggregator::aggregate_facts(&with_self).unwrap();
        prop_assert_eq!(before, after);
    }

    /// Property 6.1: Reversing fact order yields identical balances.
    #[test]
    fn prop_fold_order_independent(facts in ledger_facts()) {
        let forward = BalanceAggregator::aggregate_facts(&facts).unwrap();

        let mut reversed = facts.clone();
        reversed.expense_splits.reverse();
        reversed.payments.reverse();
        let backward = BalanceAggregator::aggregate_facts(&reversed).unwrap();

        prop_assert_eq!(forward, backward);
    }

    /// Property 6.2: Any rotation of the facts yields identical balances.
    #[test]
    fn prop_rotation_independent(facts in ledger_facts(), shift in 0usize..40) {
        let forward = BalanceAggregator::aggregate_facts(&facts).unwrap();

        let mut rotated = facts.clone();
        if !rotated.expense_splits.is_empty() {
            let k = shift % rotated.expense_splits.len();
            rotated.expense_splits.rotate_left(k);
        }
        if !rotated.payments.is_empty() {
            let k = shift % rotated.payments.len();
            rotated.payments.rotate_right(k);
        }
        prop_assert_eq!(forward, BalanceAggregator::aggregate_facts(&rotated).unwrap());
    }

    /// Property 6.3: Aggregating the same snapshot twice is deterministic.
    #[test]
    fn prop_aggregation_deterministic(facts in ledger_facts()) {
        let set: BTreeSet<ParticipantId> = facts.participants.clone();
        let a = BalanceAggregator::aggregate(&set, &facts.expense_splits, &facts.payments).unwrap();
        let b = BalanceAggregator::aggregate(&set, &facts.expense_splits, &facts.payments).unwrap();
        prop_assert_eq!(a, b);
    }
}
