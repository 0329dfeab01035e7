//! Property-based tests for split validation and equal-split allocation.
//!
//! - Property 1: Equal splits always pass exact validation
//! - Property 2: Any shortfall beyond tolerance is a mismatch
//! - Property 3: Rule order is stable

use std::collections::BTreeSet;

use proptest::prelude::*;
use splitledger_shared::types::{Money, ParticipantId};

use super::error::LedgerError;
use super::types::{ExpenseInput, SplitLine};
use super::validation::SplitValidator;

/// Strategy to generate a positive expense total (0.01 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Money> {
    (1i64..100_000_000i64).prop_map(Money::from_minor)
}

/// Strategy to generate a participant count (1 to 20).
fn participant_count() -> impl Strategy<Value = usize> {
    1usize..=20
}

fn participants(count: usize) -> Vec<ParticipantId> {
    (1..=count as u128).map(ParticipantId::from_u128).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property 1.1: Equal shares sum to the total exactly.
    #[test]
    fn prop_equal_split_sums_to_total(
        total in positive_amount(),
        count in participant_count(),
    ) {
        let shares = total.split_equal(count);
        prop_assert_eq!(shares.len(), count);
        prop_assert_eq!(shares.iter().copied().sum::<Money>(), total);
    }

    /// Property 1.2: Shares differ from the rounded quotient only in the
    /// first slot.
    #[test]
    fn prop_equal_split_residue_on_first_share(
        total in positive_amount(),
        count in 2usize..=20,
    ) {
        let shares = total.split_equal(count);
        let rest = &shares[1..];
        prop_assert!(rest.iter().all(|s| *s == rest[0]));
        let diff = (shares[0] - rest[0]).minor().unsigned_abs();
        prop_assert!(diff < count as u64, "residue {} too large for {} parts", diff, count);
    }

    /// Property 1.3: Equal splits whose shares are all positive pass exact
    /// validation.
    #[test]
    fn prop_equal_split_passes_exact_validation(
        total in positive_amount(),
        count in participant_count(),
    ) {
        let ids = participants(count);
        let input = ExpenseInput::equal(ids[0], total, ids.clone());
        let lines = input.lines();
        prop_assume!(lines.iter().all(|l| l.amount.is_positive()));

        let set: BTreeSet<ParticipantId> = ids.into_iter().collect();
        prop_assert_eq!(
            SplitValidator::exact().validate(&set, input.payer, input.total, &lines),
            Ok(())
        );
    }

    /// Property 2.1: A shortfall larger than the tolerance is rejected.
    #[test]
    fn prop_shortfall_beyond_tolerance_rejected(
        total in 1_000i64..100_000_000i64,
        count in participant_count(),
        extra in 1i64..500,
    ) {
        let ids = participants(count);
        let validator = SplitValidator::default();
        let tolerance = validator.tolerance_for(count);

        let mut shares = Money::from_minor(total).split_equal(count);
        shares[0] -= tolerance + Money::from_minor(extra);
        prop_assume!(shares.iter().all(|s| s.is_positive()));

        let lines: Vec<SplitLine> = ids.iter().zip(shares).map(|(id, a)| SplitLine::new(*id, a)).collect();
        let set: BTreeSet<ParticipantId> = ids.iter().copied().collect();
        let result = validator.validate(&set, ids[0], Money::from_minor(total), &lines);
        prop_assert!(
            matches!(result, Err(LedgerError::SplitMismatch { .. })),
            "expected mismatch, got {:?}",
            result
        );
    }

    /// Property 2.2: A difference within the tolerance is accepted.
    #[test]
    fn prop_difference_within_tolerance_accepted(
        total in 1_000i64..100_000_000i64,
        count in participant_count(),
        delta in -1i64..=1,
    ) {
        let ids = participants(count);
        let validator = SplitValidator::default();

        let mut shares = Money::from_minor(total).split_equal(count);
        let last = shares.len() - 1;
        shares[last] += Money::from_minor(delta);
        prop_assume!(shares.iter().all(|s| s.is_positive()));

        let lines: Vec<SplitLine> = ids.iter().zip(shares).map(|(id, a)| SplitLine::new(*id, a)).collect();
        let set: BTreeSet<ParticipantId> = ids.iter().copied().collect();
        prop_assert_eq!(validator.validate(&set, ids[0], Money::from_minor(total), &lines), Ok(()));
    }

    /// Property 3.1: Non-positive amounts are reported before membership.
    #[test]
    fn prop_amount_checked_before_membership(
        bad in -1_000i64..=0,
        stranger in 100u128..200,
    ) {
        let ids = participants(3);
        let set: BTreeSet<ParticipantId> = ids.iter().copied().collect();
        let lines = vec![SplitLine::new(ParticipantId::from_u128(stranger), Money::from_minor(bad))];
        let result = SplitValidator::default().validate(&set, ids[0], Money::from_minor(1_000), &lines);
        prop_assert_eq!(result, Err(LedgerError::InvalidAmount(Money::from_minor(bad))));
    }
}
