//! Property-based integration tests for line pricing, aggregation and
//! recurrence normalization.
//!
//! These tests verify that universal properties hold across all valid inputs,
//! using the `proptest` crate for random test case generation.

use basic_subscription_core::currency::{Currency, CurrencyRounder};
use basic_subscription_core::pricing::{compute_line, LineInput, LinePricing, PricingEnv};
use basic_subscription_core::subscriptions::{
    aggregate, monthly_equivalent_for, RecurrenceUnit,
};
use basic_subscription_core::taxes::{StandardTaxEngine, Tax};
use basic_subscription_core::Error;
use proptest::prelude::*;
use rust_decimal::Decimal;

// =============================================================================
// Generators
// =============================================================================

/// Amount with two decimals between -10_000.00 and 10_000.00.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (-1_000_000i64..1_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Amount with up to four decimals, not aligned to any currency.
fn arb_raw_amount() -> impl Strategy<Value = Decimal> {
    (-100_000_000i64..100_000_000).prop_map(|v| Decimal::new(v, 4))
}

fn arb_quantity() -> impl Strategy<Value = Decimal> {
    (0i64..10_000).prop_map(|v| Decimal::new(v, 2))
}

fn arb_discount() -> impl Strategy<Value = Decimal> {
    (0i64..=100).prop_map(Decimal::from)
}

fn arb_rate() -> impl Strategy<Value = Decimal> {
    (0i64..=30).prop_map(Decimal::from)
}

fn arb_unit() -> impl Strategy<Value = RecurrenceUnit> {
    prop_oneof![
        Just(RecurrenceUnit::Daily),
        Just(RecurrenceUnit::Weekly),
        Just(RecurrenceUnit::Monthly),
        Just(RecurrenceUnit::Yearly),
    ]
}

fn arb_currency() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(("EUR", Decimal::new(1, 2))),
        Just(("JPY", Decimal::ONE)),
        Just(("CHF", Decimal::new(5, 2))),
        Just(("KWD", Decimal::new(1, 3))),
    ]
    .prop_map(|(code, rounding)| Currency::new(code, rounding).unwrap())
}

fn price_line(
    quantity: Decimal,
    unit_price: Decimal,
    discount: Decimal,
    taxes: &[Tax],
    currency: &Currency,
) -> LinePricing {
    let engine = StandardTaxEngine::new();
    let mut env = PricingEnv::new(&engine);
    env.currency = Some(currency);
    let input = LineInput {
        quantity,
        unit_price,
        discount,
        taxes,
    };
    compute_line(&input, &env).unwrap()
}

// =============================================================================
// Aggregation
// =============================================================================

proptest! {
    /// The recurring total is the exact sum of the line subtotals.
    #[test]
    fn prop_total_is_sum_of_subtotals(
        subtotals in proptest::collection::vec(arb_amount(), 0..20),
        currency in arb_currency(),
    ) {
        let lines: Vec<LinePricing> = subtotals
            .iter()
            .map(|subtotal| LinePricing { subtotal: *subtotal, tax_amount: Decimal::ZERO })
            .collect();
        let totals = aggregate(&lines, Some(&currency)).unwrap();
        let expected: Decimal = subtotals.iter().sum();
        prop_assert_eq!(totals.recurring_total, expected);
    }

    /// The amount total always equals the total plus the tax.
    #[test]
    fn prop_amount_total_is_total_plus_tax(
        lines in proptest::collection::vec((arb_amount(), arb_raw_amount()), 0..20),
        currency in arb_currency(),
    ) {
        let lines: Vec<LinePricing> = lines
            .into_iter()
            .map(|(subtotal, tax_amount)| LinePricing { subtotal, tax_amount })
            .collect();
        let totals = aggregate(&lines, Some(&currency)).unwrap();
        prop_assert_eq!(
            totals.recurring_amount_total,
            totals.recurring_total + totals.recurring_tax
        );
        prop_assert_eq!(currency.round(totals.recurring_tax).unwrap(), totals.recurring_tax);
    }

    /// Appending a line adds its subtotal to the total.
    #[test]
    fn prop_total_is_additive(
        lines in proptest::collection::vec(arb_amount(), 0..10),
        extra in arb_amount(),
    ) {
        let priced = |values: &[Decimal]| -> Vec<LinePricing> {
            values
                .iter()
                .map(|subtotal| LinePricing { subtotal: *subtotal, tax_amount: Decimal::ZERO })
                .collect()
        };
        let before = aggregate(&priced(&lines[..]), None).unwrap();
        let mut extended = lines.clone();
        extended.push(extra);
        let after = aggregate(&priced(&extended[..]), None).unwrap();
        prop_assert_eq!(after.recurring_total, before.recurring_total + extra);
    }
}

// =============================================================================
// Line pricing
// =============================================================================

proptest! {
    /// A fully discounted line costs nothing and carries no percent tax.
    #[test]
    fn prop_full_discount_is_free(
        quantity in arb_quantity(),
        unit_price in arb_amount(),
        rate in arb_rate(),
        currency in arb_currency(),
    ) {
        let taxes = vec![Tax::percent("vat", "c1", rate)];
        let pricing = price_line(quantity, unit_price, Decimal::from(100), &taxes, &currency);
        prop_assert!(pricing.subtotal.is_zero());
        prop_assert!(pricing.tax_amount.is_zero());
    }

    /// Subtotals are already expressed in the currency's smallest unit.
    #[test]
    fn prop_subtotal_is_rounded(
        quantity in arb_quantity(),
        unit_price in arb_raw_amount(),
        discount in arb_discount(),
        currency in arb_currency(),
    ) {
        let pricing = price_line(quantity, unit_price, discount, &[], &currency);
        prop_assert_eq!(currency.round(pricing.subtotal).unwrap(), pricing.subtotal);
    }

    /// For non-negative prices a larger discount never raises the subtotal.
    #[test]
    fn prop_discount_is_monotonic(
        quantity in arb_quantity(),
        cents in 0i64..1_000_000,
        low in 0i64..=100,
        high in 0i64..=100,
    ) {
        let (low, high) = if low <= high { (low, high) } else { (high, low) };
        let unit_price = Decimal::new(cents, 2);
        let eur = Currency::new("EUR", Decimal::new(1, 2)).unwrap();
        let cheap = price_line(quantity, unit_price, Decimal::from(high), &[], &eur);
        let dear = price_line(quantity, unit_price, Decimal::from(low), &[], &eur);
        prop_assert!(cheap.subtotal <= dear.subtotal);
    }

    /// Rounding an already rounded amount changes nothing.
    #[test]
    fn prop_rounding_is_idempotent(amount in arb_raw_amount(), currency in arb_currency()) {
        let once = currency.round(amount).unwrap();
        prop_assert_eq!(currency.round(once).unwrap(), once);
    }
}

// =============================================================================
// Recurrence normalization
// =============================================================================

proptest! {
    /// Doubling the interval halves the monthly equivalent.
    #[test]
    fn prop_monthly_scales_inversely_with_interval(
        total in arb_amount(),
        unit in arb_unit(),
        interval in 1i32..50,
    ) {
        let single = monthly_equivalent_for(total, unit, interval).unwrap();
        let double = monthly_equivalent_for(total, unit, interval * 2).unwrap();
        prop_assert!((double * Decimal::TWO - single).abs() < Decimal::new(1, 10));
    }

    /// For a positive total, shorter billing periods weigh more per month.
    #[test]
    fn prop_units_rank_by_periods_per_month(
        cents in 1i64..1_000_000,
        interval in 1i32..50,
    ) {
        let total = Decimal::new(cents, 2);
        let monthly = |unit| monthly_equivalent_for(total, unit, interval).unwrap();
        let daily = monthly(RecurrenceUnit::Daily);
        let weekly = monthly(RecurrenceUnit::Weekly);
        let per_month = monthly(RecurrenceUnit::Monthly);
        let yearly = monthly(RecurrenceUnit::Yearly);
        prop_assert!(daily > weekly);
        prop_assert!(weekly > per_month);
        prop_assert!(per_month > yearly);
    }

    /// Monthly billing with interval one is the identity.
    #[test]
    fn prop_monthly_identity(total in arb_amount()) {
        prop_assert_eq!(
            monthly_equivalent_for(total, RecurrenceUnit::Monthly, 1).unwrap(),
            total
        );
    }

    /// Non-positive intervals are rejected for every unit.
    #[test]
    fn prop_non_positive_interval_rejected(
        total in arb_amount(),
        unit in arb_unit(),
        interval in -100i32..=0,
    ) {
        let result = monthly_equivalent_for(total, unit, interval);
        prop_assert!(matches!(result, Err(Error::Recurrence(_))));
    }

    /// Unit names round-trip through parsing; anything else is unknown.
    #[test]
    fn prop_unknown_units_rejected(name in "[a-z]{1,10}") {
        match name.parse::<RecurrenceUnit>() {
            Ok(unit) => prop_assert_eq!(unit.as_str(), name.as_str()),
            Err(err) => prop_assert!(err.to_string().contains(&name)),
        }
    }
}
