/// Property-based tests for invoice amount calculation
///
/// Verifies the core invariants across a wide input range:
/// sub_total = rent + water + electricity + addon_total + previous_balance
/// net_amount = sub_total + penalty_total
use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use rentledger::invoices::models::{ChargeBreakdown, Invoice, InvoiceStatus};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

proptest! {
    /// Property: net_amount = sub_total + penalty_total for any fresh invoice
    #[test]
    fn test_net_amount_invariant(
        rent in 1u32..1_000_000u32,
        water_unit in 0u32..10_000u32,
        water_rate in 0u32..1_000u32,
        electricity_unit in 0u32..10_000u32,
        electricity_rate in 0u32..1_000u32,
        addon in 0u32..100_000u32,
        penalty in 0u32..100_000u32,
    ) {
        let breakdown = ChargeBreakdown::new(
            Decimal::from(rent),
            Decimal::from(water_unit),
            Decimal::from(water_rate),
            Decimal::from(electricity_unit),
            Decimal::from(electricity_rate),
            Decimal::from(addon),
        ).unwrap();

        let invoice = Invoice::issue(
            "ct-1".to_string(),
            &breakdown,
            Decimal::from(penalty),
            date(2026, 1, 1),
            date(2026, 1, 16),
        );

        prop_assert_eq!(invoice.net_amount, invoice.sub_total + invoice.penalty_total);
        prop_assert_eq!(invoice.remaining_balance, invoice.net_amount - invoice.paid_amount);
        prop_assert!(invoice.net_amount >= invoice.sub_total);
    }

    /// Property: sub_total is the exact sum of its line amounts
    #[test]
    fn test_sub_total_composition(
        rent in 1u32..1_000_000u32,
        water_unit in 0u32..10_000u32,
        water_rate in 0u32..1_000u32,
        electricity_unit in 0u32..10_000u32,
        electricity_rate in 0u32..1_000u32,
        addon in 0u32..100_000u32,
        previous in 0u32..1_000_000u32,
    ) {
        let breakdown = ChargeBreakdown::new(
            Decimal::from(rent),
            Decimal::from(water_unit),
            Decimal::from(water_rate),
            Decimal::from(electricity_unit),
            Decimal::from(electricity_rate),
            Decimal::from(addon),
        ).unwrap();

        let invoice = Invoice::rollover(
            "ct-1".to_string(),
            &breakdown,
            Decimal::from(previous),
            date(2026, 1, 1),
            date(2026, 1, 16),
        );

        let expected = invoice.rent
            + invoice.water
            + invoice.electricity
            + invoice.addon_total
            + invoice.previous_balance;

        prop_assert_eq!(invoice.sub_total, expected);
    }

    /// Property: utility amounts are unit * rate
    #[test]
    fn test_utility_amounts_are_unit_times_rate(
        water_unit in 0u32..10_000u32,
        water_rate in 0u32..1_000u32,
        electricity_unit in 0u32..10_000u32,
        electricity_rate in 0u32..1_000u32,
    ) {
        let breakdown = ChargeBreakdown::new(
            dec!(1000),
            Decimal::from(water_unit),
            Decimal::from(water_rate),
            Decimal::from(electricity_unit),
            Decimal::from(electricity_rate),
            dec!(0),
        ).unwrap();

        prop_assert_eq!(breakdown.water, Decimal::from(water_unit) * Decimal::from(water_rate));
        prop_assert_eq!(
            breakdown.electricity,
            Decimal::from(electricity_unit) * Decimal::from(electricity_rate)
        );
    }
}

#[test]
fn test_rent_water_electricity_addon_scenario() {
    // rent=4000, water=100, electricity=200, one asset addon fee=300
    let breakdown = ChargeBreakdown::new(
        dec!(4000),
        dec!(10),
        dec!(10),
        dec!(40),
        dec!(5),
        dec!(300),
    )
    .unwrap();

    let invoice = Invoice::issue(
        "ct-1".to_string(),
        &breakdown,
        Decimal::ZERO,
        date(2026, 1, 1),
        date(2026, 1, 16),
    );

    assert_eq!(invoice.sub_total, dec!(4600));
    assert_eq!(invoice.net_amount, dec!(4600));
    assert_eq!(invoice.status, InvoiceStatus::Unpaid);
}

#[test]
fn test_invoice_without_utilities_or_addons() {
    let breakdown =
        ChargeBreakdown::new(dec!(3500), dec!(0), dec!(10), dec!(0), dec!(5), dec!(0)).unwrap();

    let invoice = Invoice::issue(
        "ct-1".to_string(),
        &breakdown,
        Decimal::ZERO,
        date(2026, 1, 1),
        date(2026, 1, 16),
    );

    assert_eq!(invoice.sub_total, dec!(3500));
    assert_eq!(invoice.net_amount, dec!(3500));
}

#[test]
fn test_validation_rejects_before_any_amounts_derived() {
    assert!(ChargeBreakdown::new(dec!(0), dec!(0), dec!(0), dec!(0), dec!(0), dec!(0)).is_err());
    assert!(
        ChargeBreakdown::new(dec!(4000), dec!(-1), dec!(10), dec!(0), dec!(0), dec!(0)).is_err()
    );
    assert!(
        ChargeBreakdown::new(dec!(4000), dec!(1), dec!(10), dec!(0), dec!(0), dec!(-5)).is_err()
    );
}
