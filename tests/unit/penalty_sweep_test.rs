/// Tests for the overdue late-penalty rule and its idempotence
use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use rentledger::core::money;
use rentledger::invoices::models::{ChargeBreakdown, Invoice, InvoiceStatus};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn overdue_invoice(rent: Decimal) -> Invoice {
    let breakdown =
        ChargeBreakdown::new(rent, dec!(0), dec!(0), dec!(0), dec!(0), dec!(0)).unwrap();
    // Due two days before the sweep's "today" of 2026-01-17
    Invoice::issue(
        "ct-1".to_string(),
        &breakdown,
        Decimal::ZERO,
        date(2026, 1, 1),
        date(2026, 1, 15),
    )
}

#[test]
fn test_overdue_invoice_picks_up_ten_percent_penalty() {
    let mut invoice = overdue_invoice(dec!(1000));
    let today = date(2026, 1, 17);

    assert!(invoice.is_overdue(today));
    assert!(invoice.apply_late_penalty());

    assert_eq!(invoice.penalty_total, dec!(100));
    assert_eq!(invoice.net_amount, dec!(1100));
    assert_eq!(invoice.remaining_balance, dec!(1100));
}

#[test]
fn test_second_sweep_leaves_amounts_unchanged() {
    let mut invoice = overdue_invoice(dec!(1000));

    assert!(invoice.apply_late_penalty());
    let penalty_after_first = invoice.penalty_total;
    let net_after_first = invoice.net_amount;

    assert!(!invoice.apply_late_penalty());
    assert_eq!(invoice.penalty_total, penalty_after_first);
    assert_eq!(invoice.net_amount, net_after_first);
}

#[test]
fn test_penalty_skips_settled_invoice() {
    let mut invoice = overdue_invoice(dec!(1000));
    invoice.apply_received(dec!(1000));
    assert_eq!(invoice.status, InvoiceStatus::Settled);

    assert!(!invoice.apply_late_penalty());
    assert_eq!(invoice.penalty_total, dec!(0));
}

#[test]
fn test_penalty_respects_existing_override() {
    let breakdown =
        ChargeBreakdown::new(dec!(1000), dec!(0), dec!(0), dec!(0), dec!(0), dec!(0)).unwrap();
    let mut invoice = Invoice::issue(
        "ct-1".to_string(),
        &breakdown,
        dec!(250),
        date(2026, 1, 1),
        date(2026, 1, 15),
    );

    // Already penalized at creation; the sweep must not stack another
    assert!(!invoice.apply_late_penalty());
    assert_eq!(invoice.penalty_total, dec!(250));
    assert_eq!(invoice.net_amount, dec!(1250));
}

#[test]
fn test_penalty_is_integer_rounded() {
    // 10% of 1005 = 100.5 -> rounds to the integer amount 100
    assert_eq!(money::late_penalty(dec!(1005)), dec!(100));
    // 10% of 1015 = 101.5 -> banker's rounding lands on 102
    assert_eq!(money::late_penalty(dec!(1015)), dec!(102));
    assert_eq!(money::late_penalty(dec!(4000)), dec!(400));
}

proptest! {
    /// Property: applying the penalty twice equals applying it once
    #[test]
    fn test_penalty_never_compounds(rent in 1u32..1_000_000u32) {
        let mut once = overdue_invoice(Decimal::from(rent));
        once.apply_late_penalty();

        let mut twice = overdue_invoice(Decimal::from(rent));
        twice.apply_late_penalty();
        twice.apply_late_penalty();

        prop_assert_eq!(once.penalty_total, twice.penalty_total);
        prop_assert_eq!(once.net_amount, twice.net_amount);
        prop_assert_eq!(once.penalty_total, money::late_penalty(Decimal::from(rent)));
    }

    /// Property: the net invariant holds after the sweep mutation
    #[test]
    fn test_net_invariant_after_sweep(rent in 1u32..1_000_000u32, paid in 0u32..1_000_000u32) {
        let mut invoice = overdue_invoice(Decimal::from(rent));
        invoice.apply_received(Decimal::from(paid));
        invoice.apply_late_penalty();

        prop_assert_eq!(invoice.net_amount, invoice.sub_total + invoice.penalty_total);
        prop_assert_eq!(invoice.remaining_balance, invoice.net_amount - invoice.paid_amount);
    }
}
