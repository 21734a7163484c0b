/// Tests for outstanding-balance summation, summary aggregation, and
/// rollover invoice correctness
use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use rentledger::invoices::models::{ChargeBreakdown, Invoice};
use rentledger::invoices::services::balance_tracker::{outstanding_total, summarize};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn rent_only_invoice(rent: Decimal, due: NaiveDate) -> Invoice {
    let breakdown =
        ChargeBreakdown::new(rent, dec!(0), dec!(0), dec!(0), dec!(0), dec!(0)).unwrap();
    Invoice::issue(
        "ct-1".to_string(),
        &breakdown,
        Decimal::ZERO,
        date(2026, 1, 1),
        due,
    )
}

#[test]
fn test_rollover_carries_prior_remaining_balance() {
    // Prior unsettled invoice with remaining balance 3000
    let mut prior = rent_only_invoice(dec!(4000), date(2026, 1, 16));
    prior.apply_received(dec!(1000));
    assert_eq!(prior.remaining_balance, dec!(3000));

    let outstanding = outstanding_total(std::slice::from_ref(&prior));
    assert_eq!(outstanding, dec!(3000));

    // Rollover with current charges of 2000
    let breakdown =
        ChargeBreakdown::new(dec!(2000), dec!(0), dec!(0), dec!(0), dec!(0), dec!(0)).unwrap();
    let rollover = Invoice::rollover(
        "ct-1".to_string(),
        &breakdown,
        outstanding,
        date(2026, 2, 1),
        date(2026, 2, 16),
    );

    assert_eq!(rollover.previous_balance, dec!(3000));
    assert_eq!(rollover.net_amount, dec!(5000));
    assert_eq!(rollover.remaining_balance, dec!(5000));
    assert!(rollover.has_outstanding_balance);
}

#[test]
fn test_rollover_with_no_outstanding() {
    let breakdown =
        ChargeBreakdown::new(dec!(2000), dec!(0), dec!(0), dec!(0), dec!(0), dec!(0)).unwrap();
    let rollover = Invoice::rollover(
        "ct-1".to_string(),
        &breakdown,
        Decimal::ZERO,
        date(2026, 2, 1),
        date(2026, 2, 16),
    );

    assert_eq!(rollover.previous_balance, dec!(0));
    assert_eq!(rollover.net_amount, dec!(2000));
    assert!(!rollover.has_outstanding_balance);
}

#[test]
fn test_summary_aggregates_unsettled_invoices() {
    let mut overdue = rent_only_invoice(dec!(1000), date(2026, 1, 10));
    overdue.apply_late_penalty();

    let open = rent_only_invoice(dec!(2000), date(2026, 3, 1));

    let summary = summarize(&[overdue, open], date(2026, 2, 1));
    assert_eq!(summary.total_outstanding, dec!(3100));
    assert_eq!(summary.total_penalty, dec!(100));
    assert_eq!(summary.overdue_count, 1);
    assert_eq!(summary.total_invoices, 2);
}

#[test]
fn test_overdue_is_strictly_before_today() {
    let invoice = rent_only_invoice(dec!(1000), date(2026, 2, 1));

    let on_due_day = summarize(std::slice::from_ref(&invoice), date(2026, 2, 1));
    assert_eq!(on_due_day.overdue_count, 0);

    let day_after = summarize(std::slice::from_ref(&invoice), date(2026, 2, 2));
    assert_eq!(day_after.overdue_count, 1);
}

proptest! {
    /// Property: recording a payment never increases the outstanding total
    /// (holding charges constant)
    #[test]
    fn test_outstanding_monotone_under_payments(
        rents in prop::collection::vec(1u32..100_000u32, 1..6),
        pay_index in 0usize..6,
        payment in 1u32..100_000u32,
    ) {
        let mut invoices: Vec<Invoice> = rents
            .iter()
            .map(|r| rent_only_invoice(Decimal::from(*r), date(2026, 1, 16)))
            .collect();

        let before = outstanding_total(&invoices);

        let idx = pay_index % invoices.len();
        let already_paid = invoices[idx].paid_amount;
        invoices[idx].apply_received(already_paid + Decimal::from(payment));

        // Settled invoices drop out of the unsettled set the tracker sums over
        let open: Vec<Invoice> = invoices
            .into_iter()
            .filter(|i| !i.is_settled())
            .collect();
        let after = outstanding_total(&open);

        prop_assert!(after <= before);
    }

    /// Property: rollover net amount is exactly previous balance + current
    /// charges
    #[test]
    fn test_rollover_net_is_previous_plus_current(
        rent in 1u32..1_000_000u32,
        previous in 0u32..1_000_000u32,
    ) {
        let breakdown = ChargeBreakdown::new(
            Decimal::from(rent),
            dec!(0),
            dec!(0),
            dec!(0),
            dec!(0),
            dec!(0),
        ).unwrap();

        let rollover = Invoice::rollover(
            "ct-1".to_string(),
            &breakdown,
            Decimal::from(previous),
            date(2026, 2, 1),
            date(2026, 2, 16),
        );

        prop_assert_eq!(
            rollover.net_amount,
            Decimal::from(previous) + breakdown.current_charges()
        );
        prop_assert_eq!(rollover.remaining_balance, rollover.net_amount);
    }
}
