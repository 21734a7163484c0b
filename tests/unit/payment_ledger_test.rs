/// Tests for the payment ledger's aggregation policy and the invoice
/// settlement rules driven by it
use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use rentledger::invoices::models::{ChargeBreakdown, Invoice, InvoiceStatus};
use rentledger::payments::models::{
    LedgerTotals, PaymentMethod, PaymentRecord, PaymentStatus,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn invoice_with_net(net: Decimal) -> Invoice {
    let breakdown =
        ChargeBreakdown::new(net, dec!(0), dec!(0), dec!(0), dec!(0), dec!(0)).unwrap();
    Invoice::issue(
        "ct-1".to_string(),
        &breakdown,
        Decimal::ZERO,
        date(2026, 1, 1),
        date(2026, 1, 16),
    )
}

fn payment(amount: Decimal, status: PaymentStatus) -> PaymentRecord {
    let mut record = PaymentRecord::new(
        "inv-1".to_string(),
        amount,
        PaymentMethod::Cash,
        Utc::now(),
        None,
        None,
        None,
    )
    .unwrap();
    record.status = status;
    record
}

#[test]
fn test_single_partial_payment() {
    // netAmount=4300, one cash payment of 1500
    let mut invoice = invoice_with_net(dec!(4300));
    let records = vec![payment(dec!(1500), PaymentStatus::Confirmed)];

    let totals = LedgerTotals::from_records(&records);
    invoice.apply_received(totals.received());

    assert_eq!(invoice.paid_amount, dec!(1500));
    assert_eq!(invoice.remaining_balance, dec!(2800));
    assert_eq!(invoice.status, InvoiceStatus::Unpaid);
}

#[test]
fn test_multiple_payments_accumulate() {
    let mut invoice = invoice_with_net(dec!(4300));
    let records = vec![
        payment(dec!(1500), PaymentStatus::Confirmed),
        payment(dec!(2800), PaymentStatus::Confirmed),
    ];

    let totals = LedgerTotals::from_records(&records);
    invoice.apply_received(totals.received());

    assert_eq!(invoice.paid_amount, dec!(4300));
    assert_eq!(invoice.remaining_balance, dec!(0));
    assert_eq!(invoice.status, InvoiceStatus::Settled);
}

#[test]
fn test_pending_payments_count_toward_settlement() {
    let mut invoice = invoice_with_net(dec!(2000));
    let records = vec![
        payment(dec!(1200), PaymentStatus::Confirmed),
        payment(dec!(800), PaymentStatus::Pending),
    ];

    let totals = LedgerTotals::from_records(&records);
    assert_eq!(totals.confirmed, dec!(1200));
    assert_eq!(totals.pending, dec!(800));

    invoice.apply_received(totals.received());
    assert_eq!(invoice.status, InvoiceStatus::Settled);
}

#[test]
fn test_rejected_payments_never_count() {
    let mut invoice = invoice_with_net(dec!(2000));
    let records = vec![
        payment(dec!(2000), PaymentStatus::Rejected),
        payment(dec!(500), PaymentStatus::Confirmed),
    ];

    let totals = LedgerTotals::from_records(&records);
    invoice.apply_received(totals.received());

    assert_eq!(invoice.paid_amount, dec!(500));
    assert_eq!(invoice.remaining_balance, dec!(1500));
    assert_eq!(invoice.status, InvoiceStatus::Unpaid);
}

#[test]
fn test_deleting_settling_payment_reverts_status() {
    let mut invoice = invoice_with_net(dec!(3000));

    // Two payments settle the invoice
    let mut records = vec![
        payment(dec!(1000), PaymentStatus::Confirmed),
        payment(dec!(2000), PaymentStatus::Confirmed),
    ];
    invoice.apply_received(LedgerTotals::from_records(&records).received());
    assert_eq!(invoice.status, InvoiceStatus::Settled);

    // Delete the settling payment; remaining balance recomputes upward
    records.pop();
    invoice.apply_received(LedgerTotals::from_records(&records).received());

    assert_eq!(invoice.status, InvoiceStatus::Unpaid);
    assert_eq!(invoice.paid_amount, dec!(1000));
    assert_eq!(invoice.remaining_balance, dec!(2000));
}

#[test]
fn test_overpayment_is_accepted_as_is() {
    let mut invoice = invoice_with_net(dec!(1000));
    let records = vec![payment(dec!(1500), PaymentStatus::Confirmed)];

    invoice.apply_received(LedgerTotals::from_records(&records).received());

    assert_eq!(invoice.paid_amount, dec!(1500));
    assert_eq!(invoice.remaining_balance, dec!(-500));
    assert_eq!(invoice.status, InvoiceStatus::Settled);
}

proptest! {
    /// Property: remaining_balance = net_amount - received after any ledger
    /// state, and settlement is exactly remaining <= 0
    #[test]
    fn test_remaining_balance_invariant(
        net in 1u32..1_000_000u32,
        amounts in prop::collection::vec(1u32..100_000u32, 0..8),
        statuses in prop::collection::vec(0u8..3u8, 0..8),
    ) {
        let mut invoice = invoice_with_net(Decimal::from(net));

        let records: Vec<PaymentRecord> = amounts
            .iter()
            .zip(statuses.iter().chain(std::iter::repeat(&0u8)))
            .map(|(amount, status)| {
                let status = match *status {
                    0 => PaymentStatus::Confirmed,
                    1 => PaymentStatus::Pending,
                    _ => PaymentStatus::Rejected,
                };
                payment(Decimal::from(*amount), status)
            })
            .collect();

        let totals = LedgerTotals::from_records(&records);
        invoice.apply_received(totals.received());

        prop_assert_eq!(invoice.remaining_balance, invoice.net_amount - totals.received());
        prop_assert_eq!(
            invoice.status == InvoiceStatus::Settled,
            invoice.remaining_balance <= Decimal::ZERO
        );
        // Net invariant survives payment mutations
        prop_assert_eq!(invoice.net_amount, invoice.sub_total + invoice.penalty_total);
    }
}
