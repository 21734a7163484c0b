use rust_decimal::Decimal;

/// Decimal scale for stored monetary amounts
pub const AMOUNT_SCALE: u32 = 2;

/// Late-fee percentage applied to the requested rent of an overdue invoice (10%)
pub const LATE_PENALTY_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Rounds a monetary amount to the crate-wide scale
pub fn round_amount(amount: Decimal) -> Decimal {
    amount.round_dp(AMOUNT_SCALE)
}

/// Late penalty for an invoice: 10% of the requested rent, integer-rounded.
///
/// Shared by the penalty sweep and by invoice creation for back-dated
/// invoices, so both paths always agree on the charge.
pub fn late_penalty(rent: Decimal) -> Decimal {
    (rent * LATE_PENALTY_RATE).round_dp(0)
}

/// Sums a list of monthly addon fees into one rounded amount
pub fn sum_amounts<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    round_amount(amounts.into_iter().sum())
}
