pub mod balance_tracker;
pub mod invoice_calculator;
pub mod penalty_sweep;

pub use balance_tracker::{BalanceTracker, OutstandingSummary};
pub use invoice_calculator::InvoiceCalculator;
pub use penalty_sweep::{PenaltySweep, SweepSummary};
