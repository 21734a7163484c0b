pub mod payment_record;
pub mod requests;

pub use payment_record::{LedgerTotals, PaymentMethod, PaymentRecord, PaymentStatus};
pub use requests::{PaymentRecordResponse, RecordPaymentRequest, UpdatePaymentRequest};
