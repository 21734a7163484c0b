pub mod breakdown;
pub mod invoice;
pub mod requests;

pub use breakdown::ChargeBreakdown;
pub use invoice::{Invoice, InvoiceStatus};
pub use requests::{CreateInvoiceRequest, InvoiceResponse};
