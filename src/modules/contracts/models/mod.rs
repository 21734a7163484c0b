pub mod contract;

pub use contract::{Contract, ContractResolution, ContractStatus};
