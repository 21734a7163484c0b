pub mod contract_resolver;

pub use contract_resolver::ContractResolver;
