pub mod addon_fee_resolver;

pub use addon_fee_resolver::AddonFeeResolver;
