pub mod asset_repository;

pub use asset_repository::AssetRepository;
