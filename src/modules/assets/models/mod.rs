pub mod asset;

pub use asset::RoomAddon;
