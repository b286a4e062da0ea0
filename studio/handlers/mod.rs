pub mod details;
pub mod networks;
