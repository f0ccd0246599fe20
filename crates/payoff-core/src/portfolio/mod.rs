pub mod holdings;
pub mod purchase;
