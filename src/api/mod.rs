pub mod attendance;
pub mod export;
