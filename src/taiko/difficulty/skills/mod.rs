pub mod color;
pub mod peaks;
pub mod rhythm;
pub mod stamina;
