pub mod conversion;
pub mod displacement;
