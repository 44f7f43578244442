pub mod error;
pub mod holder;
