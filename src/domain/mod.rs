pub mod export;
pub mod ticket;
