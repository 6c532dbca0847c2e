pub mod fallback;
pub mod format;
pub mod parser;
pub mod prompt;
pub mod ticket;
