pub mod content;
pub mod errors;
pub mod identity;
pub mod ownership;
