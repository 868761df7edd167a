pub mod argon2;
pub mod errors;
pub mod strength;

pub use argon2::PasswordHasher;
pub use errors::PasswordError;
pub use strength::check_strength;
pub use strength::WeakPassword;
pub use ::argon2::Params as HashParams;
