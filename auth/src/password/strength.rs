use thiserror::Error;

const MIN_LENGTH: usize = 8;
const MAX_LENGTH: usize = 128;
const ALLOWED_SYMBOLS: &[char] = &['@', '$', '!', '%', '*', '?', '&'];

/// Reason a password was rejected by [`check_strength`].
///
/// Variants are listed in the order the rules are evaluated.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum WeakPassword {
    #[error("Password is required")]
    Required,

    #[error("Password too short: minimum 8 characters")]
    TooShort,

    #[error("Password too long: maximum 128 characters")]
    TooLong,

    #[error("Password needs at least one letter")]
    MissingLetter,

    #[error("Password needs at least one digit")]
    MissingDigit,

    #[error("Password may only contain letters, digits and @$!%*?&")]
    DisallowedCharacter,
}

/// Check a raw password against the strength rules.
///
/// Rules are evaluated in a fixed order and the first failing rule is
/// reported, so `"1234567"` is rejected as too short even though it also
/// lacks a letter.
///
/// # Arguments
/// * `password` - Plaintext password
///
/// # Errors
/// * `WeakPassword` - The first rule the password violates
pub fn check_strength(password: &str) -> Result<(), WeakPassword> {
    if password.trim().is_empty() {
        return Err(WeakPassword::Required);
    }

    let length = password.chars().count();
    if length < MIN_LENGTH {
        return Err(WeakPassword::TooShort);
    }
    if length > MAX_LENGTH {
        return Err(WeakPassword::TooLong);
    }

    if !password.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err(WeakPassword::MissingLetter);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(WeakPassword::MissingDigit);
    }

    if !password.chars().all(is_allowed) {
        return Err(WeakPassword::DisallowedCharacter);
    }

    Ok(())
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || ALLOWED_SYMBOLS.contains(&c)
}
