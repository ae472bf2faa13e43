use std::borrow::Cow;

use validator::ValidationError;
use zxcvbn::zxcvbn;

const MIN_LENGTH: usize = 8;
const PORTFOLIO_WORDS: [&str; 3] = ["portfolio", "admin", "resume"];

fn rejected(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// Password policy for the administrator account: length, character mix and
/// a zxcvbn score of at least 3.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_LENGTH {
        return Err(rejected("password_length", format!("Must be at least {MIN_LENGTH} characters")));
    }

    let has_upper = password.chars().any(char::is_uppercase);
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace());
    if !(has_upper && has_digit && has_symbol) {
        return Err(rejected("password_complexity", "Must include uppercase, number, and symbol"));
    }

    let estimate = zxcvbn(password, &PORTFOLIO_WORDS);
    if (estimate.score() as u8) < 3 {
        let hint = estimate
            .feedback()
            .and_then(|f| f.warning().map(|w| w.to_string()))
            .unwrap_or_else(|| "Password is too easy to guess".to_string());
        return Err(rejected("password_strength", hint));
    }

    Ok(())
}
