//! Sanitization and validation of user-supplied text.

use votehub_core::config::ValidationConfig;
use votehub_core::error::AppError;
use votehub_core::result::AppResult;
use votehub_core::types::path::is_valid_segment;

/// Characters stripped from every name before validation.
const MARKUP_CHARS: [char; 5] = ['<', '>', '\'', '"', '&'];

/// Trim surrounding whitespace and remove markup characters.
pub fn sanitize(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !MARKUP_CHARS.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Letters, digits, spaces and accented Latin letters (U+00C0..=U+017F).
fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == ' ' || ('\u{00C0}'..='\u{017F}').contains(&c)
}

/// Validates names and messages against configured length bounds.
#[derive(Debug, Clone)]
pub struct InputValidator {
    /// Maximum voter name length.
    voter_name_max: usize,
    /// Maximum submission name length.
    submission_name_max: usize,
    /// Maximum message length.
    message_max: usize,
}

impl InputValidator {
    /// Creates a new validator from validation configuration.
    pub fn new(config: &ValidationConfig) -> Self {
        Self {
            voter_name_max: config.voter_name_max,
            submission_name_max: config.submission_name_max,
            message_max: config.message_max,
        }
    }

    /// Validates a voter display name and returns its sanitized form.
    ///
    /// Accepted names only contain letters, digits, spaces and accented
    /// Latin letters, so the result is also a legal store key.
    pub fn voter_name(&self, raw: &str) -> AppResult<String> {
        let name = sanitize(raw);
        check_length("Voter name", &name, self.voter_name_max)?;

        if !name.chars().all(is_name_char) {
            return Err(AppError::validation(
                "Voter name may only contain letters, digits and spaces",
            ));
        }

        Ok(name)
    }

    /// Validates a submitted idea name and returns its sanitized form.
    pub fn submission_name(&self, raw: &str) -> AppResult<String> {
        let name = sanitize(raw);
        check_length("Submission name", &name, self.submission_name_max)?;

        if !is_valid_segment(&name) {
            return Err(AppError::validation(
                "Submission name may not contain '.', '#', '$', '[', ']', '/' or control characters",
            ));
        }

        Ok(name)
    }

    /// Validates an activity message.
    ///
    /// Quotes are kept since messages quote item names; angle brackets,
    /// ampersands and control characters are removed.
    pub fn message(&self, raw: &str) -> AppResult<String> {
        let message: String = raw
            .trim()
            .chars()
            .filter(|c| !matches!(c, '<' | '>' | '&') && !c.is_control())
            .collect();
        check_length("Message", &message, self.message_max)?;
        Ok(message)
    }
}

impl Default for InputValidator {
    fn default() -> Self {
        Self::new(&ValidationConfig::default())
    }
}

fn check_length(what: &str, value: &str, max: usize) -> AppResult<()> {
    let len = value.chars().count();
    if len == 0 {
        return Err(AppError::validation(format!("{what} must not be empty")));
    }
    if len > max {
        return Err(AppError::validation(format!(
            "{what} is too long (maximum {max} characters)"
        )));
    }
    Ok(())
}
