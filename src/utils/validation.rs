use std::sync::LazyLock;

use mongodb::bson::oid::ObjectId;
use regex::Regex;

use crate::utils::error::CustomError;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid email regex")
});

pub fn validate_password(password: &str) -> Result<(), CustomError> {
    // Check password length
    if password.len() < 8 || password.len() > 20 {
        return Err(CustomError::ValidationError(
            "Password must be between 8 and 20 characters long.".into(),
        ));
    }

    let has_lowercase = password.chars().any(|c| c.is_lowercase());
    let has_uppercase = password.chars().any(|c| c.is_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !has_lowercase || !has_uppercase || !has_digit {
        return Err(CustomError::ValidationError(
            "Password must include at least one uppercase letter, one lowercase letter, and one number.".into(),
        ));
    }

    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), CustomError> {
    if !EMAIL_RE.is_match(email) {
        return Err(CustomError::ValidationError(
            "Please provide a valid email address.".into(),
        ));
    }
    Ok(())
}

pub fn validate_username(username: &str) -> Result<(), CustomError> {
    let len = username.chars().count();
    if !(3..=30).contains(&len) || username.chars().any(char::is_whitespace) {
        return Err(CustomError::ValidationError(
            "Username must be 3 to 30 characters without spaces.".into(),
        ));
    }
    Ok(())
}

/// Parse a 24-char hex id from a path or body; `what` names it in the error.
pub fn parse_object_id(raw: &str, what: &str) -> Result<ObjectId, CustomError> {
    ObjectId::parse_str(raw.trim())
        .map_err(|_| CustomError::BadRequestError(format!("Invalid {}", what)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_policy() {
        assert!(validate_password("Secret123").is_ok());
        assert!(validate_password("short1A").is_err());
        assert!(validate_password("alllowercase1").is_err());
        assert!(validate_password("NoDigitsHere").is_err());
        assert!(validate_password("Waytoolongpassword12345").is_err());
    }

    #[test]
    fn email_shape() {
        assert!(validate_email("jane@example.com").is_ok());
        assert!(validate_email("jane.doe+blog@mail.example.org").is_ok());
        assert!(validate_email("jane@").is_err());
        assert!(validate_email("not an email").is_err());
    }

    #[test]
    fn object_id_parsing() {
        let id = ObjectId::new();
        assert_eq!(parse_object_id(&id.to_hex(), "post ID").unwrap(), id);

        let err = parse_object_id("nope", "post ID").unwrap_err();
        assert_eq!(err.to_string(), "Bad Request: Invalid post ID");
    }

    #[test]
    fn username_rules() {
        assert!(validate_username("jane_doe").is_ok());
        assert!(validate_username("jo").is_err());
        assert!(validate_username("jane doe").is_err());
    }
}
