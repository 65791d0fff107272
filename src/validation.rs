//! Form checks run before anything is sent over the network.

use thiserror::Error;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Password must be at least {0} characters long")]
    PasswordTooShort(usize),
    #[error("Passwords do not match!")]
    PasswordMismatch,
    #[error("Please accept the Terms of Service and Privacy Policy")]
    TermsNotAccepted,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub accepted_terms: bool,
}

fn required(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

/// Validates an email address.
///
/// Needs a non-empty local part and a dotted domain; the provider does the rest.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    required(email, "Email")?;

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::InvalidEmail);
    };
    let dotted = domain.contains('.') && domain.split('.').all(|label| !label.is_empty());
    if local.is_empty() || domain.contains('@') || !dotted || email.contains(char::is_whitespace) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

pub fn validate_new_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort(MIN_PASSWORD_LEN));
    }
    Ok(())
}

pub fn validate_sign_up(form: &SignUpForm) -> Result<(), ValidationError> {
    required(&form.name, "Full name")?;
    validate_email(&form.email)?;
    required(&form.password, "Password")?;
    validate_new_password(&form.password)?;
    if form.password != form.confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    if !form.accepted_terms {
        return Err(ValidationError::TermsNotAccepted);
    }
    Ok(())
}

pub fn validate_sign_in(email: &str, password: &str) -> Result<(), ValidationError> {
    required(email, "Email")?;
    required(password, "Password")?;
    Ok(())
}

/// Reset form: new password plus confirmation.
pub fn validate_password_reset(password: &str, confirm: &str) -> Result<(), ValidationError> {
    validate_new_password(password)?;
    if password != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> SignUpForm {
        SignUpForm {
            name: "Grace".into(),
            email: "grace@example.com".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
            accepted_terms: true,
        }
    }

    #[test]
    fn valid_sign_up_passes() {
        assert_eq!(validate_sign_up(&form()), Ok(()));
    }

    #[test]
    fn mismatched_passwords_are_rejected() {
        let f = SignUpForm {
            confirm_password: "secret2".into(),
            ..form()
        };
        let err = validate_sign_up(&f).unwrap_err();
        assert_eq!(err, ValidationError::PasswordMismatch);
        assert_eq!(err.to_string(), "Passwords do not match!");
    }

    #[test]
    fn sign_up_checks_run_in_form_order() {
        let f = SignUpForm {
            name: " ".into(),
            email: "bad".into(),
            ..form()
        };
        assert_eq!(validate_sign_up(&f), Err(ValidationError::Required("Full name")));

        let f = SignUpForm {
            password: "abc".into(),
            confirm_password: "abc".into(),
            ..form()
        };
        assert_eq!(validate_sign_up(&f), Err(ValidationError::PasswordTooShort(6)));

        let f = SignUpForm {
            accepted_terms: false,
            ..form()
        };
        assert_eq!(validate_sign_up(&f), Err(ValidationError::TermsNotAccepted));
    }

    #[test]
    fn email_shapes() {
        for ok in ["a@b.co", "first.last@sub.example.org", " ada@example.com "] {
            assert_eq!(validate_email(ok), Ok(()), "{ok}");
        }
        for bad in ["plain", "@example.com", "a@b", "a@.com", "a@b.", "a@b@c.com", "a b@c.com", "a@b..c"] {
            assert_eq!(validate_email(bad), Err(ValidationError::InvalidEmail), "{bad}");
        }
        assert_eq!(validate_email(""), Err(ValidationError::Required("Email")));
    }

    #[test]
    fn sign_in_requires_both_fields() {
        assert_eq!(validate_sign_in("", "x"), Err(ValidationError::Required("Email")));
        assert_eq!(validate_sign_in("a@b.co", ""), Err(ValidationError::Required("Password")));
        assert_eq!(validate_sign_in("a@b.co", "x"), Ok(()));
    }

    #[test]
    fn reset_password_rules() {
        assert_eq!(validate_password_reset("12345", "12345"), Err(ValidationError::PasswordTooShort(6)));
        assert_eq!(validate_password_reset("123456", "123457"), Err(ValidationError::PasswordMismatch));
        assert_eq!(validate_password_reset("123456", "123456"), Ok(()));
    }
}
