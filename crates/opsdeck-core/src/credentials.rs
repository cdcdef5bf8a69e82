// Login form validation, run before any network call.

use secrecy::{ExposeSecret, SecretString};

use crate::error::CoreError;

pub const PASSWORD_MIN: usize = 2;
pub const PASSWORD_MAX: usize = 50;

/// Check email shape and password length. Reports the first bad field.
pub fn validate(email: &str, password: &SecretString) -> Result<(), CoreError> {
    if !is_email(email.trim()) {
        return Err(CoreError::ValidationFailed {
            field: "email",
            message: "Enter a valid email address".into(),
        });
    }

    let len = password.expose_secret().chars().count();
    if len < PASSWORD_MIN {
        return Err(CoreError::ValidationFailed {
            field: "password",
            message: format!("Password must be at least {PASSWORD_MIN} characters"),
        });
    }
    if len > PASSWORD_MAX {
        return Err(CoreError::ValidationFailed {
            field: "password",
            message: format!("Password must be at most {PASSWORD_MAX} characters"),
        });
    }
    Ok(())
}

/// `local@domain.tld`, no whitespace, one `@`, no empty domain labels.
fn is_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn check(email: &str, password: &str) -> Result<(), CoreError> {
        validate(email, &SecretString::from(password))
    }

    #[test]
    fn accepts_plain_credentials() {
        assert!(check("olive@opsdeck.dev", "pw").is_ok());
        assert!(check("  olive@opsdeck.dev ", "pw").is_ok());
    }

    #[test]
    fn rejects_bad_emails() {
        for email in [
            "",
            "olive",
            "@opsdeck.dev",
            "olive@",
            "olive@dev",
            "a@b@c.io",
            "a b@c.io",
            "a@c..io",
        ] {
            let err = check(email, "pw").unwrap_err();
            assert!(
                matches!(err, CoreError::ValidationFailed { field: "email", .. }),
                "{email:?} passed"
            );
        }
    }

    #[test]
    fn enforces_password_bounds() {
        assert!(matches!(
            check("a@b.io", "p"),
            Err(CoreError::ValidationFailed {
                field: "password",
                ..
            })
        ));
        assert!(check("a@b.io", &"x".repeat(50)).is_ok());
        assert!(check("a@b.io", &"x".repeat(51)).is_err());
    }
}
