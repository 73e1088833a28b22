use crate::dto::{LoginRequest, RefreshRequest, RegisterRequest};
use atlas::auth::{LoginInput, MIN_PASSWORD_LEN, RegisterInput, validate_password_length};

#[derive(Debug, PartialEq, Eq)]
pub enum ValidationError {
    MissingRequiredField { field: &'static str },
    InvalidEmail,
    PasswordTooShort { min: usize },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingRequiredField { field } => {
                write!(f, "Missing required field '{}'", field)
            }
            ValidationError::InvalidEmail => write!(f, "Field 'email' is not a valid email address"),
            ValidationError::PasswordTooShort { min } => {
                write!(f, "Field 'password' must be at least {} characters", min)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

pub fn validate_register(req: RegisterRequest) -> Result<RegisterInput, ValidationError> {
    require("email", &req.email)?;
    require("password", &req.password)?;
    require("full_name", &req.full_name)?;
    validate_email(&req.email)?;

    validate_password_length(&req.password)
        .map_err(|_| ValidationError::PasswordTooShort { min: MIN_PASSWORD_LEN })?;

    Ok(RegisterInput {
        email: req.email,
        password: req.password,
        full_name: req.full_name,
    })
}

pub fn validate_login(req: LoginRequest) -> Result<LoginInput, ValidationError> {
    require("email", &req.email)?;
    require("password", &req.password)?;
    validate_email(&req.email)?;

    Ok(LoginInput {
        email: req.email,
        password: req.password,
    })
}

pub fn validate_refresh(req: RefreshRequest) -> Result<String, ValidationError> {
    require("refresh_token", &req.refresh_token)?;
    Ok(req.refresh_token)
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingRequiredField { field });
    }
    Ok(())
}

/// Structural check only: `local@domain.tld`, no whitespace
fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidEmail);
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::InvalidEmail);
    };

    let domain_ok = !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..");

    if local.is_empty() || !domain_ok {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(email: &str, password: &str, full_name: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            full_name: full_name.to_string(),
        }
    }

    #[test]
    fn test_valid_register() {
        let input = validate_register(register("a@x.com", "secret1", "Alice")).unwrap();
        assert_eq!(input.email, "a@x.com");
        assert_eq!(input.password, "secret1");
        assert_eq!(input.full_name, "Alice");
    }

    #[test]
    fn test_register_missing_fields() {
        assert_eq!(
            validate_register(register("", "secret1", "Alice")).unwrap_err(),
            ValidationError::MissingRequiredField { field: "email" }
        );
        assert_eq!(
            validate_register(register("a@x.com", "", "Alice")).unwrap_err(),
            ValidationError::MissingRequiredField { field: "password" }
        );
        assert_eq!(
            validate_register(register("a@x.com", "secret1", "   ")).unwrap_err(),
            ValidationError::MissingRequiredField { field: "full_name" }
        );
    }

    #[test]
    fn test_register_short_password() {
        assert_eq!(
            validate_register(register("a@x.com", "12345", "Alice")).unwrap_err(),
            ValidationError::PasswordTooShort { min: 6 }
        );
        assert!(validate_register(register("a@x.com", "123456", "Alice")).is_ok());
    }

    #[test]
    fn test_email_shapes() {
        for good in ["a@x.com", "first.last@sub.example.org", "A+tag@x.io"] {
            assert!(validate_email(good).is_ok(), "{} should pass", good);
        }

        for bad in ["ax.com", "@x.com", "a@", "a@x", "a@.com", "a@x.", "a@@x.com", "a b@x.com", "a@x..com"] {
            assert_eq!(validate_email(bad), Err(ValidationError::InvalidEmail), "{} should fail", bad);
        }
    }

    #[test]
    fn test_login_does_not_check_length() {
        let req = LoginRequest {
            email: "a@x.com".to_string(),
            password: "x".to_string(),
        };
        assert!(validate_login(req).is_ok());
    }

    #[test]
    fn test_refresh_requires_token() {
        let req = RefreshRequest {
            refresh_token: String::new(),
        };
        assert_eq!(
            validate_refresh(req).unwrap_err(),
            ValidationError::MissingRequiredField { field: "refresh_token" }
        );
    }
}
