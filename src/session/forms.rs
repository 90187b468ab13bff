//! Sign-in and registration form input.

use crate::form::{require, require_email, FormError, MIN_PASSWORD_LEN};
use crate::gateway::{LoginRequest, RegisterRequest};

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<LoginRequest, FormError> {
        require_email(&self.email)?;
        require("Password", &self.password)?;

        Ok(LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub email: String,
    /// Optional; blank means not given
    pub phone: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<RegisterRequest, FormError> {
        require("First name", &self.first_name)?;
        require("Last name", &self.last_name)?;
        require_email(&self.email)?;

        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(FormError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }

        let phone = self.phone.trim();

        Ok(RegisterRequest {
            email: self.email.trim().to_string(),
            phone: (!phone.is_empty()).then(|| phone.to_string()),
            password: self.password.clone(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_form() -> RegisterForm {
        RegisterForm {
            email: " priya@example.in ".into(),
            phone: "  ".into(),
            password: "secret1".into(),
            first_name: "Priya".into(),
            last_name: "Singh".into(),
        }
    }

    #[test]
    fn test_register_trims_and_drops_blank_phone() {
        let request = register_form().validate().unwrap();
        assert_eq!(request.email, "priya@example.in");
        assert_eq!(request.phone, None);
    }

    #[test]
    fn test_register_password_minimum() {
        let form = RegisterForm {
            password: "12345".into(),
            ..register_form()
        };
        assert_eq!(
            form.validate().unwrap_err(),
            FormError::PasswordTooShort { min: 6 }
        );
    }

    #[test]
    fn test_register_requires_names() {
        let form = RegisterForm {
            last_name: String::new(),
            ..register_form()
        };
        assert_eq!(form.validate().unwrap_err(), FormError::Missing("Last name"));
    }

    #[test]
    fn test_login_requires_password() {
        let form = LoginForm {
            email: "ravi@example.in".into(),
            password: String::new(),
        };
        assert_eq!(form.validate().unwrap_err(), FormError::Missing("Password"));
    }
}
