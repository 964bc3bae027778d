use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::auth::repo_types::{Role, User};

const NAME_MIN: usize = 3;
const PASSWORD_MIN: usize = 6;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        // dot-atom local part; domain labels of 1-63 chars and an alphabetic TLD of 2+
        static ref EMAIL_RE: Regex = Regex::new(
            r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,}$"
        )
        .unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// One failed validation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Request body for user registration. Fields are optional so that missing
/// ones surface as validation messages rather than deserialization errors.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    /// Keys outside the schema; each one is a violation.
    #[serde(flatten)]
    pub unknown: BTreeMap<String, Value>,
}

/// A registration that passed validation.
#[derive(Debug)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl RegisterRequest {
    /// Checks every rule and returns either the typed registration or all
    /// violations in field order (name, email, password, role).
    pub fn validate(self) -> Result<Registration, Vec<FieldError>> {
        let mut errors = Vec::new();

        let name = required("name", self.name, &mut errors);
        if let Some(n) = &name {
            if n.chars().count() < NAME_MIN {
                errors.push(FieldError::new(
                    "name",
                    format!("\"name\" length must be at least {NAME_MIN} characters long"),
                ));
            }
        }

        let email = required("email", self.email, &mut errors);
        if let Some(e) = &email {
            if !is_valid_email(e) {
                errors.push(FieldError::new("email", "\"email\" must be a valid email"));
            }
        }

        let password = required("password", self.password, &mut errors);
        if let Some(p) = &password {
            if p.chars().count() < PASSWORD_MIN {
                errors.push(FieldError::new(
                    "password",
                    format!("\"password\" length must be at least {PASSWORD_MIN} characters long"),
                ));
            }
        }

        let role = match self.role.as_deref() {
            None => Some(Role::default()),
            Some(r) => match r.parse::<Role>() {
                Ok(role) => Some(role),
                Err(_) => {
                    errors.push(FieldError::new("role", "\"role\" must be one of [user, admin]"));
                    None
                }
            },
        };

        reject_unknown(&self.unknown, &mut errors);

        match (name, email, password, role) {
            (Some(name), Some(email), Some(password), Some(role)) if errors.is_empty() => {
                Ok(Registration {
                    name,
                    email,
                    password,
                    role,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Request body for login.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(flatten)]
    pub unknown: BTreeMap<String, Value>,
}

#[derive(Debug)]
pub struct Login {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    /// No length floor on the password here; it only has to match.
    pub fn validate(self) -> Result<Login, Vec<FieldError>> {
        let mut errors = Vec::new();

        let email = required("email", self.email, &mut errors);
        if let Some(e) = &email {
            if !is_valid_email(e) {
                errors.push(FieldError::new("email", "\"email\" must be a valid email"));
            }
        }
        let password = required("password", self.password, &mut errors);
        reject_unknown(&self.unknown, &mut errors);

        match (email, password) {
            (Some(email), Some(password)) if errors.is_empty() => Ok(Login { email, password }),
            _ => Err(errors),
        }
    }
}

fn required(
    field: &'static str,
    value: Option<String>,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match value {
        None => {
            errors.push(FieldError::new(field, format!("\"{field}\" is required")));
            None
        }
        Some(v) if v.is_empty() => {
            errors.push(FieldError::new(
                field,
                format!("\"{field}\" is not allowed to be empty"),
            ));
            None
        }
        Some(v) => Some(v),
    }
}

fn reject_unknown(unknown: &BTreeMap<String, Value>, errors: &mut Vec<FieldError>) {
    for key in unknown.keys() {
        errors.push(FieldError::new("unknown", format!("\"{key}\" is not allowed")));
    }
}

/// Public part of the user returned to the client.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for UserSummary {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            name: u.name.clone(),
            email: u.email.clone(),
            role: u.role,
        }
    }
}

/// Response returned after register or login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    #[serde(flatten)]
    pub user: UserSummary,
    pub token: String,
}
