//! Input validation for admin forms. Submission is blocked entirely while
//! any field is invalid.

use std::{collections::BTreeMap, fmt, sync::LazyLock};

use regex::Regex;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]{2,}$").unwrap());

pub const MIN_PHONE_DIGITS: usize = 6;
pub const MAX_PHONE_DIGITS: usize = 15;
pub const MIN_PASSWORD_LEN: usize = 8;

/// Whether a form is creating a record or editing an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

/// Field name -> message for every invalid field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    pub fn require(&mut self, field: &str, value: &str) -> bool {
        if value.trim().is_empty() {
            self.add(field, "Este campo es obligatorio");
            false
        } else {
            true
        }
    }

    pub fn email(&mut self, field: &str, value: &str) {
        if self.require(field, value) && !is_valid_email(value) {
            self.add(field, "Ingrese un correo electrónico válido");
        }
    }

    pub fn phone(&mut self, field: &str, value: &str) {
        if self.require(field, value) && !is_valid_phone(value) {
            self.add(
                field,
                format!(
                    "El celular debe contener solo números ({MIN_PHONE_DIGITS} a {MAX_PHONE_DIGITS} dígitos)"
                ),
            );
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Forms validate themselves before any request is built.
pub trait Validate {
    fn validate(&self, mode: FormMode) -> Result<(), ValidationErrors>;
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value.trim())
}

pub fn is_valid_phone(value: &str) -> bool {
    let value = value.trim();
    (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&value.len())
        && value.chars().all(|c| c.is_ascii_digit())
}

/// Keeps only the digits, as the phone inputs do while typing.
pub fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(is_valid_email("ventas@yuntaspublicidad.com"));
        assert!(!is_valid_email("ventas@yuntas"));
        assert!(!is_valid_email("ventas yuntas@x.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_phone() {
        assert!(is_valid_phone("987654321"));
        assert!(!is_valid_phone("98765-4321"));
        assert!(!is_valid_phone("123"));
        assert_eq!(digits_only("+51 987-654-321"), "51987654321");
    }

    #[test]
    fn test_errors_collect_first_message_per_field() {
        let mut errors = ValidationErrors::new();
        errors.email("email", "");
        errors.phone("celular", "abc123");
        errors.add("email", "ignored");
        assert_eq!(errors.get("email"), Some("Este campo es obligatorio"));
        assert!(errors.get("celular").unwrap().contains("solo números"));
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["celular", "email"]);
        assert!(errors.into_result().is_err());
    }
}
