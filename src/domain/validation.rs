use std::collections::BTreeMap;

use validator::validate_email;

/// Per-field error messages collected while validating a submitted form.
///
/// Only the first message reported for a field is kept.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

/// Shape constraints for one text field of the registration form.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub label: &'static str,
    pub max_length: usize,
}

impl FieldRule {
    pub const fn new(name: &'static str, label: &'static str, max_length: usize) -> Self {
        Self {
            name,
            label,
            max_length,
        }
    }

    /// Trim `value` and require it to be non-blank and within the length limit.
    pub fn required(&self, value: &str, errors: &mut FieldErrors) -> String {
        let value = value.trim();
        if value.is_empty() {
            errors.add(self.name, format!("{} is required", self.label));
        } else {
            self.check_length(value, errors);
        }
        value.to_string()
    }

    /// Trim `value`; blank input becomes `None`.
    pub fn optional(&self, value: &str, errors: &mut FieldErrors) -> Option<String> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        self.check_length(value, errors);
        Some(value.to_string())
    }

    /// Like [`FieldRule::required`], additionally checking the address shape.
    pub fn email(&self, value: &str, errors: &mut FieldErrors) -> String {
        let value = value.trim();
        if value.is_empty() {
            errors.add(self.name, format!("{} is required", self.label));
        } else if !validate_email(value) {
            errors.add(self.name, "Please provide a valid email address");
        } else {
            self.check_length(value, errors);
        }
        value.to_string()
    }

    // Counted in chars to line up with the VARCHAR(n) column limits.
    fn check_length(&self, value: &str, errors: &mut FieldErrors) {
        if value.chars().count() > self.max_length {
            errors.add(
                self.name,
                format!(
                    "{} must be {} characters or less",
                    self.label, self.max_length
                ),
            );
        }
    }
}
