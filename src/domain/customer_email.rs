use std::fmt::Display;

/// An email address in its canonical stored form: trimmed and lowercase.
///
/// Two addresses that differ only in letter case parse to the same value, which
/// is what the uniqueness rule on customers compares.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomerEmail(String);

impl CustomerEmail {
    /// Normalise `s`, rejecting input that is blank after trimming.
    ///
    /// The shape of the address is not checked here; that happens in the form
    /// validation that runs before a candidate reaches the service.
    pub fn parse(s: &str) -> Result<Self, String> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("Email address cannot be blank".to_string());
        }

        Ok(Self(trimmed.to_lowercase()))
    }
}

impl Display for CustomerEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for CustomerEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<CustomerEmail> for String {
    fn from(email: CustomerEmail) -> Self {
        email.0
    }
}
