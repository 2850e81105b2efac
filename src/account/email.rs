use serde::{Deserialize, Serialize};
use std::fmt;

/// An address that passed [`Email::parse`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

/// Returned when the input does not look like `local@domain.tld`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a valid email address")]
pub struct InvalidEmail(pub String);

impl Email {
    /// Accepts `local@domain` where neither side contains whitespace or `@`,
    /// and the domain has a dot with at least one character on each side.
    ///
    /// Surrounding whitespace is trimmed first.
    pub fn parse(raw: &str) -> Result<Self, InvalidEmail> {
        let candidate = raw.trim();
        if is_valid(candidate) {
            Ok(Self(candidate.to_string()))
        } else {
            Err(InvalidEmail(candidate.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Characters that may not appear in any part of an address: Unicode
/// `White_Space` minus U+0085, plus the byte order mark U+FEFF.
fn is_pattern_space(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{feff}'
}

fn is_valid(candidate: &str) -> bool {
    if candidate.chars().any(is_pattern_space) {
        return false;
    }

    let Some((local, domain)) = candidate.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    let chars: Vec<char> = domain.chars().collect();
    chars
        .iter()
        .enumerate()
        .any(|(i, &c)| c == '.' && i > 0 && i + 1 < chars.len())
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Email {
    type Error = InvalidEmail;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}
