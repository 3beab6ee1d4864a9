use crate::{Error, Result};
use std::str::FromStr;

/// The value shipped in sample configs in place of a real key.
pub const PLACEHOLDER: &str = "YOUR_GEMINI_API_KEY_HERE";

/// An API key that passed the local checks. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(key: impl AsRef<str>) -> Result<Self> {
        let key = key.as_ref().trim();
        if key.is_empty() {
            return Err(Error::MissingCredential);
        }
        if key == PLACEHOLDER {
            return Err(Error::PlaceholderCredential);
        }
        Ok(Self(key.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl FromStr for Credential {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(***)")
    }
}
