//! Customer phone numbers and the dialing plan used to normalise them.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input is longer than any real phone number.
    #[error("phone number must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains no digits at all.
    #[error("phone number must contain digits")]
    NoDigits,
}

/// A phone number as the customer typed it at checkout.
///
/// The original text is preserved for display and invoices. Comparisons
/// between customers go through [`DialingPlan::normalize`], which reduces
/// the number to the international digits WhatsApp expects.
///
/// ## Examples
///
/// ```
/// use wholesale_core::{DialingPlan, Phone};
///
/// let phone = Phone::parse("0300-1234567").unwrap();
/// assert_eq!(DialingPlan::default().normalize(&phone), "923001234567");
///
/// assert!(Phone::parse("   ").is_err());
/// assert!(Phone::parse("call me").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Maximum accepted input length.
    pub const MAX_LENGTH: usize = 32;

    /// Parse a `Phone` from user input. Surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, too long, or has no digits.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(PhoneError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if !s.chars().any(|c| c.is_ascii_digit()) {
            return Err(PhoneError::NoDigits);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the phone number as entered.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Only the ASCII digits of the number.
    #[must_use]
    pub fn digits(&self) -> String {
        self.0.chars().filter(char::is_ascii_digit).collect()
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Country dialing rules for turning local numbers into international ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialingPlan {
    /// Country calling code without `+` (e.g. `92`).
    pub country_code: String,
    /// Domestic trunk prefix replaced by the country code (e.g. `0`).
    pub trunk_prefix: char,
}

impl DialingPlan {
    /// Create a dialing plan.
    #[must_use]
    pub fn new(country_code: impl Into<String>, trunk_prefix: char) -> Self {
        Self {
            country_code: country_code.into(),
            trunk_prefix,
        }
    }

    /// International digits for a phone number.
    ///
    /// Non-digits are stripped. A number already starting with the country
    /// code is kept; a leading trunk prefix is replaced by the country code;
    /// anything else gets the country code prepended.
    #[must_use]
    pub fn normalize(&self, phone: &Phone) -> String {
        self.normalize_digits(&phone.digits())
    }

    fn normalize_digits(&self, digits: &str) -> String {
        if digits.starts_with(self.country_code.as_str()) {
            return digits.to_owned();
        }

        match digits.strip_prefix(self.trunk_prefix) {
            Some(local) => format!("{}{local}", self.country_code),
            None => format!("{}{digits}", self.country_code),
        }
    }
}

impl Default for DialingPlan {
    fn default() -> Self {
        Self::new("92", '0')
    }
}
