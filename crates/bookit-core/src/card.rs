//! # Card Validation
//!
//! Checks a payment form runs before any card data leaves the device.
//!
//! ## Checkout Form Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Checkout: Card Form                                                    │
//! │                                                                         │
//! │  Card number  [4242 4242 4242 4242]  ──► detect_card_brand → Visa      │
//! │                     │                    validate_card_number (Luhn)   │
//! │                     ▼                                                   │
//! │  Expiry       [12/27]                ──► format_expiry while typing    │
//! │                     │                    validate_expiry vs. today      │
//! │                     ▼                                                   │
//! │  CVV          [123]                  ──► validate_cvv(brand)            │
//! │                     │                    Amex: 4 digits, others: 3     │
//! │                     ▼                                                   │
//! │  [ Pay ]  enabled only when CardDetails::field_errors() is empty       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Brand Ranges (IIN prefixes)
//! | Brand      | Prefix            |
//! |------------|-------------------|
//! | Visa       | `4`               |
//! | Mastercard | `51`–`55`, `22`–`27` |
//! | Amex       | `34`, `37`        |

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::ValidationError;

/// Shortest card number accepted.
pub const MIN_CARD_LENGTH: usize = 13;

/// Longest card number accepted.
pub const MAX_CARD_LENGTH: usize = 19;

// =============================================================================
// Card Brand
// =============================================================================

/// Card network, detected from the leading digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum CardBrand {
    Visa,
    Mastercard,
    Amex,
    Unknown,
}

impl CardBrand {
    /// Number of CVV digits this brand prints on the card.
    pub const fn cvv_length(self) -> usize {
        match self {
            CardBrand::Amex => 4,
            _ => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CardBrand::Visa => "visa",
            CardBrand::Mastercard => "mastercard",
            CardBrand::Amex => "amex",
            CardBrand::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CardBrand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Card Number
// =============================================================================

/// Removes the separators people type into card fields (spaces, dashes).
///
/// Anything else is left in place so that validation can reject it.
pub fn clean_card_number(number: &str) -> String {
    number
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

/// Runs the Luhn checksum over a string of ASCII digits.
///
/// Returns false if any character is not a digit or the string is empty.
pub fn luhn_checksum(digits: &str) -> bool {
    if digits.is_empty() {
        return false;
    }

    let mut sum = 0u32;
    for (i, c) in digits.chars().rev().enumerate() {
        let Some(mut d) = c.to_digit(10) else {
            return false;
        };
        if i % 2 == 1 {
            d *= 2;
            if d > 9 {
                d -= 9;
            }
        }
        sum += d;
    }

    sum % 10 == 0
}

/// Validates a card number.
///
/// ## Rules
/// - Separators (spaces, dashes) are ignored
/// - Only digits remain after cleaning
/// - Length between 13 and 19
/// - Luhn checksum passes
///
/// ## Example
/// ```rust
/// use bookit_core::card::validate_card_number;
///
/// assert!(validate_card_number("4242 4242 4242 4242"));
/// assert!(!validate_card_number("4242 4242 4242 4241"));
/// assert!(!validate_card_number("4242"));
/// ```
pub fn validate_card_number(number: &str) -> bool {
    let cleaned = clean_card_number(number);

    if !(MIN_CARD_LENGTH..=MAX_CARD_LENGTH).contains(&cleaned.len()) {
        return false;
    }

    if !cleaned.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    luhn_checksum(&cleaned)
}

/// Detects the card brand from the leading digits.
///
/// Works on partial input so the form can show the logo while typing.
///
/// ```rust
/// use bookit_core::card::{detect_card_brand, CardBrand};
///
/// assert_eq!(detect_card_brand("4"), CardBrand::Visa);
/// assert_eq!(detect_card_brand("5500 0000"), CardBrand::Mastercard);
/// assert_eq!(detect_card_brand("2221"), CardBrand::Mastercard);
/// assert_eq!(detect_card_brand("3782"), CardBrand::Amex);
/// assert_eq!(detect_card_brand("6011"), CardBrand::Unknown);
/// ```
pub fn detect_card_brand(number: &str) -> CardBrand {
    let cleaned = clean_card_number(number);

    if cleaned.starts_with('4') {
        return CardBrand::Visa;
    }

    let prefix: Option<u32> = cleaned.get(..2).and_then(|p| p.parse().ok());
    match prefix {
        Some(34) | Some(37) => CardBrand::Amex,
        Some(51..=55) | Some(22..=27) => CardBrand::Mastercard,
        _ => CardBrand::Unknown,
    }
}

/// Groups digits for display: 4-4-4-4 (Amex: 4-6-5).
///
/// Non-digit characters are dropped and input is capped at 19 digits.
pub fn format_card_number(number: &str) -> String {
    let digits: String = number
        .chars()
        .filter(char::is_ascii_digit)
        .take(MAX_CARD_LENGTH)
        .collect();

    let groups: &[usize] = if detect_card_brand(&digits) == CardBrand::Amex {
        &[4, 6, 5]
    } else {
        &[4, 4, 4, 4, 3]
    };

    let mut out = String::with_capacity(digits.len() + groups.len());
    let mut rest = digits.as_str();
    for &size in groups {
        if rest.is_empty() {
            break;
        }
        let (head, tail) = rest.split_at(size.min(rest.len()));
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(head);
        rest = tail;
    }
    out.push_str(rest);
    out
}

/// Last four digits of the card, if there are at least four.
pub fn last4(number: &str) -> Option<String> {
    let cleaned = clean_card_number(number);
    let start = cleaned.len().checked_sub(4)?;
    cleaned.get(start..).map(str::to_string)
}

/// `•••• 4242`, for receipts and saved-card lists.
pub fn mask_card_number(number: &str) -> String {
    match last4(number) {
        Some(tail) => format!("•••• {tail}"),
        None => "••••".to_string(),
    }
}

// =============================================================================
// Expiry
// =============================================================================

/// Formats raw expiry input as `MM/YY` while the user types.
///
/// ```rust
/// use bookit_core::card::format_expiry;
///
/// assert_eq!(format_expiry("1225"), "12/25");
/// assert_eq!(format_expiry("12/25"), "12/25");
/// assert_eq!(format_expiry("12"), "12");
/// assert_eq!(format_expiry("122"), "12/2");
/// ```
pub fn format_expiry(input: &str) -> String {
    let digits: String = input
        .chars()
        .filter(char::is_ascii_digit)
        .take(4)
        .collect();

    if digits.len() < 3 {
        return digits;
    }

    let (month, year) = digits.split_at(2);
    format!("{month}/{year}")
}

/// Parses an expiry into `(month, four-digit year)`.
///
/// Accepts `MM/YY`, `MM/YYYY` and `MMYY`. Two-digit years are read as
/// 20YY. Returns `None` when the month is outside 1-12 or the shape is wrong.
pub fn parse_expiry(input: &str) -> Option<(u32, i32)> {
    let trimmed: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if !trimmed.is_ascii() {
        return None;
    }

    let (month_part, year_part) = match trimmed.split_once('/') {
        Some((m, y)) => (m.to_string(), y.to_string()),
        None if trimmed.len() == 4 => {
            let (m, y) = trimmed.split_at(2);
            (m.to_string(), y.to_string())
        }
        None => return None,
    };

    if month_part.is_empty()
        || month_part.len() > 2
        || !month_part.bytes().all(|b| b.is_ascii_digit())
        || !year_part.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    let month: u32 = month_part.parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }

    let year: i32 = match year_part.len() {
        2 => 2000 + year_part.parse::<i32>().ok()?,
        4 => year_part.parse().ok()?,
        _ => return None,
    };

    Some((month, year))
}

/// Validates an expiry against a given date.
///
/// ## Rules
/// - Month must be 1-12
/// - `(year, month)` must not be strictly before `today`'s month; a card
///   expiring this month is still valid
///
/// ```rust
/// use bookit_core::card::validate_expiry;
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
/// assert!(validate_expiry("06/25", today));
/// assert!(!validate_expiry("05/25", today));
/// assert!(!validate_expiry("13/30", today));
/// ```
pub fn validate_expiry(input: &str, today: NaiveDate) -> bool {
    let Some((month, year)) = parse_expiry(input) else {
        return false;
    };

    (year, month) >= (today.year(), today.month())
}

/// [`validate_expiry`] against the device's local date.
pub fn validate_expiry_now(input: &str) -> bool {
    validate_expiry(input, chrono::Local::now().date_naive())
}

// =============================================================================
// CVV
// =============================================================================

/// Validates a CVV for the given brand.
///
/// Amex needs 4 digits; every other brand, or no brand, needs 3.
///
/// ```rust
/// use bookit_core::card::{validate_cvv, CardBrand};
///
/// assert!(validate_cvv("123", None));
/// assert!(!validate_cvv("123", Some(CardBrand::Amex)));
/// assert!(validate_cvv("1234", Some(CardBrand::Amex)));
/// ```
pub fn validate_cvv(cvv: &str, brand: Option<CardBrand>) -> bool {
    let cvv = cvv.trim();
    let expected = brand.map_or(3, CardBrand::cvv_length);

    cvv.len() == expected && cvv.bytes().all(|b| b.is_ascii_digit())
}

// =============================================================================
// Card Details
// =============================================================================

/// Everything the checkout form collects.
///
/// `Debug` masks the number and hides the CVV so card data never lands in
/// logs.
#[derive(Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CardDetails {
    pub number: String,
    /// `MM/YY` as typed.
    pub expiry: String,
    pub cvv: String,
    pub holder_name: String,
}

impl CardDetails {
    /// Detected brand of the entered number.
    pub fn brand(&self) -> CardBrand {
        detect_card_brand(&self.number)
    }

    /// Every problem with the form, in field order.
    pub fn field_errors(&self, today: NaiveDate) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if clean_card_number(&self.number).is_empty() {
            errors.push(ValidationError::Required {
                field: "card number".to_string(),
            });
        } else if !validate_card_number(&self.number) {
            errors.push(ValidationError::InvalidFormat {
                field: "card number".to_string(),
                reason: "not a valid card number".to_string(),
            });
        }

        if self.expiry.trim().is_empty() {
            errors.push(ValidationError::Required {
                field: "expiry".to_string(),
            });
        } else if parse_expiry(&self.expiry).is_none() {
            errors.push(ValidationError::InvalidFormat {
                field: "expiry".to_string(),
                reason: "use MM/YY".to_string(),
            });
        } else if !validate_expiry(&self.expiry, today) {
            errors.push(ValidationError::InThePast {
                field: "expiry".to_string(),
            });
        }

        let brand = match self.brand() {
            CardBrand::Unknown => None,
            known => Some(known),
        };
        if self.cvv.trim().is_empty() {
            errors.push(ValidationError::Required {
                field: "cvv".to_string(),
            });
        } else if !validate_cvv(&self.cvv, brand) {
            errors.push(ValidationError::InvalidFormat {
                field: "cvv".to_string(),
                reason: format!("must be {} digits", brand.map_or(3, CardBrand::cvv_length)),
            });
        }

        if self.holder_name.trim().is_empty() {
            errors.push(ValidationError::Required {
                field: "cardholder name".to_string(),
            });
        }

        errors
    }

    /// First problem with the form, if any.
    pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationError> {
        match self.field_errors(today).into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    pub fn last4(&self) -> Option<String> {
        last4(&self.number)
    }
}

impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardDetails")
            .field("number", &mask_card_number(&self.number))
            .field("expiry", &self.expiry)
            .field("cvv", &"***")
            .field("holder_name", &self.holder_name)
            .finish()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
