//! Offline card checks, the same ones the checkout form runs.

use bookit_core::card::{
    detect_card_brand, format_card_number, format_expiry, mask_card_number, validate_card_number,
    validate_cvv, validate_expiry,
};
use bookit_core::CardBrand;
use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::error::ClientResult;

/// What the checkout form would show for the given input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardReport {
    pub brand: CardBrand,
    pub formatted: String,
    pub masked: String,
    pub number_valid: bool,
    pub expiry: Option<String>,
    pub expiry_valid: Option<bool>,
    pub cvv_valid: Option<bool>,
}

impl CardReport {
    pub fn is_valid(&self) -> bool {
        self.number_valid && self.expiry_valid.unwrap_or(true) && self.cvv_valid.unwrap_or(true)
    }
}

pub fn inspect(number: &str, expiry: Option<&str>, cvv: Option<&str>, today: NaiveDate) -> CardReport {
    let brand = detect_card_brand(number);
    let known = (brand != CardBrand::Unknown).then_some(brand);
    let expiry = expiry.map(format_expiry);

    CardReport {
        brand,
        formatted: format_card_number(number),
        masked: mask_card_number(number),
        number_valid: validate_card_number(number),
        expiry_valid: expiry.as_deref().map(|e| validate_expiry(e, today)),
        expiry,
        cvv_valid: cvv.map(|c| validate_cvv(c, known)),
    }
}

pub fn check(number: &str, expiry: Option<&str>, cvv: Option<&str>) -> ClientResult<()> {
    let report = inspect(number, expiry, cvv, Local::now().date_naive());

    println!("brand:   {}", report.brand);
    println!("number:  {} ({})", report.formatted, verdict(report.number_valid));
    if let (Some(expiry), Some(valid)) = (&report.expiry, report.expiry_valid) {
        println!("expiry:  {expiry} ({})", verdict(valid));
    }
    if let Some(valid) = report.cvv_valid {
        println!("cvv:     {}", verdict(valid));
    }
    println!("card {} is {}", report.masked, if report.is_valid() { "usable" } else { "not usable" });
    Ok(())
}

fn verdict(ok: bool) -> &'static str {
    if ok {
        "ok"
    } else {
        "invalid"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn june_2025() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    #[test]
    fn test_valid_visa() {
        let report = inspect("4242424242424242", Some("1230"), Some("123"), june_2025());
        assert_eq!(report.brand, CardBrand::Visa);
        assert_eq!(report.formatted, "4242 4242 4242 4242");
        assert_eq!(report.expiry.as_deref(), Some("12/30"));
        assert!(report.is_valid());
    }

    #[test]
    fn test_amex_needs_four_digit_cvv() {
        let report = inspect("378282246310005", None, Some("123"), june_2025());
        assert_eq!(report.brand, CardBrand::Amex);
        assert!(report.number_valid);
        assert_eq!(report.cvv_valid, Some(false));
        assert!(!report.is_valid());
    }

    #[test]
    fn test_expired_card() {
        let report = inspect("5555555555554444", Some("05/25"), None, june_2025());
        assert_eq!(report.brand, CardBrand::Mastercard);
        assert_eq!(report.expiry_valid, Some(false));
        assert!(!report.is_valid());
    }

    #[test]
    fn test_bad_checksum() {
        let report = inspect("4242 4242 4242 4241", None, None, june_2025());
        assert!(!report.number_valid);
        assert_eq!(report.masked, "•••• 4241");
    }
}
