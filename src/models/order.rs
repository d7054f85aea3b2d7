// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Checkout and payment request models.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    #[validate(length(min = 1, message = "Не вказано товар"))]
    pub product_id: String,
    #[validate(range(min = 1, message = "Кількість має бути більшою за нуль"))]
    pub quantity: u32,
}

/// Checkout by a signed-in shopper. Contact details come from the account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredOrder {
    #[validate(length(min = 1, message = "Кошик порожній"), nested)]
    pub items: Vec<OrderLine>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Checkout by a shopper without an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UnregisteredOrder {
    #[validate(length(min = 2, message = "Вкажіть ім'я та прізвище"))]
    pub full_name: String,
    #[validate(length(min = 10, max = 16, message = "Некоректний номер телефону"))]
    pub phone: String,
    #[validate(email(message = "Некоректна електронна пошта"))]
    pub email: String,
    #[validate(length(min = 1, message = "Кошик порожній"), nested)]
    pub items: Vec<OrderLine>,
    /// Delivery details and anything else the upstream expects, passed through.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An in-progress checkout kept in the browser session under
/// [`PENDING_ORDER_KEY`](crate::store::session::PENDING_ORDER_KEY) until the
/// shopper reaches the payment step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingOrder {
    pub items: Vec<OrderLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Map<String, Value>>,
}

/// Card details submitted to the payment step. Checked locally before the
/// upstream sees them.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CardPayment {
    #[validate(length(min = 1, message = "Не вказано замовлення"))]
    pub order_id: String,
    #[validate(custom(function = "validate_card_number"))]
    pub card_number: String,
    #[validate(custom(function = "validate_expiry"))]
    pub expiry: String,
    #[validate(custom(function = "validate_cvv"))]
    pub cvv: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_holder: Option<String>,
}

impl CardPayment {
    /// Card number with the grouping spaces removed.
    pub fn digits(&self) -> String {
        self.card_number.chars().filter(|c| !c.is_whitespace()).collect()
    }
}

fn validation_error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

fn validate_card_number(value: &str) -> Result<(), ValidationError> {
    let digits: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.len() == 16 && digits.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(validation_error(
            "card_number",
            "Номер картки має містити 16 цифр",
        ))
    }
}

fn validate_cvv(value: &str) -> Result<(), ValidationError> {
    if value.len() == 3 && value.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(validation_error("cvv", "CVV має містити 3 цифри"))
    }
}

fn validate_expiry(value: &str) -> Result<(), ValidationError> {
    validate_expiry_at(value, chrono::Utc::now().date_naive())
}

/// `MM/YY`, month 1-12, not earlier than the current month.
pub(crate) fn validate_expiry_at(value: &str, today: NaiveDate) -> Result<(), ValidationError> {
    let invalid = || validation_error("expiry", "Некоректний термін дії картки");

    let (month, year) = value.trim().split_once('/').ok_or_else(invalid)?;
    if month.len() != 2 || year.len() != 2 {
        return Err(invalid());
    }
    let month: u32 = month.parse().map_err(|_| invalid())?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }

    let year = 2000 + year;
    if (year, month) < (today.year(), today.month()) {
        return Err(validation_error("expiry", "Термін дії картки минув"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment(card: &str, expiry: &str, cvv: &str) -> CardPayment {
        CardPayment {
            order_id: "ord-1".to_string(),
            card_number: card.to_string(),
            expiry: expiry.to_string(),
            cvv: cvv.to_string(),
            card_holder: None,
        }
    }

    #[test]
    fn test_card_number_ignores_spaces() {
        let p = payment("4111 1111 1111 1111", "12/99", "123");
        assert!(p.validate().is_ok());
        assert_eq!(p.digits(), "4111111111111111");
    }

    #[test]
    fn test_rejects_short_card_and_bad_cvv() {
        let errors = payment("4111 1111", "12/99", "12").validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("card_number"));
        assert!(fields.contains_key("cvv"));
        assert!(!fields.contains_key("expiry"));
    }

    #[test]
    fn test_expiry_checks() {
        let today = NaiveDate::from_ymd_opt(2026, 5, 10).unwrap();
        assert!(validate_expiry_at("05/26", today).is_ok());
        assert!(validate_expiry_at("01/27", today).is_ok());
        assert!(validate_expiry_at("04/26", today).is_err());
        assert!(validate_expiry_at("13/27", today).is_err());
        assert!(validate_expiry_at("00/27", today).is_err());
        assert!(validate_expiry_at("1/27", today).is_err());
        assert!(validate_expiry_at("garbage", today).is_err());
    }

    #[test]
    fn test_unregistered_order_requires_items() {
        let order = UnregisteredOrder {
            full_name: "Іван Петренко".to_string(),
            phone: "+380501234567".to_string(),
            email: "ivan@example.com".to_string(),
            items: vec![],
            extra: Map::new(),
        };
        assert!(order.validate().is_err());
    }
}
