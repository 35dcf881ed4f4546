//! Field normalization: raw sheet cells into canonical typed orders.
//!
//! Normalization is a deterministic, pure, per-row transformation. A row
//! only fails for missing identity fields (order id, customer name, phone,
//! SKU); every other defect folds to a safe default so one sloppy cell
//! never discards an otherwise usable order.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use cedar_core::{Phone, PhoneError, fold_digits};

use crate::sheets::SheetRow;

/// Per-row normalization failure.
///
/// Not an abort: the orchestrator records the failure against the row index
/// and continues with the remaining rows.
#[derive(Debug, Error)]
pub enum NormalizationError {
    /// A required identity field is blank.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// The phone cell has no usable digits.
    #[error("invalid phone number: {0}")]
    Phone(#[from] PhoneError),
}

/// A fully normalized sheet row, the only shape that crosses into
/// classification and persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedOrder {
    /// The spreadsheet's own order identifier (digit-folded, non-empty).
    pub external_order_id: String,
    /// Customer display name.
    pub customer_name: String,
    /// Canonical phone number.
    pub phone: Phone,
    /// Shipping address (may be blank).
    pub address: String,
    /// City (may be blank).
    pub city: String,
    /// Product display name from the sheet (may be blank).
    pub product_name: String,
    /// SKU joining the row to the product catalog.
    pub sku: String,
    /// Ordered quantity, always >= 1.
    pub quantity: i32,
    /// Unit price, never negative.
    pub unit_price: Decimal,
    /// Always `unit_price * quantity`; source-provided totals are ignored.
    pub total_amount: Decimal,
}

/// Normalize one raw row.
///
/// # Errors
///
/// Returns [`NormalizationError`] when the order id, customer name, phone,
/// or SKU cell is blank or (for phone) digit-free.
pub fn normalize(row: &SheetRow, country_code: &str) -> Result<NormalizedOrder, NormalizationError> {
    let external_order_id = row
        .order_id
        .as_deref()
        .map(|v| fold_digits(v.trim()))
        .filter(|v| !v.is_empty())
        .ok_or(NormalizationError::MissingField("order id"))?;

    let customer_name = row
        .customer_name
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(NormalizationError::MissingField("customer name"))?
        .to_owned();

    let raw_phone = row
        .phone
        .as_deref()
        .ok_or(NormalizationError::MissingField("phone"))?;
    let phone = Phone::canonicalize(raw_phone, country_code)?;

    let sku = row
        .sku
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(NormalizationError::MissingField("sku"))?
        .to_owned();

    let quantity = parse_quantity(row.quantity.as_deref());
    let unit_price = parse_price(row.unit_price.as_deref());
    let total_amount = unit_price * Decimal::from(quantity);

    Ok(NormalizedOrder {
        external_order_id,
        customer_name,
        phone,
        address: row.address.clone().unwrap_or_default(),
        city: row.city.clone().unwrap_or_default(),
        product_name: row.product_name.clone().unwrap_or_default(),
        sku,
        quantity,
        unit_price,
        total_amount,
    })
}

/// Parse a quantity cell; anything missing, unparseable, or below 1 means
/// a single unit was ordered.
fn parse_quantity(raw: Option<&str>) -> i32 {
    raw.map(|v| fold_digits(v.trim()))
        .and_then(|v| v.parse::<i32>().ok())
        .filter(|q| *q >= 1)
        .unwrap_or(1)
}

/// Parse a price cell into a non-negative decimal.
///
/// Accepts Arabic-Indic digits, thousands separators, and comma decimal
/// separators. Missing, unparseable, or negative values fold to zero; price
/// defects never invalidate a row.
fn parse_price(raw: Option<&str>) -> Decimal {
    let Some(raw) = raw else {
        return Decimal::ZERO;
    };

    let folded = fold_digits(raw.trim());
    let cleaned: String = folded
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\'')
        .collect();

    // A comma alongside a dot is a thousands separator; a lone comma is a
    // locale decimal separator.
    let cleaned = if cleaned.contains(',') && cleaned.contains('.') {
        cleaned.replace(',', "")
    } else {
        cleaned.replace(',', ".")
    };

    cleaned
        .parse::<Decimal>()
        .ok()
        .filter(|d| !d.is_sign_negative())
        .unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    fn complete_row() -> SheetRow {
        SheetRow {
            index: 1,
            order_id: Some("1001".into()),
            customer_name: Some("Rana Khoury".into()),
            phone: Some("70123456".into()),
            address: Some("Main St".into()),
            city: Some("Beirut".into()),
            product_name: Some("Olive Soap".into()),
            sku: Some("ABC".into()),
            quantity: Some("2".into()),
            unit_price: Some("9.50".into()),
        }
    }

    #[test]
    fn test_normalize_complete_row() {
        let order = normalize(&complete_row(), "961").unwrap();
        assert_eq!(order.external_order_id, "1001");
        assert_eq!(order.customer_name, "Rana Khoury");
        assert_eq!(order.phone.as_str(), "+96170123456");
        assert_eq!(order.sku, "ABC");
        assert_eq!(order.quantity, 2);
        assert_eq!(order.unit_price, dec!(9.50));
        assert_eq!(order.total_amount, dec!(19.00));
    }

    #[test]
    fn test_arabic_digits_in_order_id_and_amounts() {
        let mut row = complete_row();
        row.order_id = Some("٠١٢٣".into());
        row.quantity = Some("٣".into());
        row.unit_price = Some("١٢.٥".into());

        let order = normalize(&row, "961").unwrap();
        assert_eq!(order.external_order_id, "0123");
        assert_eq!(order.quantity, 3);
        assert_eq!(order.unit_price, dec!(12.5));
        assert_eq!(order.total_amount, dec!(37.5));
    }

    #[test]
    fn test_total_always_recomputed() {
        // The sheet's own total column is never read; only price * quantity
        // counts.
        let mut row = complete_row();
        row.quantity = Some("4".into());
        row.unit_price = Some("10".into());
        let order = normalize(&row, "961").unwrap();
        assert_eq!(order.total_amount, dec!(40));
    }

    #[test]
    fn test_quantity_defaults_to_one() {
        for bad in [None, Some("".to_owned()), Some("abc".to_owned()), Some("0".to_owned()), Some("-2".to_owned())] {
            let mut row = complete_row();
            row.quantity = bad;
            assert_eq!(normalize(&row, "961").unwrap().quantity, 1);
        }
    }

    #[test]
    fn test_price_locale_formats() {
        let cases = [
            ("1,500.25", dec!(1500.25)),
            ("12,5", dec!(12.5)),
            ("1 500", dec!(1500)),
            ("24", dec!(24)),
        ];
        for (raw, expected) in cases {
            let mut row = complete_row();
            row.unit_price = Some(raw.to_owned());
            assert_eq!(normalize(&row, "961").unwrap().unit_price, expected, "{raw}");
        }
    }

    #[test]
    fn test_price_defects_fold_to_zero() {
        for bad in [None, Some("free".to_owned()), Some("-5".to_owned())] {
            let mut row = complete_row();
            row.unit_price = bad;
            let order = normalize(&row, "961").unwrap();
            assert_eq!(order.unit_price, Decimal::ZERO);
            assert_eq!(order.total_amount, Decimal::ZERO);
        }
    }

    #[test]
    fn test_missing_identity_fields_rejected() {
        let cases: [(&str, fn(&mut SheetRow)); 4] = [
            ("order id", |r| r.order_id = None),
            ("customer name", |r| r.customer_name = Some("  ".into())),
            ("phone", |r| r.phone = None),
            ("sku", |r| r.sku = None),
        ];
        for (field, strip) in cases {
            let mut row = complete_row();
            strip(&mut row);
            let err = normalize(&row, "961").unwrap_err();
            match err {
                NormalizationError::MissingField(name) => assert_eq!(name, field),
                NormalizationError::Phone(_) => panic!("expected missing-field error"),
            }
        }
    }

    #[test]
    fn test_digit_free_phone_rejected() {
        let mut row = complete_row();
        row.phone = Some("call me".into());
        assert!(matches!(
            normalize(&row, "961"),
            Err(NormalizationError::Phone(_))
        ));
    }

    #[test]
    fn test_optional_fields_default_blank() {
        let mut row = complete_row();
        row.address = None;
        row.city = None;
        row.product_name = None;
        let order = normalize(&row, "961").unwrap();
        assert_eq!(order.address, "");
        assert_eq!(order.city, "");
        assert_eq!(order.product_name, "");
    }
}
