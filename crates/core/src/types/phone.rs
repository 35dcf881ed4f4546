//! Canonical phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::digits::fold_digits;

/// Default country calling code for canonicalization.
///
/// Cedar's merchants operate out of Lebanon; deployments elsewhere override
/// this via configuration.
pub const DEFAULT_COUNTRY_CODE: &str = "961";

/// Errors that can occur when canonicalizing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PhoneError {
    /// The input contains no digits at all.
    #[error("phone number contains no digits")]
    NoDigits,
}

/// A phone number in canonical international form.
///
/// Spreadsheet cells carry the same subscriber number in many shapes:
/// Arabic-Indic digits, international-dialing prefixes (`00961...`),
/// domestic trunk zeros (`03...`), stray punctuation. Canonicalization
/// collapses all of them to one stable `+<country-code><subscriber>` string
/// so the same customer always compares equal.
///
/// ## Canonical form
///
/// - Exactly one leading `+`
/// - Digits only after the `+`
/// - Starts with the country calling code
///
/// ## Examples
///
/// ```
/// use cedar_core::Phone;
///
/// let canonical = Phone::canonicalize("0096170123456", "961").unwrap();
/// assert_eq!(canonical.as_str(), "+96170123456");
///
/// // Domestic trunk zero is dropped, country code prepended
/// let domestic = Phone::canonicalize("070123456", "961").unwrap();
/// assert_eq!(domestic.as_str(), "+96170123456");
///
/// // Already-international input is preserved
/// let intl = Phone::canonicalize("+961 70 123 456", "961").unwrap();
/// assert_eq!(intl.as_str(), "+96170123456");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Canonicalize a raw phone cell into international form.
    ///
    /// Arabic-Indic digits are folded first, then everything that is not an
    /// ASCII digit is stripped. The international-dialing prefix
    /// (`00` + country code) is rewritten to the bare country code; a single
    /// domestic trunk `0` is dropped; the country code is prepended when the
    /// remaining digits do not already start with it.
    ///
    /// # Errors
    ///
    /// Returns [`PhoneError::NoDigits`] if no digits remain after cleaning.
    pub fn canonicalize(raw: &str, country_code: &str) -> Result<Self, PhoneError> {
        let folded = fold_digits(raw);
        let mut clean: String = folded.chars().filter(char::is_ascii_digit).collect();

        if clean.is_empty() {
            return Err(PhoneError::NoDigits);
        }

        let idd_prefix = format!("00{country_code}");
        if let Some(rest) = clean.strip_prefix(&idd_prefix) {
            clean = format!("{country_code}{rest}");
        } else {
            if let Some(rest) = clean.strip_prefix('0') {
                clean = rest.to_owned();
            }
            if !clean.starts_with(country_code) {
                clean = format!("{country_code}{clean}");
            }
        }

        Ok(Self(format!("+{clean}")))
    }

    /// Wrap a value that is already in canonical form (e.g. read back from
    /// the order store, which only ever receives canonical numbers).
    #[must_use]
    pub const fn from_canonical(s: String) -> Self {
        Self(s)
    }

    /// Returns the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Phone` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Phone {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Phone {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Phone {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed canonical
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Phone {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_international_dialing_prefix() {
        let phone = Phone::canonicalize("0096170123456", "961").unwrap();
        assert_eq!(phone.as_str(), "+96170123456");
    }

    #[test]
    fn test_domestic_trunk_zero() {
        let phone = Phone::canonicalize("070123456", "961").unwrap();
        assert_eq!(phone.as_str(), "+96170123456");
    }

    #[test]
    fn test_bare_subscriber_number() {
        let phone = Phone::canonicalize("70123456", "961").unwrap();
        assert_eq!(phone.as_str(), "+96170123456");
    }

    #[test]
    fn test_already_canonical() {
        let phone = Phone::canonicalize("+96170123456", "961").unwrap();
        assert_eq!(phone.as_str(), "+96170123456");
    }

    #[test]
    fn test_formatting_noise_stripped() {
        let phone = Phone::canonicalize("'+961 70-123 456'", "961").unwrap();
        assert_eq!(phone.as_str(), "+96170123456");
    }

    #[test]
    fn test_arabic_indic_digits() {
        let phone = Phone::canonicalize("٠٠٩٦١٧٠١٢٣٤٥٦", "961").unwrap();
        assert_eq!(phone.as_str(), "+96170123456");
    }

    #[test]
    fn test_variants_share_canonical_form() {
        let variants = ["0096170123456", "070123456", "70123456", "+961 70 123 456"];
        let canonical: Vec<_> = variants
            .iter()
            .map(|v| Phone::canonicalize(v, "961").unwrap())
            .collect();
        assert!(canonical.iter().all(|p| p == canonical.first().unwrap()));
    }

    #[test]
    fn test_no_digits_rejected() {
        assert!(matches!(
            Phone::canonicalize("n/a", "961"),
            Err(PhoneError::NoDigits)
        ));
        assert!(matches!(
            Phone::canonicalize("", "961"),
            Err(PhoneError::NoDigits)
        ));
    }

    #[test]
    fn test_other_country_code() {
        let phone = Phone::canonicalize("00201001234567", "20").unwrap();
        assert_eq!(phone.as_str(), "+201001234567");
    }

    #[test]
    fn test_display_and_as_ref() {
        let phone = Phone::canonicalize("70123456", "961").unwrap();
        assert_eq!(format!("{phone}"), "+96170123456");
        let s: &str = phone.as_ref();
        assert_eq!(s, "+96170123456");
    }

    #[test]
    fn test_serde_roundtrip() {
        let phone = Phone::canonicalize("70123456", "961").unwrap();
        let json = serde_json::to_string(&phone).unwrap();
        assert_eq!(json, "\"+96170123456\"");

        let parsed: Phone = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, phone);
    }
}
