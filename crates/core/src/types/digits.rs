//! Arabic-Indic digit folding.
//!
//! Spreadsheets filled in from Arabic-locale keyboards mix Arabic-Indic
//! digits (U+0660–U+0669) into otherwise numeric cells. Every numeric or
//! identifier field is folded to ASCII digits before parsing.

/// Fold Arabic-Indic digits (٠–٩) in a string to their ASCII equivalents.
///
/// All other characters pass through unchanged.
///
/// # Example
///
/// ```
/// use cedar_core::fold_digits;
///
/// assert_eq!(fold_digits("٠١٢٣"), "0123");
/// assert_eq!(fold_digits("order ٤٥"), "order 45");
/// ```
#[must_use]
pub fn fold_digits(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\u{0660}'..='\u{0669}' => {
                // U+0660 is Arabic-Indic zero
                char::from_digit(c as u32 - 0x0660, 10).unwrap_or(c)
            }
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_all_arabic_indic_digits() {
        assert_eq!(fold_digits("٠١٢٣٤٥٦٧٨٩"), "0123456789");
    }

    #[test]
    fn test_fold_mixed_content() {
        assert_eq!(fold_digits("ORD-٣٢"), "ORD-32");
        assert_eq!(fold_digits("١,٥٠٠.00"), "1,500.00");
    }

    #[test]
    fn test_fold_passes_ascii_through() {
        assert_eq!(fold_digits("12345"), "12345");
        assert_eq!(fold_digits(""), "");
    }
}
