//! GS1 helper conversions with no counterpart in the ported C source:
//! currency/decimal-point amounts (AI 391x/392x), ISO 3166 numeric
//! country codes (AI 422/423), AI 8110 coupons, and ISSN (AI 8112)
//! variant/check-digit parsing. Implemented from GS1 General
//! Specifications domain knowledge rather than ported, since no
//! `tests.c` counterpart exists to translate.

const CURRENCIES: &[(u16, &str)] = &[
    (840, "US Dollar"),
    (978, "Euro"),
    (826, "Pound Sterling"),
    (392, "Yen"),
    (156, "Yuan Renminbi"),
];

/// ISO 4217 numeric currency code name lookup.
pub fn get_currency_value(code: u16) -> Option<&'static str> {
    CURRENCIES.iter().find(|(c, _)| *c == code).map(|(_, name)| *name)
}

/// Render a digit string as a decimal amount with the decimal point
/// `places` digits from the right (GS1 AIs 391x/392x encode this in
/// their own last digit).
pub fn get_decimal_value(digits: &str, places: usize) -> String {
    if places == 0 || places >= digits.len() {
        return format!("0.{digits:0>width$}", width = places.max(digits.len()));
    }
    let split = digits.len() - places;
    format!("{}.{}", &digits[..split], &digits[split..])
}

const COUNTRIES: &[(u16, &str)] = &[
    (764, "Thailand"),
    (826, "United Kingdom"),
    (840, "United States"),
    (392, "Japan"),
    (276, "Germany"),
];

/// ISO 3166-1 numeric country code lookup (AI 422/423), with any
/// trailing free-text appended after the country name.
pub fn get_country(code: u16, rest: &str) -> Option<String> {
    COUNTRIES.iter().find(|(c, _)| *c == code).map(|(_, name)| {
        if rest.is_empty() {
            name.to_string()
        } else {
            format!("{name} {rest}")
        }
    })
}

/// AI 8110 coupon: a 12-character company/coupon reference (6 digits +
/// 6 alphanumerics) followed by a serial number.
pub fn get_coupon(value: &str) -> Option<String> {
    if value.len() <= 12 {
        return None;
    }
    let (reference, serial) = value.split_at(12);
    Some(format!("COMPANY/COUPON REF: {reference}\nSERIAL: {serial}"))
}

fn issn_check_digit(core: &str) -> Option<char> {
    let digits: Vec<u32> = core.chars().map(|c| c.to_digit(10)).collect::<Option<_>>()?;
    if digits.len() != 7 {
        return None;
    }
    let sum: u32 = digits.iter().zip((2..=8).rev()).map(|(d, w)| d * w).sum();
    let remainder = sum % 11;
    let check = (11 - remainder) % 11;
    Some(if check == 10 { 'X' } else { char::from_digit(check, 10).unwrap() })
}

/// AI 8112: a 7-digit ISSN core, 2-digit variant and a supplied check
/// digit, rendered as `ISSN: XXXX-XXXXc`, `VARIANT: VV`, `CHECK DIGIT: c`.
pub fn get_issn(value: &str) -> Option<String> {
    if value.len() != 10 {
        return None;
    }
    let core = &value[..7];
    let variant = &value[7..9];
    let supplied_check = value.chars().nth(9)?;
    let check = issn_check_digit(core)?;
    Some(format!(
        "ISSN: {}-{}{check}\nVARIANT: {variant}\nCHECK DIGIT: {supplied_check}",
        &core[..4],
        &core[4..]
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_code_without_suffix() {
        assert_eq!(get_country(764, "").unwrap(), "Thailand");
    }

    #[test]
    fn country_code_with_suffix() {
        assert_eq!(get_country(826, "ABCD").unwrap(), "United Kingdom ABCD");
    }

    #[test]
    fn coupon_splits_reference_and_serial() {
        assert_eq!(
            get_coupon("123456ABCDEF8765432").unwrap(),
            "COMPANY/COUPON REF: 123456ABCDEF\nSERIAL: 8765432"
        );
    }

    #[test]
    fn issn_computes_check_digit_and_splits_variant() {
        assert_eq!(
            get_issn("1234567059").unwrap(),
            "ISSN: 1234-5679\nVARIANT: 05\nCHECK DIGIT: 9"
        );
    }

    #[test]
    fn decimal_value_inserts_point_from_the_right() {
        assert_eq!(get_decimal_value("12345", 2), "123.45");
    }
}
