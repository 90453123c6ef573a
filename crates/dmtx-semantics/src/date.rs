//! Date-format conversion for ANSI data identifiers whose value is a
//! positional digit string (YYMMDD, YYDDD Julian, YYWW). A small
//! table-driven matcher rather than the original's cascading string
//! comparisons.

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

fn full_year(two_digit: u32) -> u32 {
    if two_digit < 50 {
        2000 + two_digit
    } else {
        1900 + two_digit
    }
}

/// Convert a 6-digit `YYMMDD` string to `DD Mon YYYY`.
pub fn convert_yymmdd(digits: &str) -> Option<String> {
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let yy: u32 = digits[0..2].parse().ok()?;
    let mm: u32 = digits[2..4].parse().ok()?;
    let dd: u32 = digits[4..6].parse().ok()?;
    if !(1..=12).contains(&mm) {
        return None;
    }
    Some(format!("{:02} {} {}", dd, MONTHS[(mm - 1) as usize], full_year(yy)))
}

/// Convert a 5-digit `YYDDD` Julian date to `YYYY DAY DDD`.
pub fn convert_julian(digits: &str) -> Option<String> {
    if digits.len() != 5 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let yy: u32 = digits[0..2].parse().ok()?;
    let day: u32 = digits[2..5].parse().ok()?;
    Some(format!("{} DAY {:03}", full_year(yy), day))
}

/// Convert a 4-digit `YYWW` week date to `YYYY WEEK WW`.
pub fn convert_yyww(digits: &str) -> Option<String> {
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let yy: u32 = digits[0..2].parse().ok()?;
    let ww: u32 = digits[2..4].parse().ok()?;
    Some(format!("{} WEEK {:02}", full_year(yy), ww))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_yymmdd() {
        assert_eq!(convert_yymmdd("111212").unwrap(), "12 Dec 2011");
    }

    #[test]
    fn converts_julian_day() {
        assert_eq!(convert_julian("20015").unwrap(), "2020 DAY 015");
    }

    #[test]
    fn converts_week_date() {
        assert_eq!(convert_yyww("2034").unwrap(), "2020 WEEK 34");
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(convert_yymmdd("1212").is_none());
    }
}
