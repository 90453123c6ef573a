//! HIBC (Health Industry Bar Code) primary/secondary data messages
//! (spec §4.11): a `+`-prefixed message over the 43-character HIBC set,
//! terminated by a modulo-43 check character.

const CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ-. $/+%";

fn charset_value(ch: u8) -> Option<u32> {
    CHARSET.iter().position(|&c| c == ch).map(|p| p as u32)
}

/// A parsed HIBC message with its check character verified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HibcRecord {
    pub body: String,
}

/// Parse a `+`-prefixed HIBC message, validating its trailing modulo-43
/// check character. Returns `None` if the prefix, charset or checksum
/// don't match.
pub fn parse(text: &str) -> Option<HibcRecord> {
    let rest = text.strip_prefix('+')?;
    if rest.len() < 2 {
        return None;
    }
    let bytes = rest.as_bytes();
    let (data, check) = bytes.split_at(bytes.len() - 1);
    let check_value = charset_value(check[0])?;

    let mut sum = 0u32;
    for &b in data {
        sum += charset_value(b)?;
    }
    if sum % 43 != check_value {
        return None;
    }

    Some(HibcRecord {
        body: String::from_utf8_lossy(data).into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_text_without_plus_prefix() {
        assert!(parse("A123").is_none());
    }

    #[test]
    fn accepts_a_message_with_a_valid_check_character() {
        let body = "A99912345/$$520015";
        let sum: u32 = body.bytes().map(|b| charset_value(b).unwrap()).sum();
        let check = CHARSET[(sum % 43) as usize] as char;
        let message = format!("+{body}{check}");
        let record = parse(&message).unwrap();
        assert_eq!(record.body, body);
    }

    #[test]
    fn rejects_a_corrupted_check_character() {
        let body = "A99912345/$$520015";
        let sum: u32 = body.bytes().map(|b| charset_value(b).unwrap()).sum();
        let wrong_check = CHARSET[((sum + 1) % 43) as usize] as char;
        let message = format!("+{body}{wrong_check}");
        assert!(parse(&message).is_none());
    }
}
