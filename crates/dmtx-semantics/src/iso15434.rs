//! ISO/IEC 15434 transfer syntax (spec §4.11): envelopes of the form
//! `[)>RS<format>GSfield1GSfield2...RSEOT`, where each field starts
//! with an ANSI MH10.8.2 data identifier.

use crate::data_identifier::{self, DataIdentifier};

const HEADER: &str = "[)>";
const RS: char = '\u{1e}';
const GS: char = '\u{1d}';
const EOT: char = '\u{4}';

/// One parsed field: its recognised data identifier (if any) and the
/// value text that follows it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub identifier: Option<&'static str>,
    pub meaning: Option<&'static str>,
    pub value: String,
}

/// A fully parsed ISO/IEC 15434 envelope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    pub format: String,
    pub fields: Vec<Field>,
}

/// Parse an ISO/IEC 15434 envelope out of decoded message text.
/// Returns `None` if the `[)>` header or `RS...EOT` framing is absent.
pub fn parse(text: &str) -> Option<Envelope> {
    let rest = text.strip_prefix(HEADER)?;
    let rest = rest.strip_prefix(RS)?;
    let format_end = rest.find(GS)?;
    let format = rest[..format_end].to_string();
    let body = &rest[format_end + GS.len_utf8()..];
    let body = body.strip_suffix(EOT).unwrap_or(body);
    let body = body.strip_suffix(RS).unwrap_or(body);

    let fields = body
        .split(GS)
        .filter(|s| !s.is_empty())
        .map(|field| match data_identifier::lookup(field) {
            Some((DataIdentifier { code, meaning }, value)) => Field {
                identifier: Some(code),
                meaning: Some(meaning),
                value: value.to_string(),
            },
            None => Field { identifier: None, meaning: None, value: field.to_string() },
        })
        .collect();

    Some(Envelope { format, fields })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_format_06_envelope_with_two_fields() {
        let text = format!("[)>{RS}06{GS}P12345{GS}Q10{RS}{EOT}");
        let envelope = parse(&text).unwrap();
        assert_eq!(envelope.format, "06");
        assert_eq!(envelope.fields[0].identifier, Some("P"));
        assert_eq!(envelope.fields[0].value, "12345");
        assert_eq!(envelope.fields[1].identifier, Some("Q"));
        assert_eq!(envelope.fields[1].value, "10");
    }

    #[test]
    fn rejects_text_without_the_header() {
        assert!(parse("P12345").is_none());
    }
}
