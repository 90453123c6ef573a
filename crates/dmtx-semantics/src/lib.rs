//! ECC 200 byte-stream decoding and payload semantics.
//!
//! [`decode`] turns de-placed, error-corrected codewords into text,
//! then layers the GS1, ISO/IEC 15434 and HIBC payload conventions on
//! top when the data matches them.

mod c40text;
pub mod data_identifier;
pub mod date;
mod edifact;
pub mod gs1;
pub mod gs1_extra;
pub mod hibc;
pub mod iso15434;
mod state;
mod x12;

#[cfg(feature = "tracing")]
use tracing::instrument;

pub use state::DecodedStream;

/// The fully interpreted payload of a decoded symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// Raw decoded text (GS1 application separators rendered as `\u{1d}`).
    pub text: String,
    pub is_gs1: bool,
    pub is_structured_append: bool,
    pub gs1: Option<Vec<gs1::ElementString>>,
    pub iso15434: Option<iso15434::Envelope>,
    pub hibc: Option<hibc::HibcRecord>,
}

impl Message {
    /// A single best-effort human-readable rendering, preferring the
    /// most specific payload convention recognised: HIBC, then GS1,
    /// falling back to the raw decoded text.
    pub fn human_readable(&self) -> String {
        if let Some(hibc) = &self.hibc {
            return hibc.body.clone();
        }
        if let Some(gs1) = &self.gs1 {
            return gs1::human_readable(gs1);
        }
        self.text.clone()
    }
}

/// Decode a de-placed, error-corrected codeword stream into its full
/// [`Message`], classifying it as GS1, ISO/IEC 15434 or HIBC when the
/// decoded text matches one of those conventions.
#[cfg_attr(feature = "tracing", instrument(level = "debug", skip(codewords), fields(len = codewords.len())))]
pub fn decode(codewords: &[u8]) -> Message {
    let stream = state::decode_codewords(codewords);
    let text = stream.text();
    log::debug!("decoded {} codewords into {} bytes of text", codewords.len(), text.len());

    let hibc = hibc::parse(&text);
    let iso15434 = iso15434::parse(&text);
    let gs1 = stream.is_gs1.then(|| gs1::parse_element_strings(&text));

    Message {
        text,
        is_gs1: stream.is_gs1,
        is_structured_append: stream.is_structured_append,
        gs1,
        iso15434,
        hibc,
    }
}

/// Render a decoded GS1 message as a GS1 Digital Link URL, given the
/// host prefix to use (e.g. `https://example.com`).
pub fn gs1_digital_link(message: &Message, url_prefix: &str) -> Option<String> {
    message
        .gs1
        .as_ref()
        .map(|elements| gs1::digital_link_url(url_prefix, elements))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ascii_codewords(text: &str) -> Vec<u8> {
        text.bytes().map(|b| b + 1).collect()
    }

    #[test]
    fn decodes_plain_ascii_message() {
        let message = decode(&ascii_codewords("123"));
        assert_eq!(message.text, "123");
        assert!(!message.is_gs1);
        assert!(message.gs1.is_none());
    }

    #[test]
    fn decodes_gs1_message_with_element_strings_and_url() {
        let mut codewords = vec![232]; // leading FNC1
        codewords.extend(ascii_codewords("0101234567890128"));
        let message = decode(&codewords);
        assert!(message.is_gs1);
        let gs1 = message.gs1.as_ref().unwrap();
        assert_eq!(gs1[0].ai, "01");
        assert_eq!(gs1[0].value, "01234567890128");

        let url = gs1_digital_link(&message, "https://example.com").unwrap();
        assert_eq!(url, "https://example.com/01/01234567890128");
    }

    #[test]
    fn decodes_hibc_message() {
        const CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ-. $/+%";
        let body = "A99912345/$$520015";
        let sum: u32 = body
            .bytes()
            .map(|b| CHARSET.iter().position(|&c| c == b).unwrap() as u32)
            .sum();
        let check = CHARSET[(sum % 43) as usize] as char;
        let text = format!("+{body}{check}");
        let codewords = ascii_codewords(&text);
        let message = decode(&codewords);
        assert_eq!(message.hibc.unwrap().body, body);
    }
}
