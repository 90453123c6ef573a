//! GS1 application identifier parsing (spec §4.11): once the byte
//! decoder has marked a message as GS1 (leading FNC1), split the
//! remaining text into AI/value pairs and optionally render it as a
//! GS1 Digital Link URL.

/// One parsed GS1 element string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementString {
    pub ai: String,
    pub value: String,
}

struct AiRule {
    ai: &'static str,
    fixed_len: Option<usize>,
}

const RULES: &[AiRule] = &[
    AiRule { ai: "00", fixed_len: Some(18) },
    AiRule { ai: "01", fixed_len: Some(14) },
    AiRule { ai: "02", fixed_len: Some(14) },
    AiRule { ai: "10", fixed_len: None },
    AiRule { ai: "11", fixed_len: Some(6) },
    AiRule { ai: "13", fixed_len: Some(6) },
    AiRule { ai: "15", fixed_len: Some(6) },
    AiRule { ai: "17", fixed_len: Some(6) },
    AiRule { ai: "20", fixed_len: Some(2) },
    AiRule { ai: "21", fixed_len: None },
    AiRule { ai: "22", fixed_len: None },
    AiRule { ai: "30", fixed_len: None },
    AiRule { ai: "240", fixed_len: None },
    AiRule { ai: "241", fixed_len: None },
    AiRule { ai: "250", fixed_len: None },
    AiRule { ai: "400", fixed_len: None },
    AiRule { ai: "401", fixed_len: None },
    AiRule { ai: "410", fixed_len: Some(13) },
    AiRule { ai: "411", fixed_len: Some(13) },
    AiRule { ai: "412", fixed_len: Some(13) },
    AiRule { ai: "413", fixed_len: Some(13) },
    AiRule { ai: "414", fixed_len: Some(13) },
    AiRule { ai: "415", fixed_len: Some(13) },
    AiRule { ai: "420", fixed_len: None },
    AiRule { ai: "421", fixed_len: None },
    AiRule { ai: "7003", fixed_len: Some(10) },
    AiRule { ai: "8003", fixed_len: None },
    AiRule { ai: "8004", fixed_len: None },
    AiRule { ai: "8018", fixed_len: Some(18) },
    AiRule { ai: "90", fixed_len: None },
];

fn lookup(prefix: &str) -> Option<&'static AiRule> {
    RULES.iter().find(|r| prefix.starts_with(r.ai))
}

/// Split GS1 payload text (AI-prefixed, application-separator
/// delimited per GS1 General Specifications) into element strings.
pub fn parse_element_strings(payload: &str) -> Vec<ElementString> {
    let mut out = Vec::new();
    let mut rest = payload;
    while !rest.is_empty() {
        let Some(rule) = lookup(rest) else {
            break;
        };
        let after_ai = &rest[rule.ai.len()..];
        let (value, remaining) = match rule.fixed_len {
            Some(len) if after_ai.len() >= len => after_ai.split_at(len),
            _ => {
                let sep = after_ai.find('\u{1d}').unwrap_or(after_ai.len());
                let (value, remaining) = after_ai.split_at(sep);
                (value, remaining.strip_prefix('\u{1d}').unwrap_or(remaining))
            }
        };
        out.push(ElementString {
            ai: rule.ai.to_string(),
            value: value.to_string(),
        });
        rest = remaining;
    }
    out
}

/// Render parsed element strings as `(AI)value` human-readable text.
pub fn human_readable(elements: &[ElementString]) -> String {
    elements
        .iter()
        .map(|e| format!("({}){}", e.ai, e.value))
        .collect()
}

/// Render parsed element strings as a GS1 Digital Link URL: the
/// primary identifier (00/01/8003/8004, in that priority order) forms
/// the path, remaining element strings become query parameters.
pub fn digital_link_url(prefix: &str, elements: &[ElementString]) -> String {
    let primary_ai = ["01", "00", "8003", "8004"];
    let mut path_ai = None;
    for candidate in primary_ai {
        if elements.iter().any(|e| e.ai == candidate) {
            path_ai = Some(candidate);
            break;
        }
    }

    let mut url = prefix.trim_end_matches('/').to_string();
    let mut query = Vec::new();

    for e in elements {
        if Some(e.ai.as_str()) == path_ai {
            url.push('/');
            url.push_str(&e.ai);
            url.push('/');
            url.push_str(&e.value);
        } else {
            query.push(format!("{}={}", e.ai, e.value));
        }
    }

    if !query.is_empty() {
        url.push('?');
        url.push_str(&query.join("&"));
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_gtin_and_serial() {
        let elements = parse_element_strings("0101234567890128\u{1d}21ABC123");
        assert_eq!(elements[0], ElementString { ai: "01".into(), value: "01234567890128".into() });
        assert_eq!(elements[1], ElementString { ai: "21".into(), value: "ABC123".into() });
    }

    #[test]
    fn renders_digital_link_url() {
        let elements = parse_element_strings("0101234567890128\u{1d}21ABC123");
        let url = digital_link_url("https://example.com", &elements);
        assert_eq!(url, "https://example.com/01/01234567890128?21=ABC123");
    }
}
