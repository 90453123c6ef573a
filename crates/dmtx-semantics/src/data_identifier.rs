//! ANSI MH10.8.2 data identifiers (spec §4.11): the prefix codes used
//! inside ISO/IEC 15434 format envelopes to tag each field's meaning.
//!
//! This is a representative subset of the full ANSI table (a few
//! hundred entries), covering the identifiers that appear in common
//! supply-chain and healthcare labelling use, not an exhaustive
//! transcription.

/// A known data identifier and its field meaning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DataIdentifier {
    pub code: &'static str,
    pub meaning: &'static str,
}

const TABLE: &[DataIdentifier] = &[
    DataIdentifier { code: "1P", meaning: "Serial number assigned by the vendor" },
    DataIdentifier { code: "P", meaning: "Part number" },
    DataIdentifier { code: "Q", meaning: "Quantity" },
    DataIdentifier { code: "S", meaning: "Serial number" },
    DataIdentifier { code: "V", meaning: "Supplier identification" },
    DataIdentifier { code: "9D", meaning: "Date (format YYMMDD)" },
    DataIdentifier { code: "10D", meaning: "Date (format YYWW)" },
    DataIdentifier { code: "12D", meaning: "Date (format YYMMDDHHMM)" },
    DataIdentifier { code: "9N", meaning: "Unit of measure" },
    DataIdentifier { code: "9S", meaning: "Second supplier identification" },
    DataIdentifier { code: "1T", meaning: "Traceability number" },
    DataIdentifier { code: "2P", meaning: "Customer item code" },
    DataIdentifier { code: "4L", meaning: "Country of origin" },
    DataIdentifier { code: "T", meaning: "Lot/batch number" },
    DataIdentifier { code: "14S", meaning: "Serial number of an entity" },
    DataIdentifier { code: "16S", meaning: "HIBC license identification number" },
    DataIdentifier { code: "22S", meaning: "Unique individual identity code" },
];

/// Look up the longest matching data identifier prefix of `field`.
pub fn lookup(field: &str) -> Option<(&'static DataIdentifier, &str)> {
    TABLE
        .iter()
        .filter(|di| field.starts_with(di.code))
        .max_by_key(|di| di.code.len())
        .map(|di| (di, &field[di.code.len()..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_the_longest_prefix() {
        let (di, rest) = lookup("9D260401").unwrap();
        assert_eq!(di.code, "9D");
        assert_eq!(rest, "260401");
    }

    #[test]
    fn unknown_identifier_returns_none() {
        assert!(lookup("ZZunknown").is_none());
    }
}
