//! Character records
//!
//! One record per non-blank line of the database file: `;`-separated fields
//! with the hex code point in field 0, the character name in field 1, and an
//! optional alternate name in field 10.

use std::fmt;
use std::io::BufRead;

use thiserror::Error;

use crate::query::{tokenize, Query};

/// Minimum number of `;`-separated fields in a well-formed line
pub const MIN_FIELDS: usize = 11;

/// A non-blank line that does not split into enough fields.
///
/// Fatal to a scan: a database that fails to split is corrupt, not noise.
#[derive(Debug, Error)]
#[error("malformed record: expected at least {} fields, got {}: {}", MIN_FIELDS, .fields, .line)]
pub struct MalformedRecord {
    /// The offending line, as read
    pub line: String,
    /// Number of fields the line actually had
    pub fields: usize,
}

/// Errors while scanning the database stream
#[derive(Debug, Error)]
pub enum ScanError {
    /// A line failed to parse; the scan is aborted rather than filtered
    #[error(transparent)]
    Malformed(#[from] MalformedRecord),
    /// The underlying stream failed
    #[error("database stream error: {0}")]
    Io(#[from] std::io::Error),
}

/// One parsed line of the character database.
///
/// Immutable once parsed; the search words are derived from the name fields
/// at parse time and never change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// The character's code point
    pub code_point: u32,
    /// Canonical character name (field 1)
    pub primary_name: String,
    /// Alternate name (field 10), when present
    pub alias_name: Option<String>,
    search_words: Vec<String>,
}

impl Record {
    /// Parse one database line.
    ///
    /// Lines with fewer than [`MIN_FIELDS`] fields are rejected. An invalid
    /// hex code point is tolerated and becomes code point 0, preserving the
    /// tool's historical behavior.
    pub fn parse(line: &str) -> Result<Self, MalformedRecord> {
        let fields: Vec<&str> = line.split(';').collect();
        if fields.len() < MIN_FIELDS {
            return Err(MalformedRecord {
                line: line.to_string(),
                fields: fields.len(),
            });
        }

        let code_point = u32::from_str_radix(fields[0], 16).unwrap_or(0);
        let primary_name = fields[1].to_string();
        let alias_name = (!fields[10].is_empty()).then(|| fields[10].to_string());

        let mut search_words = tokenize(&primary_name);
        if let Some(alias) = &alias_name {
            for word in tokenize(alias) {
                if !search_words.contains(&word) {
                    search_words.push(word);
                }
            }
        }

        Ok(Self {
            code_point,
            primary_name,
            alias_name,
            search_words,
        })
    }

    /// Name shown to the user: the primary name, with the alias in
    /// parentheses when one exists
    pub fn display_name(&self) -> String {
        match &self.alias_name {
            Some(alias) => format!("{} ({})", self.primary_name, alias),
            None => self.primary_name.clone(),
        }
    }

    /// Uppercase tokens from both name fields: first-seen order, deduplicated
    pub fn search_words(&self) -> &[String] {
        &self.search_words
    }

    /// True when the record's name contains every query term
    pub fn matches(&self, query: &Query) -> bool {
        query.matches(&self.search_words)
    }

    /// The literal character, or U+FFFD for code points `char` cannot hold
    pub fn character(&self) -> char {
        char::from_u32(self.code_point).unwrap_or(char::REPLACEMENT_CHARACTER)
    }
}

impl fmt::Display for Record {
    /// `U+0041<TAB>A<TAB>LATIN CAPITAL LETTER A`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "U+{:04X}\t{}\t{}",
            self.code_point,
            self.character(),
            self.display_name()
        )
    }
}

/// Summary line reported after a scan: `N character(s) found`
pub fn match_summary(count: usize) -> String {
    let plural = if count == 1 { "" } else { "s" };
    format!("{count} character{plural} found")
}

/// Scan a database stream, yielding the records that match `query`.
///
/// The scan is lazy, finite, and single-pass: blank lines are skipped, and
/// the first malformed line or stream error ends it. A corrupt database is
/// fatal, not filtered.
pub fn scan_matches<R: BufRead>(reader: R, query: Query) -> Matches<R> {
    Matches {
        lines: reader.lines(),
        query,
        done: false,
    }
}

/// Iterator returned by [`scan_matches`]. Fuses after the first error.
pub struct Matches<R> {
    lines: std::io::Lines<R>,
    query: Query,
    done: bool,
}

impl<R: BufRead> Iterator for Matches<R> {
    type Item = Result<Record, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        for line in self.lines.by_ref() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    self.done = true;
                    return Some(Err(err.into()));
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            let record = match Record::parse(&line) {
                Ok(record) => record,
                Err(err) => {
                    self.done = true;
                    return Some(Err(err.into()));
                }
            };
            if record.matches(&self.query) {
                return Some(Ok(record));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LETTER_A: &str = "0041;LATIN CAPITAL LETTER A;Lu;0;L;;;;;N;;;;0061;";
    const APOSTROPHE: &str = "0027;APOSTROPHE;Po;0;ON;;;;;N;APOSTROPHE-QUOTE;;;";

    const SAMPLE: &str = "\
003D;EQUALS SIGN;Sm;0;ON;;;;;N;;;;;
003E;GREATER-THAN SIGN;Sm;0;ON;;;;;Y;;;;;
003F;QUESTION MARK;Po;0;ON;;;;;N;;;;;
0040;COMMERCIAL AT;Po;0;ON;;;;;N;;;;;
0041;LATIN CAPITAL LETTER A;Lu;0;L;;;;;N;;;;0061;
0042;LATIN CAPITAL LETTER B;Lu;0;L;;;;;N;;;;0062;
0043;LATIN CAPITAL LETTER C;Lu;0;L;;;;;N;;;;0063;
";

    fn matched(corpus: &str, raw_query: &str) -> Vec<Record> {
        scan_matches(corpus.as_bytes(), Query::parse(raw_query))
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_parse_letter_a() {
        let record = Record::parse(LETTER_A).unwrap();
        assert_eq!(record.code_point, 0x41);
        assert_eq!(record.primary_name, "LATIN CAPITAL LETTER A");
        assert_eq!(record.alias_name, None);
        assert_eq!(record.display_name(), "LATIN CAPITAL LETTER A");
    }

    #[test]
    fn test_parse_folds_alias_into_name_and_words() {
        let record = Record::parse(APOSTROPHE).unwrap();
        assert_eq!(record.code_point, 0x27);
        assert_eq!(record.display_name(), "APOSTROPHE (APOSTROPHE-QUOTE)");
        // APOSTROPHE occurs in both fields but is kept once; QUOTE comes
        // from the alias only.
        assert_eq!(record.search_words(), ["APOSTROPHE", "QUOTE"]);
    }

    #[test]
    fn test_parse_rejects_short_lines() {
        let err = Record::parse("0041;LATIN CAPITAL LETTER A").unwrap_err();
        assert_eq!(err.fields, 2);
    }

    #[test]
    fn test_parse_tolerates_invalid_hex() {
        let record = Record::parse("ZZZZ;NOT HEX;Lu;0;L;;;;;N;;;;;").unwrap();
        assert_eq!(record.code_point, 0);
    }

    #[test]
    fn test_display_line_format() {
        let record = Record::parse(LETTER_A).unwrap();
        assert_eq!(record.to_string(), "U+0041\tA\tLATIN CAPITAL LETTER A");
    }

    #[test]
    fn test_match_summary_noun_agreement() {
        assert_eq!(match_summary(0), "0 characters found");
        assert_eq!(match_summary(1), "1 character found");
        assert_eq!(match_summary(2), "2 characters found");
    }

    #[test]
    fn test_scan_skips_blank_lines() {
        let corpus = format!("\n  \n{}\n\n", SAMPLE);
        assert_eq!(matched(&corpus, "").len(), 7);
    }

    #[test]
    fn test_scan_empty_query_matches_every_record() {
        assert_eq!(matched(SAMPLE, "").len(), 7);
    }

    #[test]
    fn test_scan_single_match() {
        let records = matched(SAMPLE, "mark");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].to_string(), "U+003F\t?\tQUESTION MARK");
    }

    #[test]
    fn test_scan_matches_in_input_order() {
        let records = matched(SAMPLE, "sign");
        let code_points: Vec<u32> = records.iter().map(|r| r.code_point).collect();
        assert_eq!(code_points, [0x3D, 0x3E]);
    }

    #[test]
    fn test_scan_multi_term_any_order() {
        for raw in ["CAPITAL LATIN", "latin capital"] {
            let records = matched(SAMPLE, raw);
            let code_points: Vec<u32> = records.iter().map(|r| r.code_point).collect();
            assert_eq!(code_points, [0x41, 0x42, 0x43]);
        }
    }

    #[test]
    fn test_scan_aborts_on_malformed_line() {
        let corpus = format!("{}this line does not split\n0044;LATIN CAPITAL LETTER D;Lu;0;L;;;;;N;;;;0064;\n", SAMPLE);
        let mut scan = scan_matches(corpus.as_bytes(), Query::parse(""));
        for _ in 0..7 {
            assert!(scan.next().unwrap().is_ok());
        }
        assert!(matches!(
            scan.next(),
            Some(Err(ScanError::Malformed(_)))
        ));
        // The scan is fused: nothing after the corrupt line is reachable.
        assert!(scan.next().is_none());
    }
}
