// file: src/parser/patterns.rs
// description: compiled regex patterns for paper text cleaning
// reference: https://docs.rs/regex

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    pub static ref NEWLINE_RUN: Regex = Regex::new(r"\n+").expect("NEWLINE_RUN regex is valid");

    // A line holding nothing but a page number
    pub static ref PAGE_NUMBER_LINE: Regex =
        Regex::new(r"\n\s*\d+\s*\n").expect("PAGE_NUMBER_LINE regex is valid");

    pub static ref DIGITS_ONLY: Regex = Regex::new(r"^\s*\d+\s*$").expect("DIGITS_ONLY regex is valid");

    pub static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").expect("WHITESPACE_RUN regex is valid");

    // Whole word only; group 1 is the word itself. A leading hyphen does not
    // count as a boundary so "cross-references" stays in the body.
    pub static ref REFERENCES_HEADING: Regex =
        Regex::new(r"(?i)(?:^|[^\w-])(references|bibliography)\b")
            .expect("REFERENCES_HEADING regex is valid");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_number_line() {
        assert!(PAGE_NUMBER_LINE.is_match("end of page\n 12 \nnext page"));
        assert!(!PAGE_NUMBER_LINE.is_match("see table 12 below\n"));
    }

    #[test]
    fn test_references_heading_is_case_insensitive() {
        for heading in ["References", "REFERENCES", "references", "Bibliography", "BIBLIOGRAPHY"] {
            assert!(REFERENCES_HEADING.is_match(heading), "{heading}");
        }
        assert!(!REFERENCES_HEADING.is_match("Related Work"));
    }

    #[test]
    fn test_references_heading_needs_whole_word() {
        for body in ["human preferences", "see cross-references", "bibliographyless", "Preferences"] {
            assert!(!REFERENCES_HEADING.is_match(body), "{body}");
        }
        let caps = REFERENCES_HEADING.captures("body text. References [1]").unwrap();
        assert_eq!(caps.get(1).unwrap().as_str(), "References");
    }
}
