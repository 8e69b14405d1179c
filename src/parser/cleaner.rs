// file: src/parser/cleaner.rs
// description: regex based cleanup of raw pdf text before training
// reference: https://docs.rs/regex

use crate::parser::patterns::{
    DIGITS_ONLY, NEWLINE_RUN, PAGE_NUMBER_LINE, REFERENCES_HEADING, WHITESPACE_RUN,
};

const MIN_LINE_CHARS: usize = 3;

pub struct TextCleaner {
    truncate_references: bool,
}

impl TextCleaner {
    pub fn new(truncate_references: bool) -> Self {
        Self {
            truncate_references,
        }
    }

    /// Normalizes extracted paper text into a single whitespace-collapsed line.
    ///
    /// Blank-line runs are collapsed, page-number lines and lines shorter than
    /// three characters are dropped, characters outside the BMP become `?`,
    /// and everything from the first `references`/`bibliography` (any case) on
    /// is cut when truncation is enabled. Only the whole word counts, so
    /// "preferences" never triggers the cut.
    pub fn clean(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let text = NEWLINE_RUN.replace_all(text, "\n");
        let text = PAGE_NUMBER_LINE.replace_all(&text, "\n");

        let kept: Vec<String> = text
            .split('\n')
            .filter(|line| line.trim().chars().count() >= MIN_LINE_CHARS)
            .filter(|line| !DIGITS_ONLY.is_match(line))
            .map(replace_astral)
            .collect();

        let joined = kept.join("\n");
        let mut text = WHITESPACE_RUN.replace_all(&joined, " ").into_owned();

        if self.truncate_references
            && let Some(found) = REFERENCES_HEADING
                .captures(&text)
                .and_then(|caps| caps.get(1))
        {
            text.truncate(found.start());
        }

        text.trim().to_string()
    }
}

impl Default for TextCleaner {
    fn default() -> Self {
        Self::new(true)
    }
}

fn replace_astral(line: &str) -> String {
    line.chars()
        .map(|c| if (c as u32) < 0x10000 { c } else { '?' })
        .collect()
}
