//! Personal name decomposition
//!
//! Splits a GEDCOM 5.5.1 `NAME_PERSONAL` value into given names, surname and
//! suffix. The surname is delimited by slashes:
//!
//! ```text
//! NAME_PERSONAL:=
//!   {NAME_TEXT} | /{NAME_TEXT}/ | {NAME_TEXT} /{NAME_TEXT}/ |
//!   /{NAME_TEXT}/ {NAME_TEXT} | {NAME_TEXT} /{NAME_TEXT}/ {NAME_TEXT}
//! ```
//!
//! Without whitespace around the slashes the whole value is the first form,
//! so `William Lee/Parry/Jr.` is all given names.
//!
//! Nicknames between double quotes are not recognised (dropped after GEDCOM
//! 5.1), nor are name prefixes such as `Lt. Cmndr.`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// The three parts of a personal name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalName {
    /// Given names, everything before the surname
    pub given: Option<String>,
    /// Surname, between slashes
    pub surname: Option<String>,
    /// Suffix, after the surname
    pub suffix: Option<String>,
}

impl PersonalName {
    /// Decompose a `NAME_PERSONAL` value
    #[must_use]
    pub fn parse(value: &str) -> Self {
        Self {
            given: given_names(value),
            surname: surname(value),
            suffix: suffix(value),
        }
    }

    /// Fill the parts that are still unset from `value`; set parts are kept
    pub fn fill_missing(&mut self, value: &str) -> &mut Self {
        let parsed = Self::parse(value);
        if self.given.is_none() {
            self.given = parsed.given;
        }
        if self.surname.is_none() {
            self.surname = parsed.surname;
        }
        if self.suffix.is_none() {
            self.suffix = parsed.suffix;
        }
        self
    }
}

/// Given names: the words before the first word starting with `/`
#[must_use]
pub fn given_names(value: &str) -> Option<String> {
    let words: Vec<&str> = value
        .split(' ')
        .take_while(|word| !word.starts_with('/'))
        .collect();
    non_blank(&words.join(" "))
}

/// Surname: the text between slashes, when the slashes are space-delimited
#[must_use]
pub fn surname(value: &str) -> Option<String> {
    surname_patterns()
        .iter()
        .find_map(|pattern| capture(pattern, value))
}

/// Suffix: the text after the closing slash and a space
#[must_use]
pub fn suffix(value: &str) -> Option<String> {
    static SUFFIX: OnceLock<Regex> = OnceLock::new();
    capture(SUFFIX.get_or_init(|| compile(r".*/+ (.*)$")), value)
}

fn surname_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            // surname only
            r"^/(.+)/$",
            // surname and suffix
            r"^/(.+)/ .*$",
            // given names and surname
            r"^.* /(.+)/$",
            // complete name
            r"^.* /(.+)/ .*$",
        ]
        .into_iter()
        .map(compile)
        .collect()
    })
}

#[allow(clippy::expect_used)]
fn compile(pattern: &str) -> Regex {
    // constant patterns
    Regex::new(pattern).expect("name pattern is valid")
}

fn capture(pattern: &Regex, value: &str) -> Option<String> {
    pattern
        .captures(value)
        .and_then(|caps| caps.get(1))
        .and_then(|m| non_blank(m.as_str()))
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
