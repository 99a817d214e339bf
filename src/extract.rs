//! Heuristic extraction of a company name and a BS date range from one
//! announcement.
//!
//! Both searches are ordered lists of pure matchers tried until one succeeds.
//!
//! Real data examples:
//!   ABC Hydropower Ltd IPO opens from 1st Chaitra to 5th Chaitra, 2082
//!   Sanima Hydro Power Company Limited - IPO from 12th Magh - 16th Falgun, 2081
//!   XYZ Laghubitta Bittiya Sanstha is going to issue shares from 3rd to 7th Poush, 2081

use regex::{Captures, Regex};
use std::sync::LazyLock;
use tracing::debug;

use crate::config::ExtractorConfig;

/// Company name and the two BS date phrases found in an announcement.
///
/// Phrases are normalised to `"<day> <month> <year>"` with ordinal suffixes
/// removed and the month spelled as in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub company:      String,
    pub start_phrase: String,
    pub end_phrase:   String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("no date range pattern matched")]
    NoDatePatternMatch,
    #[error("no company name candidate found")]
    NoCompanyCandidate,
}

// ── Date range patterns ────────────────────────────────────────────
//
// All patterns share group names. `m1` is absent when both dates share
// one month, in which case `m2` applies to both. Day groups start at a word
// boundary so the tail of a year is never read as a day.

// 12th Magh - 16th Falgun, 2081
static RE_SPLIT_MONTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?P<d1>\d{1,2})(?:st|nd|rd|th)?\s+(?P<m1>[a-z]+)\s*[-–—]\s*\b(?P<d2>\d{1,2})(?:st|nd|rd|th)?\s+(?P<m2>[a-z]+),?\s*(?P<year>\d{4})"
    ).expect("split month regex")
});

// 3rd to 7th Poush, 2081 / 3rd - 7th Poush, 2081
static RE_SHARED_MONTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?P<d1>\d{1,2})(?:st|nd|rd|th)?(?:\s+to\s+|\s*[-–—]\s*)\b(?P<d2>\d{1,2})(?:st|nd|rd|th)?\s+(?P<m2>[a-z]+),?\s*(?P<year>\d{4})"
    ).expect("shared month regex")
});

// from 1st Chaitra to 5th Chaitra, 2082
static RE_FROM_TO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\bfrom\s+(?P<d1>\d{1,2})(?:st|nd|rd|th)?\s+(?P<m1>[a-z]+)\s+to\s+\b(?P<d2>\d{1,2})(?:st|nd|rd|th)?\s+(?P<m2>[a-z]+),?\s*(?P<year>\d{4})"
    ).expect("from-to regex")
});

static DATE_PATTERNS: &[(&str, &LazyLock<Regex>)] = &[
    ("split_month", &RE_SPLIT_MONTH),
    ("shared_month", &RE_SHARED_MONTH),
    ("from_to", &RE_FROM_TO),
];

fn phrases(caps: &Captures<'_>) -> (String, String) {
    let end_month = &caps["m2"];
    let start_month = caps.name("m1").map_or(end_month, |m| m.as_str());
    let year = &caps["year"];
    (
        format!("{} {start_month} {year}", &caps["d1"]),
        format!("{} {end_month} {year}", &caps["d2"]),
    )
}

// ── Company heuristics ─────────────────────────────────────────────

static LEGAL_ENTITY_KEYWORDS: &[&str] = &[
    "ltd",
    "limited",
    "bank",
    "finance",
    "insurance",
    "reinsurance",
    "power",
    "hydro",
    "hydropower",
    "energy",
    "development",
    "company",
    "co",
    "microfinance",
    "laghubitta",
    "bittiya",
    "sanstha",
    "capital",
    "fund",
    "corporation",
];

static SEPARATORS: &[&str] = &[" - ", " – ", " — ", " IPO", " Share"];

// Matched against the ASCII-lowercased text
static CONNECTIVES: &[&str] = &[" is going to issue", " of ", " from ", " opens"];

// The first clause ends at punctuation, a number or a spaced dash
static RE_CLAUSE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;:(\d]|\s[-–—]\s").expect("clause end regex"));

static RE_AUXILIARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?P<company>.+?)\s+(?:is|has|will)\s+").expect("auxiliary verb regex")
});

type CompanyHeuristic = fn(&str, &ExtractorConfig) -> Option<String>;

static COMPANY_HEURISTICS: &[(&str, CompanyHeuristic)] = &[
    ("legal_entity", company_by_legal_entity),
    ("separator", company_by_separator),
    ("connective", company_by_connective),
    ("leading_words", company_by_leading_words),
];

fn is_legal_keyword(word: &str) -> bool {
    let bare = word
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();
    LEGAL_ENTITY_KEYWORDS.contains(&bare.as_str())
}

/// Prefix of the first clause ending at a legal-entity keyword, extended
/// through any keywords that immediately follow ("Hydro Power Company Ltd").
fn company_by_legal_entity(text: &str, config: &ExtractorConfig) -> Option<String> {
    let clause = RE_CLAUSE_END
        .find(text)
        .map_or(text, |m| &text[..m.start()]);
    let words: Vec<&str> = clause.split_whitespace().collect();

    // A keyword in first position ("Bank of ...") names nothing yet
    let first = words
        .iter()
        .skip(1)
        .position(|w| is_legal_keyword(w))?
        + 1;
    let last = words[first..]
        .iter()
        .take_while(|w| is_legal_keyword(w))
        .count()
        + first
        - 1;

    let candidate = words[..=last].join(" ");
    config.accepts_company(&candidate).then_some(candidate)
}

fn company_by_separator(text: &str, config: &ExtractorConfig) -> Option<String> {
    SEPARATORS.iter().find_map(|sep| {
        let idx = text.find(sep)?;
        let candidate = text[..idx].trim();
        config
            .accepts_company(candidate)
            .then(|| candidate.to_owned())
    })
}

fn company_by_connective(text: &str, config: &ExtractorConfig) -> Option<String> {
    let lower = text.to_ascii_lowercase();
    CONNECTIVES
        .iter()
        .find_map(|connective| {
            let idx = lower.find(connective)?;
            let candidate = text[..idx].trim();
            config
                .accepts_company(candidate)
                .then(|| candidate.to_owned())
        })
        .or_else(|| {
            let caps = RE_AUXILIARY.captures(text)?;
            let candidate = caps["company"].trim();
            config
                .accepts_company(candidate)
                .then(|| candidate.to_owned())
        })
}

/// The longest run of leading words that fits the length bounds.
fn company_by_leading_words(text: &str, config: &ExtractorConfig) -> Option<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() < config.fallback_min_words {
        return None;
    }
    let most = config.fallback_max_words.min(words.len());
    (config.fallback_min_words..=most)
        .rev()
        .map(|count| words[..count].join(" "))
        .find(|candidate| config.accepts_company(candidate))
}

// ── Extractor ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct RangeExtractor {
    config: ExtractorConfig,
}

impl RangeExtractor {
    pub const fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Company name by the first heuristic that yields an acceptable candidate.
    pub fn company(&self, text: &str) -> Option<String> {
        let text = text.trim();
        COMPANY_HEURISTICS.iter().find_map(|(name, heuristic)| {
            let company = heuristic(text, &self.config)?;
            debug!(heuristic = name, %company, "company candidate");
            Some(company)
        })
    }

    /// Start and end phrases from the first date range pattern that matches.
    pub fn date_range(&self, text: &str) -> Option<(String, String)> {
        DATE_PATTERNS.iter().find_map(|(name, pattern)| {
            let caps = pattern.captures(text)?;
            debug!(pattern = name, matched = &caps[0], "date range");
            Some(phrases(&caps))
        })
    }

    /// Company and date range, or `None` unless both are found.
    pub fn extract(&self, text: &str) -> Option<Extraction> {
        self.try_extract(text).ok()
    }

    /// Like [`extract`](Self::extract), but says what was missing. A missing
    /// date range is reported ahead of a missing company.
    ///
    /// # Errors
    /// `NoDatePatternMatch` or `NoCompanyCandidate`.
    pub fn try_extract(&self, text: &str) -> Result<Extraction, ExtractError> {
        let (start_phrase, end_phrase) = self
            .date_range(text)
            .ok_or(ExtractError::NoDatePatternMatch)?;
        let company = self
            .company(text)
            .ok_or(ExtractError::NoCompanyCandidate)?;
        Ok(Extraction {
            company,
            start_phrase,
            end_phrase,
        })
    }
}
