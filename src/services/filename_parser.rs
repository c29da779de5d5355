//! Filename parser for adult scene release names
//!
//! Parses names like:
//! - "BigStudio.24.03.15.Jane.Doe.Scene.Title.XXX.1080p.MP4"
//! - "Brazzers.com_24-01-02_Mrs.Jane.Doe.XXX.720p.WEB"
//! - "TushyRaw.23.11.30.Jane.Doe.XXX.2160p.MP4-WRB"
//!
//! The layout is `Studio.YY.MM.DD.Performer.Words.Title.Words.<tags>`, but
//! nothing enforces it, so the parser never fails: it fills what it can
//! recognise and leaves the rest empty.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Tokens that end the performer/title region: resolutions, codecs,
/// containers and the XXX category marker. Compared upper-cased.
pub const TECHNICAL_TAGS: &[&str] = &[
    "XXX", "VR180", "1080P", "2160P", "3600P", "4K", "720P", "480P", "MP4", "MKV", "WMV", "WEB",
    "HEVC", "H264", "H265", "X264", "X265", "RAR", "ZIP", "IMAGESET", "PNG", "JPG",
];

/// Domain suffixes that sometimes follow the studio token ("Brazzers.com.24...").
const DOMAIN_SUFFIXES: &[&str] = &["com", "net", "org"];

static HONORIFIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:mrs|mr|ms|dr|miss)\b\.?\s*").expect("honorific regex"));

/// Semantic fields extracted from a raw release name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRelease {
    pub studio: String,
    pub date: Option<NaiveDate>,
    pub performer: String,
    pub title: String,
    pub raw: String,
}

impl ParsedRelease {
    pub fn year(&self) -> Option<i32> {
        self.date.map(|d| d.year())
    }
}

/// A release name split into tokens, with the position of the date window.
struct Tokenized {
    tokens: Vec<String>,
    date: Option<(usize, NaiveDate)>,
}

fn tokenize(raw: &str) -> Tokenized {
    let normalized = raw.replace(['_', '-'], ".");
    let mut tokens: Vec<String> = normalized
        .split('.')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    strip_domain_suffix(&mut tokens);

    let date = find_date_window(&tokens).or_else(|| fixed_position_date(&tokens));

    Tokenized { tokens, date }
}

fn strip_domain_suffix(tokens: &mut Vec<String>) {
    if tokens.len() < 2 {
        return;
    }
    let second = tokens[1].to_ascii_lowercase();
    if DOMAIN_SUFFIXES.contains(&second.as_str()) {
        tokens.remove(1);
    } else if second == "co" && tokens.get(2).is_some_and(|t| t.eq_ignore_ascii_case("uk")) {
        tokens.drain(1..3);
    }
}

/// Two-digit years pivot at 50: 00-49 → 2000s, 50-99 → 1900s.
pub fn expand_year(yy: u32) -> i32 {
    if yy < 50 {
        2000 + yy as i32
    } else {
        1900 + yy as i32
    }
}

fn is_digits(token: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&token.len()) && token.bytes().all(|b| b.is_ascii_digit())
}

fn valid_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

fn strict_date(y: &str, m: &str, d: &str) -> Option<NaiveDate> {
    if !is_digits(m, 1, 2) || !is_digits(d, 1, 2) {
        return None;
    }
    let year = if is_digits(y, 2, 2) {
        expand_year(y.parse().ok()?)
    } else if is_digits(y, 4, 4) && (y.starts_with("19") || y.starts_with("20")) {
        y.parse().ok()?
    } else {
        return None;
    };
    valid_date(year, m.parse().ok()?, d.parse().ok()?)
}

/// Leftmost `YY.MM.DD` window, scanning from the token after the studio.
fn find_date_window(tokens: &[String]) -> Option<(usize, NaiveDate)> {
    (1..tokens.len().saturating_sub(2)).find_map(|i| {
        strict_date(&tokens[i], &tokens[i + 1], &tokens[i + 2]).map(|date| (i, date))
    })
}

/// Leading digits of a token, e.g. "15sd" → 15.
fn leading_number(token: &str) -> Option<u32> {
    let digits: String = token.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Fallback for glued tokens such as "15sd": read the numeric prefixes of
/// tokens 1, 2 and 3 and apply the same range checks.
fn fixed_position_date(tokens: &[String]) -> Option<(usize, NaiveDate)> {
    if tokens.len() < 4 {
        return None;
    }
    let yy = leading_number(&tokens[1]).filter(|y| *y <= 99)?;
    let mm = leading_number(&tokens[2])?;
    let dd = leading_number(&tokens[3])?;
    valid_date(expand_year(yy), mm, dd).map(|date| (1, date))
}

pub fn is_technical_tag(token: &str) -> bool {
    let upper = token.to_uppercase();
    TECHNICAL_TAGS.contains(&upper.as_str())
}

fn strip_honorific(performer: &str) -> String {
    HONORIFIC.replace(performer, "").trim().to_string()
}

/// Parse a release name into studio, date, performer and title.
pub fn parse_release(raw: &str) -> ParsedRelease {
    let Tokenized { tokens, date } = tokenize(raw);

    let studio = tokens.first().cloned().unwrap_or_default();

    let mut performer = String::new();
    let mut title = String::new();

    if let Some((date_index, _)) = date {
        let content_start = (date_index + 3).min(tokens.len());
        let content_end = tokens[content_start..]
            .iter()
            .position(|t| is_technical_tag(t))
            .map(|p| content_start + p)
            .unwrap_or(tokens.len());
        let content = &tokens[content_start..content_end];

        match content.len() {
            0 => {}
            1 | 2 => performer = content.join(" "),
            _ => {
                performer = content[..2].join(" ");
                title = content[2..].join(" ");
            }
        }
    }

    let parsed = ParsedRelease {
        studio,
        date: date.map(|(_, d)| d),
        performer: strip_honorific(&performer),
        title,
        raw: raw.to_string(),
    };

    debug!(
        release = raw,
        studio = %parsed.studio,
        date = ?parsed.date,
        performer = %parsed.performer,
        title = %parsed.title,
        "Parsed release name"
    );

    parsed
}

/// Reconstruct the likely scene title from the raw name: everything left
/// after removing the studio, the date window, the performer words and any
/// technical tags.
pub fn derive_title(parsed: &ParsedRelease) -> String {
    let Tokenized { tokens, date } = tokenize(&parsed.raw);

    let date_range = date.map(|(i, _)| i..i + 3);
    let mut remaining: Vec<&str> = tokens
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != 0)
        .filter(|(i, _)| !date_range.as_ref().is_some_and(|r| r.contains(i)))
        .map(|(_, t)| t.as_str())
        .filter(|t| !is_technical_tag(t))
        .collect();

    let performer_words: Vec<String> = parsed
        .performer
        .split_whitespace()
        .map(str::to_lowercase)
        .collect();

    if !performer_words.is_empty() && remaining.len() >= performer_words.len() {
        let found = remaining.windows(performer_words.len()).position(|window| {
            window
                .iter()
                .zip(&performer_words)
                .all(|(token, word)| token.to_lowercase() == *word)
        });
        if let Some(start) = found {
            remaining.drain(start..start + performer_words.len());
        }
    }

    remaining.join(" ")
}
