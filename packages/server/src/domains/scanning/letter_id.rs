use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix identifying a scanned API key (credential transfer) rather than a
/// letter code.
pub const API_KEY_PREFIX: &str = "th_api_live_";

lazy_static! {
    /// A letter code anywhere in free text.
    static ref LETTER_RE: Regex = Regex::new(r"(?i)ltr![a-z0-9]+").unwrap();

    /// A letter code appearing as a hack.club URL path segment. When the
    /// scanned text is a hack.club URL, only this form is accepted — junk
    /// text elsewhere in the string must not match.
    static ref HACK_CLUB_RE: Regex = Regex::new(r"(?i)hack\.club/(ltr![a-z0-9]+)").unwrap();
}

/// Canonical identifier of a physical letter, form `ltr!<alnum>`.
///
/// Always lowercase; constructed only by [`LetterId::extract`], immutable
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LetterId(String);

impl LetterId {
    /// Extract a letter id from raw scanned text.
    ///
    /// Rules, in order:
    /// 1. trim; empty text yields nothing.
    /// 2. text containing `hack.club` must carry the id as a URL path
    ///    segment; a hack.club URL without one is rejected outright.
    /// 3. otherwise the first `ltr!...` substring anywhere in the text.
    ///
    /// Matching is case-insensitive, the result is lowercased.
    pub fn extract(raw: &str) -> Option<Self> {
        let s = raw.trim();
        if s.is_empty() {
            return None;
        }

        if s.contains("hack.club") {
            return HACK_CLUB_RE
                .captures(s)
                .map(|c| Self(c[1].to_lowercase()));
        }

        LETTER_RE.find(s).map(|m| Self(m.as_str().to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LetterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Classify raw scanned text as a credential transfer, if it is one.
///
/// Checked before letter extraction is attempted: text starting with the
/// API key prefix, or carrying it behind a `#` fragment separator (the
/// URL hand-off flow), routes to credential handling instead of scanning.
pub fn extract_api_key(raw: &str) -> Option<&str> {
    let s = raw.trim();
    if s.starts_with(API_KEY_PREFIX) {
        return Some(s);
    }

    match s.split_once('#') {
        Some((_, fragment)) if fragment.starts_with(API_KEY_PREFIX) => Some(fragment),
        _ => None,
    }
}
