//! Path pattern matching.
//!
//! # Responsibilities
//! - Match a request path exactly or by prefix
//! - Rank overlapping patterns so the most specific one wins
//!
//! # Design Decisions
//! - Path matching is case-sensitive and works on the raw (still
//!   percent-encoded) path
//! - Longer patterns are more specific, regardless of kind
//! - No regex to guarantee O(n) matching

/// A path pattern in a routing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathPattern {
    /// Matches only this exact path.
    Exact(&'static str),
    /// Matches every path starting with this prefix.
    Prefix(&'static str),
}

impl PathPattern {
    /// Returns true if `path` matches this pattern.
    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathPattern::Exact(p) => path == *p,
            PathPattern::Prefix(p) => path.starts_with(p),
        }
    }

    /// Portion of `path` after the pattern, if it matches.
    ///
    /// The remainder is returned byte-for-byte, without any decoding.
    pub fn remainder<'a>(&self, path: &'a str) -> Option<&'a str> {
        match self {
            PathPattern::Exact(p) => (path == *p).then_some(""),
            PathPattern::Prefix(p) => path.strip_prefix(p),
        }
    }

    /// Ranking used to pick between several matching patterns.
    pub fn specificity(&self) -> usize {
        match self {
            PathPattern::Exact(p) | PathPattern::Prefix(p) => p.len(),
        }
    }
}
