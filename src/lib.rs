//! # grepcidr
//!
//! A line filter that matches IPv4/IPv6 literals embedded in arbitrary
//! text against a compiled set of CIDR/range patterns, behavior-compatible
//! with the classical `grepcidr` utility.
//!
//! ## What this crate does
//!
//! - Compiles a mix of single-address, CIDR (`A/n`), and address-range
//!   (`A-B`) patterns into a sorted, overlap-free [`index::PatternIndex`].
//! - Scans arbitrary line-oriented text for candidate IP literals without
//!   running a regex engine over every byte.
//! - Parses candidate spans with strict, grepcidr-compatible grammar (no
//!   leading zeros, no embedded whitespace, exact RFC 4291 IPv6 forms).
//! - Applies default/invert/exact/include-non-IP/count output modes.
//!
//! ## What this crate does NOT do
//!
//! - No DNS resolution of hostnames.
//! - No mutation of matched lines; output is always verbatim input.
//! - No locale-sensitive parsing (everything is ASCII byte-oriented).
//! - No general-purpose regex matching.
//!
//! ## Typical use
//!
//! ```
//! use grepcidr::{compile_patterns, line_matches, MatchOptions};
//!
//! let index = compile_patterns(["192.168.0.0/16"], false).unwrap();
//! let opts = MatchOptions::default();
//! assert!(line_matches(&index, &opts, b"connection from 192.168.1.1"));
//! assert!(!line_matches(&index, &opts, b"connection from 10.0.0.1"));
//! ```
//!
//! The [`PatternIndex`] is immutable after construction and `Send + Sync`;
//! share one across threads, giving each thread its own scanning context
//! (the scanner itself holds no state beyond the line it borrows).

pub mod addr;
pub mod driver;
pub mod error;
pub mod index;
pub mod parse;
pub mod pattern;
pub mod scan;

pub use addr::{Family, V4Addr, V6Addr};
pub use driver::{line_matches, MatchOptions, RunSummary};
pub use error::{Error, Result};
pub use index::{IndexStats, PatternIndex};
pub use pattern::{compile_token, split_tokens, CompiledRange, V4Range, V6Range};
pub use scan::{Candidate, CandidateAddr, CandidateScanner};

/// Where a pattern token came from: a CLI `-e` flag, a pattern file, or
/// the bare positional argument. Kept uniform so the compiler doesn't
/// need to know which; both variants expand to the same comma/whitespace
/// token stream before reaching [`pattern::compile_token`].
#[derive(Debug, Clone)]
pub enum PatternSource {
    /// A single pattern string, as given to `-e` or the positional arg.
    Inline(String),
    /// The full contents of a pattern file (`-f`), one pattern (or
    /// comma-separated group) per line; `#` starts a comment.
    File(String),
}

/// Expand one [`PatternSource`] into its individual pattern tokens,
/// applying pattern-file comment/blank-line rules (blank lines and
/// lines starting with `#` are dropped) and the comma/whitespace token
/// split shared by both origins.
fn tokens_of(source: &PatternSource) -> Vec<String> {
    match source {
        PatternSource::Inline(s) => pattern::split_tokens(s).into_iter().map(String::from).collect(),
        PatternSource::File(contents) => contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .flat_map(pattern::split_tokens)
            .map(String::from)
            .collect(),
    }
}

/// Compile every pattern token drawn from `sources` into one
/// [`PatternIndex`]. The first malformed token aborts the whole compile;
/// no partial index is ever returned.
pub fn compile_pattern_sources<I>(sources: I, strict: bool) -> Result<PatternIndex>
where
    I: IntoIterator<Item = PatternSource>,
{
    let mut ranges = Vec::new();
    for source in sources {
        for token in tokens_of(&source) {
            ranges.push(pattern::compile_token(token.as_bytes(), strict)?);
        }
    }
    Ok(PatternIndex::build(ranges))
}

/// Convenience entry point for the common case: a flat list of pattern
/// strings (already split into tokens by the caller, e.g. the bare
/// positional argument or a fixed `-e` list), no pattern files.
pub fn compile_patterns<I, S>(patterns: I, strict: bool) -> Result<PatternIndex>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut ranges = Vec::new();
    for p in patterns {
        for token in pattern::split_tokens(p.as_ref()) {
            ranges.push(pattern::compile_token(token.as_bytes(), strict)?);
        }
    }
    Ok(PatternIndex::build(ranges))
}
