//! Match driver (C6) and public driver-facing surface (C7).
//!
//! This module owns the per-line policy that combines the scanner and
//! the index with the active output-mode flags. It is the only part of
//! the core that knows about modes; [`crate::scan`] and
//! [`crate::index`] are mode-agnostic.

use crate::index::PatternIndex;
use crate::scan::{Candidate, CandidateAddr, CandidateScanner};

/// Runtime mode flags. `strict` is not here: it only affects pattern
/// compilation (see [`crate::pattern`]) and has no effect once an index
/// exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchOptions {
    /// `-v`: emit lines with no matching address instead of matching ones.
    pub invert: bool,
    /// `-x`: the whole line (trimmed) must itself be a single matching address.
    pub exact: bool,
    /// `-i`: lines with no detected address count as matching.
    pub include_non_ip: bool,
}

/// Tie-break rule: a v6 literal's own match takes precedence; its
/// embedded-v4 equivalent is only consulted when the index has no v6
/// coverage at all. The `CandidateAddr` shape makes this exhaustive: a
/// v4 candidate can only ever carry a `V4Addr`, so there is nothing to
/// fall back to in that arm.
#[inline]
fn candidate_matches(index: &PatternIndex, c: &Candidate) -> bool {
    match c.addr {
        CandidateAddr::V4(v4) => index.contains_v4(v4),
        CandidateAddr::V6(v6, embedded_v4) => {
            if index.contains_v6(v6) {
                return true;
            }
            if !index.has_v6() {
                if let Some(v4_equiv) = embedded_v4 {
                    return index.contains_v4(v4_equiv);
                }
            }
            false
        }
    }
}

/// Decide whether `line` (without its terminator) would be emitted
/// under the given mode.
///
/// In non-invert, non-exact modes this exits as soon as the first
/// matching candidate is found (mandatory early exit). Invert mode
/// must scan every candidate before deciding.
pub fn line_matches(index: &PatternIndex, opts: &MatchOptions, line: &[u8]) -> bool {
    if opts.exact {
        return exact_line_matches(index, opts, line);
    }

    if !opts.invert {
        let mut saw_any = false;
        for c in CandidateScanner::new(line) {
            saw_any = true;
            if candidate_matches(index, &c) {
                return true;
            }
        }
        !saw_any && opts.include_non_ip
    } else {
        let mut saw_any = false;
        let mut any_match = false;
        for c in CandidateScanner::new(line) {
            saw_any = true;
            if candidate_matches(index, &c) {
                any_match = true;
            }
        }
        if !saw_any {
            opts.include_non_ip
        } else {
            !any_match
        }
    }
}

fn exact_line_matches(index: &PatternIndex, opts: &MatchOptions, line: &[u8]) -> bool {
    let trimmed = line.trim_ascii();

    let matched = if trimmed.is_empty() {
        None
    } else if let Ok((addr, consumed)) = crate::parse::parse_v4(trimmed) {
        if consumed == trimmed.len() {
            Some(index.contains_v4(addr))
        } else {
            None
        }
    } else if let Ok((addr, consumed, embedded)) = crate::parse::parse_v6(trimmed) {
        if consumed == trimmed.len() {
            let mut m = index.contains_v6(addr);
            if !m && !index.has_v6() {
                if let Some(v4_equiv) = embedded {
                    m = index.contains_v4(v4_equiv);
                }
            }
            Some(m)
        } else {
            None
        }
    } else {
        None
    };

    match matched {
        Some(m) => {
            if opts.invert {
                !m
            } else {
                m
            }
        }
        // Whole line isn't a single address at all: treated the same
        // as "no address detected" for include-non-ip purposes.
        None => opts.invert && opts.include_non_ip,
    }
}

/// Outcome of driving one input source to completion (C7): number of
/// lines that would be emitted/counted, used by the CLI to choose a
/// process exit code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub matched_lines: u64,
}

impl RunSummary {
    /// Process exit code: 0 if any line matched, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.matched_lines > 0 {
            0
        } else {
            1
        }
    }
}
