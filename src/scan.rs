//! Candidate IP-literal scanner (C5).
//!
//! Cheaply locates the byte positions in a line where an IP literal
//! could plausibly start, so the strict parsers in [`crate::parse`] are
//! only invoked on spans worth trying. Classification is table-driven
//! (compile-time byte-class lookup), in the spirit of the `ipgrep`
//! scanner's `prefilter_could_be_ip` and `NetLikeScanner`. Here the
//! candidate boundaries and the strict parse are the same step, so
//! there is no separate "maybe-IP" token to re-validate afterward.

use crate::addr::{Family, V4Addr, V6Addr};
use crate::parse::{parse_v4, parse_v6};

/// How far ahead of a hex-digit-or-colon byte to look for a `:` before
/// committing to a v6 candidate start. A short, fixed window keeps the
/// scanner cheap on long non-address runs while still covering any
/// real IPv6 literal (the longest textual form is under 40 bytes).
const V6_LOOKAHEAD_WINDOW: usize = 40;

const fn build_v4_body() -> [bool; 256] {
    let mut table = [false; 256];
    let mut b = b'0';
    while b <= b'9' {
        table[b as usize] = true;
        b += 1;
    }
    table[b'.' as usize] = true;
    table
}

const fn build_v6_body() -> [bool; 256] {
    let mut table = build_v4_body();
    let mut b = b'a';
    while b <= b'f' {
        table[b as usize] = true;
        b += 1;
    }
    let mut b = b'A';
    while b <= b'F' {
        table[b as usize] = true;
        b += 1;
    }
    table[b':' as usize] = true;
    table
}

const V4_BODY: [bool; 256] = build_v4_body();
const V6_BODY: [bool; 256] = build_v6_body();

#[inline]
fn is_v4_head(b: u8) -> bool {
    b.is_ascii_digit()
}

#[inline]
fn is_v6_head(b: u8) -> bool {
    b.is_ascii_hexdigit() || b == b':'
}

#[inline]
fn is_v4_body(b: u8) -> bool {
    V4_BODY[b as usize]
}

#[inline]
fn is_v6_body(b: u8) -> bool {
    V6_BODY[b as usize]
}

/// A parsed candidate's address, tagged by family so a caller can never
/// reach for the wrong field: a `V4` candidate only ever carries a
/// `V4Addr`, and a `V6` candidate carries its `V6Addr` plus whatever
/// recognized v4-equivalent (`::a.b.c.d` / `::ffff:a.b.c.d` forms) the
/// parser found alongside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateAddr {
    V4(V4Addr),
    V6(V6Addr, Option<V4Addr>),
}

/// One parsed candidate: its byte span in the line and its address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub start: usize,
    pub end: usize,
    pub addr: CandidateAddr,
}

impl Candidate {
    /// Which family this candidate's address belongs to.
    pub fn family(&self) -> Family {
        match self.addr {
            CandidateAddr::V4(_) => Family::V4,
            CandidateAddr::V6(..) => Family::V6,
        }
    }
}

/// A restartable, line-scoped scanner. Construction borrows the line;
/// iterating advances a cursor and yields [`Candidate`]s left to right
/// in the order their first byte appears. Holds no state between lines
/// beyond what the caller reuses as scratch (the scanner itself is cheap
/// enough to rebuild per line, see [`crate::driver`]).
pub struct CandidateScanner<'a> {
    line: &'a [u8],
    pos: usize,
}

impl<'a> CandidateScanner<'a> {
    pub fn new(line: &'a [u8]) -> Self {
        Self { line, pos: 0 }
    }
}

impl<'a> Iterator for CandidateScanner<'a> {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        let line = self.line;
        let len = line.len();

        while self.pos < len {
            let i = self.pos;
            let b = line[i];
            let prev_is_v4_body = i > 0 && is_v4_body(line[i - 1]);
            let prev_is_v6_body = i > 0 && is_v6_body(line[i - 1]);

            if is_v4_head(b) && !prev_is_v4_body {
                if let Ok((addr, consumed)) = parse_v4(&line[i..]) {
                    self.pos = i + consumed;
                    return Some(Candidate {
                        start: i,
                        end: i + consumed,
                        addr: CandidateAddr::V4(addr),
                    });
                }
            }

            if is_v6_head(b) && !prev_is_v6_body && has_colon_within(line, i, V6_LOOKAHEAD_WINDOW) {
                if let Ok((addr, consumed, embedded)) = parse_v6(&line[i..]) {
                    self.pos = i + consumed;
                    return Some(Candidate {
                        start: i,
                        end: i + consumed,
                        addr: CandidateAddr::V6(addr, embedded),
                    });
                }
            }

            self.pos = i + 1;
        }

        None
    }
}

#[inline]
fn has_colon_within(line: &[u8], start: usize, window: usize) -> bool {
    let end = (start + window).min(line.len());
    line[start..end].contains(&b':')
}
