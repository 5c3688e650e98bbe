//! Pattern token compiler (C3).
//!
//! A pattern token is a single address, a CIDR (`ADDR/PREFIX`), or an
//! address range (`ADDR-ADDR`). Each compiles to one inclusive
//! [`V4Range`] or [`V6Range`]; post-compile, [`crate::index`] only ever
//! deals in uniform ranges. The tagged `{Single, Cidr, Range}`
//! distinction lives entirely in this module and never leaks into the
//! hot matching path.

use crate::addr::{V4Addr, V6Addr};
use crate::error::{Error, Result};
use crate::parse::{parse_v4, parse_v6};

/// An inclusive `[min, max]` range of IPv4 addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct V4Range {
    pub min: V4Addr,
    pub max: V4Addr,
}

/// An inclusive `[min, max]` range of IPv6 addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct V6Range {
    pub min: V6Addr,
    pub max: V6Addr,
}

/// One compiled pattern, still tagged by family.
///
/// This is the only place the `Single`/`Cidr`/`Range` distinction is
/// visible; [`compile_token`] always collapses it to a plain range
/// before returning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompiledRange {
    V4(V4Range),
    V6(V6Range),
}

enum Kind<'a> {
    Single(&'a [u8]),
    Cidr(&'a [u8], &'a [u8]),
    Range(&'a [u8], &'a [u8]),
}

/// Split a single pattern token (already separated from its neighbors
/// by comma/whitespace) into its `{Single, Cidr, Range}` shape.
fn classify(token: &[u8]) -> Kind<'_> {
    // A '/' only ever separates a CIDR prefix; a '-' only ever
    // separates a range. Addresses themselves never contain either
    // character, so the first occurrence is authoritative.
    if let Some(slash) = token.iter().position(|&b| b == b'/') {
        return Kind::Cidr(&token[..slash], &token[slash + 1..]);
    }
    if let Some(dash) = token.iter().position(|&b| b == b'-') {
        return Kind::Range(&token[..dash], &token[dash + 1..]);
    }
    Kind::Single(token)
}

fn strict_parse_v4(bytes: &[u8]) -> Result<V4Addr> {
    let (addr, consumed) = parse_v4(bytes)?;
    if consumed != bytes.len() {
        return Err(Error::MalformedV4);
    }
    Ok(addr)
}

fn strict_parse_v6(bytes: &[u8]) -> Result<V6Addr> {
    let (addr, consumed, _) = parse_v6(bytes)?;
    if consumed != bytes.len() {
        return Err(Error::MalformedV6);
    }
    Ok(addr)
}

/// Parse either family strictly, requiring the whole slice to be
/// consumed as a single address literal.
fn strict_parse_addr(bytes: &[u8]) -> Result<CompiledRange> {
    if bytes.contains(&b':') {
        let addr = strict_parse_v6(bytes)?;
        Ok(CompiledRange::V6(V6Range { min: addr, max: addr }))
    } else {
        let addr = strict_parse_v4(bytes)?;
        Ok(CompiledRange::V4(V4Range { min: addr, max: addr }))
    }
}

/// Compile one pattern token into an inclusive range.
///
/// `strict` enables CIDR alignment checking: a CIDR whose address part
/// has low bits set below the prefix is a compile-time error rather
/// than being silently masked.
pub fn compile_token(token: &[u8], strict: bool) -> Result<CompiledRange> {
    let pattern_str = || String::from_utf8_lossy(token).into_owned();

    match classify(token) {
        Kind::Single(addr) => strict_parse_addr(addr).map_err(|_| {
            Error::MalformedPattern(pattern_str())
        }),

        Kind::Cidr(addr, prefix_bytes) => {
            let prefix_str = std::str::from_utf8(prefix_bytes)
                .map_err(|_| Error::MalformedPattern(pattern_str()))?;
            let prefix: u32 = prefix_str
                .parse()
                .map_err(|_| Error::MalformedPattern(pattern_str()))?;

            if addr.contains(&b':') {
                let base = strict_parse_v6(addr).map_err(|_| Error::MalformedPattern(pattern_str()))?;
                if prefix > V6Addr::BITS {
                    return Err(Error::MalformedPattern(pattern_str()));
                }
                let mask = V6Addr::prefix_mask(prefix);
                let min = V6Addr(base.0 & mask);
                if strict && base.0 & !mask != 0 {
                    return Err(Error::UnalignedCidr(pattern_str()));
                }
                let max = V6Addr(min.0 | !mask);
                Ok(CompiledRange::V6(V6Range { min, max }))
            } else {
                let base = strict_parse_v4(addr).map_err(|_| Error::MalformedPattern(pattern_str()))?;
                if prefix > V4Addr::BITS {
                    return Err(Error::MalformedPattern(pattern_str()));
                }
                let mask = V4Addr::prefix_mask(prefix);
                let min = V4Addr(base.0 & mask);
                if strict && base.0 & !mask != 0 {
                    return Err(Error::UnalignedCidr(pattern_str()));
                }
                let max = V4Addr(min.0 | !mask);
                Ok(CompiledRange::V4(V4Range { min, max }))
            }
        }

        Kind::Range(first, second) => {
            let first = strict_parse_addr_plain(first).map_err(|_| Error::MalformedPattern(pattern_str()))?;
            let second = strict_parse_addr_plain(second).map_err(|_| Error::MalformedPattern(pattern_str()))?;

            match (first, second) {
                (CompiledRange::V4(a), CompiledRange::V4(b)) => {
                    if a.min > b.min {
                        return Err(Error::MalformedPattern(pattern_str()));
                    }
                    Ok(CompiledRange::V4(V4Range { min: a.min, max: b.min }))
                }
                (CompiledRange::V6(a), CompiledRange::V6(b)) => {
                    if a.min > b.min {
                        return Err(Error::MalformedPattern(pattern_str()));
                    }
                    Ok(CompiledRange::V6(V6Range { min: a.min, max: b.min }))
                }
                _ => Err(Error::MalformedPattern(pattern_str())),
            }
        }
    }
}

fn strict_parse_addr_plain(bytes: &[u8]) -> Result<CompiledRange> {
    strict_parse_addr(bytes)
}

/// Split a full CLI/pattern-file pattern list on commas and whitespace
/// into individual tokens. Commas within a line separate multiple
/// patterns, same as plain whitespace.
pub fn split_tokens(text: &str) -> Vec<&str> {
    text.split(|c: char| c == ',' || c.is_ascii_whitespace())
        .filter(|s| !s.is_empty())
        .collect()
}
