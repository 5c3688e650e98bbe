//! Strict textual-to-numeric address parsers (C2).
//!
//! Both parsers are *prefix* parsers: given a byte slice that may have
//! arbitrary trailing content (the rest of a scanned line), they consume
//! the longest valid address at the start of the slice and report how
//! many bytes that took. Two call sites apply different failure
//! policies to the same [`Error`] variants: the scanner swallows a
//! failure and tries the next byte, the pattern compiler treats it as
//! fatal and additionally requires the whole token to be consumed.

use crate::addr::{V4Addr, V6Addr};
use crate::error::{Error, Result};

/// Parse a strict IPv4 dotted-quad at the start of `bytes`.
///
/// Four decimal fields of 1-3 digits each, values 0-255, separated by
/// single `.` characters. A field with more than one digit may not
/// start with `0` (`"01"` is rejected, matching reference `grepcidr`
/// behavior). Returns the address and the number of bytes consumed;
/// trailing bytes after the fourth octet are left untouched.
pub fn parse_v4(bytes: &[u8]) -> Result<(V4Addr, usize)> {
    let len = bytes.len();
    let mut pos = 0usize;
    let mut octets = [0u8; 4];

    for (i, octet) in octets.iter_mut().enumerate() {
        if i > 0 {
            if pos >= len || bytes[pos] != b'.' {
                return Err(Error::MalformedV4);
            }
            pos += 1;
        }

        let field_start = pos;
        while pos < len && bytes[pos].is_ascii_digit() && pos - field_start < 3 {
            pos += 1;
        }
        let field = &bytes[field_start..pos];
        if field.is_empty() {
            return Err(Error::MalformedV4);
        }
        if field.len() > 1 && field[0] == b'0' {
            return Err(Error::MalformedV4);
        }

        let mut value: u32 = 0;
        for &b in field {
            value = value * 10 + (b - b'0') as u32;
        }
        if value > 255 {
            return Err(Error::MalformedV4);
        }
        *octet = value as u8;
    }

    let addr = V4Addr::from_octets(octets[0], octets[1], octets[2], octets[3]);
    Ok((addr, pos))
}

/// Parse a strict IPv6 literal (RFC 4291 textual forms) at the start of
/// `bytes`, including at most one `::` compression and an optional
/// trailing embedded IPv4 dotted-quad occupying the last two hextets.
///
/// On success returns the address, the number of bytes consumed, and
/// the "equivalent v4" address if the literal was written in the
/// `::a.b.c.d` or `::ffff:a.b.c.d` syntactic form (`None` otherwise,
/// even if an embedded dotted-quad was present but the surrounding
/// hextets don't form one of those two forms).
pub fn parse_v6(bytes: &[u8]) -> Result<(V6Addr, usize, Option<V4Addr>)> {
    let len = bytes.len();
    let mut pos = 0usize;
    let mut groups: Vec<u16> = Vec::with_capacity(8);
    let mut compress_at: Option<usize> = None;
    let mut embedded_v4: Option<V4Addr> = None;

    if pos + 1 < len && bytes[pos] == b':' && bytes[pos + 1] == b':' {
        compress_at = Some(0);
        pos += 2;
    } else if pos < len && bytes[pos] == b':' {
        return Err(Error::MalformedV6);
    }

    loop {
        if groups.len() >= 8 {
            break;
        }

        let group_start = pos;
        let mut digit_end = pos;
        while digit_end < len && bytes[digit_end].is_ascii_hexdigit() && digit_end - group_start < 4
        {
            digit_end += 1;
        }

        if digit_end > group_start && digit_end < len && bytes[digit_end] == b'.' {
            if let Ok((v4, v4len)) = parse_v4(&bytes[group_start..]) {
                if groups.len() > 6 {
                    return Err(Error::MalformedV6);
                }
                let [a, b, c, d] = v4.octets();
                groups.push(((a as u16) << 8) | b as u16);
                groups.push(((c as u16) << 8) | d as u16);
                embedded_v4 = Some(v4);
                pos = group_start + v4len;
                break;
            }
        }

        if digit_end == group_start {
            if groups.is_empty() && compress_at.is_none() {
                return Err(Error::MalformedV6);
            }
            break;
        }
        if digit_end - group_start > 4 {
            return Err(Error::MalformedV6);
        }

        let text =
            std::str::from_utf8(&bytes[group_start..digit_end]).map_err(|_| Error::MalformedV6)?;
        let value = u16::from_str_radix(text, 16).map_err(|_| Error::MalformedV6)?;
        groups.push(value);
        pos = digit_end;

        if pos < len && bytes[pos] == b':' {
            if pos + 1 < len && bytes[pos + 1] == b':' {
                if compress_at.is_some() {
                    return Err(Error::MalformedV6);
                }
                compress_at = Some(groups.len());
                pos += 2;
                continue;
            } else {
                if pos + 1 >= len || !bytes[pos + 1].is_ascii_hexdigit() {
                    return Err(Error::MalformedV6);
                }
                pos += 1;
                continue;
            }
        } else {
            break;
        }
    }

    let explicit = groups.len();
    let mut hextets = [0u16; 8];
    if let Some(cpos) = compress_at {
        if explicit >= 8 {
            return Err(Error::MalformedV6);
        }
        let filler = 8 - explicit;
        hextets[..cpos].copy_from_slice(&groups[..cpos]);
        hextets[cpos + filler..].copy_from_slice(&groups[cpos..]);
    } else {
        if explicit != 8 {
            return Err(Error::MalformedV6);
        }
        hextets.copy_from_slice(&groups);
    }

    let addr = V6Addr::from_hextets(hextets);

    let recognized_embedded = embedded_v4.filter(|_| {
        let all_zero_except_last2 = hextets[..6].iter().all(|&h| h == 0);
        let ffff_form = hextets[..5].iter().all(|&h| h == 0) && hextets[5] == 0xffff;
        all_zero_except_last2 || ffff_form
    });

    Ok((addr, pos, recognized_embedded))
}
