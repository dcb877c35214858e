//! RLP encoding of a flat list of byte strings.
//!
//! Range queries return many variable-length `extra` fields at once; they are
//! packed into one RLP list so the response stays a single byte string.
//! Only byte-string items are supported; nested lists are rejected.

use crate::error::DecodeError;

const STRING_OFFSET: u8 = 0x80;
const LIST_OFFSET: u8 = 0xc0;
const SHORT_MAX: usize = 55;

/// Encode `items` as an RLP list of byte strings.
pub fn encode_list<T: AsRef<[u8]>>(items: &[T]) -> Vec<u8> {
    let mut payload = Vec::new();
    for item in items {
        encode_string(item.as_ref(), &mut payload);
    }
    let mut out = Vec::with_capacity(payload.len() + 9);
    encode_header(payload.len(), LIST_OFFSET, &mut out);
    out.extend_from_slice(&payload);
    out
}

/// Decode an RLP list of byte strings produced by [`encode_list`].
pub fn decode_list(buf: &[u8]) -> Result<Vec<Vec<u8>>, DecodeError> {
    let header = read_header(buf)?;
    if !header.is_list {
        return Err(DecodeError::ExpectedList);
    }
    let end = header
        .offset
        .checked_add(header.len)
        .ok_or(DecodeError::LengthOverflow)?;
    if buf.len() < end {
        return Err(DecodeError::UnexpectedEnd);
    }
    if buf.len() > end {
        return Err(DecodeError::TrailingBytes(buf.len() - end));
    }

    let mut items = Vec::new();
    let mut rest = &buf[header.offset..end];
    while !rest.is_empty() {
        let item = read_header(rest)?;
        if item.is_list {
            return Err(DecodeError::NestedList);
        }
        let item_end = item
            .offset
            .checked_add(item.len)
            .ok_or(DecodeError::LengthOverflow)?;
        if rest.len() < item_end {
            return Err(DecodeError::UnexpectedEnd);
        }
        items.push(rest[item.offset..item_end].to_vec());
        rest = &rest[item_end..];
    }
    Ok(items)
}

fn encode_string(item: &[u8], out: &mut Vec<u8>) {
    if item.len() == 1 && item[0] < STRING_OFFSET {
        out.push(item[0]);
        return;
    }
    encode_header(item.len(), STRING_OFFSET, out);
    out.extend_from_slice(item);
}

fn encode_header(len: usize, offset: u8, out: &mut Vec<u8>) {
    if len <= SHORT_MAX {
        out.push(offset + len as u8);
        return;
    }
    let be = (len as u64).to_be_bytes();
    let skip = be.iter().take_while(|b| **b == 0).count();
    let len_bytes = &be[skip..];
    out.push(offset + SHORT_MAX as u8 + len_bytes.len() as u8);
    out.extend_from_slice(len_bytes);
}

struct Header {
    is_list: bool,
    /// Bytes before the payload.
    offset: usize,
    len: usize,
}

fn read_header(buf: &[u8]) -> Result<Header, DecodeError> {
    let first = *buf.first().ok_or(DecodeError::UnexpectedEnd)?;
    match first {
        0x00..=0x7f => Ok(Header {
            is_list: false,
            offset: 0,
            len: 1,
        }),
        0x80..=0xb7 => {
            let len = (first - STRING_OFFSET) as usize;
            if len == 1 && buf.get(1).is_some_and(|b| *b < STRING_OFFSET) {
                return Err(DecodeError::NonCanonical);
            }
            Ok(Header {
                is_list: false,
                offset: 1,
                len,
            })
        }
        0xb8..=0xbf => read_long(buf, first - STRING_OFFSET - SHORT_MAX as u8, false),
        0xc0..=0xf7 => Ok(Header {
            is_list: true,
            offset: 1,
            len: (first - LIST_OFFSET) as usize,
        }),
        0xf8..=0xff => read_long(buf, first - LIST_OFFSET - SHORT_MAX as u8, true),
    }
}

fn read_long(buf: &[u8], len_of_len: u8, is_list: bool) -> Result<Header, DecodeError> {
    let n = len_of_len as usize;
    let len_bytes = buf.get(1..1 + n).ok_or(DecodeError::UnexpectedEnd)?;
    if len_bytes[0] == 0 {
        return Err(DecodeError::NonCanonical);
    }
    if n > std::mem::size_of::<usize>() {
        return Err(DecodeError::LengthOverflow);
    }
    let len = len_bytes
        .iter()
        .fold(0usize, |acc, b| (acc << 8) | *b as usize);
    if len <= SHORT_MAX {
        return Err(DecodeError::NonCanonical);
    }
    Ok(Header {
        is_list,
        offset: 1 + n,
        len,
    })
}
