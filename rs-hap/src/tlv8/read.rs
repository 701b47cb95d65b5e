/*
 *
 *    Copyright (c) 2024 rs-hap Authors
 *
 *    Licensed under the Apache License, Version 2.0 (the "License");
 *    you may not use this file except in compliance with the License.
 *    You may obtain a copy of the License at
 *
 *        http://www.apache.org/licenses/LICENSE-2.0
 *
 *    Unless required by applicable law or agreed to in writing, software
 *    distributed under the License is distributed on an "AS IS" BASIS,
 *    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *    See the License for the specific language governing permissions and
 *    limitations under the License.
 */

use alloc::vec::Vec;

use crate::error::Error;
use crate::utils::storage::ReadBuf;

use super::{TLV8Config, TLV8Tag, MAX_CHUNK_LEN, TLV8};

/// One logical element of a TLV8 stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TLV8Element {
    /// A complete item, with any on-wire chunks already coalesced.
    Item(TLV8),
    /// A zero-length item carrying the separator tag of the decoding context.
    Separator,
}

/// A lazy decoder over a TLV8 stream.
///
/// Consecutive non-empty chunks with the same tag are coalesced into one value.
/// A zero-length chunk of the same tag directly after a coalesced value longer
/// than 255 bytes, and of a length that is a multiple of 255, is the value's
/// terminating chunk and is consumed with it. Any other zero-length item is a
/// hard boundary: it is reported as [`TLV8Element::Separator`] if its tag is the
/// separator tag given to [`TLV8Iter::new`], and as an empty item otherwise.
///
/// The iterator yields `Err(ErrorCode::TruncatedPacket)` once if the stream
/// ends in the middle of an item, and stops afterwards.
#[derive(Debug, Clone)]
pub struct TLV8Iter<'a> {
    buf: ReadBuf<'a>,
    separator: Option<u8>,
    failed: bool,
}

impl<'a> TLV8Iter<'a> {
    pub const fn new(data: &'a [u8], separator: Option<u8>) -> Self {
        Self {
            buf: ReadBuf::new(data),
            separator,
            failed: false,
        }
    }

    fn chunk(buf: &mut ReadBuf<'a>) -> Result<(u8, &'a [u8]), Error> {
        let tag = buf.le_u8()?;
        let len = buf.le_u8()? as usize;

        Ok((tag, buf.take(len)?))
    }

    fn next_element(&mut self) -> Result<Option<TLV8Element>, Error> {
        if self.buf.is_empty() {
            return Ok(None);
        }

        let (tag, chunk) = Self::chunk(&mut self.buf)?;

        if chunk.is_empty() {
            if self.separator == Some(tag) {
                return Ok(Some(TLV8Element::Separator));
            }

            return Ok(Some(TLV8Element::Item(TLV8::empty(tag))));
        }

        let mut value = chunk.to_vec();

        while self.buf.peek_u8() == Some(tag) {
            let mut ahead = self.buf.clone();
            let (_, chunk) = Self::chunk(&mut ahead)?;

            if chunk.is_empty() {
                if value.len() > MAX_CHUNK_LEN && value.len() % MAX_CHUNK_LEN == 0 {
                    self.buf = ahead;
                }

                break;
            }

            value.extend_from_slice(chunk);
            self.buf = ahead;
        }

        Ok(Some(TLV8Element::Item(TLV8 { tag, value })))
    }
}

impl Iterator for TLV8Iter<'_> {
    type Item = Result<TLV8Element, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let next = self.next_element();
        if next.is_err() {
            self.failed = true;
        }

        next.transpose()
    }
}

/// Decode a TLV8 stream into its logical items.
///
/// If `separator` is given, zero-length items with that tag are record
/// delimiters and are dropped from the result; use [`crate::tlv8::split_records`]
/// to keep the grouping instead.
pub fn decode_stream(data: &[u8], separator: Option<u8>) -> Result<Vec<TLV8>, Error> {
    let mut items = Vec::new();

    for element in TLV8Iter::new(data, separator) {
        if let TLV8Element::Item(item) = element? {
            items.push(item);
        }
    }

    Ok(items)
}

/// Like [`decode_stream`], but refuses streams longer than `config.max_stream_len`.
pub fn decode_stream_with(
    config: &TLV8Config,
    data: &[u8],
    separator: Option<u8>,
) -> Result<Vec<TLV8>, Error> {
    config.check_len(data)?;

    decode_stream(data, separator)
}

/// Decode a TLV8 stream whose tags belong to the enumeration `T`.
///
/// Tags outside of `T` are handled as configured in `config.unknown_tags`.
pub fn decode_typed<T: TLV8Tag>(
    config: &TLV8Config,
    data: &[u8],
    separator: Option<T>,
) -> Result<Vec<TLV8>, Error> {
    let items = decode_stream_with(config, data, separator.map(|tag| tag.tag()))?;

    for item in &items {
        item.tag_as::<T>(config.unknown_tags)?;
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::{decode_stream, decode_stream_with, TLV8Element, TLV8Iter};
    use crate::error::ErrorCode;
    use crate::tlv8::{encode_item, encode_items, TLV8Config, TLV8};

    #[test]
    fn test_decode_simple() {
        let data = [0x06, 1, 2, 0x01, 3, b'a', b'b', b'c'];

        assert_eq!(
            decode_stream(&data, None).unwrap(),
            [TLV8::u8(0x06u8, 2), TLV8::new(0x01u8, b"abc")]
        );
    }

    #[test]
    fn test_decode_empty_stream() {
        assert!(decode_stream(&[], None).unwrap().is_empty());
        assert!(decode_stream(&[], Some(0xff)).unwrap().is_empty());
    }

    #[test]
    fn test_decode_truncated() {
        // Declared length 3, only 2 bytes follow
        let data = [0x01, 3, b'a', b'b'];
        assert_eq!(
            decode_stream(&data, None).map_err(|e| e.code()),
            Err(ErrorCode::TruncatedPacket)
        );

        // A lone tag without its length
        let data = [0x06, 1, 2, 0x01];
        assert_eq!(
            decode_stream(&data, None).map_err(|e| e.code()),
            Err(ErrorCode::TruncatedPacket)
        );

        // A continuation chunk that is cut short
        let mut data = encode_item(0x01u8, &[0; 300]);
        data.truncate(data.len() - 1);
        assert_eq!(
            decode_stream(&data, None).map_err(|e| e.code()),
            Err(ErrorCode::TruncatedPacket)
        );
    }

    #[test]
    fn test_iter_stops_after_error() {
        let data = [0x06, 1, 2, 0x01, 5, 0];
        let mut iter = TLV8Iter::new(&data, None);

        assert_eq!(
            iter.next().unwrap().unwrap(),
            TLV8Element::Item(TLV8::u8(0x06u8, 2))
        );
        assert!(iter.next().unwrap().is_err());
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_coalesce_chunks() {
        let value: Vec<u8> = (0..600).map(|i| (i % 251) as u8).collect();
        let data = encode_item(0x01u8, &value);

        assert_eq!(decode_stream(&data, None).unwrap(), [TLV8::new(0x01u8, &value)]);
    }

    #[test]
    fn test_same_tag_chunks_are_coalesced() {
        let data = [0x01, 1, b'a', 0x01, 1, b'b', 0x02, 1, b'c', 0x01, 1, b'd'];

        assert_eq!(
            decode_stream(&data, None).unwrap(),
            [
                TLV8::new(0x01u8, b"ab"),
                TLV8::new(0x02u8, b"c"),
                TLV8::new(0x01u8, b"d")
            ]
        );

        // An empty item is a boundary between two runs of the same tag
        let data = [0x01, 1, b'a', 0x01, 0, 0x01, 1, b'b'];

        assert_eq!(
            decode_stream(&data, None).unwrap(),
            [
                TLV8::new(0x01u8, b"a"),
                TLV8::empty(0x01u8),
                TLV8::new(0x01u8, b"b")
            ]
        );
    }

    #[test]
    fn test_zero_length_boundaries() {
        // item, non-separator empty item, separator, item
        let data = [0x01, 1, b'a', 0x02, 0, 0xff, 0, 0x01, 1, b'b'];

        let mut iter = TLV8Iter::new(&data, Some(0xff));
        assert_eq!(
            iter.next().unwrap().unwrap(),
            TLV8Element::Item(TLV8::new(0x01u8, b"a"))
        );
        assert_eq!(
            iter.next().unwrap().unwrap(),
            TLV8Element::Item(TLV8::empty(0x02u8))
        );
        assert_eq!(iter.next().unwrap().unwrap(), TLV8Element::Separator);
        assert_eq!(
            iter.next().unwrap().unwrap(),
            TLV8Element::Item(TLV8::new(0x01u8, b"b"))
        );
        assert!(iter.next().is_none());

        // Separators are dropped from the flat list...
        assert_eq!(
            decode_stream(&data, Some(0xff)).unwrap(),
            [
                TLV8::new(0x01u8, b"a"),
                TLV8::empty(0x02u8),
                TLV8::new(0x01u8, b"b")
            ]
        );

        // ... unless there is no separator tag in the context
        assert_eq!(
            decode_stream(&data, None).unwrap(),
            [
                TLV8::new(0x01u8, b"a"),
                TLV8::empty(0x02u8),
                TLV8::empty(0xffu8),
                TLV8::new(0x01u8, b"b")
            ]
        );
    }

    #[test]
    fn test_empty_item_ends_coalescing() {
        // A full chunk, its terminating empty chunk, then another empty item of the same tag
        let mut data = encode_item(0x03u8, &[7; 510]);
        data.extend_from_slice(&[0x03, 0]);

        assert_eq!(
            decode_stream(&data, None).unwrap(),
            [TLV8::new(0x03u8, &[7; 510]), TLV8::empty(0x03u8)]
        );
    }

    #[test]
    fn test_empty_item_after_single_full_chunk() {
        // A 255-byte value has no terminating chunk, so the empty item is kept
        let items = [TLV8::new(0x01u8, &[7; 255]), TLV8::empty(0x01u8)];
        let data = encode_items(&items);

        assert_eq!(data.len(), 259);
        assert_eq!(decode_stream(&data, None).unwrap(), items);

        // The same holds for a separator in a record context
        let mut iter = TLV8Iter::new(&data, Some(0x01));
        assert_eq!(
            iter.next().unwrap().unwrap(),
            TLV8Element::Item(TLV8::new(0x01u8, &[7; 255]))
        );
        assert_eq!(iter.next().unwrap().unwrap(), TLV8Element::Separator);
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_empty_item_after_unaligned_long_value() {
        let items = [TLV8::new(0x01u8, &[7; 300]), TLV8::empty(0x01u8)];

        assert_eq!(decode_stream(&encode_items(&items), None).unwrap(), items);
    }

    #[test]
    fn test_unknown_tags_pass_through() {
        let data = [0xa7, 2, 1, 2];

        assert_eq!(
            decode_stream(&data, None).unwrap(),
            [TLV8::new(0xa7u8, &[1, 2])]
        );
    }

    #[test]
    fn test_oversize() {
        let config = TLV8Config::new().with_max_stream_len(4);

        assert_eq!(
            decode_stream_with(&config, &[0x01, 3, 1, 2, 3], None).map_err(|e| e.code()),
            Err(ErrorCode::Oversize)
        );
        assert_eq!(
            decode_stream_with(&config, &[0x01, 2, 1, 2], None).unwrap(),
            [TLV8::new(0x01u8, &[1, 2])]
        );
    }
}
