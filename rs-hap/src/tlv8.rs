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

//! The TLV8 encoding: a flat stream of `[tag: u8, length: u8, value...]` items.
//!
//! Values longer than 255 bytes travel as consecutive chunks sharing the
//! same tag. Several logical records (e.g. several pairings) can share one
//! stream, with a zero-length item carrying a designated separator tag between
//! consecutive records.
//!
//! The byte-level codec is tag-agnostic; tag enumerations for a given exchange
//! (like [`crate::pairing::PairTag`]) are layered on top via [`TLV8Tag`].

use alloc::vec::Vec;

use log::debug;

use crate::error::{Error, ErrorCode};

pub use read::*;
pub use record::*;
pub use write::*;

mod read;
mod record;
mod write;

/// The maximum length of a single on-wire item value.
pub const MAX_CHUNK_LEN: usize = u8::MAX as usize;

/// The default cap on the length of an incoming stream.
pub const MAX_STREAM_LEN: usize = 64 * 1024;

/// A logical TLV8 item, i.e. a tag and its complete (coalesced) value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TLV8 {
    pub tag: u8,
    pub value: Vec<u8>,
}

impl TLV8 {
    pub fn new<T: Into<u8>>(tag: T, value: &[u8]) -> Self {
        Self {
            tag: tag.into(),
            value: value.to_vec(),
        }
    }

    pub fn u8<T: Into<u8>>(tag: T, value: u8) -> Self {
        Self::new(tag, &[value])
    }

    /// A zero-length item.
    pub fn empty<T: Into<u8>>(tag: T) -> Self {
        Self::new(tag, &[])
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Return the value as a single byte.
    pub fn as_u8(&self) -> Result<u8, Error> {
        match self.value.as_slice() {
            [byte] => Ok(*byte),
            _ => Err(ErrorCode::InvalidData.into()),
        }
    }

    /// Interpret the tag of this item within the tag enumeration `T`.
    ///
    /// Returns `Ok(None)` for a tag outside of `T` when `policy` is
    /// [`UnknownTagPolicy::PassThrough`].
    pub fn tag_as<T: TLV8Tag>(&self, policy: UnknownTagPolicy) -> Result<Option<T>, Error> {
        match T::from_tag(self.tag) {
            Some(tag) => Ok(Some(tag)),
            None => match policy {
                UnknownTagPolicy::PassThrough => {
                    debug!("Passing through unknown TLV8 tag 0x{:02x}", self.tag);
                    Ok(None)
                }
                UnknownTagPolicy::Reject => Err(ErrorCode::MalformedTag(self.tag).into()),
            },
        }
    }
}

/// Return the value of the first item in `items` carrying `tag`.
pub fn find<T: Into<u8>>(items: &[TLV8], tag: T) -> Option<&[u8]> {
    let tag = tag.into();

    items
        .iter()
        .find(|item| item.tag == tag)
        .map(|item| item.value.as_slice())
}

/// A tag enumeration of one TLV8 exchange kind.
///
/// Usually implemented with the [`crate::tlv8_tags`] macro over a `#[repr(u8)]`
/// enum deriving `strum::FromRepr`.
pub trait TLV8Tag: Copy + Sized {
    fn from_tag(tag: u8) -> Option<Self>;

    fn tag(&self) -> u8;
}

#[allow(unused_macros)]
#[macro_export]
macro_rules! tlv8_tags {
    ($en:ty) => {
        impl $crate::tlv8::TLV8Tag for $en {
            fn from_tag(tag: u8) -> Option<Self> {
                <$en>::from_repr(tag)
            }

            fn tag(&self) -> u8 {
                *self as u8
            }
        }

        impl From<$en> for u8 {
            fn from(tag: $en) -> u8 {
                tag as u8
            }
        }
    };
}

/// What typed decoding does with a tag outside of the context's tag enumeration.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub enum UnknownTagPolicy {
    /// Keep the item as an opaque `(tag, value)` pair, so that a peer
    /// speaking a newer protocol revision does not abort the exchange.
    #[default]
    PassThrough,
    /// Fail the decode with `ErrorCode::MalformedTag`.
    Reject,
}

/// Decoder limits and policies.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TLV8Config {
    /// Incoming streams longer than this are refused with `ErrorCode::Oversize`.
    pub max_stream_len: usize,
    pub unknown_tags: UnknownTagPolicy,
}

impl TLV8Config {
    pub const fn new() -> Self {
        Self {
            max_stream_len: MAX_STREAM_LEN,
            unknown_tags: UnknownTagPolicy::PassThrough,
        }
    }

    pub const fn with_max_stream_len(self, max_stream_len: usize) -> Self {
        Self {
            max_stream_len,
            ..self
        }
    }

    pub const fn with_unknown_tags(self, unknown_tags: UnknownTagPolicy) -> Self {
        Self {
            unknown_tags,
            ..self
        }
    }

    pub(crate) fn check_len(&self, data: &[u8]) -> Result<(), Error> {
        if data.len() > self.max_stream_len {
            log::warn!(
                "Refusing TLV8 stream of {} bytes (cap {})",
                data.len(),
                self.max_stream_len
            );
            Err(ErrorCode::Oversize)?;
        }

        Ok(())
    }
}

impl Default for TLV8Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use strum::FromRepr;

    use super::{find, TLV8Config, UnknownTagPolicy, TLV8};
    use crate::error::ErrorCode;

    #[derive(Debug, Copy, Clone, Eq, PartialEq, FromRepr)]
    #[repr(u8)]
    enum TestTag {
        A = 0x01,
        B = 0x02,
    }

    crate::tlv8_tags!(TestTag);

    #[test]
    fn test_tag_as() {
        let known = TLV8::u8(TestTag::B, 7);
        assert_eq!(
            known.tag_as::<TestTag>(UnknownTagPolicy::Reject).unwrap(),
            Some(TestTag::B)
        );

        let unknown = TLV8::u8(0x33u8, 7);
        assert_eq!(
            unknown
                .tag_as::<TestTag>(UnknownTagPolicy::PassThrough)
                .unwrap(),
            None
        );
        assert_eq!(
            unknown
                .tag_as::<TestTag>(UnknownTagPolicy::Reject)
                .map_err(|e| e.code()),
            Err(ErrorCode::MalformedTag(0x33))
        );
    }

    #[test]
    fn test_find() {
        let items = [
            TLV8::new(TestTag::A, b"first"),
            TLV8::new(TestTag::B, b"second"),
            TLV8::new(TestTag::A, b"third"),
        ];

        assert_eq!(find(&items, TestTag::A), Some(&b"first"[..]));
        assert_eq!(find(&items, TestTag::B), Some(&b"second"[..]));
        assert_eq!(find(&items, 0x03u8), None);
    }

    #[test]
    fn test_as_u8() {
        assert_eq!(TLV8::u8(TestTag::A, 0x42).as_u8().unwrap(), 0x42);
        assert!(TLV8::empty(TestTag::A).as_u8().is_err());
        assert!(TLV8::new(TestTag::A, &[1, 2]).as_u8().is_err());
    }

    #[test]
    fn test_config_check_len() {
        let config = TLV8Config::new().with_max_stream_len(4);

        assert!(config.check_len(&[0; 4]).is_ok());
        assert_eq!(
            config.check_len(&[0; 5]).map_err(|e| e.code()),
            Err(ErrorCode::Oversize)
        );
        assert_eq!(TLV8Config::default(), TLV8Config::new());
    }
}
