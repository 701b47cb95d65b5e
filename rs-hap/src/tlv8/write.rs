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
use crate::utils::storage::WriteBuf;

use super::{MAX_CHUNK_LEN, TLV8};

/// A trait representing a storage where data can be serialized as a TLV8 stream
/// by synchronously emitting bytes to the storage.
///
/// The methods that need to be implemented are `write`, `get_tail` and `rewind_to`.
/// The latter two let item writes be all-or-nothing: an item that does not fit
/// is rolled back rather than left half-written.
pub trait TLV8Write {
    type Position: Copy;

    /// Write a single byte to the storage.
    fn write(&mut self, byte: u8) -> Result<(), Error>;

    fn get_tail(&self) -> Self::Position;

    fn rewind_to(&mut self, pos: Self::Position);

    fn write_raw_data(&mut self, data: &[u8]) -> Result<(), Error> {
        for byte in data {
            self.write(*byte)?;
        }

        Ok(())
    }

    /// Write a tag and a value of arbitrary length.
    ///
    /// Values longer than 255 bytes are split into 255-byte chunks, each
    /// preceded by the same tag. When the value length is an exact multiple of
    /// 255, a trailing zero-length chunk marks the end of the value.
    fn item<T: Into<u8>>(&mut self, tag: T, value: &[u8]) -> Result<(), Error> {
        let tag = tag.into();
        let pos = self.get_tail();

        let result = write_chunks(self, tag, value);
        if result.is_err() {
            self.rewind_to(pos);
        }

        result
    }

    /// Write a tag and a single-byte value.
    fn u8<T: Into<u8>>(&mut self, tag: T, value: u8) -> Result<(), Error> {
        self.item(tag, &[value])
    }

    /// Write a zero-length item, i.e. a record separator.
    fn separator<T: Into<u8>>(&mut self, tag: T) -> Result<(), Error> {
        self.item(tag, &[])
    }

    fn tlv(&mut self, item: &TLV8) -> Result<(), Error> {
        self.item(item.tag, &item.value)
    }

    fn tlvs(&mut self, items: &[TLV8]) -> Result<(), Error> {
        for item in items {
            self.tlv(item)?;
        }

        Ok(())
    }
}

fn write_chunks<W: TLV8Write + ?Sized>(tw: &mut W, tag: u8, value: &[u8]) -> Result<(), Error> {
    for chunk in chunks(value) {
        tw.write_raw_data(&[tag, chunk.len() as u8])?;
        tw.write_raw_data(chunk)?;
    }

    Ok(())
}

/// The on-wire chunks of a value.
///
/// Values longer than 255 bytes are split into 255-byte chunks. An empty value,
/// or one longer than 255 bytes whose length is a multiple of 255, ends with a
/// zero-length chunk.
fn chunks(value: &[u8]) -> impl Iterator<Item = &[u8]> {
    let terminated = value.is_empty()
        || (value.len() > MAX_CHUNK_LEN && value.len() % MAX_CHUNK_LEN == 0);

    value
        .chunks(MAX_CHUNK_LEN)
        .chain(terminated.then_some(&value[..0]))
}

/// Append an item to an unbounded buffer.
pub(crate) fn push_item(out: &mut Vec<u8>, tag: u8, value: &[u8]) {
    for chunk in chunks(value) {
        out.extend_from_slice(&[tag, chunk.len() as u8]);
        out.extend_from_slice(chunk);
    }
}

impl<T> TLV8Write for &mut T
where
    T: TLV8Write,
{
    type Position = T::Position;

    fn write(&mut self, byte: u8) -> Result<(), Error> {
        (**self).write(byte)
    }

    fn get_tail(&self) -> Self::Position {
        (**self).get_tail()
    }

    fn rewind_to(&mut self, pos: Self::Position) {
        (**self).rewind_to(pos)
    }

    fn write_raw_data(&mut self, data: &[u8]) -> Result<(), Error> {
        (**self).write_raw_data(data)
    }
}

impl TLV8Write for Vec<u8> {
    type Position = usize;

    fn write(&mut self, byte: u8) -> Result<(), Error> {
        self.push(byte);

        Ok(())
    }

    fn get_tail(&self) -> Self::Position {
        self.len()
    }

    fn rewind_to(&mut self, pos: Self::Position) {
        self.truncate(pos);
    }

    fn write_raw_data(&mut self, data: &[u8]) -> Result<(), Error> {
        self.extend_from_slice(data);

        Ok(())
    }
}

impl TLV8Write for WriteBuf<'_> {
    type Position = usize;

    fn write(&mut self, byte: u8) -> Result<(), Error> {
        WriteBuf::le_u8(self, byte)
    }

    fn get_tail(&self) -> Self::Position {
        WriteBuf::get_tail(self)
    }

    fn rewind_to(&mut self, pos: Self::Position) {
        WriteBuf::rewind_tail_to(self, pos)
    }

    fn write_raw_data(&mut self, data: &[u8]) -> Result<(), Error> {
        WriteBuf::append(self, data)
    }
}

/// Encode a single item into a freshly allocated buffer.
pub fn encode_item<T: Into<u8>>(tag: T, value: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(value.len() + 2 * (value.len() / MAX_CHUNK_LEN + 2));
    push_item(&mut out, tag.into(), value);

    out
}

/// Encode a sequence of items into a freshly allocated buffer.
pub fn encode_items(items: &[TLV8]) -> Vec<u8> {
    let mut out = Vec::new();

    for item in items {
        push_item(&mut out, item.tag, &item.value);
    }

    out
}
