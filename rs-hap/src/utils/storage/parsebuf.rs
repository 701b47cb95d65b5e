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

use crate::error::*;

/// A buffer for reading data from a byte slice.
///
/// All reads are bounds-checked; reading past the end of the data yields
/// `ErrorCode::TruncatedPacket` and leaves the read position untouched.
#[derive(Debug, Clone)]
pub struct ReadBuf<'a> {
    buf: &'a [u8],
    read_off: usize,
}

impl<'a> ReadBuf<'a> {
    pub const fn new(buf: &'a [u8]) -> Self {
        Self { buf, read_off: 0 }
    }

    pub const fn left(&self) -> usize {
        self.buf.len() - self.read_off
    }

    pub const fn is_empty(&self) -> bool {
        self.left() == 0
    }

    /// Return the next byte without consuming it.
    pub fn peek_u8(&self) -> Option<u8> {
        self.buf.get(self.read_off).copied()
    }

    pub fn le_u8(&mut self) -> Result<u8, Error> {
        let data = self.peek_u8().ok_or(ErrorCode::TruncatedPacket)?;
        self.read_off += 1;

        Ok(data)
    }

    /// Consume the next `size` bytes and return them as a slice of the underlying data.
    pub fn take(&mut self, size: usize) -> Result<&'a [u8], Error> {
        if size <= self.left() {
            let data = &self.buf[self.read_off..self.read_off + size];
            self.read_off += size;
            return Ok(data);
        }
        Err(ErrorCode::TruncatedPacket.into())
    }
}
