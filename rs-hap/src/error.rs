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

use core::{array::TryFromSliceError, fmt, str::Utf8Error};

use crate::dm::CharId;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ErrorCode {
    /// More than one caller-supplied characteristic for the same schema slot
    DuplicateSlot(CharId),
    /// A schema lists a type-code twice, or in both the required and optional sets
    InvalidSchema,
    TruncatedPacket,
    /// A tag outside the tag enumeration of the decoding context
    MalformedTag(u8),
    /// An incoming stream exceeded the configured length cap
    Oversize,
    NoSpace,
    InvalidData,
    NotFound,
    Invalid,
    Utf8Fail,
}

impl From<ErrorCode> for Error {
    fn from(code: ErrorCode) -> Self {
        Self::new(code)
    }
}

pub struct Error {
    code: ErrorCode,
    #[cfg(feature = "backtrace")]
    backtrace: std::backtrace::Backtrace,
}

impl Error {
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code,
            #[cfg(feature = "backtrace")]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }

    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    #[cfg(feature = "backtrace")]
    pub const fn backtrace(&self) -> &std::backtrace::Backtrace {
        &self.backtrace
    }

    pub fn remap<F>(self, matcher: F, to: Self) -> Self
    where
        F: FnOnce(&Self) -> bool,
    {
        if matcher(&self) {
            to
        } else {
            self
        }
    }

    /// Fold every decoding failure (truncation, bad tags, oversize input)
    /// into `InvalidData`, which is what a request handler reports upwards.
    pub fn map_malformed(self) -> Self {
        self.remap(
            |e| {
                matches!(
                    e.code(),
                    ErrorCode::TruncatedPacket | ErrorCode::MalformedTag(_) | ErrorCode::Oversize
                )
            },
            Error::new(ErrorCode::InvalidData),
        )
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Error {}

impl From<TryFromSliceError> for Error {
    fn from(_e: TryFromSliceError) -> Self {
        Self::new(ErrorCode::Invalid)
    }
}

impl From<Utf8Error> for Error {
    fn from(_e: Utf8Error) -> Self {
        Self::new(ErrorCode::Utf8Fail)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[cfg(not(feature = "backtrace"))]
        {
            write!(f, "Error::{}", self)?;
        }

        #[cfg(feature = "backtrace")]
        {
            writeln!(f, "Error::{} {{", self)?;
            write!(f, "{}", self.backtrace())?;
            writeln!(f, "}}")?;
        }

        Ok(())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code() {
            ErrorCode::DuplicateSlot(id) => write!(f, "DuplicateSlot(0x{:04X})", id),
            ErrorCode::MalformedTag(tag) => write!(f, "MalformedTag(0x{:02X})", tag),
            code => write!(f, "{:?}", code),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
