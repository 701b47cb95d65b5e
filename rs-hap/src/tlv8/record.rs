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

use super::write::push_item;
use super::{TLV8Config, TLV8Element, TLV8Iter, TLV8Write, TLV8};

/// Write `records` to `tw`, one after the other, with a zero-length
/// `separator` item between consecutive records.
pub fn write_records<W, R>(tw: &mut W, records: &[R], separator: u8) -> Result<(), Error>
where
    W: TLV8Write,
    R: AsRef<[TLV8]>,
{
    for (index, record) in records.iter().enumerate() {
        if index > 0 {
            tw.separator(separator)?;
        }

        tw.tlvs(record.as_ref())?;
    }

    Ok(())
}

/// Encode `records` into one stream, with a zero-length `separator` item between
/// consecutive records (never before the first or after the last one).
pub fn join_records<R: AsRef<[TLV8]>>(records: &[R], separator: u8) -> Vec<u8> {
    let mut out = Vec::new();

    for (index, record) in records.iter().enumerate() {
        if index > 0 {
            push_item(&mut out, separator, &[]);
        }

        for item in record.as_ref() {
            push_item(&mut out, item.tag, &item.value);
        }
    }

    out
}

/// Split a stream produced by [`join_records`] back into its records.
///
/// Every zero-length `separator` item starts a new record and is itself dropped.
/// An empty stream yields no records at all, so a single empty record does not
/// survive a join/split round trip. Any other list of records does, provided
/// `separator` is not used as a tag inside the records themselves and no record
/// holds two adjacent items with the same tag, as those are coalesced.
pub fn split_records(data: &[u8], separator: u8) -> Result<Vec<Vec<TLV8>>, Error> {
    let mut records = Vec::new();

    if data.is_empty() {
        return Ok(records);
    }

    let mut current = Vec::new();

    for element in TLV8Iter::new(data, Some(separator)) {
        match element? {
            TLV8Element::Item(item) => current.push(item),
            TLV8Element::Separator => records.push(core::mem::take(&mut current)),
        }
    }

    records.push(current);

    Ok(records)
}

/// Like [`split_records`], but refuses streams longer than `config.max_stream_len`.
pub fn split_records_with(
    config: &TLV8Config,
    data: &[u8],
    separator: u8,
) -> Result<Vec<Vec<TLV8>>, Error> {
    config.check_len(data)?;

    split_records(data, separator)
}
