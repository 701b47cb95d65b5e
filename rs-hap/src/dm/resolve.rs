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

use log::{debug, warn};

use crate::error::{Error, ErrorCode};

use super::CharId;

/// An entry identified by a characteristic type-code.
pub trait Typed {
    fn type_id(&self) -> CharId;
}

/// A required schema slot: a type-code together with the pure generator of
/// the entry used when the caller does not supply one.
pub struct Slot<T> {
    pub id: CharId,
    pub default: fn() -> T,
}

impl<T> Slot<T> {
    pub const fn new(id: CharId, default: fn() -> T) -> Self {
        Self { id, default }
    }
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Slot<T> {}

impl<T> core::fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Slot(0x{:04X})", self.id)
    }
}

/// The required and optional slots of a service type.
pub struct Schema<'a, T> {
    pub required: &'a [Slot<T>],
    pub optional: &'a [CharId],
}

impl<'a, T> Schema<'a, T> {
    pub const fn new(required: &'a [Slot<T>], optional: &'a [CharId]) -> Self {
        Self { required, optional }
    }

    pub fn is_required(&self, id: CharId) -> bool {
        self.required.iter().any(|slot| slot.id == id)
    }

    pub fn is_optional(&self, id: CharId) -> bool {
        self.optional.contains(&id)
    }

    /// Iterate over all type-codes of the schema, required ones first.
    pub fn ids(&self) -> impl Iterator<Item = CharId> + '_ {
        self.required
            .iter()
            .map(|slot| slot.id)
            .chain(self.optional.iter().copied())
    }

    /// Check that every type-code appears in the schema exactly once.
    pub fn check(&self) -> Result<(), Error> {
        for (index, id) in self.ids().enumerate() {
            if self.ids().skip(index + 1).any(|other| other == id) {
                warn!("Type-code 0x{:04X} appears more than once in the schema", id);
                Err(ErrorCode::InvalidSchema)?;
            }
        }

        Ok(())
    }
}

impl<T> Clone for Schema<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Schema<'_, T> {}

impl<T> core::fmt::Debug for Schema<'_, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Schema")
            .field("required", &self.required)
            .field("optional", &self.optional)
            .finish()
    }
}

/// The final, immutable list of entries of a service.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSet<T>(Vec<T>);

impl<T: Typed> ResolvedSet<T> {
    pub fn get(&self, id: CharId) -> Option<&T> {
        self.0.iter().find(|entry| entry.type_id() == id)
    }

    pub fn position(&self, id: CharId) -> Option<usize> {
        self.0.iter().position(|entry| entry.type_id() == id)
    }

    pub fn contains(&self, id: CharId) -> bool {
        self.position(id).is_some()
    }
}

impl<T> ResolvedSet<T> {
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.0
    }
}

impl<'a, T> IntoIterator for &'a ResolvedSet<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Assemble the entries of a service from its `schema` and the `supplied` entries.
///
/// * Every required slot ends up filled exactly once: with the supplied entry if
///   there is one, otherwise with the slot's default.
/// * Every optional slot is filled only if an entry was supplied for it.
/// * Supplied entries outside of the schema are kept as they are.
///
/// The supplied entries keep their order and come first; defaults for missing
/// required slots follow in schema order.
///
/// Fails with `ErrorCode::DuplicateSlot` if more than one entry is supplied for
/// the same required or optional slot, and with `ErrorCode::InvalidSchema` if
/// the schema itself is inconsistent.
pub fn resolve<T: Typed>(schema: &Schema<T>, supplied: Vec<T>) -> Result<ResolvedSet<T>, Error> {
    schema.check()?;

    for id in schema.ids() {
        if supplied.iter().filter(|entry| entry.type_id() == id).count() > 1 {
            warn!("More than one characteristic supplied for slot 0x{:04X}", id);
            Err(ErrorCode::DuplicateSlot(id))?;
        }
    }

    let mut defaults = Vec::new();

    for slot in schema.required {
        if supplied.iter().all(|entry| entry.type_id() != slot.id) {
            let entry = (slot.default)();
            if entry.type_id() != slot.id {
                warn!(
                    "Default generator of slot 0x{:04X} produced type-code 0x{:04X}",
                    slot.id,
                    entry.type_id()
                );
                Err(ErrorCode::InvalidSchema)?;
            }

            debug!("Synthesizing default for slot 0x{:04X}", slot.id);
            defaults.push(entry);
        }
    }

    let mut resolved = supplied;
    resolved.extend(defaults);

    Ok(ResolvedSet(resolved))
}
