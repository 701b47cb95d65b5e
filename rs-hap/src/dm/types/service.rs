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

use strum::FromRepr;

use crate::dm::{resolve, ResolvedSet, Schema};
use crate::error::{Error, ErrorCode};

use super::{CharId, Characteristic, CharacteristicType};

/// The numeric type-code of a service.
pub type ServiceId = u16;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, FromRepr)]
#[repr(u16)]
pub enum ServiceType {
    CameraStreamManagement = 0x0110,
    CameraOperatingMode = 0x021A,
}

impl ServiceType {
    pub const fn id(&self) -> ServiceId {
        *self as ServiceId
    }
}

/// A service instance together with its resolved characteristics.
///
/// The characteristics are resolved once, when the service is created, and do
/// not change afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Service {
    ty: ServiceType,
    characteristics: ResolvedSet<Characteristic>,
}

impl Service {
    pub fn new(
        ty: ServiceType,
        schema: &Schema<Characteristic>,
        supplied: Vec<Characteristic>,
    ) -> Result<Self, Error> {
        let characteristics = resolve(schema, supplied)?;

        Ok(Self {
            ty,
            characteristics,
        })
    }

    pub fn service_type(&self) -> ServiceType {
        self.ty
    }

    pub fn characteristics(&self) -> &ResolvedSet<Characteristic> {
        &self.characteristics
    }

    pub fn get(&self, ty: CharacteristicType) -> Option<&Characteristic> {
        self.characteristics.get(ty.id())
    }

    pub fn get_custom(&self, id: CharId) -> Option<&Characteristic> {
        self.characteristics.get(id)
    }

    /// Return the index of the characteristic of type `ty`.
    ///
    /// Used by the typed service wrappers to bind their required characteristics
    /// right after construction.
    pub(crate) fn position(&self, ty: CharacteristicType) -> Result<usize, Error> {
        self.characteristics
            .position(ty.id())
            .ok_or_else(|| ErrorCode::NotFound.into())
    }

    pub(crate) fn at(&self, index: usize) -> &Characteristic {
        &self.characteristics.as_slice()[index]
    }
}
