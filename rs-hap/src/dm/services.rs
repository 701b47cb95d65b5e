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

//! Schemas and typed wrappers of the catalog services.

pub mod camera;

/// A required schema slot for a catalog characteristic type, defaulting to
/// `Characteristic::predefined` of that type.
#[allow(unused_macros)]
#[macro_export]
macro_rules! required_slot {
    ($ty:ident) => {
        $crate::dm::Slot::new($crate::dm::CharacteristicType::$ty.id(), {
            fn default() -> $crate::dm::Characteristic {
                $crate::dm::Characteristic::predefined($crate::dm::CharacteristicType::$ty)
            }

            default
        })
    };
}

/// The optional schema slots for a list of catalog characteristic types.
#[allow(unused_macros)]
#[macro_export]
macro_rules! optional_slots {
    ($($ty:ident),* $(,)?) => {
        &[$($crate::dm::CharacteristicType::$ty.id(),)*]
    };
}
