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

//! The accessory-side data model and TLV8 codec of a HomeKit accessory.
//!
//! This crate assembles the characteristics of an accessory's services from
//! per-service schemas, and encodes/decodes the TLV8 streams exchanged with
//! controllers, including the multi-record streams of the `/pairings` resource.
//!
//! # Examples
//! ```
//! use rs_hap::dm::services::camera::CameraOperatingMode;
//! use rs_hap::dm::{Characteristic, CharacteristicType};
//!
//! // Only night vision is supplied; the required characteristics get their defaults
//! let mode = CameraOperatingMode::new(vec![Characteristic::new(
//!     CharacteristicType::NightVision,
//!     true,
//! )])
//! .unwrap();
//!
//! assert_eq!(mode.service().characteristics().len(), 3);
//! assert_eq!(mode.night_vision().unwrap().value.as_bool(), Some(true));
//! assert_eq!(mode.homekit_camera_active().value.as_bool(), Some(false));
//! ```
//!
//! Start off exploring by going to the [`dm`] and [`tlv8`] modules.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod dm;
pub mod error;
pub mod pairing;
pub mod tlv8;
pub mod utils;
