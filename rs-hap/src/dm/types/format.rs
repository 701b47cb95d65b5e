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

/// The value format of a characteristic.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Format {
    Bool,
    UInt8,
    /// An opaque TLV8 stream, decoded by application-specific configuration handlers
    Tlv8,
}

/// Value constraints of a numeric characteristic.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Constraints {
    pub max_value: Option<f64>,
    pub min_value: Option<f64>,
    pub min_step: Option<f64>,
}

impl Constraints {
    pub const NONE: Self = Self {
        max_value: None,
        min_value: None,
        min_step: None,
    };

    pub const fn range(min_value: f64, max_value: f64, min_step: f64) -> Self {
        Self {
            max_value: Some(max_value),
            min_value: Some(min_value),
            min_step: Some(min_step),
        }
    }
}
