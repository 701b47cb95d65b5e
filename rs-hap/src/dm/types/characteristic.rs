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

use crate::error::{Error, ErrorCode};
use crate::tlv8::{self, TLV8};

use super::{CharId, Constraints, Format, Permissions};
use crate::dm::Typed;

/// The characteristic types of the catalog known to this crate.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, FromRepr)]
#[repr(u16)]
pub enum CharacteristicType {
    Active = 0x00B0,
    NightVision = 0x011B,
    SupportedVideoStreamConfiguration = 0x0114,
    SupportedAudioStreamConfiguration = 0x0115,
    SupportedRtpConfiguration = 0x0116,
    SelectedStreamConfiguration = 0x0117,
    SetupEndpoint = 0x0118,
    StreamingStatus = 0x0120,
    SelectedCameraRecordingConfiguration = 0x0209,
    HomekitCameraActive = 0x021B,
    ThirdPartyCameraActive = 0x021C,
    CameraOperatingModeIndicator = 0x021D,
    EventSnapshotsActive = 0x0223,
    PeriodicSnapshotsActive = 0x0225,
    ManuallyDisabled = 0x0227,
}

impl CharacteristicType {
    pub const fn id(&self) -> CharId {
        *self as CharId
    }

    pub const fn format(&self) -> Format {
        match self {
            Self::Active => Format::UInt8,
            Self::NightVision
            | Self::HomekitCameraActive
            | Self::ThirdPartyCameraActive
            | Self::CameraOperatingModeIndicator
            | Self::EventSnapshotsActive
            | Self::PeriodicSnapshotsActive
            | Self::ManuallyDisabled => Format::Bool,
            Self::SupportedVideoStreamConfiguration
            | Self::SupportedAudioStreamConfiguration
            | Self::SupportedRtpConfiguration
            | Self::SelectedStreamConfiguration
            | Self::SetupEndpoint
            | Self::StreamingStatus
            | Self::SelectedCameraRecordingConfiguration => Format::Tlv8,
        }
    }

    pub const fn permissions(&self) -> Permissions {
        match self {
            Self::Active
            | Self::NightVision
            | Self::HomekitCameraActive
            | Self::CameraOperatingModeIndicator
            | Self::EventSnapshotsActive
            | Self::PeriodicSnapshotsActive
            | Self::ManuallyDisabled
            | Self::SelectedCameraRecordingConfiguration => Permissions::RWE,
            Self::SelectedStreamConfiguration | Self::SetupEndpoint => Permissions::RW,
            Self::StreamingStatus | Self::ThirdPartyCameraActive => Permissions::RE,
            Self::SupportedVideoStreamConfiguration
            | Self::SupportedAudioStreamConfiguration
            | Self::SupportedRtpConfiguration => Permissions::R,
        }
    }

    pub const fn description(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::NightVision => "Night Vision",
            Self::SupportedVideoStreamConfiguration => "Supported Video Stream Configuration",
            Self::SupportedAudioStreamConfiguration => "Supported Audio Stream Configuration",
            Self::SupportedRtpConfiguration => "Supported RTP Configuration",
            Self::SelectedStreamConfiguration => "Selected Stream Configuration",
            Self::SetupEndpoint => "Setup Endpoint",
            Self::StreamingStatus => "Streaming Status",
            Self::SelectedCameraRecordingConfiguration => "Selected Camera Recording Configuration",
            Self::HomekitCameraActive => "HomeKit Camera Active",
            Self::ThirdPartyCameraActive => "Third Party Camera Active",
            Self::CameraOperatingModeIndicator => "Camera Operating Mode Indicator",
            Self::EventSnapshotsActive => "Event Snapshots Active",
            Self::PeriodicSnapshotsActive => "Periodic Snapshots Active",
            Self::ManuallyDisabled => "Manually Disabled",
        }
    }

    pub const fn constraints(&self) -> Constraints {
        match self {
            // Inactive = 0, Active = 1
            Self::Active => Constraints::range(0.0, 1.0, 1.0),
            _ => Constraints::NONE,
        }
    }

    /// The value a characteristic of this type holds when the accessory
    /// builder does not provide one.
    pub fn default_value(&self) -> CharValue {
        match self.format() {
            Format::Bool => CharValue::Bool(false),
            Format::UInt8 => CharValue::U8(0),
            Format::Tlv8 => CharValue::Data(Vec::new()),
        }
    }
}

impl TryFrom<CharId> for CharacteristicType {
    type Error = Error;

    fn try_from(id: CharId) -> Result<Self, Self::Error> {
        Self::from_repr(id).ok_or_else(|| ErrorCode::NotFound.into())
    }
}

/// The value of a characteristic.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum CharValue {
    Bool(bool),
    U8(u8),
    /// Opaque bytes; for `Format::Tlv8` characteristics these form a TLV8 stream
    Data(Vec<u8>),
}

impl CharValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_u8(&self) -> Option<u8> {
        match self {
            Self::U8(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_data(&self) -> Option<&[u8]> {
        match self {
            Self::Data(value) => Some(value),
            _ => None,
        }
    }
}

impl From<bool> for CharValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<u8> for CharValue {
    fn from(value: u8) -> Self {
        Self::U8(value)
    }
}

impl From<Vec<u8>> for CharValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Data(value)
    }
}

impl From<&[u8]> for CharValue {
    fn from(value: &[u8]) -> Self {
        Self::Data(value.to_vec())
    }
}

/// A characteristic: a typed state variable of a service.
#[derive(Debug, Clone, PartialEq)]
pub struct Characteristic {
    pub id: CharId,
    pub value: CharValue,
    pub permissions: Permissions,
    pub description: Option<&'static str>,
    pub format: Format,
    pub constraints: Constraints,
}

impl Characteristic {
    /// Create a characteristic of a catalog type, holding the type's default value.
    ///
    /// This is a pure function of `ty` and serves as the default generator
    /// of required schema slots.
    pub fn predefined(ty: CharacteristicType) -> Self {
        Self {
            id: ty.id(),
            value: ty.default_value(),
            permissions: ty.permissions(),
            description: Some(ty.description()),
            format: ty.format(),
            constraints: ty.constraints(),
        }
    }

    /// Create a characteristic of a catalog type with the provided value.
    pub fn new<V: Into<CharValue>>(ty: CharacteristicType, value: V) -> Self {
        Self {
            value: value.into(),
            ..Self::predefined(ty)
        }
    }

    /// Create a characteristic whose type-code is outside of the catalog
    /// (e.g. a vendor-specific one).
    pub fn custom<V: Into<CharValue>>(
        id: CharId,
        value: V,
        format: Format,
        permissions: Permissions,
    ) -> Self {
        Self {
            id,
            value: value.into(),
            permissions,
            description: None,
            format,
            constraints: Constraints::NONE,
        }
    }

    pub fn with_permissions(self, permissions: Permissions) -> Self {
        Self {
            permissions,
            ..self
        }
    }

    pub fn with_description(self, description: Option<&'static str>) -> Self {
        Self {
            description,
            ..self
        }
    }

    /// The catalog type of this characteristic, if it is a catalog one.
    pub fn ty(&self) -> Option<CharacteristicType> {
        CharacteristicType::from_repr(self.id)
    }

    /// Decode the value of a `Format::Tlv8` characteristic into its items.
    ///
    /// The meaning of the items is up to the configuration handler of the
    /// concrete characteristic; no separator tag is assumed.
    pub fn tlv8_items(&self) -> Result<Vec<TLV8>, Error> {
        match (&self.format, &self.value) {
            (Format::Tlv8, CharValue::Data(data)) => tlv8::decode_stream(data, None),
            _ => Err(ErrorCode::InvalidData.into()),
        }
    }
}

impl Typed for Characteristic {
    fn type_id(&self) -> CharId {
        self.id
    }
}
