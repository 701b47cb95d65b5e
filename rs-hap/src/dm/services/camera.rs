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

//! The camera services: streaming management and operating mode.

use alloc::vec::Vec;

use crate::dm::{
    CharId, Characteristic, CharacteristicType, Schema, Service, ServiceType, Slot,
};
use crate::error::Error;
use crate::{optional_slots, required_slot};

pub const OPERATING_MODE_REQUIRED: &[Slot<Characteristic>] = &[
    required_slot!(EventSnapshotsActive),
    required_slot!(HomekitCameraActive),
];

pub const OPERATING_MODE_OPTIONAL: &[CharId] = optional_slots!(
    ManuallyDisabled,
    NightVision,
    ThirdPartyCameraActive,
    CameraOperatingModeIndicator,
    PeriodicSnapshotsActive,
);

pub const OPERATING_MODE: Schema<'static, Characteristic> =
    Schema::new(OPERATING_MODE_REQUIRED, OPERATING_MODE_OPTIONAL);

pub const STREAM_MANAGEMENT_REQUIRED: &[Slot<Characteristic>] = &[
    required_slot!(SelectedStreamConfiguration),
    required_slot!(SetupEndpoint),
    required_slot!(StreamingStatus),
    required_slot!(SupportedAudioStreamConfiguration),
    required_slot!(SupportedRtpConfiguration),
    required_slot!(SupportedVideoStreamConfiguration),
];

pub const STREAM_MANAGEMENT_OPTIONAL: &[CharId] = optional_slots!(Active);

pub const STREAM_MANAGEMENT: Schema<'static, Characteristic> =
    Schema::new(STREAM_MANAGEMENT_REQUIRED, STREAM_MANAGEMENT_OPTIONAL);

/// The camera operating mode service.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraOperatingMode {
    service: Service,
    event_snapshots_active: usize,
    homekit_camera_active: usize,
}

impl CameraOperatingMode {
    pub fn new(supplied: Vec<Characteristic>) -> Result<Self, Error> {
        let service = Service::new(ServiceType::CameraOperatingMode, &OPERATING_MODE, supplied)?;

        Ok(Self {
            event_snapshots_active: service.position(CharacteristicType::EventSnapshotsActive)?,
            homekit_camera_active: service.position(CharacteristicType::HomekitCameraActive)?,
            service,
        })
    }

    pub fn service(&self) -> &Service {
        &self.service
    }

    pub fn event_snapshots_active(&self) -> &Characteristic {
        self.service.at(self.event_snapshots_active)
    }

    pub fn homekit_camera_active(&self) -> &Characteristic {
        self.service.at(self.homekit_camera_active)
    }

    pub fn manually_disabled(&self) -> Option<&Characteristic> {
        self.service.get(CharacteristicType::ManuallyDisabled)
    }

    pub fn night_vision(&self) -> Option<&Characteristic> {
        self.service.get(CharacteristicType::NightVision)
    }

    pub fn third_party_camera_active(&self) -> Option<&Characteristic> {
        self.service.get(CharacteristicType::ThirdPartyCameraActive)
    }

    pub fn camera_operating_mode_indicator(&self) -> Option<&Characteristic> {
        self.service.get(CharacteristicType::CameraOperatingModeIndicator)
    }

    pub fn periodic_snapshots_active(&self) -> Option<&Characteristic> {
        self.service.get(CharacteristicType::PeriodicSnapshotsActive)
    }
}

impl From<CameraOperatingMode> for Service {
    fn from(value: CameraOperatingMode) -> Self {
        value.service
    }
}

/// The camera RTP stream management service, i.e. the streaming service of
/// an IP camera accessory.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraStreamManagement {
    service: Service,
    selected_stream_configuration: usize,
    setup_endpoint: usize,
    streaming_status: usize,
    supported_audio_stream_configuration: usize,
    supported_rtp_configuration: usize,
    supported_video_stream_configuration: usize,
}

impl CameraStreamManagement {
    pub fn new(supplied: Vec<Characteristic>) -> Result<Self, Error> {
        let service = Service::new(
            ServiceType::CameraStreamManagement,
            &STREAM_MANAGEMENT,
            supplied,
        )?;

        Ok(Self {
            selected_stream_configuration: service
                .position(CharacteristicType::SelectedStreamConfiguration)?,
            setup_endpoint: service.position(CharacteristicType::SetupEndpoint)?,
            streaming_status: service.position(CharacteristicType::StreamingStatus)?,
            supported_audio_stream_configuration: service
                .position(CharacteristicType::SupportedAudioStreamConfiguration)?,
            supported_rtp_configuration: service
                .position(CharacteristicType::SupportedRtpConfiguration)?,
            supported_video_stream_configuration: service
                .position(CharacteristicType::SupportedVideoStreamConfiguration)?,
            service,
        })
    }

    pub fn service(&self) -> &Service {
        &self.service
    }

    pub fn selected_stream_configuration(&self) -> &Characteristic {
        self.service.at(self.selected_stream_configuration)
    }

    pub fn setup_endpoint(&self) -> &Characteristic {
        self.service.at(self.setup_endpoint)
    }

    pub fn streaming_status(&self) -> &Characteristic {
        self.service.at(self.streaming_status)
    }

    pub fn supported_audio_stream_configuration(&self) -> &Characteristic {
        self.service.at(self.supported_audio_stream_configuration)
    }

    pub fn supported_rtp_configuration(&self) -> &Characteristic {
        self.service.at(self.supported_rtp_configuration)
    }

    pub fn supported_video_stream_configuration(&self) -> &Characteristic {
        self.service.at(self.supported_video_stream_configuration)
    }

    pub fn active(&self) -> Option<&Characteristic> {
        self.service.get(CharacteristicType::Active)
    }
}

impl From<CameraStreamManagement> for Service {
    fn from(value: CameraStreamManagement) -> Self {
        value.service
    }
}
