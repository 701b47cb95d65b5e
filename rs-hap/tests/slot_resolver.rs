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

use rs_hap::dm::services::camera::{
    CameraOperatingMode, CameraStreamManagement, OPERATING_MODE, STREAM_MANAGEMENT,
};
use rs_hap::dm::{
    resolve, CharValue, Characteristic, CharacteristicType, Format, Permissions, Schema, Service,
    ServiceType, Slot,
};
use rs_hap::error::ErrorCode;

mod common;

use common::init_env_logger;

fn ids(service: &Service) -> Vec<u16> {
    service.characteristics().iter().map(|c| c.id).collect()
}

#[test]
fn test_operating_mode_defaults() {
    init_env_logger();

    let mode = CameraOperatingMode::new(vec![Characteristic::new(
        CharacteristicType::NightVision,
        true,
    )])
    .unwrap();

    assert_eq!(
        ids(mode.service()),
        [
            CharacteristicType::NightVision.id(),
            CharacteristicType::EventSnapshotsActive.id(),
            CharacteristicType::HomekitCameraActive.id(),
        ]
    );
    assert_eq!(mode.night_vision().unwrap().value, CharValue::Bool(true));
    assert_eq!(
        *mode.event_snapshots_active(),
        Characteristic::predefined(CharacteristicType::EventSnapshotsActive)
    );
    assert!(mode.manually_disabled().is_none());
    assert_eq!(mode.service().service_type(), ServiceType::CameraOperatingMode);
}

#[test]
fn test_supplied_required_is_kept() {
    init_env_logger();

    let supplied = Characteristic::new(CharacteristicType::HomekitCameraActive, true)
        .with_permissions(Permissions::R)
        .with_description(Some("Camera On"));

    let mode = CameraOperatingMode::new(vec![supplied.clone()]).unwrap();

    assert_eq!(*mode.homekit_camera_active(), supplied);
    assert_eq!(
        ids(mode.service()),
        [
            CharacteristicType::HomekitCameraActive.id(),
            CharacteristicType::EventSnapshotsActive.id(),
        ]
    );
}

#[test]
fn test_unknown_entries_pass_through() {
    init_env_logger();

    let vendor = Characteristic::custom(0xF00D, 1_u8, Format::UInt8, Permissions::RW);

    let streaming = CameraStreamManagement::new(vec![
        vendor.clone(),
        Characteristic::new(CharacteristicType::Active, 1_u8),
    ])
    .unwrap();

    let service = Service::from(streaming.clone());
    assert_eq!(service.characteristics().len(), 8);
    assert_eq!(service.characteristics().as_slice()[0], vendor);
    assert_eq!(service.get_custom(0xF00D), Some(&vendor));
    assert_eq!(streaming.active().unwrap().value.as_u8(), Some(1));
    assert_eq!(
        streaming.setup_endpoint().id,
        CharacteristicType::SetupEndpoint.id()
    );
    assert_eq!(
        ids(&service)[2..],
        STREAM_MANAGEMENT
            .required
            .iter()
            .map(|slot| slot.id)
            .collect::<Vec<_>>()[..]
    );
}

#[test]
fn test_duplicate_slots() {
    init_env_logger();

    let err = CameraOperatingMode::new(vec![
        Characteristic::new(CharacteristicType::NightVision, true),
        Characteristic::new(CharacteristicType::NightVision, false),
    ])
    .unwrap_err();
    assert_eq!(err.code(), ErrorCode::DuplicateSlot(0x011B));

    let err = CameraStreamManagement::new(vec![
        Characteristic::predefined(CharacteristicType::StreamingStatus),
        Characteristic::predefined(CharacteristicType::StreamingStatus),
    ])
    .unwrap_err();
    assert_eq!(err.code(), ErrorCode::DuplicateSlot(0x0120));
}

#[test]
fn test_resolve_is_idempotent() {
    init_env_logger();

    let first = resolve(
        &OPERATING_MODE,
        vec![Characteristic::new(CharacteristicType::ManuallyDisabled, true)],
    )
    .unwrap();

    let second = resolve(&OPERATING_MODE, first.clone().into_vec()).unwrap();

    assert_eq!(first, second);
}

fn wrong_default() -> Characteristic {
    Characteristic::predefined(CharacteristicType::NightVision)
}

#[test]
fn test_inconsistent_schemas() {
    init_env_logger();

    let optional = [CharacteristicType::EventSnapshotsActive.id()];
    let overlapping = Schema::new(OPERATING_MODE.required, &optional);
    assert_eq!(
        resolve(&overlapping, vec![]).unwrap_err().code(),
        ErrorCode::InvalidSchema
    );

    let slots = [Slot::new(CharacteristicType::Active.id(), wrong_default)];
    let mismatched = Schema::new(&slots, &[]);
    assert_eq!(
        resolve(&mismatched, vec![]).unwrap_err().code(),
        ErrorCode::InvalidSchema
    );
}
