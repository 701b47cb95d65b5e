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

//! The pairing TLV8 vocabulary and the `/pairings` resource.
//!
//! Only the data exchanged by the resource is handled here: adding, removing and
//! listing the controllers paired with the accessory. Establishing a pairing
//! (SRP setup, verification and the session crypto) is the business of the
//! transport layer.

use alloc::vec::Vec;

use log::{debug, info, warn};
use strum::FromRepr;

use crate::error::{Error, ErrorCode};
use crate::tlv8::{
    decode_typed, encode_item, find, join_records, split_records_with, TLV8Config, TLV8,
};
use crate::tlv8_tags;

/// The tags of the pairing exchanges.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, FromRepr)]
#[repr(u8)]
pub enum PairTag {
    Method = 0x00,
    Identifier = 0x01,
    Salt = 0x02,
    PublicKey = 0x03,
    Proof = 0x04,
    EncryptedData = 0x05,
    State = 0x06,
    Error = 0x07,
    RetryDelay = 0x08,
    Certificate = 0x09,
    Signature = 0x0A,
    Permissions = 0x0B,
    FragmentData = 0x0C,
    FragmentLast = 0x0D,
    Separator = 0xFF,
}

tlv8_tags!(PairTag);

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, FromRepr)]
#[repr(u8)]
pub enum PairStep {
    Request = 1,
    Response = 2,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, FromRepr)]
#[repr(u8)]
pub enum PairingMethod {
    Setup = 0,
    SetupAuth = 1,
    Verify = 2,
    AddPairing = 3,
    RemovePairing = 4,
    ListPairings = 5,
}

/// The error codes reported to the controller in an `Error` item.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, FromRepr)]
#[repr(u8)]
pub enum PairError {
    Unknown = 1,
    Authentication = 2,
    Backoff = 3,
    MaxPeers = 4,
    MaxTries = 5,
    Unavailable = 6,
    Busy = 7,
}

#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, FromRepr)]
#[repr(u8)]
pub enum PairingRole {
    #[default]
    Regular = 0,
    Admin = 1,
}

impl PairingRole {
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// A paired controller.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Pairing {
    pub identifier: Vec<u8>,
    pub public_key: Vec<u8>,
    pub role: PairingRole,
}

impl Pairing {
    pub fn new(identifier: &[u8], public_key: &[u8], role: PairingRole) -> Self {
        Self {
            identifier: identifier.to_vec(),
            public_key: public_key.to_vec(),
            role,
        }
    }

    /// The controller identifier, which is usually a UUID string.
    pub fn identifier_str(&self) -> Result<&str, Error> {
        Ok(core::str::from_utf8(&self.identifier)?)
    }

    pub fn to_tlv8(&self) -> Vec<TLV8> {
        alloc::vec![
            TLV8::new(PairTag::Identifier, &self.identifier),
            TLV8::new(PairTag::PublicKey, &self.public_key),
            TLV8::u8(PairTag::Permissions, self.role as u8),
        ]
    }

    pub fn from_tlv8(items: &[TLV8]) -> Result<Self, Error> {
        let identifier = find(items, PairTag::Identifier).ok_or(ErrorCode::InvalidData)?;
        let public_key = find(items, PairTag::PublicKey).ok_or(ErrorCode::InvalidData)?;

        Ok(Self::new(identifier, public_key, role(items)?))
    }
}

fn role(items: &[TLV8]) -> Result<PairingRole, Error> {
    let role = match find(items, PairTag::Permissions) {
        Some([role]) => PairingRole::from_repr(*role),
        _ => None,
    };

    role.ok_or_else(|| ErrorCode::InvalidData.into())
}

fn state(items: &[TLV8]) -> Result<PairStep, Error> {
    let state = match find(items, PairTag::State) {
        Some([state]) => PairStep::from_repr(*state),
        _ => None,
    };

    state.ok_or_else(|| ErrorCode::InvalidData.into())
}

/// `[State=Response]`
pub fn state_response() -> Vec<u8> {
    encode_item(PairTag::State, &[PairStep::Response as u8])
}

/// `[State=Response, Error=error]`
pub fn error_response(error: PairError) -> Vec<u8> {
    let mut out = state_response();
    out.extend_from_slice(&encode_item(PairTag::Error, &[error as u8]));

    out
}

/// Encode the response of a list-pairings request: the state item, followed by
/// one record per pairing with separator items in between.
pub fn list_pairings(pairings: &[Pairing]) -> Vec<u8> {
    let records = pairings.iter().map(Pairing::to_tlv8).collect::<Vec<_>>();

    let mut out = state_response();
    out.extend_from_slice(&join_records(&records, PairTag::Separator.into()));

    out
}

/// Decode a list-pairings response produced by [`list_pairings`].
pub fn parse_pairings(data: &[u8]) -> Result<Vec<Pairing>, Error> {
    let mut records = split_records_with(&TLV8Config::default(), data, PairTag::Separator.into())?
        .into_iter();

    let Some(mut first) = records.next() else {
        return Err(ErrorCode::InvalidData.into());
    };

    if state(&first)? != PairStep::Response {
        Err(ErrorCode::InvalidData)?;
    }

    first.retain(|item| item.tag != PairTag::State as u8);

    let mut pairings = Vec::new();

    if !first.is_empty() {
        pairings.push(Pairing::from_tlv8(&first)?);
    }

    for record in records {
        pairings.push(Pairing::from_tlv8(&record)?);
    }

    Ok(pairings)
}

/// A request to the `/pairings` resource.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum PairingsRequest {
    Add(Pairing),
    Remove(Vec<u8>),
    List,
}

impl PairingsRequest {
    /// Parse a request body. Any malformed body is reported as
    /// `ErrorCode::InvalidData`.
    pub fn parse(data: &[u8]) -> Result<Self, Error> {
        Self::parse_items(data).map_err(Error::map_malformed)
    }

    fn parse_items(data: &[u8]) -> Result<Self, Error> {
        let items = decode_typed::<PairTag>(&TLV8Config::default(), data, None)?;

        if state(&items)? != PairStep::Request {
            Err(ErrorCode::InvalidData)?;
        }

        let method = match find(&items, PairTag::Method) {
            Some([method]) => PairingMethod::from_repr(*method),
            _ => None,
        };

        match method {
            Some(PairingMethod::AddPairing) => Ok(Self::Add(Pairing::from_tlv8(&items)?)),
            Some(PairingMethod::RemovePairing) => {
                let identifier =
                    find(&items, PairTag::Identifier).ok_or(ErrorCode::InvalidData)?;

                Ok(Self::Remove(identifier.to_vec()))
            }
            Some(PairingMethod::ListPairings) => Ok(Self::List),
            _ => Err(ErrorCode::InvalidData.into()),
        }
    }

    pub fn method(&self) -> PairingMethod {
        match self {
            Self::Add(_) => PairingMethod::AddPairing,
            Self::Remove(_) => PairingMethod::RemovePairing,
            Self::List => PairingMethod::ListPairings,
        }
    }

    /// Encode the request, as a controller would send it.
    pub fn to_tlv8(&self) -> Vec<TLV8> {
        let mut items = alloc::vec![
            TLV8::u8(PairTag::State, PairStep::Request as u8),
            TLV8::u8(PairTag::Method, self.method() as u8),
        ];

        match self {
            Self::Add(pairing) => items.extend(pairing.to_tlv8()),
            Self::Remove(identifier) => items.push(TLV8::new(PairTag::Identifier, identifier)),
            Self::List => (),
        }

        items
    }
}

/// The persisted set of pairings of an accessory.
pub trait PairingStore {
    fn pairings(&self) -> Vec<Pairing>;

    /// Add a pairing, or update the role of an existing one.
    fn add(&mut self, pairing: Pairing) -> Result<(), PairError>;

    /// Remove the pairing with the given identifier. Removing an unknown
    /// identifier is not an error.
    fn remove(&mut self, identifier: &[u8]) -> Result<(), PairError>;
}

impl<T> PairingStore for &mut T
where
    T: PairingStore,
{
    fn pairings(&self) -> Vec<Pairing> {
        (**self).pairings()
    }

    fn add(&mut self, pairing: Pairing) -> Result<(), PairError> {
        (**self).add(pairing)
    }

    fn remove(&mut self, identifier: &[u8]) -> Result<(), PairError> {
        (**self).remove(identifier)
    }
}

impl PairingStore for Vec<Pairing> {
    fn pairings(&self) -> Vec<Pairing> {
        self.clone()
    }

    fn add(&mut self, pairing: Pairing) -> Result<(), PairError> {
        if let Some(existing) = self
            .iter_mut()
            .find(|existing| existing.identifier == pairing.identifier)
        {
            if existing.public_key != pairing.public_key {
                return Err(PairError::Unknown);
            }

            existing.role = pairing.role;
        } else {
            self.push(pairing);
        }

        Ok(())
    }

    fn remove(&mut self, identifier: &[u8]) -> Result<(), PairError> {
        self.retain(|pairing| pairing.identifier != identifier);

        Ok(())
    }
}

/// Handle a request to the `/pairings` resource on behalf of a controller.
///
/// Only admin controllers may manage pairings; any other controller is answered
/// with an authentication error. A body that cannot be parsed yields `Err`, which
/// the transport reports as a bad request.
pub fn handle_pairings<S: PairingStore>(
    mut store: S,
    is_admin: bool,
    body: &[u8],
) -> Result<Vec<u8>, Error> {
    let request = PairingsRequest::parse(body)?;

    if !is_admin {
        warn!("Refusing {:?} from a non-admin controller", request.method());
        return Ok(error_response(PairError::Authentication));
    }

    let result = match request {
        PairingsRequest::Add(pairing) => {
            info!(
                "Adding pairing {:?} ({:?})",
                pairing.identifier_str(),
                pairing.role
            );
            store.add(pairing)
        }
        PairingsRequest::Remove(identifier) => {
            info!("Removing pairing {:?}", core::str::from_utf8(&identifier));
            store.remove(&identifier)
        }
        PairingsRequest::List => {
            let pairings = store.pairings();
            debug!("Listing {} pairings", pairings.len());

            return Ok(list_pairings(&pairings));
        }
    };

    Ok(match result {
        Ok(()) => state_response(),
        Err(error) => {
            warn!("Pairings request failed: {:?}", error);
            error_response(error)
        }
    })
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::*;
    use crate::tlv8::{decode_stream, encode_items};

    fn alice() -> Pairing {
        Pairing::new(b"alice", &[0xA1; 32], PairingRole::Admin)
    }

    fn bob() -> Pairing {
        Pairing::new(b"bob", &[0xB0; 32], PairingRole::Regular)
    }

    #[test]
    fn test_list_pairings_layout() {
        let data = list_pairings(&[alice(), bob()]);

        let items = decode_stream(&data, None).unwrap();
        assert_eq!(items[0], TLV8::u8(PairTag::State, 2));
        assert_eq!(items[1], TLV8::new(PairTag::Identifier, b"alice"));
        assert_eq!(items[4], TLV8::empty(PairTag::Separator));
        assert_eq!(items[5], TLV8::new(PairTag::Identifier, b"bob"));
        assert_eq!(items.len(), 8);

        assert_eq!(parse_pairings(&data).unwrap(), [alice(), bob()]);
    }

    #[test]
    fn test_list_no_pairings() {
        let data = list_pairings(&[]);

        assert_eq!(data, [0x06, 1, 2]);
        assert!(parse_pairings(&data).unwrap().is_empty());
    }

    #[test]
    fn test_parse_pairings_needs_response_state() {
        let data = encode_items(&[TLV8::u8(PairTag::State, 1)]);
        assert_eq!(
            parse_pairings(&data).unwrap_err().code(),
            ErrorCode::InvalidData
        );

        assert_eq!(parse_pairings(&[]).unwrap_err().code(), ErrorCode::InvalidData);
    }

    #[test]
    fn test_parse_requests() {
        for request in [
            PairingsRequest::Add(bob()),
            PairingsRequest::Remove(b"bob".to_vec()),
            PairingsRequest::List,
        ] {
            let data = encode_items(&request.to_tlv8());
            assert_eq!(PairingsRequest::parse(&data).unwrap(), request);
        }
    }

    #[test]
    fn test_parse_malformed_requests() {
        // Truncated
        assert_eq!(
            PairingsRequest::parse(&[0x06, 1, 1, 0x00, 2, 5])
                .unwrap_err()
                .code(),
            ErrorCode::InvalidData
        );

        // No method
        let data = encode_items(&[TLV8::u8(PairTag::State, 1)]);
        assert_eq!(
            PairingsRequest::parse(&data).unwrap_err().code(),
            ErrorCode::InvalidData
        );

        // Add without public key
        let data = encode_items(&[
            TLV8::u8(PairTag::State, 1),
            TLV8::u8(PairTag::Method, 3),
            TLV8::new(PairTag::Identifier, b"bob"),
            TLV8::u8(PairTag::Permissions, 0),
        ]);
        assert_eq!(
            PairingsRequest::parse(&data).unwrap_err().code(),
            ErrorCode::InvalidData
        );

        // Setup is not served by this resource
        let data = encode_items(&[TLV8::u8(PairTag::State, 1), TLV8::u8(PairTag::Method, 0)]);
        assert_eq!(
            PairingsRequest::parse(&data).unwrap_err().code(),
            ErrorCode::InvalidData
        );
    }

    #[test]
    fn test_unknown_tags_pass_through() {
        let mut items = PairingsRequest::List.to_tlv8();
        items.push(TLV8::new(0x42u8, b"future"));

        let data = encode_items(&items);
        assert_eq!(PairingsRequest::parse(&data).unwrap(), PairingsRequest::List);
    }

    #[test]
    fn test_handle_pairings() {
        let mut store = vec![alice()];

        let add = encode_items(&PairingsRequest::Add(bob()).to_tlv8());
        assert_eq!(handle_pairings(&mut store, true, &add).unwrap(), state_response());
        assert_eq!(store, [alice(), bob()]);

        let list = encode_items(&PairingsRequest::List.to_tlv8());
        assert_eq!(
            handle_pairings(&mut store, true, &list).unwrap(),
            list_pairings(&[alice(), bob()])
        );

        let remove = encode_items(&PairingsRequest::Remove(b"alice".to_vec()).to_tlv8());
        assert_eq!(
            handle_pairings(&mut store, true, &remove).unwrap(),
            state_response()
        );
        assert_eq!(store, [bob()]);
    }

    #[test]
    fn test_handle_pairings_non_admin() {
        let mut store: Vec<Pairing> = Vec::new();

        let add = encode_items(&PairingsRequest::Add(bob()).to_tlv8());
        assert_eq!(
            handle_pairings(&mut store, false, &add).unwrap(),
            [0x06, 1, 2, 0x07, 1, 2]
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_handle_pairings_store_error() {
        let mut store = vec![bob()];

        let impostor = Pairing::new(b"bob", &[0xEE; 32], PairingRole::Admin);
        let add = encode_items(&PairingsRequest::Add(impostor).to_tlv8());

        assert_eq!(
            handle_pairings(&mut store, true, &add).unwrap(),
            error_response(PairError::Unknown)
        );
        assert_eq!(store, [bob()]);
    }
}
