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

use bitflags::bitflags;

bitflags! {
    /// The operations a controller may perform on a characteristic.
    #[repr(transparent)]
    #[derive(Default, Debug, Copy, Clone, Eq, PartialEq, Hash)]
    pub struct Permissions: u8 {
        const READ = 0x01;      // Short: pr
        const WRITE = 0x02;     // Short: pw
        const EVENTS = 0x04;    // Short: ev

        const R = Self::READ.bits();
        const RW = Self::READ.bits() | Self::WRITE.bits();
        const RE = Self::READ.bits() | Self::EVENTS.bits();
        const RWE = Self::READ.bits() | Self::WRITE.bits() | Self::EVENTS.bits();
    }
}

impl Permissions {
    pub fn is_readable(&self) -> bool {
        self.contains(Self::READ)
    }

    pub fn is_writable(&self) -> bool {
        self.contains(Self::WRITE)
    }

    pub fn supports_events(&self) -> bool {
        self.contains(Self::EVENTS)
    }
}

#[cfg(test)]
mod tests {
    use super::Permissions;

    #[test]
    fn test_queries() {
        assert!(Permissions::R.is_readable());
        assert!(!Permissions::R.is_writable());
        assert!(Permissions::RE.supports_events());
        assert!(!Permissions::RW.supports_events());
    }
}
