//! MAC address type carried on the data-retrieval path.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 48-bit Ethernet MAC address stored in the low bits of a `u64`.
///
/// The hardware data path reports MAC addresses as raw integers; this type
/// wraps that representation while keeping parsing and display in the usual
/// colon-separated form.
///
/// # Examples
///
/// ```
/// use hal_types::MacAddress;
///
/// let mac: MacAddress = "00:11:22:33:44:55".parse().unwrap();
/// assert_eq!(mac.as_u64(), 0x0011_2233_4455);
/// assert_eq!(mac.to_string(), "00:11:22:33:44:55");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MacAddress(u64);

impl MacAddress {
    /// The broadcast MAC address (FF:FF:FF:FF:FF:FF).
    pub const BROADCAST: MacAddress = MacAddress(0xffff_ffff_ffff);

    /// The zero/null MAC address.
    pub const ZERO: MacAddress = MacAddress(0);

    /// Creates a MAC address from a raw integer; the upper 16 bits are masked.
    pub const fn from_u64(raw: u64) -> Self {
        MacAddress(raw & 0xffff_ffff_ffff)
    }

    /// Returns the raw integer value.
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Creates a MAC address from its six octets, most significant first.
    pub const fn from_octets(octets: [u8; 6]) -> Self {
        MacAddress(
            (octets[0] as u64) << 40
                | (octets[1] as u64) << 32
                | (octets[2] as u64) << 24
                | (octets[3] as u64) << 16
                | (octets[4] as u64) << 8
                | octets[5] as u64,
        )
    }

    /// Returns the six octets, most significant first.
    pub const fn octets(&self) -> [u8; 6] {
        [
            (self.0 >> 40) as u8,
            (self.0 >> 32) as u8,
            (self.0 >> 24) as u8,
            (self.0 >> 16) as u8,
            (self.0 >> 8) as u8,
            self.0 as u8,
        ]
    }

    /// Returns true if this is a multicast address.
    pub const fn is_multicast(&self) -> bool {
        (self.0 >> 40) & 0x01 != 0
    }

    /// Returns true if this is the zero address.
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = self.octets();
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            o[0], o[1], o[2], o[3], o[4], o[5]
        )
    }
}

/// Error returned when parsing a malformed MAC address string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid MAC address format: {0}")]
pub struct InvalidMacAddress(pub String);

impl FromStr for MacAddress {
    type Err = InvalidMacAddress;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let separator = if s.contains(':') { ':' } else { '-' };
        let parts: Vec<&str> = s.split(separator).collect();
        if parts.len() != 6 {
            return Err(InvalidMacAddress(s.to_string()));
        }

        let mut octets = [0u8; 6];
        for (i, part) in parts.iter().enumerate() {
            octets[i] =
                u8::from_str_radix(part, 16).map_err(|_| InvalidMacAddress(s.to_string()))?;
        }
        Ok(MacAddress::from_octets(octets))
    }
}
