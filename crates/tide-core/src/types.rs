//! Core ledger types: holder identities, amounts, rates, and timestamps.
//!
//! Amounts and rates are `u128` to match the magnitude of 18-decimal tokens.
//! Timestamps are seconds on a monotonic clock.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::constants::HOLDER_ID_LEN;
use crate::error::HolderIdParseError;

/// Token amount in base units.
pub type Amount = u128;

/// Per-second interest rate scaled by [`PRECISION_FACTOR`](crate::constants::PRECISION_FACTOR).
pub type Rate = u128;

/// Seconds on the ledger clock.
pub type Timestamp = u64;

/// A 20-byte account identity that can own ledger balance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct HolderId(pub [u8; HOLDER_ID_LEN]);

impl HolderId {
    /// The all-zero identity.
    pub const ZERO: Self = Self([0u8; HOLDER_ID_LEN]);

    /// Create a HolderId from a byte array.
    pub fn from_bytes(bytes: [u8; HOLDER_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Return the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; HOLDER_ID_LEN] {
        &self.0
    }
}

impl fmt::Display for HolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for HolderId {
    type Err = HolderIdParseError;

    /// Parse `0x`-prefixed (or bare) hex.
    ///
    /// # Examples
    ///
    /// ```
    /// use tide_core::types::HolderId;
    /// let id: HolderId = "0x0101010101010101010101010101010101010101".parse().unwrap();
    /// assert_eq!(id, HolderId([1; 20]));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(body).map_err(|e| HolderIdParseError::InvalidHex(e.to_string()))?;
        let arr: [u8; HOLDER_ID_LEN] =
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| HolderIdParseError::InvalidLength {
                    expected: HOLDER_ID_LEN,
                    got: bytes.len(),
                })?;
        Ok(Self(arr))
    }
}

impl From<[u8; HOLDER_ID_LEN]> for HolderId {
    fn from(bytes: [u8; HOLDER_ID_LEN]) -> Self {
        Self(bytes)
    }
}

impl Serialize for HolderId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HolderId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Amount argument for burns and transfers.
///
/// `All` means "the holder's full display balance", resolved after settlement
/// so no accrued dust is left behind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferAmount {
    Exact(Amount),
    All,
}

impl TransferAmount {
    /// Resolve against the holder's fully accrued balance.
    pub fn resolve(self, available: Amount) -> Amount {
        match self {
            Self::Exact(amount) => amount,
            Self::All => available,
        }
    }
}

impl From<Amount> for TransferAmount {
    /// `Amount::MAX` is the "everything" sentinel.
    fn from(amount: Amount) -> Self {
        if amount == Amount::MAX {
            Self::All
        } else {
            Self::Exact(amount)
        }
    }
}

impl FromStr for TransferAmount {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse::<Amount>().map(Self::from)
    }
}

impl fmt::Display for TransferAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(amount) => write!(f, "{amount}"),
            Self::All => f.write_str("all"),
        }
    }
}

/// Lifecycle of a holder with respect to rate freezing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HolderState {
    /// No rate frozen yet; raw balance is zero.
    Unseeded,
    /// Rate frozen. Stays active even after the balance returns to zero.
    Active,
}
