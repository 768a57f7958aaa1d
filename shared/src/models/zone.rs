//! Zone catalog model
//!
//! Zones are the pricing unit of the rate matrix: a short region-prefixed
//! code (`N1`..`N6`, `S1`..`S6`, `E1`..`E4`, `W1`..`W4`, `NE1`..`NE4`,
//! `C1`..`C4`), at most [`MAX_ZONES`] in total. The catalog is fixed data,
//! not user input.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of selectable zones (6 + 6 + 4 + 4 + 4 + 4)
pub const MAX_ZONES: usize = 28;

/// Region enum
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Region {
    North,
    South,
    East,
    West,
    NorthEast,
    Central,
}

impl Region {
    /// All regions, in catalog display order
    pub const ALL: [Region; 6] = [
        Region::North,
        Region::South,
        Region::East,
        Region::West,
        Region::NorthEast,
        Region::Central,
    ];

    /// Zone code prefix for this region
    pub fn prefix(&self) -> &'static str {
        match self {
            Region::North => "N",
            Region::South => "S",
            Region::East => "E",
            Region::West => "W",
            Region::NorthEast => "NE",
            Region::Central => "C",
        }
    }

    /// Number of zones available in this region
    pub fn zone_count(&self) -> u8 {
        match self {
            Region::North | Region::South => 6,
            Region::East | Region::West | Region::NorthEast | Region::Central => 4,
        }
    }

    /// Human-readable region name
    pub fn display_name(&self) -> &'static str {
        match self {
            Region::North => "North",
            Region::South => "South",
            Region::East => "East",
            Region::West => "West",
            Region::NorthEast => "North East",
            Region::Central => "Central",
        }
    }

    /// All valid zone codes of this region, in index order
    pub fn codes(&self) -> Vec<ZoneCode> {
        (1..=self.zone_count())
            .map(|index| ZoneCode {
                region: *self,
                index,
            })
            .collect()
    }

    fn from_prefix(prefix: &str) -> Option<Region> {
        Region::ALL.iter().copied().find(|r| r.prefix() == prefix)
    }
}

/// Zone code parse/validation errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ZoneCodeError {
    #[error("malformed zone code {0:?}")]
    Malformed(String),

    #[error("unknown region prefix in zone code {0:?}")]
    UnknownRegion(String),

    #[error("zone index {index} out of range for region {region} (1..={max})")]
    IndexOutOfRange { region: String, index: u8, max: u8 },
}

/// Validated zone code (region prefix + 1-based index)
///
/// Construction always goes through [`ZoneCode::new`] or string parsing,
/// so any `ZoneCode` in circulation names a real catalog zone.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct ZoneCode {
    region: Region,
    index: u8,
}

impl ZoneCode {
    /// Create a zone code, checking the index against the region's range
    pub fn new(region: Region, index: u8) -> Result<Self, ZoneCodeError> {
        let max = region.zone_count();
        if index == 0 || index > max {
            return Err(ZoneCodeError::IndexOutOfRange {
                region: region.display_name().to_string(),
                index,
                max,
            });
        }
        Ok(Self { region, index })
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn index(&self) -> u8 {
        self.index
    }
}

impl std::fmt::Display for ZoneCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.region.prefix(), self.index)
    }
}

impl std::str::FromStr for ZoneCode {
    type Err = ZoneCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let split = s.find(|c: char| c.is_ascii_digit());
        let Some(split) = split else {
            return Err(ZoneCodeError::Malformed(s.to_string()));
        };
        let (prefix, digits) = s.split_at(split);
        let region =
            Region::from_prefix(prefix).ok_or_else(|| ZoneCodeError::UnknownRegion(s.to_string()))?;
        let index: u8 = digits
            .parse()
            .map_err(|_| ZoneCodeError::Malformed(s.to_string()))?;
        ZoneCode::new(region, index)
    }
}

impl TryFrom<String> for ZoneCode {
    type Error = ZoneCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ZoneCode> for String {
    fn from(code: ZoneCode) -> String {
        code.to_string()
    }
}

/// The full catalog: every valid code of every region, in catalog order
pub fn all_zone_codes() -> Vec<ZoneCode> {
    Region::ALL.iter().flat_map(|r| r.codes()).collect()
}

/// Geographic sub-unit assigned to a zone
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GeoUnit {
    /// A whole state
    State { state: String },
    /// A single city, qualified by its state
    City { state: String, city: String },
}

/// Zone entity: a catalog code plus the geography a user assigned to it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Zone {
    pub code: ZoneCode,
    pub region: Region,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Assigned states / cities; empty until the user configures the zone
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub geography: Vec<GeoUnit>,
    /// Whether the user marked geography assignment as finished
    #[serde(default)]
    pub is_complete: bool,
}

impl Zone {
    /// A bare zone with no geography assigned yet
    pub fn new(code: ZoneCode) -> Self {
        Self {
            code,
            region: code.region(),
            display_name: None,
            geography: Vec::new(),
            is_complete: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_28_codes() {
        let codes = all_zone_codes();
        assert_eq!(codes.len(), MAX_ZONES);
        // No duplicates
        let mut unique = codes.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), MAX_ZONES);
    }

    #[test]
    fn test_region_capacities() {
        assert_eq!(Region::North.zone_count(), 6);
        assert_eq!(Region::South.zone_count(), 6);
        assert_eq!(Region::East.zone_count(), 4);
        assert_eq!(Region::West.zone_count(), 4);
        assert_eq!(Region::NorthEast.zone_count(), 4);
        assert_eq!(Region::Central.zone_count(), 4);
    }

    #[test]
    fn test_parse_valid_codes() {
        let n1: ZoneCode = "N1".parse().unwrap();
        assert_eq!(n1.region(), Region::North);
        assert_eq!(n1.index(), 1);

        // NE must not be swallowed by the N prefix
        let ne3: ZoneCode = "NE3".parse().unwrap();
        assert_eq!(ne3.region(), Region::NorthEast);
        assert_eq!(ne3.index(), 3);

        assert_eq!(n1.to_string(), "N1");
        assert_eq!(ne3.to_string(), "NE3");
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert!(matches!(
            "N7".parse::<ZoneCode>(),
            Err(ZoneCodeError::IndexOutOfRange { .. })
        ));
        assert!(matches!(
            "E5".parse::<ZoneCode>(),
            Err(ZoneCodeError::IndexOutOfRange { .. })
        ));
        assert!(matches!(
            "NE5".parse::<ZoneCode>(),
            Err(ZoneCodeError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            "X1".parse::<ZoneCode>(),
            Err(ZoneCodeError::UnknownRegion(_))
        ));
        assert!(matches!(
            "N".parse::<ZoneCode>(),
            Err(ZoneCodeError::Malformed(_))
        ));
        assert!(matches!(
            "".parse::<ZoneCode>(),
            Err(ZoneCodeError::Malformed(_))
        ));
        assert!(matches!(
            "N0".parse::<ZoneCode>(),
            Err(ZoneCodeError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_serde_round_trip_as_string() {
        let code: ZoneCode = "NE2".parse().unwrap();
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "\"NE2\"");
        let back: ZoneCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, code);
    }
}
