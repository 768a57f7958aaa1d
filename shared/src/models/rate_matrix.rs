//! Rate matrix model
//!
//! Directed zone-to-zone prices over the active zone selection, including
//! self-pairs (intra-zone pricing). The matrix is sparse-by-absence: an
//! unset price is a first-class state distinct from an explicit zero, and
//! blocks submission until the user fills it in. Collapsing it to zero
//! would silently under-price a route.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::zone::ZoneCode;

/// Upper bound for a single zone-to-zone rate
pub const MAX_RATE_UNITS: i64 = 1_000_000;

/// Maximum fractional digits accepted on input (normalization rounds to 2)
pub const MAX_RATE_SCALE: u32 = 3;

/// A single matrix cell: not yet priced, or priced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<Decimal>", into = "Option<Decimal>")]
pub enum PriceEntry {
    /// Not yet configured. Invalid for submission.
    #[default]
    Unset,
    /// Explicit price, zero included
    Priced(Decimal),
}

impl PriceEntry {
    pub fn price(&self) -> Option<Decimal> {
        match self {
            PriceEntry::Unset => None,
            PriceEntry::Priced(value) => Some(*value),
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, PriceEntry::Priced(_))
    }
}

impl From<Option<Decimal>> for PriceEntry {
    fn from(value: Option<Decimal>) -> Self {
        match value {
            Some(value) => PriceEntry::Priced(value),
            None => PriceEntry::Unset,
        }
    }
}

impl From<PriceEntry> for Option<Decimal> {
    fn from(entry: PriceEntry) -> Self {
        entry.price()
    }
}

/// Rate input errors (surfaced per field, non-fatal)
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RateInputError {
    #[error("zone {0} is not part of the active selection")]
    ZoneOutOfScope(ZoneCode),

    #[error("rate for {from}->{to} must not be negative (got {value})")]
    NegativeRate {
        from: ZoneCode,
        to: ZoneCode,
        value: Decimal,
    },

    #[error("rate for {from}->{to} has more than {MAX_RATE_SCALE} decimal places ({value})")]
    TooPrecise {
        from: ZoneCode,
        to: ZoneCode,
        value: Decimal,
    },

    #[error("rate for {from}->{to} exceeds the maximum of {MAX_RATE_UNITS} ({value})")]
    TooLarge {
        from: ZoneCode,
        to: ZoneCode,
        value: Decimal,
    },
}

/// Directed price matrix keyed by validated zone codes
///
/// Serializes as the two-level mapping fromZone -> toZone -> price, with
/// `null` for unset cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateMatrix {
    cells: BTreeMap<ZoneCode, BTreeMap<ZoneCode, PriceEntry>>,
}

impl RateMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-shape the matrix over the given active zone set.
    ///
    /// Creates one unset entry per (from, to) pair not already present,
    /// keeps already-entered prices for pairs still in scope, and discards
    /// entries whose zone no longer belongs to the active set.
    pub fn initialize(&mut self, zones: &[ZoneCode]) {
        let scope: BTreeSet<ZoneCode> = zones.iter().copied().collect();

        self.cells.retain(|from, _| scope.contains(from));
        for row in self.cells.values_mut() {
            row.retain(|to, _| scope.contains(to));
        }

        for &from in &scope {
            let row = self.cells.entry(from).or_default();
            for &to in &scope {
                row.entry(to).or_insert(PriceEntry::Unset);
            }
        }
    }

    /// Set or clear one entry's price.
    ///
    /// Fails if `from` or `to` is outside the active set, or if `value` is
    /// negative, too precise, or too large. On failure the stored entry is
    /// left untouched.
    pub fn set_price(
        &mut self,
        from: ZoneCode,
        to: ZoneCode,
        value: Option<Decimal>,
    ) -> Result<(), RateInputError> {
        if !self.cells.contains_key(&from) {
            return Err(RateInputError::ZoneOutOfScope(from));
        }
        // Column scope equals row scope after initialize()
        if !self.cells.contains_key(&to) {
            return Err(RateInputError::ZoneOutOfScope(to));
        }
        if let Some(value) = value {
            if value.is_sign_negative() && !value.is_zero() {
                return Err(RateInputError::NegativeRate { from, to, value });
            }
            if value.scale() > MAX_RATE_SCALE {
                return Err(RateInputError::TooPrecise { from, to, value });
            }
            if value > Decimal::from(MAX_RATE_UNITS) {
                return Err(RateInputError::TooLarge { from, to, value });
            }
        }
        self.cells
            .get_mut(&from)
            .expect("row checked above")
            .insert(to, value.into());
        Ok(())
    }

    /// Current entry for a pair, or `None` if the pair is out of scope
    pub fn get(&self, from: ZoneCode, to: ZoneCode) -> Option<PriceEntry> {
        self.cells.get(&from).and_then(|row| row.get(&to)).copied()
    }

    /// Zones the matrix is currently shaped over (row keys)
    pub fn zones(&self) -> impl Iterator<Item = ZoneCode> + '_ {
        self.cells.keys().copied()
    }

    /// All (from, to, entry) triples
    pub fn iter(&self) -> impl Iterator<Item = (ZoneCode, ZoneCode, PriceEntry)> + '_ {
        self.cells
            .iter()
            .flat_map(|(from, row)| row.iter().map(move |(to, entry)| (*from, *to, *entry)))
    }

    /// Number of (from, to) pairs currently held
    pub fn pair_count(&self) -> usize {
        self.cells.values().map(|row| row.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Two-level view of the raw cells
    pub fn rows(&self) -> &BTreeMap<ZoneCode, BTreeMap<ZoneCode, PriceEntry>> {
        &self.cells
    }

    /// Apply a function to every priced cell, returning a new matrix of
    /// the same shape. Unset cells stay unset.
    pub fn map_prices(&self, f: impl Fn(Decimal) -> Decimal) -> RateMatrix {
        let cells = self
            .cells
            .iter()
            .map(|(from, row)| {
                let row = row
                    .iter()
                    .map(|(to, entry)| {
                        let entry = match entry {
                            PriceEntry::Unset => PriceEntry::Unset,
                            PriceEntry::Priced(value) => PriceEntry::Priced(f(*value)),
                        };
                        (*to, entry)
                    })
                    .collect();
                (*from, row)
            })
            .collect();
        RateMatrix { cells }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> ZoneCode {
        s.parse().unwrap()
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_initialize_full_cross_product() {
        let zones = [code("N1"), code("S1"), code("E2")];
        let mut matrix = RateMatrix::new();
        matrix.initialize(&zones);

        assert_eq!(matrix.pair_count(), 9);
        for &from in &zones {
            for &to in &zones {
                assert_eq!(matrix.get(from, to), Some(PriceEntry::Unset));
            }
        }
    }

    #[test]
    fn test_initialize_preserves_in_scope_and_drops_out_of_scope() {
        let mut matrix = RateMatrix::new();
        matrix.initialize(&[code("N1"), code("S1")]);
        matrix
            .set_price(code("N1"), code("S1"), Some(dec("125.5")))
            .unwrap();

        // S1 replaced by E1: the N1->S1 price must vanish, N1->N1 survives
        matrix
            .set_price(code("N1"), code("N1"), Some(dec("10")))
            .unwrap();
        matrix.initialize(&[code("N1"), code("E1")]);

        assert_eq!(matrix.pair_count(), 4);
        assert_eq!(
            matrix.get(code("N1"), code("N1")),
            Some(PriceEntry::Priced(dec("10")))
        );
        assert_eq!(matrix.get(code("N1"), code("S1")), None);
        assert_eq!(matrix.get(code("N1"), code("E1")), Some(PriceEntry::Unset));
    }

    #[test]
    fn test_set_price_rejects_out_of_scope_zone() {
        let mut matrix = RateMatrix::new();
        matrix.initialize(&[code("N1")]);

        let err = matrix
            .set_price(code("N1"), code("S1"), Some(dec("5")))
            .unwrap_err();
        assert_eq!(err, RateInputError::ZoneOutOfScope(code("S1")));
    }

    #[test]
    fn test_set_price_rejects_negative_and_keeps_previous_value() {
        let mut matrix = RateMatrix::new();
        matrix.initialize(&[code("N1"), code("S1")]);
        matrix
            .set_price(code("N1"), code("S1"), Some(dec("99")))
            .unwrap();

        let err = matrix
            .set_price(code("N1"), code("S1"), Some(dec("-5")))
            .unwrap_err();
        assert!(matches!(err, RateInputError::NegativeRate { .. }));
        assert_eq!(
            matrix.get(code("N1"), code("S1")),
            Some(PriceEntry::Priced(dec("99")))
        );
    }

    #[test]
    fn test_set_price_rejects_excess_precision_and_magnitude() {
        let mut matrix = RateMatrix::new();
        matrix.initialize(&[code("N1")]);

        assert!(matches!(
            matrix.set_price(code("N1"), code("N1"), Some(dec("1.0005"))),
            Err(RateInputError::TooPrecise { .. })
        ));
        assert!(matches!(
            matrix.set_price(code("N1"), code("N1"), Some(dec("1000001"))),
            Err(RateInputError::TooLarge { .. })
        ));
        // Three decimals are allowed on input; normalization rounds later
        assert!(
            matrix
                .set_price(code("N1"), code("N1"), Some(dec("130.753")))
                .is_ok()
        );
    }

    #[test]
    fn test_clearing_a_price_returns_to_unset() {
        let mut matrix = RateMatrix::new();
        matrix.initialize(&[code("N1")]);
        matrix
            .set_price(code("N1"), code("N1"), Some(dec("45")))
            .unwrap();
        matrix.set_price(code("N1"), code("N1"), None).unwrap();
        assert_eq!(matrix.get(code("N1"), code("N1")), Some(PriceEntry::Unset));
    }

    #[test]
    fn test_zero_is_an_explicit_price_not_unset() {
        let mut matrix = RateMatrix::new();
        matrix.initialize(&[code("N1")]);
        matrix
            .set_price(code("N1"), code("N1"), Some(Decimal::ZERO))
            .unwrap();
        assert_eq!(
            matrix.get(code("N1"), code("N1")),
            Some(PriceEntry::Priced(Decimal::ZERO))
        );
    }

    #[test]
    fn test_serializes_as_two_level_mapping() {
        let mut matrix = RateMatrix::new();
        matrix.initialize(&[code("N1"), code("S1")]);
        matrix
            .set_price(code("N1"), code("S1"), Some(dec("125.5")))
            .unwrap();

        let json = serde_json::to_value(&matrix).unwrap();
        assert_eq!(json["N1"]["S1"], serde_json::json!(125.5));
        assert!(json["N1"]["N1"].is_null());

        let back: RateMatrix = serde_json::from_value(json).unwrap();
        assert_eq!(back, matrix);
    }
}
