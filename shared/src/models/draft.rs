//! Draft model
//!
//! Transient onboarding state for one account: vendor details, the zone
//! selection (with per-zone geography), and the rate matrix. Partial
//! updates merge into the existing draft rather than replacing it
//! wholesale; successful submission clears the draft.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::rate_matrix::RateMatrix;
use super::vendor::VendorDetails;
use super::zone::{Zone, ZoneCode};

/// One account's in-progress vendor draft
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorDraft {
    #[serde(default)]
    pub details: VendorDetails,
    /// Active zone codes, in selection order
    #[serde(default)]
    pub selected_zones: Vec<ZoneCode>,
    /// Geography assignment for selected zones
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub zones: Vec<Zone>,
    #[serde(default)]
    pub rates: RateMatrix,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Partial draft update: only the provided sections are replaced
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<VendorDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_zones: Option<Vec<ZoneCode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zones: Option<Vec<Zone>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rates: Option<RateMatrix>,
}

impl DraftPatch {
    pub fn is_empty(&self) -> bool {
        self.details.is_none()
            && self.selected_zones.is_none()
            && self.zones.is_none()
            && self.rates.is_none()
    }
}

impl VendorDraft {
    /// Merge a partial update into this draft.
    ///
    /// After the merge the matrix is re-initialized over the (possibly
    /// changed) selection, so out-of-scope rate entries are dropped and
    /// missing pairs appear as unset. Zone geography entries for
    /// deselected zones are discarded. Selection codes are deduplicated
    /// preserving order; since zone codes are validated at the boundary,
    /// the selection can never exceed the 28-code catalog.
    pub fn apply(&mut self, patch: DraftPatch) {
        if let Some(details) = patch.details {
            self.details = details;
        }
        if let Some(selection) = patch.selected_zones {
            let mut deduped: Vec<ZoneCode> = Vec::with_capacity(selection.len());
            for code in selection {
                if !deduped.contains(&code) {
                    deduped.push(code);
                }
            }
            self.selected_zones = deduped;
        }
        if let Some(zones) = patch.zones {
            self.zones = zones;
        }
        if let Some(rates) = patch.rates {
            self.rates = rates;
        }

        self.zones.retain(|z| self.selected_zones.contains(&z.code));
        self.rates.initialize(&self.selected_zones);
    }
}
