//! Vendor model
//!
//! Identity, contact and charge attributes collected by the onboarding
//! form, plus the submission payload handed to the upstream persistence
//! API once the rate matrix has been validated and normalized.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::zone::ZoneCode;

/// Vendor identity / contact / charge attributes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VendorDetails {
    #[validate(length(min = 1, max = 200, message = "company name is required"))]
    pub company_name: String,

    #[validate(length(min = 1, max = 200, message = "contact person is required"))]
    pub contact_person: String,

    #[validate(email(message = "invalid email address"))]
    pub email: String,

    #[validate(length(min = 7, max = 20, message = "invalid phone number"))]
    pub phone: String,

    #[validate(length(max = 500))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[validate(length(max = 100))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gst_number: Option<String>,

    /// Fuel surcharge applied on top of the base rate, percent
    #[validate(range(min = 0.0, max = 100.0, message = "fuel surcharge must be 0-100%"))]
    #[serde(default)]
    pub fuel_surcharge_percent: f64,

    /// Flat per-docket handling charge
    #[validate(custom(function = non_negative_charge))]
    #[serde(default)]
    pub docket_charge: Decimal,

    /// Minimum chargeable weight per consignment, kilograms
    #[validate(range(min = 0.0, message = "minimum chargeable weight must not be negative"))]
    #[serde(default)]
    pub min_chargeable_weight_kg: f64,

    /// Freight-on-value / insurance charge, percent of declared value
    #[validate(range(min = 0.0, max = 100.0, message = "FOV charge must be 0-100%"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fov_percent: Option<f64>,
}

fn non_negative_charge(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut err = ValidationError::new("non_negative");
        err.message = Some("charge must not be negative".into());
        return Err(err);
    }
    Ok(())
}

/// Two-level rates mapping: fromZone -> toZone -> price
pub type RateTable = BTreeMap<ZoneCode, BTreeMap<ZoneCode, Decimal>>;

/// Payload handed to the upstream vendor-creation endpoint
///
/// Built fresh per submit attempt; never persisted locally. The rates
/// table always comes from a validated, normalized matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    /// Owning customer account
    pub account_id: String,
    #[serde(flatten)]
    pub details: VendorDetails,
    pub rates: RateTable,
}

/// Response envelope of the upstream persistence API
///
/// Success carries a data object; failure carries a message string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_details() -> VendorDetails {
        VendorDetails {
            company_name: "Northline Logistics".to_string(),
            contact_person: "A. Sharma".to_string(),
            email: "ops@northline.example".to_string(),
            phone: "+91-9800000000".to_string(),
            address: None,
            gst_number: Some("29ABCDE1234F1Z5".to_string()),
            fuel_surcharge_percent: 12.5,
            docket_charge: Decimal::from(50),
            min_chargeable_weight_kg: 25.0,
            fov_percent: Some(1.0),
        }
    }

    #[test]
    fn test_valid_details_pass_validation() {
        assert!(valid_details().validate().is_ok());
    }

    #[test]
    fn test_bad_email_and_negative_charge_are_rejected() {
        let mut details = valid_details();
        details.email = "not-an-email".to_string();
        details.docket_charge = Decimal::from(-1);

        let err = details.validate().unwrap_err();
        let fields = err.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("docket_charge"));
    }

    #[test]
    fn test_fuel_surcharge_range() {
        let mut details = valid_details();
        details.fuel_surcharge_percent = 120.0;
        assert!(details.validate().is_err());
    }
}
