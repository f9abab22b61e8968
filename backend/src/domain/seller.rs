//! Seller profiles: the business side of a user account.
//!
//! A profile starts unapproved and inactive. An administrator approval makes
//! it discoverable in the nearby search.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::validation::{FieldError, optional_text, required_text};
use crate::domain::{ContactNumber, EmailAddress, GeoPoint, ImageRef, SellerId, UserId};

const BUSINESS_NAME_MAX: usize = 100;
const LONG_TEXT_MAX: usize = 2000;
const DAYS_CLOSED_MAX: usize = 255;
const GST_NUMBER_MAX: usize = 50;

/// Merchandise line a seller trades in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SellerCategory {
    Electronic,
    #[default]
    Furniture,
}

impl SellerCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Electronic => "electronic",
            Self::Furniture => "furniture",
        }
    }
}

impl fmt::Display for SellerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SellerCategory {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "electronic" => Ok(Self::Electronic),
            "furniture" => Ok(Self::Furniture),
            _ => Err(FieldError::invalid(
                "seller_category",
                "seller_category must be electronic or furniture",
            )),
        }
    }
}

/// Editable business details of a seller.
#[derive(Debug, Clone, PartialEq)]
pub struct SellerProfile {
    pub business_name: String,
    pub business_address: String,
    pub business_contact_number: ContactNumber,
    pub business_email: Option<EmailAddress>,
    pub seller_category: SellerCategory,
    pub seller_exclusives: String,
    pub shop_description: Option<String>,
    pub shop_timing_open: NaiveTime,
    pub shop_timing_close: NaiveTime,
    pub shop_location: String,
    pub geo_location_lat: Option<f64>,
    pub geo_location_lng: Option<f64>,
    pub shop_photo: Option<ImageRef>,
    pub days_closed: String,
    pub gst_number: String,
}

impl SellerProfile {
    /// Shop coordinates when both halves are known.
    #[must_use]
    pub fn location(&self) -> Option<GeoPoint> {
        GeoPoint::from_parts(self.geo_location_lat, self.geo_location_lng)
    }
}

/// Raw, unvalidated profile fields as received from a client.
///
/// Used both for creation (all required fields present) and for partial
/// updates, where it is first merged over the stored profile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SellerProfileInput {
    pub business_name: Option<String>,
    pub business_address: Option<String>,
    pub business_contact_number: Option<String>,
    pub business_email: Option<String>,
    pub seller_category: Option<String>,
    pub seller_exclusives: Option<String>,
    pub shop_description: Option<String>,
    pub shop_timing_open: Option<String>,
    pub shop_timing_close: Option<String>,
    pub shop_location: Option<String>,
    pub geo_location_lat: Option<f64>,
    pub geo_location_lng: Option<f64>,
    pub shop_photo: Option<String>,
    pub days_closed: Option<String>,
    pub gst_number: Option<String>,
}

fn parse_time(field: &'static str, raw: Option<String>) -> Result<NaiveTime, FieldError> {
    let text = required_text(field, raw, 16)?;
    NaiveTime::parse_from_str(&text, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(&text, "%H:%M"))
        .map_err(|_| FieldError::invalid(field, format!("{field} must be a time such as 09:30")))
}

fn check_coordinate(
    field: &'static str,
    value: Option<f64>,
    limit: f64,
) -> Result<Option<f64>, FieldError> {
    match value {
        Some(v) if !v.is_finite() || v.abs() > limit => Err(FieldError::invalid(
            field,
            format!("{field} must be between -{limit} and {limit}"),
        )),
        other => Ok(other),
    }
}

impl SellerProfileInput {
    /// Validate every field, producing a profile.
    pub fn validate(self) -> Result<SellerProfile, FieldError> {
        let business_contact_number = ContactNumber::new(required_text(
            "business_contact_number",
            self.business_contact_number,
            32,
        )?)
        .map_err(|err| FieldError::invalid("business_contact_number", err.to_string()))?;
        let business_email = optional_text("business_email", self.business_email, 254)?
            .map(EmailAddress::new)
            .transpose()
            .map_err(|err| FieldError::invalid("business_email", err.to_string()))?;
        let seller_category = match optional_text("seller_category", self.seller_category, 32)? {
            Some(raw) => raw.parse()?,
            None => SellerCategory::default(),
        };

        Ok(SellerProfile {
            business_name: required_text("business_name", self.business_name, BUSINESS_NAME_MAX)?,
            business_address: required_text("business_address", self.business_address, LONG_TEXT_MAX)?,
            business_contact_number,
            business_email,
            seller_category,
            seller_exclusives: optional_text("seller_exclusives", self.seller_exclusives, LONG_TEXT_MAX)?
                .unwrap_or_default(),
            shop_description: optional_text("shop_description", self.shop_description, LONG_TEXT_MAX)?,
            shop_timing_open: parse_time("shop_timing_open", self.shop_timing_open)?,
            shop_timing_close: parse_time("shop_timing_close", self.shop_timing_close)?,
            shop_location: required_text("shop_location", self.shop_location, LONG_TEXT_MAX)?,
            geo_location_lat: check_coordinate("geo_location_lat", self.geo_location_lat, 90.0)?,
            geo_location_lng: check_coordinate("geo_location_lng", self.geo_location_lng, 180.0)?,
            shop_photo: ImageRef::parse_optional("shop_photo", self.shop_photo)?,
            days_closed: optional_text("days_closed", self.days_closed, DAYS_CLOSED_MAX)?
                .unwrap_or_default(),
            gst_number: optional_text("gst_number", self.gst_number, GST_NUMBER_MAX)?
                .unwrap_or_default(),
        })
    }

    /// Fill every absent field from `current`, then validate the result.
    pub fn apply_to(self, current: &SellerProfile) -> Result<SellerProfile, FieldError> {
        let base = SellerProfileInput::from(current);
        Self {
            business_name: self.business_name.or(base.business_name),
            business_address: self.business_address.or(base.business_address),
            business_contact_number: self
                .business_contact_number
                .or(base.business_contact_number),
            business_email: self.business_email.or(base.business_email),
            seller_category: self.seller_category.or(base.seller_category),
            seller_exclusives: self.seller_exclusives.or(base.seller_exclusives),
            shop_description: self.shop_description.or(base.shop_description),
            shop_timing_open: self.shop_timing_open.or(base.shop_timing_open),
            shop_timing_close: self.shop_timing_close.or(base.shop_timing_close),
            shop_location: self.shop_location.or(base.shop_location),
            geo_location_lat: self.geo_location_lat.or(base.geo_location_lat),
            geo_location_lng: self.geo_location_lng.or(base.geo_location_lng),
            shop_photo: self.shop_photo.or(base.shop_photo),
            days_closed: self.days_closed.or(base.days_closed),
            gst_number: self.gst_number.or(base.gst_number),
        }
        .validate()
    }
}

impl From<&SellerProfile> for SellerProfileInput {
    fn from(profile: &SellerProfile) -> Self {
        Self {
            business_name: Some(profile.business_name.clone()),
            business_address: Some(profile.business_address.clone()),
            business_contact_number: Some(profile.business_contact_number.to_string()),
            business_email: profile.business_email.as_ref().map(ToString::to_string),
            seller_category: Some(profile.seller_category.as_str().to_owned()),
            seller_exclusives: Some(profile.seller_exclusives.clone()),
            shop_description: profile.shop_description.clone(),
            shop_timing_open: Some(profile.shop_timing_open.format("%H:%M:%S").to_string()),
            shop_timing_close: Some(profile.shop_timing_close.format("%H:%M:%S").to_string()),
            shop_location: Some(profile.shop_location.clone()),
            geo_location_lat: profile.geo_location_lat,
            geo_location_lng: profile.geo_location_lng,
            shop_photo: profile.shop_photo.as_ref().map(|photo| photo.as_str().to_owned()),
            days_closed: Some(profile.days_closed.clone()),
            gst_number: Some(profile.gst_number.clone()),
        }
    }
}

/// A seller profile linked one-to-one with a user.
#[derive(Debug, Clone, PartialEq)]
pub struct Seller {
    pub id: SellerId,
    pub user_id: UserId,
    pub profile: SellerProfile,
    pub is_seller_exclusives: bool,
    pub is_approved: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Seller {
    /// New profile awaiting approval.
    #[must_use]
    pub fn pending(user_id: UserId, profile: SellerProfile, now: DateTime<Utc>) -> Self {
        Self {
            id: SellerId::random(),
            user_id,
            profile,
            is_seller_exclusives: false,
            is_approved: false,
            is_active: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the seller may appear in public discovery.
    #[must_use]
    pub const fn is_discoverable(&self) -> bool {
        self.is_approved && self.is_active
    }
}

/// Seller returned by the nearby search.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbySeller {
    pub seller: Seller,
    pub distance_km: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::FieldErrorCode;
    use rstest::{fixture, rstest};

    #[fixture]
    fn input() -> SellerProfileInput {
        SellerProfileInput {
            business_name: Some("Teak House".to_owned()),
            business_address: Some("12 MG Road, Bengaluru".to_owned()),
            business_contact_number: Some("9876543210".to_owned()),
            shop_timing_open: Some("09:30".to_owned()),
            shop_timing_close: Some("21:00:00".to_owned()),
            shop_location: Some("MG Road".to_owned()),
            geo_location_lat: Some(12.97),
            geo_location_lng: Some(77.59),
            ..SellerProfileInput::default()
        }
    }

    #[rstest]
    fn validate_applies_defaults(input: SellerProfileInput) {
        let profile = input.validate().expect("valid profile");
        assert_eq!(profile.seller_category, SellerCategory::Furniture);
        assert_eq!(profile.shop_timing_open, NaiveTime::from_hms_opt(9, 30, 0).expect("time"));
        assert!(profile.business_email.is_none());
        assert!(profile.location().is_some());
    }

    #[rstest]
    #[case::name(|i: &mut SellerProfileInput| i.business_name = None, "business_name")]
    #[case::open(|i: &mut SellerProfileInput| i.shop_timing_open = None, "shop_timing_open")]
    #[case::address(|i: &mut SellerProfileInput| i.business_address = Some("  ".to_owned()), "business_address")]
    fn validate_reports_missing_fields(
        mut input: SellerProfileInput,
        #[case] mutate: fn(&mut SellerProfileInput),
        #[case] field: &str,
    ) {
        mutate(&mut input);
        let err = input.validate().expect_err("missing field");
        assert_eq!(err.field(), field);
        assert_eq!(err.code(), FieldErrorCode::MissingField);
    }

    #[rstest]
    fn validate_rejects_bad_values(mut input: SellerProfileInput) {
        input.shop_timing_close = Some("late".to_owned());
        assert_eq!(input.clone().validate().expect_err("bad time").field(), "shop_timing_close");

        input.shop_timing_close = Some("21:00".to_owned());
        input.geo_location_lat = Some(95.0);
        assert_eq!(input.clone().validate().expect_err("bad lat").field(), "geo_location_lat");

        input.geo_location_lat = Some(12.0);
        input.seller_category = Some("grocery".to_owned());
        assert_eq!(input.validate().expect_err("bad category").field(), "seller_category");
    }

    #[rstest]
    fn apply_to_keeps_unspecified_fields(input: SellerProfileInput) {
        let current = input.validate().expect("valid profile");
        let patch = SellerProfileInput {
            business_name: Some("Teak & Oak".to_owned()),
            seller_category: Some("electronic".to_owned()),
            ..SellerProfileInput::default()
        };

        let updated = patch.apply_to(&current).expect("valid patch");
        assert_eq!(updated.business_name, "Teak & Oak");
        assert_eq!(updated.seller_category, SellerCategory::Electronic);
        assert_eq!(updated.business_address, current.business_address);
        assert_eq!(updated.shop_timing_open, current.shop_timing_open);
    }

    #[rstest]
    fn missing_coordinate_means_no_location(input: SellerProfileInput) {
        let mut profile = input.validate().expect("valid profile");
        profile.geo_location_lng = None;
        assert!(profile.location().is_none());
    }

    #[rstest]
    fn pending_sellers_are_not_discoverable(input: SellerProfileInput) {
        let seller = Seller::pending(UserId::random(), input.validate().expect("valid"), Utc::now());
        assert!(!seller.is_approved);
        assert!(!seller.is_active);
        assert!(!seller.is_seller_exclusives);
        assert!(!seller.is_discoverable());
    }
}
