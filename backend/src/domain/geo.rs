//! Great-circle distance and radius search.

use std::fmt;

/// Mean Earth radius in kilometres (IUGG).
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Radius used by the nearby-seller search.
pub const NEARBY_RADIUS_KM: f64 = 40.0;

/// Validation errors for coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GeoPointError {
    #[error("latitude must be a number between -90 and 90")]
    Latitude,
    #[error("longitude must be a number between -180 and 180")]
    Longitude,
}

impl GeoPointError {
    /// Name of the offending field as exposed over the API.
    #[must_use]
    pub const fn field(self) -> &'static str {
        match self {
            Self::Latitude => "lat",
            Self::Longitude => "lng",
        }
    }
}

/// WGS84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    lat: f64,
    lng: f64,
}

impl GeoPoint {
    /// Validate and construct a coordinate.
    pub fn new(lat: f64, lng: f64) -> Result<Self, GeoPointError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(GeoPointError::Latitude);
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(GeoPointError::Longitude);
        }
        Ok(Self { lat, lng })
    }

    /// Build a point only when both halves are present and valid.
    #[must_use]
    pub fn from_parts(lat: Option<f64>, lng: Option<f64>) -> Option<Self> {
        Self::new(lat?, lng?).ok()
    }

    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.lat
    }

    #[must_use]
    pub const fn lng(&self) -> f64 {
        self.lng
    }

    /// Haversine distance to `other` in kilometres.
    ///
    /// # Examples
    /// ```
    /// use bazaar::domain::GeoPoint;
    ///
    /// let a = GeoPoint::new(0.0, 0.0).expect("valid");
    /// let b = GeoPoint::new(0.0, 1.0).expect("valid");
    /// assert!((a.distance_km(&b) - 111.195).abs() < 0.01);
    /// ```
    #[must_use]
    pub fn distance_km(&self, other: &Self) -> f64 {
        let (lat1, lat2) = (self.lat.to_radians(), other.lat.to_radians());
        let d_lat = lat2 - lat1;
        let d_lng = (other.lng - self.lng).to_radians();
        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
        // Clamp guards against rounding pushing `a` marginally above 1.
        2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lng)
    }
}

/// Keep candidates within `radius_km` of `origin`, nearest first.
///
/// Candidates without a location are skipped. Ties keep input order.
pub fn within_radius<T>(
    origin: &GeoPoint,
    candidates: impl IntoIterator<Item = (T, Option<GeoPoint>)>,
    radius_km: f64,
) -> Vec<(T, f64)> {
    let mut hits: Vec<(T, f64)> = candidates
        .into_iter()
        .filter_map(|(item, location)| {
            let distance = origin.distance_km(&location?);
            (distance <= radius_km).then_some((item, distance))
        })
        .collect();
    hits.sort_by(|a, b| a.1.total_cmp(&b.1));
    hits
}
