use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Identifier of a pool record. The API hands these out as integers but some
/// payloads carry them as numeric strings, so both are accepted on input.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PoolId(pub i64);

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PoolId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(PoolId)
    }
}

impl<'de> Deserialize<'de> for PoolId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(i64),
            Text(String),
        }

        match RawId::deserialize(deserializer)? {
            RawId::Number(n) => Ok(PoolId(n)),
            RawId::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthState {
    #[default]
    Healthy,
    Unhealthy,
}

impl HealthState {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthState::Healthy => "HEALTHY",
            HealthState::Unhealthy => "UNHEALTHY",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HealthState::Healthy => "Healthy",
            HealthState::Unhealthy => "Unhealthy",
        }
    }
}

/// Status of the sanitary approval resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ResolutionState {
    #[default]
    #[serde(rename = "RES_VALID")]
    Valid,
    #[serde(rename = "RES_EXPIRED")]
    Expired,
}

impl ResolutionState {
    pub fn label(&self) -> &'static str {
        match self {
            ResolutionState::Valid => "Resolution valid",
            ResolutionState::Expired => "Resolution expired",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLong {
    pub lat: f64,
    pub long: f64,
}

impl LatLong {
    pub fn new(lat: f64, long: f64) -> Self {
        Self { lat, long }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.long.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.long)
    }
}

/// Canonical pool record. Coordinates, decimals, dates and ratings are
/// normalized here, once, so nothing downstream has to coerce strings. Only
/// the `id` has to be well formed; any other unusable field falls back to
/// empty so the record still counts in the totals.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Pool {
    pub id: PoolId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub file_number: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub legal_name: String,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub commercial_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub pool_type: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub address: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub district: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub capacity: u32,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub area_m2: f64,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub volume_m3: f64,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub approval_resolution_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub approval_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "known_or_default")]
    pub state: ResolutionState,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub observations: Option<String>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub expiration_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub last_inspection_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "known_or_default")]
    pub current_state: HealthState,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub is_active: bool,
}

impl Pool {
    /// Map position, or `None` when either coordinate is missing or out of range.
    pub fn coordinates(&self) -> Option<LatLong> {
        let position = LatLong::new(self.latitude?, self.longitude?);
        position.is_valid().then_some(position)
    }

    pub fn display_name(&self) -> &str {
        self.commercial_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.legal_name)
    }

    pub fn is_healthy(&self) -> bool {
        self.current_state == HealthState::Healthy
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum DraftError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("rating must be between 0 and 5, got {0}")]
    RatingOutOfRange(f64),
    #[error("latitude and longitude must both be set and within range")]
    InvalidCoordinates,
}

/// Editable subset of a pool, sent on create (POST) and edit (PATCH).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PoolDraft {
    pub file_number: String,
    pub legal_name: String,
    pub commercial_name: Option<String>,
    pub pool_type: String,
    pub address: String,
    pub district: String,
    pub capacity: u32,
    pub area_m2: f64,
    pub volume_m3: f64,
    pub approval_resolution_number: Option<String>,
    pub approval_date: Option<NaiveDate>,
    pub state: ResolutionState,
    pub observations: Option<String>,
    pub expiration_date: Option<NaiveDate>,
    pub last_inspection_date: Option<NaiveDate>,
    pub current_state: HealthState,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub image_url: Option<String>,
    pub rating: Option<f64>,
    pub is_active: bool,
}

impl PoolDraft {
    pub fn validate(&self) -> Result<(), DraftError> {
        let required = [
            ("file number", &self.file_number),
            ("legal name", &self.legal_name),
            ("pool type", &self.pool_type),
            ("address", &self.address),
            ("district", &self.district),
        ];
        if let Some((name, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(DraftError::MissingField(*name));
        }

        // Zero is a real score; "unrated" is `None`.
        if let Some(rating) = self.rating {
            if !(0.0..=5.0).contains(&rating) {
                return Err(DraftError::RatingOutOfRange(rating));
            }
        }

        match (self.latitude, self.longitude) {
            (None, None) => Ok(()),
            (Some(lat), Some(long)) if LatLong::new(lat, long).is_valid() => Ok(()),
            _ => Err(DraftError::InvalidCoordinates),
        }
    }
}

impl From<&Pool> for PoolDraft {
    fn from(pool: &Pool) -> Self {
        Self {
            file_number: pool.file_number.clone(),
            legal_name: pool.legal_name.clone(),
            commercial_name: pool.commercial_name.clone(),
            pool_type: pool.pool_type.clone(),
            address: pool.address.clone(),
            district: pool.district.clone(),
            capacity: pool.capacity,
            area_m2: pool.area_m2,
            volume_m3: pool.volume_m3,
            approval_resolution_number: pool.approval_resolution_number.clone(),
            approval_date: pool.approval_date,
            state: pool.state,
            observations: pool.observations.clone(),
            expiration_date: pool.expiration_date,
            last_inspection_date: pool.last_inspection_date,
            current_state: pool.current_state,
            latitude: pool.latitude,
            longitude: pool.longitude,
            image_url: pool.image_url.clone(),
            rating: pool.rating,
            is_active: pool.is_active,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

impl RawNumber {
    fn into_f64(self) -> Option<f64> {
        let value = match self {
            RawNumber::Number(n) => n,
            RawNumber::Text(s) => s.trim().parse().ok()?,
            RawNumber::Other(_) => return None,
        };
        value.is_finite().then_some(value)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawText {
    Text(String),
    Number(serde_json::Number),
    Other(IgnoredAny),
}

impl RawText {
    fn into_string(self) -> Option<String> {
        match self {
            RawText::Text(s) => Some(s),
            RawText::Number(n) => Some(n.to_string()),
            RawText::Other(_) => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFlag {
    Bool(bool),
    Text(String),
    Number(i64),
    Other(IgnoredAny),
}

/// Accepts numbers, numeric strings and null. Anything unparseable becomes
/// `None` instead of failing the whole record.
fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(Option::<RawNumber>::deserialize(deserializer)?.and_then(RawNumber::into_f64))
}

fn lenient_decimal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(lenient_f64(deserializer)?.unwrap_or_default())
}

fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Ok(lenient_f64(deserializer)?
        .filter(|n| *n >= 0.0 && *n <= f64::from(u32::MAX))
        .map(|n| n.round() as u32)
        .unwrap_or_default())
}

fn lenient_optional_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(Option::<RawText>::deserialize(deserializer)?.and_then(RawText::into_string))
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(lenient_optional_text(deserializer)?.unwrap_or_default())
}

/// `YYYY-MM-DD`, optionally followed by a time part. Empty or malformed
/// dates read as absent.
fn lenient_date<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error> {
    let Some(text) = lenient_optional_text(deserializer)? else {
        return Ok(None);
    };
    let day = text.trim().split('T').next().unwrap_or_default();
    if day.is_empty() {
        return Ok(None);
    }
    match day.parse() {
        Ok(date) => Ok(Some(date)),
        Err(_) => {
            tracing::warn!(value = %text, "ignoring malformed pool date");
            Ok(None)
        }
    }
}

fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Option::<RawFlag>::deserialize(deserializer)? {
        Some(RawFlag::Bool(flag)) => flag,
        Some(RawFlag::Text(s)) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1"),
        Some(RawFlag::Number(n)) => n != 0,
        Some(RawFlag::Other(_)) | None => false,
    })
}

/// Unknown enum spellings fall back to the default variant with a warning.
fn known_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let Some(raw) = Option::<serde_json::Value>::deserialize(deserializer)? else {
        return Ok(T::default());
    };
    match serde_json::from_value(raw.clone()) {
        Ok(value) => Ok(value),
        Err(_) => {
            tracing::warn!(value = %raw, "unknown pool state, using the default");
            Ok(T::default())
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_pool(id: i64) -> Pool {
    Pool {
        id: PoolId(id),
        file_number: format!("EXP-{id:04}"),
        legal_name: format!("Owner {id}"),
        commercial_name: Some(format!("Pool {id}")),
        pool_type: "Recreational".to_string(),
        address: "Av. Ejercito 101".to_string(),
        district: "Cayma".to_string(),
        capacity: 120,
        area_m2: 250.0,
        volume_m3: 400.0,
        approval_resolution_number: None,
        approval_date: None,
        state: ResolutionState::Valid,
        observations: None,
        expiration_date: None,
        last_inspection_date: None,
        current_state: HealthState::Healthy,
        latitude: Some(-16.39),
        longitude: Some(-71.54),
        image_url: None,
        rating: Some(4.0),
        is_active: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coerces_string_coordinates_and_rating() {
        let pool: Pool = serde_json::from_value(json!({
            "id": "7",
            "district": "Yanahuara",
            "latitude": "-16.3912",
            "longitude": " -71.5450 ",
            "rating": "4.5",
            "area_m2": "120.50",
            "current_state": "UNHEALTHY",
            "is_active": true
        }))
        .unwrap();

        assert_eq!(pool.id, PoolId(7));
        assert_eq!(pool.latitude, Some(-16.3912));
        assert_eq!(pool.longitude, Some(-71.545));
        assert_eq!(pool.rating, Some(4.5));
        assert_eq!(pool.area_m2, 120.5);
        assert_eq!(pool.current_state, HealthState::Unhealthy);
        assert!(pool.coordinates().is_some());
    }

    #[test]
    fn garbage_coordinates_become_absent() {
        let pool: Pool = serde_json::from_value(json!({
            "id": 3,
            "latitude": "not-a-number",
            "longitude": -71.5,
            "rating": null
        }))
        .unwrap();

        assert_eq!(pool.latitude, None);
        assert_eq!(pool.coordinates(), None);
        assert_eq!(pool.rating, None);
        assert!(!pool.is_active);
    }

    #[test]
    fn bad_plain_fields_fall_back_instead_of_failing() {
        let pool: Pool = serde_json::from_value(json!({
            "id": 9,
            "district": null,
            "legal_name": 42,
            "capacity": "120",
            "approval_date": "",
            "expiration_date": "2025-13-40",
            "last_inspection_date": "2024-03-15T10:00:00Z",
            "current_state": "healthy",
            "state": "SOMETHING_ELSE",
            "commercial_name": { "nested": true },
            "is_active": "true"
        }))
        .unwrap();

        assert_eq!(pool.district, "");
        assert_eq!(pool.legal_name, "42");
        assert_eq!(pool.capacity, 120);
        assert_eq!(pool.approval_date, None);
        assert_eq!(pool.expiration_date, None);
        assert_eq!(
            pool.last_inspection_date,
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
        assert_eq!(pool.current_state, HealthState::Healthy);
        assert_eq!(pool.state, ResolutionState::Valid);
        assert_eq!(pool.commercial_name, None);
        assert!(pool.is_active);
    }

    #[test]
    fn negative_or_garbage_capacity_reads_as_zero() {
        let negative: Pool = serde_json::from_value(json!({ "id": 1, "capacity": -5 })).unwrap();
        let garbage: Pool = serde_json::from_value(json!({ "id": 2, "capacity": [1] })).unwrap();
        assert_eq!(negative.capacity, 0);
        assert_eq!(garbage.capacity, 0);
    }

    #[test]
    fn zero_rating_is_kept() {
        let pool: Pool = serde_json::from_value(json!({ "id": 1, "rating": 0 })).unwrap();
        assert_eq!(pool.rating, Some(0.0));
    }

    #[test]
    fn out_of_range_coordinates_are_not_plotted() {
        let mut pool = sample_pool(1);
        pool.latitude = Some(123.0);
        assert_eq!(pool.coordinates(), None);
    }

    #[test]
    fn display_name_falls_back_to_legal_name() {
        let mut pool = sample_pool(2);
        assert_eq!(pool.display_name(), "Pool 2");
        pool.commercial_name = Some("  ".to_string());
        assert_eq!(pool.display_name(), "Owner 2");
    }

    #[test]
    fn draft_validation() {
        let mut draft = PoolDraft::from(&sample_pool(1));
        assert_eq!(draft.validate(), Ok(()));

        draft.rating = Some(0.0);
        assert_eq!(draft.validate(), Ok(()));

        draft.rating = Some(5.5);
        assert_eq!(draft.validate(), Err(DraftError::RatingOutOfRange(5.5)));

        draft.rating = Some(-1.0);
        assert_eq!(draft.validate(), Err(DraftError::RatingOutOfRange(-1.0)));

        draft.rating = None;
        draft.longitude = None;
        assert_eq!(draft.validate(), Err(DraftError::InvalidCoordinates));

        draft.district = String::new();
        assert_eq!(draft.validate(), Err(DraftError::MissingField("district")));
    }

    #[test]
    fn resolution_state_uses_api_names() {
        assert_eq!(
            serde_json::to_value(ResolutionState::Expired).unwrap(),
            json!("RES_EXPIRED")
        );
    }
}
