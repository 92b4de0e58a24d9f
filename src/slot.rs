use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;

/// Length of the timezone offset the upstream API appends to every
/// slot timestamp (e.g. `+02:00`). It is stripped before parsing and
/// the remainder is treated as a naive local timestamp.
const TZ_OFFSET_LEN: usize = 6;

const UPSTREAM_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const DATE_FORMAT: &str = "%d/%m/%Y";
const TIME_FORMAT: &str = "%H:%M";

/// One available appointment opening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub city: String,
    /// Calendar date, `DD/MM/YYYY`.
    pub date: String,
    /// Local time of day, `HH:MM`.
    pub time: String,
    /// Opaque callback URL the user follows to act on the slot.
    pub booking_url: String,
}

/// Per-city entry in the upstream response body.
#[derive(Debug, Deserialize)]
pub struct CityAvailability {
    pub city_name: String,
    pub available_slots: Vec<RawSlot>,
}

/// One slot as it appears on the wire, before validation.
#[derive(Debug, Deserialize)]
pub struct RawSlot {
    pub datetime: String,
    pub callback_url: String,
}

#[derive(Debug, Error)]
pub enum SlotError {
    #[error("slot is missing a value for {0}")]
    EmptyField(&'static str),

    #[error("slot timestamp {0:?} is too short to carry a timezone offset")]
    TruncatedTimestamp(String),

    #[error("could not parse slot timestamp {raw:?}")]
    Timestamp {
        raw: String,
        #[source]
        source: chrono::ParseError,
    },
}

impl Slot {
    /// Validates one raw slot against its enclosing city name.
    ///
    /// All four fields must end up non-empty, and the timestamp must parse
    /// once its trailing timezone offset is removed.
    pub fn from_raw(city: &str, raw: &RawSlot) -> Result<Self, SlotError> {
        if city.is_empty() {
            return Err(SlotError::EmptyField("city_name"));
        }
        if raw.callback_url.is_empty() {
            return Err(SlotError::EmptyField("callback_url"));
        }

        let trimmed = raw
            .datetime
            .get(..raw.datetime.len().saturating_sub(TZ_OFFSET_LEN))
            .filter(|s| !s.is_empty())
            .ok_or_else(|| SlotError::TruncatedTimestamp(raw.datetime.clone()))?;

        let parsed = NaiveDateTime::parse_from_str(trimmed, UPSTREAM_DATETIME_FORMAT).map_err(
            |source| SlotError::Timestamp {
                raw: raw.datetime.clone(),
                source,
            },
        )?;

        Ok(Slot {
            city: city.to_string(),
            date: parsed.format(DATE_FORMAT).to_string(),
            time: parsed.format(TIME_FORMAT).to_string(),
            booking_url: raw.callback_url.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(datetime: &str, url: &str) -> RawSlot {
        RawSlot {
            datetime: datetime.to_string(),
            callback_url: url.to_string(),
        }
    }

    #[test]
    fn test_timestamp_split_into_date_and_time() {
        let slot = Slot::from_raw("Paris", &raw("2024-03-15T09:30:00+02:00", "https://x/1"))
            .expect("should build slot");

        assert_eq!(slot.city, "Paris");
        assert_eq!(slot.date, "15/03/2024");
        assert_eq!(slot.time, "09:30");
        assert_eq!(slot.booking_url, "https://x/1");
    }

    #[test]
    fn test_negative_offset_is_stripped_the_same_way() {
        let slot = Slot::from_raw("Lyon", &raw("2024-12-01T08:05:00-05:00", "https://x/2"))
            .expect("should build slot");

        assert_eq!(slot.date, "01/12/2024");
        assert_eq!(slot.time, "08:05");
    }

    #[test]
    fn test_empty_city_rejected() {
        let result = Slot::from_raw("", &raw("2024-03-15T09:30:00+02:00", "https://x/1"));
        assert!(matches!(result, Err(SlotError::EmptyField("city_name"))));
    }

    #[test]
    fn test_empty_callback_url_rejected() {
        let result = Slot::from_raw("Paris", &raw("2024-03-15T09:30:00+02:00", ""));
        assert!(matches!(result, Err(SlotError::EmptyField("callback_url"))));
    }

    #[test]
    fn test_timestamp_shorter_than_offset_rejected() {
        let result = Slot::from_raw("Paris", &raw("+0200", "https://x/1"));
        assert!(matches!(result, Err(SlotError::TruncatedTimestamp(_))));
    }

    #[test]
    fn test_garbage_timestamp_rejected() {
        let result = Slot::from_raw("Paris", &raw("not-a-datetime+02:00", "https://x/1"));
        assert!(matches!(result, Err(SlotError::Timestamp { .. })));
    }
}
