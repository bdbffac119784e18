//! Excel serial dates
//!
//! Spreadsheets store dates as day counts since an epoch, with the time of
//! day as the fraction. The 1900 system counts from 1899-12-31 and keeps the
//! phantom 1900-02-29; the 1904 system counts from 1904-01-01.
//!
//! [`ExcelDate`] and [`ExcelDateTime`] wrap chrono values so that the mapper
//! writes them as serial numbers and reads them back from numeric cells. Other
//! serializers see ISO-8601 text. The [`excel_date`] and [`excel_datetime`]
//! modules do the same for plain chrono fields through `#[serde(with)]`.

use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::ser::{Serialize, Serializer};

/// Newtype name marking [`ExcelDate`] values
pub(crate) const EXCEL_DATE_TOKEN: &str = "$serde_sheets::ExcelDate";
/// Newtype name marking [`ExcelDateTime`] values
pub(crate) const EXCEL_DATETIME_TOKEN: &str = "$serde_sheets::ExcelDateTime";

const MILLIS_PER_DAY: f64 = 86_400_000.0;
/// Serial of 9999-12-31 in the 1900 system, plus one day
const MAX_SERIAL: f64 = 2_958_466.0;
const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

/// Serial number of `value`, `None` before the epoch
pub fn to_excel_serial(value: NaiveDateTime, date_1904: bool) -> Option<f64> {
    let date = value.date();
    let days = if date_1904 {
        let epoch = ymd(1904, 1, 1);
        if date < epoch {
            return None;
        }
        (date - epoch).num_days()
    } else {
        if date < ymd(1900, 1, 1) {
            return None;
        }
        let days = (date - ymd(1899, 12, 31)).num_days();
        // 1900-02-29 exists in the 1900 system
        if date >= ymd(1900, 3, 1) {
            days + 1
        } else {
            days
        }
    };
    let time = value.time();
    let millis = time.num_seconds_from_midnight() as u64 * 1000
        + (time.nanosecond() % 1_000_000_000) as u64 / 1_000_000;
    Some(days as f64 + millis as f64 / MILLIS_PER_DAY)
}

/// Date and time of a serial number, `None` when negative or out of range
pub fn from_excel_serial(serial: f64, date_1904: bool) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !(0.0..MAX_SERIAL).contains(&serial) {
        return None;
    }
    let mut days = serial.floor() as i64;
    let mut millis = ((serial - serial.floor()) * MILLIS_PER_DAY).round() as i64;
    if millis >= MILLIS_PER_DAY as i64 {
        days += 1;
        millis = 0;
    }
    let base = if date_1904 {
        ymd(1904, 1, 1)
    } else if days < 61 {
        ymd(1899, 12, 31)
    } else {
        ymd(1899, 12, 30)
    };
    let date = base.checked_add_signed(Duration::days(days))?;
    let time = NaiveTime::from_hms_opt(0, 0, 0)? + Duration::milliseconds(millis);
    Some(date.and_time(time))
}

/// Parse `yyyy-mm-dd`, `yyyy-mm-ddThh:mm:ss[.fff]` or the same with a space
pub(crate) fn parse_iso(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn format_datetime(value: NaiveDateTime) -> String {
    value.format(DATETIME_FORMAT).to_string()
}

/// A calendar date stored as an Excel serial number
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExcelDate(pub NaiveDate);

/// A date and time stored as an Excel serial number
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExcelDateTime(pub NaiveDateTime);

impl From<NaiveDate> for ExcelDate {
    fn from(date: NaiveDate) -> Self {
        ExcelDate(date)
    }
}

impl From<NaiveDateTime> for ExcelDateTime {
    fn from(value: NaiveDateTime) -> Self {
        ExcelDateTime(value)
    }
}

impl fmt::Display for ExcelDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_date(self.0))
    }
}

impl fmt::Display for ExcelDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_datetime(self.0))
    }
}

impl Serialize for ExcelDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct(EXCEL_DATE_TOKEN, &format_date(self.0))
    }
}

impl Serialize for ExcelDateTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct(EXCEL_DATETIME_TOKEN, &format_datetime(self.0))
    }
}

impl<'de> Deserialize<'de> for ExcelDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer
            .deserialize_newtype_struct(EXCEL_DATE_TOKEN, SerialVisitor("a date"))
            .map(|value| ExcelDate(value.date()))
    }
}

impl<'de> Deserialize<'de> for ExcelDateTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer
            .deserialize_newtype_struct(EXCEL_DATETIME_TOKEN, SerialVisitor("a date-time"))
            .map(ExcelDateTime)
    }
}

/// Accepts ISO text or a 1900-system serial number
struct SerialVisitor(&'static str);

impl<'de> Visitor<'de> for SerialVisitor {
    type Value = NaiveDateTime;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{} as ISO-8601 text or an Excel serial number", self.0)
    }

    fn visit_newtype_struct<D: Deserializer<'de>>(
        self,
        deserializer: D,
    ) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        parse_iso(v).ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        from_excel_serial(v, false).ok_or_else(|| E::invalid_value(de::Unexpected::Float(v), &self))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        self.visit_f64(v as f64)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        self.visit_f64(v as f64)
    }
}

/// `#[serde(with = "serde_sheets::excel_date")]` for `NaiveDate` fields
pub mod excel_date {
    use super::ExcelDate;
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        ExcelDate(*date).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        ExcelDate::deserialize(deserializer).map(|d| d.0)
    }

    /// The same for `Option<NaiveDate>`; pair with `#[serde(default)]`
    pub mod option {
        use super::ExcelDate;
        use chrono::NaiveDate;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            date: &Option<NaiveDate>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(date) => serializer.serialize_some(&ExcelDate(*date)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDate>, D::Error> {
            Option::<ExcelDate>::deserialize(deserializer).map(|d| d.map(|d| d.0))
        }
    }
}

/// `#[serde(with = "serde_sheets::excel_datetime")]` for `NaiveDateTime` fields
pub mod excel_datetime {
    use super::ExcelDateTime;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        value: &NaiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        ExcelDateTime(*value).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        ExcelDateTime::deserialize(deserializer).map(|d| d.0)
    }

    /// The same for `Option<NaiveDateTime>`; pair with `#[serde(default)]`
    pub mod option {
        use super::ExcelDateTime;
        use chrono::NaiveDateTime;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<NaiveDateTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(value) => serializer.serialize_some(&ExcelDateTime(*value)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDateTime>, D::Error> {
            Option::<ExcelDateTime>::deserialize(deserializer).map(|d| d.map(|d| d.0))
        }
    }
}
