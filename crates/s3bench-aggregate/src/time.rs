//! The one place this crate touches `jiff`: converting the `SystemTime`
//! timestamps workers record into the RFC 3339 strings the Aggregated
//! report serializes, since `start_time`/`end_time` are the only report
//! fields whose stable format is a calendar timestamp rather than a plain
//! number (§6 "field names are stable and form the public report API").
//! Every other timestamp computation in this crate stays in
//! `std::time::SystemTime`/`Duration`.

use std::time::{SystemTime, UNIX_EPOCH};

use jiff::Timestamp;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportTimestamp(pub Timestamp);

impl ReportTimestamp {
    pub fn from_system_time(t: SystemTime) -> Self {
        let since_epoch = t.duration_since(UNIX_EPOCH).unwrap_or_default();
        let ts = Timestamp::new(since_epoch.as_secs() as i64, since_epoch.subsec_nanos() as i32)
            .unwrap_or(Timestamp::from_second(0).expect("zero is a valid timestamp"));
        ReportTimestamp(ts)
    }
}

impl Serialize for ReportTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for ReportTimestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse::<Timestamp>().map(ReportTimestamp).map_err(serde::de::Error::custom)
    }
}
