use std::fmt;

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Label shown while a subscription is being refreshed.
pub const UPDATING_LABEL: &str = "Updating";
/// Label shown for a subscription that has never been fetched.
pub const NEVER_LABEL: &str = "Never";

/// Source type of a subscription. Only plain URL subscriptions exist today.
pub const REMOTE_CONFIG_TYPE_URL: i64 = 0;

/// A user subscription to a remotely hosted proxy configuration.
///
/// The serialized keys (`url`, `name`, `updateTime`, `type`) are read back by
/// older releases and must stay as they are.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfigModel {
    url: String,
    name: String,
    #[serde(
        rename = "updateTime",
        default,
        with = "reference_date",
        skip_serializing_if = "Option::is_none"
    )]
    update_time: Option<DateTime<Utc>>,
    #[serde(skip)]
    updating: bool,
    #[serde(rename = "type", default)]
    kind: i64,
}

impl RemoteConfigModel {
    pub fn new(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
            update_time: None,
            updating: false,
            kind: REMOTE_CONFIG_TYPE_URL,
        }
    }

    pub fn with_update_time(mut self, at: DateTime<Utc>) -> Self {
        self.update_time = Some(at);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn update_time(&self) -> Option<DateTime<Utc>> {
        self.update_time
    }

    pub fn kind(&self) -> i64 {
        self.kind
    }

    pub fn is_updating(&self) -> bool {
        self.updating
    }

    pub fn set_updating(&mut self, updating: bool) {
        self.updating = updating;
    }

    /// Record a successful fetch and clear the in-progress flag.
    pub fn mark_updated(&mut self, at: DateTime<Utc>) {
        self.update_time = Some(at);
        self.updating = false;
    }

    /// Last-update label in the local time zone.
    pub fn displaying_time_string(&self) -> String {
        self.displaying_time_string_in(&Local)
    }

    /// Last-update label rendered in `tz` as `MM-dd HH:mm`.
    pub fn displaying_time_string_in<Tz>(&self, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        if self.updating {
            return UPDATING_LABEL.to_string();
        }
        match self.update_time {
            Some(at) => at.with_timezone(tz).format("%m-%d %H:%M").to_string(),
            None => NEVER_LABEL.to_string(),
        }
    }
}

/// `updateTime` is stored as fractional seconds since 2001-01-01T00:00:00Z.
mod reference_date {
    use chrono::{DateTime, Utc};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Unix timestamp of 2001-01-01T00:00:00Z.
    const REFERENCE_EPOCH: i64 = 978_307_200;

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(at) => {
                let secs = (at.timestamp() - REFERENCE_EPOCH) as f64
                    + f64::from(at.timestamp_subsec_nanos()) / 1e9;
                serializer.serialize_some(&secs)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs: Option<f64> = Option::deserialize(deserializer)?;
        secs.map(|secs| {
            let whole = secs.floor();
            let nanos = (((secs - whole) * 1e9).round() as u32).min(999_999_999);
            DateTime::from_timestamp(whole as i64 + REFERENCE_EPOCH, nanos)
                .ok_or_else(|| D::Error::custom(format!("updateTime out of range: {}", secs)))
        })
        .transpose()
    }
}
