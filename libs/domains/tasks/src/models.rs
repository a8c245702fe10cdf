use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Status assigned when a client omits one at creation.
pub const STATUS_TODO: &str = "TODO";
/// Status assigned by the complete transition.
pub const STATUS_DONE: &str = "DONE";
/// Creator recorded when a client does not identify one.
pub const DEFAULT_CREATED_BY: &str = "Company Admin";
/// Editor label recorded for general updates without an explicit editor.
pub const SYSTEM_UPDATE: &str = "System Update";
/// Editor label recorded for the complete/pending transitions.
pub const SYSTEM_STATUS_UPDATE: &str = "System Status Update";

/// Current server time, wall clock. All audit timestamps use this.
pub fn current_timestamp() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Serde adapter for the wire datetime format `yyyy-MM-ddTHH:mm:ss`.
///
/// Timestamps cross the wire without a timezone suffix, so they map to
/// `NaiveDateTime` rather than a timezone-aware type.
pub mod wire_datetime {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use super::FORMAT;
        use chrono::NaiveDateTime;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S>(
            value: &Option<NaiveDateTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(dt) => serializer.serialize_some(&dt.format(FORMAT).to_string()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let opt = Option::<String>::deserialize(deserializer)?;
            opt.map(|s| NaiveDateTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom))
                .transpose()
        }
    }
}

/// Task domain entity as held in the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    /// Store-assigned identity, monotonically increasing
    pub id: i64,
    /// Never empty for a persisted task
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDateTime>,
    /// Free-form string; only TODO/DONE are ever assigned internally
    pub status: String,
    pub remarks: Option<String>,
    /// Set once at creation, immutable afterwards
    pub created_on: NaiveDateTime,
    /// Refreshed on every mutation; never precedes created_on
    pub last_updated_on: NaiveDateTime,
    /// Immutable after creation
    pub created_by: String,
    pub last_updated_by: String,
}

/// A task ready to be inserted. All defaults are already resolved; the
/// store only adds the identity.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDateTime>,
    pub status: String,
    pub remarks: Option<String>,
    pub created_on: NaiveDateTime,
    pub last_updated_on: NaiveDateTime,
    pub created_by: String,
    pub last_updated_by: String,
}

/// Wire representation exchanged with HTTP clients.
///
/// Every field is optional on input; the mapper and service decide which
/// absences are defaulted and which are rejected. `createdOn` and
/// `lastUpdatedOn` are read-only: neither create nor update takes them
/// from client input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<String>, format = DateTime)]
    #[serde(with = "wire_datetime::option")]
    pub due_date: Option<NaiveDateTime>,
    pub status: Option<String>,
    pub remarks: Option<String>,
    #[schema(value_type = Option<String>, format = DateTime)]
    #[serde(with = "wire_datetime::option")]
    pub created_on: Option<NaiveDateTime>,
    #[schema(value_type = Option<String>, format = DateTime)]
    #[serde(with = "wire_datetime::option")]
    pub last_updated_on: Option<NaiveDateTime>,
    pub created_by: Option<String>,
    pub last_updated_by: Option<String>,
}

/// Query parameters for the search endpoint
#[derive(Debug, Clone, Deserialize, Default, IntoParams)]
pub struct SearchParams {
    pub title: Option<String>,
    pub status: Option<String>,
}
