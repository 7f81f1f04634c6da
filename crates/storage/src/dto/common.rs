use serde::{Deserialize, Deserializer};
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListParams {
    #[serde(default = "default_skip")]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

pub fn default_skip() -> i64 {
    0
}

pub fn default_limit() -> i64 {
    100
}

/// Lenient boolean for query flags. The observed client sometimes sends the
/// bare key (`?my_selections_only=`), which must read as false rather than
/// fail deserialization.
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(matches!(value.as_deref(), Some("true") | Some("1")))
}
