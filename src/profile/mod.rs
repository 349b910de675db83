//! LinkedIn profile data: normalization and data sources.

pub(crate) mod source;

pub use source::{profile_source, FixtureProfileSource, ProfileSource, ProxycurlProfileSource};

use serde_json::{Map, Value};

/// Semi-structured profile record keyed by provider-defined field names.
pub type ProfileRecord = Map<String, Value>;

/// Keys removed from every record regardless of value.
pub const NOISE_KEYS: [&str; 2] = ["people_also_viewed", "certifications"];

/// Key of the group list whose elements carry an image URL.
pub const GROUPS_KEY: &str = "groups";

/// Image field removed from each group element.
pub const GROUP_IMAGE_KEY: &str = "profile_pic_url";

/// Profile picture field surfaced to callers unmodified.
pub const PICTURE_KEY: &str = "profile_pic_url";

/// Strip empty fields and noisy keys from a raw profile record.
///
/// Returns a fresh record; `raw` is left untouched so callers can keep reading
/// from it (the picture URL is taken from the raw data).
pub fn normalize(raw: &ProfileRecord) -> ProfileRecord {
    raw.iter()
        .filter(|(key, value)| !NOISE_KEYS.contains(&key.as_str()) && !is_empty_value(value))
        .map(|(key, value)| {
            let value = if key == GROUPS_KEY {
                strip_group_images(value)
            } else {
                value.clone()
            };
            (key.clone(), value)
        })
        .collect()
}

/// Profile picture URL from a raw record, if it is a non-empty string.
pub fn picture_url(raw: &ProfileRecord) -> Option<String> {
    raw.get(PICTURE_KEY)
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn strip_group_images(groups: &Value) -> Value {
    match groups {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| match item {
                    Value::Object(group) => Value::Object(
                        group
                            .iter()
                            .filter(|(k, _)| k.as_str() != GROUP_IMAGE_KEY)
                            .map(|(k, v)| (k.clone(), v.clone()))
                            .collect(),
                    ),
                    other => other.clone(),
                })
                .collect(),
        ),
        other => other.clone(),
    }
}
