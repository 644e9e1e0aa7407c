//! Aggregate option kinds and values.

use std::fmt;
use std::time::Duration;

use optbundle_core::{BundleOption, Item};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Every setting the aggregate command accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AggregateKind {
    AllowDiskUse,
    BatchSize,
    BypassDocumentValidation,
    Collation,
    Comment,
    Hint,
    MaxAwaitTime,
    MaxTime,
}

impl AggregateKind {
    pub const ALL: [AggregateKind; 8] = [
        AggregateKind::AllowDiskUse,
        AggregateKind::BatchSize,
        AggregateKind::BypassDocumentValidation,
        AggregateKind::Collation,
        AggregateKind::Comment,
        AggregateKind::Hint,
        AggregateKind::MaxAwaitTime,
        AggregateKind::MaxTime,
    ];

    /// Stable name of the kind, as used on the command document.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AllowDiskUse => "allowDiskUse",
            Self::BatchSize => "batchSize",
            Self::BypassDocumentValidation => "bypassDocumentValidation",
            Self::Collation => "collation",
            Self::Comment => "comment",
            Self::Hint => "hint",
            Self::MaxAwaitTime => "maxAwaitTime",
            Self::MaxTime => "maxTime",
        }
    }
}

impl fmt::Display for AggregateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// String comparison rules for the aggregate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collation {
    pub locale: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_level: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_first: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_ordering: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternate: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_variable: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backwards: Option<bool>,
}

impl Collation {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            ..Default::default()
        }
    }
}

/// Index to use: either by name or by key pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Hint {
    Name(String),
    Keys(Map<String, Value>),
}

impl From<&str> for Hint {
    fn from(name: &str) -> Self {
        Hint::Name(name.to_string())
    }
}

impl From<String> for Hint {
    fn from(name: String) -> Self {
        Hint::Name(name)
    }
}

/// A single aggregate setting.
///
/// Serialized as `{"kind": "<kind>", "value": <value>}`; durations are
/// whole milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum AggregateOption {
    AllowDiskUse(bool),
    BatchSize(i32),
    BypassDocumentValidation(bool),
    Collation(Collation),
    Comment(String),
    Hint(Hint),
    MaxAwaitTime(#[serde(with = "duration_ms")] Duration),
    MaxTime(#[serde(with = "duration_ms")] Duration),
}

impl AggregateOption {
    pub fn allow_disk_use(allow: bool) -> Self {
        Self::AllowDiskUse(allow)
    }

    pub fn batch_size(size: i32) -> Self {
        Self::BatchSize(size)
    }

    pub fn bypass_document_validation(bypass: bool) -> Self {
        Self::BypassDocumentValidation(bypass)
    }

    pub fn collation(collation: Collation) -> Self {
        Self::Collation(collation)
    }

    pub fn comment(comment: impl Into<String>) -> Self {
        Self::Comment(comment.into())
    }

    pub fn hint(hint: impl Into<Hint>) -> Self {
        Self::Hint(hint.into())
    }

    pub fn max_await_time(duration: Duration) -> Self {
        Self::MaxAwaitTime(duration)
    }

    pub fn max_time(duration: Duration) -> Self {
        Self::MaxTime(duration)
    }
}

impl BundleOption for AggregateOption {
    type Kind = AggregateKind;

    fn kind(&self) -> AggregateKind {
        match self {
            Self::AllowDiskUse(_) => AggregateKind::AllowDiskUse,
            Self::BatchSize(_) => AggregateKind::BatchSize,
            Self::BypassDocumentValidation(_) => AggregateKind::BypassDocumentValidation,
            Self::Collation(_) => AggregateKind::Collation,
            Self::Comment(_) => AggregateKind::Comment,
            Self::Hint(_) => AggregateKind::Hint,
            Self::MaxAwaitTime(_) => AggregateKind::MaxAwaitTime,
            Self::MaxTime(_) => AggregateKind::MaxTime,
        }
    }
}

impl From<AggregateOption> for Item<AggregateOption> {
    fn from(opt: AggregateOption) -> Self {
        Item::Opt(opt)
    }
}

impl fmt::Display for AggregateOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=", self.kind())?;
        match self {
            Self::AllowDiskUse(b) | Self::BypassDocumentValidation(b) => write!(f, "{}", b),
            Self::BatchSize(n) => write!(f, "{}", n),
            Self::Comment(s) => write!(f, "{:?}", s),
            Self::MaxAwaitTime(d) | Self::MaxTime(d) => write!(f, "{}ms", d.as_millis()),
            Self::Collation(c) => {
                f.write_str(&serde_json::to_string(c).map_err(|_| fmt::Error)?)
            }
            Self::Hint(h) => f.write_str(&serde_json::to_string(h).map_err(|_| fmt::Error)?),
        }
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
