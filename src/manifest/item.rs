//! Manifest item definitions.

use std::time::Duration;

use optbundle_aggregate::{AggregateOption, Collation, Hint};
use serde::Deserialize;

/// One entry of a bundle definition: a single-key table naming either an
/// option or another bundle.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemDef {
    /// Nest the named bundle at this position.
    Bundle(String),
    AllowDiskUse(bool),
    BatchSize(i32),
    BypassDocumentValidation(bool),
    Collation(Collation),
    Comment(String),
    Hint(Hint),
    MaxAwaitTimeMs(u64),
    MaxTimeMs(u64),
}

impl ItemDef {
    /// The option this item sets, or `None` for a bundle reference.
    pub fn to_option(&self) -> Option<AggregateOption> {
        let opt = match self {
            ItemDef::Bundle(_) => return None,
            ItemDef::AllowDiskUse(b) => AggregateOption::allow_disk_use(*b),
            ItemDef::BatchSize(n) => AggregateOption::batch_size(*n),
            ItemDef::BypassDocumentValidation(b) => AggregateOption::bypass_document_validation(*b),
            ItemDef::Collation(c) => AggregateOption::collation(c.clone()),
            ItemDef::Comment(s) => AggregateOption::comment(s.clone()),
            ItemDef::Hint(h) => AggregateOption::hint(h.clone()),
            ItemDef::MaxAwaitTimeMs(ms) => AggregateOption::max_await_time(Duration::from_millis(*ms)),
            ItemDef::MaxTimeMs(ms) => AggregateOption::max_time(Duration::from_millis(*ms)),
        };
        Some(opt)
    }
}
