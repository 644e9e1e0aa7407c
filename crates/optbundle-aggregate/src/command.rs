//! Aggregate command builder.
//!
//! Consumes a flattened option sequence. Options are applied in order, so
//! the last entry of each kind is authoritative whether or not the sequence
//! was deduplicated.

use std::time::Duration;

use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::option::{AggregateOption, Collation, Hint};

/// An option value the aggregate command cannot accept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("batchSize must not be negative, got {0}")]
    NegativeBatchSize(i32),

    #[error("collation locale must not be empty")]
    EmptyCollationLocale,

    #[error("hint must name an index or list at least one key")]
    EmptyHint,
}

/// Resolved settings for one aggregate command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateCommand {
    pub allow_disk_use: Option<bool>,
    pub batch_size: Option<i32>,
    pub bypass_document_validation: Option<bool>,
    pub collation: Option<Collation>,
    pub comment: Option<String>,
    pub hint: Option<Hint>,
    pub max_await_time: Option<Duration>,
    pub max_time: Option<Duration>,
}

impl AggregateCommand {
    /// Apply `options` in order and validate the result.
    pub fn from_options(options: &[AggregateOption]) -> Result<Self, ValidationError> {
        let mut cmd = Self::default();
        for opt in options {
            match opt {
                AggregateOption::AllowDiskUse(b) => cmd.allow_disk_use = Some(*b),
                AggregateOption::BatchSize(n) => cmd.batch_size = Some(*n),
                AggregateOption::BypassDocumentValidation(b) => {
                    cmd.bypass_document_validation = Some(*b)
                }
                AggregateOption::Collation(c) => cmd.collation = Some(c.clone()),
                AggregateOption::Comment(s) => cmd.comment = Some(s.clone()),
                AggregateOption::Hint(h) => cmd.hint = Some(h.clone()),
                AggregateOption::MaxAwaitTime(d) => cmd.max_await_time = Some(*d),
                AggregateOption::MaxTime(d) => cmd.max_time = Some(*d),
            }
        }
        cmd.validate()?;
        debug!(options = options.len(), "built aggregate command");
        Ok(cmd)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(n) = self.batch_size {
            if n < 0 {
                return Err(ValidationError::NegativeBatchSize(n));
            }
        }
        if let Some(ref c) = self.collation {
            if c.locale.is_empty() {
                return Err(ValidationError::EmptyCollationLocale);
            }
        }
        match &self.hint {
            Some(Hint::Name(name)) if name.is_empty() => Err(ValidationError::EmptyHint),
            Some(Hint::Keys(keys)) if keys.is_empty() => Err(ValidationError::EmptyHint),
            _ => Ok(()),
        }
    }

    /// Command body fields set by the options.
    ///
    /// `maxAwaitTime` applies to follow-up cursor requests and is not part
    /// of the body.
    pub fn to_document(&self) -> Value {
        let mut doc = Map::new();
        if let Some(b) = self.allow_disk_use {
            doc.insert("allowDiskUse".to_string(), json!(b));
        }
        if let Some(b) = self.bypass_document_validation {
            doc.insert("bypassDocumentValidation".to_string(), json!(b));
        }
        if let Some(ref c) = self.collation {
            doc.insert("collation".to_string(), json!(c));
        }
        if let Some(ref s) = self.comment {
            doc.insert("comment".to_string(), json!(s));
        }
        if let Some(n) = self.batch_size {
            doc.insert("cursor".to_string(), json!({ "batchSize": n }));
        }
        if let Some(ref h) = self.hint {
            doc.insert("hint".to_string(), json!(h));
        }
        if let Some(d) = self.max_time {
            doc.insert("maxTimeMS".to_string(), json!(millis(d)));
        }
        Value::Object(doc)
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
