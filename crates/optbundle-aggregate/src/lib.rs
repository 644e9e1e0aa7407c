//! Aggregate command options.
//!
//! The closed set of option kinds the aggregate command understands, fluent
//! bundle construction over them, and the command builder that consumes a
//! flattened option sequence.

mod bundle;
pub mod command;
mod option;

pub use bundle::{AggregateBundle, AggregateBundleExt};
pub use command::{AggregateCommand, ValidationError};
pub use option::{AggregateKind, AggregateOption, Collation, Hint};
