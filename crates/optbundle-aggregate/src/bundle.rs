//! Fluent construction of aggregate bundles.

use std::time::Duration;

use optbundle_core::Bundle;

use crate::option::{AggregateOption, Collation, Hint};

/// A bundle of aggregate options.
pub type AggregateBundle = Bundle<AggregateOption>;

/// One chaining method per aggregate option kind.
///
/// Every method returns a new bundle and leaves the receiver as it was:
///
/// ```
/// use optbundle_aggregate::{AggregateBundle, AggregateBundleExt};
///
/// let base = AggregateBundle::new().batch_size(1);
/// let tuned = base.comment("tuned").batch_size(100);
/// assert_eq!(base.len(), 1);
/// assert_eq!(tuned.len(), 3);
/// ```
pub trait AggregateBundleExt {
    fn allow_disk_use(&self, allow: bool) -> Self;
    fn batch_size(&self, size: i32) -> Self;
    fn bypass_document_validation(&self, bypass: bool) -> Self;
    fn collation(&self, collation: Collation) -> Self;
    fn comment(&self, comment: impl Into<String>) -> Self;
    fn hint(&self, hint: impl Into<Hint>) -> Self;
    fn max_await_time(&self, duration: Duration) -> Self;
    fn max_time(&self, duration: Duration) -> Self;

    /// Nest another bundle at this position.
    fn bundle(&self, nested: &Self) -> Self;
}

impl AggregateBundleExt for AggregateBundle {
    fn allow_disk_use(&self, allow: bool) -> Self {
        self.extend(AggregateOption::allow_disk_use(allow))
    }

    fn batch_size(&self, size: i32) -> Self {
        self.extend(AggregateOption::batch_size(size))
    }

    fn bypass_document_validation(&self, bypass: bool) -> Self {
        self.extend(AggregateOption::bypass_document_validation(bypass))
    }

    fn collation(&self, collation: Collation) -> Self {
        self.extend(AggregateOption::collation(collation))
    }

    fn comment(&self, comment: impl Into<String>) -> Self {
        self.extend(AggregateOption::comment(comment))
    }

    fn hint(&self, hint: impl Into<Hint>) -> Self {
        self.extend(AggregateOption::hint(hint))
    }

    fn max_await_time(&self, duration: Duration) -> Self {
        self.extend(AggregateOption::max_await_time(duration))
    }

    fn max_time(&self, duration: Duration) -> Self {
        self.extend(AggregateOption::max_time(duration))
    }

    fn bundle(&self, nested: &Self) -> Self {
        self.extend(nested)
    }
}
