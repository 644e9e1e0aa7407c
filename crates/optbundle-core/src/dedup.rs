//! Last-write-wins reduction over a flattened option list.

use std::collections::HashMap;

use crate::BundleOption;

/// Keep only the last option of each kind.
///
/// Survivors stay at the position of their last occurrence, so the output is
/// ordered by when each kind was last set, not first.
pub fn dedup_last_wins<O: BundleOption>(options: Vec<O>) -> Vec<O> {
    let mut last: HashMap<O::Kind, usize> = HashMap::with_capacity(options.len());
    for (pos, opt) in options.iter().enumerate() {
        last.insert(opt.kind(), pos);
    }

    options
        .into_iter()
        .enumerate()
        .filter(|(pos, opt)| last.get(&opt.kind()) == Some(pos))
        .map(|(_, opt)| opt)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Setting(&'static str, i32);

    impl BundleOption for Setting {
        type Kind = &'static str;

        fn kind(&self) -> &'static str {
            self.0
        }
    }

    #[test]
    fn test_empty() {
        assert!(dedup_last_wins(Vec::<Setting>::new()).is_empty());
    }

    #[test]
    fn test_no_duplicates_unchanged() {
        let opts = vec![Setting("a", 1), Setting("b", 2), Setting("c", 3)];
        assert_eq!(dedup_last_wins(opts.clone()), opts);
    }

    #[test]
    fn test_last_occurrence_wins() {
        let opts = vec![
            Setting("batchSize", 1),
            Setting("comment", 10),
            Setting("batchSize", 2),
            Setting("bypass", 0),
            Setting("bypass", 1),
            Setting("comment", 20),
        ];
        assert_eq!(
            dedup_last_wins(opts),
            vec![Setting("batchSize", 2), Setting("bypass", 1), Setting("comment", 20)]
        );
    }

    #[test]
    fn test_ordered_by_last_position_not_first() {
        let opts = vec![Setting("a", 1), Setting("b", 2), Setting("a", 3)];
        assert_eq!(dedup_last_wins(opts), vec![Setting("b", 2), Setting("a", 3)]);
    }
}
