//! Record repositories.
//!
//! Each module owns one record family and exposes the operations the contract dispatches to.
//! Write operations take a [`TxContext`](crate::context::TxContext); read-only queries are
//! generic over [`StateRead`](crate::context::StateRead) so they can also run against another
//! channel's committed [`Snapshot`](crate::context::Snapshot).

pub mod audit_log;
pub mod consents;
pub mod counts;
pub mod data_calls;
pub mod extraction;
pub mod insurance;
pub mod likes;
pub mod query;
pub mod reports;
pub mod reset;

use crate::{DataCallError, DataCallResult};
use datacall_types::{NonEmptyText, RecordVersion};

/// Validate that `value` is not blank, failing with `message`.
pub(crate) fn required(value: &str, message: &str) -> DataCallResult<NonEmptyText> {
    NonEmptyText::new(value).map_err(|_| DataCallError::InvalidInput(message.to_owned()))
}

pub(crate) fn parse_version(value: &str) -> DataCallResult<RecordVersion> {
    RecordVersion::parse(value).map_err(|e| DataCallError::InvalidInput(e.to_string()))
}

/// Skip/limit window: skip `start_index` items, then take up to `page_size` (0 = all).
pub(crate) fn skip_limit<T>(items: Vec<T>, start_index: usize, page_size: usize) -> Vec<T> {
    let iter = items.into_iter().skip(start_index);
    if page_size == 0 {
        iter.collect()
    } else {
        iter.take(page_size).collect()
    }
}

/// Page window with a 1-based `start_index` (0 behaves as 1) and `page_size` (0 = all).
pub(crate) fn page<T>(items: Vec<T>, start_index: usize, page_size: usize) -> Vec<T> {
    if page_size == 0 {
        return items;
    }
    skip_limit(items, start_index.saturating_sub(1), page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_limit() {
        let items: Vec<u32> = (1..=5).collect();
        assert_eq!(skip_limit(items.clone(), 0, 0), vec![1, 2, 3, 4, 5]);
        assert_eq!(skip_limit(items.clone(), 1, 2), vec![2, 3]);
        assert_eq!(skip_limit(items, 9, 2), Vec::<u32>::new());
    }

    #[test]
    fn test_page_is_one_based() {
        let items: Vec<u32> = (1..=5).collect();
        assert_eq!(page(items.clone(), 0, 2), vec![1, 2]);
        assert_eq!(page(items.clone(), 1, 2), vec![1, 2]);
        assert_eq!(page(items.clone(), 4, 3), vec![4, 5]);
        assert_eq!(page(items, 3, 0), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_required_rejects_blank() {
        let err = required("  ", "Id cant not be empty!!").unwrap_err();
        assert!(matches!(err, DataCallError::InvalidInput(m) if m == "Id cant not be empty!!"));
    }
}
