use parking_lot::Mutex;
use proptest::prelude::*;
use ranged_observable::{
    ChangeKind, CollectionChange, CollectionError, CollectionOptions, ContextHandle,
    InlineDispatcher, RangeObservableCollection, ResetPolicy,
};
use std::sync::Arc;

type Log = Arc<Mutex<Vec<ChangeKind>>>;

fn observed(data: Vec<i32>, policy: ResetPolicy) -> (RangeObservableCollection<i32>, Log) {
    let options = CollectionOptions::default().with_reset_policy(policy);
    let mut collection =
        RangeObservableCollection::with_options(ContextHandle::new(InlineDispatcher), options);
    collection.add_range(data).unwrap();

    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let sink = log.clone();
    collection.subscribe(move |change: &CollectionChange<i32>| sink.lock().push(change.kind()));
    (collection, log)
}

#[test]
fn bulk_add_appends_in_order_with_one_reset() {
    let (mut collection, log) = observed(vec![1, 2], ResetPolicy::WhenChanged);
    collection.add_range(vec![3, 4, 5]).unwrap();

    assert_eq!(collection.as_slice(), &[1, 2, 3, 4, 5]);
    assert_eq!(*log.lock(), vec![ChangeKind::Reset]);
}

#[test]
fn bulk_add_of_nothing_is_silent() {
    let (mut collection, log) = observed(vec![1, 2], ResetPolicy::WhenChanged);
    collection.add_range(Vec::new()).unwrap();

    assert_eq!(collection.as_slice(), &[1, 2]);
    assert!(log.lock().is_empty());
}

#[test]
fn bulk_add_of_absent_input_fails() {
    let (mut collection, log) = observed(vec![1, 2], ResetPolicy::WhenChanged);
    let result = collection.try_add_range(None::<Vec<i32>>);

    assert!(matches!(result, Err(CollectionError::InvalidArgument { .. })));
    assert_eq!(collection.as_slice(), &[1, 2]);
    assert!(log.lock().is_empty());
}

#[test]
fn bulk_remove_uses_first_match() {
    let (mut collection, log) = observed(vec![1, 2, 3, 1, 4], ResetPolicy::WhenChanged);
    let removed = collection.remove_range([1, 4]).unwrap();

    assert_eq!(removed, 2);
    assert_eq!(collection.as_slice(), &[2, 3, 1]);
    assert_eq!(*log.lock(), vec![ChangeKind::Reset]);
}

#[test]
fn bulk_remove_of_non_members_default_policy() {
    let (mut collection, log) = observed(vec![1, 2, 3], ResetPolicy::WhenChanged);
    assert_eq!(collection.remove_range([7, 8]).unwrap(), 0);

    assert_eq!(collection.as_slice(), &[1, 2, 3]);
    assert!(log.lock().is_empty(), "nothing removed, nothing raised");
}

#[test]
fn bulk_remove_of_non_members_input_policy() {
    let (mut collection, log) = observed(vec![1, 2, 3], ResetPolicy::WhenInputNonEmpty);
    assert_eq!(collection.remove_range([7, 8]).unwrap(), 0);

    assert_eq!(collection.as_slice(), &[1, 2, 3]);
    assert_eq!(*log.lock(), vec![ChangeKind::Reset]);
}

#[test]
fn bulk_remove_partial_match_still_one_reset() {
    let (mut collection, log) = observed(vec![1, 2, 3], ResetPolicy::WhenChanged);
    assert_eq!(collection.remove_range([9, 2, 9]).unwrap(), 1);

    assert_eq!(collection.as_slice(), &[1, 3]);
    assert_eq!(*log.lock(), vec![ChangeKind::Reset]);
}

#[test]
fn hundred_pushes_versus_one_bulk_add() {
    let items: Vec<i32> = (0..100).collect();

    let (mut sequential, sequential_log) = observed(Vec::new(), ResetPolicy::WhenChanged);
    for &item in &items {
        sequential.push(item).unwrap();
    }

    let (mut bulk, bulk_log) = observed(Vec::new(), ResetPolicy::WhenChanged);
    bulk.add_range(items.clone()).unwrap();

    assert_eq!(sequential_log.lock().len(), 100);
    assert!(sequential_log.lock().iter().all(|k| *k == ChangeKind::Added));
    assert_eq!(*bulk_log.lock(), vec![ChangeKind::Reset]);
    assert_eq!(sequential.as_slice(), bulk.as_slice());
}

#[test]
fn single_item_changes_resume_after_batch() {
    let (mut collection, log) = observed(Vec::new(), ResetPolicy::WhenChanged);
    collection.add_range([1, 2]).unwrap();
    collection.push(3).unwrap();
    collection.remove(&1).unwrap();

    assert_eq!(
        *log.lock(),
        vec![ChangeKind::Reset, ChangeKind::Added, ChangeKind::Removed]
    );
}

proptest! {
    #[test]
    fn bulk_add_matches_sequential_pushes(
        prefix in prop::collection::vec(any::<i32>(), 0..16),
        items in prop::collection::vec(any::<i32>(), 0..64),
    ) {
        let (mut collection, log) = observed(prefix.clone(), ResetPolicy::WhenChanged);
        collection.add_range(items.clone()).unwrap();

        let mut expected = prefix;
        expected.extend(items.iter().copied());
        prop_assert_eq!(collection.as_slice(), expected.as_slice());

        let resets = if items.is_empty() { 0 } else { 1 };
        prop_assert_eq!(log.lock().len(), resets);
    }

    #[test]
    fn bulk_remove_matches_first_match_removal(
        data in prop::collection::vec(0..8i32, 0..32),
        targets in prop::collection::vec(0..8i32, 0..16),
    ) {
        let (mut collection, log) = observed(data.clone(), ResetPolicy::WhenChanged);
        let removed = collection.remove_range(&targets).unwrap();

        let mut expected = data;
        let mut expected_removed = 0;
        for target in &targets {
            if let Some(pos) = expected.iter().position(|e| e == target) {
                expected.remove(pos);
                expected_removed += 1;
            }
        }
        prop_assert_eq!(collection.as_slice(), expected.as_slice());
        prop_assert_eq!(removed, expected_removed);

        let resets = if expected_removed > 0 { 1 } else { 0 };
        prop_assert_eq!(log.lock().len(), resets);
    }
}
