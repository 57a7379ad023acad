//! Quicksort trace (Lomuto partition on the last element).

use crate::event::TraceEvent;

/// Precompute the full quicksort trace for `input`.
pub fn trace(input: &[u32]) -> Vec<TraceEvent> {
    let mut scratch = input.to_vec();
    let mut events = Vec::new();
    if !scratch.is_empty() {
        let right = scratch.len() - 1;
        sort_range(&mut scratch, 0, right, &mut events);
    }
    events
}

fn sort_range(scratch: &mut [u32], left: usize, right: usize, events: &mut Vec<TraceEvent>) {
    if left == right {
        events.push(TraceEvent::SortedMark { index: left });
        return;
    }

    let pivot = partition(scratch, left, right, events);
    if pivot > left {
        sort_range(scratch, left, pivot - 1, events);
    }
    if pivot < right {
        sort_range(scratch, pivot + 1, right, events);
    }
}

/// Partition `[left, right]` around `scratch[right]` and return where the pivot lands.
fn partition(scratch: &mut [u32], left: usize, right: usize, events: &mut Vec<TraceEvent>) -> usize {
    let pivot_value = scratch[right];
    events.push(TraceEvent::PivotMark { index: right });

    // Write pointer: next slot for a value <= pivot.
    let mut store = left;
    for j in left..right {
        events.push(TraceEvent::Compare { i: j, j: right });
        if scratch[j] <= pivot_value {
            events.push(TraceEvent::Swap { i: store, j });
            scratch.swap(store, j);
            store += 1;
        }
    }

    events.push(TraceEvent::Swap { i: store, j: right });
    scratch.swap(store, right);
    events.push(TraceEvent::SortedMark { index: store });
    store
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::replay;

    fn sorted_marks(events: &[TraceEvent]) -> Vec<usize> {
        events
            .iter()
            .filter_map(|e| match e {
                TraceEvent::SortedMark { index } => Some(*index),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(trace(&[]).is_empty());
    }

    #[test]
    fn single_element_is_one_sorted_mark() {
        assert_eq!(trace(&[9]), vec![TraceEvent::SortedMark { index: 0 }]);
    }

    #[test]
    fn partition_shape_for_two_elements() {
        assert_eq!(
            trace(&[2, 1]),
            vec![
                TraceEvent::PivotMark { index: 1 },
                TraceEvent::Compare { i: 0, j: 1 },
                TraceEvent::Swap { i: 0, j: 1 },
                TraceEvent::SortedMark { index: 0 },
                TraceEvent::SortedMark { index: 1 },
            ]
        );
    }

    #[test]
    fn equal_to_pivot_counts_as_less_or_equal() {
        let events = trace(&[4, 4]);
        // j = 0 is swapped against the write pointer (a self-swap).
        assert_eq!(events[2], TraceEvent::Swap { i: 0, j: 0 });
    }

    #[test]
    fn one_pivot_mark_per_partition() {
        let events = trace(&[3, 1, 2]);
        let pivots = events
            .iter()
            .filter(|e| matches!(e, TraceEvent::PivotMark { .. }))
            .count();
        // [3,1,2] partitions once around 2, leaving two singletons.
        assert_eq!(pivots, 1);
    }

    #[test]
    fn every_index_marked_exactly_once() {
        let input = [5, 3, 1, 4, 2, 8, 8, 0];
        let mut marks = sorted_marks(&trace(&input));
        marks.sort_unstable();
        assert_eq!(marks, (0..input.len()).collect::<Vec<_>>());
    }

    #[test]
    fn sorts_known_input() {
        let input = [5, 3, 1, 4, 2];
        let events = trace(&input);
        assert_eq!(replay(&input, &events).unwrap().values(), &[1, 2, 3, 4, 5]);
    }
}
