//! Top-down merge sort trace.
//!
//! Merges write back from temporary buffers, so the trace uses `Overwrite`
//! rather than `Swap`. After each merge the whole merged range is re-marked
//! sorted, including indices already marked by smaller merges.

use crate::event::TraceEvent;

/// Precompute the full merge sort trace for `input`.
pub fn trace(input: &[u32]) -> Vec<TraceEvent> {
    let mut scratch = input.to_vec();
    let mut events = Vec::new();
    match scratch.len() {
        0 => {}
        1 => events.push(TraceEvent::SortedMark { index: 0 }),
        len => sort_range(&mut scratch, 0, len - 1, &|v: &u32| *v, &mut events),
    }
    events
}

/// Merge sort `(value, tag)` pairs by value with the trace's tie-break.
///
/// Tags ride along untouched, so callers can observe where equal values end up.
pub fn stable_order<T: Copy>(keys: &[(u32, T)]) -> Vec<(u32, T)> {
    let mut scratch = keys.to_vec();
    if scratch.len() > 1 {
        let right = scratch.len() - 1;
        sort_range(&mut scratch, 0, right, &|k: &(u32, T)| k.0, &mut Vec::new());
    }
    scratch
}

fn sort_range<T: Copy>(
    scratch: &mut [T],
    left: usize,
    right: usize,
    value: &impl Fn(&T) -> u32,
    events: &mut Vec<TraceEvent>,
) {
    if left < right {
        let mid = left + (right - left) / 2;
        sort_range(scratch, left, mid, value, events);
        sort_range(scratch, mid + 1, right, value, events);
        merge(scratch, left, mid, right, value, events);
    }
}

fn merge<T: Copy>(
    scratch: &mut [T],
    left: usize,
    mid: usize,
    right: usize,
    value: &impl Fn(&T) -> u32,
    events: &mut Vec<TraceEvent>,
) {
    let lower = scratch[left..=mid].to_vec();
    let upper = scratch[mid + 1..=right].to_vec();

    let (mut i, mut j, mut k) = (0, 0, left);
    while i < lower.len() && j < upper.len() {
        events.push(TraceEvent::Compare {
            i: left + i,
            j: mid + 1 + j,
        });
        // Left wins ties.
        let chosen = if value(&lower[i]) <= value(&upper[j]) {
            i += 1;
            lower[i - 1]
        } else {
            j += 1;
            upper[j - 1]
        };
        write(scratch, k, chosen, value, events);
        k += 1;
    }

    for &rest in lower[i..].iter().chain(&upper[j..]) {
        write(scratch, k, rest, value, events);
        k += 1;
    }

    events.extend((left..=right).map(|index| TraceEvent::SortedMark { index }));
}

fn write<T: Copy>(
    scratch: &mut [T],
    k: usize,
    item: T,
    value: &impl Fn(&T) -> u32,
    events: &mut Vec<TraceEvent>,
) {
    events.push(TraceEvent::Overwrite {
        index: k,
        value: value(&item),
    });
    scratch[k] = item;
}
