//! Bubble sort as a pull-based trace.
//!
//! One pull is one comparison of an adjacent pair, optionally followed by the
//! swap it causes. The cursor `(pass, j, end)` is advanced lazily, so nothing
//! beyond the next event is computed ahead of playback.

use crate::event::TraceEvent;

/// Lazily generated bubble sort trace over a private copy of the input.
#[derive(Debug, Clone)]
pub struct BubbleTrace {
    scratch: Vec<u32>,
    pass: usize,
    j: usize,
    end: usize,
    pending_swap: Option<TraceEvent>,
    done: bool,
}

impl BubbleTrace {
    pub fn new(input: &[u32]) -> Self {
        Self {
            scratch: input.to_vec(),
            pass: 0,
            j: 0,
            end: input.len().saturating_sub(1),
            pending_swap: None,
            done: input.is_empty(),
        }
    }

    /// Current cursor as `(pass, j, end)`.
    pub fn position(&self) -> (usize, usize, usize) {
        (self.pass, self.j, self.end)
    }

    /// Whether every event has been pulled.
    pub fn is_exhausted(&self) -> bool {
        self.done && self.pending_swap.is_none()
    }
}

impl Iterator for BubbleTrace {
    type Item = TraceEvent;

    fn next(&mut self) -> Option<TraceEvent> {
        if let Some(swap) = self.pending_swap.take() {
            return Some(swap);
        }
        if self.done {
            return None;
        }

        // The boundary reached the front: index 0 is the last one settled.
        if self.end == 0 {
            self.done = true;
            return Some(TraceEvent::SortedMark { index: 0 });
        }

        if self.j < self.end {
            let j = self.j;
            self.j += 1;
            if self.scratch[j] > self.scratch[j + 1] {
                self.scratch.swap(j, j + 1);
                self.pending_swap = Some(TraceEvent::Swap { i: j, j: j + 1 });
            }
            return Some(TraceEvent::Compare { i: j, j: j + 1 });
        }

        let settled = self.end;
        self.end -= 1;
        self.pass += 1;
        self.j = 0;
        Some(TraceEvent::SortedMark { index: settled })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.is_exhausted() {
            (0, Some(0))
        } else {
            (usize::from(self.pending_swap.is_some()).max(1), None)
        }
    }
}
