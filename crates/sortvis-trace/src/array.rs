//! The live array a run mutates.

use crate::error::{Result, TraceError};
use crate::event::TraceEvent;

/// Ordered sequence of values whose length is fixed for the duration of a run.
///
/// Only values at existing indices change, through [`swap`](Self::swap) and
/// [`overwrite`](Self::overwrite). Nothing is ever inserted or removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArrayState {
    values: Vec<u32>,
}

impl ArrayState {
    /// Wrap an existing sequence.
    pub fn new(values: Vec<u32>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Borrow the current values.
    pub fn values(&self) -> &[u32] {
        &self.values
    }

    /// Value at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<u32> {
        self.values.get(index).copied()
    }

    /// Largest value currently in the array (0 when empty).
    pub fn max(&self) -> u32 {
        self.values.iter().copied().max().unwrap_or(0)
    }

    /// Bar height of `index` relative to the current maximum, in `0.0..=1.0`.
    pub fn height_of(&self, index: usize) -> f64 {
        let max = self.max();
        match self.get(index) {
            Some(value) if max > 0 => f64::from(value) / f64::from(max),
            _ => 0.0,
        }
    }

    /// Whether the values are in non-decreasing order.
    pub fn is_sorted(&self) -> bool {
        self.values.windows(2).all(|w| w[0] <= w[1])
    }

    /// Exchange the values at `i` and `j`.
    pub fn swap(&mut self, i: usize, j: usize) -> Result<()> {
        self.check(i)?;
        self.check(j)?;
        self.values.swap(i, j);
        Ok(())
    }

    /// Set `index` to `value`.
    pub fn overwrite(&mut self, index: usize, value: u32) -> Result<()> {
        self.check(index)?;
        self.values[index] = value;
        Ok(())
    }

    /// Apply a trace event. Non-mutating events only have their indices checked.
    ///
    /// Returns the indices whose value changed.
    pub fn apply(&mut self, event: &TraceEvent) -> Result<Vec<usize>> {
        match *event {
            TraceEvent::Swap { i, j } => {
                self.swap(i, j)?;
                Ok(if i == j { vec![i] } else { vec![i, j] })
            }
            TraceEvent::Overwrite { index, value } => {
                self.overwrite(index, value)?;
                Ok(vec![index])
            }
            other => {
                for index in other.indices() {
                    self.check(index)?;
                }
                Ok(Vec::new())
            }
        }
    }

    fn check(&self, index: usize) -> Result<()> {
        if index < self.values.len() {
            Ok(())
        } else {
            Err(TraceError::IndexOutOfBounds {
                index,
                len: self.values.len(),
            })
        }
    }
}

impl From<Vec<u32>> for ArrayState {
    fn from(values: Vec<u32>) -> Self {
        Self::new(values)
    }
}

/// Replay the mutation events of `events` against a copy of `input`.
///
/// `Compare`, `PivotMark` and `SortedMark` are skipped.
pub fn replay<'a>(
    input: &[u32],
    events: impl IntoIterator<Item = &'a TraceEvent>,
) -> Result<ArrayState> {
    let mut state = ArrayState::new(input.to_vec());
    for event in events.into_iter().filter(|e| e.is_mutation()) {
        state.apply(event)?;
    }
    Ok(state)
}
