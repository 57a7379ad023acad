//! Trace events emitted by the sorting algorithms.

/// One inspection or mutation step performed by a sorting algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
pub enum TraceEvent {
    /// Two indices are being compared. No mutation.
    Compare { i: usize, j: usize },

    /// The values at `i` and `j` are exchanged.
    Swap { i: usize, j: usize },

    /// Index `index` is set to `value` (merge writes from its buffers).
    Overwrite { index: usize, value: u32 },

    /// Index currently acting as the partition pivot.
    PivotMark { index: usize },

    /// Index whose value has reached its final sorted position.
    SortedMark { index: usize },
}

impl TraceEvent {
    /// Whether replaying this event changes the array.
    pub fn is_mutation(&self) -> bool {
        matches!(self, TraceEvent::Swap { .. } | TraceEvent::Overwrite { .. })
    }

    /// Indices touched by this event, in the order the event names them.
    pub fn indices(&self) -> Vec<usize> {
        match *self {
            TraceEvent::Compare { i, j } | TraceEvent::Swap { i, j } => vec![i, j],
            TraceEvent::Overwrite { index, .. }
            | TraceEvent::PivotMark { index }
            | TraceEvent::SortedMark { index } => vec![index],
        }
    }

    /// Short lowercase name, used in dispatch log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            TraceEvent::Compare { .. } => "compare",
            TraceEvent::Swap { .. } => "swap",
            TraceEvent::Overwrite { .. } => "overwrite",
            TraceEvent::PivotMark { .. } => "pivot",
            TraceEvent::SortedMark { .. } => "sorted",
        }
    }
}

/// Per-kind event counts for a trace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraceSummary {
    pub compares: usize,
    pub swaps: usize,
    pub overwrites: usize,
    pub pivots: usize,
    pub sorted_marks: usize,
}

impl TraceSummary {
    /// Tally a sequence of events.
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a TraceEvent>) -> Self {
        let mut summary = Self::default();
        for event in events {
            summary.record(event);
        }
        summary
    }

    /// Count one more event.
    pub fn record(&mut self, event: &TraceEvent) {
        match event {
            TraceEvent::Compare { .. } => self.compares += 1,
            TraceEvent::Swap { .. } => self.swaps += 1,
            TraceEvent::Overwrite { .. } => self.overwrites += 1,
            TraceEvent::PivotMark { .. } => self.pivots += 1,
            TraceEvent::SortedMark { .. } => self.sorted_marks += 1,
        }
    }

    /// Total number of events tallied.
    pub fn total(&self) -> usize {
        self.compares + self.swaps + self.overwrites + self.pivots + self.sorted_marks
    }

    /// Number of events that mutate the array.
    pub fn mutations(&self) -> usize {
        self.swaps + self.overwrites
    }
}
