//! Algorithm selection and the unified trace sequence.

use std::str::FromStr;

use crate::bubble::BubbleTrace;
use crate::event::TraceEvent;
use crate::{merge, quick};

/// The sorting algorithms that can be visualized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Algorithm {
    #[default]
    Bubble,
    Quick,
    Merge,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::Bubble, Algorithm::Quick, Algorithm::Merge];

    /// Build the trace for `input`. The input itself is never touched.
    pub fn trace(&self, input: &[u32]) -> Trace {
        match self {
            Algorithm::Bubble => Trace::Bubble(BubbleTrace::new(input)),
            Algorithm::Quick => Trace::Recorded(quick::trace(input).into_iter()),
            Algorithm::Merge => Trace::Recorded(merge::trace(input).into_iter()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Bubble => "bubble",
            Algorithm::Quick => "quick",
            Algorithm::Merge => "merge",
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bubble" => Ok(Algorithm::Bubble),
            "quick" | "quicksort" => Ok(Algorithm::Quick),
            "merge" | "mergesort" => Ok(Algorithm::Merge),
            other => Err(format!("unknown algorithm: {other}")),
        }
    }
}

/// A finite sequence of trace events.
///
/// Bubble sort produces its events on demand; quick and merge sort replay a
/// precomputed buffer. Consumers see the same iterator either way. Cloning a
/// trace before consuming it gives an independent replay of the same events.
#[derive(Debug, Clone)]
pub enum Trace {
    Bubble(BubbleTrace),
    Recorded(std::vec::IntoIter<TraceEvent>),
}

impl Trace {
    /// Whether events are generated on demand.
    pub fn is_lazy(&self) -> bool {
        matches!(self, Trace::Bubble(_))
    }
}

impl Iterator for Trace {
    type Item = TraceEvent;

    fn next(&mut self) -> Option<TraceEvent> {
        match self {
            Trace::Bubble(trace) => trace.next(),
            Trace::Recorded(events) => events.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Trace::Bubble(trace) => trace.size_hint(),
            Trace::Recorded(events) => events.size_hint(),
        }
    }
}
