//! SortVis Trace Generation
//!
//! Pure trace generators for sorting visualization. Each algorithm takes a
//! snapshot of the array and describes every inspection and mutation it
//! performs as a [`TraceEvent`], working on a private copy so the caller
//! decides when real mutations are applied.
//!
//! # Algorithms
//!
//! - **Bubble**: pull-based, one adjacent comparison per step
//! - **Quick**: Lomuto partition on the last element, precomputed
//! - **Merge**: top-down with temporary buffers, precomputed, stable
//!
//! All three are exposed as a [`Trace`] iterator, so playback does not care
//! whether events were materialized up front.
//!
//! # Replay Invariant
//!
//! Applying only the `Swap` and `Overwrite` events of a trace, in order, to a
//! copy of the input yields the input sorted in non-decreasing order.
//! `Compare`, `PivotMark` and `SortedMark` only drive highlighting.
//!
//! ```
//! use sortvis_trace::{replay, Algorithm};
//!
//! let input = [5, 3, 1, 4, 2];
//! let events: Vec<_> = Algorithm::Quick.trace(&input).collect();
//! assert_eq!(replay(&input, &events).unwrap().values(), &[1, 2, 3, 4, 5]);
//! ```

mod algorithm;
mod array;
mod bubble;
mod error;
mod event;
mod visual;

pub mod merge;
pub mod quick;

pub use algorithm::{Algorithm, Trace};
pub use array::{replay, ArrayState};
pub use bubble::BubbleTrace;
pub use error::{Result, TraceError};
pub use event::{TraceEvent, TraceSummary};
pub use visual::{VisualState, VisualTable};
