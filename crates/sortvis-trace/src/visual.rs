//! Per-index highlight states.

/// Highlight category attached to one array index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum VisualState {
    #[default]
    Normal,
    Comparing,
    Swapping,
    Pivot,
    Sorted,
}

impl VisualState {
    /// Whether this state is undone by a later revert.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            VisualState::Comparing | VisualState::Swapping | VisualState::Pivot
        )
    }
}

impl std::fmt::Display for VisualState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Comparing => write!(f, "comparing"),
            Self::Swapping => write!(f, "swapping"),
            Self::Pivot => write!(f, "pivot"),
            Self::Sorted => write!(f, "sorted"),
        }
    }
}

/// One [`VisualState`] per index of the array under playback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisualTable {
    states: Vec<VisualState>,
}

impl VisualTable {
    /// All-`Normal` table for an array of `len` elements.
    pub fn new(len: usize) -> Self {
        Self {
            states: vec![VisualState::Normal; len],
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<VisualState> {
        self.states.get(index).copied()
    }

    /// Set `index` to `state`. Returns false when `index` is out of range.
    pub fn set(&mut self, index: usize, state: VisualState) -> bool {
        match self.states.get_mut(index) {
            Some(slot) => {
                *slot = state;
                true
            }
            None => false,
        }
    }

    /// Put every index back to `Normal`.
    pub fn reset_all(&mut self) {
        self.states.fill(VisualState::Normal);
    }

    /// Mark every index `Sorted`.
    pub fn mark_all_sorted(&mut self) {
        self.states.fill(VisualState::Sorted);
    }

    /// Number of indices currently in `state`.
    pub fn count(&self, state: VisualState) -> usize {
        self.states.iter().filter(|s| **s == state).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = VisualState> + '_ {
        self.states.iter().copied()
    }
}
