use alloc::vec::Vec;

use crate::{HeightCache, Overscan, ViewportState};

/// A row the window requires, with its top offset.
///
/// `compute_window` fills in estimates; the engine overwrites them with the tops rows were
/// laid out at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowRow {
    pub index: usize,
    pub top: u64,
}

/// The contiguous range of rows that must be mounted for a viewport.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Window {
    pub start_index: usize,
    pub end_index: usize, // exclusive
    pub rows: Vec<WindowRow>,
    /// Estimated extent of the whole list (all rows, not only the window).
    pub content_extent: u64,
}

impl Window {
    pub fn is_empty(&self) -> bool {
        self.start_index >= self.end_index
    }

    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }

    /// First required index (inclusive).
    pub fn first(&self) -> Option<usize> {
        (!self.is_empty()).then_some(self.start_index)
    }

    /// Last required index (inclusive).
    pub fn last(&self) -> Option<usize> {
        (!self.is_empty()).then(|| self.end_index - 1)
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start_index && index < self.end_index
    }

    pub fn top_of(&self, index: usize) -> Option<u64> {
        if !self.contains(index) {
            return None;
        }
        self.rows.get(index - self.start_index).map(|r| r.top)
    }

    /// Records where row `index` actually landed once it was laid out.
    pub(crate) fn set_top(&mut self, index: usize, top: u64) {
        if !self.contains(index) {
            return;
        }
        if let Some(row) = self.rows.get_mut(index - self.start_index) {
            row.top = top;
        }
    }
}

/// Computes which rows must be mounted for `viewport`.
///
/// The window starts at the row containing `scroll_offset - overscan` and ends at the row
/// containing `scroll_offset + viewport_size + overscan`, both clamped to `0..count`. Unmeasured
/// rows are assumed to have the cache's fallback height.
///
/// - `count == 0` yields an empty window.
/// - `viewport_size == 0` still yields the row at `scroll_offset`, so it can be measured.
pub fn compute_window(
    viewport: ViewportState,
    count: usize,
    heights: &HeightCache,
    overscan: Overscan,
) -> Window {
    let content_extent = heights.offset_of(count);
    if count == 0 {
        return Window {
            content_extent,
            ..Window::default()
        };
    }

    let margin = overscan.resolve(viewport.viewport_size);
    let from = viewport.scroll_offset.saturating_sub(margin);
    let to = viewport.end().saturating_add(margin);

    let (Some(first), Some(last)) = (
        heights.index_at_offset(from, count),
        heights.index_at_offset(to, count),
    ) else {
        return Window {
            content_extent,
            ..Window::default()
        };
    };
    let last = last.max(first);

    let mut rows = Vec::with_capacity(last - first + 1);
    let mut top = heights.offset_of(first);
    for index in first..=last {
        rows.push(WindowRow { index, top });
        top = top.saturating_add(heights.get(index) as u64);
    }

    ltrace!(
        scroll_offset = viewport.scroll_offset,
        viewport_size = viewport.viewport_size,
        count,
        first,
        last,
        "compute_window"
    );

    Window {
        start_index: first,
        end_index: last + 1,
        rows,
        content_extent,
    }
}
