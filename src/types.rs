/// Scroll position and size of the viewport, read fresh from the host on every render.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportState {
    pub scroll_offset: u64,
    pub viewport_size: u32,
}

impl ViewportState {
    pub fn new(scroll_offset: u64, viewport_size: u32) -> Self {
        Self {
            scroll_offset,
            viewport_size,
        }
    }

    pub fn end(&self) -> u64 {
        self.scroll_offset.saturating_add(self.viewport_size as u64)
    }
}

/// Engine lifecycle.
///
/// `Refreshing` is entered by `setup`/`refresh` and left once every row creation they
/// started has been mounted (or discarded).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Lifecycle {
    Uninitialized,
    Ready,
    Refreshing,
    Destroyed,
}

/// Handle for one outstanding row creation.
///
/// A content source that cannot build a row synchronously keeps the ticket, returns
/// [`Creation::Deferred`], and later hands the row back through `Engine::complete`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ticket {
    pub index: usize,
    pub(crate) id: u64,
}

impl Ticket {
    pub(crate) fn new(index: usize, id: u64) -> Self {
        Self { index, id }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Result of asking a content source for a row.
#[derive(Debug)]
pub enum Creation<R> {
    /// The row was built in place.
    Ready(R),
    /// The source kept the ticket and will complete it later.
    Deferred,
}

impl<R> Creation<R> {
    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred)
    }
}
