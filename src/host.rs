use crate::ViewportState;

/// The scrollable container rows are mounted into, plus its layout facility.
///
/// The engine owns its host and talks to it only through this trait. Hosts report viewport
/// changes by calling `Engine::on_scroll`/`Engine::on_resize` on the engine that owns them;
/// [`Self::attach`] and [`Self::detach`] bracket the period during which they should.
pub trait ViewportHost {
    type Row;

    /// Whether the host sits inside a scrollable region. Checked once, by `Engine::new`.
    fn has_scroll_container(&self) -> bool;

    /// Current scroll offset and viewport size.
    fn viewport(&self) -> ViewportState;

    /// Starts listening for scroll and resize notifications.
    fn attach(&mut self) {}

    /// Stops listening for scroll and resize notifications.
    fn detach(&mut self) {}

    fn mount(&mut self, index: usize, row: &mut Self::Row, top: u64);

    fn reposition(&mut self, index: usize, row: &mut Self::Row, top: u64);

    fn unmount(&mut self, index: usize, row: &mut Self::Row);

    /// Rendered height of a mounted row.
    fn measure(&mut self, index: usize, row: &Self::Row) -> u32;

    /// Total extent of the list, so the scroll region can span every logical row.
    fn set_content_extent(&mut self, _extent: u64) {}
}
