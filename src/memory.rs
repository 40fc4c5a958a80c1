use alloc::collections::BTreeMap;
use alloc::sync::Arc;

use crate::{ViewportHost, ViewportState};

pub type MeasureFn<R> = Arc<dyn Fn(usize, &R) -> u32 + Send + Sync>;

/// An in-memory [`ViewportHost`].
///
/// It keeps track of which rows are mounted and where, clamps scrolling to the content extent
/// the engine reports (like a real scroll container), and measures rows with a configurable
/// function. Useful for tests and for adapters that lay rows out themselves.
pub struct MemoryHost<R> {
    viewport: ViewportState,
    scrollable: bool,
    attached: bool,
    content_extent: u64,
    mounted: BTreeMap<usize, u64>,
    measure: MeasureFn<R>,
    mounts: usize,
    unmounts: usize,
}

impl<R: 'static> MemoryHost<R> {
    /// A host whose viewport is `viewport_size` tall and whose rows all measure `row_height`.
    pub fn new(viewport_size: u32, row_height: u32) -> Self {
        Self {
            viewport: ViewportState::new(0, viewport_size),
            scrollable: true,
            attached: false,
            content_extent: 0,
            mounted: BTreeMap::new(),
            measure: Arc::new(move |_: usize, _: &R| row_height),
            mounts: 0,
            unmounts: 0,
        }
    }

    pub fn with_measure(mut self, f: impl Fn(usize, &R) -> u32 + Send + Sync + 'static) -> Self {
        self.measure = Arc::new(f);
        self
    }
}

impl<R> MemoryHost<R> {
    /// Marks the host as not being inside a scroll container.
    pub fn without_scroll_container(mut self) -> Self {
        self.scrollable = false;
        self
    }

    /// Scrolls to `offset`, clamped to the scrollable range.
    pub fn scroll_to(&mut self, offset: u64) {
        self.viewport.scroll_offset = offset.min(self.max_scroll_offset());
    }

    pub fn resize(&mut self, viewport_size: u32) {
        self.viewport.viewport_size = viewport_size;
        self.viewport.scroll_offset = self.viewport.scroll_offset.min(self.max_scroll_offset());
    }

    pub fn max_scroll_offset(&self) -> u64 {
        self.content_extent
            .saturating_sub(self.viewport.viewport_size as u64)
    }

    pub fn scroll_offset(&self) -> u64 {
        self.viewport.scroll_offset
    }

    pub fn content_extent(&self) -> u64 {
        self.content_extent
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn is_mounted(&self, index: usize) -> bool {
        self.mounted.contains_key(&index)
    }

    pub fn top_of(&self, index: usize) -> Option<u64> {
        self.mounted.get(&index).copied()
    }

    pub fn mounted_len(&self) -> usize {
        self.mounted.len()
    }

    /// Mounted indexes with their tops, in index order.
    pub fn mounted(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.mounted.iter().map(|(&i, &top)| (i, top))
    }

    /// Total number of `mount` calls so far.
    pub fn mount_count(&self) -> usize {
        self.mounts
    }

    /// Total number of `unmount` calls so far.
    pub fn unmount_count(&self) -> usize {
        self.unmounts
    }
}

impl<R> ViewportHost for MemoryHost<R> {
    type Row = R;

    fn has_scroll_container(&self) -> bool {
        self.scrollable
    }

    fn viewport(&self) -> ViewportState {
        self.viewport
    }

    fn attach(&mut self) {
        self.attached = true;
    }

    fn detach(&mut self) {
        self.attached = false;
    }

    fn mount(&mut self, index: usize, _row: &mut R, top: u64) {
        self.mounts += 1;
        self.mounted.insert(index, top);
    }

    fn reposition(&mut self, index: usize, _row: &mut R, top: u64) {
        self.mounted.insert(index, top);
    }

    fn unmount(&mut self, index: usize, _row: &mut R) {
        self.unmounts += 1;
        self.mounted.remove(&index);
    }

    fn measure(&mut self, index: usize, row: &R) -> u32 {
        (self.measure)(index, row)
    }

    fn set_content_extent(&mut self, extent: u64) {
        self.content_extent = extent;
        self.viewport.scroll_offset = self.viewport.scroll_offset.min(self.max_scroll_offset());
    }
}

impl<R> core::fmt::Debug for MemoryHost<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MemoryHost")
            .field("viewport", &self.viewport)
            .field("scrollable", &self.scrollable)
            .field("attached", &self.attached)
            .field("content_extent", &self.content_extent)
            .field("mounted", &self.mounted.len())
            .finish_non_exhaustive()
    }
}
