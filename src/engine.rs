use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::mem;

use crate::completion::Settle;
use crate::window::compute_window;
use crate::{
    Completion, ContentDelegate, ContentSource, Creation, EngineOptions, Error, HeightCache,
    Lifecycle, RenderedSet, Result, Ticket, ValidationError, ViewportHost, Window,
};

/// Runs once the creation work of a render pass has been flushed.
pub type FlushCallback<S, H> = Box<dyn FnOnce(&Engine<S, H>)>;

/// What a single render pass did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderReport {
    /// Rows created and mounted synchronously.
    pub created: usize,
    /// Rows whose creation was deferred by the content source.
    pub deferred: usize,
    /// Rows already mounted that stayed in the window.
    pub updated: usize,
    /// Rows removed because they left the window.
    pub removed: usize,
    /// Outstanding deferred creations dropped because their row left the window.
    pub cancelled: usize,
}

/// Single-flight state of `setup`/`refresh`.
#[derive(Debug)]
enum Flight {
    Idle,
    InFlight(Settle),
}

/// A windowed list virtualization engine.
///
/// The engine owns a [`ViewportHost`] and a [`ContentDelegate`]. On every render pass it reads
/// the viewport, computes the [`Window`] of rows that must be mounted, and reconciles the
/// [`RenderedSet`] against it:
///
/// 1. Rows that left the window are unmounted, passed to `destroy_item`, their cached height
///    is forgotten, and they are dropped.
/// 2. Rows that stayed are repositioned and passed to `update_item`. They keep their
///    representation; mounted rows are never reordered or rebuilt.
/// 3. Missing rows are requested from the content source, mounted, and measured.
///
/// Scroll and resize notifications ([`Self::on_scroll`], [`Self::on_resize`]) render directly.
/// [`Self::setup`] and [`Self::refresh`] are single-flight: while one is waiting for deferred
/// creations, another is rejected with [`Error::Concurrency`].
///
/// Deferred creations are completed with [`Self::complete`]. A completion whose ticket is no
/// longer outstanding (its row left the window, or the engine was reset) is discarded: the row
/// goes to `destroy_item` and is never mounted.
pub struct Engine<S, H>
where
    S: ContentSource,
    H: ViewportHost<Row = S::Row>,
{
    host: H,
    delegate: ContentDelegate<S>,
    options: EngineOptions,
    heights: HeightCache,
    rendered: RenderedSet<S::Row>,
    /// Outstanding deferred creations: index → ticket id.
    pending: BTreeMap<usize, u64>,
    next_ticket: u64,
    count: usize,
    window: Window,
    lifecycle: Lifecycle,
    flight: Flight,
    ready: Completion,
    on_flushed: Vec<FlushCallback<S, H>>,
}

impl<S, H> Engine<S, H>
where
    S: ContentSource,
    H: ViewportHost<Row = S::Row>,
{
    /// Validates the host, attaches it, and runs the initial [`Self::setup`].
    ///
    /// Fails with [`Error::Validation`] if the host is not inside a scroll container or the
    /// options are invalid. Errors from the initial render are returned as-is.
    pub fn new(host: H, delegate: ContentDelegate<S>, options: EngineOptions) -> Result<Self> {
        options.validate()?;
        if !host.has_scroll_container() {
            return Err(ValidationError::NoScrollContainer.into());
        }
        ldebug!(
            default_item_height = options.default_item_height,
            "Engine::new"
        );

        let mut engine = Self {
            host,
            delegate,
            heights: HeightCache::new(options.default_item_height),
            options,
            rendered: RenderedSet::new(),
            pending: BTreeMap::new(),
            next_ticket: 0,
            count: 0,
            window: Window::default(),
            lifecycle: Lifecycle::Uninitialized,
            flight: Flight::Idle,
            ready: Completion::settled(Ok(())),
            on_flushed: Vec::new(),
        };
        engine.host.attach();
        match engine.setup() {
            Ok(ready) => engine.ready = ready,
            Err(e) => {
                engine.host.detach();
                return Err(e);
            }
        }
        Ok(engine)
    }

    /// Settles once the initial render has mounted all of its rows.
    pub fn ready(&self) -> Completion {
        self.ready.clone()
    }

    /// Removes every mounted row and renders from scratch.
    ///
    /// Returns [`Error::Concurrency`] if a setup or refresh is still in flight.
    pub fn setup(&mut self) -> Result<Completion> {
        self.ensure_alive()?;
        if self.is_refreshing() {
            return Err(Error::Concurrency);
        }
        ldebug!(rendered = self.rendered.len(), "Engine::setup");
        self.remove_all_elements()?;
        self.pending.clear();
        self.run_flight()
    }

    /// Re-renders on demand, e.g. after the content source's data changed.
    ///
    /// Returns [`Error::Concurrency`] if a setup or refresh is still in flight. Otherwise the
    /// returned [`Completion`] settles once every row this refresh created has been mounted.
    pub fn refresh(&mut self) -> Result<Completion> {
        self.ensure_alive()?;
        if self.is_refreshing() {
            ldebug!("Engine::refresh rejected: already running");
            return Err(Error::Concurrency);
        }
        ldebug!(rendered = self.rendered.len(), "Engine::refresh");
        self.run_flight()
    }

    /// Tears the engine down.
    ///
    /// Every mounted row goes to `destroy_item` exactly once, the host is detached, and the
    /// delegate's `destroy` hook runs once. Outstanding completions are settled with
    /// [`Error::Cancelled`]. Calling this twice returns [`Error::Destroyed`].
    pub fn destroy(&mut self) -> Result<()> {
        self.ensure_alive()?;
        ldebug!(rendered = self.rendered.len(), "Engine::destroy");
        let removed = self.remove_all_elements();
        self.cancel_pending();
        self.host.detach();
        let destroyed = self.delegate.destroy();
        self.on_flushed.clear();
        self.lifecycle = Lifecycle::Destroyed;
        removed.and(destroyed)
    }

    /// Replaces the content delegate and renders from scratch with the new one.
    ///
    /// The old delegate sees `destroy_item` for each mounted row and then its `destroy` hook.
    /// Outstanding completions are settled with [`Error::Cancelled`].
    pub fn set_delegate(&mut self, delegate: ContentDelegate<S>) -> Result<Completion> {
        self.ensure_alive()?;
        ldebug!(rendered = self.rendered.len(), "Engine::set_delegate");
        let removed = self.remove_all_elements();
        self.cancel_pending();
        let mut old = mem::replace(&mut self.delegate, delegate);
        let destroyed = old.destroy();
        removed.and(destroyed)?;
        self.heights.clear();
        self.run_flight()
    }

    /// Handles a scroll notification from the host.
    pub fn on_scroll(&mut self) -> Result<()> {
        self.on_change()
    }

    /// Handles a resize notification from the host.
    pub fn on_resize(&mut self) -> Result<()> {
        self.on_change()
    }

    /// Re-renders for the host's current viewport. Bypasses the single-flight gate.
    pub fn on_change(&mut self) -> Result<()> {
        self.render().map(|_| ())
    }

    /// Runs one render pass against the current viewport.
    pub fn render(&mut self) -> Result<RenderReport> {
        self.ensure_alive()?;
        let report = self.render_pass()?;
        self.settle_if_flushed();
        Ok(report)
    }

    /// Runs one render pass and calls `on_flushed` once its creation work has been flushed:
    /// immediately if every row was built synchronously, otherwise after the last outstanding
    /// creation completes.
    pub fn render_then(
        &mut self,
        on_flushed: impl FnOnce(&Self) + 'static,
    ) -> Result<RenderReport> {
        self.ensure_alive()?;
        self.on_flushed.push(Box::new(on_flushed));
        self.render()
    }

    /// Hands back a row whose creation was deferred.
    ///
    /// Returns `Ok(true)` if the row was mounted, `Ok(false)` if the ticket was stale and the
    /// row was discarded through `destroy_item`.
    pub fn complete(&mut self, ticket: Ticket, row: S::Row) -> Result<bool> {
        self.ensure_alive()?;
        let index = ticket.index;
        if self.pending.get(&index) != Some(&ticket.id) {
            ldebug!(index, ticket = ticket.id, "Engine::complete: stale ticket discarded");
            let mut row = row;
            self.delegate.destroy_item(index, &mut row)?;
            return Ok(false);
        }
        self.pending.remove(&index);

        let top = self.top_for(index);
        ltrace!(index, top, "Engine::complete");
        self.mount(index, row, top);
        self.window.set_top(index, top);
        self.reflow_after(index);
        self.host
            .set_content_extent(self.heights.offset_of(self.count));
        self.settle_if_flushed();
        Ok(true)
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Whether a setup or refresh is waiting for deferred creations.
    pub fn is_refreshing(&self) -> bool {
        matches!(self.flight, Flight::InFlight(_))
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn rendered(&self) -> &RenderedSet<S::Row> {
        &self.rendered
    }

    pub fn heights(&self) -> &HeightCache {
        &self.heights
    }

    /// Height used for `index`: its measurement if mounted and measured, else the fallback.
    pub fn item_height(&self, index: usize) -> u32 {
        self.heights.get(index)
    }

    /// Asks the content source for its current row count.
    pub fn count_items(&mut self) -> Result<usize> {
        self.delegate.count_items()
    }

    /// The window of the last render pass, with the tops its rows were laid out at.
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Number of outstanding deferred creations.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, index: usize) -> bool {
        self.pending.contains_key(&index)
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn delegate(&self) -> &ContentDelegate<S> {
        &self.delegate
    }

    /// Mutable access to the delegate, e.g. to swap a [`crate::DynamicSource`] capability.
    pub fn delegate_mut(&mut self) -> &mut ContentDelegate<S> {
        &mut self.delegate
    }

    fn ensure_alive(&self) -> Result<()> {
        if self.lifecycle == Lifecycle::Destroyed {
            return Err(Error::Destroyed);
        }
        Ok(())
    }

    fn run_flight(&mut self) -> Result<Completion> {
        let (completion, settle) = Completion::pending();
        self.flight = Flight::InFlight(settle);
        self.lifecycle = Lifecycle::Refreshing;

        if let Err(e) = self.render_pass() {
            lwarn!(error = %e, "render pass failed; completion rejected");
            if let Flight::InFlight(c) = mem::replace(&mut self.flight, Flight::Idle) {
                c.settle(Err(e.clone()));
            }
            self.lifecycle = Lifecycle::Ready;
            return Err(e);
        }
        self.settle_if_flushed();
        Ok(completion)
    }

    /// Once nothing is outstanding: settles the in-flight completion and runs flush callbacks.
    fn settle_if_flushed(&mut self) {
        if !self.pending.is_empty() {
            return;
        }
        if let Flight::InFlight(c) = mem::replace(&mut self.flight, Flight::Idle) {
            c.settle(Ok(()));
            self.lifecycle = Lifecycle::Ready;
        }
        for f in mem::take(&mut self.on_flushed) {
            f(self);
        }
    }

    /// Drops all outstanding creations; an in-flight completion is settled as cancelled.
    fn cancel_pending(&mut self) {
        self.pending.clear();
        if let Flight::InFlight(c) = mem::replace(&mut self.flight, Flight::Idle) {
            c.settle(Err(Error::Cancelled));
        }
        if self.lifecycle == Lifecycle::Refreshing {
            self.lifecycle = Lifecycle::Ready;
        }
    }

    fn render_pass(&mut self) -> Result<RenderReport> {
        let count = self.delegate.count_items()?;
        self.count = count;
        let viewport = self.host.viewport();
        let mut window = compute_window(viewport, count, &self.heights, self.options.overscan);
        let mut report = RenderReport::default();

        for index in self
            .rendered
            .indices_outside(window.start_index, window.end_index)
        {
            self.remove_element(index)?;
            report.removed += 1;
        }
        let before = self.pending.len();
        self.pending.retain(|&index, _| window.contains(index));
        report.cancelled = before - self.pending.len();

        // Tops are re-derived from fresh heights as rows get measured during the pass.
        let mut top = window.rows.first().map_or(0, |r| r.top);
        for index in window.start_index..window.end_index {
            if let Some(rendered) = self.rendered.get_mut(index) {
                if rendered.top != top {
                    self.host.reposition(index, &mut rendered.row, top);
                    rendered.top = top;
                }
                self.delegate.update_item(index, &mut rendered.row)?;
                report.updated += 1;
            } else if !self.pending.contains_key(&index) {
                if self.render_element(index, top)? {
                    report.created += 1;
                } else {
                    report.deferred += 1;
                }
            }
            window.set_top(index, top);
            top = top.saturating_add(self.heights.get(index) as u64);
        }

        self.host.set_content_extent(self.heights.offset_of(count));
        ltrace!(
            first = window.start_index,
            end = window.end_index,
            created = report.created,
            deferred = report.deferred,
            updated = report.updated,
            removed = report.removed,
            "Engine::render_pass"
        );
        self.window = window;
        Ok(report)
    }

    /// Requests the row at `index`. Returns `true` if it was mounted, `false` if deferred.
    pub(crate) fn render_element(&mut self, index: usize, top: u64) -> Result<bool> {
        let ticket = Ticket::new(index, self.next_ticket);
        self.next_ticket += 1;
        self.pending.insert(index, ticket.id);

        match self.delegate.load_item_element(ticket) {
            Ok(Creation::Ready(row)) => {
                self.pending.remove(&index);
                self.mount(index, row, top);
                Ok(true)
            }
            Ok(Creation::Deferred) => Ok(false),
            Err(e) => {
                self.pending.remove(&index);
                Err(e)
            }
        }
    }

    /// Top for a row mounted outside a render pass: directly below its nearest mounted
    /// predecessor, or at its estimated offset when nothing above it is mounted.
    fn top_for(&self, index: usize) -> u64 {
        match self.rendered.last_before(index) {
            Some((prev, rendered)) => rendered.top.saturating_add(
                self.heights
                    .offset_of(index)
                    .saturating_sub(self.heights.offset_of(prev)),
            ),
            None => self.heights.offset_of(index),
        }
    }

    /// Moves the mounted rows after `index` so each sits directly below the one before it.
    fn reflow_after(&mut self, index: usize) {
        let Some(anchor) = self.rendered.get(index) else {
            return;
        };
        let (mut prev, mut top) = (index, anchor.top);
        for (i, rendered) in self.rendered.iter_mut_after(index) {
            top = top.saturating_add(
                self.heights
                    .offset_of(i)
                    .saturating_sub(self.heights.offset_of(prev)),
            );
            if rendered.top != top {
                ltrace!(index = i, from = rendered.top, to = top, "Engine::reflow_after");
                self.host.reposition(i, &mut rendered.row, top);
                rendered.top = top;
                self.window.set_top(i, top);
            }
            prev = i;
        }
    }

    fn mount(&mut self, index: usize, row: S::Row, top: u64) {
        let rendered = self.rendered.insert(index, row, top);
        self.host.mount(index, &mut rendered.row, top);
        let height = match self.delegate.item_height(index) {
            Some(h) => h,
            None => self.host.measure(index, &rendered.row),
        };
        self.heights.record(index, height);
    }

    /// Unmounts and destroys the row at `index`.
    ///
    /// The row is still in the rendered set while `destroy_item` runs; it is removed afterwards
    /// even if the hook fails.
    pub(crate) fn remove_element(&mut self, index: usize) -> Result<()> {
        let Some(rendered) = self.rendered.get_mut(index) else {
            return Ok(());
        };
        self.host.unmount(index, &mut rendered.row);
        let destroyed = self.delegate.destroy_item(index, &mut rendered.row);
        self.heights.forget(index);
        self.rendered.remove(index);
        destroyed
    }

    /// Removes every mounted row. All rows are removed; the first hook error is returned.
    pub(crate) fn remove_all_elements(&mut self) -> Result<()> {
        let indices: Vec<usize> = self.rendered.indices().collect();
        let mut result = Ok(());
        for index in indices {
            let removed = self.remove_element(index);
            if result.is_ok() {
                result = removed;
            }
        }
        result
    }
}

impl<S, H> core::fmt::Debug for Engine<S, H>
where
    S: ContentSource,
    H: ViewportHost<Row = S::Row>,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Engine")
            .field("options", &self.options)
            .field("lifecycle", &self.lifecycle)
            .field("count", &self.count)
            .field("rendered", &self.rendered.len())
            .field("pending", &self.pending.len())
            .field("window", &(self.window.start_index..self.window.end_index))
            .finish_non_exhaustive()
    }
}
