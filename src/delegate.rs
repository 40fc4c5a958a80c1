use crate::{Creation, Result, Ticket};

/// A user-supplied source of rows.
///
/// `count_items` and `create_item_content` are required. Every other hook has a no-op default,
/// so a source only implements what it needs.
///
/// Hooks return [`Result`]; an error raised by a source propagates unchanged to whoever
/// triggered the render pass (the engine never retries).
///
/// For a source whose capabilities can be added, replaced or removed at runtime, see
/// [`crate::DynamicSource`].
pub trait ContentSource {
    /// The row representation handed to the viewport host.
    type Row;

    /// Total number of logical rows.
    fn count_items(&mut self) -> Result<usize>;

    /// Builds the row for `index`.
    ///
    /// `template` is the delegate's reference template, if it has one. A source that builds rows
    /// asynchronously keeps `ticket`, returns [`Creation::Deferred`], and later passes the row to
    /// `Engine::complete`.
    fn create_item_content(
        &mut self,
        index: usize,
        template: Option<&Self::Row>,
        ticket: Ticket,
    ) -> Result<Creation<Self::Row>>;

    /// Called when an already mounted row stays in the window during a render pass.
    fn update_item(&mut self, _index: usize, _row: &mut Self::Row) -> Result<()> {
        Ok(())
    }

    /// Called once for every row the engine removes.
    fn destroy_item(&mut self, _index: usize, _row: &mut Self::Row) -> Result<()> {
        Ok(())
    }

    /// Called once when the engine is destroyed or the delegate is replaced.
    fn destroy(&mut self) -> Result<()> {
        Ok(())
    }

    /// A known height for `index`. When this returns `Some`, the engine records it instead of
    /// measuring the mounted row.
    fn item_height(&mut self, _index: usize) -> Option<u32> {
        None
    }
}

/// The engine's view of a [`ContentSource`].
///
/// Every call is forwarded live to the wrapped source; nothing about its capabilities is cached.
#[derive(Clone, Debug)]
pub struct ContentDelegate<S: ContentSource> {
    source: S,
    template: Option<S::Row>,
}

impl<S: ContentSource> ContentDelegate<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            template: None,
        }
    }

    /// Sets the reference template passed to every `create_item_content` call.
    pub fn with_template(mut self, template: S::Row) -> Self {
        self.template = Some(template);
        self
    }

    pub fn template(&self) -> Option<&S::Row> {
        self.template.as_ref()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    pub fn count_items(&mut self) -> Result<usize> {
        self.source.count_items()
    }

    /// Asks the source for the row at `ticket.index`.
    pub fn load_item_element(&mut self, ticket: Ticket) -> Result<Creation<S::Row>> {
        ltrace!(index = ticket.index, "ContentDelegate::load_item_element");
        self.source
            .create_item_content(ticket.index, self.template.as_ref(), ticket)
    }

    pub fn update_item(&mut self, index: usize, row: &mut S::Row) -> Result<()> {
        self.source.update_item(index, row)
    }

    pub fn destroy_item(&mut self, index: usize, row: &mut S::Row) -> Result<()> {
        self.source.destroy_item(index, row)
    }

    pub fn destroy(&mut self) -> Result<()> {
        self.source.destroy()
    }

    pub fn item_height(&mut self, index: usize) -> Option<u32> {
        self.source.item_height(index)
    }
}
