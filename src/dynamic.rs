use alloc::sync::Arc;

use crate::{Capability, ContentSource, Creation, Error, Result, Ticket};

pub type CountItemsFn = Arc<dyn Fn() -> usize + Send + Sync>;

/// Builds a row. Receives the index, the delegate's template (if any) and the creation ticket.
pub type CreateItemFn<R> = Arc<dyn Fn(usize, Option<&R>, Ticket) -> Creation<R> + Send + Sync>;

pub type ItemHookFn<R> = Arc<dyn Fn(usize, &mut R) + Send + Sync>;

pub type DestroyFn = Arc<dyn Fn() + Send + Sync>;

pub type ItemHeightFn = Arc<dyn Fn(usize) -> Option<u32> + Send + Sync>;

/// A content source assembled from optional callbacks.
///
/// Every capability is an optional slot that can be filled, replaced or cleared at any time,
/// including while an engine is using the source (through `Engine::delegate_mut`). Missing
/// required slots are reported lazily: `count_items`/`create_item_content` fail with
/// [`Error::Configuration`] on the call that needs them, and succeed as soon as the slot is
/// filled. Missing optional slots are no-ops.
///
/// `DynamicSource::default()` has no capabilities at all.
pub struct DynamicSource<R> {
    pub count_items: Option<CountItemsFn>,
    pub create_item_content: Option<CreateItemFn<R>>,
    pub update_item: Option<ItemHookFn<R>>,
    pub destroy_item: Option<ItemHookFn<R>>,
    pub destroy: Option<DestroyFn>,
    pub item_height: Option<ItemHeightFn>,
}

impl<R> Default for DynamicSource<R> {
    fn default() -> Self {
        Self {
            count_items: None,
            create_item_content: None,
            update_item: None,
            destroy_item: None,
            destroy: None,
            item_height: None,
        }
    }
}

impl<R> Clone for DynamicSource<R> {
    fn clone(&self) -> Self {
        Self {
            count_items: self.count_items.clone(),
            create_item_content: self.create_item_content.clone(),
            update_item: self.update_item.clone(),
            destroy_item: self.destroy_item.clone(),
            destroy: self.destroy.clone(),
            item_height: self.item_height.clone(),
        }
    }
}

impl<R: 'static> DynamicSource<R> {
    /// Creates a source with the two required capabilities. Rows are built synchronously.
    pub fn new(
        count_items: impl Fn() -> usize + Send + Sync + 'static,
        create_item_content: impl Fn(usize, Option<&R>) -> R + Send + Sync + 'static,
    ) -> Self {
        Self::default()
            .with_count_items(count_items)
            .with_create_item_content(create_item_content)
    }

    pub fn with_count_items(mut self, f: impl Fn() -> usize + Send + Sync + 'static) -> Self {
        self.set_count_items(Some(f));
        self
    }

    pub fn with_create_item_content(
        mut self,
        f: impl Fn(usize, Option<&R>) -> R + Send + Sync + 'static,
    ) -> Self {
        self.create_item_content = Some(Arc::new(
            move |i: usize, template: Option<&R>, _ticket: Ticket| Creation::Ready(f(i, template)),
        ));
        self
    }

    /// Sets a creation callback that may defer: it receives the [`Ticket`] and can return
    /// [`Creation::Deferred`] to complete the row later.
    pub fn with_deferred_create(
        mut self,
        f: impl Fn(usize, Option<&R>, Ticket) -> Creation<R> + Send + Sync + 'static,
    ) -> Self {
        self.set_create_item_content(Some(f));
        self
    }

    pub fn with_update_item(mut self, f: impl Fn(usize, &mut R) + Send + Sync + 'static) -> Self {
        self.set_update_item(Some(f));
        self
    }

    pub fn with_destroy_item(mut self, f: impl Fn(usize, &mut R) + Send + Sync + 'static) -> Self {
        self.set_destroy_item(Some(f));
        self
    }

    pub fn with_destroy(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.set_destroy(Some(f));
        self
    }

    pub fn with_item_height(
        mut self,
        f: impl Fn(usize) -> Option<u32> + Send + Sync + 'static,
    ) -> Self {
        self.set_item_height(Some(f));
        self
    }

    pub fn set_count_items(&mut self, f: Option<impl Fn() -> usize + Send + Sync + 'static>) {
        self.count_items = f.map(|f| Arc::new(f) as _);
    }

    pub fn set_create_item_content(
        &mut self,
        f: Option<impl Fn(usize, Option<&R>, Ticket) -> Creation<R> + Send + Sync + 'static>,
    ) {
        self.create_item_content = f.map(|f| Arc::new(f) as _);
    }

    pub fn set_update_item(&mut self, f: Option<impl Fn(usize, &mut R) + Send + Sync + 'static>) {
        self.update_item = f.map(|f| Arc::new(f) as _);
    }

    pub fn set_destroy_item(&mut self, f: Option<impl Fn(usize, &mut R) + Send + Sync + 'static>) {
        self.destroy_item = f.map(|f| Arc::new(f) as _);
    }

    pub fn set_destroy(&mut self, f: Option<impl Fn() + Send + Sync + 'static>) {
        self.destroy = f.map(|f| Arc::new(f) as _);
    }

    pub fn set_item_height(
        &mut self,
        f: Option<impl Fn(usize) -> Option<u32> + Send + Sync + 'static>,
    ) {
        self.item_height = f.map(|f| Arc::new(f) as _);
    }

    /// Returns `true` if both required capabilities are present.
    pub fn is_complete(&self) -> bool {
        self.count_items.is_some() && self.create_item_content.is_some()
    }
}

impl<R> ContentSource for DynamicSource<R> {
    type Row = R;

    fn count_items(&mut self) -> Result<usize> {
        let f = self
            .count_items
            .as_ref()
            .ok_or(Error::Configuration(Capability::CountItems))?;
        Ok(f())
    }

    fn create_item_content(
        &mut self,
        index: usize,
        template: Option<&R>,
        ticket: Ticket,
    ) -> Result<Creation<R>> {
        let f = self
            .create_item_content
            .as_ref()
            .ok_or(Error::Configuration(Capability::CreateItemContent))?;
        Ok(f(index, template, ticket))
    }

    fn update_item(&mut self, index: usize, row: &mut R) -> Result<()> {
        if let Some(f) = &self.update_item {
            f(index, row);
        }
        Ok(())
    }

    fn destroy_item(&mut self, index: usize, row: &mut R) -> Result<()> {
        if let Some(f) = &self.destroy_item {
            f(index, row);
        }
        Ok(())
    }

    fn destroy(&mut self) -> Result<()> {
        if let Some(f) = &self.destroy {
            f();
        }
        Ok(())
    }

    fn item_height(&mut self, index: usize) -> Option<u32> {
        self.item_height.as_ref().and_then(|f| f(index))
    }
}

impl<R> core::fmt::Debug for DynamicSource<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DynamicSource")
            .field("count_items", &self.count_items.is_some())
            .field("create_item_content", &self.create_item_content.is_some())
            .field("update_item", &self.update_item.is_some())
            .field("destroy_item", &self.destroy_item.is_some())
            .field("destroy", &self.destroy.is_some())
            .field("item_height", &self.item_height.is_some())
            .finish()
    }
}
