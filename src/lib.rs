//! A headless windowed list virtualization engine.
//!
//! Given a scrollable viewport and a content source that may describe millions of rows, the
//! [`Engine`] keeps only the rows in view (plus an overscan margin) mounted, creating and
//! destroying them as the viewport moves.
//!
//! The crate is UI-agnostic. The embedding layer provides:
//! - a [`ViewportHost`]: scroll offset and viewport size, row mounting, and row measurement
//! - a [`ContentSource`]: the row count and a way to build the row for an index
//!
//! Unmeasured rows are laid out with a fallback height (the first measured row, or
//! [`DEFAULT_ITEM_HEIGHT`]) so the window can be computed without a layout pass over every
//! row.
//!
//! Row creation may be deferred: a source returns [`Creation::Deferred`], keeps the
//! [`Ticket`], and later completes it with [`Engine::complete`]. `setup`/`refresh` return a
//! [`Completion`] that settles once every row they started has been mounted.
#![forbid(unsafe_code)]

extern crate alloc;

#[macro_use]
mod macros;

mod completion;
mod delegate;
mod dynamic;
mod engine;
mod error;
mod height_cache;
mod host;
mod memory;
mod options;
mod rendered;
mod types;
mod window;


pub use completion::Completion;
pub use delegate::{ContentDelegate, ContentSource};
pub use dynamic::{CountItemsFn, CreateItemFn, DestroyFn, DynamicSource, ItemHeightFn, ItemHookFn};
pub use engine::{Engine, FlushCallback, RenderReport};
pub use error::{Capability, Error, Result, ValidationError};
pub use height_cache::HeightCache;
pub use host::ViewportHost;
pub use memory::{MeasureFn, MemoryHost};
pub use options::{DEFAULT_ITEM_HEIGHT, EngineOptions, Overscan};
pub use rendered::{RenderedRow, RenderedSet};
pub use types::{Creation, Lifecycle, Ticket, ViewportState};
pub use window::{Window, WindowRow, compute_window};
