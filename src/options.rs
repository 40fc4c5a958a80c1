use crate::ValidationError;

/// Height used for rows before any row has been measured.
pub const DEFAULT_ITEM_HEIGHT: u32 = 44;

/// How far beyond the viewport rows are kept mounted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Overscan {
    /// One extra screenful above and below the viewport.
    #[default]
    Viewport,
    /// A fixed margin, in the same units as row heights.
    Fixed(u64),
}

impl Overscan {
    pub fn resolve(self, viewport_size: u32) -> u64 {
        match self {
            Self::Viewport => viewport_size as u64,
            Self::Fixed(px) => px,
        }
    }
}

/// Configuration for [`crate::Engine`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineOptions {
    /// Fallback height for unmeasured rows until the first row is measured.
    pub default_item_height: u32,
    pub overscan: Overscan,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineOptions {
    pub fn new() -> Self {
        Self {
            default_item_height: DEFAULT_ITEM_HEIGHT,
            overscan: Overscan::Viewport,
        }
    }

    pub fn with_default_item_height(mut self, height: u32) -> Self {
        self.default_item_height = height;
        self
    }

    pub fn with_overscan(mut self, overscan: Overscan) -> Self {
        self.overscan = overscan;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        if self.default_item_height == 0 {
            return Err(ValidationError::ZeroDefaultHeight);
        }
        Ok(())
    }
}
