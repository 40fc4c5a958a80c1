use alloc::collections::BTreeMap;

/// Per-row height storage with a fallback estimate for rows that were never measured.
///
/// Only measured rows are stored, so the cache stays small no matter how many logical rows
/// the content source reports. Prefix queries ([`Self::offset_of`], [`Self::index_at_offset`])
/// walk the measured entries in index order and treat every gap between them as a run of rows
/// at the fallback height. That makes them `O(measured)` rather than `O(index)`.
#[derive(Clone, Debug)]
pub struct HeightCache {
    measured: BTreeMap<usize, u32>,
    fallback: Option<u32>,
    default_height: u32,
}

impl HeightCache {
    /// Creates an empty cache. `default_height` is clamped to at least 1.
    pub fn new(default_height: u32) -> Self {
        Self {
            measured: BTreeMap::new(),
            fallback: None,
            default_height: default_height.max(1),
        }
    }

    /// Returns the cached height for `index`, or the fallback height.
    pub fn get(&self, index: usize) -> u32 {
        self.measured
            .get(&index)
            .copied()
            .unwrap_or_else(|| self.fallback())
    }

    /// The height assumed for unmeasured rows: the first non-zero measurement, or the default.
    pub fn fallback(&self) -> u32 {
        self.fallback.unwrap_or(self.default_height)
    }

    pub fn default_height(&self) -> u32 {
        self.default_height
    }

    /// Stores a measured height.
    ///
    /// The first non-zero measurement also becomes the fallback height. A zero height is kept
    /// for that row but is not a usable estimate for the others.
    pub fn record(&mut self, index: usize, height: u32) {
        ltrace!(index, height, "HeightCache::record");
        self.measured.insert(index, height);
        if self.fallback.is_none() && height > 0 {
            ldebug!(index, height, "HeightCache: fallback established");
            self.fallback = Some(height);
        }
    }

    /// Clears the cached height for `index`. The fallback is unaffected.
    pub fn forget(&mut self, index: usize) -> Option<u32> {
        self.measured.remove(&index)
    }

    pub fn is_measured(&self, index: usize) -> bool {
        self.measured.contains_key(&index)
    }

    pub fn measured_len(&self) -> usize {
        self.measured.len()
    }

    /// Drops every measurement and the derived fallback.
    pub fn clear(&mut self) {
        self.measured.clear();
        self.fallback = None;
    }

    /// Top offset of row `index`: the sum of the heights of rows `0..index`.
    ///
    /// `offset_of(count)` is the total extent of a list of `count` rows.
    pub fn offset_of(&self, index: usize) -> u64 {
        let mut sum = 0u64;
        let mut n = 0usize;
        for (_, &h) in self.measured.range(..index) {
            sum = sum.saturating_add(h as u64);
            n += 1;
        }
        let unmeasured = (index - n) as u64;
        sum.saturating_add(unmeasured.saturating_mul(self.fallback() as u64))
    }

    /// Returns the row whose extent contains `offset`, clamped to `count - 1`.
    ///
    /// Returns `None` when `count == 0`.
    pub fn index_at_offset(&self, offset: u64, count: usize) -> Option<usize> {
        if count == 0 {
            return None;
        }
        let last = count - 1;
        let fallback = self.fallback() as u64;

        let mut index = 0usize;
        let mut top = 0u64;
        for (&measured_index, &height) in self.measured.range(..count) {
            let run = (measured_index - index) as u64;
            let run_end = top.saturating_add(run.saturating_mul(fallback));
            if offset < run_end {
                let within = (offset - top) / fallback;
                return Some(index + within as usize);
            }
            top = run_end;

            let row_end = top.saturating_add(height as u64);
            if offset < row_end {
                return Some(measured_index);
            }
            top = row_end;
            index = measured_index + 1;
        }

        let within = offset.saturating_sub(top) / fallback;
        let within = usize::try_from(within).unwrap_or(usize::MAX);
        Some(index.saturating_add(within).min(last))
    }
}
