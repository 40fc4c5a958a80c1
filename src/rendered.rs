use alloc::collections::BTreeMap;
use alloc::vec::Vec;

/// A mounted row: the representation produced by the content source and where it sits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedRow<R> {
    pub row: R,
    /// Top offset in the scroll axis, as last applied to the host.
    pub top: u64,
}

/// The rows currently mounted in the host, keyed by index.
///
/// This is the single source of truth for what is live. Keys are kept in index order, so
/// iteration always visits rows top to bottom; rows are only ever added or removed, never
/// reordered.
#[derive(Clone, Debug)]
pub struct RenderedSet<R> {
    rows: BTreeMap<usize, RenderedRow<R>>,
}

impl<R> Default for RenderedSet<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> RenderedSet<R> {
    pub fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.rows.contains_key(&index)
    }

    pub fn get(&self, index: usize) -> Option<&RenderedRow<R>> {
        self.rows.get(&index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut RenderedRow<R>> {
        self.rows.get_mut(&index)
    }

    pub(crate) fn insert(&mut self, index: usize, row: R, top: u64) -> &mut RenderedRow<R> {
        debug_assert!(
            !self.rows.contains_key(&index),
            "RenderedSet: index {index} is already mounted"
        );
        self.rows.entry(index).or_insert(RenderedRow { row, top })
    }

    pub(crate) fn remove(&mut self, index: usize) -> Option<RenderedRow<R>> {
        self.rows.remove(&index)
    }

    /// The mounted row closest above `index`.
    pub fn last_before(&self, index: usize) -> Option<(usize, &RenderedRow<R>)> {
        self.rows.range(..index).next_back().map(|(&i, r)| (i, r))
    }

    pub(crate) fn iter_mut_after(
        &mut self,
        index: usize,
    ) -> impl Iterator<Item = (usize, &mut RenderedRow<R>)> + '_ {
        self.rows
            .range_mut(index.saturating_add(1)..)
            .map(|(&i, r)| (i, r))
    }

    pub fn first_index(&self) -> Option<usize> {
        self.rows.keys().next().copied()
    }

    pub fn last_index(&self) -> Option<usize> {
        self.rows.keys().next_back().copied()
    }

    /// Mounted indexes in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &RenderedRow<R>)> + '_ {
        self.rows.iter().map(|(&i, r)| (i, r))
    }

    /// Mounted indexes that fall outside `start..end`.
    pub fn indices_outside(&self, start: usize, end: usize) -> Vec<usize> {
        let mut out: Vec<usize> = self.rows.range(..start).map(|(&i, _)| i).collect();
        if end > start {
            out.extend(self.rows.range(end..).map(|(&i, _)| i));
        } else {
            out.extend(self.rows.range(start..).map(|(&i, _)| i));
        }
        out
    }

    /// Returns `true` when the mounted indexes form one gap-free run (or the set is empty).
    pub fn is_contiguous(&self) -> bool {
        match (self.first_index(), self.last_index()) {
            (Some(first), Some(last)) => last - first + 1 == self.rows.len(),
            _ => true,
        }
    }
}
