use super::model::ProjectRecord;

// ---------------------------------------------------------------------------
// Pagination – fixed-size pages over a record slice
// ---------------------------------------------------------------------------

/// Pagination cursor.  `current_page` is 1-indexed and always clamped into
/// `[1, total_pages]`; `page_size` is fixed for the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    page_size: usize,
    pub current_page: usize,
}

/// `max(1, ceil(len / page_size))` – an empty table still has one page.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size).max(1)
}

impl PageState {
    /// Start on page 1.  `page_size` of 0 is lifted to 1 so the arithmetic
    /// below stays total.
    pub fn new(page_size: usize) -> Self {
        PageState {
            page_size: page_size.max(1),
            current_page: 1,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Clamp `current_page` to the page range of a table with `len` rows.
    /// Self-healing after a filter change shrinks the row count.
    pub fn reclamp(&mut self, len: usize) -> usize {
        let total = total_pages(len, self.page_size);
        self.current_page = self.current_page.clamp(1, total);
        total
    }

    /// Advance one page, saturating at the last page.  A no-op at the end,
    /// never an error.
    pub fn next(&mut self, len: usize) {
        let total = self.reclamp(len);
        if self.current_page < total {
            self.current_page += 1;
        }
    }

    /// Step back one page, saturating at page 1.
    pub fn previous(&mut self) {
        if self.current_page > 1 {
            self.current_page -= 1;
        }
    }

    /// Back to page 1.
    pub fn reset(&mut self) {
        self.current_page = 1;
    }
}

/// Slice the current page out of `records`, reclamping the cursor first.
/// Returns the page and the total page count.
pub fn page<'a>(records: &'a [ProjectRecord], state: &mut PageState) -> (&'a [ProjectRecord], usize) {
    let total = state.reclamp(records.len());
    let start = (state.current_page - 1) * state.page_size;
    let end = (start + state.page_size).min(records.len());
    let start = start.min(records.len());
    (&records[start..end], total)
}
