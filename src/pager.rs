//! Page-by-page browsing of raw trip records.

use crate::record::TripRecord;

pub const PAGE_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerState {
    /// No page handed out yet.
    Ready,
    /// The next page starts at this index.
    Browsing(usize),
    Exhausted,
}

/// Cursor over one dataset's records, handing out [`PAGE_SIZE`] records at a time.
///
/// Never advances on its own: the caller asks for each page.
#[derive(Debug)]
pub struct Pager<'a> {
    records: &'a [TripRecord],
    page_size: usize,
    state: PagerState,
}

impl<'a> Pager<'a> {
    pub fn new(records: &'a [TripRecord]) -> Self {
        Self::with_page_size(records, PAGE_SIZE)
    }

    pub fn with_page_size(records: &'a [TripRecord], page_size: usize) -> Self {
        Self {
            records,
            page_size: page_size.max(1),
            state: PagerState::Ready,
        }
    }

    pub fn state(&self) -> PagerState {
        self.state
    }

    pub fn is_exhausted(&self) -> bool {
        self.state == PagerState::Exhausted
    }

    /// Returns the first page and positions the cursor after it.
    pub fn first_page(&mut self) -> &'a [TripRecord] {
        self.page_from(0)
    }

    /// Returns the page at the cursor, or `None` unless currently browsing.
    pub fn next_page(&mut self) -> Option<&'a [TripRecord]> {
        match self.state {
            PagerState::Browsing(position) => Some(self.page_from(position)),
            PagerState::Ready | PagerState::Exhausted => None,
        }
    }

    fn page_from(&mut self, start: usize) -> &'a [TripRecord] {
        let records = self.records;
        let start = start.min(records.len());
        let end = (start + self.page_size).min(records.len());

        self.state = if end >= records.len() {
            PagerState::Exhausted
        } else {
            PagerState::Browsing(end)
        };

        &records[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::fixtures::trip;

    fn records(n: usize) -> Vec<TripRecord> {
        (0..n)
            .map(|i| trip("2017-01-02 08:00:00", "A", "B", i as f64))
            .collect()
    }

    fn durations(page: &[TripRecord]) -> Vec<f64> {
        page.iter().map(|r| r.trip_duration).collect()
    }

    #[test]
    fn test_first_page_then_browsing() {
        let recs = records(12);
        let mut pager = Pager::new(&recs);

        assert_eq!(pager.state(), PagerState::Ready);
        assert_eq!(durations(pager.first_page()), vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(pager.state(), PagerState::Browsing(5));

        assert_eq!(pager.next_page().unwrap().len(), 5);
        assert_eq!(pager.state(), PagerState::Browsing(10));

        assert_eq!(durations(pager.next_page().unwrap()), vec![10.0, 11.0]);
        assert!(pager.is_exhausted());
        assert!(pager.next_page().is_none());
    }

    #[test]
    fn test_short_dataset_exhausts_on_first_page() {
        let recs = records(3);
        let mut pager = Pager::new(&recs);

        assert_eq!(pager.first_page().len(), 3);
        assert!(pager.is_exhausted());
    }

    #[test]
    fn test_next_page_before_first_page() {
        let recs = records(7);
        let mut pager = Pager::new(&recs);
        assert!(pager.next_page().is_none());
        assert_eq!(pager.state(), PagerState::Ready);
    }

    #[test]
    fn test_empty_dataset() {
        let mut pager = Pager::new(&[]);
        assert!(pager.first_page().is_empty());
        assert!(pager.is_exhausted());
    }

    #[test]
    fn test_page_count_and_last_page_size() {
        for n in 1..=23 {
            let recs = records(n);
            let mut pager = Pager::new(&recs);
            let mut last = pager.first_page().len();
            let mut next_calls = 0;

            while let Some(page) = pager.next_page() {
                next_calls += 1;
                last = page.len();
            }

            assert_eq!(next_calls, n.div_ceil(PAGE_SIZE) - 1, "n = {n}");
            let expected_last = if n % PAGE_SIZE == 0 { PAGE_SIZE } else { n % PAGE_SIZE };
            assert_eq!(last, expected_last, "n = {n}");
        }
    }
}
