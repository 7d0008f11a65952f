//! Page-number pagination for listings.
//!
//! Page requests come from an untrusted query string. Resolution never fails:
//! missing or garbled input selects the first page, out-of-range numbers are
//! clamped to the nearest real page, and an empty listing is one empty page.

use serde::Serialize;

/// Posts shown per page on every listing.
pub const POSTS_PER_PAGE: u64 = 10;

/// A requested page number, as supplied by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageRequest(Option<i64>);

impl PageRequest {
    /// Parse a raw `page` parameter.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self(None);
        };

        let digits = raw.strip_prefix('+').unwrap_or(raw);
        match raw.parse::<i64>() {
            Ok(n) => Self(Some(n)),
            // All digits but too large for i64: still "past the end".
            Err(_) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
                Self(Some(i64::MAX))
            }
            Err(_) => Self(None),
        }
    }

    pub fn number(n: i64) -> Self {
        Self(Some(n))
    }

    fn clamp(self, num_pages: u64) -> u64 {
        match self.0 {
            Some(n) if n > 0 => (n as u64).min(num_pages),
            _ => 1,
        }
    }
}

/// Everything a client needs to draw page controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    /// 1-based number of this page.
    pub number: u64,
    pub num_pages: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub has_previous: bool,
    pub has_next: bool,
    /// 1-based index of the first item shown, 0 when the page is empty.
    pub start_index: u64,
    /// 1-based index of the last item shown, 0 when the page is empty.
    pub end_index: u64,
}

impl PageInfo {
    /// Resolve a request against a listing of `total_items`.
    pub fn resolve(total_items: u64, page_size: u64, request: PageRequest) -> Self {
        let page_size = page_size.max(1);
        let num_pages = total_items.div_ceil(page_size).max(1);
        let number = request.clamp(num_pages);

        let offset = (number - 1) * page_size;
        let (start_index, end_index) = if total_items == 0 {
            (0, 0)
        } else {
            (offset + 1, (offset + page_size).min(total_items))
        };

        Self {
            number,
            num_pages,
            page_size,
            total_items,
            has_previous: number > 1,
            has_next: number < num_pages,
            start_index,
            end_index,
        }
    }

    /// Number of items preceding this page.
    pub fn offset(&self) -> u64 {
        (self.number - 1) * self.page_size
    }

    /// 0-based page index.
    pub fn index(&self) -> u64 {
        self.number - 1
    }
}

/// One page of a listing.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub info: PageInfo,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            info: self.info,
        }
    }
}

/// Slice an already ordered sequence.
pub fn paginate<T>(items: Vec<T>, page_size: u64, request: PageRequest) -> Page<T> {
    let info = PageInfo::resolve(items.len() as u64, page_size, request);
    let items = items
        .into_iter()
        .skip(info.offset() as usize)
        .take(info.page_size as usize)
        .collect();

    Page { items, info }
}
