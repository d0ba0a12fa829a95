use async_graphql::{OutputType, SimpleObject};
use serde::Serialize;

use crate::models::{Agreement, ModificationRequest};

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// One page of a filtered collection. `total` and `total_pages` describe the
/// whole filtered set, not the page.
#[derive(SimpleObject, Clone, Debug, PartialEq, Serialize)]
#[graphql(concrete(name = "AgreementPage", params(Agreement)))]
#[graphql(concrete(name = "ModificationRequestPage", params(ModificationRequest)))]
#[serde(rename_all = "camelCase")]
pub struct Page<T: OutputType> {
    pub data: Vec<T>,
    pub total: i32,
    pub page: i32,
    pub page_size: i32,
    pub total_pages: i32,
}

impl<T: OutputType> Page<T> {
    /// Slices `items` into the requested page. Page numbers start at 1; both
    /// arguments are clamped to at least 1.
    pub fn paginate(items: Vec<T>, page: usize, page_size: usize) -> Self {
        let page = page.max(1);
        let page_size = page_size.max(1);
        let total = items.len();
        let start = (page - 1).saturating_mul(page_size);

        let data = items.into_iter().skip(start).take(page_size).collect();

        Self {
            data,
            total: total as i32,
            page: page as i32,
            page_size: page_size as i32,
            total_pages: total.div_ceil(page_size) as i32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_length_follows_remaining_items() {
        let items: Vec<String> = (0..23).map(|i| i.to_string()).collect();

        for (page, expected) in [(1, 10), (2, 10), (3, 3), (4, 0)] {
            let result = Page::paginate(items.clone(), page, 10);
            assert_eq!(result.data.len(), expected, "page {}", page);
            assert_eq!(result.total, 23);
            assert_eq!(result.total_pages, 3);
        }
    }

    #[test]
    fn empty_set_has_no_pages() {
        let result = Page::<String>::paginate(vec![], 1, 10);
        assert!(result.data.is_empty());
        assert_eq!(result.total_pages, 0);
    }

    #[test]
    fn zero_arguments_are_clamped() {
        let items: Vec<String> = (0..5).map(|i| i.to_string()).collect();
        let result = Page::paginate(items, 0, 0);
        assert_eq!(result.page, 1);
        assert_eq!(result.page_size, 1);
        assert_eq!(result.data, vec!["0".to_string()]);
        assert_eq!(result.total_pages, 5);
    }
}
