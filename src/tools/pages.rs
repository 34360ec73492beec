//! Site page tools

use serde::Serialize;

use crate::site::Page;

#[derive(Debug, Serialize)]
pub struct PageSummary {
    pub id: Page,
    pub title: &'static str,
    pub path: &'static str,
}

impl From<Page> for PageSummary {
    fn from(page: Page) -> Self {
        Self {
            id: page,
            title: page.title(),
            path: page.path(),
        }
    }
}

/// Response for list_pages
#[derive(Debug, Serialize)]
pub struct ListPagesResponse {
    pub pages: Vec<PageSummary>,
    pub total: usize,
}

pub fn list_pages() -> ListPagesResponse {
    let pages: Vec<PageSummary> = Page::ALL.into_iter().map(PageSummary::from).collect();
    ListPagesResponse {
        total: pages.len(),
        pages,
    }
}

/// Resolve a path to its page, for clients following a link
pub fn resolve_page(path: &str) -> Result<PageSummary, String> {
    Page::from_path(path)
        .map(PageSummary::from)
        .ok_or_else(|| format!("No page at path: '{}'", path))
}
