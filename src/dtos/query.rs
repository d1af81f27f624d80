//! Query DTOs - Data Transfer Objects per query di paginazione

use serde::{Deserialize, Serialize};

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

/// DTO per query parameters di paginazione (?page=0&size=20)
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct PageQuery {
    #[serde(default)]
    pub page: i64,
    #[serde(default = "default_size")]
    pub size: i64,
}

fn default_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageQuery {
    /// Coppia (LIMIT, OFFSET) con size forzato in 1..=MAX_PAGE_SIZE
    /// e page negativo trattato come 0.
    pub fn limit_offset(&self) -> (i64, i64) {
        let size = self.size.clamp(1, MAX_PAGE_SIZE);
        let page = self.page.max(0);
        (size, page * size)
    }
}

/// Pagina di risultati con i metadati per il client.
#[derive(Serialize, Deserialize, Debug)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: i64,
    pub size: i64,
    pub total_elements: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, query: &PageQuery, total_elements: i64) -> Self {
        let (size, _) = query.limit_offset();
        let total_pages = if total_elements == 0 {
            0
        } else {
            (total_elements + size - 1) / size
        };
        Self {
            content,
            page: query.page.max(0),
            size,
            total_elements,
            total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}
