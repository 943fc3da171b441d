use serde::{Deserialize, Serialize};

/// One page of results as the backend reports it. Spring's `Page` names the position
/// `number`/`size`; some endpoints use `pageNumber`/`pageSize`. Both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(alias = "pageNumber", default)]
    pub number: u32,
    #[serde(rename = "totalPages", default)]
    pub total_pages: u32,
    #[serde(rename = "totalElements", default)]
    pub total_elements: u64,
    #[serde(alias = "pageSize", default)]
    pub size: u32,
}

impl<T> Default for Page<T> {
    fn default() -> Self { Self { content: Vec::new(), number: 0, total_pages: 0, total_elements: 0, size: 0 } }
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool { self.content.is_empty() }

    pub fn has_next(&self) -> bool { self.number.saturating_add(1) < self.total_pages }

    pub fn has_previous(&self) -> bool { self.number > 0 }

    /// 1-based "page X of Y" label; an empty result reads as page 0 of 0.
    pub fn position_label(&self) -> String {
        if self.total_pages == 0 {
            "0/0".to_string()
        } else {
            format!("{}/{}", self.number.saturating_add(1), self.total_pages)
        }
    }
}
