//! Paged listing results
//!
//! Listing endpoints answer either with a bare JSON array or with a paged
//! envelope. Both shapes are normalized into [`Page`] before they reach the
//! caller.

use serde::{Deserialize, Serialize};

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_pages: u32,
    pub total_elements: u64,
    /// Zero-based page index
    pub number: u32,
    pub size: u32,
}

impl<T> Page<T> {
    /// Wrap an unpaged listing as a single page
    pub fn single(content: Vec<T>) -> Self {
        let len = content.len();
        Self {
            content,
            total_pages: 1,
            total_elements: len as u64,
            number: 0,
            size: len as u32,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Whether another page follows this one
    pub fn has_next(&self) -> bool {
        self.number + 1 < self.total_pages
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageEnvelope<T> {
    content: Vec<T>,
    #[serde(default)]
    total_pages: Option<u32>,
    #[serde(default)]
    total_elements: Option<u64>,
    #[serde(default)]
    number: Option<u32>,
    #[serde(default)]
    size: Option<u32>,
}

/// Either response shape a listing endpoint may produce
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum PageResponse<T> {
    Paged(PageEnvelope<T>),
    Bare(Vec<T>),
}

impl<T> From<PageResponse<T>> for Page<T> {
    fn from(response: PageResponse<T>) -> Self {
        match response {
            PageResponse::Bare(content) => Page::single(content),
            PageResponse::Paged(envelope) => {
                let len = envelope.content.len();
                Page {
                    total_pages: envelope.total_pages.unwrap_or(1),
                    total_elements: envelope.total_elements.unwrap_or(len as u64),
                    number: envelope.number.unwrap_or(0),
                    size: envelope.size.unwrap_or(len as u32),
                    content: envelope.content,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalize(value: serde_json::Value) -> Page<u32> {
        serde_json::from_value::<PageResponse<u32>>(value).unwrap().into()
    }

    #[test]
    fn bare_array_becomes_single_page() {
        let page = normalize(json!([1, 2, 3]));
        assert_eq!(page.content, vec![1, 2, 3]);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.total_elements, 3);
        assert!(!page.has_next());
    }

    #[test]
    fn envelope_keeps_paging_fields() {
        let page = normalize(json!({
            "content": [4, 5],
            "totalPages": 3,
            "totalElements": 26,
            "number": 1,
            "size": 12,
            "first": false,
            "last": false
        }));
        assert_eq!(page.content, vec![4, 5]);
        assert_eq!(page.total_elements, 26);
        assert!(page.has_next());
    }

    #[test]
    fn envelope_without_counts_is_a_single_page() {
        let page = normalize(json!({"content": []}));
        assert!(page.is_empty());
        assert_eq!(page.total_pages, 1);
    }
}
