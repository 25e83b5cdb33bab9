use serde::{Deserialize, Serialize};

/// Server-side page as returned inside the list envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    #[serde(default = "first_page")]
    pub current_page: u32,
    #[serde(default = "first_page")]
    pub last_page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub total: u64,
}

fn first_page() -> u32 {
    1
}

impl<T> Page<T> {
    /// A single page holding the whole collection.
    pub fn whole(data: Vec<T>) -> Self {
        let total = data.len() as u64;
        Self {
            per_page: data.len() as u32,
            data,
            current_page: 1,
            last_page: 1,
            total,
        }
    }
}

/// List endpoints either paginate or return the bare collection.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    Paged(Page<T>),
    Plain(Vec<T>),
}

impl<T> From<ListPayload<T>> for Page<T> {
    fn from(payload: ListPayload<T>) -> Self {
        match payload {
            ListPayload::Paged(page) => page,
            ListPayload::Plain(items) => Page::whole(items),
        }
    }
}
