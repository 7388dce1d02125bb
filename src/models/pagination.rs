use serde::Deserialize;

use crate::error::{AppError, AppResult};

pub const MAX_PAGE_SIZE: u32 = 100;

/// Page selection shared by the list endpoints
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    20
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl PageParams {
    /// Builds page selection from raw query parameters, applying defaults
    pub fn from_query(page: Option<u32>, page_size: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or_else(default_page),
            page_size: page_size.unwrap_or_else(default_page_size),
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.page < 1 {
            return Err(AppError::InvalidInput("page must be >= 1".to_string()));
        }
        if self.page_size < 1 || self.page_size > MAX_PAGE_SIZE {
            return Err(AppError::InvalidInput(format!(
                "page_size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }
        Ok(())
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.page_size)
    }
}

/// Number of pages needed to show `total` items, `page_size` at a time
pub fn total_pages(total: i64, page_size: u32) -> i64 {
    let page_size = i64::from(page_size.max(1));
    (total + page_size - 1) / page_size
}
