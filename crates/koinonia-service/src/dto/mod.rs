//! Request and response payloads.
//!
//! Required fields are `Option` so a missing field reaches the service and
//! gets the domain's own message instead of a generic deserializer error.

mod auth_dto;
mod comment_dto;
mod interaction_dto;
mod post_dto;
mod user_dto;

pub use auth_dto::*;
pub use comment_dto::*;
pub use interaction_dto::*;
pub use post_dto::*;
pub use user_dto::*;

use koinonia_core::PageRequest;
use serde::{Deserialize, Serialize};

/// Simple message response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `limit`/`offset` query parameters.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl PageQuery {
    /// Resolves defaults and checks bounds.
    pub fn to_page_request(self) -> Result<PageRequest, String> {
        let page = PageRequest::new(
            self.limit.unwrap_or(PageRequest::DEFAULT_LIMIT),
            self.offset.unwrap_or(0),
        );
        if page.is_valid() {
            Ok(page)
        } else {
            Err(format!(
                "limit must be between 1 and {}",
                PageRequest::MAX_LIMIT
            ))
        }
    }
}
