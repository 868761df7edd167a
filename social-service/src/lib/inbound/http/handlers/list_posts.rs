use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::PostData;
use crate::content::models::Page;
use crate::content::models::PageRequest;
use crate::content::models::Post;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    page: Option<u32>,
    size: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostPageData {
    pub items: Vec<PostData>,
    pub page: u32,
    pub size: u32,
    pub total: i64,
    pub total_pages: i64,
}

impl From<&Page<Post>> for PostPageData {
    fn from(page: &Page<Post>) -> Self {
        Self {
            items: page.items.iter().map(PostData::from).collect(),
            page: page.page,
            size: page.size,
            total: page.total,
            total_pages: page.total_pages(),
        }
    }
}

/// Newest posts first.
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<ApiSuccess<PostPageData>, ApiError> {
    state
        .content_service
        .list_posts(PageRequest::new(query.page, query.size))
        .await
        .map_err(ApiError::from)
        .map(|ref page| ApiSuccess::new(StatusCode::OK, page.into()))
}
