use crate::categories::CATEGORIES;
use axum::response::IntoResponse;
use axum::Json;

/// List the fixed categories
pub async fn list_categories() -> impl IntoResponse {
    Json(CATEGORIES.as_slice())
}
