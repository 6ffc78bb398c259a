use axum::{Json, Router, extract::State, routing::get};
use axum_helpers::{
    ValidatedQuery,
    errors::responses::{BadRequestValidationResponse, InternalServerErrorResponse},
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::EventResult;
use crate::models::{PopularTag, PopularTagsQuery, Tag};
use crate::repository::TagRepository;
use crate::service::TagService;

pub const TAG: &str = "tags";

#[derive(OpenApi)]
#[openapi(
    paths(list_tags, popular_tags),
    components(
        schemas(Tag, PopularTag),
        responses(BadRequestValidationResponse, InternalServerErrorResponse)
    )
)]
pub struct TagsApiDoc;

pub fn router<R: TagRepository + 'static>(service: TagService<R>) -> Router {
    Router::new()
        .route("/", get(list_tags))
        .route("/popular", get(popular_tags))
        .with_state(Arc::new(service))
}

/// All tags, alphabetically
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    responses(
        (status = 200, description = "All tags", body = Vec<Tag>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_tags<R: TagRepository>(
    State(service): State<Arc<TagService<R>>>,
) -> EventResult<Json<Vec<Tag>>> {
    let tags = service.list_tags().await?;
    Ok(Json(tags))
}

/// Tags ranked by how many events carry them
#[utoipa::path(
    get,
    path = "/popular",
    tag = TAG,
    params(PopularTagsQuery),
    responses(
        (status = 200, description = "Most used tags", body = Vec<PopularTag>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn popular_tags<R: TagRepository>(
    State(service): State<Arc<TagService<R>>>,
    ValidatedQuery(query): ValidatedQuery<PopularTagsQuery>,
) -> EventResult<Json<Vec<PopularTag>>> {
    let tags = service.popular_tags(query.limit).await?;
    Ok(Json(tags))
}
