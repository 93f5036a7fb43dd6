use crate::application::post_service::PostService;
use crate::domain::error::DomainError;
use crate::domain::id::parse_object_id;
use crate::domain::post::{PostFilter, PostInput};
use crate::presentation::dto::{CreatePostQuery, FilterPostsQuery, LikesResponse};
use crate::presentation::utils::request_id;
use actix_web::{HttpRequest, HttpResponse, delete, get, post, route, web};
use tracing::info;

#[get("/posts")]
pub async fn get_posts(
    req: HttpRequest,
    service: web::Data<PostService>,
) -> Result<HttpResponse, DomainError> {
    let posts = service.get_posts().await?;

    info!(
        request_id = %request_id(&req),
        count = posts.len(),
        "posts retrieved"
    );

    Ok(HttpResponse::Ok().json(posts))
}

#[get("/posts/filter")]
pub async fn filter_posts(
    req: HttpRequest,
    service: web::Data<PostService>,
    query: web::Query<FilterPostsQuery>,
) -> Result<HttpResponse, DomainError> {
    let query = query.into_inner();
    let filter = PostFilter::new(query.tag, query.author)?;
    let posts = service.filter_posts(&filter).await?;

    info!(
        request_id = %request_id(&req),
        tag = ?filter.tag,
        author = ?filter.author,
        count = posts.len(),
        "posts filtered"
    );

    Ok(HttpResponse::Ok().json(posts))
}

#[get("/posts/{id}")]
pub async fn get_post(
    service: web::Data<PostService>,
    path: web::Path<String>,
) -> Result<HttpResponse, DomainError> {
    let id = parse_object_id(&path)?;
    let post = service.get_post(id).await?;
    Ok(HttpResponse::Ok().json(post))
}

#[post("/posts")]
pub async fn create_post(
    req: HttpRequest,
    service: web::Data<PostService>,
    query: web::Query<CreatePostQuery>,
    payload: web::Json<PostInput>,
) -> Result<HttpResponse, DomainError> {
    let new_post = payload.into_inner().into_new_post()?;
    let post = service
        .create_post(new_post, query.reuse_author_id)
        .await?;

    info!(
        request_id = %request_id(&req),
        post_id = %post.id,
        "post created"
    );

    Ok(HttpResponse::Created().json(post))
}

#[route("/posts/{id}", method = "PUT", method = "PATCH")]
pub async fn update_post(
    req: HttpRequest,
    service: web::Data<PostService>,
    path: web::Path<String>,
    payload: web::Json<PostInput>,
) -> Result<HttpResponse, DomainError> {
    let id = parse_object_id(&path)?;
    let patch = payload.into_inner().into_patch()?;
    let post = service.update_post(id, patch).await?;

    info!(
        request_id = %request_id(&req),
        post_id = %post.id,
        "post updated"
    );

    Ok(HttpResponse::Ok().json(post))
}

#[delete("/posts/{id}")]
pub async fn delete_post(
    req: HttpRequest,
    service: web::Data<PostService>,
    path: web::Path<String>,
) -> Result<HttpResponse, DomainError> {
    let id = parse_object_id(&path)?;
    service.delete_post(id).await?;

    info!(
        request_id = %request_id(&req),
        post_id = %id,
        "post deleted"
    );

    Ok(HttpResponse::NoContent().finish())
}

#[route("/posts/{id}/likes", method = "POST", method = "PATCH")]
pub async fn like_post(
    service: web::Data<PostService>,
    path: web::Path<String>,
) -> Result<HttpResponse, DomainError> {
    let id = parse_object_id(&path)?;
    let likes = service.like_post(id).await?;
    Ok(HttpResponse::Ok().json(LikesResponse { likes }))
}
