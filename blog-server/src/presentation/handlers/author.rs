use crate::application::author_service::AuthorService;
use crate::domain::author::AuthorInput;
use crate::domain::error::DomainError;
use crate::presentation::dto::UpdatedAuthorsResponse;
use crate::presentation::utils::request_id;
use actix_web::{HttpRequest, HttpResponse, get, patch, web};
use tracing::info;

#[get("/authors")]
pub async fn get_authors(service: web::Data<AuthorService>) -> Result<HttpResponse, DomainError> {
    let authors = service.get_authors().await?;
    Ok(HttpResponse::Ok().json(authors))
}

/// Applies the body's fields to the embedded author of every post by `name`.
#[patch("/authors/{name}")]
pub async fn update_author(
    req: HttpRequest,
    service: web::Data<AuthorService>,
    path: web::Path<String>,
    payload: web::Json<AuthorInput>,
) -> Result<HttpResponse, DomainError> {
    let name = path.into_inner();
    let patch = payload.into_inner().into_patch()?;
    let updated = service.update_author(&name, patch).await?;

    info!(
        request_id = %request_id(&req),
        author = %name,
        matched = updated.matched_count,
        "authors updated"
    );

    Ok(HttpResponse::Ok().json(UpdatedAuthorsResponse { updated }))
}
