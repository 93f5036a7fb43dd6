pub mod author;
pub mod health;
pub mod post;

use actix_web::{Scope, web};

use crate::presentation::utils::{json_config, query_config};

/// Every route the service exposes, mounted under `/api`.
pub fn api_scope() -> Scope {
    web::scope("/api")
        .app_data(json_config())
        .app_data(query_config())
        .route("/health", web::get().to(health::health))
        .service(post::get_posts)
        // Registered before `/posts/{id}` so "filter" is never taken for an id.
        .service(post::filter_posts)
        .service(post::get_post)
        .service(post::create_post)
        .service(post::update_post)
        .service(post::delete_post)
        .service(post::like_post)
        .service(author::get_authors)
        .service(author::update_author)
}
