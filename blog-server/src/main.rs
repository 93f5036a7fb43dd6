mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

use application::author_service::AuthorService;
use application::post_service::PostService;
use infrastructure::config::AppConfig;
use infrastructure::database::create_repository;
use infrastructure::logging::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::from_env()?;
    let repo = create_repository(&config.store).await?;

    let post_service = PostService::new(repo.clone(), config.reuse_author_id);
    let author_service = AuthorService::new(repo, config.author_listing);

    server::start_rest_server(config, post_service, author_service).await
}
