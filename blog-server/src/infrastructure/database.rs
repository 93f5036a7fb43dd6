use std::sync::Arc;
use std::time::Duration;

use bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use tracing::{info, warn};

use crate::data::memory_repository::InMemoryPostRepository;
use crate::data::post_repository::{MongoPostRepository, PostRepository};
use crate::infrastructure::config::StoreConfig;

pub async fn connect(uri: &str, database: &str) -> Result<Database, mongodb::error::Error> {
    let mut options = ClientOptions::parse(uri).await?;
    options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
    options.max_pool_size = Some(20);
    options.min_pool_size = Some(5);
    options.connect_timeout = Some(Duration::from_secs(5));
    options.server_selection_timeout = Some(Duration::from_secs(5));

    let database = Client::with_options(options)?.database(database);
    database.run_command(doc! { "ping": 1 }).await?;
    info!(database = %database.name(), "connected to MongoDB");
    Ok(database)
}

pub async fn create_repository(store: &StoreConfig) -> anyhow::Result<Arc<dyn PostRepository>> {
    match store {
        StoreConfig::Mongo {
            uri,
            database,
            collection,
        } => {
            let database = connect(uri, database).await?;
            Ok(Arc::new(MongoPostRepository::new(database, collection.as_str())))
        }
        StoreConfig::Memory => {
            warn!("using the in-memory store; posts are lost on restart");
            Ok(Arc::new(InMemoryPostRepository::new()))
        }
    }
}
