use crate::application::author_service::AuthorListing;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    Mongo {
        uri: String,
        database: String,
        collection: String,
    },
    Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub store: StoreConfig,
    pub reuse_author_id: bool,
    pub author_listing: AuthorListing,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".into());
        let port = lookup("PORT")
            .unwrap_or_else(|| "8080".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid PORT: {}", e))?;

        let store = match lookup("STORE_BACKEND")
            .unwrap_or_else(|| "mongo".into())
            .to_ascii_lowercase()
            .as_str()
        {
            "mongo" | "mongodb" => StoreConfig::Mongo {
                uri: lookup("MONGODB_URI")
                    .ok_or_else(|| anyhow::anyhow!("MONGODB_URI must be set"))?,
                database: lookup("MONGODB_DATABASE").unwrap_or_else(|| "blog".into()),
                collection: lookup("MONGODB_COLLECTION").unwrap_or_else(|| "blogposts".into()),
            },
            "memory" => StoreConfig::Memory,
            other => anyhow::bail!("invalid STORE_BACKEND: {}", other),
        };

        let reuse_author_id = match lookup("REUSE_AUTHOR_ID") {
            Some(raw) => parse_bool(&raw)
                .ok_or_else(|| anyhow::anyhow!("invalid REUSE_AUTHOR_ID: {}", raw))?,
            None => false,
        };
        let author_listing = match lookup("AUTHOR_LISTING") {
            Some(raw) => raw.parse::<AuthorListing>().map_err(|e: String| anyhow::anyhow!(e))?,
            None => AuthorListing::default(),
        };
        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            store,
            reuse_author_id,
            author_listing,
            cors_origins,
        })
    }
}

pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_need_only_a_mongo_uri() {
        let config = load(&[("MONGODB_URI", "mongodb://localhost:27017")]).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(
            config.store,
            StoreConfig::Mongo {
                uri: "mongodb://localhost:27017".into(),
                database: "blog".into(),
                collection: "blogposts".into(),
            }
        );
        assert!(!config.reuse_author_id);
        assert_eq!(config.author_listing, AuthorListing::Scan);
        assert_eq!(config.cors_origins, vec!["*".to_string()]);
    }

    #[test]
    fn mongo_backend_without_uri_is_rejected() {
        let err = load(&[]).unwrap_err();
        assert!(err.to_string().contains("MONGODB_URI"));
    }

    #[test]
    fn memory_backend_and_switches() {
        let config = load(&[
            ("STORE_BACKEND", "memory"),
            ("REUSE_AUTHOR_ID", "yes"),
            ("AUTHOR_LISTING", "distinct"),
            ("CORS_ORIGINS", "http://a.test, http://b.test,"),
        ])
        .unwrap();
        assert_eq!(config.store, StoreConfig::Memory);
        assert!(config.reuse_author_id);
        assert_eq!(config.author_listing, AuthorListing::Distinct);
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn malformed_values_are_errors() {
        assert!(load(&[("STORE_BACKEND", "memory"), ("PORT", "eighty")]).is_err());
        assert!(load(&[("STORE_BACKEND", "memory"), ("REUSE_AUTHOR_ID", "maybe")]).is_err());
        assert!(load(&[("STORE_BACKEND", "postgres")]).is_err());
    }
}
