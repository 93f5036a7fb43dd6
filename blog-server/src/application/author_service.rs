use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;

use crate::data::post_repository::PostRepository;
use crate::domain::author::{Author, AuthorPatch};
use crate::domain::error::DomainError;
use crate::domain::post::{BlogPost, UpdateSummary};
use tracing::instrument;

/// How the unique author list is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthorListing {
    /// Scan every post and keep the first author seen for each name.
    #[default]
    Scan,
    /// Ask the store for distinct `author` sub-documents. Only collapses
    /// authors that share an identifier, i.e. were created with author reuse.
    Distinct,
}

impl FromStr for AuthorListing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scan" => Ok(AuthorListing::Scan),
            "distinct" => Ok(AuthorListing::Distinct),
            other => Err(format!("unknown author listing strategy: {other}")),
        }
    }
}

#[derive(Clone)]
pub struct AuthorService {
    repo: Arc<dyn PostRepository>,
    listing: AuthorListing,
}

impl AuthorService {
    pub fn new(repo: Arc<dyn PostRepository>, listing: AuthorListing) -> Self {
        Self { repo, listing }
    }

    pub async fn get_authors(&self) -> Result<Vec<Author>, DomainError> {
        match self.listing {
            AuthorListing::Scan => Ok(unique_by_name(self.repo.find_all().await?)),
            AuthorListing::Distinct => self.repo.distinct_authors().await,
        }
    }

    #[instrument(skip(self, patch))]
    pub async fn update_author(
        &self,
        name: &str,
        patch: AuthorPatch,
    ) -> Result<UpdateSummary, DomainError> {
        self.repo.update_authors_by_name(name, patch).await
    }
}

/// First-seen author per name, in scan order.
pub fn unique_by_name(posts: Vec<BlogPost>) -> Vec<Author> {
    let mut seen = HashSet::new();
    posts
        .into_iter()
        .map(|post| post.author)
        .filter(|author| seen.insert(author.name.clone()))
        .collect()
}
