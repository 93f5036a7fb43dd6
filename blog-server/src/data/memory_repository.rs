//! In-memory post store for development and tests.
//!
//! Keeps posts in insertion order, which stands in for the natural order of
//! the document store. Data is lost on restart.

use async_trait::async_trait;
use bson::oid::ObjectId;
use tokio::sync::RwLock;
use tracing::info;

use crate::data::post_repository::PostRepository;
use crate::domain::author::{Author, AuthorPatch};
use crate::domain::error::DomainError;
use crate::domain::post::{BlogPost, PostFilter, PostPatch, UpdateSummary, now};

#[derive(Default)]
pub struct InMemoryPostRepository {
    posts: RwLock<Vec<BlogPost>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_all(&self) -> Result<Vec<BlogPost>, DomainError> {
        Ok(self.posts.read().await.clone())
    }

    async fn find(&self, filter: &PostFilter) -> Result<Vec<BlogPost>, DomainError> {
        let posts = self.posts.read().await;
        Ok(posts.iter().filter(|p| filter.matches(p)).cloned().collect())
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<BlogPost>, DomainError> {
        let posts = self.posts.read().await;
        Ok(posts.iter().find(|p| p.id == id).cloned())
    }

    async fn find_author_id_by_name(&self, name: &str) -> Result<Option<ObjectId>, DomainError> {
        let posts = self.posts.read().await;
        Ok(posts
            .iter()
            .find(|p| p.author.name == name)
            .map(|p| p.author.id))
    }

    async fn create(&self, post: BlogPost) -> Result<BlogPost, DomainError> {
        let mut posts = self.posts.write().await;
        if posts.iter().any(|p| p.id == post.id) {
            return Err(DomainError::Store(format!("duplicate key: _id {}", post.id)));
        }
        posts.push(post.clone());

        info!(post_id = %post.id, author_id = %post.author.id, "post created");
        Ok(post)
    }

    async fn update_post(
        &self,
        id: ObjectId,
        patch: PostPatch,
    ) -> Result<Option<BlogPost>, DomainError> {
        let mut posts = self.posts.write().await;
        let Some(post) = posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        patch.apply(post);
        post.updated_at = now();

        info!(post_id = %id, "post updated");
        Ok(Some(post.clone()))
    }

    async fn delete_post(&self, id: ObjectId) -> Result<bool, DomainError> {
        let mut posts = self.posts.write().await;
        let before = posts.len();
        posts.retain(|p| p.id != id);
        if posts.len() == before {
            return Ok(false);
        }

        info!(post_id = %id, "post deleted");
        Ok(true)
    }

    async fn increment_likes(&self, id: ObjectId) -> Result<Option<i64>, DomainError> {
        let mut posts = self.posts.write().await;
        Ok(posts.iter_mut().find(|p| p.id == id).map(|post| {
            post.likes += 1;
            post.updated_at = now();
            post.likes
        }))
    }

    async fn distinct_authors(&self) -> Result<Vec<Author>, DomainError> {
        let posts = self.posts.read().await;
        let mut authors: Vec<Author> = Vec::new();
        for post in posts.iter() {
            if !authors.contains(&post.author) {
                authors.push(post.author.clone());
            }
        }
        Ok(authors)
    }

    async fn update_authors_by_name(
        &self,
        name: &str,
        patch: AuthorPatch,
    ) -> Result<UpdateSummary, DomainError> {
        let mut posts = self.posts.write().await;
        let at = now();
        let mut matched = 0;
        for post in posts.iter_mut().filter(|p| p.author.name == name) {
            patch.apply(&mut post.author);
            post.updated_at = at;
            matched += 1;
        }

        info!(author = %name, matched, "authors updated");
        // updatedAt always changes, so every matched post counts as modified.
        Ok(UpdateSummary::new(matched, matched))
    }
}
