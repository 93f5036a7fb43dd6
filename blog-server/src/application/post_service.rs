use std::sync::Arc;

use crate::data::post_repository::PostRepository;
use crate::domain::error::{DomainError, PostAction};
use crate::domain::post::{BlogPost, NewPost, PostFilter, PostPatch};
use bson::oid::ObjectId;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct PostService {
    repo: Arc<dyn PostRepository>,
    reuse_author_id: bool,
}

impl PostService {
    /// `reuse_author_id` is the default for creates that do not say otherwise.
    pub fn new(repo: Arc<dyn PostRepository>, reuse_author_id: bool) -> Self {
        Self {
            repo,
            reuse_author_id,
        }
    }

    pub async fn get_posts(&self) -> Result<Vec<BlogPost>, DomainError> {
        self.repo.find_all().await
    }

    pub async fn filter_posts(&self, filter: &PostFilter) -> Result<Vec<BlogPost>, DomainError> {
        self.repo.find(filter).await
    }

    pub async fn get_post(&self, id: ObjectId) -> Result<BlogPost, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::PostNotFound(PostAction::Lookup))
    }

    /// With `reuse_author_id` the new post's author takes the identifier of the
    /// first stored author with the same name. Lookup and insert are separate
    /// store calls, so concurrent creates may still mint two identifiers.
    #[instrument(skip(self, post), fields(author = %post.author.name))]
    pub async fn create_post(
        &self,
        post: NewPost,
        reuse_author_id: Option<bool>,
    ) -> Result<BlogPost, DomainError> {
        let author_id = if reuse_author_id.unwrap_or(self.reuse_author_id) {
            let existing = self.repo.find_author_id_by_name(&post.author.name).await?;
            if let Some(id) = existing {
                debug!(author_id = %id, "reusing existing author id");
            }
            existing
        } else {
            None
        };

        self.repo.create(BlogPost::new(post, author_id)).await
    }

    #[instrument(skip(self, patch))]
    pub async fn update_post(&self, id: ObjectId, patch: PostPatch) -> Result<BlogPost, DomainError> {
        self.repo
            .update_post(id, patch)
            .await?
            .ok_or(DomainError::PostNotFound(PostAction::Update))
    }

    #[instrument(skip(self))]
    pub async fn delete_post(&self, id: ObjectId) -> Result<(), DomainError> {
        if self.repo.delete_post(id).await? {
            Ok(())
        } else {
            Err(DomainError::PostNotFound(PostAction::Delete))
        }
    }

    #[instrument(skip(self))]
    pub async fn like_post(&self, id: ObjectId) -> Result<i64, DomainError> {
        self.repo
            .increment_likes(id)
            .await?
            .ok_or(DomainError::PostNotFound(PostAction::Like))
    }
}
