use crate::data::document::{AuthorDocument, PostDocument};
use crate::domain::author::{Author, AuthorPatch};
use crate::domain::error::DomainError;
use crate::domain::post::{BlogPost, PostFilter, PostPatch, UpdateSummary, now};
use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{Bson, DateTime as BsonDateTime, Document, doc};
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};
use tracing::{error, info};

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<BlogPost>, DomainError>;
    async fn find(&self, filter: &PostFilter) -> Result<Vec<BlogPost>, DomainError>;
    async fn find_by_id(&self, id: ObjectId) -> Result<Option<BlogPost>, DomainError>;
    /// Identifier of the author embedded in the first post written by `name`.
    async fn find_author_id_by_name(&self, name: &str) -> Result<Option<ObjectId>, DomainError>;
    async fn create(&self, post: BlogPost) -> Result<BlogPost, DomainError>;
    async fn update_post(
        &self,
        id: ObjectId,
        patch: PostPatch,
    ) -> Result<Option<BlogPost>, DomainError>;
    /// Returns `false` when nothing was deleted.
    async fn delete_post(&self, id: ObjectId) -> Result<bool, DomainError>;
    /// Adds one like and returns the new count.
    async fn increment_likes(&self, id: ObjectId) -> Result<Option<i64>, DomainError>;
    /// Distinct embedded author sub-documents, compared as whole values.
    async fn distinct_authors(&self) -> Result<Vec<Author>, DomainError>;
    async fn update_authors_by_name(
        &self,
        name: &str,
        patch: AuthorPatch,
    ) -> Result<UpdateSummary, DomainError>;
}

#[derive(Clone)]
pub struct MongoPostRepository {
    database: Database,
    collection: String,
}

impl MongoPostRepository {
    pub fn new(database: Database, collection: impl Into<String>) -> Self {
        Self {
            database,
            collection: collection.into(),
        }
    }

    // A fresh handle per operation; the driver pools the connections behind it.
    fn posts(&self) -> Collection<PostDocument> {
        self.database.collection(&self.collection)
    }
}

fn store_error(action: &'static str) -> impl Fn(mongodb::error::Error) -> DomainError {
    move |e| {
        error!("failed to {}: {}", action, e);
        DomainError::Store(e.to_string())
    }
}

pub(crate) fn filter_document(filter: &PostFilter) -> Document {
    let mut query = Document::new();
    if let Some(tag) = &filter.tag {
        query.insert("tags", tag.as_str());
    }
    if let Some(author) = &filter.author {
        query.insert("author.name", author.as_str());
    }
    query
}

pub(crate) fn post_set_document(
    patch: &PostPatch,
    updated_at: DateTime<Utc>,
) -> Result<Document, DomainError> {
    let mut set = doc! { "updatedAt": BsonDateTime::from_chrono(updated_at) };
    if let Some(title) = &patch.title {
        set.insert("title", title.as_str());
    }
    if let Some(content) = &patch.content {
        set.insert("content", content.as_str());
    }
    if let Some(tags) = &patch.tags {
        set.insert("tags", tags.clone());
    }
    if let Some(author) = &patch.author {
        let author = bson::to_bson(&AuthorDocument::from(author.clone()))
            .map_err(|e| DomainError::Store(format!("failed to encode author: {}", e)))?;
        set.insert("author", author);
    }
    Ok(set)
}

/// Upserted identifiers are reported in the same hex form as every other id.
fn upserted_hex(id: Option<Bson>) -> Option<String> {
    id.and_then(|id| id.as_object_id().map(|oid| oid.to_hex()))
}

/// Every key becomes a path into the embedded author.
pub(crate) fn author_set_document(patch: &AuthorPatch, updated_at: DateTime<Utc>) -> Document {
    let mut set = doc! { "updatedAt": BsonDateTime::from_chrono(updated_at) };
    if let Some(name) = &patch.name {
        set.insert("author.name", name.as_str());
    }
    if let Some(age) = patch.age {
        set.insert("author.age", age);
    }
    if let Some(gender) = &patch.gender {
        set.insert("author.gender", gender.as_str());
    }
    if let Some(nationality) = patch.nationality {
        set.insert("author.nationality", nationality.as_str());
    }
    if let Some(areas) = &patch.areas_of_expertise {
        set.insert("author.areasOfExpertise", areas.clone());
    }
    set
}

#[async_trait]
impl PostRepository for MongoPostRepository {
    async fn find_all(&self) -> Result<Vec<BlogPost>, DomainError> {
        let docs: Vec<PostDocument> = self
            .posts()
            .find(doc! {})
            .await
            .map_err(store_error("fetch posts"))?
            .try_collect()
            .await
            .map_err(store_error("read posts"))?;
        Ok(docs.into_iter().map(BlogPost::from).collect())
    }

    async fn find(&self, filter: &PostFilter) -> Result<Vec<BlogPost>, DomainError> {
        let docs: Vec<PostDocument> = self
            .posts()
            .find(filter_document(filter))
            .await
            .map_err(store_error("filter posts"))?
            .try_collect()
            .await
            .map_err(store_error("read filtered posts"))?;
        Ok(docs.into_iter().map(BlogPost::from).collect())
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<BlogPost>, DomainError> {
        let doc = self
            .posts()
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| {
                error!("db error find_by_id {}: {}", id, e);
                DomainError::Store(e.to_string())
            })?;
        Ok(doc.map(BlogPost::from))
    }

    async fn find_author_id_by_name(&self, name: &str) -> Result<Option<ObjectId>, DomainError> {
        let found = self
            .database
            .collection::<Document>(&self.collection)
            .find_one(doc! { "author.name": name })
            .projection(doc! { "author._id": 1 })
            .await
            .map_err(store_error("look up author"))?;

        Ok(found.and_then(|doc| {
            doc.get_document("author")
                .ok()
                .and_then(|author| author.get_object_id("_id").ok())
        }))
    }

    async fn create(&self, post: BlogPost) -> Result<BlogPost, DomainError> {
        self.posts()
            .insert_one(PostDocument::from(post.clone()))
            .await
            .map_err(store_error("create post"))?;

        info!(post_id = %post.id, author_id = %post.author.id, "post created");
        Ok(post)
    }

    async fn update_post(
        &self,
        id: ObjectId,
        patch: PostPatch,
    ) -> Result<Option<BlogPost>, DomainError> {
        let set = post_set_document(&patch, now())?;
        let post = self
            .posts()
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| {
                error!("failed to update post {}: {}", id, e);
                DomainError::Store(e.to_string())
            })?;

        if post.is_some() {
            info!(post_id = %id, "post updated");
        }

        Ok(post.map(BlogPost::from))
    }

    async fn delete_post(&self, id: ObjectId) -> Result<bool, DomainError> {
        let deleted = self
            .posts()
            .delete_one(doc! { "_id": id })
            .await
            .map_err(|e| {
                error!("failed to delete post {}: {}", id, e);
                DomainError::Store(e.to_string())
            })?;

        if deleted.deleted_count == 0 {
            return Ok(false);
        }

        info!(post_id = %id, "post deleted");
        Ok(true)
    }

    async fn increment_likes(&self, id: ObjectId) -> Result<Option<i64>, DomainError> {
        let post = self
            .posts()
            .find_one_and_update(
                doc! { "_id": id },
                doc! {
                    "$inc": { "likes": 1 },
                    "$set": { "updatedAt": BsonDateTime::from_chrono(now()) },
                },
            )
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| {
                error!("failed to like post {}: {}", id, e);
                DomainError::Store(e.to_string())
            })?;

        Ok(post.map(|post| post.likes))
    }

    async fn distinct_authors(&self) -> Result<Vec<Author>, DomainError> {
        let values = self
            .posts()
            .distinct("author", doc! {})
            .await
            .map_err(store_error("list distinct authors"))?;

        values
            .into_iter()
            .map(|value: Bson| {
                bson::from_bson::<AuthorDocument>(value)
                    .map(Author::from)
                    .map_err(|e| {
                        error!("malformed author sub-document: {}", e);
                        DomainError::Store(e.to_string())
                    })
            })
            .collect()
    }

    async fn update_authors_by_name(
        &self,
        name: &str,
        patch: AuthorPatch,
    ) -> Result<UpdateSummary, DomainError> {
        let set = author_set_document(&patch, now());
        let result = self
            .posts()
            .update_many(doc! { "author.name": name }, doc! { "$set": set })
            .await
            .map_err(store_error("update authors"))?;

        info!(
            author = %name,
            matched = result.matched_count,
            modified = result.modified_count,
            "authors updated"
        );

        Ok(UpdateSummary {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_count: u64::from(result.upserted_id.is_some()),
            upserted_id: upserted_hex(result.upserted_id),
        })
    }
}
