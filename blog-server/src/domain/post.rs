use bson::oid::ObjectId;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::author::{Author, AuthorInput, NewAuthor};
use crate::domain::error::DomainError;
use crate::domain::id::hex;
use crate::domain::schema::{POST_TITLE_MAX_LEN, Violations};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    #[serde(rename = "_id", with = "hex")]
    pub id: ObjectId,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub likes: i64,
    pub author: Author,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BlogPost {
    /// Assigns identifiers and timestamps. A given `author_id` is reused for the
    /// embedded author, otherwise the author gets a fresh one.
    pub fn new(post: NewPost, author_id: Option<ObjectId>) -> Self {
        let now = now();
        Self {
            id: ObjectId::new(),
            title: post.title,
            content: post.content,
            tags: post.tags,
            likes: 0,
            author: post.author.with_id(author_id.unwrap_or_else(ObjectId::new)),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Store timestamps keep millisecond precision, so ours do too.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Post fields as a client sent them. `likes` is never accepted from clients.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub author: Option<AuthorInput>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub author: NewAuthor,
}

/// Fields to `$set` on a single post. A replaced author gets a new identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub author: Option<Author>,
}

impl PostPatch {
    pub fn apply(&self, post: &mut BlogPost) {
        if let Some(title) = &self.title {
            post.title = title.clone();
        }
        if let Some(content) = &self.content {
            post.content = content.clone();
        }
        if let Some(tags) = &self.tags {
            post.tags = tags.clone();
        }
        if let Some(author) = &self.author {
            post.author = author.clone();
        }
    }
}

impl PostInput {
    pub fn into_new_post(self) -> Result<NewPost, DomainError> {
        let mut violations = Violations::new("blogpost");

        let title = violations.required("title", self.title);
        if let Some(title) = &title {
            violations.text("title", title, Some(POST_TITLE_MAX_LEN));
        }
        let content = violations.required("content", self.content);
        if let Some(content) = &content {
            violations.text("content", content, None);
        }
        let author = violations.required("author", self.author).and_then(|author| {
            let mut nested = violations.nested("author.");
            let author = author.collect(&mut nested);
            violations.absorb(nested);
            author
        });
        violations.finish()?;

        match (title, content, author) {
            (Some(title), Some(content), Some(author)) => Ok(NewPost {
                title,
                content,
                tags: self.tags.unwrap_or_default(),
                author,
            }),
            _ => Err(DomainError::Validation("blogpost validation failed".into())),
        }
    }

    pub fn into_patch(self) -> Result<PostPatch, DomainError> {
        let mut violations = Violations::new("blogpost");

        if let Some(title) = &self.title {
            violations.text("title", title, Some(POST_TITLE_MAX_LEN));
        }
        if let Some(content) = &self.content {
            violations.text("content", content, None);
        }
        let author = self.author.and_then(|author| {
            let mut nested = violations.nested("author.");
            let author = author.collect(&mut nested);
            violations.absorb(nested);
            author
        });
        violations.finish()?;

        Ok(PostPatch {
            title: self.title,
            content: self.content,
            tags: self.tags,
            author: author.map(|author| author.with_id(ObjectId::new())),
        })
    }
}

/// Conjunctive filter over tag membership and author name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostFilter {
    pub tag: Option<String>,
    pub author: Option<String>,
}

impl PostFilter {
    /// Empty values count as absent; at least one criterion is required.
    pub fn new(tag: Option<String>, author: Option<String>) -> Result<Self, DomainError> {
        let tag = tag.filter(|t| !t.is_empty());
        let author = author.filter(|a| !a.is_empty());
        if tag.is_none() && author.is_none() {
            return Err(DomainError::MissingFilter);
        }
        Ok(Self { tag, author })
    }

    pub fn matches(&self, post: &BlogPost) -> bool {
        let tag_matches = self
            .tag
            .as_ref()
            .is_none_or(|tag| post.tags.iter().any(|t| t == tag));
        let author_matches = self
            .author
            .as_ref()
            .is_none_or(|name| &post.author.name == name);
        tag_matches && author_matches
    }
}

/// What a bulk update touched, in the store's own vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSummary {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<String>,
}

impl UpdateSummary {
    pub fn new(matched_count: u64, modified_count: u64) -> Self {
        Self {
            acknowledged: true,
            matched_count,
            modified_count,
            upserted_count: 0,
            upserted_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author_input() -> AuthorInput {
        AuthorInput {
            name: Some("Omar".into()),
            age: Some(28.0),
            gender: Some("male".into()),
            nationality: Some("Iraqi".into()),
            areas_of_expertise: Some(vec!["rust".into()]),
        }
    }

    fn post_input() -> PostInput {
        PostInput {
            title: Some("Hello".into()),
            content: Some("World".into()),
            tags: None,
            author: Some(author_input()),
        }
    }

    #[test]
    fn new_post_starts_with_zero_likes_and_equal_timestamps() {
        let post = BlogPost::new(post_input().into_new_post().unwrap(), None);
        assert_eq!(post.likes, 0);
        assert!(post.tags.is_empty());
        assert_eq!(post.created_at, post.updated_at);
        assert_ne!(post.id, post.author.id);
    }

    #[test]
    fn reused_author_id_is_kept() {
        let author_id = ObjectId::new();
        let post = BlogPost::new(post_input().into_new_post().unwrap(), Some(author_id));
        assert_eq!(post.author.id, author_id);
    }

    #[test]
    fn create_reports_nested_author_paths() {
        let input = PostInput {
            title: Some("t".repeat(121)),
            author: Some(AuthorInput {
                age: None,
                ..author_input()
            }),
            ..post_input()
        };
        let message = input.into_new_post().unwrap_err().to_string();
        assert!(message.starts_with("blogpost validation failed: title:"));
        assert!(message.contains("author.age: is required"));
    }

    #[test]
    fn create_requires_an_author() {
        let input = PostInput {
            author: None,
            ..post_input()
        };
        let message = input.into_new_post().unwrap_err().to_string();
        assert_eq!(message, "blogpost validation failed: author: is required");
    }

    #[test]
    fn patch_validates_only_present_fields() {
        let patch = PostInput {
            tags: Some(vec!["a".into()]),
            ..PostInput::default()
        }
        .into_patch()
        .unwrap();
        assert_eq!(patch.tags, Some(vec!["a".to_string()]));
        assert!(patch.title.is_none() && patch.author.is_none());

        let err = PostInput {
            content: Some(String::new()),
            ..PostInput::default()
        }
        .into_patch()
        .unwrap_err();
        assert!(err.to_string().contains("content: is required"));
    }

    #[test]
    fn patch_replacing_the_author_needs_a_complete_author() {
        let err = PostInput {
            author: Some(AuthorInput {
                age: Some(5.0),
                ..AuthorInput::default()
            }),
            ..PostInput::default()
        }
        .into_patch()
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "blogpost validation failed: author.name: is required, author.gender: is required, \
             author.nationality: is required"
        );

        let patch = PostInput {
            author: Some(author_input()),
            ..PostInput::default()
        }
        .into_patch()
        .unwrap();
        let author = patch.author.unwrap();
        assert_eq!(author.name, "Omar");
        assert_eq!(author.nationality, crate::domain::author::Nationality::Iraqi);
    }

    #[test]
    fn filter_needs_at_least_one_non_empty_value() {
        assert!(matches!(
            PostFilter::new(None, Some(String::new())),
            Err(DomainError::MissingFilter)
        ));
        let filter = PostFilter::new(Some("rust".into()), Some(String::new())).unwrap();
        assert_eq!(filter.author, None);
    }

    #[test]
    fn filter_is_a_conjunction() {
        let mut post = BlogPost::new(post_input().into_new_post().unwrap(), None);
        post.tags = vec!["rust".into()];

        let both = PostFilter::new(Some("rust".into()), Some("Omar".into())).unwrap();
        assert!(both.matches(&post));

        let wrong_author = PostFilter::new(Some("rust".into()), Some("Zed".into())).unwrap();
        assert!(!wrong_author.matches(&post));
    }
}
