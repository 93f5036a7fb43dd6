//! BSON shapes of the `blogposts` collection.

use bson::DateTime as BsonDateTime;
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::domain::author::{Author, Nationality};
use crate::domain::post::BlogPost;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub age: f64,
    pub gender: String,
    pub nationality: Nationality,
    #[serde(default)]
    pub areas_of_expertise: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub likes: i64,
    pub author: AuthorDocument,
    pub created_at: BsonDateTime,
    pub updated_at: BsonDateTime,
}

impl From<Author> for AuthorDocument {
    fn from(author: Author) -> Self {
        Self {
            id: author.id,
            name: author.name,
            age: author.age,
            gender: author.gender,
            nationality: author.nationality,
            areas_of_expertise: author.areas_of_expertise,
        }
    }
}

impl From<AuthorDocument> for Author {
    fn from(doc: AuthorDocument) -> Self {
        Self {
            id: doc.id,
            name: doc.name,
            age: doc.age,
            gender: doc.gender,
            nationality: doc.nationality,
            areas_of_expertise: doc.areas_of_expertise,
        }
    }
}

impl From<BlogPost> for PostDocument {
    fn from(post: BlogPost) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            tags: post.tags,
            likes: post.likes,
            author: post.author.into(),
            created_at: BsonDateTime::from_chrono(post.created_at),
            updated_at: BsonDateTime::from_chrono(post.updated_at),
        }
    }
}

impl From<PostDocument> for BlogPost {
    fn from(doc: PostDocument) -> Self {
        Self {
            id: doc.id,
            title: doc.title,
            content: doc.content,
            tags: doc.tags,
            likes: doc.likes,
            author: doc.author.into(),
            created_at: doc.created_at.to_chrono(),
            updated_at: doc.updated_at.to_chrono(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::post::now;

    fn post() -> BlogPost {
        let at = now();
        BlogPost {
            id: ObjectId::new(),
            title: "Title".into(),
            content: "Body".into(),
            tags: vec!["a".into(), "b".into()],
            likes: 3,
            author: Author {
                id: ObjectId::new(),
                name: "Lina".into(),
                age: 35.0,
                gender: "female".into(),
                nationality: Nationality::Syrian,
                areas_of_expertise: vec![],
            },
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn stored_shape_uses_native_ids_and_camel_case() {
        let post = post();
        let doc = bson::to_document(&PostDocument::from(post.clone())).unwrap();

        assert_eq!(doc.get_object_id("_id").unwrap(), post.id);
        assert!(doc.get_datetime("createdAt").is_ok());
        let author = doc.get_document("author").unwrap();
        assert_eq!(author.get_object_id("_id").unwrap(), post.author.id);
        assert_eq!(author.get_str("nationality").unwrap(), "Syrian");
        assert!(author.get_array("areasOfExpertise").is_ok());
    }

    #[test]
    fn reading_back_yields_the_same_post() {
        let post = post();
        let doc = bson::to_document(&PostDocument::from(post.clone())).unwrap();
        let back: PostDocument = bson::from_document(doc).unwrap();
        assert_eq!(BlogPost::from(back), post);
    }
}
