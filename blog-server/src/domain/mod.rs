pub mod author;
pub mod error;
pub mod id;
pub mod post;
pub mod schema;
