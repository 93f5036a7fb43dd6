pub mod author_service;
pub mod post_service;
