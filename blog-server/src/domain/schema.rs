//! Field rules shared by the post and author schemas.
//!
//! Writes are checked here before they reach the store. Every rule that fails
//! is recorded, and the caller gets a single message listing all of them.

use crate::domain::error::DomainError;

pub const AUTHOR_NAME_MAX_LEN: usize = 30;
pub const POST_TITLE_MAX_LEN: usize = 120;

pub(crate) struct Violations {
    entity: &'static str,
    prefix: &'static str,
    errors: Vec<String>,
}

impl Violations {
    pub fn new(entity: &'static str) -> Self {
        Self {
            entity,
            prefix: "",
            errors: Vec::new(),
        }
    }

    /// Report paths of a nested document as `<prefix><field>`.
    pub fn nested(&self, prefix: &'static str) -> Violations {
        Violations {
            entity: self.entity,
            prefix,
            errors: Vec::new(),
        }
    }

    pub fn absorb(&mut self, nested: Violations) {
        self.errors.extend(nested.errors);
    }

    pub fn push(&mut self, field: &str, reason: impl std::fmt::Display) {
        self.errors.push(format!("{}{}: {}", self.prefix, field, reason));
    }

    pub fn required<T>(&mut self, field: &str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.push(field, "is required");
        }
        value
    }

    /// Non-empty string, optionally bounded in characters.
    pub fn text(&mut self, field: &str, value: &str, max_len: Option<usize>) {
        if value.is_empty() {
            self.push(field, "is required");
            return;
        }
        if let Some(max) = max_len {
            let len = value.chars().count();
            if len > max {
                self.push(
                    field,
                    format!("is longer than the maximum allowed length ({max}), got {len}"),
                );
            }
        }
    }

    pub fn finish(self) -> Result<(), DomainError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(format!(
                "{} validation failed: {}",
                self.entity,
                self.errors.join(", ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_every_violation_into_one_message() {
        let mut v = Violations::new("blogpost");
        v.required::<String>("title", None);
        let mut author = v.nested("author.");
        author.text("name", "", Some(AUTHOR_NAME_MAX_LEN));
        v.absorb(author);

        let err = v.finish().unwrap_err();
        assert_eq!(
            err.to_string(),
            "blogpost validation failed: title: is required, author.name: is required"
        );
    }

    #[test]
    fn length_is_counted_in_characters() {
        let mut v = Violations::new("author");
        v.text("name", &"é".repeat(AUTHOR_NAME_MAX_LEN), Some(AUTHOR_NAME_MAX_LEN));
        assert!(v.finish().is_ok());

        let mut v = Violations::new("author");
        v.text("name", &"a".repeat(AUTHOR_NAME_MAX_LEN + 1), Some(AUTHOR_NAME_MAX_LEN));
        let message = v.finish().unwrap_err().to_string();
        assert!(message.contains("maximum allowed length (30), got 31"));
    }
}
