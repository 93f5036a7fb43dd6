use std::fmt;
use std::str::FromStr;

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize, Serializer};

use crate::domain::error::DomainError;
use crate::domain::id::hex;
use crate::domain::schema::{AUTHOR_NAME_MAX_LEN, Violations};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Nationality {
    Turkish,
    Iraqi,
    Syrian,
}

impl Nationality {
    pub const ALL: [Nationality; 3] = [Nationality::Turkish, Nationality::Iraqi, Nationality::Syrian];

    pub fn as_str(&self) -> &'static str {
        match self {
            Nationality::Turkish => "Turkish",
            Nationality::Iraqi => "Iraqi",
            Nationality::Syrian => "Syrian",
        }
    }
}

impl fmt::Display for Nationality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Nationality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Nationality::ALL
            .into_iter()
            .find(|n| n.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<&str> = Nationality::ALL.iter().map(|n| n.as_str()).collect();
                format!(
                    "`{}` is not a valid enum value (expected one of {})",
                    s,
                    allowed.join(", ")
                )
            })
    }
}

/// An author as embedded in a blog post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    #[serde(rename = "_id", with = "hex")]
    pub id: ObjectId,
    pub name: String,
    #[serde(serialize_with = "whole_number")]
    pub age: f64,
    pub gender: String,
    pub nationality: Nationality,
    #[serde(default)]
    pub areas_of_expertise: Vec<String>,
}

/// Whole numbers go out as `30`, not `30.0`.
fn whole_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Author fields exactly as a client sent them. Nothing here has been checked.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorInput {
    pub name: Option<String>,
    pub age: Option<f64>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub areas_of_expertise: Option<Vec<String>>,
}

/// A validated author that has not been given an identifier yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuthor {
    pub name: String,
    pub age: f64,
    pub gender: String,
    pub nationality: Nationality,
    pub areas_of_expertise: Vec<String>,
}

impl NewAuthor {
    pub fn with_id(self, id: ObjectId) -> Author {
        Author {
            id,
            name: self.name,
            age: self.age,
            gender: self.gender,
            nationality: self.nationality,
            areas_of_expertise: self.areas_of_expertise,
        }
    }
}

/// Validated subset of author fields to overwrite.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthorPatch {
    pub name: Option<String>,
    pub age: Option<f64>,
    pub gender: Option<String>,
    pub nationality: Option<Nationality>,
    pub areas_of_expertise: Option<Vec<String>>,
}

impl AuthorPatch {
    pub fn apply(&self, author: &mut Author) {
        if let Some(name) = &self.name {
            author.name = name.clone();
        }
        if let Some(age) = self.age {
            author.age = age;
        }
        if let Some(gender) = &self.gender {
            author.gender = gender.clone();
        }
        if let Some(nationality) = self.nationality {
            author.nationality = nationality;
        }
        if let Some(areas) = &self.areas_of_expertise {
            author.areas_of_expertise = areas.clone();
        }
    }
}

impl AuthorInput {
    /// Check only the fields that are present.
    pub fn into_patch(self) -> Result<AuthorPatch, DomainError> {
        let mut violations = Violations::new("author");
        if let Some(name) = &self.name {
            violations.text("name", name, Some(AUTHOR_NAME_MAX_LEN));
        }
        if let Some(gender) = &self.gender {
            violations.text("gender", gender, None);
        }
        let nationality = self
            .nationality
            .as_deref()
            .and_then(|raw| parse_nationality(&mut violations, raw));
        violations.finish()?;

        Ok(AuthorPatch {
            name: self.name,
            age: self.age,
            gender: self.gender,
            nationality,
            areas_of_expertise: self.areas_of_expertise,
        })
    }

    /// Require every schema field, as when an author is embedded in a post.
    pub(crate) fn collect(self, violations: &mut Violations) -> Option<NewAuthor> {
        let name = violations.required("name", self.name);
        if let Some(name) = &name {
            violations.text("name", name, Some(AUTHOR_NAME_MAX_LEN));
        }
        let age = violations.required("age", self.age);
        let gender = violations.required("gender", self.gender);
        if let Some(gender) = &gender {
            violations.text("gender", gender, None);
        }
        let nationality = violations
            .required("nationality", self.nationality)
            .and_then(|raw| parse_nationality(violations, &raw));

        Some(NewAuthor {
            name: name?,
            age: age?,
            gender: gender?,
            nationality: nationality?,
            areas_of_expertise: self.areas_of_expertise.unwrap_or_default(),
        })
    }
}

fn parse_nationality(violations: &mut Violations, raw: &str) -> Option<Nationality> {
    raw.parse::<Nationality>()
        .map_err(|reason: String| violations.push("nationality", reason))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> AuthorInput {
        AuthorInput {
            name: Some("Ayse".into()),
            age: Some(31.0),
            gender: Some("female".into()),
            nationality: Some("Turkish".into()),
            areas_of_expertise: None,
        }
    }

    fn validate(input: AuthorInput) -> Result<Option<NewAuthor>, DomainError> {
        let mut violations = Violations::new("author");
        let author = input.collect(&mut violations);
        violations.finish().map(|_| author)
    }

    #[test]
    fn complete_input_defaults_expertise_to_empty() {
        let author = validate(input()).unwrap().unwrap();
        assert_eq!(author.nationality, Nationality::Turkish);
        assert!(author.areas_of_expertise.is_empty());
    }

    #[test]
    fn missing_fields_are_all_reported() {
        let err = validate(AuthorInput::default()).unwrap_err();
        let message = err.to_string();
        for field in ["name", "age", "gender", "nationality"] {
            assert!(message.contains(&format!("{field}: is required")), "{message}");
        }
    }

    #[test]
    fn nationality_outside_the_enum_is_rejected() {
        let err = validate(AuthorInput {
            nationality: Some("French".into()),
            ..input()
        })
        .unwrap_err();
        assert!(err.to_string().contains("`French` is not a valid enum value"));
    }

    #[test]
    fn patch_checks_only_present_fields() {
        let patch = AuthorInput {
            age: Some(30.0),
            ..AuthorInput::default()
        }
        .into_patch()
        .unwrap();
        assert_eq!(patch.age, Some(30.0));
        assert!(patch.name.is_none());

        let err = AuthorInput {
            name: Some("x".repeat(31)),
            ..AuthorInput::default()
        }
        .into_patch()
        .unwrap_err();
        assert!(err.to_string().starts_with("author validation failed: name:"));
    }

    #[test]
    fn patch_overwrites_only_given_fields() {
        let mut author = validate(input()).unwrap().unwrap().with_id(ObjectId::new());
        let patch = AuthorPatch {
            age: Some(40.0),
            areas_of_expertise: Some(vec!["design".into()]),
            ..AuthorPatch::default()
        };
        patch.apply(&mut author);
        assert_eq!(author.age, 40.0);
        assert_eq!(author.areas_of_expertise, vec!["design".to_string()]);
        assert_eq!(author.name, "Ayse");
    }

    #[test]
    fn whole_ages_are_written_without_a_fraction() {
        let mut author = validate(input()).unwrap().unwrap().with_id(ObjectId::new());
        let json = serde_json::to_value(&author).unwrap();
        assert!(json["age"].is_u64(), "{json}");
        assert_eq!(json["age"], 31);

        author.age = 31.5;
        let json = serde_json::to_value(&author).unwrap();
        assert_eq!(json["age"].as_f64(), Some(31.5));

        let back: Author = serde_json::from_value(json).unwrap();
        assert_eq!(back, author);
    }
}
