//! Movie: a production actors can be cast in.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::ResourceKind;
use crate::id::MovieId;
use crate::resource::Resource;
use crate::validation::{
    self, FieldRule, FieldType, Mode, ValidationError, non_empty, positive_i32,
};

/// A persisted movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub release_year: i32,
}

/// Validated input of a movie create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMovie {
    pub title: String,
    pub release_year: i32,
}

/// Validated input of a movie partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoviePatch {
    pub title: Option<String>,
    pub release_year: Option<i32>,
}

const RULES: [FieldRule; 2] = [
    FieldRule {
        name: "title",
        field_type: FieldType::Text,
        range: non_empty,
    },
    FieldRule {
        name: "release_year",
        field_type: FieldType::Integer,
        range: positive_i32,
    },
];

impl Resource for Movie {
    type Id = MovieId;
    type Draft = NewMovie;
    type Patch = MoviePatch;

    const KIND: ResourceKind = ResourceKind::Movies;
    const NAME: &'static str = "Movie";

    fn id(&self) -> MovieId {
        self.id
    }

    fn draft_from_body(body: &Value) -> Result<NewMovie, ValidationError> {
        let mut fields = validation::validate(body, &RULES, Mode::Create)?;
        Ok(NewMovie {
            title: fields.require_text("title")?,
            release_year: fields.require_i32("release_year")?,
        })
    }

    fn patch_from_body(body: &Value) -> Result<MoviePatch, ValidationError> {
        let mut fields = validation::validate(body, &RULES, Mode::Update)?;
        Ok(MoviePatch {
            title: fields.take_text("title"),
            release_year: fields.take_i32("release_year")?,
        })
    }

    fn apply(&mut self, patch: MoviePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(release_year) = patch.release_year {
            self.release_year = release_year;
        }
    }
}

impl NewMovie {
    /// Attach the identifier the store assigned.
    #[must_use]
    pub fn into_movie(self, id: MovieId) -> Movie {
        Movie {
            id,
            title: self.title,
            release_year: self.release_year,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn should_build_draft_when_body_is_complete() {
        let draft = Movie::draft_from_body(&json!({"title": "Dune", "release_year": 2021})).unwrap();
        assert_eq!(draft.title, "Dune");
        assert_eq!(draft.release_year, 2021);
    }

    #[test]
    fn should_reject_draft_with_missing_attributes() {
        let err = Movie::draft_from_body(&json!({"title": "Jumanji: The Next Level"})).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingField {
                field: "release_year"
            }
        );
    }

    #[test]
    fn should_reject_negative_release_year_as_range_error() {
        let err =
            Movie::patch_from_body(&json!({"title": "Rush Hour", "release_year": -1998})).unwrap_err();
        assert!(err.is_range_violation());
    }

    #[test]
    fn should_reject_empty_title_as_range_error() {
        let err = Movie::patch_from_body(&json!({"title": ""})).unwrap_err();
        assert_eq!(
            err,
            ValidationError::OutOfRange {
                field: "title",
                reason: "must not be empty"
            }
        );
    }

    #[test]
    fn should_keep_title_when_only_year_is_patched() {
        let mut movie = NewMovie {
            title: "Titanic".to_string(),
            release_year: 1996,
        }
        .into_movie(MovieId::new(3));
        movie.apply(Movie::patch_from_body(&json!({"release_year": 1997})).unwrap());

        assert_eq!(
            serde_json::to_value(&movie).unwrap(),
            json!({"id": 3, "title": "Titanic", "release_year": 1997})
        );
    }
}
