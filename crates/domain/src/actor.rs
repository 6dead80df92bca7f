//! Actor: a performer available for casting.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::ResourceKind;
use crate::id::ActorId;
use crate::resource::Resource;
use crate::validation::{
    self, FieldRule, FieldSet, FieldType, FieldValue, Mode, ValidationError, non_empty,
    positive_i32,
};

/// The fixed set of accepted genders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when text is not exactly `Male` or `Female`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown gender {0:?}")]
pub struct UnknownGender(pub String);

impl FromStr for Gender {
    type Err = UnknownGender;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Self::Male),
            "Female" => Ok(Self::Female),
            other => Err(UnknownGender(other.to_string())),
        }
    }
}

/// A persisted actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub name: String,
    pub age: i32,
    pub gender: Gender,
}

/// Validated input of an actor create; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActor {
    pub name: String,
    pub age: i32,
    pub gender: Gender,
}

/// Validated input of an actor partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActorPatch {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
}

fn known_gender(value: &FieldValue) -> Result<(), &'static str> {
    match value {
        FieldValue::Text(text) if text.parse::<Gender>().is_err() => {
            Err("must be either 'Male' or 'Female'")
        }
        _ => Ok(()),
    }
}

const RULES: [FieldRule; 3] = [
    FieldRule {
        name: "name",
        field_type: FieldType::Text,
        range: non_empty,
    },
    FieldRule {
        name: "age",
        field_type: FieldType::Integer,
        range: positive_i32,
    },
    FieldRule {
        name: "gender",
        field_type: FieldType::Text,
        range: known_gender,
    },
];

fn take_gender(fields: &mut FieldSet) -> Result<Option<Gender>, ValidationError> {
    fields
        .take_text("gender")
        .map(|text| {
            text.parse().map_err(|_| ValidationError::OutOfRange {
                field: "gender",
                reason: "must be either 'Male' or 'Female'",
            })
        })
        .transpose()
}

impl Resource for Actor {
    type Id = ActorId;
    type Draft = NewActor;
    type Patch = ActorPatch;

    const KIND: ResourceKind = ResourceKind::Actors;
    const NAME: &'static str = "Actor";

    fn id(&self) -> ActorId {
        self.id
    }

    fn draft_from_body(body: &Value) -> Result<NewActor, ValidationError> {
        let mut fields = validation::validate(body, &RULES, Mode::Create)?;
        let name = fields.require_text("name")?;
        let age = fields.require_i32("age")?;
        let gender =
            take_gender(&mut fields)?.ok_or(ValidationError::MissingField { field: "gender" })?;
        Ok(NewActor { name, age, gender })
    }

    fn patch_from_body(body: &Value) -> Result<ActorPatch, ValidationError> {
        let mut fields = validation::validate(body, &RULES, Mode::Update)?;
        Ok(ActorPatch {
            name: fields.take_text("name"),
            age: fields.take_i32("age")?,
            gender: take_gender(&mut fields)?,
        })
    }

    fn apply(&mut self, patch: ActorPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(age) = patch.age {
            self.age = age;
        }
        if let Some(gender) = patch.gender {
            self.gender = gender;
        }
    }
}

impl NewActor {
    /// Attach the identifier the store assigned.
    #[must_use]
    pub fn into_actor(self, id: ActorId) -> Actor {
        Actor {
            id,
            name: self.name,
            age: self.age,
            gender: self.gender,
        }
    }
}
