//! `User` record exchanged with neighbouring services.
//!
//! The selector never looks at it. It is carried here so that callers sharing a rule
//! feed with those services also share one codec for this record.
//!
//! Wire form is a MessagePack array whose positions follow the field tags:
//!
//! | position | field      | tag |
//! |----------|------------|-----|
//! | 0        | `name`     | 1   |
//! | 1        | `gender`   | 2   |
//! | 2        | `usercode` | 3   |
//! | 3        | `age`      | 4   |
//!
//! All four fields are required on decode. Map-encoded input (field names as keys) is
//! accepted too.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum Gender {
    Male = 0,
    Female = 1,
}

impl From<Gender> for i32 {
    fn from(g: Gender) -> Self {
        g as i32
    }
}

impl TryFrom<i32> for Gender {
    type Error = Error;

    fn try_from(v: i32) -> Result<Self> {
        match v {
            0 => Ok(Gender::Male),
            1 => Ok(Gender::Female),
            other => Err(Error::UnknownGender(other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub gender: Gender,
    pub usercode: String,
    pub age: i32,
}

impl User {
    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(rmp_serde::to_vec(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(rmp_serde::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_sit_at_their_tag_positions() {
        let bytes = rmp_serde::to_vec(&("tony", 1, "u-001", 31)).unwrap();
        let u = User::decode(&bytes).unwrap();
        assert_eq!(
            u,
            User {
                name: "tony".into(),
                gender: Gender::Female,
                usercode: "u-001".into(),
                age: 31,
            }
        );
        assert_eq!(u.encode().unwrap(), bytes);
    }

    #[test]
    fn gender_out_of_range_is_rejected() {
        assert!(matches!(Gender::try_from(7), Err(Error::UnknownGender(7))));
        let bytes = rmp_serde::to_vec(&("tony", 7, "u-001", 31)).unwrap();
        let err = User::decode(&bytes).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
        assert!(err.to_string().contains("unknown gender value 7"), "{err}");
    }

    #[test]
    fn every_field_is_required() {
        let bytes = rmp_serde::to_vec(&("tony", 0, "u-001")).unwrap();
        assert!(matches!(User::decode(&bytes), Err(Error::Decode(_))));
    }
}
