//! Identity fields of a [`Client`](crate::model::Client) and its tags.
//!
//! Each type guarantees: immutable, and valid as declared by its `is_valid`
//! predicate. Construction is the only place validation happens.

use crate::model::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9 ]*$").expect("valid name regex"));
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{3,}$").expect("valid phone regex"));
static EMAIL_LOCAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9]+(?:[+_.\-][A-Za-z0-9]+)*$").expect("valid email local-part regex")
});
static EMAIL_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?$").expect("valid email label regex")
});
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9]+$").expect("valid tag regex"));

/// A client's full name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Name(String);

impl Name {
    pub const CONSTRAINTS: &'static str =
        "Names should only contain alphanumeric characters and spaces, and it should not be blank";

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if !Self::is_valid(&value) {
            return Err(ValidationError::new("name", Self::CONSTRAINTS));
        }
        Ok(Self(value))
    }

    pub fn is_valid(value: &str) -> bool {
        NAME_RE.is_match(value)
    }

    /// First character of the name, used by the display sort.
    pub fn first_letter(&self) -> char {
        // Never empty: the regex requires a leading alphanumeric.
        self.0.chars().next().unwrap_or_default()
    }
}

text_value!(Name);

/// A client's phone number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Phone(String);

impl Phone {
    pub const CONSTRAINTS: &'static str =
        "Phone numbers should only contain numbers, and it should be at least 3 digits long";

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if !Self::is_valid(&value) {
            return Err(ValidationError::new("phone", Self::CONSTRAINTS));
        }
        Ok(Self(value))
    }

    pub fn is_valid(value: &str) -> bool {
        PHONE_RE.is_match(value)
    }
}

text_value!(Phone);

/// A client's email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub const CONSTRAINTS: &'static str = "Emails should be of the format local-part@domain. \
         The local-part should only contain alphanumeric characters and the special characters \
         +_.-, and may not start or end with a special character. The domain is made up of labels \
         separated by periods; each label starts and ends with an alphanumeric character, may \
         contain hyphens in between, and the last label is at least 2 characters long";

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if !Self::is_valid(&value) {
            return Err(ValidationError::new("email", Self::CONSTRAINTS));
        }
        Ok(Self(value))
    }

    pub fn is_valid(value: &str) -> bool {
        let Some((local, domain)) = value.split_once('@') else {
            return false;
        };
        if !EMAIL_LOCAL_RE.is_match(local) {
            return false;
        }
        let labels: Vec<&str> = domain.split('.').collect();
        let last_ok = labels.last().is_some_and(|label| label.len() >= 2);
        last_ok && labels.iter().all(|label| EMAIL_LABEL_RE.is_match(label))
    }
}

text_value!(Email);

/// A client's postal address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    pub const CONSTRAINTS: &'static str =
        "Addresses can take any values, and it should not be blank";

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if !Self::is_valid(&value) {
            return Err(ValidationError::new("address", Self::CONSTRAINTS));
        }
        Ok(Self(value))
    }

    pub fn is_valid(value: &str) -> bool {
        value.chars().next().is_some_and(|c| !c.is_whitespace())
    }
}

text_value!(Address);

/// A free-form label attached to a client. Tags are unique by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tag(String);

impl Tag {
    pub const CONSTRAINTS: &'static str = "Tags names should be alphanumeric";

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if !Self::is_valid(&value) {
            return Err(ValidationError::new("tag", Self::CONSTRAINTS));
        }
        Ok(Self(value))
    }

    pub fn is_valid(value: &str) -> bool {
        TAG_RE.is_match(value)
    }
}

text_value!(Tag);
