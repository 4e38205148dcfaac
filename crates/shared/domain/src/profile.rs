//! Elderly profile (care recipient) entity.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Gender of a care recipient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    Male,
    Female,
}

/// A person receiving care
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElderlyProfile {
    pub id: String,
    pub name: String,
    pub gender: Gender,
    pub avatar_url: String,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

impl ElderlyProfile {
    /// Materialize a profile form submission under the given id
    pub fn from_new(id: String, new: NewElderlyProfile) -> Self {
        let avatar_url = new
            .avatar_url
            .unwrap_or_else(|| crate::user::avatar_url(&new.name));
        Self {
            id,
            name: new.name,
            gender: new.gender,
            avatar_url,
            conditions: new.conditions,
            notes: new.notes,
        }
    }
}

/// Profile creation data transfer object
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewElderlyProfile {
    /// Caller-chosen id; generated when absent
    #[serde(default)]
    pub id: Option<String>,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub gender: Gender,
    /// Generated from the name when absent
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

/// Split a comma-separated conditions field, trimming and dropping blanks
pub fn parse_conditions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_conditions() {
        assert_eq!(
            parse_conditions(" Hipertensão, Diabetes Tipo 2,, "),
            vec!["Hipertensão".to_string(), "Diabetes Tipo 2".to_string()]
        );
        assert!(parse_conditions("").is_empty());
    }

    #[test]
    fn test_from_new_generates_avatar() {
        let new = NewElderlyProfile {
            id: None,
            name: "Tio Paulo".to_string(),
            gender: Gender::Male,
            avatar_url: None,
            conditions: vec![],
            notes: String::new(),
        };
        let profile = ElderlyProfile::from_new("e9".to_string(), new);
        assert_eq!(profile.id, "e9");
        assert_eq!(profile.avatar_url, crate::user::avatar_url("Tio Paulo"));
    }
}
