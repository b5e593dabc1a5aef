use serde::{Deserialize, Serialize};
use crate::errors::{OrganizerError, OrganizerResult};

/// Share of a repository's code written in one language, in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageShare {
    pub language: String,
    pub percentage: f64,
}

impl LanguageShare {
    pub fn new(language: &str, percentage: f64) -> OrganizerResult<Self> {
        if !(0.0..=100.0).contains(&percentage) {
            return Err(OrganizerError::config_error(
                &format!("percentage for {language} must be between 0 and 100, got {percentage}"),
                Some("percentage"),
            ));
        }

        Ok(Self {
            language: language.to_string(),
            percentage,
        })
    }
}

/// A remote repository as reported by the source-control provider.
///
/// Never mutated once built; `with_languages` returns a new instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub stars: u64,
    #[serde(default)]
    pub forks: u64,
    #[serde(default)]
    pub languages: Option<Vec<LanguageShare>>,
}

impl Repository {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            url: None,
            updated_at: None,
            is_archived: false,
            is_private: false,
            stars: 0,
            forks: 0,
            languages: None,
        }
    }

    pub fn with_languages(&self, languages: Vec<LanguageShare>) -> Self {
        Self {
            languages: Some(languages),
            ..self.clone()
        }
    }

    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }
}
