//! Portfolio profile data
//!
//! Everything the terminal commands print about the portfolio owner. The
//! built-in profile is used unless `~/.termfolio/profile.toml` (or the path
//! given by `profile = "..."` / `--profile`) provides one. A profile file
//! replaces the built-in one entirely: fields it leaves out stay empty.
//!
//! ```toml
//! name = "Ada Example"
//! title = "Systems Engineer"
//! bio = "Builds things."
//!
//! [[skills]]
//! category = "Languages"
//! items = ["Rust", "Go"]
//!
//! [[projects]]
//! name = "widget"
//! description = "A widget"
//! tech = ["Rust"]
//!
//! [contact]
//! email = "ada@example.com"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Portfolio owner profile
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default = "Profile::empty")]
pub struct Profile {
    pub name: String,
    pub title: String,
    pub location: String,
    pub bio: String,
    /// Reported by `whoami`
    pub username: String,
    /// Reported by `pwd`
    pub home: String,
    pub skills: Vec<SkillGroup>,
    pub projects: Vec<Project>,
    pub contact: Contact,
    pub resume_url: String,
}

/// A named group of skills
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillGroup {
    pub category: String,
    pub items: Vec<String>,
}

/// A portfolio project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub tech: Vec<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Contact channels
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub email: Option<String>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: "Alex Rivera".to_string(),
            title: "Full-Stack Developer".to_string(),
            location: "Lisbon, Portugal".to_string(),
            bio: "I build fast, friendly software for the web and the terminal.\n\
                  Currently focused on developer tooling and interactive UIs."
                .to_string(),
            username: "guest".to_string(),
            home: "/home/guest".to_string(),
            skills: vec![
                SkillGroup {
                    category: "Languages".to_string(),
                    items: vec!["Rust", "TypeScript", "Python", "Go"]
                        .into_iter()
                        .map(String::from)
                        .collect(),
                },
                SkillGroup {
                    category: "Frontend".to_string(),
                    items: vec!["Vue", "React", "Tailwind CSS"]
                        .into_iter()
                        .map(String::from)
                        .collect(),
                },
                SkillGroup {
                    category: "Tooling".to_string(),
                    items: vec!["Docker", "GitHub Actions", "PostgreSQL"]
                        .into_iter()
                        .map(String::from)
                        .collect(),
                },
            ],
            projects: vec![
                Project {
                    name: "termfolio".to_string(),
                    description: "This interactive terminal portfolio".to_string(),
                    tech: vec!["Rust".to_string(), "crossterm".to_string()],
                    url: Some("https://github.com/user/termfolio".to_string()),
                },
                Project {
                    name: "contrib-graph".to_string(),
                    description: "GitHub contribution streak tracker".to_string(),
                    tech: vec!["TypeScript".to_string(), "GraphQL".to_string()],
                    url: None,
                },
            ],
            contact: Contact {
                email: Some("hello@example.com".to_string()),
                github: Some("https://github.com/user".to_string()),
                linkedin: None,
                twitter: None,
            },
            resume_url: "https://example.com/resume.pdf".to_string(),
        }
    }
}

impl Profile {
    /// Profile with no owner data, the base for profile files
    pub fn empty() -> Self {
        Self {
            name: String::new(),
            title: String::new(),
            location: String::new(),
            bio: String::new(),
            username: "guest".to_string(),
            home: "/home/guest".to_string(),
            skills: Vec::new(),
            projects: Vec::new(),
            contact: Contact::default(),
            resume_url: String::new(),
        }
    }

    /// Load a profile from a TOML file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Contact channels that are set, as `(label, value)`
    pub fn contact_entries(&self) -> Vec<(&'static str, &str)> {
        let c = &self.contact;
        [
            ("Email", c.email.as_deref()),
            ("GitHub", c.github.as_deref()),
            ("LinkedIn", c.linkedin.as_deref()),
            ("Twitter", c.twitter.as_deref()),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.map(|v| (label, v)))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_profile() {
        let profile = Profile::parse(
            r#"
            name = "Ada Example"

            [[projects]]
            name = "widget"
            description = "A widget"

            [contact]
            email = "ada@example.com"
            "#,
        )
        .unwrap();

        assert_eq!(profile.name, "Ada Example");
        assert_eq!(profile.projects.len(), 1);
        assert!(profile.projects[0].tech.is_empty());
        assert_eq!(profile.username, "guest");
        assert_eq!(profile.contact_entries(), vec![("Email", "ada@example.com")]);
    }

    #[test]
    fn test_parse_does_not_mix_in_builtin_owner() {
        let profile = Profile::parse("name = \"Ada Example\"").unwrap();

        assert_eq!(profile.name, "Ada Example");
        assert!(profile.title.is_empty());
        assert!(profile.location.is_empty());
        assert!(profile.bio.is_empty());
        assert!(profile.skills.is_empty());
        assert!(profile.projects.is_empty());
        assert!(profile.contact_entries().is_empty());
        assert!(profile.resume_url.is_empty());
        assert_eq!(profile.home, "/home/guest");
    }

    #[test]
    fn test_parse_rejects_bad_types() {
        assert!(Profile::parse("name = 42").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Profile::load_from(Path::new("/nonexistent/termfolio/profile.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
