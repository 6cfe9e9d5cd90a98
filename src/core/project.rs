//! Project domain model
//!
//! A project pairs a GitHub repository with a local checkout and the
//! configuration used to name branches and seed worktrees. The configuration
//! is stored as a single JSON document so the table layout never has to
//! change when the configuration grows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::core::store::{ProjectRow, StoreError, StoredProject};

/// Default branch naming pattern
pub const DEFAULT_BRANCH_PATTERN: &str = "{prefix}/{issue-number}-{slug}";

/// Default cap on the generated slug part of a branch name
pub const DEFAULT_MAX_SLUG_LENGTH: usize = 50;

/// Default file written into a worktree for the assistant integration
pub const DEFAULT_CONTEXT_FILE: &str = ".opencode-context";

/// A tracked project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub github_owner: String,
    pub github_repo: String,
    #[serde(default)]
    pub local_path: String,
    #[serde(default)]
    pub worktree_dir: String,
    #[serde(default)]
    pub config: ProjectConfig,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Per-project configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    #[serde(deserialize_with = "null_as_empty")]
    pub issue_types: Vec<IssueType>,
    pub branch_config: BranchConfig,
    #[serde(rename = "opencode")]
    pub integration: IntegrationConfig,
}

/// A kind of issue (bug, feature, ...) and how work on it is set up
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueType {
    pub name: String,
    pub label: String,
    /// Allowed priority values, highest first
    #[serde(deserialize_with = "null_as_empty")]
    pub priority: Vec<String>,
    pub branch_prefix: String,
    pub template: String,
    pub guides_dir: String,
}

/// Branch naming rules
///
/// The pattern may use `{prefix}`, `{issue-number}` and `{slug}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BranchConfig {
    pub pattern: String,
    pub max_slug_length: usize,
}

impl Default for BranchConfig {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_BRANCH_PATTERN.to_string(),
            max_slug_length: DEFAULT_MAX_SLUG_LENGTH,
        }
    }
}

/// Coding-assistant integration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationConfig {
    pub enabled: bool,
    pub auto_launch: bool,
    pub context_file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_template: Option<String>,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            auto_launch: false,
            context_file: DEFAULT_CONTEXT_FILE.to_string(),
            context_template: None,
        }
    }
}

/// Read a list that older databases may have stored as `null`
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Errors raised while validating or mapping projects
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("{0} is required")]
    Invalid(&'static str),

    #[error("failed to marshal config")]
    EncodeConfig(#[source] serde_json::Error),

    #[error("failed to unmarshal config for project {id}")]
    DecodeConfig {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ProjectError {
    /// True when the underlying store found no matching row
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProjectError::Store(e) if e.is_not_found())
    }
}

impl Project {
    /// Build a project with default configuration
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        github_owner: impl Into<String>,
        github_repo: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            github_owner: github_owner.into(),
            github_repo: github_repo.into(),
            local_path: String::new(),
            worktree_dir: String::new(),
            config: ProjectConfig::default(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Check the fields every project must carry
    pub fn validate(&self) -> Result<(), ProjectError> {
        if self.id.trim().is_empty() {
            return Err(ProjectError::Invalid("project ID"));
        }
        if self.name.trim().is_empty() {
            return Err(ProjectError::Invalid("project name"));
        }
        if self.github_owner.trim().is_empty() {
            return Err(ProjectError::Invalid("GitHub owner"));
        }
        if self.github_repo.trim().is_empty() {
            return Err(ProjectError::Invalid("GitHub repo"));
        }
        Ok(())
    }

    /// `owner/repo`
    pub fn github_full_name(&self) -> String {
        format!("{}/{}", self.github_owner, self.github_repo)
    }

    /// Find an issue type by name
    pub fn issue_type(&self, name: &str) -> Option<&IssueType> {
        self.config.issue_types.iter().find(|t| t.name == name)
    }

    /// Branch name for an issue, following the project's branch pattern
    pub fn branch_name(&self, prefix: &str, issue_number: i64, title: &str) -> String {
        let branch = &self.config.branch_config;
        branch
            .pattern
            .replace("{prefix}", prefix)
            .replace("{issue-number}", &issue_number.to_string())
            .replace("{slug}", &slugify(title, branch.max_slug_length))
    }

    /// Flatten into the storage representation
    pub fn to_row(&self) -> Result<ProjectRow, ProjectError> {
        let config = serde_json::to_string(&self.config).map_err(ProjectError::EncodeConfig)?;

        Ok(ProjectRow {
            id: self.id.clone(),
            name: self.name.clone(),
            github_owner: self.github_owner.clone(),
            github_repo: self.github_repo.clone(),
            local_path: self.local_path.clone(),
            worktree_dir: self.worktree_dir.clone(),
            config,
        })
    }

    /// Rebuild from the storage representation
    pub fn from_stored(stored: StoredProject) -> Result<Self, ProjectError> {
        let config: ProjectConfig =
            serde_json::from_str(&stored.config).map_err(|source| ProjectError::DecodeConfig {
                id: stored.id.clone(),
                source,
            })?;

        Ok(Self {
            id: stored.id,
            name: stored.name,
            github_owner: stored.github_owner,
            github_repo: stored.github_repo,
            local_path: stored.local_path,
            worktree_dir: stored.worktree_dir,
            config,
            created_at: Some(stored.created_at),
            updated_at: Some(stored.updated_at),
        })
    }
}

/// Lowercase ASCII slug of a title, at most `max_len` characters
pub fn slugify(title: &str, max_len: usize) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }

    slug.truncate(max_len);
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Project {
        let mut project = Project::new("demo", "Demo", "octo", "hello");
        project.config.issue_types.push(IssueType {
            name: "bug".to_string(),
            label: "bug".to_string(),
            priority: vec!["high".to_string(), "low".to_string()],
            branch_prefix: "fix".to_string(),
            template: "bug.md".to_string(),
            guides_dir: "docs/guides".to_string(),
        });
        project
    }

    #[test]
    fn test_validate_requires_fields() {
        assert!(sample().validate().is_ok());

        let mut p = sample();
        p.id = String::new();
        assert_eq!(p.validate().unwrap_err().to_string(), "project ID is required");

        let mut p = sample();
        p.name = "  ".to_string();
        assert_eq!(p.validate().unwrap_err().to_string(), "project name is required");

        let mut p = sample();
        p.github_owner = String::new();
        assert_eq!(p.validate().unwrap_err().to_string(), "GitHub owner is required");

        let mut p = sample();
        p.github_repo = String::new();
        assert_eq!(p.validate().unwrap_err().to_string(), "GitHub repo is required");
    }

    #[test]
    fn test_github_full_name() {
        assert_eq!(sample().github_full_name(), "octo/hello");
    }

    #[test]
    fn test_issue_type_lookup() {
        let p = sample();
        assert_eq!(p.issue_type("bug").unwrap().branch_prefix, "fix");
        assert!(p.issue_type("feature").is_none());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Fix: crash on empty input!", 50), "fix-crash-on-empty-input");
        assert_eq!(slugify("Fix: crash on empty input!", 10), "fix-crash");
        assert_eq!(slugify("  Ünïcode -- title  ", 50), "n-code-title");
        assert_eq!(slugify("!!!", 50), "");
    }

    #[test]
    fn test_branch_name_uses_pattern() {
        let mut p = sample();
        assert_eq!(
            p.branch_name("fix", 42, "Crash on start"),
            "fix/42-crash-on-start"
        );

        p.config.branch_config.pattern = "{issue-number}/{slug}".to_string();
        p.config.branch_config.max_slug_length = 5;
        assert_eq!(p.branch_name("fix", 7, "Crash on start"), "7/crash");
    }

    #[test]
    fn test_config_defaults() {
        let config = ProjectConfig::default();
        assert_eq!(config.branch_config.pattern, DEFAULT_BRANCH_PATTERN);
        assert_eq!(config.branch_config.max_slug_length, 50);
        assert!(config.integration.enabled);
        assert!(!config.integration.auto_launch);
        assert_eq!(config.integration.context_file, ".opencode-context");
    }

    #[test]
    fn test_config_json_keys() {
        let json = serde_json::to_value(ProjectConfig::default()).unwrap();
        assert!(json.get("issue_types").is_some());
        assert_eq!(json["branch_config"]["max_slug_length"], 50);
        assert_eq!(json["opencode"]["context_file"], ".opencode-context");
        assert!(json["opencode"].get("context_template").is_none());
    }

    #[test]
    fn test_decode_partial_config_fills_defaults() {
        let config: ProjectConfig =
            serde_json::from_str(r#"{"branch_config":{"pattern":"{slug}"}}"#).unwrap();
        assert_eq!(config.branch_config.pattern, "{slug}");
        assert_eq!(config.branch_config.max_slug_length, DEFAULT_MAX_SLUG_LENGTH);
        assert!(config.integration.enabled);
    }

    #[test]
    fn test_row_mapping_keeps_config() {
        let project = sample();
        let row = project.to_row().unwrap();
        assert_eq!(row.id, "demo");

        let stored = StoredProject {
            id: row.id,
            name: row.name,
            github_owner: row.github_owner,
            github_repo: row.github_repo,
            local_path: row.local_path,
            worktree_dir: row.worktree_dir,
            config: row.config,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let back = Project::from_stored(stored).unwrap();
        assert_eq!(back.config, project.config);
        assert!(back.created_at.is_some());
    }

    #[test]
    fn test_decode_config_with_null_lists() {
        let stored = StoredProject {
            id: "legacy".to_string(),
            name: "Legacy".to_string(),
            github_owner: "octo".to_string(),
            github_repo: "hello".to_string(),
            local_path: "/src/hello".to_string(),
            worktree_dir: String::new(),
            config: r#"{"issue_types":null,"branch_config":{"pattern":"{prefix}/{issue-number}-{slug}","max_slug_length":50},"opencode":{"enabled":true,"auto_launch":false,"context_file":".opencode-context","context_template":""}}"#.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let project = Project::from_stored(stored).unwrap();
        assert!(project.config.issue_types.is_empty());
        assert_eq!(project.config.branch_config, BranchConfig::default());
        assert_eq!(project.config.integration.context_template.as_deref(), Some(""));

        let config: ProjectConfig =
            serde_json::from_str(r#"{"issue_types":[{"name":"bug","priority":null}]}"#).unwrap();
        assert_eq!(config.issue_types[0].name, "bug");
        assert!(config.issue_types[0].priority.is_empty());
    }

    #[test]
    fn test_bad_config_blob_is_decode_error() {
        let stored = StoredProject {
            id: "broken".to_string(),
            name: "Broken".to_string(),
            github_owner: "o".to_string(),
            github_repo: "r".to_string(),
            local_path: String::new(),
            worktree_dir: String::new(),
            config: "not json".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let err = Project::from_stored(stored).unwrap_err();
        assert!(matches!(err, ProjectError::DecodeConfig { .. }));
        assert!(!err.is_not_found());
    }
}
