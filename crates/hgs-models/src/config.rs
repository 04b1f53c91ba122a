use serde::{Deserialize, Serialize};

/// Environment variable that selects which stored user profile to load.
pub const USER_ID_ENV: &str = "CURRENT_USER_ID";

/// User loaded when nothing else selects one.
pub const DEFAULT_USER_ID: &str = "family_smith_123";

/// Top-level configuration for HGS.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HgsConfig {
    pub profiles: ProfilesConfig,
    pub agents: AgentsConfig,
}

impl HgsConfig {
    /// Pick the active user: an explicit non-empty id wins, then the
    /// environment value, then the configured default.
    pub fn resolve_user_id(&self, explicit: Option<&str>, env_value: Option<&str>) -> String {
        [explicit, env_value]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|id| !id.is_empty())
            .unwrap_or(self.profiles.default_user_id.as_str())
            .to_string()
    }

    /// Same as [`resolve_user_id`](Self::resolve_user_id), reading `CURRENT_USER_ID`.
    pub fn active_user_id(&self, explicit: Option<&str>) -> String {
        let env_value = std::env::var(USER_ID_ENV).ok();
        self.resolve_user_id(explicit, env_value.as_deref())
    }
}

/// Where recipient profiles come from.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProfileSourceKind {
    /// The demo table compiled into the binary.
    #[default]
    Builtin,
    /// A read-only SQLite database at `sqlite_path`.
    Sqlite,
}

/// Configuration for the recipient profile store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProfilesConfig {
    pub source: ProfileSourceKind,
    pub sqlite_path: String,
    pub default_user_id: String,
}

impl Default for ProfilesConfig {
    fn default() -> Self {
        Self {
            source: ProfileSourceKind::Builtin,
            sqlite_path: "data/hgs_profiles.db".to_string(),
            default_user_id: DEFAULT_USER_ID.to_string(),
        }
    }
}

/// Configuration for the agent pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AgentsConfig {
    /// Model used by every stage unless overridden below.
    pub model: String,
    /// Override for the researchers.
    pub researcher_model: Option<String>,
    /// Override for the aggregator (final review and formatting).
    pub aggregator_model: Option<String>,
    /// How many researchers run in parallel.
    pub num_researchers: usize,
    /// How many ideas each researcher should return per recipient.
    pub ideas_per_recipient: usize,
    /// Per-call timeout for researchers, in seconds.
    pub researcher_timeout_seconds: u64,
    /// Per-call timeout for the concierge, collector and aggregator, in seconds.
    pub stage_timeout_seconds: u64,
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            model: "claude-3-5-haiku-latest".to_string(),
            researcher_model: None,
            aggregator_model: Some("claude-sonnet-4-5-20250929".to_string()),
            num_researchers: 3,
            ideas_per_recipient: 3,
            researcher_timeout_seconds: 60,
            stage_timeout_seconds: 120,
        }
    }
}

impl AgentsConfig {
    pub fn researcher_model(&self) -> &str {
        self.researcher_model.as_deref().unwrap_or(&self.model)
    }

    pub fn aggregator_model(&self) -> &str {
        self.aggregator_model.as_deref().unwrap_or(&self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_hgs_config() {
        let config = HgsConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: HgsConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn default_config_runs_three_researchers() {
        let agents = AgentsConfig::default();
        assert_eq!(agents.num_researchers, 3);
        assert_eq!(agents.researcher_model(), "claude-3-5-haiku-latest");
        assert_eq!(agents.aggregator_model(), "claude-sonnet-4-5-20250929");
    }

    #[test]
    fn config_from_toml() {
        let toml_str = r#"
[profiles]
source = "sqlite"
sqlite_path = "/tmp/profiles.db"
default_user_id = "user_johnson_456"

[agents]
model = "claude-3-5-haiku-latest"
num_researchers = 5
researcher_timeout_seconds = 30
"#;

        let config: HgsConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.profiles.source, ProfileSourceKind::Sqlite);
        assert_eq!(config.profiles.default_user_id, "user_johnson_456");
        assert_eq!(config.agents.num_researchers, 5);
        // Omitted fields keep their defaults
        assert_eq!(config.agents.stage_timeout_seconds, 120);
        assert_eq!(config.agents.ideas_per_recipient, 3);
    }

    #[test]
    fn empty_toml_is_default() {
        let config: HgsConfig = toml::from_str("").unwrap();
        assert_eq!(config, HgsConfig::default());
    }

    #[test]
    fn user_id_precedence() {
        let config = HgsConfig::default();
        assert_eq!(config.resolve_user_id(None, None), DEFAULT_USER_ID);
        assert_eq!(
            config.resolve_user_id(None, Some("student_alex_321")),
            "student_alex_321"
        );
        assert_eq!(
            config.resolve_user_id(Some("corporate_hr_789"), Some("student_alex_321")),
            "corporate_hr_789"
        );
        // Blank values fall through
        assert_eq!(config.resolve_user_id(Some("  "), Some("")), DEFAULT_USER_ID);
    }
}
