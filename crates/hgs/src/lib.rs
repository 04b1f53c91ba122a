//! HGS - Holiday Gift Savior
//!
//! A multi-agent gift recommendation system: a collector turns the user's
//! request into per-recipient briefs, parallel researchers look for gifts,
//! every idea is checked against its budget, and an aggregator writes the
//! final recommendation.
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use hgs::models::{check_budget_compliance, GiftIdea, GiftPlan, HgsConfig};
//! use hgs::agents::{Concierge, GiftPlanningWorkflow, ClaudeCliBackend};
//! use hgs::profiles::{BuiltinProfiles, ProfileStore, SqliteProfiles};
//! ```

pub use hgs_agents as agents;
pub use hgs_models as models;
pub use hgs_profiles as profiles;

use std::sync::Arc;

use anyhow::Context;
use hgs_agents::{ClaudeCliBackend, Concierge, GiftPlanningWorkflow, LlmBackend};
use hgs_models::{AgentsConfig, HgsConfig, ProfileSourceKind};
use hgs_profiles::{BuiltinProfiles, ProfileStore, SqliteProfiles};

/// Load configuration from a TOML file, or defaults when no path is given.
pub fn load_config(path: Option<&str>) -> Result<HgsConfig, anyhow::Error> {
    let Some(path) = path else {
        return Ok(HgsConfig::default());
    };
    let config_str =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read config: {path}"))?;
    toml::from_str(&config_str).with_context(|| format!("Failed to parse config: {path}"))
}

/// Build the profile store for the configured source.
pub fn build_profile_store(config: &HgsConfig) -> Result<ProfileStore, anyhow::Error> {
    let profiles = &config.profiles;
    let store = match profiles.source {
        ProfileSourceKind::Builtin => {
            ProfileStore::new(Box::new(BuiltinProfiles::new()), &profiles.default_user_id)
        }
        ProfileSourceKind::Sqlite => {
            let sqlite = SqliteProfiles::open(&profiles.sqlite_path).with_context(|| {
                format!("Failed to open profile database: {}", profiles.sqlite_path)
            })?;
            ProfileStore::new(Box::new(sqlite), &profiles.default_user_id)
        }
    };
    Ok(store)
}

/// Build a concierge for `user_id` backed by the `claude` CLI.
pub fn build_concierge(
    config: &HgsConfig,
    store: Arc<ProfileStore>,
    user_id: &str,
) -> Concierge {
    let backend: Arc<dyn LlmBackend> = Arc::new(ClaudeCliBackend::new());
    let workflow =
        GiftPlanningWorkflow::with_llm_researchers(Arc::clone(&backend), config.agents.clone());
    Concierge::new(store, user_id, backend, workflow, config.agents.clone())
}

/// Startup banner with the model, features and example queries.
pub fn banner(agents: &AgentsConfig) -> String {
    let rule = "=".repeat(70);
    format!(
        "{rule}\n\
         Holiday Gift Savior (HGS) - Multi-Agent Gift Recommendation System\n\
         {rule}\n\
         Model: {model}\n\
         Features: Sequential workflow, {researchers}x parallel research, budget validation\n\
         {rule}\n\n\
         Example queries:\n  \
         - 'I need gifts for Dad ($55) and Brother ($40) for Christmas.'\n  \
         - 'Help me find a gift for Mom who loves gardening, budget $30'\n",
        model = agents.model,
        researchers = agents.num_researchers,
    )
}

/// Every user and their recipients, formatted for the terminal.
pub fn render_users(store: &ProfileStore) -> Result<String, anyhow::Error> {
    let users = store.all().context("Failed to read profiles")?;
    let wide = "=".repeat(80);
    let thin = "-".repeat(80);

    let mut lines = vec![
        wide.clone(),
        "Holiday Gift Savior - User Profile Database".to_string(),
        wide.clone(),
        format!("\nTotal users in system: {}\n", users.len()),
    ];

    for (i, (user_id, profiles)) in users.iter().enumerate() {
        lines.push(thin.clone());
        lines.push(format!("\n{}. User ID: {user_id}", i + 1));
        lines.push(format!("   Total Recipients: {}\n", profiles.len()));

        for profile in profiles {
            lines.push(format!("   👤 {}", profile.name));
            lines.push(format!("      Interests: {}", profile.interests.join(", ")));
            if !profile.past_gifts.is_empty() {
                lines.push(format!("      Past gifts: {}", profile.past_gifts.join(", ")));
            }
            if !profile.dislikes.is_empty() {
                lines.push(format!("      Avoid: {}", profile.dislikes.join(", ")));
            }
            lines.push(String::new());
        }
    }

    lines.push(wide.clone());
    lines.push("\nTo use a specific user, pass --user or set CURRENT_USER_ID".to_string());
    lines.push("Example: CURRENT_USER_ID=user_johnson_456 hgs ask \"...\"".to_string());
    lines.push(wide);
    Ok(lines.join("\n"))
}
