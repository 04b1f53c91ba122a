//! Integration tests that invoke the real Claude CLI.
//!
//! These tests are `#[ignore]` by default. They require:
//! - The `claude` CLI installed and on PATH
//! - Valid Anthropic credentials configured
//!
//! Run explicitly with:
//! ```bash
//! cargo test -p hgs-agents --test cli_integration -- --ignored
//! ```

use std::sync::Arc;
use std::time::Duration;

use hgs_agents::llm::check_cli_available;
use hgs_agents::parser::{extract_json, parse_briefs};
use hgs_agents::prompts::collector_system_prompt;
use hgs_agents::{ClaudeCliBackend, Concierge, GiftPlanningWorkflow, LlmBackend, LlmRequest};
use hgs_models::{AgentsConfig, CollectorRequest};
use hgs_profiles::{BuiltinProfiles, ProfileStore, ProfileSource};

fn request(agent_name: &str, model: &str, system_prompt: &str, user_prompt: &str) -> LlmRequest {
    LlmRequest {
        agent_name: agent_name.to_string(),
        model: model.to_string(),
        system_prompt: system_prompt.to_string(),
        user_prompt: user_prompt.to_string(),
        timeout: Duration::from_secs(60),
    }
}

#[tokio::test]
#[ignore]
async fn cli_is_available() {
    assert!(
        check_cli_available().await,
        "claude CLI not found on PATH; install it from https://docs.anthropic.com/en/docs/claude-code"
    );
}

/// Catches changes in the CLI's output format that would break JSON extraction.
#[tokio::test]
#[ignore]
async fn cli_output_is_parseable_json() {
    if !check_cli_available().await {
        eprintln!("Skipping: claude CLI not available");
        return;
    }

    let system_prompt = concat!(
        "You are a test agent. Respond ONLY with a JSON object, no other text.\n",
        "The JSON must have exactly these fields:\n",
        "- \"status\": the string \"ok\"\n",
        "- \"echo\": repeat back the user's message exactly\n",
    );
    let raw = ClaudeCliBackend::new()
        .complete(&request("TestAgent", "claude-3-5-haiku-latest", system_prompt, "ping"))
        .await
        .expect("Claude CLI invocation failed");

    let json_str = extract_json(&raw)
        .unwrap_or_else(|e| panic!("Failed to extract JSON from CLI output ({e}).\nRaw output:\n---\n{raw}\n---"));
    let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("Extracted JSON is not valid");
    assert_eq!(parsed["status"], "ok", "Unexpected response structure: {parsed}");
}

#[tokio::test]
#[ignore]
async fn collector_prompt_yields_briefs() {
    if !check_cli_available().await {
        eprintln!("Skipping: claude CLI not available");
        return;
    }

    let profiles = BuiltinProfiles::new()
        .profiles_for("family_smith_123")
        .unwrap()
        .unwrap();
    let input = CollectorRequest {
        user_id: "family_smith_123".to_string(),
        request: "I need gifts for Dad ($55) and Brother ($40) for Christmas.".to_string(),
        recipient_profiles: profiles,
    };
    let raw = ClaudeCliBackend::new()
        .complete(&request(
            "CollectorAgent",
            "claude-3-5-haiku-latest",
            &collector_system_prompt(),
            &serde_json::to_string_pretty(&input).unwrap(),
        ))
        .await
        .expect("Claude CLI invocation failed");

    let briefs = parse_briefs(&raw).expect("collector output should parse as briefs");
    assert_eq!(briefs.len(), 2, "briefs: {briefs:?}");
}

#[tokio::test]
#[ignore]
async fn cli_reports_errors_for_invalid_model() {
    if !check_cli_available().await {
        eprintln!("Skipping: claude CLI not available");
        return;
    }

    let result = ClaudeCliBackend::new()
        .complete(&request("TestAgent", "nonexistent-model-12345", "You are a test.", "hello"))
        .await;
    assert!(result.is_err(), "Expected error for invalid model, got: {result:?}");
}

#[tokio::test]
#[ignore]
async fn concierge_redirects_off_topic_questions() {
    if !check_cli_available().await {
        eprintln!("Skipping: claude CLI not available");
        return;
    }

    let backend: Arc<dyn LlmBackend> = Arc::new(ClaudeCliBackend::new());
    let config = AgentsConfig::default();
    let store = Arc::new(ProfileStore::new(Box::new(BuiltinProfiles::new()), "family_smith_123"));
    let workflow = GiftPlanningWorkflow::with_llm_researchers(Arc::clone(&backend), config.clone());
    let concierge = Concierge::new(store, "family_smith_123", backend, workflow, config);

    let reply = concierge.respond("What is the capital of France?").await;
    assert!(!reply.degraded, "unexpected apology: {}", reply.text);
    assert!(reply.plan.is_none());
}
