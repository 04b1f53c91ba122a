use std::sync::Arc;
use std::time::Duration;

use hgs_models::{AgentsConfig, ConciergeRoute, GiftPlan, RecipientProfile};
use hgs_profiles::{ProfileLookup, ProfileStore};
use tracing::{debug, info};

use crate::error::AgentError;
use crate::graceful::{with_graceful_fallback, GracefulReply};
use crate::llm::{LlmBackend, LlmRequest};
use crate::parser::parse_concierge_decision;
use crate::prompts::{concierge_system_prompt, REDIRECT_MESSAGE};
use crate::tools::{GiftTool, RecipientProfilesTool};
use crate::workflow::GiftPlanningWorkflow;

pub const CONCIERGE_AGENT: &str = "ConciergeAgent";

/// What the concierge says back to the user.
#[derive(Debug)]
pub struct ConciergeReply {
    pub text: String,
    /// `None` when the request failed before routing.
    pub route: Option<ConciergeRoute>,
    pub plan: Option<GiftPlan>,
    /// True when `text` is an apology standing in for a failed request.
    pub degraded: bool,
}

/// Entry agent: greets the user, routes each message, and runs the
/// gift planning workflow for gift requests.
pub struct Concierge {
    user_id: String,
    store: Arc<ProfileStore>,
    profiles_tool: RecipientProfilesTool,
    backend: Arc<dyn LlmBackend>,
    workflow: GiftPlanningWorkflow,
    config: AgentsConfig,
}

impl Concierge {
    pub fn new(
        store: Arc<ProfileStore>,
        user_id: &str,
        backend: Arc<dyn LlmBackend>,
        workflow: GiftPlanningWorkflow,
        config: AgentsConfig,
    ) -> Self {
        Self {
            user_id: user_id.to_string(),
            profiles_tool: RecipientProfilesTool::new(Arc::clone(&store)),
            store,
            backend,
            workflow,
            config,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The active user's recipient profiles.
    pub fn profiles(&self) -> Result<Vec<RecipientProfile>, AgentError> {
        match self.store.lookup(&self.user_id)? {
            ProfileLookup::Found { recipients, .. } => Ok(recipients),
            ProfileLookup::UnknownUser {
                error,
                available_users,
                ..
            } => Err(AgentError::UnknownUser(format!(
                "{error}. Available users: {}",
                available_users.join(", ")
            ))),
        }
    }

    /// Opening message summarising the loaded profiles.
    pub fn greeting(&self) -> Result<String, AgentError> {
        Ok(render_greeting(&self.profiles()?))
    }

    /// Answer one user message. Failures become an apology, never an error.
    pub async fn respond(&self, query: &str) -> ConciergeReply {
        match with_graceful_fallback(self.handle(query)).await {
            GracefulReply::Completed(reply) => reply,
            GracefulReply::Degraded { apology, .. } => ConciergeReply {
                text: apology.to_string(),
                route: None,
                plan: None,
                degraded: true,
            },
        }
    }

    async fn handle(&self, query: &str) -> Result<ConciergeReply, AgentError> {
        let profiles = self.profiles()?;
        if query.trim().is_empty() {
            return Ok(ConciergeReply {
                text: render_greeting(&profiles),
                route: None,
                plan: None,
                degraded: false,
            });
        }

        let payload = self
            .profiles_tool
            .run(&serde_json::json!({ "user_id": self.user_id }))?;
        let input = serde_json::json!({
            "message": query,
            "profiles": payload,
        });
        let llm_request = LlmRequest {
            agent_name: CONCIERGE_AGENT.to_string(),
            model: self.config.model.clone(),
            system_prompt: concierge_system_prompt(&self.profiles_tool.descriptor()),
            user_prompt: serde_json::to_string_pretty(&input)?,
            timeout: Duration::from_secs(self.config.stage_timeout_seconds),
        };

        let raw_output = self.backend.complete(&llm_request).await?;
        let decision = parse_concierge_decision(&raw_output)?;
        debug!(route = ?decision.route, "Concierge routed message");

        match decision.route {
            ConciergeRoute::Redirect => {
                let text = if decision.message.trim().is_empty() {
                    REDIRECT_MESSAGE.to_string()
                } else {
                    decision.message
                };
                Ok(ConciergeReply {
                    text,
                    route: Some(ConciergeRoute::Redirect),
                    plan: None,
                    degraded: false,
                })
            }
            ConciergeRoute::GiftPlanning => {
                info!(user_id = %self.user_id, "Routing to gift planning workflow");
                let plan = self.workflow.run(&self.user_id, query, &profiles).await?;
                let text = if decision.message.trim().is_empty() {
                    plan.recommendation.clone()
                } else {
                    format!("{}\n\n{}", decision.message.trim(), plan.recommendation)
                };
                Ok(ConciergeReply {
                    text,
                    route: Some(ConciergeRoute::GiftPlanning),
                    plan: Some(plan),
                    degraded: false,
                })
            }
        }
    }
}

/// "I have profiles for N people" summary with up to three interests and
/// the first dislike per person.
pub fn render_greeting(profiles: &[RecipientProfile]) -> String {
    let mut out = String::from("Welcome! 🎁 I'm your Holiday Gift Savior.\n\n");

    if profiles.is_empty() {
        out.push_str("I don't have any saved profiles for you yet.\n");
    } else {
        let noun = if profiles.len() == 1 { "person" } else { "people" };
        out.push_str(&format!("I have profiles for {} {noun}:\n", profiles.len()));
        for profile in profiles {
            let interests: Vec<&str> = profile.interests.iter().take(3).map(String::as_str).collect();
            let line = match (interests.is_empty(), profile.dislikes.first()) {
                (true, None) => format!("- {}", profile.name),
                (true, Some(avoid)) => format!("- {} (avoid {avoid})", profile.name),
                (false, None) => format!("- {} (loves {})", profile.name, interests.join(", ")),
                (false, Some(avoid)) => format!(
                    "- {} (loves {}, but avoid {avoid})",
                    profile.name,
                    interests.join(", ")
                ),
            };
            out.push_str(&line);
            out.push('\n');
        }
    }

    out.push_str("\nWho are you shopping for today, and what's your budget?");
    out
}
