use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hgs_models::{GiftIdea, ResearchRequest};

use crate::error::AgentError;
use crate::llm::{LlmBackend, LlmRequest};
use crate::parser::parse_gift_ideas;
use crate::prompts::researcher_system_prompt;

/// Trait for gift researchers. Mockable for testing.
#[async_trait]
pub trait ResearcherAgent: Send + Sync {
    fn name(&self) -> &str;

    async fn research(&self, request: &ResearchRequest) -> Result<Vec<GiftIdea>, AgentError>;
}

/// A researcher that asks a language model to search for gifts.
pub struct LlmResearcher {
    pub name: String,
    pub model: String,
    pub timeout: Duration,
    backend: Arc<dyn LlmBackend>,
}

impl LlmResearcher {
    pub fn new(name: &str, model: &str, timeout: Duration, backend: Arc<dyn LlmBackend>) -> Self {
        Self {
            name: name.to_string(),
            model: model.to_string(),
            timeout,
            backend,
        }
    }

    /// `Researcher_1` .. `Researcher_n`, all structurally identical.
    pub fn team(
        count: usize,
        model: &str,
        timeout: Duration,
        backend: Arc<dyn LlmBackend>,
    ) -> Vec<Arc<dyn ResearcherAgent>> {
        (1..=count)
            .map(|i| {
                Arc::new(Self::new(
                    &format!("Researcher_{i}"),
                    model,
                    timeout,
                    Arc::clone(&backend),
                )) as Arc<dyn ResearcherAgent>
            })
            .collect()
    }
}

#[async_trait]
impl ResearcherAgent for LlmResearcher {
    fn name(&self) -> &str {
        &self.name
    }

    async fn research(&self, request: &ResearchRequest) -> Result<Vec<GiftIdea>, AgentError> {
        let llm_request = LlmRequest {
            agent_name: self.name.clone(),
            model: self.model.clone(),
            system_prompt: researcher_system_prompt(),
            user_prompt: serde_json::to_string(request)?,
            timeout: self.timeout,
        };
        let raw_output = self.backend.complete(&llm_request).await?;
        parse_gift_ideas(&raw_output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hgs_models::{ComplianceStatus, RecipientBrief};
    use rust_decimal_macros::dec;
    use std::sync::Mutex;
    use uuid::Uuid;

    /// Backend that returns one fixed reply and remembers the prompts it saw.
    struct FixedBackend {
        reply: String,
        seen: Mutex<Vec<LlmRequest>>,
    }

    #[async_trait]
    impl LlmBackend for FixedBackend {
        async fn complete(&self, request: &LlmRequest) -> Result<String, AgentError> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(self.reply.clone())
        }
    }

    fn request() -> ResearchRequest {
        ResearchRequest {
            request_id: Uuid::nil(),
            brief: RecipientBrief {
                recipient_name: "Dad".to_string(),
                max_budget: dec!(55),
                search_query: "coffee gadgets".to_string(),
                currency: "USD".to_string(),
            },
            profile: None,
            ideas_wanted: 3,
        }
    }

    #[tokio::test]
    async fn llm_researcher_parses_reply() {
        let backend = Arc::new(FixedBackend {
            reply: r#"[{"recipient": "Dad", "title": "Burr Grinder", "price": "49.00"}]"#.to_string(),
            seen: Mutex::new(Vec::new()),
        });
        let researcher = LlmResearcher::new(
            "Researcher_1",
            "claude-3-5-haiku-latest",
            Duration::from_secs(5),
            backend.clone(),
        );

        let ideas = researcher.research(&request()).await.unwrap();
        assert_eq!(ideas.len(), 1);
        assert_eq!(ideas[0].title, "Burr Grinder");
        assert_eq!(ideas[0].compliance_status(), ComplianceStatus::Pending);

        let seen = backend.seen.lock().unwrap();
        assert_eq!(seen[0].agent_name, "Researcher_1");
        assert!(seen[0].user_prompt.contains("coffee gadgets"));
    }

    #[tokio::test]
    async fn llm_researcher_surfaces_parse_errors() {
        let backend = Arc::new(FixedBackend {
            reply: "I could not find anything.".to_string(),
            seen: Mutex::new(Vec::new()),
        });
        let researcher =
            LlmResearcher::new("Researcher_2", "m", Duration::from_secs(5), backend);
        let result = researcher.research(&request()).await;
        assert!(matches!(result, Err(AgentError::Parse(_))));
    }

    #[test]
    fn team_names_are_numbered() {
        let backend = Arc::new(FixedBackend {
            reply: String::new(),
            seen: Mutex::new(Vec::new()),
        });
        let team = LlmResearcher::team(3, "m", Duration::from_secs(1), backend);
        let names: Vec<&str> = team.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["Researcher_1", "Researcher_2", "Researcher_3"]);
    }
}
