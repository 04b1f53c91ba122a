use std::sync::Arc;
use std::time::{Duration, Instant};

use hgs_models::{
    AgentsConfig, CollectorRequest, GiftIdea, GiftPlan, RecipientBrief, RecipientProfile,
    ResearchReport, ResearchRequest, ScreenedGift,
};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::AgentError;
use crate::llm::{LlmBackend, LlmRequest};
use crate::parser::parse_briefs;
use crate::prompts::{aggregator_system_prompt, collector_system_prompt};
use crate::researcher::{LlmResearcher, ResearcherAgent};
use crate::tools::{BudgetComplianceTool, GiftTool};

pub const COLLECTOR_AGENT: &str = "CollectorAgent";
pub const AGGREGATOR_AGENT: &str = "AggregatorAgent";

/// The gift planning pipeline: collector, parallel researchers, aggregator.
pub struct GiftPlanningWorkflow {
    backend: Arc<dyn LlmBackend>,
    researchers: Vec<Arc<dyn ResearcherAgent>>,
    budget_tool: BudgetComplianceTool,
    config: AgentsConfig,
}

impl GiftPlanningWorkflow {
    pub fn new(
        backend: Arc<dyn LlmBackend>,
        researchers: Vec<Arc<dyn ResearcherAgent>>,
        config: AgentsConfig,
    ) -> Self {
        Self {
            backend,
            researchers,
            budget_tool: BudgetComplianceTool,
            config,
        }
    }

    /// Build the workflow with `num_researchers` model-backed researchers.
    pub fn with_llm_researchers(backend: Arc<dyn LlmBackend>, config: AgentsConfig) -> Self {
        let researchers = LlmResearcher::team(
            config.num_researchers,
            config.researcher_model(),
            Duration::from_secs(config.researcher_timeout_seconds),
            Arc::clone(&backend),
        );
        Self::new(backend, researchers, config)
    }

    pub fn researcher_count(&self) -> usize {
        self.researchers.len()
    }

    /// Run the full pipeline for one user request.
    pub async fn run(
        &self,
        user_id: &str,
        request: &str,
        profiles: &[RecipientProfile],
    ) -> Result<GiftPlan, AgentError> {
        let start = Instant::now();
        info!(user_id, profiles = profiles.len(), "Starting gift planning");

        // 1. Collector
        let briefs = self.collect(user_id, request, profiles).await?;
        info!(briefs = briefs.len(), "Collector produced recipient briefs");

        // 2. Parallel research
        let (mut ideas, research_reports) = self.research(&briefs, profiles).await?;

        // 3. Budget compliance
        self.annotate_compliance(&mut ideas, &briefs);

        // 4. Dislike screening
        let (gift_ideas, screened_out) = screen_dislikes(ideas, profiles);
        for screened in &screened_out {
            info!(
                recipient = %screened.idea.recipient,
                title = %screened.idea.title,
                dislike = %screened.matched_dislike,
                "Screened out gift idea"
            );
        }

        // 5. Aggregator
        let recommendation = self
            .aggregate(request, &gift_ideas, &screened_out, profiles)
            .await?;

        let plan = GiftPlan {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            request: request.to_string(),
            briefs,
            gift_ideas,
            screened_out,
            research_reports,
            recommendation,
            generated_at: chrono::Utc::now(),
            processing_time_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            user_id,
            ideas = plan.gift_ideas.len(),
            elapsed_ms = plan.processing_time_ms,
            "Gift planning complete"
        );

        Ok(plan)
    }

    async fn collect(
        &self,
        user_id: &str,
        request: &str,
        profiles: &[RecipientProfile],
    ) -> Result<Vec<RecipientBrief>, AgentError> {
        let input = CollectorRequest {
            user_id: user_id.to_string(),
            request: request.to_string(),
            recipient_profiles: profiles.to_vec(),
        };
        let llm_request = LlmRequest {
            agent_name: COLLECTOR_AGENT.to_string(),
            model: self.config.model.clone(),
            system_prompt: collector_system_prompt(),
            user_prompt: serde_json::to_string_pretty(&input)?,
            timeout: self.stage_timeout(),
        };

        let raw_output = self.backend.complete(&llm_request).await?;
        let briefs = parse_briefs(&raw_output)?;
        if briefs.is_empty() {
            return Err(AgentError::NoBriefs);
        }
        Ok(briefs)
    }

    async fn research(
        &self,
        briefs: &[RecipientBrief],
        profiles: &[RecipientProfile],
    ) -> Result<(Vec<GiftIdea>, Vec<ResearchReport>), AgentError> {
        if self.researchers.is_empty() {
            return Err(AgentError::ResearchFailed(
                "no researchers configured".to_string(),
            ));
        }

        let assignments = assign_briefs(briefs, self.researchers.len());
        let researcher_timeout = Duration::from_secs(self.config.researcher_timeout_seconds);

        // Fan-out: one task per researcher that has work
        let mut handles = Vec::new();
        for (researcher, assigned) in self.researchers.iter().zip(assignments) {
            if assigned.is_empty() {
                continue;
            }
            let researcher = Arc::clone(researcher);
            let requests: Vec<ResearchRequest> = assigned
                .into_iter()
                .map(|brief| ResearchRequest {
                    request_id: Uuid::new_v4(),
                    profile: profiles
                        .iter()
                        .find(|p| p.is_named(&brief.recipient_name))
                        .cloned(),
                    brief,
                    ideas_wanted: self.config.ideas_per_recipient,
                })
                .collect();
            let names: Vec<String> = requests
                .iter()
                .map(|r| r.brief.recipient_name.clone())
                .collect();
            let agent_name = researcher.name().to_string();

            // Every brief is attempted; one failure does not skip the rest
            let handle = tokio::spawn(async move {
                let agent_start = Instant::now();
                let mut found: Vec<GiftIdea> = Vec::new();
                let mut errors: Vec<String> = Vec::new();
                for request in &requests {
                    let outcome =
                        tokio::time::timeout(researcher_timeout, researcher.research(request))
                            .await
                            .unwrap_or(Err(AgentError::Timeout(researcher_timeout.as_secs())));
                    match outcome {
                        Ok(ideas) => found.extend(ideas),
                        Err(e) => {
                            warn!(agent = %researcher.name(), recipient = %request.brief.recipient_name, error = %e, "Research for brief failed");
                            errors.push(format!("{}: {e}", request.brief.recipient_name));
                        }
                    }
                }
                (found, errors, agent_start.elapsed())
            });
            handles.push((agent_name, names, handle));
        }

        // Collect (graceful degradation)
        let mut ideas = Vec::new();
        let mut reports = Vec::new();
        let mut failed = 0;

        for (name, briefs_assigned, handle) in handles {
            let report = match handle.await {
                Ok((found, errors, elapsed)) => {
                    if errors.len() == briefs_assigned.len() {
                        failed += 1;
                        warn!(agent = %name, elapsed_ms = elapsed.as_millis(), "Researcher failed");
                    } else {
                        info!(agent = %name, ideas = found.len(), failed_briefs = errors.len(), elapsed_ms = elapsed.as_millis(), "Researcher finished");
                    }
                    let report = ResearchReport {
                        agent_name: name,
                        briefs_assigned,
                        ideas_found: found.len(),
                        error: (!errors.is_empty()).then(|| errors.join("; ")),
                        elapsed_ms: elapsed.as_millis() as u64,
                    };
                    ideas.extend(found);
                    report
                }
                Err(e) => {
                    error!(agent = %name, error = %e, "Researcher task panicked");
                    failed += 1;
                    ResearchReport {
                        agent_name: name,
                        briefs_assigned,
                        ideas_found: 0,
                        error: Some(format!("task panicked: {e}")),
                        elapsed_ms: 0,
                    }
                }
            };
            reports.push(report);
        }

        if !reports.is_empty() && failed == reports.len() {
            let summary: Vec<String> = reports
                .iter()
                .map(|r| format!("{}: {}", r.agent_name, r.error.as_deref().unwrap_or("failed")))
                .collect();
            return Err(AgentError::ResearchFailed(summary.join("; ")));
        }

        Ok((ideas, reports))
    }

    /// Check every idea against its recipient's budget. Ideas for a
    /// recipient without a brief stay `Pending`.
    fn annotate_compliance(&self, ideas: &mut [GiftIdea], briefs: &[RecipientBrief]) {
        for idea in ideas.iter_mut() {
            let Some(brief) = briefs
                .iter()
                .find(|b| b.recipient_name.trim().eq_ignore_ascii_case(idea.recipient.trim()))
            else {
                warn!(recipient = %idea.recipient, title = %idea.title, "No brief for gift idea; left unchecked");
                continue;
            };

            let checked = self
                .budget_tool
                .check(idea.price, brief.max_budget, &brief.currency)
                .and_then(|report| idea.record_compliance(report).map_err(AgentError::from));
            if let Err(e) = checked {
                warn!(recipient = %idea.recipient, title = %idea.title, error = %e, "Budget check failed");
            }
        }
    }

    async fn aggregate(
        &self,
        request: &str,
        gift_ideas: &[GiftIdea],
        screened_out: &[ScreenedGift],
        profiles: &[RecipientProfile],
    ) -> Result<String, AgentError> {
        let input = serde_json::json!({
            "request": request,
            "gift_ideas": gift_ideas,
            "screened_out": screened_out,
            "recipient_profiles": profiles,
        });
        let llm_request = LlmRequest {
            agent_name: AGGREGATOR_AGENT.to_string(),
            model: self.config.aggregator_model().to_string(),
            system_prompt: aggregator_system_prompt(&self.budget_tool.descriptor()),
            user_prompt: serde_json::to_string_pretty(&input)?,
            timeout: self.stage_timeout(),
        };

        let recommendation = self.backend.complete(&llm_request).await?;
        let recommendation = recommendation.trim();
        if recommendation.is_empty() {
            return Err(AgentError::Parse(
                "Aggregator returned an empty recommendation".to_string(),
            ));
        }
        Ok(recommendation.to_string())
    }

    fn stage_timeout(&self) -> Duration {
        Duration::from_secs(self.config.stage_timeout_seconds)
    }
}

/// Deal briefs round-robin: researcher `i` gets briefs `i, i + n, i + 2n, ...`.
pub fn assign_briefs(briefs: &[RecipientBrief], researchers: usize) -> Vec<Vec<RecipientBrief>> {
    let mut assignments = vec![Vec::new(); researchers];
    if researchers == 0 {
        return assignments;
    }
    for (i, brief) in briefs.iter().enumerate() {
        assignments[i % researchers].push(brief.clone());
    }
    assignments
}

/// Split ideas into those kept and those mentioning a recipient's dislike.
pub fn screen_dislikes(
    ideas: Vec<GiftIdea>,
    profiles: &[RecipientProfile],
) -> (Vec<GiftIdea>, Vec<ScreenedGift>) {
    let mut kept = Vec::new();
    let mut screened = Vec::new();

    for idea in ideas {
        let matched = profiles
            .iter()
            .find(|p| p.is_named(&idea.recipient))
            .and_then(|p| p.mentioned_dislike(&format!("{} {}", idea.title, idea.description)))
            .map(str::to_string);
        match matched {
            Some(matched_dislike) => screened.push(ScreenedGift {
                idea,
                matched_dislike,
            }),
            None => kept.push(idea),
        }
    }

    (kept, screened)
}
