//! Deterministic stand-ins for the model-backed parts of the pipeline.
//!
//! `ScriptedBackend` answers each agent from a script keyed by agent name.
//! `CatalogResearcher` picks gifts from a small canned catalog using the same
//! rules the researcher prompt asks the model to follow: match interests,
//! avoid dislikes and stay near the budget.

use std::sync::Mutex;

use async_trait::async_trait;
use hgs_models::{GiftCandidate, GiftIdea, RecipientProfile, ResearchRequest};
use rust_decimal::Decimal;

use crate::error::AgentError;
use crate::llm::{LlmBackend, LlmRequest};
use crate::researcher::ResearcherAgent;

#[derive(Debug, Clone)]
enum Scripted {
    Reply(String),
    Overloaded,
    Fail(String),
}

/// An `LlmBackend` that replies from a script and records every request.
///
/// Entries are matched by agent-name prefix, so `"Researcher"` covers
/// `Researcher_1` through `Researcher_n`. The first matching entry wins.
#[derive(Default)]
pub struct ScriptedBackend {
    script: Vec<(String, Scripted)>,
    calls: Mutex<Vec<LlmRequest>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, agent_prefix: &str, text: &str) -> Self {
        self.script
            .push((agent_prefix.to_string(), Scripted::Reply(text.to_string())));
        self
    }

    pub fn overloaded(mut self, agent_prefix: &str) -> Self {
        self.script
            .push((agent_prefix.to_string(), Scripted::Overloaded));
        self
    }

    pub fn failing(mut self, agent_prefix: &str, message: &str) -> Self {
        self.script
            .push((agent_prefix.to_string(), Scripted::Fail(message.to_string())));
        self
    }

    /// Every request received so far, in call order.
    pub fn calls(&self) -> Vec<LlmRequest> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Names of the agents that called the backend, in call order.
    pub fn agents_called(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.agent_name).collect()
    }
}

#[async_trait]
impl LlmBackend for ScriptedBackend {
    async fn complete(&self, request: &LlmRequest) -> Result<String, AgentError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request.clone());
        }

        let entry = self
            .script
            .iter()
            .find(|(prefix, _)| request.agent_name.starts_with(prefix.as_str()));

        match entry {
            Some((_, Scripted::Reply(text))) => Ok(text.clone()),
            Some((_, Scripted::Overloaded)) => Err(AgentError::Overloaded(
                "API Error: 529 overloaded_error".to_string(),
            )),
            Some((_, Scripted::Fail(message))) => Err(AgentError::Cli(message.clone())),
            None => Err(AgentError::Cli(format!(
                "No scripted reply for agent {}",
                request.agent_name
            ))),
        }
    }
}

/// One product in the canned catalog.
#[derive(Debug, Clone)]
pub struct CatalogItem {
    pub title: String,
    pub description: String,
    pub price: Decimal,
    /// Interests this item suits, lower-case.
    pub tags: Vec<String>,
}

impl CatalogItem {
    pub fn new(title: &str, description: &str, price: Decimal, tags: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            price,
            tags: tags.iter().map(|t| t.to_lowercase()).collect(),
        }
    }

    fn suits(&self, interests: &[String]) -> bool {
        interests
            .iter()
            .any(|interest| self.tags.iter().any(|tag| tag == &interest.to_lowercase()))
    }

    fn to_idea(&self, recipient: &str, currency: &str) -> GiftIdea {
        GiftCandidate {
            recipient: recipient.to_string(),
            title: self.title.clone(),
            description: self.description.clone(),
            price: self.price,
            link: format!(
                "https://shop.example.com/{}",
                self.title.to_lowercase().replace(' ', "-")
            ),
            currency: currency.to_string(),
        }
        .into_idea()
    }
}

/// Catalog covering the interests in the demo profile table.
pub fn default_catalog() -> Vec<CatalogItem> {
    let d = |s: &str| s.parse::<Decimal>().unwrap_or_default();
    vec![
        CatalogItem::new("Pour-Over Coffee Kit", "Glass dripper, filters and a gooseneck kettle", d("42.00"), &["coffee"]),
        CatalogItem::new("Smart Coffee Mug", "Temperature-controlled mug that keeps coffee hot", d("54.99"), &["coffee", "gadgets", "tech gadgets"]),
        CatalogItem::new("Single-Origin Bean Sampler", "Six small-batch roasts from around the world", d("28.00"), &["coffee"]),
        CatalogItem::new("Pocket Multi-Tool", "Stainless gadget with 14 functions", d("35.00"), &["gadgets", "tech gadgets"]),
        CatalogItem::new("Ergonomic Garden Tool Set", "Trowel, pruner and weeder with padded grips", d("29.50"), &["gardening", "plants"]),
        CatalogItem::new("Heirloom Seed Collection", "Twenty varieties of vegetable and herb seeds", d("18.00"), &["gardening"]),
        CatalogItem::new("Book Light and Bookmark Set", "Rechargeable clip-on reading light", d("19.99"), &["reading"]),
        CatalogItem::new("Sourdough Starter Kit", "Live starter, banneton basket and lame", d("34.00"), &["baking", "cooking"]),
        CatalogItem::new("Galaxy Cookie Cutters", "Rocket, planet and alien shaped cutters", d("16.00"), &["baking", "sci-fi"]),
        CatalogItem::new("Classic Sci-Fi Poster Print", "Retro space-age art print, unframed", d("25.00"), &["sci-fi"]),
        CatalogItem::new("Travel Yoga Strap", "Cotton strap with carry pouch", d("14.00"), &["yoga", "travel"]),
        CatalogItem::new("Instant Film Camera", "Compact instant camera with two film packs", d("79.00"), &["photography"]),
        CatalogItem::new("Watercolor Field Kit", "24 half-pans with a water brush", d("32.00"), &["art", "art supplies"]),
        CatalogItem::new("Beginner Robot Kit", "Programmable robot with sensors", d("59.00"), &["robotics", "coding", "gaming"]),
        CatalogItem::new("Cozy Reading Socks", "Wool-blend socks for curling up with a book", d("12.00"), &["reading", "gadgets"]),
    ]
}

/// Deterministic researcher backed by a catalog instead of web search.
///
/// Picks items that suit the profile's interests (or the search query when
/// there is no profile), cost at most 10% over budget, and do not mention a
/// disliked category. Cheapest first.
pub struct CatalogResearcher {
    pub name: String,
    catalog: Vec<CatalogItem>,
    respect_dislikes: bool,
    should_fail: bool,
    failing_recipients: Vec<String>,
}

impl CatalogResearcher {
    pub fn new(name: &str) -> Self {
        Self::with_catalog(name, default_catalog())
    }

    pub fn with_catalog(name: &str, catalog: Vec<CatalogItem>) -> Self {
        Self {
            name: name.to_string(),
            catalog,
            respect_dislikes: true,
            should_fail: false,
            failing_recipients: Vec::new(),
        }
    }

    pub fn failing(name: &str) -> Self {
        let mut researcher = Self::new(name);
        researcher.should_fail = true;
        researcher
    }

    /// Fail only the briefs for `recipient`.
    pub fn failing_for(mut self, recipient: &str) -> Self {
        self.failing_recipients.push(recipient.to_string());
        self
    }

    /// Return disliked items too, as a careless model might.
    pub fn ignoring_dislikes(mut self) -> Self {
        self.respect_dislikes = false;
        self
    }

    fn pick(&self, request: &ResearchRequest) -> Vec<GiftIdea> {
        let brief = &request.brief;
        let interests: Vec<String> = match &request.profile {
            Some(profile) => profile.interests.clone(),
            None => brief
                .search_query
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|w| !w.is_empty())
                .map(str::to_string)
                .collect(),
        };
        let ceiling = brief.max_budget * Decimal::new(110, 2);

        let mut picks: Vec<&CatalogItem> = self
            .catalog
            .iter()
            .filter(|item| item.suits(&interests))
            .filter(|item| item.price <= ceiling)
            .filter(|item| !self.respect_dislikes || !is_disliked(request.profile.as_ref(), item))
            .collect();
        picks.sort_by(|a, b| a.price.cmp(&b.price));

        picks
            .into_iter()
            .take(request.ideas_wanted)
            .map(|item| item.to_idea(&brief.recipient_name, &brief.currency))
            .collect()
    }
}

fn is_disliked(profile: Option<&RecipientProfile>, item: &CatalogItem) -> bool {
    profile.is_some_and(|p| {
        p.mentioned_dislike(&format!("{} {}", item.title, item.description))
            .is_some()
    })
}

#[async_trait]
impl ResearcherAgent for CatalogResearcher {
    fn name(&self) -> &str {
        &self.name
    }

    async fn research(&self, request: &ResearchRequest) -> Result<Vec<GiftIdea>, AgentError> {
        let recipient = &request.brief.recipient_name;
        if self.should_fail || self.failing_recipients.iter().any(|r| r == recipient) {
            return Err(AgentError::Timeout(60));
        }
        Ok(self.pick(request))
    }
}
