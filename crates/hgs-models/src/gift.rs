use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::compliance::{ComplianceError, ComplianceReport, ComplianceStatus};

pub const DEFAULT_CURRENCY: &str = "USD";

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

/// Structured search request for one recipient, produced by the collector stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipientBrief {
    pub recipient_name: String,
    pub max_budget: Decimal,
    pub search_query: String,
    #[serde(default = "default_currency")]
    pub currency: String,
}

/// A gift as returned by a researcher, before any budget check.
///
/// Accepts both the short field names and the longer names the research
/// prompt historically asked for. Any status the model invents is ignored.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GiftCandidate {
    pub recipient: String,
    #[serde(alias = "gift_title")]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(alias = "estimated_price")]
    pub price: Decimal,
    #[serde(default, alias = "product_link")]
    pub link: String,
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl GiftCandidate {
    pub fn into_idea(self) -> GiftIdea {
        GiftIdea {
            recipient: self.recipient,
            title: self.title,
            description: self.description,
            price: self.price,
            link: self.link,
            currency: self.currency,
            compliance_status: ComplianceStatus::Pending,
            compliance: None,
        }
    }
}

/// A gift recommendation flowing through the pipeline.
///
/// The compliance status starts as `Pending` and is set exactly once by
/// [`GiftIdea::record_compliance`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GiftIdea {
    pub recipient: String,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub link: String,
    pub currency: String,
    compliance_status: ComplianceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    compliance: Option<ComplianceReport>,
}

impl GiftIdea {
    pub fn new(recipient: &str, title: &str, price: Decimal) -> Self {
        GiftCandidate {
            recipient: recipient.to_string(),
            title: title.to_string(),
            description: String::new(),
            price,
            link: String::new(),
            currency: default_currency(),
        }
        .into_idea()
    }

    pub fn compliance_status(&self) -> ComplianceStatus {
        self.compliance_status
    }

    pub fn compliance(&self) -> Option<&ComplianceReport> {
        self.compliance.as_ref()
    }

    /// Attach a compliance verdict. Only allowed once, and only with a
    /// Pass/Warning/Fail verdict.
    pub fn record_compliance(&mut self, report: ComplianceReport) -> Result<(), ComplianceError> {
        if self.compliance_status.is_verdict() {
            return Err(ComplianceError::AlreadyChecked {
                title: self.title.clone(),
                status: self.compliance_status,
            });
        }
        if !report.compliance_status.is_verdict() {
            return Err(ComplianceError::PendingVerdict);
        }
        self.compliance_status = report.compliance_status;
        self.compliance = Some(report);
        Ok(())
    }
}

/// A gift removed because it mentions one of the recipient's dislikes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScreenedGift {
    pub idea: GiftIdea,
    pub matched_dislike: String,
}

/// Metadata from a single researcher's run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResearchReport {
    pub agent_name: String,
    pub briefs_assigned: Vec<String>,
    pub ideas_found: usize,
    pub error: Option<String>,
    pub elapsed_ms: u64,
}

/// The complete result of one gift planning run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GiftPlan {
    pub id: Uuid,
    pub user_id: String,
    pub request: String,
    pub briefs: Vec<RecipientBrief>,
    pub gift_ideas: Vec<GiftIdea>,
    pub screened_out: Vec<ScreenedGift>,
    pub research_reports: Vec<ResearchReport>,
    /// Markdown produced by the aggregator stage.
    pub recommendation: String,
    pub generated_at: DateTime<Utc>,
    pub processing_time_ms: u64,
}

impl GiftPlan {
    pub fn ideas_with_status(&self, status: ComplianceStatus) -> impl Iterator<Item = &GiftIdea> {
        self.gift_ideas
            .iter()
            .filter(move |idea| idea.compliance_status() == status)
    }
}
