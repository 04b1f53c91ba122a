use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::gift::RecipientBrief;
use crate::recipient::RecipientProfile;

/// Input handed to the collector stage (serialized as JSON into the prompt).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectorRequest {
    pub user_id: String,
    /// The user's latest message, verbatim.
    pub request: String,
    pub recipient_profiles: Vec<RecipientProfile>,
}

/// Request sent to one researcher for one recipient brief.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResearchRequest {
    pub request_id: Uuid,
    pub brief: RecipientBrief,
    /// The stored profile for this recipient, when one matched by name.
    pub profile: Option<RecipientProfile>,
    /// How many gift ideas the researcher should return.
    pub ideas_wanted: usize,
}

/// How the concierge decided to handle a user message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConciergeRoute {
    GiftPlanning,
    Redirect,
}

/// Parsed output of the concierge routing call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConciergeDecision {
    pub route: ConciergeRoute,
    #[serde(default)]
    pub message: String,
}
