pub mod agent_message;
pub mod compliance;
pub mod config;
pub mod gift;
pub mod profile_schema;
pub mod recipient;

pub use agent_message::{CollectorRequest, ConciergeDecision, ConciergeRoute, ResearchRequest};
pub use compliance::{
    check_budget_compliance, ComplianceError, ComplianceReport, ComplianceStatus,
};
pub use config::{AgentsConfig, HgsConfig, ProfileSourceKind, ProfilesConfig};
pub use gift::{
    GiftCandidate, GiftIdea, GiftPlan, RecipientBrief, ResearchReport, ScreenedGift,
};
pub use profile_schema::ProfileRow;
pub use recipient::RecipientProfile;
