pub mod concierge;
pub mod error;
pub mod graceful;
pub mod llm;
pub mod parser;
pub mod prompts;
pub mod researcher;
pub mod tools;
pub mod workflow;

pub mod test_support;

pub use concierge::{render_greeting, Concierge, ConciergeReply};
pub use error::AgentError;
pub use graceful::{with_graceful_fallback, GracefulReply, GENERIC_APOLOGY, OVERLOADED_APOLOGY};
pub use llm::{ClaudeCliBackend, LlmBackend, LlmRequest};
pub use researcher::{LlmResearcher, ResearcherAgent};
pub use tools::{BudgetComplianceTool, GiftTool, RecipientProfilesTool, ToolDescriptor};
pub use workflow::{assign_briefs, screen_dislikes, GiftPlanningWorkflow};
