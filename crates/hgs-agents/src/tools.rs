use std::str::FromStr;
use std::sync::Arc;

use hgs_models::gift::DEFAULT_CURRENCY;
use hgs_models::{check_budget_compliance, ComplianceReport};
use hgs_profiles::ProfileStore;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::AgentError;

/// Function-calling description of a tool, in the shape models expect.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    /// JSON schema for the arguments object.
    pub parameters: Value,
}

impl ToolDescriptor {
    pub fn new(name: &str, description: &str, parameters: Value) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            parameters,
        }
    }
}

/// A deterministic capability an agent can call with JSON arguments.
pub trait GiftTool: Send + Sync {
    fn descriptor(&self) -> ToolDescriptor;

    fn run(&self, args: &Value) -> Result<Value, AgentError>;

    fn matches(&self, name: &str) -> bool {
        self.descriptor().name == name
    }
}

/// `check_budget_compliance`: price vs budget with the 5% grace margin.
#[derive(Debug, Clone, Copy, Default)]
pub struct BudgetComplianceTool;

impl BudgetComplianceTool {
    pub const NAME: &'static str = "check_budget_compliance";

    /// Typed entry point used by the workflow.
    pub fn check(
        &self,
        gift_price: Decimal,
        recipient_budget: Decimal,
        currency: &str,
    ) -> Result<ComplianceReport, AgentError> {
        Ok(check_budget_compliance(gift_price, recipient_budget, currency)?)
    }
}

impl GiftTool for BudgetComplianceTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(
            Self::NAME,
            "Checks whether a gift's price fits the recipient's budget. Prices up to 5% \
             over budget are a Warning, anything beyond that is a Fail.",
            json!({
                "type": "object",
                "properties": {
                    "gift_price": {"type": "number", "description": "Price of the gift"},
                    "recipient_budget": {"type": "number", "description": "Maximum budget for the recipient"},
                    "currency": {"type": "string", "description": "ISO currency code, default USD"}
                },
                "required": ["gift_price", "recipient_budget"]
            }),
        )
    }

    fn run(&self, args: &Value) -> Result<Value, AgentError> {
        let gift_price = decimal_arg(args, "gift_price")?;
        let recipient_budget = decimal_arg(args, "recipient_budget")?;
        let currency = args
            .get("currency")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_CURRENCY);

        let report = self.check(gift_price, recipient_budget, currency)?;
        Ok(serde_json::to_value(report)?)
    }
}

/// `get_recipient_profiles`: profile lookup for a user id.
pub struct RecipientProfilesTool {
    store: Arc<ProfileStore>,
}

impl RecipientProfilesTool {
    pub const NAME: &'static str = "get_recipient_profiles";

    pub fn new(store: Arc<ProfileStore>) -> Self {
        Self { store }
    }
}

impl GiftTool for RecipientProfilesTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(
            Self::NAME,
            "Fetches the saved recipient profiles (interests, past gifts, dislikes) for a user.",
            json!({
                "type": "object",
                "properties": {
                    "user_id": {"type": "string", "description": "The user's id; empty for the current user"}
                },
                "required": []
            }),
        )
    }

    fn run(&self, args: &Value) -> Result<Value, AgentError> {
        let user_id = args.get("user_id").and_then(Value::as_str).unwrap_or("");
        Ok(self.store.lookup(user_id)?.to_payload())
    }
}

/// Read a money argument given either as a JSON number or a numeric string.
fn decimal_arg(args: &Value, key: &str) -> Result<Decimal, AgentError> {
    match args.get(key) {
        Some(Value::Number(n)) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .map_err(|e| AgentError::Tool(format!("{key}: {e}"))),
        Some(Value::String(s)) => Decimal::from_str(s.trim())
            .map_err(|e| AgentError::Tool(format!("{key}: {e}"))),
        Some(other) => Err(AgentError::Tool(format!("{key}: expected a number, got {other}"))),
        None => Err(AgentError::Tool(format!("missing argument: {key}"))),
    }
}
