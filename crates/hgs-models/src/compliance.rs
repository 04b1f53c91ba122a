use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outcome of comparing a gift price with a recipient budget.
///
/// `Pending` is the state of a gift idea that has not been checked yet.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ComplianceStatus {
    #[default]
    Pending,
    Pass,
    Warning,
    Fail,
}

impl ComplianceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Pass => "Pass",
            Self::Warning => "Warning",
            Self::Fail => "Fail",
        }
    }

    pub fn is_verdict(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComplianceError {
    #[error("{field} must not be negative (got {value})")]
    NegativeAmount { field: &'static str, value: Decimal },

    #[error("Invalid currency code: {0:?} (expected a three-letter ISO code)")]
    InvalidCurrency(String),

    #[error("Gift '{title}' was already checked ({status})")]
    AlreadyChecked {
        title: String,
        status: ComplianceStatus,
    },

    #[error("A compliance report cannot carry a Pending status")]
    PendingVerdict,
}

/// Full result of a budget compliance check, as returned to agents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComplianceReport {
    pub compliance_status: ComplianceStatus,
    /// Rounded to 2 dp.
    pub gift_price: Decimal,
    /// Rounded to 2 dp.
    pub recipient_budget: Decimal,
    /// Upper-cased ISO code.
    pub currency: String,
    /// `recipient_budget - gift_price`, rounded to 2 dp. Negative when over budget.
    pub budget_difference: Decimal,
    pub compliance_message: String,
}

/// Fraction over budget still reported as a `Warning` rather than a `Fail`.
pub fn grace_margin() -> Decimal {
    Decimal::new(5, 2)
}

/// Check a gift price against a budget, allowing the 5% grace margin.
///
/// Comparisons use the unrounded inputs; only the reported figures are
/// rounded to cents.
pub fn check_budget_compliance(
    gift_price: Decimal,
    recipient_budget: Decimal,
    currency: &str,
) -> Result<ComplianceReport, ComplianceError> {
    if gift_price.is_sign_negative() && !gift_price.is_zero() {
        return Err(ComplianceError::NegativeAmount {
            field: "gift_price",
            value: gift_price,
        });
    }
    if recipient_budget.is_sign_negative() && !recipient_budget.is_zero() {
        return Err(ComplianceError::NegativeAmount {
            field: "recipient_budget",
            value: recipient_budget,
        });
    }

    let currency = normalize_currency(currency)?;
    let difference = round_cents(recipient_budget - gift_price);
    let price_text = format_money(&currency, gift_price);
    let budget_text = format_money(&currency, recipient_budget);
    // Overage form: budget * 1.05 overflows near Decimal::MAX.
    let allowed_overage = recipient_budget * grace_margin();

    let (status, message) = if gift_price <= recipient_budget {
        (
            ComplianceStatus::Pass,
            format!(
                "Compliance SUCCESS: Gift price is {price_text}, which is {} under budget of {budget_text}.",
                format_money(&currency, difference)
            ),
        )
    } else if gift_price - recipient_budget <= allowed_overage {
        (
            ComplianceStatus::Warning,
            format!(
                "Compliance WARNING: Gift price is {price_text}, exceeding budget of {budget_text} by less than 5%."
            ),
        )
    } else {
        (
            ComplianceStatus::Fail,
            format!(
                "Compliance FAILURE: Gift price is {price_text}, exceeding budget of {budget_text} by {}.",
                format_money(&currency, difference.abs())
            ),
        )
    };

    Ok(ComplianceReport {
        compliance_status: status,
        gift_price: round_cents(gift_price),
        recipient_budget: round_cents(recipient_budget),
        currency,
        budget_difference: difference,
        compliance_message: message,
    })
}

/// Upper-case and validate a currency code.
pub fn normalize_currency(code: &str) -> Result<String, ComplianceError> {
    let normalized = code.trim().to_ascii_uppercase();
    if normalized.len() == 3 && normalized.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(normalized)
    } else {
        Err(ComplianceError::InvalidCurrency(code.to_string()))
    }
}

/// Display symbol for well-known currencies. Expects a normalized code.
pub fn currency_symbol(code: &str) -> Option<&'static str> {
    match code {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        "CAD" => Some("CA$"),
        "AUD" => Some("A$"),
        _ => None,
    }
}

/// Format an amount with its currency symbol, or the ISO code for
/// currencies without one (`CHF 12.00`).
pub fn format_money(code: &str, amount: Decimal) -> String {
    let rounded = round_cents(amount);
    match currency_symbol(code) {
        Some(symbol) => format!("{symbol}{rounded:.2}"),
        None => format!("{code} {rounded:.2}"),
    }
}

pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn exact_budget_passes() {
        let report = check_budget_compliance(dec!(55.00), dec!(55.00), "usd").unwrap();
        assert_eq!(report.compliance_status, ComplianceStatus::Pass);
        assert_eq!(report.budget_difference, dec!(0.00));
        assert_eq!(report.currency, "USD");
        assert_eq!(
            report.compliance_message,
            "Compliance SUCCESS: Gift price is $55.00, which is $0.00 under budget of $55.00."
        );
    }

    #[test]
    fn within_grace_margin_warns() {
        let report = check_budget_compliance(dec!(57.50), dec!(55.00), "USD").unwrap();
        assert_eq!(report.compliance_status, ComplianceStatus::Warning);
        assert_eq!(report.budget_difference, dec!(-2.50));
        assert_eq!(
            report.compliance_message,
            "Compliance WARNING: Gift price is $57.50, exceeding budget of $55.00 by less than 5%."
        );
    }

    #[test]
    fn grace_ceiling_is_inclusive() {
        let report = check_budget_compliance(dec!(57.75), dec!(55.00), "USD").unwrap();
        assert_eq!(report.compliance_status, ComplianceStatus::Warning);

        let report = check_budget_compliance(dec!(57.76), dec!(55.00), "USD").unwrap();
        assert_eq!(report.compliance_status, ComplianceStatus::Fail);
    }

    #[test]
    fn beyond_grace_margin_fails() {
        let report = check_budget_compliance(dec!(60.00), dec!(55.00), "eur").unwrap();
        assert_eq!(report.compliance_status, ComplianceStatus::Fail);
        assert_eq!(report.budget_difference, dec!(-5.00));
        assert_eq!(report.currency, "EUR");
        assert_eq!(
            report.compliance_message,
            "Compliance FAILURE: Gift price is €60.00, exceeding budget of €55.00 by €5.00."
        );
    }

    #[test]
    fn comparisons_use_unrounded_inputs() {
        // 55.004 rounds to 55.00 for display but is still over a 55.00 budget.
        let report = check_budget_compliance(dec!(55.004), dec!(55.00), "USD").unwrap();
        assert_eq!(report.compliance_status, ComplianceStatus::Warning);
        assert_eq!(report.gift_price, dec!(55.00));
    }

    #[test]
    fn verdicts_follow_thresholds_across_grid() {
        let budgets = [dec!(0), dec!(10), dec!(40), dec!(55), dec!(99.99), dec!(250)];
        let offsets = [
            dec!(-10), dec!(-0.01), dec!(0), dec!(0.01), dec!(1), dec!(2.5), dec!(5), dec!(20),
        ];
        for budget in budgets {
            for offset in offsets {
                let price = budget + offset;
                if price < Decimal::ZERO {
                    continue;
                }
                let report = check_budget_compliance(price, budget, "USD").unwrap();
                let expected = if price <= budget {
                    ComplianceStatus::Pass
                } else if price <= budget * dec!(1.05) {
                    ComplianceStatus::Warning
                } else {
                    ComplianceStatus::Fail
                };
                assert_eq!(report.compliance_status, expected, "price={price} budget={budget}");
                assert_eq!(report.budget_difference, round_cents(budget - price));
            }
        }
    }

    #[test]
    fn zero_budget_only_passes_free_gifts() {
        let free = check_budget_compliance(dec!(0), dec!(0), "USD").unwrap();
        assert_eq!(free.compliance_status, ComplianceStatus::Pass);
        let paid = check_budget_compliance(dec!(0.01), dec!(0), "USD").unwrap();
        assert_eq!(paid.compliance_status, ComplianceStatus::Fail);
    }

    #[test]
    fn negative_inputs_are_rejected() {
        let err = check_budget_compliance(dec!(-1), dec!(10), "USD").unwrap_err();
        assert!(matches!(err, ComplianceError::NegativeAmount { field: "gift_price", .. }));

        let err = check_budget_compliance(dec!(1), dec!(-10), "USD").unwrap_err();
        assert!(matches!(
            err,
            ComplianceError::NegativeAmount { field: "recipient_budget", .. }
        ));
    }

    #[test]
    fn malformed_currency_is_rejected() {
        assert!(matches!(
            check_budget_compliance(dec!(1), dec!(10), "dollars"),
            Err(ComplianceError::InvalidCurrency(_))
        ));
        assert!(matches!(
            check_budget_compliance(dec!(1), dec!(10), ""),
            Err(ComplianceError::InvalidCurrency(_))
        ));
    }

    #[test]
    fn unknown_currency_uses_iso_code_prefix() {
        let report = check_budget_compliance(dec!(12), dec!(20), "chf").unwrap();
        assert_eq!(report.currency, "CHF");
        assert!(report.compliance_message.contains("CHF 12.00"));
        assert!(!report.compliance_message.contains('$'));
    }

    #[test]
    fn display_rounding_is_half_away_from_zero() {
        assert_eq!(round_cents(dec!(10.005)), dec!(10.01));
        assert_eq!(round_cents(dec!(-10.005)), dec!(-10.01));
        assert_eq!(format_money("USD", dec!(3)), "$3.00");
    }

    #[test]
    fn report_serializes_status_as_word() {
        let report = check_budget_compliance(dec!(30), dec!(40), "USD").unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["compliance_status"], "Pass");
        assert_eq!(json["currency"], "USD");
    }

    #[test]
    fn maximum_budget_does_not_overflow() {
        let report = check_budget_compliance(Decimal::ONE, Decimal::MAX, "USD").unwrap();
        assert_eq!(report.compliance_status, ComplianceStatus::Pass);

        let report = check_budget_compliance(Decimal::MAX, Decimal::MAX, "USD").unwrap();
        assert_eq!(report.compliance_status, ComplianceStatus::Pass);
        assert_eq!(report.budget_difference, Decimal::ZERO);
    }
}
