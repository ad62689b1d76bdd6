//! Financial insight generation
//!
//! Asks the configured completion service for a narrative analysis and falls
//! back to deterministic rules whenever that fails. Callers never see an
//! error from this module.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::ai::{AIBackend, AIClient, FinancialSnapshot};
use crate::summary::AggregateResult;

/// Recommendations kept in any result
pub const MAX_RECOMMENDATIONS: usize = 3;

/// Insights kept in any result
pub const MAX_INSIGHTS: usize = 2;

/// How many of the newest transactions feed an analysis
pub const RECENT_TRANSACTION_LIMIT: usize = 20;

/// Savings rate (percent) considered healthy
pub const TARGET_SAVINGS_RATE: f64 = 20.0;

pub const ONBOARDING_ANALYSIS: &str = "Start tracking your income and expenses to receive personalized AI insights about your financial habits!";

pub const ONBOARDING_RECOMMENDATIONS: [&str; 3] = [
    "Add your income sources to track earnings",
    "Record daily expenses to understand spending patterns",
    "Set financial goals and monitor progress",
];

/// Where an insight result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightSource {
    /// Completion service reply that passed validation
    Ai,
    /// Rule-based analysis of the aggregate
    Fallback,
    /// User has no transactions yet
    Onboarding,
}

impl InsightSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ai => "ai",
            Self::Fallback => "fallback",
            Self::Onboarding => "onboarding",
        }
    }
}

impl std::fmt::Display for InsightSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Analysis text plus short advice lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightResult {
    pub analysis: String,
    /// At most 3
    pub recommendations: Vec<String>,
    /// At most 2
    pub insights: Vec<String>,
    pub source: InsightSource,
}

/// Display-ready category line in a financial summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,
    /// Two decimals
    pub amount: String,
    pub count: u32,
}

/// Formatted echo of the numbers an analysis was based on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub total_income: String,
    pub total_expenses: String,
    pub balance: String,
    /// e.g. `33.33%`
    pub savings_rate: String,
    pub top_expense_categories: Vec<CategorySummary>,
    pub transaction_count: usize,
}

impl FinancialSummary {
    pub fn from_snapshot(snapshot: &FinancialSnapshot) -> Self {
        Self {
            total_income: format!("{:.2}", snapshot.total_income),
            total_expenses: format!("{:.2}", snapshot.total_expenses),
            balance: format!("{:.2}", snapshot.balance),
            savings_rate: format!("{:.2}%", snapshot.savings_rate),
            top_expense_categories: snapshot
                .top_expense_categories
                .iter()
                .map(|c| CategorySummary {
                    category: c.category.to_string(),
                    amount: format!("{:.2}", c.total),
                    count: c.count,
                })
                .collect(),
            transaction_count: snapshot.transaction_count,
        }
    }
}

/// Response body for an analysis request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    #[serde(flatten)]
    pub result: InsightResult,
    /// Absent for onboarding results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub financial_summary: Option<FinancialSummary>,
}

/// Produces insights from aggregated transaction data
#[derive(Clone, Default)]
pub struct InsightGenerator {
    ai: Option<AIClient>,
}

impl InsightGenerator {
    /// Without a client every request uses the rule-based path
    pub fn new(ai: Option<AIClient>) -> Self {
        Self { ai }
    }

    /// Build an insight result for an aggregate
    ///
    /// `recent_transaction_count` counts the user's newest transactions
    /// regardless of any date window; zero means the user has never recorded
    /// anything and gets the onboarding message.
    pub async fn generate_insights(
        &self,
        aggregate: &AggregateResult,
        recent_transaction_count: usize,
    ) -> InsightResult {
        self.generate_report(aggregate, recent_transaction_count)
            .await
            .result
    }

    /// Like [`generate_insights`](Self::generate_insights), plus the formatted summary echo
    pub async fn generate_report(
        &self,
        aggregate: &AggregateResult,
        recent_transaction_count: usize,
    ) -> AnalysisReport {
        if recent_transaction_count == 0 {
            return AnalysisReport {
                result: onboarding_insights(),
                financial_summary: None,
            };
        }

        let snapshot = FinancialSnapshot::from_aggregate(aggregate, recent_transaction_count);
        let financial_summary = Some(FinancialSummary::from_snapshot(&snapshot));

        let result = match self.ai {
            Some(ref client) => match client.analyze_finances(&snapshot).await {
                Ok(reply) => {
                    info!(model = %client.model(), "Generated AI financial analysis");
                    let mut recommendations = reply.recommendations;
                    recommendations.truncate(MAX_RECOMMENDATIONS);
                    let mut insights = reply.insights;
                    insights.truncate(MAX_INSIGHTS);
                    InsightResult {
                        analysis: reply.analysis,
                        recommendations,
                        insights,
                        source: InsightSource::Ai,
                    }
                }
                Err(e) => {
                    warn!(error = %e, host = %client.host(), "AI analysis failed, using fallback");
                    fallback_insights(&snapshot)
                }
            },
            None => {
                debug!("No AI backend configured, using fallback analysis");
                fallback_insights(&snapshot)
            }
        };

        AnalysisReport {
            result,
            financial_summary,
        }
    }
}

/// Static guidance for users without transactions
pub fn onboarding_insights() -> InsightResult {
    InsightResult {
        analysis: ONBOARDING_ANALYSIS.to_string(),
        recommendations: ONBOARDING_RECOMMENDATIONS
            .iter()
            .map(|s| s.to_string())
            .collect(),
        insights: Vec::new(),
        source: InsightSource::Onboarding,
    }
}

/// Rule-based analysis of a snapshot
///
/// Deterministic: the same snapshot always yields the same result.
pub fn fallback_insights(snapshot: &FinancialSnapshot) -> InsightResult {
    let rate = snapshot.savings_rate;
    let mut recommendations = Vec::new();
    let mut insights = Vec::new();

    let analysis = if rate > TARGET_SAVINGS_RATE {
        insights.push("Your savings rate exceeds financial expert recommendations".to_string());
        insights.push("You're building a solid financial foundation".to_string());
        format!(
            "Excellent work! You're maintaining a {:.2}% savings rate, which is above the recommended 20%. Your balance of ${:.2} shows strong financial discipline.",
            rate, snapshot.balance
        )
    } else if rate > 0.0 {
        recommendations
            .push("Try to gradually increase your savings rate to 20% or higher".to_string());
        format!(
            "You're saving {:.2}% of your income. While positive, there's room to optimize spending and increase your savings rate toward the 20% target.",
            rate
        )
    } else {
        recommendations
            .push("Identify non-essential expenses that can be reduced or eliminated".to_string());
        recommendations.push(
            "Look for ways to increase your income through side projects or career advancement"
                .to_string(),
        );
        format!(
            "Your expenses currently exceed your income by ${:.2}. It's important to review spending and find areas to reduce expenses.",
            snapshot.balance.abs()
        )
    };

    if let Some(top) = snapshot.top_expense_categories.first() {
        recommendations.push(format!(
            "Your highest expense is {} at ${:.2}. Review if this can be optimized",
            top.category, top.total
        ));
    }

    recommendations.push("Set up automatic transfers to savings on payday".to_string());
    recommendations.push("Track daily expenses to identify spending patterns".to_string());

    if insights.is_empty() {
        insights.push(
            "You're actively tracking your finances, which is the first step to financial success"
                .to_string(),
        );
        insights
            .push("Consistent tracking helps identify spending trends and opportunities".to_string());
    }

    recommendations.truncate(MAX_RECOMMENDATIONS);
    insights.truncate(MAX_INSIGHTS);

    InsightResult {
        analysis,
        recommendations,
        insights,
        source: InsightSource::Fallback,
    }
}
