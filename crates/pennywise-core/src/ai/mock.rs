//! Mock backend for testing
//!
//! Provides predictable responses for all AI operations.
//! Useful for unit tests and development without an API key.

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::types::{AIAnalysis, FinancialSnapshot};
use super::AIBackend;

/// Quote returned by a healthy mock
pub const MOCK_QUOTE: &str = "Mock wisdom: a penny saved is a penny earned.";

/// Mock AI backend for testing
#[derive(Clone, Default)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    /// When set, every operation fails with an upstream error
    pub failing: bool,
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            failing: false,
        }
    }

    /// Create a mock whose operations always fail
    pub fn failing() -> Self {
        Self {
            healthy: false,
            failing: true,
        }
    }

    fn check_failing(&self) -> Result<()> {
        if self.failing {
            Err(Error::Upstream("Mock backend configured to fail".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn analyze_finances(&self, snapshot: &FinancialSnapshot) -> Result<AIAnalysis> {
        self.check_failing()?;

        let mut recommendations = vec![
            "Mock recommendation: review subscriptions".to_string(),
            "Mock recommendation: automate savings".to_string(),
            "Mock recommendation: plan meals".to_string(),
            "Mock recommendation: compare insurance quotes".to_string(),
        ];
        if let Some(top) = snapshot.top_expense_categories.first() {
            recommendations.insert(0, format!("Mock recommendation: trim {}", top.category));
        }

        Ok(AIAnalysis {
            analysis: format!(
                "Mock analysis: income ${:.2}, expenses ${:.2}, savings rate {:.2}%.",
                snapshot.total_income, snapshot.total_expenses, snapshot.savings_rate
            ),
            recommendations,
            insights: vec![
                "Mock insight: you track consistently".to_string(),
                "Mock insight: spending is visible".to_string(),
                "Mock insight: extra".to_string(),
            ],
        })
    }

    async fn generate_quote(&self) -> Result<String> {
        self.check_failing()?;
        Ok(MOCK_QUOTE.to_string())
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
