use serde::Deserialize;

use super::budget::Budget;
use super::client::{ApiRequest, Resource};
use super::deposit::Deposit;
use super::expense::ExpenseHeader;
use crate::error::ApiError;

const RESOURCE: &str = "reports";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutedAmount {
    pub expense_type_id: String,
    pub executed: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetVsExecuted {
    #[serde(default)]
    pub budgets: Vec<Budget>,
    #[serde(default)]
    pub executed: Vec<ExecutedAmount>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    Deposit,
    Expense,
}

impl MovementKind {
    pub fn label(&self) -> &'static str {
        match self {
            MovementKind::Deposit => "Deposit",
            MovementKind::Expense => "Expense",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    pub id: String,
    #[serde(default)]
    pub monetary_fund_id: String,
    pub amount: f64,
    #[serde(default)]
    pub description: Option<String>,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: MovementKind,
}

/// The movements endpoint answers either a flat list or deposits and expenses apart.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MovementsPayload {
    Flat(Vec<Movement>),
    Split {
        #[serde(default)]
        deposits: Vec<Deposit>,
        #[serde(default)]
        expenses: Vec<ExpenseHeader>,
    },
}

impl MovementsPayload {
    /// Deposits first, then expenses, each in server order.
    pub fn into_movements(self) -> Vec<Movement> {
        match self {
            MovementsPayload::Flat(list) => list,
            MovementsPayload::Split { deposits, expenses } => deposits
                .into_iter()
                .map(|d| Movement {
                    id: d.id,
                    monetary_fund_id: d.monetary_fund_id,
                    amount: d.amount,
                    description: d.description,
                    date: d.date,
                    kind: MovementKind::Deposit,
                })
                .chain(expenses.into_iter().map(|e| Movement {
                    id: e.id,
                    monetary_fund_id: e.monetary_fund_id,
                    amount: e.total_amount,
                    description: e.observations.or(Some(e.commerce_name)),
                    date: e.date,
                    kind: MovementKind::Expense,
                }))
                .collect(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReport {
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_balance: f64,
}

fn ranged(resource: &Resource, path: &str, user_id: &str, start: &str, end: &str, failure: &'static str) -> ApiRequest {
    ApiRequest::get(resource.path(path), failure)
        .with_query(&[("userId", user_id), ("start", start), ("end", end)])
}

fn summary_request(resource: &Resource, user_id: &str) -> ApiRequest {
    ApiRequest::get(resource.path("historical-summary"), "Failed to fetch summary report")
        .with_query(&[("userId", user_id)])
}

pub async fn budget_vs_executed(user_id: &str, start: &str, end: &str) -> Result<BudgetVsExecuted, ApiError> {
    ranged(
        &Resource::new(RESOURCE),
        "budget-vs-executed",
        user_id,
        start,
        end,
        "Failed to fetch budget vs executed",
    )
    .fetch()
    .await
}

pub async fn movements(user_id: &str, start: &str, end: &str) -> Result<Vec<Movement>, ApiError> {
    let payload: MovementsPayload = ranged(
        &Resource::new(RESOURCE),
        "movements",
        user_id,
        start,
        end,
        "Failed to fetch movements",
    )
    .fetch()
    .await?;
    Ok(payload.into_movements())
}

pub async fn historical_summary(user_id: &str) -> Result<SummaryReport, ApiError> {
    summary_request(&Resource::new(RESOURCE), user_id).fetch().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_urls() {
        let reports = Resource::with_root("http://api.local", RESOURCE);
        let bve = ranged(&reports, "budget-vs-executed", "u1", "2025-06-01", "2025-06-30", "x");
        assert_eq!(bve.url, "http://api.local/reports/budget-vs-executed");
        assert_eq!(
            bve.query,
            vec![
                ("userId", "u1".to_string()),
                ("start", "2025-06-01".to_string()),
                ("end", "2025-06-30".to_string()),
            ]
        );
        let summary = summary_request(&reports, "u1");
        assert_eq!(summary.url, "http://api.local/reports/historical-summary");
        assert_eq!(summary.query, vec![("userId", "u1".to_string())]);
    }

    #[test]
    fn flat_movements_pass_through() {
        let payload: MovementsPayload = serde_json::from_str(
            r#"[{"id":"m1","userId":"u1","monetaryFundId":"f1","amount":10,"description":"pay",
                 "date":"2025-06-01T00:00:00Z","type":"deposit"}]"#,
        )
        .unwrap();
        let movements = payload.into_movements();
        assert_eq!(movements.len(), 1);
        assert_eq!(movements[0].kind, MovementKind::Deposit);
    }

    #[test]
    fn split_movements_put_deposits_first() {
        let payload: MovementsPayload = serde_json::from_str(
            r#"{"expenses":[{"id":"e1","userId":"u1","date":"2025-06-03","monetaryFundId":"f1",
                 "commerceName":"Market","documentType":0,"totalAmount":25}],
                "deposits":[{"id":"d1","userId":"u1","date":"2025-06-04","monetaryFundId":"f1",
                 "amount":100,"description":"salary"}]}"#,
        )
        .unwrap();
        let movements = payload.into_movements();
        let ids: Vec<&str> = movements.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["d1", "e1"]);
        assert_eq!(movements[1].amount, 25.0);
        assert_eq!(movements[1].description.as_deref(), Some("Market"));
    }
}
