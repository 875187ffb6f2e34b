use serde::{Deserialize, Serialize};

use super::client::Resource;
use crate::error::ApiError;

const RESOURCE: &str = "budget";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub user_id: String,
    pub expense_type_id: String,
    pub month: u32,
    pub year: i32,
    pub amount: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBudgetRequest {
    pub user_id: String,
    pub expense_type_id: String,
    pub month: u32,
    pub year: i32,
    pub amount: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBudgetRequest {
    pub id: String,
    pub expense_type_id: String,
    pub month: u32,
    pub year: i32,
    pub amount: f64,
}

fn resource() -> Resource {
    Resource::new(RESOURCE)
}

pub async fn create_budget(data: &CreateBudgetRequest) -> Result<Budget, ApiError> {
    resource()
        .create(data, "Failed to create budget")?
        .fetch()
        .await
}

pub async fn update_budget(data: &UpdateBudgetRequest) -> Result<Budget, ApiError> {
    resource()
        .update(data, "Failed to update budget")?
        .fetch()
        .await
}

pub async fn get_budget(id: &str) -> Result<Budget, ApiError> {
    resource().get(id, "Failed to fetch budget").fetch().await
}

pub async fn list_budgets(user_id: &str) -> Result<Vec<Budget>, ApiError> {
    resource()
        .list_by_user(user_id, "Failed to fetch budgets")
        .fetch()
        .await
}

pub async fn delete_budget(id: &str) -> Result<(), ApiError> {
    resource()
        .delete(id, "Failed to delete budget")
        .execute()
        .await
}
