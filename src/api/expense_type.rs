use serde::{Deserialize, Serialize};

use super::client::Resource;
use crate::error::ApiError;

const RESOURCE: &str = "expenseType";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseType {
    pub id: String,
    #[serde(default)]
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub user_id: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpenseTypeRequest {
    pub user_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExpenseTypeRequest {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn resource() -> Resource {
    Resource::new(RESOURCE)
}

pub async fn create_expense_type(data: &CreateExpenseTypeRequest) -> Result<ExpenseType, ApiError> {
    resource()
        .create(data, "Failed to create expense type")?
        .fetch()
        .await
}

pub async fn update_expense_type(data: &UpdateExpenseTypeRequest) -> Result<ExpenseType, ApiError> {
    resource()
        .update(data, "Failed to update expense type")?
        .fetch()
        .await
}

pub async fn get_expense_type(id: &str) -> Result<ExpenseType, ApiError> {
    resource()
        .get(id, "Failed to fetch expense type")
        .fetch()
        .await
}

pub async fn list_expense_types(user_id: &str) -> Result<Vec<ExpenseType>, ApiError> {
    resource()
        .list_by_user(user_id, "Failed to fetch expense types")
        .fetch()
        .await
}

pub async fn delete_expense_type(id: &str) -> Result<(), ApiError> {
    resource()
        .delete(id, "Failed to delete expense type")
        .execute()
        .await
}
