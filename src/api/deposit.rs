use serde::{Deserialize, Serialize};

use super::client::Resource;
use crate::error::ApiError;

const RESOURCE: &str = "deposit";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deposit {
    pub id: String,
    pub user_id: String,
    pub date: String,
    pub monetary_fund_id: String,
    pub amount: f64,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepositRequest {
    pub user_id: String,
    pub date: String,
    pub monetary_fund_id: String,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDepositRequest {
    pub id: String,
    pub date: String,
    pub monetary_fund_id: String,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn resource() -> Resource {
    Resource::new(RESOURCE)
}

pub async fn create_deposit(data: &CreateDepositRequest) -> Result<Deposit, ApiError> {
    resource()
        .create(data, "Failed to create deposit")?
        .fetch()
        .await
}

pub async fn update_deposit(data: &UpdateDepositRequest) -> Result<Deposit, ApiError> {
    resource()
        .update(data, "Failed to update deposit")?
        .fetch()
        .await
}

pub async fn get_deposit(id: &str) -> Result<Deposit, ApiError> {
    resource().get(id, "Failed to fetch deposit").fetch().await
}

pub async fn list_deposits(user_id: &str) -> Result<Vec<Deposit>, ApiError> {
    resource()
        .list_by_user(user_id, "Failed to fetch deposits")
        .fetch()
        .await
}

pub async fn delete_deposit(id: &str) -> Result<(), ApiError> {
    resource()
        .delete(id, "Failed to delete deposit")
        .execute()
        .await
}
