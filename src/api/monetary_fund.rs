use serde::{Deserialize, Serialize};

use super::client::Resource;
use crate::error::ApiError;

const RESOURCE: &str = "monetaryFund";

/// Travels as an integer: 0 = bank account, 1 = petty cash.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum FundType {
    BankAccount,
    PettyCash,
}

impl FundType {
    pub const ALL: [FundType; 2] = [FundType::BankAccount, FundType::PettyCash];

    pub fn label(&self) -> &'static str {
        match self {
            FundType::BankAccount => "Bank Account",
            FundType::PettyCash => "Petty Cash",
        }
    }

    pub fn code(&self) -> u8 {
        (*self).into()
    }
}

impl From<FundType> for u8 {
    fn from(value: FundType) -> Self {
        match value {
            FundType::BankAccount => 0,
            FundType::PettyCash => 1,
        }
    }
}

impl TryFrom<u8> for FundType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(FundType::BankAccount),
            1 => Ok(FundType::PettyCash),
            other => Err(format!("unknown fund type {}", other)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonetaryFund {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub fund_type: FundType,
    pub initial_balance: f64,
    pub current_balance: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMonetaryFundRequest {
    pub user_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub fund_type: FundType,
    pub initial_balance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// The initial balance is fixed at creation and cannot be updated.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMonetaryFundRequest {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub fund_type: FundType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn resource() -> Resource {
    Resource::new(RESOURCE)
}

pub async fn create_monetary_fund(data: &CreateMonetaryFundRequest) -> Result<MonetaryFund, ApiError> {
    resource()
        .create(data, "Failed to create monetary fund")?
        .fetch()
        .await
}

pub async fn update_monetary_fund(data: &UpdateMonetaryFundRequest) -> Result<MonetaryFund, ApiError> {
    resource()
        .update(data, "Failed to update monetary fund")?
        .fetch()
        .await
}

pub async fn get_monetary_fund(id: &str) -> Result<MonetaryFund, ApiError> {
    resource()
        .get(id, "Failed to fetch monetary fund")
        .fetch()
        .await
}

pub async fn list_monetary_funds(user_id: &str) -> Result<Vec<MonetaryFund>, ApiError> {
    resource()
        .list_by_user(user_id, "Failed to fetch monetary funds")
        .fetch()
        .await
}

pub async fn delete_monetary_fund(id: &str) -> Result<(), ApiError> {
    resource()
        .delete(id, "Failed to delete monetary fund")
        .execute()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fund_type_is_an_integer_on_the_wire() {
        assert_eq!(serde_json::to_string(&FundType::PettyCash).unwrap(), "1");
        let parsed: FundType = serde_json::from_str("0").unwrap();
        assert_eq!(parsed, FundType::BankAccount);
        assert!(serde_json::from_str::<FundType>("7").is_err());
    }

    #[test]
    fn fund_decodes_from_server_shape() {
        let fund: MonetaryFund = serde_json::from_str(
            r#"{"id":"f1","userId":"u1","name":"Caja Chica","type":1,
                "initialBalance":100000,"currentBalance":100000}"#,
        )
        .unwrap();
        assert_eq!(fund.fund_type, FundType::PettyCash);
        assert_eq!(fund.current_balance, 100000.0);
        assert_eq!(fund.notes, None);
    }

    #[test]
    fn update_body_has_no_balance() {
        let body = serde_json::to_value(UpdateMonetaryFundRequest {
            id: "f1".into(),
            name: "Main".into(),
            fund_type: FundType::BankAccount,
            notes: Some("payroll".into()),
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"id": "f1", "name": "Main", "type": 0, "notes": "payroll"})
        );
    }
}
