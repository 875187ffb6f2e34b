use serde::{Deserialize, Deserializer, Serialize};

use super::client::{ApiRequest, Resource};
use crate::error::ApiError;

const RESOURCE: &str = "expense";

/// Sent by name; the server may answer with the name or the index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DocumentType {
    Comprobante,
    Factura,
    Otro,
}

impl DocumentType {
    pub const ALL: [DocumentType; 3] = [
        DocumentType::Comprobante,
        DocumentType::Factura,
        DocumentType::Otro,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Comprobante => "Comprobante",
            DocumentType::Factura => "Factura",
            DocumentType::Otro => "Otro",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == raw)
    }
}

impl<'de> Deserialize<'de> for DocumentType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Index(u8),
            Name(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Index(index) => DocumentType::ALL
                .get(index as usize)
                .copied()
                .ok_or_else(|| serde::de::Error::custom(format!("unknown document type {}", index))),
            Raw::Name(name) => DocumentType::parse(&name)
                .ok_or_else(|| serde::de::Error::custom(format!("unknown document type {}", name))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseDetailDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub expense_type_id: String,
    pub amount: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpenseRequest {
    pub user_id: String,
    pub date: String,
    pub monetary_fund_id: String,
    pub commerce_name: String,
    pub document_type: DocumentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
    pub details: Vec<ExpenseDetailDto>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExpenseRequest {
    pub id: String,
    pub date: String,
    pub monetary_fund_id: String,
    pub commerce_name: String,
    pub document_type: DocumentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
    pub details: Vec<ExpenseDetailDto>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseDetail {
    pub id: String,
    pub expense_header_id: String,
    pub expense_type_id: String,
    pub amount: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseHeader {
    pub id: String,
    pub user_id: String,
    pub date: String,
    pub monetary_fund_id: String,
    pub commerce_name: String,
    pub document_type: DocumentType,
    #[serde(default)]
    pub observations: Option<String>,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub expense_details: Vec<ExpenseDetail>,
}

fn resource() -> Resource {
    Resource::new(RESOURCE)
}

fn range_request(resource: &Resource, user_id: &str, start: &str, end: &str) -> ApiRequest {
    ApiRequest::get(format!("{}/range", resource.user_url(user_id)), "Failed to fetch expenses")
        .with_query(&[("start", start), ("end", end)])
}

pub async fn create_expense(data: &CreateExpenseRequest) -> Result<ExpenseHeader, ApiError> {
    resource()
        .create(data, "Failed to create expense")?
        .fetch()
        .await
}

pub async fn update_expense(data: &UpdateExpenseRequest) -> Result<ExpenseHeader, ApiError> {
    resource()
        .update(data, "Failed to update expense")?
        .fetch()
        .await
}

pub async fn get_expense(id: &str) -> Result<ExpenseHeader, ApiError> {
    resource().get(id, "Failed to fetch expense").fetch().await
}

pub async fn list_expenses(user_id: &str) -> Result<Vec<ExpenseHeader>, ApiError> {
    resource()
        .list_by_user(user_id, "Failed to fetch expenses")
        .fetch()
        .await
}

pub async fn list_expenses_in_range(
    user_id: &str,
    start: &str,
    end: &str,
) -> Result<Vec<ExpenseHeader>, ApiError> {
    range_request(&resource(), user_id, start, end).fetch().await
}

pub async fn delete_expense(id: &str) -> Result<(), ApiError> {
    resource()
        .delete(id, "Failed to delete expense")
        .execute()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::Method;

    #[test]
    fn document_type_accepts_name_or_index() {
        let by_name: DocumentType = serde_json::from_str(r#""Factura""#).unwrap();
        let by_index: DocumentType = serde_json::from_str("2").unwrap();
        assert_eq!(by_name, DocumentType::Factura);
        assert_eq!(by_index, DocumentType::Otro);
        assert!(serde_json::from_str::<DocumentType>(r#""Recibo""#).is_err());
        assert_eq!(serde_json::to_string(&DocumentType::Comprobante).unwrap(), r#""Comprobante""#);
    }

    #[test]
    fn range_query_targets_user_range() {
        let resource = Resource::with_root("http://api.local", RESOURCE);
        let request = range_request(&resource, "u1", "2025-06-01T00:00:00Z", "2025-06-30T23:59:59Z");
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.url, "http://api.local/expense/user/u1/range");
        assert_eq!(request.query[0], ("start", "2025-06-01T00:00:00Z".to_string()));
        assert_eq!(request.query[1], ("end", "2025-06-30T23:59:59Z".to_string()));
    }

    #[test]
    fn header_decodes_with_details() {
        let header: ExpenseHeader = serde_json::from_str(
            r#"{"id":"e1","userId":"u1","date":"2025-06-02T00:00:00Z","monetaryFundId":"f1",
                "commerceName":"Market","documentType":"Factura","totalAmount":30.5,
                "expenseDetails":[{"id":"d1","expenseHeaderId":"e1","expenseTypeId":"t1","amount":30.5}]}"#,
        )
        .unwrap();
        assert_eq!(header.document_type, DocumentType::Factura);
        assert_eq!(header.expense_details.len(), 1);
        assert_eq!(header.observations, None);
    }
}
