use serde::{Deserialize, Serialize};

use super::client::{ApiRequest, Resource};
use crate::error::ApiError;

const RESOURCE: &str = "user";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub user_name: String,
    #[serde(default)]
    pub password_hash: String,
    pub user_type_id: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub user_name: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub user_name: String,
    pub password: String,
    pub user_type_id: i64,
}

pub async fn login(request: &LoginRequest) -> Result<User, ApiError> {
    let users = Resource::new(RESOURCE);
    ApiRequest::post(users.path("login"), request, "Login failed")?
        .fetch()
        .await
}

pub async fn create_user(request: &CreateUserRequest) -> Result<User, ApiError> {
    Resource::new(RESOURCE)
        .create(request, "Failed to create user")?
        .fetch()
        .await
}

pub async fn get_user(id: &str) -> Result<User, ApiError> {
    Resource::new(RESOURCE)
        .get(id, "Failed to fetch user")
        .fetch()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_body_is_camel_case() {
        let body = serde_json::to_value(LoginRequest {
            user_name: "ana".into(),
            password: "secret".into(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"userName": "ana", "password": "secret"}));
    }

    #[test]
    fn user_decodes_without_hash() {
        let user: User =
            serde_json::from_str(r#"{"id":"u1","userName":"ana","userTypeId":2}"#).unwrap();
        assert_eq!(user.user_name, "ana");
        assert_eq!(user.user_type_id, 2);
        assert!(user.password_hash.is_empty());
    }
}
