use gloo_net::http::{Request, Response};
use serde::{de::DeserializeOwned, Serialize};

use crate::config::config;
use crate::error::ApiError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// One HTTP call, fully described before it is sent.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    /// Query pairs, encoded by the browser when the request is built.
    pub query: Vec<(&'static str, String)>,
    pub body: Option<String>,
    /// Message used when the server gives none.
    pub failure: &'static str,
}

impl ApiRequest {
    pub fn get(url: String, failure: &'static str) -> Self {
        Self {
            method: Method::Get,
            url,
            query: Vec::new(),
            body: None,
            failure,
        }
    }

    pub fn delete(url: String, failure: &'static str) -> Self {
        Self {
            method: Method::Delete,
            url,
            query: Vec::new(),
            body: None,
            failure,
        }
    }

    pub fn post<B: Serialize>(url: String, body: &B, failure: &'static str) -> Result<Self, ApiError> {
        Self::with_body(Method::Post, url, body, failure)
    }

    pub fn put<B: Serialize>(url: String, body: &B, failure: &'static str) -> Result<Self, ApiError> {
        Self::with_body(Method::Put, url, body, failure)
    }

    fn with_body<B: Serialize>(
        method: Method,
        url: String,
        body: &B,
        failure: &'static str,
    ) -> Result<Self, ApiError> {
        let body = serde_json::to_string(body).map_err(|err| {
            log::error!("could not encode {} {} body: {}", method.as_str(), url, err);
            ApiError::new(failure)
        })?;
        Ok(Self {
            method,
            url,
            query: Vec::new(),
            body: Some(body),
            failure,
        })
    }

    pub fn with_query(mut self, pairs: &[(&'static str, &str)]) -> Self {
        self.query
            .extend(pairs.iter().map(|(key, value)| (*key, value.to_string())));
        self
    }

    /// Sends the request and decodes the JSON response body.
    pub async fn fetch<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        let response = self.send().await?;
        response.json::<T>().await.map_err(|err| {
            log::error!("{} {} returned an unreadable body: {}", self.method.as_str(), self.url, err);
            ApiError::new(self.failure)
        })
    }

    /// Sends the request, ignoring any success body.
    pub async fn execute(self) -> Result<(), ApiError> {
        self.send().await.map(|_| ())
    }

    async fn send(&self) -> Result<Response, ApiError> {
        log::debug!("{} {}", self.method.as_str(), self.url);

        let builder = match self.method {
            Method::Get => Request::get(&self.url),
            Method::Post => Request::post(&self.url),
            Method::Put => Request::put(&self.url),
            Method::Delete => Request::delete(&self.url),
        }
        .query(self.query.iter().map(|(key, value)| (*key, value.as_str())));

        let sent = match &self.body {
            Some(body) => match builder
                .header("Content-Type", "application/json")
                .body(body.clone())
            {
                Ok(request) => request.send().await,
                Err(err) => Err(err),
            },
            None => builder.send().await,
        };

        let response = sent.map_err(|err| {
            log::warn!("{} {} failed: {}", self.method.as_str(), self.url, err);
            ApiError::new(self.failure)
        })?;

        if !response.ok() {
            let body = response.text().await.unwrap_or_default();
            let err = ApiError::from_body(&body, self.failure);
            log::warn!(
                "{} {} answered {}: {}",
                self.method.as_str(),
                self.url,
                response.status(),
                err
            );
            return Err(err);
        }

        Ok(response)
    }
}

/// Base path of one REST resource under the configured API root.
#[derive(Clone, Debug, PartialEq)]
pub struct Resource {
    base: String,
}

impl Resource {
    pub fn new(name: &str) -> Self {
        Self::with_root(&config().api_root, name)
    }

    pub fn with_root(root: &str, name: &str) -> Self {
        Self {
            base: format!("{}/{}", root.trim_end_matches('/'), name),
        }
    }

    pub fn url(&self) -> String {
        self.base.clone()
    }

    pub fn path(&self, suffix: &str) -> String {
        format!("{}/{}", self.base, suffix)
    }

    pub fn item_url(&self, id: &str) -> String {
        self.path(id)
    }

    pub fn user_url(&self, user_id: &str) -> String {
        self.path(&format!("user/{}", user_id))
    }

    pub fn create<B: Serialize>(&self, body: &B, failure: &'static str) -> Result<ApiRequest, ApiError> {
        ApiRequest::post(self.url(), body, failure)
    }

    pub fn update<B: Serialize>(&self, body: &B, failure: &'static str) -> Result<ApiRequest, ApiError> {
        ApiRequest::put(self.url(), body, failure)
    }

    pub fn get(&self, id: &str, failure: &'static str) -> ApiRequest {
        ApiRequest::get(self.item_url(id), failure)
    }

    pub fn list_by_user(&self, user_id: &str, failure: &'static str) -> ApiRequest {
        ApiRequest::get(self.user_url(user_id), failure)
    }

    pub fn delete(&self, id: &str, failure: &'static str) -> ApiRequest {
        ApiRequest::delete(self.item_url(id), failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Body {
        user_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        notes: Option<String>,
    }

    #[test]
    fn resource_urls() {
        let budget = Resource::with_root("http://api.local/", "budget");
        assert_eq!(budget.url(), "http://api.local/budget");
        assert_eq!(budget.item_url("b-1"), "http://api.local/budget/b-1");
        assert_eq!(budget.user_url("u-9"), "http://api.local/budget/user/u-9");
    }

    #[test]
    fn crud_requests_use_the_right_verbs() {
        let funds = Resource::with_root("http://api.local", "monetaryFund");
        let body = Body {
            user_id: "u1".into(),
            notes: None,
        };

        let create = funds.create(&body, "Failed to create monetary fund").unwrap();
        assert_eq!(create.method, Method::Post);
        assert_eq!(create.url, "http://api.local/monetaryFund");
        assert_eq!(create.body.as_deref(), Some(r#"{"userId":"u1"}"#));

        let update = funds.update(&body, "Failed to update monetary fund").unwrap();
        assert_eq!(update.method, Method::Put);
        assert_eq!(update.url, "http://api.local/monetaryFund");

        let get = funds.get("f1", "Failed to fetch monetary fund");
        assert_eq!(get.method, Method::Get);
        assert_eq!(get.url, "http://api.local/monetaryFund/f1");
        assert!(get.body.is_none());

        let delete = funds.delete("f1", "Failed to delete monetary fund");
        assert_eq!(delete.method, Method::Delete);
        assert_eq!(delete.url, "http://api.local/monetaryFund/f1");
        assert_eq!(delete.failure, "Failed to delete monetary fund");
    }

    #[test]
    fn query_pairs_stay_raw_until_sent() {
        let reports = Resource::with_root("http://api.local", "reports");
        let request = ApiRequest::get(reports.path("movements"), "Failed to fetch movements")
            .with_query(&[("start", "2025-06-01T00:00:00+02:00"), ("end", "a b")]);
        assert_eq!(request.url, "http://api.local/reports/movements");
        assert_eq!(
            request.query,
            vec![
                ("start", "2025-06-01T00:00:00+02:00".to_string()),
                ("end", "a b".to_string()),
            ]
        );
    }
}
