use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::domain::errors::DispatchError;
use crate::domain::ports::ViewCounter;
use crate::domain::views::IncrementViewsResult;

pub const INCREMENT_VIEWS_MUTATION: &str = r#"
mutation IncrementViews($id: String!, $identifier: String!) {
  incrementViews(id: $id, identifier: $identifier) {
    success
    message
    data {
      id
      views
    }
  }
}
"#;

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a, V> {
    query: &'a str,
    variables: V,
}

#[derive(Debug, Serialize)]
struct IncrementViewsVariables<'a> {
    id: &'a str,
    identifier: &'a str,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct IncrementViewsData {
    #[serde(rename = "incrementViews")]
    increment_views: IncrementViewsResult,
}

// Thin reqwest client for the blog GraphQL endpoint.
#[derive(Clone)]
pub struct ViewsClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl ViewsClient {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ViewCounter for ViewsClient {
    async fn increment_views(
        &self,
        id: &str,
        identifier: &str,
    ) -> Result<IncrementViewsResult, DispatchError> {
        let body = GraphQlRequest {
            query: INCREMENT_VIEWS_MUTATION,
            variables: IncrementViewsVariables { id, identifier },
        };
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
            .map_err(DispatchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DispatchError::Upstream { status });
        }

        let payload = response
            .json::<GraphQlResponse<IncrementViewsData>>()
            .await
            .map_err(DispatchError::Decode)?;

        // GraphQL reports resolver failures in-band with a 200.
        if let Some(error) = payload.errors.into_iter().next() {
            return Err(DispatchError::GraphQl(error.message));
        }

        payload
            .data
            .map(|data| data.increment_views)
            .ok_or_else(|| DispatchError::GraphQl("response carried no data".to_string()))
    }
}
