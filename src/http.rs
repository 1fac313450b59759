// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::FetchError;

/// Identifying header sent with every feed request
pub const USER_AGENT: &str = concat!(
    "podmirror/",
    env!("CARGO_PKG_VERSION"),
    " (feed mirror; +https://crates.io/crates/podmirror)"
);

/// HTTP response with status and the complete body
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body, exactly as received
    pub body: Bytes,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client abstraction for testability
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform a GET request and buffer the whole response body
    async fn get(&self, url: &str) -> Result<HttpResponse, reqwest::Error>;
}

/// Default HTTP client implementation using reqwest
///
/// Certificate validation stays at reqwest's default (enabled).
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Create a new ReqwestClient that identifies itself with [`USER_AGENT`]
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(FetchError::ClientBuildFailed)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, reqwest::Error> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        Ok(HttpResponse { status, body })
    }
}
