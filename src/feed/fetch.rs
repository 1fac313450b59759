// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use bytes::Bytes;

use crate::error::FetchError;
use crate::http::HttpClient;

/// Fetch the raw body of a feed
///
/// Any status outside the 2xx range is a failure for this feed only.
pub async fn fetch_feed<C: HttpClient>(client: &C, url: &str) -> Result<Bytes, FetchError> {
    let response = client
        .get(url)
        .await
        .map_err(|e| FetchError::RequestFailed {
            url: url.to_string(),
            source: e,
        })?;

    if !response.is_success() {
        return Err(FetchError::HttpStatus {
            url: url.to_string(),
            status: response.status,
        });
    }

    Ok(response.body)
}
