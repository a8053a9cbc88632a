//! Thin fetch layer shared by the endpoint modules. Every request goes
//! through `send_with_timeout` so a hung server cannot wedge the UI.

use futures::future::{select, Either};
use gloo_net::http::{Request, Response};
use gloo_timers::future::TimeoutFuture;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::config::{endpoint, REQUEST_TIMEOUT_MS};
use super::error::{error_from_response, ApiError};

async fn send_with_timeout(request: Request) -> Result<Response, ApiError> {
    let fetch = Box::pin(request.send());
    let deadline = Box::pin(TimeoutFuture::new(REQUEST_TIMEOUT_MS));
    match select(fetch, deadline).await {
        Either::Left((Ok(response), _)) => Ok(response),
        Either::Left((Err(err), _)) => Err(ApiError::NetworkUnavailable {
            cause: err.to_string(),
        }),
        Either::Right(((), _)) => Err(ApiError::NetworkUnavailable {
            cause: format!("request timed out after {REQUEST_TIMEOUT_MS}ms"),
        }),
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if !response.ok() {
        let body = response.text().await.unwrap_or_default();
        return Err(error_from_response(status, &response.status_text(), &body));
    }
    response
        .json::<T>()
        .await
        .map_err(|err| ApiError::RequestFailed {
            status,
            message: format!("invalid response body: {err}"),
        })
}

pub(super) async fn get_json<T: DeserializeOwned>(
    path: &str,
    query: &[(&str, String)],
) -> Result<T, ApiError> {
    let request = Request::get(&endpoint(path))
        .query(query.iter().map(|(k, v)| (*k, v.as_str())))
        .build()
        .map_err(|err| ApiError::NetworkUnavailable {
            cause: err.to_string(),
        })?;
    decode(send_with_timeout(request).await?).await
}

pub(super) async fn post_json<B: Serialize, T: DeserializeOwned>(
    path: &str,
    body: &B,
) -> Result<T, ApiError> {
    let request = Request::post(&endpoint(path))
        .json(body)
        .map_err(|err| ApiError::NetworkUnavailable {
            cause: err.to_string(),
        })?;
    decode(send_with_timeout(request).await?).await
}

pub(super) async fn put_json<B: Serialize, T: DeserializeOwned>(
    path: &str,
    body: &B,
) -> Result<T, ApiError> {
    let request = Request::put(&endpoint(path))
        .json(body)
        .map_err(|err| ApiError::NetworkUnavailable {
            cause: err.to_string(),
        })?;
    decode(send_with_timeout(request).await?).await
}

pub(super) async fn delete_json<T: DeserializeOwned>(path: &str) -> Result<T, ApiError> {
    let request = Request::delete(&endpoint(path))
        .build()
        .map_err(|err| ApiError::NetworkUnavailable {
            cause: err.to_string(),
        })?;
    decode(send_with_timeout(request).await?).await
}
