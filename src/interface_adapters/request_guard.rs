// Outbound request wrapper shared by every HTTP call the client makes.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::domain::{Navigator, NormalizedError, Route};
use crate::interface_adapters::error_classifier::{TransportFailure, classify};
use crate::use_cases::SessionStore;

/// Sends requests with credentials attached and enforces the 401 policy.
///
/// The HTTP client keeps a cookie jar, so the server-issued session cookie
/// rides along on every request. Any 401, from any endpoint, resets the
/// session and redirects to login before the error is returned to the caller.
pub struct RequestGuard {
    http: Client,
    base_url: String,
    store: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl RequestGuard {
    pub fn new(
        base_url: &Url,
        timeout: Option<Duration>,
        store: Arc<SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder().cookie_store(true);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            store,
            navigator,
        })
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get<T>(&self, path: &str) -> Result<T, NormalizedError>
    where
        T: DeserializeOwned,
    {
        let response = self.dispatch::<()>(Method::GET, path, None).await?;
        self.decode(response).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, NormalizedError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.dispatch(Method::POST, path, Some(body)).await?;
        self.decode(response).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, NormalizedError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.dispatch(Method::PUT, path, Some(body)).await?;
        self.decode(response).await
    }

    // For endpoints whose success body carries nothing the caller needs.
    pub async fn post_no_content<B>(&self, path: &str, body: &B) -> Result<(), NormalizedError>
    where
        B: Serialize + ?Sized,
    {
        self.dispatch(Method::POST, path, Some(body)).await?;
        Ok(())
    }

    pub async fn delete(&self, path: &str) -> Result<(), NormalizedError> {
        self.dispatch::<()>(Method::DELETE, path, None).await?;
        Ok(())
    }

    async fn dispatch<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, NormalizedError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path);
        let mut request = self.http.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                return Err(self.intercept(classify(TransportFailure::Network {
                    url,
                    detail: err.to_string(),
                })));
            }
        };

        let status = response.status();
        tracing::debug!(%method, %url, status = status.as_u16(), "request completed");
        if status.is_success() {
            return Ok(response);
        }

        // Keep the server's error payload as the cause when it is JSON.
        let reason = status.canonical_reason().map(str::to_string);
        let body = response.json::<Value>().await.ok();
        Err(self.intercept(classify(TransportFailure::Status {
            url,
            status: status.as_u16(),
            reason,
            body,
        })))
    }

    async fn decode<T>(&self, response: Response) -> Result<T, NormalizedError>
    where
        T: DeserializeOwned,
    {
        let url = response.url().to_string();
        let status = response.status().as_u16();
        response.json::<T>().await.map_err(|err| {
            classify(TransportFailure::Decode {
                url,
                status,
                detail: err.to_string(),
            })
        })
    }

    // Any 401 ends the session, whichever request produced it.
    fn intercept(&self, error: NormalizedError) -> NormalizedError {
        if error.is_unauthorized() {
            tracing::warn!(url = %error.url, "unauthorized response; resetting session");
            self.store.mark_not_authenticated();
            self.navigator.navigate(Route::Login);
        }
        error
    }
}
