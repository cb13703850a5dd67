//! HTTP client for the balance service.
use clicker_core::wire::{ADD_CLICKS_PATH, GET_BALANCE_PATH};
use clicker_core::{
    AddClicksRequest, AddClicksResponse, BalanceApi, BalanceRequest, BalanceResponse,
    ClientConfig, TransportError,
};
use futures::future::{Either, select};
use gloo::net::http::{Request, Response};
use gloo::timers::future::TimeoutFuture;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// `fetch`-based [`BalanceApi`] posting JSON to the configured service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpBalanceApi {
    get_balance_url: String,
    add_clicks_url: String,
    timeout_ms: u32,
}

impl HttpBalanceApi {
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            get_balance_url: config.endpoint(GET_BALANCE_PATH),
            add_clicks_url: config.endpoint(ADD_CLICKS_PATH),
            timeout_ms: config.request_timeout_ms,
        }
    }

    #[must_use]
    pub fn get_balance_url(&self) -> &str {
        &self.get_balance_url
    }

    #[must_use]
    pub fn add_clicks_url(&self) -> &str {
        &self.add_clicks_url
    }

    #[allow(clippy::future_not_send)] // Wasm futures rely on `JsFuture`, which is not `Send`.
    async fn post_json<B, T>(&self, url: &str, body: &B) -> Result<T, TransportError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = Request::post(url)
            .header("Content-Type", "application/json")
            .json(body)
            .map_err(|err| TransportError::Network(err.to_string()))?;

        let send = Box::pin(request.send());
        let response = match select(send, TimeoutFuture::new(self.timeout_ms)).await {
            Either::Left((sent, _)) => {
                sent.map_err(|err| TransportError::Network(err.to_string()))?
            }
            Either::Right(((), _)) => return Err(TransportError::Timeout(self.timeout_ms)),
        };
        check_status(&response)?;

        let text = response
            .text()
            .await
            .map_err(|err| TransportError::Network(err.to_string()))?;
        Ok(serde_json::from_str(&text)?)
    }
}

fn check_status(response: &Response) -> Result<(), TransportError> {
    if response.ok() {
        Ok(())
    } else {
        Err(TransportError::Status {
            status: response.status(),
            status_text: response.status_text(),
        })
    }
}

#[async_trait::async_trait(?Send)]
impl BalanceApi for HttpBalanceApi {
    async fn get_balance(
        &self,
        request: &BalanceRequest,
    ) -> Result<BalanceResponse, TransportError> {
        self.post_json(&self.get_balance_url, request).await
    }

    async fn add_clicks(
        &self,
        request: &AddClicksRequest,
    ) -> Result<AddClicksResponse, TransportError> {
        self.post_json(&self.add_clicks_url, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_derive_from_config() {
        let config = ClientConfig::default().with_api_override(Some("https://svc.example.net/"));
        let api = HttpBalanceApi::new(&config);
        assert_eq!(api.get_balance_url(), "https://svc.example.net/get-balance");
        assert_eq!(api.add_clicks_url(), "https://svc.example.net/add-clicks");
    }
}
