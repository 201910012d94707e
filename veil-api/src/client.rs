use reqwest::Client;
use serde::Serialize;
use std::sync::RwLock;
use std::time::Duration;

/// Shared HTTP client for the service API.
///
/// The auth token is set after login and attached to every request; the
/// service expects it verbatim in the `Authorization` header.
#[derive(Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Ok(Self {
            http,
            base_url,
            token: RwLock::new(None),
        })
    }

    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write().expect("token lock poisoned") = Some(token.into());
    }

    pub fn clear_token(&self) {
        *self.token.write().expect("token lock poisoned") = None;
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.token.read().expect("token lock poisoned").as_deref() {
            Some(token) => request.header("Authorization", token),
            None => request,
        }
    }

    pub(crate) async fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> reqwest::Result<reqwest::Response> {
        self.authorize(self.http.get(self.url(path)).query(query))
            .send()
            .await
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> reqwest::Result<reqwest::Response> {
        self.authorize(self.http.post(self.url(path)).json(body))
            .send()
            .await
    }

    /// Fetch an absolute URL, e.g. the subscription profile document, which
    /// lives outside the API base path.
    pub(crate) async fn get_absolute(&self, url: &str) -> reqwest::Result<reqwest::Response> {
        self.authorize(self.http.get(url)).send().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_exactly_one_trailing_slash() {
        let client = ApiClient::new("https://veil.example/api/v1", Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.url("user/order/save"),
            "https://veil.example/api/v1/user/order/save"
        );
        assert_eq!(
            client.url("/user/order/save"),
            "https://veil.example/api/v1/user/order/save"
        );
    }
}
