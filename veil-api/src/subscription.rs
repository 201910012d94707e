use crate::client::ApiClient;
use async_trait::async_trait;
use std::sync::Arc;
use veil_core::SubscriptionGateway;
use veil_shared::models::subscription::SubscribeInfo;
use veil_shared::Outcome;

/// Subscription endpoints, including the raw profile download.
#[derive(Clone)]
pub struct SubscriptionApi {
    client: Arc<ApiClient>,
}

impl SubscriptionApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SubscriptionGateway for SubscriptionApi {
    async fn subscribe_info(&self) -> Outcome<SubscribeInfo> {
        self.client.get_enveloped("user/getSubscribe", &[]).await
    }

    async fn fetch_profile(&self, url: &str) -> Outcome<String> {
        // The profile document lives at an absolute URL outside the API base
        // and is served raw, not enveloped.
        self.client.get_direct_text(url).await
    }
}
