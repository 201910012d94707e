use std::sync::Arc;
use tracing::warn;
use veil_core::KvStore;
use veil_shared::models::subscription::SubscribeInfo;

const KEY_TOKEN: &str = "auth_token";
const KEY_SNAPSHOT: &str = "subscribe_snapshot";
const KEY_SUBSCRIBE_URL: &str = "subscribe_url";
const KEY_PROFILE_HASH: &str = "profile_hash";
const KEY_SELECTED_NODE: &str = "selected_node";

/// Typed accessors over the injected store.
///
/// Everything here is a resume hint: useful for change detection and for
/// restoring UI state after restart, never authoritative over a fresh server
/// read.
#[derive(Clone)]
pub struct SubscriptionCache {
    store: Arc<dyn KvStore>,
}

impl SubscriptionCache {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(KEY_TOKEN)
    }

    pub fn save_token(&self, token: &str) {
        self.store.put(KEY_TOKEN, token);
    }

    pub fn clear_token(&self) {
        self.store.remove(KEY_TOKEN);
    }

    pub fn subscribe(&self) -> Option<SubscribeInfo> {
        let raw = self.store.get(KEY_SNAPSHOT)?;
        match serde_json::from_str(&raw) {
            Ok(info) => Some(info),
            Err(error) => {
                warn!(%error, "discarding unreadable subscription snapshot");
                self.store.remove(KEY_SNAPSHOT);
                None
            }
        }
    }

    pub fn save_subscribe(&self, info: &SubscribeInfo) {
        match serde_json::to_string(info) {
            Ok(raw) => self.store.put(KEY_SNAPSHOT, &raw),
            Err(error) => warn!(%error, "failed to serialize subscription snapshot"),
        }
    }

    pub fn subscribe_url(&self) -> Option<String> {
        self.store.get(KEY_SUBSCRIBE_URL)
    }

    pub fn save_subscribe_url(&self, url: &str) {
        self.store.put(KEY_SUBSCRIBE_URL, url);
    }

    pub fn profile_hash(&self) -> Option<String> {
        self.store.get(KEY_PROFILE_HASH)
    }

    pub fn save_profile_hash(&self, hash: &str) {
        self.store.put(KEY_PROFILE_HASH, hash);
    }

    pub fn selected_node(&self) -> Option<String> {
        self.store.get(KEY_SELECTED_NODE)
    }

    pub fn save_selected_node(&self, node: &str) {
        self.store.put(KEY_SELECTED_NODE, node);
    }

    /// Drop everything tied to the current subscription, keeping the auth
    /// token.
    pub fn clear_subscription(&self) {
        self.store.remove(KEY_SNAPSHOT);
        self.store.remove(KEY_SUBSCRIBE_URL);
        self.store.remove(KEY_PROFILE_HASH);
    }
}
