use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use uuid::Uuid;
use veil_core::{EngineError, NetworkEngine, ProfileSpec, SubscriptionGateway};
use veil_shared::ApiError;
use veil_store::SubscriptionCache;

const PROFILE_NAME: &str = "veil-subscription";

/// Best-effort activation of the purchased subscription.
///
/// Runs once per purchase, after payment settles. Every step may fail;
/// failures are caught and logged here and never propagate, because blocking
/// the user on background activation is worse than an occasional silent
/// failure that can be retried manually later. Control always returns after
/// the settle delay.
pub struct ActivationOrchestrator {
    subscription: Arc<dyn SubscriptionGateway>,
    engine: Arc<dyn NetworkEngine>,
    cache: SubscriptionCache,
    settle_delay: Duration,
    fired: AtomicBool,
}

#[derive(Debug, Error)]
enum ActivationError {
    #[error("failed to fetch subscription: {0}")]
    Subscription(ApiError),

    #[error("failed to fetch profile content: {0}")]
    ProfileFetch(ApiError),

    #[error("subscription carries no usable profile identity")]
    MissingProfileIdentity,

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl ActivationOrchestrator {
    pub fn new(
        subscription: Arc<dyn SubscriptionGateway>,
        engine: Arc<dyn NetworkEngine>,
        cache: SubscriptionCache,
        settle_delay: Duration,
    ) -> Self {
        Self {
            subscription,
            engine,
            cache,
            settle_delay,
            fired: AtomicBool::new(false),
        }
    }

    /// Run the activation sequence once. Subsequent calls are no-ops, so a
    /// manual retrigger cannot duplicate the work of the automatic one.
    pub async fn run(&self) {
        if self.fired.swap(true, Ordering::SeqCst) {
            debug!("activation already triggered for this purchase");
            return;
        }

        match self.perform().await {
            Ok(()) => info!("subscription profile activated"),
            // Deliberately tolerated: activation is best-effort and must not
            // block returning control to the caller.
            Err(error) => warn!(%error, "activation did not complete"),
        }
        sleep(self.settle_delay).await;
    }

    async fn perform(&self) -> Result<(), ActivationError> {
        // Always start from a fresh server read; the cache is only a change
        // detector.
        let info = self
            .subscription
            .subscribe_info()
            .await
            .ok_or_failure(ActivationError::Subscription)?;

        let content = self
            .subscription
            .fetch_profile(&info.subscribe_url)
            .await
            .ok_or_failure(ActivationError::ProfileFetch)?;
        let hash = sha256_hex(&content);

        let unchanged = self.cache.subscribe_url().as_deref() == Some(info.subscribe_url.as_str())
            && self.cache.profile_hash().as_deref() == Some(hash.as_str());
        if unchanged {
            debug!("profile unchanged, nothing to import");
            return Ok(());
        }

        let uuid = info
            .uuid
            .as_deref()
            .and_then(|raw| Uuid::parse_str(raw).ok())
            .ok_or(ActivationError::MissingProfileIdentity)?;

        match self.engine.find_profile(uuid).await? {
            Some(profile) => {
                debug!(%uuid, name = %profile.name, "refreshing existing profile");
                self.engine.refresh_profile(uuid).await?;
            }
            None => {
                debug!(%uuid, "importing new profile");
                self.engine
                    .import_profile(ProfileSpec {
                        uuid,
                        name: PROFILE_NAME.to_string(),
                        source_url: info.subscribe_url.clone(),
                    })
                    .await?;
            }
        }
        self.engine.select_profile(uuid).await?;
        self.restore_selected_node().await;

        self.cache.save_subscribe(&info);
        self.cache.save_subscribe_url(&info.subscribe_url);
        self.cache.save_profile_hash(&hash);
        Ok(())
    }

    /// Re-select the node the user had chosen before the profile refresh, if
    /// the new group still contains it. Failures here are cosmetic.
    async fn restore_selected_node(&self) {
        let Some(node) = self.cache.selected_node() else {
            return;
        };
        match self.engine.active_group().await {
            Ok(group) if group.iter().any(|candidate| candidate == &node) => {
                if let Err(error) = self.engine.patch_selection(&node).await {
                    warn!(%node, %error, "failed to restore node selection");
                }
            }
            Ok(_) => debug!(%node, "previously selected node is gone from the group"),
            Err(error) => warn!(%error, "failed to query the active proxy group"),
        }
    }
}

fn sha256_hex(content: &str) -> String {
    let digest = Sha256::digest(content.as_bytes());
    digest.iter().fold(String::with_capacity(64), |mut out, byte| {
        let _ = write!(out, "{byte:02x}");
        out
    })
}

trait OutcomeExt<T> {
    fn ok_or_failure(
        self,
        wrap: impl FnOnce(ApiError) -> ActivationError,
    ) -> Result<T, ActivationError>;
}

impl<T> OutcomeExt<T> for veil_shared::Outcome<T> {
    fn ok_or_failure(
        self,
        wrap: impl FnOnce(ApiError) -> ActivationError,
    ) -> Result<T, ActivationError> {
        match self {
            veil_shared::Outcome::Success(value) => Ok(value),
            veil_shared::Outcome::Failure(error) => Err(wrap(error)),
            veil_shared::Outcome::Loading => Err(wrap(ApiError::unknown(
                "operation unexpectedly still in flight",
            ))),
        }
    }
}
