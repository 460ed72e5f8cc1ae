//! Adapter registry and active-backend state
//!
//! The registry is the single owner of everything more than one caller path
//! mutates: the adapter set, the active id, the live settings, the per-id
//! settings cache, and the dynamic model-list cache. Every mutation happens
//! atomically under one write-lock acquisition (read current, compute next,
//! publish); reads hand out snapshots.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use switchboard_core::{Error, ModelSettings, Provider, ProviderInfo, Result};
use tracing::{debug, warn};

struct Inner {
    providers: Vec<Arc<dyn Provider>>,
    active: String,
    settings: ModelSettings,
    saved_settings: HashMap<String, ModelSettings>,
    model_cache: HashMap<String, Vec<String>>,
}

impl Inner {
    fn find(&self, id: &str) -> Option<Arc<dyn Provider>> {
        self.providers
            .iter()
            .find(|p| p.info().id == id)
            .map(Arc::clone)
    }
}

/// Owns the adapter set and the single active backend
///
/// Exactly one adapter is active at a time and the active id always resolves
/// to a registered adapter once anything is registered; a stale persisted id
/// falls back to the default id.
pub struct ProviderRegistry {
    default_id: String,
    inner: RwLock<Inner>,
}

impl ProviderRegistry {
    /// Create an empty registry with a fixed fallback id
    ///
    /// The default id becomes active as soon as its adapter is registered;
    /// until then calls that need an active adapter fail.
    pub fn new(default_id: impl Into<String>) -> Self {
        let default_id = default_id.into();
        Self {
            inner: RwLock::new(Inner {
                providers: Vec::new(),
                active: default_id.clone(),
                settings: ModelSettings::default(),
                saved_settings: HashMap::new(),
                model_cache: HashMap::new(),
            }),
            default_id,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Add an adapter; a second registration with the same id is a no-op
    pub fn register(&self, adapter: Arc<dyn Provider>) {
        let mut inner = self.write();
        let id = adapter.info().id.clone();
        if inner.find(&id).is_some() {
            debug!(provider = %id, "ignoring duplicate registration");
            return;
        }
        if inner.active == id {
            inner.settings = inner
                .saved_settings
                .get(&id)
                .cloned()
                .unwrap_or_else(|| adapter.default_settings());
        }
        inner.providers.push(adapter);
    }

    /// Number of registered adapters
    pub fn len(&self) -> usize {
        self.read().providers.len()
    }

    /// Whether no adapter is registered yet
    pub fn is_empty(&self) -> bool {
        self.read().providers.is_empty()
    }

    /// Descriptors of every registered adapter, in registration order
    pub fn providers(&self) -> Vec<ProviderInfo> {
        self.read().providers.iter().map(|p| p.info().clone()).collect()
    }

    /// Look up one adapter by id
    pub fn provider(&self, id: &str) -> Option<Arc<dyn Provider>> {
        self.read().find(id)
    }

    /// Make `id` the active backend
    ///
    /// Snapshots the outgoing adapter's live settings, restores the incoming
    /// adapter's cached settings or its defaults, and kicks off a
    /// fire-and-forget model-list refresh when the incoming adapter has a
    /// dynamic catalog with nothing cached yet. An unregistered id is an
    /// error and leaves the active backend unchanged.
    pub fn set_active(self: &Arc<Self>, id: &str) -> Result<()> {
        let needs_refresh = {
            let mut inner = self.write();
            let incoming = inner.find(id).ok_or_else(|| Error::Unsupported {
                provider: id.to_string(),
                feature: "activation (not registered)".to_string(),
            })?;

            let outgoing = inner.active.clone();
            let outgoing_settings = inner.settings.clone();
            inner.saved_settings.insert(outgoing, outgoing_settings);

            inner.active = id.to_string();
            inner.settings = inner
                .saved_settings
                .get(id)
                .cloned()
                .unwrap_or_else(|| incoming.default_settings());

            incoming.supports_model_listing() && !inner.model_cache.contains_key(id)
        };

        if needs_refresh {
            // set_active is callable from sync contexts; without a runtime
            // the refresh waits for the next explicit refresh_models call
            match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    let registry = Arc::clone(self);
                    let id = id.to_string();
                    handle.spawn(async move {
                        if let Err(e) = registry.refresh_models(&id).await {
                            debug!(provider = %id, error = %e, "background model refresh failed");
                        }
                    });
                }
                Err(_) => {
                    debug!(provider = %id, "no async runtime, skipping background model refresh");
                }
            }
        }
        Ok(())
    }

    /// Restore a persisted active id, falling back to the default id when it
    /// is stale or was never registered
    ///
    /// Returns the id actually activated.
    pub fn restore_active(self: &Arc<Self>, persisted_id: &str) -> Result<String> {
        if self.provider(persisted_id).is_some() {
            self.set_active(persisted_id)?;
            return Ok(persisted_id.to_string());
        }
        warn!(
            persisted = %persisted_id,
            fallback = %self.default_id,
            "persisted active id is not registered, falling back"
        );
        let default_id = self.default_id.clone();
        self.set_active(&default_id)?;
        Ok(default_id)
    }

    /// Id of the active backend
    pub fn active_id(&self) -> String {
        self.read().active.clone()
    }

    /// Snapshot of the active adapter and its live settings
    pub fn active(&self) -> Result<(Arc<dyn Provider>, ModelSettings)> {
        let inner = self.read();
        let active = inner.active.clone();
        let adapter = inner.find(&active).ok_or_else(|| Error::Unsupported {
            provider: active,
            feature: "activation (not registered)".to_string(),
        })?;
        Ok((adapter, inner.settings.clone()))
    }

    /// Atomically mutate the active settings
    pub fn update_settings(&self, f: impl FnOnce(&mut ModelSettings)) {
        let mut inner = self.write();
        f(&mut inner.settings);
    }

    /// Settings that would apply to `id`: the live settings when it is
    /// active, its cached snapshot otherwise, the adapter defaults when
    /// neither exists
    pub fn settings_for(&self, id: &str) -> Result<ModelSettings> {
        let inner = self.read();
        if inner.active == id && inner.find(id).is_some() {
            return Ok(inner.settings.clone());
        }
        if let Some(saved) = inner.saved_settings.get(id) {
            return Ok(saved.clone());
        }
        inner
            .find(id)
            .map(|p| p.default_settings())
            .ok_or_else(|| Error::Unsupported {
                provider: id.to_string(),
                feature: "settings (not registered)".to_string(),
            })
    }

    /// Whether the adapter's required credentials are all present
    ///
    /// Unregistered ids are not configured. Credential-free backends always
    /// are; the check is delegated to the adapter's secret-store lookup.
    pub fn is_configured(&self, id: &str) -> bool {
        self.provider(id).is_some_and(|p| p.is_configured())
    }

    /// Current model catalog for `id`: the dynamic cache when a refresh has
    /// landed, otherwise the descriptor's static list
    pub fn models(&self, id: &str) -> Result<Vec<String>> {
        let inner = self.read();
        if let Some(cached) = inner.model_cache.get(id) {
            return Ok(cached.clone());
        }
        inner
            .find(id)
            .map(|p| p.info().models.clone())
            .ok_or_else(|| Error::Unsupported {
                provider: id.to_string(),
                feature: "model listing (not registered)".to_string(),
            })
    }

    /// Query the backend for its live catalog and cache the result
    ///
    /// A failed or empty listing never replaces a cached non-empty one:
    /// stale-but-valid beats empty.
    pub async fn refresh_models(&self, id: &str) -> Result<Vec<String>> {
        let adapter = self.provider(id).ok_or_else(|| Error::Unsupported {
            provider: id.to_string(),
            feature: "model listing (not registered)".to_string(),
        })?;

        let models = adapter.list_models().await?;
        if models.is_empty() {
            debug!(provider = %id, "empty model listing, keeping previous catalog");
            return self.models(id);
        }

        let mut inner = self.write();
        inner.model_cache.insert(id.to_string(), models.clone());
        Ok(models)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use switchboard_core::{ChatRequest, ChatResponse, ProviderInfo};

    struct Stub {
        info: ProviderInfo,
        defaults: ModelSettings,
        configured: bool,
        dynamic: bool,
        listings: Mutex<Vec<Result<Vec<String>>>>,
        list_calls: AtomicUsize,
    }

    impl Stub {
        fn new(id: &str, default_model: &str) -> Self {
            let mut info = ProviderInfo::new(id, id);
            info.models = vec![default_model.to_string()];
            Self {
                info,
                defaults: ModelSettings::for_model(default_model),
                configured: true,
                dynamic: false,
                listings: Mutex::new(Vec::new()),
                list_calls: AtomicUsize::new(0),
            }
        }

        fn dynamic(mut self) -> Self {
            self.dynamic = true;
            self
        }

        fn unconfigured(mut self) -> Self {
            self.configured = false;
            self
        }

        fn next_listing(&self, listing: Result<Vec<String>>) -> &Self {
            self.listings.lock().unwrap().push(listing);
            self
        }
    }

    #[async_trait]
    impl Provider for Stub {
        fn info(&self) -> &ProviderInfo {
            &self.info
        }

        fn default_settings(&self) -> ModelSettings {
            self.defaults.clone()
        }

        fn is_configured(&self) -> bool {
            self.configured
        }

        async fn send(&self, _request: ChatRequest) -> Result<ChatResponse> {
            Ok(ChatResponse::text("stub"))
        }

        async fn list_models(&self) -> Result<Vec<String>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            let mut listings = self.listings.lock().unwrap();
            if listings.is_empty() {
                Ok(self.info.models.clone())
            } else {
                listings.remove(0)
            }
        }

        fn supports_model_listing(&self) -> bool {
            self.dynamic
        }
    }

    fn registry_with(stubs: Vec<Stub>) -> Arc<ProviderRegistry> {
        let registry = Arc::new(ProviderRegistry::new("alpha"));
        for stub in stubs {
            registry.register(Arc::new(stub));
        }
        registry
    }

    #[test]
    fn duplicate_registration_is_idempotent() {
        let registry = registry_with(vec![Stub::new("alpha", "a-1")]);
        assert_eq!(registry.len(), 1);

        registry.register(Arc::new(Stub::new("alpha", "a-other")));
        assert_eq!(registry.len(), 1);

        registry.register(Arc::new(Stub::new("beta", "b-1")));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn registering_the_default_id_installs_its_settings() {
        let registry = registry_with(vec![Stub::new("alpha", "a-1")]);
        let (adapter, settings) = registry.active().unwrap();
        assert_eq!(adapter.info().id, "alpha");
        assert_eq!(settings.model, "a-1");
    }

    #[tokio::test]
    async fn switching_and_back_restores_the_exact_settings() {
        let registry = registry_with(vec![Stub::new("alpha", "a-1"), Stub::new("beta", "b-1")]);

        registry.update_settings(|s| {
            s.temperature = 0.3;
            s.model = "a-custom".to_string();
        });
        let before = registry.active().unwrap().1;

        registry.set_active("beta").unwrap();
        assert_eq!(registry.active().unwrap().1.model, "b-1");

        registry.set_active("alpha").unwrap();
        let after = registry.active().unwrap().1;
        assert_eq!(after, before);
        assert_eq!(after.temperature, 0.3);
    }

    #[tokio::test]
    async fn unknown_id_leaves_the_active_backend_unchanged() {
        let registry = registry_with(vec![Stub::new("alpha", "a-1")]);

        let err = registry.set_active("ghost").unwrap_err();
        assert!(matches!(err, Error::Unsupported { provider, .. } if provider == "ghost"));
        assert_eq!(registry.active_id(), "alpha");
    }

    #[tokio::test]
    async fn stale_persisted_id_falls_back_to_the_default() {
        let registry = registry_with(vec![Stub::new("alpha", "a-1"), Stub::new("beta", "b-1")]);

        assert_eq!(registry.restore_active("beta").unwrap(), "beta");
        assert_eq!(registry.restore_active("removed").unwrap(), "alpha");
        assert_eq!(registry.active_id(), "alpha");
    }

    #[test]
    fn configured_delegates_to_the_adapter() {
        let registry = registry_with(vec![
            Stub::new("alpha", "a-1"),
            Stub::new("beta", "b-1").unconfigured(),
        ]);

        assert!(registry.is_configured("alpha"));
        assert!(!registry.is_configured("beta"));
        assert!(!registry.is_configured("ghost"));
    }

    #[tokio::test]
    async fn refresh_caches_the_live_catalog() {
        let stub = Stub::new("alpha", "a-1").dynamic();
        stub.next_listing(Ok(vec!["a-1".to_string(), "a-2".to_string()]));
        let registry = registry_with(vec![stub]);

        assert_eq!(registry.models("alpha").unwrap(), vec!["a-1"]);
        registry.refresh_models("alpha").await.unwrap();
        assert_eq!(registry.models("alpha").unwrap(), vec!["a-1", "a-2"]);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_the_previous_catalog() {
        let stub = Stub::new("alpha", "a-1").dynamic();
        stub.next_listing(Ok(vec!["live-1".to_string()]));
        stub.next_listing(Err(Error::network("daemon down")));
        stub.next_listing(Ok(Vec::new()));
        let registry = registry_with(vec![stub]);

        registry.refresh_models("alpha").await.unwrap();
        assert_eq!(registry.models("alpha").unwrap(), vec!["live-1"]);

        // A transport failure propagates but the cache survives
        assert!(registry.refresh_models("alpha").await.is_err());
        assert_eq!(registry.models("alpha").unwrap(), vec!["live-1"]);

        // An empty listing is never published over a non-empty one
        registry.refresh_models("alpha").await.unwrap();
        assert_eq!(registry.models("alpha").unwrap(), vec!["live-1"]);
    }

    #[test]
    fn activating_a_dynamic_backend_outside_a_runtime_does_not_panic() {
        let registry = registry_with(vec![Stub::new("alpha", "a-1")]);
        let beta: Arc<Stub> = Arc::new(Stub::new("beta", "b-1").dynamic());
        registry.register(beta.clone());

        registry.set_active("beta").unwrap();
        assert_eq!(registry.active_id(), "beta");

        // No runtime means no refresh; the static catalog still answers
        assert_eq!(beta.list_calls.load(Ordering::SeqCst), 0);
        assert_eq!(registry.models("beta").unwrap(), vec!["b-1"]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn activation_triggers_one_background_refresh() {
        let stub = Stub::new("beta", "b-1").dynamic();
        let registry = registry_with(vec![Stub::new("alpha", "a-1")]);
        let beta: Arc<Stub> = Arc::new(stub);
        registry.register(beta.clone());

        registry.set_active("beta").unwrap();
        tokio::task::yield_now().await;
        for _ in 0..50 {
            if beta.list_calls.load(Ordering::SeqCst) > 0 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }
        assert_eq!(beta.list_calls.load(Ordering::SeqCst), 1);

        // Switching away and back finds the cache warm; no second refresh
        registry.set_active("alpha").unwrap();
        registry.set_active("beta").unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        assert_eq!(beta.list_calls.load(Ordering::SeqCst), 1);
    }
}
