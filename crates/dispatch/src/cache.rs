//! ClientCache - one DispatchClient per configuration key
//!
//! Stages configured for the same pool share one client, and therefore one
//! cursor and one health view. The cache is an ordinary value: the host
//! creates it once and hands it to every stage; tests build their own.
//!
//! A hit takes only the read lock of the built-client map. A miss takes the
//! key's build lock, checks again and builds, so concurrent first users of
//! one key wait for a single construction while other keys proceed.

use std::collections::HashMap;
use std::sync::Arc;

use contracts::{CacheKey, ContractError, DispatcherConfig, PropertySource};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, instrument};

use crate::client::DispatchClient;
use crate::registry::ServerRegistry;

/// Keyed cache of shared dispatch clients
pub struct ClientCache<T> {
    clients: RwLock<HashMap<CacheKey, Arc<DispatchClient<T>>>>,
    build_locks: Mutex<HashMap<CacheKey, Arc<Mutex<()>>>>,
}

impl<T> ClientCache<T> {
    pub fn new() -> Self {
        Self {
            clients: RwLock::new(HashMap::new()),
            build_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Cached client for `key`, if one was built
    pub fn get(&self, key: &CacheKey) -> Option<Arc<DispatchClient<T>>> {
        self.clients.read().get(key).cloned()
    }

    /// Number of built clients
    pub fn len(&self) -> usize {
        self.clients.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the client for `key`, building it with `build` on first use
    ///
    /// `build` runs at most once per key among concurrent callers. When it
    /// fails nothing is cached and a later call may try again.
    ///
    /// # Errors
    /// `Configuration` when `build` fails.
    #[instrument(name = "client_cache_get_or_create", skip(self, key, build), fields(key = %key))]
    pub fn get_or_create<F>(
        &self,
        key: &CacheKey,
        build: F,
    ) -> Result<Arc<DispatchClient<T>>, ContractError>
    where
        F: FnOnce() -> Result<DispatchClient<T>, ContractError>,
    {
        if let Some(client) = self.get(key) {
            return Ok(client);
        }

        let lock = self.build_lock(key);
        let _building = lock.lock();
        if let Some(client) = self.get(key) {
            debug!("Client built by a concurrent caller");
            return Ok(client);
        }

        let client = build().map_err(|e| {
            if e.is_configuration() {
                e
            } else {
                ContractError::configuration(key.to_string(), e.to_string())
            }
        })?;
        let client = Arc::new(client);
        self.clients.write().insert(key.clone(), Arc::clone(&client));

        info!(endpoints = ?client.endpoint_names(), "Dispatch client created");
        Ok(client)
    }

    /// Return the client for a dispatch stage, resolving its pool on first use
    ///
    /// The first stage to build a key fixes the client's retry interval and
    /// timeout; later stages sharing the key reuse it as is.
    pub fn get_or_resolve<S>(
        &self,
        source: &S,
        settings: &DispatcherConfig,
        transport: Arc<T>,
    ) -> Result<Arc<DispatchClient<T>>, ContractError>
    where
        S: PropertySource + ?Sized,
    {
        self.get_or_create(&settings.cache_key(), || {
            let endpoints = ServerRegistry::resolve(
                source,
                &settings.server_name_key,
                &settings.server_name_type_prefix,
            )?;
            DispatchClient::new(
                endpoints,
                settings.retry_interval(),
                settings.call_timeout(),
                transport,
            )
        })
    }

    fn build_lock(&self, key: &CacheKey) -> Arc<Mutex<()>> {
        Arc::clone(self.build_locks.lock().entry(key.clone()).or_default())
    }
}

impl<T> Default for ClientCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
