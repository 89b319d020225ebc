//! ServerRegistry - server pool discovery
//!
//! Server names are stored as `SERVER_NAME` properties under one key, with
//! property types `PREFIX`, `PREFIX_0`, `PREFIX_1`, ... Indices 0 to 2 are
//! always probed; past that, probing continues only while the previous
//! index held a value.

use contracts::{ContractError, PropertySource, SERVER_NAME_PROP};
use tracing::{debug, instrument};

/// Highest index probed regardless of gaps
const ALWAYS_PROBED: usize = 2;

/// Resolves the ordered server list of a pool
pub struct ServerRegistry;

impl ServerRegistry {
    /// Resolve server names for `key` / `type_prefix`
    ///
    /// Duplicates are kept and get proportionally more traffic.
    ///
    /// # Errors
    /// `Configuration` when no server name is found.
    #[instrument(name = "server_registry_resolve", skip(source))]
    pub fn resolve<S>(source: &S, key: &str, type_prefix: &str) -> Result<Vec<String>, ContractError>
    where
        S: PropertySource + ?Sized,
    {
        let probe = |property_type: &str| source.property(key, property_type, SERVER_NAME_PROP);

        let mut servers: Vec<String> = probe(type_prefix).into_iter().collect();

        let mut index = 0;
        loop {
            let found = probe(&format!("{type_prefix}_{index}"));
            let hit = found.is_some();
            servers.extend(found);
            index += 1;
            if index > ALWAYS_PROBED && !hit {
                break;
            }
        }

        if servers.is_empty() {
            return Err(ContractError::configuration(
                format!("{key}-{type_prefix}"),
                "no server names configured",
            ));
        }

        debug!(servers = ?servers, probed = index, "Resolved server pool");
        Ok(servers)
    }
}
