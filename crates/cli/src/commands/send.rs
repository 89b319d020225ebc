//! `send` command implementation.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use contracts::{ContractError, DispatcherConfig, PropertySource};
use dispatch::{BackendTransport, ClientCache, MockBehavior, MockTransport, TcpTransport};
use observability::{CallStatus, DispatchAggregator};
use tracing::{info, warn};

use super::load_blueprint;
use crate::cli::SendArgs;
use crate::error::CliError;

/// Execute the `send` command
pub async fn run_send(args: &SendArgs) -> Result<()> {
    let blueprint = load_blueprint(&args.config)?;
    let settings = blueprint
        .dispatcher(&args.dispatcher)
        .ok_or_else(|| CliError::unknown_dispatcher(&args.dispatcher))?;

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }

    let store = config_loader::ConfigLoader::property_store(&blueprint);

    let aggregator = if args.mock {
        let transport = MockTransport::new();
        for endpoint in &args.mock_fail {
            transport.set_behavior(endpoint, MockBehavior::unreachable("marked down"));
        }
        send_with(&store, settings, Arc::new(transport), args).await?
    } else {
        send_with(&store, settings, Arc::new(TcpTransport::new()), args).await?
    };

    let summary = aggregator.summary();
    println!("\n{}", summary);

    let failed = summary.rejected + summary.exhausted;
    if failed > 0 {
        return Err(CliError::SendFailed {
            failed,
            total: summary.total_calls,
        }
        .into());
    }
    Ok(())
}

/// Send `args.count` requests through the pool's cached client
async fn send_with<T, S>(
    source: &S,
    settings: &DispatcherConfig,
    transport: Arc<T>,
    args: &SendArgs,
) -> Result<DispatchAggregator>
where
    T: BackendTransport,
    S: PropertySource + ?Sized,
{
    let cache = ClientCache::new();
    let client = cache
        .get_or_resolve(source, settings, transport)
        .with_context(|| format!("Failed to build client for '{}'", settings.name))?;

    info!(
        dispatcher = %settings.name,
        endpoints = ?client.endpoint_names(),
        count = args.count,
        "Sending requests"
    );

    let mut aggregator = DispatchAggregator::new();
    for i in 0..args.count {
        let started = Instant::now();
        let result = client.send(&args.header, &args.body).await;
        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;

        let status = match result {
            Ok(response) => {
                println!("[{}] {}", i, response);
                CallStatus::Success
            }
            Err(e @ ContractError::Rejected { .. }) => {
                println!("[{}] ✗ {}", i, e);
                CallStatus::Rejected
            }
            Err(e) => {
                warn!(request = i, error = %e, "Request failed");
                println!("[{}] ✗ {}", i, e);
                CallStatus::Exhausted
            }
        };
        aggregator.update(status, latency_ms);
    }

    let snapshot = client.metrics().snapshot();
    info!(
        failovers = snapshot.failovers,
        skipped = snapshot.skipped_ineligible,
        "Client counters"
    );

    Ok(aggregator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config_loader::PropertyStore;
    use contracts::SERVER_NAME_PROP;

    fn settings() -> DispatcherConfig {
        serde_json::from_str(
            r#"{
                "name": "client",
                "server_name_key": "GW",
                "server_name_type_prefix": "POOL",
                "down_server_retry_time_ms": 60000
            }"#,
        )
        .unwrap()
    }

    fn args(count: u32) -> SendArgs {
        SendArgs {
            config: "router.toml".into(),
            dispatcher: "client".to_string(),
            header: "h".to_string(),
            body: "ping".to_string(),
            count,
            mock: true,
            mock_fail: Vec::new(),
            metrics_port: 0,
        }
    }

    fn store() -> PropertyStore {
        PropertyStore::new()
            .with("GW", "POOL_0", SERVER_NAME_PROP, "srv-a")
            .with("GW", "POOL_1", SERVER_NAME_PROP, "srv-b")
    }

    #[tokio::test]
    async fn test_send_with_mock_failover() {
        let transport = Arc::new(
            MockTransport::new().with_behavior("srv-a", MockBehavior::unreachable("down")),
        );

        let aggregator = send_with(&store(), &settings(), Arc::clone(&transport), &args(4))
            .await
            .unwrap();

        assert_eq!(aggregator.successes, 4);
        assert_eq!(transport.call_count("srv-a"), 1);
        assert_eq!(transport.call_count("srv-b"), 4);
    }

    #[tokio::test]
    async fn test_send_with_all_down() {
        let transport = Arc::new(MockTransport::with_default(MockBehavior::unreachable(
            "down",
        )));

        let aggregator = send_with(&store(), &settings(), transport, &args(2))
            .await
            .unwrap();

        assert_eq!(aggregator.exhausted, 2);
        assert_eq!(aggregator.successes, 0);
    }

    #[tokio::test]
    async fn test_send_with_unresolvable_pool() {
        let result = send_with(
            &PropertyStore::new(),
            &settings(),
            Arc::new(MockTransport::new()),
            &args(1),
        )
        .await;
        assert!(result.is_err());
    }
}
