//! # Integration Tests
//!
//! End-to-end tests across crates:
//! - configuration -> property store -> client cache -> dispatch
//! - configuration -> fan-out routing list

#[cfg(test)]
mod e2e_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{ContractError, Document, Node, PipelineBlueprint};
    use dispatch::{ClientCache, MockBehavior, MockTransport};
    use fanout::FanoutRouter;

    const CONFIG: &str = r#"
version = "V1"

[[properties]]
key = "SOA_GATEWAY"
property_type = "NPAC_SERVER_0"
name = "SERVER_NAME"
value = "npac-a"

[[properties]]
key = "SOA_GATEWAY"
property_type = "NPAC_SERVER_1"
name = "SERVER_NAME"
value = "npac-b"

[[properties]]
key = "SOA_GATEWAY"
property_type = "NPAC_SERVER_2"
name = "SERVER_NAME"
value = "npac-c"

[[dispatchers]]
name = "npac_client"
server_name_key = "SOA_GATEWAY"
server_name_type_prefix = "NPAC_SERVER"
down_server_retry_time_ms = 1000
call_timeout_ms = 200

[[dispatchers]]
name = "npac_client_audit"
server_name_key = "SOA_GATEWAY"
server_name_type_prefix = "NPAC_SERVER"
down_server_retry_time_ms = 5000

[[splitters]]
name = "tn_split"
destinations = ["validate", "persist"]
[splitters.mode]
kind = "field_list"
primary_path = "Body.Subscription.Tn"
correlation_path = "Body.ReferenceKey"
range_start_path = "Body.Subscription.TnRange.Tn"
range_end_path = "Body.Subscription.TnRange.EndStation"

[[splitters]]
name = "batch_split"
destinations = ["worker"]
[splitters.mode]
kind = "child_nodes"
container_path = "Orders"
output_root = "."
"#;

    fn blueprint() -> PipelineBlueprint {
        ConfigLoader::load_from_str(CONFIG, ConfigFormat::Toml).unwrap()
    }

    /// TOML -> JSON -> blueprint keeps every stage's routing settings
    #[test]
    fn test_config_round_trip_keeps_stages() {
        let blueprint = blueprint();
        let json = ConfigLoader::to_json(&blueprint).unwrap();
        let reloaded = ConfigLoader::load_from_str(&json, ConfigFormat::Json).unwrap();

        let keys: Vec<_> = reloaded
            .dispatchers
            .iter()
            .map(|d| d.cache_key().to_string())
            .collect();
        assert_eq!(keys, ["SOA_GATEWAY-NPAC_SERVER", "SOA_GATEWAY-NPAC_SERVER"]);
        assert_eq!(
            reloaded.dispatcher("npac_client").unwrap().call_timeout(),
            Duration::from_millis(200)
        );
        for splitter in &blueprint.splitters {
            let again = reloaded.splitter(&splitter.name).unwrap();
            assert_eq!(again.mode, splitter.mode);
            assert_eq!(again.destinations, splitter.destinations);
        }
        assert_eq!(
            ConfigLoader::property_store(&reloaded).len(),
            blueprint.properties.len()
        );
    }

    /// Config -> PropertyStore -> ClientCache -> DispatchClient with failover
    #[tokio::test(start_paused = true)]
    async fn test_e2e_dispatch_failover() {
        let blueprint = blueprint();
        let store = ConfigLoader::property_store(&blueprint);
        let transport = Arc::new(
            MockTransport::new().with_behavior("npac-a", MockBehavior::unreachable("refused")),
        );
        let cache = ClientCache::new();

        let settings = blueprint.dispatcher("npac_client").unwrap();
        let client = cache
            .get_or_resolve(&store, settings, Arc::clone(&transport))
            .unwrap();
        assert_eq!(client.endpoint_names(), ["npac-a", "npac-b", "npac-c"]);

        // npac-a fails once and is skipped until the retry interval elapses
        assert_eq!(client.send("h", "r1").await.unwrap(), "npac-b:r1");
        assert_eq!(client.send("h", "r2").await.unwrap(), "npac-c:r2");
        assert_eq!(client.send("h", "r3").await.unwrap(), "npac-b:r3");
        assert_eq!(transport.call_count("npac-a"), 1);

        transport.set_behavior("npac-a", MockBehavior::Echo);
        tokio::time::advance(Duration::from_millis(1001)).await;

        let mut responses = Vec::new();
        for i in 0..3 {
            responses.push(client.send("h", &format!("s{i}")).await.unwrap());
        }
        assert!(responses.iter().any(|r| r.starts_with("npac-a:")));
        assert_eq!(client.metrics().snapshot().failovers, 1);
    }

    /// Stages sharing a key share one client; the first creator's settings win
    #[tokio::test]
    async fn test_e2e_shared_client() {
        let blueprint = blueprint();
        let store = ConfigLoader::property_store(&blueprint);
        let transport = Arc::new(MockTransport::new());
        let cache = ClientCache::new();

        let first = cache
            .get_or_resolve(
                &store,
                blueprint.dispatcher("npac_client").unwrap(),
                Arc::clone(&transport),
            )
            .unwrap();
        let second = cache
            .get_or_resolve(
                &store,
                blueprint.dispatcher("npac_client_audit").unwrap(),
                Arc::clone(&transport),
            )
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert_eq!(second.retry_interval(), Duration::from_millis(1000));

        first.send("h", "a").await.unwrap();
        second.send("h", "b").await.unwrap();
        assert_eq!(transport.calls().len(), 2);
        assert_eq!(transport.call_count("npac-a"), 1);
        assert_eq!(transport.call_count("npac-b"), 1);
    }

    /// Every endpoint down: the error names the pool and the last failure
    #[tokio::test]
    async fn test_e2e_dispatch_exhausted() {
        let blueprint = blueprint();
        let store = ConfigLoader::property_store(&blueprint);
        let transport = Arc::new(MockTransport::with_default(MockBehavior::unreachable(
            "down",
        )));
        let cache = ClientCache::new();
        let client = cache
            .get_or_resolve(&store, blueprint.dispatcher("npac_client").unwrap(), transport)
            .unwrap();

        match client.send("h", "x").await {
            Err(ContractError::Dispatch {
                endpoints,
                attempts,
                last_error,
            }) => {
                assert_eq!(endpoints.len(), 3);
                assert_eq!(attempts, 3);
                assert!(last_error.is_some());
            }
            other => panic!("expected dispatch error, got {other:?}"),
        }
    }

    /// Config -> FanoutRouter over a field-list request
    #[test]
    fn test_e2e_field_list_routing() {
        let blueprint = blueprint();
        let splitter = blueprint.splitter("tn_split").unwrap();
        let router = FanoutRouter::new(splitter.mode.clone());

        let doc = Document::from_root(
            Node::new("SOAMessage").with_child(
                Node::new("Body")
                    .with_child(Node::new("Subscription").with_child(Node::leaf(
                        "Tn",
                        "305-555-0001;305-555-0002-0009",
                    )))
                    .with_child(Node::leaf("ReferenceKey", "R1")),
            ),
        );

        let summary = router
            .route_with_summary(&doc, &splitter.destinations)
            .unwrap();
        assert_eq!(summary.data_units, 2);
        assert_eq!(summary.entries.len(), 6);

        let destinations: Vec<_> = summary
            .entries
            .iter()
            .map(|e| e.destination.as_str())
            .collect();
        assert_eq!(
            destinations,
            ["validate", "persist", "validate", "persist", "validate", "persist"]
        );

        // Sentinel
        let sentinel = &summary.entries[0].payload;
        assert_eq!(sentinel.value("Body.Subscription.Tn"), Some("false"));
        assert_eq!(sentinel.value("Body.ReferenceKey"), Some("false"));

        // Plain token keeps the primary path
        let first = &summary.entries[2].payload;
        assert_eq!(first.value("Body.Subscription.Tn"), Some("305-555-0001"));
        assert_eq!(first.value("Body.ReferenceKey"), Some("R1"));

        // Range token goes to the range paths, missing key gets the placeholder
        let range = &summary.entries[4].payload;
        assert!(!range.exists("Body.Subscription.Tn"));
        assert_eq!(
            range.value("Body.Subscription.TnRange.Tn"),
            Some("305-555-0002")
        );
        assert_eq!(
            range.value("Body.Subscription.TnRange.EndStation"),
            Some("0009")
        );
        assert_eq!(range.value("Body.ReferenceKey"), Some("false"));
        assert!(summary.entries[4].shares_payload_with(&summary.entries[5]));
    }

    /// Config -> FanoutRouter over a batch of child nodes
    #[test]
    fn test_e2e_child_nodes_routing() {
        let blueprint = blueprint();
        let splitter = blueprint.splitter("batch_split").unwrap();
        let router = FanoutRouter::new(splitter.mode.clone());

        let doc = Document::from_root(
            Node::new("Batch").with_child(
                Node::new("Orders")
                    .with_child(Node::new("Create").with_child(Node::leaf("Id", "1")))
                    .with_child(Node::new("Modify").with_child(Node::leaf("Id", "2"))),
            ),
        );

        let entries = router.route(&doc, &splitter.destinations).unwrap();
        assert_eq!(entries.len(), 2);
        // Reversed order: last child first
        assert_eq!(entries[0].payload.root.name, "Modify");
        assert_eq!(entries[0].payload.value("Id"), Some("2"));
        assert_eq!(entries[1].payload.root.name, "Create");
    }
}
