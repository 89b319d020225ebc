//! FanoutRouter - unit x destination routing list

use std::sync::Arc;

use contracts::{ContractError, Document, RouteEntry, SplitMode, SplitUnit};
use tracing::{debug, instrument};

use crate::{child_nodes, field_list};

/// Result of one fan-out
#[derive(Debug, Clone)]
pub struct RoutingSummary {
    /// Units carrying real data (the sentinel is not counted)
    pub data_units: usize,
    /// Routing list, unit-major then destination-minor
    pub entries: Vec<RouteEntry>,
}

/// Decomposes batch payloads and addresses each unit to every destination
#[derive(Debug, Clone)]
pub struct FanoutRouter {
    mode: SplitMode,
}

impl FanoutRouter {
    pub fn new(mode: SplitMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> &SplitMode {
        &self.mode
    }

    /// Decompose `doc` into ordered units
    ///
    /// Field-list mode always starts with the sentinel unit 0.
    ///
    /// # Errors
    /// `Validation` when the list or container is missing or malformed.
    pub fn decompose(&self, doc: &Document) -> Result<Vec<SplitUnit>, ContractError> {
        match &self.mode {
            SplitMode::FieldList(cfg) => field_list::decompose(cfg, doc),
            SplitMode::ChildNodes(cfg) => child_nodes::decompose(cfg, doc),
        }
    }

    /// Message delivered for `unit`
    pub fn unit_message(&self, doc: &Document, unit: &SplitUnit) -> Document {
        match &self.mode {
            SplitMode::FieldList(cfg) => field_list::reconstruct(cfg, doc, unit),
            SplitMode::ChildNodes(cfg) => child_nodes::reconstruct(cfg, unit),
        }
    }

    /// Build the routing list for `doc`
    ///
    /// Entry `i * destinations.len() + j` carries unit `i` to
    /// `destinations[j]`. All entries of one unit share one payload.
    ///
    /// # Errors
    /// - `Configuration` when `destinations` is empty (checked first)
    /// - `Validation` from decomposition
    pub fn route(
        &self,
        doc: &Document,
        destinations: &[String],
    ) -> Result<Vec<RouteEntry>, ContractError> {
        self.route_with_summary(doc, destinations)
            .map(|summary| summary.entries)
    }

    /// Build the routing list together with the data-unit count
    #[instrument(
        name = "fanout_route",
        skip(self, doc, destinations),
        fields(mode = self.mode.label(), destinations = destinations.len())
    )]
    pub fn route_with_summary(
        &self,
        doc: &Document,
        destinations: &[String],
    ) -> Result<RoutingSummary, ContractError> {
        if destinations.is_empty() {
            return Err(ContractError::configuration(
                "fanout",
                "no next processors configured",
            ));
        }

        let units = self.decompose(doc)?;
        let data_units = units.iter().filter(|u| !u.is_sentinel()).count();

        let mut entries = Vec::with_capacity(units.len() * destinations.len());
        for unit in &units {
            let payload = Arc::new(self.unit_message(doc, unit));
            for destination in destinations {
                entries.push(RouteEntry::new(destination.as_str(), Arc::clone(&payload)));
            }
        }

        debug!(units = units.len(), data_units, entries = entries.len(), "Routing list built");
        observability::record_fanout(self.mode.label(), entries.len(), data_units);

        Ok(RoutingSummary {
            data_units,
            entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{ChildNodesConfig, ChildOrder, FieldListConfig, Node};

    const TN: &str = "UpstreamToSOA.UpstreamToSOABody.SvCreateRequest.Subscription.Tn";

    fn field_list_router() -> FanoutRouter {
        FanoutRouter::new(SplitMode::FieldList(FieldListConfig {
            primary_path: TN.into(),
            correlation_path: None,
            range_start_path: "UpstreamToSOA.UpstreamToSOABody.SvCreateRequest.Subscription.TnRange.Tn"
                .into(),
            range_end_path:
                "UpstreamToSOA.UpstreamToSOABody.SvCreateRequest.Subscription.TnRange.EndStation"
                    .into(),
            delimiter: ";".into(),
            placeholder: "false".into(),
        }))
    }

    fn soa_request(tns: &str) -> Document {
        let mut doc = Document::new("SOAMessage");
        doc.set_value("UpstreamToSOA.UpstreamToSOAHeader.InitSPID", "1234");
        doc.set_value(TN, tns);
        doc
    }

    fn destinations(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_three_tokens_two_destinations() {
        let router = field_list_router();
        let doc = soa_request("305-555-0001;305-555-0002;305-555-0003");
        let dest = destinations(&["logger", "npac_client"]);

        let summary = router.route_with_summary(&doc, &dest).unwrap();
        let entries = &summary.entries;

        assert_eq!(entries.len(), 8);
        assert_eq!(summary.data_units, 3);
        for (pos, entry) in entries.iter().enumerate() {
            assert_eq!(entry.destination, dest[pos % 2]);
        }
        assert_eq!(entries[0].payload.value(TN), Some("false"));
        assert_eq!(entries[2].payload.value(TN), Some("305-555-0001"));
        assert_eq!(entries[7].payload.value(TN), Some("305-555-0003"));
        assert_eq!(
            entries[7].payload.value("UpstreamToSOA.UpstreamToSOAHeader.InitSPID"),
            Some("1234")
        );
    }

    #[test]
    fn test_destinations_share_unit_payload() {
        let router = field_list_router();
        let doc = soa_request("305-555-0001");
        let entries = router
            .route(&doc, &destinations(&["a", "b", "c"]))
            .unwrap();

        assert!(entries[3].shares_payload_with(&entries[4]));
        assert!(entries[3].shares_payload_with(&entries[5]));
        assert!(!entries[2].shares_payload_with(&entries[3]));
    }

    #[test]
    fn test_no_destinations_fails_before_processing() {
        let router = field_list_router();
        // payload would fail validation; configuration is reported first
        let err = router.route(&Document::new("Empty"), &[]).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_child_nodes_routing_order() {
        let router = FanoutRouter::new(SplitMode::ChildNodes(ChildNodesConfig {
            container_path: "Orders".into(),
            output_root: ".".into(),
            output_base_path: String::new(),
            child_order: ChildOrder::Reversed,
        }));
        let orders = ["1", "2", "3"].iter().fold(Node::new("Orders"), |o, id| {
            o.with_child(Node::new("Order").with_child(Node::leaf("Id", *id)))
        });
        let doc = Document::from_root(Node::new("Batch").with_child(orders));

        let summary = router
            .route_with_summary(&doc, &destinations(&["x", "y"]))
            .unwrap();

        assert_eq!(summary.data_units, 3);
        let ids: Vec<_> = summary
            .entries
            .iter()
            .map(|e| e.payload.value("Id").unwrap_or_default().to_string())
            .collect();
        assert_eq!(ids, ["3", "3", "2", "2", "1", "1"]);
    }

    #[test]
    fn test_decompose_json_payload() {
        let json = r#"{"root":{"name":"SOAMessage","children":[
            {"name":"UpstreamToSOA","children":[
                {"name":"UpstreamToSOABody","children":[
                    {"name":"SvCreateRequest","children":[
                        {"name":"Subscription","children":[
                            {"name":"Tn","text":"305-555-1234-5678;305-555-0001"}
                        ]}
                    ]}
                ]}
            ]}
        ]}}"#;
        let doc: Document = serde_json::from_str(json).unwrap();
        let units = field_list_router().decompose(&doc).unwrap();
        assert_eq!(units.len(), 3);
        assert_eq!(
            units[1].field("UpstreamToSOA.UpstreamToSOABody.SvCreateRequest.Subscription.TnRange.EndStation"),
            Some("5678")
        );
    }
}
