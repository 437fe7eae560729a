//! The Aggregated report tree (§3, §6): the public, stable-field-name JSON
//! document `s3bench-cli` writes out. Field shapes and names for
//! `Operation` are carried literally from `pkg/aggregate/aggregate.go`'s
//! `Operation` struct tags (`n`, `skipped`, `start_time`, `end_time`,
//! `objects_per_operation`, `concurrency`, `hosts`, `errors`,
//! `first_errors`, `throughput`, `throughput_by_host`); `Aggregated`'s own
//! tags (`type`, `mixed`, `mixed_server_stats`, `mixed_throughput_by_host`)
//! likewise come from that struct's definition.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::sizes::{MultiSizedRequests, SingleSizedRequests};
use crate::throughput::Throughput;
use crate::time::ReportTimestamp;

/// The top-level aggregated report for one benchmark run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Aggregated {
    #[serde(rename = "type")]
    pub kind: ReportKind,
    pub mixed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mixed_server_stats: Option<Throughput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mixed_throughput_by_host: Option<BTreeMap<String, Throughput>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub operations: Vec<Operation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Single,
    Mixed,
}

/// Statistics for a single operation type within the run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Operation {
    #[serde(rename = "type")]
    pub op_type: String,
    pub n: u64,
    pub skipped: bool,
    pub start_time: ReportTimestamp,
    pub end_time: ReportTimestamp,
    pub objects_per_operation: u32,
    pub concurrency: usize,
    pub hosts: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub single_sized_requests: Option<SingleSizedRequests>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_sized_requests: Option<MultiSizedRequests>,
    pub errors: u64,
    pub first_errors: Vec<String>,
    pub throughput: Throughput,
    pub throughput_by_host: BTreeMap<String, Throughput>,
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::*;

    #[test]
    fn report_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ReportKind::Single).unwrap(), "\"single\"");
        assert_eq!(serde_json::to_string(&ReportKind::Mixed).unwrap(), "\"mixed\"");
    }

    #[test]
    fn aggregated_round_trips_through_json_for_serde_serialize_derive() {
        let report = Aggregated {
            kind: ReportKind::Single,
            mixed: false,
            mixed_server_stats: None,
            mixed_throughput_by_host: None,
            operations: vec![Operation {
                op_type: "PUT".to_string(),
                n: 10,
                skipped: false,
                start_time: ReportTimestamp::from_system_time(SystemTime::UNIX_EPOCH),
                end_time: ReportTimestamp::from_system_time(SystemTime::UNIX_EPOCH),
                objects_per_operation: 1,
                concurrency: 4,
                hosts: 1,
                single_sized_requests: None,
                multi_sized_requests: None,
                errors: 0,
                first_errors: Vec::new(),
                throughput: Throughput {
                    average_bps: 0.0,
                    average_ops: 0.0,
                    operations: 10,
                    bytes: 0,
                    errors: 0,
                    measure_duration_millis: 0,
                    segmented: None,
                },
                throughput_by_host: BTreeMap::new(),
            }],
        };

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"type\":\"single\""));
        assert!(json.contains("\"n\":10"));
        assert!(!json.contains("mixed_server_stats"));
    }

    #[test]
    fn serializing_then_deserializing_yields_an_equal_report() {
        let report = Aggregated {
            kind: ReportKind::Mixed,
            mixed: true,
            mixed_server_stats: Some(Throughput {
                average_bps: 123.4,
                average_ops: 5.0,
                operations: 50,
                bytes: 1000,
                errors: 2,
                measure_duration_millis: 8000,
                segmented: None,
            }),
            mixed_throughput_by_host: Some(BTreeMap::new()),
            operations: vec![Operation {
                op_type: "GET".to_string(),
                n: 7,
                skipped: true,
                start_time: ReportTimestamp::from_system_time(SystemTime::UNIX_EPOCH),
                end_time: ReportTimestamp::from_system_time(SystemTime::UNIX_EPOCH),
                objects_per_operation: 2,
                concurrency: 3,
                hosts: 2,
                single_sized_requests: None,
                multi_sized_requests: None,
                errors: 1,
                first_errors: vec!["endpoint, time, boom".to_string()],
                throughput: Throughput {
                    average_bps: 1.0,
                    average_ops: 2.0,
                    operations: 7,
                    bytes: 700,
                    errors: 1,
                    measure_duration_millis: 1000,
                    segmented: None,
                },
                throughput_by_host: BTreeMap::new(),
            }],
        };

        let json = serde_json::to_string(&report).unwrap();
        let round_tripped: Aggregated = serde_json::from_str(&json).unwrap();
        assert_eq!(report, round_tripped);
    }
}
