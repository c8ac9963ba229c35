//! Test fixtures.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Entity stored in the audit indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub id: String,
    pub kind: String,
    pub actor_id: u32,
    pub date_time: DateTime<Utc>,
}

/// Timestamp of event `n`: one minute apart, starting 2024-01-01.
pub fn event_time(n: u32) -> DateTime<Utc> {
    let start = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .expect("valid start time");
    start + Duration::minutes(i64::from(n))
}

/// A well-formed audit event document.
pub fn event_doc(n: u32, kind: &str) -> Value {
    json!({
        "id": format!("evt-{n:03}"),
        "kind": kind,
        "actor_id": n % 7,
        "date_time": event_time(n).to_rfc3339(),
    })
}

/// A document that has every field but cannot be decoded into [`AuditEvent`].
pub fn malformed_event_doc(n: u32, kind: &str) -> Value {
    json!({
        "id": format!("evt-{n:03}"),
        "kind": kind,
        "actor_id": "not-a-number",
        "date_time": event_time(n).to_rfc3339(),
    })
}

/// `count` well-formed documents of the given kind, numbered from `first`.
pub fn event_docs(first: u32, count: u32, kind: &str) -> Vec<Value> {
    (first..first + count).map(|n| event_doc(n, kind)).collect()
}
