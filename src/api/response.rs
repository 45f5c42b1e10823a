//! Success wire format. Every success body carries `success` and a
//! human-readable `message`, with the endpoint payload flattened
//! alongside; failures are shaped by [`crate::error::ApiError`].

use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub body: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(message: impl Into<String>, body: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            body,
        })
    }
}

/// Payload-free success body (e.g. delete acknowledgements).
pub fn ok_message(message: impl Into<String>) -> Json<Value> {
    Json(json!({ "success": true, "message": message.into() }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Payload {
        total: u64,
    }

    #[test]
    fn envelope_flattens_payload_next_to_flags() {
        let Json(envelope) = Envelope::ok("done", Payload { total: 3 });
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["message"], "done");
        assert_eq!(value["total"], 3);
    }
}
