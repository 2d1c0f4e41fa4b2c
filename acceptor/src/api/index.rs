// src/api/index.rs

use axum::Json;
use serde_json::{json, Value};
use std::sync::OnceLock;

/// Static JSON response for the endpoints listing
static INDEX_JSON: OnceLock<Value> = OnceLock::new();

/// Handler that documents the acceptor's surface
///
/// # Endpoint: GET /endpoints
///
/// # Returns
/// * `Json<Value>` - JSON response containing endpoint documentation
pub fn index() -> Json<Value> {
    let value = INDEX_JSON.get_or_init(|| {
        json!({
            "endpoints": [
                {
                    "path": "/health",
                    "method": "GET",
                    "description": "Service health and active validation mode",
                    "params": {}
                },
                {
                    "path": "/endpoints",
                    "method": "GET",
                    "description": "This documentation",
                    "params": {}
                },
                {
                    "path": "/*",
                    "method": "ANY",
                    "description": "Authentication page. Validates an AWS federated identity token and reports the result as HTML, or as JSON with Accept: application/json",
                    "params": {
                        "Authorization": {
                            "type": "header",
                            "required": false,
                            "description": "aws-fed-id <form-urlencoded signed GetCallerIdentity request>"
                        },
                        "Accept": {
                            "type": "header",
                            "required": false,
                            "description": "application/json for a JSON response"
                        }
                    }
                }
            ]
        })
    });

    Json(value.clone())
}
