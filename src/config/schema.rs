use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "properties": {
            "upstream": {
                "type": "object",
                "properties": {
                    "graphql_url": { "type": "string", "format": "uri" },
                    "auth_url": { "type": "string", "format": "uri" },
                    "api_key": { "type": "string" },
                    "timeout_secs": { "type": "integer", "minimum": 1 },
                    "token_ttl_secs": { "type": "integer", "minimum": 1 },
                    "refresh_margin_secs": { "type": "integer", "minimum": 0 }
                }
            },
            "graph": {
                "type": "object",
                "properties": {
                    "crown_jewels": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "required": ["category", "pattern"],
                            "properties": {
                                "category": { "type": "string" },
                                "pattern": { "type": "string" }
                            }
                        }
                    },
                    "aliases": {
                        "type": "object",
                        "additionalProperties": { "type": "array", "items": { "type": "string" } }
                    }
                }
            },
            "server": {
                "type": "object",
                "properties": {
                    "host": { "type": "string" },
                    "port": { "type": "integer", "minimum": 1, "maximum": 65535 }
                }
            }
        }
    })
});
