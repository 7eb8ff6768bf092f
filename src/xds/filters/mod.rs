//! Filter configuration helpers
//!
//! Shared plumbing for packing and unpacking `google.protobuf.Any` payloads
//! carried by listener, HTTP and per-route filter configs.

pub mod http;

use crate::errors::{Error, Result};
use envoy_types::pb::google::protobuf::Any;
use prost::Message;

/// Type URL prefix used by Envoy for packed messages
pub const TYPE_URL_PREFIX: &str = "type.googleapis.com/";

/// Pack a prost message into an `Any`.
pub fn any_from_message<M: Message>(type_url: impl Into<String>, msg: &M) -> Any {
    Any { type_url: type_url.into(), value: msg.encode_to_vec() }
}

/// Unpack an `Any`, rejecting payloads whose type URL is not `expected_type_url`.
pub fn message_from_any<M: Message + Default>(any: &Any, expected_type_url: &str) -> Result<M> {
    if any.type_url != expected_type_url {
        return Err(Error::decode(
            expected_type_url,
            format!("unexpected type URL '{}'", any.type_url),
        ));
    }

    M::decode(any.value.as_slice()).map_err(|e| Error::decode(expected_type_url, e))
}

/// Error helper for invalid generated filter configuration.
pub fn invalid_config(msg: impl Into<String>) -> Error {
    Error::config(msg.into())
}
