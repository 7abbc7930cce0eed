// /////////////////////////////////////////////////////////////////////////////
// resx
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Pluggable distributed dispatch (§4.K.3, §9 "RPC transport is
//! pluggable by callback"). The file producer never talks to a node
//! directly — every cross-node call goes through an [`RpcDispatcher`],
//! so the core makes no assumption about the deployment's transport.

use async_trait::async_trait;
use resx_domain::value_objects::NodeId;
use resx_domain::ResourceError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// One remote-invocable file-producer operation, dispatched by name with
/// JSON arguments — mirrors the `(node, module, function, args)` shape
/// in §4.K.3.
#[async_trait]
pub trait RpcDispatcher: Send + Sync {
    async fn call(&self, node: &NodeId, function: &str, args: serde_json::Value) -> Result<serde_json::Value, ResourceError>;
}

/// Local-only dispatcher: every call must target the local node.
/// Suitable for single-node deployments and as the default RPC hook.
#[derive(Default)]
pub struct LocalRpcDispatcher;

#[async_trait]
impl RpcDispatcher for LocalRpcDispatcher {
    async fn call(&self, node: &NodeId, _function: &str, _args: serde_json::Value) -> Result<serde_json::Value, ResourceError> {
        if node.is_local() {
            Err(ResourceError::internal("LocalRpcDispatcher cannot serve local calls directly; the file producer short-circuits these"))
        } else {
            Err(ResourceError::internal(format!("no RPC transport configured to reach node `{node}`")))
        }
    }
}

/// Loops every remote call back into an in-process handler table keyed
/// by node — useful for tests that simulate a multi-node deployment
/// (§8 scenario 5) without a real transport.
#[derive(Default, Clone)]
pub struct LoopbackRpcDispatcher {
    handlers: Arc<Mutex<HashMap<String, Arc<dyn Fn(&str, serde_json::Value) -> Result<serde_json::Value, ResourceError> + Send + Sync>>>>,
}

impl LoopbackRpcDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &self,
        node: impl Into<String>,
        handler: Arc<dyn Fn(&str, serde_json::Value) -> Result<serde_json::Value, ResourceError> + Send + Sync>,
    ) {
        self.handlers.lock().unwrap().insert(node.into(), handler);
    }
}

#[async_trait]
impl RpcDispatcher for LoopbackRpcDispatcher {
    async fn call(&self, node: &NodeId, function: &str, args: serde_json::Value) -> Result<serde_json::Value, ResourceError> {
        let handler = self
            .handlers
            .lock()
            .unwrap()
            .get(node.as_str())
            .cloned()
            .ok_or_else(|| ResourceError::internal(format!("no loopback handler registered for node `{node}`")))?;
        handler(function, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn loopback_dispatches_to_registered_node() {
        let dispatcher = LoopbackRpcDispatcher::new();
        dispatcher.register("N2", Arc::new(|function, _args| Ok(serde_json::json!(function))));
        let result = dispatcher.call(&NodeId::remote("N2"), "exists", serde_json::Value::Null).await.unwrap();
        assert_eq!(result, serde_json::json!("exists"));
    }

    #[tokio::test]
    async fn loopback_errors_on_unknown_node() {
        let dispatcher = LoopbackRpcDispatcher::new();
        let err = dispatcher.call(&NodeId::remote("N3"), "exists", serde_json::Value::Null).await.unwrap_err();
        assert!(matches!(err, ResourceError::Internal(_)));
    }
}
