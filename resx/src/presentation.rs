// /////////////////////////////////////////////////////////////////////////////
// resx
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Presentation layer
//!
//! Wires the concrete adapters (§4.G/H/K) into a [`ResourceService`]
//! façade and drives it from the CLI commands `resx_bootstrap` parses
//! and validates. Each command maps onto one façade operation; output
//! is either human-readable or, for `open --json`, a `serde_json`
//! rendering of the resource's content and reference.

use crate::application::services::ResourceService;
use crate::infrastructure::access::{AccessEntry, AccessMatrix};
use crate::infrastructure::adapters::data_producer::DataProducer;
use crate::infrastructure::adapters::file_producer::FileProducer;
use crate::infrastructure::adapters::transform_producer::TransformProducer;
use crate::infrastructure::adapters::transformers::{Prefixer, Replacer, Suffixer};
use crate::infrastructure::config::ResxConfig;
use crate::infrastructure::mime_table::StaticMimeTable;
use crate::infrastructure::rpc::LocalRpcDispatcher;
use resx_bootstrap::{ValidatedCli, ValidatedCommand};
use resx_domain::entities::EagerData;
use resx_domain::services::producer::ProducerOptions;
use resx_domain::services::scheme_dispatcher::{DispatcherEntry, SchemeDispatcher};
use resx_domain::services::storer::Storer;
use resx_domain::services::transformer::TransformerRegistry;
use resx_domain::value_objects::{HashAlgorithm, NodeId};
use resx_domain::{Content, ResourceError};
use std::sync::Arc;

/// Populates the built-in transformer registry (§4.I, §8 scenarios 2-3).
fn default_transformers() -> TransformerRegistry {
    let mut registry = TransformerRegistry::new();
    registry.register("Prefixer", Arc::new(Prefixer));
    registry.register("Suffixer", Arc::new(Suffixer));
    registry.register("Replacer", Arc::new(Replacer));
    registry
}

fn access_matrix(config: &ResxConfig) -> AccessMatrix {
    if config.access.is_empty() {
        return AccessMatrix::allow_all();
    }
    AccessMatrix::new(
        config
            .access
            .iter()
            .map(|rule| match (&rule.node, rule.regex) {
                (Some(node), false) => AccessEntry::glob_for_node(NodeId::remote(node.clone()), rule.pattern.clone()),
                (Some(node), true) => AccessEntry::regex_for_node(NodeId::remote(node.clone()), rule.pattern.clone()),
                (None, false) => AccessEntry::glob(rule.pattern.clone()),
                (None, true) => AccessEntry::regex(rule.pattern.clone()),
            })
            .collect(),
    )
}

/// Builds the scheme dispatcher (§4.E) the façade and both the file and
/// transform producers share for resolving cache sources and inner
/// references of any scheme (§6 `producers`/`access`, read fresh on
/// every invocation per §9).
///
/// The file producer's own `dispatcher` field is consulted only to
/// resolve the *inner* reference of a `file://...?source=...` cache
/// entry, never to resolve itself — so handing it the same dispatcher
/// it is about to be registered into is safe: by the time any `source=`
/// URI is parsed, the dispatcher this function returns is fully built.
fn build_dispatcher(config: &ResxConfig, node: NodeId, access: AccessMatrix) -> Arc<SchemeDispatcher> {
    let data = Arc::new(DataProducer::new());
    let bootstrap_dispatcher = Arc::new(SchemeDispatcher::new(vec![DispatcherEntry::Producer(data.clone())], vec![]));

    let file = Arc::new(
        FileProducer::new(node, access, bootstrap_dispatcher.clone(), Arc::new(LocalRpcDispatcher))
            .with_mime_table(Arc::new(StaticMimeTable::new())),
    );
    let transform = Arc::new(TransformProducer::new(bootstrap_dispatcher, Arc::new(default_transformers())));

    let entries = vec![
        DispatcherEntry::Producer(data),
        DispatcherEntry::Producer(file),
        DispatcherEntry::Producer(transform),
    ];
    let overrides = config
        .dispatcher
        .iter()
        .filter_map(|binding| match binding.producer.as_str() {
            "data" => Some(DispatcherEntry::Binding(binding.scheme.clone(), Arc::new(DataProducer::new()))),
            _ => None,
        })
        .collect();
    Arc::new(SchemeDispatcher::new(entries, overrides))
}

fn build_service(config: &ResxConfig) -> ResourceService {
    let node = config.node.clone().map(NodeId::remote).unwrap_or_else(NodeId::local);
    let access = access_matrix(config);
    ResourceService::new(build_dispatcher(config, node, access))
}

fn print_content(content: &Content) {
    match content {
        Content::Eager { media_type, data } => {
            println!("type: {}", media_type.as_slice().join(", "));
            match data {
                EagerData::Bytes(bytes) => match std::str::from_utf8(bytes) {
                    Ok(text) => println!("data: {text}"),
                    Err(_) => println!("data: <{} bytes, binary>", bytes.len()),
                },
                EagerData::Values(values) => println!("data: {values:?}"),
            }
        }
        Content::Stream { media_type, .. } => {
            println!("type: {} (stream)", media_type.as_slice().join(", "));
        }
    }
}

/// A throwaway file producer used only by `store`/`discard`: both
/// commands name their target file directly via `--path` rather than
/// through a `file://` URI, so they need a producer but not a resolved
/// reference's node/access policy beyond the configured one.
fn file_storer(config: &ResxConfig) -> Arc<FileProducer> {
    let node = config.node.clone().map(NodeId::remote).unwrap_or_else(NodeId::local);
    let access = access_matrix(config);
    Arc::new(
        FileProducer::new(node, access, build_dispatcher(config, NodeId::local(), AccessMatrix::allow_all()), Arc::new(LocalRpcDispatcher))
            .with_mime_table(Arc::new(StaticMimeTable::new())),
    )
}

/// Executes one validated CLI command against the resource service
/// façade, printing results to stdout and returning the tagged error
/// taxonomy (§7) on failure.
pub async fn run(cli: ValidatedCli) -> Result<(), ResourceError> {
    let config = ResxConfig::load(cli.config.as_deref()).map_err(|e| ResourceError::internal(e.to_string()))?;
    let service = build_service(&config);

    match cli.command {
        ValidatedCommand::Open { uri, json } => {
            let resource = service.open(uri.as_str(), &ProducerOptions::new()).await?;
            if json {
                let bytes = match &resource.content {
                    Content::Eager { data: EagerData::Bytes(b), .. } => b.clone(),
                    _ => Vec::new(),
                };
                println!(
                    "{}",
                    serde_json::json!({
                        "uri": service.uri(&resource)?,
                        "type": resource.content.media_type().as_slice(),
                        "data": String::from_utf8_lossy(&bytes),
                    })
                );
            } else {
                print_content(&resource.content);
            }
            Ok(())
        }
        ValidatedCommand::Stream { uri } => {
            let resource = service.stream(uri.as_str(), &ProducerOptions::new()).await?;
            print_content(&resource.content);
            Ok(())
        }
        ValidatedCommand::Exists { uri } => {
            println!("{}", service.exists(uri.as_str()).await?);
            Ok(())
        }
        ValidatedCommand::Attributes { uri } => {
            for (key, value) in service.attributes(uri.as_str()).await? {
                println!("{key}: {value}");
            }
            Ok(())
        }
        ValidatedCommand::Store { uri, path, node } => {
            let resource = service.open(uri.as_str(), &ProducerOptions::new()).await?;
            let mut options = ProducerOptions::new();
            options.insert("path".to_string(), serde_json::json!(path));
            if let Some(node) = node {
                options.insert("node".to_string(), serde_json::json!(node));
            }
            let stored = file_storer(&config).store(resource, &options).await?;
            println!("stored: {}", service.uri(&stored)?);
            Ok(())
        }
        ValidatedCommand::Discard { uri, path } => {
            let resource = service.open(uri.as_str(), &ProducerOptions::new()).await?;
            let mut options = ProducerOptions::new();
            options.insert("path".to_string(), serde_json::json!(path));
            file_storer(&config).discard(&resource, &options).await?;
            println!("discarded");
            Ok(())
        }
        ValidatedCommand::Finalise { uri, hash } => {
            let resource = service.stream(uri.as_str(), &ProducerOptions::new()).await?;
            let algorithm = hash.map(|_| HashAlgorithm::sha256());
            let finalised = service.finalise(resource, true, algorithm.as_ref())?;
            if let Some(checksum) = &finalised.reference.integrity.checksum {
                println!("{}:{}", checksum.algorithm, checksum.digest_hex());
            }
            Ok(())
        }
        ValidatedCommand::Compare { a, b, content } => {
            let ra = service.open(a.as_str(), &ProducerOptions::new()).await?;
            let rb = service.open(b.as_str(), &ProducerOptions::new()).await?;
            let options = crate::application::services::CompareOptions { content, ..Default::default() };
            match service.compare(&ra, &rb, &options).await? {
                Some(outcome) => println!("{outcome:?}"),
                None => println!("not alike"),
            }
            Ok(())
        }
    }
}
