// /////////////////////////////////////////////////////////////////////////////
// resx
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! End-to-end scenarios exercising the resource service façade and its
//! three producers together, rather than each in isolation.

use resx::application::services::{CompareOptions, CompareOutcome, ResourceService};
use resx::infrastructure::access::{AccessEntry, AccessMatrix};
use resx::infrastructure::adapters::data_producer::DataProducer;
use resx::infrastructure::adapters::file_producer::FileProducer;
use resx::infrastructure::adapters::transform_producer::TransformProducer;
use resx::infrastructure::adapters::transformers::{Prefixer, Replacer, Suffixer};
use resx::infrastructure::rpc::{LocalRpcDispatcher, LoopbackRpcDispatcher};
use resx_domain::entities::{Content, EagerData};
use resx_domain::services::producer::ProducerOptions;
use resx_domain::services::scheme_dispatcher::{DispatcherEntry, SchemeDispatcher};
use resx_domain::services::storer::Storer;
use resx_domain::services::transformer::TransformerRegistry;
use resx_domain::value_objects::NodeId;
use resx_domain::{Reference, Repository};
use std::sync::Arc;

fn transformers() -> TransformerRegistry {
    let mut registry = TransformerRegistry::new();
    registry.register("Prefixer", Arc::new(Prefixer));
    registry.register("Suffixer", Arc::new(Suffixer));
    registry.register("Replacer", Arc::new(Replacer));
    registry
}

fn local_service() -> ResourceService {
    let data = Arc::new(DataProducer::new());
    let base = Arc::new(SchemeDispatcher::new(vec![DispatcherEntry::Producer(data.clone())], vec![]));
    let transform = Arc::new(TransformProducer::new(base.clone(), Arc::new(transformers())));
    let file = Arc::new(FileProducer::new(NodeId::local(), AccessMatrix::allow_all(), base.clone(), Arc::new(LocalRpcDispatcher)));
    let dispatcher =
        Arc::new(SchemeDispatcher::new(vec![DispatcherEntry::Producer(data), DispatcherEntry::Producer(transform), DispatcherEntry::Producer(file)], vec![]));
    ResourceService::new(dispatcher)
}

fn eager_bytes(content: &Content) -> Vec<u8> {
    match content {
        Content::Eager { data: EagerData::Bytes(b), .. } => b.clone(),
        _ => panic!("expected eager bytes"),
    }
}

/// Scenario 1: identical `data:` URIs are the same resource under
/// `alike`, and a fresh checksum is stamped on open.
#[tokio::test]
async fn scenario_1_data_identity() {
    let svc = local_service();
    let a = resx::open!(svc, "data:,hello");
    let b = resx::open!(svc, "data:,hello");
    assert!(svc.alike(&a, &b).await.unwrap());
    assert_eq!(eager_bytes(&a.content), b"hello");
}

/// Scenario 2: chaining transformers over a `resx-transform:` URI
/// composes left-to-right around the innermost `data:` URI.
#[tokio::test]
async fn scenario_2_transform_chaining() {
    let svc = local_service();
    let inner = base64::Engine::encode(&base64::engine::general_purpose::STANDARD, "data:,test");
    let uri = format!("resx-transform:Suffixer,Prefixer,{inner}");
    let resource = svc.open(uri.as_str(), &ProducerOptions::new()).await.unwrap();
    assert_eq!(eager_bytes(&resource.content), b"footestbar");
}

/// Scenario 3: a transformer step's options change its output and its
/// identity — two chains differing only by `Replacer`'s options are
/// not `alike`.
#[tokio::test]
async fn scenario_3_transform_options_differ() {
    let svc = local_service();
    let inner = base64::Engine::encode(&base64::engine::general_purpose::STANDARD, "data:,foofoo");
    let opts_abc = base64::Engine::encode(&base64::engine::general_purpose::STANDARD, serde_json::json!({"pattern": "foo", "replacement": "abc"}).to_string());
    let opts_xyz = base64::Engine::encode(&base64::engine::general_purpose::STANDARD, serde_json::json!({"pattern": "foo", "replacement": "xyz"}).to_string());
    let uri_abc = format!("resx-transform:Replacer:{opts_abc},{inner}");
    let uri_xyz = format!("resx-transform:Replacer:{opts_xyz},{inner}");

    let a = svc.open(uri_abc.as_str(), &ProducerOptions::new()).await.unwrap();
    let b = svc.open(uri_xyz.as_str(), &ProducerOptions::new()).await.unwrap();
    assert_eq!(eager_bytes(&a.content), b"abcabc");
    assert_eq!(eager_bytes(&b.content), b"xyzxyz");
    assert!(!svc.alike(&a, &b).await.unwrap());
}

/// Scenario 4: the access matrix rejects paths outside its glob both
/// for the calling node and on the receiving side of an RPC dispatch.
#[tokio::test]
async fn scenario_4_access_matrix_rejects_outside_allowed_glob() {
    let dir = tempfile::tempdir().unwrap();
    let allowed = dir.path().join("allowed").join("data.txt");
    let rejected = dir.path().join("secret").join("data.txt");

    let base = Arc::new(SchemeDispatcher::new(vec![DispatcherEntry::Producer(Arc::new(DataProducer::new()))], vec![]));
    let access = AccessMatrix::new(vec![AccessEntry::glob(format!("{}/allowed/*", dir.path().display()))]);
    let file = FileProducer::new(NodeId::local(), access, base, Arc::new(LocalRpcDispatcher));

    let mut store_opts = ProducerOptions::new();
    store_opts.insert("path".to_string(), serde_json::json!(allowed.to_str().unwrap()));
    let resource = resx_domain::Resource::without_meta(
        Reference::new(
            resx_domain::value_objects::AdapterId::new("data"),
            Repository::Data { media_type: resx_domain::value_objects::MediaType::single("text/plain"), attributes: Default::default(), raw: b"hi".to_vec() },
            resx_domain::Integrity::now(None),
        ),
        Content::Eager { media_type: resx_domain::value_objects::MediaType::single("text/plain"), data: EagerData::Bytes(b"hi".to_vec()) },
    );
    file.store(resource.clone(), &store_opts).await.unwrap();

    let mut reject_opts = ProducerOptions::new();
    reject_opts.insert("path".to_string(), serde_json::json!(rejected.to_str().unwrap()));
    let err = file.store(resource, &reject_opts).await.unwrap_err();
    assert!(matches!(err, resx_domain::ResourceError::InvalidReference(_)));
}

/// Scenario 5: a file reference targeting a remote node is served by
/// dispatching through the RPC hook rather than local I/O.
#[tokio::test]
async fn scenario_5_distributed_file_open_via_rpc() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("remote.txt");
    std::fs::write(&path, b"from n2").unwrap();

    let base = Arc::new(SchemeDispatcher::new(vec![DispatcherEntry::Producer(Arc::new(DataProducer::new()))], vec![]));
    let n2 = Arc::new(FileProducer::new(NodeId::remote("N2"), AccessMatrix::allow_all(), base.clone(), Arc::new(LocalRpcDispatcher)));

    let loopback = LoopbackRpcDispatcher::new();
    let handler_producer = n2.clone();
    loopback.register(
        "N2",
        Arc::new(move |function, args| futures::executor::block_on(handler_producer.handle_rpc(function, args))),
    );

    let n1 = FileProducer::new(NodeId::local(), AccessMatrix::allow_all(), base, Arc::new(loopback));
    let reference = Reference::new(
        resx_domain::value_objects::AdapterId::new("file"),
        Repository::File { node: NodeId::remote("N2"), path: path.to_str().unwrap().to_string(), source: None },
        resx_domain::Integrity::now(None),
    );
    let resource = resx_domain::services::producer::Producer::open(&n1, &reference, &ProducerOptions::new()).await.unwrap();
    assert_eq!(eager_bytes(&resource.content), b"from n2");
}

/// Scenario 6: a `file:` reference carrying a `data:` source restores
/// its content from that source once the cached file is missing, then
/// `discard` removes the restored cache entry again.
#[tokio::test]
async fn scenario_6_cache_backed_file_restoration() {
    let svc = local_service();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cached.txt");

    let opened = resx::open!(svc, "data:,hello");
    let mut store_opts = ProducerOptions::new();
    store_opts.insert("path".to_string(), serde_json::json!(path.to_str().unwrap()));
    let data_uri = svc.uri(&opened).unwrap();

    let base = Arc::new(SchemeDispatcher::new(vec![DispatcherEntry::Producer(Arc::new(DataProducer::new()))], vec![]));
    let file = FileProducer::new(NodeId::local(), AccessMatrix::allow_all(), base.clone(), Arc::new(LocalRpcDispatcher));
    file.store(opened, &store_opts).await.unwrap();

    assert!(path.exists());
    std::fs::remove_file(&path).unwrap();
    assert!(!path.exists());

    let data_producer = base.producer_of_uri(&data_uri).unwrap();
    let source = data_producer.reference_of(&data_uri).unwrap();
    let cached_reference = Reference::new(
        resx_domain::value_objects::AdapterId::new("file"),
        Repository::File { node: NodeId::local(), path: path.to_str().unwrap().to_string(), source: Some(Box::new(source)) },
        resx_domain::Integrity::now(None),
    );
    let restored = resx_domain::services::producer::Producer::open(&file, &cached_reference, &ProducerOptions::new()).await.unwrap();
    assert_eq!(eager_bytes(&restored.content), b"hello");
    assert!(path.exists());

    file.discard(&restored, &ProducerOptions::new()).await.unwrap();
    assert!(!path.exists());
}

/// Scenario 7: `compare` orders two independently opened identical
/// resources by creation time, treats a stripped checksum as
/// undecidable, and falls back to byte content when asked to.
#[tokio::test]
async fn scenario_7_finalise_and_compare() {
    let svc = local_service();
    let a = resx::finalise!(svc, resx::open!(svc, "data:,hello"));
    std::thread::sleep(std::time::Duration::from_millis(2));
    let b = resx::finalise!(svc, resx::open!(svc, "data:,hello"));

    assert_eq!(svc.compare(&a, &b, &CompareOptions::default()).await.unwrap(), Some(CompareOutcome::Lt));
    assert_eq!(svc.compare(&a, &a, &CompareOptions::default()).await.unwrap(), Some(CompareOutcome::Eq));

    let mut no_checksum = a.clone();
    no_checksum.reference.integrity.checksum = None;
    assert_eq!(svc.compare(&a, &no_checksum, &CompareOptions::default()).await.unwrap(), Some(CompareOutcome::Na));

    let by_content = CompareOptions { content: true, ..CompareOptions::default() };
    assert_eq!(svc.compare(&a, &no_checksum, &by_content).await.unwrap(), Some(CompareOutcome::Eq));

    let mut different_content = a.clone();
    different_content.content = Content::Eager { media_type: a.content.media_type().clone(), data: EagerData::Bytes(b"test".to_vec()) };
    assert_eq!(svc.compare(&a, &different_content, &by_content).await.unwrap(), Some(CompareOutcome::Ne));
}
