// /////////////////////////////////////////////////////////////////////////////
// resx
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The file producer/store (§4.K): the single largest component. Its
//! `Repository` is `(node, path, optional_source_reference)`. Combines
//! the access matrix (§4.K.2), distributed RPC dispatch (§4.K.3),
//! source-backed caching (§4.K.4), streaming I/O with a deferred store
//! write (§4.K.5), and POSIX attributes (§4.K.6).

use crate::infrastructure::access::AccessMatrix;
use crate::infrastructure::rpc::RpcDispatcher;
use async_trait::async_trait;
use base64::Engine;
use resx_domain::entities::{default_combiner, Chunk, ChunkProducer, Content, ContentStream, EagerData};
use resx_domain::services::producer::{Producer, ProducerOptions, SourceCompatibility};
use resx_domain::services::scheme_dispatcher::SchemeDispatcher;
use resx_domain::services::storer::Storer;
use resx_domain::value_objects::{derive_media_type, AdapterId, MediaType, MimeLookup, NodeId, Timestamp};
use resx_domain::{Integrity, Meta, Reference, Repository, Resource, ResourceError};
use std::collections::BTreeMap;
use std::sync::Arc;

const SCHEMES: &[&str] = &["file"];
const B64: base64::engine::GeneralPurpose = base64::engine::general_purpose::STANDARD;

/// A trivial always-`application/octet-stream` table; the real lookup
/// table is an external collaborator per §1/§6.
struct NoMimeTable;
impl MimeLookup for NoMimeTable {
    fn lookup(&self, _extension: &str) -> Option<String> {
        None
    }
}

/// One node's view of the file producer: its own identity, its own
/// access matrix (applied whether it is the calling node or the
/// receiving node, §4.K.2), and the dispatcher + RPC hook it uses to
/// resolve cache sources and reach other nodes.
pub struct FileProducer {
    node: NodeId,
    access: AccessMatrix,
    dispatcher: Arc<SchemeDispatcher>,
    rpc: Arc<dyn RpcDispatcher>,
    mime_table: Arc<dyn MimeLookup>,
}

impl FileProducer {
    pub fn new(node: NodeId, access: AccessMatrix, dispatcher: Arc<SchemeDispatcher>, rpc: Arc<dyn RpcDispatcher>) -> Self {
        Self { node, access, dispatcher, rpc, mime_table: Arc::new(NoMimeTable) }
    }

    pub fn with_mime_table(mut self, table: Arc<dyn MimeLookup>) -> Self {
        self.mime_table = table;
        self
    }

    fn repository(reference: &Reference) -> Result<(&NodeId, &str, &Option<Box<Reference>>), ResourceError> {
        match &reference.repository {
            Repository::File { node, path, source } => Ok((node, path, source)),
            _ => Err(ResourceError::invalid_reference("not a file reference")),
        }
    }

    fn is_local_node(&self, node: &NodeId) -> bool {
        node.is_local() || *node == self.node
    }

    fn media_type_for(&self, path: &str) -> MediaType {
        let basename = path.rsplit('/').next().unwrap_or(path);
        derive_media_type(basename, self.mime_table.as_ref())
    }

    fn meta_path(path: &str) -> String {
        format!("{path}.meta")
    }

    fn encode_meta(meta: &Meta) -> Result<Vec<u8>, ResourceError> {
        bincode::serialize(meta).map_err(|e| ResourceError::internal(e.to_string()))
    }

    fn decode_meta(bytes: &[u8]) -> Result<Meta, ResourceError> {
        bincode::deserialize(bytes).map_err(|e| ResourceError::internal(e.to_string()))
    }

    /// Reads the content file and its `.meta` sidecar. Missing content
    /// surfaces as `UnknownResource` (§4.K.4 step 1); a missing sidecar
    /// degrades to empty meta rather than failing the whole read, since
    /// only the content file's absence signals a cache miss.
    fn local_read(path: &str) -> Result<(Vec<u8>, Meta, Timestamp), ResourceError> {
        let bytes = std::fs::read(path).map_err(ResourceError::from)?;
        let metadata = std::fs::metadata(path).map_err(ResourceError::from)?;
        let mtime: Timestamp = metadata
            .modified()
            .map(chrono::DateTime::<chrono::Utc>::from)
            .unwrap_or_else(|_| chrono::Utc::now())
            .into();
        let meta = match std::fs::read(Self::meta_path(path)) {
            Ok(bytes) => Self::decode_meta(&bytes)?,
            Err(_) => Meta::new(),
        };
        Ok((bytes, meta, mtime))
    }

    /// Restoration write per §4.K.4: non-atomic by design (documented
    /// behaviour, not a bug — concurrent callers may observe a partial
    /// state).
    fn local_write(path: &str, bytes: &[u8], meta: &Meta) -> Result<(), ResourceError> {
        if let Some(parent) = std::path::Path::new(path).parent() {
            std::fs::create_dir_all(parent).map_err(ResourceError::from)?;
        }
        std::fs::write(path, bytes).map_err(ResourceError::from)?;
        std::fs::write(Self::meta_path(path), Self::encode_meta(meta)?).map_err(ResourceError::from)?;
        Ok(())
    }

    async fn materialise_source(&self, source: &Reference) -> Result<(Vec<u8>, Meta), ResourceError> {
        let producer = self.dispatcher.producer_of_reference(source)?;
        let resource = producer.stream(source, &ProducerOptions::new()).await?;
        let data = resource.content.data(&(Arc::new(default_combiner) as resx_domain::entities::Combiner))?;
        let bytes = match data {
            EagerData::Bytes(b) => b,
            EagerData::Values(values) => values.iter().flat_map(resx_domain::entities::binary_reducer).collect(),
        };
        Ok((bytes, resource.meta))
    }

    fn require_access(&self, node: &NodeId, path: &str) -> Result<(), ResourceError> {
        if self.access.permits(node, path) {
            Ok(())
        } else {
            Err(ResourceError::invalid_reference("protected file"))
        }
    }

    /// Local, access-checked open: used directly when this producer *is*
    /// the target node, and from `handle_rpc` when a peer dispatches to
    /// it as the receiving node (§4.K.2's "evaluated on both sides").
    async fn local_open(&self, path: &str, source: Option<&Reference>) -> Result<(Vec<u8>, Meta, Timestamp), ResourceError> {
        self.require_access(&self.node, path)?;
        match Self::local_read(path) {
            Ok(result) => Ok(result),
            Err(err) if err.is_recoverable() => {
                let Some(source) = source else { return Err(err) };
                let (bytes, meta) = self.materialise_source(source).await?;
                Self::local_write(path, &bytes, &meta)?;
                Self::local_read(path)
            }
            Err(err) => Err(err),
        }
    }

    fn local_exists(&self, path: &str) -> bool {
        std::path::Path::new(path).exists()
    }

    fn local_attributes(&self, path: &str) -> Result<BTreeMap<String, serde_json::Value>, ResourceError> {
        self.require_access(&self.node, path)?;
        let metadata = std::fs::metadata(path).map_err(ResourceError::from)?;
        Ok(stat_attributes(path, &metadata))
    }

    fn local_store(&self, path: &str, bytes: &[u8], meta: &Meta) -> Result<(), ResourceError> {
        self.require_access(&self.node, path)?;
        Self::local_write(path, bytes, meta)
    }

    fn local_discard(&self, path: &str) -> Result<(), ResourceError> {
        self.require_access(&self.node, path)?;
        let _ = std::fs::remove_file(path);
        let _ = std::fs::remove_file(Self::meta_path(path));
        Ok(())
    }

    /// The receiving-node half of §4.K.3: decodes an RPC call's JSON
    /// arguments, applies this node's own access matrix, and performs
    /// the local operation. Register this as a node's handler on a
    /// [`crate::infrastructure::rpc::LoopbackRpcDispatcher`] to simulate
    /// a multi-node deployment.
    pub async fn handle_rpc(&self, function: &str, args: serde_json::Value) -> Result<serde_json::Value, ResourceError> {
        let path = args
            .get("path")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ResourceError::internal("RPC call missing `path`"))?;
        match function {
            "exists" => Ok(serde_json::json!(self.local_exists(path))),
            "attributes" => Ok(serde_json::to_value(self.local_attributes(path)?).unwrap()),
            "discard" => {
                self.local_discard(path)?;
                Ok(serde_json::Value::Null)
            }
            "store" => {
                let bytes = args
                    .get("bytes")
                    .and_then(|v| v.as_str())
                    .and_then(|s| B64.decode(s).ok())
                    .ok_or_else(|| ResourceError::internal("RPC store call missing `bytes`"))?;
                self.local_store(path, &bytes, &Meta::new())?;
                Ok(serde_json::Value::Null)
            }
            "open" => {
                let source = args.get("source").and_then(|v| v.as_str()).map(|s| s.to_string());
                let source_ref = match source {
                    Some(uri) => Some(self.dispatcher.producer_of_uri(&uri)?.reference_of(&uri)?),
                    None => None,
                };
                let (bytes, meta, mtime) = self.local_open(path, source_ref.as_ref()).await?;
                Ok(serde_json::json!({
                    "bytes": B64.encode(bytes),
                    "meta": meta,
                    "mtime": mtime.as_datetime().to_rfc3339(),
                }))
            }
            other => Err(ResourceError::internal(format!("unknown RPC function `{other}`"))),
        }
    }
}

fn stat_attributes(path: &str, metadata: &std::fs::Metadata) -> BTreeMap<String, serde_json::Value> {
    let mut out = BTreeMap::new();
    let basename = path.rsplit('/').next().unwrap_or(path);
    out.insert("name".to_string(), serde_json::json!(basename));
    out.insert("size".to_string(), serde_json::json!(metadata.len()));
    out.insert("type".to_string(), serde_json::json!(if metadata.is_dir() { "directory" } else { "file" }));
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        out.insert("mode".to_string(), serde_json::json!(metadata.mode()));
        out.insert("uid".to_string(), serde_json::json!(metadata.uid()));
        out.insert("gid".to_string(), serde_json::json!(metadata.gid()));
        out.insert("device".to_string(), serde_json::json!(metadata.dev()));
        out.insert("inode".to_string(), serde_json::json!(metadata.ino()));
        out.insert("links".to_string(), serde_json::json!(metadata.nlink()));
        out.insert("access".to_string(), serde_json::json!(metadata.atime()));
        out.insert("modification".to_string(), serde_json::json!(metadata.mtime()));
        out.insert("ctime".to_string(), serde_json::json!(metadata.ctime()));
    }
    out
}

#[async_trait]
impl Producer for FileProducer {
    fn schemes(&self) -> &'static [&'static str] {
        SCHEMES
    }

    fn reference_of(&self, uri: &str) -> Result<Reference, ResourceError> {
        let rest = uri.strip_prefix("file://").ok_or_else(|| ResourceError::invalid_reference("not a file: URI"))?;
        let (authority_and_path, query) = match rest.split_once('?') {
            Some((a, q)) => (a, Some(q)),
            None => (rest, None),
        };
        let (authority, path) = if authority_and_path.starts_with('/') {
            ("", authority_and_path)
        } else {
            match authority_and_path.split_once('/') {
                Some((authority, path)) => (authority, path),
                None => (authority_and_path, ""),
            }
        };
        let path = if path.starts_with('/') { path.to_string() } else { format!("/{path}") };
        let node = NodeId::remote(authority);

        let source = match query.and_then(|q| q.strip_prefix("source=")) {
            Some(encoded) => {
                let decoded = B64
                    .decode(encoded)
                    .map_err(|e| ResourceError::invalid_reference(format!("data is not base64: {e}")))?;
                let inner_uri = String::from_utf8(decoded)
                    .map_err(|e| ResourceError::invalid_reference(format!("data is not base64: {e}")))?;
                Some(Box::new(self.dispatcher.producer_of_uri(&inner_uri)?.reference_of(&inner_uri)?))
            }
            None => None,
        };

        Ok(Reference::new(AdapterId::new("file"), Repository::File { node, path, source }, Integrity::now(None)))
    }

    async fn open(&self, reference: &Reference, _options: &ProducerOptions) -> Result<Resource, ResourceError> {
        let (node, path, source) = Self::repository(reference)?;
        self.require_access(&self.node, path)?;

        let (bytes, meta, mtime) = if self.is_local_node(node) {
            self.local_open(path, source.as_deref()).await?
        } else {
            let args = serde_json::json!({
                "path": path,
                "source": source.as_ref().map(|s| self.dispatcher.producer_of_reference(s).and_then(|p| p.uri(s))).transpose()?,
            });
            let result = self.rpc.call(node, "open", args).await?;
            let bytes = result
                .get("bytes")
                .and_then(|v| v.as_str())
                .and_then(|s| B64.decode(s).ok())
                .ok_or_else(|| ResourceError::internal("malformed RPC open response"))?;
            let meta: Meta = result
                .get("meta")
                .cloned()
                .map(serde_json::from_value)
                .transpose()
                .map_err(|e: serde_json::Error| ResourceError::internal(e.to_string()))?
                .unwrap_or_default();
            let mtime = Timestamp::now();
            (bytes, meta, mtime)
        };

        let media_type = self.media_type_for(path);
        Ok(Resource::new(
            Reference::new(
                AdapterId::new("file"),
                Repository::File { node: node.clone(), path: path.to_string(), source: source.clone() },
                Integrity::new(None, mtime),
            ),
            Content::Eager { media_type, data: EagerData::Bytes(bytes) },
            meta,
        ))
    }

    async fn stream(&self, reference: &Reference, options: &ProducerOptions) -> Result<Resource, ResourceError> {
        // The file producer's stream carries only `(node, path)`: no live
        // handle, re-acquired per reduction (§5). A single eager read
        // already satisfies that contract for local files; wrap it in a
        // single-chunk stream so callers driving `reduce` see the same
        // shape a multi-chunk producer would offer.
        let eager = self.open(reference, options).await?;
        let Content::Eager { media_type, data } = eager.content else { unreachable!() };
        let bytes = match data {
            EagerData::Bytes(b) => b,
            EagerData::Values(values) => values.iter().flat_map(resx_domain::entities::binary_reducer).collect(),
        };
        struct OneShot(Vec<u8>);
        impl ChunkProducer for OneShot {
            fn produce(&self, sink: &mut dyn FnMut(Chunk) -> Result<(), ResourceError>) -> Result<(), ResourceError> {
                sink(Chunk::Binary(self.0.clone()))
            }
        }
        Ok(Resource::new(
            eager.reference,
            Content::Stream { media_type, stream: ContentStream::new(Arc::new(OneShot(bytes))) },
            eager.meta,
        ))
    }

    async fn exists(&self, reference: &Reference) -> Result<bool, ResourceError> {
        let (node, path, source) = Self::repository(reference)?;
        if !self.access.permits(&self.node, path) {
            return Ok(false);
        }
        let file_exists = if self.is_local_node(node) {
            self.local_exists(path)
        } else {
            self.rpc
                .call(node, "exists", serde_json::json!({"path": path}))
                .await
                .ok()
                .and_then(|v| v.as_bool())
                .unwrap_or(false)
        };
        if file_exists {
            return Ok(true);
        }
        match source {
            Some(source) => match self.dispatcher.producer_of_reference(source) {
                Ok(producer) => Ok(producer.exists(source).await.unwrap_or(false)),
                Err(_) => Ok(false),
            },
            None => Ok(false),
        }
    }

    async fn alike(&self, a: &Reference, b: &Reference) -> bool {
        match (Self::repository(a), Self::repository(b)) {
            (Ok((na, pa, _)), Ok((nb, pb, _))) => na == nb && pa == pb,
            _ => false,
        }
    }

    async fn source(&self, reference: &Reference) -> Result<Option<Reference>, ResourceError> {
        let (_, _, source) = Self::repository(reference)?;
        Ok(source.as_deref().cloned())
    }

    fn uri(&self, reference: &Reference) -> Result<String, ResourceError> {
        let (node, path, source) = Self::repository(reference)?;
        let authority = if node.is_local() { String::new() } else { node.to_string() };
        let mut uri = format!("file://{authority}{path}");
        if let Some(source) = source {
            let inner_uri = self.dispatcher.producer_of_reference(source)?.uri(source)?;
            uri.push_str("?source=");
            uri.push_str(&B64.encode(inner_uri));
        }
        Ok(uri)
    }

    async fn attribute(&self, reference: &Reference, key: &str) -> Result<serde_json::Value, ResourceError> {
        self.attributes(reference).await?.get(key).cloned().ok_or_else(|| ResourceError::unknown_key(key))
    }

    async fn attributes(&self, reference: &Reference) -> Result<BTreeMap<String, serde_json::Value>, ResourceError> {
        let (node, path, source) = Self::repository(reference)?;
        let local_result = if self.is_local_node(node) {
            self.local_attributes(path)
        } else {
            let result = self.rpc.call(node, "attributes", serde_json::json!({"path": path})).await?;
            serde_json::from_value(result).map_err(|e| ResourceError::internal(e.to_string()))
        };
        match local_result {
            Ok(attrs) => Ok(attrs),
            Err(err) if err.is_recoverable() => match source {
                Some(source) => self.dispatcher.producer_of_reference(source)?.attributes(source).await,
                None => Err(err),
            },
            Err(err) => Err(err),
        }
    }

    async fn attribute_keys(&self, reference: &Reference) -> Result<Vec<String>, ResourceError> {
        Ok(self.attributes(reference).await?.into_keys().collect())
    }

    fn source_compatibility(&self) -> SourceCompatibility {
        SourceCompatibility::CompatibleInternal
    }

    async fn prepare_store(&self, _reference: &Reference, resource: Resource) -> Result<Resource, ResourceError> {
        Ok(resource)
    }
}

#[async_trait]
impl Storer for FileProducer {
    async fn store(&self, resource: Resource, options: &ProducerOptions) -> Result<Resource, ResourceError> {
        let path = options
            .get("path")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ResourceError::invalid_reference("store requires a `path` option"))?
            .to_string();
        let node = options.get("node").and_then(|v| v.as_str()).map(NodeId::remote).unwrap_or(NodeId::Local);

        let data = resource.content.data(&(Arc::new(default_combiner) as resx_domain::entities::Combiner))?;
        let bytes = match data {
            EagerData::Bytes(b) => b,
            EagerData::Values(values) => values.iter().flat_map(resx_domain::entities::binary_reducer).collect(),
        };

        if self.is_local_node(&node) {
            self.local_store(&path, &bytes, &resource.meta)?;
        } else {
            let args = serde_json::json!({"path": path, "bytes": B64.encode(&bytes)});
            self.rpc.call(&node, "store", args).await?;
        }

        let media_type = self.media_type_for(&path);
        Ok(Resource::new(
            Reference::new(AdapterId::new("file"), Repository::File { node, path, source: None }, Integrity::now(None)),
            Content::Eager { media_type, data: EagerData::Bytes(bytes) },
            resource.meta,
        ))
    }

    async fn discard(&self, resource: &Resource, _options: &ProducerOptions) -> Result<(), ResourceError> {
        let (node, path, _) = Self::repository(&resource.reference)?;
        if self.is_local_node(node) {
            self.local_discard(path)
        } else {
            self.rpc.call(node, "discard", serde_json::json!({"path": path})).await.map(|_| ())
        }
    }

    fn source_compatibility(&self) -> SourceCompatibility {
        SourceCompatibility::CompatibleDefault
    }
}
