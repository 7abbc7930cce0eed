// /////////////////////////////////////////////////////////////////////////////
// resx
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The data producer (§4.G): `data:` URIs per RFC 2397.

use async_trait::async_trait;
use resx_domain::entities::{Content, EagerData};
use resx_domain::value_objects::{AdapterId, MediaType};
use resx_domain::{Integrity, Reference, Repository, Resource, ResourceError};
use resx_domain::services::producer::{Producer, ProducerOptions, SourceCompatibility};
use std::collections::BTreeMap;

const SCHEMES: &[&str] = &["data"];

/// `data:[<mediatype>][;attr=val]*[;base64],<payload>`. Leaf producer:
/// `source` is always `None` and there is nothing to restore.
#[derive(Debug, Default)]
pub struct DataProducer;

impl DataProducer {
    pub fn new() -> Self {
        Self
    }

    fn build_resource(reference: &Reference) -> Result<Resource, ResourceError> {
        let Repository::Data { media_type, raw, .. } = &reference.repository else {
            return Err(ResourceError::invalid_reference("not a data reference"));
        };
        Ok(Resource::new(
            reference.clone(),
            Content::Eager { media_type: media_type.clone(), data: EagerData::Bytes(raw.clone()) },
            Default::default(),
        ))
    }
}

#[async_trait]
impl Producer for DataProducer {
    fn schemes(&self) -> &'static [&'static str] {
        SCHEMES
    }

    fn reference_of(&self, uri: &str) -> Result<Reference, ResourceError> {
        parse_data_uri(uri)
    }

    async fn open(&self, reference: &Reference, _options: &ProducerOptions) -> Result<Resource, ResourceError> {
        Self::build_resource(reference)
    }

    async fn stream(&self, reference: &Reference, _options: &ProducerOptions) -> Result<Resource, ResourceError> {
        // Data is always fully materialised; a streaming request degrades
        // to a single-chunk eager read wrapped as a stream by the caller
        // if it actually needs one. The façade's `new`/`data` operations
        // treat eager content as already-reduced, so returning eager here
        // is a valid `Content` for `stream`'s contract too.
        Self::build_resource(reference)
    }

    async fn exists(&self, _reference: &Reference) -> Result<bool, ResourceError> {
        Ok(true)
    }

    async fn alike(&self, a: &Reference, b: &Reference) -> bool {
        matches!((&a.repository, &b.repository), (Repository::Data { .. }, Repository::Data { .. }))
            && a.repository == b.repository
    }

    async fn source(&self, _reference: &Reference) -> Result<Option<Reference>, ResourceError> {
        Ok(None)
    }

    fn uri(&self, reference: &Reference) -> Result<String, ResourceError> {
        let Repository::Data { media_type, attributes, raw } = &reference.repository else {
            return Err(ResourceError::invalid_reference("not a data reference"));
        };
        let mut head = media_type.outermost().to_string();
        for (k, v) in attributes {
            head.push(';');
            head.push_str(k);
            head.push('=');
            head.push_str(v);
        }
        Ok(format!("data:{head},{}", percent_encode(raw)))
    }

    async fn attribute(&self, reference: &Reference, key: &str) -> Result<serde_json::Value, ResourceError> {
        let Repository::Data { media_type, attributes, raw } = &reference.repository else {
            return Err(ResourceError::invalid_reference("not a data reference"));
        };
        match key {
            "media_type" => Ok(serde_json::json!(media_type.outermost())),
            "size" => Ok(serde_json::json!(raw.len())),
            other => attributes
                .get(other)
                .map(|v| serde_json::json!(v))
                .ok_or_else(|| ResourceError::unknown_key(other)),
        }
    }

    async fn attributes(&self, reference: &Reference) -> Result<BTreeMap<String, serde_json::Value>, ResourceError> {
        let Repository::Data { media_type, attributes, raw } = &reference.repository else {
            return Err(ResourceError::invalid_reference("not a data reference"));
        };
        let mut out: BTreeMap<String, serde_json::Value> = attributes.iter().map(|(k, v)| (k.clone(), serde_json::json!(v))).collect();
        out.insert("media_type".to_string(), serde_json::json!(media_type.outermost()));
        out.insert("size".to_string(), serde_json::json!(raw.len()));
        Ok(out)
    }

    async fn attribute_keys(&self, reference: &Reference) -> Result<Vec<String>, ResourceError> {
        Ok(self.attributes(reference).await?.into_keys().collect())
    }

    fn source_compatibility(&self) -> SourceCompatibility {
        SourceCompatibility::Incompatible
    }
}

/// Parses `data:[<mediatype>][;attr=val]*[;base64],<payload>` into a
/// `Reference`. Empty type defaults to `text/plain; charset=US-ASCII`
/// (§4.G).
fn parse_data_uri(uri: &str) -> Result<Reference, ResourceError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| ResourceError::invalid_reference("not a data: URI"))?;
    let (head, payload) = rest
        .split_once(',')
        .ok_or_else(|| ResourceError::invalid_reference("data URI missing ','"))?;

    let mut parts = head.split(';');
    let mime = parts.next().unwrap_or("");
    let mut attributes = BTreeMap::new();
    let mut is_base64 = false;
    for part in parts {
        if part.eq_ignore_ascii_case("base64") {
            is_base64 = true;
        } else if let Some((k, v)) = part.split_once('=') {
            attributes.insert(k.to_string(), v.to_string());
        }
    }

    let media_type = if mime.is_empty() {
        attributes.entry("charset".to_string()).or_insert_with(|| "US-ASCII".to_string());
        MediaType::single("text/plain")
    } else {
        MediaType::single(mime)
    };

    let raw = if is_base64 {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| ResourceError::invalid_reference(format!("data is not base64: {e}")))?
    } else {
        percent_decode(payload)
    };

    let repository = Repository::Data { media_type, attributes, raw };
    Ok(Reference::new(AdapterId::new("data"), repository, Integrity::now(None)))
}

fn percent_decode(input: &str) -> Vec<u8> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let Ok(byte) = u8::from_str_radix(&input[i + 1..i + 3], 16) {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    out
}

fn percent_encode(raw: &[u8]) -> String {
    let mut out = String::with_capacity(raw.len());
    for &b in raw {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~') {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn opens_plain_data_uri() {
        let producer = DataProducer::new();
        let reference = producer.reference_of("data:,test").unwrap();
        let resource = producer.open(&reference, &Default::default()).await.unwrap();
        match resource.content {
            Content::Eager { data: EagerData::Bytes(b), .. } => assert_eq!(b, b"test"),
            _ => panic!("expected eager bytes"),
        }
    }

    #[tokio::test]
    async fn alike_ignores_default_attribute_spelling() {
        let producer = DataProducer::new();
        let a = producer.reference_of("data:,test").unwrap();
        let b = producer.reference_of("data:text/plain;charset=US-ASCII,test").unwrap();
        assert!(producer.alike(&a, &b).await);

        let c = producer.reference_of("data:,tests").unwrap();
        assert!(!producer.alike(&a, &c).await);
    }

    #[test]
    fn base64_payload_decodes() {
        let reference = parse_data_uri("data:text/plain;base64,aGVsbG8=").unwrap();
        let Repository::Data { raw, .. } = reference.repository else { panic!() };
        assert_eq!(raw, b"hello");
    }

    #[test]
    fn invalid_base64_is_invalid_reference() {
        let err = parse_data_uri("data:text/plain;base64,***").unwrap_err();
        assert!(matches!(err, ResourceError::InvalidReference(_)));
    }
}
