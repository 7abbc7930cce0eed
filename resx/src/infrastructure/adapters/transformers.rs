// /////////////////////////////////////////////////////////////////////////////
// resx
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Concrete transformers (§4.I, §8 scenarios 2-3): string-level content
//! rewrites used to exercise the transform producer's chaining and
//! options encoding. `transform` replaces content only; the transform
//! producer owns reference construction on every transformer's behalf.

use resx_domain::entities::{Content, EagerData};
use resx_domain::services::transformer::Transformer;
use resx_domain::{Resource, ResourceError};

fn eager_bytes(resource: &Resource) -> Result<Vec<u8>, ResourceError> {
    match &resource.content {
        Content::Eager { data: EagerData::Bytes(b), .. } => Ok(b.clone()),
        Content::Eager { data: EagerData::Values(values), .. } => {
            Ok(values.iter().flat_map(resx_domain::entities::binary_reducer).collect())
        }
        Content::Stream { stream, .. } => {
            let chunks = stream.collect()?;
            Ok(chunks.iter().flat_map(resx_domain::entities::binary_reducer).collect())
        }
    }
}

fn with_bytes(resource: Resource, bytes: Vec<u8>) -> Resource {
    let media_type = resource.content.media_type().clone();
    Resource::new(resource.reference, Content::Eager { media_type, data: EagerData::Bytes(bytes) }, resource.meta)
}

/// Prepends a fixed string to the content bytes.
pub struct Prefixer;

impl Transformer for Prefixer {
    fn transform(&self, resource: Resource, options: &serde_json::Value) -> Result<Resource, ResourceError> {
        let prefix = options.get("prefix").and_then(|v| v.as_str()).unwrap_or("foo");
        let mut bytes = prefix.as_bytes().to_vec();
        bytes.extend(eager_bytes(&resource)?);
        Ok(with_bytes(resource, bytes))
    }
}

/// Appends a fixed string to the content bytes.
pub struct Suffixer;

impl Transformer for Suffixer {
    fn transform(&self, resource: Resource, options: &serde_json::Value) -> Result<Resource, ResourceError> {
        let suffix = options.get("suffix").and_then(|v| v.as_str()).unwrap_or("bar");
        let mut bytes = eager_bytes(&resource)?;
        bytes.extend_from_slice(suffix.as_bytes());
        Ok(with_bytes(resource, bytes))
    }
}

/// Replaces every occurrence of `options.pattern` with `options.replacement`.
pub struct Replacer;

impl Transformer for Replacer {
    fn transform(&self, resource: Resource, options: &serde_json::Value) -> Result<Resource, ResourceError> {
        let pattern = options
            .get("pattern")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ResourceError::invalid_reference("Replacer requires a `pattern` option"))?;
        let replacement = options.get("replacement").and_then(|v| v.as_str()).unwrap_or("");
        let bytes = eager_bytes(&resource)?;
        let text = String::from_utf8_lossy(&bytes);
        let replaced = text.replace(pattern, replacement);
        Ok(with_bytes(resource, replaced.into_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resx_domain::entities::Content as ContentEnum;
    use resx_domain::value_objects::MediaType;
    use resx_domain::{Reference, Repository};
    use resx_domain::value_objects::AdapterId;
    use resx_domain::Integrity;
    use std::collections::BTreeMap;

    fn data_resource(bytes: &[u8]) -> Resource {
        let reference = Reference::new(
            AdapterId::new("data"),
            Repository::Data { media_type: MediaType::single("text/plain"), attributes: BTreeMap::new(), raw: bytes.to_vec() },
            Integrity::now(None),
        );
        Resource::without_meta(reference, ContentEnum::Eager { media_type: MediaType::single("text/plain"), data: EagerData::Bytes(bytes.to_vec()) })
    }

    #[test]
    fn prefixer_prepends() {
        let out = Prefixer.transform(data_resource(b"test"), &serde_json::json!({"prefix": "foo"})).unwrap();
        assert_eq!(eager_bytes(&out).unwrap(), b"footest");
    }

    #[test]
    fn suffixer_appends() {
        let out = Suffixer.transform(data_resource(b"test"), &serde_json::json!({"suffix": "bar"})).unwrap();
        assert_eq!(eager_bytes(&out).unwrap(), b"testbar");
    }

    #[test]
    fn replacer_requires_pattern() {
        let err = Replacer.transform(data_resource(b"test"), &serde_json::json!({})).unwrap_err();
        assert!(matches!(err, ResourceError::InvalidReference(_)));
    }

    #[test]
    fn replacer_substitutes() {
        let out = Replacer
            .transform(data_resource(b"foofootest"), &serde_json::json!({"pattern": "foo", "replacement": "abc"}))
            .unwrap();
        assert_eq!(eager_bytes(&out).unwrap(), b"abcabctest");
    }
}
