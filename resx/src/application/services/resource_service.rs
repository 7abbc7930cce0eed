// /////////////////////////////////////////////////////////////////////////////
// resx
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The resource façade (§4.F): a single entry point wrapping every
//! producer's uniform operation set, implementing the cache-miss
//! recovery path and comparison/finalisation/hashing (§4.F.1-3) that no
//! single producer owns.

use resx_bootstrap::shutdown::CancellationToken;
use resx_domain::entities::{binary_reducer, default_combiner, Combiner};
use resx_domain::services::producer::{ProducerOptions, SourceCompatibility};
use resx_domain::services::scheme_dispatcher::SchemeDispatcher;
use resx_domain::value_objects::{Checksum, HashAlgorithm};
use resx_domain::{Content, Integrity, Reference, Resource, ResourceError};
use std::future::Future;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Either a typed reference or a raw URI the façade resolves via the
/// dispatcher before use.
pub enum Locator<'a> {
    Reference(Reference),
    Resource(&'a Resource),
    Uri(&'a str),
}

impl<'a> From<Reference> for Locator<'a> {
    fn from(reference: Reference) -> Self {
        Self::Reference(reference)
    }
}

impl<'a> From<&'a Resource> for Locator<'a> {
    fn from(resource: &'a Resource) -> Self {
        Self::Resource(resource)
    }
}

impl<'a> From<&'a str> for Locator<'a> {
    fn from(uri: &'a str) -> Self {
        Self::Uri(uri)
    }
}

/// `compare(a, b, options)`'s ordering outcome, folded from the paired
/// lineage walk (§4.F.1). Distinct from `None` (not alike at all): `Na`
/// means "alike, but undecidable from checksums alone".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOutcome {
    Lt,
    Eq,
    Gt,
    Ne,
    Na,
}

/// Which end of the paired lineage walk folding starts from, and whether
/// to fall back to comparing materialised content when the checksum
/// walk alone is undecidable.
pub struct CompareOptions {
    pub order: FoldOrder,
    pub content: bool,
    pub unsure: Option<CompareOutcome>,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self { order: FoldOrder::First, content: false, unsure: None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldOrder {
    First,
    Last,
}

/// Wraps the scheme dispatcher, the default hash algorithm, and content
/// combiner — all consulted fresh per call (§9: no cross-call caching).
pub struct ResourceService {
    dispatcher: Arc<SchemeDispatcher>,
    default_hash: HashAlgorithm,
    combiner: Combiner,
}

impl ResourceService {
    pub fn new(dispatcher: Arc<SchemeDispatcher>) -> Self {
        Self { dispatcher, default_hash: HashAlgorithm::sha256(), combiner: Arc::new(default_combiner) }
    }

    pub fn with_default_hash(mut self, algorithm: HashAlgorithm) -> Self {
        self.default_hash = algorithm;
        self
    }

    fn resolve_reference(&self, locator: Locator<'_>) -> Result<Reference, ResourceError> {
        match locator {
            Locator::Reference(reference) => Ok(reference),
            Locator::Resource(resource) => Ok(resource.reference.clone()),
            Locator::Uri(uri) => self.dispatcher.producer_of_uri(uri)?.reference_of(uri),
        }
    }

    /// `open(ref, opts)` (§4.F): eager content, with the cache-miss
    /// recovery path for `CompatibleDefault` producers.
    #[instrument(skip(self, locator, options))]
    pub async fn open<'a>(&self, locator: impl Into<Locator<'a>>, options: &ProducerOptions) -> Result<Resource, ResourceError> {
        let reference = self.resolve_reference(locator.into())?;
        let producer = self.dispatcher.producer_of_reference(&reference)?;
        match producer.open(&reference, options).await {
            Ok(resource) => Ok(resource),
            Err(err) if err.is_recoverable() && producer.source_compatibility() == SourceCompatibility::CompatibleDefault => {
                warn!("cache miss, attempting source-backed recovery");
                let source = producer.source(&reference).await?.ok_or(err)?;
                let source_producer = self.dispatcher.producer_of_reference(&source)?;
                let source_resource = source_producer.open(&source, options).await?;
                let recovered = producer.prepare_store(&reference, source_resource).await?;
                info!("recovered resource from source");
                Ok(recovered)
            }
            Err(err) => Err(err),
        }
    }

    /// Races `future` against `token` (§5: "honours a caller-supplied
    /// cancellation signal"), surfacing cancellation as an `Internal`
    /// error distinct from any producer failure.
    async fn with_cancellation<F>(token: &CancellationToken, future: F) -> Result<Resource, ResourceError>
    where
        F: Future<Output = Result<Resource, ResourceError>>,
    {
        if token.is_cancelled() {
            return Err(ResourceError::internal("operation cancelled"));
        }
        tokio::select! {
            result = future => result,
            _ = token.cancelled() => Err(ResourceError::internal("operation cancelled")),
        }
    }

    /// `open(ref, opts)`, cancellable via a caller-supplied
    /// [`CancellationToken`] (§5 expansion).
    pub async fn open_cancellable<'a>(
        &self,
        locator: impl Into<Locator<'a>>,
        options: &ProducerOptions,
        token: &CancellationToken,
    ) -> Result<Resource, ResourceError> {
        Self::with_cancellation(token, self.open(locator, options)).await
    }

    /// `stream(ref, opts)`, cancellable via a caller-supplied
    /// [`CancellationToken`] (§5 expansion).
    pub async fn stream_cancellable<'a>(
        &self,
        locator: impl Into<Locator<'a>>,
        options: &ProducerOptions,
        token: &CancellationToken,
    ) -> Result<Resource, ResourceError> {
        Self::with_cancellation(token, self.stream(locator, options)).await
    }

    /// `stream(ref, opts)` (§4.F): the same recovery path, streaming
    /// content.
    pub async fn stream<'a>(&self, locator: impl Into<Locator<'a>>, options: &ProducerOptions) -> Result<Resource, ResourceError> {
        let reference = self.resolve_reference(locator.into())?;
        let producer = self.dispatcher.producer_of_reference(&reference)?;
        match producer.stream(&reference, options).await {
            Ok(resource) => Ok(resource),
            Err(err) if err.is_recoverable() && producer.source_compatibility() == SourceCompatibility::CompatibleDefault => {
                let source = producer.source(&reference).await?.ok_or(err)?;
                let source_producer = self.dispatcher.producer_of_reference(&source)?;
                let source_resource = source_producer.open(&source, options).await?;
                producer.prepare_store(&reference, source_resource).await
            }
            Err(err) => Err(err),
        }
    }

    pub async fn exists<'a>(&self, locator: impl Into<Locator<'a>>) -> Result<bool, ResourceError> {
        let reference = self.resolve_reference(locator.into())?;
        self.dispatcher.producer_of_reference(&reference)?.exists(&reference).await
    }

    pub async fn alike<'a>(&self, a: impl Into<Locator<'a>>, b: impl Into<Locator<'a>>) -> Result<bool, ResourceError> {
        let a = self.resolve_reference(a.into())?;
        let b = self.resolve_reference(b.into())?;
        Ok(self.dispatcher.producer_of_reference(&a)?.alike(&a, &b).await)
    }

    pub async fn source<'a>(&self, locator: impl Into<Locator<'a>>) -> Result<Option<Reference>, ResourceError> {
        let reference = self.resolve_reference(locator.into())?;
        self.dispatcher.producer_of_reference(&reference)?.source(&reference).await
    }

    pub fn uri<'a>(&self, locator: impl Into<Locator<'a>>) -> Result<String, ResourceError> {
        let reference = self.resolve_reference(locator.into())?;
        self.dispatcher.producer_of_reference(&reference)?.uri(&reference)
    }

    pub async fn attribute<'a>(&self, locator: impl Into<Locator<'a>>, key: &str) -> Result<serde_json::Value, ResourceError> {
        let reference = self.resolve_reference(locator.into())?;
        self.dispatcher.producer_of_reference(&reference)?.attribute(&reference, key).await
    }

    pub async fn attributes<'a>(&self, locator: impl Into<Locator<'a>>) -> Result<std::collections::BTreeMap<String, serde_json::Value>, ResourceError> {
        let reference = self.resolve_reference(locator.into())?;
        self.dispatcher.producer_of_reference(&reference)?.attributes(&reference).await
    }

    /// `finalise(r, options)` (§4.F.2): promotes streaming content to
    /// eager and stamps a checksum, unless either is explicitly
    /// suppressed via `content: false` / `hash: false`.
    pub fn finalise(&self, resource: Resource, content: bool, hash: Option<&HashAlgorithm>) -> Result<Resource, ResourceError> {
        let eager_content = if content { resource.content.new_eager(&self.combiner)? } else { resource.content };
        let algorithm = hash.unwrap_or(&self.default_hash);
        let checksum = if hash.is_some() || resource.reference.integrity.checksum.is_none() {
            Some(self.hash(&eager_content, &resource.reference.integrity.checksum, algorithm)?)
        } else {
            resource.reference.integrity.checksum.clone()
        };
        let mut reference = resource.reference;
        reference.integrity = Integrity::now(checksum);
        Ok(Resource::new(reference, eager_content, resource.meta))
    }

    /// `hash(r, algorithm)` (§4.F.3): short-circuits if the existing
    /// checksum already matches the requested algorithm's name.
    fn hash(&self, content: &Content, existing: &Option<Checksum>, algorithm: &HashAlgorithm) -> Result<Checksum, ResourceError> {
        if let Some(existing) = existing {
            if existing.algorithm == algorithm.name() {
                return Ok(existing.clone());
            }
        }
        let digest = match content {
            Content::Eager { data, .. } => {
                let bytes = match data {
                    resx_domain::entities::EagerData::Bytes(b) => b.clone(),
                    resx_domain::entities::EagerData::Values(values) => values.iter().flat_map(binary_reducer).collect(),
                };
                algorithm.hash_buffer(&bytes)
            }
            Content::Stream { stream, .. } => {
                let chunks = stream.collect()?;
                let byte_chunks: Vec<Vec<u8>> = chunks.iter().map(binary_reducer).collect();
                algorithm.hash_chunks(byte_chunks.iter().map(|v| v.as_slice()))
            }
        };
        Ok(Checksum::new(algorithm.name(), digest))
    }

    /// `compare(a, b, options)` (§4.F.1).
    pub async fn compare(&self, a: &Resource, b: &Resource, options: &CompareOptions) -> Result<Option<CompareOutcome>, ResourceError> {
        let producer = self.dispatcher.producer_of_reference(&a.reference)?;
        if !producer.alike(&a.reference, &b.reference).await {
            return Ok(None);
        }

        let a_lineage = a.reference.lineage();
        let b_lineage = b.reference.lineage();
        let mut pairs: Vec<(Option<bool>, resx_domain::entities::TimestampOrder)> = a_lineage
            .iter()
            .zip(b_lineage.iter())
            .map(|(x, y)| Integrity::compare(&x.integrity, &y.integrity))
            .collect();
        if options.order == FoldOrder::Last {
            pairs.reverse();
        }

        let mut result = CompareOutcome::Eq;
        let mut halted = None;
        for (equality, order) in pairs {
            use resx_domain::entities::TimestampOrder as TO;
            match (equality, order) {
                // Once a link is undecidable the overall result stays `Na`
                // even if a later link in the lineage is a clean `Eq`.
                // Once a link is undecidable the overall result stays `Na`
                // even if a later link in the lineage is a clean `Eq`.
                (Some(true), TO::Eq) if result == CompareOutcome::Na => {}
                (Some(true), TO::Eq) => result = CompareOutcome::Eq,
                (Some(true), TO::Lt) => {
                    halted = Some(CompareOutcome::Lt);
                    break;
                }
                (Some(true), TO::Gt) => {
                    halted = Some(CompareOutcome::Gt);
                    break;
                }
                (Some(false), TO::Eq) => {
                    halted = Some(CompareOutcome::Ne);
                    break;
                }
                (Some(false), TO::Lt) => {
                    halted = Some(CompareOutcome::Lt);
                    break;
                }
                (Some(false), TO::Gt) => {
                    halted = Some(CompareOutcome::Gt);
                    break;
                }
                (None, TO::Eq) => result = CompareOutcome::Na,
                (None, TO::Lt) => {
                    halted = Some(CompareOutcome::Lt);
                    break;
                }
                (None, TO::Gt) => {
                    halted = Some(CompareOutcome::Gt);
                    break;
                }
            }
        }
        let mut outcome = halted.unwrap_or(result);

        if matches!(outcome, CompareOutcome::Eq | CompareOutcome::Na) && options.content {
            let a_bytes = a.content.data(&self.combiner)?;
            let b_bytes = b.content.data(&self.combiner)?;
            outcome = if a_bytes == b_bytes { CompareOutcome::Eq } else { CompareOutcome::Ne };
        } else if outcome == CompareOutcome::Na {
            if let Some(mapped) = options.unsure {
                outcome = mapped;
            }
        }
        Ok(Some(outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::data_producer::DataProducer;
    use resx_domain::services::scheme_dispatcher::DispatcherEntry;

    fn service() -> ResourceService {
        let dispatcher = Arc::new(SchemeDispatcher::new(vec![DispatcherEntry::Producer(Arc::new(DataProducer::new()))], vec![]));
        ResourceService::new(dispatcher)
    }

    /// A service whose dispatcher also resolves `resx-transform:`
    /// references, for lineages with more than one link.
    fn service_with_transform() -> ResourceService {
        use crate::infrastructure::adapters::transform_producer::TransformProducer;
        use crate::infrastructure::adapters::transformers::Prefixer;
        use resx_domain::services::transformer::TransformerRegistry;

        let data = Arc::new(DataProducer::new());
        let base = Arc::new(SchemeDispatcher::new(vec![DispatcherEntry::Producer(data.clone())], vec![]));
        let mut registry = TransformerRegistry::new();
        registry.register("Prefixer", Arc::new(Prefixer));
        let transform = Arc::new(TransformProducer::new(base.clone(), Arc::new(registry)));
        let dispatcher = Arc::new(SchemeDispatcher::new(vec![DispatcherEntry::Producer(data), DispatcherEntry::Producer(transform)], vec![]));
        ResourceService::new(dispatcher)
    }

    #[tokio::test]
    async fn open_by_uri_and_finalise_then_compare() {
        let svc = service();
        let a = svc.open("data:,hello", &Default::default()).await.unwrap();
        let a = svc.finalise(a, true, None).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b_open = svc.open("data:,hello", &Default::default()).await.unwrap();
        let b = svc.finalise(b_open, true, None).unwrap();

        let lt = svc.compare(&a, &b, &CompareOptions::default()).await.unwrap();
        assert_eq!(lt, Some(CompareOutcome::Lt));

        let eq = svc.compare(&a, &a, &CompareOptions::default()).await.unwrap();
        assert_eq!(eq, Some(CompareOutcome::Eq));

        let mut stripped = a.clone();
        stripped.reference.integrity.checksum = None;
        let na = svc.compare(&a, &stripped, &CompareOptions::default()).await.unwrap();
        assert_eq!(na, Some(CompareOutcome::Na));

        let content_true = CompareOptions { content: true, ..CompareOptions::default() };
        let eq_by_content = svc.compare(&a, &stripped, &content_true).await.unwrap();
        assert_eq!(eq_by_content, Some(CompareOutcome::Eq));

        let modified_content = Resource::new(
            a.reference.clone(),
            Content::Eager { media_type: a.content.media_type().clone(), data: resx_domain::entities::EagerData::Bytes(b"test".to_vec()) },
            a.meta.clone(),
        );
        let ne = svc.compare(&a, &modified_content, &content_true).await.unwrap();
        assert_eq!(ne, Some(CompareOutcome::Ne));
    }

    /// A multi-link lineage (`resx-transform:Prefixer,<data>`) where the
    /// outer link is undecidable (`Na`, no checksum) but the inner data
    /// link is a clean checksum match: the fold must report `Na`
    /// overall, not let the later clean `Eq` link paper over it.
    #[tokio::test]
    async fn compare_na_link_is_sticky_across_later_eq_link() {
        use resx_domain::entities::EagerData;
        use resx_domain::value_objects::{AdapterId, MediaType};
        use resx_domain::{Repository, Timestamp};

        let svc = service_with_transform();
        let ts_inner = Timestamp::now();
        let ts_outer = Timestamp::now();

        let inner_reference = Reference::new(
            AdapterId::new("data"),
            Repository::Data { media_type: MediaType::single("text/plain"), attributes: Default::default(), raw: b"hello".to_vec() },
            Integrity::new(Some(Checksum::new("sha256", vec![1, 2, 3])), ts_inner),
        );
        let outer_reference = |source: &Reference| {
            Reference::new(
                AdapterId::new("resx-transform"),
                Repository::Transform { transformer_id: "Prefixer".to_string(), options: serde_json::Value::Null, inner: Box::new(source.clone()) },
                Integrity::new(None, ts_outer),
            )
        };

        let content = Content::Eager { media_type: MediaType::single("text/plain"), data: EagerData::Bytes(b"hello".to_vec()) };
        let a = Resource::without_meta(outer_reference(&inner_reference), content.clone());
        let b = Resource::without_meta(outer_reference(&inner_reference), content);

        let outcome = svc.compare(&a, &b, &CompareOptions::default()).await.unwrap();
        assert_eq!(outcome, Some(CompareOutcome::Na));
    }

    #[tokio::test]
    async fn hash_is_pure_and_matches_finalise() {
        let svc = service();
        let resource = svc.open("data:,hello", &Default::default()).await.unwrap();
        let finalised = svc.finalise(resource, true, None).unwrap();
        let checksum = finalised.reference.integrity.checksum.clone().unwrap();
        let recomputed = svc.hash(&finalised.content, &None, &HashAlgorithm::sha256()).unwrap();
        assert_eq!(checksum, recomputed);
    }

    #[tokio::test]
    async fn open_cancellable_succeeds_when_token_is_untouched() {
        let svc = service();
        let token = CancellationToken::new();
        let resource = svc.open_cancellable("data:,hello", &Default::default(), &token).await.unwrap();
        assert_eq!(resource.content.data(&default_combiner_arc()).unwrap(), resx_domain::entities::EagerData::Bytes(b"hello".to_vec()));
    }

    #[tokio::test]
    async fn open_cancellable_fails_when_token_already_cancelled() {
        let svc = service();
        let token = CancellationToken::new();
        token.cancel();
        let err = svc.open_cancellable("data:,hello", &Default::default(), &token).await.unwrap_err();
        assert!(matches!(err, ResourceError::Internal(_)));
    }

    fn default_combiner_arc() -> Combiner {
        Arc::new(default_combiner)
    }
}
