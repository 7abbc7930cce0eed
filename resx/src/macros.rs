// /////////////////////////////////////////////////////////////////////////////
// resx
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Panic-class ergonomic wrappers (§7) over the fallible façade API, for
//! call sites — tests, CLI glue, REPL-style usage — that want `?`-free
//! code. Each expands to an `.await` plus [`resx_domain::ResourceError::unwrap_or_panic`]-style
//! match, so the tagged error is still visible in the panic message.

/// `open!(service, locator)`: `service.open(locator, &Default::default())`,
/// panicking with the `ResourceError` on failure.
#[macro_export]
macro_rules! open {
    ($service:expr, $locator:expr) => {
        match $service.open($locator, &::std::default::Default::default()).await {
            Ok(resource) => resource,
            Err(err) => panic!("open! failed: {err:?}"),
        }
    };
}

/// `store!(storer, resource, options)`: panics with the `ResourceError`
/// on failure.
#[macro_export]
macro_rules! store {
    ($storer:expr, $resource:expr, $options:expr) => {
        match ::resx_domain::services::storer::Storer::store(&*$storer, $resource, $options).await {
            Ok(resource) => resource,
            Err(err) => panic!("store! failed: {err:?}"),
        }
    };
}

/// `finalise!(service, resource)`: `service.finalise(resource, true,
/// None)`, panicking with the `ResourceError` on failure.
#[macro_export]
macro_rules! finalise {
    ($service:expr, $resource:expr) => {
        match $service.finalise($resource, true, None) {
            Ok(resource) => resource,
            Err(err) => panic!("finalise! failed: {err:?}"),
        }
    };
}

/// `apply!(transformer, resource, options)`: `Transformer::transform`,
/// panicking with the `ResourceError` on failure.
#[macro_export]
macro_rules! apply {
    ($transformer:expr, $resource:expr, $options:expr) => {
        match ::resx_domain::services::transformer::Transformer::transform(&*$transformer, $resource, $options) {
            Ok(resource) => resource,
            Err(err) => panic!("apply! failed: {err:?}"),
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::application::services::ResourceService;
    use crate::infrastructure::adapters::data_producer::DataProducer;
    use resx_domain::services::scheme_dispatcher::{DispatcherEntry, SchemeDispatcher};
    use std::sync::Arc;

    fn service() -> ResourceService {
        let dispatcher = Arc::new(SchemeDispatcher::new(vec![DispatcherEntry::Producer(Arc::new(DataProducer::new()))], vec![]));
        ResourceService::new(dispatcher)
    }

    #[tokio::test]
    async fn open_and_finalise_bang_macros_panic_free_on_success() {
        let svc = service();
        let resource = open!(svc, "data:,hello");
        let finalised = finalise!(svc, resource);
        assert!(finalised.reference.integrity.checksum.is_some());
    }

    #[tokio::test]
    #[should_panic(expected = "open! failed")]
    async fn open_bang_panics_on_invalid_reference() {
        let svc = service();
        let _ = open!(svc, "not-a-uri");
    }
}
