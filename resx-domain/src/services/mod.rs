// /////////////////////////////////////////////////////////////////////////////
// resx
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Domain services: the pure or infrastructure-port logic that sits
//! between entities and the outside world — the callback dispatcher
//! (C), path matcher (D), scheme dispatcher (E), and the `Producer`/
//! `Transformer`/`Storer` trait contracts (F, I, J) that the
//! `resx` crate's adapters implement.

pub mod callback;
pub mod path_matcher;
pub mod producer;
pub mod scheme_dispatcher;
pub mod storer;
pub mod transformer;

pub use callback::{call, CallbackDescriptor, CallbackRegistry, CallbackTarget, Placement, Requirement};
pub use path_matcher::{glob_matches, PathPattern};
pub use producer::{Producer, ProducerOptions, SourceCompatibility};
pub use scheme_dispatcher::{uri_scheme, DispatcherEntry, SchemeDispatcher};
pub use storer::Storer;
pub use transformer::{Transformer, TransformerRegistry};
