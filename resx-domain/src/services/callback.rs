// /////////////////////////////////////////////////////////////////////////////
// resx
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The callback dispatcher (§4.C): the single mechanism for every
//! user-configurable hook in the system (access-matrix predicates, RPC
//! transport, content combiners/reducers, transformer option hooks).
//!
//! Rust has no runtime reflection, so the four source-language callback
//! shapes collapse to two targets: an inline closure (`CallbackTarget::Direct`)
//! or a name resolved against a [`CallbackRegistry`] the embedding
//! application populates at startup (`CallbackTarget::Named`) — the
//! equivalent of the source system's `(module, function, ...)` triples.

use crate::ResourceError;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Whether a callback's caller requires its inputs to be delivered, or
/// tolerates them being discarded when the descriptor's placement is
/// [`Placement::Ignore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Required,
    Optional,
}

/// Where positional inputs are spliced into a callback's prebound
/// argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Insert all inputs contiguously at this index into the prebound list.
    Index(usize),
    /// One final-list position per input; remaining positions are filled,
    /// in order, by the prebound arguments.
    Positions(Vec<usize>),
    /// Discard inputs; invoke with prebound args only (requires
    /// `Requirement::Optional`).
    Ignore,
}

type DirectFn = Arc<dyn Fn(&[Value]) -> Result<Value, ResourceError> + Send + Sync>;

/// Where a callback's code lives: inline, or named for lookup in a
/// [`CallbackRegistry`] at call time.
#[derive(Clone)]
pub enum CallbackTarget {
    Direct(DirectFn),
    Named(String),
}

impl std::fmt::Debug for CallbackTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct(_) => write!(f, "CallbackTarget::Direct(..)"),
            Self::Named(name) => write!(f, "CallbackTarget::Named({name:?})"),
        }
    }
}

/// A callback descriptor, one of the four shapes in §4.C.
#[derive(Debug, Clone)]
pub enum CallbackDescriptor {
    /// A function value with known arity: inputs are passed positionally,
    /// no prebound arguments.
    Arity { target: CallbackTarget, arity: usize },
    /// `(module, function, prebound_args)` with no placement: inputs are
    /// appended to the prebound list.
    Prebound { target: CallbackTarget, prebound: Vec<Value> },
    /// `(module, function, prebound_args, input_placement)`.
    Placed { target: CallbackTarget, prebound: Vec<Value>, placement: Placement },
}

impl CallbackDescriptor {
    pub fn direct_arity(f: DirectFn, arity: usize) -> Self {
        Self::Arity { target: CallbackTarget::Direct(f), arity }
    }

    pub fn direct_prebound(f: DirectFn, prebound: Vec<Value>) -> Self {
        Self::Prebound { target: CallbackTarget::Direct(f), prebound }
    }
}

/// A registry of named callback targets, populated by the embedding
/// application at startup. Resolving an unregistered name is a caller
/// error, surfaced as `ResourceError::InvalidReference`.
#[derive(Clone, Default)]
pub struct CallbackRegistry {
    entries: HashMap<String, DirectFn>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, f: DirectFn) {
        self.entries.insert(name.into(), f);
    }

    fn resolve(&self, target: &CallbackTarget) -> Result<DirectFn, ResourceError> {
        match target {
            CallbackTarget::Direct(f) => Ok(f.clone()),
            CallbackTarget::Named(name) => self
                .entries
                .get(name)
                .cloned()
                .ok_or_else(|| ResourceError::invalid_reference(format!("unknown callback `{name}`"))),
        }
    }
}

/// `call(cb, inputs, requirement)` — §4.C dispatch rule.
pub fn call(
    cb: &CallbackDescriptor,
    inputs: Vec<Value>,
    requirement: Requirement,
    registry: &CallbackRegistry,
) -> Result<Value, ResourceError> {
    match cb {
        CallbackDescriptor::Arity { target, arity } => {
            if inputs.len() != *arity {
                return Err(ResourceError::internal(format!(
                    "callback expects {} input(s), got {}",
                    arity,
                    inputs.len()
                )));
            }
            invoke(target, registry, inputs)
        }
        CallbackDescriptor::Prebound { target, prebound } => {
            let mut args = prebound.clone();
            args.extend(inputs);
            invoke(target, registry, args)
        }
        CallbackDescriptor::Placed { target, prebound, placement } => match placement {
            Placement::Index(index) => {
                let mut args = prebound.clone();
                let at = (*index).min(args.len());
                let tail = args.split_off(at);
                args.extend(inputs);
                args.extend(tail);
                invoke(target, registry, args)
            }
            Placement::Positions(positions) => {
                if positions.len() != inputs.len() {
                    return Err(ResourceError::internal(
                        "callback placement list length does not match input count",
                    ));
                }
                let total = prebound.len() + inputs.len();
                let mut merged: Vec<Option<Value>> = vec![None; total];
                for (pos, input) in positions.iter().zip(inputs) {
                    if *pos >= total {
                        return Err(ResourceError::internal("callback placement position out of range"));
                    }
                    merged[*pos] = Some(input);
                }
                let mut prebound_iter = prebound.iter().cloned();
                let mut args = Vec::with_capacity(total);
                for slot in merged {
                    match slot {
                        Some(v) => args.push(v),
                        None => args.push(
                            prebound_iter
                                .next()
                                .ok_or_else(|| ResourceError::internal("not enough prebound arguments to fill placement gaps"))?,
                        ),
                    }
                }
                invoke(target, registry, args)
            }
            Placement::Ignore => match requirement {
                Requirement::Optional => invoke(target, registry, prebound.clone()),
                Requirement::Required => {
                    Err(ResourceError::internal("callback requires input but placement discards it"))
                }
            },
        },
    }
}

fn invoke(target: &CallbackTarget, registry: &CallbackRegistry, args: Vec<Value>) -> Result<Value, ResourceError> {
    let f = registry.resolve(target)?;
    f(&args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn echo() -> DirectFn {
        Arc::new(|args: &[Value]| Ok(Value::Array(args.to_vec())))
    }

    #[test]
    fn arity_form_requires_matching_input_count() {
        let registry = CallbackRegistry::new();
        let cb = CallbackDescriptor::direct_arity(echo(), 2);
        assert!(call(&cb, vec![json!(1)], Requirement::Required, &registry).is_err());
        let ok = call(&cb, vec![json!(1), json!(2)], Requirement::Required, &registry).unwrap();
        assert_eq!(ok, json!([1, 2]));
    }

    #[test]
    fn prebound_appends_inputs() {
        let registry = CallbackRegistry::new();
        let cb = CallbackDescriptor::direct_prebound(echo(), vec![json!("a")]);
        let result = call(&cb, vec![json!("b")], Requirement::Required, &registry).unwrap();
        assert_eq!(result, json!(["a", "b"]));
    }

    #[test]
    fn index_placement_splices_inputs() {
        let registry = CallbackRegistry::new();
        let cb = CallbackDescriptor::Placed {
            target: CallbackTarget::Direct(echo()),
            prebound: vec![json!("a"), json!("d")],
            placement: Placement::Index(1),
        };
        let result = call(&cb, vec![json!("b"), json!("c")], Requirement::Required, &registry).unwrap();
        assert_eq!(result, json!(["a", "b", "c", "d"]));
    }

    #[test]
    fn positions_placement_interleaves() {
        let registry = CallbackRegistry::new();
        let cb = CallbackDescriptor::Placed {
            target: CallbackTarget::Direct(echo()),
            prebound: vec![json!("a"), json!("c")],
            placement: Placement::Positions(vec![1, 3]),
        };
        let result = call(&cb, vec![json!("b"), json!("d")], Requirement::Required, &registry).unwrap();
        assert_eq!(result, json!(["a", "b", "c", "d"]));
    }

    #[test]
    fn ignore_placement_requires_optional() {
        let registry = CallbackRegistry::new();
        let cb = CallbackDescriptor::Placed {
            target: CallbackTarget::Direct(echo()),
            prebound: vec![json!("only")],
            placement: Placement::Ignore,
        };
        assert!(call(&cb, vec![json!("dropped")], Requirement::Required, &registry).is_err());
        let result = call(&cb, vec![json!("dropped")], Requirement::Optional, &registry).unwrap();
        assert_eq!(result, json!(["only"]));
    }

    #[test]
    fn named_target_resolves_via_registry() {
        let mut registry = CallbackRegistry::new();
        registry.register("double", Arc::new(|args: &[Value]| Ok(json!(args[0].as_i64().unwrap() * 2))));
        let cb = CallbackDescriptor::Arity { target: CallbackTarget::Named("double".into()), arity: 1 };
        let result = call(&cb, vec![json!(21)], Requirement::Required, &registry).unwrap();
        assert_eq!(result, json!(42));
    }

    #[test]
    fn unknown_named_target_is_invalid_reference() {
        let registry = CallbackRegistry::new();
        let cb = CallbackDescriptor::Arity { target: CallbackTarget::Named("missing".into()), arity: 0 };
        let err = call(&cb, vec![], Requirement::Required, &registry).unwrap_err();
        assert!(matches!(err, ResourceError::InvalidReference(_)));
    }
}
