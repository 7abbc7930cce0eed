// /////////////////////////////////////////////////////////////////////////////
// resx
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use crate::value_objects::{Checksum, Timestamp};
use serde::{Deserialize, Serialize};

/// Total order between two timestamps, as returned by [`Integrity::compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampOrder {
    Lt,
    Eq,
    Gt,
}

impl From<std::cmp::Ordering> for TimestampOrder {
    fn from(o: std::cmp::Ordering) -> Self {
        match o {
            std::cmp::Ordering::Less => Self::Lt,
            std::cmp::Ordering::Equal => Self::Eq,
            std::cmp::Ordering::Greater => Self::Gt,
        }
    }
}

/// `(optional Checksum, Timestamp)` — §3, §4.B. `checksum` is `None` for
/// chained transforms and set on `apply`; `timestamp` is the wall-clock
/// instant the reference was created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Integrity {
    pub checksum: Option<Checksum>,
    pub timestamp: Timestamp,
}

impl Integrity {
    pub fn new(checksum: Option<Checksum>, timestamp: Timestamp) -> Self {
        Self { checksum, timestamp }
    }

    pub fn now(checksum: Option<Checksum>) -> Self {
        Self { checksum, timestamp: Timestamp::now() }
    }

    /// `Integrity.compare(a, b)`, §4.B: a `(checksum_equality, timestamp_order)`
    /// pair.
    ///
    /// `checksum_equality` is `Some(true)` iff both sides carry a checksum
    /// with the same algorithm and equal digest; `Some(false)` iff both
    /// sides carry a checksum with the same algorithm and differing
    /// digest; `None` on algorithm mismatch or either side missing a
    /// checksum.
    pub fn compare(a: &Integrity, b: &Integrity) -> (Option<bool>, TimestampOrder) {
        let checksum_equality = match (&a.checksum, &b.checksum) {
            (Some(ca), Some(cb)) if ca.algorithm == cb.algorithm => Some(ca.digest == cb.digest),
            _ => None,
        };
        let timestamp_order = a.timestamp.order(&b.timestamp).into();
        (checksum_equality, timestamp_order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ts(secs: i64) -> Timestamp {
        Timestamp::new(Utc.timestamp_opt(secs, 0).unwrap())
    }

    #[test]
    fn equal_checksums_same_algorithm() {
        let a = Integrity::new(Some(Checksum::new("sha256", vec![1, 2, 3])), ts(1));
        let b = Integrity::new(Some(Checksum::new("sha256", vec![1, 2, 3])), ts(2));
        let (eq, order) = Integrity::compare(&a, &b);
        assert_eq!(eq, Some(true));
        assert_eq!(order, TimestampOrder::Lt);
    }

    #[test]
    fn differing_digest_same_algorithm() {
        let a = Integrity::new(Some(Checksum::new("sha256", vec![1])), ts(1));
        let b = Integrity::new(Some(Checksum::new("sha256", vec![2])), ts(1));
        let (eq, order) = Integrity::compare(&a, &b);
        assert_eq!(eq, Some(false));
        assert_eq!(order, TimestampOrder::Eq);
    }

    #[test]
    fn algorithm_mismatch_is_na() {
        let a = Integrity::new(Some(Checksum::new("sha256", vec![1])), ts(1));
        let b = Integrity::new(Some(Checksum::new("sha512", vec![1])), ts(1));
        let (eq, _) = Integrity::compare(&a, &b);
        assert_eq!(eq, None);
    }

    #[test]
    fn missing_checksum_is_na() {
        let a = Integrity::new(None, ts(1));
        let b = Integrity::new(Some(Checksum::new("sha256", vec![1])), ts(1));
        let (eq, _) = Integrity::compare(&a, &b);
        assert_eq!(eq, None);
    }
}
