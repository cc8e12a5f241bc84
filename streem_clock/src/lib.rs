//! Utilities for messing with time
//!
//! Types included allow messing with and mocking out clocks and other
//! side-effect-laden time operations. Time is tracked to the millisecond
//! so that callers can express expirations precisely, and can be truncated
//! down to whole seconds when it is placed into a token.
//!
//! # Example
//!
//! Requesting several timestamps relative to the same captured instant:
//!
//! ```
//! use std::time::Duration;
//! use streem_clock::{FutureTimestamp, TestClock, UnixTimeMillis};
//!
//! let clock = TestClock::new(UnixTimeMillis(1_000));
//! let future = FutureTimestamp::from_clock(&clock);
//!
//! assert_eq!(future.after(Duration::from_secs(1)), UnixTimeMillis(2_000));
//! assert_eq!(future.after(Duration::from_secs(2)), UnixTimeMillis(3_000));
//! ```

#![warn(
    missing_docs,
    unused_import_braces,
    unused_imports,
    unused_qualifications
)]
#![deny(
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unused_must_use
)]
#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

use std::{
    convert::TryFrom,
    time::{Duration, SystemTime},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Unix time, to millisecond precision
///
/// The number of milliseconds elapsed since the beginning of the Unix epoch
/// on 1970/01/01 at 00:00:00 UTC. The value is signed so that any value
/// handed to us can be carried verbatim, including times before the epoch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct UnixTimeMillis(pub i64);

impl UnixTimeMillis {
    /// The underlying number of milliseconds
    #[inline]
    #[must_use]
    pub const fn as_millis(self) -> i64 {
        self.0
    }

    /// Adds a duration to this time, saturating at the numeric bounds
    #[must_use]
    pub fn saturating_add(self, dur: Duration) -> Self {
        let millis = i64::try_from(dur.as_millis()).unwrap_or(i64::MAX);
        Self(self.0.saturating_add(millis))
    }
}

impl From<SystemTime> for UnixTimeMillis {
    fn from(t: SystemTime) -> Self {
        match t.duration_since(SystemTime::UNIX_EPOCH) {
            Ok(d) => Self(i64::try_from(d.as_millis()).unwrap_or(i64::MAX)),
            Err(e) => Self(-i64::try_from(e.duration().as_millis()).unwrap_or(i64::MAX)),
        }
    }
}

impl From<UnixTimeMillis> for i64 {
    #[inline]
    fn from(t: UnixTimeMillis) -> Self {
        t.0
    }
}

impl From<i64> for UnixTimeMillis {
    #[inline]
    fn from(millis: i64) -> Self {
        Self(millis)
    }
}

/// Unix time
///
/// Unix time as represented by the number of seconds elapsed since the
/// beginning of the Unix epoch on 1970/01/01 at 00:00:00 UTC.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct UnixTime(pub i64);

/// Truncates toward zero; sub-second precision is discarded, not rounded.
impl From<UnixTimeMillis> for UnixTime {
    #[inline]
    fn from(t: UnixTimeMillis) -> Self {
        Self(t.0 / 1000)
    }
}

impl From<SystemTime> for UnixTime {
    #[inline]
    fn from(t: SystemTime) -> Self {
        Self::from(UnixTimeMillis::from(t))
    }
}

#[cfg(any(feature = "serde", doc))]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
impl Serialize for UnixTime {
    #[inline]
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

#[cfg(any(feature = "serde", doc))]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
impl<'de> Deserialize<'de> for UnixTime {
    #[inline]
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = i64::deserialize(deserializer)?;
        Ok(Self(s))
    }
}

#[cfg(any(feature = "serde", doc))]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
impl Serialize for UnixTimeMillis {
    #[inline]
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

#[cfg(any(feature = "serde", doc))]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
impl<'de> Deserialize<'de> for UnixTimeMillis {
    #[inline]
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = i64::deserialize(deserializer)?;
        Ok(Self(s))
    }
}

/// Represents a clock, which can tell the current time
pub trait Clock {
    /// Gets the current time according to this clock
    fn now(&self) -> UnixTimeMillis;
}

/// The system clock as provided by `std::time::SystemTime`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct System;

impl Clock for System {
    #[inline]
    fn now(&self) -> UnixTimeMillis {
        UnixTimeMillis::from(SystemTime::now())
    }
}

/// A test clock which maintains the current time as internal state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TestClock(UnixTimeMillis);

impl Clock for TestClock {
    #[inline]
    fn now(&self) -> UnixTimeMillis {
        self.0
    }
}

impl TestClock {
    /// Creates a new test clock with the specified time
    #[inline]
    pub const fn new(time: UnixTimeMillis) -> Self {
        Self(time)
    }

    /// Updates the clock's current time to `val`
    pub fn set(&mut self, val: UnixTimeMillis) {
        self.0 = val;
    }

    /// Advances the clock's current time by `inc`
    pub fn inc(&mut self, inc: Duration) {
        self.0 = self.0.saturating_add(inc);
    }
}

/// A single captured instant from which future timestamps are computed
///
/// Every timestamp produced by the same `FutureTimestamp` is an offset from
/// the same reference, so the spacing between them is exactly the spacing
/// between the requested durations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub struct FutureTimestamp {
    reference: UnixTimeMillis,
}

impl FutureTimestamp {
    /// Captures the current time from the system clock
    pub fn now() -> Self {
        Self::from_clock(&System)
    }

    /// Captures the current time from the specified clock
    pub fn from_clock<C: Clock + ?Sized>(clock: &C) -> Self {
        Self {
            reference: clock.now(),
        }
    }

    /// Uses an explicit reference instant
    pub const fn from_reference(reference: UnixTimeMillis) -> Self {
        Self { reference }
    }

    /// The captured reference instant
    #[inline]
    pub const fn reference(&self) -> UnixTimeMillis {
        self.reference
    }

    /// The reference instant advanced by `dur`
    #[must_use]
    pub fn after(&self, dur: Duration) -> UnixTimeMillis {
        self.reference.saturating_add(dur)
    }
}
