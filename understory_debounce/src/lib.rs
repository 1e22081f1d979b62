// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Debounce: time-delayed value propagation.
//!
//! [`Debounced`] holds two values: the latest *input* and the settled *output*.
//! The output only catches up with the input once the input has been stable for
//! the configured delay. Each new input restarts the delay. A delay of `None` or
//! `Some(0)` makes the output track the input immediately.
//!
//! The type never reads a clock. Callers pass monotonic timestamps (typically
//! milliseconds) to [`Debounced::set`] and [`Debounced::poll`], which keeps it
//! deterministic and easy to drive from a frame loop, a timer wheel, or a test.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_debounce::Debounced;
//!
//! let mut search = Debounced::new(String::new(), Some(250));
//!
//! // A burst of keystrokes, each less than 250ms apart.
//! search.set("a".to_string(), 1_000);
//! search.set("ab".to_string(), 1_100);
//! search.set("abc".to_string(), 1_200);
//!
//! // Not settled yet.
//! assert!(!search.poll(1_400));
//! assert_eq!(search.value(), "");
//!
//! // 250ms after the last change, only the final value comes through.
//! assert!(search.poll(1_450));
//! assert_eq!(search.value(), "abc");
//!
//! // Nothing left to settle.
//! assert!(!search.poll(5_000));
//! ```
//!
//! This crate is `no_std`.

#![no_std]

/// A value whose output lags its input by a fixed delay.
#[derive(Clone, Debug)]
pub struct Debounced<T> {
    delay: Option<u64>,
    output: T,
    pending: Option<Pending<T>>,
}

#[derive(Clone, Debug)]
struct Pending<T> {
    value: T,
    deadline: u64,
}

impl<T: PartialEq> Debounced<T> {
    /// Creates a debounced value whose output starts at `initial`.
    ///
    /// `delay` is in the same unit as the timestamps passed to [`Self::set`]
    /// and [`Self::poll`].
    pub fn new(initial: T, delay: Option<u64>) -> Self {
        Self {
            delay,
            output: initial,
            pending: None,
        }
    }

    /// Returns the configured delay, if any.
    pub fn delay(&self) -> Option<u64> {
        self.delay
    }

    /// Returns `true` when input propagates to the output immediately.
    pub fn is_immediate(&self) -> bool {
        self.delay.is_none_or(|d| d == 0)
    }

    /// Replaces the delay.
    ///
    /// A pending value keeps its current deadline, unless the new delay is
    /// immediate, in which case it is flushed right away. Returns `true` if
    /// the output changed.
    pub fn set_delay(&mut self, delay: Option<u64>) -> bool {
        self.delay = delay;
        if self.is_immediate() {
            self.flush()
        } else {
            false
        }
    }

    /// Records a new input at time `now`.
    ///
    /// With an immediate delay the output updates right away; otherwise any
    /// pending value is discarded and the delay restarts from `now`.
    /// Returns `true` if the output changed as part of this call.
    pub fn set(&mut self, value: T, now: u64) -> bool {
        match self.delay {
            Some(delay) if delay > 0 => {
                self.pending = Some(Pending {
                    value,
                    deadline: now.saturating_add(delay),
                });
                false
            }
            _ => {
                self.pending = None;
                self.replace_output(value)
            }
        }
    }

    /// Settles the pending input if its deadline has passed at `now`.
    ///
    /// Returns `true` only when the output actually changed, so a burst of
    /// inputs reports at most one change.
    pub fn poll(&mut self, now: u64) -> bool {
        match &self.pending {
            Some(p) if now >= p.deadline => self.flush(),
            _ => false,
        }
    }

    /// Settles the pending input immediately, regardless of its deadline.
    pub fn flush(&mut self) -> bool {
        match self.pending.take() {
            Some(p) => self.replace_output(p.value),
            None => false,
        }
    }

    /// Drops the pending input without touching the output.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Returns the settled output.
    pub fn value(&self) -> &T {
        &self.output
    }

    /// Returns the most recent input: the pending value if there is one,
    /// otherwise the settled output.
    pub fn input(&self) -> &T {
        self.pending.as_ref().map_or(&self.output, |p| &p.value)
    }

    /// Returns `true` while an input is waiting for its deadline.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Returns the time at which the pending input will settle.
    pub fn deadline(&self) -> Option<u64> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    fn replace_output(&mut self, value: T) -> bool {
        if value == self.output {
            false
        } else {
            self.output = value;
            true
        }
    }
}

impl<T: PartialEq + Default> Default for Debounced<T> {
    fn default() -> Self {
        Self::new(T::default(), None)
    }
}
