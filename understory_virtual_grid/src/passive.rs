// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Detection of passive listener support.
//!
//! Hosts differ in whether their listener registration understands an options
//! object with a `passive` hint. The probe hands the host a [`PassiveProbe`]
//! while registering a throwaway listener; a host that consults the hint reads
//! [`PassiveProbe::passive`], which is how support is detected.

use core::cell::Cell;
use core::sync::atomic::{AtomicU8, Ordering};

use crate::subscription::ScrollSource;

const UNKNOWN: u8 = 0;
const UNSUPPORTED: u8 = 1;
const SUPPORTED: u8 = 2;

static PASSIVE_SUPPORT: AtomicU8 = AtomicU8::new(UNKNOWN);

/// Options object handed to [`ScrollSource::probe_options`].
#[derive(Debug, Default)]
pub struct PassiveProbe {
    read: Cell<bool>,
}

impl PassiveProbe {
    /// Creates a probe that has not been read yet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            read: Cell::new(false),
        }
    }

    /// The passive hint, as seen by the host.
    ///
    /// Reading it marks the host as passive-aware. The hint itself is unset so
    /// the throwaway listener is registered as an ordinary one.
    pub fn passive(&self) -> bool {
        self.read.set(true);
        false
    }

    /// Returns `true` if the host read [`PassiveProbe::passive`].
    #[must_use]
    pub fn was_read(&self) -> bool {
        self.read.get()
    }
}

/// Probes `source` for passive listener support without memoizing.
///
/// A host that fails the probe is treated as unsupported.
pub fn probe_passive<S: ScrollSource + ?Sized>(source: &mut S) -> bool {
    let probe = PassiveProbe::new();
    match source.probe_options(&probe) {
        Ok(()) => probe.was_read(),
        Err(_err) => {
            #[cfg(feature = "tracing")]
            tracing::trace!(error = %_err, "passive listener probe failed");
            false
        }
    }
}

/// Returns whether the host supports passive listeners.
///
/// The first call probes `source`; every later call in the process returns
/// that result without touching its argument.
pub fn supports_passive<S: ScrollSource + ?Sized>(source: &mut S) -> bool {
    match PASSIVE_SUPPORT.load(Ordering::Acquire) {
        SUPPORTED => return true,
        UNSUPPORTED => return false,
        _ => {}
    }
    let detected = if probe_passive(source) {
        SUPPORTED
    } else {
        UNSUPPORTED
    };
    #[cfg(feature = "tracing")]
    tracing::trace!(supported = detected == SUPPORTED, "detected passive listener support");
    // A racing probe may have stored first; its answer wins for everyone.
    match PASSIVE_SUPPORT.compare_exchange(UNKNOWN, detected, Ordering::AcqRel, Ordering::Acquire)
    {
        Ok(_) => detected == SUPPORTED,
        Err(stored) => stored == SUPPORTED,
    }
}
