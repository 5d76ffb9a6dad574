// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll listener registration at the host boundary.

use core::fmt;

use crate::passive::PassiveProbe;

/// Registration options for a scroll listener.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    /// The handler promises never to cancel the scroll.
    pub passive: bool,
}

impl ListenerOptions {
    /// Options for a scroll listener, passive when the host supports it.
    #[must_use]
    pub const fn for_scroll(supports_passive: bool) -> Self {
        Self {
            passive: supports_passive,
        }
    }
}

/// Returned by a host that cannot register listeners with an options object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProbeError;

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("listener options are not supported by this host")
    }
}

impl core::error::Error for ProbeError {}

/// A host capable of delivering scroll notifications.
///
/// Hosts forward each scroll they observe to
/// [`WindowController::handle_scroll`](crate::WindowController::handle_scroll);
/// this trait only covers registration.
pub trait ScrollSource {
    /// Handle identifying one registration.
    type Token;

    /// Registers and immediately unregisters a throwaway listener using `probe`
    /// as its options object.
    ///
    /// Hosts that understand the passive hint read [`PassiveProbe::passive`]
    /// while doing so.
    fn probe_options(&mut self, probe: &PassiveProbe) -> Result<(), ProbeError>;

    /// Starts delivering scroll notifications.
    fn subscribe(&mut self, options: ListenerOptions) -> Self::Token;

    /// Stops the registration identified by `token`.
    ///
    /// `options` are the ones passed to [`ScrollSource::subscribe`].
    fn unsubscribe(&mut self, token: Self::Token, options: ListenerOptions);
}

impl<S: ScrollSource + ?Sized> ScrollSource for &mut S {
    type Token = S::Token;

    fn probe_options(&mut self, probe: &PassiveProbe) -> Result<(), ProbeError> {
        (**self).probe_options(probe)
    }

    fn subscribe(&mut self, options: ListenerOptions) -> Self::Token {
        (**self).subscribe(options)
    }

    fn unsubscribe(&mut self, token: Self::Token, options: ListenerOptions) {
        (**self).unsubscribe(token, options);
    }
}

/// A live scroll registration; dropping it unsubscribes.
pub struct ScrollSubscription<S: ScrollSource> {
    source: S,
    token: Option<S::Token>,
    options: ListenerOptions,
}

impl<S: ScrollSource> ScrollSubscription<S> {
    /// Subscribes to `source` with `options`.
    pub fn new(mut source: S, options: ListenerOptions) -> Self {
        let token = source.subscribe(options);
        Self {
            source,
            token: Some(token),
            options,
        }
    }

    /// Options the listener was registered with.
    #[must_use]
    pub const fn options(&self) -> ListenerOptions {
        self.options
    }

    /// Returns `true` until the subscription has been released.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.token.is_some()
    }

    /// Shared access to the host.
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Unsubscribes now instead of at drop.
    pub fn release(&mut self) {
        if let Some(token) = self.token.take() {
            self.source.unsubscribe(token, self.options);
        }
    }
}

impl<S: ScrollSource> Drop for ScrollSubscription<S> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<S: ScrollSource> fmt::Debug for ScrollSubscription<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollSubscription")
            .field("active", &self.is_active())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use alloc::vec::Vec;

    use super::{ListenerOptions, ProbeError, ScrollSource, ScrollSubscription};
    use crate::passive::PassiveProbe;

    /// A host that records registrations.
    #[derive(Debug, Default)]
    pub(crate) struct FakeHost {
        pub(crate) understands_passive: bool,
        pub(crate) rejects_options: bool,
        pub(crate) next_token: u32,
        pub(crate) active: Vec<(u32, ListenerOptions)>,
        pub(crate) removed: Vec<u32>,
    }

    impl ScrollSource for FakeHost {
        type Token = u32;

        fn probe_options(&mut self, probe: &PassiveProbe) -> Result<(), ProbeError> {
            if self.rejects_options {
                return Err(ProbeError);
            }
            if self.understands_passive {
                let _ = probe.passive();
            }
            Ok(())
        }

        fn subscribe(&mut self, options: ListenerOptions) -> u32 {
            let token = self.next_token;
            self.next_token += 1;
            self.active.push((token, options));
            token
        }

        fn unsubscribe(&mut self, token: u32, options: ListenerOptions) {
            let before = self.active.len();
            self.active.retain(|&(t, o)| !(t == token && o == options));
            assert_eq!(
                before,
                self.active.len() + 1,
                "unsubscribe must match an active registration"
            );
            self.removed.push(token);
        }
    }

    #[test]
    fn drop_unsubscribes_with_matching_options() {
        let mut host = FakeHost::default();
        {
            let sub = ScrollSubscription::new(&mut host, ListenerOptions::for_scroll(true));
            assert!(sub.is_active());
            assert_eq!(sub.options(), ListenerOptions { passive: true });
        }
        assert!(host.active.is_empty());
        assert_eq!(host.removed, [0]);
    }

    #[test]
    fn release_is_idempotent() {
        let mut host = FakeHost::default();
        {
            let mut sub = ScrollSubscription::new(&mut host, ListenerOptions::default());
            sub.release();
            assert!(!sub.is_active());
            sub.release();
        }
        assert_eq!(host.removed, [0]);
    }
}
