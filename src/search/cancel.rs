//! Cooperative cancellation and suspension
//!
//! A search episode never blocks its caller for long: it calls back into a
//! [`Suspend`] hook at bounded intervals and checks a [`CancelToken`] at every
//! node entry and around every suspension. Once the token is set the search
//! unwinds with [`Cancelled`].

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag for one search episode.
///
/// Clones share the flag. Setting it is idempotent and never reverts.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that the episode holding this token stop.
    #[inline]
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Marker returned through the search recursion once cancellation is seen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("search cancelled")
    }
}

impl std::error::Error for Cancelled {}

/// Hook the search calls at its yield points.
pub trait Suspend {
    fn suspend(&mut self);
}

/// Never gives up control
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSuspend;

impl Suspend for NoSuspend {
    #[inline]
    fn suspend(&mut self) {}
}

/// Lets other threads run at every yield point
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadYield;

impl Suspend for ThreadYield {
    #[inline]
    fn suspend(&mut self) {
        std::thread::yield_now();
    }
}

impl<F: FnMut()> Suspend for F {
    #[inline]
    fn suspend(&mut self) {
        self()
    }
}

/// Token and hook bundled for one episode
pub(crate) struct Control<'a> {
    token: &'a CancelToken,
    hook: &'a mut dyn Suspend,
    yields: u64,
}

impl<'a> Control<'a> {
    pub(crate) fn new(token: &'a CancelToken, hook: &'a mut dyn Suspend) -> Self {
        Self {
            token,
            hook,
            yields: 0,
        }
    }

    /// Node-entry check
    #[inline]
    pub(crate) fn check(&self) -> Result<(), Cancelled> {
        if self.token.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }

    /// Check, hand control to the hook, then check again
    pub(crate) fn yield_now(&mut self) -> Result<(), Cancelled> {
        self.check()?;
        self.hook.suspend();
        self.yields += 1;
        self.check()
    }

    #[inline]
    pub(crate) fn yields(&self) -> u64 {
        self.yields
    }
}
