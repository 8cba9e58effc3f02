//! One-time initialization of the WOFF2 codec.

use std::{
    fmt,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc,
    },
};

use tokio::sync::Mutex;

use crate::Woff2Codec;

/// Default locator of the WOFF2 codec runtime payload, relative to the application distribution.
pub const DEFAULT_WOFF2_LOCATOR: &str = "./woff2.wasm";

/// Guard ensuring that a [`Woff2Codec`] is initialized at most once, before its first use.
///
/// The guard is meant to be shared (e.g., via `Arc`) by all [`Minifier`](crate::Minifier)s
/// in the process. Concurrent callers of [`Self::ensure_initialized()`] are serialized: a single
/// initialization runs, and the other callers wait for it to complete and share its outcome.
/// In particular, if the attempt fails, all callers that were waiting on it receive the same
/// error, which is why errors are wrapped in an `Arc`.
///
/// A failed initialization is never retried automatically. The guard stays uninitialized,
/// so a call *started* after the failure makes a new attempt (e.g., with a corrected locator).
pub struct CodecGuard<C: Woff2Codec> {
    codec: C,
    locator: String,
    initialized: AtomicBool,
    /// Number of failed attempts; only modified while `last_failure` is locked.
    failed_attempts: AtomicU64,
    last_failure: Mutex<Option<Arc<C::Error>>>,
}

impl<C: Woff2Codec + fmt::Debug> fmt::Debug for CodecGuard<C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("CodecGuard")
            .field("codec", &self.codec)
            .field("locator", &self.locator)
            .field("initialized", &self.is_initialized())
            .field("failed_attempts", &self.failed_attempts.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl<C: Woff2Codec> CodecGuard<C> {
    /// Wraps the codec using [`DEFAULT_WOFF2_LOCATOR`].
    pub fn new(codec: C) -> Self {
        Self {
            codec,
            locator: DEFAULT_WOFF2_LOCATOR.to_owned(),
            initialized: AtomicBool::new(false),
            failed_attempts: AtomicU64::new(0),
            last_failure: Mutex::new(None),
        }
    }

    /// Sets the default locator of the codec payload.
    #[must_use]
    pub fn with_locator(mut self, locator: impl Into<String>) -> Self {
        self.locator = locator.into();
        self
    }

    /// Returns a reference to the wrapped codec.
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Returns the default payload locator.
    pub fn locator(&self) -> &str {
        &self.locator
    }

    /// Checks whether the codec was successfully initialized.
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Initializes the codec unless it is already initialized. `locator_override` replaces
    /// the default locator; it has no effect once the codec is initialized.
    ///
    /// # Errors
    ///
    /// Propagates the codec initialization error. If this call waited on an attempt made
    /// by a concurrent caller and that attempt failed, the error of that attempt is returned.
    pub async fn ensure_initialized(
        &self,
        locator_override: Option<&str>,
    ) -> Result<(), Arc<C::Error>> {
        let locator = locator_override.unwrap_or(self.locator.as_str());
        if self.is_initialized() {
            log::trace!("WOFF2 codec is already initialized; ignoring locator `{locator}`");
            return Ok(());
        }

        let seen_failures = self.failed_attempts.load(Ordering::Acquire);
        let mut last_failure = self.last_failure.lock().await;
        if self.is_initialized() {
            return Ok(());
        }
        if self.failed_attempts.load(Ordering::Acquire) != seen_failures {
            if let Some(err) = &*last_failure {
                log::debug!("concurrent initialization of WOFF2 codec has failed: {err}");
                return Err(Arc::clone(err));
            }
        }

        log::debug!("initializing WOFF2 codec from `{locator}`");
        match self.codec.initialize(locator).await {
            Ok(()) => {
                *last_failure = None;
                self.initialized.store(true, Ordering::Release);
                log::info!("initialized WOFF2 codec from `{locator}`");
                Ok(())
            }
            Err(err) => {
                log::error!("failed initializing WOFF2 codec from `{locator}`: {err}");
                let err = Arc::new(err);
                *last_failure = Some(Arc::clone(&err));
                self.failed_attempts.fetch_add(1, Ordering::AcqRel);
                Err(err)
            }
        }
    }
}
