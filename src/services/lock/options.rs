//! Guard configuration.
//!
//! `LockOptions` is the serializable part and may be stored or loaded as JSON;
//! camelCase names used by front-end callers are accepted as
//! aliases. `LockConfig` adds the (non-serializable) target locator.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::services::locator::{self, TargetLocator};
use crate::types::errors::{LockError, LockResult};

/// Class applied to the target element while a guard is locked.
pub const DEFAULT_LOCKED_CLASS: &str = "ui-lock-locked";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockOptions {
    /// Call count at which the guard locks.
    #[serde(alias = "maxCall", alias = "max_call")]
    pub threshold: u32,
    /// Force a release this many milliseconds after the guard locked.
    #[serde(alias = "unlockTimeout", alias = "autoReleaseDelay")]
    pub auto_release_delay_ms: Option<u64>,
    /// `None` disables the class; disabled attributes are still applied.
    #[serde(alias = "lockClass", alias = "lockedCssClass")]
    pub locked_css_class: Option<String>,
    #[serde(
        alias = "returnLastResultWhenLocked",
        alias = "returnLastResultWhileLocked"
    )]
    pub return_last_result_while_locked: bool,
    #[serde(alias = "unlockOnPromise", alias = "releaseOnFutureSettle")]
    pub release_on_future_settle: bool,
    #[serde(alias = "unlockOnObservable", alias = "releaseOnStreamActivity")]
    pub release_on_stream_activity: bool,
    #[serde(alias = "debug", alias = "verboseLogging")]
    pub verbose_logging: bool,
}

impl Default for LockOptions {
    fn default() -> Self {
        Self {
            threshold: 1,
            auto_release_delay_ms: None,
            locked_css_class: Some(DEFAULT_LOCKED_CLASS.to_string()),
            return_last_result_while_locked: false,
            release_on_future_settle: true,
            release_on_stream_activity: true,
            verbose_logging: false,
        }
    }
}

impl LockOptions {
    /// Parse options from JSON, filling missing fields with defaults.
    pub fn from_json(json: &str) -> LockResult<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> LockResult<()> {
        if self.threshold == 0 {
            return Err(LockError::Configuration(
                "threshold must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// A zero delay means no auto-release.
    pub fn auto_release_delay(&self) -> Option<Duration> {
        self.auto_release_delay_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }

    pub fn locked_class(&self) -> Option<&str> {
        self.locked_css_class.as_deref().filter(|c| !c.is_empty())
    }
}

/// Everything a guard needs at construction time.
#[derive(Clone)]
pub struct LockConfig {
    pub options: LockOptions,
    /// `None` disables element marking.
    pub locator: Option<Arc<dyn TargetLocator>>,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            options: LockOptions::default(),
            locator: Some(locator::by_argument(None)),
        }
    }
}

impl LockConfig {
    /// Default locator merged with the given options.
    pub fn from_options(options: LockOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.options.threshold = threshold;
        self
    }

    /// Sub-millisecond delays round up to 1ms; `Duration::ZERO` disables the timer.
    pub fn with_auto_release(mut self, delay: Duration) -> Self {
        let ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        let ms = if ms == 0 && !delay.is_zero() { 1 } else { ms };
        self.options.auto_release_delay_ms = Some(ms);
        self
    }

    pub fn with_locator(mut self, locator: Arc<dyn TargetLocator>) -> Self {
        self.locator = Some(locator);
        self
    }

    pub fn without_locator(mut self) -> Self {
        self.locator = None;
        self
    }

    pub fn with_locked_class(mut self, class: Option<&str>) -> Self {
        self.options.locked_css_class = class.map(str::to_string);
        self
    }

    pub fn returning_last_result(mut self) -> Self {
        self.options.return_last_result_while_locked = true;
        self
    }

    pub fn release_on_future_settle(mut self, enabled: bool) -> Self {
        self.options.release_on_future_settle = enabled;
        self
    }

    pub fn release_on_stream_activity(mut self, enabled: bool) -> Self {
        self.options.release_on_stream_activity = enabled;
        self
    }

    pub fn verbose(mut self) -> Self {
        self.options.verbose_logging = true;
        self
    }
}

impl fmt::Debug for LockConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockConfig")
            .field("options", &self.options)
            .field("locator", &self.locator.as_ref().map(|_| "<locator>"))
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/options_tests.rs"]
mod tests;
