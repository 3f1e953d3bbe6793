//! Scripted metric source for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use ukhsa_client::{ClientError, FetchOutcome};
use ukhsa_types::{MetricSpec, MetricValue, Reading};

use crate::MetricSource;

/// What a scripted metric returns.
#[derive(Debug, Clone)]
pub enum Script {
    Value(MetricValue),
    NoData,
    Fail,
}

#[derive(Debug, Default)]
struct Inner {
    scripts: Mutex<HashMap<String, Script>>,
    delay: Mutex<Duration>,
    calls: AtomicUsize,
}

/// A source whose outcome per key is set by the test.
///
/// Keys without a script fail. Clones share state, so a test can keep one
/// clone while the coordinator owns another.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    inner: Arc<Inner>,
}

impl ScriptedSource {
    /// Every configured metric succeeds with a distinct value.
    pub fn all_succeed() -> Self {
        let source = Self::default();
        for (i, spec) in MetricSpec::configured().iter().enumerate() {
            source.set(&spec.key, Script::Value(MetricValue::Number(i as f64 + 1.0)));
        }
        source
    }

    /// Every metric fails.
    pub fn all_fail() -> Self {
        Self::default()
    }

    pub fn set(&self, key: &str, script: Script) {
        self.inner.scripts.lock().insert(key.to_string(), script);
    }

    pub fn set_all(&self, script: Script) {
        for spec in MetricSpec::configured() {
            self.set(&spec.key, script.clone());
        }
    }

    pub fn with_delay(self, delay: Duration) -> Self {
        *self.inner.delay.lock() = delay;
        self
    }

    /// Number of fetches issued so far.
    pub fn calls(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetricSource for ScriptedSource {
    async fn fetch(&self, spec: &MetricSpec) -> FetchOutcome {
        self.inner.calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.inner.delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let script = self.inner.scripts.lock().get(&spec.key).cloned();
        match script {
            Some(Script::Value(value)) => FetchOutcome::Success(Reading::new(
                Some(value),
                Some("2024-01-14".to_string()),
                Some("England".to_string()),
            )),
            Some(Script::NoData) => FetchOutcome::NoData,
            Some(Script::Fail) | None => {
                FetchOutcome::Failure(ClientError::Connection("scripted failure".to_string()))
            }
        }
    }
}
