use hexcamp_application::services::LookupClass;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free per-handler counters.
#[derive(Debug, Default)]
pub struct HandlerStats {
    requests: AtomicU64,
    synthesized: AtomicU64,
    deferred: AtomicU64,
    aborted: AtomicU64,
    lookups: [AtomicU64; 5],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HandlerStatsSnapshot {
    pub requests: u64,
    pub synthesized: u64,
    pub deferred: u64,
    pub aborted: u64,
    pub lookups: [u64; 5],
}

impl HandlerStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_deferred(&self) {
        self.deferred.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_aborted(&self) {
        self.aborted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_synthesized(&self, lookup: Option<LookupClass>) {
        self.synthesized.fetch_add(1, Ordering::Relaxed);
        if let Some(class) = lookup {
            self.lookups[class.index()].fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> HandlerStatsSnapshot {
        HandlerStatsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            synthesized: self.synthesized.load(Ordering::Relaxed),
            deferred: self.deferred.load(Ordering::Relaxed),
            aborted: self.aborted.load(Ordering::Relaxed),
            lookups: std::array::from_fn(|i| self.lookups[i].load(Ordering::Relaxed)),
        }
    }
}

impl HandlerStatsSnapshot {
    pub fn lookups_of(&self, class: LookupClass) -> u64 {
        self.lookups[class.index()]
    }
}

impl fmt::Display for HandlerStatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "requests={} synthesized={} deferred={} aborted={}",
            self.requests, self.synthesized, self.deferred, self.aborted
        )?;
        for class in LookupClass::ALL {
            write!(f, " lookup_{}={}", class.as_str().to_lowercase(), self.lookups_of(class))?;
        }
        Ok(())
    }
}
