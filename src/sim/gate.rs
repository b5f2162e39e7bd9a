//! Asset readiness gate
//!
//! Tracks image decoding before the scene opens. Loading is best-effort: a
//! failed image is recorded and rendered missing, it never holds the gate shut.
//! The gate also keeps the loading screen up for a minimum time.

use std::collections::BTreeSet;

/// How the gate resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Every image decoded
    Ready,
    /// Some images failed; the scene opens without them
    Failed { missing: Vec<String> },
}

/// Bookkeeping for one loading pass
#[derive(Debug, Clone)]
pub struct AssetGate {
    started_ms: f64,
    min_loading_ms: f64,
    pending: BTreeSet<String>,
    missing: Vec<String>,
}

impl AssetGate {
    /// Begin loading `urls` at `now_ms`
    pub fn begin<I, S>(urls: I, now_ms: f64, min_loading_ms: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            started_ms: now_ms,
            min_loading_ms: min_loading_ms as f64,
            pending: urls.into_iter().map(Into::into).collect(),
            missing: Vec::new(),
        }
    }

    /// An image finished decoding
    pub fn loaded(&mut self, url: &str) {
        self.pending.remove(url);
    }

    /// An image failed to decode
    pub fn failed(&mut self, url: &str, reason: &str) {
        if self.pending.remove(url) {
            log::warn!("Failed to load {url}: {reason}");
            self.missing.push(url.to_string());
        }
    }

    /// Every image has either decoded or failed
    pub fn settled(&self) -> bool {
        self.pending.is_empty()
    }

    /// Time the loading screen must still stay up
    pub fn remaining_ms(&self, now_ms: f64) -> f64 {
        (self.started_ms + self.min_loading_ms - now_ms).max(0.0)
    }

    /// Outcome once settled and the minimum duration has passed
    pub fn poll(&self, now_ms: f64) -> Option<GateOutcome> {
        if !self.settled() || self.remaining_ms(now_ms) > 0.0 {
            return None;
        }
        Some(if self.missing.is_empty() {
            GateOutcome::Ready
        } else {
            GateOutcome::Failed {
                missing: self.missing.clone(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waits_for_minimum_duration() {
        let mut gate = AssetGate::begin(["a.png", "b.png"], 0.0, 1500);
        gate.loaded("a.png");
        assert_eq!(gate.poll(100.0), None);
        gate.loaded("b.png");
        assert!(gate.settled());
        assert_eq!(gate.poll(100.0), None);
        assert_eq!(gate.remaining_ms(100.0), 1400.0);
        assert_eq!(gate.poll(1500.0), Some(GateOutcome::Ready));
    }

    #[test]
    fn test_failure_does_not_block() {
        let mut gate = AssetGate::begin(["a.png", "rope.png"], 0.0, 0);
        gate.loaded("a.png");
        gate.failed("rope.png", "decode error");
        assert_eq!(
            gate.poll(0.0),
            Some(GateOutcome::Failed {
                missing: vec!["rope.png".into()]
            })
        );
    }

    #[test]
    fn test_empty_manifest_resolves_after_minimum() {
        let gate = AssetGate::begin(Vec::<String>::new(), 10.0, 50);
        assert_eq!(gate.poll(30.0), None);
        assert_eq!(gate.poll(60.0), Some(GateOutcome::Ready));
    }

    #[test]
    fn test_late_duplicate_reports_ignored() {
        let mut gate = AssetGate::begin(["a.png"], 0.0, 0);
        gate.loaded("a.png");
        gate.failed("a.png", "late");
        assert_eq!(gate.poll(0.0), Some(GateOutcome::Ready));
    }
}
