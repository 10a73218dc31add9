use std::sync::Mutex;

/// Running count of entities that need attention across every session layer.
pub struct AlertCounter {
    inner: Mutex<Alerts>,
}

struct Alerts {
    active: i64,
    raised: usize,
    cleared: usize,
}

impl AlertCounter {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Alerts {
                active: 0,
                raised: 0,
                cleared: 0,
            }),
        }
    }

    /// Adds `delta` (which may be negative) to the active alert count.
    pub fn add(&self, delta: i64) {
        if let Ok(mut alerts) = self.inner.lock() {
            alerts.active += delta;
            if delta > 0 {
                alerts.raised += delta as usize;
            } else {
                alerts.cleared += delta.unsigned_abs() as usize;
            }
        }
    }

    pub fn count(&self) -> i64 {
        self.inner.lock().map(|alerts| alerts.active).unwrap_or(0)
    }

    /// Label for the alert button; `None` hides it.
    pub fn badge(&self) -> Option<String> {
        let count = self.count();
        (count > 0).then(|| count.to_string())
    }

    pub fn snapshot(&self) -> (usize, usize) {
        if let Ok(alerts) = self.inner.lock() {
            (alerts.raised, alerts.cleared)
        } else {
            (0, 0)
        }
    }
}

impl Default for AlertCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badge_hides_when_no_alerts_remain() {
        let counter = AlertCounter::new();
        assert_eq!(counter.badge(), None);
        counter.add(2);
        assert_eq!(counter.badge().as_deref(), Some("2"));
        counter.add(-2);
        assert_eq!(counter.badge(), None);
        assert_eq!(counter.snapshot(), (2, 2));
    }
}
