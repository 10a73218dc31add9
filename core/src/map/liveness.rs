/// Interval between liveness checks for map entities.
pub const ENTITY_CHECK_INTERVAL_MS: u64 = 1_000;
/// Missed checks after which an entity that stopped reporting is purged.
pub const ENTITY_MISSED_CHECKS: u32 = 30;

pub const DETONATION_CHECK_INTERVAL_MS: u64 = 500;
pub const DETONATION_DURATION_MS: u64 = 3_000;

/// Repeating check that fires once the elapsed time since arming reaches the timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LivenessTimer {
    interval_ms: u64,
    max_missed: u32,
    armed: Option<Armed>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Armed {
    since_ms: u64,
    last_check_ms: u64,
    missed: u32,
}

impl LivenessTimer {
    pub fn new(interval_ms: u64, max_missed: u32) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            max_missed,
            armed: None,
        }
    }

    pub fn for_entities() -> Self {
        Self::new(ENTITY_CHECK_INTERVAL_MS, ENTITY_MISSED_CHECKS)
    }

    pub fn timeout_ms(&self) -> u64 {
        self.interval_ms * u64::from(self.max_missed)
    }

    /// Starts a fresh countdown, replacing any pending one.
    pub fn arm(&mut self, now_ms: u64) {
        self.armed = Some(Armed {
            since_ms: now_ms,
            last_check_ms: now_ms,
            missed: 0,
        });
    }

    pub fn cancel(&mut self) {
        self.armed = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    pub fn missed_checks(&self) -> u32 {
        self.armed.map(|armed| armed.missed).unwrap_or(0)
    }

    /// Runs any due check. Returns `true` exactly once, when the timeout fires.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        let timeout = self.timeout_ms();
        let Some(armed) = self.armed.as_mut() else {
            return false;
        };
        if now_ms.saturating_sub(armed.last_check_ms) < self.interval_ms {
            return false;
        }
        armed.last_check_ms = now_ms;
        armed.missed = armed.missed.saturating_add(1);
        if now_ms.saturating_sub(armed.since_ms) >= timeout {
            self.armed = None;
            return true;
        }
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetonationPhase {
    Fading,
    Expired,
}

/// Lifetime of a detonation marker. Time only accrues while the timeline plays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetonationTimer {
    last_check_ms: u64,
    elapsed_ms: u64,
    faded: bool,
    expired: bool,
}

impl DetonationTimer {
    pub fn start(now_ms: u64) -> Self {
        Self {
            last_check_ms: now_ms,
            elapsed_ms: 0,
            faded: false,
            expired: false,
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    pub fn poll(&mut self, now_ms: u64, paused: bool) -> Option<DetonationPhase> {
        if self.expired {
            return None;
        }
        let since = now_ms.saturating_sub(self.last_check_ms);
        if since < DETONATION_CHECK_INTERVAL_MS {
            return None;
        }
        self.last_check_ms = now_ms;
        if !paused {
            self.elapsed_ms += since;
        }
        if self.elapsed_ms >= DETONATION_DURATION_MS {
            self.expired = true;
            return Some(DetonationPhase::Expired);
        }
        if !self.faded && self.elapsed_ms >= DETONATION_DURATION_MS / 2 {
            self.faded = true;
            return Some(DetonationPhase::Fading);
        }
        None
    }
}
