//! Redraw triggers: the 1 Hz wall clock tick and the stopwatch timer.
//!
//! The stopwatch timer is a single shot that is re-armed every time it
//! fires. Each arm hands out a fresh token and at most one token is pending;
//! a fire that carries any other token is stale and ignored, which makes
//! cancellation take effect immediately even if the host already queued the
//! expiry. Re-arms are anchored to the previous deadline rather than to the
//! moment the fire was handled, so the cadence does not drift over a long
//! session.
//!
//! `OneShot` is the host side of the same timer: it holds the latest armed
//! request and reports how long is left until its absolute deadline.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TimerRequest {
    pub token: u32,
    pub after_ms: u64,
    /// Monotonic instant the timer is due.
    pub deadline_ms: u64,
}

#[derive(Clone, Copy, Debug)]
struct Pending {
    token: u32,
    deadline_ms: u64,
    period_ms: u64,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    wall_clock_armed: bool,
    pending: Option<Pending>,
    next_token: u32,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm_wall_clock_tick(&mut self) {
        self.wall_clock_armed = true;
    }

    pub fn disarm_wall_clock_tick(&mut self) {
        self.wall_clock_armed = false;
    }

    pub fn wall_clock_armed(&self) -> bool {
        self.wall_clock_armed
    }

    /// Arm the stopwatch timer, replacing any pending one.
    pub fn arm_stopwatch_timer(&mut self, now_ms: u64, after_ms: u64) -> TimerRequest {
        let period_ms = after_ms.max(1);
        self.next_token = self.next_token.wrapping_add(1);
        let token = self.next_token;
        self.pending = Some(Pending {
            token,
            deadline_ms: now_ms.saturating_add(period_ms),
            period_ms,
        });
        TimerRequest {
            token,
            after_ms: period_ms,
            deadline_ms: now_ms.saturating_add(period_ms),
        }
    }

    /// Returns whether a timer was pending.
    pub fn cancel_stopwatch_timer(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn stopwatch_timer_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_token(&self) -> Option<u32> {
        self.pending.map(|p| p.token)
    }

    /// Handle an expiry. Returns the re-arm request, or `None` when the
    /// token is stale and nothing should be redrawn.
    pub fn fire_stopwatch_timer(&mut self, token: u32, now_ms: u64) -> Option<TimerRequest> {
        let pending = self.pending.filter(|p| p.token == token)?;

        // Skip whole periods that were missed while the host was busy
        let behind = now_ms.saturating_sub(pending.deadline_ms);
        let periods = behind / pending.period_ms + 1;
        let deadline_ms = pending.deadline_ms + periods * pending.period_ms;

        self.next_token = self.next_token.wrapping_add(1);
        let next = Pending {
            token: self.next_token,
            deadline_ms,
            period_ms: pending.period_ms,
        };
        self.pending = Some(next);
        Some(TimerRequest {
            token: next.token,
            after_ms: deadline_ms - now_ms,
            deadline_ms,
        })
    }
}

#[derive(Debug, Default)]
pub struct OneShot {
    armed: Option<TimerRequest>,
}

impl OneShot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces whatever was armed before.
    pub fn arm(&mut self, req: TimerRequest) {
        self.armed = Some(req);
    }

    pub fn cancel(&mut self) {
        self.armed = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Time left until the armed deadline; zero once it is due.
    pub fn remaining_ms(&self, now_ms: u64) -> Option<u64> {
        self.armed.map(|req| req.deadline_ms.saturating_sub(now_ms))
    }

    /// Disarms and returns the token once its deadline has passed.
    pub fn take_expired(&mut self, now_ms: u64) -> Option<u32> {
        match self.armed {
            Some(req) if req.deadline_ms <= now_ms => {
                self.armed = None;
                Some(req.token)
            }
            _ => None,
        }
    }
}
