use chrono::Utc;

pub trait Clock {
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Creation instant of a record: `millis` doubles as the row id,
/// `secs` is the modification time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stamp {
    pub millis: i64,
    pub secs: i64,
}

/// Hands out strictly increasing millisecond ids seeded from the clock.
/// When two requests land in the same millisecond the second one is bumped
/// forward instead of waiting for the clock.
#[derive(Debug)]
pub struct IdAllocator<C: Clock> {
    clock: C,
    last: i64,
}

impl<C: Clock> IdAllocator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock, last: i64::MIN }
    }

    /// Every id handed out will be greater than `floor`.
    pub fn starting_after(clock: C, floor: i64) -> Self {
        Self { clock, last: floor }
    }

    pub fn next_stamp(&mut self) -> Stamp {
        let now = self.clock.now_millis();
        let millis = now.max(self.last.saturating_add(1));
        self.last = millis;
        Stamp { millis, secs: now / 1000 }
    }

    pub fn last_id(&self) -> Option<i64> {
        (self.last != i64::MIN).then_some(self.last)
    }
}
