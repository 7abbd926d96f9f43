//! Clock and random implementations.

use crate::infrastructure::ports::{ClockPort, RandomPort};
use chrono::{DateTime, Utc};

/// System clock - uses real time.
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// System random - uses real randomness.
pub struct SystemRandom;

impl SystemRandom {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPort for SystemRandom {
    fn gen_range(&self, min: i32, max: i32) -> i32 {
        use rand::Rng;
        rand::thread_rng().gen_range(min..=max)
    }
}

/// Fixed clock for testing.
#[cfg(test)]
pub struct FixedClock(pub DateTime<Utc>);

#[cfg(test)]
impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Fixed random for testing: every roll returns the same value.
#[cfg(test)]
pub struct FixedRandom(pub i32);

#[cfg(test)]
impl RandomPort for FixedRandom {
    fn gen_range(&self, _min: i32, _max: i32) -> i32 {
        self.0
    }
}

/// Scripted random for testing: rolls are replayed in order, the last one
/// repeating once the script runs out.
#[cfg(test)]
pub struct SequenceRandom {
    rolls: std::sync::Mutex<std::collections::VecDeque<i32>>,
    last: std::sync::atomic::AtomicI32,
}

#[cfg(test)]
impl SequenceRandom {
    pub fn new(rolls: impl IntoIterator<Item = i32>) -> Self {
        Self {
            rolls: std::sync::Mutex::new(rolls.into_iter().collect()),
            last: std::sync::atomic::AtomicI32::new(1),
        }
    }
}

#[cfg(test)]
impl RandomPort for SequenceRandom {
    fn gen_range(&self, _min: i32, _max: i32) -> i32 {
        use std::sync::atomic::Ordering;
        let next = self.rolls.lock().ok().and_then(|mut rolls| rolls.pop_front());
        match next {
            Some(roll) => {
                self.last.store(roll, Ordering::SeqCst);
                roll
            }
            None => self.last.load(Ordering::SeqCst),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_random_stays_in_inclusive_range() {
        let random = SystemRandom::new();
        for _ in 0..500 {
            let roll = random.gen_range(1, 6);
            assert!((1..=6).contains(&roll), "roll {roll} out of range");
        }
    }

    #[test]
    fn test_sequence_random_replays_then_repeats() {
        let random = SequenceRandom::new([3, 5]);
        assert_eq!(random.gen_range(1, 6), 3);
        assert_eq!(random.gen_range(1, 6), 5);
        assert_eq!(random.gen_range(1, 6), 5);
    }
}
