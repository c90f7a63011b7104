use std::time::Duration;

use rand::Rng;

use crate::settings::DelayRange;

/// Courtesy pause between outbound requests.
#[allow(async_fn_in_trait)]
pub trait Throttle {
    async fn wait(&self);
}

/// Sleeps a uniformly random duration within fixed bounds.
#[derive(Debug, Clone, Copy)]
pub struct RandomDelay {
    min_secs: f64,
    max_secs: f64,
}

impl RandomDelay {
    pub fn new(range: DelayRange) -> Self {
        let min_secs = range.min_secs.max(0.0);
        let max_secs = range.max_secs.max(min_secs);
        RandomDelay { min_secs, max_secs }
    }

    pub fn next_delay(&self) -> Duration {
        if self.max_secs <= self.min_secs {
            return Duration::from_secs_f64(self.min_secs);
        }
        let secs = rand::thread_rng().gen_range(self.min_secs..=self.max_secs);
        Duration::from_secs_f64(secs)
    }
}

impl Throttle for RandomDelay {
    async fn wait(&self) {
        tokio::time::sleep(self.next_delay()).await;
    }
}

/// Never waits.
#[cfg(test)]
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[cfg(test)]
impl Throttle for NoDelay {
    async fn wait(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_stays_within_bounds() {
        let d = RandomDelay::new(DelayRange::new(1.0, 3.0));
        for _ in 0..200 {
            let secs = d.next_delay().as_secs_f64();
            assert!((1.0..=3.0).contains(&secs), "out of range: {}", secs);
        }
    }

    #[test]
    fn inverted_or_negative_range_is_clamped() {
        let d = RandomDelay::new(DelayRange::new(2.0, 1.0));
        assert_eq!(d.next_delay(), Duration::from_secs(2));

        let d = RandomDelay::new(DelayRange::new(-1.0, 0.0));
        assert_eq!(d.next_delay(), Duration::ZERO);
    }
}
