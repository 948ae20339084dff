use std::fmt;
use std::time::Duration;

/// Wall-clock timings of the successful calls of one modality.
#[derive(Debug, Default, Clone)]
pub struct Timings {
    samples: Vec<Duration>,
}

impl Timings {
    pub fn record(&mut self, elapsed: Duration) {
        self.samples.push(elapsed);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Mean over the calls actually measured, not over the image count.
    pub fn mean(&self) -> Option<Duration> {
        if self.samples.is_empty() {
            return None;
        }
        let total: Duration = self.samples.iter().sum();
        Some(total / self.samples.len() as u32)
    }

    pub fn min(&self) -> Option<Duration> {
        self.samples.iter().min().copied()
    }

    pub fn max(&self) -> Option<Duration> {
        self.samples.iter().max().copied()
    }
}

impl fmt::Display for Timings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.mean(), self.min(), self.max()) {
            (Some(mean), Some(min), Some(max)) => write!(
                f,
                "mean {:.2}s (min {:.2}s, max {:.2}s) over {} call(s)",
                mean.as_secs_f64(),
                min.as_secs_f64(),
                max.as_secs_f64(),
                self.len()
            ),
            _ => write!(f, "no successful call"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_timings() {
        let timings = Timings::default();
        assert!(timings.mean().is_none());
        assert_eq!(timings.to_string(), "no successful call");
    }

    #[test]
    fn test_mean_min_max() {
        let mut timings = Timings::default();
        for ms in [100, 300, 200] {
            timings.record(Duration::from_millis(ms));
        }
        assert_eq!(timings.mean(), Some(Duration::from_millis(200)));
        assert_eq!(timings.min(), Some(Duration::from_millis(100)));
        assert_eq!(timings.max(), Some(Duration::from_millis(300)));
        assert_eq!(
            timings.to_string(),
            "mean 0.20s (min 0.10s, max 0.30s) over 3 call(s)"
        );
    }
}
