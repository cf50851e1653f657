//! Reduces raw forecast samples into hourly or daily chart series.

use chrono::{DateTime, Datelike, FixedOffset, Offset, Utc};

use crate::types::{AggregateError, AggregatedSeries, ForecastMode, RawSample};

/// Samples kept in hourly mode
pub const HOURLY_SAMPLES: usize = 16;
/// Calendar days kept in daily mode
pub const DAILY_BUCKETS: usize = 5;

const IST_OFFSET_SECS: i32 = 330 * 60;

/// Turns samples into labelled series, with dates taken in a fixed local
/// offset so the output does not depend on the host time zone.
#[derive(Debug, Clone, Copy)]
pub struct ForecastAggregator {
    offset: FixedOffset,
}

impl Default for ForecastAggregator {
    fn default() -> Self {
        Self::from_offset_minutes(IST_OFFSET_SECS / 60)
    }
}

impl ForecastAggregator {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Falls back to UTC when `minutes` is outside ±24h.
    pub fn from_offset_minutes(minutes: i32) -> Self {
        let offset = minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| {
                tracing::warn!("Invalid UTC offset of {} minutes, using UTC", minutes);
                Utc.fix()
            });
        Self { offset }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn aggregate(
        &self,
        samples: &[RawSample],
        mode: ForecastMode,
    ) -> Result<AggregatedSeries, AggregateError> {
        if samples.is_empty() {
            return Err(AggregateError::EmptyInput);
        }

        let series = match mode {
            ForecastMode::Hourly => self.hourly(samples),
            ForecastMode::Daily => self.daily(samples),
        };
        Ok(series)
    }

    fn local(&self, sample: &RawSample) -> Option<DateTime<FixedOffset>> {
        let local = DateTime::from_timestamp(sample.timestamp, 0)
            .map(|utc| utc.with_timezone(&self.offset));
        if local.is_none() {
            tracing::debug!("Skipping sample with out-of-range timestamp {}", sample.timestamp);
        }
        local
    }

    /// `"DD/MM, h AM"` labels for the first samples, in order.
    fn hourly(&self, samples: &[RawSample]) -> AggregatedSeries {
        samples
            .iter()
            .take(HOURLY_SAMPLES)
            .filter_map(|s| {
                let at = self.local(s)?;
                let label = format!("{}, {}", at.format("%d/%m"), at.format("%-I %p"));
                Some((label, s.temperature))
            })
            .collect()
    }

    /// Highest `temp_max` per `"<day>/<month>"`, keys in first-seen order.
    fn daily(&self, samples: &[RawSample]) -> AggregatedSeries {
        let mut days: Vec<(String, f64)> = Vec::new();

        for sample in samples {
            let Some(at) = self.local(sample) else {
                continue;
            };
            let key = format!("{}/{}", at.day(), at.month());

            match days.iter_mut().find(|(k, _)| *k == key) {
                Some((_, max)) => *max = max.max(sample.temp_max),
                None => days.push((key, sample.temp_max)),
            }
        }

        days.truncate(DAILY_BUCKETS);
        days.into_iter().collect()
    }
}
