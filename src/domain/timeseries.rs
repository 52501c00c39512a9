// Historic timeseries domain models
use super::channel::ChannelAddress;
use super::error::DashboardError;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use std::collections::HashMap;

/// Displayed period of a history chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryPeriod {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl HistoryPeriod {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Self, DashboardError> {
        if to < from {
            return Err(DashboardError::InvalidPeriod(format!(
                "end {to} is before start {from}"
            )));
        }
        Ok(Self { from, to })
    }

    /// Period covering whole calendar days: start of `from` until the last second of `to`.
    pub fn from_dates(from: NaiveDate, to: NaiveDate) -> Result<Self, DashboardError> {
        let start = from.and_time(NaiveTime::MIN).and_utc();
        let end = to.and_time(NaiveTime::MIN).and_utc() + Duration::days(1) - Duration::seconds(1);
        Self::new(start, end)
    }

    /// Number of full days between start and end.
    pub fn whole_days(&self) -> i64 {
        (self.to - self.from).num_days()
    }

    /// Half-open range sent to the data source; the end is the start of the day after `to`.
    pub fn query_range(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let end = self.to.date_naive().and_time(NaiveTime::MIN).and_utc() + Duration::days(1);
        (self.from, end)
    }
}

/// Response of a historic data query: shared timestamps and one aligned
/// value sequence per channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoricTimeseries {
    pub timestamps: Vec<DateTime<Utc>>,
    data: HashMap<ChannelAddress, Vec<Option<f64>>>,
}

impl HistoricTimeseries {
    pub fn new(timestamps: Vec<DateTime<Utc>>) -> Self {
        Self {
            timestamps,
            data: HashMap::new(),
        }
    }

    pub fn with_channel(mut self, address: ChannelAddress, values: Vec<Option<f64>>) -> Self {
        self.insert(address, values);
        self
    }

    pub fn insert(&mut self, address: ChannelAddress, values: Vec<Option<f64>>) {
        self.data.insert(address, values);
    }

    /// Values of a channel, or `None` when the response does not contain it.
    pub fn channel(&self, address: &ChannelAddress) -> Option<&[Option<f64>]> {
        self.data.get(address).map(Vec::as_slice)
    }

    pub fn channel_count(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_from_dates_covers_whole_days() {
        let period = HistoryPeriod::from_dates(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        )
        .unwrap();
        assert_eq!(period.from, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        assert_eq!(period.to, Utc.with_ymd_and_hms(2024, 3, 1, 23, 59, 59).unwrap());
        assert_eq!(
            period.query_range().1,
            Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap()
        );
        assert_eq!(period.whole_days(), 0);
    }

    #[test]
    fn test_rejects_reversed_period() {
        let from = Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert!(matches!(
            HistoryPeriod::new(from, to),
            Err(DashboardError::InvalidPeriod(_))
        ));
    }

    #[test]
    fn test_channel_lookup_distinguishes_absent() {
        let present = ChannelAddress::new("_sum", "EssSoc");
        let series = HistoricTimeseries::new(vec![])
            .with_channel(present.clone(), vec![Some(1.0), None]);

        assert_eq!(series.channel(&present), Some(&[Some(1.0), None][..]));
        assert_eq!(series.channel(&ChannelAddress::new("_sum", "GridActivePower")), None);
    }
}
