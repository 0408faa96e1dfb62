use chrono::{Days, NaiveDate};
use std::fmt;

/// Which upstream price a single fetch asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchWhen {
    /// The current-price endpoint.
    Today,
    /// The historical endpoint for an explicit date.
    On(NaiveDate),
}

impl fmt::Display for FetchWhen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchWhen::Today => write!(f, "today"),
            FetchWhen::On(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

/// The set of fetches to make for every city in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPlan {
    /// Current price only.
    Today,
    /// Yesterday from the historical endpoint, then the current price.
    TodayAndYesterday,
    /// Historical prices for today and the `n - 1` days before it.
    LastDays(u32),
}

impl FetchPlan {
    /// Expand into fetch targets relative to `today`, in request order.
    pub fn targets(&self, today: NaiveDate) -> Vec<FetchWhen> {
        match self {
            FetchPlan::Today => vec![FetchWhen::Today],
            FetchPlan::TodayAndYesterday => {
                let mut targets = Vec::with_capacity(2);
                if let Some(yesterday) = today.checked_sub_days(Days::new(1)) {
                    targets.push(FetchWhen::On(yesterday));
                }
                targets.push(FetchWhen::Today);
                targets
            }
            FetchPlan::LastDays(n) => (0..u64::from(*n))
                .filter_map(|delta| today.checked_sub_days(Days::new(delta)))
                .map(FetchWhen::On)
                .collect(),
        }
    }
}

impl fmt::Display for FetchPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchPlan::Today => write!(f, "today"),
            FetchPlan::TodayAndYesterday => write!(f, "today+yesterday"),
            FetchPlan::LastDays(n) => write!(f, "last {n} days"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_today_plan_is_single_current_fetch() {
        assert_eq!(FetchPlan::Today.targets(d(2024, 5, 2)), vec![FetchWhen::Today]);
    }

    #[test]
    fn test_yesterday_comes_first() {
        let targets = FetchPlan::TodayAndYesterday.targets(d(2024, 3, 1));
        assert_eq!(targets, vec![FetchWhen::On(d(2024, 2, 29)), FetchWhen::Today]);
    }

    #[test]
    fn test_last_days_counts_back_from_today() {
        let targets = FetchPlan::LastDays(3).targets(d(2024, 1, 2));
        assert_eq!(
            targets,
            vec![
                FetchWhen::On(d(2024, 1, 2)),
                FetchWhen::On(d(2024, 1, 1)),
                FetchWhen::On(d(2023, 12, 31)),
            ]
        );
    }

    #[test]
    fn test_last_zero_days_is_empty() {
        assert!(FetchPlan::LastDays(0).targets(d(2024, 1, 2)).is_empty());
    }

    #[test]
    fn test_display_formats_date() {
        assert_eq!(FetchWhen::On(d(2024, 1, 9)).to_string(), "2024-01-09");
    }
}
