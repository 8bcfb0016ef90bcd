// Admin dashboard stats and per-period analytics

use std::sync::Arc;

use chrono::{DateTime, Datelike, TimeZone, Utc};

use evento_contracts::{AdminStats, AnalyticsQuery, AnalyticsSummary, MonthlyAnalytics};
use evento_core::{EventoError, Result};
use evento_storage::Database;

pub struct StatsService {
    db: Arc<Database>,
}

impl StatsService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn admin_stats(&self) -> Result<AdminStats> {
        Ok(AdminStats {
            total_students: self.db.count_students().await?,
            total_coordinators: self.db.count_coordinators().await?,
            total_events: self.db.count_events().await?,
            total_registrations: self.db.total_registrations().await?,
        })
    }

    /// Event, registration, and attendance counts for the requested month
    /// (or whole year when no month is given)
    pub async fn analytics(&self, query: AnalyticsQuery) -> Result<MonthlyAnalytics> {
        let year = query.year.unwrap_or_else(|| Utc::now().year());
        let (from, to) = period_bounds(query.month, year)?;

        let counts = self.db.analytics_between(from, to).await?;
        let attendance_rate = if counts.total_registrations > 0 {
            (counts.total_attendance * 100 + counts.total_registrations / 2)
                / counts.total_registrations
        } else {
            0
        };

        Ok(MonthlyAnalytics {
            month: query.month,
            year,
            summary: AnalyticsSummary {
                total_events: counts.total_events,
                approved_events: counts.approved_events,
                pending_events: counts.pending_events,
                rejected_events: counts.rejected_events,
                total_registrations: counts.total_registrations,
                total_attendance: counts.total_attendance,
                attendance_rate,
            },
        })
    }
}

/// Half-open [from, to) window for a month of a year, or the whole year
fn period_bounds(month: Option<u32>, year: i32) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    match month {
        None => {
            let from = start_of(year, 1)?;
            let to = start_of(year + 1, 1)?;
            Ok((from, to))
        }
        Some(m @ 1..=12) => {
            let from = start_of(year, m)?;
            let to = if m == 12 {
                start_of(year + 1, 1)?
            } else {
                start_of(year, m + 1)?
            };
            Ok((from, to))
        }
        Some(other) => Err(EventoError::validation(format!(
            "month must be 1-12, got {other}"
        ))),
    }
}

fn start_of(year: i32, month: u32) -> Result<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| EventoError::validation(format!("invalid period {year}-{month}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_window_is_half_open() {
        let (from, to) = period_bounds(Some(6), 2025).unwrap();
        assert_eq!(from, Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap());
        assert_eq!(to, Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn december_rolls_into_next_year() {
        let (_, to) = period_bounds(Some(12), 2025).unwrap();
        assert_eq!(to, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn missing_month_covers_the_year() {
        let (from, to) = period_bounds(None, 2025).unwrap();
        assert_eq!(from, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(to, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn out_of_range_month_is_rejected() {
        assert!(period_bounds(Some(13), 2025).is_err());
        assert!(period_bounds(Some(0), 2025).is_err());
    }
}
