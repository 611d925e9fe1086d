//! 日期范围预设与时间分桶

use chrono::{Datelike, Duration, NaiveDate};

use crate::models::reports::requests::{DateRangePreset, GroupBy};
use crate::models::reports::responses::ReportGroup;
use crate::services::attendance::rules::{month_end, month_start};

/// 本周一
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date.checked_sub_signed(Duration::days(date.weekday().num_days_from_monday() as i64))
        .unwrap_or(date)
}

/// 自定义日期范围：起始不晚于结束，跨度（含首尾）不超过 `max_days` 天
pub fn check_range(start: NaiveDate, end: NaiveDate, max_days: i64) -> Result<(), String> {
    if start > end {
        return Err("Start date must not be after end date".to_string());
    }
    if (end - start).num_days() >= max_days {
        return Err(format!("Date range must not exceed {max_days} days"));
    }
    Ok(())
}

fn last_month(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let end = month_start(today).pred_opt().unwrap_or(today);
    (month_start(end), end)
}

fn last_week(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = week_start(today) - Duration::days(7);
    (start, start + Duration::days(6))
}

/// 报表用：本周、本月截至今天；无法识别或自定义不完整时取最近 30 天
///
/// 完整的自定义范围须通过 [`check_range`]。
pub fn report_range(
    preset: Option<DateRangePreset>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    today: NaiveDate,
    max_days: i64,
) -> Result<(NaiveDate, NaiveDate), String> {
    let range = match preset {
        Some(DateRangePreset::Today) => (today, today),
        Some(DateRangePreset::Yesterday) => {
            let yesterday = today - Duration::days(1);
            (yesterday, yesterday)
        }
        Some(DateRangePreset::ThisWeek) => (week_start(today), today),
        Some(DateRangePreset::LastWeek) => last_week(today),
        Some(DateRangePreset::ThisMonth) => (month_start(today), today),
        Some(DateRangePreset::LastMonth) => last_month(today),
        Some(DateRangePreset::Custom) => match (start, end) {
            (Some(start), Some(end)) => {
                check_range(start, end, max_days)?;
                (start, end)
            }
            _ => last_thirty_days(today),
        },
        None => last_thirty_days(today),
    };
    Ok(range)
}

fn last_thirty_days(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    (today - Duration::days(30), today)
}

/// 考勤筛选用：本周、本月取完整的周和月；条件无效（含越界的自定义范围）时返回 None
pub fn filter_range(
    preset: Option<&str>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    today: NaiveDate,
    max_days: i64,
) -> Option<(NaiveDate, NaiveDate)> {
    let preset = preset?.parse::<DateRangePreset>().ok()?;
    let range = match preset {
        DateRangePreset::Today => (today, today),
        DateRangePreset::Yesterday => {
            let yesterday = today - Duration::days(1);
            (yesterday, yesterday)
        }
        DateRangePreset::ThisWeek => {
            let start = week_start(today);
            (start, start + Duration::days(6))
        }
        DateRangePreset::LastWeek => last_week(today),
        DateRangePreset::ThisMonth => (month_start(today), month_end(today)),
        DateRangePreset::LastMonth => last_month(today),
        DateRangePreset::Custom => {
            let (start, end) = (start?, end?);
            check_range(start, end, max_days).ok()?;
            (start, end)
        }
    };
    Some(range)
}

/// 时间分组的键：日 `YYYY-MM-DD`，周 `YYYY-Www`（ISO 周），月 `YYYY-MM`
pub fn time_key(group_by: GroupBy, date: NaiveDate) -> Option<String> {
    match group_by {
        GroupBy::Day => Some(date.format("%Y-%m-%d").to_string()),
        GroupBy::Week => {
            let week = date.iso_week();
            Some(format!("{}-W{:02}", week.year(), week.week()))
        }
        GroupBy::Month => Some(date.format("%Y-%m").to_string()),
        _ => None,
    }
}

fn bucket(key: String, label: String, start: NaiveDate, end: NaiveDate) -> ReportGroup {
    ReportGroup {
        key,
        label,
        start_date: Some(start),
        end_date: Some(end),
        ..Default::default()
    }
}

/// 预先生成范围内的全部时间分组（计数为 0）
pub fn time_buckets(group_by: GroupBy, start: NaiveDate, end: NaiveDate) -> Vec<ReportGroup> {
    let mut buckets = Vec::new();
    match group_by {
        GroupBy::Day => {
            let mut current = start;
            while current <= end {
                buckets.push(bucket(
                    current.format("%Y-%m-%d").to_string(),
                    current.format("%d/%m").to_string(),
                    current,
                    current,
                ));
                let Some(next) = current.succ_opt() else { break };
                current = next;
            }
        }
        GroupBy::Week => {
            let mut current = week_start(start);
            while current <= end {
                let week_end = current.checked_add_signed(Duration::days(6)).unwrap_or(NaiveDate::MAX);
                let label = format!("{} - {}", current.format("%d/%m"), week_end.format("%d/%m"));
                if let Some(key) = time_key(GroupBy::Week, current) {
                    buckets.push(bucket(key, label, current, week_end));
                }
                let Some(next) = current.checked_add_signed(Duration::days(7)) else { break };
                current = next;
            }
        }
        GroupBy::Month => {
            let mut current = month_start(start);
            while current <= end {
                buckets.push(bucket(
                    current.format("%Y-%m").to_string(),
                    current.format("%B %Y").to_string(),
                    current,
                    month_end(current),
                ));
                let Some(next) = month_end(current).succ_opt() else { break };
                current = next;
            }
        }
        _ => {}
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // 2025-03-12 是周三
    const WED: (i32, u32, u32) = (2025, 3, 12);

    fn today() -> NaiveDate {
        date(WED.0, WED.1, WED.2)
    }

    const MAX_DAYS: i64 = 366;

    #[test]
    fn test_report_range_presets() {
        let t = today();
        assert_eq!(report_range(Some(DateRangePreset::Today), None, None, t, MAX_DAYS).unwrap(), (t, t));
        assert_eq!(
            report_range(Some(DateRangePreset::ThisWeek), None, None, t, MAX_DAYS).unwrap(),
            (date(2025, 3, 10), t)
        );
        assert_eq!(
            report_range(Some(DateRangePreset::LastWeek), None, None, t, MAX_DAYS).unwrap(),
            (date(2025, 3, 3), date(2025, 3, 9))
        );
        assert_eq!(
            report_range(Some(DateRangePreset::ThisMonth), None, None, t, MAX_DAYS).unwrap(),
            (date(2025, 3, 1), t)
        );
        assert_eq!(
            report_range(Some(DateRangePreset::LastMonth), None, None, t, MAX_DAYS).unwrap(),
            (date(2025, 2, 1), date(2025, 2, 28))
        );
    }

    #[test]
    fn test_report_range_falls_back_to_thirty_days() {
        let t = today();
        let fallback = (date(2025, 2, 10), t);
        assert_eq!(report_range(None, None, None, t, MAX_DAYS).unwrap(), fallback);
        assert_eq!(
            report_range(Some(DateRangePreset::Custom), Some(date(2025, 1, 1)), None, t, MAX_DAYS).unwrap(),
            fallback
        );
    }

    #[test]
    fn test_filter_range_full_periods() {
        let t = today();
        assert_eq!(
            filter_range(Some("this_week"), None, None, t, MAX_DAYS),
            Some((date(2025, 3, 10), date(2025, 3, 16)))
        );
        assert_eq!(
            filter_range(Some("this_month"), None, None, t, MAX_DAYS),
            Some((date(2025, 3, 1), date(2025, 3, 31)))
        );
        assert_eq!(
            filter_range(Some("last_month"), None, None, date(2025, 1, 15), MAX_DAYS),
            Some((date(2024, 12, 1), date(2024, 12, 31)))
        );
        assert_eq!(filter_range(Some("custom"), Some(t), None, t, MAX_DAYS), None);
        assert_eq!(filter_range(Some("fortnight"), None, None, t, MAX_DAYS), None);
        assert_eq!(filter_range(None, None, None, t, MAX_DAYS), None);
    }

    #[test]
    fn test_custom_range_bounds() {
        let t = today();
        assert_eq!(
            report_range(Some(DateRangePreset::Custom), Some(date(2025, 1, 1)), Some(t), t, MAX_DAYS),
            Ok((date(2025, 1, 1), t))
        );
        // 起止颠倒
        assert!(report_range(Some(DateRangePreset::Custom), Some(t), Some(date(2025, 1, 1)), t, MAX_DAYS).is_err());
        // 跨度过大
        assert!(
            report_range(Some(DateRangePreset::Custom), Some(date(1000, 1, 1)), Some(t), t, MAX_DAYS).is_err()
        );
        assert!(
            report_range(Some(DateRangePreset::Custom), Some(NaiveDate::MIN), Some(NaiveDate::MAX), t, MAX_DAYS)
                .is_err()
        );
        assert_eq!(filter_range(Some("custom"), Some(t), Some(date(2025, 1, 1)), t, MAX_DAYS), None);
        assert!(check_range(t, t, 1).is_ok());
        assert!(check_range(t, t.succ_opt().unwrap(), 1).is_err());
    }

    #[test]
    fn test_buckets_stop_at_calendar_end() {
        let day = time_buckets(GroupBy::Day, NaiveDate::MAX, NaiveDate::MAX);
        assert_eq!(day.len(), 1);
        let week = time_buckets(GroupBy::Week, NaiveDate::MAX, NaiveDate::MAX);
        assert_eq!(week.len(), 1);
        let month = time_buckets(GroupBy::Month, NaiveDate::MAX, NaiveDate::MAX);
        assert_eq!(month.len(), 1);
        assert_eq!(week_start(NaiveDate::MIN), NaiveDate::MIN);
    }

    #[test]
    fn test_week_buckets_cover_partial_weeks() {
        // 周三到下周一，跨两个 ISO 周
        let buckets = time_buckets(GroupBy::Week, date(2025, 3, 12), date(2025, 3, 17));
        let keys: Vec<&str> = buckets.iter().map(|b| b.key.as_str()).collect();
        assert_eq!(keys, vec!["2025-W11", "2025-W12"]);
        assert_eq!(buckets[0].label, "10/03 - 16/03");
    }

    #[test]
    fn test_month_and_day_buckets() {
        let months = time_buckets(GroupBy::Month, date(2024, 12, 20), date(2025, 2, 3));
        let labels: Vec<&str> = months.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["December 2024", "January 2025", "February 2025"]);

        let days = time_buckets(GroupBy::Day, date(2025, 3, 1), date(2025, 3, 3));
        assert_eq!(days.len(), 3);
        assert_eq!(days[2].key, "2025-03-03");
        assert_eq!(days[2].label, "03/03");
        assert!(time_buckets(GroupBy::Class, date(2025, 3, 1), date(2025, 3, 3)).is_empty());
    }

    #[test]
    fn test_iso_week_key_at_year_boundary() {
        assert_eq!(
            time_key(GroupBy::Week, date(2024, 12, 30)).as_deref(),
            Some("2025-W01")
        );
    }
}
