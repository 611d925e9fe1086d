//! 定时报表的下次执行时间
//!
//! 按学校本地时间计算，返回 UTC。月、季、年频率以当前月份为起点，
//! `day_of_month` 超出当月天数时取月末。

use chrono::{DateTime, Datelike, Duration, FixedOffset, Months, NaiveDate, NaiveTime, Utc};

use crate::models::reports::entities::ScheduleFrequency;
use crate::services::attendance::rules::{month_end, month_start};
use crate::utils::clock::local_to_utc;

#[derive(Debug, Clone, Copy)]
pub struct Timing {
    pub frequency: ScheduleFrequency,
    pub day_of_week: Option<i32>,
    pub day_of_month: Option<i32>,
    pub hour: i32,
    pub minute: i32,
}

fn day_in_month(month: NaiveDate, day: u32) -> NaiveDate {
    let last = month_end(month);
    month_start(month)
        .with_day(day.min(last.day()))
        .unwrap_or(last)
}

pub fn next_run(timing: Timing, now: DateTime<FixedOffset>) -> Option<DateTime<Utc>> {
    let offset = *now.offset();
    let time = NaiveTime::from_hms_opt(timing.hour as u32, timing.minute as u32, 0)?;
    let at = |date: NaiveDate| local_to_utc(offset, date, time);
    let now_utc = now.with_timezone(&Utc);
    let today = now.date_naive();

    match timing.frequency {
        ScheduleFrequency::Daily => {
            let candidate = at(today);
            Some(if candidate > now_utc {
                candidate
            } else {
                at(today + Duration::days(1))
            })
        }
        ScheduleFrequency::Weekly => {
            let target = timing.day_of_week? as i64;
            let current = today.weekday().num_days_from_monday() as i64;
            let mut date = today + Duration::days((target - current).rem_euclid(7));
            if at(date) <= now_utc {
                date += Duration::days(7);
            }
            Some(at(date))
        }
        ScheduleFrequency::Monthly | ScheduleFrequency::Quarterly | ScheduleFrequency::Yearly => {
            let step = match timing.frequency {
                ScheduleFrequency::Monthly => 1,
                ScheduleFrequency::Quarterly => 3,
                _ => 12,
            };
            let day = timing.day_of_month.unwrap_or(1).max(1) as u32;
            let this_month = day_in_month(today, day);
            if at(this_month) > now_utc {
                return Some(at(this_month));
            }
            let next_month = month_start(today).checked_add_months(Months::new(step))?;
            Some(at(day_in_month(next_month, day)))
        }
        ScheduleFrequency::Custom => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn eat() -> FixedOffset {
        FixedOffset::east_opt(3 * 3600).unwrap()
    }

    // 2025-03-12 周三 10:00 (EAT)
    fn now() -> DateTime<FixedOffset> {
        eat().with_ymd_and_hms(2025, 3, 12, 10, 0, 0).unwrap()
    }

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        eat().with_ymd_and_hms(y, m, d, h, min, 0).unwrap().with_timezone(&Utc)
    }

    fn timing(frequency: ScheduleFrequency, hour: i32) -> Timing {
        Timing {
            frequency,
            day_of_week: None,
            day_of_month: None,
            hour,
            minute: 30,
        }
    }

    #[test]
    fn test_daily_rolls_to_tomorrow_when_passed() {
        assert_eq!(
            next_run(timing(ScheduleFrequency::Daily, 11), now()),
            Some(local(2025, 3, 12, 11, 30))
        );
        assert_eq!(
            next_run(timing(ScheduleFrequency::Daily, 9), now()),
            Some(local(2025, 3, 13, 9, 30))
        );
    }

    #[test]
    fn test_weekly() {
        let mut t = timing(ScheduleFrequency::Weekly, 9);
        t.day_of_week = Some(0);
        assert_eq!(next_run(t, now()), Some(local(2025, 3, 17, 9, 30)));
        // 当天已过则顺延一周
        t.day_of_week = Some(2);
        assert_eq!(next_run(t, now()), Some(local(2025, 3, 19, 9, 30)));
        t.day_of_week = None;
        assert_eq!(next_run(t, now()), None);
    }

    #[test]
    fn test_monthly_clamps_to_month_end() {
        let mut t = timing(ScheduleFrequency::Monthly, 9);
        t.day_of_month = Some(31);
        assert_eq!(next_run(t, now()), Some(local(2025, 3, 31, 9, 30)));
        t.day_of_month = Some(1);
        assert_eq!(next_run(t, now()), Some(local(2025, 4, 1, 9, 30)));

        let feb = eat().with_ymd_and_hms(2025, 1, 31, 12, 0, 0).unwrap();
        t.day_of_month = Some(31);
        assert_eq!(next_run(t, feb), Some(local(2025, 2, 28, 9, 30)));
    }

    #[test]
    fn test_quarterly_yearly_and_custom() {
        let mut t = timing(ScheduleFrequency::Quarterly, 9);
        t.day_of_month = Some(5);
        assert_eq!(next_run(t, now()), Some(local(2025, 6, 5, 9, 30)));
        t.frequency = ScheduleFrequency::Yearly;
        assert_eq!(next_run(t, now()), Some(local(2026, 3, 5, 9, 30)));
        t.frequency = ScheduleFrequency::Custom;
        assert_eq!(next_run(t, now()), None);
    }
}
