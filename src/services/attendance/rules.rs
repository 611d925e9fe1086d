//! 考勤计算规则：出勤率、准时率、迟到分钟、二维码校验、汇总周期

use chrono::{DateTime, Datelike, Duration, FixedOffset, Months, NaiveDate, Utc};

use crate::models::attendance::entities::{AttendanceSession, PeriodType, SessionStatus, Trend};
use crate::utils::clock::local_to_utc;

/// 趋势判定阈值（百分点）
const TREND_THRESHOLD: f64 = 0.5;

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// part / total × 100，total 为 0 时返回 0
pub fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(part as f64 / total as f64 * 100.0)
}

pub fn attendance_rate(present: u64, total: u64) -> f64 {
    percentage(present, total)
}

/// (present − late) / present × 100
pub fn punctuality_rate(present: u64, late: u64) -> f64 {
    percentage(present.saturating_sub(late), present)
}

/// 半天出勤按 0.5 计
pub fn weighted_rate(present: u64, half_day: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2((present as f64 + half_day as f64 * 0.5) / total as f64 * 100.0)
}

/// 签到时间晚于开始时间的分钟数，不足一分钟不计
pub fn late_minutes(session_start: DateTime<Utc>, check_in: DateTime<Utc>) -> i32 {
    let minutes = (check_in - session_start).num_minutes();
    minutes.clamp(0, i32::MAX as i64) as i32
}

/// 课次开始时刻（UTC）
pub fn session_start(session: &AttendanceSession, offset: FixedOffset) -> DateTime<Utc> {
    local_to_utc(offset, session.session_date, session.start_time)
}

/// 进行中且尚未超过结束时间
pub fn is_active(session: &AttendanceSession, now: DateTime<Utc>, offset: FixedOffset) -> bool {
    session.status == SessionStatus::Ongoing
        && now <= local_to_utc(offset, session.session_date, session.end_time)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QrRejection {
    Invalid,
    Expired,
}

/// 校验扫码内容与有效期
pub fn check_qr_code(
    session: &AttendanceSession,
    code: &str,
    now: DateTime<Utc>,
) -> Result<(), QrRejection> {
    match session.qr_code_data.as_deref() {
        Some(expected) if !expected.is_empty() && expected == code.trim() => {}
        _ => return Err(QrRejection::Invalid),
    }
    if qr_expired(session, now) {
        return Err(QrRejection::Expired);
    }
    Ok(())
}

/// 未设置有效期的二维码不过期
pub fn qr_expired(session: &AttendanceSession, now: DateTime<Utc>) -> bool {
    session.qr_code_expiry.is_some_and(|expiry| now > expiry)
}

/// 汇总周期的起止日
///
/// 周汇总为起始日 + 6 天；月汇总的起始日归到当月 1 日，结束于月末。
/// 超出可表示日期时返回 None。
pub fn period_bounds(period_type: PeriodType, start: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    match period_type {
        PeriodType::Weekly => Some((start, start.checked_add_signed(Duration::days(6))?)),
        PeriodType::Monthly => {
            let start = month_start(start);
            Some((start, month_end(start)))
        }
    }
}

/// 上一个同类周期的起始日
pub fn previous_period_start(period_type: PeriodType, start: NaiveDate) -> Option<NaiveDate> {
    match period_type {
        PeriodType::Weekly => start.checked_sub_signed(Duration::days(7)),
        PeriodType::Monthly => month_start(start).checked_sub_months(Months::new(1)),
    }
}

pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// 只有可表示的最后一个月会加不出下个月，其月末即 `NaiveDate::MAX`
pub fn month_end(date: NaiveDate) -> NaiveDate {
    month_start(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

pub fn trend(current: f64, previous: Option<f64>) -> Trend {
    match previous {
        Some(previous) if current - previous > TREND_THRESHOLD => Trend::Up,
        Some(previous) if previous - current > TREND_THRESHOLD => Trend::Down,
        _ => Trend::Stable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attendance::entities::AttendanceMethod;
    use chrono::{NaiveTime, TimeZone};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn session(status: SessionStatus) -> AttendanceSession {
        let now = Utc::now();
        AttendanceSession {
            id: 1,
            class_id: 7,
            instructor_id: 3,
            session_date: date(2025, 3, 10),
            start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            topic_covered: String::new(),
            venue: "Workshop 2".to_string(),
            attendance_method: AttendanceMethod::QrCode,
            qr_code_data: Some("ATTENDANCE_7_abc".to_string()),
            qr_code_expiry: Some(Utc.with_ymd_and_hms(2025, 3, 10, 7, 0, 0).unwrap()),
            status,
            total_present: 0,
            total_absent: 0,
            total_late: 0,
            created_at: now,
            updated_at: now,
            closed_at: None,
        }
    }

    fn eat() -> FixedOffset {
        FixedOffset::east_opt(3 * 3600).unwrap()
    }

    #[test]
    fn test_rates() {
        assert_eq!(attendance_rate(0, 0), 0.0);
        assert_eq!(attendance_rate(2, 3), 66.67);
        assert_eq!(attendance_rate(5, 5), 100.0);
        assert_eq!(punctuality_rate(0, 0), 0.0);
        assert_eq!(punctuality_rate(4, 1), 75.0);
        assert_eq!(weighted_rate(3, 2, 5), 80.0);
        assert_eq!(weighted_rate(1, 1, 0), 0.0);
    }

    #[test]
    fn test_late_minutes() {
        let start = Utc.with_ymd_and_hms(2025, 3, 10, 5, 0, 0).unwrap();
        assert_eq!(late_minutes(start, start + Duration::seconds(59)), 0);
        assert_eq!(late_minutes(start, start + Duration::minutes(17)), 17);
        assert_eq!(late_minutes(start, start - Duration::minutes(5)), 0);
    }

    #[test]
    fn test_session_start_uses_school_offset() {
        let s = session(SessionStatus::Ongoing);
        assert_eq!(
            session_start(&s, eat()),
            Utc.with_ymd_and_hms(2025, 3, 10, 5, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_is_active() {
        let s = session(SessionStatus::Ongoing);
        // 本地 10:00 结束，即 UTC 07:00
        assert!(is_active(&s, Utc.with_ymd_and_hms(2025, 3, 10, 6, 59, 0).unwrap(), eat()));
        assert!(!is_active(&s, Utc.with_ymd_and_hms(2025, 3, 10, 7, 1, 0).unwrap(), eat()));
        let scheduled = session(SessionStatus::Scheduled);
        assert!(!is_active(&scheduled, Utc.with_ymd_and_hms(2025, 3, 10, 6, 0, 0).unwrap(), eat()));
    }

    #[test]
    fn test_qr_code_checks() {
        let s = session(SessionStatus::Ongoing);
        let before = Utc.with_ymd_and_hms(2025, 3, 10, 6, 0, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2025, 3, 10, 7, 30, 0).unwrap();
        assert_eq!(check_qr_code(&s, "ATTENDANCE_7_abc", before), Ok(()));
        assert_eq!(check_qr_code(&s, "ATTENDANCE_7_xyz", before), Err(QrRejection::Invalid));
        assert_eq!(check_qr_code(&s, "ATTENDANCE_7_abc", after), Err(QrRejection::Expired));
        assert!(qr_expired(&s, after));

        let mut manual = session(SessionStatus::Ongoing);
        manual.qr_code_data = None;
        assert_eq!(check_qr_code(&manual, "", before), Err(QrRejection::Invalid));
    }

    #[test]
    fn test_qr_without_expiry_stays_valid() {
        let mut s = session(SessionStatus::Ongoing);
        s.qr_code_expiry = None;
        let much_later = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(check_qr_code(&s, "ATTENDANCE_7_abc", much_later), Ok(()));
        assert!(!qr_expired(&s, much_later));
    }

    #[test]
    fn test_period_bounds() {
        assert_eq!(
            period_bounds(PeriodType::Weekly, date(2025, 3, 3)),
            Some((date(2025, 3, 3), date(2025, 3, 9)))
        );
        assert_eq!(
            period_bounds(PeriodType::Monthly, date(2024, 2, 1)),
            Some((date(2024, 2, 1), date(2024, 2, 29)))
        );
        assert_eq!(
            previous_period_start(PeriodType::Weekly, date(2025, 3, 3)),
            Some(date(2025, 2, 24))
        );
        assert_eq!(
            previous_period_start(PeriodType::Monthly, date(2025, 3, 1)),
            Some(date(2025, 2, 1))
        );
    }

    #[test]
    fn test_monthly_period_starts_on_first_day() {
        assert_eq!(
            period_bounds(PeriodType::Monthly, date(2025, 12, 15)),
            Some((date(2025, 12, 1), date(2025, 12, 31)))
        );
        assert_eq!(
            previous_period_start(PeriodType::Monthly, date(2025, 3, 20)),
            Some(date(2025, 2, 1))
        );
    }

    #[test]
    fn test_period_bounds_at_calendar_edges() {
        assert_eq!(period_bounds(PeriodType::Weekly, NaiveDate::MAX), None);
        assert_eq!(
            period_bounds(PeriodType::Monthly, NaiveDate::MAX).map(|(_, end)| end),
            Some(NaiveDate::MAX)
        );
        assert_eq!(previous_period_start(PeriodType::Weekly, NaiveDate::MIN), None);
        assert_eq!(month_end(NaiveDate::MAX), NaiveDate::MAX);
    }

    #[test]
    fn test_trend_threshold() {
        assert_eq!(trend(80.0, None), Trend::Stable);
        assert_eq!(trend(80.6, Some(80.0)), Trend::Up);
        assert_eq!(trend(80.5, Some(80.0)), Trend::Stable);
        assert_eq!(trend(79.4, Some(80.0)), Trend::Down);
    }
}
