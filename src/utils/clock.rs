//! 学校本地时间
//!
//! 数据库中的时间戳统一为 UTC 秒；课次日期、开始时间等按学校所在时区解释。

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::config::AppConfig;

/// 学校本地当前时间
pub fn school_now() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&AppConfig::get().school_offset())
}

/// 学校本地今天
pub fn today() -> NaiveDate {
    school_now().date_naive()
}

/// 把学校本地的日期 + 时间转换为 UTC
pub fn local_to_utc(offset: FixedOffset, date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    let naive = NaiveDateTime::new(date, time);
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_to_utc_applies_offset() {
        let eat = FixedOffset::east_opt(3 * 3600).unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let time = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        let utc = local_to_utc(eat, date, time);
        assert_eq!(utc.to_rfc3339(), "2025-03-10T05:00:00+00:00");
    }

    #[test]
    fn test_local_to_utc_crosses_midnight() {
        let eat = FixedOffset::east_opt(3 * 3600).unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let time = NaiveTime::from_hms_opt(1, 30, 0).unwrap();
        let utc = local_to_utc(eat, date, time);
        assert_eq!(utc.date_naive(), NaiveDate::from_ymd_opt(2025, 3, 9).unwrap());
    }
}
