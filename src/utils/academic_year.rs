use chrono::{DateTime, Datelike, Utc};

/// 根据日期推断学年，形如 `"2025-2026"`
///
/// 月份 >= 起始月（默认 9 月）时学年为 `{Y}-{Y+1}`，否则为 `{Y-1}-{Y}`。
pub fn academic_year_for(at: DateTime<Utc>, start_month: u32) -> String {
    let year = at.year();
    if at.month() >= start_month {
        format!("{}-{}", year, year + 1)
    } else {
        format!("{}-{}", year - 1, year)
    }
}
