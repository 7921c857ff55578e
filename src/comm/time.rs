use chrono::{DateTime, Local, Utc};

/// 当前时间（毫秒时间戳）/ Current epoch milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// 消息展示用时间 `HH:MM:SS`（本地时区）
/// Display time `HH:MM:SS` in the local timezone
pub fn clock_label() -> String {
    format_clock(&Local::now())
}

pub fn format_clock<Tz: chrono::TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_clock_zero_pads() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 3).unwrap();
        assert_eq!(format_clock(&at), "07:05:03");
    }

    #[test]
    fn test_clock_label_shape() {
        let label = clock_label();
        assert_eq!(label.len(), 8);
        assert_eq!(label.matches(':').count(), 2);
    }
}
