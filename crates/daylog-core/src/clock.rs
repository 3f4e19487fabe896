//! Reference clock
//!
//! "今日" の判定はすべてこのトレイト経由で行い、テストでは固定時刻に
//! 差し替えられるようにします。

use chrono::{DateTime, Utc};

use crate::date::date_key;

/// Source of the current instant
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;

    /// Today's date key in the reference timezone
    fn today_key(&self) -> String {
        date_key(&self.now())
    }
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a single instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_clock_today_key() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 3, 2, 2, 0, 0).unwrap());
        assert_eq!(clock.today_key(), "2024-03-01");
    }

    #[test]
    fn test_system_clock_today_key_shape() {
        let key = SystemClock.today_key();
        assert!(crate::date::parse_date_key(&key).is_ok());
    }
}
