//! daylog-core: Daylog Core Library
//!
//! 日付キーの正規化、設定、エラー型、Day レコードの永続化といった
//! コア機能を提供します。

pub mod clock;
pub mod config;
pub mod date;
pub mod error;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ApiConfig, Config, SlackConfig, StoreConfig};
pub use date::{
    MonthGrid, REFERENCE_TZ, WeekdayKey, date_key, month_grid, parse_date_key, parse_month_key,
    weekday_key,
};
pub use error::{Error, Result};
pub use store::{Day, DayRepository, DayStore};
