//! Data access port trait.

use crate::domain::bar::Bar;
use crate::domain::error::GoldtrendError;
use chrono::NaiveDateTime;

pub trait DataPort {
    fn fetch_bars(
        &self,
        symbol: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Bar>, GoldtrendError>;

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDateTime, NaiveDateTime, usize)>, GoldtrendError>;
}
