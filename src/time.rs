//! Conversión de fechas julianas a fechas de calendario (UTC).

use chrono::{DateTime, Datelike, Utc};
use std::fmt;

/// Día juliano que corresponde a 1970-01-01T00:00:00Z.
pub const UNIX_EPOCH_JD: f64 = 2440587.5;

pub const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Fecha juliana continua, en días.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct JulianDate(pub f64);

impl JulianDate {
    pub const UNIX_EPOCH: JulianDate = JulianDate(UNIX_EPOCH_JD);

    /// Milisegundos desde la época Unix, truncados hacia cero.
    pub fn unix_millis(self) -> i64 {
        // `as` satura: NaN -> 0, ±inf -> extremos de i64.
        ((self.0 - UNIX_EPOCH_JD) * MILLIS_PER_DAY).trunc() as i64
    }

    pub fn plus_days(self, days: f64) -> Self {
        JulianDate(self.0 + days)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Jan, Month::Feb, Month::Mar, Month::Apr,
        Month::May, Month::Jun, Month::Jul, Month::Aug,
        Month::Sep, Month::Oct, Month::Nov, Month::Dec,
    ];

    /// Índice base cero (0 = enero). Fuera de 0..12 no hay mes.
    pub fn from_index(index: usize) -> Option<Month> {
        Self::ALL.get(index).copied()
    }

    pub fn abbrev(self) -> &'static str {
        match self {
            Month::Jan => "Jan",
            Month::Feb => "Feb",
            Month::Mar => "Mar",
            Month::Apr => "Apr",
            Month::May => "May",
            Month::Jun => "Jun",
            Month::Jul => "Jul",
            Month::Aug => "Aug",
            Month::Sep => "Sep",
            Month::Oct => "Oct",
            Month::Nov => "Nov",
            Month::Dec => "Dec",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbrev())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate {
    pub year: i32,
    pub month: Month,
    pub day: u32,
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{:02}", self.year, self.month, self.day)
    }
}

/// Convierte una fecha juliana en año/mes/día UTC.
///
/// Usa la relación lineal `ms = (jd - 2440587.5) * 86400000`. Instantes fuera
/// del rango representable se recortan al extremo más cercano.
pub fn to_calendar_date(epoch: JulianDate) -> CalendarDate {
    let millis = epoch.unix_millis();
    let instant = DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or(if millis < 0 {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    });

    // month0() siempre está en 0..12
    let month = Month::from_index(instant.month0() as usize).unwrap_or(Month::Jan);

    CalendarDate {
        year: instant.year(),
        month,
        day: instant.day(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_epoch_is_jan_first_1970() {
        let date = to_calendar_date(JulianDate::UNIX_EPOCH);
        assert_eq!(date, CalendarDate { year: 1970, month: Month::Jan, day: 1 });
    }

    #[test]
    fn simulation_start_epoch() {
        // 2459642.5 = 2022-03-04T00:00Z
        let date = to_calendar_date(JulianDate(2459642.5));
        assert_eq!(date, CalendarDate { year: 2022, month: Month::Mar, day: 4 });
        assert_eq!(date.to_string(), "2022-Mar-04");
    }

    #[test]
    fn fractional_day_before_epoch_truncates_toward_zero() {
        // medio día antes de la época: 1969-12-31T12:00Z
        let date = to_calendar_date(JulianDate(UNIX_EPOCH_JD - 0.5));
        assert_eq!(date, CalendarDate { year: 1969, month: Month::Dec, day: 31 });
    }

    #[test]
    fn increasing_epochs_never_go_back_in_calendar() {
        let mut prev = to_calendar_date(JulianDate(2451544.5));
        let mut jd = 2451544.5;
        for _ in 0..2000 {
            jd += 0.73;
            let next = to_calendar_date(JulianDate(jd));
            assert!(next >= prev, "{next} < {prev}");
            prev = next;
        }
    }

    #[test]
    fn conversion_is_pure() {
        let jd = JulianDate(2460000.123);
        assert_eq!(to_calendar_date(jd), to_calendar_date(jd));
    }

    #[test]
    fn month_table_bounds() {
        assert_eq!(Month::from_index(0), Some(Month::Jan));
        assert_eq!(Month::from_index(11).map(Month::abbrev), Some("Dec"));
        assert_eq!(Month::from_index(12), None);
    }

    #[test]
    fn out_of_range_epoch_clamps() {
        let far = to_calendar_date(JulianDate(1.0e15));
        assert_eq!(far.year, DateTime::<Utc>::MAX_UTC.year());
    }
}
