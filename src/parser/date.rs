use chrono::NaiveDate;

/// Relative-date markers recognized by the heuristic path. Deliberately
/// tiny: no "next week", no explicit calendar dates.
const TOMORROW_MARKERS: &[&str] = &["mañana", "tomorrow"];

/// Returns "YYYY-MM-DD". Defaults to `today`; a tomorrow marker moves it
/// one day forward. Expects the lowercased transcript.
pub fn extract_date(normalized: &str, today: NaiveDate) -> String {
    let date = if TOMORROW_MARKERS.iter().any(|m| normalized.contains(m)) {
        today.succ_opt().unwrap_or(today)
    } else {
        today
    };
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_defaults_to_today() {
        assert_eq!(
            extract_date("recuérdame la cita", day(2026, 8, 28)),
            "2026-08-28"
        );
    }

    #[test]
    fn test_tomorrow_marker_adds_one_day() {
        assert_eq!(
            extract_date("recuérdame mañana la cita", day(2026, 8, 28)),
            "2026-08-29"
        );
        assert_eq!(
            extract_date("remind me tomorrow", day(2026, 8, 28)),
            "2026-08-29"
        );
    }

    #[test]
    fn test_tomorrow_crosses_month_boundary() {
        assert_eq!(
            extract_date("mañana desayuno", day(2026, 8, 31)),
            "2026-09-01"
        );
    }

    #[test]
    fn test_no_other_relative_vocabulary() {
        assert_eq!(
            extract_date("recuérdame la próxima semana", day(2026, 8, 28)),
            "2026-08-28"
        );
    }
}
