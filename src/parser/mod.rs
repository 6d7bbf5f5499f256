// Heuristic transcript parser: the local fallback path when remote AI
// analysis is unavailable or fails. Pattern matching only; deterministic
// for a fixed reference date.

pub mod category;
pub mod date;
pub mod intent;
pub mod time;
pub mod title;

use chrono::NaiveDate;

use crate::task::{TaskDraft, TaskFrequency};

/// Parse a transcript into a task draft, or `None` when the utterance is
/// not a reminder request. `today` anchors the relative-date extraction.
///
/// The heuristic path never infers a recurring frequency from speech, so
/// drafts always come back with frequency `once`.
pub fn parse_transcript(transcript: &str, today: NaiveDate) -> Option<TaskDraft> {
    if !intent::is_reminder_request(transcript) {
        return None;
    }

    // Lowercase copy for keyword scans; title extraction works on the
    // original so user capitalization survives.
    let normalized = transcript.to_lowercase();
    let category = category::extract_category(&normalized);

    Some(TaskDraft {
        title: title::extract_title(transcript, category),
        time: time::extract_time(transcript),
        date: date::extract_date(&normalized, today),
        category,
        frequency: TaskFrequency::Once,
    })
}

/// `parse_transcript` anchored to the current local date.
pub fn parse_transcript_today(transcript: &str) -> Option<TaskDraft> {
    parse_transcript(transcript, chrono::Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskCategory;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_medicine_reminder_with_pm_time() {
        let draft = parse_transcript("recuérdame tomar mi medicina a las 9pm", day(2026, 8, 28))
            .expect("reminder intent");
        assert_eq!(draft.title, "tomar mi medicina");
        assert_eq!(draft.time, "21:00");
        assert_eq!(draft.date, "2026-08-28");
        assert_eq!(draft.category, TaskCategory::Medicine);
        assert_eq!(draft.frequency, TaskFrequency::Once);
    }

    #[test]
    fn test_meal_reminder_with_explicit_minutes() {
        let draft = parse_transcript("recordatorio para almorzar a las 12:30", day(2026, 8, 28))
            .expect("reminder intent");
        assert_eq!(draft.title, "almorzar");
        assert_eq!(draft.time, "12:30");
        assert_eq!(draft.category, TaskCategory::Meal);
        assert_eq!(draft.frequency, TaskFrequency::Once);
    }

    #[test]
    fn test_non_reminder_produces_no_draft() {
        assert!(parse_transcript("hola, ¿cómo estás?", day(2026, 8, 28)).is_none());
    }

    #[test]
    fn test_tomorrow_reminder() {
        let draft = parse_transcript("recuérdame mañana tomar la pastilla", day(2026, 8, 28))
            .expect("reminder intent");
        assert_eq!(draft.date, "2026-08-29");
        assert_eq!(draft.category, TaskCategory::Medicine);
    }

    #[test]
    fn test_reminder_without_time_has_empty_time() {
        let draft = parse_transcript("recuérdame llamar a mi hija", day(2026, 8, 28))
            .expect("reminder intent");
        assert_eq!(draft.time, "");
        assert_eq!(draft.date, "2026-08-28");
        assert!(draft.is_usable());
        assert!(!draft.is_complete());
    }

    #[test]
    fn test_parsing_is_idempotent() {
        let today = day(2026, 8, 28);
        let text = "recuérdame tomar mi medicina a las 9pm";
        assert_eq!(parse_transcript(text, today), parse_transcript(text, today));
    }

    #[test]
    fn test_local_drafts_are_always_usable() {
        // Intent present guarantees a title (canned fallback) and the
        // date always defaults to today.
        let draft = parse_transcript("recuérdame", day(2026, 8, 28)).expect("reminder intent");
        assert!(draft.is_usable());
        assert_eq!(draft.title, "Nuevo recordatorio");
    }
}
