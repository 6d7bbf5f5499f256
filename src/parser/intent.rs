use once_cell::sync::Lazy;
use regex::Regex;

/// Reminder trigger phrases. Intent detection and title splitting share
/// this one case-insensitive pattern so both steps agree on where the
/// phrase sits in the original transcript, regardless of casing.
///
/// Longer variants are listed before their prefixes ("recordatorio para"
/// before "recordatorio", "recordarme" before "recordar") so the
/// alternation prefers them when both match at the same position.
pub(crate) static TRIGGER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)recuérdame|recordarme|recordatorio para|recordatorio|recordar|remind me to|reminder to|remember to|remind",
    )
    .expect("trigger phrase regex is valid")
});

/// True only when the transcript contains a reminder trigger phrase.
/// A false result is a normal negative, not an error: the utterance is
/// simply not a task-creation request.
pub fn is_reminder_request(transcript: &str) -> bool {
    TRIGGER_RE.is_match(transcript)
}
