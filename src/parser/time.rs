use once_cell::sync::Lazy;
use regex::Regex;

/// Tolerant time pattern: optional minutes, optional am/pm marker,
/// ":" "." or a space between hour and minutes. The leftmost match wins
/// when a transcript contains several numeric patterns.
pub(crate) static TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d{1,2})[:.\s]?(\d{2})?\s*(am|pm|a\.m\.|p\.m\.)?").expect("time regex is valid")
});

/// Extract a 24-hour "HH:MM" time from the transcript, or an empty
/// string when no time is present. Empty means "unspecified", never
/// midnight.
///
/// A pm marker shifts hours 1-11 forward by 12; 12pm stays 12. Without
/// a marker the digits are taken as already 24-hour.
pub fn extract_time(transcript: &str) -> String {
    let Some(caps) = TIME_RE.captures(transcript) else {
        return String::new();
    };

    let Ok(mut hour) = caps[1].parse::<u32>() else {
        return String::new();
    };
    let minutes = caps.get(2).map_or("00", |m| m.as_str());

    if let Some(marker) = caps.get(3) {
        let marker = marker.as_str().to_lowercase();
        if (marker == "pm" || marker == "p.m.") && hour < 12 {
            hour += 12;
        }
    }

    format!("{:02}:{}", hour, minutes)
}
