use chrono::{TimeZone, Utc};
use nutrilab::domain::{FALLBACK_STEM, safe_filename, timestamped_stem};

fn stem_is_safe(file_name: &str, extension: &str) -> bool {
    let stem = file_name
        .strip_suffix(&format!(".{}", extension))
        .unwrap_or(file_name);
    !stem.is_empty() && stem.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

#[test]
fn given_name_with_spaces_and_symbols_when_sanitizing_then_collapses_to_hyphens() {
    let name = safe_filename("My Meal Plan: Week #1!", Some("md"), 80);

    assert_eq!(name, "My-Meal-Plan-Week-1.md");
    assert!(stem_is_safe(&name, "md"));
}

#[test]
fn given_only_symbols_when_sanitizing_then_uses_fallback_stem() {
    assert_eq!(safe_filename("!!! ???", Some("png"), 80), "artifact.png");
    assert_eq!(safe_filename("", None, 80), FALLBACK_STEM);
}

#[test]
fn given_extension_with_leading_dot_when_sanitizing_then_single_dot_is_kept() {
    assert_eq!(safe_filename("clip", Some(".mp3"), 80), "clip.mp3");
    assert_eq!(safe_filename("clip", Some(""), 80), "clip");
}

#[test]
fn given_long_name_when_sanitizing_then_stem_is_truncated() {
    let name = safe_filename(&"x".repeat(200), Some("txt"), 80);

    assert_eq!(name.len(), 80 + ".txt".len());
    assert!(name.ends_with(".txt"));
}

#[test]
fn given_zero_max_length_when_sanitizing_then_name_is_not_truncated() {
    let long = "y".repeat(120);
    assert_eq!(safe_filename(&long, None, 0), long);
}

#[test]
fn given_non_ascii_name_when_sanitizing_then_only_safe_characters_remain() {
    let name = safe_filename("café déjà-vu/../etc", Some("md"), 80);

    assert!(stem_is_safe(&name, "md"));
    assert!(!name.contains('/'));
    assert!(!name.contains(".."));
}

#[test]
fn given_prefix_and_instant_when_building_stem_then_appends_compact_timestamp() {
    let at = Utc.with_ymd_and_hms(2025, 12, 31, 23, 59, 58).unwrap();
    assert_eq!(timestamped_stem("tts", at), "tts-20251231T235958");
}
