//! Wording and timestamp helpers shared by the formatters

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

/// Parse the timestamp formats found in GitLab payloads
///
/// Newer payloads use RFC 3339; pipeline and job hooks still send
/// `2016-08-12 15:23:28 UTC` or `2016-08-12 15:23:28 +0200`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S %z") {
        return Some(ts.with_timezone(&Utc));
    }
    raw.strip_suffix(" UTC")
        .and_then(|naive| NaiveDateTime::parse_from_str(naive, "%Y-%m-%d %H:%M:%S").ok())
        .map(|naive| naive.and_utc())
}

/// ISO-8601 UTC rendering; unparsable input is returned as-is
pub fn normalize_timestamp(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| raw.to_string())
}

/// `Mon, 12 Dec 2011 12:27:31 GMT` rendering used in commit lists
pub fn human_timestamp(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|ts| ts.format("%a, %d %b %Y %H:%M:%S GMT").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Past tense of a merge request or issue action
pub fn past_tense(action: &str) -> String {
    match action {
        "open" => "opened".to_string(),
        "reopen" => "reopened".to_string(),
        "close" => "closed".to_string(),
        "merge" => "merged".to_string(),
        "update" => "updated".to_string(),
        "approve" => "approved".to_string(),
        "unapprove" => "unapproved".to_string(),
        other => other.to_string(),
    }
}

pub fn pluralize(count: u64, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_rfc3339_with_offset() {
        assert_eq!(
            normalize_timestamp("2011-12-12T14:27:31+02:00"),
            "2011-12-12T12:27:31.000Z"
        );
    }

    #[test]
    fn test_normalize_gitlab_formats() {
        assert_eq!(
            normalize_timestamp("2016-08-12 15:23:28 UTC"),
            "2016-08-12T15:23:28.000Z"
        );
        assert_eq!(
            normalize_timestamp("2016-08-12 17:23:28 +0200"),
            "2016-08-12T15:23:28.000Z"
        );
        assert_eq!(normalize_timestamp("yesterday"), "yesterday");
    }

    #[test]
    fn test_human_timestamp() {
        assert_eq!(
            human_timestamp("2011-12-12T14:27:31+02:00"),
            "Mon, 12 Dec 2011 12:27:31 GMT"
        );
    }

    #[test]
    fn test_wording() {
        assert_eq!(past_tense("merge"), "merged");
        assert_eq!(past_tense("approved"), "approved");
        assert_eq!(pluralize(1, "commit"), "1 commit");
        assert_eq!(pluralize(3, "commit"), "3 commits");
    }
}
