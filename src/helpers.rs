use chrono::{DateTime, Utc};

pub(crate) fn format_relative_time(timestamp: DateTime<Utc>) -> String {
    format_relative_time_from(timestamp, Utc::now())
}

fn format_relative_time_from(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(timestamp);
    if delta.num_minutes() < 1 {
        return "just now".to_string();
    }

    let (count, unit) = if delta.num_hours() < 1 {
        (delta.num_minutes(), "minute")
    } else if delta.num_days() < 1 {
        (delta.num_hours(), "hour")
    } else {
        (delta.num_days(), "day")
    };

    let plural = if count == 1 { "" } else { "s" };
    format!("{} {}{} ago", count, unit, plural)
}

/// Turns a user-typed manager address into a base URL.
pub(crate) fn normalize_manager_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}

/// Store pages are looked up as `<directory><name>.json`, so the directory
/// always needs its trailing slash.
pub(crate) fn normalize_store_directory(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn relative_time_buckets() {
        let now = Utc::now();
        assert_eq!(format_relative_time_from(now, now), "just now");
        assert_eq!(
            format_relative_time_from(now - Duration::minutes(1), now),
            "1 minute ago"
        );
        assert_eq!(
            format_relative_time_from(now - Duration::hours(3), now),
            "3 hours ago"
        );
        assert_eq!(
            format_relative_time_from(now - Duration::days(15), now),
            "15 days ago"
        );
    }

    #[test]
    fn manager_url_gets_scheme() {
        assert_eq!(normalize_manager_url("pr2.local:8080/"), "http://pr2.local:8080");
        assert_eq!(
            normalize_manager_url("https://robot.example.org"),
            "https://robot.example.org"
        );
        assert_eq!(
            normalize_store_directory("http://apps.example.org/store"),
            "http://apps.example.org/store/"
        );
    }
}
