use chrono::{Duration, TimeZone, Utc};
use nbshare::utils::datetime::{format_human_at, format_local};

#[test]
fn test_recent_times() {
    let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();

    assert_eq!(format_human_at(now, now), "just now");
    assert_eq!(format_human_at(now - Duration::seconds(59), now), "just now");
    assert_eq!(format_human_at(now - Duration::minutes(1), now), "1 minute ago");
    assert_eq!(format_human_at(now - Duration::minutes(45), now), "45 minutes ago");
    assert_eq!(format_human_at(now - Duration::hours(1), now), "1 hour ago");
    assert_eq!(format_human_at(now - Duration::hours(23), now), "23 hours ago");
}

#[test]
fn test_days_and_older() {
    let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();

    assert_eq!(format_human_at(now - Duration::hours(30), now), "yesterday");
    assert_eq!(format_human_at(now - Duration::days(3), now), "3 days ago");

    let old = now - Duration::days(30);
    assert_eq!(format_human_at(old, now), format_local(old));
}

#[test]
fn test_future_times_read_as_now() {
    let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
    assert_eq!(format_human_at(now + Duration::minutes(5), now), "just now");
}
