//! Human-readable "time since" labels for message previews.
//!
//! Days, hours and minutes are each truncated independently from the raw
//! elapsed duration. Any gap of seven days or more collapses into the single
//! `"1 week ago"` bucket: a message from last year reads the same as one from
//! eight days ago. Clients rely on that label set, so the bucket does not
//! scale.

use chrono::{DateTime, Utc};

/// Label describing how long before `now` the instant `then` was.
///
/// `then` is expected to be no later than `now`; a future `then` yields
/// `"Now"`.
pub fn relative_label(now: DateTime<Utc>, then: DateTime<Utc>) -> String {
  let elapsed = now.signed_duration_since(then);
  let days = elapsed.num_days();
  let hours = elapsed.num_hours();
  let minutes = elapsed.num_minutes();

  if days < 1 {
    if hours < 1 {
      return match minutes {
        m if m < 1 => "Now".to_owned(),
        1 => "1 min ago".to_owned(),
        m => format!("{m} mins ago"),
      };
    }
    return match hours {
      1 => "1 hour ago".to_owned(),
      h if h < 12 => format!("{h} hours ago"),
      _ => "Today".to_owned(),
    };
  }

  match days {
    1 => "1 day ago".to_owned(),
    d if d < 7 => format!("{d} days ago"),
    _ => "1 week ago".to_owned(),
  }
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, TimeZone};

  use super::*;

  fn now() -> DateTime<Utc> { Utc.with_ymd_and_hms(2024, 5, 17, 18, 30, 0).unwrap() }

  fn ago(d: Duration) -> String { relative_label(now(), now() - d) }

  #[test]
  fn same_instant_is_now() {
    assert_eq!(relative_label(now(), now()), "Now");
    assert_eq!(ago(Duration::seconds(59)), "Now");
  }

  #[test]
  fn minutes() {
    assert_eq!(ago(Duration::seconds(60)), "1 min ago");
    assert_eq!(ago(Duration::seconds(90)), "1 min ago");
    assert_eq!(ago(Duration::seconds(150)), "2 mins ago");
    assert_eq!(ago(Duration::minutes(59)), "59 mins ago");
  }

  #[test]
  fn hours() {
    assert_eq!(ago(Duration::minutes(60)), "1 hour ago");
    assert_eq!(ago(Duration::minutes(90)), "1 hour ago");
    assert_eq!(ago(Duration::minutes(150)), "2 hours ago");
    assert_eq!(ago(Duration::hours(11) + Duration::minutes(59)), "11 hours ago");
  }

  #[test]
  fn twelve_hours_or_more_is_today() {
    assert_eq!(ago(Duration::hours(12)), "Today");
    assert_eq!(ago(Duration::hours(13)), "Today");
    assert_eq!(ago(Duration::hours(23) + Duration::minutes(59)), "Today");
  }

  #[test]
  fn days() {
    assert_eq!(ago(Duration::hours(24)), "1 day ago");
    assert_eq!(ago(Duration::hours(25)), "1 day ago");
    assert_eq!(ago(Duration::hours(47)), "1 day ago");
    assert_eq!(ago(Duration::days(3)), "3 days ago");
    assert_eq!(ago(Duration::days(6) + Duration::hours(23)), "6 days ago");
  }

  #[test]
  fn week_bucket_does_not_scale() {
    assert_eq!(ago(Duration::days(7)), "1 week ago");
    assert_eq!(ago(Duration::days(10)), "1 week ago");
    assert_eq!(ago(Duration::days(40)), "1 week ago");
    assert_eq!(ago(Duration::days(800)), "1 week ago");
  }

  #[test]
  fn future_instant_reads_as_now() {
    assert_eq!(ago(Duration::seconds(-30)), "Now");
  }
}
