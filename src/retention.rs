use std::collections::HashSet;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

/// The fixed date pattern an index name must carry for age rules to apply.
const DATE_PATTERN: &str = "%Y.%m.%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Excluded,
    TooOld,
    TooNew,
    InWindow,
    Unstamped,
}

impl Verdict {
    pub fn deletable(&self) -> bool {
        matches!(self, Verdict::TooOld | Verdict::TooNew)
    }
}

#[derive(Debug, Clone)]
pub struct RetentionPolicy {
    pub excluded: HashSet<String>,
    pub max_age_days: i64,
    pub grace_future_days: i64,
}

impl RetentionPolicy {
    /// Classifies one index name against the retention window at `now`.
    /// The exclusion list wins over every age rule, and a name without a
    /// parseable date stamp is never too old or too new.
    pub fn evaluate(&self, name: &str, now: DateTime<Utc>) -> Verdict {
        if self.excluded.contains(name) {
            return Verdict::Excluded;
        }

        let stamp = match index_date(name) {
            Some(stamp) => stamp,
            None => return Verdict::Unstamped,
        };

        if stamp < now - Duration::days(self.max_age_days) {
            Verdict::TooOld
        } else if self.grace_future_days > 0
            && stamp > now + Duration::days(self.grace_future_days)
        {
            Verdict::TooNew
        } else {
            Verdict::InWindow
        }
    }

    pub fn is_deletable(&self, name: &str, now: DateTime<Utc>) -> bool {
        self.evaluate(name, now).deletable()
    }
}

/// Parses the `YYYY.MM.DD` stamp as midnight UTC of that day.
fn index_date(name: &str) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(name, DATE_PATTERN).ok()?;
    Some(date.and_time(NaiveTime::MIN).and_utc())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::{TimeZone, Utc};

    use crate::retention::{RetentionPolicy, Verdict};

    fn policy(grace_future_days: i64) -> RetentionPolicy {
        RetentionPolicy {
            excluded: HashSet::from([".kibana".to_string()]),
            max_age_days: 14,
            grace_future_days,
        }
    }

    #[test]
    fn verdicts_without_future_grace() {
        let now = Utc.with_ymd_and_hms(2020, 2, 1, 0, 0, 0).unwrap();
        let cases = Vec::from([
            ("2020.01.01", Verdict::TooOld),
            ("2020.01.17", Verdict::TooOld),
            ("2020.01.18", Verdict::InWindow), // exactly at the cutoff, strict comparison
            ("2020.01.31", Verdict::InWindow),
            ("2099.01.01", Verdict::InWindow),
            (".kibana", Verdict::Excluded),
            ("not-a-date", Verdict::Unstamped),
            ("2020-01-01", Verdict::Unstamped),
            ("", Verdict::Unstamped),
        ]);

        let p = policy(0);
        for (name, verdict) in cases {
            assert_eq!(p.evaluate(name, now), verdict, "{}", name);
        }
    }

    #[test]
    fn verdicts_with_future_grace() {
        let now = Utc.with_ymd_and_hms(2020, 2, 1, 0, 0, 0).unwrap();
        let cases = Vec::from([
            ("2020.01.01", Verdict::TooOld),
            ("2020.01.31", Verdict::InWindow),
            ("2020.02.02", Verdict::InWindow),
            ("2020.02.03", Verdict::InWindow), // exactly at the grace boundary
            ("2020.02.04", Verdict::TooNew),
            ("2099.01.01", Verdict::TooNew),
        ]);

        let p = policy(2);
        for (name, verdict) in cases {
            assert_eq!(p.evaluate(name, now), verdict, "{}", name);
        }
    }

    #[test]
    fn exclusion_wins_over_age() {
        let now = Utc.with_ymd_and_hms(2020, 2, 1, 0, 0, 0).unwrap();
        let mut p = policy(2);
        p.excluded.insert("2019.01.01".to_string());
        p.excluded.insert("2099.01.01".to_string());

        assert!(!p.is_deletable("2019.01.01", now));
        assert!(!p.is_deletable("2099.01.01", now));
    }

    #[test]
    fn exclusion_is_exact_match() {
        let now = Utc.with_ymd_and_hms(2020, 2, 1, 0, 0, 0).unwrap();
        let p = policy(0);

        assert!(!p.is_deletable(".kibana-7", now)); // unstamped, not excluded
        assert_eq!(p.evaluate(".kibana-7", now), Verdict::Unstamped);
    }
}
