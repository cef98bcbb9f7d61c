use chrono::{DateTime, Local, NaiveDate, Utc};

/// Source of "today" for entry dates.
///
/// The system clock reads the local calendar date, since that is the day the
/// tutor sees. Fixed clocks read their instant in UTC so tests do not depend on
/// the machine's time zone.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    #[must_use]
    pub fn default_clock() -> Self {
        Self::System
    }

    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    #[must_use]
    pub fn today(&self) -> NaiveDate {
        match self {
            Clock::System => Local::now().date_naive(),
            Clock::Fixed(t) => t.date_naive(),
        }
    }

    /// Today's date in the `M/D/YYYY` form tutors see on the entry form.
    #[must_use]
    pub fn today_label(&self) -> String {
        self.today().format("%-m/%-d/%Y").to_string()
    }
}

/// 2023-11-14T22:13:20Z, late enough in the UTC day that a local-time
/// label would already read the 15th east of Greenwich.
///
/// # Panics
///
/// Panics if the timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(1_700_000_000, 0).expect("fixed timestamp should be valid")
}

#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn today_label_uses_unpadded_month_and_day() {
        assert_eq!(fixed_clock().today_label(), "11/14/2023");
        let new_year = DateTime::<Utc>::from_timestamp(1_704_153_600, 0).unwrap();
        assert_eq!(Clock::fixed(new_year).today_label(), "1/2/2024");
    }

    #[test]
    fn system_clock_labels_the_local_date() {
        let before = Local::now().date_naive();
        let label = Clock::default_clock().today_label();
        let after = Local::now().date_naive();
        let expected: Vec<String> = [before, after]
            .iter()
            .map(|d| d.format("%-m/%-d/%Y").to_string())
            .collect();
        assert!(expected.contains(&label), "{label} not in {expected:?}");
    }
}
