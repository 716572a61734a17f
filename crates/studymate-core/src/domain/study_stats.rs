use chrono::{
    DateTime, Datelike, Duration, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime,
    TimeZone, Utc,
};

use super::SubjectId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyStudyTime {
    pub date: NaiveDate,
    pub total_minutes: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectStudyTime {
    pub subject_id: SubjectId,
    pub name: String,
    pub color: String,
    pub total_minutes: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudyPeriod {
    Today,
    Week,
    Month,
    All,
}

impl StudyPeriod {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "today" => Some(StudyPeriod::Today),
            "week" => Some(StudyPeriod::Week),
            "month" => Some(StudyPeriod::Month),
            "all" => Some(StudyPeriod::All),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StudyPeriod::Today => "today",
            StudyPeriod::Week => "this week",
            StudyPeriod::Month => "this month",
            StudyPeriod::All => "all time",
        }
    }

    /// Interval covered by the period, in UTC, with an inclusive start and an
    /// exclusive end. Weeks run Monday through Sunday.
    pub fn bounds(&self, now: DateTime<Local>) -> (DateTime<Utc>, DateTime<Utc>) {
        let today = now.date_naive();

        let (first_day, day_after_last) = match self {
            StudyPeriod::Today => (today, today + Duration::days(1)),
            StudyPeriod::Week => {
                let monday =
                    today - Duration::days(today.weekday().num_days_from_monday() as i64);
                (monday, monday + Duration::days(7))
            }
            StudyPeriod::Month => {
                let first = today.with_day(1).unwrap_or(today);
                (first, first_of_next_month(first))
            }
            StudyPeriod::All => {
                // Stored timestamps compare as text, so both ends keep a
                // four digit year.
                let epoch = NaiveDateTime::default();
                let far_future = epoch + Duration::days(365 * 8000);
                return (Utc.from_utc_datetime(&epoch), Utc.from_utc_datetime(&far_future));
            }
        };

        (start_of_day(first_day), start_of_day(day_after_last))
    }
}

fn first_of_next_month(first: NaiveDate) -> NaiveDate {
    let (year, month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(first + Duration::days(31))
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    match Local.from_local_datetime(&midnight) {
        LocalResult::Single(local) => local.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => Utc.from_utc_datetime(&midnight),
    }
}
