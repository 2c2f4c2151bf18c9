//! Log query building
//!
//! Turns the optional `from`, `to` and `limit` query parameters into a single
//! [`ExerciseFilter`] and runs it against the store.
//!
//! A parameter counts as present when it was supplied with non-blank text.
//! Each bound applies on its own, whatever the other two parameters are:
//!
//! | from | to | limit | filter                         |
//! |------|----|-------|--------------------------------|
//! | yes  | yes| any   | `from <= date <= to`           |
//! | yes  | no | any   | `date >= from`                 |
//! | no   | yes| any   | `date <= to`                   |
//! | no   | no | any   | no date condition              |
//!
//! with `limit`, when present, capping the result count (`0` caps at zero).
//! An unparseable bound does not fail the request; it simply matches nothing.

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::{
    dates,
    error::{ApiError, ApiResult},
    models::{User, exercise::LogResponse},
    repositories::{ExerciseFilter, TrackerStore},
};

/// Raw query string of the log endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogQueryParams {
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<String>,
}

/// Outcome of reading one date bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateBound {
    Absent,
    Valid(NaiveDate),
    Invalid,
}

impl DateBound {
    fn read(raw: Option<&str>) -> Self {
        match present(raw) {
            None => DateBound::Absent,
            Some(text) => dates::parse_date(text).map_or(DateBound::Invalid, DateBound::Valid),
        }
    }

    fn date(self) -> Option<NaiveDate> {
        match self {
            DateBound::Valid(date) => Some(date),
            DateBound::Absent | DateBound::Invalid => None,
        }
    }
}

/// Non-blank, trimmed parameter text
fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|text| !text.is_empty())
}

/// Non-negative integer cap; digit strings too large for `u64` clamp to `u64::MAX`
fn read_limit(raw: Option<&str>) -> ApiResult<Option<u64>> {
    present(raw)
        .map(|text| match text.parse::<u64>() {
            Ok(limit) => Ok(limit),
            Err(_) if text.bytes().all(|b| b.is_ascii_digit()) => Ok(u64::MAX),
            Err(_) => Err(ApiError::Validation(format!("Invalid limit: {text}"))),
        })
        .transpose()
}

/// Build the store filter for `user_id` from the raw query parameters
///
/// Fails only on a `limit` that is not a non-negative integer.
pub fn build_filter(user_id: Uuid, params: &LogQueryParams) -> ApiResult<ExerciseFilter> {
    let from = DateBound::read(params.from.as_deref());
    let to = DateBound::read(params.to.as_deref());
    let limit = read_limit(params.limit.as_deref())?;

    Ok(ExerciseFilter {
        from: from.date(),
        to: to.date(),
        limit,
        impossible: from == DateBound::Invalid || to == DateBound::Invalid,
        ..ExerciseFilter::for_user(user_id)
    })
}

/// Fetch `user`'s log filtered by `params`
pub async fn fetch_log(
    store: &dyn TrackerStore,
    user: &User,
    params: &LogQueryParams,
) -> ApiResult<LogResponse> {
    let filter = build_filter(user.id, params)?;
    debug!(?filter, "Querying exercise log");

    let exercises = store.find_exercises(&filter).await?;
    Ok(LogResponse::new(user, exercises))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::exercise::NewExercise, repositories::MemoryTrackerStore};

    const FROM: &str = "2023-01-10";
    const TO: &str = "2023-01-20";
    const LIMIT: &str = "3";

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn params(from: Option<&str>, to: Option<&str>, limit: Option<&str>) -> LogQueryParams {
        LogQueryParams {
            from: from.map(str::to_string),
            to: to.map(str::to_string),
            limit: limit.map(str::to_string),
        }
    }

    #[test]
    fn test_decision_table() {
        let user_id = Uuid::new_v4();
        let from = Some(ymd(2023, 1, 10));
        let to = Some(ymd(2023, 1, 20));
        let limit = Some(3);

        let cases = [
            (Some(FROM), Some(TO), Some(LIMIT), from, to, limit),
            (Some(FROM), Some(TO), None, from, to, None),
            (Some(FROM), None, Some(LIMIT), from, None, limit),
            (Some(FROM), None, None, from, None, None),
            (None, Some(TO), Some(LIMIT), None, to, limit),
            (None, Some(TO), None, None, to, None),
            (None, None, Some(LIMIT), None, None, limit),
            (None, None, None, None, None, None),
        ];

        for (raw_from, raw_to, raw_limit, want_from, want_to, want_limit) in cases {
            let filter = build_filter(user_id, &params(raw_from, raw_to, raw_limit)).unwrap();
            let expected = ExerciseFilter {
                user_id,
                from: want_from,
                to: want_to,
                limit: want_limit,
                impossible: false,
            };
            assert_eq!(filter, expected, "from={raw_from:?} to={raw_to:?} limit={raw_limit:?}");
        }
    }

    #[test]
    fn test_blank_parameters_are_absent() {
        let filter =
            build_filter(Uuid::new_v4(), &params(Some(""), Some("  "), Some(""))).unwrap();

        assert_eq!(filter.from, None);
        assert_eq!(filter.to, None);
        assert_eq!(filter.limit, None);
        assert!(!filter.impossible);
    }

    #[test]
    fn test_zero_limit_is_present() {
        let filter = build_filter(Uuid::new_v4(), &params(None, None, Some("0"))).unwrap();
        assert_eq!(filter.limit, Some(0));
    }

    #[test]
    fn test_unparseable_bound_matches_nothing() {
        let filter =
            build_filter(Uuid::new_v4(), &params(Some("whenever"), Some(TO), None)).unwrap();

        assert!(filter.impossible);
        assert_eq!(filter.from, None);
        assert_eq!(filter.to, Some(ymd(2023, 1, 20)));
    }

    #[test]
    fn test_bad_limit_is_rejected() {
        for raw in ["ten", "-1", "2.5"] {
            let err = build_filter(Uuid::new_v4(), &params(None, None, Some(raw))).unwrap_err();
            assert!(matches!(err, ApiError::Validation(_)), "limit {raw}");
        }
    }

    #[test]
    fn test_large_limit_is_clamped() {
        let limit = |raw| {
            build_filter(Uuid::new_v4(), &params(None, None, Some(raw)))
                .unwrap()
                .limit
        };

        assert_eq!(limit("5000000000"), Some(5_000_000_000));
        assert_eq!(limit("99999999999999999999999"), Some(u64::MAX));
    }

    #[tokio::test]
    async fn test_fetch_log_applies_filter() {
        let store = MemoryTrackerStore::new();
        let user = store.create_user("ada").await.unwrap();
        for day in [1, 10, 15, 20, 25] {
            store
                .create_exercise(&NewExercise {
                    user_id: user.id,
                    description: format!("day {day}"),
                    duration: f64::from(day),
                    date: ymd(2023, 1, day),
                })
                .await
                .unwrap();
        }

        let log = fetch_log(&store, &user, &params(Some(FROM), Some(TO), None))
            .await
            .unwrap();
        assert_eq!(log.count, 3);
        assert_eq!(log.log.len(), 3);
        assert_eq!(log.username, "ada");

        let capped = fetch_log(&store, &user, &params(None, Some(TO), Some("1")))
            .await
            .unwrap();
        assert_eq!(capped.count, 1);
        assert_eq!(capped.log[0].description, "day 1");

        let nothing = fetch_log(&store, &user, &params(Some("garbage"), None, None))
            .await
            .unwrap();
        assert_eq!(nothing.count, 0);
        assert!(nothing.log.is_empty());
    }
}
