use std::{collections::HashSet, str::FromStr};

use bigdecimal::BigDecimal;

use crate::error::Error;

pub const SECONDS_IN_DAY: i64 = 24 * 60 * 60;
pub const SECONDS_IN_WEEK: i64 = 7 * SECONDS_IN_DAY;

/// How far back the daily asset value series reaches.
pub const DAYS_WINDOW: i64 = 90;

#[derive(Debug)]
pub enum Formatter {
    ParsedStr(String),
    NumberU64(u64),
}

/// Replaces `$0`, `$1`, ... in `parser` with the matching argument.
/// Placeholders are substituted from the highest index down so `$1` never
/// clobbers the prefix of `$10`.
pub fn formatter(mut parser: String, args: &[Formatter]) -> String {
    for (index, value) in args.iter().enumerate().rev() {
        let placeholder = format!("${}", index);
        match value {
            Formatter::ParsedStr(s) => {
                let parsed_string = format!(r#""{}""#, s);
                parser = parser.replace(&placeholder, &parsed_string);
            },
            Formatter::NumberU64(n) => {
                parser = parser.replace(&placeholder, &n.to_string());
            },
        }
    }
    parser
}

/// Parses a base-10 numeral into an arbitrary-precision decimal without
/// any rounding.
pub fn parse_decimal(value: &str) -> Result<BigDecimal, Error> {
    BigDecimal::from_str(value)
        .map_err(|e| Error::ParseDecimal(value.to_owned(), e))
}

pub fn day_bucket(timestamp: i64) -> i64 {
    timestamp - timestamp.rem_euclid(SECONDS_IN_DAY)
}

pub fn week_bucket(timestamp: i64) -> i64 {
    SECONDS_IN_WEEK * timestamp.div_euclid(SECONDS_IN_WEEK)
}

/// Exclusive lower bound of the daily series: midnight of `now`, minus
/// [`DAYS_WINDOW`] days.
pub fn days_window_start(now: i64) -> i64 {
    day_bucket(now) - DAYS_WINDOW * SECONDS_IN_DAY
}

/// Splits a comma separated list, dropping blanks.
pub fn parse_list(data: &str) -> Vec<String> {
    data.split(',')
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(|item| item.to_owned())
        .collect()
}

/// Ignore-list ids, matched verbatim against the ids the indexer reports.
pub fn parse_id_set(data: &str) -> HashSet<String> {
    parse_list(data).into_iter().collect()
}
