//! # Pairing Engine
//!
//! Round pairing and standings for multi-round competitions.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (competitors, pairings, results, history)
//! - **schedule**: Circle-method round robin and first-mover balancing
//! - **pairing**: Pairing strategies (Round Robin, Random, King of the Hill, Australian Draw)
//! - **calculate**: Standings recalculation from the full result history
//! - **tournament**: Roster + history aggregate used by the CLI
//! - **storage**: Tournament JSON file and result submission journal
//! - **config**: Configuration loading and validation

pub mod calculate;
pub mod config;
pub mod models;
pub mod pairing;
pub mod schedule;
pub mod storage;
pub mod tournament;

pub use models::*;

use chrono::NaiveDate;

/// Parse a `YYYY-MM-DD` date as used on the command line.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-03-09"), NaiveDate::from_ymd_opt(2024, 3, 9));
    }

    #[test]
    fn test_parse_date_trims() {
        assert_eq!(parse_date(" 2024-12-31 "), NaiveDate::from_ymd_opt(2024, 12, 31));
    }

    #[test]
    fn test_parse_date_invalid() {
        assert_eq!(parse_date("09/03/2024"), None);
        assert_eq!(parse_date("2024-02-30"), None);
        assert_eq!(parse_date(""), None);
    }
}
