//! Shared helpers for devindex-core integration tests.

#![allow(dead_code)]

pub mod fixtures;

use chrono::NaiveDate;
use devindex_core::Quality;

/// Calendar date shorthand.
pub fn day(year: i32, month: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, d).expect("valid test date")
}

/// Quality shorthand for literal ratings.
pub fn q(value: u8) -> Quality {
    Quality::from_value(value).expect("rating in 0..=5")
}
