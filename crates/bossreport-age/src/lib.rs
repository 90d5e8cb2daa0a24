//! # bossreport-age
//!
//! Turns whatever birth date a form submission carries into an age in whole
//! years.
//!
//! Two input shapes are accepted:
//!
//! - decomposed `day` / `month` / `year` fields, where the month may be a
//!   numeral, a Chinese month token (一月 … 十二月) or an English month name
//! - a freeform `dob` string, read day-first
//!
//! The lenient entry point [`compute_age`] never fails: anything it cannot
//! resolve degrades to age 0. [`resolve_age`] exposes that branch explicitly
//! and [`resolve_birth_date`] is the strict variant that reports why.

mod error;
mod freeform;
mod month;
mod resolve;

pub use error::BirthDateError;
pub use freeform::parse_freeform;
pub use month::{month_from_name, resolve_month};
pub use resolve::{
    age_on, compute_age, resolve_age, resolve_birth_date, AgeResolution, BirthDateInput,
};
