//! Health computations
//!
//! BMI, latest-day averages and form validation. No I/O here.

mod average;
mod bmi;
mod form;

pub use average::{latest_day_average, DailyAverage};
pub use bmi::{
    calculate_bmi, display_bmi, parse_bmi, Bmi, BmiClass, BMI_PLACEHOLDER, IDEAL_BMI_RANGE,
};
pub use form::{EntryForm, FormError};
