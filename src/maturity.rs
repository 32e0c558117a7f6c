use chrono::{Datelike, NaiveDate};

/// add calendar months to a date, clamping the day-of-month
///
/// Jan 31 + 1 month lands on Feb 28 (29 in a leap year), matching how loan
/// maturity is quoted to customers — never a fixed 30-day multiple.
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    let total = date.year() * 12 + date.month() as i32 - 1 + months as i32;
    let year = total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));

    // day is clamped into range, construction cannot fail
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(date)
}

/// maturity date for a loan: loan date plus the scheme's validity months
///
/// Recomputed whenever the loan date or validity changes, including a scheme
/// swap after creation.
pub fn maturity_date(loan_date: NaiveDate, validity_months: u32) -> NaiveDate {
    add_months(loan_date, validity_months)
}

pub(crate) fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}
