use chrono::{Datelike, NaiveDate};

use crate::entities::bilingual::Locale;

const MONTHS_EN: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

const MONTHS_ES: [&str; 12] = [
    "enero", "febrero", "marzo", "abril", "mayo", "junio",
    "julio", "agosto", "septiembre", "octubre", "noviembre", "diciembre",
];

/// "March 2024" / "marzo de 2024"
pub fn format_month_year(date: NaiveDate, locale: Locale) -> String {
    let month = date.month0() as usize;
    match locale {
        Locale::En => format!("{} {}", MONTHS_EN[month], date.year()),
        Locale::Es => format!("{} de {}", MONTHS_ES[month], date.year()),
    }
}

pub fn present_label(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "Present",
        Locale::Es => "Presente",
    }
}

/// Formats a period; an open end renders as "Present"/"Presente".
pub fn format_date_range(start: NaiveDate, end: Option<NaiveDate>, locale: Locale) -> String {
    let start = format_month_year(start, locale);
    let end = end
        .map(|end| format_month_year(end, locale))
        .unwrap_or_else(|| present_label(locale).to_string());
    format!("{start} - {end}")
}
