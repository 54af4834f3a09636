use chrono::NaiveDate;

const PORTAL_DATE_FORMAT: &str = "%m/%d/%Y";

/// Convert the portal's `MM/DD/YYYY` dates to ISO `YYYY-MM-DD`.
///
/// Blank input yields `None`. Anything that does not match the portal format
/// is returned trimmed but otherwise untouched, so an unexpected upstream
/// format still shows up instead of silently disappearing.
pub fn to_iso(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match parse_portal_date(trimmed) {
        Some(date) => Some(date.format("%Y-%m-%d").to_string()),
        None => Some(trimmed.to_string()),
    }
}

// chrono's %Y accepts any number of digits, the portal always sends four.
fn parse_portal_date(s: &str) -> Option<NaiveDate> {
    let year = s.rsplit('/').next()?;
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(s, PORTAL_DATE_FORMAT).ok()
}

/// Parse an ISO date as produced by [`to_iso`].
pub fn parse_iso(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}
