use fuelportal_exporter::portal::dates::parse_iso;
use fuelportal_exporter::portal::to_iso;

#[test]
fn test_portal_date_converts_to_iso() {
    assert_eq!(to_iso("01/12/2024").as_deref(), Some("2024-01-12"));
    assert_eq!(to_iso("12/31/1999").as_deref(), Some("1999-12-31"));
}

#[test]
fn test_single_digit_month_and_day() {
    assert_eq!(to_iso("1/5/2024").as_deref(), Some("2024-01-05"));
}

#[test]
fn test_surrounding_whitespace_is_ignored() {
    assert_eq!(to_iso("  02/29/2024 \n").as_deref(), Some("2024-02-29"));
}

#[test]
fn test_blank_input_is_absent() {
    assert_eq!(to_iso(""), None);
    assert_eq!(to_iso("   "), None);
    assert_eq!(to_iso("\t\n"), None);
}

#[test]
fn test_unrecognised_text_passes_through() {
    assert_eq!(to_iso("garbled").as_deref(), Some("garbled"));
    assert_eq!(to_iso("  Pending ").as_deref(), Some("Pending"));
}

#[test]
fn test_invalid_calendar_date_passes_through() {
    // Given: Dates in the right shape that do not exist
    // Then: They are kept as raw text instead of being dropped
    assert_eq!(to_iso("02/30/2024").as_deref(), Some("02/30/2024"));
    assert_eq!(to_iso("13/01/2024").as_deref(), Some("13/01/2024"));
}

#[test]
fn test_two_digit_year_passes_through() {
    assert_eq!(to_iso("01/12/24").as_deref(), Some("01/12/24"));
}

#[test]
fn test_iso_input_is_not_reinterpreted() {
    assert_eq!(to_iso("2024-01-12").as_deref(), Some("2024-01-12"));
}

#[test]
fn test_parse_iso_reads_converted_dates() {
    let iso = to_iso("03/15/2024").unwrap();

    let date = parse_iso(&iso).expect("ISO date parses");

    assert_eq!(date.to_string(), "2024-03-15");
    assert_eq!(parse_iso("Pending"), None);
}
