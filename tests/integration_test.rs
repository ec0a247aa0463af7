use quick_xml::events::Event;
use quick_xml::Reader;
use wod2gpx::errors::AppError;
use wod2gpx::gpx_writer::{records_to_waypoints, write_gpx, GpxOptions};
use wod2gpx::wod_parser::{parse_file, parse_text, Boundary, DEFAULT_SEPARATOR};
use wod2gpx::{convert, ConvertSummary};

fn load_fixture(path: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{path}")).unwrap()
}

fn separator() -> Boundary {
    Boundary::separator(DEFAULT_SEPARATOR).unwrap()
}

fn render(text: &str, boundary: &Boundary, opts: &GpxOptions) -> (ConvertSummary, String) {
    let mut buf: Vec<u8> = Vec::new();
    let summary = convert(text, boundary, opts, &mut buf).unwrap();
    (summary, String::from_utf8(buf).unwrap())
}

/// Walk the document with a real XML reader; panics if it is not well formed.
fn count_elements(xml: &str, tag: &[u8]) -> usize {
    let mut reader = Reader::from_str(xml);
    let mut n = 0;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == tag => n += 1,
            Ok(Event::Eof) => break,
            Err(e) => panic!("malformed GPX: {e}"),
            _ => {}
        }
    }
    n
}

// ---- separator-delimited ----

#[test]
fn separator_fixture_counts() {
    let (summary, xml) = render(&load_fixture("separator.txt"), &separator(), &GpxOptions::default());
    assert_eq!(summary, ConvertSummary { records: 3, waypoints: 2 });
    assert_eq!(count_elements(&xml, b"gpx"), 1);
    assert_eq!(count_elements(&xml, b"wpt"), 2);
    assert_eq!(count_elements(&xml, b"time"), 1);
}

#[test]
fn separator_fixture_waypoints() {
    let records = parse_text(&load_fixture("separator.txt"), &separator());
    let wpts = records_to_waypoints(&records, &GpxOptions::default()).unwrap();

    assert_eq!(wpts[0].lat, "12.500");
    assert_eq!(wpts[0].lon, "-45.000");
    assert_eq!(wpts[0].name, "ST-01");
    assert_eq!(
        wpts[0].description,
        "CAST: 9023121\nNODC Cruise ID: US-10918\nOriginators Cruise ID: KN-042"
    );
    assert_eq!(wpts[0].time.as_deref(), Some("1970-03-19T17:18:00+00:00"));

    // no Year, so no time
    assert_eq!(wpts[1].name, "N/A");
    assert_eq!(wpts[1].time, None);
}

#[test]
fn both_boundary_modes_agree_on_separated_file() {
    let text = load_fixture("separator.txt");
    let by_sep = parse_text(&text, &separator());
    let by_cast = parse_text(&text, &Boundary::default());
    assert_eq!(by_sep, by_cast);
}

// ---- sentinel-delimited ----

#[test]
fn sentinel_fixture_with_comment() {
    let opts = GpxOptions { comment: Some("Survey A".into()), ..GpxOptions::default() };
    let records = parse_text(&load_fixture("sentinel.txt"), &Boundary::default());
    assert_eq!(records.len(), 2);

    let wpts = records_to_waypoints(&records, &opts).unwrap();
    assert_eq!(wpts.len(), 2);
    assert_eq!(wpts[0].time.as_deref(), Some("1985-11-02T06:07:30+00:00"));
    assert_eq!(wpts[1].time.as_deref(), Some("1985-11-03T00:00:00+00:00"));
    assert_eq!(
        wpts[1].description.lines().collect::<Vec<_>>(),
        ["Survey A", "CAST: 1500002", "NODC Cruise ID: N/A", "Originators Cruise ID: HK-77"]
    );
}

#[test]
fn sentinel_file_without_separators_is_one_record() {
    let records = parse_text(&load_fixture("sentinel.txt"), &separator());
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("CAST"), Some("1500002"));
}

#[test]
fn parse_file_reads_from_disk() {
    let records = parse_file(std::path::Path::new("tests/fixtures/sentinel.txt"), &Boundary::default()).unwrap();
    assert_eq!(records.len(), 2);
    let missing = parse_file(std::path::Path::new("tests/fixtures/missing.txt"), &Boundary::default());
    assert!(matches!(missing, Err(AppError::IO(_))));
}

// ---- document-level properties ----

#[test]
fn empty_input_is_an_empty_document() {
    let separators_only = format!("#{0}\n#{0}\n", "-".repeat(80));
    for text in ["", "#--------\n\n", separators_only.as_str()] {
        let (summary, xml) = render(text, &separator(), &GpxOptions::default());
        assert_eq!(summary, ConvertSummary { records: 0, waypoints: 0 });
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n"));
        assert_eq!(count_elements(&xml, b"gpx"), 1);
        assert_eq!(count_elements(&xml, b"wpt"), 0);
    }
}

#[test]
fn custom_symbol_and_creator() {
    let opts = GpxOptions {
        symbol: "Flag, Blue".into(),
        creator: "survey-tools".into(),
        ..GpxOptions::default()
    };
    let (_, xml) = render(&load_fixture("sentinel.txt"), &Boundary::default(), &opts);
    assert!(xml.contains("creator=\"survey-tools\""));
    assert!(xml.contains("xmlns=\"http://www.topografix.com/GPX/1/1\""));
    assert_eq!(xml.matches("<sym>Flag, Blue</sym>").count(), 2);
}

#[test]
fn one_bad_date_aborts_everything() {
    let text = "CAST,,1,,\nLatitude,,1,,\nLongitude,,2,,\n\
                CAST,,2,,\nLatitude,,1,,\nLongitude,,2,,\nYear,,1970,,\nMonth,,13,,\nDay,,1,,\n";
    let records = parse_text(text, &Boundary::default());
    let mut buf: Vec<u8> = Vec::new();
    let err = write_gpx(&records, &mut buf, &GpxOptions::default()).unwrap_err();
    assert!(matches!(err, AppError::InvalidDate(_)));
    assert!(buf.is_empty());
}

#[test]
fn waypoints_never_exceed_records() {
    let text = "CAST,,1,,\nLatitude,,1,,\nCAST,,2,,\nLongitude,,2,,\nCAST,,3,,\nLatitude,,3,,\nLongitude,,4,,\n";
    let (summary, xml) = render(text, &Boundary::default(), &GpxOptions::default());
    assert_eq!(summary, ConvertSummary { records: 3, waypoints: 1 });
    assert_eq!(count_elements(&xml, b"wpt"), 1);
}
