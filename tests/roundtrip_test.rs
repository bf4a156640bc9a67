use gpxsplit::model::Gpx;
use gpxsplit::parser::parse_gpx;
use gpxsplit::splitter;
use gpxsplit::writer::to_string;
use time::macros::datetime;

fn load_fixture(path: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{path}")).unwrap()
}

fn round_trip(gpx: &Gpx) -> Gpx {
    parse_gpx(&to_string(gpx).unwrap()).unwrap()
}

#[test]
fn test_round_trip_complete() {
    let gpx = parse_gpx(&load_fixture("complete.gpx")).unwrap();
    assert_eq!(round_trip(&gpx), gpx);

    // spot-check that the fixture exercises what it claims to
    let meta = gpx.metadata.as_ref().unwrap();
    assert_eq!(meta.time, Some(datetime!(2025-06-01 08:30:00 UTC)));
    assert_eq!(gpx.waypoints.len(), 2);
    assert_eq!(gpx.waypoints[0].hdop, Some(1.5));
    assert_eq!(
        gpx.waypoints[0].time,
        Some(datetime!(2025-06-01 09:00:00.5 UTC))
    );
    assert_eq!(gpx.waypoints[1].name.as_deref(), Some("Lunch & rest"));
    assert_eq!(gpx.routes.len(), 1);
    assert_eq!(gpx.tracks.len(), 3);
    assert_eq!(gpx.tracks[0].segments.len(), 2);
    assert_eq!(gpx.tracks[0].segments[0].points.len(), 2);
    assert_eq!(gpx.tracks[0].segments[1].points.len(), 1);
    // the last track carries an empty segment, which must survive
    assert_eq!(gpx.tracks[2].segments.len(), 1);
    assert!(gpx.tracks[2].segments[0].points.is_empty());
}

#[test]
fn test_round_trip_preserves_decimal_text() {
    let gpx = parse_gpx(&load_fixture("complete.gpx")).unwrap();
    let encoded = to_string(&gpx).unwrap();
    assert!(encoded.contains("<hdop>1.5</hdop>"));
    assert!(encoded.contains("<ele>41.25</ele>"));
}

#[test]
fn test_presence_minimal() {
    let gpx = parse_gpx(&load_fixture("minimal.gpx")).unwrap();
    let point = &gpx.waypoints[0];
    assert_eq!(point.ele, None);
    assert_eq!(point.time, None);
    assert_eq!(point.name, None);
    assert_eq!(point.fix, None);
    assert!(point.links.is_empty());

    let encoded = to_string(&gpx).unwrap();
    assert!(encoded.contains(r#"<wpt lat="1" lon="2"/>"#));
    assert_eq!(round_trip(&gpx), gpx);
}

#[test]
fn test_split_partition() {
    let gpx = parse_gpx(&load_fixture("complete.gpx")).unwrap();

    let wpt_doc = splitter::waypoints_only(&gpx);
    let track_docs = splitter::per_track(&gpx);

    assert_eq!(track_docs.len(), 3);
    assert_eq!(wpt_doc.waypoints.len(), 2);
    assert!(wpt_doc.routes.is_empty());
    assert!(wpt_doc.tracks.is_empty());

    for (i, doc) in track_docs.iter().enumerate() {
        assert!(doc.waypoints.is_empty());
        assert!(doc.routes.is_empty());
        assert_eq!(doc.tracks.len(), 1);
        assert_eq!(doc.tracks[0], gpx.tracks[i]);
        assert_eq!(doc.metadata, gpx.metadata);
    }
    assert_eq!(wpt_doc.metadata, gpx.metadata);
}

#[test]
fn test_split_documents_round_trip() {
    let gpx = parse_gpx(&load_fixture("complete.gpx")).unwrap();

    let mut derived = vec![splitter::waypoints_only(&gpx)];
    derived.extend(splitter::per_track(&gpx));

    for doc in &derived {
        assert_eq!(&round_trip(doc), doc);
    }
}
