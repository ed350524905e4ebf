use chrono::Duration;
use harbor_core::{
    Error, Mmsi, PairStatus, VesselLookup, default_sync_tolerance, ingest, lookup_distance,
    pairwise_reports, synchronize,
};

use crate::helper::{document, observation};

fn two_vessel_document() -> String {
    document(vec![
        observation(222, "tanker", "Tanker", "2021-03-01T12:11:00+00:00", 29.0, -94.0),
        observation(111, "tug", "Tug", "2021-03-01T12:10:00+00:00", 29.05, -94.05),
        observation(111, "tug", "Tug", "2021-03-01T12:00:00+00:00", 29.0, -94.0),
        observation(222, "tanker", "Tanker", "2021-03-01T12:01:00+00:00", 29.05, -94.05),
        observation(111, "tug", "Tug", "2021-03-01T12:05:00+00:00", 29.5, -94.5),
    ])
}

#[test]
fn test_unsorted_document_is_synchronized_end_to_end() {
    let dataset = ingest(&two_vessel_document()).unwrap();
    assert!(dataset.fleet.iter().all(|v| v.is_sorted()));

    let groups = dataset.fleet.split_by_type("Tug");
    let outcomes = pairwise_reports(&groups, default_sync_tolerance());

    assert_eq!(outcomes.len(), 1);
    let report = outcomes[0].report().unwrap();
    assert_eq!(report.label, "tug <-> tanker");
    assert!((report.start_distance_km - 7.3854).abs() < 0.001);
    assert!((report.end_distance_km - 7.3854).abs() < 0.001);
}

#[test]
fn test_synchronized_windows_are_within_tolerance() {
    let dataset = ingest(&two_vessel_document()).unwrap();
    let tolerance = Duration::minutes(2);

    let tug = dataset.fleet.vessel(Mmsi::test_new(111)).unwrap();
    let tanker = dataset.fleet.vessel(Mmsi::test_new(222)).unwrap();
    let pair = synchronize(tug, tanker, tolerance).unwrap();

    assert!((pair.primary_start().timestamp - pair.secondary_start().timestamp).abs() <= tolerance);
    assert!((pair.primary_end().timestamp - pair.secondary_end().timestamp).abs() <= tolerance);
    assert_eq!(pair.primary().len(), 3);
}

#[test]
fn test_summary_counts_repeated_mmsis() {
    let dataset = ingest(&two_vessel_document()).unwrap();

    assert_eq!(dataset.summary.num_observations, 5);
    assert_eq!(dataset.summary.total_mmsis, 2);
    assert_eq!(dataset.summary.duplicate_mmsis, 3);
    assert_eq!(dataset.summary.vessel_names, vec!["tanker", "tug"]);
    assert_eq!(dataset.mmsis().collect::<Vec<_>>(), vec![
        Mmsi::test_new(111),
        Mmsi::test_new(222)
    ]);
}

#[test]
fn test_unexpected_field_rejects_the_whole_document() {
    let mut invalid = observation(2, "b", "Tanker", "2021-03-01T12:00:00", 29.0, -94.0);
    invalid
        .as_object_mut()
        .unwrap()
        .insert("extra".to_string(), serde_json::Value::Bool(true));

    let input = document(vec![
        observation(1, "a", "Tug", "2021-03-01T12:00:00", 29.0, -94.0),
        invalid,
    ]);

    match ingest(&input).unwrap_err() {
        Error::Schema { index, field, .. } => {
            assert_eq!(index, 1);
            assert_eq!(field, "extra");
        }
        e => panic!("unexpected error: {e:?}"),
    }
}

#[test]
fn test_non_overlapping_tracks_fail_without_aborting_other_pairs() {
    let input = document(vec![
        observation(111, "tug", "Tug", "2021-03-01T12:00:00", 29.0, -94.0),
        observation(111, "tug", "Tug", "2021-03-01T12:30:00", 29.0, -94.0),
        observation(222, "near", "Tanker", "2021-03-01T12:01:00", 29.1, -94.0),
        observation(222, "near", "Tanker", "2021-03-01T12:29:00", 29.1, -94.0),
        observation(333, "far", "Cargo", "2021-03-01T18:00:00", 29.1, -94.0),
        observation(333, "far", "Cargo", "2021-03-01T18:30:00", 29.1, -94.0),
    ]);

    let groups = ingest(&input).unwrap().fleet.split_by_type("Tug");
    let outcomes = pairwise_reports(&groups, default_sync_tolerance());

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes[0].report().is_some());
    match &outcomes[1].status {
        PairStatus::Failed { reason } => assert!(reason.contains("111")),
        s => panic!("unexpected status: {s:?}"),
    }
}

#[test]
fn test_lookup_distance_between_ingested_vessels() {
    let dataset = ingest(&two_vessel_document()).unwrap();

    let distance =
        lookup_distance(&dataset.fleet, Mmsi::test_new(111), Mmsi::test_new(222)).unwrap();

    assert!((distance.distance_km - 7.3854).abs() < 0.001);
}
