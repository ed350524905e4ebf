use harbor_analyzer::{
    error::Error,
    settings::{LookupSettings, OutputFormat, Settings},
};
use harbor_core::{Mmsi, PairStatus};

use crate::helper::{document, observation, sample_document_path, test, test_with_settings};

#[tokio::test]
async fn test_sample_document_pairs_every_tug_with_every_other_vessel() {
    test(|helper| async move {
        let report = helper.app.run().await.unwrap();

        assert_eq!(report.summary.num_observations, 19);
        assert_eq!(report.summary.total_mmsis, 5);
        assert_eq!(report.summary.duplicate_mmsis, 14);
        assert_eq!(report.split.primary.len(), 2);
        assert_eq!(report.split.secondary.len(), 3);
        assert_eq!(report.pairs.len(), 6);
        assert_eq!(report.num_synchronized(), 4);
        assert_eq!(report.num_failed(), 2);
        assert!(
            report
                .pairs
                .iter()
                .filter(|v| v.secondary.name == "Gulf Trader")
                .all(|v| matches!(v.status, PairStatus::Failed { .. }))
        );
    })
    .await;
}

#[tokio::test]
async fn test_lookup_distance_is_reported_when_configured() {
    let mut settings = Settings::test_default(sample_document_path());
    settings.lookup = Some(LookupSettings {
        from: "563495000".parse::<Mmsi>().unwrap(),
        to: "224941000".parse::<Mmsi>().unwrap(),
    });

    test_with_settings(settings, |helper| async move {
        let report = helper.app.run().await.unwrap();

        let lookup = report.lookup.unwrap();
        assert_eq!(lookup.from.name, "Nave Cetus");
        assert_eq!(lookup.to.name, "Monte Udala");
        assert!(lookup.distance_km > 0.0);
    })
    .await;
}

#[tokio::test]
async fn test_lookup_of_unknown_vessel_fails_the_run() {
    let mut settings = Settings::test_default(sample_document_path());
    settings.lookup = Some(LookupSettings {
        from: "563495000".parse::<Mmsi>().unwrap(),
        to: "1".parse::<Mmsi>().unwrap(),
    });

    test_with_settings(settings, |helper| async move {
        let error = helper.app.run().await.unwrap_err();
        assert!(matches!(error, Error::Lookup { .. }));
    })
    .await;
}

#[tokio::test]
async fn test_invalid_record_fails_before_any_pair_is_evaluated() {
    test(|helper| async move {
        let mut invalid = observation(2, "tanker", "Tanker", "2021-03-01T12:00:00", 29.8);
        invalid
            .as_object_mut()
            .unwrap()
            .insert("extra".to_string(), serde_json::Value::Null);

        let input = document(vec![
            observation(1, "tug", "Tug", "2021-03-01T12:00:00", 29.9),
            invalid,
        ]);

        let error = helper.app.analyze(&input).await.unwrap_err();
        assert!(matches!(error, Error::Ingest { .. }));
    })
    .await;
}

#[tokio::test]
async fn test_missing_input_file_is_reported() {
    let settings = Settings::test_default("does/not/exist.json".into());

    test_with_settings(settings, |helper| async move {
        let error = helper.app.run().await.unwrap_err();
        assert!(matches!(error, Error::ReadInput { .. }));
    })
    .await;
}

#[tokio::test]
async fn test_cancelled_run_reports_every_pair_as_cancelled() {
    test(|helper| async move {
        helper.cancellation_token().cancel();

        let report = helper.app.run().await.unwrap();

        assert_eq!(report.pairs.len(), 6);
        assert_eq!(report.num_cancelled(), 6);
    })
    .await;
}

#[tokio::test]
async fn test_tracks_are_listed_in_time_order() {
    let mut settings = Settings::test_default(sample_document_path());
    settings.show_tracks = true;

    test_with_settings(settings, |helper| async move {
        let input = document(vec![
            observation(1, "tug", "Tug", "2021-03-01 12:10:00", 29.9),
            observation(1, "tug", "Tug", "2021-03-01 12:00:00", 29.8),
            observation(2, "tanker", "Tanker", "2021-03-01 12:01:00", 29.8),
        ]);

        let report = helper.app.analyze(&input).await.unwrap();

        assert_eq!(report.tracks.len(), 2);
        let latitudes: Vec<f64> = report.tracks[0]
            .samples
            .iter()
            .map(|v| v.location.latitude)
            .collect();
        assert_eq!(latitudes, vec![29.8, 29.9]);
        assert_eq!(report.num_synchronized(), 1);
    })
    .await;
}

#[tokio::test]
async fn test_text_output_lists_summary_and_pairs() {
    let mut settings = Settings::test_default(sample_document_path());
    settings.output = OutputFormat::Text;

    test_with_settings(settings, |helper| async move {
        let report = helper.app.run().await.unwrap();

        let mut out = Vec::new();
        helper.app.render(&report, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Duplicate MMSIs:          14"));
        assert!(text.contains("-- Miss Jane <-> Nave Cetus --"));
        assert!(text.contains("6 pairs: 4 synchronized, 2 failed, 0 cancelled"));
    })
    .await;
}

#[tokio::test]
async fn test_json_output_is_a_single_document() {
    test(|helper| async move {
        let report = helper.app.run().await.unwrap();

        let mut out = Vec::new();
        helper.app.render(&report, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["pairs"].as_array().unwrap().len(), 6);
        assert_eq!(value["split"]["category"], "Tug");
    })
    .await;
}
