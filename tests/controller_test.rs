mod common;

use mushroom_classifier::ui::{FormController, InputMode, StatusTone};
use mushroom_classifier::{CategoricalEncoder, Feature, RequestError};

fn controller() -> FormController {
    FormController::new(common::sample_bundle()).expect("controller builds")
}

#[test]
fn dropdown_options_are_the_trained_vocabulary() {
    let controller = controller();
    let bundle = controller.bundle();
    assert_eq!(controller.features().len(), 22);
    for feature in controller.features() {
        let classes = bundle.encoders().get(feature).unwrap().classes();
        assert_eq!(controller.options(feature), classes);
        let selected = controller.selected(feature).unwrap();
        assert_eq!(selected, classes[0]);
    }
}

#[test]
fn manual_predict_then_edit_discards_outcome() {
    let mut controller = controller();
    assert_eq!(controller.mode(), InputMode::Manual);
    assert!(controller.can_predict());

    controller.predict();
    let report = controller.report().expect("manual prediction succeeds");
    assert_eq!(report.predictions().len(), 1);
    assert_eq!(controller.status().unwrap().tone, StatusTone::Success);

    controller.select(Feature::Odor, "f");
    assert!(controller.outcome().is_none());
    assert_eq!(controller.selected(Feature::Odor), Some("f"));

    controller.select(Feature::Odor, "zzz");
    assert_eq!(controller.selected(Feature::Odor), Some("f"));
    assert_eq!(controller.status().unwrap().tone, StatusTone::Error);
}

#[test]
fn upload_mode_without_file_warns() {
    let mut controller = controller();
    controller.set_mode(InputMode::Upload);
    assert!(controller.current_input().is_none());
    controller.predict();
    assert!(matches!(
        controller.outcome(),
        Some(Err(RequestError::MissingInput))
    ));
    assert_eq!(controller.status().unwrap().tone, StatusTone::Warning);
}

#[test]
fn wrong_columns_block_predict_immediately() {
    let mut controller = controller();
    controller.set_mode(InputMode::Upload);
    controller.load_upload_reader("specimens.csv", "odor,habitat\nn,d\n".as_bytes());

    let upload = controller.upload().unwrap();
    assert!(matches!(
        upload.schema_error,
        Some(RequestError::SchemaMismatch { .. })
    ));
    assert!(!controller.can_predict());
    assert_eq!(controller.status().unwrap().tone, StatusTone::Error);
    assert_eq!(controller.preview().unwrap().len(), 1);
}

#[test]
fn unreadable_upload_is_reported() {
    let mut controller = controller();
    controller.set_mode(InputMode::Upload);
    controller.load_upload_reader("ragged.csv", "odor,habitat\nn\n".as_bytes());
    assert!(controller.upload().is_none());
    assert_eq!(controller.status().unwrap().tone, StatusTone::Error);
}

#[test]
fn upload_predict_and_download() -> Result<(), Box<dyn std::error::Error>> {
    let mut controller = controller();
    let bundle = controller.bundle();
    let rows: Vec<Vec<String>> = (0..8)
        .map(|i| {
            let odor = if i % 2 == 0 { "a" } else { "p" };
            common::row(bundle, &[(Feature::Odor, odor)])
        })
        .collect();
    let csv = common::to_csv(&common::header(), &rows);

    controller.set_mode(InputMode::Upload);
    controller.load_upload_reader("specimens.csv", csv.as_bytes());
    assert!(controller.can_predict());
    assert_eq!(controller.preview().unwrap().len(), 5);

    controller.predict();
    let summary = *controller.report().expect("upload prediction succeeds").summary();
    assert_eq!((summary.edible, summary.poisonous), (4, 4));

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("mushroom_predictions.csv");
    controller.save_report(&path)?;
    let saved = std::fs::read_to_string(&path)?;
    assert_eq!(saved.lines().count(), 9);
    assert!(saved.lines().next().unwrap().ends_with(",Prediction"));

    controller.set_mode(InputMode::Manual);
    assert!(controller.report().is_none());
    assert!(matches!(
        controller.save_report(&path),
        Err(RequestError::MissingInput)
    ));
    Ok(())
}
