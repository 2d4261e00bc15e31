use std::fs;
use std::path::PathBuf;
use yolodec::{rank_classes, LabelTable, YoloDecError};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("yolodec-{}-{name}", std::process::id()))
}

#[test]
fn load_reads_labels_in_order() {
    let path = temp_path("labels.txt");
    fs::write(&path, "aeroplane\r\nbicycle\r\n\r\nbird\n").unwrap();
    let table = LabelTable::load(&path).unwrap();
    fs::remove_file(&path).ok();

    let names: Vec<_> = table.iter().collect();
    assert_eq!(names, ["aeroplane", "bicycle", "bird"]);
}

#[test]
fn load_reports_missing_file() {
    let err = LabelTable::load(temp_path("does-not-exist.txt")).unwrap_err();
    assert!(matches!(err, YoloDecError::Io { .. }));
}

#[test]
fn ranking_pairs_scores_with_loaded_labels() {
    let table = LabelTable::parse("tabby\ntiger\nlynx\n");
    let ranked = rank_classes(&[0.2, 0.7, 0.1], &table, 2).unwrap();
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].label, "tiger");
    assert_eq!(ranked[0].class_id, 1);
    assert_eq!(ranked[1].label, "tabby");
}
