use chrono::Local;
use price_analyzer::{
    ingest, render_html, Catalog, FileOutcome, IngestConfig, Ingestor, PriceError, Shell,
};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).expect("write fixture");
}

#[test]
fn single_file_single_record() {
    let dir = tempdir().unwrap();
    write(dir.path(), "price1.csv", "товар,цена,вес\nЯблоко,100,2\n");

    let mut catalog = Catalog::new();
    let total = ingest(dir.path(), &mut catalog).unwrap();

    assert_eq!(total, 1);
    let rec = &catalog.records()[0];
    assert_eq!(rec.name(), "яблоко");
    assert_eq!(rec.price(), 100);
    assert_eq!(rec.weight(), 2);
    assert_eq!(rec.source_label(), "price1.csv");
    assert_eq!(rec.unit_price(), 50.0);
}

#[test]
fn no_price_files_is_fatal() {
    let dir = tempdir().unwrap();
    write(dir.path(), "catalog.csv", "товар,цена,вес\nЯблоко,100,2\n");

    let mut catalog = Catalog::new();
    let err = ingest(dir.path(), &mut catalog).unwrap_err();
    assert!(matches!(err, PriceError::NoPriceFiles(_)));
    assert!(err.is_fatal());
    assert!(catalog.is_empty());
}

#[test]
fn missing_weight_column_skips_only_that_file() {
    let dir = tempdir().unwrap();
    write(dir.path(), "price_a.csv", "товар,цена,количество\nхлеб,40,3\n");
    write(
        dir.path(),
        "price_b.csv",
        "наименование,розница,масса\nМолоко,80,1\nКефир,70,1\n",
    );

    let mut catalog = Catalog::new();
    let report = Ingestor::new(IngestConfig::new(dir.path()))
        .ingest(&mut catalog)
        .unwrap();

    assert_eq!(report.total_records, 2);
    assert!(catalog.iter().all(|r| r.source_label() == "price_b.csv"));
    match &report.files[0] {
        FileOutcome::Failed { file, error } => {
            assert_eq!(file, "price_a.csv");
            assert!(matches!(error, PriceError::Schema { .. }));
        }
        other => panic!("expected failure, got {:?}", other),
    }
}

#[test]
fn export_numbers_rows_in_insertion_order() {
    let dir = tempdir().unwrap();
    write(dir.path(), "price_1.csv", "продукт,цена,фасовка\nСыр,500,1\n");
    write(dir.path(), "price_2.csv", "товар,цена,вес\nМасло,300,2\n");

    let mut catalog = Catalog::new();
    ingest(dir.path(), &mut catalog).unwrap();
    let html = render_html(&catalog, Local::now());

    let body = &html[html.find("<tbody>").unwrap()..html.find("</tbody>").unwrap()];
    assert_eq!(body.matches("<tr>").count(), 2);
    let first = body.find("<td>1</td>").unwrap();
    let second = body.find("<td>2</td>").unwrap();
    assert!(first < body.find("<td>сыр</td>").unwrap());
    assert!(body.find("<td>сыр</td>").unwrap() < second);
    assert!(second < body.find("<td>масло</td>").unwrap());
}

#[test]
fn search_across_files_by_unit_price() {
    let dir = tempdir().unwrap();
    write(dir.path(), "price_1.csv", "товар,цена,вес\nСок яблочный,120,1\nЯблоко,100,2\n");
    write(dir.path(), "price_2.csv", "товар,цена,вес\nЯблоко Гала,150,3\nГруша,90,1\n");

    let mut catalog = Catalog::new();
    ingest(dir.path(), &mut catalog).unwrap();

    let names: Vec<&str> = catalog.search("ябл").iter().map(|r| r.name()).collect();
    assert_eq!(names, vec!["яблоко", "яблоко гала", "сок яблочный"]);
    assert_eq!(catalog.search("").len(), 4);
}

#[test]
fn console_session_over_loaded_catalog() {
    let dir = tempdir().unwrap();
    write(dir.path(), "price_1.csv", "товар,цена,вес\nЯблоко,100,2\nГруша,90,1\n");

    let mut catalog = Catalog::new();
    ingest(dir.path(), &mut catalog).unwrap();

    let mut out = Vec::new();
    let searches = Shell::new("ГРУША\n\nexit\n".as_bytes(), &mut out)
        .run(&catalog)
        .unwrap();
    let out = String::from_utf8(out).unwrap();

    assert_eq!(searches, 1);
    assert!(out.contains("| 1 | груша "));
    assert!(out.contains("Query can't be empty"));
}
