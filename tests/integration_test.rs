//! Integration tests for excelsplit

use excelsplit::types::CellValue;
use excelsplit::{
    split_file, ExcelError, ExcelReader, ExcelWriter, Row, SplitEvent, SplitOptions, SplitOutcome,
    SplitThreshold, Splitter,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write_source(path: &Path, data_rows: usize) {
    let mut writer = ExcelWriter::with_sheet_name(path, "Merchants").unwrap();
    writer.write_header(["ID", "Name", "Balance", "Active"]).unwrap();

    for i in 1..=data_rows {
        writer
            .write_row(&[
                CellValue::Int(i as i64),
                CellValue::String(format!("Merchant {}", i)),
                CellValue::Float(i as f64 * 1.5),
                CellValue::Bool(i % 2 == 0),
            ])
            .unwrap();
    }

    writer.save().unwrap();
}

fn read_rows(path: &Path) -> Vec<Row> {
    let mut reader = ExcelReader::open(path).unwrap();
    let sheet = reader.first_worksheet().unwrap();
    sheet.rows(0..sheet.row_count()).collect()
}

fn cells(rows: &[Row]) -> Vec<Vec<CellValue>> {
    rows.iter().map(|r| r.cells.clone()).collect()
}

fn xlsx_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    files.sort();
    files
}

#[test]
fn test_split_into_three_files() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("merchants.xlsx");
    write_source(&source, 2500);

    let outcome = split_file(&source, 1000).unwrap();

    let SplitOutcome::Split { total_rows, files } = outcome else {
        panic!("expected a split");
    };
    assert_eq!(total_rows, 2501);

    let names: Vec<_> = files
        .iter()
        .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec!["merchants-1.xlsx", "merchants-2.xlsx", "merchants-3.xlsx"]
    );
    assert_eq!(
        files.iter().map(|f| f.data_rows).collect::<Vec<_>>(),
        vec![1000, 1000, 500]
    );
    assert!(files.iter().all(|f| f.path.parent() == Some(dir.path())));

    let source_rows = read_rows(&source);
    let header = &source_rows[0];
    assert_eq!(header.to_strings(), vec!["ID", "Name", "Balance", "Active"]);

    let mut rebuilt = Vec::new();
    for file in &files {
        let rows = read_rows(&file.path);
        assert_eq!(rows[0].cells, header.cells);
        assert_eq!(rows.len() - 1, file.data_rows);
        rebuilt.extend(cells(&rows[1..]));
    }
    assert_eq!(rebuilt, cells(&source_rows[1..]));
}

#[test]
fn test_small_file_is_not_split() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("small.xlsx");
    write_source(&source, 500);

    let outcome = split_file(&source, 1000).unwrap();

    assert_eq!(outcome, SplitOutcome::NotNeeded { total_rows: 501 });
    assert_eq!(xlsx_files(dir.path()), vec![source]);
}

#[test]
fn test_missing_file_writes_nothing() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("nowhere.xlsx");

    let err = split_file(&source, 1000).unwrap_err();

    assert!(matches!(err, ExcelError::NotFound(_)));
    assert!(err.to_string().contains("does not exist"));
    assert!(xlsx_files(dir.path()).is_empty());
}

#[test]
fn test_csv_is_rejected() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("merchants.csv");
    fs::write(&source, "ID,Name\n1,Merchant 1\n").unwrap();

    let err = split_file(&source, 1).unwrap_err();

    assert!(matches!(err, ExcelError::UnsupportedFormat(_)));
    assert_eq!(xlsx_files(dir.path()), vec![source]);
}

// With the default rule a sheet holding exactly `rows_per_file` data rows is
// left alone; counting the header turns it into one full chunk.
#[test]
fn test_exact_capacity_boundary() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("exact.xlsx");
    write_source(&source, 1000);

    let outcome = split_file(&source, 1000).unwrap();
    assert_eq!(outcome, SplitOutcome::NotNeeded { total_rows: 1001 });
    assert_eq!(xlsx_files(dir.path()).len(), 1);

    let options = SplitOptions::new(1000)
        .unwrap()
        .with_threshold(SplitThreshold::TotalRows);
    let outcome = Splitter::new(options).split(&source).unwrap();
    assert_eq!(outcome.files().len(), 1);
    assert_eq!(outcome.files()[0].data_rows, 1000);
    assert!(dir.path().join("exact-1.xlsx").exists());
}

#[test]
fn test_one_row_over_capacity() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("over.xlsx");
    write_source(&source, 1001);

    let outcome = split_file(&source, 1000).unwrap();

    let sizes: Vec<_> = outcome.files().iter().map(|f| f.data_rows).collect();
    assert_eq!(sizes, vec![1000, 1]);

    let last = read_rows(&dir.path().join("over-2.xlsx"));
    assert_eq!(last.len(), 2);
    assert_eq!(last[1].get(1), Some(&CellValue::String("Merchant 1001".to_string())));
}

#[test]
fn test_rerun_overwrites_with_identical_files() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("repeat.xlsx");
    write_source(&source, 25);
    let source_bytes = fs::read(&source).unwrap();

    let first = split_file(&source, 10).unwrap();
    let first_bytes: Vec<Vec<u8>> = first
        .files()
        .iter()
        .map(|f| fs::read(&f.path).unwrap())
        .collect();

    let second = split_file(&source, 10).unwrap();
    let second_bytes: Vec<Vec<u8>> = second
        .files()
        .iter()
        .map(|f| fs::read(&f.path).unwrap())
        .collect();

    assert_eq!(first, second);
    assert_eq!(first_bytes, second_bytes);
    assert_eq!(xlsx_files(dir.path()).len(), 4);
    assert_eq!(fs::read(&source).unwrap(), source_bytes);
}

#[test]
fn test_values_are_copied_by_type() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("typed.xlsx");

    {
        let mut writer = ExcelWriter::new(&source).unwrap();
        writer.write_header(["Label", "Flag", "Joined", "Check", "Note"]).unwrap();
        for i in 0..3 {
            writer
                .write_row(&[
                    CellValue::String(format!("  row {} ", i)),
                    CellValue::Bool(i == 1),
                    CellValue::DateTime(45292.0 + i as f64),
                    CellValue::Error("#DIV/0!".to_string()),
                    CellValue::Empty,
                ])
                .unwrap();
        }
        writer
            .write_row(&[CellValue::from("a & <b>"), CellValue::Empty, CellValue::Empty])
            .unwrap();
        writer.save().unwrap();
    }

    let outcome = split_file(&source, 2).unwrap();
    assert_eq!(outcome.files().len(), 2);

    let first = read_rows(&dir.path().join("typed-1.xlsx"));
    assert_eq!(first[1].get(0), Some(&CellValue::String("  row 0 ".to_string())));
    assert_eq!(first[2].get(1), Some(&CellValue::Bool(true)));
    assert_eq!(first[1].get(2), Some(&CellValue::DateTime(45292.0)));
    assert_eq!(first[1].get(3), Some(&CellValue::Error("#DIV/0!".to_string())));

    let second = read_rows(&dir.path().join("typed-2.xlsx"));
    assert_eq!(second.len(), 3);
    assert_eq!(second[2].get(0), Some(&CellValue::String("a & <b>".to_string())));
    assert_eq!(second[2].get(1), Some(&CellValue::Empty));
}

#[test]
fn test_progress_events_follow_the_run() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("events.xlsx");
    write_source(&source, 5);

    let mut events = Vec::new();
    let splitter = Splitter::new(SplitOptions::new(2).unwrap());
    splitter
        .split_with_progress(&source, |event| events.push(event.clone()))
        .unwrap();

    assert_eq!(events.len(), 6);
    assert_eq!(
        events[0],
        SplitEvent::Started {
            file_name: "events.xlsx".to_string(),
            rows_per_file: 2,
        }
    );
    assert_eq!(
        events[1],
        SplitEvent::Loaded {
            sheet_name: "Merchants".to_string(),
            total_rows: 6,
        }
    );
    assert_eq!(events[2], SplitEvent::Planned { file_count: 3 });
    assert_eq!(
        events[5],
        SplitEvent::ChunkWritten {
            index: 3,
            path: dir.path().join("events-3.xlsx"),
            data_rows: 1,
        }
    );
}

#[test]
fn test_output_keeps_sheet_name() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("named.xlsx");
    write_source(&source, 3);

    split_file(&source, 2).unwrap();

    let reader = ExcelReader::open(dir.path().join("named-1.xlsx")).unwrap();
    assert_eq!(reader.sheet_names(), vec!["Merchants"]);
    assert_eq!(reader.sheet_count(), 1);
}

#[test]
fn test_blank_first_row_is_still_the_header() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("blank_header.xlsx");

    {
        let mut writer = ExcelWriter::new(&source).unwrap();
        writer.write_row(&[CellValue::Empty, CellValue::Empty]).unwrap();
        for i in 0..4 {
            writer
                .write_row(&[CellValue::Int(i), CellValue::from("x")])
                .unwrap();
        }
        writer.save().unwrap();
    }

    let outcome = split_file(&source, 3).unwrap();
    let SplitOutcome::Split { total_rows, files } = outcome else {
        panic!("expected a split");
    };
    assert_eq!(total_rows, 5);
    assert_eq!(
        files.iter().map(|f| f.data_rows).collect::<Vec<_>>(),
        vec![3, 1]
    );

    let rows = read_rows(&files[1].path);
    assert_eq!(rows.len(), 2);
    assert!(rows[0].is_empty());
    assert_eq!(rows[1].get(1), Some(&CellValue::String("x".to_string())));
}

#[test]
fn test_unknown_sheet_lists_available() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("sheets.xlsx");
    write_source(&source, 1);

    let mut reader = ExcelReader::open(&source).unwrap();
    let err = reader.worksheet("Missing").err().unwrap();

    match err {
        ExcelError::SheetNotFound { sheet, available } => {
            assert_eq!(sheet, "Missing");
            assert_eq!(available, "Merchants");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_write_failure_keeps_earlier_chunks() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("blocked.xlsx");
    write_source(&source, 5);
    fs::create_dir(dir.path().join("blocked-2.xlsx")).unwrap();

    let err = split_file(&source, 2).unwrap_err();

    assert!(
        matches!(err, ExcelError::IoError(_) | ExcelError::WriteError(_)),
        "unexpected error: {}",
        err
    );
    let first = dir.path().join("blocked-1.xlsx");
    assert!(first.is_file());
    assert_eq!(read_rows(&first).len(), 3);
    assert!(!dir.path().join("blocked-3.xlsx").exists());
}

// Rewrite a saved workbook so its serials count from 1904-01-01.
fn switch_to_1904_dates(path: &Path) {
    use std::io::{Read, Write};
    use zip::write::SimpleFileOptions;

    let bytes = fs::read(path).unwrap();
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
    let mut out = zip::ZipWriter::new(fs::File::create(path).unwrap());

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).unwrap();
        let name = entry.name().to_string();
        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();

        if name == "xl/workbook.xml" {
            content = content.replacen("<sheets>", "<workbookPr date1904=\"1\"/><sheets>", 1);
        }

        out.start_file(name, SimpleFileOptions::default()).unwrap();
        out.write_all(content.as_bytes()).unwrap();
    }

    out.finish().unwrap();
}

#[test]
fn test_1904_dates_keep_their_calendar_day() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("mac.xlsx");

    {
        let mut writer = ExcelWriter::new(&source).unwrap();
        writer.write_header(["Joined"]).unwrap();
        // 43830 days after 1904-01-01 is 2024-01-01
        for i in 0..3 {
            writer
                .write_row(&[CellValue::DateTime(43830.0 + i as f64)])
                .unwrap();
        }
        writer.save().unwrap();
    }
    switch_to_1904_dates(&source);

    let source_rows = read_rows(&source);
    assert_eq!(source_rows[1].get(0), Some(&CellValue::DateTime(45292.0)));

    let outcome = split_file(&source, 2).unwrap();
    assert_eq!(outcome.files().len(), 2);

    let first = read_rows(&dir.path().join("mac-1.xlsx"));
    assert_eq!(first[1].get(0), Some(&CellValue::DateTime(45292.0)));
    assert_eq!(first[2].get(0), Some(&CellValue::DateTime(45293.0)));

    let second = read_rows(&dir.path().join("mac-2.xlsx"));
    assert_eq!(second[1].get(0), Some(&CellValue::DateTime(45294.0)));
}
