//! End-to-end searches over real spreadsheet, Word and PDF files.

use std::fs::File;
use std::path::{Path, PathBuf};

use catalog_scout::config::ExtractionConfig;
use catalog_scout::search::{search_file, Location, MatchRecord, MissingTerms, SearchOutcome};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

fn write_catalog_xlsx(dir: &Path) -> PathBuf {
    let path = dir.join("catalog.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "Name").unwrap();
    sheet.write_string(0, 1, "Size").unwrap();
    sheet.write_string(0, 2, "Stock").unwrap();
    sheet.write_string(1, 0, "Red Jacket").unwrap();
    sheet.write_string(1, 1, "M").unwrap();
    sheet.write_number(1, 2, 12).unwrap();
    sheet.write_string(2, 0, "Blue Scarf").unwrap();
    sheet.write_string(2, 1, "L").unwrap();
    workbook.save(&path).unwrap();
    path
}

fn write_backpack_docx(dir: &Path, name: &str) -> PathBuf {
    use docx_rs::{Docx, Paragraph, Run, Table, TableCell, TableRow};

    let path = dir.join(name);
    let file = File::create(&path).unwrap();
    Docx::new()
        .add_paragraph(Paragraph::new().add_run(Run::new().add_text("The Red Backpack is waterproof")))
        .add_table(Table::new(vec![TableRow::new(vec![
            TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text("Red"))),
            TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text("Size"))),
        ])]))
        .build()
        .pack(file)
        .unwrap();
    path
}

/// One-page PDF with a plain Courier text layer.
fn write_text_pdf(dir: &Path, text: &str) -> PathBuf {
    let path = dir.join("catalog.pdf");
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 24.into()]),
            Operation::new("Td", vec![100.into(), 600.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(&path).unwrap();
    path
}

fn lopdf_only() -> ExtractionConfig {
    ExtractionConfig {
        pdf_backends: vec!["lopdf".to_string()],
        ..Default::default()
    }
}

fn outcome_for<'a>(results: &'a [(String, SearchOutcome)], term: &str) -> &'a SearchOutcome {
    &results
        .iter()
        .find(|(t, _)| t == term)
        .unwrap_or_else(|| panic!("no result for {}", term))
        .1
}

#[test]
fn spreadsheet_whole_word_search() {
    let dir = TempDir::new().unwrap();
    let path = write_catalog_xlsx(dir.path());

    let results = search_file(&path, "jacket, jack, xyz", &ExtractionConfig::default());
    let terms: Vec<&str> = results.iter().map(|(t, _)| t.as_str()).collect();
    assert_eq!(terms, vec!["jacket", "jack", "xyz"]);

    let jacket = outcome_for(&results, "jacket");
    assert_eq!(
        jacket.matches,
        vec![MatchRecord::Row {
            values: vec!["Red Jacket".to_string(), "M".to_string(), "12".to_string()]
        }]
    );
    assert!(!jacket.search_interrupted);

    for term in ["jack", "xyz"] {
        let outcome = outcome_for(&results, term);
        assert!(outcome.matches.is_empty());
        assert!(outcome.search_interrupted);
        assert_eq!(
            outcome.keywords_not_found,
            MissingTerms::Terms(vec![term.to_string()])
        );
    }
}

#[test]
fn spreadsheet_header_row_is_not_searched() {
    let dir = TempDir::new().unwrap();
    let path = write_catalog_xlsx(dir.path());

    let results = search_file(&path, "stock", &ExtractionConfig::default());
    assert!(results[0].1.matches.is_empty());
}

#[test]
fn spreadsheet_date_cells_read_as_dates() {
    use rust_xlsxwriter::{ExcelDateTime, Format};

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("arrivals.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    sheet.write_string(0, 0, "Name").unwrap();
    sheet.write_string(0, 1, "Arrives").unwrap();
    sheet.write_string(1, 0, "Red Jacket").unwrap();
    sheet
        .write_datetime_with_format(1, 1, ExcelDateTime::from_ymd(2024, 5, 1).unwrap(), &date_format)
        .unwrap();
    workbook.save(&path).unwrap();

    let results = search_file(&path, "jacket, 2024-05-01", &ExtractionConfig::default());

    let expected = vec![MatchRecord::Row {
        values: vec!["Red Jacket".to_string(), "2024-05-01 00:00:00".to_string()],
    }];
    assert_eq!(outcome_for(&results, "jacket").matches, expected);
    assert_eq!(outcome_for(&results, "2024-05-01").matches, expected);
}

#[test]
fn word_paragraphs_and_tables() {
    let dir = TempDir::new().unwrap();
    let path = write_backpack_docx(dir.path(), "catalog.docx");

    let results = search_file(&path, "red, backpack", &ExtractionConfig::default());

    let red = outcome_for(&results, "red");
    assert_eq!(
        red.matches,
        vec![
            MatchRecord::Passage {
                location: Location::Paragraph(1),
                text: "The Red Backpack is waterproof".to_string()
            },
            MatchRecord::Passage {
                location: Location::Table(1),
                text: "Red".to_string()
            },
        ]
    );
    assert!(!red.search_interrupted);

    let backpack = outcome_for(&results, "backpack");
    assert_eq!(backpack.matches.len(), 1);
    assert_eq!(
        backpack.keywords_not_found.at(Location::Table(1)),
        &["backpack".to_string()][..]
    );
    assert!(backpack.search_interrupted);
}

#[test]
fn word_search_is_repeatable() {
    let dir = TempDir::new().unwrap();
    let path = write_backpack_docx(dir.path(), "catalog.docx");
    let config = ExtractionConfig::default();

    assert_eq!(
        search_file(&path, "red, backpack", &config),
        search_file(&path, "red, backpack", &config)
    );
}

#[test]
fn legacy_doc_file_fails_softly() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("old.doc");
    std::fs::write(&path, b"\xd0\xcf\x11\xe0 not a zip").unwrap();

    let results = search_file(&path, "red", &ExtractionConfig::default());

    let outcome = &results[0].1;
    assert!(outcome.matches.is_empty());
    assert!(outcome.search_interrupted);
    assert!(outcome.error.is_some());
    assert_eq!(
        outcome.keywords_not_found.at(Location::Document),
        &["red".to_string()][..]
    );
}

#[test]
fn pdf_text_layer_search() {
    let dir = TempDir::new().unwrap();
    let path = write_text_pdf(dir.path(), "Model X200");

    let results = search_file(&path, "x200, missing", &lopdf_only());

    let found = outcome_for(&results, "x200");
    assert_eq!(found.matches.len(), 1);
    match &found.matches[0] {
        MatchRecord::Page {
            page_number,
            combined_text,
        } => {
            assert_eq!(*page_number, 1);
            assert!(combined_text.starts_with("lopdf:\n"));
            assert!(combined_text.contains("Model X200"));
        }
        other => panic!("unexpected record {:?}", other),
    }
    assert!(!found.search_interrupted);

    let missing = outcome_for(&results, "missing");
    assert!(missing.matches.is_empty());
    assert_eq!(
        missing.keywords_not_found.at(Location::Page(1)),
        &["missing".to_string()][..]
    );
    assert!(missing.search_interrupted);
}

#[test]
fn corrupt_pdf_fails_every_term() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.pdf");
    std::fs::write(&path, b"this is not a pdf").unwrap();

    let results = search_file(&path, "a, b", &ExtractionConfig::default());

    assert_eq!(results.len(), 2);
    for (term, outcome) in &results {
        assert!(outcome.search_interrupted);
        assert!(outcome.error.is_some());
        assert_eq!(
            outcome.keywords_not_found.at(Location::Document),
            std::slice::from_ref(term)
        );
    }
}
