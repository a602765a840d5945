use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;
use tika_samples::{config::Config, fixtures};

fn no_font_config() -> Config {
    let mut cfg = Config::default();
    cfg.generator.font_candidates = vec!["/nonexistent/DejaVuSans-Bold.ttf".into()];
    cfg
}

fn zip_part(path: &Path, name: &str) -> String {
    let file = std::fs::File::open(path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    let mut part = archive.by_name(name).unwrap();
    let mut out = String::new();
    part.read_to_string(&mut out).unwrap();
    out
}

#[test]
fn writes_exactly_the_six_fixtures() {
    let dir = tempfile::tempdir().unwrap();
    let records = fixtures::generate_all(&no_font_config(), dir.path()).unwrap();

    let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, fixtures::ALL.to_vec());

    let on_disk: BTreeSet<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    let expected: BTreeSet<String> = fixtures::ALL.iter().map(|s| s.to_string()).collect();
    assert_eq!(on_disk, expected);
}

#[test]
fn regenerating_is_byte_identical() {
    let cfg = no_font_config();
    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();
    let first = fixtures::generate_all(&cfg, a.path()).unwrap();
    let second = fixtures::generate_all(&cfg, b.path()).unwrap();

    for (x, y) in first.iter().zip(&second) {
        assert_eq!(x.name, y.name);
        assert_eq!(x.sha256, y.sha256, "{} differs between runs", x.name);
        let left = std::fs::read(a.path().join(&x.name)).unwrap();
        let right = std::fs::read(b.path().join(&y.name)).unwrap();
        assert_eq!(left, right);
    }
}

#[test]
fn csv_parses_back_to_four_records() {
    let dir = tempfile::tempdir().unwrap();
    fixtures::generate_all(&no_font_config(), dir.path()).unwrap();

    let bytes = std::fs::read(dir.path().join(fixtures::SAMPLE_CSV)).unwrap();
    assert!(bytes.starts_with(b"\xEF\xBB\xBF"));

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(&bytes[3..]);
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 4);
    assert_eq!(&rows[0][0], "id");
    assert_eq!(&rows[1][2], "He said \"hello\"");
    assert_eq!(&rows[2][1], "Боб");
    assert_eq!(&rows[2][2], "multi-line\nnote");
    assert_eq!(&rows[3][1], "李四");
    assert_eq!(&rows[3][2], "emoji 😀");
}

#[test]
fn workbook_grand_total_equals_row_totals() {
    use calamine::{open_workbook, Data, Reader, Xlsx};

    let dir = tempfile::tempdir().unwrap();
    fixtures::generate_all(&no_font_config(), dir.path()).unwrap();
    let path = dir.path().join(fixtures::SAMPLE_XLSX);

    let mut wb: Xlsx<_> = open_workbook(&path).unwrap();
    assert_eq!(wb.sheet_names(), vec!["Data".to_string(), "Unicode".to_string()]);

    let formulas = wb.worksheet_formula("Data").unwrap();
    assert_eq!(formulas.get_value((1, 3)).map(String::as_str), Some("B2*C2"));
    assert_eq!(formulas.get_value((5, 3)).map(String::as_str), Some("SUM(D2:D4)"));

    let values = wb.worksheet_range("Data").unwrap();
    let number = |row: u32, col: u32| match values.get_value((row, col)) {
        Some(Data::Float(f)) => *f,
        other => panic!("expected number at ({row},{col}), got {other:?}"),
    };
    let row_totals = number(1, 3) + number(2, 3) + number(3, 3);
    assert!((number(5, 3) - row_totals).abs() < 1e-9);
    assert!((number(5, 3) - 242.42).abs() < 1e-9);
    assert_eq!(
        values.get_value((5, 2)),
        Some(&Data::String("Grand Total".into()))
    );

    for (row, serial) in [(1, 45306.0), (2, 45107.0), (3, 45922.0)] {
        match values.get_value((row, 4)) {
            Some(Data::DateTime(dt)) => assert_eq!(dt.as_f64(), serial),
            other => panic!("expected date at ({row},4), got {other:?}"),
        }
    }

    let merges = wb.worksheet_merge_cells("Data").unwrap().unwrap();
    assert_eq!(merges.len(), 1);
    assert_eq!((merges[0].start, merges[0].end), ((7, 0), (7, 4)));

    let unicode = wb.worksheet_range("Unicode").unwrap();
    assert_eq!(
        unicode.get_value((1, 1)),
        Some(&Data::String("你好，世界".into()))
    );
    assert_eq!(unicode.get_value((3, 1)), Some(&Data::String("😀🚀📄".into())));

    let sheet = zip_part(&path, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains(r#"<mergeCell ref="A8:E8"/>"#));
    assert!(sheet.contains(r#"<hyperlink ref="A10" r:id="rId1"/>"#));
    for header in ["A1", "B1", "C1", "D1", "E1"] {
        assert!(sheet.contains(&format!(r#"<c r="{header}" s="1" t="s">"#)), "{header} not bold");
    }
    for date_cell in ["E2", "E3", "E4"] {
        assert!(sheet.contains(&format!(r#"<c r="{date_cell}" s="2"><v>"#)), "{date_cell}");
    }
    let styles = zip_part(&path, "xl/styles.xml");
    assert!(styles.contains(r#"<numFmt numFmtId="164" formatCode="yyyy-mm-dd"/>"#));
    assert!(styles.contains(r#"<xf numFmtId="164" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/>"#));
    assert!(styles.contains("<font><b/>"));
    let rels = zip_part(&path, "xl/worksheets/_rels/sheet1.xml.rels");
    assert!(rels.contains(r#"Target="https://tika.apache.org/" TargetMode="External""#));
    let core = zip_part(&path, "docProps/core.xml");
    assert!(core.contains("<dc:creator>Tika Samples</dc:creator>"));
    assert!(core.contains("<dc:title>Tika XLSX Sample</dc:title>"));
}

#[test]
fn docx_carries_hyperlink_list_table_and_picture() {
    let dir = tempfile::tempdir().unwrap();
    fixtures::generate_all(&no_font_config(), dir.path()).unwrap();
    let path = dir.path().join(fixtures::SAMPLE_DOCX);

    let doc = zip_part(&path, "word/document.xml");
    assert!(doc.contains(r#"<w:pStyle w:val="Heading1"/>"#));
    assert!(doc.contains("Tika Test Document"));
    assert!(doc.contains(r#"<w:hyperlink r:id="rId3">"#));
    assert!(doc.contains("Apache Tika website"));
    assert_eq!(doc.matches(r#"<w:pStyle w:val="ListBullet"/>"#).count(), 4);
    assert!(doc.contains("Unicode – 你好, Привет, 😀"));
    for r in 1..=3 {
        for c in 1..=3 {
            assert!(doc.contains(&format!(">R{r}C{c}<")));
        }
    }
    assert!(doc.contains(r#"<wp:extent cx="1828800" cy="914400"/>"#));

    let rels = zip_part(&path, "word/_rels/document.xml.rels");
    assert!(rels.contains(r#"Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://tika.apache.org/" TargetMode="External""#));
    assert!(rels.contains(r#"Id="rId4" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/logo.png""#));
    assert!(doc.contains(r#"r:embed="rId4""#));

    let core = zip_part(&path, "docProps/core.xml");
    assert!(core.contains("<cp:keywords>tika, docx, sample</cp:keywords>"));
    assert!(core.contains("<dc:subject>Paragraphs, lists, table, image, hyperlink</dc:subject>"));

    let logo_in_docx = {
        let file = std::fs::File::open(&path).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        let mut part = archive.by_name("word/media/logo.png").unwrap();
        let mut buf = Vec::new();
        part.read_to_end(&mut buf).unwrap();
        buf
    };
    assert_eq!(logo_in_docx, std::fs::read(dir.path().join(fixtures::LOGO_PNG)).unwrap());
}

#[test]
fn pdfs_are_single_page_with_metadata() {
    let dir = tempfile::tempdir().unwrap();
    fixtures::generate_all(&no_font_config(), dir.path()).unwrap();

    let cases = [
        (
            fixtures::TEXT_PDF,
            "Tika PDF: Text & Metadata",
            "Simple text page with metadata",
            "tika, pdf, sample",
        ),
        (
            fixtures::IMAGE_TABLE_PDF,
            "Tika PDF: Image & Table",
            "Bitmap image and drawn table",
            "tika, pdf, image, table",
        ),
    ];
    for (name, title, subject, keywords) in cases {
        let doc = lopdf::Document::load(dir.path().join(name)).unwrap();
        assert_eq!(doc.get_pages().len(), 1, "{name}");

        let info_ref = doc.trailer.get(b"Info").unwrap().as_reference().unwrap();
        let info = doc.get_dictionary(info_ref).unwrap();
        let got = info.get(b"Title").unwrap().as_str().unwrap();
        assert_eq!(got, title.as_bytes());
        let author = info.get(b"Author").unwrap().as_str().unwrap();
        assert_eq!(author, b"Tika Samples");
        let got = info.get(b"Subject").unwrap().as_str().unwrap();
        assert_eq!(got, subject.as_bytes());
        let got = info.get(b"Keywords").unwrap().as_str().unwrap();
        assert_eq!(got, keywords.as_bytes());
    }

    let text = lopdf::Document::load(dir.path().join(fixtures::TEXT_PDF))
        .unwrap()
        .extract_text(&[1])
        .unwrap();
    assert!(text.contains("Tika PDF: Text & Metadata"), "{text}");
    for line in fixtures::pdf::TEXT_LINES {
        assert!(text.contains(line), "missing {line:?} in {text}");
    }

    let text = lopdf::Document::load(dir.path().join(fixtures::IMAGE_TABLE_PDF))
        .unwrap()
        .extract_text(&[1])
        .unwrap();
    assert!(text.contains("PDF with Image & Table"), "{text}");
    for row in fixtures::pdf::TABLE_ROWS {
        for cell in row {
            assert!(text.contains(cell), "missing {cell:?} in {text}");
        }
    }
}

#[test]
fn truetype_label_is_deterministic() {
    let cfg = Config::default();
    let usable = cfg.generator.font_candidates.iter().any(|p| {
        std::fs::read(p)
            .ok()
            .is_some_and(|bytes| ab_glyph::FontVec::try_from_vec(bytes).is_ok())
    });
    if !usable {
        eprintln!("no TrueType font among the configured candidates; skipping");
        return;
    }

    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();
    let first = fixtures::generate_all(&cfg, a.path()).unwrap();
    let second = fixtures::generate_all(&cfg, b.path()).unwrap();
    for (x, y) in first.iter().zip(&second) {
        assert_eq!(x.sha256, y.sha256, "{} differs between runs", x.name);
    }

    // The glyph rasteriser must leave ink somewhere in the label area.
    let png = image::open(a.path().join(fixtures::LOGO_PNG)).unwrap().to_rgb8();
    let inked = (40..200)
        .flat_map(|x| (70..140).map(move |y| (x, y)))
        .any(|(x, y)| png.get_pixel(x, y).0[0] < 128);
    assert!(inked);
}
