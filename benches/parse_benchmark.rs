//! Benchmarks for unsheet extraction performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks test extraction performance at various worksheet sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::io::Cursor;
use unsheet::{headers, to_records, Workbook};

/// Creates a synthetic workbook with the given number of data rows.
fn create_test_workbook(row_count: usize) -> Vec<u8> {
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    let mut buffer = Vec::new();
    let mut zip = ZipWriter::new(Cursor::new(&mut buffer));

    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    zip.start_file("xl/workbook.xml", options).unwrap();
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <sheets>
    <sheet name="Data" sheetId="1" r:id="rId1"/>
  </sheets>
</workbook>"#,
    )
    .unwrap();

    zip.start_file("xl/_rels/workbook.xml.rels", options).unwrap();
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
</Relationships>"#,
    )
    .unwrap();

    // Shared strings: four headers, then one item name per row.
    let mut shared = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <si><t>Item</t></si>
  <si><t>Count</t></si>
  <si><t>Category</t></si>
  <si><t>Tags</t></si>"#,
    );
    for i in 0..row_count {
        shared.push_str(&format!("\n  <si><t>Item number {}</t></si>", i));
    }
    shared.push_str("\n</sst>");

    zip.start_file("xl/sharedStrings.xml", options).unwrap();
    zip.write_all(shared.as_bytes()).unwrap();

    let mut sheet = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <sheetData>
    <row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c><c r="C1" t="s"><v>2</v></c><c r="D1" t="s"><v>3</v></c></row>"#,
    );
    for i in 0..row_count {
        let row = i + 2;
        sheet.push_str(&format!(
            r#"
    <row r="{row}"><c r="A{row}" t="s"><v>{name}</v></c><c r="B{row}"><v>{count}</v></c><c r="C{row}" t="inlineStr"><is><t>category-{cat}</t></is></c><c r="D{row}" t="inlineStr"><is><t>red, blue, green</t></is></c></row>"#,
            name = 4 + i,
            count = i * 3,
            cat = i % 5,
        ));
    }
    sheet.push_str("\n  </sheetData>\n</worksheet>");

    zip.start_file("xl/worksheets/sheet1.xml", options).unwrap();
    zip.write_all(sheet.as_bytes()).unwrap();

    zip.finish().unwrap();
    buffer
}

/// Benchmark workbook loading (archive, shared strings, sheet directory).
fn bench_workbook_open(c: &mut Criterion) {
    let mut group = c.benchmark_group("workbook_open");

    for row_count in [10, 100, 500, 1000].iter() {
        let data = create_test_workbook(*row_count);
        let size = data.len() as u64;

        group.throughput(Throughput::Bytes(size));
        group.bench_with_input(BenchmarkId::new("rows", row_count), &data, |b, data| {
            b.iter(|| {
                let _ = Workbook::from_bytes(black_box(data.clone()));
            });
        });
    }

    group.finish();
}

/// Benchmark full row extraction at various worksheet sizes.
fn bench_row_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("row_extraction");

    for row_count in [10, 100, 500, 1000].iter() {
        let data = create_test_workbook(*row_count);
        let size = data.len() as u64;

        group.throughput(Throughput::Bytes(size));
        group.bench_with_input(BenchmarkId::new("rows", row_count), &data, |b, data| {
            b.iter(|| {
                let workbook = Workbook::from_bytes(black_box(data.clone())).unwrap();
                let _ = workbook.rows_at(0).unwrap();
            });
        });
    }

    group.finish();
}

/// Benchmark record conversion over already-parsed rows.
fn bench_record_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_conversion");

    for row_count in [10, 100, 500, 1000].iter() {
        let data = create_test_workbook(*row_count);
        let workbook = Workbook::from_bytes(data).unwrap();
        let rows = workbook.rows_at(0).unwrap();

        group.bench_with_input(BenchmarkId::new("rows", row_count), &rows, |b, rows| {
            b.iter(|| {
                let hs = headers(black_box(rows));
                let _ = to_records(black_box(rows), &hs);
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_workbook_open,
    bench_row_extraction,
    bench_record_conversion,
);
criterion_main!(benches);
