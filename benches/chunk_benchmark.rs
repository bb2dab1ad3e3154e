//! Benchmarks for pagechunk consolidation and chunking performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic pages with paragraphs and one table each.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use pagechunk::split::{RecursiveSplitter, SplitterOptions};
use pagechunk::{ChunkOptions, RawBlock, RawPage, RawTable, Rect, TableGrid};

/// Creates synthetic pages with a few paragraphs and a table.
fn create_test_pages(page_count: u32) -> Vec<RawPage> {
    (1..=page_count)
        .map(|number| {
            let mut page = RawPage::letter(number);
            for i in 0..4u32 {
                let y = 20.0 + i as f32 * 60.0;
                page.add_block(RawBlock::text(
                    i,
                    Rect::new(72.0, y, 540.0, y + 50.0),
                    format!(
                        "Page {} paragraph {}. Benchmark text for chunking performance \
                         measurement, with enough words to span several chunks.\n\n",
                        number, i
                    ),
                ));
            }
            page.add_block(RawBlock::text(4, Rect::new(80.0, 320.0, 530.0, 340.0), "Item Qty Price\n"));
            page.add_table(RawTable::new(
                Rect::new(72.0, 300.0, 540.0, 420.0),
                TableGrid::from_strings([
                    ["Item", "Qty", "Price"],
                    ["Widget", "4", "9.99"],
                    ["Gadget", "1", "24.50"],
                ]),
            ));
            page
        })
        .collect()
}

/// Benchmark page consolidation.
fn bench_consolidation(c: &mut Criterion) {
    let pages = create_test_pages(50);

    c.bench_function("consolidate_50_pages", |b| {
        b.iter(|| pagechunk::consolidate_pages(black_box(&pages)).unwrap());
    });
}

/// Benchmark the recursive splitter on plain text.
fn bench_splitter(c: &mut Criterion) {
    let text = "Lorem ipsum dolor sit amet, consectetur adipiscing elit.\n".repeat(500);
    let splitter = RecursiveSplitter::new(
        SplitterOptions::new()
            .with_chunk_size(400)
            .with_chunk_overlap(80),
    )
    .unwrap();

    c.bench_function("split_text_28k_chars", |b| {
        b.iter(|| splitter.split_text(black_box(&text)));
    });
}

/// Benchmark the full pipeline at various sizes.
fn bench_chunking(c: &mut Criterion) {
    let mut group = c.benchmark_group("chunk_pages");

    for page_count in [1, 10, 50].iter() {
        let pages = create_test_pages(*page_count);

        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| pagechunk::chunk_pages(black_box(&pages)).unwrap());
        });
    }

    group.bench_function("50_pages_sequential", |b| {
        let pages = create_test_pages(50);
        b.iter(|| {
            pagechunk::chunk_pages_with_options(black_box(&pages), ChunkOptions::new().sequential())
                .unwrap()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_consolidation, bench_splitter, bench_chunking);
criterion_main!(benches);
