//! Integration tests for the chunking pipeline.

use std::io::Write;

use pagechunk::split::{RecursiveSplitter, SplitterOptions};
use pagechunk::{
    chunk_pages, chunk_pages_with_options, load_pages, Chunk, ChunkOptions, Chunker, Error,
    PlaceholderPolicy, RawBlock, RawPage, RawTable, Rect, Resolution, TableFormat, TableGrid,
};

const PNG: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

fn text_page(number: u32, text: &str) -> RawPage {
    RawPage::letter(number).with_block(RawBlock::text(0, Rect::new(0.0, 0.0, 500.0, 50.0), text))
}

fn words_page() -> RawPage {
    text_page(1, "one two three four five six seven eight nine ten\n")
}

fn table_page() -> RawPage {
    RawPage::letter(1)
        .with_block(RawBlock::text(0, Rect::new(0.0, 0.0, 100.0, 10.0), "Results:\n"))
        .with_block(RawBlock::text(1, Rect::new(10.0, 30.0, 90.0, 40.0), "Name Score Ann 9\n"))
        .with_block(RawBlock::text(2, Rect::new(0.0, 100.0, 100.0, 110.0), "End.\n"))
        .with_table(RawTable::new(
            Rect::new(0.0, 20.0, 100.0, 80.0),
            TableGrid::from_strings([["Name", "Score"], ["Ann", "9"]]),
        ))
}

fn page_text(page: &RawPage) -> String {
    page.blocks
        .iter()
        .filter_map(|b| match &b.payload {
            pagechunk::RawPayload::Text { text } => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_blank_line_separated_letters() {
    let splitter = RecursiveSplitter::new(
        SplitterOptions::new()
            .with_chunk_size(3)
            .with_chunk_overlap(0)
            .with_separators(["\n\n"]),
    )
    .unwrap();

    assert_eq!(splitter.split_text("A\n\nB\n\nC"), vec!["A", "B", "C"]);
}

#[test]
fn test_resolutions_form_separate_groups() {
    let pages = vec![words_page()];
    let base = ChunkOptions::new().sequential();

    let both = chunk_pages_with_options(
        &pages,
        base.clone().with_resolutions([Resolution::new(10, 2), Resolution::new(20, 4)]),
    )
    .unwrap();
    let small = chunk_pages_with_options(&pages, base.clone().with_resolutions([Resolution::new(10, 2)])).unwrap();
    let large = chunk_pages_with_options(&pages, base.with_resolutions([Resolution::new(20, 4)])).unwrap();

    assert!(small.len() > large.len());
    assert_eq!(both.len(), small.len() + large.len());
    assert_eq!(&both[..small.len()], &small[..]);
    assert_eq!(&both[small.len()..], &large[..]);
    assert!(small.iter().all(|c| c.char_count() <= 10));
    assert!(large.iter().all(|c| c.char_count() <= 20));
}

#[test]
fn test_offsets_point_into_page_text() {
    let pages = vec![
        text_page(1, "The first page talks about apples.\n\nIt has two paragraphs.\n"),
        text_page(2, "The second page is about pears and plums.\n"),
        text_page(3, "第一句。第二句！第三句？\n"),
    ];
    let chunks = Chunker::new().with_chunk_size(16).sequential().chunk(&pages).unwrap();

    assert!(!chunks.is_empty());
    for chunk in &chunks {
        let page = &pages[chunk.metadata.page_number as usize - 1];
        let text: String = page_text(page).chars().skip(chunk.metadata.start_offset).collect();
        assert!(
            text.starts_with(&chunk.content),
            "chunk {:?} not found at offset {} of page {}",
            chunk.content,
            chunk.metadata.start_offset,
            chunk.metadata.page_number
        );
    }
}

#[test]
fn test_overlap_bounded() {
    let options = ChunkOptions::new().with_resolutions([Resolution::new(20, 4)]);
    let chunks = chunk_pages_with_options(&[words_page()], options).unwrap();

    assert!(chunks.len() > 1);
    for pair in chunks.windows(2) {
        let (prev, next) = (&pair[0].metadata, &pair[1].metadata);
        assert!(next.start_offset > prev.start_offset);
        let prev_end = prev.start_offset + pair[0].char_count();
        assert!(prev_end.saturating_sub(next.start_offset) <= 4);
    }
}

#[test]
fn test_chunks_mapped_to_pages() {
    let pages = vec![text_page(1, "alpha beta\n"), text_page(2, "gamma delta\n")];
    let chunks = Chunker::new().with_chunk_size(12).chunk(&pages).unwrap();

    assert_eq!(
        chunks,
        vec![Chunk::new("alpha beta", 1, 0), Chunk::new("gamma delta", 2, 0)]
    );
}

#[test]
fn test_one_page_per_batch() {
    let pages: Vec<_> = (1..=3).map(|n| text_page(n, "x y z\n")).collect();

    let merged = Chunker::new().with_chunk_size(200).chunk(&pages).unwrap();
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].content, "x y z\nx y z\nx y z");

    let separate = Chunker::new()
        .with_chunk_size(200)
        .with_summary_page_count(1)
        .chunk(&pages)
        .unwrap();
    assert_eq!(
        separate,
        vec![
            Chunk::new("x y z", 1, 0),
            Chunk::new("x y z", 2, 0),
            Chunk::new("x y z", 3, 0),
        ]
    );
}

#[test]
fn test_table_expanded_as_markdown() {
    let chunks = Chunker::new().with_chunk_size(200).chunk(&[table_page()]).unwrap();

    assert_eq!(chunks.len(), 1);
    assert_eq!(
        chunks[0].content,
        "Results:\n| Name | Score |\n| --- | --- |\n| Ann | 9 |\nEnd."
    );
    assert_eq!(chunks[0].metadata.page_number, 1);
    assert_eq!(chunks[0].metadata.start_offset, 0);
}

#[test]
fn test_table_expanded_as_html() {
    let chunks = Chunker::new()
        .with_chunk_size(200)
        .with_table_format(TableFormat::Html)
        .chunk(&[table_page()])
        .unwrap();

    assert!(chunks[0].content.contains("<tr><th>Name</th><th>Score</th></tr>"));
    assert!(!chunks[0].content.contains("@page_"));
}

#[test]
fn test_overlapping_table_expands_everywhere() {
    let page = RawPage::letter(1)
        .with_block(RawBlock::text(0, Rect::new(0.0, 0.0, 100.0, 10.0), "aaaa bbbb "))
        .with_block(RawBlock::text(1, Rect::new(10.0, 30.0, 90.0, 40.0), "cell"))
        .with_block(RawBlock::text(2, Rect::new(0.0, 100.0, 100.0, 110.0), " cccc dddd"))
        .with_table(RawTable::new(
            Rect::new(0.0, 20.0, 100.0, 80.0),
            TableGrid::from_strings([["t"]]),
        ));

    let token = "@page_1_element_2_table@";
    let retain = Chunker::new()
        .with_resolutions([Resolution::new(26, 20)])
        .chunk(std::slice::from_ref(&page))
        .unwrap();
    assert_eq!(retain.len(), 3);
    assert!(retain.iter().all(|c| c.content.contains("| t |")));
    assert!(retain.iter().all(|c| !c.content.contains(token)));

    let consume = Chunker::new()
        .with_resolutions([Resolution::new(26, 20)])
        .with_placeholder_policy(PlaceholderPolicy::ConsumeOnce)
        .chunk(&[page])
        .unwrap();
    assert_eq!(consume.len(), 3);
    assert_eq!(consume[0].content, retain[0].content);
    assert!(consume[1].content.contains(token));
    assert!(consume[2].content.contains(token));
}

#[test]
fn test_image_expanded_as_data_uri() {
    let page = text_page(1, "Figure:\n")
        .with_block(RawBlock::image(1, Rect::new(0.0, 60.0, 100.0, 160.0), PNG.to_vec()));
    let chunks = Chunker::new().with_chunk_size(100).chunk(&[page]).unwrap();

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].content, "Figure:\ndata:image/png;base64,iVBORw0KGgo=");
}

#[test]
fn test_unrecognized_image_format_still_chunked() {
    let ppm = b"P6\n2 1\n255\n\xff\x00\x00\x00\xff\x00".to_vec();
    let page = RawPage::letter(1).with_block(RawBlock::image(0, Rect::new(0.0, 0.0, 100.0, 100.0), ppm));
    let chunks = Chunker::new().with_chunk_size(200).chunk(&[page]).unwrap();

    assert_eq!(chunks.len(), 1);
    assert!(chunks[0].content.starts_with("data:application/octet-stream;base64,UDYK"));
    assert_eq!(chunks[0].metadata.page_number, 1);
}

#[test]
fn test_token_text_in_page_is_not_expanded() {
    let page = RawPage::letter(1)
        .with_block(RawBlock::text(0, Rect::new(0.0, 0.0, 100.0, 10.0), "Cite @page_1_element_2_table@ as:\n"))
        .with_block(RawBlock::text(1, Rect::new(10.0, 30.0, 90.0, 40.0), "Name Score Ann 9\n"))
        .with_table(RawTable::new(
            Rect::new(0.0, 20.0, 100.0, 80.0),
            TableGrid::from_strings([["Name", "Score"], ["Ann", "9"]]),
        ));
    let chunks = Chunker::new().with_chunk_size(200).strict().chunk(&[page]).unwrap();

    assert_eq!(chunks.len(), 1);
    assert_eq!(
        chunks[0].content,
        "Cite @page_1_element_2_table@ as:\n| Name | Score |\n| --- | --- |\n| Ann | 9 |\n"
    );
}

#[test]
fn test_unregistered_token() {
    let page = text_page(1, "see @page_9_element_9_table@ here\n");

    let lenient = Chunker::new().with_chunk_size(100).chunk(std::slice::from_ref(&page)).unwrap();
    assert_eq!(lenient[0].content, "see @page_9_element_9_table@ here");

    let strict = Chunker::new().with_chunk_size(100).strict().chunk(&[page]);
    assert!(matches!(strict, Err(Error::RenderingInconsistency(_))));
}

#[test]
fn test_default_chunking_is_deterministic() {
    let pages = vec![words_page(), table_page()];
    let first = chunk_pages(&pages).unwrap();
    let second = chunk_pages(&pages).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_load_pages_from_file() {
    let pages = vec![text_page(1, "alpha beta\n"), table_page()];
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(serde_json::to_string(&pages).unwrap().as_bytes())
        .unwrap();

    let loaded = load_pages(file.path()).unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[1].tables.len(), 1);

    let from_file = Chunker::new().with_chunk_size(200).chunk_file(file.path()).unwrap();
    let direct = Chunker::new().with_chunk_size(200).chunk(&pages).unwrap();
    assert_eq!(from_file, direct);
}

#[test]
fn test_load_pages_missing_file() {
    let result = load_pages("/nonexistent/pages.json");
    assert!(matches!(result, Err(Error::Io(_))));
}
