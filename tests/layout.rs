use image::{Rgb, Rgba, RgbaImage};
use sample_labels::layout::{Cell, CodedRecord, LabelLayout, LabelOptions, OverflowPolicy, SheetLayout, SheetOptions};
use sample_labels::{
    CodeSource, Document, Font, Format, LabelError, Logo, Mm, PhysicalDimension, PrintJob, QrCodeSource, Raster, Record,
};
use std::num::NonZeroU32;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

fn font() -> Font {
    Font::load(include_bytes!("../assets/DejaVuSans.ttf").to_vec()).expect("can load font")
}

fn logo() -> Logo {
    Logo::from_rgba(RgbaImage::from_pixel(239, 163, Rgba([200, 30, 30, 255])))
}

fn source() -> QrCodeSource {
    QrCodeSource::default().with_module_size(2)
}

fn records(count: usize) -> Vec<Record> {
    (0..count)
        .map(|i| Record::new("Lakes", format!("Lake {i}"), format!("S{i}")))
        .collect()
}

fn coded(records: &[Record]) -> Vec<CodedRecord> {
    let source = source();
    records
        .iter()
        .map(|r| CodedRecord::new(source.encode(&r.sample_id).unwrap(), r.clone()))
        .collect()
}

fn has_ink(raster: &Raster, x: std::ops::Range<u32>, y: std::ops::Range<u32>) -> bool {
    y.clone()
        .any(|py| x.clone().any(|px| *raster.pixels().get_pixel(px, py) != WHITE))
}

fn labels(copies: u32) -> LabelOptions {
    LabelOptions::default()
        .with_dimension(PhysicalDimension::new(Mm(62.0), Mm(29.0)))
        .with_multiples(NonZeroU32::new(copies).unwrap())
}

#[test]
fn single_record_fills_the_first_cell() {
    let font = font();
    let doc = SheetLayout::new(&font).layout(&coded(&records(1))).unwrap();
    assert_eq!(doc.page_count(), 1);

    let page = doc.page_raster(0).unwrap();
    assert_eq!((page.width(), page.height()), (2480, 3508));

    // code area of cell (0, 0)
    assert!(has_ink(page, 96..473, 96..473));
    // caption area right of the code
    assert!(has_ink(page, 452..850, 117..300));
    // border straddles the top edge of the cell
    assert_eq!(*page.pixels().get_pixel(300, 74), Rgb([0, 0, 0]));
    assert_eq!(*page.pixels().get_pixel(300, 75), Rgb([0, 0, 0]));
    // neighbouring cell stays empty
    assert!(!has_ink(page, 860..1620, 80..490));
}

fn cell_interior(raster: &Raster, cell: Cell) -> Vec<Rgb<u8>> {
    let r = cell.rect;
    (r.y1 + 2..r.y2 - 2)
        .flat_map(move |y| (r.x1 + 2..r.x2 - 2).map(move |x| *raster.pixels().get_pixel(x, y)))
        .collect()
}

#[test]
fn a4_caption_names_site_and_sample() {
    let font = font();
    let layout = SheetLayout::new(&font);
    let entry = coded(&[Record::new("Lakes", "Lake A", "S1")]).remove(0);

    let caption = layout.caption(&layout.geometry(), &entry);
    assert_eq!(caption.lines, vec!["Lake A", "ID: S1"]);
    assert_eq!(caption.fit.font_size, 34);

    let doc = layout.layout(&[entry]).unwrap();
    assert!(has_ink(doc.page_raster(0).unwrap(), 452..850, 117..300));
}

#[test]
fn a4_cells_follow_input_order() {
    let font = font();
    let layout = SheetLayout::new(&font);
    let grid = layout.grid();
    let all = records(4);
    let shuffled = vec![all[2].clone(), all[0].clone(), all[3].clone(), all[1].clone()];

    let doc = layout.layout(&coded(&shuffled)).unwrap();
    let straight = layout.layout(&coded(&all)).unwrap();
    let page = doc.page_raster(0).unwrap();

    for (i, record) in shuffled.iter().enumerate() {
        // same record at the same index, different neighbours
        let mut placed: Vec<Record> = (0..4)
            .map(|j| Record::new("Other", format!("Elsewhere {j}"), format!("X{j}")))
            .collect();
        placed[i] = record.clone();
        let reference = layout.layout(&coded(&placed)).unwrap();

        let cell = grid.cell(i).unwrap();
        let shown = cell_interior(page, cell);
        assert!(
            shown == cell_interior(reference.page_raster(0).unwrap(), cell),
            "cell {i} does not show {}",
            record.sample_id
        );
        assert!(
            shown != cell_interior(straight.page_raster(0).unwrap(), cell),
            "cell {i} shows the unshuffled record"
        );
    }
}

#[test]
fn a4_pages_print_at_a4() {
    let font = font();
    let doc = SheetLayout::new(&font).layout(&coded(&records(2))).unwrap();
    let (w, h) = doc.page(0).unwrap().media_box;
    assert!((w.0 - 595.2).abs() < 0.01);
    assert!((h.0 - 841.92).abs() < 0.01);
}

#[test]
fn twenty_five_records_overflow_a4() {
    let font = font();
    let err = SheetLayout::new(&font)
        .layout(&coded(&records(25)))
        .unwrap_err();
    assert!(matches!(
        err,
        LabelError::GridOverflow {
            records: 25,
            capacity: 24
        }
    ));
}

#[test]
fn overflow_leaves_no_file_behind() {
    let dir = tempfile::tempdir().unwrap();
    let job = PrintJob::new(dir.path().join("run_1_printable")).with_formats(vec![Format::A4]);
    let err = job.run(&records(25), &source(), &font(), None).unwrap_err();
    assert!(matches!(err, LabelError::GridOverflow { .. }));
    assert!(!dir.path().join("run_1_printable_a4.pdf").exists());
}

#[test]
fn pagination_continues_onto_new_sheets() {
    let font = font();
    let doc = SheetLayout::new(&font)
        .with_options(SheetOptions::default().with_overflow(OverflowPolicy::Paginate))
        .layout(&coded(&records(25)))
        .unwrap();
    assert_eq!(doc.page_count(), 2);

    let second = doc.page_raster(1).unwrap();
    assert!(has_ink(second, 96..473, 96..473));
    assert!(!has_ink(second, 860..1620, 80..490));
}

#[test]
fn empty_inputs() {
    let font = font();
    let sheet = SheetLayout::new(&font).layout(&[]).unwrap();
    assert_eq!(sheet.page_count(), 1);
    assert!(sheet
        .page_raster(0)
        .unwrap()
        .pixels()
        .pixels()
        .all(|p| *p == WHITE));

    let logo = logo();
    let labels = LabelLayout::new(&font, &logo).layout(&[]).unwrap();
    assert_eq!(labels.page_count(), 0);
}

#[test]
fn labels_repeat_contiguously() {
    let font = font();
    let logo = logo();
    let doc = LabelLayout::new(&font, &logo)
        .with_options(labels(3))
        .layout(&coded(&records(2)))
        .unwrap();

    assert_eq!(doc.page_count(), 6);
    let rasters: Vec<&Raster> = doc.page_rasters().collect();
    for raster in rasters.iter() {
        assert_eq!((raster.width(), raster.height()), (732, 343));
    }
    assert!(rasters[0..3].iter().all(|r| *r == rasters[0]));
    assert!(rasters[3..6].iter().all(|r| *r == rasters[3]));
    assert_ne!(rasters[0], rasters[3]);

    let first = doc.page(0).unwrap().raster;
    assert!((0..3).all(|i| doc.page(i).unwrap().raster == first));
}

#[test]
fn labels_carry_code_logo_and_caption() {
    let font = font();
    let logo = logo();
    let layout = LabelLayout::new(&font, &logo);
    let geometry = layout.geometry().unwrap();
    let doc = layout.layout(&coded(&records(1))).unwrap();
    let page = doc.page_raster(0).unwrap();
    assert_eq!((page.width(), page.height()), (1063, 342));

    let (cx, cy) = (geometry.buffer, geometry.buffer);
    assert!(has_ink(page, cx..cx + geometry.code_size, cy..cy + geometry.code_size));

    let (lx, ly) = geometry.logo_origin;
    assert_eq!(*page.pixels().get_pixel(lx + 10, ly + 10), Rgb([200, 30, 30]));

    let (tx, ty) = geometry.text_origin;
    assert!(has_ink(page, tx..lx, ty..ty + 60));
}

fn label_doc(records: &[Record]) -> Document {
    let font = font();
    let logo = logo();
    let doc = LabelLayout::new(&font, &logo)
        .with_options(labels(1))
        .layout(&coded(records))
        .unwrap();
    doc
}

#[test]
fn records_keep_their_order() {
    let all = records(3);
    let together = label_doc(&all);
    for (i, record) in all.iter().enumerate() {
        let alone = label_doc(std::slice::from_ref(record));
        assert_eq!(together.page_raster(i), alone.page_raster(0));
    }
}

#[test]
fn invalid_records_are_rejected_before_drawing() {
    let font = font();
    let mut list = records(2);
    list.push(Record::new("Lakes", "Lake 2", " "));
    let err = SheetLayout::new(&font).layout(&coded(&list)).unwrap_err();
    assert!(matches!(err, LabelError::MalformedRecord { field: "SampleID" }));
}

#[test]
fn zero_sized_labels_are_rejected() {
    let font = font();
    let logo = logo();
    let err = LabelLayout::new(&font, &logo)
        .with_options(LabelOptions::default().with_dimension(PhysicalDimension::new(Mm(0.0), Mm(29.0))))
        .layout(&coded(&records(1)))
        .unwrap_err();
    assert!(matches!(err, LabelError::InvalidDimension(_)));
}

#[test]
fn job_writes_one_file_per_format() {
    let dir = tempfile::tempdir().unwrap();
    let job = PrintJob::new(dir.path().join("run_7_printable"))
        .with_formats(vec!["a4".parse().unwrap(), "62x29".parse().unwrap()])
        .with_multiples(NonZeroU32::new(2).unwrap());
    let logo = logo();

    let written = job.run(&records(3), &source(), &font(), Some(&logo)).unwrap();
    assert_eq!(
        written,
        vec![
            dir.path().join("run_7_printable_a4.pdf"),
            dir.path().join("run_7_printable_labels.pdf"),
        ]
    );
    let labels = std::fs::read(&written[1]).unwrap();
    let labels = String::from_utf8_lossy(&labels);
    assert!(labels.contains("/Count 6"));
    assert_eq!(labels.matches("/Subtype /Image").count(), 3);
}
