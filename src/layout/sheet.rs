use super::text::{fit_caption, Caption, CellSize, FitStrategy, HeuristicFit};
use super::{CodedRecord, GridLayout, Margins};
use crate::canvas::PageCanvas;
use crate::colour::{colours, Colour};
use crate::document::Document;
use crate::font::Font;
use crate::pagesize::{self, PixelSize};
use crate::units::DPI;
use crate::LabelError;
use image::imageops::FilterType;
use log::{debug, info};

/// What to do with more records than a single sheet has cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Refuse the whole layout with [LabelError::GridOverflow]
    #[default]
    Fail,
    /// Continue onto as many further sheets as needed
    Paginate,
}

/// Geometry and styling of the A4 sheet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetOptions {
    pub page: PixelSize,
    pub dpi: u32,
    pub margins: Margins,
    pub columns: u32,
    pub rows: u32,
    /// Code size as a share of the cell height
    pub code_ratio: f32,
    pub border_width: u32,
    pub ink: Colour,
    pub resample: FilterType,
    pub overflow: OverflowPolicy,
}

impl Default for SheetOptions {
    fn default() -> Self {
        SheetOptions {
            page: pagesize::A4,
            dpi: DPI,
            margins: Margins::all(75),
            columns: 3,
            rows: 8,
            code_ratio: 0.9,
            border_width: 2,
            ink: colours::BLACK,
            resample: FilterType::Nearest,
            overflow: OverflowPolicy::Fail,
        }
    }
}

impl SheetOptions {
    pub fn with_overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }

    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    pub fn with_grid(mut self, columns: u32, rows: u32) -> Self {
        self.columns = columns;
        self.rows = rows;
        self
    }
}

/// Where things go inside one grid cell, relative to the cell's top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellGeometry {
    pub code_size: u32,
    /// Gap between the code and the cell's top and left edges
    pub buffer: u32,
    /// The area the caption is fitted into
    pub text_cell: CellSize,
    /// Top-left corner of the caption
    pub text_offset: (u32, u32),
}

impl CellGeometry {
    pub fn new(grid: &GridLayout, code_ratio: f32) -> CellGeometry {
        let code_size = (grid.cell_height as f32 * code_ratio) as u32;
        let buffer = grid.cell_height.saturating_sub(code_size) / 2;
        CellGeometry {
            code_size,
            buffer,
            text_cell: CellSize::new(grid.cell_width.saturating_sub(code_size), grid.cell_height),
            text_offset: (code_size, buffer * 2),
        }
    }
}

/// Tiles codes and captions onto A4 sheets, three across and eight down by default
pub struct SheetLayout<'a> {
    options: SheetOptions,
    font: &'a Font,
    fit: Box<dyn FitStrategy + 'a>,
}

impl<'a> SheetLayout<'a> {
    pub fn new(font: &'a Font) -> SheetLayout<'a> {
        SheetLayout {
            options: SheetOptions::default(),
            font,
            fit: Box::new(HeuristicFit::a4()),
        }
    }

    pub fn with_options(mut self, options: SheetOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the caption fitting strategy without touching the grid geometry
    pub fn with_fit_strategy<F: FitStrategy + 'a>(mut self, fit: F) -> Self {
        self.fit = Box::new(fit);
        self
    }

    pub fn options(&self) -> &SheetOptions {
        &self.options
    }

    pub fn grid(&self) -> GridLayout {
        GridLayout::new(
            self.options.page,
            self.options.margins,
            self.options.columns,
            self.options.rows,
        )
    }

    pub fn geometry(&self) -> CellGeometry {
        CellGeometry::new(&self.grid(), self.options.code_ratio)
    }

    /// The caption drawn next to a record's code: the wrapped site name, then its ID
    pub fn caption(&self, geometry: &CellGeometry, entry: &CodedRecord) -> Caption {
        fit_caption(
            self.fit.as_ref(),
            geometry.text_cell,
            &entry.record.site_name,
            vec![format!("ID: {}", entry.record.sample_id)],
        )
    }

    /// Lay out every record, in order, into grid cells. With [OverflowPolicy::Fail] the
    /// result is always exactly one page.
    pub fn layout(&self, records: &[CodedRecord]) -> Result<Document, LabelError> {
        info!("compiling printable A4 sheet for {} record(s)", records.len());
        for entry in records {
            entry.record.validate()?;
        }

        let grid = self.grid();
        let capacity = grid.capacity();
        if records.len() > capacity && self.options.overflow == OverflowPolicy::Fail {
            return Err(LabelError::GridOverflow {
                records: records.len(),
                capacity,
            });
        }

        let geometry = self.geometry();
        debug!(
            "cells are {}x{}px, codes {}px, caption area {}x{}px",
            grid.cell_width,
            grid.cell_height,
            geometry.code_size,
            geometry.text_cell.width,
            geometry.text_cell.height
        );

        let mut document = Document::default();
        if records.is_empty() {
            document.push_copies(self.blank().finish(), 1);
            return Ok(document);
        }
        for sheet in records.chunks(capacity) {
            let raster = self.compose(&grid, &geometry, sheet).finish();
            document.push_copies(raster, 1);
        }
        debug!("laid out {} sheet(s)", document.page_count());
        Ok(document)
    }

    fn blank(&self) -> PageCanvas {
        PageCanvas::new(self.options.page.0, self.options.page.1, self.options.dpi)
    }

    fn compose(&self, grid: &GridLayout, geometry: &CellGeometry, sheet: &[CodedRecord]) -> PageCanvas {
        let mut canvas = self.blank();

        for (i, entry) in sheet.iter().enumerate() {
            let Some(cell) = grid.cell(i) else {
                break;
            };
            let (x, y) = (cell.rect.x1, cell.rect.y1);

            canvas.paste_code(
                &entry.code,
                geometry.code_size,
                x + geometry.buffer,
                y + geometry.buffer,
                self.options.resample,
            );

            let caption = self.caption(geometry, entry);
            canvas.draw_text(
                self.font,
                caption.fit.font_size as f32,
                (x + geometry.text_offset.0, y + geometry.text_offset.1),
                &caption.text(),
                self.options.ink,
            );

            canvas.stroke_rect(cell.rect, self.options.border_width, self.options.ink);
        }

        canvas
    }
}
