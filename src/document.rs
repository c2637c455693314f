use crate::{
    image::Raster,
    info::Info,
    page::Page,
    refs::{ObjectReferences, RefType},
    LabelError,
};
use id_arena::{Arena, Id};
use log::debug;
use pdf_writer::{Finish, Pdf, Ref};
use std::{io::Write, path::Path};

#[derive(Default, Debug)]
/// The output of a layout run: an ordered list of pages, each showing one finished
/// raster. Render it out with [Document::write] or [Document::save].
pub struct Document {
    pub info: Option<Info>,
    pages: Arena<Page>,
    page_order: Vec<Id<Page>>,
    rasters: Arena<Raster>,
}

impl Document {
    /// Sets information about the document. If not provided, no information block will be
    /// written to the PDF
    pub fn set_info(&mut self, info: Info) {
        self.info = Some(info);
    }

    /// Add a finished raster to the document without showing it on a page yet. Rasters are
    /// stored once, however many pages show them.
    pub fn add_raster(&mut self, raster: Raster) -> Id<Raster> {
        self.rasters.alloc(raster)
    }

    /// Append a page showing an already-added raster to the end of the document
    pub fn add_page(&mut self, raster: Id<Raster>) -> Id<Page> {
        let page = Page::for_raster(raster, &self.rasters[raster]);
        let id = self.pages.alloc(page);
        self.page_order.push(id);
        id
    }

    /// Append `copies` consecutive pages that all show `raster`
    pub fn push_copies(&mut self, raster: Raster, copies: u32) -> Id<Raster> {
        let id = self.add_raster(raster);
        for _ in 0..copies {
            self.add_page(id);
        }
        id
    }

    /// Number of pages in the document
    pub fn page_count(&self) -> usize {
        self.page_order.len()
    }

    /// Get the page at a 0-based position in the document
    pub fn page(&self, page_index: usize) -> Option<&Page> {
        self.page_order.get(page_index).map(|id| &self.pages[*id])
    }

    /// Get the raster shown on the page at a 0-based position in the document
    pub fn page_raster(&self, page_index: usize) -> Option<&Raster> {
        self.page(page_index).map(|page| &self.rasters[page.raster])
    }

    /// Iterate over the rasters of every page, in page order
    pub fn page_rasters(&self) -> impl Iterator<Item = &Raster> + '_ {
        self.page_order
            .iter()
            .map(|id| &self.rasters[self.pages[*id].raster])
    }

    /// Render the whole document into an in-memory PDF
    pub fn to_pdf(&self) -> Vec<u8> {
        let mut refs = ObjectReferences::new();

        let catalog_id = refs.gen(RefType::Catalog);
        let page_tree_id = refs.gen(RefType::PageTree);

        let mut writer = Pdf::new();
        if let Some(info) = &self.info {
            info.write(&mut refs, &mut writer);
        }

        let page_refs: Vec<Ref> = (0..self.page_order.len())
            .map(|i| refs.gen(RefType::Page(i)))
            .collect();

        writer
            .pages(page_tree_id)
            .count(page_refs.len() as i32)
            .kids(page_refs);

        for (id, raster) in self.rasters.iter() {
            raster.write(&mut refs, id.index(), &mut writer);
        }

        for (page_index, id) in self.page_order.iter().enumerate() {
            self.pages[*id].write(&mut refs, page_index, &mut writer);
        }

        let mut catalog = writer.catalog(catalog_id);
        catalog.pages(page_tree_id);
        catalog.finish();

        writer.finish()
    }

    /// Write the entire document to the writer. The document is rendered in memory first,
    /// so nothing reaches `w` unless rendering succeeded.
    pub fn write<W: Write>(&self, mut w: W) -> Result<(), LabelError> {
        w.write_all(self.to_pdf().as_slice()).map_err(Into::into)
    }

    /// Render the document and write it to `path`. The file is only created once the
    /// complete PDF exists in memory.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), LabelError> {
        let path = path.as_ref();
        let bytes = self.to_pdf();
        debug!(
            "writing {} page(s), {} bytes to {}",
            self.page_count(),
            bytes.len(),
            path.display()
        );
        std::fs::write(path, bytes)?;
        Ok(())
    }
}
