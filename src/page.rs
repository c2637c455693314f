use crate::image::Raster;
use crate::pagesize;
use crate::refs::{ObjectReferences, RefType};
use crate::units::Pt;
use id_arena::Id;
use pdf_writer::{Content, Finish, Name, Pdf, Rect};

/// One page of the output document. A page shows exactly one raster, scaled to fill
/// its media box. Several pages may show the same raster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page {
    /// The size of the page in points
    pub media_box: (Pt, Pt),
    /// The raster this page displays
    pub raster: Id<Raster>,
}

impl Page {
    /// Create a page sized so that `raster` prints at its own resolution
    pub fn for_raster(id: Id<Raster>, raster: &Raster) -> Page {
        Page {
            media_box: pagesize::to_points((raster.width(), raster.height()), raster.dpi()),
            raster: id,
        }
    }

    fn render(&self) -> Vec<u8> {
        let (w, h) = self.media_box;
        let mut content = Content::new();
        content.save_state();
        content.transform([w.0, 0.0, 0.0, h.0, 0.0, 0.0]);
        content.x_object(Name(format!("I{}", self.raster.index()).as_bytes()));
        content.restore_state();
        content.finish()
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, page_index: usize, writer: &mut Pdf) {
        let id = refs
            .get(RefType::Page(page_index))
            .expect("page refs are generated before pages are written");
        let tree = refs
            .get(RefType::PageTree)
            .expect("page tree ref is generated first");
        let image = refs
            .get(RefType::Image(self.raster.index()))
            .expect("images are written before pages");

        let mut page = writer.page(id);
        let (w, h) = self.media_box;
        page.media_box(Rect::new(0.0, 0.0, w.0, h.0));
        page.parent(tree);

        let mut resources = page.resources();
        resources
            .x_objects()
            .pair(Name(format!("I{}", self.raster.index()).as_bytes()), image);
        resources.finish();

        let content_id = refs.gen(RefType::ContentForPage(page_index));
        page.contents(content_id);
        page.finish();

        let rendered = self.render();
        writer.stream(content_id, rendered.as_slice());
    }
}
