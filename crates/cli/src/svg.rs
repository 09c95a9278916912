//! SVG sheet output.
//!
//! One SVG document per page, written into a staging directory next to the
//! final output. Pages are moved into place only once every page rendered,
//! so a failed run leaves the output directory as it was. A successful run
//! replaces any page files an earlier, longer run left behind.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use shelf_labels_core::layout::{CellPlacement, CellRenderer, PageSize};
use shelf_labels_settings::{Design, Font};
use tempfile::TempDir;

/// Prefix of the staging directory created inside the output directory.
pub(crate) const STAGING_PREFIX: &str = ".labels-";

/// File name of the 0-based `page`.
pub(crate) fn page_file_name(page: usize) -> String {
    format!("page-{:03}.svg", page + 1)
}

/// Whether `name` looks like a file produced by [`page_file_name`].
pub(crate) fn is_page_file_name(name: &str) -> bool {
    name.strip_prefix("page-")
        .and_then(|rest| rest.strip_suffix(".svg"))
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// Renders sticker cells into per-page SVG files.
pub(crate) struct SvgSheetRenderer {
    staging: TempDir,
    page_size: PageSize,
    font: Font,
    template_href: Option<String>,
    body: String,
    staged: Vec<PathBuf>,
}

impl SvgSheetRenderer {
    /// Renderer staging its pages inside `out_dir`.
    pub(crate) fn new(out_dir: &Path, page_size: PageSize, design: &Design) -> io::Result<Self> {
        let staging = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(out_dir)?;
        Ok(Self {
            staging,
            page_size,
            font: design.font.clone(),
            template_href: design.template.as_ref().and_then(|t| t.path.clone()),
            body: String::new(),
            staged: Vec::new(),
        })
    }

    /// Stage an extra file to be persisted together with the pages.
    pub(crate) fn stage_file(&mut self, name: &str, contents: &str) -> io::Result<()> {
        let path = self.staging.path().join(name);
        fs::write(&path, contents)?;
        self.staged.push(path);
        Ok(())
    }

    /// Move every staged file into `out_dir` and remove the staging
    /// directory. Page files in `out_dir` that this run did not produce are
    /// deleted first. Returns the final paths in staging order.
    pub(crate) fn persist(self, out_dir: &Path) -> io::Result<Vec<PathBuf>> {
        self.remove_stale_pages(out_dir)?;
        let mut written = Vec::with_capacity(self.staged.len());
        for staged in &self.staged {
            let Some(name) = staged.file_name() else {
                continue;
            };
            let target = out_dir.join(name);
            fs::rename(staged, &target)?;
            written.push(target);
        }
        self.staging.close()?;
        Ok(written)
    }

    fn remove_stale_pages(&self, out_dir: &Path) -> io::Result<()> {
        let staged: Vec<_> = self.staged.iter().filter_map(|p| p.file_name()).collect();
        for entry in fs::read_dir(out_dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let stale = name.to_str().is_some_and(is_page_file_name)
                && !staged.contains(&name.as_os_str())
                && entry.file_type()?.is_file();
            if stale {
                fs::remove_file(entry.path())?;
            }
        }
        Ok(())
    }

    fn write_cell(&mut self, cell: &CellPlacement<'_>) {
        let g = cell.geometry;
        // Page coordinates have y growing upwards; SVG's grow downwards.
        let top = self.page_size.height - g.y - g.height;
        let _ = write!(
            self.body,
            r#"  <g transform="translate({:.3} {:.3})">"#,
            g.x, top
        );
        self.body.push('\n');
        match &self.template_href {
            Some(href) => {
                let _ = writeln!(
                    self.body,
                    r#"    <image href="{}" width="{:.3}" height="{:.3}" preserveAspectRatio="none"/>"#,
                    xml_escape(href),
                    g.width,
                    g.height
                );
            }
            None => {
                let _ = writeln!(
                    self.body,
                    r##"    <rect width="{:.3}" height="{:.3}" fill="none" stroke="#cccccc" stroke-width="0.5"/>"##,
                    g.width, g.height
                );
            }
        }
        if let Some(text) = cell.text {
            let _ = writeln!(
                self.body,
                r#"    <text x="{:.3}" y="{:.3}" text-anchor="middle" dominant-baseline="hanging" font-family="{}" font-size="{}" fill="{}">{}</text>"#,
                g.width / 2.0,
                g.height * self.font.text_y_align,
                xml_escape(&self.font.family),
                self.font.size,
                self.font.color,
                xml_escape(text)
            );
        }
        self.body.push_str("  </g>\n");
    }

    fn document(&self) -> String {
        let (w, h) = (self.page_size.width, self.page_size.height);
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w:.3}pt\" height=\"{h:.3}pt\" viewBox=\"0 0 {w:.3} {h:.3}\">\n\
             {}</svg>\n",
            self.body
        )
    }
}

impl CellRenderer for SvgSheetRenderer {
    type Error = io::Error;

    fn render_cell(&mut self, cell: &CellPlacement<'_>) -> io::Result<()> {
        self.write_cell(cell);
        Ok(())
    }

    fn finish_page(&mut self, page: usize) -> io::Result<()> {
        let path = self.staging.path().join(page_file_name(page));
        fs::write(&path, self.document())?;
        self.staged.push(path);
        self.body.clear();
        Ok(())
    }
}

/// Escape text for use in XML content and attribute values.
pub(crate) fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_labels_core::layout::{DesignConfig, PaginationError, paginate};

    #[test]
    fn escapes_markup() {
        assert_eq!(xml_escape(r#"<a & "b">"#), "&lt;a &amp; &quot;b&quot;&gt;");
        assert_eq!(xml_escape("K4/11-101"), "K4/11-101");
    }

    #[test]
    fn page_names_are_one_based_and_padded() {
        assert_eq!(page_file_name(0), "page-001.svg");
        assert_eq!(page_file_name(41), "page-042.svg");
    }

    fn entry_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .filter_map(Result::ok)
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// Delegates to an [`SvgSheetRenderer`] but fails when finishing `fail_at`.
    struct FailingFinish {
        inner: SvgSheetRenderer,
        fail_at: usize,
    }

    impl CellRenderer for FailingFinish {
        type Error = io::Error;

        fn render_cell(&mut self, cell: &CellPlacement<'_>) -> io::Result<()> {
            self.inner.render_cell(cell)
        }

        fn finish_page(&mut self, page: usize) -> io::Result<()> {
            if page == self.fail_at {
                return Err(io::Error::other("disk full"));
            }
            self.inner.finish_page(page)
        }
    }

    #[test]
    fn page_file_names_recognised() {
        assert!(is_page_file_name("page-001.svg"));
        assert!(is_page_file_name(&page_file_name(1234)));
        assert!(!is_page_file_name("page-.svg"));
        assert!(!is_page_file_name("page-001.svg.bak"));
        assert!(!is_page_file_name("page-one.svg"));
        assert!(!is_page_file_name("listing.json"));
    }

    #[test]
    fn renders_pages_and_persists() {
        let out = tempfile::tempdir().unwrap();
        let config = DesignConfig::new(2, 2).unwrap();
        let mut renderer =
            SvgSheetRenderer::new(out.path(), PageSize::A4, &Design::default()).unwrap();
        let labels = ["A1/1-001", "A1/1-002", "A1/1-003", "A1/1-004", "A1/1-005"];
        let summary = paginate(&labels, &config, PageSize::A4, &mut renderer).unwrap();
        assert_eq!(summary.total_pages, 2);

        let pages = renderer.persist(out.path()).unwrap();
        assert_eq!(pages.len(), 2);
        let first = fs::read_to_string(&pages[0]).unwrap();
        assert_eq!(first.matches("<text").count(), 4);
        assert!(first.contains(">A1/1-001</text>"));
        let second = fs::read_to_string(&pages[1]).unwrap();
        assert_eq!(second.matches("<text").count(), 1);

        let leftovers: Vec<_> = fs::read_dir(out.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().starts_with(STAGING_PREFIX))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn first_row_sits_at_top_of_svg() {
        let out = tempfile::tempdir().unwrap();
        let page = PageSize {
            width: 200.0,
            height: 100.0,
        };
        let config = DesignConfig::new(2, 2).unwrap();
        let mut renderer = SvgSheetRenderer::new(out.path(), page, &Design::default()).unwrap();
        paginate(&["A1/1-001"], &config, page, &mut renderer).unwrap();
        let pages = renderer.persist(out.path()).unwrap();
        let svg = fs::read_to_string(&pages[0]).unwrap();
        assert!(svg.contains(r#"translate(0.000 0.000)"#), "{svg}");
    }

    #[test]
    fn failed_page_discards_staging() {
        let out = tempfile::tempdir().unwrap();
        fs::write(out.path().join("page-001.svg"), "previous run").unwrap();
        let config = DesignConfig::new(2, 2).unwrap();
        let inner = SvgSheetRenderer::new(out.path(), PageSize::A4, &Design::default()).unwrap();
        let staging = inner.staging.path().to_path_buf();
        let mut renderer = FailingFinish { inner, fail_at: 1 };
        let labels = ["A1/1-001", "A1/1-002", "A1/1-003", "A1/1-004", "A1/1-005"];

        let err = paginate(&labels, &config, PageSize::A4, &mut renderer).unwrap_err();
        assert!(matches!(err, PaginationError::FinishPage { page: 1, .. }), "{err}");
        // The first page was staged before the failure.
        assert!(staging.join("page-001.svg").exists());

        drop(renderer);
        assert!(!staging.exists());
        assert_eq!(entry_names(out.path()), vec!["page-001.svg"]);
        assert_eq!(
            fs::read_to_string(out.path().join("page-001.svg")).unwrap(),
            "previous run"
        );
    }

    #[test]
    fn persist_removes_pages_from_longer_run() {
        let out = tempfile::tempdir().unwrap();
        for name in ["page-001.svg", "page-002.svg", "page-003.svg", "notes.txt"] {
            fs::write(out.path().join(name), "old").unwrap();
        }
        let config = DesignConfig::new(2, 2).unwrap();
        let mut renderer =
            SvgSheetRenderer::new(out.path(), PageSize::A4, &Design::default()).unwrap();
        paginate(&["A1/1-001"], &config, PageSize::A4, &mut renderer).unwrap();
        renderer.stage_file("listing.json", "[]").unwrap();
        let written = renderer.persist(out.path()).unwrap();

        assert_eq!(written.len(), 2);
        assert_eq!(
            entry_names(out.path()),
            vec!["listing.json", "notes.txt", "page-001.svg"]
        );
        let page = fs::read_to_string(out.path().join("page-001.svg")).unwrap();
        assert!(page.contains(">A1/1-001</text>"));
    }
}
