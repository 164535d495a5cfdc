//! Lazily decoded catalog over an image directory tree.
//!
//! Paths are collected once when the catalog is opened; every cursor pass
//! decodes images on demand. A file that cannot be decoded yields a
//! `CatalogEntryUnreadable` item and the pass continues.

use crate::axes::{project_color_axes, AxisBins};
use crate::catalog::{Catalog, CatalogEntry, Cursor, Feature, MemoryCatalog};
use crate::histogram::build_histogram;
use crate::image::io::{has_image_extension, load_pixels};
use crate::image::PixelArray;
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::util::{HistMatchError, HistMatchResult};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Catalog backed by image files under a root directory.
pub struct DirectoryCatalog {
    root: PathBuf,
    paths: Vec<PathBuf>,
    bins: usize,
    axis_bins: AxisBins,
}

impl DirectoryCatalog {
    /// Collects image files under `root`, descending at most `max_depth`
    /// directory levels (0 keeps only files directly in `root`).
    pub fn open<P: AsRef<Path>>(root: P, max_depth: usize, bins: usize) -> HistMatchResult<Self> {
        let root = root.as_ref().to_path_buf();
        if bins == 0 {
            return Err(HistMatchError::InvalidHistogram {
                reason: "zero bins",
            });
        }
        if !root.is_dir() {
            return Err(HistMatchError::ImageIo {
                reason: format!("{} is not a directory", root.display()),
            });
        }

        let _span = trace_span!("explore", max_depth = max_depth).entered();
        let mut paths = Vec::new();
        explore(&root, 0, max_depth, &mut paths);
        paths.sort();
        trace_event!("explore_done", files = paths.len());

        Ok(Self {
            root,
            paths,
            bins,
            axis_bins: AxisBins::default(),
        })
    }

    /// Sets the color-axis layout used for the axis cursor.
    pub fn with_axis_bins(mut self, axis_bins: AxisBins) -> Self {
        self.axis_bins = axis_bins;
        self
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Image paths found when the catalog was opened.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Copies an image into the root directory and appends it to the catalog.
    ///
    /// The file must decode as an image. An existing file with the same name
    /// is left in place and the catalog keeps a single entry for it.
    pub fn add<P: AsRef<Path>>(&mut self, image: P) -> HistMatchResult<PathBuf> {
        let src = image.as_ref();
        if !has_image_extension(src) {
            return Err(HistMatchError::InvalidInput("file does not carry an image extension"));
        }
        load_pixels(src)?;
        let name = src
            .file_name()
            .ok_or(HistMatchError::InvalidInput("image path has no file name"))?;
        let dest = self.root.join(name);
        if !dest.exists() {
            fs::copy(src, &dest).map_err(|err| HistMatchError::ImageIo {
                reason: err.to_string(),
            })?;
        }
        if !self.paths.contains(&dest) {
            self.paths.push(dest.clone());
            self.paths.sort();
        }
        trace_event!("add", files = self.paths.len());
        Ok(dest)
    }

    /// Decodes every image once into a memory catalog.
    ///
    /// Returns the catalog and the number of files that were skipped.
    pub fn load_into_memory(&self) -> HistMatchResult<(MemoryCatalog, usize)> {
        let _span = trace_span!("index", files = self.paths.len()).entered();
        let mut catalog = MemoryCatalog::new(self.bins)?.with_axis_bins(self.axis_bins);
        let mut skipped = 0usize;
        for path in &self.paths {
            let id = path.display().to_string();
            match load_pixels(path) {
                Ok(pixels) => catalog.add(id, pixels)?,
                Err(err) => {
                    let reason = err.to_string();
                    trace_warn!("skip_image", path = id.as_str(), reason = reason.as_str());
                    skipped += 1;
                }
            }
        }
        trace_event!("index_done", indexed = catalog.len(), skipped = skipped);
        Ok((catalog, skipped))
    }

    fn entries<'a, F>(&'a self, make: F) -> Cursor<'a>
    where
        F: Fn(Arc<PixelArray>) -> HistMatchResult<Feature> + 'a,
    {
        Box::new(self.paths.iter().map(move |path| {
            let id = path.display().to_string();
            let feature = load_pixels(path)
                .and_then(|pixels| make(Arc::new(pixels)))
                .map_err(|err| HistMatchError::CatalogEntryUnreadable {
                    id: id.clone(),
                    reason: err.to_string(),
                })?;
            Ok(CatalogEntry::new(id, feature))
        }))
    }
}

fn explore(dir: &Path, depth: usize, max_depth: usize, out: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            let reason = err.to_string();
            trace_warn!(
                "skip_dir",
                path = dir.display().to_string().as_str(),
                reason = reason.as_str()
            );
            return;
        }
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            if depth < max_depth {
                explore(&path, depth + 1, max_depth, out);
            }
        } else if has_image_extension(&path) {
            out.push(path);
        }
    }
}

impl Catalog for DirectoryCatalog {
    fn len(&self) -> usize {
        self.paths.len()
    }

    fn histograms(&self) -> Cursor<'_> {
        let bins = self.bins;
        self.entries(move |pixels| build_histogram(pixels, bins, false).map(Feature::Histogram))
    }

    fn axis_vectors(&self) -> Cursor<'_> {
        let bins = self.bins;
        let axis_bins = self.axis_bins;
        self.entries(move |pixels| {
            let hist = build_histogram(pixels, bins, false)?;
            project_color_axes(&hist, axis_bins).map(Feature::Axes)
        })
    }

    fn grey_histograms(&self) -> Cursor<'_> {
        let bins = self.bins;
        self.entries(move |pixels| build_histogram(pixels, bins, true).map(Feature::Histogram))
    }
}

#[cfg(test)]
mod tests {
    use super::DirectoryCatalog;
    use crate::catalog::Catalog;
    use crate::util::HistMatchError;
    use std::fs;

    fn write_png(path: &std::path::Path, color: [u8; 3]) {
        image::RgbImage::from_pixel(4, 4, image::Rgb(color))
            .save(path)
            .unwrap();
    }

    #[test]
    fn explores_to_depth_and_filters_extensions() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("a.png"), [255, 0, 0]);
        fs::write(dir.path().join("notes.txt"), "not an image").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        write_png(&dir.path().join("sub").join("b.png"), [0, 255, 0]);

        let shallow = DirectoryCatalog::open(dir.path(), 0, 16).unwrap();
        assert_eq!(shallow.len(), 1);
        let deep = DirectoryCatalog::open(dir.path(), 1, 16).unwrap();
        assert_eq!(deep.len(), 2);
    }

    #[test]
    fn add_copies_image_into_root_once() {
        let db = tempfile::tempdir().unwrap();
        write_png(&db.path().join("a.png"), [1, 2, 3]);
        let elsewhere = tempfile::tempdir().unwrap();
        let query = elsewhere.path().join("query.png");
        write_png(&query, [200, 100, 50]);

        let mut catalog = DirectoryCatalog::open(db.path(), 0, 16).unwrap();
        let dest = catalog.add(&query).unwrap();
        assert_eq!(dest, db.path().join("query.png"));
        assert!(dest.is_file());
        assert_eq!(catalog.len(), 2);

        catalog.add(&query).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.histograms().filter(|item| item.is_ok()).count(), 2);
    }

    #[test]
    fn add_rejects_non_images() {
        let db = tempfile::tempdir().unwrap();
        let notes = db.path().join("notes.txt");
        fs::write(&notes, "text").unwrap();
        let broken = db.path().join("broken.png");
        fs::write(&broken, b"not a png").unwrap();

        let mut catalog = DirectoryCatalog::open(db.path(), 0, 16).unwrap();
        assert!(matches!(
            catalog.add(&notes),
            Err(HistMatchError::InvalidInput(_))
        ));
        assert!(matches!(
            catalog.add(&broken),
            Err(HistMatchError::ImageIo { .. })
        ));
    }

    #[test]
    fn corrupt_files_surface_as_unreadable_entries() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("good.png"), [10, 20, 30]);
        fs::write(dir.path().join("broken.png"), b"not a png").unwrap();

        let catalog = DirectoryCatalog::open(dir.path(), 0, 16).unwrap();
        let items: Vec<_> = catalog.histograms().collect();
        assert_eq!(items.len(), 2);
        assert!(matches!(
            items[0],
            Err(HistMatchError::CatalogEntryUnreadable { .. })
        ));
        assert!(items[1].is_ok());

        let (memory, skipped) = catalog.load_into_memory().unwrap();
        assert_eq!(memory.len(), 1);
        assert_eq!(skipped, 1);
    }
}
