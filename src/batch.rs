//! Parallel multi-file export.
//!
//! Batch runs apply one aspect selection and one set of export settings to
//! many source files. Each file gets its own [`Session`]: identify the
//! natural size, compute the crop (centered, or from a shared drag
//! rectangle), then export into the output directory under a generated
//! filename.
//!
//! Files are processed in parallel with rayon. Failures are isolated per
//! file: a corrupt input produces a [`BatchEvent::Failed`] and the run
//! continues. Progress events flow through an optional mpsc channel so the
//! caller can print them from a single thread while workers stay silent.

use crate::imaging::{
    CropRect, Dimensions, ExportFormat, ImageBackend, Quality, export_image, is_supported_input,
    plan_export,
};
use crate::naming::{export_filename, source_prefix};
use crate::session::{Selection, Session, SourceImage};
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::mpsc::Sender;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("no supported input files found")]
    NoInputs,
}

/// Progress event emitted once per input file.
#[derive(Debug, Clone)]
pub enum BatchEvent {
    Exported {
        source: PathBuf,
        output: PathBuf,
        dimensions: Dimensions,
        bytes: u64,
    },
    Failed {
        source: PathBuf,
        reason: String,
    },
}

/// Outcome counts for a finished run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchSummary {
    pub exported: usize,
    pub failed: usize,
}

/// Settings shared by every file in a batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub selection: Selection,
    pub format: ExportFormat,
    pub quality: Quality,
    pub out_dir: PathBuf,
    /// Filename prefix when `use_original_name` is off.
    pub prefix: String,
    /// Use each source file's stem as its export prefix.
    pub use_original_name: bool,
    /// A drag rectangle in displayed-space pixels plus the displayed size it
    /// was made against. Applied to every file; omitted means the centered
    /// crop for the selection.
    pub drag: Option<(CropRect, Dimensions)>,
}

/// Expand CLI inputs into a sorted list of image files.
///
/// Directories are walked recursively and filtered to supported extensions;
/// explicit file arguments are taken verbatim so a surprising extension
/// still fails loudly at decode time rather than being silently skipped.
pub fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>, BatchError> {
    let mut inputs = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry.map_err(|e| {
                    BatchError::Io(e.into_io_error().unwrap_or_else(|| {
                        std::io::Error::other("walkdir error without io cause")
                    }))
                })?;
                if entry.file_type().is_file() && is_supported_input(entry.path()) {
                    inputs.push(entry.into_path());
                }
            }
        } else {
            inputs.push(path.clone());
        }
    }
    inputs.sort();
    if inputs.is_empty() {
        return Err(BatchError::NoInputs);
    }
    Ok(inputs)
}

/// Run a batch export over `inputs`.
///
/// Creates the output directory, processes every file in parallel, and
/// returns the outcome counts. Per-file failures never abort the run.
pub fn run(
    backend: &(impl ImageBackend + Sync),
    inputs: &[PathBuf],
    options: &BatchOptions,
    events: Option<Sender<BatchEvent>>,
) -> Result<BatchSummary, BatchError> {
    fs::create_dir_all(&options.out_dir)?;

    // Generated filenames are second-granular; a shared claim set keeps
    // concurrent workers from writing over each other.
    let claimed = Mutex::new(HashSet::new());

    let results: Vec<bool> = inputs
        .par_iter()
        .map(|source| {
            let event = match export_one(backend, source, options, &claimed) {
                Ok(event) => event,
                Err(reason) => BatchEvent::Failed {
                    source: source.clone(),
                    reason,
                },
            };
            let ok = matches!(event, BatchEvent::Exported { .. });
            if let Some(tx) = &events {
                // Receiver hangup just means nobody is listening anymore.
                let _ = tx.send(event);
            }
            ok
        })
        .collect();

    let exported = results.iter().filter(|ok| **ok).count();
    Ok(BatchSummary {
        exported,
        failed: results.len() - exported,
    })
}

/// Claim a unique output path for `filename` inside `out_dir`, appending a
/// numeric suffix when the name is already taken by this run or on disk.
fn claim_output(claimed: &Mutex<HashSet<PathBuf>>, out_dir: &Path, filename: &str) -> PathBuf {
    let (stem, ext) = filename
        .rsplit_once('.')
        .unwrap_or((filename, ""));
    let mut set = claimed.lock().unwrap();
    let mut candidate = out_dir.join(filename);
    let mut counter = 2;
    while set.contains(&candidate) || candidate.exists() {
        candidate = out_dir.join(format!("{stem}_{counter}.{ext}"));
        counter += 1;
    }
    set.insert(candidate.clone());
    candidate
}

fn export_one(
    backend: &impl ImageBackend,
    source: &Path,
    options: &BatchOptions,
    claimed: &Mutex<HashSet<PathBuf>>,
) -> Result<BatchEvent, String> {
    let natural = backend.identify(source).map_err(|e| e.to_string())?;

    let mut session = Session::default();
    match &options.selection {
        Selection::Preset(p) => session.select_preset(*p),
        Selection::Custom { width, height } => session
            .select_custom(*width, *height)
            .map_err(|e| e.to_string())?,
    }
    session.load_image(SourceImage::new(source, natural));
    if let Some((rect, displayed)) = options.drag {
        session
            .complete_drag(rect, displayed)
            .map_err(|e| e.to_string())?;
    }

    let crop = session.crop().ok_or("no crop computed")?;
    let target = session.export_dimensions().map_err(|e| e.to_string())?;

    let prefix = if options.use_original_name {
        source_prefix(source)
    } else {
        &options.prefix
    };
    let filename = export_filename(
        prefix,
        target,
        options.format,
        chrono::Local::now().naive_local(),
    );
    let output = claim_output(claimed, &options.out_dir, &filename);

    let params = plan_export(
        source,
        &output,
        crop,
        Some(target),
        options.format,
        options.quality,
    );
    let exported = export_image(backend, &params).map_err(|e| e.to_string())?;

    Ok(BatchEvent::Exported {
        source: source.to_path_buf(),
        output: exported.path,
        dimensions: exported.dimensions,
        bytes: exported.bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::find_preset;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use std::sync::mpsc;
    use tempfile::TempDir;

    fn options(out_dir: &Path) -> BatchOptions {
        BatchOptions {
            selection: Selection::Preset(*find_preset("16:9").unwrap()),
            format: ExportFormat::Jpeg,
            quality: Quality::default(),
            out_dir: out_dir.to_path_buf(),
            prefix: "image".to_string(),
            use_original_name: false,
            drag: None,
        }
    }

    #[test]
    fn collect_inputs_walks_directories() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.jpg"), b"x").unwrap();
        fs::write(dir.path().join("a.png"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("c.webp"), b"x").unwrap();

        let inputs = collect_inputs(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<_> = inputs
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.png", "b.jpg", "sub/c.webp"]);
    }

    #[test]
    fn collect_inputs_takes_explicit_files_verbatim() {
        let dir = TempDir::new().unwrap();
        let odd = dir.path().join("photo.tiff");
        fs::write(&odd, b"x").unwrap();

        let inputs = collect_inputs(&[odd.clone()]).unwrap();
        assert_eq!(inputs, vec![odd]);
    }

    #[test]
    fn collect_inputs_with_nothing_found_errors() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            collect_inputs(&[dir.path().to_path_buf()]),
            Err(BatchError::NoInputs)
        ));
    }

    #[test]
    fn run_exports_each_input() {
        let dir = TempDir::new().unwrap();
        let backend = MockBackend::with_dimensions(vec![
            Dimensions::new(4000, 3000),
            Dimensions::new(1920, 1080),
        ]);
        let inputs = vec![PathBuf::from("/a.jpg"), PathBuf::from("/b.jpg")];

        let summary = run(&backend, &inputs, &options(dir.path()), None).unwrap();
        assert_eq!(summary, BatchSummary { exported: 2, failed: 0 });

        let exports: Vec<_> = backend
            .get_operations()
            .into_iter()
            .filter(|op| matches!(op, RecordedOp::Export { .. }))
            .collect();
        assert_eq!(exports.len(), 2);
    }

    #[test]
    fn run_emits_events_with_preset_target_dimensions() {
        let dir = TempDir::new().unwrap();
        let backend = MockBackend::with_dimensions(vec![Dimensions::new(4000, 3000)]);
        let (tx, rx) = mpsc::channel();

        run(&backend, &[PathBuf::from("/a.jpg")], &options(dir.path()), Some(tx)).unwrap();

        let event = rx.recv().unwrap();
        match event {
            BatchEvent::Exported {
                output, dimensions, bytes, ..
            } => {
                assert_eq!(dimensions, Dimensions::new(1920, 1080));
                assert_eq!(bytes, 1024);
                let name = output.file_name().unwrap().to_string_lossy().into_owned();
                assert!(name.starts_with("image_1920x1080_"), "{name}");
                assert!(name.ends_with(".jpg"));
            }
            other => panic!("expected Exported, got {other:?}"),
        }
    }

    #[test]
    fn run_isolates_per_file_failures() {
        let dir = TempDir::new().unwrap();
        // Second identify call hits the exhausted mock and fails.
        let backend = MockBackend::with_dimensions(vec![Dimensions::new(800, 600)]);
        let inputs = vec![PathBuf::from("/ok.jpg"), PathBuf::from("/broken.jpg")];
        let (tx, rx) = mpsc::channel();

        let summary = run(&backend, &inputs, &options(dir.path()), Some(tx)).unwrap();
        assert_eq!(summary.exported, 1);
        assert_eq!(summary.failed, 1);

        let events: Vec<_> = rx.iter().collect();
        assert_eq!(events.len(), 2);
        assert!(events.iter().any(|e| matches!(e, BatchEvent::Failed { .. })));
    }

    #[test]
    fn original_name_prefix_uses_source_stem() {
        let dir = TempDir::new().unwrap();
        let backend = MockBackend::with_dimensions(vec![Dimensions::new(4000, 3000)]);
        let (tx, rx) = mpsc::channel();
        let mut opts = options(dir.path());
        opts.use_original_name = true;

        run(&backend, &[PathBuf::from("/photos/sunset.jpg")], &opts, Some(tx)).unwrap();

        match rx.recv().unwrap() {
            BatchEvent::Exported { output, .. } => {
                let name = output.file_name().unwrap().to_string_lossy().into_owned();
                assert!(name.starts_with("sunset_1920x1080_"), "{name}");
            }
            other => panic!("expected Exported, got {other:?}"),
        }
    }

    #[test]
    fn shared_drag_is_applied_per_file() {
        let dir = TempDir::new().unwrap();
        let backend = MockBackend::with_dimensions(vec![Dimensions::new(4000, 3000)]);
        let mut opts = options(dir.path());
        opts.drag = Some((CropRect::new(100, 50, 200, 150), Dimensions::new(800, 600)));

        run(&backend, &[PathBuf::from("/a.jpg")], &opts, None).unwrap();

        let ops = backend.get_operations();
        let export = ops
            .iter()
            .find(|op| matches!(op, RecordedOp::Export { .. }))
            .unwrap();
        if let RecordedOp::Export { crop, .. } = export {
            assert_eq!(*crop, CropRect::new(500, 250, 1000, 750));
        }
    }

    #[test]
    fn same_second_filenames_get_unique_suffixes() {
        let dir = TempDir::new().unwrap();
        let claimed = Mutex::new(HashSet::new());
        let name = "image_1920x1080_20260825_120000.jpg";
        let a = claim_output(&claimed, dir.path(), name);
        let b = claim_output(&claimed, dir.path(), name);
        let c = claim_output(&claimed, dir.path(), name);
        assert_ne!(a, b);
        assert!(b.to_string_lossy().ends_with("_2.jpg"));
        assert!(c.to_string_lossy().ends_with("_3.jpg"));
    }

    #[test]
    fn claim_avoids_files_already_on_disk() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("image_100x100_20260825_120000.jpg"), b"x").unwrap();
        let claimed = Mutex::new(HashSet::new());
        let path = claim_output(&claimed, dir.path(), "image_100x100_20260825_120000.jpg");
        assert!(path.to_string_lossy().ends_with("_2.jpg"));
    }

    #[test]
    fn custom_selection_sizes_the_output() {
        let dir = TempDir::new().unwrap();
        let backend = MockBackend::with_dimensions(vec![Dimensions::new(4000, 3000)]);
        let (tx, rx) = mpsc::channel();
        let mut opts = options(dir.path());
        opts.selection = Selection::Custom {
            width: 970,
            height: 400,
        };

        run(&backend, &[PathBuf::from("/a.jpg")], &opts, Some(tx)).unwrap();

        match rx.recv().unwrap() {
            BatchEvent::Exported { dimensions, .. } => {
                assert_eq!(dimensions, Dimensions::new(970, 400));
            }
            other => panic!("expected Exported, got {other:?}"),
        }
    }
}
