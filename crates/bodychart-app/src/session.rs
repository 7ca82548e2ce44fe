//! One headless editing session: load, replay, save, store.

use crate::args::Args;
use crate::error::{read_file, AppError, AppResult};
use crate::script::{replay, Script};
use bodychart_core::{AnnotationSurface, DrawingStore, ExportedImage, FileDrawingStore, SurfaceConfig};

/// Where saved drawings go, if anywhere.
struct StoreTarget {
    store: FileDrawingStore,
    chart_entry: String,
}

impl StoreTarget {
    fn open(args: &Args) -> AppResult<Option<Self>> {
        let Some(chart_entry) = args.chart_entry.clone() else {
            return Ok(None);
        };
        let store = match &args.store_dir {
            Some(dir) => FileDrawingStore::new(dir.clone())?,
            None => FileDrawingStore::default_location()?,
        };
        log::info!("Using drawing store at {}", store.base_path().display());
        Ok(Some(Self { store, chart_entry }))
    }

    fn append(&self, image: &ExportedImage) -> AppResult<()> {
        let record = pollster::block_on(self.store.append(&self.chart_entry, image))?;
        log::info!("Stored drawing {} for chart entry {}", record.id, record.chart_entry_id);
        Ok(())
    }
}

/// Run a full session and return the final flattened drawing.
pub fn run(args: &Args) -> AppResult<ExportedImage> {
    let config = match &args.config {
        Some(path) => SurfaceConfig::load(path)?,
        None => SurfaceConfig::default(),
    };
    let mut surface = AnnotationSurface::new(config)?;
    let store = StoreTarget::open(args)?;

    if let Some(path) = &args.background {
        let bytes = read_file(path)?;
        // Keep going on the fallback fill, as the editor does while loading
        if surface.load_background(&bytes).is_err() {
            log::warn!("Continuing without background {}", path.display());
        }
    }

    if let Some(path) = &args.saved {
        surface.load_saved_drawing(&read_file(path)?)?;
    } else if let Some(target) = &store {
        let latest = pollster::block_on(target.store.latest(&target.chart_entry))?;
        if let Some(record) = latest {
            log::info!("Reopening drawing {} from {}", record.id, record.created_at);
            surface.load_saved_drawing(record.drawing_data.as_bytes())?;
        }
    }

    let script = match &args.script {
        Some(path) => Script::load(path)?,
        None => Script::default(),
    };
    let (_, saves) = replay(&mut surface, &script)?;
    if let Some(target) = &store {
        for image in &saves {
            target.append(image)?;
        }
    }

    let image = surface.save()?;
    std::fs::write(&args.out, &image.png).map_err(|source| AppError::Io {
        path: args.out.clone(),
        source,
    })?;
    log::info!("Wrote {}", args.out.display());

    if let Some(target) = &store {
        target.append(&image)?;
    }
    Ok(image)
}
