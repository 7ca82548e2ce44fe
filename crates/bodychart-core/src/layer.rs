//! Raster layers: the mutable ink overlay and the reference background.

use crate::color::InkColor;
use crate::surface::SurfaceError;
use tiny_skia::{Color, FilterQuality, Pixmap, PixmapPaint, PremultipliedColorU8, Transform};

/// An owned premultiplied RGBA8 raster buffer.
#[derive(Debug, Clone)]
pub struct Layer {
    pixmap: Pixmap,
}

impl Layer {
    /// Create a fully transparent layer.
    pub fn new(width: u32, height: u32) -> Result<Self, SurfaceError> {
        let pixmap = Pixmap::new(width, height)
            .ok_or(SurfaceError::InvalidSize { width, height })?;
        Ok(Self { pixmap })
    }

    /// Wrap an existing pixmap.
    pub fn from_pixmap(pixmap: Pixmap) -> Self {
        Self { pixmap }
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    /// Reset every pixel to fully transparent.
    pub fn clear(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
    }

    /// Whether every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.pixmap.pixels().iter().all(|p| p.alpha() == 0)
    }

    /// Pixel at `(x, y)`, or `None` outside the layer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<PremultipliedColorU8> {
        self.pixmap.pixel(x, y)
    }

    /// Whether both layers have the same size and identical pixels.
    pub fn same_pixels(&self, other: &Layer) -> bool {
        self.width() == other.width()
            && self.height() == other.height()
            && self.pixmap.data() == other.pixmap.data()
    }

    /// Overwrite this layer's pixels with `other`'s.
    pub fn restore_from(&mut self, other: &Layer) {
        if self.width() == other.width() && self.height() == other.height() {
            self.pixmap.data_mut().copy_from_slice(other.pixmap.data());
        } else {
            self.pixmap = other.pixmap.clone();
        }
    }

    #[cfg(test)]
    pub(crate) fn fill_pixel(&mut self, x: u32, y: u32, color: Color) {
        let width = self.width();
        if let Some(pixel) = self.pixmap.pixels_mut().get_mut((y * width + x) as usize) {
            *pixel = color.premultiply().to_color_u8();
        }
    }
}

/// Load state of the reference background image.
///
/// The image typically arrives after the surface exists, so drawing and
/// saving must cope with it still being `Loading`.
#[derive(Debug, Clone)]
pub enum BackgroundState {
    Loading,
    /// Image already scaled to the canvas's native size.
    Ready(Pixmap),
}

/// The immutable reference layer underneath the overlay.
///
/// Drawing never touches the background. It is composed from the reference
/// image (or a neutral fill while that is loading) and, for charts saved
/// before the two-layer model, the previously-saved flattened drawing.
#[derive(Debug, Clone)]
pub struct Background {
    state: BackgroundState,
    legacy: Option<Pixmap>,
    width: u32,
    height: u32,
    fallback: InkColor,
}

impl Background {
    pub fn new(width: u32, height: u32, fallback: InkColor) -> Self {
        Self {
            state: BackgroundState::Loading,
            legacy: None,
            width,
            height,
            fallback,
        }
    }

    pub fn state(&self) -> &BackgroundState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, BackgroundState::Ready(_))
    }

    pub fn has_legacy(&self) -> bool {
        self.legacy.is_some()
    }

    /// Install the reference image, scaling it to the native canvas size.
    pub fn set_image(&mut self, image: &Pixmap) -> Result<(), SurfaceError> {
        let scaled = scale_to(image, self.width, self.height)?;
        self.state = BackgroundState::Ready(scaled);
        log::info!(
            "Background ready ({}x{} scaled to {}x{})",
            image.width(),
            image.height(),
            self.width,
            self.height
        );
        Ok(())
    }

    /// Install a previously-saved flattened drawing on top of the reference image.
    pub fn set_legacy(&mut self, image: &Pixmap) -> Result<(), SurfaceError> {
        self.legacy = Some(scale_to(image, self.width, self.height)?);
        Ok(())
    }

    /// Paint the background into `target`, replacing its contents.
    pub fn render_into(&self, target: &mut Pixmap) {
        match &self.state {
            BackgroundState::Ready(image) => {
                target.fill(Color::TRANSPARENT);
                target.draw_pixmap(
                    0,
                    0,
                    image.as_ref(),
                    &PixmapPaint::default(),
                    Transform::identity(),
                    None,
                );
            }
            BackgroundState::Loading => {
                log::warn!("Background not loaded yet, using fallback fill {}", self.fallback);
                target.fill(self.fallback.into());
            }
        }

        if let Some(legacy) = &self.legacy {
            target.draw_pixmap(
                0,
                0,
                legacy.as_ref(),
                &PixmapPaint::default(),
                Transform::identity(),
                None,
            );
        }
    }
}

/// Copy `image` into a new pixmap of `width` x `height`, stretching it to fit.
fn scale_to(image: &Pixmap, width: u32, height: u32) -> Result<Pixmap, SurfaceError> {
    if image.width() == width && image.height() == height {
        return Ok(image.clone());
    }

    let mut scaled = Pixmap::new(width, height).ok_or(SurfaceError::InvalidSize { width, height })?;
    let sx = width as f32 / image.width() as f32;
    let sy = height as f32 / image.height() as f32;
    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..Default::default()
    };
    scaled.draw_pixmap(0, 0, image.as_ref(), &paint, Transform::from_scale(sx, sy), None);
    Ok(scaled)
}
