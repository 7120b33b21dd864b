#![forbid(unsafe_code)]

//! Image loading and thumbnail derivation for canvases and image labels.
//!
//! Only the result contract matters here: a thumbnail keeps the source's
//! aspect ratio at a fixed target width, and a canvas never shows an image
//! wider than itself.

use std::path::{Path, PathBuf};

use image::{DynamicImage, GenericImageView, RgbImage, imageops::FilterType};

/// Where new image content comes from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// A file on disk, decoded on use.
    Path(PathBuf),
    /// An already decoded image.
    Image(DynamicImage),
}

impl From<&Path> for ImageSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<DynamicImage> for ImageSource {
    fn from(image: DynamicImage) -> Self {
        Self::Image(image)
    }
}

impl From<RgbImage> for ImageSource {
    fn from(image: RgbImage) -> Self {
        Self::Image(DynamicImage::ImageRgb8(image))
    }
}

impl ImageSource {
    /// Decode the source, rejecting images without pixels.
    pub fn load(&self) -> Result<DynamicImage, ImageError> {
        let image = match self {
            Self::Path(path) => image::open(path)?,
            Self::Image(image) => image.clone(),
        };
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(ImageError::Empty);
        }
        Ok(image)
    }
}

/// Size of a thumbnail `target_width` wide with the source's aspect ratio.
///
/// The height is `floor(target_width / width * height)`, never below one
/// pixel.
pub fn thumbnail_size(width: u32, height: u32, target_width: u32) -> Result<(u32, u32), ImageError> {
    if width == 0 || height == 0 {
        return Err(ImageError::Empty);
    }
    if target_width == 0 {
        return Err(ImageError::ZeroTargetWidth);
    }
    let scaled = u64::from(target_width) * u64::from(height) / u64::from(width);
    let target_height = u32::try_from(scaled).unwrap_or(u32::MAX).max(1);
    Ok((target_width, target_height))
}

/// Derive a thumbnail, preserving the source's colour type.
pub fn make_thumbnail(image: &DynamicImage, target_width: u32) -> Result<DynamicImage, ImageError> {
    let (width, height) = image.dimensions();
    let (new_w, new_h) = thumbnail_size(width, height, target_width)?;
    if (new_w, new_h) == (width, height) {
        return Ok(image.clone());
    }
    Ok(image.resize_exact(new_w, new_h, FilterType::Triangle))
}

/// Shrink `image` to at most `max_width` pixels wide.
///
/// Returns the RGB pixels to display and the ratio applied, if any.
pub(crate) fn fit_width(image: &DynamicImage, max_width: u32) -> (RgbImage, Option<f32>) {
    let (width, height) = image.dimensions();
    if max_width == 0 || width <= max_width {
        return (image.to_rgb8(), None);
    }
    let ratio = max_width as f32 / width as f32;
    let new_h = ((height as f32 * ratio) as u32).max(1);
    let resized = image.resize_exact(max_width, new_h, FilterType::Triangle);
    (resized.to_rgb8(), Some(ratio))
}

/// A blank placeholder of the given size.
pub fn substitute_image(width: u32, height: u32) -> RgbImage {
    RgbImage::new(width.max(1), height.max(1))
}

/// What a canvas or image label currently shows.
#[derive(Debug, Clone, Default)]
pub struct ImageState {
    /// The full-resolution source of the current image.
    pub source: Option<DynamicImage>,
    /// Size of the displayed pixels.
    pub shown: Option<(u32, u32)>,
    /// Downscale ratio applied to fit the canvas, if any.
    pub resize_ratio: Option<f32>,
    /// Visible area of a canvas; images wider than it are scaled down.
    pub viewport: Option<(u32, u32)>,
}

impl ImageState {
    pub(crate) fn with_viewport(width: u32, height: u32) -> Self {
        Self {
            viewport: Some((width, height)),
            ..Self::default()
        }
    }

    pub(crate) fn set(&mut self, source: DynamicImage, shown: &RgbImage, ratio: Option<f32>) {
        self.shown = Some(shown.dimensions());
        self.source = Some(source);
        self.resize_ratio = ratio;
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_none()
    }
}

/// Errors raised while loading or resizing images.
#[derive(Debug)]
pub enum ImageError {
    Decode(image::ImageError),
    /// The source has no pixels.
    Empty,
    /// A thumbnail was requested with zero width.
    ZeroTargetWidth,
}

impl From<image::ImageError> for ImageError {
    fn from(err: image::ImageError) -> Self {
        Self::Decode(err)
    }
}

impl std::fmt::Display for ImageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decode(err) => write!(f, "image decode error: {err}"),
            Self::Empty => write!(f, "image has no pixels"),
            Self::ZeroTargetWidth => write!(f, "thumbnail width must be positive"),
        }
    }
}

impl std::error::Error for ImageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode(err) => Some(err),
            _ => None,
        }
    }
}
