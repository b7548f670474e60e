//! Slice job descriptors.

use image::RgbaImage;
use std::fmt;
use std::path::{Path, PathBuf};

/// Axis-aligned rectangle in canvas coordinates.
///
/// Origin is the top-left corner; `width` and `height` are in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SliceRect {
    /// Left edge
    pub x: u32,
    /// Top edge
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl SliceRect {
    /// Create a rectangle from its origin and extent.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub const fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub const fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Number of pixels covered.
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Whether the two rectangles share at least one pixel.
    pub fn intersects(&self, other: &SliceRect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

impl fmt::Display for SliceRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{})-({},{})",
            self.x,
            self.y,
            self.right(),
            self.bottom()
        )
    }
}

/// Immutable description of one slice of the final canvas.
///
/// A job names the source image, the band of the canvas it fills and the
/// offset in the source image the band is read from. It carries no pixels:
/// decoding happens in a worker and produces a separate [`CroppedSlice`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceJob {
    index: usize,
    path: PathBuf,
    destination: SliceRect,
}

impl SliceJob {
    /// Create a job for the `index`-th source image.
    pub fn new(index: usize, path: impl Into<PathBuf>, destination: SliceRect) -> Self {
        Self {
            index,
            path: path.into(),
            destination,
        }
    }

    /// Position of the source image in the sorted input list.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Source image path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Band of the canvas this job fills.
    pub fn destination(&self) -> SliceRect {
        self.destination
    }

    /// Region of the source image to copy.
    ///
    /// Anchored at the destination origin so every slice shows the part of its
    /// own photo that sits at that position in the frame.
    pub fn source_crop(&self) -> SliceRect {
        self.destination
    }
}

/// A job together with the pixels cropped for it.
///
/// `pixels` always has exactly the destination's dimensions.
#[derive(Debug, Clone)]
pub struct CroppedSlice {
    /// The job the pixels belong to
    pub job: SliceJob,
    /// Cropped RGBA pixels, `destination.width × destination.height`
    pub pixels: RgbaImage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let rect = SliceRect::new(10, 0, 4, 20);
        assert_eq!(rect.right(), 14);
        assert_eq!(rect.bottom(), 20);
    }

    #[test]
    fn test_adjacent_rects_do_not_intersect() {
        let a = SliceRect::new(0, 0, 4, 10);
        let b = SliceRect::new(4, 0, 3, 10);
        assert!(!a.intersects(&b));
        assert!(!b.intersects(&a));
    }

    #[test]
    fn test_overlapping_rects_intersect() {
        let a = SliceRect::new(0, 0, 5, 10);
        let b = SliceRect::new(4, 0, 3, 10);
        assert!(a.intersects(&b));
    }

    #[test]
    fn test_source_crop_anchored_at_destination() {
        let job = SliceJob::new(2, "/photos/c.jpg", SliceRect::new(7, 0, 3, 480));
        assert_eq!(job.source_crop(), SliceRect::new(7, 0, 3, 480));
        assert_eq!(job.index(), 2);
        assert_eq!(job.path(), Path::new("/photos/c.jpg"));
    }

    #[test]
    fn test_rect_display() {
        assert_eq!(SliceRect::new(1, 2, 3, 4).to_string(), "(1,2)-(4,6)");
    }
}
