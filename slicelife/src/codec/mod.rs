//! Image codec boundary.
//!
//! - [`ImageLoader`] decodes source photos for the workers
//! - [`CanvasEncoder`] turns the finished canvas into file bytes

mod decoder;
mod encoder;

pub use decoder::{DecodeError, FsImageLoader, ImageLoader};
pub use encoder::{
    write_atomic, CanvasEncoder, EncodeError, JpegCanvasEncoder, DEFAULT_JPEG_QUALITY,
};
