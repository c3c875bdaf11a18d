use crate::bitmap::Bitmap;
use crate::error::SnapshotError;

/// Anything that can produce a rendered bitmap of itself.
///
/// This is the seam between the snapshot machinery and the UI framework:
/// views, layers, and offscreen scenes all implement it, and the comparator
/// never sees the distinction. An already-rendered [`Bitmap`] implements it
/// as the identity render, so raw pixel buffers plug straight in.
///
/// # Examples
///
/// ```
/// use refshot::{Bitmap, Renderable};
///
/// struct SolidView {
///     color: [u8; 4],
/// }
///
/// impl Renderable for SolidView {
///     fn render(&self) -> Result<Bitmap, refshot::SnapshotError> {
///         let mut data = Vec::new();
///         for _ in 0..4 {
///             data.extend_from_slice(&self.color);
///         }
///         Bitmap::from_rgba(2, 2, data)
///     }
/// }
///
/// let view = SolidView { color: [9, 9, 9, 255] };
/// assert_eq!(view.render().unwrap().pixel(1, 1), Some([9, 9, 9, 255]));
/// ```
pub trait Renderable {
    fn render(&self) -> Result<Bitmap, SnapshotError>;
}

impl Renderable for Bitmap {
    fn render(&self) -> Result<Bitmap, SnapshotError> {
        Ok(self.clone())
    }
}

impl<R: Renderable + ?Sized> Renderable for &R {
    fn render(&self) -> Result<Bitmap, SnapshotError> {
        (**self).render()
    }
}
