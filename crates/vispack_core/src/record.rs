//! # Record Layouts
//!
//! A record is the fixed-width group of `f32` attributes one entity owns in
//! the dense buffer. Records are pure data: they must be `Pod` so the visible
//! prefix can be handed to a draw call without any conversion.

use bytemuck::{Pod, Zeroable};

/// Marker trait for record layouts a [`Store`](crate::Store) can hold.
///
/// Records must be:
/// - `Pod`: plain old data, safe to reinterpret as scalars or bytes
/// - built only from `f32` fields, so that the buffer is a flat scalar stream
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Clone, Copy, Default, Pod, Zeroable)]
/// #[repr(C)]
/// struct Particle {
///     x: f32,
///     y: f32,
///     life: f32,
/// }
///
/// impl Record for Particle {}
/// ```
///
/// A layout that is not a whole number of `f32` scalars is rejected when the
/// store is built for it:
///
/// ```compile_fail
/// use bytemuck::{Pod, Zeroable};
/// use vispack_core::{Record, Store};
///
/// #[derive(Clone, Copy, Pod, Zeroable)]
/// #[repr(C)]
/// struct Flags {
///     a: u8,
///     b: u8,
/// }
///
/// impl Record for Flags {}
///
/// let _store: Store<Flags> = Store::new();
/// ```
pub trait Record: Pod + Send + Sync + 'static {
    /// Number of `f32` scalars in one record (the record stride).
    ///
    /// Evaluating it fails to compile for layouts that are not a whole
    /// number of `f32` scalars.
    const ATTRIBUTES: usize = {
        assert!(
            is_scalar_layout::<Self>(),
            "record layout must be a whole number of f32 scalars"
        );
        std::mem::size_of::<Self>() / std::mem::size_of::<f32>()
    };
}

/// Checks that `R` is a whole number of `f32` scalars with `f32` alignment.
#[inline]
#[must_use]
pub(crate) const fn is_scalar_layout<R: Record>() -> bool {
    let size = std::mem::size_of::<R>();
    size > 0
        && size % std::mem::size_of::<f32>() == 0
        && std::mem::align_of::<R>() >= std::mem::align_of::<f32>()
}

/// Per-shape record consumed by the 2D shape pass.
///
/// Layout (8 scalars): `x, y, z, width, height, r, g, b`. Colors are in the
/// `0.0..=255.0` range, matching what the shape shader expects.
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct ShapeRecord {
    /// X coordinate in screen space.
    pub x: f32,
    /// Y coordinate in screen space.
    pub y: f32,
    /// Depth used for draw ordering.
    pub z: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
}

impl Record for ShapeRecord {}

impl ShapeRecord {
    /// Creates a new shape record.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32, width: f32, height: f32, color: [f32; 3]) -> Self {
        Self {
            x,
            y,
            z,
            width,
            height,
            r: color[0],
            g: color[1],
            b: color[2],
        }
    }

    /// Creates a white shape of the given size at the origin.
    #[inline]
    #[must_use]
    pub const fn sized(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, 0.0, width, height, [255.0, 255.0, 255.0])
    }

    /// Returns a copy moved to `(x, y, z)`.
    #[inline]
    #[must_use]
    pub const fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.x = x;
        self.y = y;
        self.z = z;
        self
    }

    /// Returns a copy with a different color.
    #[inline]
    #[must_use]
    pub const fn with_color(mut self, color: [f32; 3]) -> Self {
        self.r = color[0];
        self.g = color[1];
        self.b = color[2];
        self
    }

    /// Returns the record as its raw scalar attributes.
    #[inline]
    #[must_use]
    pub fn as_scalars(&self) -> &[f32] {
        bytemuck::cast_slice(std::slice::from_ref(self))
    }
}

impl Default for ShapeRecord {
    /// A 10x10 white shape at the origin.
    fn default() -> Self {
        Self::sized(10.0, 10.0)
    }
}
