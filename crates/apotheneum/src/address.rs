//! Circumferential position arithmetic shared by every shape.
//!
//! Entities move around the installation in ring coordinates: `x` is the
//! position around the ring (any integer or fractional value, wrapped), `y` is
//! the ring index counted down from the top (not wrapped, out-of-range means
//! "not on the surface").

/// Wrap `pos` onto `[0, length)`. Works for negative positions and positions
/// several laps away.
#[inline(always)]
pub fn wrap(pos: i64, length: usize) -> usize {
    debug_assert!(length > 0, "ring length must be non-zero");
    pos.rem_euclid(length as i64) as usize
}

/// Snap a fractional coordinate to the nearest pixel, halves rounding up.
#[inline(always)]
pub fn round_position(pos: f32) -> i64 {
    (pos + 0.5).floor() as i64
}

/// Wrap a fractional position after snapping it to a pixel.
#[inline(always)]
pub fn wrap_f32(pos: f32, length: usize) -> usize {
    wrap(round_position(pos), length)
}
