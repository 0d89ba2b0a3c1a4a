//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Map a value from one range into another.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where 
    T: Float 
{
    target_range.0 
        + ((value - source_range.0) 
        * (target_range.1 - target_range.0) 
        / (source_range.1 - source_range.0))
}

/// Clamp a value into the inclusive range `[min, max]`.
pub fn clamp<T>(value: &T, min: &T, max: &T) -> T 
where
    T: Float
{
    let mut ret = *value;

    if ret > *max {
        ret = *max
    }
    if ret < *min {
        ret = *min
    }

    ret
}

/// Wrap an angle in degrees into the range `[0, 360)`.
///
/// The remainder is made positive before the final modulo, so that very small
/// negative inputs land on `0` rather than `360`.
pub fn wrap_360<T>(angle_deg: T) -> T
where
    T: Float
{
    let full: T = T::from(360.0).unwrap();

    ((angle_deg % full) + full) % full
}

/// Fold a signed angular difference in degrees into the range `(-180, 180]`.
///
/// The input must lie in `(-540, 540)`, which is always the case for the
/// difference of two angles in `[0, 360)`. A difference of exactly half a turn
/// in either direction folds to `+180`.
pub fn fold_180<T>(diff_deg: T) -> T
where
    T: Float
{
    let half: T = T::from(180.0).unwrap();
    let full: T = T::from(360.0).unwrap();

    let mut d = diff_deg;

    if d > half {
        d = d - full;
    }
    if d <= -half {
        d = d + full;
    }

    d
}

/// Get the shortest signed angular distance in degrees to go from `from` to
/// `to`, accounting for wrapping between 0 and 360.
///
/// The result lies in `(-180, 180]`.
pub fn get_ang_dist_360<T>(from: T, to: T) -> T
where
    T: Float
{
    fold_180(wrap_360(to) - wrap_360(from))
}
