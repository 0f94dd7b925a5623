//! Conversions between an H × W × C pixel raster and an (H·W) × C point matrix.
//!
//! Rows follow raster-scan order: row `i` is pixel `(i / W, i % W)`.

use std::collections::HashSet;

use ndarray::{Array2, Array3, ArrayBase, Data, Ix2, Ix3};

use crate::error::{Error, Result};

pub fn pixels_to_points<S>(pixels: &ArrayBase<S, Ix3>) -> Result<Array2<f64>>
where
    S: Data<Elem = f64>,
{
    let (height, width, channels) = pixels.dim();
    if height * width == 0 || channels == 0 {
        return Err(Error::EmptyInput);
    }
    let values: Vec<f64> = pixels.iter().copied().collect();
    let found = values.len();
    Array2::from_shape_vec((height * width, channels), values).map_err(|_| {
        Error::DimensionMismatch {
            expected: height * width * channels,
            found,
        }
    })
}

pub fn points_to_pixels<S>(points: &ArrayBase<S, Ix2>, height: usize, width: usize) -> Result<Array3<f64>>
where
    S: Data<Elem = f64>,
{
    let (rows, channels) = points.dim();
    if rows != height * width {
        return Err(Error::DimensionMismatch {
            expected: height * width,
            found: rows,
        });
    }
    let values: Vec<f64> = points.iter().copied().collect();
    let found = values.len();
    Array3::from_shape_vec((height, width, channels), values).map_err(|_| {
        Error::DimensionMismatch {
            expected: rows * channels,
            found,
        }
    })
}

/// Number of distinct rows, i.e. the palette size of a point matrix.
pub fn distinct_colors<S>(points: &ArrayBase<S, Ix2>) -> usize
where
    S: Data<Elem = f64>,
{
    points
        .rows()
        .into_iter()
        .map(|row| row.iter().map(|v| v.to_bits()).collect::<Vec<u64>>())
        .collect::<HashSet<_>>()
        .len()
}
