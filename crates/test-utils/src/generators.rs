//! Test data generators for synthetic reflectivity grids.
//!
//! These generators create predictable, verifiable patterns in row-major
//! order (row 0 first), matching how rasters are laid out on disk.

/// Creates a grid with predictable values: `col * 1000 + row`.
///
/// # Example
///
/// ```
/// use test_utils::create_test_grid;
///
/// let grid = create_test_grid(10, 5);
/// assert_eq!(grid.len(), 50);
/// assert_eq!(grid[1], 1000.0); // col=1, row=0
/// assert_eq!(grid[10], 1.0);   // col=0, row=1
/// ```
pub fn create_test_grid(width: usize, height: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 1000 + row) as f64);
        }
    }
    data
}

/// Creates a storm-like reflectivity field in dBZ.
///
/// A single cell peaks at 70 dBZ in the center and decays to below the
/// 5 dBZ display threshold toward the edges. Corners are NaN (no coverage).
pub fn create_reflectivity_grid(width: usize, height: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(width * height);
    let center_x = width as f64 / 2.0;
    let center_y = height as f64 / 2.0;
    let max_dist = (center_x * center_x + center_y * center_y).sqrt().max(1.0);

    for row in 0..height {
        for col in 0..width {
            let corner = (col == 0 || col + 1 == width) && (row == 0 || row + 1 == height);
            if corner {
                data.push(f64::NAN);
                continue;
            }
            let dx = col as f64 - center_x;
            let dy = row as f64 - center_y;
            let dist = (dx * dx + dy * dy).sqrt() / max_dist;
            data.push(70.0 - dist * 70.0);
        }
    }
    data
}

/// Creates a grid filled with a constant value.
pub fn create_constant_grid(width: usize, height: usize, value: f64) -> Vec<f64> {
    vec![value; width * height]
}

/// Creates a grid with NaN at the given (col, row) positions, zeros elsewhere.
pub fn create_grid_with_nans(
    width: usize,
    height: usize,
    nan_positions: &[(usize, usize)],
) -> Vec<f64> {
    let mut data = vec![0.0; width * height];
    for &(col, row) in nan_positions {
        if col < width && row < height {
            data[row * width + col] = f64::NAN;
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_grid() {
        let grid = create_test_grid(3, 2);
        assert_eq!(grid, vec![0.0, 1000.0, 2000.0, 1.0, 1001.0, 2001.0]);
    }

    #[test]
    fn test_reflectivity_grid_shape() {
        let grid = create_reflectivity_grid(9, 7);
        assert_eq!(grid.len(), 63);
        assert!(grid[0].is_nan());
        assert!(grid[62].is_nan());

        let peak = grid.iter().copied().filter(|v| !v.is_nan()).fold(f64::MIN, f64::max);
        assert!(peak > 60.0);
    }

    #[test]
    fn test_grid_with_nans() {
        let grid = create_grid_with_nans(2, 2, &[(1, 0), (5, 5)]);
        assert!(grid[1].is_nan());
        assert_eq!(grid.iter().filter(|v| v.is_nan()).count(), 1);
    }
}
