//! Synthetic grid generators for predictable, verifiable test fields.

use contour::{Grid, GridCoords};

/// Grid with a single peak at the center and zeros elsewhere.
///
/// Extracting any threshold between zero and `peak` yields exactly one
/// closed ring around the center vertex.
///
/// # Example
///
/// ```
/// use test_utils::peak_grid;
///
/// let grid = peak_grid(5, 5, 10.0);
/// assert_eq!(grid.value(2, 2), 10.0);
/// assert_eq!(grid.value(0, 0), 0.0);
/// ```
pub fn peak_grid(nx: usize, ny: usize, peak: f64) -> Grid {
    let mut values = vec![0.0; nx * ny];
    values[(ny / 2) * nx + nx / 2] = peak;
    unit_spaced(values, nx, ny)
}

/// Grid whose value equals its x index, a pure left-to-right ramp.
///
/// Level-set boundaries for any threshold in range are vertical lines,
/// which makes crossing positions easy to predict.
///
/// # Example
///
/// ```
/// use test_utils::gradient_grid;
///
/// let grid = gradient_grid(4, 3);
/// assert_eq!(grid.value(0, 1), 0.0);
/// assert_eq!(grid.value(3, 1), 3.0);
/// ```
pub fn gradient_grid(nx: usize, ny: usize) -> Grid {
    let values: Vec<f64> = (0..nx * ny).map(|k| (k % nx) as f64).collect();
    unit_spaced(values, nx, ny)
}

/// Geographic grid straddling the antimeridian, longitudes 170°..190°.
///
/// The central columns carry a high value so a mid-range threshold
/// produces one region crossing the seam. Normalized geographic output
/// must split it into a piece on each side of ±180°.
pub fn seam_grid(nx: usize, ny: usize, inner: f64) -> Grid {
    let xs: Vec<f64> = (0..nx)
        .map(|i| 170.0 + 20.0 * i as f64 / (nx - 1) as f64)
        .collect();
    let ys: Vec<f64> = (0..ny)
        .map(|j| -10.0 + 20.0 * j as f64 / (ny - 1) as f64)
        .collect();

    let mut values = vec![0.0; nx * ny];
    for j in 1..ny.saturating_sub(1) {
        for i in 1..nx.saturating_sub(1) {
            values[j * nx + i] = inner;
        }
    }
    Grid::new(values, nx, ny, GridCoords::Rectilinear { xs, ys }, None).unwrap()
}

/// Uniform-value grid with a block of cells masked out.
///
/// The mask covers cells `[mask_from_ci..)` in every row, so level-set
/// regions are truncated along a vertical mask boundary.
pub fn masked_grid(nx: usize, ny: usize, value: f64, mask_from_ci: usize) -> Grid {
    let values = vec![value; nx * ny];
    let (cx, cy) = (nx - 1, ny - 1);
    let mask: Vec<bool> = (0..cx * cy).map(|k| k % cx >= mask_from_ci).collect();

    let xs: Vec<f64> = (0..nx).map(|i| i as f64).collect();
    let ys: Vec<f64> = (0..ny).map(|j| j as f64).collect();
    Grid::new(
        values,
        nx,
        ny,
        GridCoords::Rectilinear { xs, ys },
        Some(mask),
    )
    .unwrap()
}

fn unit_spaced(values: Vec<f64>, nx: usize, ny: usize) -> Grid {
    let xs: Vec<f64> = (0..nx).map(|i| i as f64).collect();
    let ys: Vec<f64> = (0..ny).map(|j| j as f64).collect();
    Grid::new(values, nx, ny, GridCoords::Rectilinear { xs, ys }, None).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peak_grid_shape() {
        let grid = peak_grid(3, 3, 5.0);
        assert_eq!(grid.nx(), 3);
        assert_eq!(grid.ny(), 3);
        assert_eq!(grid.value(1, 1), 5.0);
        assert_eq!(grid.values().iter().filter(|&&v| v != 0.0).count(), 1);
    }

    #[test]
    fn test_seam_grid_longitudes() {
        let grid = seam_grid(5, 5, 10.0);
        assert_eq!(grid.vertex_coord(0, 0).x, 170.0);
        assert_eq!(grid.vertex_coord(4, 0).x, 190.0);
        assert_eq!(grid.value(2, 2), 10.0);
        assert_eq!(grid.value(0, 0), 0.0);
    }

    #[test]
    fn test_masked_grid_mask_extent() {
        let grid = masked_grid(4, 4, 1.0, 2);
        assert!(!grid.cell_masked(0, 0));
        assert!(!grid.cell_masked(1, 1));
        assert!(grid.cell_masked(2, 0));
        assert!(grid.cell_masked(2, 2));
    }
}
