//! Grid model and cell indexing.
//!
//! A [`Grid`] couples a row-major 2-D scalar field with the coordinates of
//! its sample points and an optional mask of invalid cells. Coordinates may
//! be rectilinear (1-D axis arrays) or curvilinear (full 2-D arrays), and
//! either vertex-registered (coordinate shape equals value shape) or
//! corner-registered (one larger per axis, values at cell centers).

use geom_common::{BoundingBox, GeomError, GeomResult, Point};

/// Coordinate arrays supplied by the caller.
///
/// Array lengths determine the registration: axes of length `nx`/`ny`
/// (vertex-centered) or `nx + 1`/`ny + 1` (cell-corner-centered). The two
/// axes must agree on the registration.
#[derive(Debug, Clone)]
pub enum GridCoords {
    /// 1-D axis arrays for a rectilinear grid.
    Rectilinear { xs: Vec<f64>, ys: Vec<f64> },
    /// Row-major 2-D coordinate arrays for a curvilinear grid.
    Curvilinear { xs: Vec<f64>, ys: Vec<f64> },
}

/// Internal coordinate storage, always vertex-registered.
#[derive(Debug, Clone)]
enum Coords {
    Rectilinear { xs: Vec<f64>, ys: Vec<f64> },
    Curvilinear { xs: Vec<f64>, ys: Vec<f64> },
}

/// An immutable 2-D scalar field with per-vertex coordinates.
///
/// `nx * ny` values in row-major order (row `j`, column `i` at
/// `j * nx + i`); cells are the `(nx-1) * (ny-1)` quadrilaterals between
/// adjacent vertices. Construction validates every shape invariant; the
/// grid is read-only afterwards.
#[derive(Debug, Clone)]
pub struct Grid {
    values: Vec<f64>,
    nx: usize,
    ny: usize,
    coords: Coords,
    cell_mask: Option<Vec<bool>>,
}

impl Grid {
    /// Create a grid, validating value/coordinate/mask shapes.
    ///
    /// # Arguments
    /// * `values` - Row-major scalar field, `ny` rows by `nx` columns.
    ///   NaN marks a missing sample; cells touching one are masked.
    /// * `coords` - Vertex- or corner-registered coordinate arrays.
    ///   Corner-registered coordinates are collapsed to cell centers.
    /// * `cell_mask` - Optional `(ny-1) * (nx-1)` mask, `true` = invalid.
    pub fn new(
        values: Vec<f64>,
        nx: usize,
        ny: usize,
        coords: GridCoords,
        cell_mask: Option<Vec<bool>>,
    ) -> GeomResult<Self> {
        if nx < 2 || ny < 2 {
            return Err(GeomError::malformed_grid(format!(
                "grid must be at least 2x2 vertices, got {}x{}",
                nx, ny
            )));
        }
        if values.len() != nx * ny {
            return Err(GeomError::malformed_grid(format!(
                "value array has {} elements, expected {}x{} = {}",
                values.len(),
                nx,
                ny,
                nx * ny
            )));
        }

        let coords = Self::normalize_coords(coords, nx, ny)?;

        if let Some(mask) = &cell_mask {
            let expected = (nx - 1) * (ny - 1);
            if mask.len() != expected {
                return Err(GeomError::malformed_grid(format!(
                    "cell mask has {} elements, expected {} cells",
                    mask.len(),
                    expected
                )));
            }
        }

        Ok(Self {
            values,
            nx,
            ny,
            coords,
            cell_mask,
        })
    }

    /// Collapse corner-registered coordinates to the vertex registration.
    fn normalize_coords(coords: GridCoords, nx: usize, ny: usize) -> GeomResult<Coords> {
        match coords {
            GridCoords::Rectilinear { xs, ys } => match (xs.len(), ys.len()) {
                (x, y) if x == nx && y == ny => Ok(Coords::Rectilinear { xs, ys }),
                (x, y) if x == nx + 1 && y == ny + 1 => {
                    // Corner axes: values sit at cell centers
                    let xs = xs.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect();
                    let ys = ys.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect();
                    Ok(Coords::Rectilinear { xs, ys })
                }
                (x, y) => Err(GeomError::malformed_grid(format!(
                    "rectilinear axes of length {}x{} match neither vertex ({}x{}) \
                     nor corner ({}x{}) registration",
                    x,
                    y,
                    nx,
                    ny,
                    nx + 1,
                    ny + 1
                ))),
            },
            GridCoords::Curvilinear { xs, ys } => {
                if xs.len() != ys.len() {
                    return Err(GeomError::malformed_grid(format!(
                        "curvilinear x array ({}) and y array ({}) differ in length",
                        xs.len(),
                        ys.len()
                    )));
                }
                let vertex = nx * ny;
                let corner = (nx + 1) * (ny + 1);
                if xs.len() == vertex {
                    Ok(Coords::Curvilinear { xs, ys })
                } else if xs.len() == corner {
                    // Average the four corners of each cell to its center
                    let cnx = nx + 1;
                    let center = |arr: &[f64]| -> Vec<f64> {
                        let mut out = Vec::with_capacity(vertex);
                        for j in 0..ny {
                            for i in 0..nx {
                                let tl = arr[j * cnx + i];
                                let tr = arr[j * cnx + i + 1];
                                let bl = arr[(j + 1) * cnx + i];
                                let br = arr[(j + 1) * cnx + i + 1];
                                out.push((tl + tr + bl + br) / 4.0);
                            }
                        }
                        out
                    };
                    Ok(Coords::Curvilinear {
                        xs: center(&xs),
                        ys: center(&ys),
                    })
                } else {
                    Err(GeomError::malformed_grid(format!(
                        "curvilinear coordinate arrays of length {} match neither vertex \
                         ({}) nor corner ({}) registration",
                        xs.len(),
                        vertex,
                        corner
                    )))
                }
            }
        }
    }

    /// Number of vertices in the X direction.
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Number of vertices in the Y direction.
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Number of cells in the X direction.
    pub fn cells_x(&self) -> usize {
        self.nx - 1
    }

    /// Number of cells in the Y direction.
    pub fn cells_y(&self) -> usize {
        self.ny - 1
    }

    /// Scalar value at vertex (i, j).
    pub fn value(&self, i: usize, j: usize) -> f64 {
        self.values[j * self.nx + i]
    }

    /// Coordinate of vertex (i, j).
    pub fn vertex_coord(&self, i: usize, j: usize) -> Point {
        match &self.coords {
            Coords::Rectilinear { xs, ys } => Point::new(xs[i], ys[j]),
            Coords::Curvilinear { xs, ys } => {
                let idx = j * self.nx + i;
                Point::new(xs[idx], ys[idx])
            }
        }
    }

    /// Coordinate at a fractional vertex index, by bilinear interpolation.
    pub fn interp_coord(&self, fi: f64, fj: f64) -> Point {
        let i0 = (fi.floor() as usize).min(self.nx - 2);
        let j0 = (fj.floor() as usize).min(self.ny - 2);
        let tx = (fi - i0 as f64).clamp(0.0, 1.0);
        let ty = (fj - j0 as f64).clamp(0.0, 1.0);

        let p00 = self.vertex_coord(i0, j0);
        let p10 = self.vertex_coord(i0 + 1, j0);
        let p01 = self.vertex_coord(i0, j0 + 1);
        let p11 = self.vertex_coord(i0 + 1, j0 + 1);

        let top = Point::new(p00.x + tx * (p10.x - p00.x), p00.y + tx * (p10.y - p00.y));
        let bot = Point::new(p01.x + tx * (p11.x - p01.x), p01.y + tx * (p11.y - p01.y));
        Point::new(top.x + ty * (bot.x - top.x), top.y + ty * (bot.y - top.y))
    }

    /// Whether cell (ci, cj) is excluded from contouring.
    ///
    /// A cell is masked either explicitly or because one of its corner
    /// values is NaN.
    pub fn cell_masked(&self, ci: usize, cj: usize) -> bool {
        if let Some(mask) = &self.cell_mask {
            if mask[cj * (self.nx - 1) + ci] {
                return true;
            }
        }
        self.value(ci, cj).is_nan()
            || self.value(ci + 1, cj).is_nan()
            || self.value(ci, cj + 1).is_nan()
            || self.value(ci + 1, cj + 1).is_nan()
    }

    /// Whether a cell index pair refers to a valid, unmasked cell.
    ///
    /// Out-of-range indices count as masked, which is what the boundary
    /// closure pass wants for grid-border cells.
    pub fn neighbor_valid(&self, ci: isize, cj: isize) -> bool {
        ci >= 0
            && cj >= 0
            && (ci as usize) < self.cells_x()
            && (cj as usize) < self.cells_y()
            && !self.cell_masked(ci as usize, cj as usize)
    }

    /// Mean cell diagonal length, the basis for the ring-closing tolerance.
    ///
    /// Samples at most ~1024 cells on large grids.
    pub fn mean_cell_diagonal(&self) -> f64 {
        let cx = self.cells_x();
        let cy = self.cells_y();
        let stride_x = (cx / 32).max(1);
        let stride_y = (cy / 32).max(1);

        let mut sum = 0.0;
        let mut count = 0usize;
        let mut cj = 0;
        while cj < cy {
            let mut ci = 0;
            while ci < cx {
                let a = self.vertex_coord(ci, cj);
                let b = self.vertex_coord(ci + 1, cj + 1);
                let d = a.distance(&b);
                if d.is_finite() {
                    sum += d;
                    count += 1;
                }
                ci += stride_x;
            }
            cj += stride_y;
        }

        if count == 0 {
            1.0
        } else {
            sum / count as f64
        }
    }

    /// Min/max over non-NaN values, or `None` if every value is NaN.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in &self.values {
            if v.is_nan() {
                continue;
            }
            min = min.min(v);
            max = max.max(v);
        }
        if min <= max {
            Some((min, max))
        } else {
            None
        }
    }

    /// Raw value slice (row-major).
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Bounding box of the vertex coordinates.
    pub fn bbox(&self) -> BoundingBox {
        let mut bbox = BoundingBox::empty();
        for j in 0..self.ny {
            for i in 0..self.nx {
                bbox.expand_to(&self.vertex_coord(i, j));
            }
        }
        bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axes(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64).collect()
    }

    #[test]
    fn test_shape_validation() {
        // Value count mismatch
        let err = Grid::new(
            vec![0.0; 5],
            3,
            3,
            GridCoords::Rectilinear {
                xs: axes(3),
                ys: axes(3),
            },
            None,
        );
        assert!(matches!(err, Err(GeomError::MalformedGrid(_))));

        // Axis length matches neither registration
        let err = Grid::new(
            vec![0.0; 9],
            3,
            3,
            GridCoords::Rectilinear {
                xs: axes(5),
                ys: axes(3),
            },
            None,
        );
        assert!(matches!(err, Err(GeomError::MalformedGrid(_))));

        // Mask size mismatch
        let err = Grid::new(
            vec![0.0; 9],
            3,
            3,
            GridCoords::Rectilinear {
                xs: axes(3),
                ys: axes(3),
            },
            Some(vec![false; 3]),
        );
        assert!(matches!(err, Err(GeomError::MalformedGrid(_))));
    }

    #[test]
    fn test_corner_registration_collapses_to_centers() {
        let grid = Grid::new(
            vec![0.0; 4],
            2,
            2,
            GridCoords::Rectilinear {
                xs: vec![0.0, 1.0, 2.0],
                ys: vec![10.0, 20.0, 30.0],
            },
            None,
        )
        .unwrap();

        let p = grid.vertex_coord(0, 0);
        assert!((p.x - 0.5).abs() < 1e-12);
        assert!((p.y - 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_curvilinear_lookup() {
        let xs = vec![0.0, 1.0, 0.1, 1.1];
        let ys = vec![0.0, 0.0, 1.0, 1.0];
        let grid = Grid::new(
            vec![1.0, 2.0, 3.0, 4.0],
            2,
            2,
            GridCoords::Curvilinear { xs, ys },
            None,
        )
        .unwrap();

        let p = grid.vertex_coord(0, 1);
        assert_eq!((p.x, p.y), (0.1, 1.0));
    }

    #[test]
    fn test_nan_masks_cell() {
        let mut values = vec![0.0; 9];
        values[4] = f64::NAN; // center vertex touches all four cells
        let grid = Grid::new(
            values,
            3,
            3,
            GridCoords::Rectilinear {
                xs: axes(3),
                ys: axes(3),
            },
            None,
        )
        .unwrap();

        for cj in 0..2 {
            for ci in 0..2 {
                assert!(grid.cell_masked(ci, cj));
            }
        }
    }

    #[test]
    fn test_interp_coord() {
        let grid = Grid::new(
            vec![0.0; 9],
            3,
            3,
            GridCoords::Rectilinear {
                xs: vec![0.0, 10.0, 20.0],
                ys: vec![0.0, 5.0, 10.0],
            },
            None,
        )
        .unwrap();

        let p = grid.interp_coord(0.5, 1.5);
        assert!((p.x - 5.0).abs() < 1e-12);
        assert!((p.y - 7.5).abs() < 1e-12);
    }

    #[test]
    fn test_mean_cell_diagonal() {
        let grid = Grid::new(
            vec![0.0; 9],
            3,
            3,
            GridCoords::Rectilinear {
                xs: vec![0.0, 3.0, 6.0],
                ys: vec![0.0, 4.0, 8.0],
            },
            None,
        )
        .unwrap();
        assert!((grid.mean_cell_diagonal() - 5.0).abs() < 1e-12);
    }
}
