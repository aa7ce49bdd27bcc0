//! Marching-squares fragment extraction.
//!
//! For each unmasked cell the four corner values are classified against a
//! level and boundary fragments are produced by linear interpolation along
//! cell edges. Fragments are directed so that the region interior lies on
//! the left in index space; the assembler relies on that to chain ends to
//! starts. A band `[lo, hi)` is extracted as two threshold passes (the
//! upper pass with reversed direction) plus closure segments along grid and
//! mask boundaries, so region boundaries always form closed loops.
//!
//! Fragments live only within one extraction call and are consumed by the
//! assembler; they are never exposed outside the crate.

use geom_common::{Level, Point};

use crate::grid::Grid;

/// A directed piece of region boundary within one grid cell.
#[derive(Debug, Clone)]
pub(crate) struct Fragment {
    pub start: Point,
    pub end: Point,
}

impl Fragment {
    fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }
}

/// Interpolated crossing of value `c` along the edge between two vertices.
///
/// Vertices must be given in canonical (row-major ascending) order so that
/// the two cells sharing the edge compute a bit-identical point.
fn edge_crossing(grid: &Grid, c: f64, a: (usize, usize), b: (usize, usize)) -> Point {
    let va = grid.value(a.0, a.1);
    let vb = grid.value(b.0, b.1);
    let pa = grid.vertex_coord(a.0, a.1);
    let pb = grid.vertex_coord(b.0, b.1);

    let t = if va == vb {
        0.5
    } else {
        ((c - va) / (vb - va)).clamp(0.0, 1.0)
    };
    Point::new(pa.x + t * (pb.x - pa.x), pa.y + t * (pb.y - pa.y))
}

/// Extract all boundary fragments for one level.
pub(crate) fn extract_fragments(grid: &Grid, level: &Level) -> Vec<Fragment> {
    let mut fragments = threshold_march(grid, level.lo(), false);
    if level.hi().is_finite() {
        // Upper bound: boundary of the >= hi region, reversed so the band
        // interior stays on the left
        fragments.extend(threshold_march(grid, level.hi(), true));
    }
    boundary_closure(grid, level, &mut fragments);
    fragments
}

/// Binary marching squares at a single threshold.
///
/// Classification is lower-closed (`value >= c` is inside), applied
/// uniformly so ties resolve in the same direction across the whole grid.
fn threshold_march(grid: &Grid, c: f64, reversed: bool) -> Vec<Fragment> {
    let mut fragments = Vec::new();

    for cj in 0..grid.cells_y() {
        for ci in 0..grid.cells_x() {
            if grid.cell_masked(ci, cj) {
                continue;
            }

            let tl = grid.value(ci, cj);
            let tr = grid.value(ci + 1, cj);
            let br = grid.value(ci + 1, cj + 1);
            let bl = grid.value(ci, cj + 1);

            let mut cell_index = 0u8;
            if tl >= c {
                cell_index |= 1;
            }
            if tr >= c {
                cell_index |= 2;
            }
            if br >= c {
                cell_index |= 4;
            }
            if bl >= c {
                cell_index |= 8;
            }
            if cell_index == 0 || cell_index == 15 {
                continue;
            }

            // Edge crossings, canonical vertex order
            let top = || edge_crossing(grid, c, (ci, cj), (ci + 1, cj));
            let right = || edge_crossing(grid, c, (ci + 1, cj), (ci + 1, cj + 1));
            let bottom = || edge_crossing(grid, c, (ci, cj + 1), (ci + 1, cj + 1));
            let left = || edge_crossing(grid, c, (ci, cj), (ci, cj + 1));

            // Directed lookup table: interior (value >= c) on the left,
            // with index-space axes treated as a right-handed plane
            let cell_fragments: Vec<(Point, Point)> = match cell_index {
                1 => vec![(top(), left())],
                2 => vec![(right(), top())],
                4 => vec![(bottom(), right())],
                8 => vec![(left(), bottom())],
                14 => vec![(left(), top())],
                13 => vec![(top(), right())],
                11 => vec![(right(), bottom())],
                7 => vec![(bottom(), left())],
                3 => vec![(right(), left())],
                12 => vec![(left(), right())],
                6 => vec![(bottom(), top())],
                9 => vec![(top(), bottom())],
                5 => {
                    // Saddle: disambiguate with the cell-center average
                    if (tl + tr + br + bl) / 4.0 >= c {
                        vec![(top(), right()), (bottom(), left())]
                    } else {
                        vec![(top(), left()), (bottom(), right())]
                    }
                }
                10 => {
                    if (tl + tr + br + bl) / 4.0 >= c {
                        vec![(left(), top()), (right(), bottom())]
                    } else {
                        vec![(right(), top()), (left(), bottom())]
                    }
                }
                _ => vec![],
            };

            for (a, b) in cell_fragments {
                if reversed {
                    fragments.push(Fragment::new(b, a));
                } else {
                    fragments.push(Fragment::new(a, b));
                }
            }
        }
    }

    fragments
}

/// Where an edge sub-interval endpoint comes from.
enum EdgePoint {
    Vertex((usize, usize)),
    Crossing(f64),
}

/// Emit the in-region portions of cell edges bordering masked cells or the
/// grid exterior, so region boundaries close there instead of interpolating
/// through the mask.
fn boundary_closure(grid: &Grid, level: &Level, fragments: &mut Vec<Fragment>) {
    for cj in 0..grid.cells_y() {
        for ci in 0..grid.cells_x() {
            if grid.cell_masked(ci, cj) {
                continue;
            }

            let (ci_i, cj_i) = (ci as isize, cj as isize);
            // Edges walked clockwise in index space, keeping the cell
            // interior on the left; (walk start vertex, walk end vertex,
            // neighbor cell)
            let edges = [
                ((ci, cj), (ci + 1, cj), (ci_i, cj_i - 1)),
                ((ci + 1, cj), (ci + 1, cj + 1), (ci_i + 1, cj_i)),
                ((ci + 1, cj + 1), (ci, cj + 1), (ci_i, cj_i + 1)),
                ((ci, cj + 1), (ci, cj), (ci_i - 1, cj_i)),
            ];

            for (a, b, neighbor) in edges {
                if grid.neighbor_valid(neighbor.0, neighbor.1) {
                    continue;
                }
                closure_for_edge(grid, level, a, b, fragments);
            }
        }
    }
}

/// The in-region sub-interval of one boundary edge, walked from vertex
/// `a` to vertex `b`.
fn closure_for_edge(
    grid: &Grid,
    level: &Level,
    a: (usize, usize),
    b: (usize, usize),
    fragments: &mut Vec<Fragment>,
) {
    let va = grid.value(a.0, a.1);
    let vb = grid.value(b.0, b.1);
    let (lo, hi) = (level.lo(), level.hi());

    let (p0, p1) = if va == vb {
        if !level.contains(va) {
            return;
        }
        (EdgePoint::Vertex(a), EdgePoint::Vertex(b))
    } else {
        let t_at = |c: f64| (c - va) / (vb - va);
        // The value varies linearly, so {t : lo <= v(t) < hi} is one interval
        let (enter, exit, enter_bound, exit_bound) = if vb > va {
            (t_at(lo), t_at(hi), lo, hi)
        } else {
            (t_at(hi), t_at(lo), hi, lo)
        };

        let t0 = enter.max(0.0);
        let t1 = exit.min(1.0);
        if t1 - t0 <= 0.0 {
            return;
        }

        let p0 = if t0 > 0.0 {
            EdgePoint::Crossing(enter_bound)
        } else {
            EdgePoint::Vertex(a)
        };
        let p1 = if t1 < 1.0 {
            EdgePoint::Crossing(exit_bound)
        } else {
            EdgePoint::Vertex(b)
        };
        (p0, p1)
    };

    let materialize = |ep: &EdgePoint| -> Point {
        match ep {
            EdgePoint::Vertex(v) => grid.vertex_coord(v.0, v.1),
            EdgePoint::Crossing(c) => {
                // Canonical vertex order keeps this bit-identical with the
                // crossings the threshold pass computed
                let (lo_v, hi_v) = if (a.1, a.0) <= (b.1, b.0) {
                    (a, b)
                } else {
                    (b, a)
                };
                edge_crossing(grid, *c, lo_v, hi_v)
            }
        }
    };

    let start = materialize(&p0);
    let end = materialize(&p1);
    if start != end {
        fragments.push(Fragment::new(start, end));
    }
}
