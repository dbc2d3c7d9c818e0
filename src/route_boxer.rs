//! Covers a path with a small set of rectangles.
//!
//! Every path vertex, and nearly every point within `range_km` of the path,
//! lands inside at least one returned box, so the boxes can be used as a
//! cheap corridor filter for "places along a route" searches. The exception
//! is a thin strip just north of where a northbound segment ends.
//!
//! The path is rasterised onto a grid of rhumb-line spaced cells roughly
//! `range_km` wide. Each cell the path touches is marked together with its
//! eight neighbours. The marked cells are then merged into rectangles twice
//! (row-major and column-major) and the smaller result wins.

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::angle::to_radians;
use crate::bounds::LatLngBounds;
use crate::error::{GeoError, GeoResult};
use crate::geodesy::{
    EARTH_RADIUS_KM, LatLng, rhumb_bearing, rhumb_destination, try_rhumb_destination,
};

/// Upper limit on grid size. Requests that would exceed it are rejected
/// with [`GeoError::DegenerateGeometry`].
pub const MAX_GRID_CELLS: usize = 25_000_000;

/// Both merge results, before choosing between them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoxCandidates {
    /// Column sweep: vertical runs merged sideways.
    pub boxes_x: Vec<LatLngBounds>,
    /// Row sweep: horizontal runs merged upwards.
    pub boxes_y: Vec<LatLngBounds>,
}

impl BoxCandidates {
    /// The shorter list. Ties go to `boxes_x`.
    pub fn into_smallest(self) -> Vec<LatLngBounds> {
        if self.boxes_x.len() <= self.boxes_y.len() {
            self.boxes_x
        } else {
            self.boxes_y
        }
    }
}

/// Boxes covering the corridor roughly `range_km` either side of the path.
pub fn box_path(vertices: &[LatLng], range_km: f64) -> GeoResult<Vec<LatLngBounds>> {
    box_path_candidates(vertices, range_km).map(BoxCandidates::into_smallest)
}

/// Like [`box_path`], but returns both merge results.
pub fn box_path_candidates(vertices: &[LatLng], range_km: f64) -> GeoResult<BoxCandidates> {
    if vertices.len() < 2 {
        return Err(GeoError::DegenerateGeometry(format!(
            "a path needs at least 2 vertices, got {}",
            vertices.len()
        )));
    }
    if !range_km.is_finite() || range_km <= 0.0 {
        return Err(GeoError::InvalidDistance(range_km));
    }

    let mut grid = Grid::build(vertices, range_km).inspect_err(|err| {
        warn!(range_km, vertices = vertices.len(), error = %err, "unable to build route grid");
    })?;
    debug!(
        lat_lines = grid.lat_lines.len(),
        lng_lines = grid.lng_lines.len(),
        range_km,
        "route grid built"
    );

    grid.rasterise(vertices);
    let candidates = grid.merge();
    debug!(
        boxes_x = candidates.boxes_x.len(),
        boxes_y = candidates.boxes_y.len(),
        "route boxes merged"
    );
    Ok(candidates)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    x: usize,
    y: usize,
}

impl Cell {
    fn is_edge_adjacent(self, other: Cell) -> bool {
        (self.x.abs_diff(other.x) == 1 && self.y == other.y)
            || (self.x == other.x && self.y.abs_diff(other.y) == 1)
    }
}

/// Grid lines and the marked cells of one boxing run.
///
/// Cell `(x, y)` spans `lng_lines[x]..lng_lines[x + 1]` and
/// `lat_lines[y]..lat_lines[y + 1]`. Marks are indexed `[x][y]`.
struct Grid {
    lat_lines: Vec<f64>,
    lng_lines: Vec<f64>,
    marks: Vec<Vec<bool>>,
}

impl Grid {
    fn build(vertices: &[LatLng], range_km: f64) -> GeoResult<Self> {
        let route_bounds = LatLngBounds::from_points(vertices)?;
        let centre = route_bounds.center();

        let lat_lines = grid_lines(
            centre,
            range_km,
            (0.0, 180.0),
            (route_bounds.south_west.lat, route_bounds.north_east.lat),
            |p| p.lat,
        )?;
        let lng_lines = grid_lines(
            centre,
            range_km,
            (90.0, 270.0),
            (route_bounds.south_west.lng, route_bounds.north_east.lng),
            |p| p.lng,
        )?;

        let columns = lng_lines.len() - 1;
        let rows = lat_lines.len() - 1;
        if columns.saturating_mul(rows) > MAX_GRID_CELLS {
            return Err(GeoError::DegenerateGeometry(format!(
                "{} x {} grid is too large; increase the range",
                columns, rows
            )));
        }

        Ok(Self {
            lat_lines,
            lng_lines,
            marks: vec![vec![false; rows]; columns],
        })
    }

    fn columns(&self) -> usize {
        self.marks.len()
    }

    fn rows(&self) -> usize {
        self.lat_lines.len() - 1
    }

    fn rasterise(&mut self, vertices: &[LatLng]) {
        let Some((first, rest)) = vertices.split_first() else {
            return;
        };
        let mut hint = self.cold_lookup(*first);
        self.mark_cell_and_neighbours(hint.x as isize, hint.y as isize);

        let mut prev = *first;
        for &vertex in rest {
            let cell = self.hot_lookup(vertex, prev, hint);
            if cell != hint {
                if cell.is_edge_adjacent(hint) {
                    self.mark_cell_and_neighbours(cell.x as isize, cell.y as isize);
                } else {
                    self.fill_intersects(prev, vertex, hint, cell);
                }
                hint = cell;
            }
            prev = vertex;
        }
    }

    /// Cell containing `point`, searched from the south-west corner.
    /// Points on a grid line belong to the cell below/left of it.
    fn cold_lookup(&self, point: LatLng) -> Cell {
        Cell {
            x: cold_index(&self.lng_lines, point.lng),
            y: cold_index(&self.lat_lines, point.lat),
        }
    }

    /// Cell containing `point`, stepping from `hint` in the direction of
    /// travel from `prev`.
    fn hot_lookup(&self, point: LatLng, prev: LatLng, hint: Cell) -> Cell {
        Cell {
            x: hot_index(&self.lng_lines, point.lng, prev.lng, hint.x),
            y: hot_index(&self.lat_lines, point.lat, prev.lat, hint.y),
        }
    }

    /// Marks the 3x3 block centred on `(x, y)`, clipped to the grid.
    fn mark_cell_and_neighbours(&mut self, x: isize, y: isize) {
        let (columns, rows) = (self.columns() as isize, self.rows() as isize);
        for nx in (x - 1).max(0)..=(x + 1).min(columns - 1) {
            for ny in (y - 1).max(0)..=(y + 1).min(rows - 1) {
                self.marks[nx as usize][ny as usize] = true;
            }
        }
    }

    fn fill_row(&mut self, start_x: usize, end_x: usize, y: isize) {
        for x in start_x.min(end_x)..=start_x.max(end_x) {
            self.mark_cell_and_neighbours(x as isize, y);
        }
    }

    /// Marks every row the segment `start -> end` passes through, by
    /// intersecting the segment's rhumb line with each latitude line it
    /// crosses.
    fn fill_intersects(&mut self, start: LatLng, end: LatLng, start_cell: Cell, end_cell: Cell) {
        let bearing = rhumb_bearing(start, end);
        let cos_bearing = to_radians(bearing).cos();
        let start_lat = to_radians(start.lat);
        let distance_to =
            |lat: f64| EARTH_RADIUS_KM * ((to_radians(lat) - start_lat) / cos_bearing);

        let mut hint = start_cell;
        let mut prev = start;
        if end.lat > start.lat {
            for i in start_cell.y + 1..=end_cell.y {
                let crossing = rhumb_destination(start, bearing, distance_to(self.lat_lines[i]));
                let cell = self.hot_lookup(crossing, prev, hint);
                self.fill_row(hint.x, cell.x, i as isize - 1);
                prev = crossing;
                hint = cell;
            }
            self.fill_row(hint.x, end_cell.x, end_cell.y as isize - 1);
        } else {
            for i in (end_cell.y + 1..=start_cell.y).rev() {
                let crossing = rhumb_destination(start, bearing, distance_to(self.lat_lines[i]));
                let cell = self.hot_lookup(crossing, prev, hint);
                self.fill_row(hint.x, cell.x, i as isize);
                prev = crossing;
                hint = cell;
            }
            self.fill_row(hint.x, end_cell.x, end_cell.y as isize);
        }
    }

    fn cell_bounds(&self, x: usize, y: usize) -> LatLngBounds {
        LatLngBounds::new(
            LatLng::new(self.lat_lines[y], self.lng_lines[x]),
            LatLng::new(self.lat_lines[y + 1], self.lng_lines[x + 1]),
        )
    }

    fn merge(&self) -> BoxCandidates {
        let mut boxes_y = Vec::new();
        for y in 0..self.rows() {
            let mut run: Option<LatLngBounds> = None;
            for x in 0..self.columns() {
                self.extend_run(&mut run, x, y, |run| merge_boxes_y(&mut boxes_y, run));
            }
            if let Some(run) = run {
                merge_boxes_y(&mut boxes_y, run);
            }
        }

        let mut boxes_x = Vec::new();
        for x in 0..self.columns() {
            let mut run: Option<LatLngBounds> = None;
            for y in 0..self.rows() {
                self.extend_run(&mut run, x, y, |run| merge_boxes_x(&mut boxes_x, run));
            }
            if let Some(run) = run {
                merge_boxes_x(&mut boxes_x, run);
            }
        }

        BoxCandidates { boxes_x, boxes_y }
    }

    /// Grows the current run with cell `(x, y)` if it is marked, otherwise
    /// hands the finished run to `flush`.
    fn extend_run<F>(&self, run: &mut Option<LatLngBounds>, x: usize, y: usize, flush: F)
    where
        F: FnOnce(LatLngBounds),
    {
        if self.marks[x][y] {
            let cell = self.cell_bounds(x, y);
            match run {
                Some(current) => current.extend(cell.north_east),
                None => *run = Some(cell),
            }
        } else if let Some(finished) = run.take() {
            flush(finished);
        }
    }
}

/// Lines spaced `range_km` apart along `bearings.0` from `centre`, extended
/// until they enclose `limits` on both sides.
fn grid_lines(
    centre: LatLng,
    range_km: f64,
    bearings: (f64, f64),
    limits: (f64, f64),
    coordinate: fn(LatLng) -> f64,
) -> GeoResult<Vec<f64>> {
    let (forward, backward) = bearings;
    let (min, max) = limits;
    let line = |bearing: f64, k: usize| -> GeoResult<f64> {
        try_rhumb_destination(centre, bearing, range_km * k as f64)
            .map(coordinate)
            .ok_or_else(|| {
                GeoError::DegenerateGeometry(format!(
                    "grid line {} at bearing {} runs off the map",
                    k, bearing
                ))
            })
    };
    let check = |len: usize| -> GeoResult<()> {
        if len > MAX_GRID_CELLS + 1 {
            return Err(GeoError::DegenerateGeometry(format!(
                "more than {} grid lines; increase the range",
                MAX_GRID_CELLS + 1
            )));
        }
        Ok(())
    };

    let mut lines = VecDeque::from([coordinate(centre), line(forward, 1)?]);
    let mut k = 2;
    while lines[lines.len() - 2] < max {
        check(lines.len())?;
        lines.push_back(line(forward, k)?);
        k += 1;
    }
    let mut k = 1;
    while lines[1] > min {
        check(lines.len())?;
        lines.push_front(line(backward, k)?);
        k += 1;
    }

    let lines = Vec::from(lines);
    if lines.windows(2).any(|w| w[0] >= w[1]) {
        return Err(GeoError::DegenerateGeometry(
            "grid lines are not increasing (path too close to a pole or the antimeridian)"
                .to_string(),
        ));
    }
    Ok(lines)
}

fn cold_index(lines: &[f64], value: f64) -> usize {
    lines
        .partition_point(|line| *line < value)
        .saturating_sub(1)
        .min(lines.len() - 2)
}

fn hot_index(lines: &[f64], value: f64, prev: f64, hint: usize) -> usize {
    let mut i = hint;
    if value > prev {
        while i + 2 < lines.len() && lines[i + 1] < value {
            i += 1;
        }
    } else {
        while i > 0 && lines[i] > value {
            i -= 1;
        }
    }
    i
}

fn merge_boxes_x(boxes: &mut Vec<LatLngBounds>, run: LatLngBounds) {
    let existing = boxes.iter_mut().find(|b| {
        b.north_east.lng == run.south_west.lng
            && b.south_west.lat == run.south_west.lat
            && b.north_east.lat == run.north_east.lat
    });
    match existing {
        Some(b) => b.extend(run.north_east),
        None => boxes.push(run),
    }
}

fn merge_boxes_y(boxes: &mut Vec<LatLngBounds>, run: LatLngBounds) {
    let existing = boxes.iter_mut().find(|b| {
        b.north_east.lat == run.south_west.lat
            && b.south_west.lng == run.south_west.lng
            && b.north_east.lng == run.north_east.lng
    });
    match existing {
        Some(b) => b.extend(run.north_east),
        None => boxes.push(run),
    }
}
