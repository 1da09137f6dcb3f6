//! Keeps one map marker per pool and exactly the selected one highlighted.
//!
//! The drawing itself goes through [`MarkerSurface`], so the same logic runs
//! against leaflet in the browser and against a recording fake in tests.
//! Selection is owned by the caller: clicks are only reported back through
//! [`MapSync::marker_clicked`], and highlighting changes only when the caller
//! invokes [`MapSync::set_selected`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pool::{LatLong, Pool, PoolId};

/// Arequipa city centre, used before any pool has been placed.
pub const DEFAULT_CENTER: LatLong = LatLong {
    lat: -16.4040102,
    long: -71.559611,
};
pub const OVERVIEW_ZOOM: f64 = 13.0;
pub const FOCUS_ZOOM: f64 = 15.0;
pub const BOUNDS_PADDING: f64 = 0.2;
pub const SELECTED_Z_OFFSET: i32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerState {
    Normal,
    Selected,
}

impl MarkerState {
    pub fn z_offset(self) -> i32 {
        match self {
            MarkerState::Normal => 0,
            MarkerState::Selected => SELECTED_Z_OFFSET,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SurfaceError {
    #[error("map surface is not available")]
    Unavailable,
    #[error("marker for pool {pool} was rejected: {reason}")]
    MarkerRejected { pool: PoolId, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MapBounds {
    pub north_east: LatLong,
    pub south_west: LatLong,
}

impl MapBounds {
    /// Smallest box containing every point, `None` for no points.
    pub fn enclosing(points: impl IntoIterator<Item = LatLong>) -> Option<Self> {
        points.into_iter().fold(None, |bounds, point| {
            Some(match bounds {
                None => MapBounds {
                    north_east: point,
                    south_west: point,
                },
                Some(MapBounds {
                    north_east,
                    south_west,
                }) => MapBounds {
                    north_east: LatLong::new(
                        north_east.lat.max(point.lat),
                        north_east.long.max(point.long),
                    ),
                    south_west: LatLong::new(
                        south_west.lat.min(point.lat),
                        south_west.long.min(point.long),
                    ),
                },
            })
        })
    }

    /// Grows the box on every side by `ratio` of its height and width.
    pub fn pad(self, ratio: f64) -> Self {
        let lat_buffer = (self.north_east.lat - self.south_west.lat).abs() * ratio;
        let long_buffer = (self.north_east.long - self.south_west.long).abs() * ratio;
        MapBounds {
            north_east: LatLong::new(
                self.north_east.lat + lat_buffer,
                self.north_east.long + long_buffer,
            ),
            south_west: LatLong::new(
                self.south_west.lat - lat_buffer,
                self.south_west.long - long_buffer,
            ),
        }
    }

    pub fn center(&self) -> LatLong {
        LatLong::new(
            (self.north_east.lat + self.south_west.lat) / 2.0,
            (self.north_east.long + self.south_west.long) / 2.0,
        )
    }
}

/// Drawing primitives the synchronizer needs from a map library.
pub trait MarkerSurface {
    type Marker;

    fn create_marker(
        &mut self,
        pool: &Pool,
        position: LatLong,
        state: MarkerState,
    ) -> Result<Self::Marker, SurfaceError>;

    /// Takes the handle by value: once removed it cannot be touched again.
    fn remove_marker(&mut self, marker: Self::Marker);

    fn set_icon(&mut self, marker: &Self::Marker, state: MarkerState);

    fn set_z_offset(&mut self, marker: &Self::Marker, offset: i32);

    fn open_popup(&mut self, marker: &Self::Marker);

    fn set_view(&mut self, center: LatLong, zoom: f64);

    fn fit_bounds(&mut self, bounds: MapBounds);
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RebuildReport {
    pub placed: usize,
    pub skipped: Vec<PoolId>,
    pub viewport: Option<MapBounds>,
}

struct PlacedMarker<M> {
    pool: Pool,
    position: LatLong,
    state: MarkerState,
    handle: M,
}

pub struct MapSync<S: MarkerSurface> {
    surface: S,
    markers: BTreeMap<PoolId, PlacedMarker<S::Marker>>,
    selected: Option<PoolId>,
    viewport: Option<MapBounds>,
}

impl<S: MarkerSurface> MapSync<S> {
    pub fn new(surface: S) -> Self {
        Self::with_selection(surface, None)
    }

    /// Starts with `selected` already designated, so the first rebuild places
    /// that marker highlighted.
    pub fn with_selection(surface: S, selected: Option<PoolId>) -> Self {
        Self {
            surface,
            markers: BTreeMap::new(),
            selected,
            viewport: None,
        }
    }

    /// Replaces every marker with one per pool that has usable coordinates,
    /// then fits the view around them. Prior markers are always released first.
    pub fn rebuild(&mut self, pools: &[Pool]) -> RebuildReport {
        self.clear();

        let mut report = RebuildReport::default();
        for pool in pools {
            let Some(position) = pool.coordinates() else {
                tracing::warn!(
                    pool_id = %pool.id,
                    name = pool.display_name(),
                    latitude = ?pool.latitude,
                    longitude = ?pool.longitude,
                    "pool has no usable coordinates, not placing a marker"
                );
                report.skipped.push(pool.id);
                continue;
            };

            if self.markers.contains_key(&pool.id) {
                tracing::warn!(pool_id = %pool.id, "duplicate pool id, keeping the first marker");
                report.skipped.push(pool.id);
                continue;
            }

            let state = if self.selected == Some(pool.id) {
                MarkerState::Selected
            } else {
                MarkerState::Normal
            };

            match self.surface.create_marker(pool, position, state) {
                Ok(handle) => {
                    if state == MarkerState::Selected {
                        self.surface.set_z_offset(&handle, state.z_offset());
                        self.surface.open_popup(&handle);
                    }
                    self.markers.insert(
                        pool.id,
                        PlacedMarker {
                            pool: pool.clone(),
                            position,
                            state,
                            handle,
                        },
                    );
                }
                Err(err) => {
                    tracing::warn!(pool_id = %pool.id, error = %err, "marker creation failed");
                    report.skipped.push(pool.id);
                }
            }
        }

        self.viewport = MapBounds::enclosing(self.markers.values().map(|m| m.position))
            .map(|bounds| bounds.pad(BOUNDS_PADDING));
        if let Some(bounds) = self.viewport {
            self.surface.fit_bounds(bounds);
        }

        report.placed = self.markers.len();
        report.viewport = self.viewport;
        tracing::debug!(
            placed = report.placed,
            skipped = report.skipped.len(),
            "rebuilt pool markers"
        );
        report
    }

    /// Highlights the marker for `id` and returns every other marker to
    /// normal. Only markers whose state changes are touched. A marker that
    /// becomes selected is raised, has its popup opened and is centred at
    /// [`FOCUS_ZOOM`]; clearing the selection leaves the view where it is.
    pub fn set_selected(&mut self, id: Option<PoolId>) {
        self.selected = id;

        for (marker_id, marker) in self.markers.iter_mut() {
            let next = if Some(*marker_id) == id {
                MarkerState::Selected
            } else {
                MarkerState::Normal
            };
            if marker.state == next {
                continue;
            }

            marker.state = next;
            self.surface.set_icon(&marker.handle, next);
            self.surface.set_z_offset(&marker.handle, next.z_offset());

            if next == MarkerState::Selected {
                self.surface.open_popup(&marker.handle);
                self.surface.set_view(marker.position, FOCUS_ZOOM);
            }
        }
    }

    /// Resolves a click on a marker to its pool so the owner can decide what
    /// to select. Does not change any marker state.
    pub fn marker_clicked(&self, id: PoolId) -> Option<&Pool> {
        self.markers.get(&id).map(|marker| &marker.pool)
    }

    /// Removes every marker from the surface.
    pub fn clear(&mut self) {
        for (_, marker) in std::mem::take(&mut self.markers) {
            self.surface.remove_marker(marker.handle);
        }
        self.viewport = None;
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn state_of(&self, id: PoolId) -> Option<MarkerState> {
        self.markers.get(&id).map(|marker| marker.state)
    }

    pub fn selected(&self) -> Option<PoolId> {
        self.selected
    }

    pub fn selected_marker(&self) -> Option<PoolId> {
        self.markers
            .iter()
            .find(|(_, marker)| marker.state == MarkerState::Selected)
            .map(|(id, _)| *id)
    }

    pub fn viewport(&self) -> Option<MapBounds> {
        self.viewport
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}

impl<S: MarkerSurface> Drop for MapSync<S> {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::sample_pool;
    use std::collections::HashSet;

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Create(PoolId, MarkerState),
        Remove(u32),
        Icon(u32, MarkerState),
        ZOffset(u32, i32),
        Popup(u32),
        View(LatLong, f64),
        Fit(MapBounds),
    }

    #[derive(Default)]
    struct RecordingSurface {
        next_handle: u32,
        live: HashSet<u32>,
        ops: Vec<Op>,
        reject: HashSet<PoolId>,
    }

    impl RecordingSurface {
        fn views(&self) -> Vec<(LatLong, f64)> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Op::View(center, zoom) => Some((*center, *zoom)),
                    _ => None,
                })
                .collect()
        }
    }

    impl MarkerSurface for RecordingSurface {
        type Marker = u32;

        fn create_marker(
            &mut self,
            pool: &Pool,
            _position: LatLong,
            state: MarkerState,
        ) -> Result<u32, SurfaceError> {
            if self.reject.contains(&pool.id) {
                return Err(SurfaceError::MarkerRejected {
                    pool: pool.id,
                    reason: "bad icon".to_string(),
                });
            }
            self.next_handle += 1;
            self.live.insert(self.next_handle);
            self.ops.push(Op::Create(pool.id, state));
            Ok(self.next_handle)
        }

        fn remove_marker(&mut self, marker: u32) {
            assert!(self.live.remove(&marker), "marker {marker} removed twice");
            self.ops.push(Op::Remove(marker));
        }

        fn set_icon(&mut self, marker: &u32, state: MarkerState) {
            self.ops.push(Op::Icon(*marker, state));
        }

        fn set_z_offset(&mut self, marker: &u32, offset: i32) {
            self.ops.push(Op::ZOffset(*marker, offset));
        }

        fn open_popup(&mut self, marker: &u32) {
            self.ops.push(Op::Popup(*marker));
        }

        fn set_view(&mut self, center: LatLong, zoom: f64) {
            self.ops.push(Op::View(center, zoom));
        }

        fn fit_bounds(&mut self, bounds: MapBounds) {
            self.ops.push(Op::Fit(bounds));
        }
    }

    fn pool_at(id: i64, lat: f64, long: f64) -> Pool {
        let mut pool = sample_pool(id);
        pool.latitude = Some(lat);
        pool.longitude = Some(long);
        pool
    }

    fn three_pools() -> Vec<Pool> {
        vec![
            pool_at(1, -16.40, -71.55),
            pool_at(2, -16.38, -71.53),
            pool_at(3, -16.42, -71.57),
        ]
    }

    #[test]
    fn rebuild_places_one_marker_per_located_pool() {
        let mut pools = three_pools();
        let mut bad = sample_pool(4);
        bad.latitude = None;
        pools.push(bad);

        let mut sync = MapSync::new(RecordingSurface::default());
        let report = sync.rebuild(&pools);

        assert_eq!(report.placed, 3);
        assert_eq!(report.skipped, vec![PoolId(4)]);
        assert_eq!(sync.marker_count(), 3);
        assert_eq!(sync.surface().live.len(), 3);
        assert!(sync.state_of(PoolId(4)).is_none());
    }

    #[test]
    fn rebuild_pads_bounds() {
        let mut sync = MapSync::new(RecordingSurface::default());
        let report = sync.rebuild(&three_pools());
        let bounds = report.viewport.unwrap();

        assert!((bounds.north_east.lat - (-16.38 + 0.008)).abs() < 1e-9);
        assert!((bounds.south_west.lat - (-16.42 - 0.008)).abs() < 1e-9);
        assert!((bounds.north_east.long - (-71.53 + 0.008)).abs() < 1e-9);
        assert!((bounds.south_west.long - (-71.57 - 0.008)).abs() < 1e-9);
        assert_eq!(sync.surface().ops.last(), Some(&Op::Fit(bounds)));
    }

    #[test]
    fn rebuild_is_idempotent_and_releases_prior_markers() {
        let pools = three_pools();
        let mut sync = MapSync::new(RecordingSurface::default());

        let first = sync.rebuild(&pools);
        let second = sync.rebuild(&pools);

        assert_eq!(first, second);
        assert_eq!(sync.marker_count(), 3);
        assert_eq!(sync.surface().live.len(), 3);
        let removed = sync
            .surface()
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Remove(_)))
            .count();
        assert_eq!(removed, 3);
    }

    #[test]
    fn bad_latitude_is_skipped_but_still_counted_in_stats() {
        let pools: Vec<Pool> = crate::payload::extract_pools(serde_json::json!([
            { "id": 1, "latitude": "not-a-number", "longitude": "-71.5" },
            { "id": 2, "latitude": "-16.4", "longitude": "-71.5" }
        ]));

        let mut sync = MapSync::new(RecordingSurface::default());
        let report = sync.rebuild(&pools);

        assert_eq!(report.placed, 1);
        assert_eq!(report.skipped, vec![PoolId(1)]);
        assert_eq!(crate::stats::PoolStats::from_pools(&pools).total_pools, 2);
    }

    #[test]
    fn rejected_marker_does_not_abort_rebuild() {
        let surface = RecordingSurface {
            reject: HashSet::from([PoolId(2)]),
            ..Default::default()
        };
        let mut sync = MapSync::new(surface);
        let report = sync.rebuild(&three_pools());

        assert_eq!(report.placed, 2);
        assert_eq!(report.skipped, vec![PoolId(2)]);
    }

    #[test]
    fn duplicate_ids_get_a_single_marker() {
        let mut pools = three_pools();
        pools.push(pool_at(1, -16.0, -71.0));

        let mut sync = MapSync::new(RecordingSurface::default());
        let report = sync.rebuild(&pools);

        assert_eq!(report.placed, 3);
        assert_eq!(report.skipped, vec![PoolId(1)]);
    }

    #[test]
    fn selecting_highlights_raises_and_focuses() {
        let mut sync = MapSync::new(RecordingSurface::default());
        sync.rebuild(&three_pools());
        let before = sync.surface().ops.len();

        sync.set_selected(Some(PoolId(2)));

        assert_eq!(sync.state_of(PoolId(2)), Some(MarkerState::Selected));
        assert_eq!(sync.state_of(PoolId(1)), Some(MarkerState::Normal));
        assert_eq!(sync.selected_marker(), Some(PoolId(2)));
        assert_eq!(
            sync.surface().views(),
            vec![(LatLong::new(-16.38, -71.53), FOCUS_ZOOM)]
        );
        let ops = &sync.surface().ops[before..];
        assert!(ops.contains(&Op::ZOffset(2, SELECTED_Z_OFFSET)));
        assert!(ops.contains(&Op::Popup(2)));
        assert!(!ops.iter().any(|op| matches!(op, Op::Create(..) | Op::Remove(_))));
    }

    #[test]
    fn moving_the_selection_resets_the_previous_marker() {
        let mut sync = MapSync::new(RecordingSurface::default());
        sync.rebuild(&three_pools());
        sync.set_selected(Some(PoolId(1)));
        sync.set_selected(Some(PoolId(3)));

        assert_eq!(sync.state_of(PoolId(1)), Some(MarkerState::Normal));
        assert_eq!(sync.state_of(PoolId(3)), Some(MarkerState::Selected));
        assert!(sync.surface().ops.contains(&Op::ZOffset(1, 0)));
        assert_eq!(sync.surface().views().len(), 2);
    }

    #[test]
    fn unknown_id_leaves_everything_normal() {
        let mut sync = MapSync::new(RecordingSurface::default());
        sync.rebuild(&three_pools());
        sync.set_selected(Some(PoolId(99)));

        assert_eq!(sync.selected_marker(), None);
        assert!(sync.surface().views().is_empty());
    }

    #[test]
    fn clearing_the_selection_does_not_recenter() {
        let mut sync = MapSync::new(RecordingSurface::default());
        sync.rebuild(&three_pools());
        sync.set_selected(Some(PoolId(1)));
        sync.set_selected(None);

        assert_eq!(sync.state_of(PoolId(1)), Some(MarkerState::Normal));
        assert_eq!(sync.selected_marker(), None);
        assert_eq!(sync.surface().views().len(), 1);
        assert_eq!(
            sync.surface().ops.last(),
            Some(&Op::ZOffset(1, 0))
        );
    }

    #[test]
    fn rebuild_keeps_the_current_selection() {
        let mut sync = MapSync::with_selection(RecordingSurface::default(), Some(PoolId(3)));
        sync.rebuild(&three_pools());

        assert_eq!(sync.state_of(PoolId(3)), Some(MarkerState::Selected));
        assert!(sync
            .surface()
            .ops
            .contains(&Op::Create(PoolId(3), MarkerState::Selected)));
        assert!(sync.surface().views().is_empty());
    }

    #[test]
    fn click_reports_the_pool_without_selecting_it() {
        let mut sync = MapSync::new(RecordingSurface::default());
        sync.rebuild(&three_pools());

        let clicked = sync.marker_clicked(PoolId(2)).map(|pool| pool.id);
        assert_eq!(clicked, Some(PoolId(2)));
        assert_eq!(sync.selected_marker(), None);
        assert!(sync.marker_clicked(PoolId(42)).is_none());
    }

    #[test]
    fn empty_rebuild_clears_viewport() {
        let mut sync = MapSync::new(RecordingSurface::default());
        sync.rebuild(&three_pools());
        let report = sync.rebuild(&[]);

        assert_eq!(report.placed, 0);
        assert_eq!(report.viewport, None);
        assert!(sync.surface().live.is_empty());
    }
}
