#[cfg(feature = "hydrate")]
pub mod leaflet_surface;
pub mod marker_icon;
pub mod pool_map;
