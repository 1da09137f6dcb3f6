use std::rc::Rc;

use leptos_leaflet::leaflet::{LatLng, Map};
use shared_types::{LatLong, MapBounds, MarkerState, MarkerSurface, Pool, PoolId, SurfaceError};
use wasm_bindgen::prelude::*;

use super::marker_icon::{marker_icon_html, marker_size, popup_html};

#[wasm_bindgen(inline_js = r#"
export function leafletAvailable() {
    return typeof window !== "undefined" && typeof window.L !== "undefined";
}

function poolIcon(html, width, height) {
    return L.divIcon({
        html: html,
        className: "pool-marker",
        iconSize: [width, height],
        iconAnchor: [width / 2, height],
        popupAnchor: [0, -height],
    });
}

export function createPoolMarker(map, lat, lng, iconHtml, width, height, popupHtml, onClick) {
    const marker = L.marker([lat, lng], { icon: poolIcon(iconHtml, width, height) });
    marker.bindPopup(popupHtml);
    marker.on("click", () => onClick());
    marker.addTo(map);
    return marker;
}

export function setPoolMarkerIcon(marker, iconHtml, width, height) {
    marker.setIcon(poolIcon(iconHtml, width, height));
}

export function fitPoolBounds(map, south, west, north, east) {
    map.fitBounds([[south, west], [north, east]]);
}
"#)]
extern "C" {
    #[wasm_bindgen(js_name = leafletAvailable)]
    pub fn leaflet_available() -> bool;

    pub type PoolMarker;

    #[wasm_bindgen(catch, js_name = createPoolMarker)]
    #[allow(clippy::too_many_arguments)]
    fn create_pool_marker(
        map: &JsValue,
        lat: f64,
        lng: f64,
        icon_html: &str,
        width: u32,
        height: u32,
        popup_html: &str,
        on_click: &Closure<dyn FnMut()>,
    ) -> Result<PoolMarker, JsValue>;

    #[wasm_bindgen(js_name = setPoolMarkerIcon)]
    fn set_pool_marker_icon(marker: &PoolMarker, icon_html: &str, width: u32, height: u32);

    #[wasm_bindgen(js_name = fitPoolBounds)]
    fn fit_pool_bounds(map: &JsValue, south: f64, west: f64, north: f64, east: f64);

    #[wasm_bindgen(method)]
    fn remove(this: &PoolMarker);

    #[wasm_bindgen(method, js_name = setZIndexOffset)]
    fn set_z_index_offset(this: &PoolMarker, offset: i32);

    #[wasm_bindgen(method, js_name = openPopup)]
    fn open_popup(this: &PoolMarker);
}

/// A placed leaflet marker. The click closure lives exactly as long as the
/// marker it is bound to.
pub struct LeafletMarker {
    marker: PoolMarker,
    _on_click: Closure<dyn FnMut()>,
}

pub struct LeafletSurface {
    map: Map,
    on_click: Rc<dyn Fn(PoolId)>,
}

impl LeafletSurface {
    pub fn new(map: Map, on_click: impl Fn(PoolId) + 'static) -> Self {
        Self {
            map,
            on_click: Rc::new(on_click),
        }
    }

    fn raw_map(&self) -> &JsValue {
        self.map.as_ref()
    }
}

impl MarkerSurface for LeafletSurface {
    type Marker = LeafletMarker;

    fn create_marker(
        &mut self,
        pool: &Pool,
        position: LatLong,
        state: MarkerState,
    ) -> Result<LeafletMarker, SurfaceError> {
        if !leaflet_available() {
            return Err(SurfaceError::Unavailable);
        }

        let id = pool.id;
        let on_click = Rc::clone(&self.on_click);
        let closure = Closure::wrap(Box::new(move || on_click(id)) as Box<dyn FnMut()>);
        let (width, height) = marker_size(state);

        let marker = create_pool_marker(
            self.raw_map(),
            position.lat,
            position.long,
            &marker_icon_html(state),
            width,
            height,
            &popup_html(pool),
            &closure,
        )
        .map_err(|err| SurfaceError::MarkerRejected {
            pool: id,
            reason: format!("{err:?}"),
        })?;

        Ok(LeafletMarker {
            marker,
            _on_click: closure,
        })
    }

    fn remove_marker(&mut self, marker: LeafletMarker) {
        marker.marker.remove();
    }

    fn set_icon(&mut self, marker: &LeafletMarker, state: MarkerState) {
        let (width, height) = marker_size(state);
        set_pool_marker_icon(&marker.marker, &marker_icon_html(state), width, height);
    }

    fn set_z_offset(&mut self, marker: &LeafletMarker, offset: i32) {
        marker.marker.set_z_index_offset(offset);
    }

    fn open_popup(&mut self, marker: &LeafletMarker) {
        marker.marker.open_popup();
    }

    fn set_view(&mut self, center: LatLong, zoom: f64) {
        self.map.set_view(&LatLng::new(center.lat, center.long), zoom);
    }

    fn fit_bounds(&mut self, bounds: MapBounds) {
        fit_pool_bounds(
            self.raw_map(),
            bounds.south_west.lat,
            bounds.south_west.long,
            bounds.north_east.lat,
            bounds.north_east.long,
        );
    }
}
