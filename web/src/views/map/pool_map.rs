use leptos::prelude::*;
use leptos_leaflet::{leaflet::Map, prelude::*};
use shared_types::map_sync::{DEFAULT_CENTER, OVERVIEW_ZOOM};
use shared_types::{Pool, PoolId};

use crate::components::{error::ErrorView, loading::LoadingView};

/// Map with one marker per pool. Selection belongs to the caller: a marker
/// click is reported through `on_select`, and the highlighted marker follows
/// `selected`.
#[component]
pub fn PoolMap(
    #[prop(into)] pools: Signal<Vec<Pool>>,
    #[prop(into)] selected: Signal<Option<PoolId>>,
    on_select: Callback<Pool>,
) -> impl IntoView {
    let map: JsRwSignal<Option<Map>> = JsRwSignal::new_local(None::<Map>);
    let map_ready = RwSignal::new(false);
    let map_failed = RwSignal::new(false);

    #[cfg(feature = "hydrate")]
    {
        use super::leaflet_surface::{leaflet_available, LeafletSurface};
        use shared_types::MapSync;
        use wasm_bindgen::JsCast;

        // Delay map rendering until after hydration
        Effect::new(move |_| {
            if !leaflet_available() {
                leptos::logging::error!("Leaflet is not loaded, the pool map stays empty");
                map_failed.set(true);
                return;
            }
            let Some(window) = web_sys::window() else {
                map_failed.set(true);
                return;
            };
            let _ = window.request_animation_frame(
                wasm_bindgen::closure::Closure::once_into_js(move || {
                    map_ready.set(true);
                })
                .as_ref()
                .unchecked_ref(),
            );
        });

        let sync = StoredValue::new_local(None::<MapSync<LeafletSurface>>);

        let on_marker_click = move |id: PoolId| {
            let pool = sync
                .try_with_value(|slot| {
                    slot.as_ref()
                        .and_then(|sync| sync.marker_clicked(id).cloned())
                })
                .flatten();
            if let Some(pool) = pool {
                on_select.run(pool);
            }
        };

        Effect::new(move |_| {
            let Some(map_instance) = map.get() else {
                return;
            };
            let pools = pools.get();

            sync.update_value(|slot| {
                let sync = slot.get_or_insert_with(|| {
                    MapSync::with_selection(
                        LeafletSurface::new(map_instance, on_marker_click),
                        selected.get_untracked(),
                    )
                });
                let report = sync.rebuild(&pools);
                if !report.skipped.is_empty() {
                    leptos::logging::warn!(
                        "Skipped {} pools without a usable map position: {:?}",
                        report.skipped.len(),
                        report.skipped
                    );
                }
            });
        });

        Effect::new(move |_| {
            let id = selected.get();
            sync.update_value(|slot| {
                if let Some(sync) = slot.as_mut() {
                    sync.set_selected(id);
                }
            });
        });

        // Dropping the synchronizer removes its markers.
        on_cleanup(move || {
            let _ = sync.try_update_value(|slot| slot.take());
        });
    }

    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (pools, selected, on_select);
    }

    view! {
        <div class="pool-map">
            <Show
                when=move || !map_failed.get()
                fallback=|| view! {
                    <ErrorView message=Some("The map could not be loaded.".to_string()) />
                }
            >
                <Show
                    when=move || map_ready.get()
                    fallback=|| view! {
                        <LoadingView message=Some("Loading map...".to_string()) />
                    }
                >
                    <MapContainer
                        style="height: 100%; width: 100%"
                        center=Position::new(DEFAULT_CENTER.lat, DEFAULT_CENTER.long)
                        zoom=OVERVIEW_ZOOM
                        set_view=true
                        map=map.write_only()
                    >
                        <TileLayer
                            url="https://tile.openstreetmap.org/{z}/{x}/{y}.png"
                            attribution="&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors"
                        />
                    </MapContainer>
                </Show>
            </Show>
        </div>
    }
}
