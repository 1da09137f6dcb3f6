use leptos::prelude::*;
use shared_types::{Pool, PoolId};

use crate::components::{error::ErrorView, loading::LoadingView, PoolCard};
use crate::store::use_pool_directory;
use crate::views::map::pool_map::PoolMap;
use crate::views::pool_detail::PoolDetails;

/// Citizen landing page: map and list side by side with a detail pane.
/// The page owns the selection; the map and the list only request changes.
#[component]
pub fn HomePage() -> impl IntoView {
    let directory = use_pool_directory();
    let selected = RwSignal::new(Option::<PoolId>::None);

    let select = Callback::new(move |pool: Pool| selected.set(Some(pool.id)));
    let selected_pool = Memo::new(move |_| selected.get().and_then(|id| directory.find(id)));

    view! {
        <div class="home-page">
            {move || directory.error.get().map(|message| view! {
                <ErrorView
                    message=Some(message)
                    on_retry=Callback::new(move |_| directory.refresh())
                />
            })}

            <div class="home-page__content">
                <div class="home-page__map">
                    <PoolMap
                        pools=directory.pools
                        selected=selected
                        on_select=select
                    />
                </div>

                <aside class="home-page__list">
                    <h2>"Public pools"</h2>
                    <Show
                        when=move || !(directory.loading.get() && directory.pools.with(Vec::is_empty))
                        fallback=|| view! { <LoadingView message=None /> }
                    >
                        {move || {
                            directory
                                .pools
                                .get()
                                .into_iter()
                                .map(|pool| view! {
                                    <PoolCard pool=pool selected=selected on_select=select />
                                })
                                .collect_view()
                        }}
                    </Show>
                </aside>
            </div>

            {move || selected_pool.get().map(|pool| view! {
                <section class="home-page__detail">
                    <button class="home-page__close" on:click=move |_| selected.set(None)>
                        "Close"
                    </button>
                    <PoolDetails pool=pool />
                </section>
            })}
        </div>
    }
}
