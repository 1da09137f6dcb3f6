use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use shared_types::{Pool, PoolId};

use crate::components::{error::ErrorView, loading::LoadingView, PoolCard};
use crate::store::use_pool_directory;

/// Case-insensitive match on display name, legal name or district.
pub fn matches_search(pool: &Pool, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    [pool.display_name(), pool.legal_name.as_str(), pool.district.as_str()]
        .iter()
        .any(|text| text.to_lowercase().contains(&query))
}

#[component]
pub fn PoolListPage() -> impl IntoView {
    let directory = use_pool_directory();
    let navigate = use_navigate();
    let search = RwSignal::new(String::new());

    let filtered = Memo::new(move |_| {
        let query = search.get();
        directory.pools.with(|pools| {
            pools
                .iter()
                .filter(|pool| matches_search(pool, &query))
                .cloned()
                .collect::<Vec<_>>()
        })
    });

    let opened = RwSignal::new(Option::<PoolId>::None);
    let open = Callback::new(move |pool: Pool| opened.set(Some(pool.id)));

    Effect::new(move |_| {
        if let Some(id) = opened.get() {
            navigate(&format!("/pools/{id}"), Default::default());
        }
    });

    view! {
        <div class="pool-list-page">
            <header class="pool-list-page__header">
                <h1>"Public pools"</h1>
                <input
                    class="pool-list-page__search"
                    type="search"
                    placeholder="Search by name or district"
                    prop:value=move || search.get()
                    on:input=move |ev| search.set(event_target_value(&ev))
                />
            </header>

            {move || directory.error.get().map(|message| view! {
                <ErrorView
                    message=Some(message)
                    on_retry=Callback::new(move |_| directory.refresh())
                />
            })}

            <Show
                when=move || !(directory.loading.get() && directory.pools.with(Vec::is_empty))
                fallback=|| view! { <LoadingView message=None /> }
            >
                <p class="pool-list-page__count">
                    {move || format!("{} of {} pools", filtered.with(Vec::len), directory.pools.with(Vec::len))}
                </p>
                <div class="pool-list-page__grid">
                    {move || {
                        filtered
                            .get()
                            .into_iter()
                            .map(|pool| view! {
                                <PoolCard pool=pool selected=Signal::derive(|| None) on_select=open />
                            })
                            .collect_view()
                    }}
                </div>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(name: &str, district: &str) -> Pool {
        Pool {
            id: PoolId(1),
            commercial_name: Some(name.to_string()),
            legal_name: "Inversiones SAC".to_string(),
            district: district.to_string(),
            ..Pool::default()
        }
    }

    #[test]
    fn search_ignores_case_and_whitespace() {
        let pool = pool("Club Sol", "Cayma");
        assert!(matches_search(&pool, "  sol "));
        assert!(matches_search(&pool, "CAYMA"));
        assert!(matches_search(&pool, "inversiones"));
        assert!(!matches_search(&pool, "yanahuara"));
    }

    #[test]
    fn empty_query_matches_everything() {
        assert!(matches_search(&pool("Club Sol", "Cayma"), ""));
    }
}
