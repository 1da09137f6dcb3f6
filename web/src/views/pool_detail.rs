use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_params_map;
use shared_types::stats::rating_color;
use shared_types::Pool;

use crate::components::{error::ErrorView, loading::LoadingView};
use crate::server::fetch_pool;
use crate::utils::auth::stored_access_token;

fn or_dash(value: Option<String>) -> String {
    value
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| "-".to_string())
}

#[component]
pub fn PoolDetails(pool: Pool) -> impl IntoView {
    let rating = match pool.rating {
        Some(rating) => view! {
            <span style=format!("color: {}; font-weight: 600;", rating_color(rating))>
                {format!("{rating:.1} / 5")}
            </span>
        }
        .into_any(),
        None => view! { <span>"Not rated"</span> }.into_any(),
    };
    let status_class = if pool.is_healthy() {
        "pool-details__status pool-details__status--healthy"
    } else {
        "pool-details__status pool-details__status--unhealthy"
    };

    let rows = [
        ("File number", pool.file_number.clone()),
        ("Legal name", pool.legal_name.clone()),
        ("Pool type", pool.pool_type.clone()),
        ("Address", pool.address.clone()),
        ("District", pool.district.clone()),
        ("Capacity", pool.capacity.to_string()),
        ("Area", format!("{} m²", pool.area_m2)),
        ("Volume", format!("{} m³", pool.volume_m3)),
        ("Resolution", or_dash(pool.approval_resolution_number.clone())),
        ("Resolution state", pool.state.label().to_string()),
        ("Approved on", or_dash(pool.approval_date.map(|d| d.to_string()))),
        ("Expires on", or_dash(pool.expiration_date.map(|d| d.to_string()))),
        ("Last inspection", or_dash(pool.last_inspection_date.map(|d| d.to_string()))),
        ("Observations", or_dash(pool.observations.clone())),
    ];

    view! {
        <article class="pool-details">
            {pool.image_url.clone().map(|src| view! {
                <img class="pool-details__image" src=src alt=pool.display_name().to_string() />
            })}
            <header class="pool-details__header">
                <h2>{pool.display_name().to_string()}</h2>
                <span class=status_class>{pool.current_state.label()}</span>
            </header>
            <p class="pool-details__rating">{rating}</p>
            <dl class="pool-details__facts">
                {rows
                    .into_iter()
                    .map(|(label, value)| view! {
                        <dt>{label}</dt>
                        <dd>{value}</dd>
                    })
                    .collect_view()}
            </dl>
            {(!pool.is_active).then(|| view! {
                <p class="pool-details__inactive">"This pool is currently inactive."</p>
            })}
        </article>
    }
}

#[component]
pub fn PoolDetailPage() -> impl IntoView {
    let params = use_params_map();
    let pool_id = move || {
        params
            .read()
            .get("id")
            .and_then(|id| id.parse::<i64>().ok())
    };

    let pool = Resource::new(pool_id, |id| async move {
        match id {
            Some(id) => fetch_pool(id, stored_access_token()).await.map(Some),
            None => Ok(None),
        }
    });

    view! {
        <div class="pool-detail-page">
            <A href="/pools" attr:class="pool-detail-page__back">"Back to the list"</A>
            <Suspense fallback=|| view! { <LoadingView message=Some("Loading pool...".to_string()) /> }>
                {move || match pool.get() {
                    Some(Ok(Some(pool))) => view! { <PoolDetails pool=pool /> }.into_any(),
                    Some(Ok(None)) => view! {
                        <ErrorView message=Some("That is not a valid pool id.".to_string()) />
                    }
                    .into_any(),
                    Some(Err(err)) => {
                        leptos::logging::error!("Failed to load pool: {}", err);
                        view! {
                            <ErrorView message=Some("The pool could not be loaded.".to_string()) />
                        }
                        .into_any()
                    }
                    None => view! { <LoadingView message=None /> }.into_any(),
                }}
            </Suspense>
        </div>
    }
}
