use leptos::prelude::*;
use shared_types::stats::rating_color;
use shared_types::{Pool, PoolId};

/// Compact list entry for a pool. Highlighted while `selected` matches it.
#[component]
pub fn PoolCard(
    pool: Pool,
    #[prop(into)] selected: Signal<Option<PoolId>>,
    on_select: Callback<Pool>,
) -> impl IntoView {
    let id = pool.id;
    let is_selected = move || selected.get() == Some(id);
    let status_class = if pool.is_healthy() {
        "pool-card__status pool-card__status--healthy"
    } else {
        "pool-card__status pool-card__status--unhealthy"
    };
    let rating = pool.rating.map(|rating| {
        view! {
            <span class="pool-card__rating" style=format!("color: {}", rating_color(rating))>
                {format!("{rating:.1}")}
            </span>
        }
    });
    let name = pool.display_name().to_string();
    let district = pool.district.clone();
    let state = pool.current_state.label();

    view! {
        <div
            class="pool-card"
            class:pool-card--selected=is_selected
            on:click=move |_| on_select.run(pool.clone())
        >
            <div class="pool-card__header">
                <h4 class="pool-card__name">{name}</h4>
                {rating}
            </div>
            <p class="pool-card__district">{district}</p>
            <span class=status_class>{state}</span>
        </div>
    }
}
