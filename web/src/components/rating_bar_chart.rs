use leptos::prelude::*;
use shared_types::DistrictRating;

const MAX_RATING: f64 = 5.0;

/// Horizontal bars of the plain average rating per district, best first.
#[component]
pub fn RatingBarChart(#[prop(into)] ratings: Signal<Vec<DistrictRating>>) -> impl IntoView {
    view! {
        <div class="chart-card">
            <h3 class="chart-card__title">"Average rating by district"</h3>
            <Show
                when=move || ratings.with(|ratings| !ratings.is_empty())
                fallback=|| view! { <p class="chart-card__empty">"No rated pools yet."</p> }
            >
                <ul class="rating-bars">
                    <For
                        each=move || ratings.get()
                        key=|rating| rating.district.clone()
                        children=move |rating: DistrictRating| {
                            let width = (rating.average / MAX_RATING * 100.0).clamp(0.0, 100.0);
                            view! {
                                <li class="rating-bars__row">
                                    <span class="rating-bars__label">{rating.district.clone()}</span>
                                    <div class="rating-bars__track">
                                        <div
                                            class="rating-bars__bar"
                                            style=format!("width: {width:.1}%; background: {};", rating.color())
                                        ></div>
                                    </div>
                                    <span class="rating-bars__value">
                                        {format!("{:.1}", rating.average)}
                                        <small>{format!(" ({})", rating.count)}</small>
                                    </span>
                                </li>
                            }
                        }
                    />
                </ul>
            </Show>
        </div>
    }
}
