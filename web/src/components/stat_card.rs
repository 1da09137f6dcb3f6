use leptos::prelude::*;

#[component]
pub fn StatCard(
    #[prop(into)] title: String,
    #[prop(into)] value: Signal<String>,
    #[prop(optional, into)] caption: Option<Signal<String>>,
    #[prop(default = "stat-card--blue")] accent: &'static str,
) -> impl IntoView {
    view! {
        <div class=format!("stat-card {accent}")>
            <span class="stat-card__title">{title}</span>
            <span class="stat-card__value">{move || value.get()}</span>
            {caption.map(|caption| view! {
                <span class="stat-card__caption">{move || caption.get()}</span>
            })}
        </div>
    }
}
