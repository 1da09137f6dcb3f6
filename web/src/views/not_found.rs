use leptos::prelude::*;
use leptos_router::components::A;

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="not-found">
            <div class="not-found__code">"404"</div>
            <div class="not-found__card">
                <h1>"Page not found"</h1>
                <p>"The page you are looking for does not exist or may have been moved."</p>
                <div class="not-found__links">
                    <A href="/" attr:class="not-found__link not-found__link--primary">"Back to the map"</A>
                    <A href="/pools" attr:class="not-found__link">"Browse pools"</A>
                </div>
            </div>
        </div>
    }
}
