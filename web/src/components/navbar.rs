use leptos::prelude::*;
use leptos_router::components::A;

use crate::utils::auth::use_auth_session;

#[component]
pub fn Navbar() -> impl IntoView {
    let session = use_auth_session();

    view! {
        <nav class="navbar">
            <div class="navbar__container">
                <div class="navbar__brand">
                    <A href="/" attr:class="navbar__logo">
                        "Piscinas Arequipa"
                    </A>
                </div>

                <div class="navbar__links">
                    <A href="/" attr:class="navbar__link">
                        "Map"
                    </A>
                    <A href="/pools" attr:class="navbar__link">
                        "Pools"
                    </A>
                    <Show when=move || session.can_manage_pools()>
                        <A href="/admin" attr:class="navbar__link">
                            "Dashboard"
                        </A>
                        <A href="/admin/pools" attr:class="navbar__link">
                            "Manage pools"
                        </A>
                    </Show>
                    {move || match session.user() {
                        Some(user) => view! {
                            <span class="navbar__user">{user.full_name()}</span>
                            <button class="navbar__link navbar__link--cta" on:click=move |_| session.logout()>
                                "Log out"
                            </button>
                        }
                        .into_any(),
                        None => view! {
                            <A href="/login" attr:class="navbar__link navbar__link--cta">
                                "Log in"
                            </A>
                        }
                        .into_any(),
                    }}
                </div>
            </div>
        </nav>
    }
}
