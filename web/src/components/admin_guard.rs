use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::utils::auth::use_auth_session;

#[component]
pub fn LoadingState() -> impl IntoView {
    view! {
        <div class="auth-guard-container">
            <div class="auth-guard-content">
                <div class="auth-guard-loading-title">"Verifying access..."</div>
                <div class="auth-guard-loading-subtitle">
                    "Please wait while we check your credentials"
                </div>
            </div>
        </div>
    }
}

#[component]
pub fn AccessDeniedState() -> impl IntoView {
    let session = use_auth_session();
    let navigate = use_navigate();

    // Signed-in users without the right role stay here; anonymous ones go to login.
    Effect::new(move |_| {
        if session.user().is_none() {
            navigate("/login", Default::default());
        }
    });

    view! {
        <div class="auth-guard-container">
            <div class="auth-guard-content">
                <div class="auth-guard-denied-title">"Access denied"</div>
                <div class="auth-guard-denied-subtitle">
                    {move || if session.user().is_some() {
                        "Only administrators and inspectors can manage pools."
                    } else {
                        "Redirecting to login..."
                    }}
                </div>
            </div>
        </div>
    }
}

/// Renders `children` only for users allowed to manage pools.
#[component]
pub fn AdminGuard(children: ChildrenFn) -> impl IntoView {
    let session = use_auth_session();

    view! {
        <Show
            when=move || !session.is_loading()
            fallback=move || view! { <LoadingState/> }
        >
            <Show
                when=move || session.can_manage_pools()
                fallback=move || view! { <AccessDeniedState/> }
                clone:children
            >
                {children()}
            </Show>
        </Show>
    }
}
