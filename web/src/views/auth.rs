use leptos::{prelude::*, task::spawn_local};
use leptos_router::{
    components::A,
    hooks::{use_navigate, use_query_map},
};
use shared_types::SignupRequest;
use thaw::*;

use crate::server::register_user;
use crate::utils::auth::{server_error_message, use_auth_session};

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = use_auth_session();
    let query_map = use_query_map();
    let navigate = use_navigate();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let loading = RwSignal::new(false);
    let error_message = RwSignal::new(Option::<String>::None);

    let just_signed_up =
        move || query_map.read().get("signup").as_deref() == Some("success");

    let is_button_disabled =
        Memo::new(move |_| email.get().is_empty() || password.get().is_empty() || loading.get());

    let submit_login = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        loading.set(true);
        error_message.set(None);

        let navigate = navigate.clone();
        spawn_local(async move {
            match session.login(email.get_untracked(), password.get_untracked()).await {
                Ok(()) => {
                    let target = if session.can_manage_pools() { "/admin" } else { "/" };
                    navigate(target, Default::default());
                }
                Err(message) => error_message.set(Some(message)),
            }
            loading.set(false);
        });
    };

    view! {
        <div class="auth-container">
            <div class="auth-card">
                <div class="auth-header">
                    <h1>"Welcome back"</h1>
                    <p>"Sign in to manage and follow public pools"</p>
                </div>

                <Show when=just_signed_up>
                    <div class="auth-success-message">
                        <p>"Account created successfully! Please log in."</p>
                    </div>
                </Show>

                <form on:submit=submit_login>
                    <div class="auth-field">
                        <label>"Email"</label>
                        <Input value=email input_type=InputType::Email placeholder="you@example.com" />
                    </div>
                    <div class="auth-field">
                        <label>"Password"</label>
                        <Input value=password input_type=InputType::Password />
                    </div>

                    <Show when=move || error_message.get().is_some()>
                        <div class="auth-error-message">
                            {move || error_message.get().unwrap_or_default()}
                        </div>
                    </Show>

                    <button class="auth-submit" type="submit" disabled=move || is_button_disabled.get()>
                        {move || if loading.get() { "Signing in..." } else { "Sign in" }}
                    </button>
                </form>

                <p class="auth-switch">
                    "No account yet? " <A href="/signup">"Create one"</A>
                </p>
            </div>
        </div>
    }
}

#[component]
pub fn SignupPage() -> impl IntoView {
    let navigate = use_navigate();

    let first_name = RwSignal::new(String::new());
    let last_name = RwSignal::new(String::new());
    let username = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let re_password = RwSignal::new(String::new());
    let loading = RwSignal::new(false);
    let error_message = RwSignal::new(Option::<String>::None);

    let submit_signup = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();

        let request = SignupRequest {
            first_name: first_name.get_untracked(),
            last_name: last_name.get_untracked(),
            username: username.get_untracked(),
            email: email.get_untracked(),
            password: password.get_untracked(),
            re_password: re_password.get_untracked(),
        };
        if request.password != request.re_password {
            error_message.set(Some("Passwords do not match.".to_string()));
            return;
        }

        loading.set(true);
        error_message.set(None);

        let navigate = navigate.clone();
        spawn_local(async move {
            match register_user(request).await {
                Ok(()) => navigate("/login?signup=success", Default::default()),
                Err(err) => error_message.set(Some(server_error_message(&err))),
            }
            loading.set(false);
        });
    };

    view! {
        <div class="auth-container">
            <div class="auth-card">
                <div class="auth-header">
                    <h1>"Create an account"</h1>
                    <p>"Follow the health status of the pools in your city"</p>
                </div>

                <form on:submit=submit_signup>
                    <div class="auth-row">
                        <div class="auth-field">
                            <label>"First name"</label>
                            <Input value=first_name />
                        </div>
                        <div class="auth-field">
                            <label>"Last name"</label>
                            <Input value=last_name />
                        </div>
                    </div>
                    <div class="auth-field">
                        <label>"Username"</label>
                        <Input value=username />
                    </div>
                    <div class="auth-field">
                        <label>"Email"</label>
                        <Input value=email input_type=InputType::Email />
                    </div>
                    <div class="auth-field">
                        <label>"Password"</label>
                        <Input value=password input_type=InputType::Password />
                    </div>
                    <div class="auth-field">
                        <label>"Repeat password"</label>
                        <Input value=re_password input_type=InputType::Password />
                    </div>

                    <Show when=move || error_message.get().is_some()>
                        <div class="auth-error-message">
                            {move || error_message.get().unwrap_or_default()}
                        </div>
                    </Show>

                    <button class="auth-submit" type="submit" disabled=move || loading.get()>
                        {move || if loading.get() { "Creating account..." } else { "Create account" }}
                    </button>
                </form>

                <p class="auth-switch">
                    "Already registered? " <A href="/login">"Sign in"</A>
                </p>
            </div>
        </div>
    }
}
