use leptos::prelude::*;
use thaw::{Button, ButtonAppearance, MessageBar, MessageBarIntent};

/// Inline error banner. With `on_retry` set it also offers a retry button.
#[component]
pub fn ErrorView(
    message: Option<String>,
    #[prop(optional)] on_retry: Option<Callback<()>>,
) -> impl IntoView {
    view! {
        <div class="error-container">
            <MessageBar intent=MessageBarIntent::Error>
                {message.unwrap_or_else(|| "Something went wrong. Please try again.".to_string())}
            </MessageBar>
            {on_retry.map(|retry| view! {
                <Button appearance=ButtonAppearance::Secondary on_click=move |_| retry.run(())>
                    "Retry"
                </Button>
            })}
        </div>
    }
}
