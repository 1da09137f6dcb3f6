use leptos::{prelude::*, task::spawn_local};
use leptos_router::components::A;
use shared_types::{Pool, PoolDraft, PoolId};
use thaw::{Button, ButtonAppearance};

use crate::components::{error::ErrorView, loading::LoadingView, AdminGuard, PoolForm, PoolTable};
use crate::store::use_pool_directory;
use crate::utils::download::download_pools_csv;

#[derive(Debug, Clone, PartialEq)]
enum Editor {
    Closed,
    Creating,
    Editing(Pool),
}

#[component]
pub fn PoolManager() -> impl IntoView {
    view! {
        <AdminGuard>
            <PoolManagerContent/>
        </AdminGuard>
    }
}

#[component]
fn PoolManagerContent() -> impl IntoView {
    let directory = use_pool_directory();
    let editor = RwSignal::new(Editor::Closed);
    let submitting = RwSignal::new(false);
    let form_error = RwSignal::new(Option::<String>::None);
    let pending_toggle = RwSignal::new(Option::<PoolId>::None);
    let notice = RwSignal::new(Option::<String>::None);

    let open_editor = move |next: Editor| {
        form_error.set(None);
        editor.set(next);
    };

    let on_submit = Callback::new(move |draft: PoolDraft| {
        let target = editor.get_untracked();
        submitting.set(true);
        spawn_local(async move {
            let result = match target {
                Editor::Editing(pool) => directory.update(pool.id, draft).await,
                _ => directory.create(draft).await,
            };
            match result {
                Ok(pool) => {
                    notice.set(Some(format!("Saved {}", pool.display_name())));
                    editor.set(Editor::Closed);
                }
                Err(message) => form_error.set(Some(message)),
            }
            submitting.set(false);
        });
    });

    let on_toggle = Callback::new(move |id: PoolId| {
        pending_toggle.set(Some(id));
        spawn_local(async move {
            if let Err(message) = directory.toggle_active(id).await {
                notice.set(Some(message));
            }
            pending_toggle.set(None);
        });
    });

    let export_csv = move |_| {
        let result = directory.pools.with_untracked(|pools| download_pools_csv(pools));
        if let Err(message) = result {
            leptos::logging::error!("CSV export failed: {}", message);
            notice.set(Some(format!("CSV export failed: {message}")));
        }
    };

    view! {
        <div class="pool-manager">
            <div class="pool-manager__header">
                <A href="/admin" attr:class="admin-back-button">"Back to dashboard"</A>
                <h1>"Manage pools"</h1>
                <div class="pool-manager__actions">
                    <Button appearance=ButtonAppearance::Secondary on_click=export_csv>
                        "Export CSV"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| open_editor(Editor::Creating)
                    >
                        "New pool"
                    </Button>
                </div>
            </div>

            {move || notice.get().map(|message| view! {
                <div class="pool-manager__notice" on:click=move |_| notice.set(None)>
                    {message}
                </div>
            })}

            {move || directory.error.get().map(|message| view! {
                <ErrorView
                    message=Some(message)
                    on_retry=Callback::new(move |_| directory.refresh())
                />
            })}

            {move || {
                let initial = match editor.get() {
                    Editor::Closed => return None,
                    Editor::Creating => None,
                    Editor::Editing(pool) => Some(pool),
                };
                Some(view! {
                    <PoolForm
                        initial=initial
                        on_submit=on_submit
                        on_cancel=Callback::new(move |_| editor.set(Editor::Closed))
                        submitting=submitting
                        error=form_error
                    />
                })
            }}

            <Show
                when=move || !(directory.loading.get() && directory.pools.with(Vec::is_empty))
                fallback=|| view! { <LoadingView message=None /> }
            >
                <PoolTable
                    pools=directory.pools
                    on_edit=Callback::new(move |pool: Pool| open_editor(Editor::Editing(pool)))
                    on_toggle=on_toggle
                    pending=pending_toggle
                />
            </Show>
        </div>
    }
}
