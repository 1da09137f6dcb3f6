use leptos::prelude::*;
use shared_types::{Pool, PoolId};

#[component]
pub fn PoolTable(
    #[prop(into)] pools: Signal<Vec<Pool>>,
    on_edit: Callback<Pool>,
    on_toggle: Callback<PoolId>,
    /// Pool whose activity toggle is in flight, if any.
    #[prop(into)]
    pending: Signal<Option<PoolId>>,
) -> impl IntoView {
    view! {
        <table class="pool-table">
            <thead>
                <tr>
                    <th>"ID"</th>
                    <th>"Commercial name"</th>
                    <th>"District"</th>
                    <th>"Rating"</th>
                    <th>"State"</th>
                    <th>"Active"</th>
                    <th></th>
                </tr>
            </thead>
            <tbody>
                // The collection is replaced whole on every refetch, so rows are too.
                {move || pools.get().into_iter().map(move |pool: Pool| {
                        let id = pool.id;
                        let is_active = pool.is_active;
                        let state_class = if pool.is_healthy() {
                            "pool-table__state pool-table__state--healthy"
                        } else {
                            "pool-table__state pool-table__state--unhealthy"
                        };
                        let row = pool.clone();
                        view! {
                            <tr class:pool-table__row--inactive=!is_active>
                                <td>{id.to_string()}</td>
                                <td>{pool.display_name().to_string()}</td>
                                <td>{pool.district.clone()}</td>
                                <td>
                                    {pool
                                        .rating
                                        .map(|rating| format!("{rating:.1}"))
                                        .unwrap_or_else(|| "-".to_string())}
                                </td>
                                <td><span class=state_class>{pool.current_state.label()}</span></td>
                                <td>
                                    <button
                                        class="pool-table__toggle"
                                        disabled=move || pending.get() == Some(id)
                                        on:click=move |_| on_toggle.run(id)
                                    >
                                        {if is_active { "Deactivate" } else { "Activate" }}
                                    </button>
                                </td>
                                <td>
                                    <button
                                        class="pool-table__edit"
                                        on:click=move |_| on_edit.run(row.clone())
                                    >
                                        "Edit"
                                    </button>
                                </td>
                            </tr>
                        }
                    }).collect_view()
                }
            </tbody>
        </table>
    }
}
