use leptos::prelude::*;
use leptos_router::components::A;

use crate::components::{
    error::ErrorView, loading::LoadingView, AdminGuard, HealthPieChart, RatingBarChart, StatCard,
};
use crate::store::use_pool_directory;

#[component]
pub fn AdminDashboard() -> impl IntoView {
    view! {
        <AdminGuard>
            <DashboardContent/>
        </AdminGuard>
    }
}

#[component]
fn DashboardContent() -> impl IntoView {
    let directory = use_pool_directory();
    let stats = directory.stats;

    view! {
        <div class="admin-dashboard">
            <div class="admin-dashboard-header">
                <h1>"Pool dashboard"</h1>
                <p>"Health and rating overview of every registered pool"</p>
                <A href="/admin/pools" attr:class="admin-dashboard-link">"Manage pools"</A>
            </div>

            {move || directory.error.get().map(|message| view! {
                <ErrorView
                    message=Some(message)
                    on_retry=Callback::new(move |_| directory.refresh())
                />
            })}

            <Show
                when=move || !(directory.loading.get() && directory.pools.with(Vec::is_empty))
                fallback=|| view! { <LoadingView message=Some("Loading statistics...".to_string()) /> }
            >
                <div class="admin-dashboard-grid">
                    <StatCard
                        title="Total pools"
                        value=Signal::derive(move || stats.get().total_pools.to_string())
                        caption=Signal::derive(move || format!("{} districts", stats.get().total_districts))
                    />
                    <StatCard
                        title="Healthy"
                        value=Signal::derive(move || stats.get().healthy_pools.to_string())
                        caption=Signal::derive(move || format!("{}% of all pools", stats.get().health_percentage()))
                        accent="stat-card--green"
                    />
                    <StatCard
                        title="Unhealthy"
                        value=Signal::derive(move || stats.get().unhealthy_pools.to_string())
                        accent="stat-card--red"
                    />
                    <StatCard
                        title="Active"
                        value=Signal::derive(move || stats.get().active_pools.to_string())
                        caption=Signal::derive(move || format!("{}% of all pools", stats.get().active_percentage()))
                        accent="stat-card--teal"
                    />
                    <StatCard
                        title="Average rating"
                        value=Signal::derive(move || format!("{:.1}", stats.get().average_rating))
                        caption=Signal::derive(|| "Inactive pools count half".to_string())
                        accent="stat-card--amber"
                    />
                </div>

                <div class="admin-dashboard-charts">
                    <HealthPieChart breakdown=directory.health />
                    <RatingBarChart ratings=directory.district_ratings />
                </div>
            </Show>
        </div>
    }
}
