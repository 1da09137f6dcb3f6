use std::f64::consts::PI;

use leptos::prelude::*;
use shared_types::HealthBreakdown;

const RADIUS: f64 = 60.0;
const HEALTHY_COLOR: &str = "#28a745";
const UNHEALTHY_COLOR: &str = "#dc3545";

/// Donut of healthy against unhealthy pools.
#[component]
pub fn HealthPieChart(#[prop(into)] breakdown: Signal<HealthBreakdown>) -> impl IntoView {
    let circumference = 2.0 * PI * RADIUS;
    let healthy_dash = move || {
        let breakdown = breakdown.get();
        let share = if breakdown.total() == 0 {
            0.0
        } else {
            breakdown.healthy as f64 / breakdown.total() as f64
        };
        format!("{:.2} {:.2}", share * circumference, circumference)
    };

    view! {
        <div class="chart-card">
            <h3 class="chart-card__title">"Health status"</h3>
            <Show
                when=move || breakdown.with(|b| b.total() > 0)
                fallback=|| view! { <p class="chart-card__empty">"No pools registered."</p> }
            >
                <svg class="health-pie" viewBox="0 0 160 160" width="160" height="160">
                    <circle cx="80" cy="80" r=RADIUS.to_string() fill="none" stroke=UNHEALTHY_COLOR stroke-width="24" />
                    <circle
                        cx="80"
                        cy="80"
                        r=RADIUS.to_string()
                        fill="none"
                        stroke=HEALTHY_COLOR
                        stroke-width="24"
                        stroke-dasharray=healthy_dash
                        transform="rotate(-90 80 80)"
                    />
                </svg>
                <ul class="health-pie__legend">
                    <li>
                        <span class="legend-swatch" style=format!("background: {HEALTHY_COLOR}")></span>
                        {move || {
                            let b = breakdown.get();
                            format!("Healthy: {} ({}%)", b.healthy, b.healthy_percentage)
                        }}
                    </li>
                    <li>
                        <span class="legend-swatch" style=format!("background: {UNHEALTHY_COLOR}")></span>
                        {move || {
                            let b = breakdown.get();
                            format!("Unhealthy: {} ({}%)", b.unhealthy, b.unhealthy_percentage)
                        }}
                    </li>
                </ul>
            </Show>
        </div>
    }
}
