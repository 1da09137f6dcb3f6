use leptos::prelude::*;
use leptos_meta::{provide_meta_context, MetaTags, Stylesheet, Title};
use leptos_router::{
    components::{Route, Router, Routes},
    path, StaticSegment,
};
use thaw::ssr::SSRMountStyleProvider;
use thaw::*;

use crate::components::Navbar;
use crate::utils::auth::provide_auth_session;
use crate::views::{
    admin_dashboard::AdminDashboard,
    auth::{LoginPage, SignupPage},
    home::HomePage,
    not_found::NotFoundPage,
    pool_detail::PoolDetailPage,
    pool_list::PoolListPage,
    pool_manager::PoolManager,
};

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <SSRMountStyleProvider>
            <!DOCTYPE html>
            <html lang="en">
                <head>
                    <meta charset="utf-8"/>
                    <meta name="viewport" content="width=device-width, initial-scale=1"/>
                    <AutoReload options=options.clone() />
                    <HydrationScripts options/>
                    <MetaTags/>
                </head>
                <link
                    rel="stylesheet"
                    href="https://unpkg.com/leaflet@1.9.3/dist/leaflet.css"
                />
                <script
                    src="https://unpkg.com/leaflet@1.9.3/dist/leaflet.js"
                    defer
                ></script>
                <body>
                    <App/>
                </body>
            </html>
        </SSRMountStyleProvider>
    }
}

#[component]
pub fn App() -> impl IntoView {
    // Provides context that manages stylesheets, titles, meta tags, etc.
    provide_meta_context();
    provide_auth_session();

    view! {
        // id=leptos means cargo-leptos will hot-reload this stylesheet
        <Stylesheet id="leptos" href="/pkg/web.css"/>

        <Title text="Piscinas Arequipa"/>

        <ConfigProvider>
            <Router>
                <Navbar/>
                <main>
                    <Routes fallback=|| view! { <NotFoundPage/> }>
                        <Route path=StaticSegment("") view=HomePage/>
                        <Route path=StaticSegment("pools") view=PoolListPage/>
                        <Route path=path!("/pools/:id") view=PoolDetailPage/>
                        <Route path=StaticSegment("login") view=LoginPage/>
                        <Route path=StaticSegment("signup") view=SignupPage/>
                        <Route path=StaticSegment("admin") view=AdminDashboard/>
                        <Route path=path!("/admin/pools") view=PoolManager/>
                    </Routes>
                </main>
            </Router>
        </ConfigProvider>
    }
}
