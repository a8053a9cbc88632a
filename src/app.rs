use leptos::prelude::*;
use leptos_router::components::*;
use leptos_router::path;

use crate::components::graph_shell::GraphShell;
use crate::components::network3d_view::Network3DView;
use crate::components::network_view::NetworkView;
use crate::components::tiles_view::TilesView;
use crate::query::provide_query_client;

#[component]
pub fn App() -> impl IntoView {
    // Provide global services
    provide_query_client();

    view! {
        <Router>
            <Routes fallback=|| view! { <div class="p-8 text-center">"404 - Page Not Found"</div> }>
                <Route path=path!("/") view=|| view! { <Redirect path="/graph" /> } />
                <ParentRoute path=path!("/graph") view=GraphShell>
                    <Route path=path!("") view=|| view! { <Redirect path="tiles" /> } />
                    <Route path=path!("tiles") view=TilesView />
                    <Route path=path!("network") view=NetworkView />
                    <Route path=path!("network3d") view=Network3DView />
                </ParentRoute>
            </Routes>
        </Router>
    }
}
