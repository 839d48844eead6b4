//! Root application component with routing and shared state contexts.

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    ParamSegment, StaticSegment,
    components::{Route, Router, Routes},
};

use crate::pages::{dashboard::DashboardPage, job::JobPage, jobs::JobsPage, run::RunPage};
use crate::state::session::SessionState;

/// Root application component.
///
/// Provides the session context and sets up client-side routing; one route
/// per push topic.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let session = RwSignal::new(SessionState::default());
    provide_context(session);

    let title = move || {
        let title = session.get().title;
        if title.is_empty() { "Forgeboard".to_owned() } else { title }
    };

    view! {
        <Title text=title/>

        <Router>
            <header class="app-header">
                <nav>
                    <a href="/">"Dashboard"</a>
                    <a href="/jobs">"Jobs"</a>
                </nav>
                <Show when=move || !session.get().connected>
                    <div class="app-header__disconnected">
                        "Disconnected — attempting to reconnect"
                    </div>
                </Show>
            </header>

            <main>
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=StaticSegment("") view=DashboardPage/>
                    <Route path=StaticSegment("jobs") view=JobsPage/>
                    <Route path=(StaticSegment("jobs"), ParamSegment("name")) view=JobPage/>
                    <Route
                        path=(StaticSegment("jobs"), ParamSegment("name"), ParamSegment("number"))
                        view=RunPage
                    />
                </Routes>
            </main>
        </Router>
    }
}
