//! Job-list page — every configured job with tag and name filtering.

use leptos::prelude::*;

use crate::state::jobs::JobsState;
use crate::state::session::SessionState;
use crate::util::format::{format_date, run_icon};

/// Job-list page — subscribes to the job-list topic for the lifetime of the
/// route.
#[component]
pub fn JobsPage() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let state = RwSignal::new(JobsState::default());

    #[cfg(feature = "hydrate")]
    {
        use std::rc::Rc;

        use crate::net::channel::{ApplyFn, Dispatch, ViewChannel};
        use crate::net::topic::Topic;
        use crate::state::jobs::JobsEvent;

        let apply: ApplyFn = Rc::new(move |_dispatch: Dispatch, envelope: &events::Envelope| {
            match JobsEvent::parse(envelope) {
                Ok(event) => state.update(|s| s.apply(event)),
                Err(err) => leptos::logging::error!("job-list view: {err}"),
            }
        });
        let channel = ViewChannel::open(Topic::jobs(), session, apply);
        on_cleanup(move || channel.close());
    }

    #[cfg(not(feature = "hydrate"))]
    let _ = session;

    view! {
        <div class="jobs-page">
            <div class="jobs-page__filters">
                <input
                    class="jobs-page__search"
                    type="text"
                    placeholder="Filter by name"
                    prop:value=move || state.get().search
                    on:input=move |ev| {
                        state.update(|s| s.search = event_target_value(&ev));
                    }
                />
                <select
                    class="jobs-page__tag"
                    on:change=move |ev| {
                        let value = event_target_value(&ev);
                        state.update(|s| {
                            s.tag = if value.is_empty() { None } else { Some(value) };
                        });
                    }
                >
                    <option value="">"All tags"</option>
                    {move || {
                        state
                            .get()
                            .tags
                            .into_iter()
                            .map(|tag| view! { <option value=tag.clone()>{tag.clone()}</option> })
                            .collect::<Vec<_>>()
                    }}
                </select>
            </div>

            <table class="jobs-page__table">
                <thead>
                    <tr>
                        <th></th>
                        <th>"Job"</th>
                        <th>"Last run"</th>
                    </tr>
                </thead>
                <tbody>
                    {move || {
                        let snapshot = state.get();
                        snapshot
                            .filtered_jobs()
                            .into_iter()
                            .map(|job| {
                                let (marker, class) = run_icon(job.result.as_deref());
                                let last = job
                                    .completed
                                    .map(format_date)
                                    .unwrap_or_else(|| "in progress".to_owned());
                                let name = job.name.clone();
                                view! {
                                    <tr>
                                        <td><span class=class>{marker}</span></td>
                                        <td>
                                            <a href=format!("/jobs/{name}")>{name.clone()}</a>
                                            <span class="jobs-page__row-tags">
                                                {job.tags.join(", ")}
                                            </span>
                                        </td>
                                        <td>{last}</td>
                                    </tr>
                                }
                            })
                            .collect::<Vec<_>>()
                    }}
                </tbody>
            </table>
        </div>
    }
}
