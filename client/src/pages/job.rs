//! Single-job page — the job's run table with server-side sort/pagination.
//!
//! ARCHITECTURE
//! ============
//! This page is the one place the client talks back on a state channel: sort
//! and pagination controls mutate the local sort spec and send it upstream,
//! and the server answers with a refresh snapshot on the same channel — which
//! the dispatch layer routes to the bound view as an ordinary update.

use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

use crate::net::channel::ChannelSender;
use crate::state::job::JobState;
use crate::state::session::SessionState;
use crate::util::format::{format_date, format_duration, run_icon};

/// Single-job page. Navigating between jobs re-uses this component in
/// place, so the channel follows the route parameter.
#[component]
pub fn JobPage() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let state = RwSignal::new(JobState::default());
    let sender = RwSignal::new(ChannelSender::default());
    let params = use_params_map();
    let job_name = move || params.read().get("name").unwrap_or_default();

    #[cfg(feature = "hydrate")]
    {
        use std::cell::RefCell;
        use std::rc::Rc;

        use crate::net::channel::{ApplyFn, Dispatch, ViewChannel};
        use crate::net::topic::Topic;
        use crate::state::job::JobEvent;

        let live = Rc::new(RefCell::new(None::<ViewChannel>));
        let last_topic = RwSignal::new(None::<Topic>);

        let live_route = live.clone();
        Effect::new(move || {
            let topic = Topic::job(&job_name());
            if last_topic.get_untracked().as_ref() == Some(&topic) {
                return;
            }

            // In-place navigation to a different job: the old channel (and
            // any pending reconnect) must be gone before the new one opens.
            if let Some(previous) = live_route.borrow_mut().take() {
                previous.close();
            }
            state.set(JobState::default());
            last_topic.set(Some(topic.clone()));

            let apply: ApplyFn = Rc::new(move |_dispatch: Dispatch, envelope: &events::Envelope| {
                match JobEvent::parse(envelope) {
                    Ok(event) => state.update(|s| s.apply(event)),
                    Err(err) => leptos::logging::error!("job view: {err}"),
                }
            });
            let channel = ViewChannel::open(topic, session, apply);
            sender.set(channel.sender());
            *live_route.borrow_mut() = Some(channel);
        });

        let live_cleanup = live.clone();
        on_cleanup(move || {
            if let Some(channel) = live_cleanup.borrow_mut().take() {
                channel.close();
            }
        });
    }

    #[cfg(not(feature = "hydrate"))]
    let _ = session;

    let request_sort = move |field: &'static str| {
        state.update(|s| {
            let spec = s.do_sort(field);
            sender.get_untracked().send(events::encode_sort(&spec));
        });
    };
    let page_next = move |_| {
        state.update(|s| {
            let spec = s.page_next();
            sender.get_untracked().send(events::encode_sort(&spec));
        });
    };
    let page_prev = move |_| {
        state.update(|s| {
            let spec = s.page_prev();
            sender.get_untracked().send(events::encode_sort(&spec));
        });
    };

    view! {
        <div class="job-page">
            <header class="job-page__header">
                <h2>{job_name}</h2>
                <p>
                    {move || state.get().queued_count} " queued, "
                    {move || state.get().running.len()} " running"
                </p>
            </header>

            <section class="job-page__last">
                {move || {
                    state
                        .get()
                        .last_success
                        .map(|run| {
                            view! {
                                <p>
                                    "Last success: #" {run.number} " "
                                    {run.completed.map(format_date).unwrap_or_default()}
                                </p>
                            }
                        })
                }}
                {move || {
                    state
                        .get()
                        .last_failed
                        .map(|run| {
                            view! {
                                <p>
                                    "Last failure: #" {run.number} " "
                                    {run.completed.map(format_date).unwrap_or_default()}
                                </p>
                            }
                        })
                }}
            </section>

            <table class="job-page__runs">
                <thead>
                    <tr>
                        <th on:click=move |_| request_sort("result")>"Result"</th>
                        <th on:click=move |_| request_sort("number")>"Run"</th>
                        <th on:click=move |_| request_sort("started")>"Started"</th>
                        <th on:click=move |_| request_sort("duration")>"Duration"</th>
                    </tr>
                </thead>
                <tbody>
                    {move || {
                        let snapshot = state.get();
                        let name = job_name();
                        snapshot
                            .running
                            .iter()
                            .chain(snapshot.recent.iter())
                            .map(|run| {
                                let (marker, class) = run_icon(run.result.as_deref());
                                let started = run.started.map(format_date).unwrap_or_default();
                                let took = match (run.started, run.completed) {
                                    (Some(start), Some(end)) => format_duration(start, end),
                                    _ => "running".to_owned(),
                                };
                                view! {
                                    <tr>
                                        <td><span class=class>{marker}</span></td>
                                        <td>
                                            <a href=format!("/jobs/{name}/{}", run.number)>
                                                "#" {run.number}
                                            </a>
                                        </td>
                                        <td>{started}</td>
                                        <td>{took}</td>
                                    </tr>
                                }
                            })
                            .collect::<Vec<_>>()
                    }}
                </tbody>
            </table>

            <nav class="job-page__pager">
                <button
                    on:click=page_prev
                    disabled=move || state.get().sort.page <= 1
                >
                    "Newer"
                </button>
                <span>
                    "page " {move || state.get().sort.page} " of "
                    {move || state.get().page_count}
                </span>
                <button
                    on:click=page_next
                    disabled=move || {
                        let s = state.get();
                        s.sort.page >= s.page_count
                    }
                >
                    "Older"
                </button>
            </nav>
        </div>
    }
}
