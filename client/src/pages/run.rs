//! Single-run page — one run's detail, artifacts, and live log.
//!
//! SYSTEM CONTEXT
//! ==============
//! Two independent channels serve this page: the state channel for the run's
//! detail and a log channel for raw output text. They share a navigation
//! lifecycle but nothing else — log fragments may interleave arbitrarily
//! with state events and neither side waits for the other.

use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

use crate::state::run::RunState;
use crate::state::session::SessionState;
use crate::util::format::{format_date, format_duration, iec_file_size, run_icon};
use crate::util::progress::{Progress, progress};

/// Single-run page. Navigating between runs re-uses this component in
/// place, so both channels follow the route parameters.
#[component]
pub fn RunPage() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let state = RwSignal::new(RunState::default());
    let tick = RwSignal::new(0u64);
    let params = use_params_map();
    let job_name = move || params.read().get("name").unwrap_or_default();
    let run_number = move || {
        params
            .read()
            .get("number")
            .and_then(|n| n.parse::<i64>().ok())
            .unwrap_or(0)
    };

    #[cfg(feature = "hydrate")]
    {
        use std::cell::RefCell;
        use std::rc::Rc;

        use crate::net::channel::{ApplyFn, Dispatch, LogChannel, ViewChannel};
        use crate::net::topic::Topic;
        use crate::state::run::RunEvent;

        let live = Rc::new(RefCell::new(None::<(ViewChannel, LogChannel)>));
        let last_topic = RwSignal::new(None::<Topic>);

        let live_route = live.clone();
        Effect::new(move || {
            let topic = Topic::run(&job_name(), run_number());
            if last_topic.get_untracked().as_ref() == Some(&topic) {
                return;
            }

            // Both channels tear down before the next pair opens.
            if let Some((previous, previous_log)) = live_route.borrow_mut().take() {
                previous.close();
                previous_log.close();
            }
            state.set(RunState::default());
            last_topic.set(Some(topic.clone()));

            let apply: ApplyFn = Rc::new(move |_dispatch: Dispatch, envelope: &events::Envelope| {
                match RunEvent::parse(envelope) {
                    Ok(event) => state.update(|s| s.apply(event)),
                    Err(err) => leptos::logging::error!("run view: {err}"),
                }
            });
            let channel = ViewChannel::open(topic.clone(), session, apply);

            // The log buffer starts empty exactly at (re)open.
            state.update(RunState::reset_log);
            let log_channel = LogChannel::open(
                topic.log(),
                Rc::new(move |chunk: &str| state.update(|s| s.append_log(chunk))),
            );

            *live_route.borrow_mut() = Some((channel, log_channel));
        });

        let live_cleanup = live.clone();
        on_cleanup(move || {
            if let Some((channel, log_channel)) = live_cleanup.borrow_mut().take() {
                channel.close();
                log_channel.close();
            }
        });

        spawn_progress_ticker(tick, state);
    }

    let progress_bar = move || {
        tick.track();
        let snapshot = state.get();
        let run = snapshot.running.first()?;
        let now = crate::util::local_now();
        let skew = session.get_untracked().clock_skew;
        match progress(now, skew, run.started.unwrap_or(now), run.eta) {
            Progress::Percent(pct) => Some((pct, false)),
            Progress::Overtime => Some((100.0, true)),
            Progress::Unknown => None,
        }
    };

    view! {
        <div class="run-page">
            <header class="run-page__header">
                <h2>
                    {move || {
                        let snapshot = state.get();
                        let (marker, class) = snapshot
                            .run
                            .as_ref()
                            .map(|run| run_icon(run.result.as_deref()))
                            .unwrap_or_else(|| run_icon(None));
                        view! {
                            <span class=class>{marker}</span>
                            " " {job_name()} " #" {run_number()}
                        }
                    }}
                </h2>
                <Show when=move || state.get().newer_run_available()>
                    <a
                        class="run-page__newer"
                        href=move || format!("/jobs/{}/{}", job_name(), state.get().latest_run_number)
                    >
                        "A newer run is available"
                    </a>
                </Show>
            </header>

            <section class="run-page__detail">
                {move || {
                    state
                        .get()
                        .run
                        .map(|run| {
                            let queued = run.queued_for.map(|secs| format!("{secs}s in queue"));
                            let started = run.started.map(format_date).unwrap_or_default();
                            let took = match (run.started, run.completed) {
                                (Some(start), Some(end)) => format_duration(start, end),
                                _ => "running".to_owned(),
                            };
                            view! {
                                <dl>
                                    <dt>"Started"</dt>
                                    <dd>{started}</dd>
                                    <dt>"Duration"</dt>
                                    <dd>{took}</dd>
                                    <dt>"Reason"</dt>
                                    <dd>{run.reason.unwrap_or_default()}</dd>
                                    <dt>"Queued"</dt>
                                    <dd>{queued.unwrap_or_default()}</dd>
                                </dl>
                            }
                        })
                }}
                {move || {
                    progress_bar()
                        .map(|(width, overtime)| {
                            let bar_class =
                                if overtime { "progress progress--overtime" } else { "progress" };
                            view! {
                                <div class=bar_class>
                                    <div
                                        class="progress__bar"
                                        style=format!("width: {width:.0}%")
                                    ></div>
                                </div>
                            }
                        })
                }}
            </section>

            <section class="run-page__artifacts">
                <h3>"Artifacts"</h3>
                <ul>
                    {move || {
                        state
                            .get()
                            .run
                            .map(|run| run.artifacts)
                            .unwrap_or_default()
                            .into_iter()
                            .map(|artifact| {
                                view! {
                                    <li>
                                        <a href=artifact.url.clone()>{artifact.filename.clone()}</a>
                                        " (" {iec_file_size(artifact.size)} ")"
                                    </li>
                                }
                            })
                            .collect::<Vec<_>>()
                    }}
                </ul>
            </section>

            <section class="run-page__log">
                <h3>"Log"</h3>
                <pre>{move || state.get().log}</pre>
            </section>
        </div>
    }
}

/// Re-render the progress bar once per second while the run executes.
#[cfg(feature = "hydrate")]
fn spawn_progress_ticker(tick: RwSignal<u64>, state: RwSignal<RunState>) {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    let alive = Arc::new(AtomicBool::new(true));
    let alive_task = alive.clone();
    leptos::task::spawn_local(async move {
        loop {
            gloo_timers::future::sleep(std::time::Duration::from_secs(1)).await;
            if !alive_task.load(Ordering::Relaxed) {
                break;
            }
            if state.get_untracked().running.is_empty() {
                continue;
            }
            tick.update(|t| *t += 1);
        }
    });
    on_cleanup(move || alive.store(false, Ordering::Relaxed));
}
