//! Aggregate dashboard page — queue, running, and recent activity across all
//! jobs, plus executor utilization and build statistics.

use leptos::prelude::*;

use crate::state::dashboard::DashboardState;
use crate::state::session::SessionState;
use crate::util::format::{format_date, format_duration, run_icon};
use crate::util::progress::{Progress, progress};

/// Dashboard page — subscribes to the aggregate topic for the lifetime of
/// the route.
#[component]
pub fn DashboardPage() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let state = RwSignal::new(DashboardState::default());
    let tick = RwSignal::new(0u64);

    #[cfg(feature = "hydrate")]
    {
        use std::rc::Rc;

        use crate::net::channel::{ApplyFn, Dispatch, ViewChannel};
        use crate::net::topic::Topic;
        use crate::state::dashboard::DashboardEvent;

        let apply: ApplyFn = Rc::new(move |_dispatch: Dispatch, envelope: &events::Envelope| {
            match DashboardEvent::parse(envelope) {
                Ok(event) => state.update(|s| s.apply(event)),
                Err(err) => leptos::logging::error!("dashboard view: {err}"),
            }
        });
        let channel = ViewChannel::open(Topic::dashboard(), session, apply);
        on_cleanup(move || channel.close());

        spawn_progress_ticker(tick, state);
    }

    let running_rows = move || {
        // Reading the ticker keeps progress bars moving between events.
        tick.track();
        let now = crate::util::local_now();
        let skew = session.get_untracked().clock_skew;
        state
            .get()
            .running
            .into_iter()
            .map(|job| {
                let started = job.started.unwrap_or(now);
                let bar = progress(now, skew, started, job.eta);
                (job, bar)
            })
            .collect::<Vec<_>>()
    };

    view! {
        <div class="dashboard-page">
            <section class="dashboard-page__utilization">
                <h2>"Executors"</h2>
                <p>
                    {move || state.get().executors_busy} " busy / "
                    {move || state.get().executors_idle()} " idle"
                </p>
            </section>

            <section class="dashboard-page__queued">
                <h2>"Queued"</h2>
                <ul>
                    {move || {
                        state
                            .get()
                            .queued
                            .into_iter()
                            .map(|job| {
                                view! {
                                    <li>
                                        {job.name.clone()} " #" {job.number}
                                        <span class="dashboard-page__reason">
                                            {job.reason.unwrap_or_default()}
                                        </span>
                                    </li>
                                }
                            })
                            .collect::<Vec<_>>()
                    }}
                </ul>
            </section>

            <section class="dashboard-page__running">
                <h2>"Running"</h2>
                <ul>
                    {move || {
                        running_rows()
                            .into_iter()
                            .map(|(job, bar)| {
                                let (width, overtime) = match bar {
                                    Progress::Percent(pct) => (pct, false),
                                    Progress::Overtime => (100.0, true),
                                    Progress::Unknown => (0.0, false),
                                };
                                let bar_class =
                                    if overtime { "progress progress--overtime" } else { "progress" };
                                view! {
                                    <li>
                                        <a href=format!("/jobs/{}/{}", job.name, job.number)>
                                            {job.name.clone()} " #" {job.number}
                                        </a>
                                        <div class=bar_class>
                                            <div
                                                class="progress__bar"
                                                style=format!("width: {width:.0}%")
                                            ></div>
                                        </div>
                                    </li>
                                }
                            })
                            .collect::<Vec<_>>()
                    }}
                </ul>
            </section>

            <section class="dashboard-page__recent">
                <h2>"Recent"</h2>
                <table>
                    <tbody>
                        {move || {
                            state
                                .get()
                                .recent
                                .into_iter()
                                .map(|job| {
                                    let (marker, class) = run_icon(job.result.as_deref());
                                    let when = job.completed.map(format_date).unwrap_or_default();
                                    let took = match (job.started, job.completed) {
                                        (Some(start), Some(end)) => format_duration(start, end),
                                        _ => String::new(),
                                    };
                                    view! {
                                        <tr>
                                            <td><span class=class>{marker}</span></td>
                                            <td>
                                                <a href=format!("/jobs/{}/{}", job.name, job.number)>
                                                    {job.name.clone()} " #" {job.number}
                                                </a>
                                            </td>
                                            <td>{when}</td>
                                            <td>{took}</td>
                                        </tr>
                                    }
                                })
                                .collect::<Vec<_>>()
                        }}
                    </tbody>
                </table>
            </section>

            <section class="dashboard-page__charts">
                <h2>"Last 7 days"</h2>
                <table class="dashboard-page__per-day">
                    <tbody>
                        <tr>
                            {move || {
                                state
                                    .get()
                                    .builds_per_day
                                    .into_iter()
                                    .map(|day| {
                                        view! {
                                            <td>
                                                <span class="tally tally--success">{day.success}</span>
                                                " / "
                                                <span class="tally tally--failed">{day.failed}</span>
                                            </td>
                                        }
                                    })
                                    .collect::<Vec<_>>()
                            }}
                        </tr>
                    </tbody>
                </table>

                <h2>"Runs per job"</h2>
                <ul>
                    {move || {
                        state
                            .get()
                            .builds_per_job_series()
                            .into_iter()
                            .map(|(name, count)| view! { <li>{name} ": " {count}</li> })
                            .collect::<Vec<_>>()
                    }}
                </ul>

                <h2>"Average runtime"</h2>
                <ul>
                    {move || {
                        state
                            .get()
                            .time_per_job_series()
                            .into_iter()
                            .map(|(name, seconds)| {
                                view! { <li>{name} ": " {format_duration(0, seconds)}</li> }
                            })
                            .collect::<Vec<_>>()
                    }}
                </ul>
            </section>
        </div>
    }
}

/// Re-render running rows once per second while any job is live.
#[cfg(feature = "hydrate")]
fn spawn_progress_ticker(tick: RwSignal<u64>, state: RwSignal<DashboardState>) {
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
