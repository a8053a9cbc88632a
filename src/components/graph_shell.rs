//! Root layout for the graph explorer. Owns the snapshot and stats fetches,
//! provides the shared view state, and renders the toolbar, the routed view,
//! and the entity drawer.

use leptos::prelude::*;
use leptos_router::components::Outlet;

use crate::api::graph::{get_graph_data, get_stats};
use crate::api::types::{GraphData, Stats};
use crate::components::entity_drawer::EntityDrawer;
use crate::query::{keys, use_query_client};
use crate::services::graph_view_state::provide_graph_view_state;

/// Snapshot caps requested from the backend. The server truncates and says so
/// in `truncated`; the toolbar surfaces that.
pub const SNAPSHOT_MAX_NODES: u32 = 300;
pub const SNAPSHOT_MAX_EDGES: u32 = 500;

/// What the shell renders. Before any snapshot exists a failure replaces the
/// whole view; once data is on screen a refetch failure only raises a
/// dismissible banner over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShellPhase {
    Loading,
    Failed,
    Ready { error_banner: bool },
}

fn shell_phase(has_snapshot: bool, has_error: bool) -> ShellPhase {
    if has_snapshot {
        ShellPhase::Ready {
            error_banner: has_error,
        }
    } else if has_error {
        ShellPhase::Failed
    } else {
        ShellPhase::Loading
    }
}

#[component]
pub fn GraphShell() -> impl IntoView {
    let state = provide_graph_view_state();
    let client = use_query_client();

    // Snapshot fetch. Re-runs when the refetch tick or the cache epoch moves;
    // an explicit refetch bypasses the staleness window, an epoch bump does
    // not (the invalidated entry is no longer fresh, so it refetches anyway).
    Effect::new(move |prev_tick: Option<u64>| {
        let tick = state.refetch_tick.get();
        let _ = client.epoch();
        let force = prev_tick.is_some_and(|prev| prev != tick);

        state.loading.set(true);
        state.error.set(None);
        client.fetch(
            keys::graph_snapshot(),
            keys::STALE_GRAPH_MS,
            force,
            || get_graph_data(SNAPSHOT_MAX_NODES, SNAPSHOT_MAX_EDGES, None),
            move |result: Result<GraphData, _>| {
                match result {
                    Ok(data) => state.snapshot.set(Some(data)),
                    Err(err) => state.error.set(Some(err.to_string())),
                }
                state.loading.set(false);
            },
        );
        tick
    });

    // Stats are decorative; failures only log.
    Effect::new(move |_| {
        let _ = client.epoch();
        client.fetch(
            keys::graph_stats(),
            keys::STALE_STATS_MS,
            false,
            || get_stats(),
            move |result: Result<Stats, _>| match result {
                Ok(stats) => state.stats.set(Some(stats)),
                Err(err) => log::warn!("stats fetch failed: {err}"),
            },
        );
    });

    let node_count = move || {
        state
            .snapshot
            .with(|snap| snap.as_ref().map(|d| d.nodes.len()).unwrap_or(0))
    };
    let edge_count = move || {
        state
            .snapshot
            .with(|snap| snap.as_ref().map(|d| d.edges.len()).unwrap_or(0))
    };
    let truncated = move || {
        state.snapshot.with(|snap| {
            snap.as_ref()
                .map(|d| d.truncated.nodes || d.truncated.edges)
                .unwrap_or(false)
        })
    };

    let phase = move || {
        shell_phase(
            state.snapshot.with(|s| s.is_some()),
            state.error.with(|e| e.is_some()),
        )
    };

    view! {
        <div class="h-screen w-full flex flex-col bg-zinc-950 text-zinc-100">
            <Show when=move || phase() == ShellPhase::Loading>
                <div class="flex-1 flex items-center justify-center">
                    <div class="text-zinc-400 flex items-center gap-2">
                        <svg class="animate-spin h-5 w-5" viewBox="0 0 24 24">
                            <circle class="opacity-25" cx="12" cy="12" r="10" stroke="currentColor" stroke-width="4" fill="none" />
                            <path class="opacity-75" fill="currentColor" d="M4 12a8 8 0 018-8V0C5.373 0 0 5.373 0 12h4zm2 5.291A7.962 7.962 0 014 12H0c0 3.042 1.135 5.824 3 7.938l3-2.647z" />
                        </svg>
                        "Loading graph..."
                    </div>
                </div>
            </Show>

            <Show when=move || phase() == ShellPhase::Failed>
                <div class="flex-1 flex items-center justify-center">
                    <div class="bg-red-900/50 text-red-300 px-6 py-4 rounded-lg text-center">
                        <h2 class="text-lg font-semibold mb-2">"Error loading graph"</h2>
                        <p class="mb-4">{move || state.error.get().unwrap_or_default()}</p>
                        <button
                            class="px-4 py-2 bg-red-800 hover:bg-red-700 rounded text-red-100"
                            on:click=move |_| state.refetch()
                        >
                            "Try Again"
                        </button>
                    </div>
                </div>
            </Show>

            <Show when=move || matches!(phase(), ShellPhase::Ready { .. })>
                <Show when=move || matches!(phase(), ShellPhase::Ready { error_banner: true })>
                    <div class="flex items-center justify-between px-4 py-2 bg-red-900/50 text-red-300 text-sm">
                        <span>{move || state.error.get().unwrap_or_default()}</span>
                        <div class="flex items-center gap-2">
                            <button
                                class="px-2 py-0.5 bg-red-800 hover:bg-red-700 rounded text-red-100"
                                on:click=move |_| state.refetch()
                            >
                                "Retry"
                            </button>
                            <button
                                class="px-2 text-red-300 hover:text-red-100"
                                on:click=move |_| state.error.set(None)
                            >
                                "✕"
                            </button>
                        </div>
                    </div>
                </Show>

                <div class="flex items-center justify-between px-4 py-2 border-b border-zinc-800 bg-zinc-900">
                    <div class="flex items-center gap-3">
                        <h1 class="text-lg font-semibold">"Knowledge Graph"</h1>
                        <button
                            class="px-3 py-1 text-sm bg-zinc-800 hover:bg-zinc-700 rounded"
                            on:click=move |_| state.refetch()
                        >
                            "Refresh"
                        </button>
                    </div>

                    <div class="flex-1 max-w-md mx-4">
                        <input
                            type="text"
                            placeholder="Search entities..."
                            class="w-full px-3 py-1.5 bg-zinc-800 border border-zinc-700 rounded text-sm focus:outline-none focus:border-zinc-500"
                            prop:value=move || state.search_query.get()
                            on:input=move |ev| state.search_query.set(event_target_value(&ev))
                        />
                    </div>

                    <div class="flex items-center gap-3 text-sm text-zinc-400">
                        <span>{move || format!("{} entities", node_count())}</span>
                        <span>{move || format!("{} relations", edge_count())}</span>
                        <Show when=truncated>
                            <span class="text-amber-400" title="The server truncated this snapshot">
                                "truncated"
                            </span>
                        </Show>
                        {move || state.stats.get().map(|stats| view! {
                            <span title="Entities in the whole store">
                                {format!("{} total", stats.entities)}
                            </span>
                        })}
                    </div>
                </div>

                <div class="flex-1 min-h-0">
                    <Outlet />
                </div>
            </Show>

            <EntityDrawer />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_load_shows_the_spinner() {
        assert_eq!(shell_phase(false, false), ShellPhase::Loading);
    }

    #[test]
    fn failed_first_load_replaces_the_view() {
        assert_eq!(shell_phase(false, true), ShellPhase::Failed);
    }

    #[test]
    fn refetch_failure_keeps_the_data_and_raises_the_banner() {
        assert_eq!(
            shell_phase(true, true),
            ShellPhase::Ready { error_banner: true }
        );
        assert_eq!(
            shell_phase(true, false),
            ShellPhase::Ready { error_banner: false }
        );
    }
}
