//! Sidebar shared by all three views: view navigation plus entity-type and
//! relation-type checkboxes. Type rows carry store-wide counts from the
//! `/entity-types` histogram.

use leptos::prelude::*;
use leptos_router::hooks::{use_location, use_navigate};
use leptos_router::NavigateOptions;

use crate::api::graph::get_entity_types;
use crate::api::types::{EntityTypeCount, EntityTypes};
use crate::query::{keys, use_query_client};
use crate::services::graph_view_state::use_graph_view_state;
use crate::viz::filtering::{distinct_entity_types, distinct_relation_types};

#[component]
pub fn GraphFilters() -> impl IntoView {
    let state = use_graph_view_state();
    let client = use_query_client();
    let location = use_location();
    let navigate = use_navigate();

    let type_counts = RwSignal::new(Vec::<EntityTypeCount>::new());
    Effect::new(move |_| {
        let _ = client.epoch();
        client.fetch(
            keys::entity_types(),
            keys::STALE_ENTITY_TYPES_MS,
            false,
            || get_entity_types(),
            move |result: Result<EntityTypes, _>| match result {
                Ok(types) => type_counts.set(types.entity_types),
                Err(err) => log::warn!("entity-types fetch failed: {err}"),
            },
        );
    });

    let entity_types = Memo::new(move |_| {
        state.snapshot.with(|snap| {
            snap.as_ref()
                .map(|data| distinct_entity_types(&data.nodes))
                .unwrap_or_default()
        })
    });
    let relation_types = Memo::new(move |_| {
        state.snapshot.with(|snap| {
            snap.as_ref()
                .map(|data| distinct_relation_types(&data.edges))
                .unwrap_or_default()
        })
    });

    let pathname = location.pathname;
    let is_active = move |view: &str| pathname.get().contains(view);
    let make_nav = move |path: &'static str| {
        let nav = navigate.clone();
        move |_| nav(path, NavigateOptions::default())
    };

    let nav_class = |active: bool| {
        if active {
            "px-3 py-1.5 text-sm rounded cursor-pointer bg-zinc-700 text-zinc-100"
        } else {
            "px-3 py-1.5 text-sm rounded cursor-pointer text-zinc-400 hover:bg-zinc-800"
        }
    };

    view! {
        <div class="w-56 shrink-0 h-full overflow-y-auto border-r border-zinc-800 bg-zinc-900 p-3 flex flex-col gap-4">
            <div class="flex flex-col gap-1">
                <div class=move || nav_class(is_active("tiles")) on:click=make_nav("/graph/tiles")>
                    "Tiles"
                </div>
                <div class=move || nav_class(is_active("/network") && !is_active("network3d")) on:click=make_nav("/graph/network")>
                    "Graph"
                </div>
                <div class=move || nav_class(is_active("network3d")) on:click=make_nav("/graph/network3d")>
                    "3D"
                </div>
            </div>

            <div>
                <h3 class="text-xs font-semibold uppercase text-zinc-500 mb-2">"Entity Types"</h3>
                <div class="flex flex-col gap-1">
                    <For
                        each=move || entity_types.get()
                        key=|entity_type| entity_type.clone()
                        children=move |entity_type: String| {
                            let toggle_type = entity_type.clone();
                            let checked_type = entity_type.clone();
                            let count_type = entity_type.clone();
                            let global_count = Memo::new(move |_| {
                                type_counts.with(|counts| {
                                    counts
                                        .iter()
                                        .find(|c| c.entity_type == count_type)
                                        .map(|c| c.count)
                                })
                            });
                            view! {
                                <label class="flex items-center gap-2 text-sm text-zinc-300 cursor-pointer">
                                    <input
                                        type="checkbox"
                                        prop:checked=move || {
                                            state.selected_entity_types.with(|set| set.contains(&checked_type))
                                        }
                                        on:change=move |_| state.toggle_entity_type(&toggle_type)
                                    />
                                    <span class="flex-1 truncate">{entity_type.clone()}</span>
                                    {move || global_count.get().map(|count| view! {
                                        <span class="text-xs text-zinc-500">{count}</span>
                                    })}
                                </label>
                            }
                        }
                    />
                </div>
            </div>

            <div>
                <h3 class="text-xs font-semibold uppercase text-zinc-500 mb-2">"Relations"</h3>
                <div class="flex flex-col gap-1">
                    <For
                        each=move || relation_types.get()
                        key=|relation_type| relation_type.clone()
                        children=move |relation_type: String| {
                            let toggle_type = relation_type.clone();
                            let checked_type = relation_type.clone();
                            view! {
                                <label class="flex items-center gap-2 text-sm text-zinc-300 cursor-pointer">
                                    <input
                                        type="checkbox"
                                        prop:checked=move || {
                                            state.selected_relation_types.with(|set| set.contains(&checked_type))
                                        }
                                        on:change=move |_| state.toggle_relation_type(&toggle_type)
                                    />
                                    <span class="flex-1 truncate">{relation_type.clone()}</span>
                                </label>
                            }
                        }
                    />
                </div>
            </div>
        </div>
    }
}
