//! Searchable, filterable grid of entity tiles, sorted by entity type.

use leptos::prelude::*;

use crate::components::graph_filters::GraphFilters;
use crate::services::graph_view_state::use_graph_view_state;
use crate::utils::formatting::format_confidence;
use crate::viz::filtering::filter_tiles;

#[derive(Clone, PartialEq)]
struct Tile {
    id: String,
    name: String,
    entity_type: String,
    confidence: f64,
}

#[component]
pub fn TilesView() -> impl IntoView {
    let state = use_graph_view_state();

    let tiles = Memo::new(move |_| {
        state.snapshot.with(|snap| {
            let Some(data) = snap.as_ref() else {
                return Vec::new();
            };
            let query = state.search_query.get();
            let selected = state.selected_entity_types.get();
            filter_tiles(&data.nodes, &query, &selected)
                .into_iter()
                .map(|entity| Tile {
                    id: entity.id.clone(),
                    name: entity.name.clone(),
                    entity_type: entity.entity_type.clone(),
                    confidence: entity.confidence,
                })
                .collect::<Vec<_>>()
        })
    });

    view! {
        <div class="h-full flex">
            <GraphFilters />

            <Show
                when=move || state.snapshot.with(|s| s.is_some())
                fallback=|| view! {
                    <div class="flex-1 flex items-center justify-center text-zinc-500">
                        <h2>"No data available"</h2>
                    </div>
                }
            >
                <div class="flex-1 overflow-y-auto p-4">
                    <div class="grid grid-cols-[repeat(auto-fill,minmax(180px,1fr))] gap-3">
                        <For
                            each=move || tiles.get()
                            key=|tile| tile.id.clone()
                            children=move |tile: Tile| {
                                let open_id = tile.id.clone();
                                view! {
                                    <div
                                        class="p-3 rounded-lg bg-zinc-900 border border-zinc-800 hover:border-zinc-600 cursor-pointer flex flex-col gap-1"
                                        data-type=tile.entity_type.clone()
                                        on:click=move |_| state.open_entity(&open_id)
                                    >
                                        <strong class="text-sm text-zinc-100 truncate">{tile.name.clone()}</strong>
                                        <div class="flex items-center justify-between text-xs text-zinc-500">
                                            <span>{tile.entity_type.clone()}</span>
                                            <span>{format_confidence(tile.confidence)}</span>
                                        </div>
                                    </div>
                                }
                            }
                        />
                    </div>
                </div>
            </Show>
        </div>
    }
}
