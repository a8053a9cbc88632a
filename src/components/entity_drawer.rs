//! Overlay drawer showing full detail for the selected entity, with inline
//! description editing and deletion.
//!
//! Opening is driven entirely by the shared `selected_entity` signal; any
//! view can open the drawer by setting it. Responses arriving after the
//! selection moved on are discarded.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::entities::{delete_entity, get_entity, update_entity};
use crate::api::types::{EntityDetails, EntityPatch, Relationship};
use crate::query::{keys, use_query_client};
use crate::services::graph_view_state::use_graph_view_state;
use crate::utils::formatting::format_timestamp;

/// What the drawer does when its inputs change: deselecting closes it, a new
/// id restarts from the loading state, and a re-run for the same id (cache
/// invalidation) refetches behind the payload already on screen.
#[derive(Debug, Clone, PartialEq)]
enum DrawerTransition {
    Close,
    Restart(String),
    Refresh(String),
}

fn drawer_transition(previous: Option<&str>, current: Option<&str>) -> DrawerTransition {
    match current {
        None => DrawerTransition::Close,
        Some(id) if previous == Some(id) => DrawerTransition::Refresh(id.to_string()),
        Some(id) => DrawerTransition::Restart(id.to_string()),
    }
}

/// A detail response is applied only while the drawer still shows the entity
/// the request was dispatched for.
fn response_is_current(selected: Option<&str>, dispatched: &str) -> bool {
    selected == Some(dispatched)
}

/// Display name for the other end of a relationship, resolved by id against
/// the related-entities list with the raw id as fallback.
fn counterpart_name(details: &EntityDetails, rel: &Relationship) -> String {
    let counterpart_id = if rel.source_id == details.entity.id {
        &rel.target_id
    } else {
        &rel.source_id
    };
    details
        .related_entities
        .iter()
        .find(|related| related.id == *counterpart_id)
        .map(|related| related.name.clone())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| counterpart_id.clone())
}

#[component]
pub fn EntityDrawer() -> impl IntoView {
    let state = use_graph_view_state();
    let client = use_query_client();

    let details = RwSignal::new(Option::<EntityDetails>::None);
    let loading = RwSignal::new(false);
    let error = RwSignal::new(Option::<String>::None);
    let editing = RwSignal::new(false);
    let draft = RwSignal::new(String::new());
    let saving = RwSignal::new(false);

    // Detail fetch keyed by the selected entity. Moving to a different entity
    // restarts from the loading state so the previous payload never shows
    // under the new title; a stale response for a previous selection is
    // dropped on arrival.
    Effect::new(move |prev: Option<Option<String>>| {
        let current = state.selected_entity.get();
        let _ = client.epoch();

        let transition = drawer_transition(
            prev.as_ref().and_then(|p| p.as_deref()),
            current.as_deref(),
        );
        let id = match transition {
            DrawerTransition::Close => {
                details.set(None);
                error.set(None);
                editing.set(false);
                return None;
            }
            DrawerTransition::Restart(id) => {
                details.set(None);
                editing.set(false);
                id
            }
            DrawerTransition::Refresh(id) => id,
        };
        loading.set(true);
        error.set(None);

        let fetch_id = id.clone();
        client.fetch(
            keys::entity_details(&id),
            keys::STALE_DETAILS_MS,
            false,
            move || async move { get_entity(&fetch_id).await },
            move |result: Result<EntityDetails, _>| {
                if !response_is_current(
                    state.selected_entity.get_untracked().as_deref(),
                    id.as_str(),
                ) {
                    return;
                }
                match result {
                    Ok(payload) => details.set(Some(payload)),
                    Err(err) => error.set(Some(err.to_string())),
                }
                loading.set(false);
            },
        );
        current
    });

    let close = move |_| state.close_entity();

    let start_edit = move |_| {
        let current = details
            .with_untracked(|d| d.as_ref().map(|d| d.entity.description.clone()))
            .unwrap_or_default();
        draft.set(current);
        editing.set(true);
    };

    let save_description = move |_| {
        let Some(id) = state.selected_entity.get_untracked() else {
            return;
        };
        let patch = EntityPatch {
            description: Some(draft.get_untracked()),
            ..Default::default()
        };
        saving.set(true);
        spawn_local(async move {
            match update_entity(&id, &patch).await {
                Ok(_) => {
                    editing.set(false);
                    client.invalidate_prefix(&keys::entity_details(&id));
                    client.invalidate_prefix(&keys::graph_view_prefix());
                }
                Err(err) => {
                    log::error!("entity update failed: {err}");
                    error.set(Some(err.to_string()));
                }
            }
            saving.set(false);
        });
    };

    let delete = move |_| {
        let Some(id) = state.selected_entity.get_untracked() else {
            return;
        };
        saving.set(true);
        spawn_local(async move {
            match delete_entity(&id).await {
                Ok(_) => {
                    state.close_entity();
                    client.invalidate_prefix(&keys::entity_drawer_prefix());
                    client.invalidate_prefix(&keys::graph_view_prefix());
                }
                Err(err) => {
                    log::error!("entity delete failed: {err}");
                    error.set(Some(err.to_string()));
                }
            }
            saving.set(false);
        });
    };

    view! {
        <Show when=move || state.selected_entity.with(|id| id.is_some())>
            <div
                class="fixed inset-0 bg-black/50 z-40 flex justify-end"
                on:click=close
            >
                <div
                    class="w-full max-w-md h-full bg-zinc-900 border-l border-zinc-700 overflow-y-auto"
                    on:click=|ev| ev.stop_propagation()
                >
                    <div class="flex items-center justify-between px-4 py-3 border-b border-zinc-800 sticky top-0 bg-zinc-900">
                        {move || match details.get() {
                            Some(d) => view! {
                                <div class="flex items-center gap-2 min-w-0">
                                    <h2 class="text-lg font-semibold truncate">{d.entity.name.clone()}</h2>
                                    <span
                                        class="text-xs px-2 py-0.5 rounded bg-zinc-800 text-zinc-400 shrink-0"
                                        data-type=d.entity.entity_type.clone()
                                    >
                                        {d.entity.entity_type.clone()}
                                    </span>
                                </div>
                            }.into_any(),
                            None => view! {
                                <div class="flex items-center gap-2 min-w-0">
                                    <h2 class="text-lg font-semibold">"Entity Details"</h2>
                                </div>
                            }.into_any(),
                        }}
                        <button
                            class="text-zinc-400 hover:text-zinc-100 px-2"
                            on:click=close
                        >
                            "✕"
                        </button>
                    </div>

                    <Show when=move || loading.get()>
                        <div class="p-6 text-center text-zinc-400">"Loading entity details..."</div>
                    </Show>

                    {move || error.get().map(|message| view! {
                        <div class="m-4 px-4 py-3 bg-red-900/50 text-red-300 rounded">
                            <h3 class="font-semibold">"Error loading entity"</h3>
                            <p class="text-sm">{message}</p>
                        </div>
                    })}

                    {move || details.get().map(|d| {
                        let entity = d.entity.clone();
                        let relationships = d.relationships.clone();
                        let related = d.related_entities.clone();
                        let rel_rows: Vec<_> = relationships
                            .iter()
                            .map(|rel| {
                                (
                                    rel.relation_type.clone(),
                                    counterpart_name(&d, rel),
                                    rel.confidence,
                                )
                            })
                            .collect();

                        view! {
                            <div class="p-4 flex flex-col gap-4">
                                <div>
                                    <div class="flex items-center justify-between mb-1">
                                        <h3 class="text-sm font-semibold text-zinc-300">"Description"</h3>
                                        <Show when=move || !editing.get()>
                                            <button
                                                class="text-xs text-zinc-400 hover:text-zinc-100"
                                                on:click=start_edit
                                            >
                                                "Edit"
                                            </button>
                                        </Show>
                                    </div>
                                    <Show
                                        when=move || editing.get()
                                        fallback={
                                            let description = entity.description.clone();
                                            move || {
                                                let text = if description.is_empty() {
                                                    "No description available".to_string()
                                                } else {
                                                    description.clone()
                                                };
                                                view! { <p class="text-sm text-zinc-400">{text}</p> }
                                            }
                                        }
                                    >
                                        <div class="flex flex-col gap-2">
                                            <textarea
                                                class="w-full h-24 p-2 text-sm bg-zinc-800 border border-zinc-700 rounded text-zinc-100"
                                                prop:value=move || draft.get()
                                                on:input=move |ev| draft.set(event_target_value(&ev))
                                            />
                                            <div class="flex gap-2">
                                                <button
                                                    class="px-3 py-1 text-sm bg-zinc-700 hover:bg-zinc-600 rounded"
                                                    disabled=move || saving.get()
                                                    on:click=save_description
                                                >
                                                    "Save"
                                                </button>
                                                <button
                                                    class="px-3 py-1 text-sm text-zinc-400 hover:text-zinc-100"
                                                    on:click=move |_| editing.set(false)
                                                >
                                                    "Cancel"
                                                </button>
                                            </div>
                                        </div>
                                    </Show>
                                </div>

                                <Show when={
                                    let has_aliases = !entity.aliases.is_empty();
                                    move || has_aliases
                                }>
                                    <div>
                                        <h3 class="text-sm font-semibold text-zinc-300 mb-1">"Aliases"</h3>
                                        <div class="flex flex-wrap gap-1">
                                            {entity.aliases.iter().map(|alias| view! {
                                                <span class="text-xs px-2 py-0.5 bg-zinc-800 rounded">{alias.clone()}</span>
                                            }).collect_view()}
                                        </div>
                                    </div>
                                </Show>

                                <div>
                                    <h3 class="text-sm font-semibold text-zinc-300 mb-1">"Details"</h3>
                                    <div class="text-sm text-zinc-400 flex flex-col gap-1">
                                        <div class="flex justify-between">
                                            <span>"Confidence:"</span>
                                            <span>{format!("{:.1}%", entity.confidence * 100.0)}</span>
                                        </div>
                                        <div class="flex justify-between">
                                            <span>"Created:"</span>
                                            <span>{format_timestamp(&entity.created_at)}</span>
                                        </div>
                                        <div class="flex justify-between">
                                            <span>"Merge Count:"</span>
                                            <span>{entity.merge_count}</span>
                                        </div>
                                    </div>
                                </div>

                                <Show when={
                                    let has_context = !entity.context.is_empty();
                                    move || has_context
                                }>
                                    <div>
                                        <h3 class="text-sm font-semibold text-zinc-300 mb-1">"Context"</h3>
                                        <p class="text-sm text-zinc-400 whitespace-pre-wrap">{entity.context.clone()}</p>
                                    </div>
                                </Show>

                                <Show when={
                                    let has_rels = !rel_rows.is_empty();
                                    move || has_rels
                                }>
                                    <div>
                                        <h3 class="text-sm font-semibold text-zinc-300 mb-1">"Relationships"</h3>
                                        <div class="flex flex-col gap-1">
                                            {rel_rows.iter().map(|(relation_type, target, confidence)| view! {
                                                <div class="flex items-center justify-between text-sm bg-zinc-800/60 rounded px-2 py-1">
                                                    <span class="text-zinc-300">{relation_type.clone()}</span>
                                                    <span class="text-zinc-400 truncate mx-2">{target.clone()}</span>
                                                    <span class="text-zinc-500 text-xs shrink-0">
                                                        {format!("{:.1}%", confidence * 100.0)}
                                                    </span>
                                                </div>
                                            }).collect_view()}
                                        </div>
                                    </div>
                                </Show>

                                <Show when={
                                    let has_related = !related.is_empty();
                                    move || has_related
                                }>
                                    <div>
                                        <h3 class="text-sm font-semibold text-zinc-300 mb-1">"Related Entities"</h3>
                                        <div class="flex flex-col gap-1">
                                            {related.iter().map(|entity| {
                                                let open_id = entity.id.clone();
                                                view! {
                                                    <div
                                                        class="flex items-center justify-between text-sm bg-zinc-800/60 rounded px-2 py-1 cursor-pointer hover:bg-zinc-700/60"
                                                        on:click=move |_| state.open_entity(&open_id)
                                                    >
                                                        <strong class="text-zinc-200 truncate">{entity.name.clone()}</strong>
                                                        <span class="text-xs text-zinc-500">{entity.entity_type.clone()}</span>
                                                    </div>
                                                }
                                            }).collect_view()}
                                        </div>
                                    </div>
                                </Show>

                                <div class="flex gap-2 pt-2 border-t border-zinc-800">
                                    <button
                                        class="px-3 py-1.5 text-sm bg-zinc-800 hover:bg-zinc-700 rounded"
                                        on:click=start_edit
                                    >
                                        "Edit Entity"
                                    </button>
                                    <button
                                        class="px-3 py-1.5 text-sm bg-red-900/60 hover:bg-red-800 text-red-200 rounded"
                                        disabled=move || saving.get()
                                        on:click=delete
                                    >
                                        "Delete Entity"
                                    </button>
                                </div>
                            </div>
                        }
                    })}
                </div>
            </div>
        </Show>
    }
}
