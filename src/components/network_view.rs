//! Force-directed 2D network rendered as SVG.
//!
//! The layout rebuilds from scratch whenever the snapshot or the filters
//! change; a `requestAnimationFrame` loop steps the simulation and publishes
//! positions into a signal the SVG renders from. Node drags pin the node and
//! re-heat the simulation; short drags count as clicks and open the drawer.

use std::collections::HashMap;

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{PointerEvent, WheelEvent};

use crate::components::graph_filters::GraphFilters;
use crate::services::graph_view_state::use_graph_view_state;
use crate::utils::raf::start_raf_loop;
use crate::viz::filtering::{distinct_entity_types, entity_color, filter_network};
use crate::viz::force::{ForceSimulation, SimLink, NODE_RADIUS};

const WORLD_WIDTH: f64 = 800.0;
const WORLD_HEIGHT: f64 = 600.0;
const ZOOM_MIN: f64 = 0.1;
const ZOOM_MAX: f64 = 4.0;
const ZOOM_STEP: f64 = 1.1;
/// Pointer travel (in view units) below which a node drag counts as a click.
const CLICK_SLOP: f64 = 5.0;

#[derive(Clone, PartialEq)]
struct NodeMeta {
    id: String,
    name: String,
    color: String,
}

#[derive(Clone, PartialEq)]
struct EdgeMeta {
    source: usize,
    target: usize,
    relation_type: String,
}

#[derive(Clone, Copy, Default)]
struct DragState {
    active: bool,
    /// Index of the dragged node; `None` while panning the background.
    node: Option<usize>,
    last: (f64, f64),
    has_last: bool,
    moved: f64,
}

/// Pointer position in viewBox units of the element the handler is on.
fn view_coords(ev: &PointerEvent) -> Option<(f64, f64)> {
    let element = ev.current_target()?.dyn_into::<web_sys::Element>().ok()?;
    let rect = element.get_bounding_client_rect();
    let sx = WORLD_WIDTH / rect.width().max(1.0);
    let sy = WORLD_HEIGHT / rect.height().max(1.0);
    Some((
        (ev.client_x() as f64 - rect.left()) * sx,
        (ev.client_y() as f64 - rect.top()) * sy,
    ))
}

#[component]
pub fn NetworkView() -> impl IntoView {
    let state = use_graph_view_state();

    let sim = StoredValue::new(Option::<ForceSimulation>::None);
    let nodes_meta = RwSignal::new(Vec::<NodeMeta>::new());
    let edges_meta = RwSignal::new(Vec::<EdgeMeta>::new());
    let positions = RwSignal::new(Vec::<(f64, f64)>::new());

    let zoom = RwSignal::new(1.0_f64);
    let pan = RwSignal::new((0.0_f64, 0.0_f64));
    let drag = StoredValue::new(DragState::default());

    // Full rebuild on snapshot or filter change. Positions restart from the
    // seeding spiral; there is no incremental relayout.
    Effect::new(move |_| {
        let selected_types = state.selected_entity_types.get();
        let selected_relations = state.selected_relation_types.get();
        state.snapshot.with(|snap| {
            let Some(data) = snap.as_ref() else {
                return;
            };
            let global_types = distinct_entity_types(&data.nodes);
            let sub = filter_network(data, &selected_types, &selected_relations);

            let metas: Vec<NodeMeta> = sub
                .nodes
                .iter()
                .map(|entity| NodeMeta {
                    id: entity.id.clone(),
                    name: entity.name.clone(),
                    color: entity_color(&entity.entity_type, &global_types).to_string(),
                })
                .collect();
            let index: HashMap<&str, usize> = sub
                .nodes
                .iter()
                .enumerate()
                .map(|(i, entity)| (entity.id.as_str(), i))
                .collect();
            let links: Vec<SimLink> = sub
                .edges
                .iter()
                .map(|edge| SimLink {
                    source: index[edge.source_id.as_str()],
                    target: index[edge.target_id.as_str()],
                })
                .collect();
            let edge_metas: Vec<EdgeMeta> = sub
                .edges
                .iter()
                .zip(&links)
                .map(|(edge, link)| EdgeMeta {
                    source: link.source,
                    target: link.target,
                    relation_type: edge.relation_type.clone(),
                })
                .collect();

            let ids = metas.iter().map(|meta| meta.id.clone()).collect();
            let fresh = ForceSimulation::new(ids, links, WORLD_WIDTH, WORLD_HEIGHT);
            positions.set(fresh.nodes.iter().map(|n| (n.x, n.y)).collect());
            sim.set_value(Some(fresh));
            nodes_meta.set(metas);
            edges_meta.set(edge_metas);
        });
    });

    // Simulation ticks. The handle lives in the reactive arena so the loop is
    // cancelled when the view unmounts.
    let raf = start_raf_loop(move |_| {
        let moved = sim
            .try_update_value(|s| s.as_mut().map(|s| s.step()).unwrap_or(false))
            .unwrap_or(false);
        if moved {
            let snapshot = sim.with_value(|s| {
                s.as_ref()
                    .map(|s| s.nodes.iter().map(|n| (n.x, n.y)).collect::<Vec<_>>())
                    .unwrap_or_default()
            });
            positions.set(snapshot);
        }
    });
    let _raf_guard = StoredValue::new_local(raf);

    let on_wheel = move |ev: WheelEvent| {
        ev.prevent_default();
        let factor = if ev.delta_y() < 0.0 {
            ZOOM_STEP
        } else {
            1.0 / ZOOM_STEP
        };
        let old = zoom.get_untracked();
        let new = (old * factor).clamp(ZOOM_MIN, ZOOM_MAX);
        zoom.set(new);
        // Keep the world point under the viewport center fixed while zooming
        let (px, py) = pan.get_untracked();
        let (cx, cy) = (WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0);
        pan.set((cx - (cx - px) * (new / old), cy - (cy - py) * (new / old)));
    };

    let on_pointer_down = move |ev: PointerEvent| {
        let Some(at) = view_coords(&ev) else { return };
        drag.set_value(DragState {
            active: true,
            node: None,
            last: at,
            has_last: true,
            moved: 0.0,
        });
    };

    let on_pointer_move = move |ev: PointerEvent| {
        let mut d = drag.get_value();
        if !d.active {
            return;
        }
        let Some(at) = view_coords(&ev) else { return };
        if d.has_last {
            d.moved += (at.0 - d.last.0).abs() + (at.1 - d.last.1).abs();
        }
        match d.node {
            Some(index) => {
                let (px, py) = pan.get_untracked();
                let z = zoom.get_untracked();
                let world = ((at.0 - px) / z, (at.1 - py) / z);
                sim.update_value(|s| {
                    if let Some(s) = s.as_mut() {
                        s.pin(index, world.0, world.1);
                    }
                });
            }
            None => {
                if d.has_last {
                    let (px, py) = pan.get_untracked();
                    pan.set((px + at.0 - d.last.0, py + at.1 - d.last.1));
                }
            }
        }
        d.last = at;
        d.has_last = true;
        drag.set_value(d);
    };

    let on_pointer_up = move |_ev: PointerEvent| {
        let d = drag.get_value();
        if !d.active {
            return;
        }
        if let Some(index) = d.node {
            sim.update_value(|s| {
                if let Some(s) = s.as_mut() {
                    s.unpin(index);
                    s.cool();
                }
            });
            if d.moved < CLICK_SLOP {
                if let Some(meta) = nodes_meta.with_untracked(|m| m.get(index).cloned()) {
                    state.open_entity(&meta.id);
                }
            }
        }
        drag.set_value(DragState::default());
    };

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
                <div class="flex-1 min-w-0 bg-zinc-950">
                    <svg
                        class="w-full h-full cursor-move select-none"
                        viewBox=format!("0 0 {WORLD_WIDTH} {WORLD_HEIGHT}")
                        on:wheel=on_wheel
                        on:pointerdown=on_pointer_down
                        on:pointermove=on_pointer_move
                        on:pointerup=on_pointer_up
                        on:pointerleave=on_pointer_up
                    >
                        <g transform=move || {
                            let (px, py) = pan.get();
                            format!("translate({px},{py}) scale({})", zoom.get())
                        }>
                            // Edges and their labels
                            {move || {
                                let pos = positions.get();
                                edges_meta.get().iter().filter_map(|edge| {
                                    let (x1, y1) = *pos.get(edge.source)?;
                                    let (x2, y2) = *pos.get(edge.target)?;
                                    Some(view! {
                                        <g>
                                            <line
                                                x1=x1.to_string()
                                                y1=y1.to_string()
                                                x2=x2.to_string()
                                                y2=y2.to_string()
                                                stroke="#666"
                                                stroke-opacity="0.6"
                                                stroke-width="2"
                                            />
                                            <text
                                                x=((x1 + x2) / 2.0).to_string()
                                                y=((y1 + y2) / 2.0).to_string()
                                                font-size="10px"
                                                fill="#999"
                                                text-anchor="middle"
                                                style="pointer-events: none"
                                            >
                                                {edge.relation_type.clone()}
                                            </text>
                                        </g>
                                    })
                                }).collect_view()
                            }}

                            // Nodes and their labels
                            {move || {
                                let pos = positions.get();
                                nodes_meta.get().iter().enumerate().filter_map(|(index, meta)| {
                                    let (x, y) = *pos.get(index)?;
                                    let name = meta.name.clone();
                                    Some(view! {
                                        <g>
                                            <circle
                                                cx=x.to_string()
                                                cy=y.to_string()
                                                r=NODE_RADIUS.to_string()
                                                fill=meta.color.clone()
                                                stroke="#fff"
                                                stroke-opacity="0.5"
                                                stroke-width="2"
                                                style="cursor: pointer"
                                                on:pointerdown=move |ev: PointerEvent| {
                                                    ev.stop_propagation();
                                                    sim.update_value(|s| {
                                                        if let Some(s) = s.as_mut() {
                                                            s.reheat();
                                                        }
                                                    });
                                                    drag.set_value(DragState {
                                                        active: true,
                                                        node: Some(index),
                                                        last: (0.0, 0.0),
                                                        has_last: false,
                                                        moved: 0.0,
                                                    });
                                                }
                                            />
                                            <text
                                                x=x.to_string()
                                                y=y.to_string()
                                                dy="0.35em"
                                                font-size="12px"
                                                fill="#fff"
                                                text-anchor="middle"
                                                style="pointer-events: none"
                                            >
                                                {name}
                                            </text>
                                        </g>
                                    })
                                }).collect_view()
                            }}
                        </g>
                    </svg>
                </div>
            </Show>
        </div>
    }
}
