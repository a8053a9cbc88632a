//! Navigable 3D point cloud on a 2D canvas.
//!
//! Nodes are scattered on a sphere around the origin, scaled by confidence
//! and colored by type. A fly camera moves with WASD/Space/Shift; clicking a
//! node opens the drawer and flies the camera to it. The search query
//! highlights matching nodes and dims the rest. The render loop and the
//! window key listeners are torn down when the view unmounts.

use leptos::html::Canvas;
use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, KeyboardEvent, MouseEvent};

use crate::components::graph_filters::GraphFilters;
use crate::services::graph_view_state::use_graph_view_state;
use crate::utils::now_ms;
use crate::utils::raf::start_raf_loop;
use crate::viz::filtering::{css_color, entity_color_3d, filter_network, node_display_color};
use crate::viz::space::{
    node_radius, sphere_position, Camera, FlyTo, Vec3, FAST_MOVE_SPEED, MOVE_SPEED, SCENE_RADIUS,
};

const CANVAS_WIDTH: f64 = 800.0;
const CANVAS_HEIGHT: f64 = 600.0;
const BACKGROUND: &str = "#1a1a1a";

#[derive(Clone)]
struct SceneNode {
    id: String,
    name: String,
    base_color: u32,
    radius: f64,
    pos: Vec3,
}

#[derive(Clone, Default)]
struct Scene {
    nodes: Vec<SceneNode>,
    edges: Vec<(usize, usize)>,
}

#[derive(Clone, Copy, Default)]
struct KeyFlags {
    w: bool,
    a: bool,
    s: bool,
    d: bool,
    shift: bool,
    space: bool,
}

/// Window key listeners that unregister themselves when dropped.
struct KeyListeners {
    down: Option<Closure<dyn FnMut(KeyboardEvent)>>,
    up: Option<Closure<dyn FnMut(KeyboardEvent)>>,
}

impl Drop for KeyListeners {
    fn drop(&mut self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Some(closure) = self.down.take() {
            let _ = window
                .remove_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        }
        if let Some(closure) = self.up.take() {
            let _ = window
                .remove_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
        }
    }
}

fn apply_key(flags: &mut KeyFlags, key: &str, pressed: bool) {
    match key {
        "w" => flags.w = pressed,
        "a" => flags.a = pressed,
        "s" => flags.s = pressed,
        "d" => flags.d = pressed,
        "shift" => flags.shift = pressed,
        " " => flags.space = pressed,
        _ => {}
    }
}

#[component]
pub fn Network3DView() -> impl IntoView {
    let state = use_graph_view_state();

    let canvas_ref = NodeRef::<Canvas>::new();
    let scene = StoredValue::new(Scene::default());
    let camera = StoredValue::new(Camera::new());
    let fly = StoredValue::new(Option::<FlyTo>::None);
    let keys = StoredValue::new(KeyFlags::default());

    // Scene rebuild: fresh random sphere positions on every snapshot or
    // filter change, matching the 2D view's rebuild-from-scratch policy.
    Effect::new(move |_| {
        let selected_types = state.selected_entity_types.get();
        let selected_relations = state.selected_relation_types.get();
        state.snapshot.with(|snap| {
            let Some(data) = snap.as_ref() else {
                return;
            };
            let sub = filter_network(data, &selected_types, &selected_relations);

            let nodes: Vec<SceneNode> = sub
                .nodes
                .iter()
                .map(|entity| {
                    let theta = js_sys::Math::random() * std::f64::consts::TAU;
                    let phi = js_sys::Math::random() * std::f64::consts::PI;
                    SceneNode {
                        id: entity.id.clone(),
                        name: entity.name.clone(),
                        base_color: entity_color_3d(&entity.entity_type),
                        radius: node_radius(entity.confidence),
                        pos: sphere_position(SCENE_RADIUS, theta, phi),
                    }
                })
                .collect();
            let index: std::collections::HashMap<&str, usize> = sub
                .nodes
                .iter()
                .enumerate()
                .map(|(i, entity)| (entity.id.as_str(), i))
                .collect();
            let edges = sub
                .edges
                .iter()
                .map(|edge| {
                    (
                        index[edge.source_id.as_str()],
                        index[edge.target_id.as_str()],
                    )
                })
                .collect();

            scene.set_value(Scene { nodes, edges });
        });
    });

    // Window-level WASD state, released on unmount.
    let down = Closure::wrap(Box::new(move |ev: KeyboardEvent| {
        let key = ev.key().to_lowercase();
        if key == " " {
            ev.prevent_default();
        }
        keys.update_value(|flags| apply_key(flags, &key, true));
    }) as Box<dyn FnMut(KeyboardEvent)>);
    let up = Closure::wrap(Box::new(move |ev: KeyboardEvent| {
        keys.update_value(|flags| apply_key(flags, &ev.key().to_lowercase(), false));
    }) as Box<dyn FnMut(KeyboardEvent)>);
    if let Some(window) = web_sys::window() {
        let _ = window.add_event_listener_with_callback("keydown", down.as_ref().unchecked_ref());
        let _ = window.add_event_listener_with_callback("keyup", up.as_ref().unchecked_ref());
    }
    let _key_guard = StoredValue::new_local(KeyListeners {
        down: Some(down),
        up: Some(up),
    });

    let raf = start_raf_loop(move |_| {
        // Movement
        let flags = keys.get_value();
        camera.update_value(|cam| {
            let speed = if flags.shift { FAST_MOVE_SPEED } else { MOVE_SPEED };
            let forward = cam.forward();
            let right = cam.right();
            let up = Vec3::new(0.0, 1.0, 0.0);
            if flags.w {
                cam.position = cam.position.add(forward.scale(speed));
            }
            if flags.s {
                cam.position = cam.position.sub(forward.scale(speed));
            }
            if flags.a {
                cam.position = cam.position.sub(right.scale(speed));
            }
            if flags.d {
                cam.position = cam.position.add(right.scale(speed));
            }
            if flags.space {
                cam.position = cam.position.add(up.scale(speed));
            }
            if flags.shift && !flags.space {
                cam.position = cam.position.sub(up.scale(speed));
            }
        });

        // Selection flight
        if let Some(active) = fly.get_value() {
            let (position, done) = active.sample(now_ms());
            camera.update_value(|cam| {
                cam.position = position;
                cam.look_at(active.focus);
            });
            if done {
                fly.set_value(None);
            }
        }

        // Render
        let Some(canvas) = canvas_ref.get_untracked() else {
            return;
        };
        let Some(ctx) = context_2d(&canvas) else {
            return;
        };
        let cam = camera.get_value();
        let selected = state.selected_entity.get_untracked();
        let query = state.search_query.get_untracked().to_lowercase();
        scene.with_value(|scene| draw_scene(&ctx, &cam, scene, selected.as_deref(), &query));
    });
    let _raf_guard = StoredValue::new_local(raf);

    let on_click = move |ev: MouseEvent| {
        let Some(target) = ev
            .current_target()
            .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
        else {
            return;
        };
        let rect = target.get_bounding_client_rect();
        let x = (ev.client_x() as f64 - rect.left()) * CANVAS_WIDTH / rect.width().max(1.0);
        let y = (ev.client_y() as f64 - rect.top()) * CANVAS_HEIGHT / rect.height().max(1.0);

        let cam = camera.get_value();
        let hit = scene.with_value(|scene| {
            let mut best: Option<(f64, String, Vec3)> = None;
            for node in &scene.nodes {
                let Some((sx, sy, depth)) = cam.project(node.pos, CANVAS_WIDTH, CANVAS_HEIGHT)
                else {
                    continue;
                };
                let radius = cam.projected_radius(node.radius, depth, CANVAS_HEIGHT);
                let dx = x - sx;
                let dy = y - sy;
                if dx * dx + dy * dy <= radius * radius
                    && best.as_ref().map(|(d, _, _)| depth < *d).unwrap_or(true)
                {
                    best = Some((depth, node.id.clone(), node.pos));
                }
            }
            best
        });

        if let Some((_, id, pos)) = hit {
            state.open_entity(&id);
            fly.set_value(Some(FlyTo::toward(&camera.get_value(), pos, now_ms())));
        }
    };

    view! {
        <div class="h-full flex">
            <GraphFilters />

            <Show
                when=move || state.snapshot.with(|s| s.is_some())
                fallback=|| view! {
                    <div class="flex-1 flex flex-col items-center justify-center text-zinc-500">
                        <h2>"No data available"</h2>
                        <p class="text-sm">"Load some graph data to see the 3D visualization"</p>
                    </div>
                }
            >
                <div class="flex-1 min-w-0 relative bg-zinc-950">
                    <canvas
                        node_ref=canvas_ref
                        width="800"
                        height="600"
                        class="w-full h-full"
                        on:click=on_click
                    />
                    <div class="absolute bottom-3 left-3 flex flex-col gap-0.5 text-xs text-zinc-400 bg-zinc-900/80 rounded px-3 py-2 pointer-events-none">
                        <span>"WASD - Move camera"</span>
                        <span>"Space/Shift - Up/Down"</span>
                        <span>"Click nodes to select"</span>
                    </div>
                </div>
            </Show>
        </div>
    }
}

fn context_2d(canvas: &web_sys::HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()?
        .dyn_into::<CanvasRenderingContext2d>()
        .ok()
}

fn draw_scene(
    ctx: &CanvasRenderingContext2d,
    cam: &Camera,
    scene: &Scene,
    selected: Option<&str>,
    query: &str,
) {
    ctx.set_global_alpha(1.0);
    ctx.set_fill_style_str(BACKGROUND);
    ctx.fill_rect(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT);

    // Edges first, then nodes far-to-near
    ctx.set_stroke_style_str("#888");
    ctx.set_global_alpha(0.6);
    ctx.set_line_width(1.0);
    for (a, b) in &scene.edges {
        let (Some(from), Some(to)) = (
            scene
                .nodes
                .get(*a)
                .and_then(|n| cam.project(n.pos, CANVAS_WIDTH, CANVAS_HEIGHT)),
            scene
                .nodes
                .get(*b)
                .and_then(|n| cam.project(n.pos, CANVAS_WIDTH, CANVAS_HEIGHT)),
        ) else {
            continue;
        };
        ctx.begin_path();
        ctx.move_to(from.0, from.1);
        ctx.line_to(to.0, to.1);
        ctx.stroke();
    }
    ctx.set_global_alpha(1.0);

    let mut drawn: Vec<(f64, f64, f64, f64, u32, &str)> = scene
        .nodes
        .iter()
        .filter_map(|node| {
            let (sx, sy, depth) = cam.project(node.pos, CANVAS_WIDTH, CANVAS_HEIGHT)?;
            let radius = cam.projected_radius(node.radius, depth, CANVAS_HEIGHT);
            let is_selected = selected == Some(node.id.as_str());
            let matches = !node.name.is_empty() && node.name.to_lowercase().contains(query);
            let color =
                node_display_color(node.base_color, is_selected, !query.is_empty(), matches);
            Some((depth, sx, sy, radius, color, node.name.as_str()))
        })
        .collect();
    drawn.sort_by(|a, b| b.0.total_cmp(&a.0));

    ctx.set_font("12px Arial");
    ctx.set_text_align("center");
    for (_, sx, sy, radius, color, name) in drawn {
        ctx.begin_path();
        let _ = ctx.arc(sx, sy, radius.max(1.0), 0.0, std::f64::consts::TAU);
        ctx.set_fill_style_str(&css_color(color));
        ctx.fill();
        if !name.is_empty() {
            ctx.set_fill_style_str("#fff");
            let _ = ctx.fill_text(name, sx, sy - radius - 6.0);
        }
    }
}
