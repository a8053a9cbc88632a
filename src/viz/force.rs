//! Stepped force-directed layout for the 2D network view.
//!
//! Four forces run per tick: link attraction toward a rest distance, pairwise
//! many-body repulsion, centering, and collision, followed by a boundary
//! clamp. The simulation cools along an alpha schedule and settles; dragging
//! re-heats it with a nonzero alpha target.

pub const NODE_RADIUS: f64 = 8.0;
pub const BOUNDARY_PADDING: f64 = 50.0;
pub const LINK_DISTANCE: f64 = 100.0;
pub const CHARGE_STRENGTH: f64 = -300.0;
pub const COLLIDE_RADIUS: f64 = NODE_RADIUS + 5.0;
pub const DRAG_ALPHA_TARGET: f64 = 0.3;

const ALPHA_MIN: f64 = 0.001;
// 1 - ALPHA_MIN^(1/300): cools to the floor in about 300 ticks
const ALPHA_DECAY: f64 = 0.022_763_2;
const VELOCITY_RETAIN: f64 = 0.6;
// Keeps repulsion finite when nodes coincide
const MIN_DISTANCE2: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct SimNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// Pin position while dragging; `None` lets the forces move the node.
    pub fx: Option<f64>,
    pub fy: Option<f64>,
}

#[derive(Debug, Clone, Copy)]
pub struct SimLink {
    pub source: usize,
    pub target: usize,
}

#[derive(Debug)]
pub struct ForceSimulation {
    pub nodes: Vec<SimNode>,
    links: Vec<SimLink>,
    degrees: Vec<usize>,
    width: f64,
    height: f64,
    alpha: f64,
    alpha_target: f64,
}

impl ForceSimulation {
    /// Seeds nodes on a phyllotaxis spiral around the viewport center so the
    /// first ticks do not start from a degenerate overlap.
    pub fn new(node_ids: Vec<String>, links: Vec<SimLink>, width: f64, height: f64) -> Self {
        let golden_angle = std::f64::consts::PI * (3.0 - 5.0_f64.sqrt());
        let nodes: Vec<SimNode> = node_ids
            .into_iter()
            .enumerate()
            .map(|(i, id)| {
                let radius = 10.0 * (0.5 + i as f64).sqrt();
                let angle = i as f64 * golden_angle;
                SimNode {
                    id,
                    x: width / 2.0 + radius * angle.cos(),
                    y: height / 2.0 + radius * angle.sin(),
                    vx: 0.0,
                    vy: 0.0,
                    fx: None,
                    fy: None,
                }
            })
            .collect();

        let mut degrees = vec![0usize; nodes.len()];
        for link in &links {
            degrees[link.source] += 1;
            degrees[link.target] += 1;
        }

        ForceSimulation {
            nodes,
            links,
            degrees,
            width,
            height,
            alpha: 1.0,
            alpha_target: 0.0,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.alpha < ALPHA_MIN && self.alpha_target < ALPHA_MIN
    }

    /// Raises the alpha target so the layout keeps moving under a drag.
    pub fn reheat(&mut self) {
        self.alpha_target = DRAG_ALPHA_TARGET;
    }

    /// Lets the layout cool back down after a drag ends.
    pub fn cool(&mut self) {
        self.alpha_target = 0.0;
    }

    pub fn pin(&mut self, index: usize, x: f64, y: f64) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.fx = Some(x);
            node.fy = Some(y);
        }
    }

    pub fn unpin(&mut self, index: usize) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.fx = None;
            node.fy = None;
        }
    }

    /// Advances one tick. Returns `false` without moving anything once the
    /// simulation has settled.
    pub fn step(&mut self) -> bool {
        if self.is_settled() {
            return false;
        }
        self.alpha += (self.alpha_target - self.alpha) * ALPHA_DECAY;

        self.apply_links();
        self.apply_charge();
        self.apply_center();
        self.apply_collide();
        self.integrate();
        self.clamp_boundary();
        true
    }

    fn apply_links(&mut self) {
        for link in &self.links {
            if link.source == link.target {
                continue;
            }
            let (s, t) = (link.source, link.target);
            let dx = (self.nodes[t].x + self.nodes[t].vx) - (self.nodes[s].x + self.nodes[s].vx);
            let dy = (self.nodes[t].y + self.nodes[t].vy) - (self.nodes[s].y + self.nodes[s].vy);
            let dist = (dx * dx + dy * dy).sqrt().max(1e-6);

            let strength = 1.0 / self.degrees[s].min(self.degrees[t]).max(1) as f64;
            let bias = self.degrees[s] as f64 / (self.degrees[s] + self.degrees[t]).max(1) as f64;
            let pull = (dist - LINK_DISTANCE) / dist * self.alpha * strength;

            self.nodes[t].vx -= dx * pull * bias;
            self.nodes[t].vy -= dy * pull * bias;
            self.nodes[s].vx += dx * pull * (1.0 - bias);
            self.nodes[s].vy += dy * pull * (1.0 - bias);
        }
    }

    fn apply_charge(&mut self) {
        for i in 0..self.nodes.len() {
            for j in (i + 1)..self.nodes.len() {
                let dx = self.nodes[j].x - self.nodes[i].x;
                let dy = self.nodes[j].y - self.nodes[i].y;
                let dist2 = (dx * dx + dy * dy).max(MIN_DISTANCE2);
                let w = CHARGE_STRENGTH * self.alpha / dist2;
                self.nodes[j].vx += dx * w;
                self.nodes[j].vy += dy * w;
                self.nodes[i].vx -= dx * w;
                self.nodes[i].vy -= dy * w;
            }
        }
    }

    fn apply_center(&mut self) {
        if self.nodes.is_empty() {
            return;
        }
        let n = self.nodes.len() as f64;
        let cx = self.nodes.iter().map(|node| node.x).sum::<f64>() / n - self.width / 2.0;
        let cy = self.nodes.iter().map(|node| node.y).sum::<f64>() / n - self.height / 2.0;
        for node in &mut self.nodes {
            node.x -= cx;
            node.y -= cy;
        }
    }

    fn apply_collide(&mut self) {
        let min_dist = COLLIDE_RADIUS * 2.0;
        for i in 0..self.nodes.len() {
            for j in (i + 1)..self.nodes.len() {
                let dx = self.nodes[j].x - self.nodes[i].x;
                let dy = self.nodes[j].y - self.nodes[i].y;
                let dist = (dx * dx + dy * dy).sqrt().max(1e-6);
                if dist >= min_dist {
                    continue;
                }
                let push = (min_dist - dist) / dist * 0.5;
                self.nodes[j].vx += dx * push;
                self.nodes[j].vy += dy * push;
                self.nodes[i].vx -= dx * push;
                self.nodes[i].vy -= dy * push;
            }
        }
    }

    fn integrate(&mut self) {
        for node in &mut self.nodes {
            if let (Some(fx), Some(fy)) = (node.fx, node.fy) {
                node.x = fx;
                node.y = fy;
                node.vx = 0.0;
                node.vy = 0.0;
                continue;
            }
            node.vx *= VELOCITY_RETAIN;
            node.vy *= VELOCITY_RETAIN;
            node.x += node.vx;
            node.y += node.vy;
        }
    }

    fn clamp_boundary(&mut self) {
        let max_x = (self.width - BOUNDARY_PADDING).max(BOUNDARY_PADDING);
        let max_y = (self.height - BOUNDARY_PADDING).max(BOUNDARY_PADDING);
        for node in &mut self.nodes {
            node.x = node.x.clamp(BOUNDARY_PADDING, max_x);
            node.y = node.y.clamp(BOUNDARY_PADDING, max_y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sim(n: usize, links: Vec<SimLink>) -> ForceSimulation {
        let ids = (0..n).map(|i| format!("n{i}")).collect();
        ForceSimulation::new(ids, links, 800.0, 600.0)
    }

    fn distance(sim: &ForceSimulation, a: usize, b: usize) -> f64 {
        let dx = sim.nodes[a].x - sim.nodes[b].x;
        let dy = sim.nodes[a].y - sim.nodes[b].y;
        (dx * dx + dy * dy).sqrt()
    }

    #[test]
    fn linked_nodes_approach_rest_distance() {
        let mut sim = sim(2, vec![SimLink { source: 0, target: 1 }]);
        for _ in 0..400 {
            sim.step();
        }
        let d = distance(&sim, 0, 1);
        assert!(
            (d - LINK_DISTANCE).abs() < 40.0,
            "settled distance {d} not near {LINK_DISTANCE}"
        );
    }

    #[test]
    fn unlinked_nodes_repel() {
        let mut sim = sim(2, vec![]);
        let before = distance(&sim, 0, 1);
        for _ in 0..50 {
            sim.step();
        }
        assert!(distance(&sim, 0, 1) > before);
    }

    #[test]
    fn nodes_stay_inside_padded_viewport() {
        let mut sim = sim(30, vec![]);
        for _ in 0..400 {
            sim.step();
        }
        for node in &sim.nodes {
            assert!(node.x >= BOUNDARY_PADDING && node.x <= 800.0 - BOUNDARY_PADDING);
            assert!(node.y >= BOUNDARY_PADDING && node.y <= 600.0 - BOUNDARY_PADDING);
        }
    }

    #[test]
    fn simulation_settles_in_bounded_ticks() {
        let mut sim = sim(5, vec![SimLink { source: 0, target: 1 }]);
        let mut ticks = 0;
        while sim.step() {
            ticks += 1;
            assert!(ticks < 1_000, "simulation never settled");
        }
        assert!(sim.is_settled());
        // Settled means step is a no-op
        let snapshot: Vec<(f64, f64)> = sim.nodes.iter().map(|n| (n.x, n.y)).collect();
        assert!(!sim.step());
        let after: Vec<(f64, f64)> = sim.nodes.iter().map(|n| (n.x, n.y)).collect();
        assert_eq!(snapshot, after);
    }

    #[test]
    fn reheat_reactivates_a_settled_simulation() {
        let mut sim = sim(3, vec![]);
        while sim.step() {}
        assert!(sim.is_settled());

        sim.reheat();
        assert!(!sim.is_settled());
        assert!(sim.step());

        sim.cool();
        while sim.step() {}
        assert!(sim.is_settled());
    }

    #[test]
    fn pinned_node_ignores_forces() {
        let mut sim = sim(4, vec![SimLink { source: 0, target: 1 }]);
        sim.pin(0, 200.0, 200.0);
        for _ in 0..100 {
            sim.step();
        }
        assert_eq!(sim.nodes[0].x, 200.0);
        assert_eq!(sim.nodes[0].y, 200.0);

        sim.unpin(0);
        sim.reheat();
        for _ in 0..20 {
            sim.step();
        }
        assert!(sim.nodes[0].x != 200.0 || sim.nodes[0].y != 200.0);
    }
}
