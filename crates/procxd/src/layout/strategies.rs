//! Built-in coordinate assigners for graph rendering
//!
//! All assigners return graph-space coordinates: centred on the origin,
//! within [-1, 1] on both axes, y pointing up. [`render_graph`] scales them
//! into canvas space.
//!
//! [`render_graph`]: super::render_graph

use std::collections::HashMap;
use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, span, trace, Level};

use crate::core::{CoordinateAssigner, GraphLike, Point, Result, SketchError};

/// Nodes evenly spaced on the unit circle, in node order
#[derive(Debug, Clone, Copy, Default)]
pub struct CircularLayout;

impl<G: GraphLike> CoordinateAssigner<G> for CircularLayout {
    fn assign(&self, graph: &G) -> Result<HashMap<G::NodeId, Point>> {
        let ids: Vec<G::NodeId> = graph.node_ids().collect();
        let count = ids.len();
        if count == 1 {
            return Ok(ids.into_iter().map(|id| (id, Point::default())).collect());
        }
        Ok(ids
            .into_iter()
            .enumerate()
            .map(|(i, id)| {
                let theta = TAU * i as f64 / count as f64;
                (id, Point::new(theta.cos(), theta.sin()))
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "circular"
    }
}

/// Coordinates carried by the graph itself (`GraphLike::node_position`)
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLayout;

impl<G: GraphLike> CoordinateAssigner<G> for FixedLayout {
    fn assign(&self, graph: &G) -> Result<HashMap<G::NodeId, Point>> {
        graph
            .node_ids()
            .map(|id| match graph.node_position(&id) {
                Some(point) => Ok((id, point)),
                None => Err(SketchError::malformed_input(format!(
                    "node {:?} has no position",
                    id
                ))),
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

/// Coordinates computed elsewhere
#[derive(Debug, Clone)]
pub struct Precomputed<Id> {
    positions: HashMap<Id, Point>,
}

impl<Id> Precomputed<Id> {
    pub fn new(positions: HashMap<Id, Point>) -> Self {
        Self { positions }
    }
}

impl<G: GraphLike> CoordinateAssigner<G> for Precomputed<G::NodeId> {
    fn assign(&self, graph: &G) -> Result<HashMap<G::NodeId, Point>> {
        graph
            .node_ids()
            .map(|id| match self.positions.get(&id) {
                Some(&point) => Ok((id, point)),
                None => Err(SketchError::malformed_input(format!(
                    "no coordinate for node {:?}",
                    id
                ))),
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "precomputed"
    }
}

/// Force-directed placement.
///
/// Every pair of nodes repels, every edge acts as a spring. The simulation
/// runs in pixel space from a jittered grid and the result is normalised.
#[derive(Debug, Clone)]
pub struct SpringLayout {
    pub iterations: usize,
    pub spring_constant: f64,
    pub repulsion_constant: f64,
    pub damping_factor: f64,
    /// Distance below which repulsion grows quadratically
    pub min_distance: f64,
    /// Largest step a node may take per iteration
    pub max_step: f64,
    /// Seed for the initial jitter; `None` draws one from the OS
    pub seed: Option<u64>,
}

impl Default for SpringLayout {
    fn default() -> Self {
        Self {
            iterations: 100,
            spring_constant: 0.1,
            repulsion_constant: 1000.0,
            damping_factor: 0.85,
            min_distance: 50.0,
            max_step: 50.0,
            seed: None,
        }
    }
}

impl SpringLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    fn initial_positions<R: Rng>(&self, count: usize, rng: &mut R) -> Vec<Point> {
        let grid = (count as f64).sqrt().ceil().max(1.0) as usize;
        let cell = self.min_distance * 1.5;
        (0..count)
            .map(|i| {
                let (row, col) = (i / grid, i % grid);
                Point::new(
                    col as f64 * cell + rng.random_range(-20.0..20.0),
                    row as f64 * cell + rng.random_range(-20.0..20.0),
                )
            })
            .collect()
    }

    fn simulate(&self, positions: &mut [Point], edges: &[(usize, usize)]) {
        let count = positions.len();
        let mut velocities = vec![(0.0, 0.0); count];

        for _ in 0..self.iterations {
            let mut forces = vec![(0.0, 0.0); count];

            for i in 0..count {
                for j in 0..count {
                    if i == j {
                        continue;
                    }
                    let (dx, dy) = (positions[i].x - positions[j].x, positions[i].y - positions[j].y);
                    let distance = dx.hypot(dy).max(1.0);
                    let magnitude = if distance < self.min_distance {
                        self.repulsion_constant * (self.min_distance / distance).powi(2)
                            / self.min_distance
                    } else {
                        self.repulsion_constant / distance
                    };
                    forces[i].0 += magnitude * dx / distance;
                    forces[i].1 += magnitude * dy / distance;
                }
            }

            for &(source, target) in edges {
                let (dx, dy) = (
                    positions[source].x - positions[target].x,
                    positions[source].y - positions[target].y,
                );
                let distance = dx.hypot(dy).max(1.0);
                let magnitude = self.spring_constant * distance;
                let (fx, fy) = (magnitude * dx / distance, magnitude * dy / distance);
                forces[source].0 -= fx;
                forces[source].1 -= fy;
                forces[target].0 += fx;
                forces[target].1 += fy;
            }

            for i in 0..count {
                let (vx, vy) = velocities[i];
                let mut vx = (vx + forces[i].0) * self.damping_factor;
                let mut vy = (vy + forces[i].1) * self.damping_factor;
                let speed = vx.hypot(vy);
                if speed > self.max_step {
                    vx *= self.max_step / speed;
                    vy *= self.max_step / speed;
                }
                velocities[i] = (vx, vy);
                positions[i].x += vx;
                positions[i].y += vy;
            }
        }
    }
}

/// Centre points on the origin and scale the largest coordinate to 1
fn normalize(points: &mut [Point]) {
    if points.is_empty() {
        return;
    }
    let count = points.len() as f64;
    let mean_x = points.iter().map(|p| p.x).sum::<f64>() / count;
    let mean_y = points.iter().map(|p| p.y).sum::<f64>() / count;
    for p in points.iter_mut() {
        p.x -= mean_x;
        p.y -= mean_y;
    }
    let extent = points
        .iter()
        .map(|p| p.x.abs().max(p.y.abs()))
        .fold(0.0, f64::max);
    if extent > f64::EPSILON {
        for p in points.iter_mut() {
            p.x /= extent;
            p.y /= extent;
        }
    }
}

impl<G: GraphLike> CoordinateAssigner<G> for SpringLayout {
    fn assign(&self, graph: &G) -> Result<HashMap<G::NodeId, Point>> {
        let ids: Vec<G::NodeId> = graph.node_ids().collect();
        let layout_span = span!(Level::INFO, "layout_spring", node_count = ids.len(), iterations = self.iterations);
        let _enter = layout_span.enter();

        let index: HashMap<&G::NodeId, usize> = ids.iter().enumerate().map(|(i, id)| (id, i)).collect();
        let mut edges = Vec::new();
        for (from, to) in graph.edges() {
            match (index.get(&from), index.get(&to)) {
                (Some(&a), Some(&b)) if a != b => edges.push((a, b)),
                (Some(_), Some(_)) => trace!(node = ?from, "Ignoring self-loop"),
                _ => {
                    return Err(SketchError::malformed_input(format!(
                        "edge {:?} -> {:?} names an unknown node",
                        from, to
                    )))
                }
            }
        }

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        let mut positions = self.initial_positions(ids.len(), &mut rng);
        self.simulate(&mut positions, &edges);
        normalize(&mut positions);
        debug!(edge_count = edges.len(), "Spring layout converged");

        Ok(ids.into_iter().zip(positions).collect())
    }

    fn name(&self) -> &'static str {
        "spring"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GraphDatabase;

    fn triangle() -> GraphDatabase {
        let mut db = GraphDatabase::new();
        for id in ["a", "b", "c"] {
            db.add_simple_node(id).unwrap();
        }
        db.add_simple_edge("a", "b").unwrap();
        db.add_simple_edge("b", "c").unwrap();
        db
    }

    #[test]
    fn test_circular_positions_on_unit_circle() {
        let positions = CircularLayout.assign(&triangle()).unwrap();
        assert_eq!(positions.len(), 3);
        for p in positions.values() {
            assert!((p.x.hypot(p.y) - 1.0).abs() < 1e-9);
        }
        assert_eq!(positions["a"], Point::new(1.0, 0.0));
    }

    #[test]
    fn test_spring_is_seeded_and_normalized() {
        let graph = triangle();
        let layout = SpringLayout::new().with_seed(3);
        let first = layout.assign(&graph).unwrap();
        let second = layout.assign(&graph).unwrap();
        assert_eq!(first, second);
        for p in first.values() {
            assert!(p.x.abs() <= 1.0 + 1e-9 && p.y.abs() <= 1.0 + 1e-9);
            assert!(p.x.is_finite() && p.y.is_finite());
        }
        assert_ne!(first["a"], first["c"]);
    }

    #[test]
    fn test_fixed_requires_positions() {
        let graph = triangle();
        assert!(matches!(
            FixedLayout.assign(&graph),
            Err(SketchError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_precomputed_and_closure() {
        let graph = triangle();
        let mut map = HashMap::new();
        map.insert("a".to_string(), Point::new(0.0, 0.0));
        map.insert("b".to_string(), Point::new(1.0, 0.0));
        assert!(Precomputed::new(map.clone()).assign(&graph).is_err());
        map.insert("c".to_string(), Point::new(0.0, 1.0));
        assert_eq!(Precomputed::new(map.clone()).assign(&graph).unwrap().len(), 3);

        let closure = |g: &GraphDatabase| -> Result<HashMap<String, Point>> {
            Ok(g.node_ids().map(|id| (id, Point::default())).collect())
        };
        assert_eq!(closure.assign(&graph).unwrap().len(), 3);
        assert_eq!(CoordinateAssigner::<GraphDatabase>::name(&closure), "custom");
    }
}
