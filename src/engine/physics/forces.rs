use glam::Vec2;

use crate::dataset::NodeRecord;
use crate::engine::registry::{AxisParams, ChargeParams, CollideParams, Spring};
use crate::util::jiggle;

use super::quadtree::QuadCell;

/// Pulls linked pairs toward the rest distance, working on projected
/// positions (position + velocity) so corrections account for motion
/// already accumulated this tick.
pub(super) fn apply_springs(
    nodes: &mut [NodeRecord],
    springs: &[Spring],
    distance: f32,
    iterations: usize,
    alpha: f32,
) {
    for _ in 0..iterations {
        for spring in springs {
            let projected_source = nodes[spring.source].position + nodes[spring.source].velocity;
            let projected_target = nodes[spring.target].position + nodes[spring.target].velocity;
            let mut delta = projected_target - projected_source;
            if delta == Vec2::ZERO {
                delta = jiggle(spring.source, spring.target);
            }

            let length = delta.length();
            let correction = delta * ((length - distance) / length * alpha * spring.strength);
            nodes[spring.target].velocity -= correction * spring.bias;
            nodes[spring.source].velocity += correction * (1.0 - spring.bias);
        }
    }
}

pub(super) fn accumulate_charge(
    cell: &QuadCell,
    index: usize,
    points: &[Vec2],
    params: ChargeParams,
    theta_sq: f32,
    alpha: f32,
    velocity: &mut Vec2,
) {
    if cell.count <= 0.0 {
        return;
    }
    let point = points[index];

    if !cell.is_leaf() {
        let delta = cell.center_of_mass - point;
        let mut distance_sq = delta.length_squared();
        let width = cell.bounds.width();

        // far enough away to treat the whole cell as one body
        if width * width < theta_sq * distance_sq {
            if distance_sq < params.distance_max_sq {
                if distance_sq < params.distance_min_sq {
                    distance_sq = (params.distance_min_sq * distance_sq).sqrt();
                }
                *velocity += delta * (params.strength * cell.count * alpha / distance_sq);
            }
            return;
        }

        for child in cell.children.iter().flatten() {
            accumulate_charge(child, index, points, params, theta_sq, alpha, velocity);
        }
        return;
    }

    for &other in &cell.members {
        if other == index {
            continue;
        }
        let mut delta = points[other] - point;
        let mut distance_sq = delta.length_squared();
        if distance_sq >= params.distance_max_sq {
            continue;
        }
        if distance_sq == 0.0 {
            delta = jiggle(index, other);
            distance_sq = delta.length_squared();
        }
        if distance_sq < params.distance_min_sq {
            distance_sq = (params.distance_min_sq * distance_sq).sqrt();
        }
        *velocity += delta * (params.strength * alpha / distance_sq);
    }
}

/// Dual-tree collision sweep; overlapping pairs get pushed apart along
/// their separation axis, half the correction each.
pub(super) fn accumulate_collision_pairs(
    cell_a: &QuadCell,
    cell_b: &QuadCell,
    same_cell: bool,
    points: &[Vec2],
    params: CollideParams,
    impulses: &mut [Vec2],
) {
    let reach = params.radius * 2.0;
    if cell_a.bounds.gap_sq(cell_b.bounds) > reach * reach {
        return;
    }

    if cell_a.is_leaf() && cell_b.is_leaf() {
        if same_cell {
            for (slot, &from) in cell_a.members.iter().enumerate() {
                for &to in &cell_a.members[slot + 1..] {
                    push_apart(from, to, points, reach, params.strength, impulses);
                }
            }
        } else {
            for &from in &cell_a.members {
                for &to in &cell_b.members {
                    push_apart(from, to, points, reach, params.strength, impulses);
                }
            }
        }
        return;
    }

    if same_cell {
        for first in 0..4 {
            let Some(child_a) = cell_a.children[first].as_ref() else {
                continue;
            };
            accumulate_collision_pairs(child_a, child_a, true, points, params, impulses);

            for second in (first + 1)..4 {
                let Some(child_b) = cell_a.children[second].as_ref() else {
                    continue;
                };
                accumulate_collision_pairs(child_a, child_b, false, points, params, impulses);
            }
        }
        return;
    }

    let split_a = if cell_a.is_leaf() {
        false
    } else if cell_b.is_leaf() {
        true
    } else {
        cell_a.bounds.half_extent >= cell_b.bounds.half_extent
    };

    if split_a {
        for child in cell_a.children.iter().flatten() {
            accumulate_collision_pairs(child, cell_b, false, points, params, impulses);
        }
    } else {
        for child in cell_b.children.iter().flatten() {
            accumulate_collision_pairs(cell_a, child, false, points, params, impulses);
        }
    }
}

fn push_apart(
    from: usize,
    to: usize,
    points: &[Vec2],
    reach: f32,
    strength: f32,
    impulses: &mut [Vec2],
) {
    let mut delta = points[from] - points[to];
    let mut distance_sq = delta.length_squared();
    if distance_sq >= reach * reach {
        return;
    }
    if distance_sq == 0.0 {
        delta = jiggle(from, to);
        distance_sq = delta.length_squared();
    }

    let distance = distance_sq.sqrt();
    let correction = delta * ((reach - distance) / distance * strength * 0.5);
    impulses[from] += correction;
    impulses[to] -= correction;
}

/// Rigid translation moving the layout's mean position onto the target.
pub(super) fn apply_center(nodes: &mut [NodeRecord], target: Vec2) {
    if nodes.is_empty() {
        return;
    }
    let mut sum = Vec2::ZERO;
    for node in nodes.iter() {
        sum += node.position;
    }
    let shift = sum / nodes.len() as f32 - target;
    for node in nodes.iter_mut() {
        node.position -= shift;
    }
}

pub(super) fn apply_axis_x(nodes: &mut [NodeRecord], axis: AxisParams, alpha: f32) {
    for node in nodes.iter_mut() {
        node.velocity.x += (axis.target - node.position.x) * axis.strength * alpha;
    }
}

pub(super) fn apply_axis_y(nodes: &mut [NodeRecord], axis: AxisParams, alpha: f32) {
    for node in nodes.iter_mut() {
        node.velocity.y += (axis.target - node.position.y) * axis.strength * alpha;
    }
}

#[cfg(test)]
mod tests {
    use glam::vec2;

    use super::*;

    fn free_node(id: &str, x: f32, y: f32) -> NodeRecord {
        NodeRecord {
            id: id.to_owned(),
            state: "TN".to_owned(),
            city: "Chennai".to_owned(),
            region: "South".to_owned(),
            vendor: "acme".to_owned(),
            kind: "supplier".to_owned(),
            position: vec2(x, y),
            velocity: Vec2::ZERO,
            pinned: None,
        }
    }

    #[test]
    fn spring_pulls_a_stretched_pair_together() {
        let mut nodes = vec![free_node("a", 0.0, 0.0), free_node("b", 100.0, 0.0)];
        let springs = [Spring {
            source: 0,
            target: 1,
            strength: 1.0,
            bias: 0.5,
        }];

        apply_springs(&mut nodes, &springs, 30.0, 1, 1.0);

        // stretched by 70, so both ends move inward
        assert!(nodes[0].velocity.x > 0.0);
        assert!(nodes[1].velocity.x < 0.0);
        assert_eq!(nodes[0].velocity.y, 0.0);
    }

    #[test]
    fn spring_pushes_a_compressed_pair_apart() {
        let mut nodes = vec![free_node("a", 0.0, 0.0), free_node("b", 10.0, 0.0)];
        let springs = [Spring {
            source: 0,
            target: 1,
            strength: 1.0,
            bias: 0.5,
        }];

        apply_springs(&mut nodes, &springs, 30.0, 1, 1.0);

        assert!(nodes[0].velocity.x < 0.0);
        assert!(nodes[1].velocity.x > 0.0);
    }

    #[test]
    fn spring_bias_shifts_the_correction_to_the_lighter_end() {
        let mut nodes = vec![free_node("hub", 0.0, 0.0), free_node("leaf", 100.0, 0.0)];
        // hub has the higher degree, so bias toward moving the leaf
        let springs = [Spring {
            source: 0,
            target: 1,
            strength: 1.0,
            bias: 0.8,
        }];

        apply_springs(&mut nodes, &springs, 30.0, 1, 1.0);

        assert!(nodes[1].velocity.x.abs() > nodes[0].velocity.x.abs());
    }

    #[test]
    fn coincident_linked_nodes_separate() {
        let mut nodes = vec![free_node("a", 5.0, 5.0), free_node("b", 5.0, 5.0)];
        let springs = [Spring {
            source: 0,
            target: 1,
            strength: 1.0,
            bias: 0.5,
        }];

        apply_springs(&mut nodes, &springs, 30.0, 1, 1.0);

        assert!(nodes[0].velocity != nodes[1].velocity);
    }

    #[test]
    fn negative_charge_repels_neighbors() {
        let mut nodes = vec![free_node("a", 0.0, 0.0), free_node("b", 10.0, 0.0)];
        let params = ChargeParams {
            strength: -30.0,
            distance_min_sq: 1.0,
            distance_max_sq: 2000.0 * 2000.0,
        };

        let points: Vec<Vec2> = nodes.iter().map(|node| node.position).collect();
        let tree = QuadCell::build(&points).unwrap();
        for (index, node) in nodes.iter_mut().enumerate() {
            accumulate_charge(&tree, index, &points, params, 0.81, 1.0, &mut node.velocity);
        }

        assert!(nodes[0].velocity.x < 0.0);
        assert!(nodes[1].velocity.x > 0.0);
    }

    #[test]
    fn charge_range_cutoff_ignores_distant_nodes() {
        let mut nodes = vec![free_node("a", 0.0, 0.0), free_node("b", 500.0, 0.0)];
        let params = ChargeParams {
            strength: -30.0,
            distance_min_sq: 1.0,
            distance_max_sq: 100.0 * 100.0,
        };

        let points: Vec<Vec2> = nodes.iter().map(|node| node.position).collect();
        let tree = QuadCell::build(&points).unwrap();
        for (index, node) in nodes.iter_mut().enumerate() {
            accumulate_charge(&tree, index, &points, params, 0.81, 1.0, &mut node.velocity);
        }

        assert_eq!(nodes[0].velocity, Vec2::ZERO);
        assert_eq!(nodes[1].velocity, Vec2::ZERO);
    }

    #[test]
    fn overlapping_nodes_get_pushed_apart() {
        let points = vec![vec2(0.0, 0.0), vec2(4.0, 0.0)];
        let params = CollideParams {
            strength: 0.7,
            radius: 5.0,
            iterations: 1,
        };
        let tree = QuadCell::build(&points).unwrap();
        let mut impulses = vec![Vec2::ZERO; 2];

        accumulate_collision_pairs(&tree, &tree, true, &points, params, &mut impulses);

        assert!(impulses[0].x < 0.0);
        assert!(impulses[1].x > 0.0);
        assert_eq!(impulses[0], -impulses[1]);
    }

    #[test]
    fn separated_nodes_do_not_collide() {
        let points = vec![vec2(0.0, 0.0), vec2(40.0, 0.0)];
        let params = CollideParams {
            strength: 0.7,
            radius: 5.0,
            iterations: 1,
        };
        let tree = QuadCell::build(&points).unwrap();
        let mut impulses = vec![Vec2::ZERO; 2];

        accumulate_collision_pairs(&tree, &tree, true, &points, params, &mut impulses);

        assert_eq!(impulses[0], Vec2::ZERO);
        assert_eq!(impulses[1], Vec2::ZERO);
    }

    #[test]
    fn center_translation_moves_the_mean_onto_the_target() {
        let mut nodes = vec![
            free_node("a", 0.0, 0.0),
            free_node("b", 10.0, 0.0),
            free_node("c", 5.0, 12.0),
        ];

        apply_center(&mut nodes, vec2(100.0, 100.0));

        let mean = (nodes[0].position + nodes[1].position + nodes[2].position) / 3.0;
        assert!((mean - vec2(100.0, 100.0)).length() < 1e-3);
        // relative geometry is preserved
        assert_eq!(nodes[1].position - nodes[0].position, vec2(10.0, 0.0));
    }

    #[test]
    fn axis_pull_points_toward_the_target() {
        let mut nodes = vec![free_node("a", 10.0, 80.0)];
        apply_axis_x(
            &mut nodes,
            AxisParams {
                strength: 0.1,
                target: 50.0,
            },
            1.0,
        );
        apply_axis_y(
            &mut nodes,
            AxisParams {
                strength: 0.1,
                target: 50.0,
            },
            1.0,
        );

        assert!(nodes[0].velocity.x > 0.0);
        assert!(nodes[0].velocity.y < 0.0);
    }
}
