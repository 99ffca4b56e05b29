use glam::{Vec2, vec2};

use crate::dataset::GraphStore;

/// Pixel size of the layout surface. Fractional force targets are resolved
/// against it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CenterForce {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChargeForce {
    pub enabled: bool,
    pub strength: f32,
    pub distance_min: f32,
    pub distance_max: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollideForce {
    pub enabled: bool,
    pub strength: f32,
    pub radius: f32,
    pub iterations: usize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisForce {
    pub enabled: bool,
    pub strength: f32,
    pub target: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkForce {
    pub enabled: bool,
    pub distance: f32,
    pub iterations: usize,
}

/// The full tunable force table. Disabling a force keeps its configured
/// magnitude; only the effective strength handed to the solver drops to
/// zero, so re-enabling restores the previous behavior.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceParameters {
    pub center: CenterForce,
    pub charge: ChargeForce,
    pub collide: CollideForce,
    pub axis_x: AxisForce,
    pub axis_y: AxisForce,
    pub link: LinkForce,
}

impl Default for ForceParameters {
    fn default() -> Self {
        Self {
            center: CenterForce { x: 0.5, y: 0.5 },
            charge: ChargeForce {
                enabled: true,
                strength: -30.0,
                distance_min: 1.0,
                distance_max: 2000.0,
            },
            collide: CollideForce {
                enabled: true,
                strength: 0.7,
                radius: 5.0,
                iterations: 1,
            },
            axis_x: AxisForce {
                enabled: false,
                strength: 0.1,
                target: 0.5,
            },
            axis_y: AxisForce {
                enabled: false,
                strength: 0.1,
                target: 0.5,
            },
            link: LinkForce {
                enabled: true,
                distance: 30.0,
                iterations: 1,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct ChargeParams {
    pub(super) strength: f32,
    pub(super) distance_min_sq: f32,
    pub(super) distance_max_sq: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct CollideParams {
    pub(super) strength: f32,
    pub(super) radius: f32,
    pub(super) iterations: usize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct AxisParams {
    pub(super) strength: f32,
    pub(super) target: f32,
}

/// One spring per link, weighted by endpoint degree so heavily connected
/// nodes move less than their leaf neighbors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct Spring {
    pub(super) source: usize,
    pub(super) target: usize,
    pub(super) strength: f32,
    pub(super) bias: f32,
}

/// Parameter table resolved into the solver's working form: pixel targets,
/// squared distance clamps and the spring working set.
#[derive(Clone, Debug, PartialEq)]
pub(super) struct ResolvedForces {
    pub(super) center: Vec2,
    pub(super) charge: ChargeParams,
    pub(super) collide: CollideParams,
    pub(super) axis_x: AxisParams,
    pub(super) axis_y: AxisParams,
    pub(super) springs: Vec<Spring>,
    pub(super) link_distance: f32,
    pub(super) link_iterations: usize,
}

impl ForceParameters {
    pub(super) fn resolve(&self, viewport: Viewport, store: &GraphStore) -> ResolvedForces {
        ResolvedForces {
            center: vec2(
                viewport.width * self.center.x,
                viewport.height * self.center.y,
            ),
            charge: ChargeParams {
                strength: effective(self.charge.enabled, self.charge.strength),
                distance_min_sq: self.charge.distance_min * self.charge.distance_min,
                distance_max_sq: self.charge.distance_max * self.charge.distance_max,
            },
            collide: CollideParams {
                strength: effective(self.collide.enabled, self.collide.strength),
                radius: self.collide.radius,
                iterations: self.collide.iterations,
            },
            axis_x: AxisParams {
                strength: effective(self.axis_x.enabled, self.axis_x.strength),
                target: viewport.width * self.axis_x.target,
            },
            axis_y: AxisParams {
                strength: effective(self.axis_y.enabled, self.axis_y.strength),
                target: viewport.height * self.axis_y.target,
            },
            springs: build_springs(self.link, store),
            link_distance: self.link.distance,
            link_iterations: self.link.iterations,
        }
    }
}

fn effective(enabled: bool, strength: f32) -> f32 {
    if enabled { strength } else { 0.0 }
}

fn build_springs(link: LinkForce, store: &GraphStore) -> Vec<Spring> {
    if !link.enabled {
        return Vec::new();
    }
    store
        .edges
        .iter()
        .map(|edge| {
            let source_degree = store.degree(edge.source) as f32;
            let target_degree = store.degree(edge.target) as f32;
            Spring {
                source: edge.source,
                target: edge.target,
                strength: 1.0 / source_degree.min(target_degree),
                bias: source_degree / (source_degree + target_degree),
            }
        })
        .collect()
}

/// Holds the current parameter table alongside its resolved form and keeps
/// the two in sync. Callers reheat the solver after `apply`, otherwise a
/// settled layout would never show the change.
pub struct ForceRegistry {
    parameters: ForceParameters,
    resolved: ResolvedForces,
}

impl ForceRegistry {
    pub(super) fn new(parameters: ForceParameters, viewport: Viewport, store: &GraphStore) -> Self {
        Self {
            parameters,
            resolved: parameters.resolve(viewport, store),
        }
    }

    pub(super) fn apply(
        &mut self,
        parameters: ForceParameters,
        viewport: Viewport,
        store: &GraphStore,
    ) {
        self.parameters = parameters;
        self.resolved = parameters.resolve(viewport, store);
    }

    pub fn parameters(&self) -> &ForceParameters {
        &self.parameters
    }

    pub(super) fn resolved(&self) -> &ResolvedForces {
        &self.resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{self, RawDataset};

    fn chain_store() -> GraphStore {
        let raw = RawDataset::from_json_str(
            r#"{
                "nodes": [
                    {"id": "a", "state": "TN", "city": "c", "region": "r", "vendor": "v", "type": "t"},
                    {"id": "b", "state": "TN", "city": "c", "region": "r", "vendor": "v", "type": "t"},
                    {"id": "c", "state": "MA", "city": "c", "region": "r", "vendor": "v", "type": "t"}
                ],
                "links": [
                    {"source": "a", "target": "b"},
                    {"source": "b", "target": "c"}
                ]
            }"#,
        )
        .unwrap();
        dataset::load(raw).unwrap()
    }

    #[test]
    fn resolves_fractional_targets_to_pixels() {
        let store = chain_store();
        let resolved = ForceParameters::default().resolve(Viewport::new(900.0, 600.0), &store);

        assert_eq!(resolved.center, vec2(450.0, 300.0));
        assert_eq!(resolved.axis_x.target, 450.0);
        assert_eq!(resolved.axis_y.target, 300.0);
    }

    #[test]
    fn disabled_forces_resolve_to_zero_strength() {
        let store = chain_store();
        let mut parameters = ForceParameters::default();
        parameters.charge.enabled = false;
        parameters.collide.enabled = false;

        let resolved = parameters.resolve(Viewport::new(100.0, 100.0), &store);
        assert_eq!(resolved.charge.strength, 0.0);
        assert_eq!(resolved.collide.strength, 0.0);
        // axes default to disabled
        assert_eq!(resolved.axis_x.strength, 0.0);
        assert_eq!(resolved.axis_y.strength, 0.0);
    }

    #[test]
    fn springs_carry_degree_weights() {
        let store = chain_store();
        let resolved = ForceParameters::default().resolve(Viewport::new(100.0, 100.0), &store);

        // a-b: degrees 1 and 2; b-c: degrees 2 and 1
        assert_eq!(resolved.springs.len(), 2);
        assert_eq!(resolved.springs[0].strength, 1.0);
        assert_eq!(resolved.springs[0].bias, 1.0 / 3.0);
        assert_eq!(resolved.springs[1].strength, 1.0);
        assert_eq!(resolved.springs[1].bias, 2.0 / 3.0);
    }

    #[test]
    fn disabling_links_empties_the_working_set_only() {
        let store = chain_store();
        let mut parameters = ForceParameters::default();
        parameters.link.enabled = false;

        let resolved = parameters.resolve(Viewport::new(100.0, 100.0), &store);
        assert!(resolved.springs.is_empty());
        assert_eq!(store.edge_count(), 2);
    }

    #[test]
    fn reapplying_identical_parameters_is_idempotent() {
        let store = chain_store();
        let viewport = Viewport::new(640.0, 480.0);
        let parameters = ForceParameters::default();

        let mut registry = ForceRegistry::new(parameters, viewport, &store);
        let first = registry.resolved().clone();
        registry.apply(parameters, viewport, &store);

        assert_eq!(*registry.resolved(), first);
    }
}
