//! The layout engine proper: owns the graph store, the force parameter
//! registry, the cooling solver and the attribute filter, and exposes
//! the command surface callers drive it with. Rendering stays outside;
//! callers read node positions and visibility after each tick.

use glam::Vec2;
use tracing::debug;

use crate::dataset::{GraphStore, NodeRecord};
use crate::util::phyllotaxis_position;

mod filter;
mod interaction;
mod physics;
mod registry;

pub use filter::{ALL, FilterChange, FilterOptions, FilterUpdate, Selection, VisibilityMap};
pub use physics::{Phase, Tick};
pub use registry::{
    AxisForce, CenterForce, ChargeForce, CollideForce, ForceParameters, LinkForce, Viewport,
};

use filter::FilterEngine;
use physics::Simulation;
use registry::ForceRegistry;

pub struct Engine {
    store: GraphStore,
    registry: ForceRegistry,
    simulation: Simulation,
    filter: FilterEngine,
    viewport: Viewport,
}

impl Engine {
    /// Takes ownership of a loaded store and starts the solver hot, so
    /// the first `step` already moves the layout.
    pub fn new(store: GraphStore, parameters: ForceParameters, viewport: Viewport) -> Self {
        let registry = ForceRegistry::new(parameters, viewport, &store);
        let mut simulation = Simulation::new();
        simulation.reheat();
        Self {
            store,
            registry,
            simulation,
            filter: FilterEngine::default(),
            viewport,
        }
    }

    /// Advances the layout by one tick.
    pub fn step(&mut self) -> Tick {
        self.simulation
            .step(&mut self.store.nodes, self.registry.resolved())
    }

    pub fn nodes(&self) -> &[NodeRecord] {
        &self.store.nodes
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn parameters(&self) -> &ForceParameters {
        self.registry.parameters()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn alpha(&self) -> f32 {
        self.simulation.alpha()
    }

    pub fn phase(&self) -> Phase {
        self.simulation.phase()
    }

    /// Swaps in a new parameter table and reheats so the change shows.
    pub fn on_parameter_change(&mut self, parameters: ForceParameters) {
        self.registry.apply(parameters, self.viewport, &self.store);
        debug!(
            "force parameters applied: {} springs in the working set",
            self.registry.resolved().springs.len()
        );
        self.simulation.reheat();
    }

    /// Recomputes pixel targets for the new viewport and reheats.
    pub fn on_viewport_resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let parameters = *self.registry.parameters();
        self.registry.apply(parameters, viewport, &self.store);
        debug!("viewport resized to {}x{}", viewport.width, viewport.height);
        self.simulation.reheat();
    }

    /// Applies one dropdown change and reports what needs redrawing.
    pub fn on_filter_change(&mut self, change: FilterChange) -> FilterUpdate {
        let (city_options, region_options) =
            self.filter.apply(change, self.store.attribute_index());
        FilterUpdate {
            visibility: self.filter.visibility(&self.store),
            city_options,
            region_options,
        }
    }

    pub fn visibility(&self) -> VisibilityMap {
        self.filter.visibility(&self.store)
    }

    pub fn selection(&self) -> &Selection {
        self.filter.selection()
    }

    pub fn filter_options(&self) -> FilterOptions {
        let index = self.store.attribute_index();
        FilterOptions {
            states: index.states().to_vec(),
            cities: self.filter.city_options(index),
            regions: self.filter.region_options(index),
            vendors: index.vendors().to_vec(),
            kinds: index.kinds().to_vec(),
        }
    }

    /// Reseeds every node on the placement spiral, drops pins and
    /// filters, and restarts the cooldown. Parameters keep their
    /// current values.
    pub fn reset(&mut self) {
        for (index, node) in self.store.nodes.iter_mut().enumerate() {
            node.position = phyllotaxis_position(index);
            node.velocity = Vec2::ZERO;
            node.pinned = None;
        }
        self.filter = FilterEngine::default();
        self.simulation.reset();
    }

    pub fn stop(&mut self) {
        self.simulation.stop();
    }
}
