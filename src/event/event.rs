// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! The event graph: particles, vertices, and the event that owns them.
//!
//! Particles carry momentum and identity; vertices carry topology. Links
//! run both ways by id: a particle knows its production and end vertex, a
//! vertex knows its incoming and outgoing particles. The linking methods on
//! [`GenEvent`] keep the two sides consistent, so a particle is incoming at
//! most at one vertex and outgoing at most at one vertex at any time.
//!
//! Particle ids are positive and assigned in insertion order starting at 1.
//! Vertex ids are negative and assigned in insertion order starting at -1.
//! Id 0 never refers to a particle or vertex (it is the event's own slot in
//! the attribute container).

use super::attributes::{Attributes, AttributesView};
use super::fourvector::FourVector;
use super::runinfo::GenRunInfo;
use super::units::{LengthUnit, MomentumUnit};
use std::fmt::Write as _;

/// One particle of the event graph.
#[derive(Debug, Clone)]
pub struct GenParticle {
    id: i32,
    pub momentum: FourVector,
    pub pid: i32,
    pub status: i32,
    mass: Option<f64>,
    production_vertex: Option<i32>,
    end_vertex: Option<i32>,
}

impl GenParticle {
    /// Create an unattached particle. The id is assigned by
    /// [`GenEvent::add_particle`].
    pub fn new(momentum: FourVector, pid: i32, status: i32) -> Self {
        GenParticle {
            id: 0,
            momentum,
            pid,
            status,
            mass: None,
            production_vertex: None,
            end_vertex: None,
        }
    }

    /// Particle id, positive once attached to an event.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Generated mass: the stored value if set, otherwise the mass computed
    /// from the momentum.
    pub fn generated_mass(&self) -> f64 {
        self.mass.unwrap_or_else(|| self.momentum.m())
    }

    /// Store an explicit generated mass.
    pub fn set_generated_mass(&mut self, mass: f64) {
        self.mass = Some(mass);
    }

    /// Check if an explicit generated mass is stored.
    pub fn is_generated_mass_set(&self) -> bool {
        self.mass.is_some()
    }

    /// Id of the vertex this particle comes out of, if any.
    pub fn production_vertex(&self) -> Option<i32> {
        self.production_vertex
    }

    /// Id of the vertex this particle flows into, if any.
    pub fn end_vertex(&self) -> Option<i32> {
        self.end_vertex
    }
}

impl PartialEq for GenParticle {
    /// Physics equality: the stored-vs-computed distinction of the
    /// generated mass does not matter, only its value does.
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.momentum == other.momentum
            && self.pid == other.pid
            && self.status == other.status
            && self.generated_mass() == other.generated_mass()
            && self.production_vertex == other.production_vertex
            && self.end_vertex == other.end_vertex
    }
}

/// One interaction vertex of the event graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenVertex {
    id: i32,
    pub status: i32,
    pub position: FourVector,
    particles_in: Vec<i32>,
    particles_out: Vec<i32>,
}

impl GenVertex {
    /// Create an empty vertex. The id is assigned by
    /// [`GenEvent::add_vertex`].
    pub fn new() -> Self {
        GenVertex::default()
    }

    /// Vertex id, negative once attached to an event.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Ids of the incoming particles, in attach order.
    pub fn particles_in(&self) -> &[i32] {
        &self.particles_in
    }

    /// Ids of the outgoing particles, in attach order.
    pub fn particles_out(&self) -> &[i32] {
        &self.particles_out
    }

    /// True if the vertex has a position other than the origin.
    pub fn has_position(&self) -> bool {
        !self.position.is_zero()
    }
}

/// One generated event: graph, weights, units, and metadata.
#[derive(Debug, Clone)]
pub struct GenEvent {
    pub event_number: i64,
    momentum_unit: MomentumUnit,
    length_unit: LengthUnit,
    particles: Vec<GenParticle>,
    vertices: Vec<GenVertex>,
    pub weights: Vec<f64>,
    run_info: Option<GenRunInfo>,
    attributes: Attributes,
}

impl GenEvent {
    /// Create an empty event in GEV/MM units.
    pub fn new() -> Self {
        GenEvent::with_units(MomentumUnit::Gev, LengthUnit::Mm)
    }

    /// Create an empty event in the given units.
    pub fn with_units(momentum_unit: MomentumUnit, length_unit: LengthUnit) -> Self {
        GenEvent {
            event_number: 0,
            momentum_unit,
            length_unit,
            particles: Vec::new(),
            vertices: Vec::new(),
            weights: Vec::new(),
            run_info: None,
            attributes: Attributes::new(),
        }
    }

    /// Momentum unit of the stored four-momenta.
    pub fn momentum_unit(&self) -> MomentumUnit {
        self.momentum_unit
    }

    /// Length unit of the stored positions.
    pub fn length_unit(&self) -> LengthUnit {
        self.length_unit
    }

    /// Convert the event to new units, rescaling all stored momenta,
    /// generated masses, and vertex positions.
    pub fn set_units(&mut self, momentum_unit: MomentumUnit, length_unit: LengthUnit) {
        let pf = MomentumUnit::conversion_factor(self.momentum_unit, momentum_unit);
        if pf != 1.0 {
            for p in &mut self.particles {
                p.momentum.scale(pf);
                if let Some(m) = &mut p.mass {
                    *m *= pf;
                }
            }
        }
        let lf = LengthUnit::conversion_factor(self.length_unit, length_unit);
        if lf != 1.0 {
            for v in &mut self.vertices {
                v.position.scale(lf);
            }
        }
        self.momentum_unit = momentum_unit;
        self.length_unit = length_unit;
    }

    /// Attach a particle and return its assigned (positive) id.
    pub fn add_particle(&mut self, mut particle: GenParticle) -> i32 {
        let id = self.particles.len() as i32 + 1;
        particle.id = id;
        self.particles.push(particle);
        id
    }

    /// Attach a vertex and return its assigned (negative) id.
    pub fn add_vertex(&mut self, mut vertex: GenVertex) -> i32 {
        let id = -(self.vertices.len() as i32) - 1;
        vertex.id = id;
        self.vertices.push(vertex);
        id
    }

    /// Number of particles.
    pub fn particles_size(&self) -> usize {
        self.particles.len()
    }

    /// Number of vertices.
    pub fn vertices_size(&self) -> usize {
        self.vertices.len()
    }

    /// All particles, in id order.
    pub fn particles(&self) -> &[GenParticle] {
        &self.particles
    }

    /// All vertices, in discovery order (ids -1, -2, ...).
    pub fn vertices(&self) -> &[GenVertex] {
        &self.vertices
    }

    /// Look up a particle by id.
    pub fn particle(&self, id: i32) -> Option<&GenParticle> {
        self.particle_index(id).map(|i| &self.particles[i])
    }

    /// Mutable lookup of a particle by id. Momentum, identity, and mass are
    /// open for edit; graph links are not reachable through this.
    pub fn particle_mut(&mut self, id: i32) -> Option<&mut GenParticle> {
        self.particle_index(id).map(move |i| &mut self.particles[i])
    }

    /// Look up a vertex by id.
    pub fn vertex(&self, id: i32) -> Option<&GenVertex> {
        self.vertex_index(id).map(|i| &self.vertices[i])
    }

    /// Mutable lookup of a vertex by id.
    pub fn vertex_mut(&mut self, id: i32) -> Option<&mut GenVertex> {
        self.vertex_index(id).map(move |i| &mut self.vertices[i])
    }

    fn particle_index(&self, id: i32) -> Option<usize> {
        if id >= 1 && (id as usize) <= self.particles.len() {
            Some(id as usize - 1)
        } else {
            None
        }
    }

    fn vertex_index(&self, id: i32) -> Option<usize> {
        if id <= -1 && (-id as usize) <= self.vertices.len() {
            Some(-id as usize - 1)
        } else {
            None
        }
    }

    /// Attach `particle_id` as incoming at `vertex_id`.
    ///
    /// A particle flows into at most one vertex: if it is already incoming
    /// elsewhere it leaves that vertex first. Unknown ids are ignored.
    pub fn add_particle_in(&mut self, vertex_id: i32, particle_id: i32) {
        let (Some(vi), Some(pi)) = (self.vertex_index(vertex_id), self.particle_index(particle_id))
        else {
            return;
        };
        if let Some(old) = self.particles[pi].end_vertex {
            if old == vertex_id {
                return;
            }
            if let Some(oi) = self.vertex_index(old) {
                self.vertices[oi].particles_in.retain(|&p| p != particle_id);
            }
        }
        self.particles[pi].end_vertex = Some(vertex_id);
        self.vertices[vi].particles_in.push(particle_id);
    }

    /// Attach `particle_id` as outgoing at `vertex_id`.
    ///
    /// A particle comes out of at most one vertex: if it is already
    /// outgoing elsewhere it leaves that vertex first. Unknown ids are
    /// ignored.
    pub fn add_particle_out(&mut self, vertex_id: i32, particle_id: i32) {
        let (Some(vi), Some(pi)) = (self.vertex_index(vertex_id), self.particle_index(particle_id))
        else {
            return;
        };
        if let Some(old) = self.particles[pi].production_vertex {
            if old == vertex_id {
                return;
            }
            if let Some(oi) = self.vertex_index(old) {
                self.vertices[oi].particles_out.retain(|&p| p != particle_id);
            }
        }
        self.particles[pi].production_vertex = Some(vertex_id);
        self.vertices[vi].particles_out.push(particle_id);
    }

    /// Run metadata, if the event carries any.
    pub fn run_info(&self) -> Option<&GenRunInfo> {
        self.run_info.as_ref()
    }

    /// Mutable run metadata.
    pub fn run_info_mut(&mut self) -> Option<&mut GenRunInfo> {
        self.run_info.as_mut()
    }

    /// Attach or detach run metadata.
    pub fn set_run_info(&mut self, run_info: Option<GenRunInfo>) {
        self.run_info = run_info;
    }

    /// Full attribute container, all owners.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Mutable attribute container.
    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    /// Dict-like view over the event-level attributes (owner id 0).
    pub fn attributes_view(&mut self) -> AttributesView<'_> {
        self.attributes.view(0)
    }

    /// Human-readable listing of the full event graph, one row per
    /// particle, grouped under the vertices they attach to.
    pub fn listing(&self) -> String {
        let bar: String = "_".repeat(80);
        let mut out = String::new();
        let _ = writeln!(out, "{bar}");
        let _ = writeln!(out, "GenEvent: #{}", self.event_number);
        let _ = writeln!(
            out,
            " Momentum units: {} Position units: {}",
            self.momentum_unit.as_str(),
            self.length_unit.as_str()
        );
        let _ = writeln!(
            out,
            " Entries in this event: {} vertices, {} particles, {} weights",
            self.vertices.len(),
            self.particles.len(),
            self.weights.len()
        );
        let _ = writeln!(
            out,
            "        ID    PDG ID    ( px,       py,       pz,       E )    Stat ProdVtx"
        );
        let _ = writeln!(out, "{bar}");
        for v in &self.vertices {
            if v.has_position() {
                let p = v.position;
                let _ = writeln!(
                    out,
                    "Vtx: {:>5} stat: {:>3} (X,cT): {:+.2e},{:+.2e},{:+.2e},{:+.2e}",
                    v.id, v.status, p.x, p.y, p.z, p.t
                );
            } else {
                let _ = writeln!(out, "Vtx: {:>5} stat: {:>3} (X,cT): 0", v.id, v.status);
            }
            for &pid in &v.particles_in {
                if let Some(p) = self.particle(pid) {
                    out.push_str(&particle_row(" I:", p));
                }
            }
            for &pid in &v.particles_out {
                if let Some(p) = self.particle(pid) {
                    out.push_str(&particle_row(" O:", p));
                }
            }
        }
        let _ = writeln!(out, "{bar}");
        out
    }
}

fn particle_row(tag: &str, p: &GenParticle) -> String {
    let m = p.momentum;
    let prod = match p.production_vertex() {
        Some(v) => v.to_string(),
        None => String::new(),
    };
    format!(
        "{tag} {:>6} {:>9}    {:+.3e},{:+.3e},{:+.3e},{:+.3e} {:>5} {:>7}\n",
        p.id(),
        p.pid,
        m.x,
        m.y,
        m.z,
        m.t,
        p.status,
        prod
    )
}

impl Default for GenEvent {
    fn default() -> Self {
        GenEvent::new()
    }
}

impl PartialEq for GenEvent {
    fn eq(&self, other: &Self) -> bool {
        self.event_number == other.event_number
            && self.momentum_unit == other.momentum_unit
            && self.length_unit == other.length_unit
            && self.weights == other.weights
            && self.particles == other.particles
            && self.vertices == other.vertices
            && self.run_info == other.run_info
            && self.attributes == other.attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_body_decay() -> GenEvent {
        let mut evt = GenEvent::new();
        let parent = evt.add_particle(GenParticle::new(
            FourVector::new(0.0, 0.0, 0.0, 10.0),
            23,
            2,
        ));
        let a = evt.add_particle(GenParticle::new(FourVector::new(0.0, 0.0, 5.0, 5.0), 11, 1));
        let b = evt.add_particle(GenParticle::new(
            FourVector::new(0.0, 0.0, -5.0, 5.0),
            -11,
            1,
        ));
        let v = evt.add_vertex(GenVertex::new());
        evt.add_particle_in(v, parent);
        evt.add_particle_out(v, a);
        evt.add_particle_out(v, b);
        evt
    }

    #[test]
    fn test_id_assignment() {
        let evt = two_body_decay();
        assert_eq!(evt.particles()[0].id(), 1);
        assert_eq!(evt.particles()[2].id(), 3);
        assert_eq!(evt.vertices()[0].id(), -1);
    }

    #[test]
    fn test_linking_sets_both_sides() {
        let evt = two_body_decay();
        let v = evt.vertex(-1).expect("vertex");
        assert_eq!(v.particles_in(), &[1]);
        assert_eq!(v.particles_out(), &[2, 3]);
        assert_eq!(evt.particle(1).expect("p1").end_vertex(), Some(-1));
        assert_eq!(evt.particle(2).expect("p2").production_vertex(), Some(-1));
        assert_eq!(evt.particle(2).expect("p2").end_vertex(), None);
    }

    #[test]
    fn test_relinking_moves_particle() {
        let mut evt = two_body_decay();
        let v2 = evt.add_vertex(GenVertex::new());
        evt.add_particle_in(v2, 1);
        assert_eq!(evt.particle(1).expect("p1").end_vertex(), Some(-2));
        assert!(evt.vertex(-1).expect("v1").particles_in().is_empty());
        assert_eq!(evt.vertex(-2).expect("v2").particles_in(), &[1]);
    }

    #[test]
    fn test_repeated_attach_is_noop() {
        let mut evt = two_body_decay();
        evt.add_particle_in(-1, 1);
        evt.add_particle_in(-1, 1);
        assert_eq!(evt.vertex(-1).expect("v").particles_in(), &[1]);
    }

    #[test]
    fn test_unknown_ids_ignored() {
        let mut evt = two_body_decay();
        evt.add_particle_in(-9, 1);
        evt.add_particle_in(-1, 99);
        assert_eq!(evt.particle(1).expect("p1").end_vertex(), Some(-1));
        assert_eq!(evt.vertex(-1).expect("v").particles_in(), &[1]);
    }

    #[test]
    fn test_generated_mass_fallback() {
        let mut p = GenParticle::new(FourVector::new(0.0, 0.0, 3.0, 5.0), 2212, 1);
        assert!(!p.is_generated_mass_set());
        assert_eq!(p.generated_mass(), 4.0);
        p.set_generated_mass(3.9);
        assert!(p.is_generated_mass_set());
        assert_eq!(p.generated_mass(), 3.9);
    }

    #[test]
    fn test_set_units_rescales() {
        let mut evt = two_body_decay();
        evt.particle_mut(1).expect("p1").set_generated_mass(10.0);
        evt.vertex_mut(-1).expect("v").position = FourVector::new(1.0, 2.0, 3.0, 4.0);

        evt.set_units(MomentumUnit::Mev, LengthUnit::Cm);
        assert_eq!(evt.momentum_unit(), MomentumUnit::Mev);
        assert_eq!(evt.particle(1).expect("p1").momentum.e(), 10_000.0);
        assert_eq!(evt.particle(1).expect("p1").generated_mass(), 10_000.0);
        assert_eq!(
            evt.vertex(-1).expect("v").position,
            FourVector::new(0.1, 0.2, 0.3, 0.4)
        );

        // Converting back restores the original values.
        evt.set_units(MomentumUnit::Gev, LengthUnit::Mm);
        assert_eq!(evt.particle(1).expect("p1").momentum.e(), 10.0);
        assert!((evt.vertex(-1).expect("v").position.x - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_equality_structural() {
        let a = two_body_decay();
        let b = two_body_decay();
        assert_eq!(a, b);

        let mut c = two_body_decay();
        c.weights.push(1.0);
        assert_ne!(a, c);

        let mut d = two_body_decay();
        d.particle_mut(2).expect("p2").status = 2;
        assert_ne!(a, d);
    }

    #[test]
    fn test_equality_mass_fallback_matches_stored() {
        let a = two_body_decay();
        let mut b = two_body_decay();
        let computed = b.particle(1).expect("p1").momentum.m();
        b.particle_mut(1).expect("p1").set_generated_mass(computed);
        assert_eq!(a, b);
    }

    #[test]
    fn test_listing_shape() {
        let evt = two_body_decay();
        let listing = evt.listing();
        assert!(listing.contains("GenEvent: #0"));
        assert!(listing.contains("Momentum units: GEV Position units: MM"));
        assert!(listing.contains("1 vertices, 3 particles, 0 weights"));
        assert!(listing.contains("Vtx:    -1"));
        assert!(listing.contains(" I: "));
        assert!(listing.contains(" O: "));
    }

    #[test]
    fn test_event_attributes_view() {
        let mut evt = two_body_decay();
        evt.attributes_view()
            .set("signal_process_id", crate::event::Attribute::Int(42));
        assert_eq!(evt.attributes_view().len(), 1);
        assert_eq!(evt.attributes_view().names(), vec!["signal_process_id"]);
    }
}
