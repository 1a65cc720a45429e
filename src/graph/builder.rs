// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Flat-record to event-graph conversion.
//!
//! Legacy generator records are parallel arrays: one slot per particle for
//! momentum, identity, status, and an inclusive index pair pointing at
//! either the particle's parents or its children. [`build_event`] turns
//! one such record into a [`GenEvent`], deduplicating shared parent sets
//! into single vertices.
//!
//! Relations travel in exactly one direction per build. Child pairs are
//! inverted into per-particle parent sets first, so after that point the
//! algorithm is the same for both directions: particles with identical
//! non-empty parent sets share one production vertex.
//!
//! # Example
//!
//! ```rust
//! use hepcodec::graph::{build_event, FlatArrays, Relations};
//!
//! # fn main() -> hepcodec::Result<()> {
//! // A 2 -> 2 record in the 1-based convention: particles 3 and 4 both
//! // point at parents (1, 2), so they come out of one shared vertex.
//! let arrays = FlatArrays {
//!     px: &[0.0, 0.0, 0.5, -0.5],
//!     py: &[0.0, 0.0, 0.0, 0.0],
//!     pz: &[7000.0, -7000.0, 3.0, -3.0],
//!     e: &[7000.0, 7000.0, 5.0, 5.0],
//!     m: &[0.938, 0.938, 0.0, 0.0],
//!     pid: &[2212, 2212, 1, -1],
//!     status: &[4, 4, 1, 1],
//!     positions: None,
//! };
//! let parents = [(0, 0), (0, 0), (1, 2), (1, 2)];
//! let event = build_event(1, &arrays, Relations::Parents(&parents), true)?;
//! assert_eq!(event.vertices_size(), 1);
//! assert_eq!(event.vertex(-1).unwrap().particles_in(), &[1, 2]);
//! # Ok(())
//! # }
//! ```

use super::range::{normalize, NormalizedRange, RawRange, SENTINEL};
use crate::core::{HepError, Result};
use crate::event::{FourVector, GenEvent, GenParticle, GenVertex};
use std::collections::BTreeMap;

/// Borrowed per-particle position arrays of a flat record.
#[derive(Debug, Clone, Copy)]
pub struct Positions<'a> {
    pub x: &'a [f64],
    pub y: &'a [f64],
    pub z: &'a [f64],
    pub t: &'a [f64],
}

/// Borrowed parallel arrays of a flat record, one slot per particle.
#[derive(Debug, Clone, Copy)]
pub struct FlatArrays<'a> {
    pub px: &'a [f64],
    pub py: &'a [f64],
    pub pz: &'a [f64],
    pub e: &'a [f64],
    pub m: &'a [f64],
    pub pid: &'a [i32],
    pub status: &'a [i32],
    pub positions: Option<Positions<'a>>,
}

/// Relation direction of a flat record.
///
/// A build consumes exactly one direction; holding the pairs inside the
/// variant makes "both at once" unrepresentable.
#[derive(Debug, Clone, Copy)]
pub enum Relations<'a> {
    /// Pair `i` points at the parents of particle `i`.
    Parents(&'a [RawRange]),
    /// Pair `i` points at the children of particle `i`. Inverted into
    /// parent sets before grouping.
    Children(&'a [RawRange]),
}

impl Relations<'_> {
    fn ranges(&self) -> &[RawRange] {
        match self {
            Relations::Parents(r) | Relations::Children(r) => r,
        }
    }
}

fn check_len(field: &str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(HepError::length_mismatch(field, expected, actual))
    }
}

/// Build a validated event graph from a flat record.
///
/// All ranges are validated through [`normalize`] before any graph node is
/// created, so a failing record produces no partial event. Vertex ids are
/// assigned in order of first discovery while scanning particles in input
/// order; each vertex inherits the position of its first outgoing particle
/// when positions are supplied.
pub fn build_event(
    event_number: i64,
    arrays: &FlatArrays<'_>,
    relations: Relations<'_>,
    one_based: bool,
) -> Result<GenEvent> {
    let n = arrays.px.len();
    check_len("py", n, arrays.py.len())?;
    check_len("pz", n, arrays.pz.len())?;
    check_len("e", n, arrays.e.len())?;
    check_len("m", n, arrays.m.len())?;
    check_len("pid", n, arrays.pid.len())?;
    check_len("status", n, arrays.status.len())?;
    check_len("relations", n, relations.ranges().len())?;
    if let Some(pos) = &arrays.positions {
        check_len("position.x", n, pos.x.len())?;
        check_len("position.y", n, pos.y.len())?;
        check_len("position.z", n, pos.z.len())?;
        check_len("position.t", n, pos.t.len())?;
    }

    let normalized: Vec<NormalizedRange> = relations
        .ranges()
        .iter()
        .map(|&r| normalize(r, n, one_based))
        .collect::<Result<_>>()?;

    // Per-particle parent index sets, 0-based and sorted. For the child
    // direction, invert: particle i with children [lo, hi] contributes i
    // to every parent set in that span. Accumulated sets can end up
    // non-contiguous.
    let mut parent_sets: Vec<Vec<usize>> = vec![Vec::new(); n];
    match relations {
        Relations::Parents(_) => {
            for (i, range) in normalized.iter().enumerate() {
                if let Some((lo, hi)) = *range {
                    parent_sets[i] = (lo..=hi).collect();
                }
            }
        }
        Relations::Children(_) => {
            for (i, range) in normalized.iter().enumerate() {
                if let Some((lo, hi)) = *range {
                    for set in parent_sets.iter_mut().take(hi + 1).skip(lo) {
                        set.push(i);
                    }
                }
            }
            for set in &mut parent_sets {
                set.sort_unstable();
                set.dedup();
            }
        }
    }

    let mut event = GenEvent::new();
    event.event_number = event_number;
    for i in 0..n {
        let momentum = FourVector::new(arrays.px[i], arrays.py[i], arrays.pz[i], arrays.e[i]);
        let mut particle = GenParticle::new(momentum, arrays.pid[i], arrays.status[i]);
        particle.set_generated_mass(arrays.m[i]);
        event.add_particle(particle);
    }

    // Group by parent set, first discovery order. An empty set means the
    // particle has no production vertex.
    let mut vertex_of: BTreeMap<&[usize], i32> = BTreeMap::new();
    for i in 0..n {
        let set = parent_sets[i].as_slice();
        if set.is_empty() {
            continue;
        }
        let vertex_id = match vertex_of.get(set) {
            Some(&v) => v,
            None => {
                let mut vertex = GenVertex::new();
                if let Some(pos) = &arrays.positions {
                    vertex.position = FourVector::new(pos.x[i], pos.y[i], pos.z[i], pos.t[i]);
                }
                let v = event.add_vertex(vertex);
                for &parent in set {
                    event.add_particle_in(v, parent as i32 + 1);
                }
                vertex_of.insert(set, v);
                v
            }
        };
        event.add_particle_out(vertex_id, i as i32 + 1);
    }

    Ok(event)
}

impl GenEvent {
    /// Build an event from legacy parallel arrays. Thin wrapper around
    /// [`build_event`].
    pub fn from_hepevt(
        event_number: i64,
        arrays: &FlatArrays<'_>,
        relations: Relations<'_>,
        one_based: bool,
    ) -> Result<GenEvent> {
        build_event(event_number, arrays, relations, one_based)
    }
}

/// Owned staging buffer for one flat record.
///
/// Readers that parse legacy listings keep one of these per reader and
/// refill it for every event, so capacity is reused across events instead
/// of reallocated. Mother pairs are stored as read (1-based with the
/// `(0, 0)` sentinel) and shifted during [`FlatRecordBuf::build`].
#[derive(Debug, Default)]
pub struct FlatRecordBuf {
    pub event_number: i64,
    px: Vec<f64>,
    py: Vec<f64>,
    pz: Vec<f64>,
    e: Vec<f64>,
    m: Vec<f64>,
    pid: Vec<i32>,
    status: Vec<i32>,
    mothers: Vec<RawRange>,
    x: Vec<f64>,
    y: Vec<f64>,
    z: Vec<f64>,
    t: Vec<f64>,
}

impl FlatRecordBuf {
    pub fn new() -> Self {
        FlatRecordBuf::default()
    }

    /// Forget the staged record but keep the allocations.
    pub fn clear(&mut self) {
        self.event_number = 0;
        self.px.clear();
        self.py.clear();
        self.pz.clear();
        self.e.clear();
        self.m.clear();
        self.pid.clear();
        self.status.clear();
        self.mothers.clear();
        self.x.clear();
        self.y.clear();
        self.z.clear();
        self.t.clear();
    }

    /// Grow the buffers once for an announced particle count.
    pub fn reserve(&mut self, n: usize) {
        self.px.reserve(n);
        self.py.reserve(n);
        self.pz.reserve(n);
        self.e.reserve(n);
        self.m.reserve(n);
        self.pid.reserve(n);
        self.status.reserve(n);
        self.mothers.reserve(n);
        self.x.reserve(n);
        self.y.reserve(n);
        self.z.reserve(n);
        self.t.reserve(n);
    }

    /// Stage one particle. `momentum` is `[px, py, pz, e, m]`, `position`
    /// is `[x, y, z, t]`.
    pub fn push(
        &mut self,
        status: i32,
        pid: i32,
        mothers: RawRange,
        momentum: [f64; 5],
        position: [f64; 4],
    ) {
        self.px.push(momentum[0]);
        self.py.push(momentum[1]);
        self.pz.push(momentum[2]);
        self.e.push(momentum[3]);
        self.m.push(momentum[4]);
        self.pid.push(pid);
        self.status.push(status);
        self.mothers.push(mothers);
        self.x.push(position[0]);
        self.y.push(position[1]);
        self.z.push(position[2]);
        self.t.push(position[3]);
    }

    /// Number of staged particles.
    pub fn len(&self) -> usize {
        self.px.len()
    }

    /// Check if nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.px.is_empty()
    }

    /// Run the staged record through [`build_event`], mothers as parents.
    pub fn build(&self, one_based: bool) -> Result<GenEvent> {
        let arrays = FlatArrays {
            px: &self.px,
            py: &self.py,
            pz: &self.pz,
            e: &self.e,
            m: &self.m,
            pid: &self.pid,
            status: &self.status,
            positions: Some(Positions {
                x: &self.x,
                y: &self.y,
                z: &self.z,
                t: &self.t,
            }),
        };
        build_event(self.event_number, &arrays, Relations::Parents(&self.mothers), one_based)
    }
}

/// The sentinel pair in the 1-based file convention.
pub const ONE_BASED_SENTINEL: RawRange = (SENTINEL + 1, SENTINEL + 1);

#[cfg(test)]
mod tests {
    use super::*;

    fn arrays4<'a>() -> FlatArrays<'a> {
        FlatArrays {
            px: &[0.0, 0.0, 1.0, -1.0],
            py: &[0.0, 0.0, 0.5, -0.5],
            pz: &[10.0, -10.0, 2.0, -2.0],
            e: &[10.0, 10.0, 3.0, 3.0],
            m: &[0.0, 0.0, 0.1, 0.1],
            pid: &[2212, 2212, 1, -1],
            status: &[4, 4, 1, 1],
            positions: None,
        }
    }

    #[test]
    fn test_parent_sets_share_one_vertex() {
        let parents = [(0, 0), (0, 0), (1, 2), (1, 2)];
        let evt = build_event(7, &arrays4(), Relations::Parents(&parents), true).expect("build");
        assert_eq!(evt.event_number, 7);
        assert_eq!(evt.particles_size(), 4);
        assert_eq!(evt.vertices_size(), 1);
        let v = evt.vertex(-1).expect("vertex");
        assert_eq!(v.particles_in(), &[1, 2]);
        assert_eq!(v.particles_out(), &[3, 4]);
    }

    #[test]
    fn test_distinct_parent_sets_get_distinct_vertices() {
        let parents = [(0, 0), (0, 0), (1, 1), (2, 2)];
        let evt = build_event(0, &arrays4(), Relations::Parents(&parents), true).expect("build");
        assert_eq!(evt.vertices_size(), 2);
        assert_eq!(evt.vertex(-1).expect("v1").particles_in(), &[1]);
        assert_eq!(evt.vertex(-2).expect("v2").particles_in(), &[2]);
    }

    #[test]
    fn test_children_direction_inverts() {
        // Particle 1 claims children 3..4; after inversion particles 3 and
        // 4 share the parent set {1} and one vertex.
        let children = [(3, 4), (0, 0), (0, 0), (0, 0)];
        let evt = build_event(0, &arrays4(), Relations::Children(&children), true).expect("build");
        assert_eq!(evt.vertices_size(), 1);
        let v = evt.vertex(-1).expect("vertex");
        assert_eq!(v.particles_in(), &[1]);
        assert_eq!(v.particles_out(), &[3, 4]);
    }

    #[test]
    fn test_children_direction_accumulates_non_contiguous_sets() {
        // Particles 1 and 2 both claim child 4; particle 4's parent set
        // becomes {1, 2} even though no single pair spelled it out.
        let children = [(4, 4), (4, 4), (0, 0), (0, 0)];
        let evt = build_event(0, &arrays4(), Relations::Children(&children), true).expect("build");
        assert_eq!(evt.vertices_size(), 1);
        let v = evt.vertex(-1).expect("vertex");
        assert_eq!(v.particles_in(), &[1, 2]);
        assert_eq!(v.particles_out(), &[4]);
    }

    #[test]
    fn test_inverted_range_builds_swapped() {
        let parents = [(0, 0), (0, 0), (2, 1), (0, 0)];
        let evt = build_event(0, &arrays4(), Relations::Parents(&parents), true).expect("build");
        let v = evt.vertex(-1).expect("vertex");
        assert_eq!(v.particles_in(), &[1, 2]);
    }

    #[test]
    fn test_out_of_range_aborts_whole_build() {
        let parents = [(0, 0), (0, 0), (1, 2), (4, 10)];
        let err = build_event(0, &arrays4(), Relations::Parents(&parents), true).unwrap_err();
        assert!(matches!(err, HepError::OutOfRange { .. }));
    }

    #[test]
    fn test_length_mismatch() {
        let mut arrays = arrays4();
        arrays.status = &[4, 4, 1];
        let parents = [(0, 0); 4];
        let err = build_event(0, &arrays, Relations::Parents(&parents), true).unwrap_err();
        assert!(matches!(
            err,
            HepError::LengthMismatch {
                expected: 4,
                actual: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_relations_length_mismatch() {
        let parents = [(0, 0); 3];
        let err = build_event(0, &arrays4(), Relations::Parents(&parents), true).unwrap_err();
        assert!(matches!(err, HepError::LengthMismatch { .. }));
    }

    #[test]
    fn test_vertex_position_from_first_outgoing() {
        let mut arrays = arrays4();
        let x = [0.0, 0.0, 1.5, 9.0];
        let y = [0.0; 4];
        let z = [0.0; 4];
        let t = [0.0, 0.0, 2.5, 9.0];
        arrays.positions = Some(Positions {
            x: &x,
            y: &y,
            z: &z,
            t: &t,
        });
        let parents = [(0, 0), (0, 0), (1, 2), (1, 2)];
        let evt = build_event(0, &arrays, Relations::Parents(&parents), true).expect("build");
        // Particle 3 (0-based index 2) discovered the vertex.
        let v = evt.vertex(-1).expect("vertex");
        assert_eq!(v.position.x, 1.5);
        assert_eq!(v.position.t, 2.5);
    }

    #[test]
    fn test_generated_mass_taken_from_record() {
        let parents = [(0, 0); 4];
        let evt = build_event(0, &arrays4(), Relations::Parents(&parents), true).expect("build");
        assert_eq!(evt.particle(3).expect("p3").generated_mass(), 0.1);
        assert!(evt.particle(3).expect("p3").is_generated_mass_set());
    }

    #[test]
    fn test_sentinel_only_record_has_no_vertices() {
        let parents = [(0, 0); 4];
        let evt = build_event(0, &arrays4(), Relations::Parents(&parents), true).expect("build");
        assert_eq!(evt.vertices_size(), 0);
        for p in evt.particles() {
            assert_eq!(p.production_vertex(), None);
            assert_eq!(p.end_vertex(), None);
        }
    }

    #[test]
    fn test_flat_record_buf_reuse() {
        let mut buf = FlatRecordBuf::new();
        buf.event_number = 1;
        buf.reserve(2);
        buf.push(4, 2212, (0, 0), [0.0, 0.0, 10.0, 10.0, 0.9], [0.0; 4]);
        buf.push(1, 22, (1, 1), [0.0, 0.0, 1.0, 1.0, 0.0], [0.0; 4]);
        assert_eq!(buf.len(), 2);

        let evt = buf.build(true).expect("build");
        assert_eq!(evt.event_number, 1);
        assert_eq!(evt.vertices_size(), 1);
        assert_eq!(evt.vertex(-1).expect("v").particles_in(), &[1]);

        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.event_number, 0);
    }

    #[test]
    fn test_from_hepevt_wrapper() {
        let parents = [(0, 0), (0, 0), (1, 2), (1, 2)];
        let evt =
            GenEvent::from_hepevt(3, &arrays4(), Relations::Parents(&parents), true).expect("build");
        assert_eq!(evt.event_number, 3);
        assert_eq!(evt.vertices_size(), 1);
    }
}
