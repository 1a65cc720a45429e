// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use hepcodec::{FourVector, GenEvent, GenParticle, GenRunInfo, GenVertex, ToolInfo};

// ============================================================================
// Temp Files
// ============================================================================

/// Get a temporary directory for test files
pub fn temp_dir(tag: &str) -> PathBuf {
    let random = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let thread_id = format!("{:?}", std::thread::current().id());
    std::env::temp_dir().join(format!(
        "hepcodec_{}_test_{}_{}_{}",
        tag,
        std::process::id(),
        thread_id,
        random
    ))
}

/// Create a temporary file path with cleanup guard
pub fn temp_path(tag: &str, name: &str) -> (PathBuf, CleanupGuard) {
    let dir = temp_dir(tag);
    fs::create_dir_all(&dir).ok();
    let path = dir.join(name);
    let guard = CleanupGuard(dir);
    (path, guard)
}

/// Cleanup guard for test temporary files
#[derive(Debug)]
pub struct CleanupGuard(pub PathBuf);

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

// ============================================================================
// Event Fixtures
// ============================================================================

/// Drell-Yan-like chain: two beams annihilate into a Z which decays to a
/// lepton pair. Two vertices, five particles, one weight.
pub fn z_decay_event(event_number: i64) -> GenEvent {
    let mut event = GenEvent::new();
    event.event_number = event_number;
    event.weights = vec![1.0];

    let beam_a = event.add_particle(GenParticle::new(
        FourVector::new(0.0, 0.0, 7000.0, 7000.0),
        2212,
        4,
    ));
    let beam_b = event.add_particle(GenParticle::new(
        FourVector::new(0.0, 0.0, -7000.0, 7000.0),
        2212,
        4,
    ));
    let z = event.add_particle(GenParticle::new(FourVector::new(0.0, 0.0, 0.0, 91.2), 23, 2));
    let mu_minus = event.add_particle(GenParticle::new(
        FourVector::new(30.0, 20.0, 10.0, 45.6),
        13,
        1,
    ));
    let mu_plus = event.add_particle(GenParticle::new(
        FourVector::new(-30.0, -20.0, -10.0, 45.6),
        -13,
        1,
    ));

    let production = event.add_vertex(GenVertex::new());
    event.add_particle_in(production, beam_a);
    event.add_particle_in(production, beam_b);
    event.add_particle_out(production, z);

    let decay = event.add_vertex(GenVertex::new());
    event.vertex_mut(decay).expect("decay vertex").position = FourVector::new(0.1, 0.2, 0.3, 0.4);
    event.add_particle_in(decay, z);
    event.add_particle_out(decay, mu_minus);
    event.add_particle_out(decay, mu_plus);

    event
}

/// Run metadata with one tool and named weights.
pub fn sample_run_info() -> GenRunInfo {
    let mut info = GenRunInfo::new();
    info.tools.push(ToolInfo::new("toygen", "1.2", "test fixture"));
    info.set_weight_names(vec!["nominal".to_string()]);
    info
}

/// Assert two events have the same graph shape: counts, per-particle
/// identity/status, and per-vertex attachment lists.
pub fn assert_same_topology(a: &GenEvent, b: &GenEvent) {
    assert_eq!(a.particles_size(), b.particles_size(), "particle count");
    assert_eq!(a.vertices_size(), b.vertices_size(), "vertex count");
    for (pa, pb) in a.particles().iter().zip(b.particles().iter()) {
        assert_eq!(pa.id(), pb.id(), "particle id");
        assert_eq!(pa.pid, pb.pid, "pdg id of particle {}", pa.id());
        assert_eq!(pa.status, pb.status, "status of particle {}", pa.id());
        assert_eq!(
            pa.production_vertex(),
            pb.production_vertex(),
            "production vertex of particle {}",
            pa.id()
        );
        assert_eq!(
            pa.end_vertex(),
            pb.end_vertex(),
            "end vertex of particle {}",
            pa.id()
        );
    }
    for (va, vb) in a.vertices().iter().zip(b.vertices().iter()) {
        assert_eq!(va.id(), vb.id(), "vertex id");
        assert_eq!(va.particles_in(), vb.particles_in(), "incoming at {}", va.id());
        assert_eq!(
            va.particles_out(),
            vb.particles_out(),
            "outgoing at {}",
            va.id()
        );
    }
}
