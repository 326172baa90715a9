//! Placeholder result generator used until a real clustering engine is wired in.

use model_types::{ResultGenerator, ResultSet};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

const MAX_CLUSTERS: usize = 15;
const MAX_OCCURRENCES: u32 = 1000;
const MAX_MEMBERS: usize = 6;
const TOKEN_LEN: usize = 10;

/// Random clusters: 1-15 clusters, 1-1000 occurrences each, 1-6 members of ten
/// uppercase letters.
pub struct RandomResultGenerator {
    rng: Mutex<StdRng>,
}

impl RandomResultGenerator {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Reproducible output for a fixed seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn token(rng: &mut StdRng) -> String {
        (0..TOKEN_LEN)
            .map(|_| rng.gen_range(b'A'..=b'Z') as char)
            .collect()
    }
}

impl Default for RandomResultGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultGenerator for RandomResultGenerator {
    fn generate(&self, model_id: &str) -> ResultSet {
        let mut guard = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        let rng: &mut StdRng = &mut guard;
        let count = rng.gen_range(1..=MAX_CLUSTERS);
        let groups: Vec<(u32, Vec<String>)> = (0..count)
            .map(|_| {
                let occurrences = rng.gen_range(1..=MAX_OCCURRENCES);
                let members = (0..rng.gen_range(1..=MAX_MEMBERS))
                    .map(|_| Self::token(rng))
                    .collect();
                (occurrences, members)
            })
            .collect();
        tracing::debug!(model_id = %model_id, clusters = count, "generated placeholder results");
        ResultSet::from_groups(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_respects_cluster_invariants() {
        let generator = RandomResultGenerator::with_seed(5);
        for _ in 0..50 {
            let rs = generator.generate("m");
            assert!((1..=MAX_CLUSTERS).contains(&rs.cluster_count()));
            for (idx, c) in rs.clusters().iter().enumerate() {
                assert_eq!(c.cluster_label as usize, idx);
                assert!((1..=MAX_OCCURRENCES).contains(&c.occurrences));
                assert!((1..=MAX_MEMBERS).contains(&c.members.len()));
                for m in &c.members {
                    assert_eq!(m.len(), TOKEN_LEN);
                    assert!(m.bytes().all(|b| b.is_ascii_uppercase()));
                }
            }
        }
    }

    #[test]
    fn same_seed_same_output() {
        let a = RandomResultGenerator::with_seed(42).generate("m");
        let b = RandomResultGenerator::with_seed(42).generate("m");
        assert_eq!(a, b);
    }
}
