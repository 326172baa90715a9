//! Cluster output of a completed model job.

use serde::{Deserialize, Serialize};

/// One cluster: sequential label, occurrence count, and member tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    pub cluster_label: u32,
    pub occurrences: u32,
    pub members: Vec<String>,
}

/// Ordered clusters for one job. Labels run `0..n-1` in order.
/// Serialize-only: instances come from `from_groups`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResultSet {
    clusters: Vec<Cluster>,
}

impl ResultSet {
    /// Build a result set from `(occurrences, members)` pairs, assigning labels in order.
    ///
    /// Pairs with zero occurrences or no members are skipped so every kept cluster
    /// satisfies the non-empty invariant.
    pub fn from_groups<I>(groups: I) -> Self
    where
        I: IntoIterator<Item = (u32, Vec<String>)>,
    {
        let clusters = groups
            .into_iter()
            .filter(|(occurrences, members)| *occurrences > 0 && !members.is_empty())
            .enumerate()
            .map(|(idx, (occurrences, members))| Cluster {
                cluster_label: idx as u32,
                occurrences,
                members,
            })
            .collect();
        Self { clusters }
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Sum of occurrences across clusters.
    pub fn total_data_points(&self) -> u64 {
        self.clusters.iter().map(|c| c.occurrences as u64).sum()
    }
}
