//! Build set comparison
//!
//! Compares every build in an ordered history against every earlier build.
//! For `n` builds and `m` distinct artifact names this is `O(n² · m)`, which
//! is fine for histories of tens to low hundreds of builds. Each build's
//! totals are computed once up front; the pairwise work runs over a flat
//! list of `(later, earlier)` pairs in parallel and is reassembled in input
//! order, so the output is deterministic.

use crate::build::{Build, BuildMeta, Sizes};
use crate::delta::{size_deltas, ArtifactDelta, SizeDeltas};
use crate::filter::{ArtifactMatcher, FilterSet};
use crate::group::ArtifactGroup;
use crate::matrix::{ComparisonMatrix, MatrixBuilder};
use indexmap::{IndexMap, IndexSet};
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Artifact deltas for one pair of builds, keyed by artifact name
pub type ArtifactDeltas = IndexMap<String, ArtifactDelta>;

/// A build's changes relative to every earlier build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildDelta {
    /// Metadata of the later build
    pub meta: BuildMeta,
    /// `artifact_deltas[j]` compares this build against earlier build `j`
    pub artifact_deltas: Vec<ArtifactDeltas>,
    /// `total_deltas[j]` compares this build's totals against build `j`'s
    pub total_deltas: Vec<SizeDeltas>,
}

impl BuildDelta {
    /// Number of earlier builds this build was compared against
    pub fn comparisons(&self) -> usize {
        self.artifact_deltas.len()
    }

    /// Delta of one artifact against earlier build `earlier`
    pub fn artifact_delta(&self, earlier: usize, name: &str) -> Option<&ArtifactDelta> {
        self.artifact_deltas.get(earlier)?.get(name)
    }
}

/// Union of artifact names across builds, in first-seen order
///
/// # Examples
///
/// ```
/// use build_tracker::build::{Artifact, Build, BuildMeta};
/// use build_tracker::comparator::artifact_names;
///
/// let first = Build::new(BuildMeta::new("a", 1), vec![
///     Artifact::new("main.js", "1", [("stat", 1)]),
/// ])?;
/// let second = Build::new(BuildMeta::new("b", 2), vec![
///     Artifact::new("vendor.js", "2", [("stat", 1)]),
///     Artifact::new("main.js", "1", [("stat", 1)]),
/// ])?;
///
/// assert_eq!(artifact_names(&[first, second]), vec!["main.js", "vendor.js"]);
/// # Ok::<(), build_tracker::error::TrackerError>(())
/// ```
pub fn artifact_names(builds: &[Build]) -> Vec<String> {
    collect_names(builds, &FilterSet::default())
}

/// Compare every build against every earlier build
///
/// Returns one [`BuildDelta`] per input build, in input order.
pub fn compare_all(builds: &[Build]) -> Vec<BuildDelta> {
    BuildComparator::new(builds).compare_all()
}

/// Compares an ordered build history
pub struct BuildComparator<'a> {
    builds: &'a [Build],
    filters: FilterSet,
    artifact_names: Vec<String>,
    totals: Vec<Sizes>,
}

impl<'a> BuildComparator<'a> {
    /// Create a comparator over `builds` (oldest first)
    pub fn new(builds: &'a [Build]) -> Self {
        Self::with_filters(builds, FilterSet::default())
    }

    /// Create a comparator that ignores artifacts matched by `filters`
    ///
    /// Matched artifacts are left out of the artifact name union and their
    /// sizes are subtracted from every build's totals.
    pub fn with_filters(builds: &'a [Build], filters: FilterSet) -> Self {
        let artifact_names = collect_names(builds, &filters);
        let totals: Vec<Sizes> = builds
            .par_iter()
            .map(|build| {
                if filters.is_empty() {
                    build.totals().clone()
                } else {
                    build.totals_filtered(&filters)
                }
            })
            .collect();

        debug!(
            "Comparing {} builds with {} artifacts ({} filters)",
            builds.len(),
            artifact_names.len(),
            filters.len()
        );

        Self {
            builds,
            filters,
            artifact_names,
            totals,
        }
    }

    /// Builds being compared
    pub fn builds(&self) -> &'a [Build] {
        self.builds
    }

    /// Filters in effect
    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    /// Union of artifact names, in first-seen order
    pub fn artifact_names(&self) -> &[String] {
        &self.artifact_names
    }

    /// Totals of build `index`, with filters applied
    pub fn totals(&self, index: usize) -> Option<&Sizes> {
        self.totals.get(index)
    }

    /// Totals of every build, with filters applied
    pub fn all_totals(&self) -> &[Sizes] {
        &self.totals
    }

    /// Every `(later, earlier)` index pair, later-major then earlier in order
    pub fn pairs(&self) -> Vec<(usize, usize)> {
        (0..self.builds.len())
            .flat_map(|later| (0..later).map(move |earlier| (later, earlier)))
            .collect()
    }

    /// Compare build `later` against build `earlier`
    ///
    /// Returns a delta for every name in the artifact union plus the total
    /// deltas. Returns `None` if either index is out of range.
    pub fn compare_pair(&self, later: usize, earlier: usize) -> Option<(ArtifactDeltas, SizeDeltas)> {
        let base = self.builds.get(earlier)?;
        let compare = self.builds.get(later)?;

        let artifacts = self
            .artifact_names
            .iter()
            .map(|name| {
                let delta =
                    ArtifactDelta::between(name.as_str(), base.artifact(name), compare.artifact(name));
                (name.clone(), delta)
            })
            .collect();
        let totals = size_deltas(Some(&self.totals[earlier]), Some(&self.totals[later]));

        Some((artifacts, totals))
    }

    /// Compare every build against every earlier build
    ///
    /// Position 0 has no comparisons; position `i` has exactly `i`.
    /// Repeated calls return equal results.
    ///
    /// # Examples
    ///
    /// ```
    /// use build_tracker::build::{Artifact, Build, BuildMeta};
    /// use build_tracker::comparator::BuildComparator;
    ///
    /// let builds = vec![
    ///     Build::new(BuildMeta::new("a", 1), vec![
    ///         Artifact::new("tacos", "abc", [("stat", 123), ("gzip", 45)]),
    ///     ])?,
    ///     Build::new(BuildMeta::new("b", 2), vec![
    ///         Artifact::new("tacos", "abc", [("stat", 123), ("gzip", 45)]),
    ///         Artifact::new("burritos", "def", [("stat", 469), ("gzip", 93)]),
    ///     ])?,
    /// ];
    ///
    /// let deltas = BuildComparator::new(&builds).compare_all();
    /// assert_eq!(deltas[0].comparisons(), 0);
    ///
    /// let burritos = deltas[1].artifact_delta(0, "burritos").unwrap();
    /// assert_eq!(burritos.delta("stat"), 469);
    /// assert!(burritos.hash_changed);
    /// # Ok::<(), build_tracker::error::TrackerError>(())
    /// ```
    pub fn compare_all(&self) -> Vec<BuildDelta> {
        let pairs = self.pairs();
        debug!("Computing {} build comparisons", pairs.len());

        let compared: Vec<Option<(ArtifactDeltas, SizeDeltas)>> = pairs
            .par_iter()
            .map(|&(later, earlier)| self.compare_pair(later, earlier))
            .collect();

        let mut deltas: Vec<BuildDelta> = self
            .builds
            .iter()
            .enumerate()
            .map(|(index, build)| BuildDelta {
                meta: build.meta().clone(),
                artifact_deltas: Vec::with_capacity(index),
                total_deltas: Vec::with_capacity(index),
            })
            .collect();

        for ((later, _), (artifacts, totals)) in pairs.into_iter().zip(compared.into_iter().flatten())
        {
            deltas[later].artifact_deltas.push(artifacts);
            deltas[later].total_deltas.push(totals);
        }

        deltas
    }

    /// Summed sizes of a group's members in build `index`
    pub fn group_sizes(&self, index: usize, group: &ArtifactGroup) -> Option<Sizes> {
        self.builds
            .get(index)
            .map(|build| build.matched_sizes(group.matcher()))
    }

    /// Group deltas between build `later` and build `earlier`
    pub fn group_deltas(&self, later: usize, earlier: usize, group: &ArtifactGroup) -> Option<SizeDeltas> {
        let base = self.group_sizes(earlier, group)?;
        let compare = self.group_sizes(later, group)?;
        Some(size_deltas(Some(&base), Some(&compare)))
    }

    /// Build the render-ready comparison matrix
    pub fn to_matrix(&self) -> ComparisonMatrix {
        let deltas = self.compare_all();
        MatrixBuilder::new(self.builds, &self.totals, &self.artifact_names).build(&deltas)
    }
}

fn collect_names<M: ArtifactMatcher + ?Sized>(builds: &[Build], filters: &M) -> Vec<String> {
    let mut names: IndexSet<&str> = IndexSet::new();
    for build in builds {
        names.extend(build.artifact_names().filter(|name| !filters.matches(name)));
    }
    names.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::Artifact;
    use crate::delta::ArtifactStatus;

    fn build(revision: &str, timestamp: i64, artifacts: Vec<Artifact>) -> Build {
        Build::new(BuildMeta::new(revision, timestamp), artifacts).unwrap()
    }

    fn tacos() -> Artifact {
        Artifact::new("tacos", "abc", [("stat", 123), ("gzip", 45)])
    }

    fn burritos() -> Artifact {
        Artifact::new("burritos", "def", [("stat", 469), ("gzip", 93)])
    }

    fn history() -> Vec<Build> {
        vec![
            build("a", 1, vec![tacos()]),
            build("b", 2, vec![tacos(), burritos()]),
            build(
                "c",
                3,
                vec![
                    Artifact::new("burritos", "xyz", [("stat", 500), ("gzip", 100)]),
                    Artifact::new("churros", "ghi", [("stat", 10), ("gzip", 5)]),
                ],
            ),
        ]
    }

    #[test]
    fn test_compare_all_empty_history_returns_empty() {
        assert!(compare_all(&[]).is_empty());
    }

    #[test]
    fn test_compare_all_single_build_has_no_comparisons() {
        let builds = vec![build("a", 1, vec![tacos()])];
        let deltas = compare_all(&builds);
        assert_eq!(deltas.len(), 1);
        assert!(deltas[0].artifact_deltas.is_empty());
        assert!(deltas[0].total_deltas.is_empty());
        assert_eq!(deltas[0].meta.revision(), "a");
    }

    #[test]
    fn test_compare_all_added_artifact_scenario() {
        let builds = vec![
            build("a", 1, vec![tacos()]),
            build("b", 2, vec![tacos(), burritos()]),
        ];
        let deltas = compare_all(&builds);

        let tacos_delta = deltas[1].artifact_delta(0, "tacos").unwrap();
        assert_eq!(tacos_delta.delta("stat"), 0);
        assert_eq!(tacos_delta.delta("gzip"), 0);
        assert!(!tacos_delta.hash_changed);

        let burritos_delta = deltas[1].artifact_delta(0, "burritos").unwrap();
        assert_eq!(burritos_delta.delta("stat"), 469);
        assert_eq!(burritos_delta.delta("gzip"), 93);
        assert_eq!(burritos_delta.delta_ratio("stat"), 0.0);
        assert_eq!(burritos_delta.delta_ratio("gzip"), 0.0);
        assert!(burritos_delta.hash_changed);
    }

    #[test]
    fn test_compare_all_has_one_comparison_per_earlier_build() {
        let deltas = compare_all(&history());
        for (index, delta) in deltas.iter().enumerate() {
            assert_eq!(delta.artifact_deltas.len(), index);
            assert_eq!(delta.total_deltas.len(), index);
        }
    }

    #[test]
    fn test_compare_all_covers_full_artifact_union() {
        let deltas = compare_all(&history());
        let names: Vec<&String> = deltas[1].artifact_deltas[0].keys().collect();
        assert_eq!(names, vec!["tacos", "burritos", "churros"]);

        let churros = deltas[1].artifact_delta(0, "churros").unwrap();
        assert_eq!(churros.status, ArtifactStatus::Absent);
        assert_eq!(churros.delta("stat"), 0);
        assert!(churros.sizes.is_empty());
    }

    #[test]
    fn test_compare_all_removed_artifact() {
        let deltas = compare_all(&history());
        let tacos_delta = deltas[2].artifact_delta(1, "tacos").unwrap();
        assert_eq!(tacos_delta.status, ArtifactStatus::Removed);
        assert_eq!(tacos_delta.delta("stat"), -123);
        assert_eq!(tacos_delta.delta_ratio("stat"), 1.0);
        assert!(tacos_delta.hash_changed);
    }

    #[test]
    fn test_compare_all_total_deltas() {
        let deltas = compare_all(&history());
        // b (592 stat) vs a (123 stat)
        assert_eq!(deltas[1].total_deltas[0]["stat"].delta, 469);
        // c (510 stat) vs a (123 stat)
        assert_eq!(deltas[2].total_deltas[0]["stat"].delta, 387);
        // c (510 stat) vs b (592 stat)
        assert_eq!(deltas[2].total_deltas[1]["stat"].delta, -82);
    }

    #[test]
    fn test_compare_all_is_idempotent() {
        let builds = history();
        let comparator = BuildComparator::new(&builds);
        assert_eq!(comparator.compare_all(), comparator.compare_all());
        assert_eq!(compare_all(&builds), compare_all(&builds));
    }

    #[test]
    fn test_pairs_are_later_major_in_input_order() {
        let builds = history();
        let comparator = BuildComparator::new(&builds);
        assert_eq!(comparator.pairs(), vec![(1, 0), (2, 0), (2, 1)]);
    }

    #[test]
    fn test_compare_pair_out_of_range_is_none() {
        let builds = history();
        let comparator = BuildComparator::new(&builds);
        assert!(comparator.compare_pair(5, 0).is_none());
    }

    #[test]
    fn test_filters_remove_names_and_adjust_totals() {
        let builds = history();
        let filters = FilterSet::new(["^burritos$"]).unwrap();
        let comparator = BuildComparator::with_filters(&builds, filters);

        assert_eq!(comparator.artifact_names(), &["tacos", "churros"]);
        assert_eq!(comparator.totals(1).unwrap()["stat"], 123);

        let deltas = comparator.compare_all();
        assert!(deltas[1].artifact_delta(0, "burritos").is_none());
        assert_eq!(deltas[1].total_deltas[0]["stat"].delta, 0);
    }

    #[test]
    fn test_group_deltas_sum_members() {
        let builds = history();
        let comparator = BuildComparator::new(&builds);
        let group = ArtifactGroup::new(
            "food",
            crate::filter::NameMatcher::new(vec![], Some("^(tacos|burritos)$")).unwrap(),
            vec![],
        );

        assert_eq!(comparator.group_sizes(1, &group).unwrap()["stat"], 592);
        let deltas = comparator.group_deltas(2, 1, &group).unwrap();
        assert_eq!(deltas["stat"].delta, 500 - 592);
        assert!(comparator.group_sizes(9, &group).is_none());
    }
}
