//! Cross-run co-occurrence memory.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{Assignment, GroupId, PlayerId};

/// What happens once more runs than the memory horizon have been folded in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizonPolicy {
    /// Clear every counter and drop the run that overflowed the horizon.
    ///
    /// Produces a sawtooth: memory grows for `H` runs, then starts from
    /// zero again.
    #[default]
    HardReset,
    /// Evict the oldest retained run, keeping exactly the last `H` runs.
    SlidingWindow,
}

/// Result of folding one run into the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldOutcome {
    /// Counters were incremented.
    Folded,
    /// Counters were incremented and the oldest run evicted.
    FoldedWithEviction,
    /// The horizon overflowed: all counters were cleared and the run dropped.
    Reset,
    /// Horizon 0: nothing is remembered.
    Skipped,
}

/// Unordered subset of a group's members, in ascending player order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Subset {
    Pair([PlayerId; 2]),
    Triple([PlayerId; 3]),
    Quad([PlayerId; 4]),
}

/// Calls `f` for every 2-, 3- and 4-subset of `members`.
pub(crate) fn visit_subsets(members: &[PlayerId], mut f: impl FnMut(Subset)) {
    let mut m = members.to_vec();
    m.sort_unstable();
    let n = m.len();

    for i in 0..n {
        for j in i + 1..n {
            f(Subset::Pair([m[i], m[j]]));
            for k in j + 1..n {
                f(Subset::Triple([m[i], m[j], m[k]]));
                for l in k + 1..n {
                    f(Subset::Quad([m[i], m[j], m[k], m[l]]));
                }
            }
        }
    }
}

/// Repetition statistics accumulated over completed runs.
///
/// Tracks how often each player visited each group and how often each
/// pair, triple and quadruple of players shared a group. A memory
/// horizon bounds how many runs are retained.
///
/// Counts are plain integers; the evaluator applies weights at scoring time.
///
/// # Examples
///
/// ```
/// use u_draw::history::{FoldOutcome, HistoryStore, HorizonPolicy};
/// use u_draw::model::Assignment;
///
/// let mut history = HistoryStore::new(4, 2, Some(1), HorizonPolicy::HardReset);
/// let run = Assignment::from_groups(vec![vec![0, 2], vec![1, 3]]);
///
/// assert_eq!(history.fold(&run), FoldOutcome::Folded);
/// assert_eq!(history.pair_count(2, 0), 1);
/// assert_eq!(history.fold(&run), FoldOutcome::Reset);
/// assert!(history.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct HistoryStore {
    n_groups: usize,
    horizon: Option<usize>,
    policy: HorizonPolicy,
    /// Flat `player * n_groups + group` visit counts.
    group_counts: Vec<u32>,
    pairs: HashMap<[PlayerId; 2], u32>,
    triples: HashMap<[PlayerId; 3], u32>,
    quads: HashMap<[PlayerId; 4], u32>,
    /// Runs retained since the last reset (sliding window keeps the runs).
    window: VecDeque<Assignment>,
    retained: usize,
    resets: usize,
}

impl HistoryStore {
    /// Creates an empty store.
    ///
    /// `horizon = None` accumulates for the whole scenario;
    /// `Some(0)` remembers nothing.
    pub fn new(
        n_players: usize,
        n_groups: usize,
        horizon: Option<usize>,
        policy: HorizonPolicy,
    ) -> Self {
        Self {
            n_groups,
            horizon,
            policy,
            group_counts: vec![0; n_players * n_groups],
            pairs: HashMap::new(),
            triples: HashMap::new(),
            quads: HashMap::new(),
            window: VecDeque::new(),
            retained: 0,
            resets: 0,
        }
    }

    /// Store with no horizon: every folded run is retained.
    pub fn unbounded(n_players: usize, n_groups: usize) -> Self {
        Self::new(n_players, n_groups, None, HorizonPolicy::HardReset)
    }

    pub fn horizon(&self) -> Option<usize> {
        self.horizon
    }

    pub fn policy(&self) -> HorizonPolicy {
        self.policy
    }

    /// Runs currently contributing to the counters.
    pub fn retained_runs(&self) -> usize {
        self.retained
    }

    /// Number of hard resets performed so far.
    pub fn resets(&self) -> usize {
        self.resets
    }

    pub fn is_empty(&self) -> bool {
        self.retained == 0
    }

    pub fn group_count(&self, player: PlayerId, group: GroupId) -> u32 {
        self.group_counts[player * self.n_groups + group]
    }

    /// Times `a` and `b` shared a group. Argument order is irrelevant.
    pub fn pair_count(&self, a: PlayerId, b: PlayerId) -> u32 {
        let mut key = [a, b];
        key.sort_unstable();
        self.pair_key(&key)
    }

    pub fn triple_count(&self, mut players: [PlayerId; 3]) -> u32 {
        players.sort_unstable();
        self.triple_key(&players)
    }

    pub fn quad_count(&self, mut players: [PlayerId; 4]) -> u32 {
        players.sort_unstable();
        self.quad_key(&players)
    }

    pub(crate) fn pair_key(&self, key: &[PlayerId; 2]) -> u32 {
        self.pairs.get(key).copied().unwrap_or(0)
    }

    pub(crate) fn triple_key(&self, key: &[PlayerId; 3]) -> u32 {
        self.triples.get(key).copied().unwrap_or(0)
    }

    pub(crate) fn quad_key(&self, key: &[PlayerId; 4]) -> u32 {
        self.quads.get(key).copied().unwrap_or(0)
    }

    /// Folds a completed run into the counters, honoring the horizon.
    pub fn fold(&mut self, assignment: &Assignment) -> FoldOutcome {
        let Some(horizon) = self.horizon else {
            self.add(assignment);
            return FoldOutcome::Folded;
        };
        if horizon == 0 {
            return FoldOutcome::Skipped;
        }

        match self.policy {
            HorizonPolicy::HardReset => {
                if self.retained + 1 > horizon {
                    self.clear();
                    self.resets += 1;
                    debug!(event = "history_reset", horizon, resets = self.resets);
                    FoldOutcome::Reset
                } else {
                    self.add(assignment);
                    FoldOutcome::Folded
                }
            }
            HorizonPolicy::SlidingWindow => {
                self.add(assignment);
                self.window.push_back(assignment.clone());
                if self.window.len() > horizon {
                    if let Some(oldest) = self.window.pop_front() {
                        self.remove(&oldest);
                    }
                    FoldOutcome::FoldedWithEviction
                } else {
                    FoldOutcome::Folded
                }
            }
        }
    }

    /// Zeroes every counter.
    pub fn clear(&mut self) {
        self.group_counts.fill(0);
        self.pairs.clear();
        self.triples.clear();
        self.quads.clear();
        self.window.clear();
        self.retained = 0;
    }

    fn add(&mut self, assignment: &Assignment) {
        for (g, members) in assignment.iter() {
            for &p in members {
                self.group_counts[p * self.n_groups + g] += 1;
            }
            visit_subsets(members, |subset| match subset {
                Subset::Pair(k) => *self.pairs.entry(k).or_insert(0) += 1,
                Subset::Triple(k) => *self.triples.entry(k).or_insert(0) += 1,
                Subset::Quad(k) => *self.quads.entry(k).or_insert(0) += 1,
            });
        }
        self.retained += 1;
    }

    fn remove(&mut self, assignment: &Assignment) {
        for (g, members) in assignment.iter() {
            for &p in members {
                let c = &mut self.group_counts[p * self.n_groups + g];
                *c = c.saturating_sub(1);
            }
            visit_subsets(members, |subset| match subset {
                Subset::Pair(k) => decrement(&mut self.pairs, k),
                Subset::Triple(k) => decrement(&mut self.triples, k),
                Subset::Quad(k) => decrement(&mut self.quads, k),
            });
        }
        self.retained = self.retained.saturating_sub(1);
    }
}

fn decrement<K: std::hash::Hash + Eq>(map: &mut HashMap<K, u32>, key: K) {
    if let Some(c) = map.get_mut(&key) {
        *c -= 1;
        if *c == 0 {
            map.remove(&key);
        }
    }
}
