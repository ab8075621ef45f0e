//! Random failure: nodes are removed in a uniformly shuffled order.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::{Method, Ranker, Ranking};
use crate::graph::LabeledGraph;

/// Uniform random removal order.
///
/// Borrows the caller's RNG so one seed drives every random run of an
/// analysis. The order is drawn once; sequential mode does not reshuffle.
#[derive(Debug)]
pub struct RandomRanker<'r> {
    rng: &'r mut StdRng,
}

impl<'r> RandomRanker<'r> {
    #[must_use]
    pub fn new(rng: &'r mut StdRng) -> Self {
        Self { rng }
    }
}

impl Ranker for RandomRanker<'_> {
    fn method(&self) -> Method {
        Method::Random
    }

    fn rank(&mut self, graph: &LabeledGraph) -> Ranking {
        let mut order: Vec<_> = graph.node_indices().collect();
        order.shuffle(&mut *self.rng);
        Ranking::from_order(order)
    }

    fn refreshes(&self) -> bool {
        false
    }
}
