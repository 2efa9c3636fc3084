//! Fixed-length action sequences for the evolutionary search.

use rand::Rng;
use rand_chacha::ChaCha20Rng;

/// An ordered sequence of action indices representing a multi-step plan.
/// Immutable after construction; mutation produces a new genome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genome {
    genes: Vec<usize>,
}

impl Genome {
    /// Uniformly random genome of the given length.
    pub fn random(length: usize, num_actions: usize, rng: &mut ChaCha20Rng) -> Self {
        let genes = (0..length).map(|_| rng.gen_range(0..num_actions)).collect();
        Self { genes }
    }

    pub fn from_genes(genes: Vec<usize>) -> Self {
        Self { genes }
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn genes(&self) -> &[usize] {
        &self.genes
    }

    /// First gene: the action a driver plays this turn when the genome is
    /// accepted.
    pub fn first(&self) -> Option<usize> {
        self.genes.first().copied()
    }

    pub fn contains(&self, action: usize) -> bool {
        self.genes.contains(&action)
    }

    /// Copy of this genome with exactly one gene overwritten.
    pub fn mutated(&self, position: usize, gene: usize) -> Genome {
        let mut genes = self.genes.clone();
        genes[position] = gene;
        Genome { genes }
    }

    /// Turn carry-over: drop the consumed first gene, shift the rest left,
    /// append a fresh random gene. Seeds the next turn's root genome.
    pub fn shifted(&self, num_actions: usize, rng: &mut ChaCha20Rng) -> Genome {
        let mut genes: Vec<usize> = self.genes[1..].to_vec();
        genes.push(rng.gen_range(0..num_actions));
        Genome { genes }
    }
}
