//! Generation context: seedable randomness and identity counters.
//!
//! Every pipeline stage receives `&mut GenerationContext` explicitly. There is
//! no process-wide counter or global RNG, so two contexts can run on separate
//! threads without sharing state, and a seeded context reproduces its output.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::symbol::Identity;

/// Randomness plus monotonic counters shared by one generation lineage.
#[derive(Debug, Clone)]
pub struct GenerationContext {
    rng: ChaCha8Rng,
    next_identity: u64,
    next_instance: u64,
}

impl GenerationContext {
    /// Create a deterministic context from a seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            next_identity: 1,
            next_instance: 1,
        }
    }

    /// Create a context seeded from the thread RNG.
    pub fn from_entropy() -> Self {
        Self::seeded(rand::random())
    }

    /// The random source used by every stage.
    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// Issue a new identity. Never repeats for the lifetime of this context.
    pub fn mint_identity(&mut self) -> Identity {
        let id = Identity(self.next_identity);
        self.next_identity += 1;
        id
    }

    /// Issue a new playback-instance id.
    pub fn mint_instance_id(&mut self) -> u64 {
        let id = self.next_instance;
        self.next_instance += 1;
        id
    }
}
