//! Identity registry: bounded per-symbol identity pools.

use std::collections::HashMap;

use rand::Rng;

use crate::context::GenerationContext;
use crate::symbol::{Identity, Symbol};

/// Maximum number of distinct identities issued per symbol in one generation.
pub const POOL_CAPACITY: usize = 3;

/// Per-symbol pools of previously issued identities.
///
/// Once a symbol's pool is full, further requests reuse a uniformly chosen
/// member, which bounds how many distinct timbres of one symbol appear in
/// a single utterance.
#[derive(Debug, Clone, Default)]
pub struct IdentityRegistry {
    pools: HashMap<Symbol, Vec<Identity>>,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a new identity while the pool has room, otherwise reuse one.
    pub fn get_or_create(&mut self, symbol: Symbol, ctx: &mut GenerationContext) -> Identity {
        let pool = self.pools.entry(symbol).or_default();
        if pool.len() < POOL_CAPACITY {
            let id = ctx.mint_identity();
            pool.push(id);
            id
        } else {
            let i = ctx.rng().gen_range(0..pool.len());
            pool[i]
        }
    }

    /// Identities issued so far for `symbol`.
    pub fn pool(&self, symbol: Symbol) -> &[Identity] {
        self.pools.get(&symbol).map(Vec::as_slice).unwrap_or(&[])
    }
}
