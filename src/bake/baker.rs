//! Parameter baker: samples one concrete parameter set for a symbol.

use rand::Rng;

use crate::config::VoiceConfig;
use crate::context::GenerationContext;
use crate::error::{VoiceError, VoiceResult};
use crate::symbol::Symbol;

use super::instance::PlaybackInstance;
use super::params::{ParamKey, SynthParams};
use super::ranges::{ParameterRange, RangeCatalog, RangeDefinition};

/// Resolves symbols through a [`RangeCatalog`].
///
/// [`Symbol::Silence`] bakes to a wait; voiced symbols without a catalog
/// entry fail with `UnknownSymbol`.
#[derive(Debug, Clone)]
pub struct ParameterBaker {
    catalog: RangeCatalog,
    wait_ms: ParameterRange,
}

impl ParameterBaker {
    pub fn new(catalog: RangeCatalog, wait_ms: ParameterRange) -> Self {
        Self { catalog, wait_ms }
    }

    /// Built-in catalog with config overrides merged in.
    pub fn from_config(config: &VoiceConfig) -> Self {
        let mut catalog = RangeCatalog::builtin();
        catalog.merge(&config.symbols);
        Self::new(catalog, config.wait_ms)
    }

    pub fn catalog(&self) -> &RangeCatalog {
        &self.catalog
    }

    /// Range definition for `symbol`, if the catalog has one.
    pub fn range_for(&self, symbol: Symbol) -> Option<&RangeDefinition> {
        self.catalog.get(symbol)
    }

    /// Bake a fresh, independently randomized instance.
    ///
    /// Silence always bakes to a wait, even if the catalog has an entry for it.
    pub fn bake(&self, symbol: Symbol, ctx: &mut GenerationContext) -> VoiceResult<PlaybackInstance> {
        if symbol.is_silence() {
            return Ok(PlaybackInstance::Wait {
                duration_ms: self.wait_ms.sample(ctx.rng()),
            });
        }
        let Some(definition) = self.catalog.get(symbol) else {
            return Err(VoiceError::UnknownSymbol(symbol));
        };

        let mut params = SynthParams::new();
        if !definition.wave_shapes.is_empty() {
            let i = ctx.rng().gen_range(0..definition.wave_shapes.len());
            params.set(ParamKey::WaveType, definition.wave_shapes[i].index() as f64);
        }
        for (&key, value) in &definition.params {
            if key == ParamKey::WaveType && params.contains(ParamKey::WaveType) {
                continue;
            }
            params.set(key, value.resolve(ctx.rng()));
        }

        Ok(PlaybackInstance::Baked {
            symbol,
            params,
            id: ctx.mint_instance_id(),
        })
    }
}

impl Default for ParameterBaker {
    fn default() -> Self {
        Self::from_config(&VoiceConfig::default())
    }
}
