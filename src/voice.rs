//! `RobotVoice`: grammar, baker and assembler wired together.

use rand::Rng;
use serde::Serialize;
use tracing::info;

use crate::bake::{self, BakedWord, ParameterBaker};
use crate::config::VoiceConfig;
use crate::context::GenerationContext;
use crate::error::VoiceResult;
use crate::grammar::Grammar;
use crate::render::Assembler;
use crate::symbol::Word;
use crate::synth::{Sfxr, Synthesizer};

/// One fully rendered utterance.
#[derive(Debug, Clone, Serialize)]
pub struct Utterance {
    pub words: Vec<Word>,
    pub baked: Vec<BakedWord>,
    #[serde(skip)]
    pub wav: Vec<u8>,
}

/// Runs the three stages against one [`GenerationContext`].
pub struct RobotVoice<S: Synthesizer = Sfxr> {
    grammar: Grammar,
    baker: ParameterBaker,
    assembler: Assembler<S>,
    ctx: GenerationContext,
}

impl RobotVoice<Sfxr> {
    /// Build from config with the bundled synthesizer.
    ///
    /// A configured seed drives the context; the synthesizer's noise seed is
    /// drawn from the context, so the two streams never run in lockstep.
    pub fn from_config(config: &VoiceConfig) -> VoiceResult<Self> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        Ok(Self::seeded_with(config, seed))
    }

    /// Default config with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self::seeded_with(&VoiceConfig::default(), seed)
    }

    fn seeded_with(config: &VoiceConfig, seed: u64) -> Self {
        let mut ctx = GenerationContext::seeded(seed);
        let synth = Sfxr::new(ctx.rng().gen());
        Self::with_synth(config, synth, ctx)
    }
}

impl<S: Synthesizer> RobotVoice<S> {
    pub fn with_synth(config: &VoiceConfig, synth: S, ctx: GenerationContext) -> Self {
        Self {
            grammar: Grammar::from_config(config),
            baker: ParameterBaker::from_config(config),
            assembler: Assembler::from_config(synth, config),
            ctx,
        }
    }

    pub fn baker(&self) -> &ParameterBaker {
        &self.baker
    }

    pub fn sample_rate(&self) -> u32 {
        self.assembler.sample_rate()
    }

    /// Stage 1: a fresh word sequence.
    pub fn generate(&mut self) -> VoiceResult<Vec<Word>> {
        self.grammar.generate(&mut self.ctx)
    }

    /// Stage 2: bake a word sequence.
    pub fn bake_sequence(&mut self, words: &[Word]) -> VoiceResult<Vec<BakedWord>> {
        bake::bake_sequence(words, &self.baker, &mut self.ctx)
    }

    /// Stage 3: render a baked sequence to WAV bytes.
    pub fn render(&mut self, baked: &[BakedWord]) -> VoiceResult<Vec<u8>> {
        self.assembler.render(baked)
    }

    /// Bake and render an existing word sequence.
    pub fn voice_words(&mut self, words: Vec<Word>) -> VoiceResult<Utterance> {
        let baked = self.bake_sequence(&words)?;
        let wav = self.render(&baked)?;
        info!(
            words = words.len(),
            text = %crate::symbol::format_words(&words),
            bytes = wav.len(),
            "utterance rendered"
        );
        Ok(Utterance { words, baked, wav })
    }

    /// All three stages.
    pub fn speak(&mut self) -> VoiceResult<Utterance> {
        let words = self.generate()?;
        self.voice_words(words)
    }
}
