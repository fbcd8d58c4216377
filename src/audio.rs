//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Interceptor leaves the launcher
    Launch,
    /// Interceptor detonation or threat destroyed in the air
    Explosion,
    /// Threat reaches the ground
    GroundImpact,
    /// Mission accomplished
    Victory,
    /// Mission failed
    Defeat,
}

impl SoundEffect {
    /// Sound to play for a simulation event, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::ThreatSpawned { .. } => None,
            GameEvent::InterceptorLaunched { .. } => Some(SoundEffect::Launch),
            GameEvent::InterceptorDetonated { .. } | GameEvent::ThreatIntercepted { .. } => {
                Some(SoundEffect::Explosion)
            }
            GameEvent::GroundImpact { .. } => Some(SoundEffect::GroundImpact),
            GameEvent::MissionEnded { victory: true } => Some(SoundEffect::Victory),
            GameEvent::MissionEnded { victory: false } => Some(SoundEffect::Defeat),
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::SoundEffect;
    use crate::settings::Settings;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: settings.effective_volume(),
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Pick up volume/mute changes
        pub fn apply_settings(&mut self, settings: &Settings) {
            self.volume = settings.effective_volume();
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = self.volume;
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Launch => self.play_launch(ctx, vol),
                SoundEffect::Explosion => self.play_explosion(ctx, vol),
                SoundEffect::GroundImpact => self.play_ground_impact(ctx, vol),
                SoundEffect::Victory => self.play_victory(ctx, vol),
                SoundEffect::Defeat => self.play_defeat(ctx, vol),
            }
        }

        // === Sound generators ===

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Launch - rising hiss
        fn play_launch(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 300.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.15, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                .ok();
            osc.frequency().set_value_at_time(300.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(1200.0, t + 0.2)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.3).ok();
        }

        /// Airburst - boom with a crack on top
        fn play_explosion(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 100.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.4, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                .ok();
            osc.frequency().set_value_at_time(100.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(30.0, t + 0.4)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.5).ok();

            if let Some((osc2, gain2)) = self.create_osc(ctx, 1500.0, OscillatorType::Square) {
                gain2.gain().set_value_at_time(vol * 0.15, t).ok();
                gain2
                    .gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                    .ok();
                osc2.start().ok();
                osc2.stop_with_when(t + 0.15).ok();
            }
        }

        /// Ground impact - deep thud that lingers
        fn play_ground_impact(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();

            if let Some((osc, gain)) = self.create_osc(ctx, 80.0, OscillatorType::Sine) {
                gain.gain().set_value_at_time(vol * 0.6, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.6)
                    .ok();
                osc.frequency().set_value_at_time(80.0, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(25.0, t + 0.5)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.7).ok();
            }

            // Rumble
            if let Some((osc, gain)) = self.create_osc(ctx, 50.0, OscillatorType::Sawtooth) {
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.5)
                    .ok();
                osc.frequency().set_value_at_time(50.0, t).ok();
                osc.frequency().set_value_at_time(45.0, t + 0.1).ok();
                osc.frequency().set_value_at_time(55.0, t + 0.2).ok();
                osc.frequency().set_value_at_time(40.0, t + 0.3).ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.55).ok();
            }
        }

        /// Victory - triumphant fanfare
        fn play_victory(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [400.0, 500.0, 600.0, 800.0].iter().enumerate() {
                let delay = i as f64 * 0.1;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.3, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.5).ok();
                }
            }
        }

        /// Defeat - sad descending
        fn play_defeat(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
                let delay = i as f64 * 0.2;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.3, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.4).ok();
                }
            }
        }
    }
}
