use crate::game::catalog::{ships, systems};
use crate::game::constants::time;
use crate::game::game_loop::GameLoopConfig;
use crate::game::state::WorldOptions;

/// Runner configuration
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Simulation ticks per wall-clock second
    pub tick_rate: u32,
    /// Largest frame step a single tick may advance
    pub max_frame_step: f32,
    /// RNG seed; random when unset
    pub seed: Option<u64>,
    /// Index into the system catalog
    pub start_system: usize,
    pub start_ship: String,
    pub starting_credits: u64,
    /// Stop after this many seconds; run until Ctrl+C when unset
    pub run_seconds: Option<u64>,
    /// Let the built-in pilot fly the ship
    pub autopilot: bool,
    /// Seconds between stats log lines
    pub stats_interval_secs: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        let world = WorldOptions::default();
        Self {
            tick_rate: time::FRAME_RATE,
            max_frame_step: time::MAX_FRAME_STEP,
            seed: world.seed,
            start_system: world.start_system,
            start_ship: world.start_ship,
            starting_credits: world.starting_credits,
            run_seconds: None,
            autopilot: true,
            stats_interval_secs: 10,
        }
    }
}

impl SimConfig {
    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        let mut config = Self::default();

        if let Ok(rate) = std::env::var("TICK_RATE") {
            if let Ok(parsed) = rate.parse::<u32>() {
                if parsed > 0 && parsed <= 1000 {
                    config.tick_rate = parsed;
                } else {
                    tracing::warn!("TICK_RATE must be 1-1000, using default");
                }
            } else {
                tracing::warn!("Invalid TICK_RATE '{}', using default", rate);
            }
        }

        if let Ok(step) = std::env::var("MAX_FRAME_STEP") {
            match step.parse::<f32>() {
                Ok(parsed) if parsed.is_finite() && parsed > 0.0 => config.max_frame_step = parsed,
                Ok(_) => tracing::warn!("MAX_FRAME_STEP must be > 0, using default"),
                Err(_) => tracing::warn!("Invalid MAX_FRAME_STEP '{}', using default", step),
            }
        }

        if let Ok(seed) = std::env::var("SIM_SEED") {
            if let Ok(parsed) = seed.parse::<u64>() {
                config.seed = Some(parsed);
            } else {
                tracing::warn!("Invalid SIM_SEED '{}', using random seed", seed);
            }
        }

        if let Ok(system) = std::env::var("START_SYSTEM") {
            if let Ok(parsed) = system.parse::<usize>() {
                if parsed < systems::SYSTEMS.len() {
                    config.start_system = parsed;
                } else {
                    tracing::warn!(
                        "START_SYSTEM must be below {}, using default",
                        systems::SYSTEMS.len()
                    );
                }
            } else {
                tracing::warn!("Invalid START_SYSTEM '{}', using default", system);
            }
        }

        if let Ok(ship) = std::env::var("START_SHIP") {
            if ships::find(&ship).is_some() {
                config.start_ship = ship;
            } else {
                tracing::warn!("Unknown START_SHIP '{}', using default", ship);
            }
        }

        if let Ok(credits) = std::env::var("STARTING_CREDITS") {
            if let Ok(parsed) = credits.parse::<u64>() {
                config.starting_credits = parsed;
            } else {
                tracing::warn!("Invalid STARTING_CREDITS '{}', using default", credits);
            }
        }

        if let Ok(secs) = std::env::var("RUN_SECONDS") {
            if let Ok(parsed) = secs.parse::<u64>() {
                config.run_seconds = (parsed > 0).then_some(parsed);
            } else {
                tracing::warn!("Invalid RUN_SECONDS '{}', running until stopped", secs);
            }
        }

        if let Ok(flag) = std::env::var("AUTOPILOT") {
            match parse_flag(&flag) {
                Some(on) => config.autopilot = on,
                None => tracing::warn!("Invalid AUTOPILOT '{}', using default", flag),
            }
        }

        if let Ok(secs) = std::env::var("STATS_INTERVAL_SECS") {
            if let Ok(parsed) = secs.parse::<u64>() {
                if parsed > 0 {
                    config.stats_interval_secs = parsed;
                } else {
                    tracing::warn!("STATS_INTERVAL_SECS must be > 0, using default");
                }
            } else {
                tracing::warn!("Invalid STATS_INTERVAL_SECS '{}', using default", secs);
            }
        }

        config
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), String> {
        if self.tick_rate == 0 {
            return Err("tick_rate must be at least 1".to_string());
        }
        if !(self.max_frame_step.is_finite() && self.max_frame_step > 0.0) {
            return Err("max_frame_step must be a positive number".to_string());
        }
        if self.start_system >= systems::SYSTEMS.len() {
            return Err(format!("start_system {} does not exist", self.start_system));
        }
        if ships::find(&self.start_ship).is_none() {
            return Err(format!("start_ship '{}' is not a known hull", self.start_ship));
        }
        if self.stats_interval_secs == 0 {
            return Err("stats_interval_secs must be at least 1".to_string());
        }
        Ok(())
    }

    pub fn world_options(&self) -> WorldOptions {
        WorldOptions {
            seed: self.seed,
            start_system: self.start_system,
            start_ship: self.start_ship.clone(),
            starting_credits: self.starting_credits,
        }
    }

    pub fn loop_config(&self) -> GameLoopConfig {
        GameLoopConfig {
            max_frame_step: self.max_frame_step,
        }
    }

    /// Wall-clock milliseconds between ticks
    pub fn tick_interval_ms(&self) -> u64 {
        (1000 / self.tick_rate.max(1)).max(1) as u64
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimConfig::default();
        assert_eq!(config.tick_rate, 60);
        assert_eq!(config.max_frame_step, 2.0);
        assert_eq!(config.start_ship, ships::STARTER_SHIP);
        assert!(config.autopilot);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_or_default() {
        let config = SimConfig::load_or_default();
        assert!(config.tick_rate > 0);
        assert!(config.stats_interval_secs > 0);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = SimConfig::default();
        config.start_ship = "Titan".to_string();
        assert!(config.validate().is_err());

        let mut config = SimConfig::default();
        config.start_system = systems::SYSTEMS.len();
        assert!(config.validate().is_err());

        let mut config = SimConfig::default();
        config.max_frame_step = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_world_options_carry_overrides() {
        let config = SimConfig {
            seed: Some(77),
            starting_credits: 1234,
            ..Default::default()
        };
        let options = config.world_options();
        assert_eq!(options.seed, Some(77));
        assert_eq!(options.starting_credits, 1234);
        assert_eq!(config.tick_interval_ms(), 16);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" off "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
