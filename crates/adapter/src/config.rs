//! Run configuration for the headless driver
//!
//! Built in three layers: defaults, then environment variables, then
//! command-line flags. The result is validated before any session exists.
//!
//! | Variable | Flag | Meaning |
//! |----------|------|---------|
//! | `BLOCKFALL_PRESET` | `--preset` | `classic` (10x20) or `wide` (15x30) |
//! | `BLOCKFALL_WIDTH` | `--width` | board columns |
//! | `BLOCKFALL_HEIGHT` | `--height` | board rows |
//! | `BLOCKFALL_SPAWN_COLUMN` | `--spawn-column` | spawn anchor column |
//! | `BLOCKFALL_PLAYER` | `--player` | name submitted with the final score |
//! | `BLOCKFALL_SEED` | `--seed` | piece sequence seed |
//! | `BLOCKFALL_RANDOMIZER` | `--randomizer` | `uniform` or `bag` |
//! | `BLOCKFALL_RESET` | `--reset` | phase after reset: `running` or `not-started` |
//! | `BLOCKFALL_AUTOSTART` | `--no-autostart` | start the game as soon as the driver runs |
//! | `BLOCKFALL_OBSERVE_TICKS` | `--quiet-ticks` | emit an observation after every drop tick |
//!
//! A preset only sets the layout fields, so it is applied before the
//! individual dimension overrides in the environment. Flags apply in order.

use anyhow::{anyhow, bail, Context, Result};

use crate::core::{Randomizer, ResetPolicy, SessionConfig};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub session: SessionConfig,
    /// Start the game without waiting for a `start` command
    pub auto_start: bool,
    /// Emit an observation after every drop tick, not only after commands,
    /// settles and phase changes
    pub observe_every_tick: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::classic(),
            auto_start: true,
            observe_every_tick: true,
        }
    }
}

impl RunConfig {
    /// Defaults overridden by the process environment, then by `args`
    pub fn load(args: &[String]) -> Result<Self> {
        let mut config = Self::from_env()?;
        config.apply_args(args)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by `lookup`, which maps variable names to values
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        if let Some(v) = get("BLOCKFALL_PRESET") {
            config.apply_preset(&v)?;
        }
        if let Some(v) = get("BLOCKFALL_WIDTH") {
            config.session.width = parse_u8(&v).context("BLOCKFALL_WIDTH")?;
        }
        if let Some(v) = get("BLOCKFALL_HEIGHT") {
            config.session.height = parse_u8(&v).context("BLOCKFALL_HEIGHT")?;
        }
        if let Some(v) = get("BLOCKFALL_SPAWN_COLUMN") {
            config.session.spawn_column = parse_u8(&v).context("BLOCKFALL_SPAWN_COLUMN")?;
        }
        if let Some(v) = get("BLOCKFALL_PLAYER") {
            config.session.player_name = v;
        }
        if let Some(v) = get("BLOCKFALL_SEED") {
            config.session.seed = v
                .parse()
                .map_err(|_| anyhow!("invalid seed: {}", v))
                .context("BLOCKFALL_SEED")?;
        }
        if let Some(v) = get("BLOCKFALL_RANDOMIZER") {
            config.session.randomizer = parse_randomizer(&v).context("BLOCKFALL_RANDOMIZER")?;
        }
        if let Some(v) = get("BLOCKFALL_RESET") {
            config.session.reset_policy = parse_reset(&v).context("BLOCKFALL_RESET")?;
        }
        if let Some(v) = get("BLOCKFALL_AUTOSTART") {
            config.auto_start = parse_flag(&v).context("BLOCKFALL_AUTOSTART")?;
        }
        if let Some(v) = get("BLOCKFALL_OBSERVE_TICKS") {
            config.observe_every_tick = parse_flag(&v).context("BLOCKFALL_OBSERVE_TICKS")?;
        }

        Ok(config)
    }

    /// Apply command-line flags (program name excluded)
    pub fn apply_args(&mut self, args: &[String]) -> Result<()> {
        let mut i = 0usize;
        while i < args.len() {
            let flag = args[i].as_str();
            let mut value = || {
                i += 1;
                args.get(i)
                    .ok_or_else(|| anyhow!("missing value for {}", flag))
            };
            match flag {
                "--preset" => {
                    let v = value()?;
                    self.apply_preset(v)?;
                }
                "--width" => self.session.width = parse_u8(value()?).context("--width")?,
                "--height" => self.session.height = parse_u8(value()?).context("--height")?,
                "--spawn-column" => {
                    self.session.spawn_column = parse_u8(value()?).context("--spawn-column")?
                }
                "--player" => self.session.player_name = value()?.clone(),
                "--seed" => {
                    let v = value()?;
                    self.session.seed = v
                        .parse()
                        .map_err(|_| anyhow!("invalid --seed value: {}", v))?;
                }
                "--randomizer" => {
                    self.session.randomizer = parse_randomizer(value()?).context("--randomizer")?
                }
                "--reset" => self.session.reset_policy = parse_reset(value()?).context("--reset")?,
                "--no-autostart" => self.auto_start = false,
                "--quiet-ticks" => self.observe_every_tick = false,
                other => bail!("unknown argument: {}", other),
            }
            i += 1;
        }
        Ok(())
    }

    /// Reject configurations the core cannot run
    pub fn validate(&self) -> Result<()> {
        if let Some(err) = self.session.validation_error() {
            bail!("invalid configuration: {}", err);
        }
        if self.session.player_name.trim().is_empty() {
            bail!("invalid configuration: player name is empty");
        }
        Ok(())
    }

    fn apply_preset(&mut self, name: &str) -> Result<()> {
        let preset = match name.to_lowercase().as_str() {
            "classic" => SessionConfig::classic(),
            "wide" => SessionConfig::wide(),
            other => bail!("unknown preset: {} (expected classic or wide)", other),
        };
        self.session.width = preset.width;
        self.session.height = preset.height;
        self.session.spawn_column = preset.spawn_column;
        Ok(())
    }
}

fn parse_u8(v: &str) -> Result<u8> {
    v.parse::<u8>()
        .map_err(|_| anyhow!("expected a number between 0 and 255, got {}", v))
}

fn parse_randomizer(v: &str) -> Result<Randomizer> {
    Randomizer::from_str(v).ok_or_else(|| anyhow!("unknown randomizer: {} (expected uniform or bag)", v))
}

fn parse_reset(v: &str) -> Result<ResetPolicy> {
    ResetPolicy::from_str(v)
        .ok_or_else(|| anyhow!("unknown reset policy: {} (expected running or not-started)", v))
}

fn parse_flag(v: &str) -> Result<bool> {
    match v.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("expected a boolean, got {}", other),
    }
}
