use crate::Discrete;
use serde_json::Value;
use std::fmt;

/// Built-in FrozenLake layouts.
/// Refer: https://gymnasium.farama.org/environments/toy_text/frozen_lake/#arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapName {
    #[default]
    FourByFour,
    EightByEight,
}

impl MapName {
    pub fn as_str(self) -> &'static str {
        match self {
            MapName::FourByFour => "4x4",
            MapName::EightByEight => "8x8",
        }
    }

    pub fn desc(self) -> &'static [&'static str] {
        match self {
            MapName::FourByFour => &["SFFF", "FHFH", "FFFH", "HFFG"],
            MapName::EightByEight => &[
                "SFFFFFFF", "FFFFFFFF", "FFFHFFFF", "FFFFFHFF", "FFFHFFFF", "FHHFFFHF", "FHFFHFHF",
                "FFFHFFFG",
            ],
        }
    }
}

impl fmt::Display for MapName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    Ansi,
    #[default]
    None,
}

/// Construction parameters of a FrozenLake-v1 instance. Defaults follow
/// `gym.make("FrozenLake-v1")`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvConfig {
    pub slippery: bool,
    pub map: MapName,
    pub render_mode: RenderMode,
    pub max_episode_steps: Discrete,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            slippery: true,
            map: MapName::FourByFour,
            render_mode: RenderMode::None,
            max_episode_steps: 100,
        }
    }
}

impl EnvConfig {
    pub fn slippery(mut self, slippery: bool) -> Self {
        self.slippery = slippery;
        self
    }

    pub fn map(mut self, map: MapName) -> Self {
        self.map = map;
        self
    }

    pub fn render_mode(mut self, render_mode: RenderMode) -> Self {
        self.render_mode = render_mode;
        self
    }

    pub fn max_episode_steps(mut self, max_episode_steps: Discrete) -> Self {
        self.max_episode_steps = max_episode_steps;
        self
    }

    /// Keyword arguments for `gym.make`, as sent to a gymnasium-http-api server.
    pub fn kwargs(&self) -> Vec<(&'static str, Value)> {
        let mut kwargs = vec![
            ("is_slippery", Value::Bool(self.slippery)),
            ("map_name", Value::String(self.map.as_str().to_string())),
        ];
        if self.render_mode == RenderMode::Ansi {
            kwargs.push(("render_mode", Value::String("ansi".to_string())));
        }

        kwargs
    }
}
