extern crate rand;
extern crate reqwest;
extern crate serde;
extern crate serde_json;

pub mod config;
pub mod error;
pub mod frozen_lake;
pub mod http;

pub use config::*;
pub use error::*;
pub use frozen_lake::FrozenLake;
pub use http::HttpEnv;

use rand::Rng;
use std::fmt;

pub type Discrete = i32;
pub type Continous = f64;

/// Moves available in FrozenLake-v1. The discriminants are the values the
/// simulator expects on the wire.
/// Refer: https://gymnasium.farama.org/environments/toy_text/frozen_lake/#action-space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    Left = 0,
    Down = 1,
    Right = 2,
    Up = 3,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Left, Action::Down, Action::Right, Action::Up];

    pub fn name(self) -> &'static str {
        match self {
            Action::Left => "Left",
            Action::Down => "Down",
            Action::Right => "Right",
            Action::Up => "Up",
        }
    }

    pub fn discrete_value(self) -> Discrete {
        self as Discrete
    }

    /// Uniform draw over the whole action space.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// The action `offset` quarter turns away, e.g. `Left.rotate(1) == Down`.
    pub fn rotate(self, offset: Discrete) -> Self {
        Self::ALL[(self as Discrete + offset).rem_euclid(4) as usize]
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderFrame {
    Ansi(String),
    None,
}

impl RenderFrame {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RenderFrame::Ansi(s) => Some(s),
            RenderFrame::None => None,
        }
    }
}

impl fmt::Display for RenderFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str().unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    pub observation: Discrete,
    pub reward: Continous,
    pub truncated: bool,
    pub terminated: bool,
}

impl StepInfo {
    pub fn done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// A gymnasium style environment with discrete observations and the
/// FrozenLake action set.
/// Refer: https://gymnasium.farama.org/api/env/
pub trait Env {
    /// Resets the environment. With `Some(seed)` the internal random source is
    /// re-seeded, so the same seed always yields the same episode dynamics.
    fn reset(&mut self, seed: Option<u64>) -> Result<Discrete>;

    fn step(&mut self, action: Action) -> Result<StepInfo>;

    fn render(&self) -> Result<RenderFrame>;
}

impl<E: Env + ?Sized> Env for Box<E> {
    fn reset(&mut self, seed: Option<u64>) -> Result<Discrete> {
        (**self).reset(seed)
    }

    fn step(&mut self, action: Action) -> Result<StepInfo> {
        (**self).step(action)
    }

    fn render(&self) -> Result<RenderFrame> {
        (**self).render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, Action::Left)]
    #[case(1, Action::Down)]
    #[case(2, Action::Right)]
    #[case(3, Action::Up)]
    fn action_wire_values(#[case] value: Discrete, #[case] action: Action) {
        assert_eq!(action.discrete_value(), value);
    }

    #[test]
    fn action_names() {
        let names = Action::ALL.iter().map(|a| a.to_string()).collect::<Vec<_>>();
        assert_eq!(names, ["Left", "Down", "Right", "Up"]);
    }

    #[test]
    fn rotate_wraps_around() {
        assert_eq!(Action::Left.rotate(-1), Action::Up);
        assert_eq!(Action::Up.rotate(1), Action::Left);
        assert_eq!(Action::Down.rotate(0), Action::Down);
    }

    #[test]
    fn sample_covers_all_actions() {
        let rng = &mut StdRng::seed_from_u64(2718);
        let mut seen = [false; 4];
        for _ in 0..200 {
            seen[Action::sample(rng) as usize] = true;
        }
        assert_eq!(seen, [true; 4]);
    }

    #[test]
    fn render_frame_display() {
        assert_eq!(RenderFrame::Ansi("\nSF\n".into()).to_string(), "\nSF\n");
        assert_eq!(RenderFrame::None.to_string(), "");
    }
}
