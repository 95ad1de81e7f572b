use crate::*;
use rand::prelude::*;
use tracing::debug;

const HIGHLIGHT: &str = "\u{1b}[41m";
const RESET: &str = "\u{1b}[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tile {
    Start,
    Frozen,
    Hole,
    Goal,
}

impl Tile {
    fn from_char(c: char) -> Option<Self> {
        match c {
            'S' => Some(Tile::Start),
            'F' => Some(Tile::Frozen),
            'H' => Some(Tile::Hole),
            'G' => Some(Tile::Goal),
            _ => None,
        }
    }

    fn as_char(self) -> char {
        match self {
            Tile::Start => 'S',
            Tile::Frozen => 'F',
            Tile::Hole => 'H',
            Tile::Goal => 'G',
        }
    }

    fn is_terminal(self) -> bool {
        matches!(self, Tile::Hole | Tile::Goal)
    }
}

/// In-process FrozenLake-v1.
///
/// The agent starts on an `S` tile and has to reach `G` without stepping into
/// an `H`. Reaching the goal pays 1, everything else pays 0. When slippery, the
/// executed move is the chosen one or either perpendicular move, each with
/// probability 1/3.
/// Refer: https://gymnasium.farama.org/environments/toy_text/frozen_lake/
#[derive(Debug)]
pub struct FrozenLake {
    tiles: Vec<Tile>,
    nrow: usize,
    ncol: usize,
    starts: Vec<usize>,
    slippery: bool,
    render_mode: RenderMode,
    max_episode_steps: Discrete,
    rng: StdRng,
    state: Option<usize>,
    last_action: Option<Action>,
    elapsed_steps: Discrete,
}

impl FrozenLake {
    pub fn new(config: &EnvConfig) -> Result<Self> {
        Self::from_desc(config.map.desc(), config)
    }

    /// Builds a lake from a custom layout. `config.map` is ignored.
    pub fn from_desc<S: AsRef<str>>(desc: &[S], config: &EnvConfig) -> Result<Self> {
        let nrow = desc.len();
        let ncol = desc.first().map(|r| r.as_ref().chars().count()).unwrap_or(0);
        if nrow == 0 || ncol == 0 {
            return Err(GymError::InvalidMap("map is empty".to_string()));
        }

        let mut tiles = Vec::with_capacity(nrow * ncol);
        for (r, row) in desc.iter().enumerate() {
            let row = row.as_ref();
            if row.chars().count() != ncol {
                return Err(GymError::InvalidMap(format!(
                    "row {r} has {} tiles, expected {ncol}",
                    row.chars().count()
                )));
            }
            for c in row.chars() {
                let tile = Tile::from_char(c)
                    .ok_or_else(|| GymError::InvalidMap(format!("unknown tile '{c}'")))?;
                tiles.push(tile);
            }
        }

        let starts = tiles
            .iter()
            .enumerate()
            .filter(|&(_, &t)| t == Tile::Start)
            .map(|(s, _)| s)
            .collect::<Vec<_>>();
        if starts.is_empty() {
            return Err(GymError::InvalidMap("no start tile".to_string()));
        }

        Ok(Self {
            tiles,
            nrow,
            ncol,
            starts,
            slippery: config.slippery,
            render_mode: config.render_mode,
            max_episode_steps: config.max_episode_steps,
            rng: StdRng::from_entropy(),
            state: None,
            last_action: None,
            elapsed_steps: 0,
        })
    }

    pub fn n_states(&self) -> usize {
        self.tiles.len()
    }

    pub fn desc(&self) -> Vec<String> {
        self.tiles
            .chunks(self.ncol)
            .map(|row| row.iter().map(|t| t.as_char()).collect())
            .collect()
    }

    fn inc(&self, s: usize, action: Action) -> usize {
        let (mut row, mut col) = (s / self.ncol, s % self.ncol);
        match action {
            Action::Left => col = col.saturating_sub(1),
            Action::Down => row = (row + 1).min(self.nrow - 1),
            Action::Right => col = (col + 1).min(self.ncol - 1),
            Action::Up => row = row.saturating_sub(1),
        }

        row * self.ncol + col
    }

    fn render_ansi(&self, s: usize) -> String {
        let mut out = match self.last_action {
            Some(a) => format!("  ({a})\n"),
            None => "\n".to_string(),
        };
        for (r, row) in self.tiles.chunks(self.ncol).enumerate() {
            for (c, tile) in row.iter().enumerate() {
                if r * self.ncol + c == s {
                    out.push_str(HIGHLIGHT);
                    out.push(tile.as_char());
                    out.push_str(RESET);
                } else {
                    out.push(tile.as_char());
                }
            }
            out.push('\n');
        }

        out
    }
}

impl Env for FrozenLake {
    fn reset(&mut self, seed: Option<u64>) -> Result<Discrete> {
        if let Some(seed) = seed {
            self.rng = StdRng::seed_from_u64(seed);
        }

        let s = *self
            .starts
            .choose(&mut self.rng)
            .ok_or_else(|| GymError::InvalidMap("no start tile".to_string()))?;
        self.state = Some(s);
        self.last_action = None;
        self.elapsed_steps = 0;

        Ok(s as Discrete)
    }

    fn step(&mut self, action: Action) -> Result<StepInfo> {
        let s = self.state.ok_or(GymError::NotReset)?;

        // Terminal tiles absorb, paying nothing.
        let (next, reward) = if self.tiles[s].is_terminal() {
            (s, 0.)
        } else {
            let executed = if self.slippery {
                action.rotate(self.rng.gen_range(-1..=1))
            } else {
                action
            };
            let next = self.inc(s, executed);
            let reward = if self.tiles[next] == Tile::Goal { 1. } else { 0. };
            (next, reward)
        };

        self.state = Some(next);
        self.last_action = Some(action);
        self.elapsed_steps += 1;

        let terminated = self.tiles[next].is_terminal();
        let truncated = self.elapsed_steps >= self.max_episode_steps;
        debug!(
            from = s,
            to = next,
            %action,
            reward,
            terminated,
            truncated,
            "frozen lake step"
        );

        Ok(StepInfo {
            observation: next as Discrete,
            reward,
            truncated,
            terminated,
        })
    }

    fn render(&self) -> Result<RenderFrame> {
        match self.render_mode {
            RenderMode::None => Ok(RenderFrame::None),
            RenderMode::Ansi => {
                let s = self.state.ok_or(GymError::NotReset)?;
                Ok(RenderFrame::Ansi(self.render_ansi(s)))
            }
        }
    }
}
