use crate::episode::{Episode, EpisodeError, EpisodeRunner};
use crate::policy::Policy;
use gymnasium::Env;
use rand::Rng;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum DriverError {
    #[error("no successful episode after {attempts} attempts")]
    GaveUp { attempts: usize },

    #[error(transparent)]
    Episode(#[from] EpisodeError),
}

/// The first successful random episode and how many episodes it took.
#[derive(Debug, Clone)]
pub struct Convergence {
    pub episodes: usize,
    pub episode: Episode,
}

/// Plays random episodes until one ends with a positive total reward.
///
/// With `max_attempts = None` there is no bound: on a map where the goal is
/// reachable this ends almost surely, but nothing guarantees it.
pub fn train_until_success<E, R>(
    env: &mut E,
    runner: &EpisodeRunner,
    rng: &mut R,
    max_attempts: Option<usize>,
) -> Result<Convergence, DriverError>
where
    E: Env + ?Sized,
    R: Rng + ?Sized,
{
    let mut episodes = 0;
    loop {
        if max_attempts.is_some_and(|max| episodes >= max) {
            return Err(DriverError::GaveUp { attempts: episodes });
        }

        let episode = runner.run(env, None, rng)?;
        episodes += 1;
        if episode.is_success() {
            info!(episodes, steps = episode.steps(), "random policy reached the goal");
            return Ok(Convergence { episodes, episode });
        }
        debug!(episodes, "random episode failed");
    }
}

#[derive(Debug, Clone)]
pub enum Replay {
    Success(Episode),
    Failed(Episode),
}

impl Replay {
    pub fn episode(&self) -> &Episode {
        match self {
            Replay::Success(e) | Replay::Failed(e) => e,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Replay::Success(_))
    }
}

/// Plays one episode following `policy`.
pub fn replay<E, R>(
    env: &mut E,
    runner: &EpisodeRunner,
    policy: &Policy,
    rng: &mut R,
) -> Result<Replay, EpisodeError>
where
    E: Env + ?Sized,
    R: Rng + ?Sized,
{
    let episode = runner.run(env, Some(policy), rng)?;
    Ok(if episode.is_success() {
        Replay::Success(episode)
    } else {
        Replay::Failed(episode)
    })
}
