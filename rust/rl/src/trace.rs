use crate::episode::{Episode, EpisodeError, EpisodeEvent, EpisodeRunner};
use gymnasium::{Env, GymError};
use rand::Rng;
use std::io::{self, Write};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TraceError {
    #[error(transparent)]
    Episode(#[from] EpisodeError),

    #[error(transparent)]
    Env(#[from] GymError),

    #[error("could not write trace: {0}")]
    Io(#[from] io::Error),
}

/// Plays one random episode and writes every step with the rendered lake.
pub fn trace_random_episode<E, R, W>(
    env: &mut E,
    rng: &mut R,
    seed: Option<u64>,
    out: &mut W,
) -> Result<Episode, TraceError>
where
    E: Env + ?Sized,
    R: Rng + ?Sized,
    W: Write + ?Sized,
{
    EpisodeRunner::new(seed).run_observed(env, None, rng, |env, event| -> Result<(), TraceError> {
        match event {
            EpisodeEvent::Reset { .. } => writeln!(out, "Start state:")?,
            EpisodeEvent::Step { action, info } => writeln!(
                out,
                "\nAction:{action}, new state:{}, reward:{:?}",
                info.observation, info.reward
            )?,
        }
        writeln!(out, "{}", env.render()?)?;
        Ok(())
    })
}
