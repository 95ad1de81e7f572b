use crate::policy::{Lookup, Policy};
use gymnasium::{Action, Continous, Discrete, Env, GymError, StepInfo};
use rand::Rng;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum EpisodeError {
    #[error("policy is not defined for state {state}")]
    PolicyLookupMiss { state: Discrete },

    #[error(transparent)]
    Env(#[from] GymError),
}

/// States visited and actions taken during one episode. `actions[i]` moved
/// the agent from `states[i]` to `states[i + 1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trajectory {
    states: Vec<Discrete>,
    actions: Vec<Action>,
}

impl Trajectory {
    pub fn new(start: Discrete) -> Self {
        Self {
            states: vec![start],
            actions: vec![],
        }
    }

    pub fn push(&mut self, action: Action, next_state: Discrete) {
        self.actions.push(action);
        self.states.push(next_state);
    }

    pub fn states(&self) -> &[Discrete] {
        &self.states
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn steps(&self) -> usize {
        self.actions.len()
    }

    pub fn last_state(&self) -> Discrete {
        self.states[self.states.len() - 1]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Episode {
    pub trajectory: Trajectory,
    pub total_reward: Continous,
    pub terminated: bool,
    pub truncated: bool,
}

impl Episode {
    pub fn is_success(&self) -> bool {
        self.total_reward > 0.
    }

    pub fn steps(&self) -> usize {
        self.trajectory.steps()
    }
}

/// Progress reported to the observer of [`EpisodeRunner::run_observed`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EpisodeEvent<'a> {
    Reset { state: Discrete },
    Step { action: Action, info: &'a StepInfo },
}

/// What to do when the policy has no entry for the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingState {
    #[default]
    Fail,
    RandomFallback,
}

/// Plays single episodes, either with uniformly random actions or by
/// following a [`Policy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EpisodeRunner {
    pub seed: Option<u64>,
    pub on_missing: MissingState,
}

impl EpisodeRunner {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            seed,
            on_missing: MissingState::Fail,
        }
    }

    pub fn on_missing(mut self, on_missing: MissingState) -> Self {
        self.on_missing = on_missing;
        self
    }

    pub fn run<E, R>(
        &self,
        env: &mut E,
        policy: Option<&Policy>,
        rng: &mut R,
    ) -> Result<Episode, EpisodeError>
    where
        E: Env + ?Sized,
        R: Rng + ?Sized,
    {
        self.run_observed(env, policy, rng, |_, _| Ok::<_, EpisodeError>(()))
    }

    /// Same as [`EpisodeRunner::run`], calling `observe` after the reset and
    /// after every step. An error from `observe` ends the episode.
    pub fn run_observed<E, R, F, X>(
        &self,
        env: &mut E,
        policy: Option<&Policy>,
        rng: &mut R,
        mut observe: F,
    ) -> Result<Episode, X>
    where
        E: Env + ?Sized,
        R: Rng + ?Sized,
        F: FnMut(&E, EpisodeEvent<'_>) -> Result<(), X>,
        X: From<EpisodeError>,
    {
        let mut state = env.reset(self.seed).map_err(EpisodeError::from)?;
        let mut trajectory = Trajectory::new(state);
        let mut total_reward = 0.;
        observe(&*env, EpisodeEvent::Reset { state })?;

        loop {
            let action = self.choose(state, policy, rng)?;
            let si = env.step(action).map_err(EpisodeError::from)?;
            trajectory.push(action, si.observation);
            total_reward += si.reward;
            debug!(state, %action, next = si.observation, reward = si.reward);
            observe(&*env, EpisodeEvent::Step { action, info: &si })?;

            if si.done() {
                let episode = Episode {
                    trajectory,
                    total_reward,
                    terminated: si.terminated,
                    truncated: si.truncated,
                };
                info!(
                    steps = episode.steps(),
                    total_reward,
                    truncated = si.truncated,
                    "episode finished"
                );
                return Ok(episode);
            }

            state = si.observation;
        }
    }

    fn choose<R: Rng + ?Sized>(
        &self,
        state: Discrete,
        policy: Option<&Policy>,
        rng: &mut R,
    ) -> Result<Action, EpisodeError> {
        let Some(policy) = policy else {
            return Ok(Action::sample(rng));
        };

        match (policy.lookup(state), self.on_missing) {
            (Lookup::Found(a), _) => Ok(a),
            (Lookup::Missing, MissingState::RandomFallback) => {
                debug!(state, "no policy entry, acting randomly");
                Ok(Action::sample(rng))
            }
            (Lookup::Missing, MissingState::Fail) => Err(EpisodeError::PolicyLookupMiss { state }),
        }
    }
}

/// Plays one episode from `env.reset(seed)`. A policy without an entry for a
/// reached state ends the episode with [`EpisodeError::PolicyLookupMiss`].
pub fn run_episode<E, R>(
    env: &mut E,
    policy: Option<&Policy>,
    rng: &mut R,
    seed: Option<u64>,
) -> Result<Episode, EpisodeError>
where
    E: Env + ?Sized,
    R: Rng + ?Sized,
{
    EpisodeRunner::new(seed).run(env, policy, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::*;
    use gymnasium::{Action::*, RenderFrame, StepInfo};
    use rand::prelude::*;

    /// Replays a fixed list of outcomes regardless of the action taken.
    struct ScriptedEnv {
        start: Discrete,
        outcomes: Vec<(Discrete, Continous, bool)>,
        cursor: usize,
    }

    impl ScriptedEnv {
        fn new(start: Discrete, outcomes: Vec<(Discrete, Continous, bool)>) -> Self {
            Self {
                start,
                outcomes,
                cursor: 0,
            }
        }
    }

    impl Env for ScriptedEnv {
        fn reset(&mut self, _seed: Option<u64>) -> gymnasium::Result<Discrete> {
            self.cursor = 0;
            Ok(self.start)
        }

        fn step(&mut self, _action: Action) -> gymnasium::Result<StepInfo> {
            let (observation, reward, terminated) = self.outcomes[self.cursor];
            self.cursor += 1;
            Ok(StepInfo {
                observation,
                reward,
                terminated,
                truncated: self.cursor == self.outcomes.len() && !terminated,
            })
        }

        fn render(&self) -> gymnasium::Result<RenderFrame> {
            Ok(RenderFrame::None)
        }
    }

    #[test]
    fn records_states_actions_and_reward() {
        let env = &mut ScriptedEnv::new(0, vec![(1, 0., false), (2, 0., false), (3, 1., true)]);
        let rng = &mut StdRng::seed_from_u64(0);

        let ep = run_episode(env, None, rng, Some(0)).unwrap();

        assert_eq!(ep.trajectory.states(), [0, 1, 2, 3]);
        assert_eq!(ep.trajectory.actions().len(), 3);
        assert_float_eq!(ep.total_reward, 1., abs <= 1e-12);
        assert!(ep.is_success());
        assert!(ep.terminated);
        assert_eq!(ep.trajectory.last_state(), 3);
    }

    #[test]
    fn stops_on_truncation() {
        let env = &mut ScriptedEnv::new(0, vec![(0, 0., false), (0, 0., false)]);
        let rng = &mut StdRng::seed_from_u64(0);

        let ep = run_episode(env, None, rng, None).unwrap();

        assert_eq!(ep.steps(), 2);
        assert!(ep.truncated);
        assert!(!ep.is_success());
    }

    #[test]
    fn follows_policy_actions() {
        let env = &mut ScriptedEnv::new(0, vec![(1, 0., false), (2, 1., true)]);
        let policy = Policy::from_trajectory(&[0, 1, 2], &[Down, Right]);
        let rng = &mut StdRng::seed_from_u64(0);

        let ep = run_episode(env, Some(&policy), rng, Some(0)).unwrap();

        assert_eq!(ep.trajectory.actions(), [Down, Right]);
    }

    #[test]
    fn slip_into_unknown_state_is_a_lookup_miss() {
        // The policy expects 0 -> 1, the "slip" lands in 4 instead.
        let env = &mut ScriptedEnv::new(0, vec![(4, 0., false), (8, 0., false)]);
        let policy = Policy::from_trajectory(&[0, 1], &[Right]);
        let rng = &mut StdRng::seed_from_u64(0);

        let err = run_episode(env, Some(&policy), rng, Some(0)).unwrap_err();

        assert!(matches!(err, EpisodeError::PolicyLookupMiss { state: 4 }));
        assert_eq!(err.to_string(), "policy is not defined for state 4");
    }

    #[test]
    fn random_fallback_covers_unknown_states() {
        let env = &mut ScriptedEnv::new(0, vec![(4, 0., false), (8, 0., true)]);
        let policy = Policy::from_trajectory(&[0, 1], &[Right]);
        let rng = &mut StdRng::seed_from_u64(0);
        let runner = EpisodeRunner::new(Some(0)).on_missing(MissingState::RandomFallback);

        let ep = runner.run(env, Some(&policy), rng).unwrap();

        assert_eq!(ep.trajectory.states(), [0, 4, 8]);
        assert_eq!(ep.trajectory.actions()[0], Right);
        assert!(!ep.is_success());
    }

    #[test]
    fn observer_sees_reset_then_every_step() {
        let env = &mut ScriptedEnv::new(0, vec![(1, 0., false), (2, 1., true)]);
        let rng = &mut StdRng::seed_from_u64(0);
        let mut seen = vec![];

        let ep = EpisodeRunner::new(Some(0))
            .run_observed(env, None, rng, |_, event| {
                seen.push(match event {
                    EpisodeEvent::Reset { state } => state,
                    EpisodeEvent::Step { info, .. } => info.observation,
                });
                Ok::<_, EpisodeError>(())
            })
            .unwrap();

        assert_eq!(seen, ep.trajectory.states());
    }

    #[test]
    fn observer_error_ends_the_episode() {
        let env = &mut ScriptedEnv::new(0, vec![(1, 0., false), (2, 0., false), (3, 1., true)]);
        let rng = &mut StdRng::seed_from_u64(0);
        let mut steps = 0;

        let err = EpisodeRunner::new(None)
            .run_observed(env, None, rng, |_, event| {
                if let EpisodeEvent::Step { info, .. } = event {
                    steps += 1;
                    if info.observation == 2 {
                        return Err(EpisodeError::PolicyLookupMiss { state: 2 });
                    }
                }
                Ok(())
            })
            .unwrap_err();

        assert!(matches!(err, EpisodeError::PolicyLookupMiss { state: 2 }));
        assert_eq!(steps, 2);
    }

    #[test]
    fn random_actions_come_from_injected_rng() {
        let outcomes = vec![(0, 0., false); 20];
        let run = |seed| {
            let env = &mut ScriptedEnv::new(0, outcomes.clone());
            let rng = &mut StdRng::seed_from_u64(seed);
            run_episode(env, None, rng, None).unwrap().trajectory
        };

        assert_eq!(run(7), run(7));
        assert_eq!(run(7).actions().len(), 20);
    }
}
