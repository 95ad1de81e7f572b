use anyhow::Result;
use clap::{ArgAction, Parser};
use gymnasium::*;
use itertools::Itertools;
use rand::prelude::*;
use rl_intro::*;
use std::io;
use tracing::Level;

const ENV_ID: &str = "FrozenLake-v1";

#[derive(Parser, Debug)]
#[command(about = "Frozen Lake: learn a policy from one successful random walk")]
struct Cli {
    /// Seed for the action sampler and for environment resets.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// gymnasium-http-api server to play on instead of the built-in lake,
    /// e.g. http://127.0.0.1:40004
    #[arg(long)]
    server: Option<String>,

    /// Give up training after this many random episodes.
    #[arg(long)]
    max_attempts: Option<usize>,

    /// In task 3, act randomly in states the learned policy has never seen.
    #[arg(long)]
    fallback: bool,

    /// Task to run (0-3), may be repeated. Runs all tasks when omitted.
    #[arg(long = "task", value_parser = clap::value_parser!(u8).range(0..=3))]
    tasks: Vec<u8>,

    /// More logging on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn wants(&self, task: u8) -> bool {
        self.tasks.is_empty() || self.tasks.contains(&task)
    }

    fn make_env(&self, config: &EnvConfig) -> Result<Box<dyn Env>> {
        let env: Box<dyn Env> = match &self.server {
            Some(url) => Box::new(HttpEnv::new(url, ENV_ID, config)?),
            None => Box::new(FrozenLake::new(config)?),
        };

        Ok(env)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .init();

    let rng = &mut StdRng::seed_from_u64(cli.seed);
    let runner = EpisodeRunner::new(Some(cli.seed));

    println!("## Frozen Lake ##");

    if cli.wants(0) {
        println!("\n ### TASK 0 ### ");
        let config = EnvConfig::default()
            .slippery(false)
            .render_mode(RenderMode::Ansi);
        let env = &mut cli.make_env(&config)?;
        trace_random_episode(env, rng, Some(cli.seed), &mut io::stdout().lock())?;
    }

    let mut policy_4x4 = None;
    if cli.wants(1) {
        println!("\n ### TASK 1 ### ");
        let env = &mut cli.make_env(&EnvConfig::default().slippery(false))?;
        policy_4x4 = Some(learn_and_replay(env, &runner, rng, cli.max_attempts, true)?);
    }

    if cli.wants(2) {
        println!("\n ### TASK 2 ### ");
        let config = EnvConfig::default()
            .slippery(false)
            .map(MapName::EightByEight);
        let env = &mut cli.make_env(&config)?;
        learn_and_replay(env, &runner, rng, cli.max_attempts, false)?;
    }

    if cli.wants(3) {
        println!("\n ### TASK 3 ### ");
        let policy = match policy_4x4 {
            Some(p) => p,
            None => {
                let env = &mut cli.make_env(&EnvConfig::default().slippery(false))?;
                let c = train_until_success(env, &runner, rng, cli.max_attempts)?;
                extract_policy(&c.episode.trajectory)
            }
        };
        play_slippery(&cli, &policy)?;
    }

    Ok(())
}

fn learn_and_replay(
    env: &mut dyn Env,
    runner: &EpisodeRunner,
    rng: &mut StdRng,
    max_attempts: Option<usize>,
    show_walk: bool,
) -> Result<Policy> {
    let Convergence { episodes, episode } = train_until_success(env, runner, rng, max_attempts)?;
    let trajectory = &episode.trajectory;

    println!("Converged after {episodes} episodes.");
    if show_walk {
        println!("Random policy took {} steps.", trajectory.steps());
        println!("Visited states \t [{}]", trajectory.states().iter().join(", "));
        println!("Took actions \t [{}]", trajectory.actions().iter().join(", "));
    } else {
        println!("Took {} steps.", trajectory.steps());
    }

    let policy = extract_policy(trajectory);
    println!("Improving policy to: {policy}");

    match replay(env, runner, &policy, rng)? {
        Replay::Success(e) => println!("Success: New policy took {} steps.", e.steps()),
        Replay::Failed(_) => println!("New policy failed!"),
    }

    Ok(policy)
}

/// Replays a policy learned on the still lake on a slippery one. No seeds, so
/// every run slips differently.
fn play_slippery(cli: &Cli, policy: &Policy) -> Result<()> {
    let env = &mut cli.make_env(&EnvConfig::default().slippery(true))?;
    let rng = &mut StdRng::from_entropy();
    let on_missing = if cli.fallback {
        MissingState::RandomFallback
    } else {
        MissingState::Fail
    };
    let runner = EpisodeRunner::new(None).on_missing(on_missing);

    match replay(env, &runner, policy, rng) {
        Ok(Replay::Success(e)) => println!("Success: New policy took {} steps.", e.steps()),
        Ok(Replay::Failed(_)) => println!("New policy failed!"),
        Err(EpisodeError::PolicyLookupMiss { state }) => {
            println!("Failure! Policy is not defined for state: {state}");
            println!(
                "The policy only knows the states of the walk it was learned from. \
                 A slip can reach any other state; rerun with --fallback to act \
                 randomly there."
            );
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
