extern crate float_eq;
extern crate gymnasium;

use float_eq::*;
use gymnasium::*;

#[test]
fn fl_advanced_make_env() {
    let config = EnvConfig::default()
        .slippery(false)
        .render_mode(RenderMode::Ansi)
        .max_episode_steps(1);
    let env = &mut FrozenLake::from_desc(&["GGGH", "GSGH", "GGGF", "FFFG"], &config).unwrap();
    assert_eq!(env.n_states(), 16);

    let s = env.reset(Some(2718)).unwrap();
    assert_eq!(s, 5);

    let rf = env.render().unwrap();
    assert_eq!(
        rf.as_str().unwrap(),
        "\nGGGH\nG\u{1b}[41mS\u{1b}[0mGH\nGGGF\nFFFG\n"
    );

    let si = env.step(Action::Down).unwrap();
    assert_eq!(si.observation, 9);
    assert_eq!(format!("terminated: {}", si.terminated), "terminated: true");
    assert_eq!(format!("truncated: {}", si.truncated), "truncated: true");
    assert_float_eq!(si.reward, 1., rmax <= 1e-16);

    let rf = env.render().unwrap();
    assert_eq!(
        rf.as_str().unwrap(),
        "  (Down)\nGGGH\nGSGH\nG\u{1b}[41mG\u{1b}[0mGF\nFFFG\n"
    );
}

#[test]
fn fl_default_map_walk_to_goal() {
    let config = EnvConfig::default()
        .slippery(false)
        .render_mode(RenderMode::Ansi);
    let env = &mut FrozenLake::new(&config).unwrap();
    assert_eq!(env.reset(Some(0)).unwrap(), 0);

    let path = [
        (Action::Down, 4),
        (Action::Down, 8),
        (Action::Right, 9),
        (Action::Down, 13),
        (Action::Right, 14),
        (Action::Right, 15),
    ];
    let mut total_reward = 0.;
    for (i, (action, expected)) in path.into_iter().enumerate() {
        let si = env.step(action).unwrap();
        assert_eq!(si.observation, expected);
        assert_eq!(si.terminated, i == path.len() - 1);
        assert!(!si.truncated);
        total_reward += si.reward;
    }
    assert_float_eq!(total_reward, 1., abs <= 1e-12);

    let rf = env.render().unwrap();
    assert_eq!(
        rf.as_str().unwrap(),
        "  (Right)\nSFFF\nFHFH\nFFFH\nHFF\u{1b}[41mG\u{1b}[0m\n"
    );
}

#[test]
fn fl_8x8_start_render() {
    let config = EnvConfig::default()
        .map(MapName::EightByEight)
        .render_mode(RenderMode::Ansi);
    let env = &mut FrozenLake::new(&config).unwrap();
    env.reset(Some(0)).unwrap();

    let rf = env.render().unwrap().to_string();
    let lines = rf.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 9);
    assert_eq!(lines[0], "");
    assert_eq!(lines[1], "\u{1b}[41mS\u{1b}[0mFFFFFFF");
    assert_eq!(lines[8], "FFFHFFFG");
}

#[test]
fn fl_boxed_env_forwards_calls() {
    let mut env: Box<dyn Env> =
        Box::new(FrozenLake::new(&EnvConfig::default().slippery(false)).unwrap());
    assert_eq!(env.reset(Some(0)).unwrap(), 0);
    assert_eq!(env.step(Action::Right).unwrap().observation, 1);
    assert_eq!(env.render().unwrap(), RenderFrame::None);
}
