extern crate gymnasium;
extern crate rand;

use gymnasium::*;
use rand::prelude::*;

/// Random agent on a FrozenLake hosted by a gymnasium-http-api server.
fn main() -> Result<()> {
    let config = EnvConfig::default()
        .map(MapName::EightByEight)
        .render_mode(RenderMode::Ansi);
    let mut env = HttpEnv::new("http://127.0.0.1:40004", "FrozenLake-v1", &config)?;
    println!("instance: {}", env.instance_id());

    let rng = &mut StdRng::seed_from_u64(2718);
    for ep in 0..100 {
        let _ = env.reset(Some(2718))?;
        let mut tot_reward = 0.;
        loop {
            let si = env.step(Action::sample(rng))?;
            let render_frame = env.render()?;
            print!("{esc}[2J{esc}[1;1H", esc = 27 as char);
            println!("{render_frame}");
            tot_reward += si.reward;

            if si.done() {
                break;
            }
        }
        println!("Finished episode {} with total reward {}", ep, tot_reward);
    }

    Ok(())
}
