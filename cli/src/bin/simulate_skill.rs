use clap::Parser;
use loresheet::check::passes;
use loresheet::{resolve, Dice, StateFlags};

#[derive(Parser)]
#[command(name = "simulate-skill")]
#[command(about = "Monte Carlo sim: success odds for a skill roll vs a target number")]
struct Args {
    /// Target number to meet or beat
    #[arg(long)]
    tn: i32,

    /// Skill rating (number of success dice)
    #[arg(long, default_value_t = 2)]
    rating: i32,

    /// Roll two feat dice and keep the best
    #[arg(long)]
    favoured: bool,

    /// Extra (+) or fewer (-) success dice
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    advantage: i32,

    /// Condition tags: weary | miserable | wounded
    #[arg(long = "state")]
    states: Vec<String>,

    /// Number of trials
    #[arg(long, default_value_t = 10_000)]
    trials: u32,

    /// RNG base seed (trial i uses seed+i)
    #[arg(long, default_value_t = 12345)]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if args.trials == 0 {
        anyhow::bail!("--trials must be at least 1");
    }
    let flags = StateFlags::from_tags(&args.states);

    let mut successes = 0u32;
    let mut gandalf = 0u32;
    let mut eye = 0u32;
    let mut totals: Vec<i32> = Vec::with_capacity(args.trials as usize);

    for i in 0..args.trials {
        let mut dice = Dice::from_seed(args.seed.wrapping_add(i as u64));
        let res = resolve(&mut dice, args.rating, args.favoured, &flags, args.advantage);
        if passes(res.total, args.tn) {
            successes += 1;
        }
        if res.is_gandalf() {
            gandalf += 1;
        }
        if res.is_eye() {
            eye += 1;
        }
        totals.push(res.total);
    }

    totals.sort_unstable();
    let trials_f = args.trials as f64;
    let avg_total = totals.iter().map(|&t| t as i64).sum::<i64>() as f64 / trials_f;
    let median_total = {
        let m = totals.len() / 2;
        if totals.len() % 2 == 1 {
            totals[m] as f64
        } else {
            (totals[m - 1] + totals[m]) as f64 / 2.0
        }
    };

    println!("simulate-skill results");
    println!("----------------------");
    println!("trials:             {}", args.trials);
    println!("target number:      {}", args.tn);
    println!(
        "rating:             {}{}",
        args.rating,
        if args.favoured { " (favoured)" } else { "" }
    );
    println!("advantage:          {:+}", args.advantage);
    println!("conditions:         {}", flags);
    println!();
    println!("success rate:       {:.1}%", successes as f64 / trials_f * 100.0);
    println!("gandalf rate:       {:.1}%", gandalf as f64 / trials_f * 100.0);
    println!("eye rate:           {:.1}%", eye as f64 / trials_f * 100.0);
    println!("avg total:          {:.2}", avg_total);
    println!("median total:       {:.1}", median_total);

    Ok(())
}
