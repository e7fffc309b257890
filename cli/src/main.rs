use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use loresheet::sheet::{render_text, SheetView};
use loresheet::store::{read_actor_file, ActorStore};
use loresheet::tooltips::Tooltips;
use loresheet::{resolve, roll_skill, Actor, Character, Dice, RollResult, StateFlags};
use tracing_subscriber::EnvFilter;

#[derive(Subcommand)]
enum Cmd {
    /// Roll a feat die plus success dice
    Roll {
        /// Skill rating (number of success dice)
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        rating: i32,
        /// Roll two feat dice and keep the best
        #[arg(long)]
        favoured: bool,
        /// Extra (+) or fewer (-) success dice
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        advantage: i32,
        /// Condition tags, e.g. --state weary --state miserable
        #[arg(long = "state")]
        states: Vec<String>,
        /// Target number; prints SUCCESS/FAIL when given
        #[arg(long)]
        tn: Option<i32>,
        /// RNG seed for determinism (random when omitted)
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Roll one of a character's skills against its target number
    Check {
        /// Path to the actor JSON file
        #[arg(long)]
        actor: PathBuf,
        /// Skill key or name, e.g. `athletics`
        #[arg(long)]
        skill: String,
        /// Extra (+) or fewer (-) success dice
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        advantage: i32,
        /// RNG seed for determinism (random when omitted)
        #[arg(long)]
        seed: Option<u64>,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render a character sheet
    Sheet {
        /// Path to the actor JSON file
        #[arg(long)]
        actor: PathBuf,
        /// Tooltip glossary (.json or .yaml)
        #[arg(long)]
        tooltips: Option<PathBuf>,
        /// Print the sheet view as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List actor records in a data directory
    Files {
        #[arg(long, default_value = "data")]
        data: PathBuf,
    },
}

#[derive(Parser)]
#[command(name = "loresheet")]
#[command(about = "Character sheets and skill rolls from actor JSON")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

fn load_character(path: &Path) -> anyhow::Result<Character> {
    let actor = read_actor_file(path)
        .with_context(|| format!("failed to load actor: {}", path.display()))?;
    match actor {
        Actor::Character(c) => Ok(*c),
        Actor::Generic(g) => bail!("'{}' is a {} actor, not a character", g.name, g.kind),
    }
}

fn format_roll(res: &RollResult) -> String {
    let feat = match res.feat.rolled.as_slice() {
        [only] => format!("feat={}", only),
        [a, b] => format!("feat={} vs {} (keep={})", a, b, res.feat.kept),
        _ => format!("feat={}", res.feat.kept),
    };
    let marker = if res.is_gandalf() {
        " [GANDALF]"
    } else if res.is_eye() {
        " [EYE]"
    } else {
        ""
    };
    let skill: Vec<String> = res.skill.kept.iter().map(|d| d.to_string()).collect();
    format!(
        "{}{} → {} | success=[{}] → {} | total={}",
        feat,
        marker,
        res.feat.total,
        skill.join(", "),
        res.skill.total,
        res.total
    )
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Roll { rating, favoured, advantage, states, tn, seed } => {
            let flags = StateFlags::from_tags(&states);
            let mut dice = Dice::seeded_or_random(seed);
            let res = resolve(&mut dice, rating, favoured, &flags, advantage);
            println!("{}", format_roll(&res));
            if let Some(tn) = tn {
                let passed = loresheet::check::passes(res.total, tn);
                println!("tn={} => {}", tn, if passed { "SUCCESS" } else { "FAIL" });
            }
        }
        Cmd::Check { actor, skill, advantage, seed, json } => {
            let character = load_character(&actor)?;
            let mut dice = Dice::seeded_or_random(seed);
            let check = roll_skill(&mut dice, &character, &skill, advantage)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&check)?);
            } else {
                println!(
                    "{} ({} TN {}) rating={} advantage={:+} conditions={}",
                    check.skill, check.attribute, check.tn, check.rating, check.advantage, check.flags
                );
                println!("{}", format_roll(&check.roll));
                println!("=> {}", check.outcome());
            }
        }
        Cmd::Sheet { actor, tooltips, json } => {
            let character = load_character(&actor)?;
            let tips = match tooltips {
                Some(path) => Tooltips::from_path(&path)?,
                None => Tooltips::empty(),
            };
            let view = SheetView::build(&character, &tips);
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print!("{}", render_text(&view));
            }
        }
        Cmd::Files { data } => {
            let store = ActorStore::new(data);
            for name in store.list()? {
                println!("{}", name);
            }
        }
    }
    Ok(())
}
