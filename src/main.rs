use std::cell::Cell;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use turn_dungeon::error::{GameError, handle_error};
use turn_dungeon::input::{Command, HELP};
use turn_dungeon::{Campaign, GameConfig, GameSession, LevelSource, Outcome, Progress, TurnState};

#[derive(Parser)]
#[command(name = "turn_dungeon")]
#[command(about = "A turn-based dungeon crawler played on a text grid")]
#[command(version)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Play a single map instead of the configured levels
    #[arg(long, requires = "enemies")]
    map: Option<PathBuf>,

    /// Enemy roster for --map
    #[arg(long, requires = "map")]
    enemies: Option<PathBuf>,

    /// Seed for enemy wandering
    #[arg(long)]
    seed: Option<u64>,

    /// Verbose logging (-v, -vv for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// 把加载错误转换成带玩家可读提示的 anyhow 错误
fn friendly(error: GameError) -> anyhow::Error {
    let message = handle_error(&error);
    anyhow::Error::new(error).context(message)
}

fn load_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)
            .map_err(friendly)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let (Some(map), Some(enemies)) = (&cli.map, &cli.enemies) {
        config.levels = vec![LevelSource {
            map: map.clone(),
            enemies: enemies.clone(),
        }];
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    Ok(config)
}

/// Observer state shared with the session callbacks
#[derive(Default)]
struct Screen {
    dirty: Rc<Cell<bool>>,
}

impl Screen {
    fn attach(session: &mut GameSession) -> Self {
        let screen = Screen::default();
        let dirty = Rc::clone(&screen.dirty);
        session.subscribe_changes(move || dirty.set(true));
        session.subscribe_end(|victory| {
            println!("{}", if victory { "*** VICTORY ***" } else { "*** DEFEAT ***" });
        });
        screen
    }

    fn redraw(&self, session: &mut GameSession) {
        if !self.dirty.replace(false) {
            return;
        }
        println!();
        print!("{}", session.render());
        let order: Vec<String> = session
            .turn_order()
            .iter()
            .map(|view| format!("{} {}hp spd {}", view.name, view.stats.health, view.stats.speed))
            .collect();
        println!("Round {} | {}", session.round(), order.join(" > "));
        for message in session.drain_messages() {
            println!("  {message}");
        }
    }
}

/// Play one level. Returns `None` when the player quits.
fn run_level<I>(session: &mut GameSession, delay: Duration, lines: &mut I) -> Result<Option<Outcome>>
where
    I: Iterator<Item = io::Result<String>>,
{
    let screen = Screen::attach(session);

    // 与 `start` 相同的顺序，但每个敌人行动之间留出展示间隔
    session.notify_changed();
    let mut state = match session.check_end() {
        Outcome::Undecided => session.step(),
        outcome => TurnState::Finished(outcome),
    };

    loop {
        screen.redraw(session);
        match state {
            TurnState::Finished(outcome) => return Ok(Some(outcome)),
            TurnState::EnemyActed(_) => {
                thread::sleep(delay);
                state = session.step();
            }
            TurnState::PlayerTurn => {
                print!("> ");
                io::stdout().flush().context("Failed to flush stdout")?;
                let Some(line) = lines.next() else {
                    return Ok(None);
                };
                let line = line.context("Failed to read command")?;
                match line.parse::<Command>() {
                    Ok(Command::Quit) => return Ok(None),
                    Ok(Command::Help) => println!("{HELP}"),
                    Ok(Command::Move(direction)) => {
                        let (d_row, d_col) = direction.delta();
                        if session.move_player(d_row, d_col) {
                            state = session.end_player_turn();
                        } else {
                            println!("You can't go that way.");
                        }
                    }
                    Err(e) => println!("{e} (h for help)"),
                }
            }
        }
    }
}

fn ask_retry<I>(lines: &mut I) -> Result<bool>
where
    I: Iterator<Item = io::Result<String>>,
{
    print!("Try again? [y/n] ");
    io::stdout().flush().context("Failed to flush stdout")?;
    match lines.next() {
        Some(line) => Ok(line
            .context("Failed to read answer")?
            .trim()
            .eq_ignore_ascii_case("y")),
        None => Ok(false),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli)?;
    let delay = Duration::from_millis(config.enemy_delay_ms);
    let hero = config
        .hero()
        .map_err(friendly)
        .context("Invalid hero in config")?;
    let mut campaign = Campaign::new(config, hero)
        .map_err(friendly)
        .context("Nothing to play: pass --map and --enemies or list levels in --config")?;

    println!("{HELP}");
    let mut lines = io::stdin().lock().lines();
    let mut session = campaign.start_level().map_err(friendly)?;

    loop {
        println!(
            "\n== Level {}/{} ==",
            campaign.level_index() + 1,
            campaign.level_count()
        );
        let Some(outcome) = run_level(&mut session, delay, &mut lines)? else {
            println!("Bye.");
            return Ok(());
        };

        session = match outcome {
            Outcome::Victory => match campaign.advance_level(&session) {
                Progress::NextLevel(_) => campaign.start_level().map_err(friendly)?,
                Progress::Completed => {
                    println!("All levels cleared. Well done, {}!", campaign.hero().name);
                    return Ok(());
                }
                Progress::Pending => return Ok(()),
            },
            _ => {
                if !ask_retry(&mut lines)? {
                    return Ok(());
                }
                campaign.retry().map_err(friendly)?
            }
        };
    }
}
