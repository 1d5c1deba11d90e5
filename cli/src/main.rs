//! # 1024 CLI
//!
//! Command-line interface for playing 1024 interactively or running
//! headless simulations with configurable policies.

use clap::{Parser, ValueEnum};
use env_logger::Env;
use game_1024_core::{Direction, Game, GameError, GameState, MAX_SIDE, MIN_SIDE};
use log::{error, info};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::io::{self, BufRead, Read, Write};

#[derive(Parser, Debug)]
#[command(name = "game-1024")]
#[command(author, version, about = "Play 1024 in the terminal or run simulations")]
struct Args {
    /// Run in interactive mode (default if no other mode specified)
    #[arg(short, long)]
    interactive: bool,

    /// Squares per side of the board
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u8).range(MIN_SIDE as i64..=MAX_SIDE as i64))]
    size: u8,

    /// Random seed for deterministic runs (random if omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of episodes to run in headless mode
    #[arg(short, long)]
    episodes: Option<u32>,

    /// Maximum steps per episode (0 = unlimited)
    #[arg(short, long, default_value = "10000")]
    max_steps: u32,

    /// Policy for headless mode
    #[arg(short, long, value_enum, default_value = "random")]
    policy: Policy,

    /// Show board after each move in headless mode
    #[arg(long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Policy {
    /// Random legal moves
    Random,
    /// Cycle through moves: Left, Down, Right, Up
    Cycle,
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);
    info!("seed {}", seed);

    let result = match args.episodes {
        Some(episodes) if !args.interactive => run_headless(&args, seed, episodes),
        _ => run_interactive(&args, seed),
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

// =============================================================================
// Interactive mode
// =============================================================================

/// Run interactive mode where the user plays with the keyboard.
fn run_interactive(args: &Args, seed: u64) -> Result<(), Box<dyn std::error::Error>> {
    let mut game = Game::new(usize::from(args.size), seed)?;
    let _raw = RawMode::enable();
    let mut stdin = io::stdin();
    let mut buffer = [0u8; 3];
    let mut message = format!("Game ends when you reach {}.", game.target());

    loop {
        redraw(&game, &message)?;
        message.clear();

        let bytes_read = stdin.read(&mut buffer)?;
        if bytes_read == 0 {
            // stdin closed
            game.exit();
            break;
        }

        match parse_input(&buffer[..bytes_read]) {
            InputAction::Move(direction) => {
                let was_won = game.state() == GameState::Won;
                let outcome = game.apply_move(direction);
                if outcome.score_delta > 0 {
                    message = format!("  +{} points!", outcome.score_delta);
                }
                let stuck = game.legal_moves() == [false; 4];
                match outcome.state {
                    GameState::Won if !was_won && stuck => {
                        message = format!(
                            "Congratulations!  You made it to {}!!!  No more available moves.  \
                             R to restart or X to quit.",
                            game.target()
                        );
                    }
                    GameState::Won if !was_won => {
                        message = format!(
                            "Congratulations!  You made it to {}!!!  Keep going, or X to quit.",
                            game.target()
                        );
                    }
                    GameState::Blocked | GameState::Won if stuck && outcome.changed => {
                        message = format!(
                            "No more available moves.  Game is over.  Final score: {}.  \
                             U to undo, R to restart or X to quit.",
                            game.score()
                        );
                    }
                    _ => {}
                }
            }
            InputAction::Undo => {
                message = match game.undo() {
                    Ok(()) => "* Undoing move *".to_string(),
                    Err(e) => retry(e),
                };
            }
            InputAction::Restart => {
                let line = prompt_line(&format!(
                    "Enter the size board you want, between {} and {}: ",
                    MIN_SIDE, MAX_SIDE
                ))?;
                message = match line.trim().parse::<usize>() {
                    Ok(side) => match game.reset(side) {
                        Ok(()) => format!("Game ends when you reach {}.", game.target()),
                        Err(e) => retry(e),
                    },
                    Err(_) => "Invalid board size, please retry.".to_string(),
                };
            }
            InputAction::Place => {
                let line = prompt_line("Enter index and value: ")?;
                message = match parse_placement(&line) {
                    Some((index, value)) => match game.debug_set_cell(index, value) {
                        Ok(()) => format!("Placed {} at {}.", value, index),
                        Err(e) => retry(e),
                    },
                    None => "Expected two numbers, please retry.".to_string(),
                };
            }
            InputAction::Quit => {
                game.exit();
                break;
            }
            InputAction::None => {
                message = "Invalid input, please retry.".to_string();
            }
        }
    }

    println!("\nThanks for playing.  Final score: {}", game.score());
    Ok(())
}

fn retry(e: GameError) -> String {
    format!("*** {}.  Please retry. ***", e)
}

fn redraw(game: &Game, message: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    write!(out, "\x1b[2J\x1b[H")?; // Clear screen
    writeln!(out, "=== 1024 ===")?;
    writeln!(out, "{}", controls(game))?;
    write!(out, "{}", game)?;
    writeln!(out, "        Move {}    Target {}", game.move_counter(), game.target())?;
    writeln!(out, "        List: {}", game.history())?;
    writeln!(out)?;
    if !message.is_empty() {
        writeln!(out, "  {}", message)?;
    }
    write!(out, "{}. Your move: ", game.move_counter())?;
    out.flush()
}

/// Key hints; undo is only offered when there is a move to take back.
fn controls(game: &Game) -> String {
    let undo = if game.history().can_undo() { " | U undo" } else { "" };
    format!(
        "Controls: WASD or Arrow Keys{} | R restart | P place | X quit",
        undo
    )
}

/// Read one line with normal terminal echo, then go back to raw mode.
fn prompt_line(prompt: &str) -> io::Result<String> {
    disable_raw_mode();
    print!("\n{}", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    enable_raw_mode();
    Ok(line)
}

fn parse_placement(line: &str) -> Option<(usize, u32)> {
    let mut parts = line.split_whitespace();
    let index = parts.next()?.parse().ok()?;
    let value = parts.next()?.parse().ok()?;
    match parts.next() {
        Some(_) => None,
        None => Some((index, value)),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum InputAction {
    Move(Direction),
    Undo,
    Restart,
    Place,
    Quit,
    None,
}

fn parse_input(bytes: &[u8]) -> InputAction {
    match bytes {
        // Arrow keys (escape sequences)
        [27, 91, 65] => InputAction::Move(Direction::Up),
        [27, 91, 66] => InputAction::Move(Direction::Down),
        [27, 91, 67] => InputAction::Move(Direction::Right),
        [27, 91, 68] => InputAction::Move(Direction::Left),

        // WASD keys
        [b'w'] | [b'W'] => InputAction::Move(Direction::Up),
        [b's'] | [b'S'] => InputAction::Move(Direction::Down),
        [b'a'] | [b'A'] => InputAction::Move(Direction::Left),
        [b'd'] | [b'D'] => InputAction::Move(Direction::Right),

        // Control keys
        [b'u'] | [b'U'] => InputAction::Undo,
        [b'r'] | [b'R'] => InputAction::Restart,
        [b'p'] | [b'P'] => InputAction::Place,
        [b'x'] | [b'X'] | [b'q'] | [b'Q'] | [3] | [27] => InputAction::Quit, // Ctrl+C, Esc

        _ => InputAction::None,
    }
}

// =============================================================================
// Headless mode
// =============================================================================

/// Run headless simulation mode.
fn run_headless(args: &Args, seed: u64, episodes: u32) -> Result<(), Box<dyn std::error::Error>> {
    if episodes == 0 {
        return Err("--episodes must be at least 1".into());
    }

    let mut scores: Vec<u64> = Vec::with_capacity(episodes as usize);
    let mut tile_counts: BTreeMap<u32, u32> = BTreeMap::new();
    let mut wins = 0u32;

    // Use a separate RNG for move selection
    let mut policy_rng = SmallRng::seed_from_u64(seed.wrapping_add(1000));

    for episode in 0..episodes {
        let episode_seed = seed.wrapping_add(u64::from(episode));
        let mut game = Game::new(usize::from(args.size), episode_seed)?;
        let mut steps = 0;
        let mut cycle = 0;
        let mut reached_target = false;

        while game.state() != GameState::Blocked && (args.max_steps == 0 || steps < args.max_steps) {
            let direction = match args.policy {
                Policy::Random => select_random_move(&game, &mut policy_rng),
                Policy::Cycle => select_cycle_move(&game, &mut cycle),
            };
            let Some(direction) = direction else {
                break; // No legal moves
            };

            let outcome = game.apply_move(direction);
            steps += 1;
            reached_target |= outcome.state == GameState::Won;

            if args.verbose {
                println!("Episode {} Step {}: {:?}", episode + 1, steps, direction);
                print!("{}", game);
            }
        }

        let max_tile = game.grid().max_tile();
        scores.push(game.score());
        *tile_counts.entry(max_tile).or_insert(0) += 1;
        if reached_target {
            wins += 1;
        }

        if args.verbose {
            println!(
                "Episode {}: Score={}, MaxTile={}, Steps={}",
                episode + 1,
                game.score(),
                max_tile,
                steps
            );
        }
    }

    // Compute statistics
    let total_score: u64 = scores.iter().sum();
    let avg_score = total_score as f64 / f64::from(episodes);
    scores.sort_unstable();
    let mid = scores.len() / 2;
    let median_score = if scores.len() % 2 == 0 {
        (scores[mid - 1] + scores[mid]) as f64 / 2.0
    } else {
        scores[mid] as f64
    };

    // Output results in parseable format
    println!("=== Simulation Results ===");
    println!("episodes={}", episodes);
    println!("size={}", args.size);
    println!("policy={:?}", args.policy);
    println!("seed={}", seed);
    println!("max_steps={}", args.max_steps);
    println!("avg_score={:.2}", avg_score);
    println!("median_score={:.2}", median_score);
    println!("min_score={}", scores.first().copied().unwrap_or(0));
    println!("max_score={}", scores.last().copied().unwrap_or(0));
    println!(
        "max_tile_overall={}",
        tile_counts.keys().next_back().copied().unwrap_or(0)
    );
    println!("wins={}", wins);
    let distribution: Vec<String> = tile_counts
        .iter()
        .map(|(tile, count)| format!("{}:{}", tile, count))
        .collect();
    println!("tile_distribution={}", distribution.join(","));
    Ok(())
}

/// Select a random legal move.
fn select_random_move(game: &Game, rng: &mut SmallRng) -> Option<Direction> {
    let legal = game.legal_moves();
    let valid: Vec<Direction> = Direction::all()
        .into_iter()
        .zip(legal)
        .filter(|&(_, ok)| ok)
        .map(|(d, _)| d)
        .collect();

    if valid.is_empty() {
        None
    } else {
        Some(valid[rng.gen_range(0..valid.len())])
    }
}

/// Select moves in a cycle: Left, Down, Right, Up.
fn select_cycle_move(game: &Game, cycle: &mut usize) -> Option<Direction> {
    const ORDER: [Direction; 4] = [
        Direction::Left,
        Direction::Down,
        Direction::Right,
        Direction::Up,
    ];
    let legal = game.legal_moves();

    // Try moves in cycle order, starting from current position
    for _ in 0..ORDER.len() {
        let direction = ORDER[*cycle % ORDER.len()];
        *cycle += 1;
        if legal[direction as usize] {
            return Some(direction);
        }
    }

    None
}

// =============================================================================
// Terminal raw mode
// =============================================================================

/// Keeps the terminal in raw mode until dropped.
struct RawMode;

impl RawMode {
    fn enable() -> Self {
        enable_raw_mode();
        RawMode
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        disable_raw_mode();
    }
}

#[cfg(unix)]
fn enable_raw_mode() {
    use std::os::unix::io::AsRawFd;
    unsafe {
        let fd = io::stdin().as_raw_fd();
        let mut termios: libc::termios = std::mem::zeroed();
        if libc::tcgetattr(fd, &mut termios) != 0 {
            return; // not a terminal
        }
        termios.c_lflag &= !(libc::ICANON | libc::ECHO);
        termios.c_cc[libc::VMIN] = 1;
        termios.c_cc[libc::VTIME] = 0;
        libc::tcsetattr(fd, libc::TCSANOW, &termios);
    }
}

#[cfg(unix)]
fn disable_raw_mode() {
    use std::os::unix::io::AsRawFd;
    unsafe {
        let fd = io::stdin().as_raw_fd();
        let mut termios: libc::termios = std::mem::zeroed();
        if libc::tcgetattr(fd, &mut termios) != 0 {
            return;
        }
        termios.c_lflag |= libc::ICANON | libc::ECHO;
        libc::tcsetattr(fd, libc::TCSANOW, &termios);
    }
}

#[cfg(not(unix))]
fn enable_raw_mode() {
    // Interactive mode will require Enter after each key
}

#[cfg(not(unix))]
fn disable_raw_mode() {}
