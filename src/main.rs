use futurama_chess::chess_boards::perft::perft;
use futurama_chess::engines::{find_best_move_in_background, ChessEngine, EngineConfig, RandomEngine, UciEngine};
use futurama_chess::{Color, GameSession, GameState, Move};

use std::io::{stdin, stdout, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::arg;
use clap::command;
use clap::Command;
use log::{info, warn};

use tabled::settings::Style;
use tabled::Table;
use tabled::Tabled;

const ENGINE_GRACE: Duration = Duration::from_secs(5);

fn main() {
    let matches = command!()
        .version("v0.1.0")
        .propagate_version(true)
        .arg(arg!(
            -d --debug "Turn debugging information on"
        ))
        .subcommand(
            Command::new("play")
                .about("Play a game in the terminal")
                .arg(arg!(--computer "Let the computer play Black"))
                .arg(
                    arg!(
                    -e --engine <PATH> "UCI engine executable for the computer side"
                            )
                    .required(false)
                    .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(
                    -t --movetime <ms> "Engine thinking time per move"
                            )
                    .default_value("2000")
                    .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(
                    -s --skill <level> "Engine skill level"
                            )
                    .required(false)
                    .value_parser(clap::value_parser!(u8)),
                )
                .arg(
                    arg!(
                    --seed <seed> "Seed of the random mover"
                            )
                    .default_value("42")
                    .value_parser(clap::value_parser!(u64)),
                ),
        )
        .subcommand(
            Command::new("moves").about("List the legal moves of the side to move").arg(
                arg!(
                -m --moves <moves> "Moves played so far"
                        )
                .num_args(1..)
                .value_parser(clap::value_parser!(String)),
            ),
        )
        .subcommand(
            Command::new("perft")
                .about("Run Perft test")
                .arg(
                    arg!(
                    -x --depth <d> "depth"
                            )
                    .default_value("3")
                    .value_parser(clap::value_parser!(u8)),
                )
                .arg(
                    arg!(
                    -m --moves <moves> "List of moves"
                            )
                    .num_args(1..)
                    .value_parser(clap::value_parser!(String)),
                ),
        )
        .subcommand(
            Command::new("replay")
                .about("Replay a saved game and show the result")
                .arg(arg!(<FILE> "Saved game").value_parser(clap::value_parser!(PathBuf))),
        )
        .get_matches();

    init_logging(matches.get_flag("debug"));

    match matches.subcommand() {
        Some(("play", arg_matches)) => {
            let config = EngineConfig {
                path: arg_matches.get_one::<PathBuf>("engine").cloned(),
                movetime_ms: arg_matches.get_one::<u64>("movetime").copied().unwrap_or(2000),
                skill_level: arg_matches.get_one::<u8>("skill").copied(),
                seed: arg_matches.get_one::<u64>("seed").copied().unwrap_or(42),
            };
            let against_computer = arg_matches.get_flag("computer") || config.path.is_some();
            play(config, against_computer);
        }
        Some(("moves", arg_matches)) => {
            list_moves(&move_args(arg_matches));
        }
        Some(("perft", arg_matches)) => {
            let depth = arg_matches.get_one::<u8>("depth").copied().unwrap_or(3);
            run_perft(&move_args(arg_matches), depth);
        }
        Some(("replay", arg_matches)) => {
            if let Some(path) = arg_matches.get_one::<PathBuf>("FILE") {
                replay(path);
            }
        }
        None => {
            play(EngineConfig::default(), false);
        }
        _ => unreachable!("Exhausted list of subcommands"),
    }
}

fn init_logging(debug: bool) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn move_args(arg_matches: &clap::ArgMatches) -> Vec<String> {
    arg_matches
        .get_many::<String>("moves")
        .unwrap_or_default()
        .filter(|v| !v.is_empty())
        .cloned()
        .collect()
}

fn session_after(moves: &[String]) -> GameSession {
    let mut session = GameSession::new();
    for m in moves {
        if let Err(e) = session.make_move_algebraic(m) {
            eprintln!("Invalid move {}: {}", m, e);
            process::exit(1);
        }
    }
    session
}

#[derive(Tabled)]
struct MoveRow {
    piece: char,
    from: String,
    to: String,
    uci: String,
    capture: String,
}

fn list_moves(moves: &[String]) {
    let session = session_after(moves);
    print_moves(&session);
}

fn print_moves(session: &GameSession) {
    let board = session.board();
    let rows: Vec<MoveRow> = session
        .legal_moves()
        .into_iter()
        .map(|mv| MoveRow {
            piece: board.piece_at(mv.from).map(|p| p.to_char()).unwrap_or(' '),
            from: mv.from.as_algebraic(),
            to: mv.to.as_algebraic(),
            uci: mv.as_algebraic(),
            capture: board.piece_at(mv.to).map(|p| p.to_char().to_string()).unwrap_or_default(),
        })
        .collect();
    println!("{} to move, {} legal moves", session.current_side(), rows.len());
    println!("{}", Table::new(rows).with(Style::modern()));
}

fn run_perft(moves: &[String], depth: u8) {
    println!("Perft test for moves {:?} with depth {}", moves, depth);
    let session = session_after(moves);

    let mut result_moves = Vec::<(String, u64)>::new();
    for mv in session.legal_moves() {
        let mut new_board = session.board().clone();
        new_board.apply(mv);
        let count = perft(&new_board, session.current_side().opposite(), depth.max(1) - 1);
        result_moves.push((mv.as_algebraic(), count));
    }
    result_moves.sort();

    let mut num_nodes = 0;
    for (m, c) in result_moves {
        println!("{}: {}", m, c);
        num_nodes += c;
    }
    println!("\nNodes searched: {}", num_nodes);
}

fn replay(path: &Path) {
    match load(path) {
        Ok(session) => {
            println!("{}", session.board().render_to_string());
            println!("Moves: {}", session.uci_move_list());
            print_status(&session);
        }
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}

fn load(path: &Path) -> Result<GameSession, String> {
    let record = std::fs::read_to_string(path).map_err(|e| format!("Error loading game: {}", e))?;
    GameSession::from_record(&record).map_err(|e| format!("Error loading game: {}", e))
}

fn save(session: &GameSession, path: &Path) -> Result<(), String> {
    let record = session.to_record().map_err(|e| format!("Error saving game: {}", e))?;
    std::fs::write(path, record).map_err(|e| format!("Error saving game: {}", e))
}

fn print_status(session: &GameSession) {
    match session.state() {
        GameState::InProgress => println!("Current turn: {}", session.current_side()),
        GameState::Over(winner) => println!("Game Over! Winner: {}", winner),
    }
}

/// The computer side: an external engine if one was started, the random mover otherwise
/// or whenever the engine has nothing usable to say.
struct Opponent {
    engine: Option<Arc<Mutex<dyn ChessEngine + Send>>>,
    fallback: RandomEngine,
    timeout: Duration,
}

impl Opponent {
    fn new(config: EngineConfig) -> Self {
        let engine: Option<Arc<Mutex<dyn ChessEngine + Send>>> = match &config.path {
            Some(path) => match UciEngine::spawn(config.clone()) {
                Ok(engine) => Some(Arc::new(Mutex::new(engine))),
                Err(e) => {
                    warn!("could not start engine {}: {}", path.display(), e);
                    None
                }
            },
            None => None,
        };
        Self {
            engine,
            fallback: RandomEngine::new(config.seed),
            timeout: Duration::from_millis(config.movetime_ms) + ENGINE_GRACE,
        }
    }

    fn reply(&mut self, session: &mut GameSession) {
        let suggested = self.engine.as_ref().and_then(|engine| {
            let receiver = find_best_move_in_background(Arc::clone(engine), session.clone());
            receiver.recv_timeout(self.timeout).unwrap_or_else(|_| {
                warn!("engine did not answer within {:?}", self.timeout);
                None
            })
        });

        if let Some(mv) = suggested {
            match session.make_move(mv) {
                Ok(_) => {
                    println!("Computer plays {}", mv);
                    return;
                }
                Err(e) => warn!("engine suggested {}: {}", mv, e),
            }
        }

        let Some(mv) = self.fallback.find_best_move(session) else {
            println!("No move available for the computer.");
            return;
        };
        match session.make_move(mv) {
            Ok(_) => println!("Computer plays {}", mv),
            Err(e) => warn!("random mover suggested {}: {}", mv, e),
        }
    }
}

fn print_help() {
    println!("Enter moves like e2e4. Other commands:");
    println!("  board          show the board");
    println!("  moves          list legal moves");
    println!("  undo           take back the last move");
    println!("  save <file>    save the game");
    println!("  load <file>    load a saved game");
    println!("  quit           leave");
}

fn play(config: EngineConfig, against_computer: bool) {
    let mut session = GameSession::new();
    let mut opponent = if against_computer {
        info!("single player mode");
        Some(Opponent::new(config))
    } else {
        None
    };

    println!("{}", session.board().render_to_string());
    print_status(&session);
    prompt();

    for line in stdin().lock().lines() {
        let line = match line {
            Ok(l) => l.trim().to_string(),
            Err(_) => continue,
        };

        if line.is_empty() {
            prompt();
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens[0] {
            "quit" | "exit" => {
                return;
            }
            "help" => {
                print_help();
            }
            "board" => {
                println!("{}", session.board().render_to_string());
            }
            "moves" => {
                print_moves(&session);
            }
            "undo" => {
                let plies = if opponent.is_some() && session.current_side() == Color::White { 2 } else { 1 };
                let taken: Vec<Move> = (0..plies).filter_map(|_| session.take_back()).collect();
                if taken.is_empty() {
                    println!("Nothing to take back.");
                } else {
                    println!("{}", session.board().render_to_string());
                }
            }
            "save" => match tokens.get(1) {
                Some(path) => match save(&session, Path::new(path)) {
                    Ok(()) => println!("Game saved successfully."),
                    Err(e) => println!("{}", e),
                },
                None => println!("usage: save <file>"),
            },
            "load" => match tokens.get(1) {
                Some(path) => match load(Path::new(path)) {
                    Ok(loaded) => {
                        session = loaded;
                        println!("Game loaded successfully.");
                        println!("{}", session.board().render_to_string());
                    }
                    Err(e) => println!("{}", e),
                },
                None => println!("usage: load <file>"),
            },
            mv => match session.make_move_algebraic(mv) {
                Ok(_) => {
                    if let Some(opponent) = opponent.as_mut() {
                        if !session.is_over() && session.current_side() == Color::Black {
                            opponent.reply(&mut session);
                        }
                    }
                    println!("{}", session.board().render_to_string());
                }
                Err(e) => println!("{}", e),
            },
        }
        print_status(&session);
        prompt();
    }
}

fn prompt() {
    print!("> ");
    let _ = stdout().flush();
}
