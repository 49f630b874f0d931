use super::{ChessEngine, EngineConfig};
use crate::chess_boards::chess_board::Move;
use crate::game::GameSession;
use log::{debug, warn};
use std::io::{self, BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

/// Client side of the UCI protocol, talking to an external engine over a pair of
/// line streams. Usually those are the pipes of a child process.
pub struct UciEngine<R: BufRead, W: Write> {
    reader: R,
    writer: W,
    child: Option<Child>,
    config: EngineConfig,
    name: String,
    initialized: bool,
}

impl UciEngine<BufReader<ChildStdout>, ChildStdin> {
    pub fn spawn(config: EngineConfig) -> io::Result<Self> {
        let path = config
            .path
            .clone()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no engine path configured"))?;
        let mut child = Command::new(&path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "engine stdin unavailable"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "engine stdout unavailable"))?;
        debug!("started engine {}", path.display());

        let mut engine = Self::with_streams(BufReader::new(stdout), stdin, config);
        engine.child = Some(child);
        Ok(engine)
    }
}

impl<R: BufRead, W: Write> UciEngine<R, W> {
    pub fn with_streams(reader: R, writer: W, config: EngineConfig) -> Self {
        let name = config
            .path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "UCI Engine".to_string());
        Self {
            reader,
            writer,
            child: None,
            config,
            name,
            initialized: false,
        }
    }

    fn send(&mut self, command: &str) -> io::Result<()> {
        debug!("> {}", command);
        writeln!(self.writer, "{}", command)?;
        self.writer.flush()
    }

    /// Reads until a line starting with `keyword`. `None` on end of stream.
    fn wait_for(&mut self, keyword: &str) -> io::Result<Option<String>> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            let trimmed = line.trim();
            debug!("< {}", trimmed);
            if let Some(name) = trimmed.strip_prefix("id name ") {
                self.name = name.to_string();
            }
            if trimmed.split_whitespace().next() == Some(keyword) {
                return Ok(Some(trimmed.to_string()));
            }
        }
    }

    fn handshake(&mut self) -> io::Result<bool> {
        self.send("uci")?;
        if self.wait_for("uciok")?.is_none() {
            return Ok(false);
        }
        if let Some(level) = self.config.skill_level {
            self.send(&format!("setoption name Skill Level value {}", level))?;
        }
        self.send("isready")?;
        Ok(self.wait_for("readyok")?.is_some())
    }

    /// Sends the game so far and waits for the engine's choice.
    pub fn request_move(&mut self, move_list: &str) -> io::Result<Option<Move>> {
        if !self.initialized {
            if !self.handshake()? {
                warn!("{} did not finish the UCI handshake", self.name);
                return Ok(None);
            }
            self.initialized = true;
        }

        if move_list.is_empty() {
            self.send("position startpos")?;
        } else {
            self.send(&format!("position startpos moves {}", move_list))?;
        }
        self.send(&format!("go movetime {}", self.config.movetime_ms))?;

        let Some(line) = self.wait_for("bestmove")? else {
            warn!("{} closed its output before answering", self.name);
            return Ok(None);
        };
        let best_move = parse_bestmove(&line);
        if best_move.is_none() {
            warn!("unusable reply from {}: {}", self.name, line);
        }
        Ok(best_move)
    }
}

/// `bestmove e2e4 ponder e7e5` gives `e2e4`. Anything else, including `(none)` and
/// promotion suffixes, gives `None`.
pub fn parse_bestmove(line: &str) -> Option<Move> {
    let mut tokens = line.split_whitespace();
    if tokens.next()? != "bestmove" {
        return None;
    }
    Move::from_algebraic(tokens.next()?).ok()
}

impl<R: BufRead, W: Write> ChessEngine for UciEngine<R, W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn find_best_move(&mut self, session: &GameSession) -> Option<Move> {
        if session.is_over() {
            return None;
        }
        match self.request_move(&session.uci_move_list()) {
            Ok(best_move) => best_move,
            Err(e) => {
                warn!("error communicating with {}: {}", self.name, e);
                None
            }
        }
    }
}

impl<R: BufRead, W: Write> Drop for UciEngine<R, W> {
    fn drop(&mut self) {
        let _ = self.send("quit");
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}
