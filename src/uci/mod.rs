//! Universal Chess Interface (UCI) protocol implementation.
//!
//! A [`UciSession`] owns the current position and answers one text line at a
//! time on any [`Write`] sink, so the same code drives stdout in the binary
//! and an in-memory buffer in tests.

use std::fmt;
use std::io::{self, BufRead, Write};
use std::time::Instant;

use crate::board::{FenError, MoveParseError, Position};
use crate::policy::{MovePolicy, RandomPolicy};

pub mod command;
pub mod options;

use command::{parse_uci_command, UciCommand};
use options::{parse_setoption, UciOptionAction, UciOptions};

const ENGINE_NAME: &str = "chess_core";
const ENGINE_AUTHOR: &str = "the chess_core developers";

/// Error type for protocol commands that cannot be carried out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UciError {
    /// Invalid FEN string
    InvalidFen(FenError),
    /// Invalid move in the move list
    InvalidMove { move_str: String, error: MoveParseError },
    /// Missing required parts in the command
    MissingParts,
    /// `setoption` for an option the engine does not have
    UnknownOption(String),
    /// `setoption` with a value the option cannot take
    InvalidOptionValue { name: String, value: String },
}

impl fmt::Display for UciError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UciError::InvalidFen(e) => write!(f, "Invalid FEN: {e}"),
            UciError::InvalidMove { move_str, error } => {
                write!(f, "Invalid move '{move_str}': {error}")
            }
            UciError::MissingParts => write!(f, "Missing required parts in command"),
            UciError::UnknownOption(name) => write!(f, "Unknown option '{name}'"),
            UciError::InvalidOptionValue { name, value } => {
                write!(f, "Invalid value '{value}' for option '{name}'")
            }
        }
    }
}

impl std::error::Error for UciError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UciError::InvalidFen(e) => Some(e),
            UciError::InvalidMove { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<FenError> for UciError {
    fn from(e: FenError) -> Self {
        UciError::InvalidFen(e)
    }
}

/// Engine identity. With `to_uci` the author goes on its own `id author` line.
#[must_use]
pub fn engine_info(to_uci: bool) -> String {
    let version = env!("CARGO_PKG_VERSION");
    if to_uci {
        format!("{ENGINE_NAME} {version}\nid author {ENGINE_AUTHOR}")
    } else {
        format!("{ENGINE_NAME} {version} by {ENGINE_AUTHOR}")
    }
}

/// Set up a position from the tokens of a `position` command.
///
/// The FEN part is all or nothing. Moves are then applied in order and the
/// first one that is not legal stops the list: the moves before it stay
/// applied and the offending move is returned as the error.
pub fn try_parse_position_command(parts: &[&str]) -> (Option<Position>, Option<UciError>) {
    let mut rest = parts.iter().copied().skip(1).peekable();
    let mut pos = match rest.next() {
        Some("startpos") => {
            if rest.peek() == Some(&"moves") {
                rest.next();
            }
            Position::startpos()
        }
        Some("fen") => {
            let fields: Vec<&str> = rest.by_ref().take_while(|t| *t != "moves").collect();
            match Position::from_fen(&fields.join(" ")) {
                Ok(pos) => pos,
                Err(e) => return (None, Some(e.into())),
            }
        }
        _ => return (None, Some(UciError::MissingParts)),
    };

    for text in rest {
        if let Err(error) = pos.do_move_str(text) {
            let err = UciError::InvalidMove {
                move_str: text.to_string(),
                error,
            };
            return (Some(pos), Some(err));
        }
    }
    (Some(pos), None)
}

/// One protocol conversation: the current position, the move policy and the
/// option values, answering on `out`.
pub struct UciSession<W: Write, P: MovePolicy = RandomPolicy> {
    out: W,
    position: Position,
    policy: P,
    options: UciOptions,
}

impl<W: Write> UciSession<W> {
    /// A session on the start position choosing moves at random.
    pub fn new(out: W) -> Self {
        Self::with_policy(out, RandomPolicy::from_entropy())
    }
}

impl<W: Write, P: MovePolicy> UciSession<W, P> {
    pub fn with_policy(out: W, policy: P) -> Self {
        UciSession {
            out,
            position: Position::startpos(),
            policy,
            options: UciOptions::new(),
        }
    }

    #[must_use]
    pub fn position(&self) -> &Position {
        &self.position
    }

    #[must_use]
    pub fn options(&self) -> &UciOptions {
        &self.options
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Handle one input line. Returns `false` once `quit` was received.
    pub fn handle_line(&mut self, line: &str) -> io::Result<bool> {
        log::debug!("<< {}", line.trim_end());
        let Some(cmd) = parse_uci_command(line) else {
            return Ok(true);
        };
        let keep_going = match cmd {
            UciCommand::Quit => false,
            UciCommand::Unknown(token) => {
                log::warn!("Unknown command: {token}");
                writeln!(self.out, "Unknown command: {}", line.trim())?;
                true
            }
            other => {
                self.handle_command(other)?;
                true
            }
        };
        self.out.flush()?;
        Ok(keep_going)
    }

    fn handle_command(&mut self, cmd: UciCommand) -> io::Result<()> {
        match cmd {
            UciCommand::Uci => {
                writeln!(self.out, "id name {}", engine_info(true))?;
                self.options.print(&mut self.out)?;
                writeln!(self.out, "uciok")
            }
            UciCommand::IsReady => writeln!(self.out, "readyok"),
            UciCommand::UciNewGame => {
                self.position = Position::startpos();
                Ok(())
            }
            UciCommand::Position(parts) => {
                let parts: Vec<&str> = parts.iter().map(String::as_str).collect();
                let (pos, err) = try_parse_position_command(&parts);
                if let Some(pos) = pos {
                    self.position = pos;
                    self.position.log_position();
                }
                match err {
                    Some(e) => self.report(&e),
                    None => Ok(()),
                }
            }
            UciCommand::Go(parts) => self.go(&parts),
            UciCommand::Display => {
                self.position.log_position();
                write!(self.out, "{}", self.position.print())
            }
            UciCommand::Perft(depth) => self.perft(depth),
            UciCommand::SetOption(parts) => {
                let parts: Vec<&str> = parts.iter().map(String::as_str).collect();
                let Some((name, value)) = parse_setoption(&parts) else {
                    return self.report(&UciError::MissingParts);
                };
                match self.options.apply_setoption(&name, value.as_deref()) {
                    Ok(UciOptionAction::Reseed(seed)) => {
                        log::info!("move selection seed {seed:?}");
                        self.policy.reseed(seed);
                        Ok(())
                    }
                    Err(e) => self.report(&e),
                }
            }
            UciCommand::Quit | UciCommand::Unknown(_) => Ok(()),
        }
    }

    fn go(&mut self, parts: &[String]) -> io::Result<()> {
        if parts.len() > 1 {
            log::debug!("go arguments ignored: {}", parts[1..].join(" "));
        }
        let moves = self.position.generate_legal();
        if log::log_enabled!(log::Level::Debug) {
            let listed: Vec<String> = moves.iter().map(ToString::to_string).collect();
            log::debug!("moves : {}", listed.join(" "));
        }
        match self.policy.select(&self.position, &moves) {
            Some(m) => {
                writeln!(self.out, "info pv {m}")?;
                writeln!(self.out, "bestmove {m}")
            }
            None => writeln!(self.out, "bestmove 0000"),
        }
    }

    fn perft(&mut self, depth: u32) -> io::Result<()> {
        let start = Instant::now();
        let divide = self.position.perft_divide(depth);
        let nodes: u64 = if depth == 0 {
            self.position.perft(0)
        } else {
            divide.iter().map(|(_, n)| n).sum()
        };
        for (m, n) in &divide {
            writeln!(self.out, "{m}: {n}")?;
        }
        writeln!(self.out)?;
        writeln!(self.out, "Nodes searched: {nodes}")?;
        writeln!(
            self.out,
            "info string perft depth {} nodes {} time_ms {}",
            depth,
            nodes,
            start.elapsed().as_millis()
        )
    }

    fn report(&mut self, err: &UciError) -> io::Result<()> {
        log::warn!("{err}");
        writeln!(self.out, "info string {err}")
    }
}

/// Read commands from `input` until `quit` or end of input.
pub fn run_uci_loop<R: BufRead, W: Write>(input: R, output: W) -> io::Result<()> {
    let mut session = UciSession::new(output);
    for line in input.lines() {
        if !session.handle_line(&line?)? {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> UciSession<Vec<u8>> {
        UciSession::with_policy(Vec::new(), RandomPolicy::seeded(3))
    }

    fn run(session: &mut UciSession<Vec<u8>>, lines: &[&str]) -> String {
        for line in lines {
            session.handle_line(line).unwrap();
        }
        let text = String::from_utf8(session.out.clone()).unwrap();
        session.out.clear();
        text
    }

    #[test]
    fn test_position_startpos_with_moves() {
        let parts = ["position", "startpos", "moves", "e2e4", "e7e5"];
        let (pos, err) = try_parse_position_command(&parts);
        assert_eq!(err, None);
        assert_eq!(
            pos.unwrap().to_fen(),
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2"
        );
    }

    #[test]
    fn test_position_fen_with_moves() {
        let parts = [
            "position", "fen", "4k3/8/8/8/8/8/8/4K2R", "w", "K", "-", "0", "1", "moves", "e1g1",
        ];
        let (pos, err) = try_parse_position_command(&parts);
        assert_eq!(err, None);
        assert_eq!(pos.unwrap().to_fen(), "4k3/8/8/8/8/8/8/5RK1 b - - 1 1");
    }

    #[test]
    fn test_position_stops_at_first_bad_move() {
        let parts = ["position", "startpos", "moves", "e2e4", "e2e4", "d7d5"];
        let (pos, err) = try_parse_position_command(&parts);
        assert!(matches!(err, Some(UciError::InvalidMove { ref move_str, .. }) if move_str == "e2e4"));
        assert_eq!(pos.unwrap().history_len(), 1);
    }

    #[test]
    fn test_bad_fen_keeps_previous_position() {
        let mut s = session();
        run(&mut s, &["position startpos moves e2e4"]);
        let out = run(&mut s, &["position fen 8/8/8/8/8/8/8/8 w - - 0 1"]);
        assert!(out.starts_with("info string Invalid FEN"));
        assert_eq!(s.position().history_len(), 1);
        assert_eq!(s.position().side_to_move(), crate::board::Color::Black);
    }

    #[test]
    fn test_uci_handshake() {
        let mut s = session();
        let out = run(&mut s, &["uci", "isready"]);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("id name chess_core "));
        assert!(lines[1].starts_with("id author "));
        assert!(lines.contains(&"option name Seed type string default random"));
        assert_eq!(lines[lines.len() - 2], "uciok");
        assert_eq!(lines[lines.len() - 1], "readyok");
    }

    #[test]
    fn test_go_answers_a_legal_move() {
        let mut s = session();
        let out = run(&mut s, &["position startpos moves d2d4", "go wtime 1000"]);
        let best = out
            .lines()
            .find_map(|l| l.strip_prefix("bestmove "))
            .unwrap()
            .to_string();
        assert!(s.position().parse_move(&best).is_ok());
        assert!(out.contains(&format!("info pv {best}")));
    }

    #[test]
    fn test_go_without_moves_answers_null_move() {
        let mut s = session();
        let out = run(&mut s, &["position fen 7k/5Q2/6K1/8/8/8/8/8 b - - 0 1", "go"]);
        assert_eq!(out, "bestmove 0000\n");
    }

    #[test]
    fn test_seeded_sessions_agree() {
        let script = ["setoption name Seed value 99", "go", "position startpos moves g1f3", "go"];
        let mut a = UciSession::new(Vec::new());
        let mut b = UciSession::new(Vec::new());
        assert_eq!(run(&mut a, &script), run(&mut b, &script));
        assert_eq!(a.options().seed, Some(99));
    }

    #[test]
    fn test_unknown_command_does_not_stop_the_loop() {
        let mut s = session();
        assert!(s.handle_line("xyzzy now").unwrap());
        assert!(s.handle_line("isready").unwrap());
        assert!(!s.handle_line("quit").unwrap());
        let out = String::from_utf8(s.into_output()).unwrap();
        assert_eq!(out, "Unknown command: xyzzy now\nreadyok\n");
    }

    #[test]
    fn test_unknown_option_is_reported() {
        let mut s = session();
        let out = run(&mut s, &["setoption name Hash value 16"]);
        assert_eq!(out, "info string Unknown option 'Hash'\n");
    }

    #[test]
    fn test_perft_and_display() {
        let mut s = session();
        let out = run(&mut s, &["perft 2"]);
        assert!(out.contains("\nNodes searched: 400\n"));
        assert_eq!(out.lines().filter(|l| l.ends_with(": 20")).count(), 20);

        let out = run(&mut s, &["ucinewgame", "d"]);
        assert!(out.contains("Fen: rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"));
    }

    #[test]
    fn test_perft_depth_zero_counts_the_root() {
        let mut s = session();
        let out = run(&mut s, &["perft 0"]);
        assert!(out.starts_with("\nNodes searched: 1\n"));
        assert!(out.contains("info string perft depth 0 nodes 1 "));
    }

    #[test]
    fn test_run_loop_stops_at_quit() {
        let input = b"isready\nquit\nisready\n";
        let mut out = Vec::new();
        run_uci_loop(&input[..], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "readyok\n");
    }
}
