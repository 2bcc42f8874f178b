//! UCI engine subprocess.
//!
//! The engine is a scoped resource: `spawn` performs the handshake and
//! `Drop` always sends `quit`, kills and reaps the process, on success and
//! failure paths alike. Every read is bounded by the call's deadline.

mod protocol;

pub use protocol::{go_command, parse_line, position_command, EngineLine, InfoLine};

use super::ScoringOracle;
use crate::error::EngineError;
use crate::notation::format_uci;
use crate::search::{Deadline, SearchBudget};
use crate::types::{Move, Position, Score};
use protocol::setoption_command;
use std::collections::{BTreeMap, HashMap};
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// A running UCI engine
pub struct UciEngine {
    path: String,
    child: Child,
    stdin: ChildStdin,
    lines: Receiver<String>,
    name: Option<String>,
    timeout: Duration,
    multipv: usize,
}

impl UciEngine {
    /// Start `path` and complete the `uci`/`isready` handshake within
    /// `timeout`. `options` are sent as `setoption` before the first query.
    pub fn spawn(
        path: &str,
        args: &[String],
        options: &BTreeMap<String, String>,
        timeout: Duration,
    ) -> Result<Self, EngineError> {
        let mut child = Command::new(path)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| EngineError::Spawn {
                path: path.to_string(),
                source,
            })?;
        debug!(path, pid = child.id(), "engine process spawned");

        let (stdin, stdout) = match (child.stdin.take(), child.stdout.take()) {
            (Some(i), Some(o)) => (i, o),
            _ => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(EngineError::Protocol("engine pipes unavailable".into()));
            }
        };

        let (tx, lines) = mpsc::channel();
        thread::spawn(move || {
            for line in BufReader::new(stdout).lines() {
                match line {
                    Ok(l) => {
                        if tx.send(l).is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                }
            }
        });

        let mut engine = Self {
            path: path.to_string(),
            child,
            stdin,
            lines,
            name: None,
            timeout,
            multipv: 0,
        };
        // On error `engine` drops here and the process is reaped
        engine.handshake(options)?;
        Ok(engine)
    }

    /// Engine name from `id name`, if it sent one
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn handshake(&mut self, options: &BTreeMap<String, String>) -> Result<(), EngineError> {
        let deadline = Deadline::start(self.timeout);
        self.send("uci")?;
        loop {
            match parse_line(&self.read_line(&deadline)?) {
                EngineLine::UciOk => break,
                EngineLine::IdName(name) => self.name = Some(name),
                _ => {}
            }
        }
        for (name, value) in options {
            self.send(&setoption_command(name, value))?;
        }
        self.sync(&deadline)?;
        debug!(path = %self.path, name = ?self.name, "engine ready");
        Ok(())
    }

    /// `isready` and wait for `readyok`
    fn sync(&mut self, deadline: &Deadline) -> Result<(), EngineError> {
        self.send("isready")?;
        while parse_line(&self.read_line(deadline)?) != EngineLine::ReadyOk {}
        Ok(())
    }

    fn send(&mut self, command: &str) -> Result<(), EngineError> {
        trace!(command, "engine <");
        writeln!(self.stdin, "{command}")?;
        self.stdin.flush()?;
        Ok(())
    }

    fn read_line(&self, deadline: &Deadline) -> Result<String, EngineError> {
        match self.lines.recv_timeout(deadline.remaining()) {
            Ok(line) => {
                trace!(line = %line, "engine >");
                Ok(line)
            }
            Err(RecvTimeoutError::Timeout) => Err(EngineError::Timeout(deadline.limit())),
            Err(RecvTimeoutError::Disconnected) => Err(EngineError::Closed),
        }
    }
}

impl ScoringOracle for UciEngine {
    fn score_moves(
        &mut self,
        position: &Position,
        moves: &[Move],
        budget: &SearchBudget,
    ) -> Result<Vec<Score>, EngineError> {
        if moves.is_empty() {
            return Ok(Vec::new());
        }
        let deadline = Deadline::start(budget.timeout);

        if self.multipv != moves.len() {
            self.send(&setoption_command("MultiPV", moves.len()))?;
            self.multipv = moves.len();
        }
        // Fresh hash for every query so earlier queries cannot colour this one
        self.send("ucinewgame")?;
        self.sync(&deadline)?;

        self.send(&position_command(position))?;
        self.send(&go_command(budget, moves))?;

        // Deepest exact score seen for each first move
        let mut seen: HashMap<String, (u32, Score)> = HashMap::new();
        loop {
            match parse_line(&self.read_line(&deadline)?) {
                EngineLine::BestMove(_) => break,
                EngineLine::Info(InfoLine {
                    depth,
                    score: Some(score),
                    bound: false,
                    pv_move: Some(mv),
                    ..
                }) => {
                    let depth = depth.unwrap_or(0);
                    let entry = seen.entry(mv).or_insert((depth, score));
                    if depth >= entry.0 {
                        *entry = (depth, score);
                    }
                }
                _ => {}
            }
        }

        let mut scores = Vec::with_capacity(moves.len());
        let mut missing = Vec::new();
        for &m in moves {
            let uci = format_uci(m);
            match seen.get(&uci) {
                Some(&(_, s)) => scores.push(s),
                None => missing.push(uci),
            }
        }
        if !missing.is_empty() {
            return Err(EngineError::Incomplete(missing));
        }
        trace!(moves = moves.len(), elapsed = ?deadline.elapsed(), "engine scored moves");
        Ok(scores)
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        let _ = writeln!(self.stdin, "quit");
        let _ = self.stdin.flush();
        if let Err(e) = self.child.kill() {
            // Already exited after `quit`
            trace!(error = %e, "engine kill");
        }
        match self.child.wait() {
            Ok(status) => debug!(path = %self.path, %status, "engine process reaped"),
            Err(e) => warn!(path = %self.path, error = %e, "failed to reap engine process"),
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::types::Square;

    const FAKE_ENGINE: &str = r#"
while read -r line; do
  case "$line" in
    uci) echo "id name Fake Engine"; echo "option name MultiPV type spin"; echo uciok ;;
    isready) echo readyok ;;
    go*)
      echo "info depth 1 multipv 1 score cp 40 pv e2e4 e7e5"
      echo "info depth 2 multipv 1 score cp 35 lowerbound pv e2e4"
      echo "info depth 2 multipv 1 score cp 30 pv e2e4 e7e5"
      echo "info depth 2 multipv 2 score mate -3 pv d2d4"
      echo "bestmove e2e4" ;;
    quit) exit 0 ;;
  esac
done
"#;

    fn fake() -> UciEngine {
        UciEngine::spawn(
            "sh",
            &["-c".to_string(), FAKE_ENGINE.to_string()],
            &BTreeMap::new(),
            Duration::from_secs(10),
        )
        .unwrap()
    }

    #[test]
    fn test_scores_from_fake_engine() {
        let mut engine = fake();
        assert_eq!(engine.name(), Some("Fake Engine"));
        let moves = [
            Move::new(Square::D2, Square::D4, None),
            Move::new(Square::E2, Square::E4, None),
        ];
        let scores = engine
            .score_moves(&Position::startpos(), &moves, &SearchBudget::depth(2))
            .unwrap();
        assert_eq!(scores, vec![Score::from_uci_mate(-3), Score::cp(30)]);
    }

    #[test]
    fn test_missing_move_is_incomplete() {
        let mut engine = fake();
        let moves = [
            Move::new(Square::E2, Square::E4, None),
            Move::new(Square::G1, Square::F3, None),
        ];
        let err = engine
            .score_moves(&Position::startpos(), &moves, &SearchBudget::depth(2))
            .unwrap_err();
        match err {
            EngineError::Incomplete(missing) => assert_eq!(missing, vec!["g1f3".to_string()]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_silent_engine_times_out() {
        let result = UciEngine::spawn(
            "sleep",
            &["5".to_string()],
            &BTreeMap::new(),
            Duration::from_millis(200),
        );
        assert!(matches!(result, Err(EngineError::Timeout(_))));
    }

    #[test]
    fn test_missing_binary() {
        let result = UciEngine::spawn(
            "/nonexistent/uci-engine",
            &[],
            &BTreeMap::new(),
            Duration::from_secs(1),
        );
        assert!(matches!(result, Err(EngineError::Spawn { .. })));
    }
}
