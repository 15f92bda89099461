//! Incremental terminal rendering of the transcript
//!
//! Snapshots arrive through a latest-value channel, so intermediate ones may
//! be skipped. Within a turn text only ever grows, which lets the renderer
//! write just the suffix it has not written yet.

use crate::config::endpoint;
use crate::state_machine::Snapshot;
use crate::transcript::Turn;
use reqwest::Url;
use std::io::{self, Write};
use std::sync::Arc;

/// Display name of a cited source: its last path segment
pub fn source_display_name(source: &str) -> &str {
    source.rsplit('/').next().unwrap_or(source)
}

/// Download link for a cited source, served by the backend under `/rag/static`
pub fn source_link(base: &Url, source: &str) -> Url {
    endpoint(base, &["rag", "static", source_display_name(source)])
}

/// Writes assistant replies as they grow
#[derive(Debug)]
pub struct TerminalRenderer {
    base_url: Url,
    /// Reset count of the last rendered snapshot
    generation: u64,
    /// Turns whose output has begun
    started: usize,
    /// Bytes of the current turn's text already written
    written: usize,
    /// Current turn is complete (sources written)
    closed: bool,
}

impl TerminalRenderer {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            generation: 0,
            started: 0,
            written: 0,
            closed: true,
        }
    }

    /// Write whatever is new in `snapshot` since the previous call
    pub fn render(&mut self, snapshot: &Snapshot, out: &mut impl Write) -> io::Result<()> {
        let turns = snapshot.transcript.turns();
        if snapshot.generation != self.generation {
            // Transcript was reset; the turn being written is gone
            if !self.closed {
                writeln!(out)?;
            }
            self.generation = snapshot.generation;
            self.started = 0;
            self.written = 0;
            self.closed = true;
        }

        if let Some(current) = self.current(turns) {
            if !self.closed {
                let fresh = current.text().get(self.written..).unwrap_or_default();
                out.write_all(fresh.as_bytes())?;
                self.written = current.text().len();
            }
        }

        for turn in turns.iter().skip(self.started) {
            self.close_current(turns, out)?;
            self.started += 1;
            self.written = 0;
            self.closed = turn.is_user();
            if !turn.is_user() {
                out.write_all(turn.text().as_bytes())?;
                self.written = turn.text().len();
            }
        }

        out.flush()
    }

    /// Render the final snapshot of a stream and close the reply
    pub fn finish(&mut self, snapshot: &Snapshot, out: &mut impl Write) -> io::Result<()> {
        self.render(snapshot, out)?;
        self.close_current(snapshot.transcript.turns(), out)?;
        out.flush()
    }

    fn current<'a>(&self, turns: &'a [Arc<Turn>]) -> Option<&'a Turn> {
        self.started
            .checked_sub(1)
            .and_then(|index| turns.get(index))
            .map(|turn| &**turn)
    }

    fn close_current(&mut self, turns: &[Arc<Turn>], out: &mut impl Write) -> io::Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let Some(turn) = self.current(turns) else {
            return Ok(());
        };

        writeln!(out)?;
        if !turn.sources().is_empty() {
            writeln!(out, "Sources:")?;
            for source in turn.sources() {
                writeln!(
                    out,
                    "  - {} <{}>",
                    source_display_name(source),
                    source_link(&self.base_url, source)
                )?;
            }
        }
        writeln!(out)
    }
}
