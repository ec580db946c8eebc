use anyhow::Context;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use tracing::info;

use crate::world::Outcome;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Stats {
    pub moves: usize,
    pub shots: usize,
    pub plans: usize,
    pub deductions: usize,
    pub search_expanded_nodes: usize,
    pub time_us: usize,
    pub outcome: Option<Outcome>,
}

impl Stats {
    pub fn print(&self) {
        info!(
            "Outcome {:?} Moves {:?} Shots {:?} Time(microseconds) {:?} Plans {:?} Deductions {:?} BFS expand nodes {:?}",
            self.outcome,
            self.moves,
            self.shots,
            self.time_us,
            self.plans,
            self.deductions,
            self.search_expanded_nodes
        );
    }

    pub fn write_json(&self, path: &str) -> anyhow::Result<()> {
        let file = File::create(path).with_context(|| format!("cannot create {path}"))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }
}
