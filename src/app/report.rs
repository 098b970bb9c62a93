//! End-of-run report
//!
//! Rendered as a table for people or as JSON for scripts.

use crate::app::pipeline::PipelineSettings;
use crate::core::styles::StyleRole;
use crate::queue::QueueStatistics;
use crate::worker::{ConsumerReport, ProducerReport, PutFailure};
use prettytable::{format, Cell, Row, Table};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::{Duration, SystemTime};
use strum::IntoEnumIterator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display, strum_macros::EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WorkerRole {
    Producer,
    Consumer,
}

impl WorkerRole {
    fn verb(self) -> &'static str {
        match self {
            WorkerRole::Producer => "Produced",
            WorkerRole::Consumer => "Consumed",
        }
    }
}

/// One row per worker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkerSummary {
    pub name: String,
    pub role: WorkerRole,
    pub items: u64,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<PutFailure>,
}

impl WorkerSummary {
    pub fn from_producer<T>(report: &ProducerReport<T>) -> Self {
        Self {
            name: report.name.clone(),
            role: WorkerRole::Producer,
            items: report.produced,
            state: report.state.to_string(),
            failure: report.failure,
        }
    }

    pub fn from_consumer<S>(report: &ConsumerReport<S>) -> Self {
        Self {
            name: report.name.clone(),
            role: WorkerRole::Consumer,
            items: report.consumed,
            state: report.state.to_string(),
            failure: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// RFC 3339 wall-clock start time
    pub started_at: String,
    pub elapsed_secs: f64,
    pub capacity: usize,
    pub producers: usize,
    pub consumers: usize,
    pub items_per_producer: usize,
    pub put_timeout: String,
    pub get_timeout: String,
    pub total_produced: u64,
    pub total_consumed: u64,
    pub sink_items: usize,
    /// Every accepted item reached a sink and nothing is left in the queue
    pub all_accounted: bool,
    /// The run was cut short by a shutdown request
    pub interrupted: bool,
    pub statistics: QueueStatistics,
    /// Delivered items per second
    pub throughput: f64,
    pub workers: Vec<WorkerSummary>,
}

impl RunReport {
    pub fn new(
        settings: &PipelineSettings,
        started_at: SystemTime,
        elapsed: Duration,
        statistics: QueueStatistics,
        workers: Vec<WorkerSummary>,
        sink_items: usize,
        interrupted: bool,
    ) -> Self {
        let total = |role| {
            workers
                .iter()
                .filter(|w| w.role == role)
                .map(|w| w.items)
                .sum::<u64>()
        };
        let total_produced = total(WorkerRole::Producer);
        let total_consumed = total(WorkerRole::Consumer);

        Self {
            started_at: chrono::DateTime::<chrono::Utc>::from(started_at).to_rfc3339(),
            elapsed_secs: elapsed.as_secs_f64(),
            capacity: settings.capacity,
            producers: settings.producers,
            consumers: settings.consumers,
            items_per_producer: settings.items_per_producer,
            put_timeout: settings.put_timeout.to_string(),
            get_timeout: settings.get_timeout.to_string(),
            total_produced,
            total_consumed,
            sink_items,
            all_accounted: total_produced == total_consumed
                && total_consumed == sink_items as u64
                && statistics.current_size == 0,
            interrupted,
            statistics,
            throughput: statistics.throughput(elapsed),
            workers,
        }
    }

    pub fn producers(&self) -> impl Iterator<Item = &WorkerSummary> {
        self.workers
            .iter()
            .filter(|w| w.role == WorkerRole::Producer)
    }

    pub fn consumers(&self) -> impl Iterator<Item = &WorkerSummary> {
        self.workers
            .iter()
            .filter(|w| w.role == WorkerRole::Consumer)
    }

    /// Queue counters plus derived throughput
    pub fn diagnostics(&self) -> BTreeMap<&'static str, f64> {
        let mut map: BTreeMap<&'static str, f64> = self
            .statistics
            .to_map()
            .into_iter()
            .map(|(key, value)| (key, value as f64))
            .collect();
        map.insert("throughput", self.throughput);
        map
    }

    pub fn render(&self, format: ReportFormat, color: bool) -> Result<String, serde_json::Error> {
        match format {
            ReportFormat::Text => Ok(self.render_text(color)),
            ReportFormat::Json => self.render_json(),
        }
    }

    pub fn render_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn render_text(&self, color: bool) -> String {
        let mut out = String::new();

        let title = if self.interrupted {
            StyleRole::Warning.paint("Pipeline interrupted", color)
        } else {
            StyleRole::Header.paint("Pipeline complete", color)
        };
        out.push_str(&title);
        out.push('\n');

        let mut summary = Table::new();
        summary.set_format(*format::consts::FORMAT_CLEAN);
        let mut kv = |key: &str, value: String, role: StyleRole| {
            summary.add_row(Row::new(vec![
                styled_cell(key, StyleRole::Key, color),
                styled_cell(&value, role, color),
            ]));
        };
        kv("Started", self.started_at.clone(), StyleRole::Value);
        kv("Elapsed", format!("{:.3}s", self.elapsed_secs), StyleRole::Value);
        kv(
            "Queue",
            format!(
                "capacity {}, put {}, get {}",
                self.capacity, self.put_timeout, self.get_timeout
            ),
            StyleRole::Value,
        );
        for role in WorkerRole::iter() {
            let (workers, items) = self
                .workers
                .iter()
                .filter(|w| w.role == role)
                .fold((0, 0), |(count, items), w| (count + 1, items + w.items));
            kv(
                role.verb(),
                format!("{} item(s) by {} {}(s)", items, workers, role),
                StyleRole::Value,
            );
        }
        kv(
            "Accounted",
            if self.all_accounted { "yes" } else { "no" }.to_string(),
            if self.all_accounted {
                StyleRole::Valid
            } else {
                StyleRole::Invalid
            },
        );
        kv("Throughput", format!("{:.1} items/s", self.throughput), StyleRole::Value);
        kv(
            "Blocked",
            format!(
                "{} put(s), {} get(s)",
                self.statistics.blocked_puts, self.statistics.blocked_gets
            ),
            StyleRole::Value,
        );
        out.push_str(&summary.to_string());
        out.push('\n');

        let mut workers = Table::new();
        workers.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
        workers.set_titles(Row::new(
            ["Worker", "Role", "Items", "State", "Failure"]
                .iter()
                .map(|title| styled_cell(title, StyleRole::Header, color))
                .collect(),
        ));
        for worker in &self.workers {
            let state_role = if worker.failure.is_some() {
                StyleRole::Warning
            } else {
                StyleRole::Value
            };
            workers.add_row(Row::new(vec![
                styled_cell(&worker.name, StyleRole::Literal, color),
                Cell::new(&worker.role.to_string()),
                Cell::new(&worker.items.to_string()),
                styled_cell(&worker.state, state_role, color),
                Cell::new(&worker.failure.map(|f| f.to_string()).unwrap_or_default()),
            ]));
        }
        out.push_str(&workers.to_string());
        out
    }
}

fn styled_cell(text: &str, role: StyleRole, color: bool) -> Cell {
    let cell = Cell::new(text);
    match role.to_prettytable_spec() {
        Some(spec) if color => cell.style_spec(&spec),
        _ => cell,
    }
}
