// SPDX-FileCopyrightText: 2026 Worktrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `worktrack seed`: fill a database with simulated tools and tasks.

use rand::Rng;
use serde_json::json;
use tracing::{info, warn};
use worktrack_config::model::WorktrackConfig;
use worktrack_core::{Attributes, StorageAdapter, WorktrackError};
use worktrack_storage::SqliteStorage;

/// Counts of what a seeding run actually inserted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub tools_created: usize,
    pub tasks_created: usize,
    pub skipped: usize,
}

/// Opens the configured storage and seeds it.
pub async fn run_seed(
    config: &WorktrackConfig,
    tools: usize,
    tasks: usize,
) -> Result<(), WorktrackError> {
    crate::serve::init_tracing(&config.service.log_level);

    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;

    let (tool_ids, task_ids) = {
        let mut rng = rand::thread_rng();
        (
            (0..tools).map(|_| sim_tool_id(&mut rng)).collect::<Vec<_>>(),
            (0..tasks).map(|_| sim_task_id(&mut rng)).collect::<Vec<_>>(),
        )
    };

    let summary = seed_storage(&storage, &tool_ids, &task_ids).await;
    storage.close().await?;
    let summary = summary?;

    println!(
        "Seeded {} tools and {} tasks ({} skipped)",
        summary.tools_created, summary.tasks_created, summary.skipped
    );
    Ok(())
}

/// Inserts the given tools (marking each ready) and tasks.
///
/// Ids that already exist are logged and skipped; any other error aborts.
pub async fn seed_storage(
    storage: &dyn StorageAdapter,
    tool_ids: &[String],
    task_ids: &[String],
) -> Result<SeedSummary, WorktrackError> {
    let mut summary = SeedSummary::default();

    for (tag, tool_id) in tool_ids.iter().enumerate() {
        match storage.create_tool(tool_id, &sim_tool_skills(tag)).await {
            Ok(outcome) => {
                info!("{}", outcome.message);
                storage.mark_tool_ready(tool_id).await?;
                summary.tools_created += 1;
            }
            Err(WorktrackError::AlreadyExists(msg)) => {
                warn!("{msg}");
                summary.skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    for (tag, task_id) in task_ids.iter().enumerate() {
        match storage.create_task(task_id, &sim_task_needs(tag)).await {
            Ok(outcome) => {
                info!("{}", outcome.message);
                summary.tasks_created += 1;
            }
            Err(WorktrackError::AlreadyExists(msg)) => {
                warn!("{msg}");
                summary.skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(summary)
}

/// A tool id shaped like `Tool-XY-1234`.
pub fn sim_tool_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    let a = rng.gen_range(b'A'..=b'Z') as char;
    let b = rng.gen_range(b'A'..=b'Z') as char;
    let n = rng.gen_range(1000..=9999);
    format!("Tool-{a}{b}-{n}")
}

/// A task id shaped like `Task-10-A-5000`.
pub fn sim_task_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    let n1 = rng.gen_range(10..=99);
    let letter = rng.gen_range(b'A'..=b'Z') as char;
    let n2 = rng.gen_range(1000..=9999);
    format!("Task-{n1}-{letter}-{n2}")
}

fn sim_tool_skills(tag: usize) -> Attributes {
    sample_map("skill", tag)
}

fn sim_task_needs(tag: usize) -> Attributes {
    sample_map("need", tag)
}

fn sample_map(prefix: &str, tag: usize) -> Attributes {
    let mut map = Attributes::new();
    map.insert(format!("{prefix}1"), json!(format!("value-{tag}")));
    map.insert(format!("{prefix}2"), json!(format!("value-{tag}")));
    map
}
