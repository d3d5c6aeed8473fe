use crate::controller::{preset, preset_ids, Gains};
use crate::recorder::NullRecorder;
use crate::runner::run_episode;
use crate::util::seed_to_hex;
use anyhow::{anyhow, Context, Result};
use lander_sim_core::sim::{LanderSim, TerminalKind};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Clone, Debug)]
pub struct BenchmarkConfig {
    pub presets: Vec<String>,
    pub seeds: Vec<u32>,
    pub out_dir: PathBuf,
    pub jobs: Option<usize>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunRecord {
    pub preset: String,
    pub seed: u32,
    pub seed_hex: String,
    pub steps: u32,
    pub total_reward: f64,
    pub terminal: Option<TerminalKind>,
    pub landed: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PresetAggregate {
    pub preset: String,
    pub gains: Gains,
    pub runs: usize,
    pub avg_reward: f64,
    pub best_reward: f64,
    pub worst_reward: f64,
    pub avg_steps: f64,
    pub landing_rate: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub generated_unix_s: u64,
    pub presets: Vec<String>,
    pub seeds: Vec<u32>,
    pub jobs: Option<usize>,
    pub run_count: usize,
    pub rankings: Vec<PresetAggregate>,
    pub runs: Vec<RunRecord>,
}

pub fn resolve_presets(input: Option<&str>) -> Result<Vec<String>> {
    match input {
        None => Ok(preset_ids().iter().map(|id| (*id).to_string()).collect()),
        Some(raw) => {
            let mut presets = Vec::new();
            for token in raw.split(',') {
                let token = token.trim();
                if token.is_empty() {
                    continue;
                }
                presets.push(token.to_string());
            }
            if presets.is_empty() {
                return Err(anyhow!("--presets resolved to empty list"));
            }
            Ok(presets)
        }
    }
}

pub fn run_benchmark(config: BenchmarkConfig) -> Result<BenchmarkReport> {
    if config.seeds.is_empty() {
        return Err(anyhow!("benchmark requires at least one seed"));
    }
    if config.presets.is_empty() {
        return Err(anyhow!("benchmark requires at least one preset"));
    }
    if let Some(jobs) = config.jobs {
        if jobs == 0 {
            return Err(anyhow!("benchmark --jobs must be >= 1 when provided"));
        }
    }
    for id in &config.presets {
        if preset(id).is_none() {
            let available = preset_ids().join(", ");
            return Err(anyhow!("unknown preset '{id}'. available: {available}"));
        }
    }
    fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("failed creating {}", config.out_dir.display()))?;

    let run_jobs: Vec<(String, u32)> = config
        .presets
        .iter()
        .flat_map(|id| config.seeds.iter().map(move |seed| (id.clone(), *seed)))
        .collect();

    let run_one = |(id, seed): &(String, u32)| -> Result<RunRecord> {
        let gains = preset(id).ok_or_else(|| anyhow!("unknown preset '{id}'"))?;
        let mut env = LanderSim::new(*seed);
        let metrics = run_episode(&mut env, &gains, &mut NullRecorder)
            .with_context(|| format!("benchmark run failed for preset={id} seed={seed:#x}"))?;
        Ok(RunRecord {
            preset: id.clone(),
            seed: *seed,
            seed_hex: seed_to_hex(*seed),
            steps: metrics.steps,
            total_reward: metrics.total_reward,
            terminal: metrics.terminal,
            landed: metrics.terminal == Some(TerminalKind::Landed),
        })
    };

    let run_results: Vec<Result<RunRecord>> = if let Some(jobs) = config.jobs {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .context("failed to build rayon threadpool")?;
        pool.install(|| run_jobs.par_iter().map(run_one).collect())
    } else {
        run_jobs.par_iter().map(run_one).collect()
    };

    let mut runs = Vec::with_capacity(run_results.len());
    for result in run_results {
        runs.push(result?);
    }

    let mut grouped: HashMap<String, Vec<&RunRecord>> = HashMap::new();
    for run in &runs {
        grouped.entry(run.preset.clone()).or_default().push(run);
    }

    let mut rankings = Vec::new();
    for (id, preset_runs) in grouped {
        let gains = preset(&id).ok_or_else(|| anyhow!("unknown preset '{id}'"))?;
        let runs_count = preset_runs.len();
        let sum_reward: f64 = preset_runs.iter().map(|r| r.total_reward).sum();
        let best_reward = preset_runs
            .iter()
            .map(|r| r.total_reward)
            .fold(f64::NEG_INFINITY, f64::max);
        let worst_reward = preset_runs
            .iter()
            .map(|r| r.total_reward)
            .fold(f64::INFINITY, f64::min);
        let sum_steps: u64 = preset_runs.iter().map(|r| r.steps as u64).sum();
        let landed_count = preset_runs.iter().filter(|r| r.landed).count();

        rankings.push(PresetAggregate {
            preset: id,
            gains,
            runs: runs_count,
            avg_reward: sum_reward / runs_count as f64,
            best_reward,
            worst_reward,
            avg_steps: sum_steps as f64 / runs_count as f64,
            landing_rate: landed_count as f64 / runs_count as f64,
        });
    }

    rankings.sort_by(|a, b| {
        b.avg_reward
            .total_cmp(&a.avg_reward)
            .then_with(|| b.landing_rate.total_cmp(&a.landing_rate))
    });

    let mut run_records = runs;
    run_records.sort_by(|a, b| {
        b.total_reward
            .total_cmp(&a.total_reward)
            .then_with(|| a.preset.cmp(&b.preset))
    });

    write_runs_csv(&config.out_dir.join("runs.csv"), &run_records)?;
    write_rankings_csv(&config.out_dir.join("rankings.csv"), &rankings)?;

    let report = BenchmarkReport {
        generated_unix_s: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs(),
        presets: config.presets,
        seeds: config.seeds,
        jobs: config.jobs,
        run_count: run_records.len(),
        rankings,
        runs: run_records,
    };

    let report_path = config.out_dir.join("summary.json");
    fs::write(
        &report_path,
        serde_json::to_vec_pretty(&report).context("failed to serialize summary json")?,
    )
    .with_context(|| format!("failed writing {}", report_path.display()))?;

    Ok(report)
}

fn write_runs_csv(path: &Path, rows: &[RunRecord]) -> Result<()> {
    let mut csv = String::from("preset,seed_hex,seed,steps,total_reward,terminal,landed\n");
    for row in rows {
        csv.push_str(&format!(
            "{},{},{},{},{:.4},{},{}\n",
            row.preset,
            row.seed_hex,
            row.seed,
            row.steps,
            row.total_reward,
            row.terminal.map(TerminalKind::as_str).unwrap_or("none"),
            row.landed,
        ));
    }
    fs::write(path, csv).with_context(|| format!("failed writing {}", path.display()))
}

fn write_rankings_csv(path: &Path, rows: &[PresetAggregate]) -> Result<()> {
    let mut csv = String::from(
        "rank,preset,runs,avg_reward,best_reward,worst_reward,avg_steps,landing_rate\n",
    );
    for (idx, row) in rows.iter().enumerate() {
        csv.push_str(&format!(
            "{},{},{},{:.2},{:.2},{:.2},{:.2},{:.4}\n",
            idx + 1,
            row.preset,
            row.runs,
            row.avg_reward,
            row.best_reward,
            row.worst_reward,
            row.avg_steps,
            row.landing_rate,
        ));
    }
    fs::write(path, csv).with_context(|| format!("failed writing {}", path.display()))
}
