use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use lander_autopilot::benchmark::{resolve_presets, run_benchmark, BenchmarkConfig};
use lander_autopilot::controller::{describe_presets, preset, preset_ids, Gains};
use lander_autopilot::recorder::{FrameRecorder, JsonlRecorder, NullRecorder};
use lander_autopilot::runner::{run_episode, EpisodeMetrics};
use lander_autopilot::tuner::run_search;
use lander_autopilot::util::{
    parse_gains_csv, parse_seed, parse_seed_csv, seed_sequence, seed_to_hex,
};
use lander_sim_core::sim::{Environment, LanderSim, TerminalKind};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Parser, Debug)]
#[command(name = "lander-autopilot")]
#[command(about = "Autopilot lab for tuning the lander descent controller")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List available gain presets
    ListPresets,
    /// Fly a single episode with chosen gains
    Fly {
        #[arg(long, default_value = "softstep")]
        preset: String,
        /// Explicit gains as "kp_alt,ki_alt,kp_ang,ki_ang" (overrides --preset)
        #[arg(long)]
        gains: Option<String>,
        #[arg(long, default_value = "0xA57E0001")]
        seed: String,
        /// Write a JSONL flight log of every frame
        #[arg(long)]
        record: Option<PathBuf>,
    },
    /// Run the random-perturbation gain search
    Tune {
        #[arg(long, default_value = "softstep")]
        preset: String,
        /// Explicit starting gains (overrides --preset)
        #[arg(long)]
        gains: Option<String>,
        #[arg(long, default_value_t = 1_000)]
        iterations: u32,
        #[arg(long, default_value = "0xA57E0001")]
        seed: String,
        /// Seed for the perturbation sampler (search is reproducible per seed pair)
        #[arg(long, default_value_t = 0x5EED_CAFE)]
        rng_seed: u64,
        /// Write the tuned gains and score as pretty JSON
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Evaluate presets across many seeds in parallel
    Benchmark {
        #[arg(long)]
        presets: Option<String>,
        #[arg(long)]
        seeds: Option<String>,
        #[arg(long)]
        seed_start: Option<String>,
        #[arg(long, default_value_t = 12)]
        seed_count: u32,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long)]
        jobs: Option<usize>,
    },
}

fn main() -> Result<()> {
    let Cli { command } = Cli::parse();

    match command {
        Commands::ListPresets => {
            for (id, description) in describe_presets() {
                println!("{id:12} {description}");
            }
        }
        Commands::Fly {
            preset,
            gains,
            seed,
            record,
        } => {
            let (label, gains) = resolve_gains(&preset, gains.as_deref())?;
            let seed = parse_seed(&seed)?;
            let mut env = LanderSim::new(seed);

            let (metrics, recorded) = match record {
                Some(path) => {
                    let mut recorder = JsonlRecorder::create(&path)?;
                    let metrics = run_episode(&mut env, &gains, &mut recorder)?;
                    recorder.close()?;
                    (metrics, Some((path, recorder.frames())))
                }
                None => (run_episode(&mut env, &gains, &mut NullRecorder)?, None),
            };
            env.close();

            print_episode(&label, &gains, seed, &metrics);
            if let Some((path, frames)) = recorded {
                println!("frames={frames}");
                println!("output={}", path.display());
            }
        }
        Commands::Tune {
            preset,
            gains,
            iterations,
            seed,
            rng_seed,
            output,
        } => {
            let (label, gains) = resolve_gains(&preset, gains.as_deref())?;
            let seed = parse_seed(&seed)?;
            let mut env = LanderSim::new(seed);
            let mut rng = SmallRng::seed_from_u64(rng_seed);

            println!("=== Gain Search ===");
            println!("start={label}");
            println!("start_gains={}", format_gains(&gains));
            println!("iterations={iterations}");
            println!("env_seed={}", seed_to_hex(seed));
            println!("rng_seed={rng_seed:#x}");
            println!();

            let report = run_search(&mut env, gains, iterations, &mut rng)?;
            env.close();

            println!();
            println!("initial_score={:.2}", report.initial_score);
            println!("best_score={:.2}", report.best.score);
            println!("improvements={}", report.improvements);
            println!("best_gains={}", format_gains(&report.best.gains));

            if let Some(path) = output {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&path, serde_json::to_vec_pretty(&report.best)?)?;
                println!("output={}", path.display());
            }
        }
        Commands::Benchmark {
            presets,
            seeds,
            seed_start,
            seed_count,
            out_dir,
            jobs,
        } => {
            let presets = resolve_presets(presets.as_deref())?;
            let seeds = resolve_seeds(seeds.as_deref(), seed_start.as_deref(), seed_count)?;
            let out_dir = out_dir
                .unwrap_or_else(|| PathBuf::from(format!("benchmarks/{}", timestamp_suffix())));

            let report = run_benchmark(BenchmarkConfig {
                presets,
                seeds,
                out_dir: out_dir.clone(),
                jobs,
            })?;

            println!("runs={}", report.run_count);
            println!(
                "jobs={}",
                report
                    .jobs
                    .map(|value| value.to_string())
                    .unwrap_or_else(|| "auto".to_string())
            );
            println!("out_dir={}", out_dir.display());
            println!("rankings:");
            for (idx, entry) in report.rankings.iter().enumerate() {
                println!(
                    "  {}. {}  avg_reward={:.1} best={:.1} worst={:.1} avg_steps={:.1} landing={:.0}%",
                    idx + 1,
                    entry.preset,
                    entry.avg_reward,
                    entry.best_reward,
                    entry.worst_reward,
                    entry.avg_steps,
                    entry.landing_rate * 100.0,
                );
            }
        }
    }

    Ok(())
}

fn resolve_gains(preset_id: &str, gains_csv: Option<&str>) -> Result<(String, Gains)> {
    if let Some(csv) = gains_csv {
        return Ok(("custom".to_string(), parse_gains_csv(csv)?));
    }
    let gains = preset(preset_id).ok_or_else(|| {
        let available = preset_ids().join(", ");
        anyhow!("unknown preset '{preset_id}'. available: {available}")
    })?;
    Ok((preset_id.to_string(), gains))
}

fn print_episode(label: &str, gains: &Gains, seed: u32, metrics: &EpisodeMetrics) {
    println!("preset={label}");
    println!("gains={}", format_gains(gains));
    println!("seed={}", seed_to_hex(seed));
    println!("steps={}", metrics.steps);
    println!("total_reward={:.2}", metrics.total_reward);
    println!(
        "terminal={}",
        metrics.terminal.map(TerminalKind::as_str).unwrap_or("none")
    );
}

fn format_gains(gains: &Gains) -> String {
    let g = gains.to_array();
    format!("[{:.8}, {:.8}, {:.8}, {:.8}]", g[0], g[1], g[2], g[3])
}

fn resolve_seeds(
    seeds: Option<&str>,
    seed_start: Option<&str>,
    seed_count: u32,
) -> Result<Vec<u32>> {
    if let Some(csv) = seeds {
        return parse_seed_csv(csv);
    }
    let start = if let Some(start) = seed_start {
        parse_seed(start)?
    } else {
        0xA57E_0001
    };
    Ok(seed_sequence(start, seed_count))
}

fn timestamp_suffix() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("{now}")
}
