use anyhow::Result;
use clap::Parser;
use lib::dag_creator::task_graph_from_specs;
use lib::metrics::ScheduleMetrics;
use lib::policy::{AllocationPolicy, SchedulingPolicy};
use lib::runnable_sets::{load_or_generate_sets, DEFAULT_NUM_SETS, DEFAULT_SEED};
use lib::scheduler::{run_scheduler, SchedulerConfig};
use lib::task_graph::TaskGraph;
use lib::util::write_timestamped_yaml;
use log::info;
use serde_derive::{Deserialize, Serialize};

#[derive(Parser)]
#[clap(
    name = "sweeper",
    version = "1.0",
    about = "About:
    Re-runs the scheduling kernel across core counts and policy combinations
    for a collection of generated runnable sets, averaging the waiting time
    per execution, and dumps the four series as YAML."
)]
struct ArgParser {
    ///Directory holding one runnable set JSON file per graph; generated
    ///when empty.
    #[clap(
        short = 'd',
        long = "sets_dir_path",
        default_value = "../outputs/runnable_sets_json"
    )]
    sets_dir_path: String,
    ///Path to output directory.
    #[clap(short = 'o', long = "output_dir_path", default_value = "../outputs")]
    output_dir_path: String,
    ///Number of runnable sets to generate when the sets directory is empty.
    #[clap(short = 'n', long = "number_of_sets", default_value_t = DEFAULT_NUM_SETS)]
    number_of_sets: usize,
    ///Seed of the dependency-set generator.
    #[clap(long = "seed", default_value_t = DEFAULT_SEED)]
    seed: u64,
    ///Horizon factor applied to every run.
    #[clap(short = 'i', long = "iterations", default_value_t = 3)]
    iterations: i32,
    ///Sweep core counts from 1 up to this bound.
    #[clap(short = 'c', long = "max_cores", default_value_t = 6)]
    max_cores: usize,
}

#[derive(Clone, Default, Serialize, Deserialize)]
struct SweepSummary {
    sweep_cores: Vec<usize>,
    dynamic_fcfs_avg_wait: Vec<f32>,
    dynamic_pas_avg_wait: Vec<f32>,
    static_fcfs_avg_wait: Vec<f32>,
    static_pas_avg_wait: Vec<f32>,
}

/// Mean average-wait-per-execution over all graphs, one value per core count.
fn average_wait_series(
    graphs: &[TaskGraph],
    sweep_cores: &[usize],
    scheduling: SchedulingPolicy,
    allocation: AllocationPolicy,
    iterations: i32,
) -> Result<Vec<f32>> {
    let mut series = Vec::with_capacity(sweep_cores.len());
    for &num_cores in sweep_cores {
        let mut sum = 0.0f32;
        for graph in graphs {
            let config = SchedulerConfig::new(num_cores, scheduling, allocation)
                .with_iterations(iterations);
            let result = run_scheduler(graph, config)?;
            sum += ScheduleMetrics::from_result(&result, num_cores).average_wait_time();
        }
        series.push(sum / graphs.len() as f32);
    }
    Ok(series)
}

fn main() -> Result<()> {
    env_logger::init();
    let arg: ArgParser = ArgParser::parse();

    let sets = load_or_generate_sets(&arg.sets_dir_path, arg.number_of_sets, arg.seed)?;
    anyhow::ensure!(!sets.is_empty(), "no runnable sets to sweep");
    info!(
        "Sweeping {} runnable sets over 1..={} cores.",
        sets.len(),
        arg.max_cores
    );

    let graphs: Vec<TaskGraph> = sets
        .iter()
        .map(task_graph_from_specs)
        .collect::<Result<_, _>>()?;
    let sweep_cores: Vec<usize> = (1..=arg.max_cores).collect();

    let summary = SweepSummary {
        dynamic_fcfs_avg_wait: average_wait_series(
            &graphs,
            &sweep_cores,
            SchedulingPolicy::Fcfs,
            AllocationPolicy::Dynamic,
            arg.iterations,
        )?,
        dynamic_pas_avg_wait: average_wait_series(
            &graphs,
            &sweep_cores,
            SchedulingPolicy::Pas,
            AllocationPolicy::Dynamic,
            arg.iterations,
        )?,
        static_fcfs_avg_wait: average_wait_series(
            &graphs,
            &sweep_cores,
            SchedulingPolicy::Fcfs,
            AllocationPolicy::Static,
            arg.iterations,
        )?,
        static_pas_avg_wait: average_wait_series(
            &graphs,
            &sweep_cores,
            SchedulingPolicy::Pas,
            AllocationPolicy::Static,
            arg.iterations,
        )?,
        sweep_cores,
    };

    let file_path = write_timestamped_yaml(&arg.output_dir_path, "sweep", &summary)?;
    println!("{}", file_path);

    Ok(())
}
