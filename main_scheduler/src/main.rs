use anyhow::Result;
use clap::Parser;
use lib::dag_creator::create_task_graph_from_json;
use lib::output_log::SimulationLog;
use lib::scheduler::{run_scheduler, SchedulerConfig};
use log::info;

#[derive(Parser)]
#[clap(
    name = "main_scheduler",
    version = "1.0",
    about = "About:
    Runs the event-time scheduling kernel over one runnable description file
    and dumps the resulting timeline, allocation bounds, and metrics as YAML."
)]
struct ArgParser {
    ///Path to the runnable description JSON file.
    #[clap(short = 'g', long = "graph_file_path", required = true)]
    graph_file_path: String,
    ///Number of processing cores.
    #[clap(short = 'c', long = "number_of_cores", required = true)]
    number_of_cores: usize,
    ///Queue ordering policy: fcfs or pas.
    #[clap(short = 's', long = "scheduling_policy", default_value = "fcfs")]
    scheduling_policy: String,
    ///Core allocation policy: static or dynamic.
    #[clap(short = 'a', long = "allocation_policy", default_value = "dynamic")]
    allocation_policy: String,
    ///Horizon factor: the run ends at iterations * total work ticks.
    #[clap(short = 'i', long = "iterations")]
    iterations: Option<i32>,
    ///Path to output directory.
    #[clap(short = 'o', long = "output_dir_path", default_value = "../outputs")]
    output_dir_path: String,
    ///Dispatch events immediately even when they would overrun the next
    ///periodic activation.
    #[clap(long = "no_periodic_guard")]
    no_periodic_guard: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let arg: ArgParser = ArgParser::parse();

    let graph = create_task_graph_from_json(&arg.graph_file_path)?;
    let mut config = SchedulerConfig::new(
        arg.number_of_cores,
        arg.scheduling_policy.parse()?,
        arg.allocation_policy.parse()?,
    );
    if let Some(iterations) = arg.iterations {
        config = config.with_iterations(iterations);
    }
    if arg.no_periodic_guard {
        config = config.without_periodic_guard();
    }

    let result = run_scheduler(&graph, config)?;
    info!(
        "makespan: {}, executed instances: {}, accumulated delay: {}",
        result.makespan,
        result.schedule.len(),
        result.total_delay
    );

    let file_path = SimulationLog::new(&graph, &config, &result).write_yaml(
        &arg.output_dir_path,
        &format!("{}-{}", config.scheduling_policy, config.allocation_policy),
    )?;
    println!("{}", file_path);

    Ok(())
}
