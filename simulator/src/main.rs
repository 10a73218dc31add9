use anyhow::Context;
use clap::Parser;
use gui_bridge::bridge::{gui_bind_address, GuiBridge};
use gui_bridge::model::DashboardModel;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Game Master dashboard session driver")]
struct Args {
    /// Replay one session offline and emit a summary
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Replay a scripted scenario instead of generating one
    #[arg(long)]
    scenario: Option<PathBuf>,
    #[arg(long, default_value_t = 6)]
    entities: usize,
    #[arg(long, default_value_t = 60)]
    steps: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Keep the GUI bridge alive for incoming scenarios
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut workflow_config = if let Some(path) = args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(args.entities, args.steps, args.seed)
    };
    if let Some(path) = args.scenario {
        workflow_config.scenario = Some(path);
    }

    let runner = Runner::new(workflow_config);
    let gui_bridge = GuiBridge::new(Arc::new(runner.clone()));

    if args.offline {
        let scenario = runner.scenario()?;
        let result = runner
            .execute(&scenario)
            .with_context(|| format!("replaying scenario {}", scenario.name))?;

        println!(
            "Offline run -> entities {}, timed out {}, detonations {}, alerts {}, sounds poor/good {}/{}",
            result.entities_on_map,
            result.entities_timed_out,
            result.detonations_drawn,
            result.alert_count,
            result.poor_sounds,
            result.good_sounds
        );

        gui_bridge.publish(&DashboardModel::from_result(&result));
        gui_bridge.publish_status("Offline session results ready.");

        let report = format!(
            "scenario={} elapsed_ms={} events={} rejected={} status_changes={} pulses={} rendered={} alerts={:?} concepts={:?} notifications={}\n",
            result.scenario,
            result.elapsed_ms,
            result.events_applied,
            result.rejected_updates,
            result.status_changes,
            result.pulses,
            result.rendered_points,
            result.alert_roles,
            result.concept_order,
            result.notifications.len()
        );
        let report_path = PathBuf::from("tools/data/offline_session.log");
        if let Some(parent) = report_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&report_path)
            .with_context(|| format!("opening report {}", report_path.display()))?;
        file.write_all(report.as_bytes())?;
    }
    if args.serve {
        let _server = gui_bridge.serve(gui_bind_address());
        gui_bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
