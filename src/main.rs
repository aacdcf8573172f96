use std::path::PathBuf;

use clap::Parser;
use reasonbench::{DatasetAdapter, TemporalAgent, TemporalQuery};

#[derive(Parser, Debug)]
#[command(arg_required_else_help = true)]
struct Args {
    /// Benchmark dataset to convert; prints the converted records as JSON
    #[arg(short, long)]
    dataset: Option<PathBuf>,

    /// Free-text temporal query, e.g. "what is 10 days after 15/03/2021"
    query: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    if let Some(path) = &args.dataset {
        let adapter = DatasetAdapter::load(path)?;
        println!("{}", serde_json::to_string_pretty(&adapter.convert_all())?);
    }

    if !args.query.is_empty() {
        let agent = TemporalAgent::new();
        let response = agent.process(&TemporalQuery::new(args.query.join(" ")));
        println!("{}", serde_json::to_string_pretty(&response)?);
    }

    Ok(())
}
