use clap::Parser;
use wikiracer::driver::Args;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(args.num_proc.max(1))
        .enable_all()
        .build()?;
    runtime.block_on(wikiracer::driver::run(args))
}
