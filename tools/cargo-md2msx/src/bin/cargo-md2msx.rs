use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
struct Opts {
    // This is passed in by cargo.
    _my_command: String,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the firmware into an Intel HEX image.
    Build(BuildOpts),
    /// Build the firmware and program the board with avrdude.
    Flash(FlashOpts),
}

#[derive(Args)]
struct BuildOpts {
    #[clap(long)]
    manifest_path: Option<PathBuf>,

    /// PCB revision to build for, e.g. 1.3.
    #[clap(long)]
    pcb: Option<String>,

    #[clap(short, long)]
    verbose: bool,
}

#[derive(Args)]
struct FlashOpts {
    #[clap(flatten)]
    build: BuildOpts,

    /// Serial port the board's bootloader listens on.
    #[clap(long)]
    port: Option<String>,
}

fn builder(opts: BuildOpts) -> anyhow::Result<cargo_md2msx::Builder> {
    Ok(cargo_md2msx::Builder::new(opts.manifest_path)?
        .pcb(opts.pcb)
        .verbose(opts.verbose))
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();

    match opts.command {
        Commands::Build(c) => {
            let hex = builder(c)?.build()?;
            println!("{}", hex.display());
        },
        Commands::Flash(c) => {
            builder(c.build)?
                .port(c.port)
                .flash()?;
        },
    }

    Ok(())
}
