use anyhow::{Context, Result};
use clap::Parser;
use img_shrink::cli::Args;
use img_shrink::logger::{set_quiet_mode, set_verbose_mode};
use img_shrink::utils::print_summary;
use img_shrink::{batch_compress_images, ShrinkConfig};

fn main() -> Result<()> {
    let args = Args::parse();
    set_quiet_mode(args.quiet);
    set_verbose_mode(args.verbose);

    let config = ShrinkConfig::from_args(&args).context("Invalid arguments")?;
    let summary = batch_compress_images(&config)
        .with_context(|| format!("Failed to process {:?}", config.input_dir))?;

    print_summary(&summary);
    Ok(())
}
