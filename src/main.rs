use clap::Parser;
use log::{error, info};
use simple_logger::init_with_level;

use pipeline_lite::{
    cli::{Args, SubArgs},
    config::Config,
    core::{assemble_directory, label_pairs},
};

fn main() {
    let start = std::time::Instant::now();
    let args: Args = Args::parse();

    if let Err(e) = init_with_level(args.log_level()) {
        eprintln!("ERROR: Could not initialize logger: {}", e);
    }

    match args.command {
        SubArgs::Assemble { args: assemble } => {
            let config = Config::read(assemble.config.clone()).unwrap_or_else(|e| {
                error!("{}: {}", assemble.config.display(), e);
                std::process::exit(1);
            });

            assemble_directory(
                &assemble.input_dir,
                &assemble.output_dir,
                &assemble.scripts_dir,
                &config,
                args.manager,
            )
            .unwrap_or_else(|e| {
                error!("{}", e);
                std::process::exit(1);
            });
        }
        SubArgs::Pairs { args: pairs } => {
            let config = Config::read_markers(pairs.config.clone()).unwrap_or_else(|e| {
                error!("{}: {}", pairs.config.display(), e);
                std::process::exit(1);
            });

            let labeled = label_pairs(&pairs.input_dir, &config).unwrap_or_else(|e| {
                error!("{}", e);
                std::process::exit(1);
            });

            for (id, pair) in labeled {
                println!(
                    "{}\t{}\t{}",
                    id,
                    pair.file1.display(),
                    pair.file2.display()
                );
            }
        }
    }

    let elapsed = start.elapsed();
    info!("Elapsed time: {:.3?}", elapsed);
}
