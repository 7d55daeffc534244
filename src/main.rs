use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod builder;
mod check;
mod metadata;
mod source;

use builder::MetadataBuilder;
use source::MechanismSource;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "make-metadata")]
#[command(about = "Create metadata.yaml for a model folder", long_about = None)]
struct Cli {
    /// More log output (-v info, -vv debug).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Don't print the path of the written file.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill in a metadata template (name and mechanism are replaced).
    Template {
        /// Model folder to create metadata.yaml in.
        model_folder: PathBuf,

        /// Mechanism file to copy into the model folder.
        mech_filename: PathBuf,

        /// Template file (default: ./template_metadata.yaml, else built-in).
        #[arg(long)]
        template: Option<PathBuf>,
    },

    /// Reference a mechanism file given directly.
    Direct {
        /// Model folder to create metadata.yaml in.
        model_folder: PathBuf,

        /// Mechanism file to copy into the model folder.
        mech_filename: PathBuf,

        #[arg(long, default_value_t = 1.0)]
        version: f64,
    },

    /// Take the mechanism file and initializers from an initial-condition config.
    Ic {
        /// Model folder to create metadata.yaml in.
        model_folder: PathBuf,

        /// Initial-condition config; its `mechanism` is relative to its directory.
        #[arg(value_name = "IC_CFG_PATH")]
        ic_cfg_path: PathBuf,

        #[arg(long, default_value_t = 2.0)]
        version: f64,
    },

    /// Check that an existing metadata.yaml references files that exist.
    Check { model_folder: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let builder = match cli.cmd {
        Commands::Template {
            model_folder,
            mech_filename,
            template,
        } => {
            let template = match template {
                Some(path) => metadata::template::load_template(&path)?,
                None => metadata::template::load_default_template_in(Path::new("."))?,
            };
            MetadataBuilder::new(model_folder, MechanismSource::Direct(mech_filename))
                .template(template)
        }
        Commands::Direct {
            model_folder,
            mech_filename,
            version,
        } => MetadataBuilder::new(model_folder, MechanismSource::Direct(mech_filename))
            .version(version),
        Commands::Ic {
            model_folder,
            ic_cfg_path,
            version,
        } => MetadataBuilder::new(model_folder, MechanismSource::InitialCondition(ic_cfg_path))
            .version(version),
        Commands::Check { model_folder } => {
            let report = check::check_model_folder(&model_folder)?;
            if !report.is_ok() {
                for (field, path) in &report.missing {
                    eprintln!("missing {}: {}", field, path.display());
                }
                anyhow::bail!(
                    "{} references {} missing file(s)",
                    model_folder.join(metadata::METADATA_FILE).display(),
                    report.missing.len()
                );
            }
            if !cli.quiet {
                println!("OK {} ({})", model_folder.display(), report.record.name);
            }
            return Ok(());
        }
    };

    let out = builder.run()?;
    if !cli.quiet {
        println!("Wrote {}", out.display());
    }

    Ok(())
}
