//! Generate command - write guard files next to their source types.

use crate::config::GuardgenConfig;
use anyhow::bail;
use clap::Args;
use guardgen_core::Generator;
use guardgen_core::output::GeneratedFile;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// TypeScript files, directories or glob patterns
    #[arg(required = true)]
    pub files: Vec<String>,

    /// Interface or type alias to generate a guard for
    #[arg(short, long, value_name = "NAME")]
    pub interface: Option<String>,

    /// Custom guard function name (default: is<Name>)
    #[arg(short, long, value_name = "NAME")]
    pub guard_name: Option<String>,

    /// Generate guards for every interface and type alias
    #[arg(long, conflicts_with = "interface")]
    pub all: bool,

    /// Print generated files instead of writing them
    #[arg(long)]
    pub stdout: bool,

    /// Print generated files as JSON
    #[arg(long, conflicts_with = "stdout")]
    pub json: bool,

    /// Config file (overrides global and project config)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    if args.interface.is_none() && !args.all {
        bail!("either --interface <NAME> or --all is required");
    }

    let root = std::env::current_dir()?;
    let config = GuardgenConfig::load(&root, args.config.as_deref())?;

    let inputs = super::expand_inputs(&args.files)?;
    let index = super::load_index(&inputs)?;
    let generator = Generator::with_options(&index, config.generate_options());

    let guard_name = args.guard_name.as_deref();
    let files = match &args.interface {
        Some(name) => vec![generator.generate_file_for(name, guard_name)?],
        None => {
            if guard_name.is_some() {
                warn!("--guard-name applies to every generated guard with --all");
            }
            generator.generate_all_files(guard_name)
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&files)?);
    } else if args.stdout {
        print_files(&files);
    } else {
        write_files(&files)?;
    }
    Ok(())
}

fn print_files(files: &[GeneratedFile]) {
    let headers = files.len() > 1;
    for (i, file) in files.iter().enumerate() {
        if headers {
            if i > 0 {
                println!();
            }
            println!("// {}", file.file_name.display());
        }
        print!("{}", file.content);
    }
}

fn write_files(files: &[GeneratedFile]) -> anyhow::Result<()> {
    use anyhow::Context;

    for file in files {
        if let Some(parent) = file.file_name.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&file.file_name, &file.content)
            .with_context(|| format!("failed to write {}", file.file_name.display()))?;
        info!(guard = %file.guard_name, path = %file.file_name.display(), "generated guard");
        eprintln!("Generated {}", file.file_name.display());
    }
    Ok(())
}
