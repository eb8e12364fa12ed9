use batchcrop::aspect::AspectRatio;
use batchcrop::imaging::RustBackend;
use batchcrop::session::Session;
use batchcrop::{config, export, load, output, script};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Shared flags for commands that load images and replay gestures.
#[derive(clap::Args, Clone)]
struct SessionArgs {
    /// Image files or directories (walked recursively, sorted by name)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// JSON gesture script replayed after loading
    #[arg(long)]
    script: Option<PathBuf>,

    /// Locked crop ratio, e.g. 3:2, 1:1, 4:3, 16:9 (overrides config)
    #[arg(long)]
    aspect: Option<AspectRatio>,
}

#[derive(Parser)]
#[command(name = "batchcrop")]
#[command(about = "Crop a batch of images to one aspect-locked framing")]
#[command(long_about = "\
Crop a batch of images to one aspect-locked framing

Every image is fitted into a fixed viewport (800x600 by default) and gets a
centered crop of the chosen ratio. A gesture script can then move and resize
the crop on any image and apply it to all of them; the crop carries over by
relative position and size. Export cuts every image in its native resolution,
re-encodes it as JPEG, and bundles the results into one zip.

Gesture script (coordinates in viewport space):

  [
    { \"action\": \"select\", \"index\": 0 },
    { \"action\": \"handle_down\", \"handle\": \"se\" },
    { \"action\": \"pointer_move\", \"x\": 520, \"y\": 410 },
    { \"action\": \"pointer_up\" },
    { \"action\": \"apply_to_all\" }
  ]

Actions: select, remove (index), pointer_down, pointer_move (x, y),
handle_down (nw|ne|sw|se), pointer_up, pointer_leave, apply_to_all,
reset_all, reset_crop, set_aspect (ratio).

Run 'batchcrop preview' to cut only the active image (the last one selected
by the script, or the first) before exporting the whole batch.

Run 'batchcrop gen-config' to generate a documented config.toml.

Set RUST_LOG=debug for diagnostics.")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Directory holding config.toml
    #[arg(long, default_value = ".", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load, replay gestures, and export every crop into a zip
    Crop {
        #[command(flatten)]
        session: SessionArgs,

        /// JPEG quality 1-100 (overrides config)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
        quality: Option<u32>,

        /// Archive path, or a directory to place it in
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Load, replay gestures, and crop only the active image into one JPEG
    Preview {
        #[command(flatten)]
        session: SessionArgs,

        /// JPEG quality 1-100 (overrides config)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
        quality: Option<u32>,

        /// JPEG path, or a directory to place it in
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Load, replay gestures, and print each image's crop bounds as JSON
    Plan {
        #[command(flatten)]
        session: SessionArgs,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Crop {
            session: args,
            quality,
            output: output_path,
        } => {
            let mut config = config::load_config(&cli.config)?;
            if let Some(q) = quality {
                config.export.quality = q;
            }
            let backend = RustBackend::new();
            let session = prepare_session(&backend, &mut config, &args, true)?;

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_export_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = export::export_all(&backend, &session, &config.export, Some(tx))?;
            printer
                .join()
                .map_err(|_| "progress printer thread panicked")?;

            let path = output_file_path(output_path.as_deref(), &result.archive_name);
            std::fs::write(&path, &result.archive)?;
            output::print_export_result(&result, &path);
        }
        Command::Preview {
            session: args,
            quality,
            output: output_path,
        } => {
            let mut config = config::load_config(&cli.config)?;
            if let Some(q) = quality {
                config.export.quality = q;
            }
            let backend = RustBackend::new();
            let session = prepare_session(&backend, &mut config, &args, false)?;

            let preview = export::preview_active(&backend, &session, &config.export)?;
            let path = output_file_path(output_path.as_deref(), &preview.file_name);
            std::fs::write(&path, &preview.data)?;
            output::print_preview(&preview, &path);
        }
        Command::Plan { session: args } => {
            let mut config = config::load_config(&cli.config)?;
            let backend = RustBackend::new();
            let session = prepare_session(&backend, &mut config, &args, false)?;
            let plan = export::plan_crops(&session);
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load the inputs and replay the gesture script, if any.
///
/// `verbose` prints the load listing and replay summary; `plan` keeps stdout
/// for JSON only and `preview` prints a single line.
fn prepare_session(
    backend: &RustBackend,
    config: &mut config::BatchConfig,
    args: &SessionArgs,
    verbose: bool,
) -> Result<Session, Box<dyn std::error::Error>> {
    if let Some(aspect) = args.aspect {
        config.crop.aspect_ratio = aspect;
    }

    let mut session = Session::from_config(config);
    let summary = load::load_images(backend, &mut session, &args.inputs)?;
    if verbose {
        output::print_load_summary(&session, &summary);
    }
    if session.is_empty() {
        return Err("no loadable images among the inputs".into());
    }

    if let Some(path) = &args.script {
        let steps = script::load_script(path)?;
        let report = script::run_script(&mut session, &steps);
        if verbose {
            output::print_script_report(&session, &report);
        }
    }

    Ok(session)
}

/// Resolve where an output file goes: the given file, inside the given
/// directory, or the working directory.
fn output_file_path(output: Option<&Path>, file_name: &str) -> PathBuf {
    match output {
        Some(p) if p.is_dir() => p.join(file_name),
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(file_name),
    }
}
