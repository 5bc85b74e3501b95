use clap::{Parser, Subcommand};
use rfd::FileDialog;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use hanli_assets::{
    AssetError, AutoConfirm, Config, Confirmer, DialogConfirm, ImageController, LocalStore,
    NoopReloader, PendingFile, TargetFolder,
};

/// Manage the images and videos of a product folder
#[derive(Debug, Parser)]
#[command(name = "hanli-assets", version)]
struct Cli {
    /// Product folder to manage (a folder picker opens when omitted)
    #[arg(short, long, global = true)]
    folder: Option<PathBuf>,

    /// Delete without asking
    #[arg(short, long, global = true)]
    yes: bool,

    /// Config file to use instead of the one in the user config directory
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the managed files in display order
    List,
    /// Copy image and video files into the folder
    Upload {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Delete files by name
    Delete {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Delete every image and video in the folder
    Clear,
    /// Move the file at one display position to another
    Move { from: usize, to: usize },
    /// Exchange two display positions
    Swap { a: usize, b: usize },
    /// Forget the custom order
    ResetSort,
    /// Show sort, queue and delete state
    Status,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AssetError> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    // Same native picker the import button used
    let folder = match cli.folder {
        Some(folder) => folder,
        None => FileDialog::new()
            .set_title("Select Product Folder")
            .pick_folder()
            .ok_or(AssetError::NoTargetFolder)?,
    };

    let confirmer: Arc<dyn Confirmer> = if cli.yes || !config.confirm_deletes {
        Arc::new(AutoConfirm(true))
    } else {
        Arc::new(DialogConfirm::new("hanli-assets"))
    };

    let mut controller = ImageController::new(
        Arc::new(LocalStore::new()),
        Arc::new(NoopReloader),
        confirmer,
        &config,
    );
    controller.on_any(|event| tracing::debug!(event = event.name(), "{:?}", event));

    controller
        .set_current_item(Some(TargetFolder::from_path(folder)))
        .await;
    controller.refresh().await?;

    match cli.command {
        Command::List => {}
        Command::Upload { paths } => {
            let files = paths.into_iter().map(PendingFile::from_path).collect();
            match controller.add_files(files).await? {
                Some(summary) => {
                    println!(
                        "Uploaded {} files, {} failed.",
                        summary.success_count, summary.failed_count
                    );
                    for error in &summary.errors {
                        println!("  {}", error);
                    }
                }
                None => println!("Nothing uploaded: only image and video files are accepted."),
            }
        }
        Command::Delete { names } => {
            let summary = controller.delete_files_with_confirm(&names).await?;
            print_delete(summary.success, summary.failed, &summary.errors);
        }
        Command::Clear => {
            let summary = controller.clear_all_images().await?;
            print_delete(summary.success, summary.failed, &summary.errors);
        }
        Command::Move { from, to } => {
            if !controller.move_image(from, to).await? {
                println!("Nothing to move.");
            }
        }
        Command::Swap { a, b } => {
            if !controller.swap_images(a, b).await? {
                println!("Nothing to swap.");
            }
        }
        Command::ResetSort => controller.reset_sort().await?,
        Command::Status => {
            let queue = controller.queue_status();
            let delete = controller.delete_status();
            println!("Custom sort:   {}", controller.has_custom_sort());
            println!("Sort entries:  {}", controller.current_sort().len());
            println!("Uploading:     {} ({} queued)", queue.is_uploading, queue.queue_length);
            println!("Deleting:      {} ({} pending)", delete.is_deleting, delete.pending.len());
            return Ok(());
        }
    }

    controller.refresh().await?;
    print_files(&controller);
    Ok(())
}

fn print_files(controller: &ImageController) {
    let files = controller.image_files();
    if let Some(folder) = controller.current_item() {
        println!("{} ({} files)", folder.path.display(), files.len());
    }
    for (index, file) in files.iter().enumerate() {
        let size = file
            .size
            .map(|s| format!("{:.1} KB", s as f64 / 1024.0))
            .unwrap_or_default();
        println!("{:>4}  {:<40} {:<6} {:>10}", index, file.name, file.kind, size);
    }
}

fn print_delete(success: usize, failed: usize, errors: &[String]) {
    println!("Deleted {} files, {} failed.", success, failed);
    for error in errors {
        println!("  {}", error);
    }
}
