use anyhow::Result;
use clap::Parser;

use version_release::config::{self, Config};
use version_release::git_ops::GitRepo;
use version_release::hosting::GithubClient;
use version_release::ui;
use version_release::workflow::{self, UpdateOutcome};

#[derive(clap::Parser)]
#[command(
    name = "version-release",
    version,
    about = "Update package version and changelog from pull request commits, and cut hosted releases"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Resolve the release type from the current branch's pull request and
    /// update the manifest version and changelog
    Update,

    /// Create a hosted release from the changelog's newest entry
    Release {
        #[arg(long, help = "Skip the package publish step")]
        no_publish: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let file_config = match config::load_file_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    let config = match Config::from_env(file_config) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let api = match GithubClient::new(&config.token, &config.owner, &config.repo) {
        Ok(api) => api,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    match args.command {
        CliCommand::Update => {
            let repo = match GitRepo::discover() {
                Ok(repo) => repo,
                Err(e) => {
                    ui::display_error(&format!("Git repository error: {}", e));
                    std::process::exit(1);
                }
            };

            match workflow::update_version(&config, &repo, &api) {
                Ok(UpdateOutcome::NoRelease) => {
                    ui::display_status(
                        "No relevant change detected, the version will not be updated",
                    );
                }
                Ok(UpdateOutcome::Released { version }) => {
                    ui::display_success(&format!("Updated version to {}", version));
                }
                Err(e) => {
                    ui::display_error(&format!("Error while updating version: {}", e));
                    std::process::exit(1);
                }
            }
        }
        CliCommand::Release { no_publish } => {
            let npm_publish = config.npm_publish && !no_publish;

            match workflow::release_version(&config, &api, npm_publish) {
                Ok(Some(release)) => {
                    ui::display_success(&format!("Release {} processed", release.tag_name));
                }
                Ok(None) => {
                    ui::display_status("No release to generate");
                }
                Err(e) => {
                    ui::display_error(&format!("Error while releasing version: {}", e));
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
