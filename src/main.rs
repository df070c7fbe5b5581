//! # `confgit`
//!
//! `confgit` clones a configuration repository without a working tree and
//! materializes only the part you ask for, or stages and commits a single
//! file in it. All repository work is done by the `git` executable.
//!
//! ## Usage
//!
//! ```sh
//! confgit --remote-url git@example.git.host:user/repository.git checkout services/api
//! confgit push-file configs/app.yaml
//! confgit --dry-run checkout services/api
//! ```
//!
//! Settings come from `--remote-url`/`--local-dir`/`--git-binary`, the
//! `CONFGIT_REMOTE_URL` and `CONFGIT_LOCAL_DIR` environment variables, and
//! `./confgit.yaml` or `--config`.

use clap::Parser as _;
use confgit::cli::Args;
use confgit::error::ConfgitError;
use confgit::system::RealSystem;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

fn main() {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_target(false).with_env_filter(filter).init();

    let system = RealSystem::new();
    match confgit::run(&args, &system) {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            error!("{:#}", err);
            std::process::exit(
                err.downcast_ref::<ConfgitError>()
                    .map_or(1, ConfgitError::exit_code),
            );
        }
    }
}
