// SPDX-FileCopyrightText: 2024 Maciej Borzecki <maciek.borzecki@gmail.com>
//
// SPDX-License-Identifier: MIT

use std::env;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log;
use simple_logger;

mod config;
mod revision;
mod stamper;
mod template;

use anyhow::Result;

use revision::{GitCommandRunner, RevisionDescriptor};
use stamper::{RevisionSource, Stamper};

const VERSION: &str = match option_env!("BUILD_GIT_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};

/// Stamp the current git revision into a generated version source file.
#[derive(Parser, Debug)]
#[command(version = VERSION)]
struct Args {
    /// Generated file, overrides the configured path.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Configuration file, by default genversion.yaml is looked up starting
    /// from the current directory.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Use the given revision instead of querying git.
    #[arg(long)]
    revision: Option<String>,
    /// Increase logging verbosity.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn log_level(verbose: u8) -> log::Level {
    match verbose {
        0 => log::Level::Warn,
        1 => log::Level::Debug,
        _ => log::Level::Trace,
    }
}

/// Pick the revision override, the command line wins over the environment.
fn revision_override<F>(cli: Option<&str>, from_env: F) -> Option<RevisionDescriptor>
where
    F: FnOnce() -> Option<RevisionDescriptor>,
{
    if let Some(desc) = cli {
        let desc = RevisionDescriptor::new(desc);
        log::debug!("using revision override '{}'", desc);
        return Some(desc);
    }

    let desc = from_env()?;
    log::warn!(
        "using revision '{}' from {}, git is not queried",
        desc,
        revision::DESCRIBE_ENV
    );
    Some(desc)
}

fn load_config(args: &Args) -> Result<config::StamperConfig> {
    let cfg_path = match &args.config {
        Some(p) => Some(p.clone()),
        None => {
            let cwd = env::current_dir().context("cannot determine current directory")?;
            config::locate(&cwd, config::CONFIG_FILE_NAME)
        }
    };

    let mut conf = match cfg_path {
        Some(p) => config::load(&p)
            .with_context(|| format!("cannot load config file {}", p.display()))?,
        None => {
            log::debug!("no {} found, using defaults", config::CONFIG_FILE_NAME);
            config::StamperConfig::default()
        }
    };

    if let Some(output) = &args.output {
        // relative to where the tool was invoked, not the config file
        conf.output = env::current_dir()
            .context("cannot determine current directory")?
            .join(output);
    }
    Ok(conf)
}

fn main() -> Result<()> {
    let args = Args::parse();

    simple_logger::init_with_level(log_level(args.verbose)).context("cannot set up logger")?;

    let conf = load_config(&args)?;

    let source = match revision_override(args.revision.as_deref(), revision::from_env) {
        Some(desc) => RevisionSource::Fixed(desc),
        None => RevisionSource::Git {
            runner: GitCommandRunner,
            scope: revision::scope_for(Some(conf.project_dir.as_path())),
            abbrev: conf.abbrev,
        },
    };

    let mut s = Stamper::new(source, conf.template(), conf.target_path());
    let (outcome, desc) = s
        .run()
        .with_context(|| format!("cannot stamp {}", s.target().display()))?;
    log::debug!("{:?} with revision '{}'", outcome, desc);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["genversion"]).expect("unexpected error");
        assert_eq!(args.output, None);
        assert_eq!(args.config, None);
        assert_eq!(args.revision, None);
        assert_eq!(log_level(args.verbose), log::Level::Warn);
    }

    #[test]
    fn test_args_all() {
        let args = Args::try_parse_from([
            "genversion",
            "-o",
            "gen/V.java",
            "--config",
            "conf.yaml",
            "--revision",
            "abc12345",
            "-vv",
        ])
        .expect("unexpected error");
        assert_eq!(args.output, Some(PathBuf::from("gen/V.java")));
        assert_eq!(args.config, Some(PathBuf::from("conf.yaml")));
        assert_eq!(args.revision.as_deref(), Some("abc12345"));
        assert_eq!(log_level(args.verbose), log::Level::Trace);
    }

    #[test]
    fn test_revision_override_order() {
        let env_desc = || Some(RevisionDescriptor::new("fromenv1"));

        assert_eq!(
            revision_override(Some("abc12345"), env_desc),
            Some(RevisionDescriptor::new("abc12345"))
        );
        assert_eq!(
            revision_override(None, env_desc),
            Some(RevisionDescriptor::new("fromenv1"))
        );
        assert_eq!(revision_override(None, || None), None);
        // an explicit empty revision is used as is
        assert_eq!(
            revision_override(Some(""), env_desc),
            Some(RevisionDescriptor::new(""))
        );
    }

    #[test]
    fn test_args_reject_positional() {
        assert!(Args::try_parse_from(["genversion", "extra"]).is_err());
    }
}
