// SPDX-FileCopyrightText: 2024 Maciej Borzecki <maciek.borzecki@gmail.com>
//
// SPDX-License-Identifier: MIT

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log;
use serde;
use serde_yml;
use thiserror;

use crate::template::Template;

pub const CONFIG_FILE_NAME: &str = "genversion.yaml";

/// Wraps configuration errors.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("cannot read configuration: {0}")]
    Io(#[from] io::Error),
    #[error("cannot load configuration: {0}")]
    Parse(#[from] serde_yml::Error),
}

fn default_output() -> PathBuf {
    PathBuf::from("src/com/mystictri/neotexture/TextureVersion.java")
}

fn default_product_version() -> String {
    "0.6.5".to_string()
}

fn default_marker() -> String {
    "devel".to_string()
}

fn default_package() -> String {
    "com.mystictri.neotexture".to_string()
}

fn default_class() -> String {
    "TextureVersion".to_string()
}

fn default_abbrev() -> u32 {
    8
}

/// Stamper configuration.
#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StamperConfig {
    /// Generated file, relative to the project directory.
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Product version preceding the marker.
    #[serde(rename = "product-version", default = "default_product_version")]
    pub product_version: String,
    /// Marker between product version and revision.
    #[serde(default = "default_marker")]
    pub marker: String,
    /// Package declaration of the generated file.
    #[serde(default = "default_package")]
    pub package: String,
    /// Name of the generated class.
    #[serde(default = "default_class")]
    pub class: String,
    /// Abbreviated commit hash length.
    #[serde(default = "default_abbrev")]
    pub abbrev: u32,
    /// Directory relative paths are resolved against, empty for the current
    /// directory.
    #[serde(skip)]
    pub project_dir: PathBuf,
}

impl Default for StamperConfig {
    fn default() -> Self {
        StamperConfig {
            output: default_output(),
            product_version: default_product_version(),
            marker: default_marker(),
            package: default_package(),
            class: default_class(),
            abbrev: default_abbrev(),
            project_dir: PathBuf::new(),
        }
    }
}

impl StamperConfig {
    pub fn template(&self) -> Template<'_> {
        Template {
            package: &self.package,
            class: &self.class,
            product_version: &self.product_version,
            marker: &self.marker,
        }
    }

    /// Path of the generated file.
    pub fn target_path(&self) -> PathBuf {
        self.project_dir.join(&self.output)
    }
}

/// Loads configuration from the provided reader.
pub fn from_reader<R>(cfg: R) -> Result<StamperConfig, ConfigError>
where
    R: io::Read,
{
    let conf: StamperConfig = serde_yml::from_reader(cfg)?;
    log::debug!("config: {:?}", conf);
    Ok(conf)
}

/// Loads configuration from a file, relative paths in it are resolved against
/// the file's directory.
pub fn load(path: &Path) -> Result<StamperConfig, ConfigError> {
    log::debug!("loading config from {}", path.display());

    let f = fs::File::open(path)?;
    let mut conf = from_reader(f)?;
    conf.project_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    Ok(conf)
}

/// Locate a config file with the given name, starting at `start_dir` and
/// walking up the directory tree.
pub fn locate(start_dir: &Path, name: &str) -> Option<PathBuf> {
    let mut dir = Some(start_dir);

    while let Some(curdir) = dir {
        log::debug!("checking {}", curdir.display());
        let conf = curdir.join(name);

        if conf.is_file() {
            log::debug!("found config {}", conf.display());
            return Some(conf);
        }
        dir = curdir.parent();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let conf = from_reader("{}".as_bytes()).expect("unexpected error");
        assert_eq!(conf, StamperConfig::default());
        assert_eq!(
            conf.target_path(),
            PathBuf::from("src/com/mystictri/neotexture/TextureVersion.java")
        );
    }

    #[test]
    fn test_config_overrides() {
        let conf = from_reader(
            r#"
output: gen/Version.java
product-version: 1.0.0
marker: rc
package: org.example
class: Version
abbrev: 12
"#
            .as_bytes(),
        )
        .expect("unexpected error");

        assert_eq!(conf.output, PathBuf::from("gen/Version.java"));
        assert_eq!(conf.product_version, "1.0.0");
        assert_eq!(conf.marker, "rc");
        assert_eq!(conf.package, "org.example");
        assert_eq!(conf.class, "Version");
        assert_eq!(conf.abbrev, 12);
    }

    #[test]
    fn test_config_unknown_key() {
        let res = from_reader("outptu: foo.java\n".as_bytes());
        assert!(matches!(res, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_resolves_against_config_dir() {
        let d = tempfile::tempdir().expect("cannot create tempdir");
        let path = d.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "output: gen/V.java\n").expect("cannot write config");

        let conf = load(&path).expect("unexpected error");
        assert_eq!(conf.project_dir, d.path());
        assert_eq!(conf.target_path(), d.path().join("gen/V.java"));
    }

    #[test]
    fn test_locate_walks_up() {
        let d = tempfile::tempdir().expect("cannot create tempdir");
        let nested = d.path().join("a/b/c");
        fs::create_dir_all(&nested).expect("cannot create dirs");

        assert_eq!(locate(&nested, CONFIG_FILE_NAME), None);

        let path = d.path().join("a").join(CONFIG_FILE_NAME);
        fs::write(&path, "{}\n").expect("cannot write config");
        assert_eq!(locate(&nested, CONFIG_FILE_NAME), Some(path));
    }
}
