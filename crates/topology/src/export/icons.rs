//! Icon asset resolution.
//!
//! Maps a node's [`Icon`] to what a renderer should draw: an image file that
//! must exist on disk, or a plain fallback shape for builtin kinds that have
//! no configured asset.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::trace;

use topology_core::node::{Icon, NodeKind};

use super::Error;
use crate::config::IconConfig;

/// What a node is drawn with once its icon is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconAsset {
    /// An image file that exists on disk.
    Image(PathBuf),
    /// A named layout-engine shape used when no image is configured.
    Shape(&'static str),
}

/// Resolves node icons against the configured asset locations.
#[derive(Debug, Clone, Default)]
pub struct IconRegistry {
    directory: Option<PathBuf>,
    custom_directory: Option<PathBuf>,
    overrides: IndexMap<NodeKind, PathBuf>,
}

impl IconRegistry {
    pub fn from_config(config: &IconConfig) -> Self {
        Self {
            directory: config.directory().map(Path::to_path_buf),
            custom_directory: config.custom_directory().map(Path::to_path_buf),
            overrides: config.overrides().clone(),
        }
    }

    /// Returns the fallback shape drawn for `kind` when it has no image.
    pub fn fallback_shape(kind: NodeKind) -> &'static str {
        match kind {
            NodeKind::Person => "egg",
            NodeKind::CliClient => "component",
            NodeKind::Compute => "box3d",
            NodeKind::Database => "cylinder",
            NodeKind::ReverseProxy => "hexagon",
            NodeKind::External => "doubleoctagon",
        }
    }

    /// Resolves `icon` to a drawable asset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingAsset`] when the icon maps to an image path
    /// that does not exist.
    pub fn resolve(&self, icon: &Icon) -> Result<IconAsset, Error> {
        let path = match icon {
            Icon::Builtin(kind) => match self.builtin_path(*kind) {
                Some(path) => path,
                None => return Ok(IconAsset::Shape(Self::fallback_shape(*kind))),
            },
            Icon::Custom(path) => self.custom_path(path),
        };

        if !path.exists() {
            return Err(Error::MissingAsset(path));
        }

        trace!(path = path.display().to_string(); "Resolved icon asset");
        Ok(IconAsset::Image(path))
    }

    fn builtin_path(&self, kind: NodeKind) -> Option<PathBuf> {
        if let Some(path) = self.overrides.get(&kind) {
            return Some(path.clone());
        }
        self.directory
            .as_ref()
            .map(|dir| dir.join(format!("{}.png", kind.asset_name())))
    }

    fn custom_path(&self, path: &Path) -> PathBuf {
        match &self.custom_directory {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_builtin_without_directory_falls_back_to_shape() {
        let registry = IconRegistry::default();

        assert_eq!(
            registry.resolve(&Icon::Builtin(NodeKind::Database)).unwrap(),
            IconAsset::Shape("cylinder")
        );
    }

    #[test]
    fn test_builtin_from_directory() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("postgresql.png"), b"icon").unwrap();
        let registry =
            IconRegistry::from_config(&IconConfig::new(Some(dir.path().to_path_buf()), None));

        assert_eq!(
            registry.resolve(&Icon::Builtin(NodeKind::Database)).unwrap(),
            IconAsset::Image(dir.path().join("postgresql.png"))
        );
        assert!(matches!(
            registry.resolve(&Icon::Builtin(NodeKind::Person)),
            Err(Error::MissingAsset(path)) if path == dir.path().join("user.png")
        ));
    }

    #[test]
    fn test_override_wins_over_directory() {
        let dir = tempdir().unwrap();
        let custom = dir.path().join("haproxy.png");
        fs::write(&custom, b"icon").unwrap();
        let config = IconConfig::new(Some(PathBuf::from("/nonexistent")), None)
            .with_override(NodeKind::ReverseProxy, &custom);
        let registry = IconRegistry::from_config(&config);

        assert_eq!(
            registry.resolve(&Icon::Builtin(NodeKind::ReverseProxy)).unwrap(),
            IconAsset::Image(custom)
        );
    }

    #[test]
    fn test_custom_icon_relative_to_custom_directory() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("cardano.png"), b"icon").unwrap();
        let registry =
            IconRegistry::from_config(&IconConfig::new(None, Some(dir.path().to_path_buf())));

        assert_eq!(
            registry
                .resolve(&Icon::Custom(PathBuf::from("cardano.png")))
                .unwrap(),
            IconAsset::Image(dir.path().join("cardano.png"))
        );
    }

    #[test]
    fn test_missing_custom_icon_is_an_error() {
        let dir = tempdir().unwrap();
        let registry =
            IconRegistry::from_config(&IconConfig::new(None, Some(dir.path().to_path_buf())));

        let err = registry
            .resolve(&Icon::Custom(PathBuf::from("cardano.png")))
            .unwrap_err();
        assert!(matches!(err, Error::MissingAsset(path) if path.ends_with("cardano.png")));
    }
}
