//! App Context

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use tripcart::{
    catalog::{Catalog, CatalogError},
    notifications::{Notification, Toasts},
    storage::FileStorage,
    storefront::Storefront,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to load catalog from {}: {source}", path.display())]
    Catalog {
        path: PathBuf,
        #[source]
        source: CatalogError,
    },

    #[error("failed to load bundled catalog: {0}")]
    BundledCatalog(#[source] CatalogError),
}

/// Storefront backed by the data directory, collecting notifications for display.
pub type AppStorefront = Storefront<FileStorage, Toasts>;

#[derive(Debug)]
pub struct AppContext {
    pub storefront: AppStorefront,
}

impl AppContext {
    /// Open the storefront persisted in `data_dir`.
    ///
    /// Uses the catalog at `catalog` when given, otherwise the bundled one.
    ///
    /// # Errors
    ///
    /// Returns an error when the catalog cannot be loaded.
    pub fn open(data_dir: impl Into<PathBuf>, catalog: Option<&Path>) -> Result<Self, AppInitError> {
        let catalog = match catalog {
            Some(path) => Catalog::from_path(path).map_err(|source| AppInitError::Catalog {
                path: path.to_path_buf(),
                source,
            })?,
            None => Catalog::bundled().map_err(AppInitError::BundledCatalog)?,
        };

        let storage = FileStorage::new(data_dir);

        debug!(
            data_dir = %storage.dir().display(),
            services = catalog.len(),
            "opening storefront"
        );

        Ok(Self {
            storefront: Storefront::open(catalog, storage, Toasts::new()),
        })
    }

    /// Take every pending notification, oldest first.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        let toasts = self.storefront.notifier_mut();

        let notifications = toasts
            .toasts()
            .iter()
            .map(|toast| toast.notification.clone())
            .collect();

        toasts.dismiss(None);

        notifications
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, num::NonZeroU32};

    use tempfile::tempdir;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn cart_persists_between_contexts() -> TestResult {
        let dir = tempdir()?;

        let mut ctx = AppContext::open(dir.path(), None)?;
        ctx.storefront.add_by_id("1", NonZeroU32::MIN)?;

        let ctx = AppContext::open(dir.path(), None)?;

        assert_eq!(ctx.storefront.cart().item_count(), 1);
        assert!(dir.path().join("cart-storage.json").exists());

        Ok(())
    }

    #[test]
    fn notifications_are_taken_once() -> TestResult {
        let dir = tempdir()?;

        let mut ctx = AppContext::open(dir.path(), None)?;
        ctx.storefront.clear_cart();

        let first = ctx.take_notifications();

        assert_eq!(first.len(), 1);
        assert!(ctx.take_notifications().is_empty());

        Ok(())
    }

    #[test]
    fn catalog_override_errors_name_the_file() -> TestResult {
        let dir = tempdir()?;
        let path = dir.path().join("catalog.yml");

        fs::write(&path, "services: [")?;

        let error = AppContext::open(dir.path(), Some(&path)).err().ok_or("expected error")?;

        assert!(error.to_string().contains("catalog.yml"), "{error}");

        Ok(())
    }
}
