use std::sync::Arc;
use tracing::info;

use crate::cache::FunkoCache;
use crate::dto::{FunkoPatch, FunkoRequest};
use crate::error::{FunkoApiError, Result};
use crate::models::Funko;
use crate::repository::{FunkoFilter, FunkoRepository};

/// Business operations over the funko catalog. Composes the repository with
/// the per-id cache and owns request validation.
pub struct FunkoService {
    repository: Arc<dyn FunkoRepository>,
    cache: FunkoCache,
}

impl FunkoService {
    pub fn new(repository: Arc<dyn FunkoRepository>) -> Self {
        Self {
            repository,
            cache: FunkoCache::new(),
        }
    }

    /// The full list is served straight from the repository; keeping it out
    /// of the cache avoids invalidating it on every write.
    pub async fn list(&self, filter: &FunkoFilter) -> Result<Vec<Funko>> {
        self.repository.all(filter).await
    }

    pub async fn get(&self, id: i64) -> Result<Funko> {
        if let Some(funko) = self.cache.get(id) {
            return Ok(funko);
        }
        let funko = self
            .repository
            .get(id)
            .await?
            .ok_or(FunkoApiError::NotFound(id))?;
        self.cache.put(&funko);
        Ok(funko)
    }

    pub async fn create(&self, request: FunkoRequest) -> Result<Funko> {
        if let Err(errors) = request.validate() {
            crate::metrics::validation_failed();
            return Err(FunkoApiError::Validation(errors));
        }
        let funko = self.repository.insert(request.into_args()).await?;
        self.cache.put(&funko);
        crate::metrics::funko_created();
        info!("created funko {} with id {}", funko.name, funko.id);
        Ok(funko)
    }

    pub async fn update(&self, id: i64, request: FunkoRequest) -> Result<Funko> {
        if let Err(errors) = request.validate() {
            crate::metrics::validation_failed();
            return Err(FunkoApiError::Validation(errors));
        }
        let funko = self
            .repository
            .update(id, request.into_args())
            .await?
            .ok_or(FunkoApiError::NotFound(id))?;
        self.cache.put(&funko);
        crate::metrics::funko_updated();
        info!("updated funko with id {}", id);
        Ok(funko)
    }

    pub async fn patch(&self, id: i64, patch: FunkoPatch) -> Result<Funko> {
        if let Err(errors) = patch.validate() {
            crate::metrics::validation_failed();
            return Err(FunkoApiError::Validation(errors));
        }
        let funko = self
            .repository
            .patch(id, patch.into_changes())
            .await?
            .ok_or(FunkoApiError::NotFound(id))?;
        self.cache.put(&funko);
        crate::metrics::funko_patched();
        info!("patched funko with id {}", id);
        Ok(funko)
    }

    pub async fn delete(&self, id: i64) -> Result<Funko> {
        let funko = self
            .repository
            .delete(id)
            .await?
            .ok_or(FunkoApiError::NotFound(id))?;
        self.cache.evict(id);
        crate::metrics::funko_deleted();
        info!("deleted funko with id {}", id);
        Ok(funko)
    }
}
