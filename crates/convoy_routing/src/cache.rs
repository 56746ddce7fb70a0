use std::{
    hash::{Hash, Hasher},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use fxhash::FxHasher64;
use tracing::{debug, warn};

use crate::{
    directions_error::DirectionsError,
    directions_service::{DirectionsRequest, DirectionsService},
    route::RouteCandidate,
};

pub const CACHE_FOLDER_ENV_VAR: &str = "CONVOY_CACHE_FOLDER";

/// Storage for directions answers, keyed by request.
pub trait DirectionsCache {
    fn get(&self, request: &DirectionsRequest) -> Result<Option<Vec<RouteCandidate>>, anyhow::Error>;

    fn put(
        &self,
        request: &DirectionsRequest,
        candidates: &[RouteCandidate],
    ) -> Result<(), anyhow::Error>;
}

fn get_filename(request: &DirectionsRequest) -> String {
    let mut hasher = FxHasher64::default();
    request.hash(&mut hasher);

    format!("{:016x}.json", hasher.finish())
}

/// One JSON file per request in a folder.
pub struct FileCache {
    folder: PathBuf,
}

impl FileCache {
    pub fn new(folder: impl Into<PathBuf>) -> Result<Self, anyhow::Error> {
        let folder = folder.into();

        if !folder.is_dir() {
            return Err(anyhow::anyhow!(
                "Path {} is not a directory",
                folder.display()
            ));
        }

        Ok(Self { folder })
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let folder = std::env::var(CACHE_FOLDER_ENV_VAR)?;
        Self::new(folder)
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    fn path_for(&self, request: &DirectionsRequest) -> PathBuf {
        self.folder.join(get_filename(request))
    }
}

impl DirectionsCache for FileCache {
    fn get(&self, request: &DirectionsRequest) -> Result<Option<Vec<RouteCandidate>>, anyhow::Error> {
        let file_path = self.path_for(request);

        if !file_path.is_file() {
            return Ok(None);
        }

        let file = std::fs::File::open(file_path)?;
        let candidates: Vec<RouteCandidate> = serde_json::from_reader(file)?;

        Ok(Some(candidates))
    }

    fn put(
        &self,
        request: &DirectionsRequest,
        candidates: &[RouteCandidate],
    ) -> Result<(), anyhow::Error> {
        let file = std::fs::File::create(self.path_for(request))?;
        let mut writer = BufWriter::with_capacity(64 * 1024, file);
        serde_json::to_writer(&mut writer, candidates)?;
        writer.flush()?;

        Ok(())
    }
}

/// Serves directions from a cache first and stores non-empty answers of the
/// wrapped service.
pub struct CachedDirections<S, C> {
    inner: S,
    cache: C,
}

impl<S, C> CachedDirections<S, C> {
    pub fn new(inner: S, cache: C) -> Self {
        Self { inner, cache }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }
}

impl<S, C> DirectionsService for CachedDirections<S, C>
where
    S: DirectionsService + Sync,
    C: DirectionsCache + Sync,
{
    async fn directions(
        &self,
        request: &DirectionsRequest,
    ) -> Result<Vec<RouteCandidate>, DirectionsError> {
        match self.cache.get(request) {
            Ok(Some(candidates)) if !candidates.is_empty() => {
                debug!(
                    "Cache: hit for {} points ({} routes)",
                    request.coordinates.len(),
                    candidates.len()
                );
                return Ok(candidates);
            }
            Ok(_) => {}
            Err(e) => warn!("Cache: failed to read directions: {}", e),
        }

        let candidates = self.inner.directions(request).await?;

        if !candidates.is_empty() {
            if let Err(e) = self.cache.put(request, &candidates) {
                warn!("Cache: failed to store directions: {}", e);
            }
        }

        Ok(candidates)
    }
}
