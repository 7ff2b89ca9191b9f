//! Handler discovery.
//!
//! Handlers are compiled in and registered by module name in a
//! [`HandlerRegistry`]. A handler directory then acts as a manifest: every entry
//! named `<module>_handler[.ext]` mounts the registered handler `<module>`.
//!
//! ```text
//! handlers/
//! ├── status_handler.json     # mounts "status" at its registered route
//! ├── sum_handler.json        # {"route": "/v2/sum.json"} overrides the route
//! └── mod.rs                  # ignored
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;

use crate::api::RouteHandler;
use crate::error::DiscoveryError;

/// Suffix marking an eligible directory entry.
pub const HANDLER_SUFFIX: &str = "_handler";

/// Initializer/index modules never mounted as handlers.
const EXCLUDED_MODULES: &[&str] = &["mod", "index", "__init__"];

/// Builds a fresh handler instance.
pub type HandlerFactory = Arc<dyn Fn() -> Arc<dyn RouteHandler> + Send + Sync>;

/// A route pattern plus the handler serving it.
#[derive(Clone)]
pub struct HandlerDescriptor {
    pub name: String,
    pub route: String,
    pub handler: Arc<dyn RouteHandler>,
}

impl fmt::Debug for HandlerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerDescriptor")
            .field("name", &self.name)
            .field("route", &self.route)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
struct Registration {
    route: String,
    factory: HandlerFactory,
}

/// Compiled-in mapping from module name to route and handler factory.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    entries: BTreeMap<String, Registration>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler under `name`, replacing any earlier registration.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::InvalidRoute`] if `route` is not a valid path
    /// pattern (see [`check_route`]).
    pub fn register<F, H>(
        &mut self,
        name: impl Into<String>,
        route: impl Into<String>,
        factory: F,
    ) -> Result<&mut Self, DiscoveryError>
    where
        F: Fn() -> H + Send + Sync + 'static,
        H: RouteHandler,
    {
        let name = name.into();
        let route = route.into();
        check_route(&name, &route)?;

        let factory: HandlerFactory =
            Arc::new(move || Arc::new(factory()) as Arc<dyn RouteHandler>);
        self.entries.insert(name, Registration { route, factory });
        Ok(self)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Instantiates every registered handler at its registered route, ordered
    /// by module name.
    pub fn descriptors(&self) -> Vec<HandlerDescriptor> {
        self.entries
            .keys()
            .filter_map(|name| self.instantiate(name, None))
            .collect()
    }

    fn instantiate(&self, name: &str, route: Option<String>) -> Option<HandlerDescriptor> {
        let registration = self.entries.get(name)?;
        Some(HandlerDescriptor {
            name: name.to_string(),
            route: route.unwrap_or_else(|| registration.route.clone()),
            handler: (registration.factory)(),
        })
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(name, r)| (name, &r.route)))
            .finish()
    }
}

/// Optional content of a `.json` manifest entry.
#[derive(Debug, Default, Deserialize)]
struct Manifest {
    route: Option<String>,
}

/// Scans `dir` and returns one descriptor per eligible, registered entry.
///
/// Entries whose module has no registration are logged and skipped. The result
/// is ordered by module name.
///
/// # Errors
///
/// - [`DiscoveryError::NotFound`] if `dir` does not exist
/// - [`DiscoveryError::NotADirectory`] if `dir` is a file
/// - [`DiscoveryError::Io`] if the directory cannot be read
/// - [`DiscoveryError::InvalidManifest`] if a `.json` entry is not valid JSON
/// - [`DiscoveryError::InvalidRoute`] if a manifest route is not a valid path pattern
pub fn discover(
    dir: impl AsRef<Path>,
    registry: &HandlerRegistry,
) -> Result<Vec<HandlerDescriptor>, DiscoveryError> {
    let dir = dir.as_ref();

    if !dir.exists() {
        return Err(DiscoveryError::NotFound(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(DiscoveryError::NotADirectory(dir.to_path_buf()));
    }

    let io_err = |source| DiscoveryError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut descriptors = Vec::new();

    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();

        let Some(name) = module_name(&path) else {
            continue;
        };

        if !registry.contains(&name) {
            tracing::warn!("No handler registered for {}, skipping", path.display());
            continue;
        }

        let route = read_manifest(&path)?.route;
        if let Some(route) = &route {
            check_route(&name, route)?;
        }

        if let Some(descriptor) = registry.instantiate(&name, route) {
            tracing::debug!(
                "Discovered handler '{}' at {}",
                descriptor.name,
                descriptor.route
            );
            descriptors.push(descriptor);
        }
    }

    descriptors.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(descriptors)
}

/// Registry key for an eligible entry, `None` for anything else.
fn module_name(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    if EXCLUDED_MODULES.contains(&stem) {
        return None;
    }

    let name = stem.strip_suffix(HANDLER_SUFFIX)?;
    if name.is_empty() || EXCLUDED_MODULES.contains(&name) {
        return None;
    }

    Some(name.to_string())
}

fn read_manifest(path: &Path) -> Result<Manifest, DiscoveryError> {
    let is_json = path.extension().is_some_and(|ext| ext == "json");
    if !is_json || !path.is_file() {
        return Ok(Manifest::default());
    }

    let content = fs::read_to_string(path).map_err(|source| DiscoveryError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if content.trim().is_empty() {
        return Ok(Manifest::default());
    }

    serde_json::from_str(&content).map_err(|source| DiscoveryError::InvalidManifest {
        path: PathBuf::from(path),
        source,
    })
}

/// Checks that `route` is a path pattern the router accepts.
///
/// A route starts with `/`. Captures use the `{name}` form, and a catch-all
/// `{*name}` may only close the route. Legacy `:name` / `*name` segments and
/// stray braces are rejected.
///
/// # Errors
///
/// Returns [`DiscoveryError::InvalidRoute`] naming the offending rule.
pub fn check_route(name: &str, route: &str) -> Result<(), DiscoveryError> {
    let invalid = |reason| DiscoveryError::InvalidRoute {
        name: name.to_string(),
        route: route.to_string(),
        reason,
    };

    let Some(path) = route.strip_prefix('/') else {
        return Err(invalid("must start with '/'"));
    };

    let segments: Vec<&str> = path.split('/').collect();
    for (index, segment) in segments.iter().enumerate() {
        if segment.starts_with(':') || segment.starts_with('*') {
            return Err(invalid("captures must use the {name} form"));
        }
        if !segment.contains(['{', '}']) {
            continue;
        }

        let capture = segment
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
            .ok_or_else(|| invalid("a capture must span a whole segment"))?;

        let ident = match capture.strip_prefix('*') {
            Some(_) if index + 1 != segments.len() => {
                return Err(invalid("a catch-all capture must be the last segment"));
            }
            Some(ident) => ident,
            None => capture,
        };

        if ident.is_empty() || ident.contains(['{', '}', '*']) {
            return Err(invalid("malformed capture name"));
        }
    }

    Ok(())
}
