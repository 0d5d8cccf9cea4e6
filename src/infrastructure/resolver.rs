//! Node-style module resolver
//!
//! Implements the `ModuleResolver` port against the local file system:
//! relative and absolute specifiers with extension and index probing, bare
//! specifiers through a `node_modules` walk-up, and package `exports` maps
//! evaluated in condition-set order.

use std::fs;
use std::path::{Component, Path, PathBuf};

use serde_json::Value;
use tracing::trace;

use crate::domain::ports::ModuleResolver;
use crate::domain::value_objects::{ConditionSet, ModuleId};

/// Extensions probed for extensionless specifiers, in order.
pub const DEFAULT_EXTENSIONS: &[&str] = &["tsx", "ts", "jsx", "js", "mjs", "cjs", "json"];

#[derive(Debug, Clone)]
pub struct NodeResolver {
    extensions: Vec<String>,
}

impl Default for NodeResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeResolver {
    pub fn new() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    fn resolve_file_or_dir(&self, base: &Path, conditions: &ConditionSet) -> Option<PathBuf> {
        self.resolve_file(base)
            .or_else(|| self.resolve_directory(base, conditions))
    }

    fn resolve_file(&self, base: &Path) -> Option<PathBuf> {
        if base.is_file() {
            return Some(base.to_path_buf());
        }
        let file_name = base.file_name()?.to_str()?;
        self.extensions
            .iter()
            .map(|ext| base.with_file_name(format!("{}.{}", file_name, ext)))
            .find(|candidate| candidate.is_file())
    }

    fn resolve_directory(&self, dir: &Path, conditions: &ConditionSet) -> Option<PathBuf> {
        if !dir.is_dir() {
            return None;
        }
        if let Some(manifest) = read_package_json(dir) {
            if let Some(found) = self.resolve_main(dir, &manifest, conditions) {
                return Some(found);
            }
        }
        self.resolve_file(&dir.join("index"))
    }

    /// `main`-style fields; `browser` only when the conditions ask for it.
    fn resolve_main(
        &self,
        dir: &Path,
        manifest: &Value,
        conditions: &ConditionSet,
    ) -> Option<PathBuf> {
        let mut fields = Vec::new();
        if conditions.contains("browser") {
            fields.push("browser");
        }
        fields.extend(["module", "main"]);

        fields
            .into_iter()
            .filter_map(|field| manifest.get(field).and_then(Value::as_str))
            .find_map(|target| self.resolve_file(&normalize(&dir.join(target))))
    }

    fn resolve_bare(
        &self,
        from_dir: &Path,
        specifier: &str,
        conditions: &ConditionSet,
    ) -> Option<PathBuf> {
        let (name, subpath) = split_package_specifier(specifier)?;

        for ancestor in from_dir.ancestors() {
            let package_dir = ancestor.join("node_modules").join(name);
            if !package_dir.is_dir() {
                continue;
            }

            let manifest = read_package_json(&package_dir);
            if let Some(exports) = manifest.as_ref().and_then(|m| m.get("exports")) {
                let request = match subpath {
                    Some(sub) => format!("./{}", sub),
                    None => ".".to_string(),
                };
                // An exports map is authoritative for its package.
                let target = resolve_exports(exports, &request, conditions)?;
                let path = normalize(&package_dir.join(target));
                trace!(specifier, path = %path.display(), "resolved through exports");
                return path.is_file().then_some(path);
            }

            return match subpath {
                Some(sub) => self.resolve_file_or_dir(&package_dir.join(sub), conditions),
                None => self.resolve_directory(&package_dir, conditions),
            };
        }
        None
    }
}

impl ModuleResolver for NodeResolver {
    fn resolve(
        &self,
        from_dir: &Path,
        specifier: &str,
        conditions: &ConditionSet,
    ) -> Option<ModuleId> {
        let path = Path::new(specifier);
        let found = if path.is_absolute() {
            self.resolve_file_or_dir(path, conditions)
        } else if specifier.starts_with("./")
            || specifier.starts_with("../")
            || specifier == "."
            || specifier == ".."
        {
            self.resolve_file_or_dir(&normalize(&from_dir.join(specifier)), conditions)
        } else {
            self.resolve_bare(from_dir, specifier, conditions)
        }?;

        let canonical = fs::canonicalize(&found).unwrap_or(found);
        Some(ModuleId::new(canonical))
    }
}

fn read_package_json(dir: &Path) -> Option<Value> {
    let content = fs::read_to_string(dir.join("package.json")).ok()?;
    serde_json::from_str(&content).ok()
}

/// Split `@scope/name/sub/path` into (`@scope/name`, `sub/path`).
fn split_package_specifier(specifier: &str) -> Option<(&str, Option<&str>)> {
    if specifier.is_empty() {
        return None;
    }
    let name_end = if specifier.starts_with('@') {
        let scope_end = specifier.find('/')?;
        specifier[scope_end + 1..]
            .find('/')
            .map(|i| scope_end + 1 + i)
            .unwrap_or(specifier.len())
    } else {
        specifier.find('/').unwrap_or(specifier.len())
    };

    let name = &specifier[..name_end];
    let subpath = specifier
        .get(name_end + 1..)
        .filter(|sub| !sub.is_empty());
    Some((name, subpath))
}

/// Resolve `request` (`.` or `./sub`) against a package `exports` field.
///
/// Condition objects are evaluated in the order of `conditions`, not in
/// key order, so layer tokens win over the defaults.
pub fn resolve_exports(
    exports: &Value,
    request: &str,
    conditions: &ConditionSet,
) -> Option<String> {
    let is_subpath_map = exports
        .as_object()
        .map(|map| map.keys().any(|key| key.starts_with('.')))
        .unwrap_or(false);

    if !is_subpath_map {
        return (request == ".")
            .then(|| resolve_target(exports, conditions, None))
            .flatten();
    }

    let map = exports.as_object()?;
    if let Some(target) = map.get(request) {
        return resolve_target(target, conditions, None);
    }

    // Longest matching `*` pattern wins.
    let (key, star) = map
        .keys()
        .filter_map(|key| {
            let (prefix, suffix) = key.split_once('*')?;
            let middle = request.strip_prefix(prefix)?.strip_suffix(suffix)?;
            Some((key, middle))
        })
        .max_by_key(|(key, _)| key.len())?;
    resolve_target(&map[key.as_str()], conditions, Some(star))
}

fn resolve_target(target: &Value, conditions: &ConditionSet, star: Option<&str>) -> Option<String> {
    match target {
        Value::String(path) => {
            if !path.starts_with("./") {
                return None;
            }
            Some(match star {
                Some(star) => path.replace('*', star),
                None => path.clone(),
            })
        }
        Value::Array(candidates) => candidates
            .iter()
            .find_map(|candidate| resolve_target(candidate, conditions, star)),
        Value::Object(map) => conditions
            .iter()
            .filter_map(|condition| map.get(condition))
            .find_map(|nested| resolve_target(nested, conditions, star)),
        _ => None,
    }
}

/// Lexically normalize `.` and `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}
