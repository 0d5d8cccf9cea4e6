//! File-system module source
//!
//! Reads a module from disk and extracts its directive prologue and import
//! specifiers. Only script modules are scanned; stylesheets and other assets
//! are leaves.

use std::fs;
use std::io::ErrorKind;
use std::sync::OnceLock;

use regex::Regex;

use crate::domain::ports::{ModuleSource, SourceError, SourceModule};
use crate::domain::value_objects::{scan_prologue, ModuleId};

/// Extensions whose contents are scanned for directives and imports.
pub const SCRIPT_EXTENSIONS: &[&str] = &["tsx", "ts", "jsx", "js", "mjs", "cjs", "mts", "cts"];

#[derive(Debug, Clone, Copy, Default)]
pub struct FsModuleSource;

impl FsModuleSource {
    pub fn new() -> Self {
        Self
    }
}

impl ModuleSource for FsModuleSource {
    fn load(&self, module: &ModuleId) -> Result<SourceModule, SourceError> {
        let path = module.as_path();
        let is_script = module
            .extension()
            .map(|ext| SCRIPT_EXTENSIONS.contains(&ext))
            .unwrap_or(false);

        if !is_script {
            if !path.exists() {
                return Err(SourceError::NotFound {
                    path: path.to_path_buf(),
                });
            }
            return Ok(SourceModule::default());
        }

        let content = fs::read_to_string(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => SourceError::NotFound {
                path: path.to_path_buf(),
            },
            _ => SourceError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;

        Ok(parse_module(&content))
    }
}

/// Directive prologue plus import specifiers, in source order.
pub fn parse_module(content: &str) -> SourceModule {
    let prologue = scan_prologue(content);
    SourceModule {
        directives: prologue.directives,
        unrecognized: prologue.unrecognized,
        imports: scan_imports(content),
    }
}

fn static_import_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // import x from "a" | import "a" | export * from "a" | export { b } from "a"
        Regex::new(
            r#"(?m)^[ \t]*(?:import|export)\s+(type\s+)?(?:[\w*{}\s,$]+?\s+from\s+)?["']([^"'\n]+)["']"#,
        )
        .expect("static import pattern is valid")
    })
}

fn call_import_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"\b(?:import|require)\(\s*["']([^"'\n]+)["']\s*\)"#)
            .expect("call import pattern is valid")
    })
}

/// Collect import specifiers, skipping type-only imports.
pub fn scan_imports(content: &str) -> Vec<String> {
    let mut found: Vec<(usize, String)> = Vec::new();

    for captures in static_import_pattern().captures_iter(content) {
        if captures.get(1).is_some() {
            continue;
        }
        if let Some(specifier) = captures.get(2) {
            found.push((specifier.start(), specifier.as_str().to_string()));
        }
    }
    for captures in call_import_pattern().captures_iter(content) {
        if let Some(specifier) = captures.get(1) {
            found.push((specifier.start(), specifier.as_str().to_string()));
        }
    }

    found.sort_by_key(|(offset, _)| *offset);
    let mut imports: Vec<String> = Vec::with_capacity(found.len());
    for (_, specifier) in found {
        if !imports.contains(&specifier) {
            imports.push(specifier);
        }
    }
    imports
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Directive;
    use tempfile::tempdir;

    #[test]
    fn scans_static_dynamic_and_reexports() {
        let source = r#""use client";
import React, { useState } from "react";
import type { Todo } from "./types";
import "./styles.css";
import {
  a,
  b,
} from './multi';
export * from "./reexport";
const lazy = () => import("./Lazy");
"#;
        let module = parse_module(source);
        assert_eq!(module.directives, vec![Directive::Client]);
        assert_eq!(
            module.imports,
            vec!["react", "./styles.css", "./multi", "./reexport", "./Lazy"]
        );
    }

    #[test]
    fn ignores_exports_without_source() {
        let imports = scan_imports("export const label = 'x';\nexport default function A() {}\n");
        assert!(imports.is_empty());
    }

    #[test]
    fn stylesheet_is_a_leaf() {
        let dir = tempdir().unwrap();
        let css = dir.path().join("index.css");
        fs::write(&css, "@import './other.css';").unwrap();

        let module = FsModuleSource::new().load(&ModuleId::new(&css)).unwrap();
        assert!(module.imports.is_empty());
    }

    #[test]
    fn missing_module_is_not_found() {
        let dir = tempdir().unwrap();
        let err = FsModuleSource::new()
            .load(&ModuleId::new(dir.path().join("gone.tsx")))
            .unwrap_err();
        assert!(matches!(err, SourceError::NotFound { .. }));
    }
}
