//! Domain Layer
//!
//! Layer classification and resolution rules, free of I/O.
//!
//! ## Structure
//!
//! - `entities/` - Entries, classification rules, exclusion sets, the build manifest
//! - `value_objects/` - Layers, environments, conditions, directives, matchers
//! - `services/` - Classifier, entry synthesizer, resolution override engine
//! - `ports/` - Module resolver and module source interfaces
//!
//! Everything that touches the file system goes through `ports/`.

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
