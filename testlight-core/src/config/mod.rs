// Copyright (c) The testlight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration supplied by the editor host.
//!
//! Settings arrive as a JSON document in the host's own key convention;
//! nothing here persists them. The framework version check is a first pass
//! over the framework's package metadata, done once per session.

mod framework_version;
mod settings;

pub use framework_version::*;
pub use settings::*;
