// Copyright (C) 2026  winnyboy5
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Logging setup shared by the lfsfetch crates.
//!
//! Library crates only emit `tracing` events; the binary decides where they
//! go by calling [`init_tracing`] once at startup.
//!
//! ```no_run
//! use lfsfetch_observability::{init_tracing_with_config, LogConfig, LogFormat};
//!
//! let config = LogConfig::new().with_format(LogFormat::Json).with_level("debug");
//! init_tracing_with_config(&config).unwrap();
//! ```

pub mod config;
pub mod initialization;

pub use config::{LogConfig, LogError, LogFormat, LogOutput, DEFAULT_LEVEL, LOG_ENV_VAR};
pub use initialization::{init_tracing, init_tracing_with_config};
