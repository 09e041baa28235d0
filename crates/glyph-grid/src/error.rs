// Copyright (c) 2023 the glyph-grid contributors.
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt;
use std::fmt::Formatter;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum AtlasError {
    /// The font resource could not be located, read or parsed.
    ResourceLoad(ResourceLoadError),
    /// The output could not be created, encoded or written.
    Io { path: PathBuf, message: String },
    /// A code point was queried outside of the grid.
    OutOfRange { code: u32, cells: u32 },
    /// The layout parameters do not tile the canvas.
    InvalidGrid(String),
}

#[derive(Debug, Clone)]
pub enum ResourceLoadError {
    NotFound(PathBuf),
    Unreadable { path: PathBuf, message: String },
    Unparsable { path: PathBuf, message: String },
    InvalidSize(f32),
    NoDefaultFont(Vec<PathBuf>),
}

impl fmt::Display for ResourceLoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ResourceLoadError::NotFound(path) => {
                write!(f, "font file not found: {}", path.display())
            }
            ResourceLoadError::Unreadable { path, message } => {
                write!(f, "failed to read font {}: {}", path.display(), message)
            }
            ResourceLoadError::Unparsable { path, message } => {
                write!(f, "failed to parse font {}: {}", path.display(), message)
            }
            ResourceLoadError::InvalidSize(size) => {
                write!(f, "invalid font size: {} (must be a positive number)", size)
            }
            ResourceLoadError::NoDefaultFont(candidates) => {
                write!(f, "no font configured and none of the default fonts exist (tried ")?;
                for (i, candidate) in candidates.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", candidate.display())?;
                }
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for AtlasError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AtlasError::ResourceLoad(err) => write!(f, "{}", err),
            AtlasError::Io { path, message } => {
                write!(f, "failed to write {}: {}", path.display(), message)
            }
            AtlasError::OutOfRange { code, cells } => {
                write!(f, "code point {} is outside of the grid (0..{})", code, cells)
            }
            AtlasError::InvalidGrid(reason) => write!(f, "invalid grid layout: {}", reason),
        }
    }
}

impl std::error::Error for ResourceLoadError {}

impl std::error::Error for AtlasError {}

impl From<ResourceLoadError> for AtlasError {
    fn from(err: ResourceLoadError) -> Self {
        AtlasError::ResourceLoad(err)
    }
}

impl AtlasError {
    pub(crate) fn io(path: impl Into<PathBuf>, err: impl fmt::Display) -> Self {
        AtlasError::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

pub type AtlasResult<T> = Result<T, AtlasError>;
