// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Sequence sources: the restartable character streams scanned by every pass.

use std::fs;
use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::path::Path;
use std::path::PathBuf;

use crate::error::Error;

/// A sequence input that can be read from the beginning any number of times.
pub trait SequenceSource {
    /// Opens a fresh pass over the source.
    fn open(&self) -> Result<Box<dyn BufRead + '_>, Error>;

    /// Returns the size of the source in bytes, used to plan bins.
    fn estimated_len(&self) -> Result<u64, Error>;
}

/// A sequence file on disk, re-opened for every pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaFile {
    path: PathBuf,
}

impl FastaFile {
    /// Creates a source reading `path`. The file is not touched until the first pass.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SequenceSource for FastaFile {
    fn open(&self) -> Result<Box<dyn BufRead + '_>, Error> {
        let file = File::open(&self.path).map_err(|err| {
            Error::io(format!("failed to open {}", self.path.display())).with_source(err)
        })?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn estimated_len(&self) -> Result<u64, Error> {
        let metadata = fs::metadata(&self.path).map_err(|err| {
            Error::io(format!("failed to stat {}", self.path.display())).with_source(err)
        })?;
        Ok(metadata.len())
    }
}

/// Sequence data held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySource<T> {
    data: T,
}

impl<T: AsRef<[u8]>> MemorySource<T> {
    /// Wraps `data`, for example a `&str`, `String` or `Vec<u8>`.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

impl<T: AsRef<[u8]>> SequenceSource for MemorySource<T> {
    fn open(&self) -> Result<Box<dyn BufRead + '_>, Error> {
        Ok(Box::new(self.data.as_ref()))
    }

    fn estimated_len(&self) -> Result<u64, Error> {
        Ok(self.data.as_ref().len() as u64)
    }
}
