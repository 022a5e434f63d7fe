// Copyright 2025 eraflo
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

//! # Menhir Core
//!
//! Transform and camera mathematics for the Menhir engine: cached model,
//! view, and projection matrices with the vector/quaternion/matrix types
//! they are built from.
//!
//! Everything in this crate is plain, single-threaded computation. Renderer
//! and gameplay collaborators read matrices out of [`scene::Transform`] and
//! [`scene::Camera`]; nothing here touches the GPU, the window, or the disk.

#![warn(missing_docs)]

pub mod math;
pub mod scene;

pub use scene::{Camera, ProjectionType, Transform};
