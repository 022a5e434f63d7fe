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

//! Scene-level components built on the math layer.
//!
//! [`Transform`] carries an object's local-to-world transform with a lazily
//! recomputed model matrix; [`Camera`] owns a `Transform` plus projection
//! parameters and serves cached view/projection matrices. Both are meant to
//! be owned and mutated by exactly one logical owner per frame; the cache
//! cells make them `!Sync` on purpose.

mod camera;
mod transform;

pub use camera::{Camera, ProjectionType};
pub use transform::Transform;
