//! Compile declarative **JSON shape recipes** into solid meshes, built around
//! Boolean operations (*union*, *difference*, *intersection*) on sets of
//! polygons stored in [BSP](mesh::bsp) trees.
//!
//! A recipe is validated against a strict grammar, measured, refused when
//! it is too large, lowered node by node onto a [`GeometryKernel`], and
//! measured again for its bounding box:
//!
//! ```
//! use csg_recipe::compile_recipe_str;
//!
//! let result = compile_recipe_str(r#"{
//!     "version": 1,
//!     "name": "washer",
//!     "root": {
//!         "type": "subtract",
//!         "children": [
//!             { "type": "cylinder", "height": 2, "radius": 10 },
//!             { "type": "cylinder", "height": 4, "radius": 4 }
//!         ]
//!     }
//! }"#)?;
//! assert_eq!(result.node_count, 3);
//! let [mins, maxs] = result.bounding_box.to_array();
//! assert!((maxs[2] - mins[2] - 2.0).abs() < 1e-9);
//! # Ok::<(), csg_recipe::errors::RecipeError>(())
//! ```
//!
//! # Features
//! #### Default
//! - [**stl-io**](https://en.wikipedia.org/wiki/STL_(file_format)): binary `.stl` export
//!
//! #### Optional
//! - **parallel**: use rayon for per-polygon work inside the mesh kernel

#![forbid(unsafe_code)]
#![deny(unused)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod aabb;
pub mod errors;
pub mod float_types;
pub mod io;
pub mod kernel;
pub mod mesh;
pub mod recipe;
pub mod traits;
pub mod triangulated;

pub use aabb::BoundingBox;
pub use errors::{
    CompileError, ComplexityError, KernelError, RecipeError, ValidationError,
    ValidationErrorKind,
};
pub use io::{ExportEnvelope, ExportFormat, ExportedFile, export_geometry};
pub use kernel::{GeometryKernel, MeshKernel};
pub use mesh::Mesh;
pub use recipe::pipeline::{
    CompileOptions, CompiledResult, Pipeline, UnitPolicy, compile_recipe, compile_recipe_str,
};
pub use recipe::{NodePath, Recipe, RecipeNode, Units};
pub use traits::CSG;
