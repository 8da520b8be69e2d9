//! validate → count → guard → compile → measure
//!
//! [`Pipeline`] holds a kernel and a [`CompileOptions`] and nothing else, so
//! independent compile calls never share mutable state. Each stage runs only
//! when every earlier stage succeeded, which keeps oversized or malformed
//! input away from the kernel.

use crate::aabb::BoundingBox;
use crate::errors::{CompileError, ComplexityError, RecipeError};
use crate::kernel::{GeometryKernel, MeshKernel};
use crate::mesh::Mesh;
use crate::recipe::compile::Compiler;
use crate::recipe::count::{count_nodes, depth, max_segments};
use crate::recipe::path::NodePath;
use crate::recipe::{Recipe, schema};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

/// Default ceiling on [`count_nodes`] for a single recipe.
pub const MAX_NODES: usize = 500;

/// What the `units` field of a recipe does to the compiled geometry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum UnitPolicy {
    /// `units` is carried through as metadata; coordinates are used as written.
    #[default]
    Informational,
    /// The compiled root is scaled so that coordinates come out in millimeters.
    ScaleToMillimeters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Recipes with more nodes than this are refused before compilation.
    pub max_nodes: usize,
    /// Upper bound on any explicit `segments` value, off when `None`.
    pub max_segments: Option<u32>,
    pub units: UnitPolicy,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            max_nodes: MAX_NODES,
            max_segments: None,
            units: UnitPolicy::Informational,
        }
    }
}

/// Geometry plus the metrics measured while producing it.
#[derive(Debug, Clone)]
pub struct CompiledResult<G> {
    pub geometry: G,
    pub bounding_box: BoundingBox,
    pub node_count: usize,
}

/// The geometry-free part of a [`CompiledResult`], as reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileStats {
    pub node_count: usize,
    pub bounding_box: BoundingBox,
}

impl<G> CompiledResult<G> {
    pub const fn stats(&self) -> CompileStats {
        CompileStats {
            node_count: self.node_count,
            bounding_box: self.bounding_box,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Pipeline<K> {
    kernel: K,
    options: CompileOptions,
}

impl<K: GeometryKernel> Pipeline<K> {
    pub fn new(kernel: K) -> Self {
        Self { kernel, options: CompileOptions::default() }
    }

    pub fn with_options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    /// Validate an untyped JSON value, then compile it.
    pub fn compile_value(&self, input: &Value) -> Result<CompiledResult<K::Geometry>, RecipeError> {
        let recipe = schema::parse_recipe(input)?;
        self.compile(&recipe)
    }

    /// Parse and validate JSON text, then compile it.
    pub fn compile_str(&self, json: &str) -> Result<CompiledResult<K::Geometry>, RecipeError> {
        let recipe = schema::parse_recipe_str(json)?;
        self.compile(&recipe)
    }

    /// Compile an already validated recipe.
    ///
    /// Typed recipes built in code skip the schema, so out-of-range
    /// parameters reach the kernel and come back as [`CompileError`]s.
    /// Nesting is still held to [`schema::MAX_DEPTH`] before compiling.
    #[instrument(level = "debug", skip_all, fields(name = recipe.name.as_deref(), units = recipe.units.as_str()))]
    pub fn compile(&self, recipe: &Recipe) -> Result<CompiledResult<K::Geometry>, RecipeError> {
        let node_count = count_nodes(&recipe.root);
        debug!(node_count, limit = self.options.max_nodes, "counted nodes");
        if node_count > self.options.max_nodes {
            return Err(ComplexityError::TooManyNodes {
                count: node_count,
                limit: self.options.max_nodes,
            }
            .into());
        }

        let depth = depth(&recipe.root);
        if depth > schema::MAX_DEPTH {
            return Err(ComplexityError::TooDeep { depth, limit: schema::MAX_DEPTH }.into());
        }

        let root = NodePath::root();
        if let Some(limit) = self.options.max_segments {
            if let Some((path, segments)) = max_segments(&recipe.root, &root) {
                if segments > limit {
                    return Err(ComplexityError::TooManySegments { path, segments, limit }.into());
                }
            }
        }

        let mut geometry = Compiler::new(&self.kernel).compile_node(&recipe.root, &root)?;
        debug!("compiled root");

        let factor = recipe.units.millimeters();
        if self.options.units == UnitPolicy::ScaleToMillimeters && factor != 1.0 {
            debug!(factor, "scaling to millimeters");
            geometry = self
                .kernel
                .scale([factor; 3], geometry)
                .map_err(|source| CompileError { path: root.clone(), source })?;
        }

        let bounding_box = self
            .kernel
            .measure_bounding_box(&geometry)
            .map_err(|source| CompileError { path: root, source })?;
        debug!(bounding_box = ?bounding_box.to_array(), "measured bounding box");

        Ok(CompiledResult { geometry, bounding_box, node_count })
    }
}

/// Compile an untyped JSON value with [`MeshKernel`] and default options.
pub fn compile_recipe(input: &Value) -> Result<CompiledResult<Mesh>, RecipeError> {
    Pipeline::new(MeshKernel).compile_value(input)
}

/// Compile JSON text with [`MeshKernel`] and default options.
pub fn compile_recipe_str(json: &str) -> Result<CompiledResult<Mesh>, RecipeError> {
    Pipeline::new(MeshKernel).compile_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{KernelError, ValidationErrorKind};
    use crate::recipe::{RecipeNode, Units};
    use serde_json::json;

    fn cube() -> RecipeNode {
        RecipeNode::Cuboid { size: [2.0, 2.0, 2.0], center: None }
    }

    #[test]
    fn stops_at_validation() {
        let err = compile_recipe(&json!({ "version": 1, "root": { "type": "cube" } })).unwrap_err();
        let RecipeError::Validation(err) = err else {
            panic!("expected a validation error");
        };
        assert_eq!(err.kind, ValidationErrorKind::UnknownNodeType("cube".into()));
    }

    #[test]
    fn segment_guard_is_opt_in() {
        let recipe = Recipe::new(RecipeNode::Sphere {
            radius: 1.0,
            center: None,
            segments: Some(64),
        });
        assert!(Pipeline::new(MeshKernel).compile(&recipe).is_ok());

        let strict = Pipeline::new(MeshKernel).with_options(CompileOptions {
            max_segments: Some(48),
            ..CompileOptions::default()
        });
        let err = strict.compile(&recipe).unwrap_err();
        assert_eq!(
            err,
            RecipeError::Complexity(ComplexityError::TooManySegments {
                path: NodePath::root(),
                segments: 64,
                limit: 48,
            })
        );
    }

    #[test]
    fn units_are_informational_by_default() {
        let recipe = Recipe::new(cube()).with_units(Units::Cm);
        let result = Pipeline::new(MeshKernel).compile(&recipe).unwrap();
        assert_eq!(result.bounding_box.to_array(), [[-1.0, -1.0, -1.0], [1.0, 1.0, 1.0]]);
    }

    #[test]
    fn units_can_scale_to_millimeters() {
        let recipe = Recipe::new(cube()).with_units(Units::Cm);
        let pipeline = Pipeline::new(MeshKernel).with_options(CompileOptions {
            units: UnitPolicy::ScaleToMillimeters,
            ..CompileOptions::default()
        });
        let result = pipeline.compile(&recipe).unwrap();
        assert!(result.bounding_box.approx_eq(
            &BoundingBox::new([-10.0, -10.0, -10.0].into(), [10.0, 10.0, 10.0].into()),
            1e-9
        ));
    }

    #[test]
    fn kernel_failure_names_the_node() {
        let recipe = Recipe::new(RecipeNode::Union {
            children: vec![cube(), cube().scale([1.0, 0.0, 1.0])],
        });
        let err = Pipeline::new(MeshKernel).compile(&recipe).unwrap_err();
        let RecipeError::Compile(err) = err else {
            panic!("expected a compile error");
        };
        assert_eq!(err.path.to_string(), "$.root.children[1]");
        assert_eq!(err.source, KernelError::SingularTransform);
    }

    #[test]
    fn typed_recipes_are_held_to_the_depth_limit() {
        let mut node = cube();
        for _ in 1..schema::MAX_DEPTH {
            node = node.translate([1.0, 0.0, 0.0]);
        }
        let result = Pipeline::new(MeshKernel).compile(&Recipe::new(node.clone())).unwrap();
        assert_eq!(result.node_count, schema::MAX_DEPTH);

        let err = Pipeline::new(MeshKernel).compile(&Recipe::new(node.scale([2.0; 3]))).unwrap_err();
        assert_eq!(
            err,
            RecipeError::Complexity(ComplexityError::TooDeep {
                depth: schema::MAX_DEPTH + 1,
                limit: schema::MAX_DEPTH,
            })
        );
    }

    #[test]
    fn stats_serialize_camel_case() {
        let result = compile_recipe_str(
            r#"{ "version": 1, "root": { "type": "translate", "offset": [1, 0, 0], "child": { "type": "cuboid", "size": [2, 2, 2] } } }"#,
        )
        .unwrap();
        assert_eq!(
            serde_json::to_value(result.stats()).unwrap(),
            json!({ "nodeCount": 2, "boundingBox": [[0.0, -1.0, -1.0], [2.0, 1.0, 1.0]] })
        );
    }
}
