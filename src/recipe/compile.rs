//! Lowering a validated recipe tree onto a [`GeometryKernel`]

use crate::errors::{CompileError, KernelError};
use crate::float_types::DEG_TO_RAD;
use crate::kernel::{GeometryKernel, Vec3};
use crate::recipe::RecipeNode;
use crate::recipe::path::NodePath;

/// Walks a [`RecipeNode`] tree depth-first and issues one kernel call per node.
///
/// Children are compiled before their parent and in document order. The
/// first kernel failure aborts the walk and is reported with the path of the
/// node whose own call failed.
#[derive(Debug, Clone, Copy)]
pub struct Compiler<'k, K> {
    kernel: &'k K,
}

impl<'k, K: GeometryKernel> Compiler<'k, K> {
    pub const fn new(kernel: &'k K) -> Self {
        Self { kernel }
    }

    /// Compile the subtree rooted at `node`, which lives at `path`.
    pub fn compile_node(
        &self,
        node: &RecipeNode,
        path: &NodePath,
    ) -> Result<K::Geometry, CompileError> {
        tracing::trace!(%path, kind = node.kind(), "compiling node");
        let kernel = self.kernel;
        let at = |source: KernelError| CompileError { path: path.clone(), source };

        match node {
            RecipeNode::Cuboid { size, center } => kernel.cuboid(*size, *center).map_err(at),
            RecipeNode::Sphere { radius, center, segments } => {
                kernel.sphere(*radius, *center, *segments).map_err(at)
            },
            RecipeNode::Cylinder { height, radius, center, segments } => {
                kernel.cylinder(*height, *radius, *center, *segments).map_err(at)
            },
            RecipeNode::Union { children } => {
                let operands = self.compile_children(children, path)?;
                kernel.union_all(operands).map_err(at)
            },
            RecipeNode::Subtract { children } => {
                let operands = self.compile_children(children, path)?;
                kernel.subtract_chain(operands).map_err(at)
            },
            RecipeNode::Intersect { children } => {
                let operands = self.compile_children(children, path)?;
                kernel.intersect_all(operands).map_err(at)
            },
            RecipeNode::Translate { offset, child } => {
                let geometry = self.compile_node(child, &path.key("child"))?;
                kernel.translate(*offset, geometry).map_err(at)
            },
            RecipeNode::Rotate { angles, child } => {
                let geometry = self.compile_node(child, &path.key("child"))?;
                kernel.rotate(degrees_to_radians(*angles), geometry).map_err(at)
            },
            RecipeNode::Scale { factors, child } => {
                let geometry = self.compile_node(child, &path.key("child"))?;
                kernel.scale(*factors, geometry).map_err(at)
            },
        }
    }

    fn compile_children(
        &self,
        children: &[RecipeNode],
        path: &NodePath,
    ) -> Result<Vec<K::Geometry>, CompileError> {
        let children_path = path.key("children");
        children
            .iter()
            .enumerate()
            .map(|(i, child)| self.compile_node(child, &children_path.index(i)))
            .collect()
    }
}

fn degrees_to_radians([x, y, z]: Vec3) -> Vec3 {
    [x * DEG_TO_RAD, y * DEG_TO_RAD, z * DEG_TO_RAD]
}
