//! Error types for every stage of recipe compilation
//!
//! The three failure families never overlap: a document that does not match
//! the recipe grammar is a [`ValidationError`], a well-formed document that is
//! too large is a [`ComplexityError`], and a geometry kernel failure on an
//! otherwise valid node is a [`CompileError`]. [`RecipeError`] wraps whichever
//! one ended a pipeline run.

use crate::float_types::Real;
use crate::recipe::path::NodePath;

/// A recipe document that does not conform to the grammar.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid recipe at `{path}`: {kind}")]
pub struct ValidationError {
    /// Location of the first offending value
    pub path: NodePath,
    pub kind: ValidationErrorKind,
}

impl ValidationError {
    pub const fn new(path: NodePath, kind: ValidationErrorKind) -> Self {
        Self { path, kind }
    }
}

/// What exactly was wrong with the value at [`ValidationError::path`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationErrorKind {
    #[error("expected an object")]
    ExpectedObject,
    #[error("expected an array")]
    ExpectedArray,
    #[error("expected a number")]
    ExpectedNumber,
    #[error("expected a string")]
    ExpectedString,
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error(
        "unknown node type `{0}`, expected one of cuboid, sphere, cylinder, union, subtract, intersect, translate, rotate, scale"
    )]
    UnknownNodeType(String),
    #[error("expected exactly {expected} numbers, found {found}")]
    WrongArity { expected: usize, found: usize },
    #[error("must be greater than zero, got {0}")]
    NotPositive(Real),
    #[error("must be a positive integer, got {0}")]
    NotPositiveInteger(String),
    #[error("`children` must contain at least one node")]
    EmptyChildren,
    #[error("unsupported recipe version {0}, expected 1")]
    UnsupportedVersion(String),
    #[error("unknown units `{0}`, expected one of mm, cm, m")]
    UnknownUnits(String),
    #[error("malformed JSON: {0}")]
    Syntax(String),
    #[error("nesting exceeds {limit} node levels")]
    TooDeep { limit: usize },
}

/// A valid recipe that is too expensive to compile.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComplexityError {
    #[error("Recipe too complex: {count} nodes (max {limit})")]
    TooManyNodes { count: usize, limit: usize },
    #[error("`{path}` requests {segments} segments (max {limit})")]
    TooManySegments {
        path: NodePath,
        segments: u32,
        limit: u32,
    },
    #[error("Recipe nested too deeply: {depth} levels (max {limit})")]
    TooDeep { depth: usize, limit: usize },
}

/// Failures raised by a geometry kernel operation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KernelError {
    #[error("invalid {parameter}: {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },
    #[error("segments must be four or more, got {0}")]
    TooFewSegments(u32),
    #[error("{0} segments would tessellate into too many polygons")]
    TooManySegments(u32),
    #[error("transform matrix is not invertible (zero scale factor?)")]
    SingularTransform,
    #[error("transform produced a non-finite coordinate")]
    NonFinite,
    #[error("{0} needs at least one operand")]
    EmptyOperands(&'static str),
}

/// A kernel failure, tagged with the recipe node being compiled.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("failed to compile node at `{path}`: {source}")]
pub struct CompileError {
    pub path: NodePath,
    #[source]
    pub source: KernelError,
}

/// Whatever stopped a pipeline run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecipeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Complexity(#[from] ComplexityError),
    #[error(transparent)]
    Compile(#[from] CompileError),
}
