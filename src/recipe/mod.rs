//! Declarative shape recipes
//!
//! A [`Recipe`] is a versioned JSON document whose `root` is a tree of
//! [`RecipeNode`]s: three primitives, three boolean combinators and three
//! transforms. Documents are validated by [`schema`], measured by [`count`],
//! lowered to geometry by [`compile`], and the whole sequence is driven by
//! [`pipeline`].
//!
//! ```
//! use csg_recipe::recipe::Recipe;
//!
//! let recipe: Recipe = r#"{
//!     "version": 1,
//!     "root": {
//!         "type": "subtract",
//!         "children": [
//!             { "type": "cuboid", "size": [20, 20, 5] },
//!             { "type": "cylinder", "height": 10, "radius": 4 }
//!         ]
//!     }
//! }"#
//! .parse()
//! .unwrap();
//! assert_eq!(recipe.root.count_nodes(), 3);
//! ```

use crate::float_types::{CM, MM, METER, Real};
use crate::kernel::Vec3;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

pub mod compile;
pub mod count;
pub mod path;
pub mod pipeline;
pub mod schema;

pub use path::NodePath;

/// The only document version this crate understands.
pub const RECIPE_VERSION: u64 = 1;

/// One node of a recipe tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RecipeNode {
    Cuboid {
        size: Vec3,
        #[serde(skip_serializing_if = "Option::is_none")]
        center: Option<Vec3>,
    },
    Sphere {
        radius: Real,
        #[serde(skip_serializing_if = "Option::is_none")]
        center: Option<Vec3>,
        #[serde(skip_serializing_if = "Option::is_none")]
        segments: Option<u32>,
    },
    Cylinder {
        height: Real,
        radius: Real,
        #[serde(skip_serializing_if = "Option::is_none")]
        center: Option<Vec3>,
        #[serde(skip_serializing_if = "Option::is_none")]
        segments: Option<u32>,
    },
    Union {
        children: Vec<RecipeNode>,
    },
    /// First child minus each following child, in order
    Subtract {
        children: Vec<RecipeNode>,
    },
    Intersect {
        children: Vec<RecipeNode>,
    },
    Translate {
        offset: Vec3,
        child: Box<RecipeNode>,
    },
    /// `angles` are degrees about X, Y and Z
    Rotate {
        angles: Vec3,
        child: Box<RecipeNode>,
    },
    Scale {
        factors: Vec3,
        child: Box<RecipeNode>,
    },
}

impl RecipeNode {
    /// The `type` discriminant as written in JSON.
    pub const fn kind(&self) -> &'static str {
        match self {
            RecipeNode::Cuboid { .. } => "cuboid",
            RecipeNode::Sphere { .. } => "sphere",
            RecipeNode::Cylinder { .. } => "cylinder",
            RecipeNode::Union { .. } => "union",
            RecipeNode::Subtract { .. } => "subtract",
            RecipeNode::Intersect { .. } => "intersect",
            RecipeNode::Translate { .. } => "translate",
            RecipeNode::Rotate { .. } => "rotate",
            RecipeNode::Scale { .. } => "scale",
        }
    }

    /// Total number of nodes in this subtree, see [`count::count_nodes`].
    pub fn count_nodes(&self) -> usize {
        count::count_nodes(self)
    }

    pub fn translate(self, offset: Vec3) -> Self {
        RecipeNode::Translate { offset, child: Box::new(self) }
    }

    pub fn rotate(self, angles: Vec3) -> Self {
        RecipeNode::Rotate { angles, child: Box::new(self) }
    }

    pub fn scale(self, factors: Vec3) -> Self {
        RecipeNode::Scale { factors, child: Box::new(self) }
    }
}

/// Length unit of a recipe's coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Mm,
    Cm,
    M,
}

impl Units {
    pub const fn as_str(self) -> &'static str {
        match self {
            Units::Mm => "mm",
            Units::Cm => "cm",
            Units::M => "m",
        }
    }

    /// Millimeters in one of this unit.
    pub const fn millimeters(self) -> Real {
        match self {
            Units::Mm => MM,
            Units::Cm => CM,
            Units::M => METER,
        }
    }
}

impl FromStr for Units {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mm" => Ok(Units::Mm),
            "cm" => Ok(Units::Cm),
            "m" => Ok(Units::M),
            other => Err(other.to_string()),
        }
    }
}

/// A complete, validated recipe document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recipe {
    /// Always [`RECIPE_VERSION`]
    pub version: u64,
    pub units: Units,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub root: RecipeNode,
}

impl Recipe {
    /// A current-version recipe in millimeters.
    pub const fn new(root: RecipeNode) -> Self {
        Recipe {
            version: RECIPE_VERSION,
            units: Units::Mm,
            name: None,
            root,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub const fn with_units(mut self, units: Units) -> Self {
        self.units = units;
        self
    }
}

impl FromStr for Recipe {
    type Err = crate::errors::ValidationError;

    /// Parse and validate JSON text.
    fn from_str(json: &str) -> Result<Self, Self::Err> {
        schema::parse_recipe_str(json)
    }
}

impl<'de> Deserialize<'de> for Recipe {
    /// Deserialization goes through the same validator as every other input.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        schema::parse_recipe(&value).map_err(serde::de::Error::custom)
    }
}
