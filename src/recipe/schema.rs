//! Recursive-descent validation of untyped JSON into a typed [`Recipe`]
//!
//! The validator stops at the first mismatch and reports it with the path of
//! the offending value. Keys that the grammar does not mention are ignored.
//! Optional fields may be omitted but never `null`.

use crate::errors::{ValidationError, ValidationErrorKind};
use crate::float_types::Real;
use crate::kernel::Vec3;
use crate::recipe::path::NodePath;
use crate::recipe::{RECIPE_VERSION, Recipe, RecipeNode, Units};
use serde_json::{Map, Value};

/// Deepest node nesting accepted, counting the root as level one.
///
/// Validation and compilation both recurse once per level, so this also
/// bounds their stack use.
pub const MAX_DEPTH: usize = 60;

/// Bracket nesting allowed in JSON text: an object and a `children` array per
/// level, plus the document and one vector. Stays below `serde_json`'s own
/// recursion limit so deep text reports [`ValidationErrorKind::TooDeep`].
const MAX_TEXT_NESTING: usize = 2 * MAX_DEPTH + 2;

type Result<T> = std::result::Result<T, ValidationError>;

fn fail<T>(path: &NodePath, kind: ValidationErrorKind) -> Result<T> {
    Err(ValidationError::new(path.clone(), kind))
}

/// Parse JSON text, then validate it.
pub fn parse_recipe_str(json: &str) -> Result<Recipe> {
    if bracket_depth(json) > MAX_TEXT_NESTING {
        return fail(&NodePath::document(), ValidationErrorKind::TooDeep { limit: MAX_DEPTH });
    }
    let value: Value = serde_json::from_str(json).map_err(|e| {
        ValidationError::new(NodePath::document(), ValidationErrorKind::Syntax(e.to_string()))
    })?;
    parse_recipe(&value)
}

/// Deepest `{`/`[` nesting in `json`, ignoring brackets inside strings.
fn bracket_depth(json: &str) -> usize {
    let (mut depth, mut deepest) = (0usize, 0usize);
    let (mut in_string, mut escaped) = (false, false);
    for byte in json.bytes() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {},
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                deepest = deepest.max(depth);
            },
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {},
        }
    }
    deepest
}

/// Validate a whole recipe document.
pub fn parse_recipe(value: &Value) -> Result<Recipe> {
    let doc = NodePath::document();
    let obj = expect_object(value, &doc)?;

    let version_path = doc.key("version");
    let version = required(obj, "version", &doc)?;
    let is_current = version.as_u64() == Some(RECIPE_VERSION)
        || version.as_f64() == Some(RECIPE_VERSION as Real);
    if !is_current {
        return fail(&version_path, ValidationErrorKind::UnsupportedVersion(version.to_string()));
    }

    let units = match obj.get("units") {
        None => Units::default(),
        Some(value) => {
            let path = doc.key("units");
            let text = expect_str(value, &path)?;
            match text.parse() {
                Ok(units) => units,
                Err(unknown) => return fail(&path, ValidationErrorKind::UnknownUnits(unknown)),
            }
        },
    };

    let name = match obj.get("name") {
        None => None,
        Some(value) => Some(expect_str(value, &doc.key("name"))?.to_string()),
    };

    let root = parse_node(required(obj, "root", &doc)?, &NodePath::root())?;

    Ok(Recipe {
        version: RECIPE_VERSION,
        units,
        name,
        root,
    })
}

/// Validate a single node (and its subtree) located at `path`.
pub fn parse_node(value: &Value, path: &NodePath) -> Result<RecipeNode> {
    parse_node_at_depth(value, path, 1)
}

fn parse_node_at_depth(value: &Value, path: &NodePath, depth: usize) -> Result<RecipeNode> {
    if depth > MAX_DEPTH {
        return fail(path, ValidationErrorKind::TooDeep { limit: MAX_DEPTH });
    }
    let obj = expect_object(value, path)?;
    let kind = expect_str(required(obj, "type", path)?, &path.key("type"))?;

    let node = match kind {
        "cuboid" => RecipeNode::Cuboid {
            size: field_vec3(obj, "size", path)?,
            center: optional_vec3(obj, "center", path)?,
        },
        "sphere" => RecipeNode::Sphere {
            radius: field_positive(obj, "radius", path)?,
            center: optional_vec3(obj, "center", path)?,
            segments: optional_segments(obj, path)?,
        },
        "cylinder" => RecipeNode::Cylinder {
            height: field_positive(obj, "height", path)?,
            radius: field_positive(obj, "radius", path)?,
            center: optional_vec3(obj, "center", path)?,
            segments: optional_segments(obj, path)?,
        },
        "union" => RecipeNode::Union {
            children: field_children(obj, path, depth)?,
        },
        "subtract" => RecipeNode::Subtract {
            children: field_children(obj, path, depth)?,
        },
        "intersect" => RecipeNode::Intersect {
            children: field_children(obj, path, depth)?,
        },
        "translate" => RecipeNode::Translate {
            offset: field_vec3(obj, "offset", path)?,
            child: field_child(obj, path, depth)?,
        },
        "rotate" => RecipeNode::Rotate {
            angles: field_vec3(obj, "angles", path)?,
            child: field_child(obj, path, depth)?,
        },
        "scale" => RecipeNode::Scale {
            factors: field_vec3(obj, "factors", path)?,
            child: field_child(obj, path, depth)?,
        },
        other => {
            return fail(
                &path.key("type"),
                ValidationErrorKind::UnknownNodeType(other.to_string()),
            );
        },
    };
    Ok(node)
}

fn expect_object<'a>(value: &'a Value, path: &NodePath) -> Result<&'a Map<String, Value>> {
    match value.as_object() {
        Some(obj) => Ok(obj),
        None => fail(path, ValidationErrorKind::ExpectedObject),
    }
}

fn expect_str<'a>(value: &'a Value, path: &NodePath) -> Result<&'a str> {
    match value.as_str() {
        Some(s) => Ok(s),
        None => fail(path, ValidationErrorKind::ExpectedString),
    }
}

fn expect_number(value: &Value, path: &NodePath) -> Result<Real> {
    match value.as_f64() {
        Some(n) if n.is_finite() => Ok(n),
        _ => fail(path, ValidationErrorKind::ExpectedNumber),
    }
}

fn required<'a>(
    obj: &'a Map<String, Value>,
    key: &'static str,
    path: &NodePath,
) -> Result<&'a Value> {
    match obj.get(key) {
        Some(value) => Ok(value),
        None => fail(&path.key(key), ValidationErrorKind::MissingField(key)),
    }
}

fn vec3(value: &Value, path: &NodePath) -> Result<Vec3> {
    let Some(items) = value.as_array() else {
        return fail(path, ValidationErrorKind::ExpectedArray);
    };
    if items.len() != 3 {
        return fail(
            path,
            ValidationErrorKind::WrongArity { expected: 3, found: items.len() },
        );
    }
    Ok([
        expect_number(&items[0], &path.index(0))?,
        expect_number(&items[1], &path.index(1))?,
        expect_number(&items[2], &path.index(2))?,
    ])
}

fn field_vec3(obj: &Map<String, Value>, key: &'static str, path: &NodePath) -> Result<Vec3> {
    vec3(required(obj, key, path)?, &path.key(key))
}

fn optional_vec3(
    obj: &Map<String, Value>,
    key: &'static str,
    path: &NodePath,
) -> Result<Option<Vec3>> {
    obj.get(key).map(|value| vec3(value, &path.key(key))).transpose()
}

fn field_positive(obj: &Map<String, Value>, key: &'static str, path: &NodePath) -> Result<Real> {
    let field_path = path.key(key);
    let n = expect_number(required(obj, key, path)?, &field_path)?;
    if n > 0.0 {
        Ok(n)
    } else {
        fail(&field_path, ValidationErrorKind::NotPositive(n))
    }
}

fn optional_segments(obj: &Map<String, Value>, path: &NodePath) -> Result<Option<u32>> {
    let Some(value) = obj.get("segments") else {
        return Ok(None);
    };
    let field_path = path.key("segments");
    let n = expect_number(value, &field_path)?;
    if n.fract() != 0.0 || n <= 0.0 || n > u32::MAX as Real {
        return fail(&field_path, ValidationErrorKind::NotPositiveInteger(value.to_string()));
    }
    Ok(Some(n as u32))
}

fn field_children(
    obj: &Map<String, Value>,
    path: &NodePath,
    depth: usize,
) -> Result<Vec<RecipeNode>> {
    let children_path = path.key("children");
    let Some(items) = required(obj, "children", path)?.as_array() else {
        return fail(&children_path, ValidationErrorKind::ExpectedArray);
    };
    if items.is_empty() {
        return fail(&children_path, ValidationErrorKind::EmptyChildren);
    }
    items
        .iter()
        .enumerate()
        .map(|(i, item)| parse_node_at_depth(item, &children_path.index(i), depth + 1))
        .collect()
}

fn field_child(
    obj: &Map<String, Value>,
    path: &NodePath,
    depth: usize,
) -> Result<Box<RecipeNode>> {
    let child = required(obj, "child", path)?;
    parse_node_at_depth(child, &path.key("child"), depth + 1).map(Box::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn kind_of(value: Value) -> (String, ValidationErrorKind) {
        let err = parse_recipe(&value).unwrap_err();
        (err.path.to_string(), err.kind)
    }

    #[test]
    fn accepts_every_node_kind() {
        let recipe = parse_recipe(&json!({
            "version": 1,
            "units": "cm",
            "name": "bracket",
            "root": {
                "type": "union",
                "children": [
                    { "type": "cuboid", "size": [1, 2, 3], "center": [0, 0, 1.5] },
                    { "type": "sphere", "radius": 2, "segments": 12 },
                    { "type": "cylinder", "height": 4, "radius": 1 },
                    { "type": "subtract", "children": [{ "type": "cuboid", "size": [1, 1, 1] }] },
                    { "type": "intersect", "children": [{ "type": "cuboid", "size": [1, 1, 1] }] },
                    { "type": "translate", "offset": [1, 0, 0], "child": { "type": "cuboid", "size": [1, 1, 1] } },
                    { "type": "rotate", "angles": [0, 90, 0], "child": { "type": "cuboid", "size": [1, 1, 1] } },
                    { "type": "scale", "factors": [2, 2, 2], "child": { "type": "cuboid", "size": [1, 1, 1] } }
                ]
            }
        }))
        .unwrap();
        assert_eq!(recipe.units, Units::Cm);
        assert_eq!(recipe.name.as_deref(), Some("bracket"));
        assert_eq!(recipe.root.count_nodes(), 14);
    }

    #[test]
    fn defaults_units_and_ignores_unknown_keys() {
        let recipe = parse_recipe(&json!({
            "version": 1,
            "comment": "not part of the grammar",
            "root": { "type": "sphere", "radius": 1, "color": "red" }
        }))
        .unwrap();
        assert_eq!(recipe.units, Units::Mm);
        assert_eq!(recipe.name, None);
        assert_eq!(
            recipe.root,
            RecipeNode::Sphere { radius: 1.0, center: None, segments: None }
        );
    }

    #[test]
    fn rejects_empty_children() {
        let (path, kind) =
            kind_of(json!({ "version": 1, "root": { "type": "union", "children": [] } }));
        assert_eq!(path, "$.root.children");
        assert_eq!(kind, ValidationErrorKind::EmptyChildren);
    }

    #[test]
    fn rejects_non_positive_radius() {
        let (path, kind) =
            kind_of(json!({ "version": 1, "root": { "type": "sphere", "radius": -1 } }));
        assert_eq!(path, "$.root.radius");
        assert_eq!(kind, ValidationErrorKind::NotPositive(-1.0));
    }

    #[test]
    fn rejects_unknown_discriminant() {
        let (path, kind) = kind_of(json!({ "version": 1, "root": { "type": "cube" } }));
        assert_eq!(path, "$.root.type");
        assert_eq!(kind, ValidationErrorKind::UnknownNodeType("cube".into()));
    }

    #[test]
    fn rejects_other_versions() {
        let (path, kind) = kind_of(json!({
            "version": 2,
            "root": { "type": "cuboid", "size": [1, 1, 1] }
        }));
        assert_eq!(path, "$.version");
        assert_eq!(kind, ValidationErrorKind::UnsupportedVersion("2".into()));
    }

    #[test]
    fn reports_nested_paths() {
        let (path, kind) = kind_of(json!({
            "version": 1,
            "root": {
                "type": "subtract",
                "children": [
                    { "type": "cuboid", "size": [1, 1, 1] },
                    { "type": "translate", "offset": [0, 0], "child": { "type": "cuboid", "size": [1, 1, 1] } }
                ]
            }
        }));
        assert_eq!(path, "$.root.children[1].offset");
        assert_eq!(kind, ValidationErrorKind::WrongArity { expected: 3, found: 2 });
    }

    #[test]
    fn segments_must_be_positive_integers() {
        let (path, kind) = kind_of(json!({
            "version": 1,
            "root": { "type": "cylinder", "height": 1, "radius": 1, "segments": 2.5 }
        }));
        assert_eq!(path, "$.root.segments");
        assert_eq!(kind, ValidationErrorKind::NotPositiveInteger("2.5".into()));

        let ok = parse_recipe(&json!({
            "version": 1,
            "root": { "type": "cylinder", "height": 1, "radius": 1, "segments": 16.0 }
        }))
        .unwrap();
        assert!(matches!(ok.root, RecipeNode::Cylinder { segments: Some(16), .. }));
    }

    #[test]
    fn null_is_not_absent() {
        let (path, kind) = kind_of(json!({
            "version": 1,
            "root": { "type": "cuboid", "size": [1, 1, 1], "center": null }
        }));
        assert_eq!(path, "$.root.center");
        assert_eq!(kind, ValidationErrorKind::ExpectedArray);
    }

    fn translate_chain(levels: usize) -> Value {
        let mut node = json!({ "type": "cuboid", "size": [1, 1, 1] });
        for _ in 1..levels {
            node = json!({ "type": "translate", "offset": [0, 0, 0], "child": node });
        }
        node
    }

    #[test]
    fn nesting_stops_at_max_depth() {
        let deepest = parse_node(&translate_chain(MAX_DEPTH), &NodePath::root()).unwrap();
        assert_eq!(deepest.count_nodes(), MAX_DEPTH);

        let err = parse_node(&translate_chain(MAX_DEPTH + 1), &NodePath::root()).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::TooDeep { limit: MAX_DEPTH });
        assert_eq!(err.path.len(), MAX_DEPTH + 1);
    }

    #[test]
    fn deepest_union_nesting_fits_in_text() {
        let mut text = String::from(r#"{ "type": "cuboid", "size": [1, 1, 1] }"#);
        for _ in 1..MAX_DEPTH {
            text = format!(r#"{{ "type": "union", "children": [{text}] }}"#);
        }
        let recipe = parse_recipe_str(&format!(r#"{{ "version": 1, "root": {text} }}"#)).unwrap();
        assert_eq!(recipe.root.count_nodes(), MAX_DEPTH);
    }

    #[test]
    fn deep_text_is_too_deep_not_malformed() {
        let text = serde_json::to_string(&translate_chain(MAX_DEPTH + 1)).unwrap();
        let err = parse_recipe_str(&format!(r#"{{ "version": 1, "root": {text} }}"#)).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::TooDeep { limit: MAX_DEPTH });

        let mut text = String::from("1");
        for _ in 0..500 {
            text = format!(r#"{{ "type": "translate", "child": {text} }}"#);
        }
        let err = parse_recipe_str(&format!(r#"{{ "version": 1, "root": {text} }}"#)).unwrap_err();
        assert_eq!(err.path, NodePath::document());
        assert_eq!(err.kind, ValidationErrorKind::TooDeep { limit: MAX_DEPTH });
    }

    #[test]
    fn brackets_in_strings_do_not_nest() {
        assert_eq!(bracket_depth(r#"{ "name": "[[{{\"[" }"#), 1);
        assert_eq!(bracket_depth(r#"{ "a": [[1], { "b": [] }] }"#), 4);
    }

    #[test]
    fn syntax_errors_are_validation_errors() {
        let err = parse_recipe_str("{ \"version\": 1, ").unwrap_err();
        assert_eq!(err.path, NodePath::document());
        assert!(matches!(err.kind, ValidationErrorKind::Syntax(_)));
    }
}
