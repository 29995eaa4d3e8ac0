//! [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)
//!
//! The tokenizer lowercases every name, but SVG is case-sensitive. These
//! tables restore the camelCase spelling so inline icons survive a
//! parse/serialize round trip.

/// "adjust SVG attributes": the right-hand column of the WHATWG table.
const SVG_ATTRIBUTES: &[&str] = &[
    "attributeName", "attributeType", "baseFrequency", "baseProfile", "calcMode",
    "clipPathUnits", "diffuseConstant", "edgeMode", "filterUnits", "glyphRef",
    "gradientTransform", "gradientUnits", "kernelMatrix", "kernelUnitLength", "keyPoints",
    "keySplines", "keyTimes", "lengthAdjust", "limitingConeAngle", "markerHeight", "markerUnits",
    "markerWidth", "maskContentUnits", "maskUnits", "numOctaves", "pathLength",
    "patternContentUnits", "patternTransform", "patternUnits", "pointsAtX", "pointsAtY",
    "pointsAtZ", "preserveAlpha", "preserveAspectRatio", "primitiveUnits", "refX", "refY",
    "repeatCount", "repeatDur", "requiredExtensions", "requiredFeatures", "specularConstant",
    "specularExponent", "spreadMethod", "startOffset", "stdDeviation", "stitchTiles",
    "surfaceScale", "systemLanguage", "tableValues", "targetX", "targetY", "textLength",
    "viewBox", "viewTarget", "xChannelSelector", "yChannelSelector", "zoomAndPan",
];

/// "If the current node is an SVG element and the token's tag name is one of
/// the ones in the first column of the following table, change the tag name
/// to the name given in the corresponding cell in the second column."
const SVG_TAG_NAMES: &[&str] = &[
    "altGlyph", "altGlyphDef", "altGlyphItem", "animateColor", "animateMotion",
    "animateTransform", "clipPath", "feBlend", "feColorMatrix", "feComponentTransfer",
    "feComposite", "feConvolveMatrix", "feDiffuseLighting", "feDisplacementMap",
    "feDistantLight", "feDropShadow", "feFlood", "feFuncA", "feFuncB", "feFuncG", "feFuncR",
    "feGaussianBlur", "feImage", "feMerge", "feMergeNode", "feMorphology", "feOffset",
    "fePointLight", "feSpecularLighting", "feSpotLight", "feTile", "feTurbulence",
    "foreignObject", "glyphRef", "linearGradient", "radialGradient", "textPath",
];

fn adjust(name: &str, table: &[&str]) -> String {
    table
        .iter()
        .find(|candidate| candidate.eq_ignore_ascii_case(name))
        .map_or_else(|| name.to_string(), |candidate| (*candidate).to_string())
}

/// Restore the SVG spelling of an attribute name.
#[must_use]
pub fn adjust_svg_attribute_name(name: &str) -> String {
    adjust(name, SVG_ATTRIBUTES)
}

/// Restore the SVG spelling of an element name.
#[must_use]
pub fn adjust_svg_tag_name(name: &str) -> String {
    adjust(name, SVG_TAG_NAMES)
}
