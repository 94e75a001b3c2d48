//! SVG export of a drawing's cached representations.

#[cfg(test)]
#[path = "svg_test.rs"]
mod svg_test;

use crate::cache::RepresentationCache;
use crate::doc::Shape;

const CLOSED_STYLE: &str =
    "fill-rule:nonzero;stroke:#000000;stroke-opacity:1;stroke-width:2;fill:#808080;fill-opacity:0.5";
const OPEN_STYLE: &str = "fill-rule:nonzero;stroke:#000000;stroke-opacity:1;stroke-width:2;fill:none";

/// Render `shapes` as a standalone SVG document.
///
/// Each shape becomes one `<path>` using its cached representation. Shapes
/// with no representation (too few points, or a failed computation) are
/// left out.
#[must_use]
pub fn to_svg(width: f64, height: f64, shapes: &[Shape], cache: &RepresentationCache) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n");
    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" width=\"{width}\" height=\"{height}\">\n"
    ));

    for shape in shapes {
        let Some(data) = cache.get(shape.id()) else {
            continue;
        };
        let style = if shape.is_closed { CLOSED_STYLE } else { OPEN_STYLE };
        out.push_str(&format!("  <path style=\"{style}\"\n        d=\"{data}\"/>\n"));
    }

    out.push_str("</svg>\n");
    out
}
