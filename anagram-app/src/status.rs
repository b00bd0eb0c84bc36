use anagram_core::{EditEngine, Side};

/// One-line summary of the tool state, plus the linked coordinate when a
/// canvas position is hovered.
///
/// `Tool: Brush, size: 4, color: rgba(0,0,0,255) | A(3,5) -> B(7,1)`
pub fn status_line(engine: &EditEngine, hover: Option<(Side, usize, usize)>) -> String {
    let brush = engine.brush();
    let [r, g, b, a] = brush.color;
    let mut line = format!(
        "Tool: {}, size: {}, color: rgba({r},{g},{b},{a})",
        brush.tool.label(),
        brush.radius
    );
    if let Some((side, y, x)) = hover {
        if let Ok(Some((my, mx))) = engine.map(side, y, x) {
            line.push_str(&format!(
                " | {}({y},{x}) -> {}({my},{mx})",
                side.label(),
                side.other().label()
            ));
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use anagram_core::{Permutation, Tool};

    #[test]
    fn describes_tool_without_hover() {
        let engine = EditEngine::default();
        assert_eq!(
            status_line(&engine, None),
            "Tool: Brush, size: 4, color: rgba(0,0,0,255)"
        );
    }

    #[test]
    fn appends_mapping_for_hovered_pixel() {
        let mut engine = EditEngine::default();
        engine.load_permutation(Permutation::from_indices(&[3, 1, 2, 0]).unwrap());
        engine.set_tool(Tool::Eraser);
        assert_eq!(
            status_line(&engine, Some((Side::B, 1, 1))),
            "Tool: Eraser, size: 4, color: rgba(0,0,0,255) | B(1,1) -> A(0,0)"
        );
    }

    #[test]
    fn off_canvas_hover_is_omitted() {
        let mut engine = EditEngine::default();
        engine.load_permutation(Permutation::identity(2));
        assert!(!status_line(&engine, Some((Side::A, 9, 9))).contains('|'));
    }
}
