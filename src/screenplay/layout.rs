//! Line estimation and pagination.
//!
//! The page model is a fixed-width monospace layout (US Letter, 12pt
//! Courier): each element type renders at its own margin width and carries
//! its own blank-line spacing. One typed table is the single source of truth
//! for both the line estimator and the paginator.

use serde::{Deserialize, Serialize};

use super::model::{Element, ElementType};

/// Default page capacity in rendered lines.
pub const DEFAULT_LINES_PER_PAGE: u32 = 55;

/// Per-type layout metrics for the fixed-width page model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypeMetrics {
    /// Characters that fit on one rendered line at this type's margins.
    pub char_width: u32,
    /// Blank lines following the element per formatting convention.
    pub spacing_after: u32,
}

/// Layout metrics per element type. Dialogue-block types are narrower and
/// character/parenthetical rows sit flush against the speech below them.
pub const fn metrics_for(kind: ElementType) -> TypeMetrics {
    match kind {
        ElementType::SceneHeading => TypeMetrics {
            char_width: 60,
            spacing_after: 1,
        },
        ElementType::Action => TypeMetrics {
            char_width: 60,
            spacing_after: 1,
        },
        ElementType::Character => TypeMetrics {
            char_width: 38,
            spacing_after: 0,
        },
        ElementType::Dialogue => TypeMetrics {
            char_width: 35,
            spacing_after: 1,
        },
        ElementType::Parenthetical => TypeMetrics {
            char_width: 32,
            spacing_after: 0,
        },
        ElementType::Transition => TypeMetrics {
            char_width: 60,
            spacing_after: 1,
        },
        ElementType::Note => TypeMetrics {
            char_width: 60,
            spacing_after: 1,
        },
    }
}

/// Estimates the rendered line count for one element: each soft-break segment
/// wraps at the type's width (a blank segment still occupies a line), plus
/// the type's trailing spacing. Always at least 1.
pub fn estimate_lines(text: &str, kind: ElementType) -> u32 {
    let metrics = metrics_for(kind);
    let width = metrics.char_width.max(1) as usize;
    let content: u32 = text
        .split('\n')
        .map(|segment| segment.chars().count().div_ceil(width).max(1) as u32)
        .sum();
    content + metrics.spacing_after
}

/// One page of the partition.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Page {
    /// 1-based page number.
    pub number: u32,

    /// Element ids on this page, in reading order.
    pub element_ids: Vec<String>,
}

/// Partitions the element sequence into pages of at most `lines_per_page`
/// estimated lines (clamped to at least 1). Every element lands on exactly
/// one page; empty input still produces one empty page.
///
/// Boundary rules:
/// - an element with `page_break` set closes the page ahead of itself (a
///   break at the top of an already-empty page is a no-op boundary)
/// - on overflow, a dialogue or parenthetical whose cue would be orphaned as
///   the last row of the outgoing page pulls that cue onto the new page;
///   when the cue opened the page the pair stays together and the page runs
///   long rather than splitting
/// - a single element taller than a page occupies its page alone
pub fn paginate(elements: &[Element], lines_per_page: u32) -> Vec<Page> {
    let capacity = lines_per_page.max(1);
    let mut pages: Vec<Page> = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut line_count: u32 = 0;
    let mut prev_type: Option<ElementType> = None;
    let mut prev_lines: u32 = 0;

    for element in elements {
        let lines = estimate_lines(&element.text, element.element_type);
        let overflow = line_count + lines > capacity;

        if element.page_break && !current.is_empty() {
            pages.push(Page {
                number: pages.len() as u32 + 1,
                element_ids: std::mem::take(&mut current),
            });
            line_count = 0;
            prev_type = None;
        } else if overflow && !current.is_empty() {
            let follows_cue = matches!(
                element.element_type,
                ElementType::Dialogue | ElementType::Parenthetical
            ) && prev_type == Some(ElementType::Character);

            if follows_cue && current.len() > 1 {
                // The cue moves forward with its speech instead of sitting
                // orphaned at the bottom of the outgoing page.
                if let Some(cue) = current.pop() {
                    pages.push(Page {
                        number: pages.len() as u32 + 1,
                        element_ids: std::mem::take(&mut current),
                    });
                    current.push(cue);
                    line_count = prev_lines;
                }
            } else if !follows_cue {
                pages.push(Page {
                    number: pages.len() as u32 + 1,
                    element_ids: std::mem::take(&mut current),
                });
                line_count = 0;
                prev_type = None;
            }
            // follows_cue with the cue opening the page: no split, the page
            // runs long.
        }

        current.push(element.id.clone());
        line_count += lines;
        prev_type = Some(element.element_type);
        prev_lines = lines;
    }

    pages.push(Page {
        number: pages.len() as u32 + 1,
        element_ids: current,
    });
    pages
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn el(id: &str, kind: ElementType, text: &str) -> Element {
        Element::new(id, kind).with_text(text)
    }

    #[test]
    fn test_estimate_lines_wrapping() {
        // 70 chars of action wrap at 60: 2 content lines + 1 spacing.
        assert_eq!(estimate_lines(&"x".repeat(70), ElementType::Action), 3);
        // The same text as dialogue wraps at 35.
        assert_eq!(estimate_lines(&"x".repeat(70), ElementType::Dialogue), 3);
        assert_eq!(estimate_lines(&"x".repeat(71), ElementType::Dialogue), 4);
        // Character rows have no trailing spacing.
        assert_eq!(estimate_lines("BOB", ElementType::Character), 1);
        assert_eq!(estimate_lines("(beat)", ElementType::Parenthetical), 1);
        assert_eq!(estimate_lines("INT. OFFICE - DAY", ElementType::SceneHeading), 2);
    }

    #[test]
    fn test_estimate_lines_soft_breaks_and_empty() {
        // Each segment counts separately; blank segments still occupy a line.
        assert_eq!(estimate_lines("Hi.\nThere.", ElementType::Dialogue), 3);
        assert_eq!(estimate_lines("a\n\nb", ElementType::Action), 4);
        // An empty element still occupies a line.
        assert_eq!(estimate_lines("", ElementType::Character), 1);
        assert_eq!(estimate_lines("", ElementType::Action), 2);
    }

    #[test]
    fn test_empty_input_yields_one_empty_page() {
        let pages = paginate(&[], DEFAULT_LINES_PER_PAGE);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].number, 1);
        assert!(pages[0].element_ids.is_empty());
    }

    #[test]
    fn test_simple_fill_and_numbering() {
        // Four actions of 4 lines each ("A\nB\nC" = 3 content + 1 spacing)
        // at capacity 10: two per page.
        let elements: Vec<Element> = (0..4)
            .map(|i| el(&format!("a{}", i), ElementType::Action, "A\nB\nC"))
            .collect();
        let pages = paginate(&elements, 10);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].number, 1);
        assert_eq!(pages[1].number, 2);
        assert_eq!(pages[0].element_ids, vec!["a0", "a1"]);
        assert_eq!(pages[1].element_ids, vec!["a2", "a3"]);
    }

    #[test]
    fn test_every_element_on_exactly_one_page() {
        let kinds = [
            ElementType::SceneHeading,
            ElementType::Action,
            ElementType::Character,
            ElementType::Dialogue,
            ElementType::Parenthetical,
            ElementType::Transition,
        ];
        let elements: Vec<Element> = (0..40)
            .map(|i| {
                el(
                    &format!("e{}", i),
                    kinds[i % kinds.len()],
                    &"word ".repeat(i % 7),
                )
            })
            .collect();

        let pages = paginate(&elements, 10);
        let flattened: Vec<&String> = pages.iter().flat_map(|p| p.element_ids.iter()).collect();
        assert_eq!(flattened.len(), elements.len());
        for (got, want) in flattened.iter().zip(elements.iter()) {
            assert_eq!(**got, want.id);
        }
        for page in &pages {
            assert!(!page.element_ids.is_empty());
        }
    }

    #[test]
    fn test_keep_together_pulls_cue_forward() {
        // Filler: 7 lines. Cue: 1 line. Dialogue: 3 lines. Capacity 10.
        let elements = vec![
            el("a", ElementType::Action, "L1\nL2\nL3\nL4\nL5\nL6"),
            el("c", ElementType::Character, "BOB"),
            el("d", ElementType::Dialogue, &"x".repeat(39)),
        ];
        let pages = paginate(&elements, 10);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].element_ids, vec!["a"]);
        assert_eq!(pages[1].element_ids, vec!["c", "d"]);
    }

    #[test]
    fn test_cue_opening_a_page_keeps_its_speech() {
        // The pair exceeds the page but the cue opened it: no split.
        let giant = "D\n".repeat(11) + "D";
        let elements = vec![
            el("c", ElementType::Character, "BOB"),
            el("d", ElementType::Dialogue, &giant),
            el("a", ElementType::Action, "Later."),
        ];
        let pages = paginate(&elements, 10);
        assert_eq!(pages[0].element_ids, vec!["c", "d"]);
        assert_eq!(pages[1].element_ids, vec!["a"]);
    }

    #[test]
    fn test_explicit_page_break() {
        let elements = vec![
            el("a", ElementType::Action, "One."),
            el("b", ElementType::Action, "Two.").with_page_break(true),
            el("c", ElementType::Action, "Three."),
        ];
        let pages = paginate(&elements, DEFAULT_LINES_PER_PAGE);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].element_ids, vec!["a"]);
        assert_eq!(pages[1].element_ids, vec!["b", "c"]);
    }

    #[test]
    fn test_leading_page_break_emits_no_empty_page() {
        let elements = vec![
            el("a", ElementType::Action, "One.").with_page_break(true),
            el("b", ElementType::Action, "Two."),
        ];
        let pages = paginate(&elements, DEFAULT_LINES_PER_PAGE);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].element_ids, vec!["a", "b"]);
    }

    #[test]
    fn test_tiny_capacity_is_clamped() {
        let elements = vec![
            el("a", ElementType::Character, "BOB"),
            el("b", ElementType::Character, "ALICE"),
        ];
        let pages = paginate(&elements, 0);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].element_ids, vec!["a"]);
        assert_eq!(pages[1].element_ids, vec!["b"]);
    }

    #[test]
    fn test_oversized_element_occupies_its_page_alone() {
        let tall = "L\n".repeat(20) + "end";
        let elements = vec![
            el("a", ElementType::Action, "Short."),
            el("b", ElementType::Action, &tall),
            el("c", ElementType::Action, "Short."),
        ];
        let pages = paginate(&elements, 10);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[1].element_ids, vec!["b"]);
    }
}
