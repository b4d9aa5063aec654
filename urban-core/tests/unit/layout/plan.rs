use super::*;
use crate::text::builtin::BuiltinFont;

struct FixedAdvance(f32);

impl MeasureText for FixedAdvance {
    fn measure(&mut self, _font: &ResolvedFont, text: &str) -> f32 {
        text.chars().count() as f32 * self.0
    }
}

fn font() -> ResolvedFont {
    ResolvedFont::Builtin(BuiltinFont::default())
}

#[test]
fn wraps_greedily_by_character() {
    let lines = wrap_text("abcdefg", &font(), 35.0, &mut FixedAdvance(10.0));
    assert_eq!(lines, vec!["abc", "def", "g"]);
}

#[test]
fn blank_paragraphs_become_single_empty_lines() {
    let mut m = FixedAdvance(10.0);
    assert_eq!(wrap_text("", &font(), 100.0, &mut m), vec![""]);
    assert_eq!(wrap_text("   ", &font(), 100.0, &mut m), vec![""]);
    assert_eq!(wrap_text("a\n\nb", &font(), 100.0, &mut m), vec!["a", "", "b"]);
}

#[test]
fn oversized_character_still_gets_a_line() {
    let lines = wrap_text("ab", &font(), 30.0, &mut FixedAdvance(50.0));
    assert_eq!(lines, vec!["a", "b"]);
}

#[test]
fn wrapped_lines_respect_max_width() {
    let text = "自律是最高級的自由，也是每一天的選擇\n堅持";
    let mut m = FixedAdvance(59.0);
    let lines = wrap_text(text, &font(), 300.0, &mut m);
    assert!(lines.len() > 2);
    for line in &lines {
        assert!(!line.is_empty());
        assert!(m.measure(&font(), line) <= 300.0);
    }
}

#[test]
fn square_caption_fits_on_one_line() {
    let plan = plan_layout(
        "自律是最高級的自由",
        &font(),
        59,
        1080,
        1080,
        &mut FixedAdvance(59.0),
    );
    assert_eq!(plan.margin_left, 86);
    assert_eq!(plan.max_width, 908);
    assert_eq!(plan.line_height, 88);
    assert_eq!(plan.lines.len(), 1);
    assert_eq!(plan.y_start, 1080 - 75 - 88);
    assert_eq!(plan.drawn_lines(), 1);
    assert_eq!(plan.placed[0].x, 86);
    assert_eq!(plan.placed[0].y, plan.y_start);
    assert!(!plan.truncated);
}

#[test]
fn empty_caption_plans_one_empty_line() {
    let plan = plan_layout("", &font(), 48, 1080, 1080, &mut FixedAdvance(48.0));
    assert_eq!(plan.lines, vec![String::new()]);
    assert_eq!(plan.total_height, 72);
    assert!(!plan.truncated);
}

#[test]
fn lines_above_the_canvas_are_dropped() {
    let text = (0..10).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
    let plan = plan_layout(&text, &font(), 100, 400, 300, &mut FixedAdvance(10.0));
    assert_eq!(plan.total_lines(), 10);
    assert!(plan.y_start < 0);
    assert!(plan.truncated);
    assert_eq!(plan.drawn_lines(), 1);
    assert_eq!(plan.placed[0].index, 9);
    assert!(plan.placed.iter().all(|l| l.y >= 0));
    assert!(
        plan.placed
            .iter()
            .all(|l| l.y + plan.line_height <= 300 - BOTTOM_GUARD_PX)
    );
}

#[test]
fn lines_past_the_bottom_guard_are_dropped() {
    let plan = plan_layout("hi", &font(), 48, 200, 100, &mut FixedAdvance(10.0));
    assert_eq!(plan.total_lines(), 1);
    assert_eq!(plan.drawn_lines(), 0);
    assert!(plan.truncated);
}

/// Advance depends on the character, and every call is counted.
struct CountingVariable {
    calls: usize,
}

impl MeasureText for CountingVariable {
    fn measure(&mut self, _font: &ResolvedFont, text: &str) -> f32 {
        self.calls += 1;
        text.chars()
            .map(|c| (if c.is_ascii() { 11.0 } else { 23.0 }) + (c as u32 % 7) as f32)
            .sum()
    }
}

fn char_by_char(text: &str, max_width: f32, m: &mut dyn MeasureText) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        if paragraph.trim().is_empty() {
            lines.push(String::new());
            continue;
        }
        let mut current = String::new();
        for ch in paragraph.chars() {
            let mut candidate = current.clone();
            candidate.push(ch);
            if m.measure(&font(), &candidate) <= max_width {
                current = candidate;
            } else {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                current.push(ch);
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

#[test]
fn search_breaks_match_character_by_character_wrap() {
    let text = "Urban 自律是最高級的自由, chosen again every day.\n\n  每一天 mixed widths W 一";
    for max_width in [20.0, 57.5, 120.0, 333.0, 908.0] {
        let expected = char_by_char(text, max_width, &mut CountingVariable { calls: 0 });
        let got = wrap_text(text, &font(), max_width, &mut CountingVariable { calls: 0 });
        assert_eq!(got, expected, "max_width {max_width}");
    }
}

#[test]
fn long_paragraph_needs_few_measurements_per_line() {
    let text = "自".repeat(20_000);
    let mut m = CountingVariable { calls: 0 };
    let lines = wrap_text(&text, &font(), 2_000.0, &mut m);

    assert!(lines.len() > 100);
    assert_eq!(lines.concat(), text);
    assert!(m.calls <= lines.len() * 20, "{} calls for {} lines", m.calls, lines.len());
}
