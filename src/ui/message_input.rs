//! Composer field rendering.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::domain::composer_state::{ComposerState, MAX_DRAFT_CHARS};

use super::styles;

const PLACEHOLDER_TEXT: &str = "Press 'i' to type a message...";
const PROMPT_SYMBOL: &str = "> ";

pub fn render_composer(frame: &mut Frame<'_>, area: Rect, composer: &ComposerState, is_focused: bool) {
    let border_style = if is_focused {
        styles::active_panel_border_style()
    } else {
        styles::inactive_panel_border_style()
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);
    if let Some(counter) = length_counter(composer) {
        block = block.title_bottom(Line::from(counter).right_aligned());
    }

    let text_width = usize::from(area.width.saturating_sub(2)).saturating_sub(PROMPT_SYMBOL.len());
    let offset = scroll_offset(composer.cursor_column(), text_width);

    frame.render_widget(
        Paragraph::new(build_input_line(composer, is_focused, offset, text_width)).block(block),
        area,
    );

    if is_focused {
        let column = u16::try_from(composer.cursor_column() - offset).unwrap_or(u16::MAX);
        let cursor_x = area
            .x
            .saturating_add(1)
            .saturating_add(PROMPT_SYMBOL.len() as u16)
            .saturating_add(column);
        frame.set_cursor_position((cursor_x, area.y.saturating_add(1)));
    }
}

/// First visible character so the cursor stays inside a field `width` columns wide.
fn scroll_offset(cursor_column: usize, width: usize) -> usize {
    if width == 0 {
        return cursor_column;
    }

    cursor_column.saturating_sub(width - 1)
}

/// Shown once the draft is long enough that the limit matters.
fn length_counter(composer: &ComposerState) -> Option<String> {
    let count = composer.text().chars().count();
    (count * 10 >= MAX_DRAFT_CHARS * 9).then(|| format!(" {count}/{MAX_DRAFT_CHARS} "))
}

fn build_input_line(
    composer: &ComposerState,
    is_focused: bool,
    offset: usize,
    width: usize,
) -> Line<'static> {
    let prompt = Span::styled(PROMPT_SYMBOL.to_owned(), styles::input_prompt_style());

    if !is_focused && composer.text().is_empty() {
        return Line::from(vec![
            prompt,
            Span::styled(PLACEHOLDER_TEXT.to_owned(), styles::input_placeholder_style()),
        ]);
    }

    let visible: String = composer.text().chars().skip(offset).take(width).collect();
    Line::from(vec![prompt, Span::styled(visible, styles::input_text_style())])
}
