// ABOUTME: Text preview of a layout tree, drawn into a ratatui buffer with one bordered block per pane
// Used by the CLI to show presets and saved layouts without a running UI

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction as LayoutDirection, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::layout::{LayoutNode, Node, Pane, PaneId, PaneLeaf, SavedLayout, SavedPane, SplitDirection};
use crate::models::session::find_session;
use crate::models::SessionHandle;

pub struct LayoutPreviewComponent {
    width: u16,
    height: u16,
}

impl LayoutPreviewComponent {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Draw `tree`, titling each pane with `label` and highlighting `active`.
    pub fn render<P: PaneLeaf>(
        &self,
        tree: &Node<P>,
        active: Option<PaneId>,
        label: &dyn Fn(&P) -> String,
    ) -> Buffer {
        let area = Rect::new(0, 0, self.width, self.height);
        let mut buf = Buffer::empty(area);
        for (pane, rect) in cell_rects(tree, area) {
            let is_active = active == Some(pane.id());
            let border_color = if is_active { Color::Yellow } else { Color::Cyan };
            let block = Block::default()
                .title(label(pane))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color));
            Paragraph::new(pane.id().to_string())
                .block(block)
                .render(rect, &mut buf);
        }
        buf
    }

    pub fn render_live(&self, tree: &LayoutNode, pool: &[SessionHandle], active: Option<PaneId>) -> String {
        let buf = self.render(tree, active, &|pane: &Pane| {
            pane.bound_session_id
                .as_ref()
                .map_or_else(
                    || "empty".to_string(),
                    |id| find_session(pool, id).map_or_else(|| id.to_string(), |s| s.display_name().to_string()),
                )
        });
        buffer_to_string(&buf)
    }

    pub fn render_saved(&self, tree: &SavedLayout) -> String {
        let buf = self.render(tree, None, &|pane: &SavedPane| {
            pane.binding
                .as_ref()
                .map_or_else(|| "empty".to_string(), |b| b.label().to_string())
        });
        buffer_to_string(&buf)
    }
}

/// Terminal cell rectangle of every pane, depth-first.
pub fn cell_rects<P>(tree: &Node<P>, area: Rect) -> Vec<(&P, Rect)> {
    let mut out = Vec::new();
    collect_rects(tree, area, &mut out);
    out
}

fn collect_rects<'a, P>(node: &'a Node<P>, area: Rect, out: &mut Vec<(&'a P, Rect)>) {
    match node {
        Node::Pane(pane) => out.push((pane, area)),
        Node::Split(split) => {
            let first_pct = (split.ratio() * 100.0).round() as u16;
            let direction = match split.direction {
                SplitDirection::Row => LayoutDirection::Horizontal,
                SplitDirection::Column => LayoutDirection::Vertical,
            };
            let chunks = Layout::default()
                .direction(direction)
                .constraints([
                    Constraint::Percentage(first_pct),
                    Constraint::Percentage(100 - first_pct),
                ])
                .split(area);
            collect_rects(split.first(), chunks[0], out);
            collect_rects(split.second(), chunks[1], out);
        }
    }
}

pub fn buffer_to_string(buf: &Buffer) -> String {
    let area = buf.area;
    let mut out = String::with_capacity((area.width as usize + 1) * area.height as usize);
    for y in area.y..area.y + area.height {
        let mut line = String::new();
        for x in area.x..area.x + area.width {
            line.push_str(buf.get(x, y).symbol());
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{IdGenerator, Preset};

    #[test]
    fn test_row_preset_splits_width() {
        let ids = IdGenerator::new();
        let tree: LayoutNode = Preset::Row2.build(&ids);
        let rects = cell_rects(&tree, Rect::new(0, 0, 80, 24));
        assert_eq!(rects.len(), 2);
        assert_eq!(rects[0].1, Rect::new(0, 0, 40, 24));
        assert_eq!(rects[1].1, Rect::new(40, 0, 40, 24));
    }

    #[test]
    fn test_live_preview_shows_labels() {
        let ids = IdGenerator::new();
        let first = ids.next();
        let tree = crate::layout::split(
            &LayoutNode::bound_pane(first, "s1"),
            first,
            SplitDirection::Column,
            &ids,
        )
        .layout;
        let pool = vec![SessionHandle::new("s1", "/x", "x").with_label("review")];
        let text = LayoutPreviewComponent::new(30, 10).render_live(&tree, &pool, Some(first));
        assert!(text.contains("review"));
        assert!(text.contains("empty"));
        assert_eq!(text.lines().count(), 10);
    }
}
