/// Renderable block primitives. The rendering surface decides geometry; the
/// content only says what appears and in which order.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading(String),
    Subheading(String),
    Paragraph(String),
    Bullet { text: String, detail: Option<String> },
    Stat { value: String, label: String },
    Formula(String),
    Callout(String),
    Columns(Vec<Vec<Block>>),
    Spacer(f32),
}

pub type RenderTree = Vec<Block>;

/// A slide's content capability. `render` must be pure in the step index:
/// the same step always yields an equivalent tree.
pub trait SlideContent {
    fn render(&self, step: u32) -> RenderTree;

    /// Highest step index at which the output still changes. Checked against
    /// the slide's declared step count when the deck is built.
    fn max_step(&self) -> u32;
}

/// The standard content implementation: an ordered list of blocks, each
/// tagged with the step at which it becomes visible.
pub struct RevealList {
    items: Vec<(u32, Block)>,
}

impl RevealList {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Visible from step 0 on.
    pub fn always(self, block: Block) -> Self {
        self.at(0, block)
    }

    /// Visible once `step` has been reached.
    pub fn at(mut self, step: u32, block: Block) -> Self {
        self.items.push((step, block));
        self
    }
}

impl SlideContent for RevealList {
    fn render(&self, step: u32) -> RenderTree {
        self.items
            .iter()
            .filter(|(reveal, _)| *reveal <= step)
            .map(|(_, block)| block.clone())
            .collect()
    }

    fn max_step(&self) -> u32 {
        self.items.iter().map(|(reveal, _)| *reveal).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RevealList {
        RevealList::new()
            .always(Block::Heading("Title".into()))
            .at(1, Block::Bullet { text: "first".into(), detail: None })
            .at(2, Block::Bullet { text: "second".into(), detail: None })
    }

    #[test]
    fn reveals_accumulate_with_steps() {
        let c = sample();
        assert_eq!(c.render(0).len(), 1);
        assert_eq!(c.render(1).len(), 2);
        assert_eq!(c.render(2).len(), 3);
        // Past the last reveal nothing more appears.
        assert_eq!(c.render(9).len(), 3);
    }

    #[test]
    fn render_is_pure_in_the_step() {
        let c = sample();
        assert_eq!(c.render(1), c.render(1));
        assert_eq!(c.render(2), c.render(2));
    }

    #[test]
    fn max_step_tracks_the_latest_reveal() {
        assert_eq!(sample().max_step(), 2);
        assert_eq!(RevealList::new().always(Block::Spacer(1.0)).max_step(), 0);
        assert_eq!(RevealList::new().max_step(), 0);
    }
}
