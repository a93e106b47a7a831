use std::collections::HashSet;
use std::path::PathBuf;

use thiserror::Error;

use crate::content::SlideContent;

/// Rendering arrangement for a slide. The presenter picks the geometry, the
/// slide's content fills it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Cover,
    Default,
    ImageRight,
    ImageLeft,
    TwoCols,
    Center,
}

pub struct Slide {
    pub id: u32,
    pub layout: Layout,
    pub step_count: u32,
    /// Spoken narration for this slide, fed to speech synthesis.
    pub narration: String,
    /// Side figure for the image layouts.
    pub figure: Option<PathBuf>,
    /// Full-bleed backdrop for the cover layout.
    pub backdrop: Option<PathBuf>,
    pub content: Box<dyn SlideContent>,
}

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("deck contains no slides")]
    Empty,
    #[error("duplicate slide id {0}")]
    DuplicateId(u32),
    #[error("slide {id}: declares {declared} steps but content reveals up to step {actual}")]
    StepMismatch { id: u32, declared: u32, actual: u32 },
    #[error("slide {0}: content renders nothing at step 0")]
    EmptyContent(u32),
}

/// An ordered, immutable sequence of slides. Construction validates the whole
/// deck so navigation and rendering never have to re-check it.
pub struct Deck {
    slides: Vec<Slide>,
}

impl Deck {
    pub fn new(slides: Vec<Slide>) -> Result<Self, DeckError> {
        if slides.is_empty() {
            return Err(DeckError::Empty);
        }
        let mut seen = HashSet::new();
        for slide in &slides {
            if !seen.insert(slide.id) {
                return Err(DeckError::DuplicateId(slide.id));
            }
            let actual = slide.content.max_step();
            if actual != slide.step_count {
                return Err(DeckError::StepMismatch {
                    id: slide.id,
                    declared: slide.step_count,
                    actual,
                });
            }
            if slide.content.render(0).is_empty() {
                return Err(DeckError::EmptyContent(slide.id));
            }
        }
        Ok(Self { slides })
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn slide(&self, index: usize) -> &Slide {
        &self.slides[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Block, RevealList};

    fn slide(id: u32, step_count: u32, content: RevealList) -> Slide {
        Slide {
            id,
            layout: Layout::Default,
            step_count,
            narration: String::new(),
            figure: None,
            backdrop: None,
            content: Box::new(content),
        }
    }

    fn heading() -> RevealList {
        RevealList::new().always(Block::Heading("x".into()))
    }

    #[test]
    fn empty_deck_is_rejected() {
        assert!(matches!(Deck::new(vec![]), Err(DeckError::Empty)));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let deck = Deck::new(vec![slide(7, 0, heading()), slide(7, 0, heading())]);
        assert!(matches!(deck, Err(DeckError::DuplicateId(7))));
    }

    #[test]
    fn declared_steps_must_match_content() {
        let content = heading().at(2, Block::Paragraph("late".into()));
        let deck = Deck::new(vec![slide(1, 3, content)]);
        assert!(matches!(
            deck,
            Err(DeckError::StepMismatch { id: 1, declared: 3, actual: 2 })
        ));
    }

    #[test]
    fn blank_slides_are_rejected() {
        let content = RevealList::new().at(1, Block::Paragraph("only later".into()));
        let deck = Deck::new(vec![slide(1, 1, content)]);
        assert!(matches!(deck, Err(DeckError::EmptyContent(1))));
    }

    #[test]
    fn valid_deck_passes() {
        let deck = Deck::new(vec![
            slide(1, 0, heading()),
            slide(2, 2, heading().at(1, Block::Spacer(1.0)).at(2, Block::Spacer(1.0))),
        ])
        .unwrap();
        assert_eq!(deck.len(), 2);
        assert_eq!(deck.slide(1).step_count, 2);
    }
}
