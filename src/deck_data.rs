use std::path::PathBuf;

use crate::content::{Block, RevealList};
use crate::deck::{Deck, DeckError, Layout, Slide};

// The built-in deck: "Hydrogen Production: Industrial and Academic
// Frontiers". Step counts are validated against the reveal lists when the
// deck is constructed.

fn bullet(text: &str) -> Block {
    Block::Bullet { text: text.into(), detail: None }
}

fn bullet_with(text: &str, detail: &str) -> Block {
    Block::Bullet { text: text.into(), detail: Some(detail.into()) }
}

fn stat(value: &str, label: &str) -> Block {
    Block::Stat { value: value.into(), label: label.into() }
}

pub fn hydrogen_deck() -> Result<Deck, DeckError> {
    let slides = vec![
        Slide {
            id: 1,
            layout: Layout::Cover,
            step_count: 0,
            narration: "Welcome. This presentation covers hydrogen production, \
                from today's industrial workhorses to the processes still being \
                shaped in research laboratories."
                .into(),
            figure: None,
            backdrop: Some(PathBuf::from("cover.jpg")),
            content: Box::new(
                RevealList::new()
                    .always(Block::Heading("Hydrogen Production".into()))
                    .always(Block::Subheading("Industrial and Academic Frontiers".into()))
                    .always(Block::Spacer(24.0))
                    .always(Block::Paragraph(
                        "How the lightest element became the heaviest bet in the \
                         energy transition"
                            .into(),
                    )),
            ),
        },
        Slide {
            id: 2,
            layout: Layout::Default,
            step_count: 3,
            narration: "Why hydrogen? It is an energy carrier, not a source: it \
                stores and moves renewable energy, decarbonizes industries that \
                electricity cannot reach, and buffers seasonal demand."
                .into(),
            figure: None,
            backdrop: None,
            content: Box::new(
                RevealList::new()
                    .always(Block::Heading("Why hydrogen?".into()))
                    .always(Block::Subheading("An energy carrier, not an energy source".into()))
                    .at(1, bullet_with(
                        "Stores and transports renewable energy",
                        "Electrolysis converts surplus wind and solar into a storable fuel",
                    ))
                    .at(2, bullet_with(
                        "Decarbonizes the hard-to-electrify sectors",
                        "Steel, ammonia, refining, long-haul transport",
                    ))
                    .at(3, bullet_with(
                        "Buffers seasonal supply and demand",
                        "Weeks of storage where batteries manage hours",
                    )),
            ),
        },
        Slide {
            id: 3,
            layout: Layout::TwoCols,
            step_count: 2,
            narration: "The industry sorts hydrogen by how it is made. Grey \
                hydrogen comes from fossil fuels, blue adds carbon capture, and \
                green is produced from renewable electricity."
                .into(),
            figure: None,
            backdrop: None,
            content: Box::new(
                RevealList::new()
                    .always(Block::Heading("A palette of production routes".into()))
                    .always(Block::Spacer(16.0))
                    .always(Block::Columns(vec![
                        vec![
                            Block::Subheading("Grey".into()),
                            Block::Paragraph(
                                "Steam reforming of natural gas. Cheapest today, \
                                 about 9 to 10 kg of CO2 per kg of H2."
                                    .into(),
                            ),
                        ],
                        vec![
                            Block::Subheading("Blue".into()),
                            Block::Paragraph(
                                "Grey plus carbon capture and storage. Capture \
                                 rates of 60 to 95 percent in practice."
                                    .into(),
                            ),
                        ],
                        vec![
                            Block::Subheading("Green".into()),
                            Block::Paragraph(
                                "Electrolysis powered by renewables. Near-zero \
                                 direct emissions, cost falling fast."
                                    .into(),
                            ),
                        ],
                    ]))
                    .at(1, Block::Spacer(24.0))
                    .at(1, Block::Callout(
                        "Over 95 percent of hydrogen produced today is grey."
                            .into(),
                    ))
                    .at(2, Block::Callout(
                        "The frontier question: how fast can green close the cost \
                         gap?"
                            .into(),
                    )),
            ),
        },
        Slide {
            id: 4,
            layout: Layout::ImageRight,
            step_count: 2,
            narration: "Steam methane reforming is the industrial incumbent. \
                Methane and steam react over a nickel catalyst at around nine \
                hundred degrees Celsius, followed by the water-gas shift."
                .into(),
            figure: Some(PathBuf::from("smr.jpg")),
            backdrop: None,
            content: Box::new(
                RevealList::new()
                    .always(Block::Heading("Steam methane reforming".into()))
                    .always(Block::Subheading("The industrial incumbent".into()))
                    .at(1, Block::Formula("CH4 + H2O -> CO + 3 H2".into()))
                    .at(1, Block::Paragraph(
                        "Endothermic, nickel-catalyzed, roughly 900 C and 20 to \
                         30 bar."
                            .into(),
                    ))
                    .at(2, Block::Formula("CO + H2O -> CO2 + H2".into()))
                    .at(2, Block::Paragraph(
                        "The water-gas shift recovers additional hydrogen and \
                         concentrates the CO2 for capture."
                            .into(),
                    )),
            ),
        },
        Slide {
            id: 5,
            layout: Layout::ImageLeft,
            step_count: 3,
            narration: "Electrolysis splits water with electricity. Alkaline \
                cells are the mature option, proton exchange membranes follow \
                load swings, and solid oxide cells promise the highest \
                efficiency at high temperature."
                .into(),
            figure: Some(PathBuf::from("electrolyzer.jpg")),
            backdrop: None,
            content: Box::new(
                RevealList::new()
                    .always(Block::Heading("Electrolysis".into()))
                    .always(Block::Formula("2 H2O -> 2 H2 + O2".into()))
                    .at(1, bullet_with(
                        "Alkaline (AEL)",
                        "Mature and cheap; KOH electrolyte; slower load response",
                    ))
                    .at(2, bullet_with(
                        "Proton exchange membrane (PEM)",
                        "Compact, fast ramping; needs iridium and platinum",
                    ))
                    .at(3, bullet_with(
                        "Solid oxide (SOEC)",
                        "700 C operation; highest efficiency when waste heat is free",
                    )),
            ),
        },
        Slide {
            id: 6,
            layout: Layout::Default,
            step_count: 2,
            narration: "Economics decide adoption. The levelized cost of \
                hydrogen is dominated by electricity price; electrolyzer \
                capital costs matter most at low utilization."
                .into(),
            figure: None,
            backdrop: None,
            content: Box::new(
                RevealList::new()
                    .always(Block::Heading("What does a kilogram cost?".into()))
                    .always(Block::Spacer(16.0))
                    .at(1, Block::Columns(vec![
                        vec![stat("$1-2", "per kg, grey (gas price dependent)")],
                        vec![stat("$1.5-3", "per kg, blue with capture")],
                        vec![stat("$3-6", "per kg, green today")],
                    ]))
                    .at(2, Block::Callout(
                        "Electricity is 60 to 80 percent of green LCOH. Cheap \
                         power beats cheap stacks."
                            .into(),
                    )),
            ),
        },
        Slide {
            id: 7,
            layout: Layout::ImageRight,
            step_count: 2,
            narration: "On the academic frontier, photocatalytic water \
                splitting aims to shortcut the panel and the electrolyzer with \
                one particle that absorbs sunlight and splits water directly."
                .into(),
            figure: Some(PathBuf::from("photocatalysis.jpg")),
            backdrop: None,
            content: Box::new(
                RevealList::new()
                    .always(Block::Heading("Frontier: photocatalysis".into()))
                    .always(Block::Subheading("Sunlight to hydrogen in one step".into()))
                    .at(1, bullet_with(
                        "Semiconductor particles split water under illumination",
                        "No wires, no membranes, just suspension reactors",
                    ))
                    .at(2, bullet_with(
                        "Solar-to-hydrogen efficiency is the hurdle",
                        "Lab records near 1 to 2 percent; 10 percent is the \
                         viability threshold",
                    )),
            ),
        },
        Slide {
            id: 8,
            layout: Layout::Default,
            step_count: 2,
            narration: "Biological routes use microorganisms or biomass. Dark \
                fermentation produces hydrogen from organic waste, and biomass \
                gasification offers a carbon-neutral thermochemical path."
                .into(),
            figure: None,
            backdrop: None,
            content: Box::new(
                RevealList::new()
                    .always(Block::Heading("Biological and biomass routes".into()))
                    .at(1, bullet_with(
                        "Dark fermentation",
                        "Anaerobic bacteria digest organic waste streams into H2 \
                         and CO2",
                    ))
                    .at(2, bullet_with(
                        "Biomass gasification",
                        "Syngas from agricultural residue; carbon neutral if \
                         regrowth closes the loop",
                    )),
            ),
        },
        Slide {
            id: 9,
            layout: Layout::TwoCols,
            step_count: 2,
            narration: "Production is only half the problem. Hydrogen must be \
                compressed, liquefied, or chemically bound to move, and each \
                option taxes the energy balance."
                .into(),
            figure: None,
            backdrop: None,
            content: Box::new(
                RevealList::new()
                    .always(Block::Heading("Storage and transport".into()))
                    .always(Block::Spacer(16.0))
                    .at(1, Block::Columns(vec![
                        vec![
                            Block::Subheading("Compressed".into()),
                            Block::Paragraph("350 to 700 bar tanks; 5 to 10 percent energy penalty".into()),
                        ],
                        vec![
                            Block::Subheading("Liquefied".into()),
                            Block::Paragraph("Minus 253 C; about 30 percent of the energy content".into()),
                        ],
                        vec![
                            Block::Subheading("Carriers".into()),
                            Block::Paragraph("Ammonia and LOHCs ride existing chemical logistics".into()),
                        ],
                    ]))
                    .at(2, Block::Callout(
                        "Every conversion step costs energy; pipelines win where \
                         volumes justify them."
                            .into(),
                    )),
            ),
        },
        Slide {
            id: 10,
            layout: Layout::Default,
            step_count: 3,
            narration: "Who buys it? Ammonia synthesis and refining are \
                today's demand. Direct reduction steelmaking is the growth \
                market this decade."
                .into(),
            figure: None,
            backdrop: None,
            content: Box::new(
                RevealList::new()
                    .always(Block::Heading("Industrial offtake".into()))
                    .at(1, bullet_with(
                        "Ammonia synthesis",
                        "Haber-Bosch consumes about half of global hydrogen today",
                    ))
                    .at(2, bullet_with(
                        "Refining",
                        "Hydrocracking and desulfurization, co-located demand",
                    ))
                    .at(3, bullet_with(
                        "Green steel",
                        "Direct reduction of iron ore with H2 instead of coke",
                    )),
            ),
        },
        Slide {
            id: 11,
            layout: Layout::Center,
            step_count: 3,
            narration: "The honest challenges: green hydrogen remains \
                expensive, infrastructure is nascent, and efficiency losses \
                compound across the chain. None of these are laws of physics."
                .into(),
            figure: None,
            backdrop: None,
            content: Box::new(
                RevealList::new()
                    .always(Block::Heading("The honest challenges".into()))
                    .at(1, bullet("Cost: green H2 is still 2 to 4 times grey"))
                    .at(2, bullet("Infrastructure: production, storage, and demand must scale together"))
                    .at(3, bullet("Efficiency: each conversion step compounds losses")),
            ),
        },
        Slide {
            id: 12,
            layout: Layout::Center,
            step_count: 0,
            narration: "Thank you. Hydrogen will not power everything, but for \
                the sectors nothing else can reach, the industrial and academic \
                frontiers are converging faster than most roadmaps predicted."
                .into(),
            figure: None,
            backdrop: None,
            content: Box::new(
                RevealList::new()
                    .always(Block::Heading("Outlook".into()))
                    .always(Block::Spacer(12.0))
                    .always(Block::Paragraph(
                        "Not an everything-fuel, a someplace-essential one."
                            .into(),
                    ))
                    .always(Block::Spacer(24.0))
                    .always(Block::Subheading("Questions welcome, or ask the assistant.".into())),
            ),
        },
    ];
    Deck::new(slides)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_deck_validates() {
        let deck = hydrogen_deck().expect("the shipped deck must pass validation");
        assert_eq!(deck.len(), 12);
    }

    #[test]
    fn every_slide_narrates() {
        let deck = hydrogen_deck().unwrap();
        for slide in deck.slides() {
            assert!(!slide.narration.trim().is_empty(), "slide {} is silent", slide.id);
        }
    }

    #[test]
    fn step_counts_line_up_with_reveals() {
        let deck = hydrogen_deck().unwrap();
        for slide in deck.slides() {
            assert_eq!(slide.step_count, slide.content.max_step(), "slide {}", slide.id);
            // More content must appear as steps reveal
            if slide.step_count > 0 {
                let first = slide.content.render(0).len();
                let last = slide.content.render(slide.step_count).len();
                assert!(last > first, "slide {} reveals nothing", slide.id);
            }
        }
    }
}
