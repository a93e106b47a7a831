use raylib::prelude::*;

use crate::constants::TRANSITION_DURATION;
use crate::nav::Direction;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Phase {
    Entering, // Sliding in toward center
    Active,   // At rest, the one steady-state pane
    Exiting,  // Sliding out toward the opposite edge
}

/// A drawable slide surface: which slide, where it sits (horizontal offset as
/// a fraction of the stage width), and how faded/scaled it is.
#[derive(Debug, Clone, Copy)]
pub struct Pane {
    pub slide: usize,
    pub phase: Phase,
    pub offset: f32,
    pub alpha: f32,
    pub scale: f32,
}

// One in-flight crossing: the outgoing pane exits while the incoming pane
// enters. Both run off independent tweens over the same clock.
struct Transition {
    to: usize,
    elapsed: f32,

    enter_x: ease::Tween,
    exit_x: ease::Tween,
    fade_in: ease::Tween,
    fade_out: ease::Tween,
    grow_in: ease::Tween,
    grow_out: ease::Tween,

    incoming: Pane,
    outgoing: Pane,
}

impl Transition {
    fn new(from: usize, to: usize, direction: Direction) -> Self {
        // Forward: enter from the right edge, exit through the left.
        // Backward mirrors. Fade and scale are direction-independent.
        let edge = match direction {
            Direction::Backward => -1.0,
            _ => 1.0,
        };
        Self {
            to,
            elapsed: 0.0,
            enter_x: ease::Tween::new(ease::cubic_out, edge, 0.0, TRANSITION_DURATION),
            exit_x: ease::Tween::new(ease::cubic_out, 0.0, -edge, TRANSITION_DURATION),
            fade_in: ease::Tween::new(ease::cubic_out, 0.0, 1.0, TRANSITION_DURATION),
            fade_out: ease::Tween::new(ease::cubic_out, 1.0, 0.0, TRANSITION_DURATION),
            grow_in: ease::Tween::new(ease::cubic_out, 0.92, 1.0, TRANSITION_DURATION),
            grow_out: ease::Tween::new(ease::cubic_out, 1.0, 1.08, TRANSITION_DURATION),
            incoming: Pane {
                slide: to,
                phase: Phase::Entering,
                offset: edge,
                alpha: 0.0,
                scale: 0.92,
            },
            outgoing: Pane {
                slide: from,
                phase: Phase::Exiting,
                offset: 0.0,
                alpha: 1.0,
                scale: 1.0,
            },
        }
    }

    fn update(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        self.incoming.offset = self.enter_x.apply(dt);
        self.incoming.alpha = self.fade_in.apply(dt);
        self.incoming.scale = self.grow_in.apply(dt);
        self.outgoing.offset = self.exit_x.apply(dt);
        self.outgoing.alpha = self.fade_out.apply(dt);
        self.outgoing.scale = self.grow_out.apply(dt);
        self.elapsed >= TRANSITION_DURATION
    }
}

/// Turns slide crossings into animated enter/exit pane pairs and step-only
/// changes into instant re-renders. Whatever happens to an in-flight
/// animation, the presenter converges on the slide of the latest `show`.
pub struct Presenter {
    active: usize,
    transition: Option<Transition>,
}

impl Presenter {
    pub fn new(initial: usize) -> Self {
        Self {
            active: initial,
            transition: None,
        }
    }

    /// The slide the presenter is showing or heading toward.
    pub fn target(&self) -> usize {
        self.transition.as_ref().map_or(self.active, |t| t.to)
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Show a slide without animation (startup, explicit jumps).
    pub fn snap(&mut self, slide: usize) {
        self.active = slide;
        self.transition = None;
    }

    /// Begin a crossing toward `to`. A transition already in flight is
    /// superseded: dropped wholesale and replaced by a fresh enter/exit pair,
    /// so animations never stack.
    pub fn show(&mut self, to: usize, direction: Direction) {
        let from = self.target();
        if from == to {
            return;
        }
        self.transition = Some(Transition::new(from, to, direction));
    }

    pub fn update(&mut self, dt: f32) {
        if let Some(t) = &mut self.transition {
            if t.update(dt) {
                self.active = t.to;
                self.transition = None;
            }
        }
    }

    /// Panes to draw this frame, back to front.
    pub fn panes(&self) -> Vec<Pane> {
        match &self.transition {
            Some(t) => vec![t.outgoing, t.incoming],
            None => vec![Pane {
                slide: self.active,
                phase: Phase::Active,
                offset: 0.0,
                alpha: 1.0,
                scale: 1.0,
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: f32 = 1.0 / 60.0;

    fn run(p: &mut Presenter, seconds: f32) {
        let mut t = 0.0;
        while t < seconds {
            p.update(STEP);
            t += STEP;
        }
    }

    #[test]
    fn steady_state_is_a_single_active_pane() {
        let p = Presenter::new(3);
        let panes = p.panes();
        assert_eq!(panes.len(), 1);
        assert_eq!(panes[0].slide, 3);
        assert_eq!(panes[0].phase, Phase::Active);
        assert_eq!(panes[0].offset, 0.0);
        assert_eq!(panes[0].alpha, 1.0);
    }

    #[test]
    fn forward_crossing_enters_from_the_right() {
        let mut p = Presenter::new(0);
        p.show(1, Direction::Forward);
        let panes = p.panes();
        assert_eq!(panes.len(), 2);
        let outgoing = panes[0];
        let incoming = panes[1];
        assert_eq!(outgoing.slide, 0);
        assert_eq!(outgoing.phase, Phase::Exiting);
        assert_eq!(incoming.slide, 1);
        assert_eq!(incoming.phase, Phase::Entering);
        assert!(incoming.offset > 0.5, "incoming starts near the right edge");
        assert!(incoming.alpha < 0.5);

        // Part-way through, the incoming pane has moved toward center and the
        // outgoing pane has left toward the opposite edge.
        run(&mut p, TRANSITION_DURATION / 2.0);
        let panes = p.panes();
        assert!(panes[1].offset > 0.0 && panes[1].offset < 1.0);
        assert!(panes[0].offset < 0.0);
    }

    #[test]
    fn backward_crossing_mirrors_the_geometry() {
        let mut p = Presenter::new(2);
        p.show(1, Direction::Backward);
        let panes = p.panes();
        assert!(panes[1].offset < -0.5, "incoming starts near the left edge");
        run(&mut p, TRANSITION_DURATION / 2.0);
        assert!(p.panes()[0].offset > 0.0, "outgoing leaves to the right");
    }

    #[test]
    fn completed_transition_converges_to_the_target() {
        let mut p = Presenter::new(0);
        p.show(1, Direction::Forward);
        run(&mut p, TRANSITION_DURATION + 0.1);
        assert!(!p.is_animating());
        let panes = p.panes();
        assert_eq!(panes.len(), 1);
        assert_eq!(panes[0].slide, 1);
        assert_eq!(panes[0].phase, Phase::Active);
        assert_eq!(panes[0].offset, 0.0);
        assert_eq!(panes[0].alpha, 1.0);
    }

    #[test]
    fn superseding_drops_the_old_transition() {
        let mut p = Presenter::new(0);
        p.show(1, Direction::Forward);
        run(&mut p, TRANSITION_DURATION / 3.0);
        p.show(2, Direction::Forward);

        // No stacking: exactly one enter/exit pair, heading to the new target.
        let panes = p.panes();
        assert_eq!(panes.len(), 2);
        assert_eq!(panes[0].slide, 1);
        assert_eq!(panes[1].slide, 2);
        assert_eq!(p.target(), 2);

        run(&mut p, TRANSITION_DURATION + 0.1);
        assert_eq!(p.panes()[0].slide, 2);
        assert!(!p.is_animating());
    }

    #[test]
    fn superseding_backward_mid_forward_converges_backward() {
        let mut p = Presenter::new(0);
        p.show(1, Direction::Forward);
        run(&mut p, TRANSITION_DURATION / 4.0);
        p.show(0, Direction::Backward);
        assert_eq!(p.target(), 0);
        run(&mut p, TRANSITION_DURATION + 0.1);
        let panes = p.panes();
        assert_eq!(panes.len(), 1);
        assert_eq!(panes[0].slide, 0);
    }

    #[test]
    fn showing_the_current_target_is_a_noop() {
        let mut p = Presenter::new(5);
        p.show(5, Direction::Forward);
        assert!(!p.is_animating());
        p.show(6, Direction::Forward);
        p.show(6, Direction::Forward);
        assert_eq!(p.panes().len(), 2);
        assert_eq!(p.target(), 6);
    }

    #[test]
    fn snap_cancels_any_animation() {
        let mut p = Presenter::new(0);
        p.show(1, Direction::Forward);
        p.snap(4);
        assert!(!p.is_animating());
        assert_eq!(p.panes()[0].slide, 4);
    }
}
