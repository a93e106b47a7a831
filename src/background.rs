use rand::Rng;
use raylib::prelude::*;

use crate::constants::*;

const PARTICLE_COUNT: usize = 90;

struct Particle {
    position: Vector2, // normalized [0,1] stage coordinates
    radius: f32,
    drift: Vector2,
    depth: f32, // 0 = far (slow, dim), 1 = near (fast, bright)
}

/// Slow-drifting particle field behind the slides. Nearer particles drift
/// faster and shift slightly with deck progress for a parallax feel.
pub struct Background {
    particles: Vec<Particle>,
}

impl Background {
    pub fn new() -> Self {
        let mut rng = rand::rng();
        let particles = (0..PARTICLE_COUNT)
            .map(|_| {
                let depth = rng.random_range(0.0..1.0_f32);
                Particle {
                    position: Vector2::new(
                        rng.random_range(0.0..1.0),
                        rng.random_range(0.0..1.0),
                    ),
                    radius: 1.0 + depth * rng.random_range(1.5..3.5),
                    drift: Vector2::new(
                        rng.random_range(-0.008..0.008),
                        rng.random_range(-0.014..-0.003),
                    ),
                    depth,
                }
            })
            .collect();
        Self { particles }
    }

    pub fn update(&mut self, dt: f32) {
        for p in self.particles.iter_mut() {
            p.position.x += p.drift.x * (0.4 + p.depth) * dt;
            p.position.y += p.drift.y * (0.4 + p.depth) * dt;
            // Wrap around the stage edges
            if p.position.y < -0.02 {
                p.position.y = 1.02;
            }
            if p.position.x < -0.02 {
                p.position.x = 1.02;
            } else if p.position.x > 1.02 {
                p.position.x = -0.02;
            }
        }
    }

    pub fn draw(&self, d: &mut RaylibDrawHandle, progress: f32) {
        let w = RENDER_WIDTH as f32;
        let h = RENDER_HEIGHT as f32;
        // Parallax: near layers shift further as the deck advances
        let shift = (progress - 0.5) * 0.06;
        for p in self.particles.iter() {
            let x = (p.position.x - shift * p.depth).rem_euclid(1.0) * w;
            let y = p.position.y * h;
            let brightness = 40.0 + p.depth * 80.0;
            let tint = Color::new(
                ACCENT_CYAN.r,
                ACCENT_CYAN.g,
                ACCENT_CYAN.b,
                brightness as u8,
            );
            d.draw_circle_v(Vector2::new(x, y), p.radius, tint);
        }
    }
}
