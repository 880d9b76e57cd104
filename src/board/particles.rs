// Connection sparkles: short-lived dots that drift out of a finished endpoint.
use web_sys::CanvasRenderingContext2d;

struct Particle {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    life: f64,
    color: String,
}

pub struct Particles {
    items: Vec<Particle>,
    rng: u64,
}

impl Particles {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            items: Vec::new(),
            // xorshift must never sit at zero
            rng: seed | 1,
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    // xorshift64, mapped to [-0.5, 0.5)
    fn jitter(&mut self) -> f64 {
        let mut x = self.rng;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.rng = x;
        (x >> 11) as f64 / (1u64 << 53) as f64 - 0.5
    }

    pub fn spawn(&mut self, x: f64, y: f64, color: &str, count: usize, speed: f64) {
        for _ in 0..count {
            let vx = self.jitter() * speed;
            let vy = self.jitter() * speed;
            self.items.push(Particle {
                x,
                y,
                vx,
                vy,
                life: 1.0,
                color: color.to_string(),
            });
        }
    }

    pub fn update(&mut self, decay: f64) {
        for p in self.items.iter_mut() {
            p.x += p.vx;
            p.y += p.vy;
            p.life -= decay;
        }
        self.items.retain(|p| p.life > 0.0);
    }

    pub fn draw(&self, ctx: &CanvasRenderingContext2d, radius: f64) {
        for p in &self.items {
            ctx.set_global_alpha(p.life);
            ctx.set_fill_style_str(&p.color);
            ctx.begin_path();
            if ctx.arc(p.x, p.y, radius, 0.0, std::f64::consts::TAU).is_ok() {
                ctx.fill();
            }
        }
        ctx.set_global_alpha(1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn particles_fade_out() {
        let mut ps = Particles::with_seed(42);
        ps.spawn(10.0, 10.0, "#FF3333", 20, 5.0);
        assert_eq!(ps.items.len(), 20);
        for _ in 0..49 {
            ps.update(0.02);
        }
        assert_eq!(ps.items.len(), 20);
        ps.update(0.02);
        ps.update(0.02);
        assert!(ps.items.is_empty());
    }

    #[test]
    fn velocities_stay_within_speed() {
        let mut ps = Particles::with_seed(0);
        ps.spawn(0.0, 0.0, "#33FF33", 100, 5.0);
        assert!(
            ps.items
                .iter()
                .all(|p| p.vx.abs() <= 2.5 && p.vy.abs() <= 2.5)
        );
    }
}
