//! Bodies in the absorption field: the black hole and the planets it eats.
//!
//! Units are pixels for distance and kilograms for mass. One step is one
//! frame at 60 frames per second.

/// Gravitational constant.
pub const G: f64 = 6.67408e-11;

/// Mass in kilograms per square pixel of planet area.
pub const MASS_AREA_RATIO: f64 = 2e9;

/// Radius and mass multiplier applied each time a planet is absorbed.
pub const GROWTH_FACTOR: f64 = 1.009;

/// Absorption happens inside this multiple of the black hole radius
/// (plus the planet's own radius).
const ABSORPTION_RADIUS_FACTOR: f64 = 1.2;

/// Accretion disk radius as a multiple of the black hole radius.
const ACCRETION_DISK_FACTOR: f64 = 3.0;

/// Outer edges of the gravitational layers, in black hole radii, innermost first.
const LAYER_RADII: [f64; 4] = [90.0, 200.0, 500.0, 700.0];

/// Pull multiplier for each layer, innermost first.
const LAYER_PULL: [f64; 4] = [0.9, 0.8, 0.6, 0.5];

/// A planet drifting towards the black hole.
#[derive(Debug, Clone, PartialEq)]
pub struct Planet {
    pub id: u32,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub mass: f64,
    pub vx: f64,
    pub vy: f64,
}

impl Planet {
    pub fn new(id: u32, x: f64, y: f64, radius: f64, vx: f64, vy: f64) -> Self {
        Self {
            id,
            x,
            y,
            radius,
            mass: area_mass(radius),
            vx,
            vy,
        }
    }

    /// Damp velocity according to proximity to the black hole, then move.
    pub fn advance(&mut self, black_hole: &BlackHole) {
        let damping = black_hole.damping_at(self.distance_to(black_hole));
        self.vx *= damping;
        self.vy *= damping;
        self.x += self.vx;
        self.y += self.vy;
        self.mass = area_mass(self.radius);
    }

    pub fn distance_to(&self, black_hole: &BlackHole) -> f64 {
        (black_hole.x - self.x).hypot(black_hole.y - self.y)
    }
}

/// The black hole at the centre of the field.
#[derive(Debug, Clone, PartialEq)]
pub struct BlackHole {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub mass: f64,
    pub accretion_disk_radius: f64,
}

impl BlackHole {
    pub fn new(x: f64, y: f64, radius: f64, mass: f64) -> Self {
        Self {
            x,
            y,
            radius,
            mass,
            accretion_disk_radius: ACCRETION_DISK_FACTOR * radius,
        }
    }

    /// Pull multiplier for a body at `distance`. Zero beyond the outermost layer.
    pub fn pull_strength(&self, distance: f64) -> f64 {
        LAYER_RADII
            .iter()
            .zip(LAYER_PULL)
            .find(|(edge, _)| distance <= *edge * self.radius)
            .map(|(_, pull)| pull)
            .unwrap_or(0.0)
    }

    /// Velocity damping factor for a body at `distance`.
    ///
    /// Stronger inside the accretion disk; never below 0.70 near the
    /// event horizon.
    pub fn damping_at(&self, distance: f64) -> f64 {
        let mut damping = if distance < self.accretion_disk_radius {
            0.90 - (distance / self.accretion_disk_radius) * 0.25
        } else {
            0.95
        };
        if distance < self.radius * 2.0 {
            damping = damping.max(0.70);
        }
        damping
    }

    /// Accelerate each planet towards the hole and absorb those that cross
    /// the absorption radius. Returns how many planets were absorbed.
    pub fn attract(&mut self, planets: &mut Vec<Planet>) -> usize {
        let mut absorbed = 0;
        planets.retain_mut(|planet| {
            let dx = self.x - planet.x;
            let dy = self.y - planet.y;
            let distance = dx.hypot(dy).max(1.0);

            let force = G * self.mass * planet.mass / (distance * distance)
                * self.pull_strength(distance);
            let angle = dy.atan2(dx);
            planet.vx += angle.cos() * force / planet.mass;
            planet.vy += angle.sin() * force / planet.mass;

            if distance < ABSORPTION_RADIUS_FACTOR * self.radius + planet.radius {
                self.grow();
                absorbed += 1;
                false
            } else {
                true
            }
        });
        absorbed
    }

    /// Grow radius and mass after an absorption; the disk follows the radius.
    pub fn grow(&mut self) {
        self.radius *= GROWTH_FACTOR;
        self.mass *= GROWTH_FACTOR;
        self.accretion_disk_radius = ACCRETION_DISK_FACTOR * self.radius;
    }
}

/// Mass of a disc of the given radius.
pub fn area_mass(radius: f64) -> f64 {
    std::f64::consts::PI * radius * radius * MASS_AREA_RATIO
}
