/// Fixed timestep accumulator.
/// Ensures the simulation advances at a consistent rate regardless of frame time.
pub struct FixedTimestep {
    /// The fixed delta time per tick.
    dt: f32,
    /// Upper bound on steps per frame.
    max_steps: u32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self::with_max_steps(dt, 10)
    }

    pub fn with_max_steps(dt: f32, max_steps: u32) -> Self {
        Self {
            dt,
            max_steps: max_steps.max(1),
            accumulator: 0.0,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.max(0.0);
        // Drop the excess so a long stall does not replay seconds of simulation.
        self.accumulator = self.accumulator.min(self.dt * self.max_steps as f32);
        let steps = ((self.accumulator / self.dt) as u32).min(self.max_steps);
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// Interpolation alpha for rendering between ticks (0.0 to 1.0).
    pub fn alpha(&self) -> f32 {
        (self.accumulator / self.dt).clamp(0.0, 1.0)
    }

    /// The fixed delta time.
    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }
}
