use glam::DVec2;
use perlin_field::linspace;

/// Window into the noise volume shown by the viewer.
pub struct Viewport {
    pub center: DVec2,
    /// Noise units spanned by the full width of the screen.
    pub scale: f64,
    pub depth: f64,
}

impl Viewport {
    pub fn new(scale: f64) -> Self {
        Self {
            center: DVec2::ZERO,
            scale,
            depth: 0.0,
        }
    }

    /// Sample coordinates for a `width × height` pixel grid, keeping pixels square.
    pub fn axes(&self, width: u32, height: u32) -> (Vec<f64>, Vec<f64>) {
        let half = DVec2::new(self.scale, self.scale * height as f64 / width.max(1) as f64) * 0.5;
        let min = self.center - half;
        let max = self.center + half;
        (
            linspace(min.x, max.x, width as usize),
            linspace(min.y, max.y, height as usize),
        )
    }

    pub fn advance(&mut self, dz: f64) {
        self.depth += dz;
    }
}
