//! Box-blur diffusion with evaporation.
//!
//! Each cell of the target becomes
//!
//! ```text
//! v   = prev + (box_mean(prev) - prev) * clamp(diffuse_weight * dt, 0, 1)
//! out = max(0, v * clamp(1 - evaporate_speed * dt, 0, 1))
//! ```
//!
//! where `prev` is the kernel's source grid. Evaporation can be switched
//! off per instance so a separable horizontal/vertical pair evaporates
//! exactly once per tick.

use slime_core::KernelError;
use slime_field::BlurAxis;
use slime_kernel::{Domain, Kernel, KernelContext, KernelExecutor};

/// One blur pass from the context's field into its target grid.
///
/// # Construction
///
/// ```
/// use slime_field::BlurAxis;
/// use slime_kernels::Diffuse;
///
/// let pass = Diffuse::builder()
///     .axis(BlurAxis::Horizontal)
///     .blur_radius(1)
///     .evaporate_speed(0.2)
///     .evaporate(false)
///     .build()
///     .unwrap();
/// assert_eq!(pass.axis(), BlurAxis::Horizontal);
/// ```
#[derive(Clone, Debug)]
pub struct Diffuse {
    axis: BlurAxis,
    blur_radius: u32,
    diffuse_weight: f32,
    evaporate_speed: f32,
    evaporate: bool,
}

/// Builder for [`Diffuse`].
///
/// Defaults: full 2D window, radius 1, diffuse weight 1.0 (pure blur at
/// `dt = 1`), no evaporation speed, evaporation enabled.
#[derive(Clone)]
pub struct DiffuseBuilder {
    axis: BlurAxis,
    blur_radius: u32,
    diffuse_weight: f32,
    evaporate_speed: f32,
    evaporate: bool,
}

impl Diffuse {
    /// Create a new builder.
    pub fn builder() -> DiffuseBuilder {
        DiffuseBuilder {
            axis: BlurAxis::Both,
            blur_radius: 1,
            diffuse_weight: 1.0,
            evaporate_speed: 0.0,
            evaporate: true,
        }
    }

    /// The horizontal-then-vertical pair a tick issues. Only the second
    /// pass evaporates.
    pub fn separable_pair(
        blur_radius: u32,
        diffuse_weight: f32,
        evaporate_speed: f32,
    ) -> Result<[Diffuse; 2], String> {
        let base = Self::builder()
            .blur_radius(blur_radius)
            .diffuse_weight(diffuse_weight)
            .evaporate_speed(evaporate_speed);
        let horizontal = base.clone().axis(BlurAxis::Horizontal).evaporate(false).build()?;
        let vertical = base.axis(BlurAxis::Vertical).evaporate(true).build()?;
        Ok([horizontal, vertical])
    }

    /// Blur direction.
    pub fn axis(&self) -> BlurAxis {
        self.axis
    }

    /// Blur window radius in cells.
    pub fn blur_radius(&self) -> u32 {
        self.blur_radius
    }

    /// Whether this pass applies evaporation.
    pub fn evaporates(&self) -> bool {
        self.evaporate
    }

    /// Multiplier applied after blending, for a given `dt`.
    pub fn decay_factor(&self, dt: f32) -> f32 {
        if self.evaporate {
            (1.0 - self.evaporate_speed * dt).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}

impl DiffuseBuilder {
    /// Blur direction (default [`BlurAxis::Both`]).
    pub fn axis(mut self, axis: BlurAxis) -> Self {
        self.axis = axis;
        self
    }

    /// Window radius (default 1). Zero disables blurring.
    pub fn blur_radius(mut self, radius: u32) -> Self {
        self.blur_radius = radius;
        self
    }

    /// Blend rate toward the blurred value, per second (default 1.0).
    pub fn diffuse_weight(mut self, weight: f32) -> Self {
        self.diffuse_weight = weight;
        self
    }

    /// Fraction of intensity lost per second (default 0.0).
    pub fn evaporate_speed(mut self, speed: f32) -> Self {
        self.evaporate_speed = speed;
        self
    }

    /// Whether this pass applies evaporation (default true).
    pub fn evaporate(mut self, on: bool) -> Self {
        self.evaporate = on;
        self
    }

    /// Build the kernel.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `diffuse_weight` or `evaporate_speed` is negative
    /// or not finite.
    pub fn build(self) -> Result<Diffuse, String> {
        if !(self.diffuse_weight >= 0.0) || !self.diffuse_weight.is_finite() {
            return Err(format!(
                "diffuse_weight must be finite and >= 0, got {}",
                self.diffuse_weight
            ));
        }
        if !(self.evaporate_speed >= 0.0) || !self.evaporate_speed.is_finite() {
            return Err(format!(
                "evaporate_speed must be finite and >= 0, got {}",
                self.evaporate_speed
            ));
        }
        Ok(Diffuse {
            axis: self.axis,
            blur_radius: self.blur_radius,
            diffuse_weight: self.diffuse_weight,
            evaporate_speed: self.evaporate_speed,
            evaporate: self.evaporate,
        })
    }
}

impl Kernel for Diffuse {
    fn name(&self) -> &str {
        match self.axis {
            BlurAxis::Horizontal => "diffuse_h",
            BlurAxis::Vertical => "diffuse_v",
            BlurAxis::Both => "diffuse",
        }
    }

    fn domain(&self) -> Domain {
        Domain::Cells
    }

    fn dispatch(
        &self,
        ctx: &mut KernelContext<'_>,
        exec: &dyn KernelExecutor,
    ) -> Result<(), KernelError> {
        let source = ctx.field();
        let edge = ctx.edge();
        let dt = ctx.dt();
        let blend = (self.diffuse_weight * dt).clamp(0.0, 1.0);
        let decay = self.decay_factor(dt);
        let (axis, radius) = (self.axis, self.blur_radius);

        let target = ctx.target()?;
        if target.len() != source.len() {
            return Err(KernelError::BufferMismatch {
                expected: source.len(),
                actual: target.len(),
            });
        }

        let prev = source.cells();
        exec.fill_cells(target.cells_mut(), &|i| {
            let blurred = source.box_mean(i, axis, radius, edge);
            let v = (prev[i] + (blurred - prev[i]) * blend) * decay;
            // NaN passes through so the stepper's finiteness check sees it.
            if v < 0.0 {
                0.0
            } else {
                v
            }
        });
        Ok(())
    }
}
