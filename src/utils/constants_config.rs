use log::warn;

use crate::errors::PhysicsError;
use crate::models::Vector3;
use crate::utils::{DEFAULT_COLLISION_SETTINGS, DEFAULT_SIMULATION_CONSTANTS};

/// World-level constants shared by every body in a simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConstants {
    /// Acceleration applied to every body each tick.
    pub gravity: Vector3,
    /// Elasticity given to bodies that do not specify their own.
    pub elasticity: f64,
    /// Kinetic friction given to bodies that do not specify their own.
    pub kinetic_friction: f64,
    /// Static friction given to bodies that do not specify their own.
    pub static_friction: f64,
}

impl Default for SimulationConstants {
    fn default() -> Self {
        DEFAULT_SIMULATION_CONSTANTS
    }
}

impl SimulationConstants {
    pub fn new(
        gravity: Option<Vector3>,
        elasticity: Option<f64>,
        kinetic_friction: Option<f64>,
        static_friction: Option<f64>,
    ) -> Self {
        let default = DEFAULT_SIMULATION_CONSTANTS;
        Self {
            gravity: gravity.unwrap_or(default.gravity),
            elasticity: elasticity.unwrap_or(default.elasticity),
            kinetic_friction: kinetic_friction.unwrap_or(default.kinetic_friction),
            static_friction: static_friction.unwrap_or(default.static_friction),
        }
    }

    /// Constants with gravity switched off.
    pub fn weightless() -> Self {
        Self::new(Some(Vector3::zero()), None, None, None)
    }

    pub fn validate(&self) -> Result<(), PhysicsError> {
        if !self.gravity.is_finite() {
            return Err(PhysicsError::CalculationError("Gravity must be finite".to_string()));
        }
        for coefficient in [self.elasticity, self.kinetic_friction, self.static_friction] {
            if !(0.0..=1.0).contains(&coefficient) {
                return Err(PhysicsError::InvalidCoefficient);
            }
        }
        Ok(())
    }
}

/// How a bounded overlap between two bodies is corrected once the impulse has
/// been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullApartMode {
    /// Leave the overlap in place.
    None,
    /// Move both bodies apart along the contact normal immediately.
    Instant,
    /// Add a capped separating velocity and let the next ticks separate them.
    Force,
}

/// How two per-body coefficients (elasticity, friction) combine for a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoefficientBlend {
    Average,
    Multiply,
    Minimum,
    Maximum,
}

impl CoefficientBlend {
    /// # Example
    /// ```
    /// use rs_rigid_body::utils::CoefficientBlend;
    ///
    /// assert_eq!(CoefficientBlend::Average.combine(0.2, 0.6), 0.4);
    /// assert_eq!(CoefficientBlend::Minimum.combine(0.2, 0.6), 0.2);
    /// ```
    pub fn combine(&self, a: f64, b: f64) -> f64 {
        match self {
            CoefficientBlend::Average => (a + b) / 2.0,
            CoefficientBlend::Multiply => a * b,
            CoefficientBlend::Minimum => a.min(b),
            CoefficientBlend::Maximum => a.max(b),
        }
    }
}

/// Tunables of the collision resolver.
///
/// Fields are only reachable through validating setters so a handler can never
/// hold an out-of-range configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionSettings {
    pub(crate) penetration_threshold_percent: f64,
    pub(crate) pull_apart_instant_percent: f64,
    pub(crate) pull_apart_spring_velocity: f64,
    pub(crate) pull_apart_mode: PullApartMode,
    pub(crate) elasticity: Option<f64>,
    pub(crate) coefficient_blend: CoefficientBlend,
}

impl Default for CollisionSettings {
    fn default() -> Self {
        DEFAULT_COLLISION_SETTINGS
    }
}

fn check_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<(), PhysicsError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        warn!("Rejected {} = {} (accepted range [{}, {}])", name, value, min, max);
        Err(PhysicsError::OutOfRange { name, value, min, max })
    }
}

impl CollisionSettings {
    /// Builds settings from the given values, falling back to the defaults for
    /// anything left as `None`. Every value goes through the same range checks
    /// as the setters.
    ///
    /// # Example
    /// ```
    /// use rs_rigid_body::utils::{CollisionSettings, PullApartMode};
    ///
    /// let settings = CollisionSettings::new(Some(0.05), None, None, Some(PullApartMode::Force)).unwrap();
    /// assert_eq!(settings.pull_apart_mode(), PullApartMode::Force);
    /// assert!(CollisionSettings::new(None, Some(3.0), None, None).is_err());
    /// ```
    pub fn new(
        penetration_threshold_percent: Option<f64>,
        pull_apart_instant_percent: Option<f64>,
        pull_apart_spring_velocity: Option<f64>,
        pull_apart_mode: Option<PullApartMode>,
    ) -> Result<Self, PhysicsError> {
        let mut settings = DEFAULT_COLLISION_SETTINGS;
        if let Some(value) = penetration_threshold_percent {
            settings.set_penetration_threshold_percent(value)?;
        }
        if let Some(value) = pull_apart_instant_percent {
            settings.set_pull_apart_instant_percent(value)?;
        }
        if let Some(value) = pull_apart_spring_velocity {
            settings.set_pull_apart_spring_velocity(value)?;
        }
        if let Some(mode) = pull_apart_mode {
            settings.set_pull_apart_mode(mode);
        }
        Ok(settings)
    }

    /// Fraction of the combined radii two bodies may overlap before a
    /// pull-apart correction kicks in.
    pub fn penetration_threshold_percent(&self) -> f64 {
        self.penetration_threshold_percent
    }

    /// # Example
    /// ```
    /// use rs_rigid_body::utils::CollisionSettings;
    ///
    /// let mut settings = CollisionSettings::default();
    /// assert!(settings.set_penetration_threshold_percent(0.05).is_ok());
    /// assert!(settings.set_penetration_threshold_percent(1.5).is_err());
    /// assert_eq!(settings.penetration_threshold_percent(), 0.05);
    /// ```
    pub fn set_penetration_threshold_percent(&mut self, value: f64) -> Result<(), PhysicsError> {
        check_range("penetration_threshold_percent", value, 0.0, 1.0)?;
        self.penetration_threshold_percent = value;
        Ok(())
    }

    /// Fraction of the penetration depth removed by an `Instant` pull-apart.
    pub fn pull_apart_instant_percent(&self) -> f64 {
        self.pull_apart_instant_percent
    }

    pub fn set_pull_apart_instant_percent(&mut self, value: f64) -> Result<(), PhysicsError> {
        check_range("pull_apart_instant_percent", value, 0.0, 2.0)?;
        self.pull_apart_instant_percent = value;
        Ok(())
    }

    /// Cap on the separating speed a `Force` pull-apart adds.
    pub fn pull_apart_spring_velocity(&self) -> f64 {
        self.pull_apart_spring_velocity
    }

    pub fn set_pull_apart_spring_velocity(&mut self, value: f64) -> Result<(), PhysicsError> {
        check_range("pull_apart_spring_velocity", value, 0.0, f64::MAX)?;
        self.pull_apart_spring_velocity = value;
        Ok(())
    }

    pub fn pull_apart_mode(&self) -> PullApartMode {
        self.pull_apart_mode
    }

    pub fn set_pull_apart_mode(&mut self, mode: PullApartMode) {
        self.pull_apart_mode = mode;
    }

    /// Global elasticity override. `None` blends the two bodies' own values.
    pub fn elasticity(&self) -> Option<f64> {
        self.elasticity
    }

    pub fn set_elasticity(&mut self, value: Option<f64>) -> Result<(), PhysicsError> {
        if let Some(elasticity) = value {
            check_range("elasticity", elasticity, 0.0, 1.0)?;
        }
        self.elasticity = value;
        Ok(())
    }

    pub fn coefficient_blend(&self) -> CoefficientBlend {
        self.coefficient_blend
    }

    pub fn set_coefficient_blend(&mut self, blend: CoefficientBlend) {
        self.coefficient_blend = blend;
    }
}
